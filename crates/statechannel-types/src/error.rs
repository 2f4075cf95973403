//! Error types for the state-channel settlement engine.
//!
//! All errors use the `CH_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Signature errors
//! - 2xx: Balance errors
//! - 3xx: Nonce errors
//! - 9xx: General / internal errors
//!
//! Settlement rejections additionally map onto a fixed set of literal
//! reasons ([`RejectionReason`]) that callers and integrators match on.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Address, NonceKey};

/// The literal, externally observable reason a settlement was rejected.
///
/// The strings returned by [`RejectionReason::as_str`] are a stable contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectionReason {
    /// The `(sender, nonce)` key has already been consumed.
    AlreadySettled,
    /// One of the two signatures did not recover to the expected party.
    InvalidSignature,
    /// The sender cannot cover the amount.
    InsufficientBalance,
    /// A signature did not decode.
    MalformedSignature,
}

impl RejectionReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AlreadySettled => "Payment already settled",
            Self::InvalidSignature => "Invalid sender signature",
            Self::InsufficientBalance => "Insufficient balance",
            Self::MalformedSignature => "Malformed signature",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Central error enum for all settlement operations.
#[derive(Debug, Error)]
pub enum ChannelError {
    // =================================================================
    // Signature Errors (1xx)
    // =================================================================
    /// The encoded signature does not decode to `(recovery_id, r, s)`.
    #[error("CH_ERR_100: Malformed signature: {reason}")]
    MalformedSignature { reason: String },

    /// Public-key recovery produced no valid curve point.
    #[error("CH_ERR_101: Signer recovery failed: {reason}")]
    RecoveryFailure { reason: String },

    /// The sender's signature recovered to some other account.
    #[error("CH_ERR_102: Sender signature mismatch: expected {expected}, recovered {recovered}")]
    SenderSignatureMismatch { expected: Address, recovered: Address },

    /// The recipient's signature recovered to some other account.
    #[error("CH_ERR_103: Recipient signature mismatch: expected {expected}, recovered {recovered}")]
    RecipientSignatureMismatch { expected: Address, recovered: Address },

    // =================================================================
    // Balance Errors (2xx)
    // =================================================================
    /// Not enough balance to perform the debit.
    #[error("CH_ERR_200: Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    /// A credit would overflow the balance type.
    #[error("CH_ERR_201: Balance overflow")]
    BalanceOverflow,

    /// Σ balances no longer equals Σ allocations. Critical safety alert.
    #[error("CH_ERR_202: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    // =================================================================
    // Nonce Errors (3xx)
    // =================================================================
    /// The nonce key was already consumed by an earlier settlement.
    #[error("CH_ERR_300: Nonce already consumed: {0}")]
    AlreadyConsumed(NonceKey),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("CH_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("CH_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, missing fields, etc.).
    #[error("CH_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// An account string did not parse.
    #[error("CH_ERR_903: Invalid address: {0}")]
    InvalidAddress(String),
}

impl ChannelError {
    /// The literal rejection reason this error surfaces as, if it is a
    /// settlement rejection at all.
    ///
    /// Both signer mismatches and recovery failures report
    /// [`RejectionReason::InvalidSignature`]; the variants stay distinct so
    /// logs still say which signature failed.
    #[must_use]
    pub fn rejection(&self) -> Option<RejectionReason> {
        match self {
            Self::MalformedSignature { .. } => Some(RejectionReason::MalformedSignature),
            Self::RecoveryFailure { .. }
            | Self::SenderSignatureMismatch { .. }
            | Self::RecipientSignatureMismatch { .. } => Some(RejectionReason::InvalidSignature),
            Self::InsufficientBalance { .. } => Some(RejectionReason::InsufficientBalance),
            Self::AlreadyConsumed(_) => Some(RejectionReason::AlreadySettled),
            _ => None,
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, ChannelError>;

impl From<serde_json::Error> for ChannelError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_literals_are_stable() {
        assert_eq!(RejectionReason::AlreadySettled.as_str(), "Payment already settled");
        assert_eq!(RejectionReason::InvalidSignature.as_str(), "Invalid sender signature");
        assert_eq!(RejectionReason::InsufficientBalance.as_str(), "Insufficient balance");
        assert_eq!(RejectionReason::MalformedSignature.as_str(), "Malformed signature");
    }

    #[test]
    fn both_signer_mismatches_share_one_literal() {
        let a = Address::from_bytes([1u8; 20]);
        let b = Address::from_bytes([2u8; 20]);
        let sender = ChannelError::SenderSignatureMismatch { expected: a, recovered: b };
        let recipient = ChannelError::RecipientSignatureMismatch { expected: b, recovered: a };
        assert_eq!(sender.rejection(), Some(RejectionReason::InvalidSignature));
        assert_eq!(recipient.rejection(), Some(RejectionReason::InvalidSignature));
        assert!(format!("{recipient}").contains("Recipient"));
    }

    #[test]
    fn insufficient_balance_display() {
        let err = ChannelError::InsufficientBalance {
            needed: 100,
            available: 50,
        };
        let msg = format!("{err}");
        assert!(msg.contains("CH_ERR_200"));
        assert!(msg.contains("100"));
        assert!(msg.contains("50"));
        assert_eq!(err.rejection().map(RejectionReason::as_str), Some("Insufficient balance"));
    }

    #[test]
    fn non_settlement_errors_have_no_rejection() {
        assert!(ChannelError::Configuration("x".into()).rejection().is_none());
        assert!(ChannelError::BalanceOverflow.rejection().is_none());
    }

    #[test]
    fn all_errors_have_ch_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(ChannelError::BalanceOverflow),
            Box::new(ChannelError::MalformedSignature { reason: "short".into() }),
            Box::new(ChannelError::AlreadyConsumed(NonceKey::Global(7))),
            Box::new(ChannelError::Internal("test".into())),
            Box::new(ChannelError::SupplyInvariantViolation { reason: "x".into() }),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("CH_ERR_"),
                "Error missing CH_ERR_ prefix: {msg}"
            );
        }
    }
}
