//! Signer recovery over the personal-message convention.
//!
//! Recovery answers "who signed this?"; it never answers "is that the right
//! party?". A well-formed signature by the wrong key recovers *some*
//! address and is not an error here. Matching against the expected party is
//! the caller's job (see [`SettlementEngine`](crate::SettlementEngine)).

use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, Secp256k1, VerifyOnly};
use statechannel_types::{
    Address, ChannelError, ChannelSignature, Result, SignedTransfer, TransferIntent,
    constants, personal_message_hash,
};

/// Stateless signer recovery for one message prefix.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    prefix: String,
    secp: Secp256k1<VerifyOnly>,
}

impl SignatureVerifier {
    /// Verifier for the given protocol tag.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            secp: Secp256k1::verification_only(),
        }
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Recover the account that signed `message_hash`.
    ///
    /// # Errors
    /// - [`ChannelError::MalformedSignature`] if `(r, s)` is out of range
    /// - [`ChannelError::RecoveryFailure`] if no public key recovers
    pub fn recover_signer(
        &self,
        message_hash: &[u8; 32],
        signature: &ChannelSignature,
    ) -> Result<Address> {
        let recovery_id = RecoveryId::from_i32(i32::from(signature.recovery_id)).map_err(|e| {
            ChannelError::MalformedSignature {
                reason: format!("recovery id {}: {e}", signature.recovery_id),
            }
        })?;
        let recoverable = RecoverableSignature::from_compact(&signature.compact(), recovery_id)
            .map_err(|e| ChannelError::MalformedSignature {
                reason: e.to_string(),
            })?;

        let digest = personal_message_hash(&self.prefix, message_hash);
        let public = self
            .secp
            .recover_ecdsa(&Message::from_digest(digest), &recoverable)
            .map_err(|e| ChannelError::RecoveryFailure {
                reason: e.to_string(),
            })?;

        Ok(Address::from_public_key(&public))
    }

    /// Decode a raw `r || s || v` signature, then recover.
    pub fn recover_signer_bytes(&self, message_hash: &[u8; 32], raw: &[u8]) -> Result<Address> {
        let signature = ChannelSignature::from_bytes(raw)?;
        self.recover_signer(message_hash, &signature)
    }

    /// Whether `signature` over `intent` was produced by `expected`.
    ///
    /// Malformed or unrecoverable signatures are errors; a wrong signer is
    /// `Ok(false)`.
    pub fn verify(
        &self,
        intent: &TransferIntent,
        signature: &ChannelSignature,
        expected: Address,
    ) -> Result<bool> {
        let recovered = self.recover_signer(&intent.message_hash(), signature)?;
        Ok(recovered == expected)
    }

    /// Whether a transfer receipt carries the sender's own signature.
    pub fn verify_transfer(&self, transfer: &SignedTransfer) -> Result<bool> {
        self.verify(&transfer.intent, &transfer.signature, transfer.intent.sender)
    }
}

impl Default for SignatureVerifier {
    fn default() -> Self {
        Self::new(constants::DEFAULT_MESSAGE_PREFIX)
    }
}
