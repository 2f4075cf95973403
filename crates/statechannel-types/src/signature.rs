//! Wire form of a recoverable ECDSA signature.
//!
//! Wallets hand out 65 bytes `r || s || v`. Both conventions for `v` are
//! accepted: raw recovery ids (`0`, `1`) and the RPC form (`27`, `28`).
//! Decoding only checks the shape; whether `(r, s)` is a valid curve
//! signature is decided at recovery time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{RPC_RECOVERY_OFFSET, SIGNATURE_LENGTH};
use crate::{ChannelError, Result};

/// A decoded `(recovery_id, r, s)` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChannelSignature {
    /// Normalized to `0` or `1`.
    pub recovery_id: u8,
    pub r: [u8; 32],
    pub s: [u8; 32],
}

impl ChannelSignature {
    /// Decode the 65-byte `r || s || v` form.
    ///
    /// # Errors
    /// [`ChannelError::MalformedSignature`] on wrong length or an unknown `v`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SIGNATURE_LENGTH {
            return Err(ChannelError::MalformedSignature {
                reason: format!("expected {SIGNATURE_LENGTH} bytes, got {}", bytes.len()),
            });
        }
        let v = bytes[64];
        let recovery_id = match v {
            0 | 1 => v,
            27 | 28 => v - RPC_RECOVERY_OFFSET,
            other => {
                return Err(ChannelError::MalformedSignature {
                    reason: format!("invalid recovery byte {other}"),
                });
            }
        };
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        Ok(Self { recovery_id, r, s })
    }

    /// Build from the compact 64-byte `r || s` form and a raw recovery id.
    ///
    /// # Errors
    /// [`ChannelError::MalformedSignature`] if `recovery_id > 1`.
    pub fn from_compact(compact: &[u8; 64], recovery_id: u8) -> Result<Self> {
        let mut bytes = [0u8; SIGNATURE_LENGTH];
        bytes[..64].copy_from_slice(compact);
        bytes[64] = recovery_id;
        if recovery_id > 1 {
            return Err(ChannelError::MalformedSignature {
                reason: format!("invalid recovery id {recovery_id}"),
            });
        }
        Self::from_bytes(&bytes)
    }

    /// `r || s`.
    #[must_use]
    pub fn compact(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.r);
        out[32..].copy_from_slice(&self.s);
        out
    }

    /// 65-byte RPC form with `v` in `{27, 28}`.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut out = [0u8; SIGNATURE_LENGTH];
        out[..64].copy_from_slice(&self.compact());
        out[64] = self.recovery_id + RPC_RECOVERY_OFFSET;
        out
    }
}

impl fmt::Display for ChannelSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_bytes()))
    }
}

impl FromStr for ChannelSignature {
    type Err = ChannelError;

    fn from_str(s: &str) -> Result<Self> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let raw = hex::decode(stripped).map_err(|e| ChannelError::MalformedSignature {
            reason: format!("not hex: {e}"),
        })?;
        Self::from_bytes(&raw)
    }
}

impl TryFrom<String> for ChannelSignature {
    type Error = ChannelError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ChannelSignature> for String {
    fn from(sig: ChannelSignature) -> Self {
        sig.to_string()
    }
}
