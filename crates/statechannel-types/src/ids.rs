//! Identifiers used throughout the settlement engine.
//!
//! Accounts are 20-byte addresses derived from secp256k1 public keys.
//! Consumed nonces are keyed by [`NonceKey`]; settlement receipts by a
//! deterministic [`SettlementId`].

use std::fmt;
use std::str::FromStr;

use secp256k1::PublicKey;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ChannelError;
use crate::constants::ADDRESS_LENGTH;
use crate::intent::keccak256;

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// Account identifier: the right-most 20 bytes of
/// `keccak256(uncompressed_pubkey[1..])`.
///
/// Displays and serializes as `0x`-prefixed lowercase hex.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Default, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Address(pub [u8; ADDRESS_LENGTH]);

impl Address {
    /// The all-zero address.
    pub const ZERO: Self = Self([0u8; ADDRESS_LENGTH]);

    #[must_use]
    pub const fn from_bytes(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// Derive the account address of a secp256k1 public key.
    #[must_use]
    pub fn from_public_key(key: &PublicKey) -> Self {
        let uncompressed = key.serialize_uncompressed();
        // Skip the 0x04 SEC1 tag byte.
        let digest = keccak256(&uncompressed[1..]);
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes.copy_from_slice(&digest[32 - ADDRESS_LENGTH..]);
        Self(bytes)
    }

    /// Abbreviated form for log lines.
    #[must_use]
    pub fn short(&self) -> String {
        format!("0x{}", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = ChannelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let raw =
            hex::decode(stripped).map_err(|e| ChannelError::InvalidAddress(format!("{s}: {e}")))?;
        let bytes: [u8; ADDRESS_LENGTH] = raw.try_into().map_err(|v: Vec<u8>| {
            ChannelError::InvalidAddress(format!(
                "{s}: expected {ADDRESS_LENGTH} bytes, got {}",
                v.len()
            ))
        })?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = ChannelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

// ---------------------------------------------------------------------------
// NonceKey
// ---------------------------------------------------------------------------

/// Key of a consumed-nonce record.
///
/// Which shape the engine uses is fixed per ledger by
/// [`NonceScope`](crate::NonceScope).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum NonceKey {
    /// Nonce space is private to each sender.
    PerSender { sender: Address, nonce: u64 },
    /// One transaction-id space shared by every sender.
    Global(u64),
}

impl fmt::Display for NonceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PerSender { sender, nonce } => write!(f, "{}/{nonce}", sender.short()),
            Self::Global(tx_id) => write!(f, "tx:{tx_id}"),
        }
    }
}

// ---------------------------------------------------------------------------
// SettlementId
// ---------------------------------------------------------------------------

/// Identifier of a completed settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct SettlementId(pub Uuid);

impl SettlementId {
    /// Deterministic `SettlementId` from the canonical message hash.
    ///
    /// Any observer that saw the same signed intent derives the same id.
    #[must_use]
    pub fn deterministic(message_hash: &[u8; 32]) -> Self {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(b"statechannel:settlement_id:v1:");
        hasher.update(message_hash);
        let hash = hasher.finalize();
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&hash[..16]);
        Self(Uuid::from_bytes(bytes))
    }
}

impl fmt::Display for SettlementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stl:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
