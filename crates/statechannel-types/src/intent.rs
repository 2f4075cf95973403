//! Transfer intents and their canonical message.
//!
//! Both channel parties and the settlement engine derive the same 32-byte
//! hash from an intent. The layout is the packed ABI encoding of
//! `(address, address, uint256, uint256)`:
//!
//! ```text
//! sender[20] || recipient[20] || amount[32, big-endian] || nonce[32, big-endian]
//! ```
//!
//! hashed with keccak256. Changing any width, order or endianness here
//! invalidates every signature produced by existing wallets.

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

use crate::Address;
use crate::constants::{ADDRESS_LENGTH, CANONICAL_MESSAGE_LENGTH, WORD_LENGTH};

/// keccak256 digest of `data`.
#[must_use]
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// Hash actually signed by wallets: `keccak256(prefix || ":\n32" || hash)`.
///
/// `prefix` is the protocol tag, e.g.
/// [`DEFAULT_MESSAGE_PREFIX`](crate::constants::DEFAULT_MESSAGE_PREFIX).
#[must_use]
pub fn personal_message_hash(prefix: &str, hash: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(prefix.as_bytes());
    hasher.update(format!(":\n{}", hash.len()).as_bytes());
    hasher.update(hash);
    hasher.finalize().into()
}

/// An off-channel agreement to move `amount` from `sender` to `recipient`.
///
/// Two intents are equal iff all four fields are equal. Both signatures of a
/// settlement bind to exactly this tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransferIntent {
    pub sender: Address,
    pub recipient: Address,
    /// Smallest token units.
    pub amount: u128,
    pub nonce: u64,
}

impl TransferIntent {
    #[must_use]
    pub fn new(sender: Address, recipient: Address, amount: u128, nonce: u64) -> Self {
        Self {
            sender,
            recipient,
            amount,
            nonce,
        }
    }

    /// Fixed-layout encoding signed by both parties.
    #[must_use]
    pub fn canonical_bytes(&self) -> [u8; CANONICAL_MESSAGE_LENGTH] {
        let mut out = [0u8; CANONICAL_MESSAGE_LENGTH];
        let (sender, rest) = out.split_at_mut(ADDRESS_LENGTH);
        let (recipient, rest) = rest.split_at_mut(ADDRESS_LENGTH);
        let (amount, nonce) = rest.split_at_mut(WORD_LENGTH);

        sender.copy_from_slice(self.sender.as_bytes());
        recipient.copy_from_slice(self.recipient.as_bytes());
        // uint256 words: value right-aligned, left-padded with zeros.
        amount[WORD_LENGTH - 16..].copy_from_slice(&self.amount.to_be_bytes());
        nonce[WORD_LENGTH - 8..].copy_from_slice(&self.nonce.to_be_bytes());
        out
    }

    /// keccak256 of [`canonical_bytes`](Self::canonical_bytes).
    #[must_use]
    pub fn message_hash(&self) -> [u8; 32] {
        keccak256(&self.canonical_bytes())
    }

    /// The same intent with a different nonce.
    #[must_use]
    pub fn with_nonce(self, nonce: u64) -> Self {
        Self { nonce, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent() -> TransferIntent {
        TransferIntent::new(
            Address::from_bytes([0x11; 20]),
            Address::from_bytes([0x22; 20]),
            20_000,
            1,
        )
    }

    #[test]
    fn keccak_of_empty_input() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn personal_prefix_matches_manual_concat() {
        let hash = [7u8; 32];
        let mut manual = b"\x19Ethereum Signed Message:\n32".to_vec();
        manual.extend_from_slice(&hash);
        assert_eq!(
            personal_message_hash(crate::constants::DEFAULT_MESSAGE_PREFIX, &hash),
            keccak256(&manual)
        );
        assert_ne!(personal_message_hash("other tag", &hash), keccak256(&manual));
    }

    #[test]
    fn canonical_layout() {
        let bytes = intent().canonical_bytes();
        assert_eq!(bytes.len(), 104);
        assert_eq!(&bytes[..20], &[0x11; 20]);
        assert_eq!(&bytes[20..40], &[0x22; 20]);
        // amount = 20_000 = 0x4e20, right-aligned in its word
        assert!(bytes[40..70].iter().all(|b| *b == 0));
        assert_eq!(&bytes[70..72], &[0x4e, 0x20]);
        // nonce = 1
        assert!(bytes[72..103].iter().all(|b| *b == 0));
        assert_eq!(bytes[103], 1);
    }

    #[test]
    fn message_hash_deterministic() {
        assert_eq!(intent().message_hash(), intent().message_hash());
    }

    #[test]
    fn every_field_changes_the_hash() {
        let base = intent();
        let h = base.message_hash();
        let variants = [
            TransferIntent { sender: Address::from_bytes([0x33; 20]), ..base },
            TransferIntent { recipient: Address::from_bytes([0x33; 20]), ..base },
            TransferIntent { amount: base.amount + 1, ..base },
            base.with_nonce(2),
        ];
        for v in variants {
            assert_ne!(v.message_hash(), h, "{v:?} collided with base");
        }
    }

    #[test]
    fn swapping_parties_changes_the_hash() {
        let base = intent();
        let swapped = TransferIntent::new(base.recipient, base.sender, base.amount, base.nonce);
        assert_ne!(base.message_hash(), swapped.message_hash());
    }
}
