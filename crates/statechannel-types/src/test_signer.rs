//! Off-channel signing client for tests. **Never use in production.**
//!
//! Signs transfer intents the way a wallet does: canonical hash, then the
//! personal-message prefix, then a recoverable secp256k1 signature.

use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};

use crate::constants::DEFAULT_MESSAGE_PREFIX;
use crate::intent::personal_message_hash;
use crate::{Address, ChannelSignature, SignedTransfer, TransferIntent};

/// A channel participant's keypair.
#[derive(Debug, Clone)]
pub struct ChannelKey {
    secret: SecretKey,
    public: PublicKey,
}

impl ChannelKey {
    /// Deterministic key whose secret is `[seed; 32]`.
    ///
    /// # Panics
    /// Panics if `[seed; 32]` is not a valid secret key, which happens for
    /// `0` (zero scalar) and `0xff` (above the secp256k1 group order).
    pub fn from_seed(seed: u8) -> Self {
        let secret =
            SecretKey::from_slice(&[seed; 32]).expect("seed must give a scalar in 1..n");
        Self::from_secret(secret)
    }

    /// Fresh random key.
    pub fn random() -> Self {
        loop {
            if let Ok(secret) = SecretKey::from_slice(&rand::random::<[u8; 32]>()) {
                return Self::from_secret(secret);
            }
        }
    }

    fn from_secret(secret: SecretKey) -> Self {
        let secp = Secp256k1::new();
        let public = secret.public_key(&secp);
        Self { secret, public }
    }

    pub fn address(&self) -> Address {
        Address::from_public_key(&self.public)
    }

    /// Sign a raw 32-byte hash under `prefix`.
    pub fn sign_hash_with_prefix(&self, prefix: &str, hash: &[u8; 32]) -> ChannelSignature {
        let secp = Secp256k1::new();
        let digest = personal_message_hash(prefix, hash);
        let sig = secp.sign_ecdsa_recoverable(&Message::from_digest(digest), &self.secret);
        let (recovery_id, compact) = sig.serialize_compact();
        let recovery_id = u8::try_from(recovery_id.to_i32()).expect("recovery id is 0..=3");
        ChannelSignature::from_compact(&compact, recovery_id).expect("secp256k1 emits 0 or 1")
    }

    /// Sign an intent under the default prefix.
    pub fn sign(&self, intent: &TransferIntent) -> ChannelSignature {
        self.sign_hash_with_prefix(DEFAULT_MESSAGE_PREFIX, &intent.message_hash())
    }

    /// Sign an intent and keep it as a transfer receipt.
    pub fn sign_transfer(&self, intent: TransferIntent) -> SignedTransfer {
        SignedTransfer::new(intent, self.sign(&intent))
    }
}
