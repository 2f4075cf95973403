//! Consumed-nonce registry: the replay defense.
//!
//! Like a UTXO set in reverse: each [`NonceKey`] can be spent exactly once.
//! Consuming the same key a second time returns
//! [`ChannelError::AlreadyConsumed`].
//!
//! The registry is append-only for the lifetime of the ledger. There is no
//! eviction: forgetting a key would reopen it for replay.

use std::collections::HashSet;

use statechannel_types::{Address, ChannelError, NonceKey, NonceScope, Result};

/// Set of nonce keys already spent by a settlement.
#[derive(Debug, Default)]
pub struct NonceRegistry {
    scope: NonceScope,
    consumed: HashSet<NonceKey>,
}

impl NonceRegistry {
    /// Create an empty registry keyed according to `scope`.
    #[must_use]
    pub fn new(scope: NonceScope) -> Self {
        Self {
            scope,
            consumed: HashSet::new(),
        }
    }

    #[must_use]
    pub fn scope(&self) -> NonceScope {
        self.scope
    }

    /// The key a settlement by `sender` with `nonce` occupies.
    #[must_use]
    pub fn key_for(&self, sender: Address, nonce: u64) -> NonceKey {
        match self.scope {
            NonceScope::PerSender => NonceKey::PerSender { sender, nonce },
            NonceScope::Global => NonceKey::Global(nonce),
        }
    }

    /// Check whether a key has already been consumed.
    pub fn is_consumed(&self, key: &NonceKey) -> bool {
        self.consumed.contains(key)
    }

    /// Mark a key consumed.
    ///
    /// # Errors
    /// Returns [`ChannelError::AlreadyConsumed`] if `key` was consumed
    /// before. The registry is left unchanged.
    pub fn consume(&mut self, key: NonceKey) -> Result<()> {
        if !self.consumed.insert(key) {
            return Err(ChannelError::AlreadyConsumed(key));
        }
        Ok(())
    }

    /// Number of keys consumed so far.
    pub fn len(&self) -> usize {
        self.consumed.len()
    }

    /// Whether no key has been consumed yet.
    pub fn is_empty(&self) -> bool {
        self.consumed.is_empty()
    }
}
