//! Supply conservation invariant checker.
//!
//! Invariant enforced after every settlement:
//! ```text
//! Σ balances == Σ allocations
//! ```
//!
//! Settlements only move value between accounts; only the administrator's
//! allocation path creates it. If the sums ever diverge, a settlement
//! created or destroyed tokens.

use statechannel_types::{ChannelError, Result};

/// Tracks how much supply the administrator has allocated.
#[derive(Debug, Default)]
pub struct SupplyTracker {
    allocated: u128,
}

impl SupplyTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an allocation.
    ///
    /// # Errors
    /// [`ChannelError::BalanceOverflow`] if total supply would overflow.
    pub fn record_allocation(&mut self, amount: u128) -> Result<()> {
        self.allocated = self
            .allocated
            .checked_add(amount)
            .ok_or(ChannelError::BalanceOverflow)?;
        Ok(())
    }

    /// Expected total supply: everything ever allocated.
    #[must_use]
    pub fn expected_supply(&self) -> u128 {
        self.allocated
    }

    /// Verify that the sum of all balances matches the allocated supply.
    ///
    /// # Errors
    /// Returns [`ChannelError::SupplyInvariantViolation`] if actual ≠ expected.
    pub fn verify(&self, actual_supply: u128) -> Result<()> {
        if actual_supply != self.allocated {
            return Err(ChannelError::SupplyInvariantViolation {
                reason: format!(
                    "actual supply {actual_supply} != allocated {}",
                    self.allocated
                ),
            });
        }
        Ok(())
    }
}
