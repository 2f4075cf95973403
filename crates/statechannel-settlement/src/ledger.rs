//! Per-account token balances.
//!
//! All mutations are atomic: either the full operation succeeds or every
//! balance is unchanged. Balances never go negative and settlements never
//! change total supply.

use std::collections::HashMap;

use statechannel_types::{Address, ChannelError, Result};
use tracing::debug;

use crate::supply_conservation::SupplyTracker;

/// Balance table plus the supply it must add up to.
#[derive(Debug, Default)]
pub struct Ledger {
    balances: HashMap<Address, u128>,
    supply: SupplyTracker,
}

impl Ledger {
    /// Create a new empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` to `account` outside the settlement protocol.
    ///
    /// This is the administrator's initial-allocation path: no signatures,
    /// no nonces. It is the only way supply enters the ledger.
    ///
    /// # Errors
    /// [`ChannelError::BalanceOverflow`] if the balance or total supply
    /// would overflow. Nothing is recorded in that case.
    pub fn allocate(&mut self, account: Address, amount: u128) -> Result<()> {
        let current = self.balance_of(account);
        let credited = current.checked_add(amount).ok_or(ChannelError::BalanceOverflow)?;
        self.supply.record_allocation(amount)?;
        self.balances.insert(account, credited);
        debug!(account = %account, amount, "allocated");
        Ok(())
    }

    /// Current balance; unknown accounts hold zero.
    pub fn balance_of(&self, account: Address) -> u128 {
        self.balances.get(&account).copied().unwrap_or(0)
    }

    /// Move `amount` from `from` to `to` as one unit.
    ///
    /// `amount == 0` succeeds without touching anything.
    ///
    /// # Errors
    /// - [`ChannelError::InsufficientBalance`] if `balance_of(from) < amount`
    /// - [`ChannelError::BalanceOverflow`] if crediting `to` would overflow
    ///
    /// Both sides are unchanged on error.
    pub fn apply_transfer(&mut self, from: Address, to: Address, amount: u128) -> Result<()> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(ChannelError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        if amount == 0 || from == to {
            return Ok(());
        }

        // Compute both sides before writing either.
        let debited = available - amount;
        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(ChannelError::BalanceOverflow)?;

        self.balances.insert(from, debited);
        self.balances.insert(to, credited);
        Ok(())
    }

    /// Sum of all balances.
    pub fn total_supply(&self) -> u128 {
        self.balances.values().sum()
    }

    /// Check Σ balances against Σ allocations.
    pub fn verify_supply(&self) -> Result<()> {
        self.supply.verify(self.total_supply())
    }

    /// Number of accounts that have ever held a balance.
    pub fn account_count(&self) -> usize {
        self.balances.len()
    }

    /// Snapshot of all balances, sorted by account.
    pub fn snapshot(&self) -> Vec<(Address, u128)> {
        let mut entries: Vec<_> = self.balances.iter().map(|(a, b)| (*a, *b)).collect();
        entries.sort_unstable_by_key(|(a, _)| *a);
        entries
    }
}
