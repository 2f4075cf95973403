//! Configuration types for a settlement engine instance.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ChannelError, Result, constants};

/// How consumed nonces are keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonceScope {
    /// Each sender has a private nonce space: key is `(sender, nonce)`.
    #[default]
    PerSender,
    /// One transaction-id space for the whole ledger: key is the nonce alone.
    Global,
}

/// Token the ledger denominates balances in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    /// Balances are stored in units of `10^-decimals` tokens.
    pub decimals: u32,
}

impl TokenMetadata {
    #[must_use]
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, decimals: u32) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals,
        }
    }

    /// Render a smallest-unit amount as whole tokens (e.g. `20000` with
    /// 2 decimals is `200.00`).
    ///
    /// # Errors
    /// [`ChannelError::BalanceOverflow`] if the amount exceeds what
    /// `Decimal` can represent.
    pub fn to_display_units(&self, amount: u128) -> Result<Decimal> {
        let signed = i128::try_from(amount).map_err(|_| ChannelError::BalanceOverflow)?;
        Decimal::try_from_i128_with_scale(signed, self.decimals)
            .map_err(|_| ChannelError::BalanceOverflow)
    }

    /// Scale whole tokens up to smallest units.
    ///
    /// # Errors
    /// [`ChannelError::BalanceOverflow`] on overflow.
    pub fn from_display_units(&self, whole: u64) -> Result<u128> {
        10u128
            .checked_pow(self.decimals)
            .and_then(|unit| unit.checked_mul(u128::from(whole)))
            .ok_or(ChannelError::BalanceOverflow)
    }
}

impl Default for TokenMetadata {
    fn default() -> Self {
        Self::new(
            constants::DEFAULT_TOKEN_NAME,
            constants::DEFAULT_TOKEN_SYMBOL,
            constants::DEFAULT_DECIMALS,
        )
    }
}

/// Configuration for one settlement engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub token: TokenMetadata,
    pub nonce_scope: NonceScope,
    /// Personal-message tag prepended before signer recovery.
    pub message_prefix: String,
    /// Re-check supply conservation after each settlement.
    pub verify_after_settle: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            token: TokenMetadata::default(),
            nonce_scope: NonceScope::default(),
            message_prefix: constants::DEFAULT_MESSAGE_PREFIX.to_string(),
            verify_after_settle: true,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.token.name.trim().is_empty() {
            return Err(ChannelError::Configuration("token name is empty".into()));
        }
        if self.token.symbol.trim().is_empty() {
            return Err(ChannelError::Configuration("token symbol is empty".into()));
        }
        if self.token.decimals > constants::MAX_DECIMALS {
            return Err(ChannelError::Configuration(format!(
                "token decimals {} exceeds maximum {}",
                self.token.decimals,
                constants::MAX_DECIMALS
            )));
        }
        if self.message_prefix.is_empty() {
            return Err(ChannelError::Configuration("message prefix is empty".into()));
        }
        Ok(())
    }
}
