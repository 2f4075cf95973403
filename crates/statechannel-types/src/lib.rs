//! # statechannel-types
//!
//! Shared types, errors, and configuration for the **StateChannel**
//! settlement engine.
//!
//! This crate is the leaf dependency of the workspace. It defines:
//!
//! - **Identifiers**: [`Address`], [`NonceKey`], [`SettlementId`]
//! - **Transfer model**: [`TransferIntent`] and its canonical message hash
//! - **Signatures**: [`ChannelSignature`] wire decoding
//! - **Receipts**: [`SignedTransfer`], [`SettlementReceipt`]
//! - **Configuration**: [`EngineConfig`], [`TokenMetadata`], [`NonceScope`]
//! - **Errors**: [`ChannelError`] with `CH_ERR_` prefix codes and the literal
//!   [`RejectionReason`]s callers match on
//! - **Constants**: encoding widths and defaults

pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod intent;
pub mod receipt;
pub mod signature;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_signer;

// Re-export all primary types at crate root for ergonomic imports:
//   use statechannel_types::{Address, TransferIntent, ChannelSignature, ...};

pub use config::*;
pub use error::*;
pub use ids::*;
pub use intent::{TransferIntent, keccak256, personal_message_hash};
pub use receipt::*;
pub use signature::*;

#[cfg(any(test, feature = "test-helpers"))]
pub use test_signer::ChannelKey;

// Constants are accessed via `statechannel_types::constants::FOO`
// (not re-exported to avoid name collisions).
