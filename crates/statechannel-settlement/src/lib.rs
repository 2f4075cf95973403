//! # statechannel-settlement
//!
//! **Settlement core**: turns one pair of signed transfer authorizations
//! into exactly one balance update on the ledger.
//!
//! ## Architecture
//!
//! The [`SettlementEngine`] receives a claimed transfer and two signatures and:
//! 1. Rebuilds the canonical message both parties signed
//! 2. Recovers the signer of each signature ([`SignatureVerifier`])
//! 3. Matches recovered signers against the claimed sender and recipient
//! 4. Checks the nonce has never been consumed ([`NonceRegistry`])
//! 5. Moves the balance and consumes the nonce as one unit ([`Ledger`])
//! 6. Checks supply conservation ([`SupplyTracker`])
//!
//! Steps 1-4 are read-only; any rejection leaves no trace.

pub mod engine;
pub mod ledger;
pub mod nonce_registry;
pub mod supply_conservation;
pub mod verifier;

pub use engine::SettlementEngine;
pub use ledger::Ledger;
pub use nonce_registry::NonceRegistry;
pub use supply_conservation::SupplyTracker;
pub use verifier::SignatureVerifier;
