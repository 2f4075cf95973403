//! Receipts for the settlement audit trail.
//!
//! Two kinds exist:
//! - [`SignedTransfer`]: an off-channel payment as one party signed it,
//!   kept by the counterparty until the channel is settled.
//! - [`SettlementReceipt`]: proof that a settlement was applied on the ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ChannelSignature, SettlementId, TransferIntent};

/// One party's signature over a transfer intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransfer {
    pub intent: TransferIntent,
    pub signature: ChannelSignature,
}

impl SignedTransfer {
    #[must_use]
    pub fn new(intent: TransferIntent, signature: ChannelSignature) -> Self {
        Self { intent, signature }
    }

    /// Hash the signature was produced over, before prefixing.
    #[must_use]
    pub fn message_hash(&self) -> [u8; 32] {
        self.intent.message_hash()
    }
}

/// Record of an applied settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementReceipt {
    pub id: SettlementId,
    pub intent: TransferIntent,
    /// Canonical message hash both parties signed.
    pub message_hash: [u8; 32],
    pub settled_at: DateTime<Utc>,
}

impl SettlementReceipt {
    #[must_use]
    pub fn new(intent: TransferIntent) -> Self {
        let message_hash = intent.message_hash();
        Self {
            id: SettlementId::deterministic(&message_hash),
            intent,
            message_hash,
            settled_at: Utc::now(),
        }
    }
}
