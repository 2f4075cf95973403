//! The settlement state machine.
//!
//! One call to [`SettlementEngine::settle`] walks:
//!
//! ```text
//! BUILD_MESSAGE → VERIFY_SENDER_SIG → VERIFY_RECIPIENT_SIG
//!   → CHECK_NONCE → APPLY → COMMIT → SETTLED
//! ```
//!
//! Everything up to and including CHECK_NONCE is read-only, so every
//! rejection leaves the ledger and registry exactly as they were. APPLY and
//! COMMIT run inside one critical section together with CHECK_NONCE: two
//! racing submissions of the same `(sender, nonce)` settle exactly once.
//!
//! Signatures are checked before the nonce. A caller who bumps the nonce
//! without re-signing gets a signature rejection, never a fresh settlement.

use parking_lot::Mutex;
use statechannel_types::{
    Address, ChannelError, ChannelSignature, EngineConfig, RejectionReason, Result,
    SettlementReceipt, TransferIntent, constants,
};
use tracing::{debug, error, info, warn};

use crate::ledger::Ledger;
use crate::nonce_registry::NonceRegistry;
use crate::verifier::SignatureVerifier;

/// Mutable state guarded by the engine lock.
#[derive(Debug)]
struct ChannelState {
    ledger: Ledger,
    registry: NonceRegistry,
    /// Append-only audit log of applied settlements.
    receipts: Vec<SettlementReceipt>,
}

/// Two-party settlement engine over one ledger.
///
/// Safe to share between threads (`Arc<SettlementEngine>`). Signer recovery
/// runs outside the lock; the nonce check, balance update and nonce
/// consumption run under it.
#[derive(Debug)]
pub struct SettlementEngine {
    config: EngineConfig,
    verifier: SignatureVerifier,
    state: Mutex<ChannelState>,
}

impl SettlementEngine {
    /// Create an engine with an empty ledger.
    ///
    /// # Errors
    /// [`ChannelError::Configuration`] if `config` does not validate.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let verifier = SignatureVerifier::new(config.message_prefix.clone());
        let registry = NonceRegistry::new(config.nonce_scope);
        info!(
            engine = constants::ENGINE_NAME,
            version = constants::VERSION,
            symbol = %config.token.symbol,
            nonce_scope = ?config.nonce_scope,
            "settlement engine started"
        );
        Ok(Self {
            config,
            verifier,
            state: Mutex::new(ChannelState {
                ledger: Ledger::new(),
                registry,
                receipts: Vec::new(),
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn verifier(&self) -> &SignatureVerifier {
        &self.verifier
    }

    // -----------------------------------------------------------------
    // Administrator path
    // -----------------------------------------------------------------

    /// Initial allocation. Bypasses signatures and nonces entirely.
    pub fn allocate(&self, account: Address, amount: u128) -> Result<()> {
        self.state.lock().ledger.allocate(account, amount)?;
        info!(
            account = %account,
            amount,
            symbol = %self.config.token.symbol,
            "balance allocated"
        );
        Ok(())
    }

    // -----------------------------------------------------------------
    // Settlement
    // -----------------------------------------------------------------

    /// Settle `intent` given both parties' raw `r || s || v` signatures.
    ///
    /// # Errors
    /// Every error is a terminal rejection with no side effects;
    /// [`ChannelError::rejection`] gives the literal reason.
    pub fn settle(
        &self,
        intent: TransferIntent,
        sender_signature: &[u8],
        recipient_signature: &[u8],
    ) -> Result<SettlementReceipt> {
        let message_hash = intent.message_hash();
        self.run(intent, || {
            let sender_sig = ChannelSignature::from_bytes(sender_signature)?;
            self.check_sender(&intent, &message_hash, &sender_sig)?;
            let recipient_sig = ChannelSignature::from_bytes(recipient_signature)?;
            self.check_recipient(&intent, &message_hash, &recipient_sig)?;
            self.commit(intent)
        })
    }

    /// Settle `intent` given already-decoded signatures.
    pub fn settle_signed(
        &self,
        intent: TransferIntent,
        sender_signature: &ChannelSignature,
        recipient_signature: &ChannelSignature,
    ) -> Result<SettlementReceipt> {
        let message_hash = intent.message_hash();
        self.run(intent, || {
            self.check_sender(&intent, &message_hash, sender_signature)?;
            self.check_recipient(&intent, &message_hash, recipient_signature)?;
            self.commit(intent)
        })
    }

    /// Log the outcome of one settlement attempt.
    fn run(
        &self,
        intent: TransferIntent,
        attempt: impl FnOnce() -> Result<SettlementReceipt>,
    ) -> Result<SettlementReceipt> {
        debug!(
            sender = %intent.sender,
            recipient = %intent.recipient,
            amount = intent.amount,
            nonce = intent.nonce,
            "settlement submitted"
        );
        match attempt() {
            Ok(receipt) => {
                info!(
                    id = %receipt.id,
                    sender = %intent.sender,
                    recipient = %intent.recipient,
                    amount = intent.amount,
                    nonce = intent.nonce,
                    "settled"
                );
                Ok(receipt)
            }
            Err(err) => {
                let reason = err.rejection().map_or("internal", RejectionReason::as_str);
                warn!(
                    sender = %intent.sender,
                    nonce = intent.nonce,
                    reason,
                    error = %err,
                    "settlement rejected"
                );
                Err(err)
            }
        }
    }

    /// VERIFY_SENDER_SIG: recover, then match against the claimed sender.
    fn check_sender(
        &self,
        intent: &TransferIntent,
        message_hash: &[u8; 32],
        signature: &ChannelSignature,
    ) -> Result<()> {
        let recovered = self.verifier.recover_signer(message_hash, signature)?;
        if recovered != intent.sender {
            return Err(ChannelError::SenderSignatureMismatch {
                expected: intent.sender,
                recovered,
            });
        }
        debug!(sender = %intent.sender, "sender signature ok");
        Ok(())
    }

    /// VERIFY_RECIPIENT_SIG.
    fn check_recipient(
        &self,
        intent: &TransferIntent,
        message_hash: &[u8; 32],
        signature: &ChannelSignature,
    ) -> Result<()> {
        let recovered = self.verifier.recover_signer(message_hash, signature)?;
        if recovered != intent.recipient {
            return Err(ChannelError::RecipientSignatureMismatch {
                expected: intent.recipient,
                recovered,
            });
        }
        debug!(recipient = %intent.recipient, "recipient signature ok");
        Ok(())
    }

    /// CHECK_NONCE → APPLY → COMMIT, under the lock.
    fn commit(&self, intent: TransferIntent) -> Result<SettlementReceipt> {
        let mut state = self.state.lock();
        let ChannelState {
            ledger,
            registry,
            receipts,
        } = &mut *state;

        let key = registry.key_for(intent.sender, intent.nonce);
        if registry.is_consumed(&key) {
            return Err(ChannelError::AlreadyConsumed(key));
        }

        ledger.apply_transfer(intent.sender, intent.recipient, intent.amount)?;

        if let Err(err) = registry.consume(key) {
            // Unreachable while the lock is held; undo APPLY regardless.
            ledger
                .apply_transfer(intent.recipient, intent.sender, intent.amount)
                .map_err(|undo| {
                    ChannelError::Internal(format!("rollback of {key} failed: {undo}"))
                })?;
            return Err(err);
        }

        let receipt = SettlementReceipt::new(intent);
        receipts.push(receipt.clone());

        if self.config.verify_after_settle {
            if let Err(err) = ledger.verify_supply() {
                error!(
                    error = %err,
                    id = %receipt.id,
                    "supply invariant broken after settlement"
                );
            }
        }
        debug!(
            key = %key,
            message_hash = %hex::encode(receipt.message_hash),
            "nonce consumed"
        );
        Ok(receipt)
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    pub fn balance_of(&self, account: Address) -> u128 {
        self.state.lock().ledger.balance_of(account)
    }

    /// Whether `(sender, nonce)` has already been settled under this
    /// engine's nonce scope.
    pub fn is_settled(&self, sender: Address, nonce: u64) -> bool {
        let state = self.state.lock();
        let key = state.registry.key_for(sender, nonce);
        state.registry.is_consumed(&key)
    }

    pub fn total_supply(&self) -> u128 {
        self.state.lock().ledger.total_supply()
    }

    pub fn verify_supply(&self) -> Result<()> {
        self.state.lock().ledger.verify_supply()
    }

    /// Copy of the audit log, oldest first.
    pub fn receipts(&self) -> Vec<SettlementReceipt> {
        self.state.lock().receipts.clone()
    }

    /// Number of settlements applied.
    pub fn settled_count(&self) -> usize {
        self.state.lock().registry.len()
    }
}
