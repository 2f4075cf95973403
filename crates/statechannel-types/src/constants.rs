//! System-wide constants for the settlement engine.

/// Width of an account address in bytes.
pub const ADDRESS_LENGTH: usize = 20;

/// Width of a packed `uint256` word in bytes.
pub const WORD_LENGTH: usize = 32;

/// Length of the canonical transfer message: two addresses and two words.
pub const CANONICAL_MESSAGE_LENGTH: usize = 2 * ADDRESS_LENGTH + 2 * WORD_LENGTH;

/// Length of a wire signature (`r || s || v`).
pub const SIGNATURE_LENGTH: usize = 65;

/// Offset between RPC-style `v` (27/28) and raw recovery ids (0/1).
pub const RPC_RECOVERY_OFFSET: u8 = 27;

/// Default personal-message tag. The verifier appends `":\n" || len`.
pub const DEFAULT_MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message";

/// Default token name.
pub const DEFAULT_TOKEN_NAME: &str = "Channel Token";

/// Default token symbol.
pub const DEFAULT_TOKEN_SYMBOL: &str = "CHT";

/// Default token decimals.
pub const DEFAULT_DECIMALS: u32 = 18;

/// Upper bound on token decimals (`rust_decimal` scale limit).
pub const MAX_DECIMALS: u32 = 28;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "StateChannel";
