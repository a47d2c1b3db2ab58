//! Constant variables.

/// Bits of the identifier space when none is configured.
pub const DEFAULT_ID_BITS: u8 = 32;
/// default stabilize interval in ms
pub const DEFAULT_STABILIZE_INTERVAL_MS: u64 = 1000;
/// default fix fingers interval in ms
pub const DEFAULT_FIX_FINGERS_INTERVAL_MS: u64 = 500;
/// Upper bound of a single remote call.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 3000;
