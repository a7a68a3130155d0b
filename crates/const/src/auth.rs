//! Authentication constants.

/// Session cookie name carrying the access token for browser clients.
///
/// Must be consistent across the login handlers that set it and the
/// session middleware that reads it.
pub const SESSION_COOKIE_NAME: &str = "folio_token";

/// Default access token lifetime in days.
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 15;

/// Lifetime of a password reset code in seconds.
pub const OTP_TTL_SECONDS: u64 = 300;

/// Smallest six-digit reset code.
pub const OTP_MIN: u32 = 100_000;

/// Largest six-digit reset code.
pub const OTP_MAX: u32 = 999_999;

/// Lifetime of an OAuth state nonce in seconds.
///
/// Covers the round trip to Google's consent screen and back.
pub const OAUTH_STATE_TTL_SECONDS: u64 = 600;

/// Random bytes in a token's `jti` claim (hex-encoded on the wire).
pub const JTI_BYTES: usize = 16;
