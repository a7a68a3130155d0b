//! Business constraint constants.

/// Minimum password length for user accounts.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum size of an uploaded file (profile image or resume) in bytes.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
