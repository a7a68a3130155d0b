use std::backtrace::Backtrace;

use snafu::Snafu;

/// Result type alias for portfolio operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the portfolio API
///
/// Every variant carries a backtrace; build instances through the
/// constructors below, e.g. `Error::validation("email is required")`.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Bad or incomplete server configuration
    #[snafu(display("Configuration error: {message}"))]
    Config { message: String, backtrace: Backtrace },

    /// Backend read or write failure
    #[snafu(display("Storage error: {message}"))]
    Storage { message: String, backtrace: Backtrace },

    /// Authentication errors (missing, expired, or revoked tokens)
    #[snafu(display("Authentication error: {message}"))]
    Auth { message: String, backtrace: Backtrace },

    /// Ownership errors (authenticated but not the owner)
    #[snafu(display("Forbidden: {message}"))]
    Forbidden { message: String, backtrace: Backtrace },

    /// Bad credentials (wrong password, unknown email, bad OTP)
    #[snafu(display("{message}"))]
    Credentials { message: String, backtrace: Backtrace },

    /// Input failed a validation rule
    #[snafu(display("Validation error: {message}"))]
    Validation { message: String, backtrace: Backtrace },

    /// Required fields missing or empty in a request body
    #[snafu(display("missing required fields: {}", fields.join(", ")))]
    MissingFields { fields: Vec<String>, backtrace: Backtrace },

    /// A patch named a field the entity does not declare writable
    #[snafu(display("unknown field: {field}"))]
    UnknownField { field: String, backtrace: Backtrace },

    /// Record or file absent
    #[snafu(display("Resource not found: {message}"))]
    NotFound { message: String, backtrace: Backtrace },

    /// Resource already exists (unique constraint)
    #[snafu(display("{message}"))]
    AlreadyExists { message: String, backtrace: Backtrace },

    /// Data constraint violated (referential integrity, delimiter misuse)
    #[snafu(display("Constraint violation: {message}"))]
    Constraint { message: String, backtrace: Backtrace },

    /// External service errors (OAuth provider, SMTP)
    #[snafu(display("External service error: {message}"))]
    External { message: String, backtrace: Backtrace },

    /// Bugs and other unexpected conditions
    #[snafu(display("Internal error: {message}"))]
    Internal { message: String, backtrace: Backtrace },
}

impl Error {
    // Constructors; backtraces are captured where the error is made

    pub fn config(message: impl Into<String>) -> Self {
        ConfigSnafu { message: message.into() }.build()
    }

    pub fn storage(message: impl Into<String>) -> Self {
        StorageSnafu { message: message.into() }.build()
    }

    pub fn auth(message: impl Into<String>) -> Self {
        AuthSnafu { message: message.into() }.build()
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ForbiddenSnafu { message: message.into() }.build()
    }

    pub fn credentials(message: impl Into<String>) -> Self {
        CredentialsSnafu { message: message.into() }.build()
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ValidationSnafu { message: message.into() }.build()
    }

    pub fn missing_fields(fields: Vec<String>) -> Self {
        MissingFieldsSnafu { fields }.build()
    }

    pub fn unknown_field(field: impl Into<String>) -> Self {
        UnknownFieldSnafu { field: field.into() }.build()
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        NotFoundSnafu { message: message.into() }.build()
    }

    pub fn already_exists(message: impl Into<String>) -> Self {
        AlreadyExistsSnafu { message: message.into() }.build()
    }

    pub fn constraint(message: impl Into<String>) -> Self {
        ConstraintSnafu { message: message.into() }.build()
    }

    pub fn external(message: impl Into<String>) -> Self {
        ExternalSnafu { message: message.into() }.build()
    }

    pub fn internal(message: impl Into<String>) -> Self {
        InternalSnafu { message: message.into() }.build()
    }

    /// HTTP status the API layer answers this error with
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Config { .. } => 500,
            Error::Storage { .. } => 500,
            Error::Auth { .. } => 401,
            Error::Forbidden { .. } => 403,
            Error::Credentials { .. } => 400,
            Error::Validation { .. } => 400,
            Error::MissingFields { .. } => 422,
            Error::UnknownField { .. } => 400,
            Error::NotFound { .. } => 404,
            Error::AlreadyExists { .. } => 400,
            Error::Constraint { .. } => 400,
            Error::External { .. } => 502,
            Error::Internal { .. } => 500,
        }
    }

    /// Stable machine-readable code
    pub fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "CONFIGURATION_ERROR",
            Error::Storage { .. } => "STORAGE_ERROR",
            Error::Auth { .. } => "AUTHENTICATION_ERROR",
            Error::Forbidden { .. } => "FORBIDDEN",
            Error::Credentials { .. } => "BAD_CREDENTIALS",
            Error::Validation { .. } => "VALIDATION_ERROR",
            Error::MissingFields { .. } => "MISSING_FIELDS",
            Error::UnknownField { .. } => "UNKNOWN_FIELD",
            Error::NotFound { .. } => "NOT_FOUND",
            Error::AlreadyExists { .. } => "ALREADY_EXISTS",
            Error::Constraint { .. } => "CONSTRAINT_VIOLATION",
            Error::External { .. } => "EXTERNAL_SERVICE_ERROR",
            Error::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}
