#![deny(unsafe_code)]

//! # Folio Core
//!
//! Business logic for the portfolio API: repositories, ownership chains,
//! cascading deletes, authentication, and outbound email.
//!
//! ## Imports
//!
//! Import types from their source crates:
//! - Entity types: `folio_types::entities`
//! - DTOs: `folio_types::dto`
//! - Errors: `folio_types::Error`

pub mod auth;
pub mod cascade;
pub mod context;
pub mod email;
pub mod files;
pub mod id;
pub mod jwt;
pub mod logging;
pub mod mailer;
pub mod oauth;
pub mod otp;
pub mod ownership;
pub mod repository;

pub use auth::{hash_password, verify_password};
pub use context::RepositoryContext;
pub use email::{
    EmailSender, EmailService, EmailTemplate, MockEmailSender, PasswordResetEmailTemplate,
    SmtpEmailService,
};
pub use files::FileStore;
pub use id::IdGenerator;
pub use jwt::{Claims, TokenIssuer};
pub use mailer::{Mailer, OutboundEmail};
pub use oauth::{GoogleOAuth, GoogleUserInfo, OAuthStateStore};
pub use otp::OtpStore;
pub use ownership::Owned;
pub use repository::{ResourceRepository, RevocationRepository};
