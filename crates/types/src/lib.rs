//! # Folio Types
//!
//! Shared types for the portfolio API: entities, request/response DTOs, the
//! error taxonomy, the delimited list codec, and the [`Resource`] schema
//! trait the generic repository is built on.

#![deny(unsafe_code)]

pub mod delimited;
pub mod dto;
pub mod entities;
pub mod error;
pub mod resource;

pub use error::{Error, Result};
pub use resource::Resource;
