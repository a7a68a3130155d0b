//! # Folio Const
//!
//! Shared constants for authentication and business constraints.

#![deny(unsafe_code)]

pub mod auth;
pub mod limits;
