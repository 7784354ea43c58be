//! Cadastro Core - Shared domain types.
//!
//! This crate provides the types shared by every Cadastro component:
//! - `web` - Customer registry web application
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP. Database encodings are available behind the `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Customer identifiers, email addresses and state codes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
