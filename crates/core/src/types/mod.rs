//! Core types for Cadastro.
//!
//! This module provides type-safe wrappers for the customer domain.

pub mod email;
pub mod id;
pub mod state_code;

pub use email::{Email, EmailError};
pub use id::CustomerId;
pub use state_code::{StateCode, UnknownStateCode};
