//! Cadastro web library.
//!
//! Customer registry served as server-rendered HTML. Exposed as a library so
//! the request handler and the router can be tested against in-memory stores.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod handler;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod validation;
