//! HTTP middleware for the web application.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with `PostgreSQL` store)
//!
//! Flash notices ride on the session; see [`flash`]. Customer routes take
//! their ID through [`CustomerPath`].

pub mod customer_path;
pub mod flash;
pub mod session;

pub use customer_path::CustomerPath;
pub use session::create_session_layer;
