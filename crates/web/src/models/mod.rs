//! Domain models for the customer registry.

pub mod customer;

pub use customer::{Customer, CustomerForm, CustomerInput};
