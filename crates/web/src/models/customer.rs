//! Customer domain types.
//!
//! [`Customer`] and [`CustomerInput`] are validated domain objects.
//! [`CustomerForm`] is raw form input; it only becomes a `CustomerInput`
//! through [`crate::validation::validate`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use cadastro_core::{CustomerId, Email, StateCode};

/// A persisted customer record (domain type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    /// Database ID.
    pub id: CustomerId,
    /// Full name.
    pub name: String,
    /// Email address, unique across customers.
    pub email: Email,
    /// Street address (street, number, complement).
    pub street: String,
    /// City name.
    pub city: String,
    /// Federative unit of the address.
    pub state: StateCode,
    /// Brazilian postal code, formatted `NNNNN-NNN`.
    pub zip_code: String,
    /// When the customer was created.
    pub created_at: DateTime<Utc>,
    /// When the customer was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A validated customer candidate, ready to be created or applied as an update.
///
/// `id` is `None` for a customer that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerInput {
    pub id: Option<CustomerId>,
    pub name: String,
    pub email: Email,
    pub street: String,
    pub city: String,
    pub state: StateCode,
    pub zip_code: String,
}

impl CustomerInput {
    /// Apply this input to an existing record, keeping its ID and creation time.
    #[must_use]
    pub fn apply_to(&self, existing: &Customer, updated_at: DateTime<Utc>) -> Customer {
        Customer {
            id: existing.id,
            name: self.name.clone(),
            email: self.email.clone(),
            street: self.street.clone(),
            city: self.city.clone(),
            state: self.state,
            zip_code: self.zip_code.clone(),
            created_at: existing.created_at,
            updated_at,
        }
    }
}

/// Unvalidated customer form, as posted by the browser.
///
/// Also used to pre-fill the form: blank for creation, from a [`Customer`]
/// for editing, or echoing rejected input back with errors attached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CustomerForm {
    /// Hidden field; empty for a customer that does not exist yet.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub id: Option<CustomerId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
}

impl From<&Customer> for CustomerForm {
    fn from(customer: &Customer) -> Self {
        Self {
            id: Some(customer.id),
            name: customer.name.clone(),
            email: customer.email.to_string(),
            street: customer.street.clone(),
            city: customer.city.clone(),
            state: customer.state.code().to_owned(),
            zip_code: customer.zip_code.clone(),
        }
    }
}

/// Treat an empty (or blank) form value as `None`.
fn empty_string_as_none<'de, D>(de: D) -> Result<Option<CustomerId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(de)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
