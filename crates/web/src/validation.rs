//! Field-level validation of customer forms.
//!
//! [`validate`] turns a raw [`CustomerForm`] into a typed [`CustomerInput`],
//! or returns every rejected field with an error code. Email uniqueness is not
//! checked here: the database enforces it, and the request handler reports a
//! conflict through the same [`FieldErrors`] type.

use core::fmt;

use cadastro_core::{Email, EmailError, StateCode};

use crate::models::{CustomerForm, CustomerInput};

const MAX_NAME_LENGTH: usize = 120;
const MAX_STREET_LENGTH: usize = 200;
const MAX_CITY_LENGTH: usize = 100;

/// A customer form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Street,
    City,
    State,
    ZipCode,
}

impl Field {
    /// Form field name, as used in the HTML `name` attribute.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Street => "street",
            Self::City => "city",
            Self::State => "state",
            Self::ZipCode => "zip_code",
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Street => "Street",
            Self::City => "City",
            Self::State => "State",
            Self::ZipCode => "Postal code",
        }
    }

    const fn max_length(self) -> usize {
        match self {
            Self::Name => MAX_NAME_LENGTH,
            Self::Email => Email::MAX_LENGTH,
            Self::Street => MAX_STREET_LENGTH,
            Self::City => MAX_CITY_LENGTH,
            Self::State => 2,
            Self::ZipCode => 9,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Required,
    Invalid,
    TooLong,
    /// Value already used by another customer.
    Unique,
}

impl ErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Invalid => "invalid",
            Self::TooLong => "too_long",
            Self::Unique => "unique",
        }
    }
}

/// A single rejected field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub code: ErrorCode,
}

impl FieldError {
    /// Stable message code, e.g. `customer.email.unique`.
    #[must_use]
    pub fn message_code(&self) -> String {
        format!("customer.{}.{}", self.field.as_str(), self.code.as_str())
    }

    /// Human-readable message shown next to the field.
    #[must_use]
    pub fn message(&self) -> String {
        let label = self.field.label();
        match (self.field, self.code) {
            (_, ErrorCode::Required) => format!("{label} is required."),
            (_, ErrorCode::TooLong) => format!(
                "{label} must be at most {} characters.",
                self.field.max_length()
            ),
            (Field::Email, ErrorCode::Unique) => {
                "A customer with this email already exists.".to_string()
            }
            (_, ErrorCode::Unique) => format!("{label} is already in use."),
            (Field::Email, ErrorCode::Invalid) => "Enter a valid email address.".to_string(),
            (Field::State, ErrorCode::Invalid) => "Select a valid state.".to_string(),
            (Field::ZipCode, ErrorCode::Invalid) => {
                "Postal code must look like 12345-678.".to_string()
            }
            (_, ErrorCode::Invalid) => format!("{label} is invalid."),
        }
    }
}

/// Set of rejected fields; at most one error per field (the first reported).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    /// Create an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Reject a field. Ignored if the field already has an error.
    pub fn reject(&mut self, field: Field, code: ErrorCode) {
        if self.get(field).is_none() {
            self.0.push(FieldError { field, code });
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Error attached to `field`, if any.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == field)
    }

    /// Error for a field looked up by its form name (for templates).
    #[must_use]
    pub fn error_for(&self, name: &str) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field.as_str() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }
}

/// Validate a customer form.
///
/// # Errors
///
/// Returns every rejected field when the form is not acceptable.
pub fn validate(form: &CustomerForm) -> Result<CustomerInput, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = required_text(&form.name, Field::Name, &mut errors);
    let street = required_text(&form.street, Field::Street, &mut errors);
    let city = required_text(&form.city, Field::City, &mut errors);

    let email = match Email::parse(&form.email) {
        Ok(email) => Some(email),
        Err(e) => {
            let code = match e {
                EmailError::Empty => ErrorCode::Required,
                EmailError::TooLong { .. } => ErrorCode::TooLong,
                _ => ErrorCode::Invalid,
            };
            errors.reject(Field::Email, code);
            None
        }
    };

    let state = if form.state.trim().is_empty() {
        errors.reject(Field::State, ErrorCode::Required);
        None
    } else if let Ok(state) = form.state.parse::<StateCode>() {
        Some(state)
    } else {
        errors.reject(Field::State, ErrorCode::Invalid);
        None
    };

    let zip_code = if form.zip_code.trim().is_empty() {
        errors.reject(Field::ZipCode, ErrorCode::Required);
        None
    } else if let Some(zip) = normalize_zip_code(&form.zip_code) {
        Some(zip)
    } else {
        errors.reject(Field::ZipCode, ErrorCode::Invalid);
        None
    };

    match (name, email, street, city, state, zip_code) {
        (Some(name), Some(email), Some(street), Some(city), Some(state), Some(zip_code))
            if errors.is_empty() =>
        {
            Ok(CustomerInput {
                id: form.id,
                name,
                email,
                street,
                city,
                state,
                zip_code,
            })
        }
        _ => Err(errors),
    }
}

/// Trimmed, non-empty text within the field's length limit.
fn required_text(value: &str, field: Field, errors: &mut FieldErrors) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.reject(field, ErrorCode::Required);
        return None;
    }
    if trimmed.chars().count() > field.max_length() {
        errors.reject(field, ErrorCode::TooLong);
        return None;
    }
    Some(trimmed.to_owned())
}

/// Accept `NNNNN-NNN` or eight digits; return `NNNNN-NNN`.
fn normalize_zip_code(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let digits: String = match raw.split_once('-') {
        Some((head, tail)) if head.len() == 5 && tail.len() == 3 => format!("{head}{tail}"),
        Some(_) => return None,
        None => raw.to_owned(),
    };
    if digits.len() != 8 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let (head, tail) = digits.split_at(5);
    Some(format!("{head}-{tail}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cadastro_core::CustomerId;

    use super::*;

    fn valid_form() -> CustomerForm {
        CustomerForm {
            id: None,
            name: "  Ana Souza ".to_string(),
            email: "Ana@Example.com".to_string(),
            street: "Rua das Flores, 10".to_string(),
            city: "Niterói".to_string(),
            state: "rj".to_string(),
            zip_code: "24020000".to_string(),
        }
    }

    #[test]
    fn test_valid_form_is_normalized() {
        let input = validate(&valid_form()).unwrap();
        assert_eq!(input.id, None);
        assert_eq!(input.name, "Ana Souza");
        assert_eq!(input.email.as_str(), "ana@example.com");
        assert_eq!(input.state, StateCode::RJ);
        assert_eq!(input.zip_code, "24020-000");
    }

    #[test]
    fn test_id_is_carried_through() {
        let form = CustomerForm {
            id: Some(CustomerId::new(5)),
            ..valid_form()
        };
        assert_eq!(validate(&form).unwrap().id, Some(CustomerId::new(5)));
    }

    #[test]
    fn test_blank_form_rejects_every_field() {
        let errors = validate(&CustomerForm::default()).unwrap_err();
        assert_eq!(errors.len(), 6);
        assert!(errors.iter().all(|e| e.code == ErrorCode::Required));
    }

    #[test]
    fn test_invalid_email_and_state() {
        let form = CustomerForm {
            email: "ana-at-example".to_string(),
            state: "XX".to_string(),
            ..valid_form()
        };
        let errors = validate(&form).unwrap_err();
        assert_eq!(errors.get(Field::Email).unwrap().code, ErrorCode::Invalid);
        assert_eq!(errors.get(Field::State).unwrap().code, ErrorCode::Invalid);
        assert!(errors.get(Field::Name).is_none());
    }

    #[test]
    fn test_name_too_long() {
        let form = CustomerForm {
            name: "a".repeat(MAX_NAME_LENGTH + 1),
            ..valid_form()
        };
        let errors = validate(&form).unwrap_err();
        assert_eq!(errors.get(Field::Name).unwrap().code, ErrorCode::TooLong);
        let error = errors.error_for("name").unwrap();
        assert_eq!(error.message(), "Name must be at most 120 characters.");
        assert_eq!(error.message_code(), "customer.name.too_long");
        assert!(errors.error_for("email").is_none());
    }

    #[test]
    fn test_zip_code_formats() {
        assert_eq!(normalize_zip_code("01310-100").unwrap(), "01310-100");
        assert_eq!(normalize_zip_code(" 01310100 ").unwrap(), "01310-100");
        assert!(normalize_zip_code("0131-0100").is_none());
        assert!(normalize_zip_code("1234567").is_none());
        assert!(normalize_zip_code("abcde-fgh").is_none());
    }

    #[test]
    fn test_reject_keeps_first_error_per_field() {
        let mut errors = FieldErrors::new();
        errors.reject(Field::Email, ErrorCode::Invalid);
        errors.reject(Field::Email, ErrorCode::Unique);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(Field::Email).unwrap().code, ErrorCode::Invalid);
    }

    #[test]
    fn test_unique_email_message_and_code() {
        let error = FieldError {
            field: Field::Email,
            code: ErrorCode::Unique,
        };
        assert_eq!(error.message_code(), "customer.email.unique");
        assert_eq!(error.message(), "A customer with this email already exists.");
    }
}
