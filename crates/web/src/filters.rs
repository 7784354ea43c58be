//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use cadastro_core::StateCode;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Full name of a state given its two-letter code.
///
/// Unknown codes are rendered unchanged.
///
/// Usage in templates: `{{ customer.state|state_name }}`
#[askama::filter_fn]
pub fn state_name(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(expand_state(&value.to_string()))
}

fn expand_state(code: &str) -> String {
    code.parse::<StateCode>()
        .map_or_else(|_| code.to_owned(), |state| format!("{} ({})", state.name(), state.code()))
}
