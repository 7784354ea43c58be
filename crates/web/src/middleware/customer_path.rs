//! Path extractor for customer IDs.

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use cadastro_core::CustomerId;

use crate::error::AppError;

/// Extractor for the `{id}` segment of customer routes.
///
/// Unlike a bare `Path<CustomerId>`, a malformed ID is rejected as
/// [`AppError::BadRequest`], so it goes through the same error rendering as
/// every other handler failure.
///
/// # Example
///
/// ```rust,ignore
/// async fn show(CustomerPath(id): CustomerPath) -> Result<Response> {
///     // id is a CustomerId
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CustomerPath(pub CustomerId);

impl<S> FromRequestParts<S> for CustomerPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<CustomerId>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                tracing::debug!(path = %parts.uri.path(), error = %e, "Rejected customer path");
                AppError::BadRequest(format!("invalid customer id: {}", e.body_text()))
            })?;
        Ok(Self(id))
    }
}
