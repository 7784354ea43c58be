//! Customer request handler.
//!
//! Transport-independent core of the application: one [`CustomerRequest`]
//! variant per operation, dispatched to the gateway, the listing cache and
//! the validation rule, producing an [`Outcome`] for the HTTP layer to render.
//!
//! # Mutating requests
//!
//! ```text
//! Received -> Validated -> Rejected (form re-rendered with errors)
//!                       -> Applied -> CacheInvalidated -> Redirected
//! ```
//!
//! A missing customer ends any request with [`HandlerError::NotFound`] before
//! anything is mutated or invalidated. Email conflicts are recovered here and
//! turned into a form error. Every other gateway failure is returned as
//! [`HandlerError::Persistence`].

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument, warn};

use cadastro_core::{CustomerId, StateCode};

use crate::cache::{CustomerList, ListingCache};
use crate::db::{CustomerGateway, RepositoryError};
use crate::models::{Customer, CustomerForm, CustomerInput};
use crate::validation::{self, ErrorCode, Field, FieldErrors};

/// Errors that abort a request.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// No customer with this ID.
    #[error("customer {0} not found")]
    NotFound(CustomerId),

    /// Storage failed; fatal for the request.
    #[error(transparent)]
    Persistence(#[from] RepositoryError),
}

/// A request to the customer registry.
#[derive(Debug, Clone)]
pub enum CustomerRequest {
    List,
    NewForm,
    EditForm(CustomerId),
    Save(CustomerForm),
    Detail(CustomerId),
    Delete(CustomerId),
}

/// The customer form to render, with any rejected fields.
#[derive(Debug, Clone)]
pub struct FormView {
    pub form: CustomerForm,
    pub errors: FieldErrors,
    pub states: &'static [StateCode],
}

impl FormView {
    fn new(form: CustomerForm, errors: FieldErrors) -> Self {
        Self {
            form,
            errors,
            states: StateCode::ALL,
        }
    }
}

/// Severity of a flash notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
}

impl NoticeLevel {
    /// CSS modifier class for the notice banner.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "success",
        }
    }
}

/// One-shot message shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }
}

/// What the HTTP layer should do next.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Render the customer list.
    Listing(CustomerList),
    /// Render the create/edit form (blank, pre-filled, or rejected).
    Form(FormView),
    /// Render one customer.
    Detail(Customer),
    /// Redirect to the list with a notice.
    RedirectToList(Notice),
}

/// Result of saving a form, before the HTTP outcome is chosen.
enum SaveResult {
    Rejected(FieldErrors),
    Created(Customer),
    Updated(Customer),
}

/// Dispatches customer requests.
pub struct CustomerHandler<'a> {
    gateway: &'a dyn CustomerGateway,
    cache: &'a ListingCache,
}

impl<'a> CustomerHandler<'a> {
    /// Create a handler over a gateway and the shared listing cache.
    #[must_use]
    pub const fn new(gateway: &'a dyn CustomerGateway, cache: &'a ListingCache) -> Self {
        Self { gateway, cache }
    }

    /// Handle one request.
    ///
    /// # Errors
    ///
    /// Returns `HandlerError::NotFound` when an ID does not resolve and
    /// `HandlerError::Persistence` when storage fails.
    pub async fn dispatch(&self, request: CustomerRequest) -> Result<Outcome, HandlerError> {
        match request {
            CustomerRequest::List => self.list().await.map(Outcome::Listing),
            CustomerRequest::NewForm => Ok(Outcome::Form(Self::new_form())),
            CustomerRequest::EditForm(id) => self.edit_form(id).await.map(Outcome::Form),
            CustomerRequest::Save(form) => self.save(form).await,
            CustomerRequest::Detail(id) => self.detail(id).await.map(Outcome::Detail),
            CustomerRequest::Delete(id) => self.delete(id).await.map(Outcome::RedirectToList),
        }
    }

    /// All customers, served from the listing cache when possible.
    ///
    /// # Errors
    ///
    /// Returns `HandlerError::Persistence` if the list has to be fetched and
    /// the fetch fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<CustomerList, HandlerError> {
        if let Some(customers) = self.cache.get().await {
            return Ok(customers);
        }

        let generation = self.cache.generation();
        let customers = Arc::new(self.gateway.list_all().await?);
        self.cache.store(generation, Arc::clone(&customers)).await;
        Ok(customers)
    }

    /// Blank creation form.
    #[must_use]
    pub fn new_form() -> FormView {
        FormView::new(CustomerForm::default(), FieldErrors::new())
    }

    /// Form pre-filled with an existing customer.
    ///
    /// # Errors
    ///
    /// Returns `HandlerError::NotFound` for an unknown ID.
    #[instrument(skip(self))]
    pub async fn edit_form(&self, id: CustomerId) -> Result<FormView, HandlerError> {
        let customer = self.require(id).await?;
        Ok(FormView::new(
            CustomerForm::from(&customer),
            FieldErrors::new(),
        ))
    }

    /// One customer.
    ///
    /// # Errors
    ///
    /// Returns `HandlerError::NotFound` for an unknown ID.
    #[instrument(skip(self))]
    pub async fn detail(&self, id: CustomerId) -> Result<Customer, HandlerError> {
        self.require(id).await
    }

    /// Create or update from a submitted form.
    ///
    /// # Errors
    ///
    /// Returns `HandlerError::NotFound` when updating a customer that no
    /// longer exists, `HandlerError::Persistence` when storage fails.
    #[instrument(skip(self, form), fields(id = ?form.id))]
    pub async fn save(&self, form: CustomerForm) -> Result<Outcome, HandlerError> {
        match self.apply(&form).await? {
            SaveResult::Rejected(errors) => Ok(Outcome::Form(FormView::new(form, errors))),
            SaveResult::Created(customer) => {
                self.cache.invalidate().await;
                info!(customer_id = %customer.id, "Customer created");
                Ok(Outcome::RedirectToList(Notice::success(
                    "Customer added successfully!",
                )))
            }
            SaveResult::Updated(customer) => {
                self.cache.invalidate().await;
                info!(customer_id = %customer.id, "Customer updated");
                Ok(Outcome::RedirectToList(Notice::success(
                    "Customer updated successfully!",
                )))
            }
        }
    }

    /// Delete a customer.
    ///
    /// # Errors
    ///
    /// Returns `HandlerError::NotFound` for an unknown ID; nothing is deleted
    /// and the cache is left alone.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: CustomerId) -> Result<Notice, HandlerError> {
        let customer = self.require(id).await?;
        self.gateway
            .delete(&customer)
            .await
            .map_err(|e| not_found_or(e, id))?;
        self.cache.invalidate().await;
        info!(customer_id = %id, "Customer deleted");
        Ok(Notice::success("Customer removed successfully!"))
    }

    /// Validate, then branch on the presence of an ID: exactly one gateway
    /// write (create or update) per accepted form.
    async fn apply(&self, form: &CustomerForm) -> Result<SaveResult, HandlerError> {
        let input: CustomerInput = match validation::validate(form) {
            Ok(input) => input,
            Err(errors) => return Ok(SaveResult::Rejected(errors)),
        };

        let written = match input.id {
            Some(id) => self
                .gateway
                .update(id, &input)
                .await
                .map(SaveResult::Updated)
                .map_err(|e| not_found_or(e, id)),
            None => self
                .gateway
                .create(&input)
                .await
                .map(SaveResult::Created)
                .map_err(HandlerError::from),
        };

        match written {
            Err(HandlerError::Persistence(RepositoryError::Conflict(reason))) => {
                warn!(%reason, email = %input.email, "Customer email already in use");
                let mut errors = FieldErrors::new();
                errors.reject(Field::Email, ErrorCode::Unique);
                Ok(SaveResult::Rejected(errors))
            }
            other => other,
        }
    }

    /// Look up a customer, turning absence into `NotFound`.
    async fn require(&self, id: CustomerId) -> Result<Customer, HandlerError> {
        self.gateway
            .find_by_id(id)
            .await?
            .ok_or(HandlerError::NotFound(id))
    }
}

/// A gateway `NotFound` for a known ID is the handler's `NotFound`.
fn not_found_or(error: RepositoryError, id: CustomerId) -> HandlerError {
    match error {
        RepositoryError::NotFound => HandlerError::NotFound(id),
        other => HandlerError::Persistence(other),
    }
}
