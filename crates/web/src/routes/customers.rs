//! Customer route handlers.
//!
//! Each handler translates the HTTP request into a [`CustomerRequest`], runs
//! it through the [`CustomerHandler`](crate::handler::CustomerHandler), and
//! renders the resulting [`Outcome`].

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use cadastro_core::{CustomerId, StateCode};

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::handler::{CustomerRequest, FormView, Notice, Outcome};
use crate::middleware::{CustomerPath, flash};
use crate::models::{Customer, CustomerForm};
use crate::state::AppState;
use crate::validation::FieldErrors;

/// Path of the customer list; every mutation redirects here.
pub const LIST_PATH: &str = "/customers";

/// Customer view for templates.
#[derive(Debug, Clone)]
pub struct CustomerView {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Customer> for CustomerView {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id,
            name: customer.name.clone(),
            email: customer.email.to_string(),
            street: customer.street.clone(),
            city: customer.city.clone(),
            state: customer.state.code().to_owned(),
            zip_code: customer.zip_code.clone(),
            created_at: customer.created_at.format("%d/%m/%Y %H:%M").to_string(),
            updated_at: customer.updated_at.format("%d/%m/%Y %H:%M").to_string(),
        }
    }
}

/// Customer list page template.
#[derive(Template, WebTemplate)]
#[template(path = "customers/list.html")]
pub struct CustomerListTemplate {
    pub customers: Vec<CustomerView>,
    pub notice: Option<Notice>,
}

/// Create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "customers/form.html")]
pub struct CustomerFormTemplate {
    pub form: CustomerForm,
    pub errors: FieldErrors,
    pub states: &'static [StateCode],
    pub is_edit: bool,
}

impl From<FormView> for CustomerFormTemplate {
    fn from(view: FormView) -> Self {
        Self {
            is_edit: view.form.id.is_some(),
            form: view.form,
            errors: view.errors,
            states: view.states,
        }
    }
}

/// Customer detail template.
#[derive(Template, WebTemplate)]
#[template(path = "customers/detail.html")]
pub struct CustomerDetailTemplate {
    pub customer: CustomerView,
}

/// List all customers, showing any pending flash notice.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, session: Session) -> Result<Response> {
    let outcome = state.customers().dispatch(CustomerRequest::List).await?;
    let notice = flash::take(&session).await;
    Ok(render(outcome, notice, &session).await)
}

/// Blank creation form.
#[instrument(skip(state, session))]
pub async fn new_form(State(state): State<AppState>, session: Session) -> Result<Response> {
    let outcome = state.customers().dispatch(CustomerRequest::NewForm).await?;
    Ok(render(outcome, None, &session).await)
}

/// Create or update a customer from the submitted form.
///
/// # Errors
///
/// Returns 404 if the form targets a customer that no longer exists.
#[instrument(skip(state, session, form), fields(id = ?form.id))]
pub async fn save(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CustomerForm>,
) -> Result<Response> {
    let target = form
        .id
        .map_or_else(|| "new".to_string(), |id| id.to_string());
    add_breadcrumb("customer", "Save customer", &[("customer_id", &target)]);

    let outcome = state.customers().dispatch(CustomerRequest::Save(form)).await?;
    Ok(render(outcome, None, &session).await)
}

/// Show one customer.
///
/// # Errors
///
/// Returns 404 for an unknown ID and 400 for a malformed one.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    CustomerPath(id): CustomerPath,
) -> Result<Response> {
    let outcome = state
        .customers()
        .dispatch(CustomerRequest::Detail(id))
        .await?;
    Ok(render(outcome, None, &session).await)
}

/// Form pre-filled with an existing customer.
///
/// # Errors
///
/// Returns 404 for an unknown ID and 400 for a malformed one.
#[instrument(skip(state, session))]
pub async fn edit_form(
    State(state): State<AppState>,
    session: Session,
    CustomerPath(id): CustomerPath,
) -> Result<Response> {
    let outcome = state
        .customers()
        .dispatch(CustomerRequest::EditForm(id))
        .await?;
    Ok(render(outcome, None, &session).await)
}

/// Delete a customer and return to the list.
///
/// # Errors
///
/// Returns 404 for an unknown ID and 400 for a malformed one.
#[instrument(skip(state, session))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    CustomerPath(id): CustomerPath,
) -> Result<Response> {
    add_breadcrumb("customer", "Delete customer", &[("customer_id", &id.to_string())]);

    let outcome = state
        .customers()
        .dispatch(CustomerRequest::Delete(id))
        .await?;
    Ok(render(outcome, None, &session).await)
}

/// Turn a handler outcome into an HTTP response.
async fn render(outcome: Outcome, notice: Option<Notice>, session: &Session) -> Response {
    match outcome {
        Outcome::Listing(customers) => CustomerListTemplate {
            customers: customers.iter().map(CustomerView::from).collect(),
            notice,
        }
        .into_response(),
        Outcome::Form(view) => CustomerFormTemplate::from(view).into_response(),
        Outcome::Detail(customer) => CustomerDetailTemplate {
            customer: CustomerView::from(&customer),
        }
        .into_response(),
        Outcome::RedirectToList(notice) => {
            // The write is already applied; only the notice is lost.
            if let Err(e) = flash::push(session, &notice).await {
                tracing::warn!(error = %e, "Failed to store flash notice");
            }
            Redirect::to(LIST_PATH).into_response()
        }
    }
}
