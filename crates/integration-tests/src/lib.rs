//! Integration test support for Cadastro.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cadastro-integration-tests
//! ```
//!
//! No database is needed: [`MemoryCustomerGateway`] stands in for
//! `PostgreSQL` behind the same `CustomerGateway` trait, and [`TestApp`] drives
//! the real router with in-memory sessions through `tower::ServiceExt::oneshot`.
//!
//! # Test Categories
//!
//! - `handler_contract` - Request handler semantics (cache, validation, not-found)
//! - `customer_routes` - HTTP status codes, redirects, flash notices, rendering

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use chrono::Utc;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, SessionManagerLayer};

use cadastro_core::{CustomerId, Email};
use cadastro_web::cache::ListingCache;
use cadastro_web::db::{CustomerGateway, RepositoryError};
use cadastro_web::models::{Customer, CustomerForm, CustomerInput};
use cadastro_web::routes;
use cadastro_web::state::AppState;

// =============================================================================
// In-memory gateway
// =============================================================================

/// Number of calls made to each gateway operation.
#[derive(Debug, Default)]
pub struct CallCounts {
    pub list_all: AtomicUsize,
    pub find_by_id: AtomicUsize,
    pub create: AtomicUsize,
    pub update: AtomicUsize,
    pub delete: AtomicUsize,
}

impl CallCounts {
    #[must_use]
    pub fn list_all(&self) -> usize {
        self.list_all.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn find_by_id(&self) -> usize {
        self.find_by_id.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn create(&self) -> usize {
        self.create.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn update(&self) -> usize {
        self.update.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn delete(&self) -> usize {
        self.delete.load(Ordering::SeqCst)
    }

    /// Total number of writes (create, update, delete).
    #[must_use]
    pub fn writes(&self) -> usize {
        self.create() + self.update() + self.delete()
    }
}

#[derive(Debug, Default)]
struct Store {
    last_id: i32,
    customers: BTreeMap<CustomerId, Customer>,
}

/// `CustomerGateway` backed by a `BTreeMap`, enforcing email uniqueness the
/// way the `customer_email_key` constraint does.
///
/// Every call is counted; [`set_unavailable`](Self::set_unavailable) makes
/// all calls fail like a dropped database connection.
#[derive(Debug, Default)]
pub struct MemoryCustomerGateway {
    store: Mutex<Store>,
    unavailable: AtomicBool,
    pub calls: CallCounts,
}

impl MemoryCustomerGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a storage outage.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Stored customers, bypassing the call counters.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Customer> {
        let mut customers: Vec<_> = self.lock().customers.values().cloned().collect();
        sort_for_listing(&mut customers);
        customers
    }

    /// Insert a valid customer directly, bypassing the call counters.
    pub fn insert(&self, form: &CustomerForm) -> Customer {
        let input = cadastro_web::validation::validate(form).expect("fixture should be valid");
        let mut store = self.lock();
        insert_into(&mut store, &input).expect("fixture email should be unique")
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_available(&self) -> Result<(), RepositoryError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

fn sort_for_listing(customers: &mut [Customer]) {
    customers.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
}

fn email_taken(store: &Store, email: &Email, except: Option<CustomerId>) -> bool {
    store
        .customers
        .values()
        .any(|c| &c.email == email && Some(c.id) != except)
}

fn insert_into(store: &mut Store, input: &CustomerInput) -> Result<Customer, RepositoryError> {
    if email_taken(store, &input.email, None) {
        return Err(RepositoryError::Conflict("email already exists".to_string()));
    }
    store.last_id += 1;
    let now = Utc::now();
    let customer = Customer {
        id: CustomerId::new(store.last_id),
        name: input.name.clone(),
        email: input.email.clone(),
        street: input.street.clone(),
        city: input.city.clone(),
        state: input.state,
        zip_code: input.zip_code.clone(),
        created_at: now,
        updated_at: now,
    };
    store.customers.insert(customer.id, customer.clone());
    Ok(customer)
}

#[async_trait]
impl CustomerGateway for MemoryCustomerGateway {
    async fn list_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        self.calls.list_all.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(self.snapshot())
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        self.calls.find_by_id.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(self.lock().customers.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Customer>, RepositoryError> {
        self.check_available()?;
        Ok(self
            .lock()
            .customers
            .values()
            .find(|c| &c.email == email)
            .cloned())
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        self.check_available()?;
        Ok(i64::try_from(self.lock().customers.len()).unwrap_or(i64::MAX))
    }

    async fn create(&self, input: &CustomerInput) -> Result<Customer, RepositoryError> {
        self.calls.create.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        insert_into(&mut self.lock(), input)
    }

    async fn update(
        &self,
        id: CustomerId,
        input: &CustomerInput,
    ) -> Result<Customer, RepositoryError> {
        self.calls.update.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        let mut store = self.lock();
        if email_taken(&store, &input.email, Some(id)) {
            return Err(RepositoryError::Conflict("email already exists".to_string()));
        }
        let existing = store.customers.get(&id).ok_or(RepositoryError::NotFound)?;
        let updated = input.apply_to(existing, Utc::now());
        store.customers.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, customer: &Customer) -> Result<(), RepositoryError> {
        self.calls.delete.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        self.lock()
            .customers
            .remove(&customer.id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// A valid customer form with the given name and email.
#[must_use]
pub fn customer_form(name: &str, email: &str) -> CustomerForm {
    CustomerForm {
        id: None,
        name: name.to_string(),
        email: email.to_string(),
        street: "Rua das Laranjeiras, 42".to_string(),
        city: "Rio de Janeiro".to_string(),
        state: "RJ".to_string(),
        zip_code: "22240-003".to_string(),
    }
}

// =============================================================================
// HTTP harness
// =============================================================================

/// The application router over an in-memory gateway and session store.
pub struct TestApp {
    pub gateway: Arc<MemoryCustomerGateway>,
    pub cache: ListingCache,
    router: Router,
}

/// A collected response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: axum::http::StatusCode,
    pub location: Option<String>,
    /// `name=value` of the session cookie, if one was set.
    pub cookie: Option<String>,
    pub body: String,
}

impl TestApp {
    #[must_use]
    pub fn new() -> Self {
        Self::with_gateway(Arc::new(MemoryCustomerGateway::new()))
    }

    #[must_use]
    pub fn with_gateway(gateway: Arc<MemoryCustomerGateway>) -> Self {
        let cache = ListingCache::default();
        let state = AppState::new(gateway.clone(), cache.clone());
        let router = routes::routes()
            .layer(SessionManagerLayer::new(MemoryStore::default()).with_secure(false))
            .with_state(state);
        Self {
            gateway,
            cache,
            router,
        }
    }

    /// Send a GET request, optionally carrying a session cookie.
    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        let mut request = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.send(request.body(Body::empty()).expect("valid request"))
            .await
    }

    /// Send a form POST.
    pub async fn post_form<K, V>(&self, uri: &str, fields: &[(K, V)]) -> TestResponse
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .expect("valid request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        collect(response).await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

async fn collect(response: Response<Body>) -> TestResponse {
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_owned);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    TestResponse {
        status,
        location,
        cookie,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    }
}

/// Form fields for a customer, as a browser would post them.
#[must_use]
pub fn form_fields(form: &CustomerForm) -> Vec<(&'static str, String)> {
    vec![
        ("id", form.id.map(|id| id.to_string()).unwrap_or_default()),
        ("name", form.name.clone()),
        ("email", form.email.clone()),
        ("street", form.street.clone()),
        ("city", form.city.clone()),
        ("state", form.state.clone()),
        ("zip_code", form.zip_code.clone()),
    ]
}
