//! HTTP tests for the customer routes.
//!
//! Requests go through the full router (sessions included) via `oneshot`.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::http::StatusCode;

use cadastro_integration_tests::{TestApp, customer_form, form_fields};
use cadastro_web::models::CustomerForm;

#[tokio::test]
async fn test_root_redirects_to_list() {
    let app = TestApp::new();
    let resp = app.get("/", None).await;

    assert!(resp.status.is_redirection());
    assert_eq!(resp.location.as_deref(), Some("/customers"));
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new();
    assert_eq!(app.get("/health", None).await.status, StatusCode::OK);
    assert_eq!(app.get("/health/ready", None).await.status, StatusCode::OK);

    app.gateway.set_unavailable(true);
    assert_eq!(
        app.get("/health/ready", None).await.status,
        StatusCode::SERVICE_UNAVAILABLE
    );
    assert_eq!(app.get("/health", None).await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_empty_list_page() {
    let app = TestApp::new();
    let resp = app.get("/customers", None).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("No customers registered yet."));
}

#[tokio::test]
async fn test_create_redirects_with_flash_notice_shown_once() {
    let app = TestApp::new();

    let resp = app
        .post_form("/customers", &form_fields(&customer_form("Ana Souza", "ana@example.com")))
        .await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location.as_deref(), Some("/customers"));
    let cookie = resp.cookie.expect("flash notice should start a session");

    let list = app.get("/customers", Some(&cookie)).await;
    assert_eq!(list.status, StatusCode::OK);
    assert!(list.body.contains("Customer added successfully!"));
    assert!(list.body.contains("Ana Souza"));
    assert!(list.body.contains("ana@example.com"));

    let again = app.get("/customers", Some(&cookie)).await;
    assert!(!again.body.contains("Customer added successfully!"));
    assert!(again.body.contains("Ana Souza"));
}

#[tokio::test]
async fn test_new_form_lists_states() {
    let app = TestApp::new();
    let resp = app.get("/customers/new", None).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("New customer"));
    assert!(resp.body.contains(r#"<option value="AC""#));
    assert!(resp.body.contains(r#"<option value="TO""#));
    assert!(!resp.body.contains(r#"name="id""#));
}

#[tokio::test]
async fn test_invalid_submission_rerenders_form_with_errors() {
    let app = TestApp::new();
    let form = CustomerForm {
        state: "XX".to_string(),
        ..customer_form("Ana", "ana-at-example")
    };

    let resp = app.post_form("/customers", &form_fields(&form)).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Enter a valid email address."));
    assert!(resp.body.contains("Select a valid state."));
    assert!(resp.body.contains(r#"data-error-code="customer.email.invalid""#));
    assert!(resp.body.contains(r#"data-error-code="customer.state.invalid""#));
    assert!(!resp.body.contains(r#"data-error-code="customer.name"#));
    assert!(resp.body.contains(r#"value="ana-at-example""#));
    assert!(resp.cookie.is_none());
    assert!(app.gateway.snapshot().is_empty());
}

#[tokio::test]
async fn test_duplicate_email_rerenders_form() {
    let app = TestApp::new();
    app.gateway.insert(&customer_form("Ana", "ana@example.com"));

    let resp = app
        .post_form("/customers", &form_fields(&customer_form("Outra Ana", "ANA@example.com")))
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("A customer with this email already exists."));
    assert!(resp.body.contains(r#"data-error-code="customer.email.unique""#));
    assert_eq!(app.gateway.snapshot().len(), 1);
}

#[tokio::test]
async fn test_edit_form_and_update() {
    let app = TestApp::new();
    let ana = app.gateway.insert(&customer_form("Ana", "ana@example.com"));

    let edit = app.get(&format!("/customers/{}/edit", ana.id), None).await;
    assert_eq!(edit.status, StatusCode::OK);
    assert!(edit.body.contains("Edit customer"));
    assert!(edit.body.contains(&format!(r#"name="id" value="{}""#, ana.id)));
    assert!(edit.body.contains(r#"<option value="RJ" selected>"#));

    let form = CustomerForm {
        id: Some(ana.id),
        ..customer_form("Ana Souza", "ana@example.com")
    };
    let resp = app.post_form("/customers", &form_fields(&form)).await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);

    let list = app.get("/customers", resp.cookie.as_deref()).await;
    assert!(list.body.contains("Customer updated successfully!"));
    assert!(list.body.contains("Ana Souza"));
}

#[tokio::test]
async fn test_detail_page() {
    let app = TestApp::new();
    let ana = app.gateway.insert(&customer_form("Ana", "ana@example.com"));

    let resp = app.get(&format!("/customers/{}", ana.id), None).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("ana@example.com"));
    assert!(resp.body.contains("Rio de Janeiro (RJ)"));
    assert!(resp.body.contains("22240-003"));
}

#[tokio::test]
async fn test_delete_redirects_and_removes() {
    let app = TestApp::new();
    let ana = app.gateway.insert(&customer_form("Ana", "ana@example.com"));

    let resp = app
        .post_form::<&str, &str>(&format!("/customers/{}/delete", ana.id), &[])
        .await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location.as_deref(), Some("/customers"));

    let list = app.get("/customers", resp.cookie.as_deref()).await;
    assert!(list.body.contains("Customer removed successfully!"));
    assert!(app.gateway.snapshot().is_empty());
}

#[tokio::test]
async fn test_unknown_id_renders_not_found_page() {
    let app = TestApp::new();

    for uri in ["/customers/999", "/customers/999/edit"] {
        let resp = app.get(uri, None).await;
        assert_eq!(resp.status, StatusCode::NOT_FOUND, "{uri}");
        assert!(resp.body.contains("customer 999"));
    }

    let resp = app
        .post_form::<&str, &str>("/customers/999/delete", &[])
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(app.gateway.calls.delete(), 0);
}

#[tokio::test]
async fn test_malformed_id_is_bad_request() {
    let app = TestApp::new();

    for uri in ["/customers/abc", "/customers/12x/edit", "/customers/99999999999"] {
        let resp = app.get(uri, None).await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(resp.body.starts_with("Bad request: invalid customer id"), "{uri}");
    }

    let resp = app
        .post_form::<&str, &str>("/customers/abc/delete", &[])
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.gateway.calls.find_by_id(), 0);
    assert_eq!(app.gateway.calls.delete(), 0);
}

#[tokio::test]
async fn test_storage_outage_is_internal_error() {
    let app = TestApp::new();
    app.gateway.set_unavailable(true);

    let resp = app.get("/customers", None).await;

    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.body, "Internal server error");
}

#[tokio::test]
async fn test_list_is_cached_between_requests() {
    let app = TestApp::new();
    app.get("/customers", None).await;
    app.get("/customers", None).await;

    assert_eq!(app.gateway.calls.list_all(), 1);
    assert!(app.cache.get().await.is_some());
}
