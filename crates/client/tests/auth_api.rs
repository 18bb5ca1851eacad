//! Session handling: login, bearer headers, forced logout and the password
//! gate backed by the verify endpoint.

mod common;

use assert_matches::assert_matches;
use sitebook_client::services::auth::Credentials;
use sitebook_client::services::{AuthService, ProjectService};
use sitebook_client::{get_error_message, ApiError, SessionEvent};
use sitebook_core::error::CoreError;
use sitebook_core::password_gate::{PasswordGate, ProtectedAction};
use sitebook_core::roles::Role;

fn credentials(password: &str) -> Credentials {
    Credentials {
        email: "asha@example.com".to_string(),
        password: password.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Test: login stores the token, which is then sent on every request
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_signs_in_and_sends_bearer_token() {
    let backend = common::spawn().await;
    let client = backend.client(None);
    let auth = AuthService::new(client.clone());
    let mut events = client.session().subscribe();

    let user = auth.login(&credentials(common::PASSWORD)).await.unwrap();
    assert_eq!(user.role, Role::Manager);
    assert_eq!(client.session().token().as_deref(), Some(common::ISSUED_TOKEN));
    assert_eq!(
        events.recv().await.unwrap(),
        SessionEvent::LoggedIn {
            user_id: "user-1".to_string(),
            role: Role::Manager
        }
    );

    ProjectService::new(client).list().await.unwrap();
    let headers = backend.state().auth_headers.clone();
    assert_eq!(
        headers.last().cloned().flatten().as_deref(),
        Some("Bearer tok-issued")
    );
}

#[tokio::test]
async fn requests_without_token_carry_no_header() {
    let backend = common::spawn().await;
    ProjectService::new(backend.client(None)).list().await.unwrap();
    assert_eq!(backend.state().auth_headers, vec![None]);
}

#[tokio::test]
async fn wrong_credentials_do_not_count_as_expiry() {
    let backend = common::spawn().await;
    let client = backend.client(None);
    let auth = AuthService::new(client.clone());

    let err = auth.login(&credentials("nope")).await.unwrap_err();
    assert_matches!(err, ApiError::Status { status: 401, .. });
    assert_eq!(get_error_message(&err), "Invalid credentials");
    assert!(!client.session().is_authenticated());
}

// ---------------------------------------------------------------------------
// Test: a 401 on a JSON call forces logout; a 401 on a download does not
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unauthorized_json_call_forces_logout() {
    let backend = common::spawn().await;
    let client = backend.client(Some("expired"));
    let mut events = client.session().subscribe();

    let err = ProjectService::new(client.clone()).list().await.unwrap_err();

    assert_matches!(err, ApiError::SessionExpired);
    assert!(!client.session().is_authenticated());
    assert_eq!(events.recv().await.unwrap(), SessionEvent::Expired);
    assert_eq!(
        get_error_message(&err),
        "Your session has expired. Please log in again."
    );
}

#[tokio::test]
async fn unauthorized_download_keeps_session() {
    let backend = common::spawn().await;
    let client = backend.client(Some("expired"));

    let err = client.download("/reports/attendance").await.unwrap_err();

    assert_matches!(err, ApiError::Status { status: 401, .. });
    assert!(client.session().is_authenticated());
}

#[tokio::test]
async fn download_returns_file_and_name() {
    let backend = common::spawn().await;
    let client = backend.client(Some("tok"));

    let file = client.download("/reports/attendance").await.unwrap();

    assert_eq!(file.content_type.as_deref(), Some("text/csv"));
    assert_eq!(file.file_name.as_deref(), Some("attendance.csv"));
    assert!(String::from_utf8(file.bytes).unwrap().starts_with("name,days"));
}

// ---------------------------------------------------------------------------
// Test: password gate confirmed through the verify endpoint
// ---------------------------------------------------------------------------

#[tokio::test]
async fn password_gate_releases_only_after_verification() {
    let backend = common::spawn().await;
    let auth = AuthService::new(backend.client(Some("tok")));
    let mut gate = PasswordGate::new();
    let action = ProtectedAction::Delete {
        entity: "labourer",
        id: "lab-1".to_string(),
    };
    gate.request(action.clone());

    let err = gate.confirm("wrong", &auth).await.unwrap_err();
    assert_matches!(err, CoreError::Unauthorized(_));
    assert_eq!(gate.error(), Some("Incorrect password"));
    assert!(gate.is_open());

    let released = gate.confirm(common::PASSWORD, &auth).await.unwrap();
    assert_eq!(released, action);
    assert!(!gate.is_open());
}

#[tokio::test]
async fn rejected_verify_reads_as_wrong_password() {
    let backend = common::spawn().await;
    let client = backend.client(Some("tok"));
    let auth = AuthService::new(client.clone());

    assert!(!auth.check_password("locked").await.unwrap());
    assert!(client.session().is_authenticated());
}
