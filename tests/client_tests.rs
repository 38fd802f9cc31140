// tests/client_tests.rs

mod common;

use common::{authenticated_status, spawn_mock_backend, test_config, test_context, Scripted};
use serde_json::json;
use study_compass::client::ApiClient;
use study_compass::error::AppError;
use study_compass::models::questionnaire::FormAnswers;
use study_compass::models::session::SessionStatus;
use study_compass::storage::{CredentialCache, LocalStore};
use std::sync::Arc;

#[tokio::test]
async fn attaches_bearer_credential_when_cached() {
    // Arrange
    let mock = spawn_mock_backend().await;
    let ctx = test_context(&mock);
    ctx.credentials.set("tok-123".to_string());

    // Act
    ctx.client.get_pricing().await.expect("pricing should succeed");

    // Assert
    let auth = mock.state.last_authorization.lock().unwrap().clone();
    assert_eq!(auth.as_deref(), Some("Bearer tok-123"));
}

#[tokio::test]
async fn sends_no_authorization_without_credential() {
    let mock = spawn_mock_backend().await;
    let ctx = test_context(&mock);

    ctx.client.get_pricing().await.expect("pricing should succeed");

    assert!(mock.state.last_authorization.lock().unwrap().is_none());
}

#[tokio::test]
async fn maps_400_to_validation_with_embedded_message() {
    let mock = spawn_mock_backend().await;
    let ctx = test_context(&mock);
    *mock.state.pricing.lock().unwrap() = Scripted::error(400, "budget must be positive");

    let err = ctx.client.get_pricing().await.unwrap_err();

    assert_eq!(err, AppError::Validation("budget must be positive".to_string()));
}

#[tokio::test]
async fn clears_credential_on_401() {
    let mock = spawn_mock_backend().await;
    let ctx = test_context(&mock);
    ctx.credentials.set("stale-token".to_string());
    *mock.state.pricing.lock().unwrap() = Scripted::error(401, "token expired");

    let err = ctx.client.get_pricing().await.unwrap_err();

    assert_eq!(err, AppError::AuthRequired);
    assert!(ctx.credentials.token().is_none());
    // The clear is durable, not just in-memory.
    assert!(ctx.local.snapshot().bearer_token.is_none());
}

#[tokio::test]
async fn maps_402_by_error_code() {
    let mock = spawn_mock_backend().await;
    let ctx = test_context(&mock);
    let answers = FormAnswers::new();

    *mock.state.access.lock().unwrap() = Scripted::error(402, "Ad viewing required");
    let err = ctx.client.check_access(None, &answers).await.unwrap_err();
    assert_eq!(err, AppError::AdRequired);

    *mock.state.access.lock().unwrap() = Scripted::error(402, "Insufficient credits");
    let err = ctx.client.check_access(None, &answers).await.unwrap_err();
    assert_eq!(err, AppError::InsufficientCredits);

    // Unknown 402 codes are not silently classified.
    *mock.state.access.lock().unwrap() = Scripted::error(402, "Trial expired");
    let err = ctx.client.check_access(None, &answers).await.unwrap_err();
    assert_eq!(err, AppError::Unexpected("Trial expired".to_string()));
}

#[tokio::test]
async fn maps_404_and_unknown_statuses() {
    let mock = spawn_mock_backend().await;
    let ctx = test_context(&mock);

    *mock.state.pricing.lock().unwrap() = Scripted::error(404, "gone");
    assert_eq!(ctx.client.get_pricing().await.unwrap_err(), AppError::NotFound);

    *mock.state.pricing.lock().unwrap() = Scripted::error(500, "database exploded");
    assert_eq!(
        ctx.client.get_pricing().await.unwrap_err(),
        AppError::Unexpected("database exploded".to_string())
    );
}

#[tokio::test]
async fn connection_failure_is_a_network_error() {
    // Reserve a port, then close it so nothing is listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let config = test_config(&address);
    let local = Arc::new(LocalStore::open(&config.state_dir).unwrap());
    let credentials = Arc::new(CredentialCache::new(local));
    let client = ApiClient::new(&config, credentials);

    match client.get_pricing().await {
        Err(AppError::Network(_)) => {}
        other => panic!("expected a network error, got {:?}", other),
    }
}

#[tokio::test]
async fn decodes_guest_and_authenticated_statuses() {
    let mock = spawn_mock_backend().await;
    let ctx = test_context(&mock);

    let status = ctx.client.get_user_status(Some("guest-token-1")).await.unwrap();
    assert_eq!(
        status,
        SessionStatus::Guest {
            free_attempts_remaining: 1,
            guest_token: Some("guest-token-1".to_string()),
        }
    );

    *mock.state.user_status.lock().unwrap() =
        Scripted::ok(authenticated_status("ada@example.com", 3));
    let status = ctx.client.get_user_status(None).await.unwrap();
    assert_eq!(
        status,
        SessionStatus::Authenticated {
            email: Some("ada@example.com".to_string()),
            credits: 3,
        }
    );
}

#[tokio::test]
async fn decodes_access_decisions() {
    let mock = spawn_mock_backend().await;
    let ctx = test_context(&mock);
    let answers = FormAnswers::new();

    use study_compass::models::access::AccessDecision;

    let decision = ctx.client.check_access(None, &answers).await.unwrap();
    assert_eq!(decision, AccessDecision::Granted);

    *mock.state.access.lock().unwrap() = Scripted::ok(json!({ "access": "ad_required" }));
    let decision = ctx.client.check_access(None, &answers).await.unwrap();
    assert_eq!(decision, AccessDecision::AdRequired);

    *mock.state.access.lock().unwrap() =
        Scripted::ok(json!({ "access": "denied", "reason": "out of credits" }));
    let decision = ctx.client.check_access(None, &answers).await.unwrap();
    assert_eq!(
        decision,
        AccessDecision::Denied(Some("out of credits".to_string()))
    );
}
