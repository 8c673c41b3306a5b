//! Credential-expiry behaviour: 401 mapping, invalidation, validation probe

use chrono::{TimeZone, Utc};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use praxis_core::ports::calendar_provider::{ICalendarProvider, ProviderError};
use praxis_core::ports::credentials::ICredentialProvider;

use crate::common::{mount_listing, setup_provider};

#[tokio::test]
async fn rejected_token_maps_to_auth_expired_and_invalidates() {
    let (server, provider, credentials) = setup_provider().await;

    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let min = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
    let err = provider
        .list_events(min, min + chrono::Duration::days(30))
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::AuthExpired));
    // The stored credential was cleared so the caller re-prompts connection
    assert!(credentials.access_token().await.unwrap().is_none());
}

#[tokio::test]
async fn validate_credential_accepts_live_token() {
    let (server, provider, credentials) = setup_provider().await;

    Mock::given(method("GET"))
        .and(path("/events"))
        .and(query_param("maxResults", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"items": []})))
        .mount(&server)
        .await;

    assert!(provider.validate_credential().await.unwrap());
    assert!(credentials.access_token().await.unwrap().is_some());
}

#[tokio::test]
async fn validate_credential_clears_dead_token() {
    let (server, provider, credentials) = setup_provider().await;

    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    assert!(!provider.validate_credential().await.unwrap());
    assert!(credentials.access_token().await.unwrap().is_none());
}

#[tokio::test]
async fn missing_token_reports_invalid_without_network_call() {
    let (server, provider, credentials) = setup_provider().await;
    credentials.invalidate().await.unwrap();

    // No mock mounted: a request would fail the test with a wiremock 404
    mount_listing(&server, serde_json::json!([])).await;

    assert!(!provider.validate_credential().await.unwrap());
}

#[tokio::test]
async fn missing_token_surfaces_auth_expired_on_operations() {
    let (_server, provider, credentials) = setup_provider().await;
    credentials.invalidate().await.unwrap();

    let min = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
    let err = provider
        .list_events(min, min + chrono::Duration::days(30))
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::AuthExpired));
}
