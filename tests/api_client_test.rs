//! Event360 REST client against a mock backend

mod helpers;

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{header_exists, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};
use helpers::*;
use Event360::listing::EventFilters;
use Event360::models::{LoginRequest, Role, UpdateProfileRequest};
use Event360::utils::errors::{ApiError, Event360Error};

#[tokio::test]
async fn test_login_returns_token_and_user() {
    let mock = ApiMockServer::start().await;
    mock.mock_login(TOKEN, user_json(5, "organizer")).await;

    let response = mock
        .client()
        .auth()
        .login(&LoginRequest {
            email: "user5@example.com".into(),
            password: "password123".into(),
        })
        .await
        .unwrap();

    assert_eq!(response.token, TOKEN);
    assert_eq!(response.user.role, Some(Role::Organizer));
    assert_eq!(response.user.username, "user5");
}

#[tokio::test]
async fn test_rejected_login_carries_backend_message() {
    let mock = ApiMockServer::start().await;
    mock.mock_login_rejected("Invalid email or password").await;

    let result = mock
        .client()
        .auth()
        .login(&LoginRequest {
            email: "nobody@example.com".into(),
            password: "wrong-password".into(),
        })
        .await;

    assert_matches!(result, Err(ApiError::Unauthorized(message)) if message == "Invalid email or password");
}

#[tokio::test]
async fn test_bearer_token_attached_once_authenticated() {
    let mock = ApiMockServer::start().await;
    mock.respond_authorized("GET", "/api/auth/me", TOKEN, json!({ "user": user_json(5, "attendee") }))
        .await;
    mock.respond("GET", "/api/auth/me", 401, json!({ "error": "No token provided" })).await;

    let anonymous = mock.client().auth().current_user().await;
    assert_matches!(anonymous, Err(ApiError::Unauthorized(_)));

    let user = mock.client().with_token(TOKEN).auth().current_user().await.unwrap();
    assert_eq!(user.id, 5);
}

#[tokio::test]
async fn test_status_errors_mapped() {
    let mock = ApiMockServer::start().await;
    mock.respond("GET", "/api/events/99", 404, json!({ "message": "Event not found" })).await;
    mock.respond("POST", "/api/orders/3/cancel", 400, json!({ "error": "Order already paid" })).await;

    let client = mock.client().with_token(TOKEN);
    let missing = client.events().get(99).await;
    assert_matches!(&missing, Err(ApiError::Status { status: 404, message }) if message == "Event not found");
    assert_matches!(
        missing.map_err(|e| Event360Error::event_lookup(99, e)),
        Err(Event360Error::EventNotFound { event_id: 99 })
    );
    assert_matches!(
        client.orders().cancel(3).await,
        Err(ApiError::Status { status: 400, message }) if message == "Order already paid"
    );
}

#[tokio::test]
async fn test_malformed_success_body_is_invalid_response() {
    let mock = ApiMockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tickets"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock.server)
        .await;

    let result = mock.client().with_token(TOKEN).tickets().list().await;
    assert_matches!(result, Err(ApiError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_event_list_sends_filter_params() {
    let mock = ApiMockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/events"))
        .and(query_param("category", "Music"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(event_catalogue()))
        .mount(&mock.server)
        .await;

    let filters = EventFilters::from_query("category=Music&city=All+Cities");
    let events = mock.client().events().list(&filters.api_params(2, 6)).await.unwrap();

    assert_eq!(events.len(), 3);
    // the backend ignores filters, so they are applied locally as well
    let music = filters.apply(events);
    assert_eq!(music.len(), 1);
    assert_eq!(music[0].title, "Nairobi Jazz Night");
}

#[tokio::test]
async fn test_image_upload_is_multipart() {
    let mock = ApiMockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload/image"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Image uploaded",
            "url": "https://cdn.example.com/poster.png"
        })))
        .mount(&mock.server)
        .await;

    let url = mock
        .client()
        .with_token(TOKEN)
        .uploads()
        .upload_image("poster.png", "image/png", vec![0x89, 0x50, 0x4e, 0x47])
        .await
        .unwrap();
    assert_eq!(url, "https://cdn.example.com/poster.png");

    let requests = mock.server.received_requests().await.unwrap();
    let content_type = requests[0].headers.get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data"));
    assert!(String::from_utf8_lossy(&requests[0].body).contains("name=\"file\""));
}

#[tokio::test]
async fn test_unreachable_backend_is_service_unavailable() {
    // nothing listens on the discard port
    let client = Event360::ApiClient::with_base_url("http://127.0.0.1:9").unwrap();
    let result = client.events().get(1).await;
    assert_matches!(result, Err(ApiError::ServiceUnavailable | ApiError::RequestFailed(_)));
}

#[tokio::test]
async fn test_account_endpoints_without_chat_pages() {
    let mock = ApiMockServer::start().await;
    let mut updated = user_json(5, "attendee");
    updated["phone"] = json!("+254711111111");
    mock.respond_authorized("PUT", "/api/users/5", TOKEN, json!({ "message": "Profile updated", "user": updated }))
        .await;
    mock.respond_authorized(
        "GET",
        "/api/payments/order/3",
        TOKEN,
        json!([{ "id": 8, "order_id": 3, "provider": "mpesa", "amount": 1500.0, "status": "completed" }]),
    )
    .await;
    mock.respond_authorized("DELETE", "/api/registrations/4", TOKEN, json!({ "message": "Registration cancelled" }))
        .await;

    let client = mock.client().with_token(TOKEN);
    let profile = client
        .users()
        .update_profile(5, &UpdateProfileRequest { phone: Some("+254711111111".into()), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(profile.user.phone.as_deref(), Some("+254711111111"));

    let payments = client.payments().for_order(3).await.unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].status, "completed");

    let cancelled = client.registrations().cancel(4).await.unwrap();
    assert_eq!(cancelled.message.as_deref(), Some("Registration cancelled"));
}
