//! Login, logout and session expiry across services and storage

mod helpers;

use assert_matches::assert_matches;
use serde_json::json;
use helpers::*;
use Event360::listing::ListingState;
use Event360::middleware::{authorize, Route};
use Event360::models::{LoginRequest, RegisterRequest, Role, User};
use Event360::state::ConversationContext;
use Event360::utils::errors::{ApiError, Event360Error};

fn credentials() -> LoginRequest {
    LoginRequest {
        email: "user5@example.com".into(),
        password: "password123".into(),
    }
}

#[tokio::test]
async fn test_login_persists_session() {
    let mock = ApiMockServer::start().await;
    mock.mock_login(TOKEN, user_json(5, "organizer")).await;
    let (services, storage) = mock.services();

    let session = services.auth_service.login(CHAT_ID, &credentials()).await.unwrap();
    assert_eq!(session.token, TOKEN);

    let stored = storage.load_session(CHAT_ID).await.unwrap().unwrap();
    assert_eq!(stored.user.username, "user5");
    assert!(services.auth_service.is_organizer(CHAT_ID).await.unwrap());
    assert!(!services.auth_service.is_admin(CHAT_ID).await.unwrap());
}

#[tokio::test]
async fn test_failed_login_leaves_no_session() {
    let mock = ApiMockServer::start().await;
    mock.mock_login_rejected("Invalid email or password").await;
    let (services, storage) = mock.services();

    let err = services.auth_service.login(CHAT_ID, &credentials()).await.unwrap_err();
    assert_matches!(&err, Event360Error::AuthFailed(_));
    assert_eq!(err.user_message(), "Invalid email or password");
    assert!(storage.load_session(CHAT_ID).await.unwrap().is_none());
}

#[tokio::test]
async fn test_register_logs_in_afterwards() {
    let mock = ApiMockServer::start().await;
    mock.respond("POST", "/api/auth/register", 201, json!({
        "message": "User registered successfully",
        "user": user_json(8, "attendee")
    }))
    .await;
    mock.mock_login(TOKEN, user_json(8, "attendee")).await;
    let (services, _) = mock.services();

    let request = RegisterRequest {
        username: "user8".into(),
        email: "user8@example.com".into(),
        password: "password123".into(),
        phone: None,
        role: Role::Attendee,
    };
    let session = services.auth_service.register(CHAT_ID, &request).await.unwrap();

    assert_eq!(session.user.id, 8);
    assert_eq!(mock.hits("/api/auth/login").await, 1);
}

#[tokio::test]
async fn test_register_conflict_surfaces_message() {
    let mock = ApiMockServer::start().await;
    mock.respond("POST", "/api/auth/register", 409, json!({ "error": "Email already registered" })).await;
    let (services, _) = mock.services();

    let request = RegisterRequest {
        username: "dup".into(),
        email: "dup@example.com".into(),
        password: "password123".into(),
        phone: None,
        role: Role::Organizer,
    };
    let err = services.auth_service.register(CHAT_ID, &request).await.unwrap_err();
    assert_eq!(err.user_message(), "Email already registered");
    assert_eq!(mock.hits("/api/auth/login").await, 0);
}

#[tokio::test]
async fn test_logout_clears_state_even_if_server_fails() {
    let mock = ApiMockServer::start().await;
    mock.mock_login(TOKEN, user_json(5, "attendee")).await;
    mock.respond("POST", "/api/auth/logout", 500, json!({ "error": "boom" })).await;
    let (services, storage) = mock.services();

    services.auth_service.login(CHAT_ID, &credentials()).await.unwrap();
    let mut context = ConversationContext::new(CHAT_ID);
    context.start_scenario("search", "query").unwrap();
    storage.save_context(&context).await.unwrap();
    storage.save_listing(CHAT_ID, &ListingState::from_query("city=Nairobi")).await.unwrap();

    services.auth_service.logout(CHAT_ID).await.unwrap();

    assert!(storage.load_session(CHAT_ID).await.unwrap().is_none());
    assert!(storage.load_context(CHAT_ID).await.unwrap().is_none());
    assert!(storage.load_listing(CHAT_ID).await.unwrap().is_none());
    assert_eq!(mock.hits("/api/auth/logout").await, 1);
}

#[tokio::test]
async fn test_refresh_user_updates_cached_profile() {
    let mock = ApiMockServer::start().await;
    mock.mock_login(TOKEN, user_json(5, "attendee")).await;
    let mut promoted = user_json(5, "organizer");
    promoted["username"] = json!("renamed");
    mock.respond_authorized("GET", "/api/auth/me", TOKEN, json!({ "user": promoted })).await;
    let (services, storage) = mock.services();

    services.auth_service.login(CHAT_ID, &credentials()).await.unwrap();
    let user = services.auth_service.refresh_user(CHAT_ID).await.unwrap().unwrap();

    assert_eq!(user.role, Some(Role::Organizer));
    let stored = storage.load_session(CHAT_ID).await.unwrap().unwrap();
    assert_eq!(stored.user.username, "renamed");
    assert_eq!(stored.token, TOKEN);
}

#[tokio::test]
async fn test_profile_without_role_name_keeps_session_role() {
    let mock = ApiMockServer::start().await;
    mock.mock_login(TOKEN, user_json(5, "organizer")).await;
    let (services, storage) = mock.services();
    services.auth_service.login(CHAT_ID, &credentials()).await.unwrap();

    let mut profile = user_json(5, "organizer");
    profile.as_object_mut().unwrap().remove("role");
    profile["role_id"] = json!(2);
    profile["phone"] = json!("+254711111111");
    let user: User = serde_json::from_value(profile).unwrap();
    services.auth_service.update_user(CHAT_ID, user).await.unwrap();

    let stored = storage.load_session(CHAT_ID).await.unwrap().unwrap();
    assert_eq!(stored.user.phone.as_deref(), Some("+254711111111"));
    assert_eq!(stored.role(), Role::Organizer);
}

#[tokio::test]
async fn test_refresh_failure_logs_out() {
    let mock = ApiMockServer::start().await;
    mock.mock_login(TOKEN, user_json(5, "attendee")).await;
    mock.respond("GET", "/api/auth/me", 401, json!({ "error": "Token expired" })).await;
    mock.mock_logout().await;
    let (services, storage) = mock.services();

    services.auth_service.login(CHAT_ID, &credentials()).await.unwrap();
    assert!(services.auth_service.refresh_user(CHAT_ID).await.is_err());
    assert!(storage.load_session(CHAT_ID).await.unwrap().is_none());
}

#[tokio::test]
async fn test_rejected_token_clears_session() {
    let mock = ApiMockServer::start().await;
    mock.mock_login(TOKEN, user_json(5, "attendee")).await;
    mock.respond("GET", "/api/orders", 401, json!({ "error": "Invalid token" })).await;
    let (services, storage) = mock.services();

    services.auth_service.login(CHAT_ID, &credentials()).await.unwrap();
    let result = services
        .session_service
        .call(CHAT_ID, |api, _| async move { api.orders().list().await })
        .await;

    assert_matches!(result, Err(Event360Error::Api(ApiError::Unauthorized(_))));
    assert!(storage.load_session(CHAT_ID).await.unwrap().is_none());
}

#[tokio::test]
async fn test_protected_call_without_session() {
    let mock = ApiMockServer::start().await;
    let (services, _) = mock.services();

    let result = services
        .session_service
        .call(CHAT_ID, |api, _| async move { api.tickets().list().await })
        .await;

    assert_matches!(result, Err(Event360Error::NotAuthenticated));
    assert!(mock.server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_route_access_follows_stored_role() {
    let mock = ApiMockServer::start().await;
    mock.mock_login(TOKEN, user_json(5, "attendee")).await;
    let (services, _) = mock.services();

    assert_matches!(authorize(None, Route::Tickets), Err(Event360Error::NotAuthenticated));

    services.auth_service.login(CHAT_ID, &credentials()).await.unwrap();
    let session = services.auth_service.current_session(CHAT_ID).await.unwrap();

    assert!(authorize(session.clone(), Route::Tickets).is_ok());
    assert_matches!(authorize(session.clone(), Route::CreateEvent), Err(Event360Error::PermissionDenied(_)));
    assert_matches!(authorize(session, Route::AdminPanel), Err(Event360Error::PermissionDenied(_)));
}
