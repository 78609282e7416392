//! Auth subsystem integration tests.
//!
//! Registration input rules, duplicate detection, login verification and the
//! bearer-token round-trip are exercised through the same handlers and
//! extractors the router wires up, over an in-memory SQLite database.
//!
//! Covered behavior:
//! - register: bad input → 400, duplicate username/email → 409
//! - login: unknown username or wrong password → 401, both with the same message
//! - a login token identifies the same user again via the required extractor
//! - the optional extractor reads missing/garbage/forged tokens as anonymous

use axum::extract::{FromRequestParts, State};
use axum::http::{header::AUTHORIZATION, request::Parts, Request};
use axum::Json;
use geuldam::error::AppError;
use geuldam::middleware::auth::{create_access_token, AuthError, AuthUser, MaybeAuthUser};
use geuldam::models::{LoginRequest, RegisterRequest};
use geuldam::routes::articles::AppState;
use geuldam::routes::auth;
use sqlx::sqlite::SqlitePoolOptions;

const JWT_SECRET: &str = "integration-test-secret";

/// In-memory SQLite state with migrations applied.
///
/// max_connections(1) keeps every query on the one connection that holds
/// the in-memory database.
async fn setup_state() -> AppState {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    AppState {
        pool,
        jwt_secret: JWT_SECRET.to_string(),
    }
}

/// A registration request that passes every input rule.
fn register_request(username: &str) -> RegisterRequest {
    RegisterRequest {
        full_name: format!("{} person", username),
        username: username.to_string(),
        email: format!("{}@example.com", username),
        password: "correct horse battery staple".to_string(),
    }
}

fn login_request(username: &str, password: &str) -> LoginRequest {
    LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
    }
}

/// Request parts carrying the given Authorization header, as the
/// extractors see them.
fn parts_with_auth(header: Option<&str>) -> Parts {
    let mut builder = Request::builder().uri("/api/auth/me");
    if let Some(value) = header {
        builder = builder.header(AUTHORIZATION, value);
    }
    builder.body(()).unwrap().into_parts().0
}

#[tokio::test]
async fn test_register_rejects_bad_input() {
    let state = setup_state().await;

    // Password shorter than 8 characters.
    let mut short_password = register_request("alice");
    short_password.password = "short".to_string();
    let err = auth::register(State(state.clone()), Json(short_password))
        .await
        .unwrap_err();
    match err {
        AppError::BadRequest(message) => assert!(message.contains("8 characters")),
        other => panic!("expected a bad-request error, got {:?}", other),
    }

    // Email without an '@'.
    let mut bad_email = register_request("alice");
    bad_email.email = "not-an-address".to_string();
    let err = auth::register(State(state.clone()), Json(bad_email))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    // Blank full name.
    let mut blank_name = register_request("alice");
    blank_name.full_name = "   ".to_string();
    let err = auth::register(State(state.clone()), Json(blank_name))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    // None of the rejected attempts may have created a user.
    let (user_count,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM users")
        .fetch_one(&state.pool)
        .await
        .unwrap();
    assert_eq!(user_count, 0);
}

#[tokio::test]
async fn test_register_conflicts_on_duplicate_username_or_email() {
    let state = setup_state().await;
    auth::register(State(state.clone()), Json(register_request("alice")))
        .await
        .unwrap();

    // Same username, different email.
    let mut taken_username = register_request("alice");
    taken_username.email = "second@example.com".to_string();
    let err = auth::register(State(state.clone()), Json(taken_username))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // Same email, different username.
    let mut taken_email = register_request("bob");
    taken_email.email = "alice@example.com".to_string();
    let err = auth::register(State(state), Json(taken_email))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_login_rejects_wrong_password_and_unknown_username() {
    let state = setup_state().await;
    auth::register(State(state.clone()), Json(register_request("alice")))
        .await
        .unwrap();

    let wrong_password = auth::login(
        State(state.clone()),
        Json(login_request("alice", "not the password")),
    )
    .await
    .unwrap_err();

    let unknown_user = auth::login(
        State(state),
        Json(login_request("nobody", "correct horse battery staple")),
    )
    .await
    .unwrap_err();

    // Both failures are 401 with the same message, so a caller cannot
    // tell which usernames exist.
    match (wrong_password, unknown_user) {
        (AppError::Unauthorized(first), AppError::Unauthorized(second)) => {
            assert_eq!(first, second);
        }
        other => panic!("expected two unauthorized errors, got {:?}", other),
    }
}

#[tokio::test]
async fn test_login_token_round_trips_to_me() {
    let state = setup_state().await;
    let Json(registered) = auth::register(State(state.clone()), Json(register_request("alice")))
        .await
        .unwrap();
    // New accounts start with the default role only.
    assert_eq!(registered.user.roles, vec!["ROLE_USER"]);

    let Json(login) = auth::login(
        State(state.clone()),
        Json(login_request("alice", "correct horse battery staple")),
    )
    .await
    .unwrap();

    // The bearer token alone must identify the same user again.
    let mut parts = parts_with_auth(Some(&format!("Bearer {}", login.access_token)));
    let auth_user = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap();
    assert_eq!(auth_user.user_id, registered.user.id);

    let Json(profile) = auth::me(State(state), auth_user).await.unwrap();
    assert_eq!(profile.username, "alice");
    assert_eq!(profile.email, "alice@example.com");
}

#[tokio::test]
async fn test_required_auth_rejects_missing_and_malformed_tokens() {
    let state = setup_state().await;

    let mut missing = parts_with_auth(None);
    let err = AuthUser::from_request_parts(&mut missing, &state)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::MissingToken));

    // Wrong scheme and garbage tokens are invalid, not missing.
    let mut wrong_scheme = parts_with_auth(Some("Basic YWxpY2U6cHc="));
    let err = AuthUser::from_request_parts(&mut wrong_scheme, &state)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidToken));

    let mut garbage = parts_with_auth(Some("Bearer not-a-jwt"));
    let err = AuthUser::from_request_parts(&mut garbage, &state)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidToken));
}

#[tokio::test]
async fn test_optional_auth_degrades_bad_tokens_to_anonymous() {
    let state = setup_state().await;
    let Json(registered) = auth::register(State(state.clone()), Json(register_request("alice")))
        .await
        .unwrap();

    // No header reads as an anonymous visitor.
    let mut missing = parts_with_auth(None);
    let MaybeAuthUser(visitor) = MaybeAuthUser::from_request_parts(&mut missing, &state)
        .await
        .unwrap();
    assert!(visitor.is_none());

    // So does a token that fails verification, instead of rejecting the request.
    let mut garbage = parts_with_auth(Some("Bearer not-a-jwt"));
    let MaybeAuthUser(visitor) = MaybeAuthUser::from_request_parts(&mut garbage, &state)
        .await
        .unwrap();
    assert!(visitor.is_none());

    // A token signed with a different secret is just as anonymous.
    let forged = create_access_token(&registered.user.id, "some-other-secret").unwrap();
    let mut forged_parts = parts_with_auth(Some(&format!("Bearer {}", forged)));
    let MaybeAuthUser(visitor) = MaybeAuthUser::from_request_parts(&mut forged_parts, &state)
        .await
        .unwrap();
    assert!(visitor.is_none());

    // A real token still resolves to the user.
    let mut valid = parts_with_auth(Some(&format!("Bearer {}", registered.access_token)));
    let MaybeAuthUser(visitor) = MaybeAuthUser::from_request_parts(&mut valid, &state)
        .await
        .unwrap();
    assert_eq!(visitor.unwrap().user_id, registered.user.id);
}
