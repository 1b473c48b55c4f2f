//! End-to-end flows over the HTTP surface, with in-memory adapters and a
//! pinned clock.

use std::sync::Arc;

use adapters::outbound::clock::FixedClock;
use adapters::outbound::crypto::{
    Argon2PasswordVerifier, OsRngTokenGenerator, Sha256TokenDigest,
};
use adapters::outbound::jwt::HsTokenSigner;
use adapters::outbound::persistence::memory::{
    InMemoryAccountRepository, InMemoryRefreshTokenRepository,
};
use adapters::outbound::telemetry::TracingTelemetry;
use application::dto::AccountDto;
use application::tokens::{RefreshTokenService, ReusePolicy};
use application::usecases::{
    AuthenticateUseCase, RefreshTokenUseCase, RevokeSessionUseCase,
};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use encore::config::Configuration;
use encore::{AppState, app};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::util::ServiceExt;

const SECRET: &str = "0123456789abcdef0123456789abcdef";
const REFRESH_TTL: u64 = 3_600;
const ACCESS_TTL: u64 = 900;
// jsonwebtoken checks `exp` against the system clock, so the pinned clock
// must stay ahead of it: 2100-01-01.
const NOW: u64 = 4_102_444_800;

struct Harness {
    router: Router,
    tokens: Arc<InMemoryRefreshTokenRepository>,
    clock: Arc<FixedClock>,
}

fn harness(reuse_policy: ReusePolicy) -> Harness {
    let clock = Arc::new(FixedClock::new(NOW));
    let tokens = Arc::new(InMemoryRefreshTokenRepository::new());

    let accounts = Arc::new(InMemoryAccountRepository::new());
    accounts.seed(
        AccountDto {
            id: "listener01".into(),
            email: "listener@example.com".into(),
            password_hash: Argon2PasswordVerifier::hash_password(
                "s3cret-password",
            )
            .unwrap(),
            deleted_at: None,
        },
        vec!["User".into(), "Admin".into()],
    );

    let signer = Arc::new(
        HsTokenSigner::new(SECRET, "encore", "api.encore.example").unwrap(),
    );

    let refresh_tokens = Arc::new(
        RefreshTokenService::new(
            Box::new(Arc::clone(&tokens)),
            Box::new(OsRngTokenGenerator::new()),
            Box::new(Sha256TokenDigest::new()),
            Box::new(Arc::clone(&clock)),
            Box::new(TracingTelemetry::new()),
            REFRESH_TTL,
        )
        .with_reuse_policy(reuse_policy),
    );

    let authenticate = Arc::new(AuthenticateUseCase::new(
        Box::new(Arc::clone(&accounts)),
        Box::new(Argon2PasswordVerifier::new()),
        Box::new(Arc::clone(&signer)),
        Box::new(OsRngTokenGenerator::new()),
        Arc::clone(&refresh_tokens),
        Box::new(TracingTelemetry::new()),
        Box::new(Arc::clone(&clock)),
        ACCESS_TTL,
    ));

    let refresh = Arc::new(RefreshTokenUseCase::new(
        Box::new(Arc::clone(&accounts)),
        Box::new(Arc::clone(&signer)),
        Box::new(OsRngTokenGenerator::new()),
        Arc::clone(&refresh_tokens),
        Box::new(TracingTelemetry::new()),
        Box::new(Arc::clone(&clock)),
        ACCESS_TTL,
    ));

    let logout =
        Arc::new(RevokeSessionUseCase::new(Arc::clone(&refresh_tokens)));

    let mut config = Configuration::default();
    config.name = "encore".into();
    config.url = "https://account.encore.example/".into();

    let state = AppState {
        config: Arc::new(config),
        authenticate,
        refresh,
        logout,
        verifier: signer,
        refresh_tokens,
        metrics: None,
    };

    Harness {
        router: app(state),
        tokens,
        clock,
    }
}

async fn post(
    router: &Router,
    path: &str,
    body: Value,
    bearer: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = bearer {
        builder =
            builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let response = router
        .clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

async fn login(router: &Router) -> Value {
    let (status, body) = post(
        router,
        "/login",
        json!({"email": "listener@example.com", "password": "s3cret-password"}),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body
}

async fn refresh(router: &Router, token: &str) -> (StatusCode, Value) {
    post(
        router,
        "/oauth/token",
        json!({"grant_type": "refresh_token", "refresh_token": token}),
        None,
    )
    .await
}

#[tokio::test]
async fn login_returns_a_token_pair() {
    let h = harness(ReusePolicy::Reject);
    let body = login(&h.router).await;

    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 900);
    assert!(!body["access_token"].as_str().unwrap().is_empty());
    assert_eq!(body["refresh_token"].as_str().unwrap().len(), 48);
    assert_eq!(h.tokens.len(), 1);
}

#[tokio::test]
async fn wrong_password_is_unauthorized_with_no_side_effect() {
    let h = harness(ReusePolicy::Reject);

    let (status, body) = post(
        &h.router,
        "/login",
        json!({"email": "listener@example.com", "password": "wrong-password"}),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["title"], "Authentication failed.");
    assert!(h.tokens.is_empty());
}

#[tokio::test]
async fn unknown_user_answers_like_wrong_password() {
    let h = harness(ReusePolicy::Reject);

    let (status_a, body_a) = post(
        &h.router,
        "/login",
        json!({"email": "ghost@example.com", "password": "s3cret-password"}),
        None,
    )
    .await;
    let (status_b, body_b) = post(
        &h.router,
        "/login",
        json!({"email": "listener@example.com", "password": "wrong-password"}),
        None,
    )
    .await;

    assert_eq!(status_a, StatusCode::UNAUTHORIZED);
    assert_eq!(status_a, status_b);
    assert_eq!(body_a, body_b);
}

#[tokio::test]
async fn refresh_rotates_and_rejects_replay() {
    let h = harness(ReusePolicy::Reject);
    let first = login(&h.router).await;
    let t1 = first["refresh_token"].as_str().unwrap();

    let (status, second) = refresh(&h.router, t1).await;
    assert_eq!(status, StatusCode::OK);
    let t2 = second["refresh_token"].as_str().unwrap();
    assert_ne!(t1, t2);

    // Replaying the rotated token is the theft signal: rejected.
    let (status, _) = refresh(&h.router, t1).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // The legitimate successor still works.
    let (status, _) = refresh(&h.router, t2).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn hardened_policy_burns_every_session_on_replay() {
    let h = harness(ReusePolicy::RevokeAll);
    let first = login(&h.router).await;
    let t1 = first["refresh_token"].as_str().unwrap();

    let (_, second) = refresh(&h.router, t1).await;
    let t2 = second["refresh_token"].as_str().unwrap();

    let (status, _) = refresh(&h.router, t1).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // The successor was revoked along with the rest of the chain.
    let (status, _) = refresh(&h.router, t2).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_grant_type_is_a_validation_error() {
    let h = harness(ReusePolicy::Reject);
    let first = login(&h.router).await;

    let (status, _) = post(
        &h.router,
        "/oauth/token",
        json!({
            "grant_type": "password",
            "refresh_token": first["refresh_token"],
        }),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn expired_refresh_token_is_unauthorized() {
    let h = harness(ReusePolicy::Reject);
    let first = login(&h.router).await;
    let t1 = first["refresh_token"].as_str().unwrap();

    h.clock.advance(REFRESH_TTL);

    let (status, _) = refresh(&h.router, t1).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_is_idempotent_and_kills_the_session() {
    let h = harness(ReusePolicy::Reject);
    let first = login(&h.router).await;
    let t1 = first["refresh_token"].as_str().unwrap();

    let (status, body) =
        post(&h.router, "/logout", json!({"refresh_token": t1}), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);

    // Second logout of the same token answers exactly the same.
    let (status, _) =
        post(&h.router, "/logout", json!({"refresh_token": t1}), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = refresh(&h.router, t1).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn revoke_all_kills_every_session_of_the_caller() {
    let h = harness(ReusePolicy::Reject);
    let first = login(&h.router).await;
    let second = login(&h.router).await;
    let access = first["access_token"].as_str().unwrap();

    let (status, body) =
        post(&h.router, "/oauth/revoke", json!({}), Some(access)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["revoked"], 2);

    for session in [&first, &second] {
        let token = session["refresh_token"].as_str().unwrap();
        let (status, _) = refresh(&h.router, token).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn revoke_all_requires_a_valid_bearer_token() {
    let h = harness(ReusePolicy::Reject);

    let (status, _) =
        post(&h.router, "/oauth/revoke", json!({}), Some("garbage")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = post(&h.router, "/oauth/revoke", json!({}), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
