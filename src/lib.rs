//! Encore is the credential issuance and refresh service of the Encore
//! catalog platform. Catalog CRUD lives elsewhere; this process only mints
//! access tokens and manages the refresh-token life cycle.

#[forbid(unsafe_code)]
#[deny(missing_docs, unused_mut)]
mod database;
pub mod error;
pub mod router;
pub mod telemetry;

pub mod config;

use std::sync::Arc;
use std::time::Duration;

use adapters::outbound::clock::SystemClock;
use adapters::outbound::crypto::{
    Argon2PasswordVerifier, OsRngTokenGenerator, Sha256TokenDigest,
};
use adapters::outbound::jwt::HsTokenSigner;
use adapters::outbound::persistence::postgres::{
    PgAccountRepository, PgRefreshTokenRepository,
};
use adapters::outbound::telemetry::TracingTelemetry;
use application::ports::inbound::{
    Authenticate, RefreshAccessToken, RevokeSession,
};
use application::ports::outbound::TokenSigner;
use application::tokens::{RefreshTokenService, ReusePolicy};
use application::usecases::{
    AuthenticateUseCase, RefreshTokenUseCase, RevokeSessionUseCase,
};
use axum::http::{Method, StatusCode, header};
use axum::routing::{get, post};
use axum::{Router, extract::State, middleware as AxumMiddleware};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;
use tower_http::LatencyUnit;
use tower_http::cors::{Any, CorsLayer};
use tower_http::sensitive_headers::SetSensitiveHeadersLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};

pub use error::ServerError;

/// State sharing between routes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::Configuration>,
    pub authenticate: Arc<dyn Authenticate>,
    pub refresh: Arc<dyn RefreshAccessToken>,
    pub logout: Arc<dyn RevokeSession>,
    pub verifier: Arc<dyn TokenSigner>,
    pub refresh_tokens: Arc<RefreshTokenService>,
    pub metrics: Option<PrometheusHandle>,
}

async fn metrics_handler(State(state): State<AppState>) -> String {
    state
        .metrics
        .map(|handle| handle.render())
        .unwrap_or_default()
}

/// Create router.
pub fn app(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        // Add high level tracing/logging to all requests.
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new().level(tracing::Level::INFO),
                )
                .on_request(DefaultOnRequest::new())
                .on_response(
                    DefaultOnResponse::new()
                        .latency_unit(LatencyUnit::Micros),
                ),
        )
        // Set a timeout.
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        // Remove sensitive headers from trace.
        .layer(SetSensitiveHeadersLayer::new([
            header::AUTHORIZATION,
            header::COOKIE,
        ]))
        // Add CORS preflight support.
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers(Any)
                .vary([header::AUTHORIZATION]),
        );

    Router::new()
        // `GET /status.json` goes to `status`.
        .route("/status.json", get(router::status::status))
        // `GET /metrics` goes to the Prometheus exporter.
        .route("/metrics", get(metrics_handler))
        // `POST /login` goes to `login`.
        .route("/login", post(router::login::handler))
        // `POST /oauth/token` exchanges a refresh token.
        .route("/oauth/token", post(router::refresh_token::handler))
        // `POST /oauth/revoke` kills every session of the caller.
        .route("/oauth/revoke", post(router::revoke::handler))
        // `POST /logout` kills one session.
        .route("/logout", post(router::logout::handler))
        .with_state(state)
        .route_layer(AxumMiddleware::from_fn(telemetry::track))
        .layer(middleware)
}

/// Initialize the application state.
pub async fn initialize_state() -> Result<AppState, Box<dyn std::error::Error>>
{
    // read configuration file. let it in memory.
    let config = config::Configuration::default().read()?;

    let db = match config.postgres {
        Some(ref config) => {
            database::Database::new(
                &config.address,
                &config
                    .username
                    .clone()
                    .unwrap_or(database::DEFAULT_CREDENTIALS.into()),
                &config
                    .password
                    .clone()
                    .unwrap_or(database::DEFAULT_CREDENTIALS.into()),
                &config
                    .database
                    .clone()
                    .unwrap_or(database::DEFAULT_DATABASE_NAME.into()),
                config.pool_size.unwrap_or(database::DEFAULT_POOL_SIZE),
            )
            .await?
        },
        None => {
            tracing::error!("missing `postgres` entry on `config.yaml` file");
            std::process::exit(0);
        },
    };

    // execute migrations scripts on start.
    sqlx::migrate!().run(&db.postgres).await?;

    // handle token issuance. a missing or weak secret must stop the
    // process here, never fail a request later.
    let Some(token) = config.token.clone() else {
        tracing::error!("missing `token` entry on `config.yaml` file");
        std::process::exit(0);
    };

    let audience = token.audience.clone().unwrap_or_else(|| config.url.clone());
    let signer = Arc::new(HsTokenSigner::new(
        &token.secret,
        config.name.clone(),
        audience,
    )?);

    let reuse_policy = if token.revoke_on_reuse {
        ReusePolicy::RevokeAll
    } else {
        ReusePolicy::Reject
    };

    let refresh_tokens = Arc::new(
        RefreshTokenService::new(
            Box::new(PgRefreshTokenRepository::new(db.postgres.clone())),
            Box::new(OsRngTokenGenerator::new()),
            Box::new(Sha256TokenDigest::new()),
            Box::new(SystemClock::new()),
            Box::new(TracingTelemetry::new()),
            token.refresh_token_ttl(),
        )
        .with_reuse_policy(reuse_policy),
    );

    let authenticate = Arc::new(AuthenticateUseCase::new(
        Box::new(PgAccountRepository::new(db.postgres.clone())),
        Box::new(Argon2PasswordVerifier::new()),
        Box::new(Arc::clone(&signer)),
        Box::new(OsRngTokenGenerator::new()),
        Arc::clone(&refresh_tokens),
        Box::new(TracingTelemetry::new()),
        Box::new(SystemClock::new()),
        token.access_token_ttl(),
    ));

    let refresh = Arc::new(RefreshTokenUseCase::new(
        Box::new(PgAccountRepository::new(db.postgres.clone())),
        Box::new(Arc::clone(&signer)),
        Box::new(OsRngTokenGenerator::new()),
        Arc::clone(&refresh_tokens),
        Box::new(TracingTelemetry::new()),
        Box::new(SystemClock::new()),
        token.access_token_ttl(),
    ));

    let logout =
        Arc::new(RevokeSessionUseCase::new(Arc::clone(&refresh_tokens)));

    let metrics = match telemetry::setup_metrics_recorder() {
        Ok(handle) => Some(handle),
        Err(err) => {
            tracing::warn!(error = %err, "metrics recorder not installed");
            None
        },
    };

    Ok(AppState {
        config,
        authenticate,
        refresh,
        logout,
        verifier: signer,
        refresh_tokens,
        metrics,
    })
}
