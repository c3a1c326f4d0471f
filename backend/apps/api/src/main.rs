//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use axum::{
    Router, http,
    http::{HeaderName, Method, header},
};
use csrf::{CsrfAppState, CsrfConfig, SystemClock, csrf_router, protect_and_issue};
use std::env;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer, ExposeHeaders};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,csrf=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // CSRF configuration; a missing or weak secret in production aborts here
    let csrf_config = CsrfConfig::from_env()?;
    tracing::info!(
        ttl_secs = csrf_config.token_ttl.as_secs(),
        set_cookie = csrf_config.set_cookie,
        session_binding = csrf_config.session_cookie_name.is_some(),
        "CSRF token service configured"
    );

    let csrf_header = HeaderName::from_bytes(csrf_config.header_name.as_bytes())?;
    let csrf_state = CsrfAppState::new(csrf_config, SystemClock)?;

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:40922,http://127.0.0.1:40922".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::ACCEPT,
            csrf_header.clone(),
        ]))
        .expose_headers(ExposeHeaders::list([csrf_header]))
        .allow_credentials(true);

    // Build router; every route below the CSRF layers is protected
    let routes = Router::new().nest("/api/csrf", csrf_router(csrf_state.clone()));
    let app = protect_and_issue(routes, csrf_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:31113".to_string())
        .parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
