//! API Server Entry Point
//!
//! Demo server with every route behind the form authentication gate.
//! Uses `anyhow` for startup errors; the gate itself never surfaces errors
//! to clients.
//!
//! Environment:
//! - `FORM_AUTH_*` - gate configuration, see `form_auth::config::GateConfig::from_lookup`
//! - `FORM_AUTH_USERS` - realm entries `name:phc:role1,role2;...`
//! - `FORM_AUTH_REQUIRED_ROLE` - role a user needs to log in (default `user`)
//! - `API_ADDR` - listen address (default `0.0.0.0:31113`)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, header},
    response::{Html, IntoResponse},
    routing::get,
};
use form_auth::{
    AuthenticatedUser, AuthenticationGate, FormAuthState, GateConfig, HtmlPages, MemoryRealm,
    PrivateRealm, protect,
};
use platform::password::ClearTextPassword;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,form_auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Gate configuration
    let mut config = GateConfig::from_env()?;
    if cfg!(debug_assertions) && env::var("FORM_AUTH_COOKIE_SECURE").is_err() {
        config.cookie_secure = false;
    }
    if config.secret.is_none() {
        tracing::warn!("FORM_AUTH_SECRET not set, logins will not survive a restart");
    }

    // Identity realm
    let realm = match env::var("FORM_AUTH_USERS") {
        Ok(users) => MemoryRealm::parse(&users)?,
        Err(_) if cfg!(debug_assertions) => {
            tracing::warn!("FORM_AUTH_USERS not set, using demo/demo");
            let password = ClearTextPassword::new("demo").hash()?;
            MemoryRealm::new().with_user("demo", password, ["user"])
        }
        Err(_) => anyhow::bail!("FORM_AUTH_USERS must be set in production"),
    };
    tracing::info!(users = realm.len(), "Realm loaded");

    let realm = match env::var("FORM_AUTH_REQUIRED_ROLE") {
        Ok(role) => PrivateRealm::with_required_role(vec![realm], role),
        Err(_) => PrivateRealm::new(vec![realm]),
    };

    let gate = AuthenticationGate::new(config, realm, Arc::new(HtmlPages::default()))?;

    // Build router
    let routes = Router::new()
        .route("/", get(home))
        .route("/style.css", get(stylesheet));

    let app = protect(routes, FormAuthState::new(gate)).layer(TraceLayer::new_for_http());

    // Start server
    let addr: SocketAddr = env::var("API_ADDR")
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

async fn home(request: Request<Body>) -> Html<String> {
    let username = request
        .extensions()
        .get::<AuthenticatedUser>()
        .map(|user| form_auth::presentation::pages::escape_html(&user.username))
        .unwrap_or_else(|| "anonymous".to_string());

    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><link rel=\"stylesheet\" href=\"/style.css\"></head>\n<body><h1>Hello, {username}</h1></body>\n</html>\n"
    ))
}

/// Served without a login through the default exclude pattern
async fn stylesheet() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css")],
        "body { font-family: sans-serif; }\n",
    )
}
