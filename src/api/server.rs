//! HTTP API server

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{require_auth, Authorizer, BcryptVerifier, PasswordVerifier};
use crate::config::Config;
use crate::error::Result;
use crate::store::{self, UserStore};

use super::routes;

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn UserStore>,
    pub verifier: Arc<dyn PasswordVerifier>,
}

impl AppState {
    /// The authorization predicate over this state's collaborators
    pub fn authorizer(&self) -> Authorizer {
        Authorizer::new(self.store.clone(), self.verifier.clone())
    }
}

pub type SharedState = Arc<AppState>;

/// Run the HTTP API server with the store named in the configuration
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    let store = store::connect(&config).await?;
    let verifier: Arc<dyn PasswordVerifier> = Arc::new(BcryptVerifier::new());

    let state = Arc::new(AppState {
        config,
        store,
        verifier,
    });

    serve_with_state(state, host, port).await
}

/// Run the HTTP API server over pre-built state.
///
/// Split out from [`run_server`] so tests can seed the store before binding.
pub async fn serve_with_state(state: SharedState, host: &str, port: u16) -> Result<()> {
    let app = create_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the router with all routes
fn create_router(state: SharedState) -> Router {
    let protected = Router::new()
        .route("/api/auth/session", get(routes::session))
        .route("/api/auth/accept-messages", post(routes::accept_messages))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/auth/sign-up", post(routes::sign_up))
        .route("/api/auth/sign-in", post(routes::sign_in))
        .route("/api/auth/sign-out", post(routes::sign_out))
        .route("/api/auth/verify", post(routes::verify))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
