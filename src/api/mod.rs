use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, SessionManagerLayer};

use crate::config::Config;
use crate::db::Store;
use crate::services::{CredentialVerifier, StaticAdminCredentials};

pub mod auth;
mod categories;
mod error;
mod questions;
mod stats;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,

    pub config: Config,

    /// Injected capability; swap the implementation to integrate a real
    /// identity provider without touching route logic.
    pub credentials: Arc<dyn CredentialVerifier>,
}

impl AppState {
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }
}

/// Connects the store, applies migrations, and seeds first-run data.
pub async fn create_app_state(config: Config) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    store.ping().await?;
    store.seed_default_categories().await?;

    let credentials: Arc<dyn CredentialVerifier> =
        Arc::new(StaticAdminCredentials::new(&config.auth));

    Ok(Arc::new(AppState {
        store,
        config,
        credentials,
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    let session_layer = SessionManagerLayer::new(state.store.session_store())
        .with_secure(state.config.server.secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::hours(
            state.config.server.session_ttl_hours,
        )));

    let api_router = Router::new()
        .merge(admin_routes())
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/auth/check", get(auth::check_auth))
        .route("/categories", get(categories::list_categories))
        .route("/questions", get(questions::list_questions))
        .route("/questions/{id}", get(questions::get_question))
        .route("/stats", get(stats::get_stats))
        .layer(session_layer)
        .with_state(state.clone());

    let cors_origins = &state.config.server.cors_allowed_origins;
    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

/// Mutating routes, all behind the session guard.
fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/categories", post(categories::create_category))
        .route("/categories/{id}", put(categories::update_category))
        .route("/categories/{id}", delete(categories::delete_category))
        .route("/questions", post(questions::create_question))
        .route("/questions/{id}", put(questions::update_question))
        .route("/questions/{id}", delete(questions::delete_question))
        .route_layer(middleware::from_fn(auth::require_auth))
}
