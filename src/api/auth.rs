use axum::{
    Json,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::types::{AuthUser, CheckAuthResponse, LoginResponse, MessageResponse};
use super::validation::parse_payload;
use super::{ApiError, AppState};

/// Session key holding the authenticated admin's email.
const SESSION_USER_KEY: &str = "user";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

// ============================================================================
// Middleware
// ============================================================================

/// Guard for every mutating route: short-circuits with 401 before any
/// store call when the session is not authenticated.
pub async fn require_auth(
    session: Session,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Ok(Some(email)) = session.get::<String>(SESSION_USER_KEY).await {
        tracing::Span::current().record("user", email.as_str());
        return Ok(next.run(request).await);
    }

    Err(ApiError::unauthorized())
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<LoginResponse>, ApiError> {
    let payload: LoginRequest = parse_payload(payload, "login")?;

    // Presence check comes before the credential check.
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::validation("Email and password are required"));
    }

    let is_valid = state
        .credentials
        .verify(&payload.email, &payload.password)
        .await
        .map_err(|e| ApiError::internal(format!("Authentication error: {e}")))?;

    if !is_valid {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    session
        .insert(SESSION_USER_KEY, &payload.email)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    tracing::info!("Admin logged in: {}", payload.email);

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        user: AuthUser {
            email: payload.email,
        },
    }))
}

/// POST /api/logout
/// Destroys the session store entry unconditionally.
pub async fn logout(session: Session) -> Result<Json<MessageResponse>, ApiError> {
    session
        .flush()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to destroy session: {e}")))?;

    Ok(Json(MessageResponse {
        message: "Logout successful".to_string(),
    }))
}

/// GET /api/auth/check
/// Pure read of the session state; never mutates, never fails.
pub async fn check_auth(session: Session) -> Json<CheckAuthResponse> {
    let email = session
        .get::<String>(SESSION_USER_KEY)
        .await
        .ok()
        .flatten();

    Json(match email {
        Some(email) => CheckAuthResponse {
            is_authenticated: true,
            user: Some(AuthUser { email }),
        },
        None => CheckAuthResponse {
            is_authenticated: false,
            user: None,
        },
    })
}
