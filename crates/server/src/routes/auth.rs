//! Authentication route handlers.
//!
//! Registration, login/logout and profile management.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;

use oakline_core::Role;

use crate::error::{AppError, Result};
use crate::middleware::{RequireAuth, clear_current_user, set_current_user};
use crate::models::user::UserProfile;
use crate::services::auth::{AuthService, ProfileEdit, Registration};
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub address: String,
    #[serde(default)]
    pub role: Role,
    pub title: Option<String>,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Profile edit request body. Absent fields are left unchanged.
#[derive(Debug, Deserialize, Default)]
pub struct EditProfileRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub address: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Register a new account.
#[tracing::instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let mut users = state.users().lock().await;
    let profile = AuthService::new(&mut users).register(Registration {
        username: request.username,
        email: request.email,
        password: request.password,
        address: request.address,
        role: request.role,
        title: request.title,
    })?;

    Ok((StatusCode::CREATED, Json(profile)))
}

/// Log in and establish a session.
#[tracing::instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<UserProfile>> {
    let mut users = state.users().lock().await;
    let mut auth = AuthService::new(&mut users);
    let session_user = auth.login(&request.username, &request.password)?;
    let profile = auth.get_profile(session_user.id)?;
    drop(users);

    set_current_user(&session, &session_user)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(profile))
}

/// Log out, clearing the session.
#[tracing::instrument(skip_all)]
pub async fn logout(session: Session) -> Result<impl IntoResponse> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(json!({ "message": "logged out" })))
}

/// The logged-in user's profile.
#[tracing::instrument(skip_all)]
pub async fn profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<UserProfile>> {
    let mut users = state.users().lock().await;
    let profile = AuthService::new(&mut users).get_profile(user.id)?;
    Ok(Json(profile))
}

/// Update the logged-in user's profile.
#[tracing::instrument(skip_all)]
pub async fn edit_profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Json(request): Json<EditProfileRequest>,
) -> Result<Json<UserProfile>> {
    let mut users = state.users().lock().await;
    let profile = AuthService::new(&mut users).edit_profile(
        user.id,
        ProfileEdit {
            username: request.username,
            email: request.email,
            password: request.password,
            address: request.address,
        },
    )?;
    drop(users);

    // The session copy of the username may be stale after an edit.
    let refreshed = crate::models::SessionUser {
        id: profile.id,
        username: profile.username.clone(),
        role: profile.role,
    };
    set_current_user(&session, &refreshed)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(profile))
}
