//! Authentication route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::AuthService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    name: String,
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

/// `POST /api/auth/register` - Create an account and sign in.
pub async fn register(
    session: Session,
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<CurrentUser>)> {
    let auth = AuthService::new(state.pool());
    let user = auth
        .register(&request.name, &request.email, &request.password)
        .await?;

    let current = CurrentUser::from_user(&user);
    set_current_user(&session, &current).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));

    tracing::info!(user_id = %user.id, "User registered");
    Ok((StatusCode::CREATED, Json(current)))
}

/// `POST /api/auth/login` - Sign in with email and password.
pub async fn login(
    session: Session,
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<CurrentUser>> {
    let auth = AuthService::new(state.pool());
    let user = auth.login(&request.email, &request.password).await?;

    // Fresh session id on privilege change
    session.cycle_id().await?;

    let current = CurrentUser::from_user(&user);
    set_current_user(&session, &current).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(Json(current))
}

/// `POST /api/auth/logout` - Sign out.
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_user(&session).await?;
    clear_sentry_user();

    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/auth/me` - The current user, or `null` when signed out.
pub async fn me(OptionalAuth(user): OptionalAuth) -> Json<Option<CurrentUser>> {
    Json(user)
}
