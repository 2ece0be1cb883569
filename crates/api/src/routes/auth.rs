use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use super::{MessageResponse, clear_session_cookie, session_cookie, user::UserResponse};
use crate::{error::ApiError, state::AppState};
use realty_services::{auth::AuthError, dao::base::DaoError};

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct InviteCheckRequest {
    pub email: String,
    pub token: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInvitedRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    pub phone_number: Option<String>,
    pub token: String,
}

const WRONG_CREDENTIALS: &str = "Wrong email or password";
const INVALID_INVITATION: &str = "Invalid or expired invitation";

pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    body.validate()?;

    if state.users.email_taken(&body.email).await? {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    let password_hash = state.auth.hash_password(&body.password)?;
    let user = state
        .users
        .create(body.username, body.email, password_hash, None, false)
        .await?;

    info!(user_id = ?user.id, "User signed up");
    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn signin(
    State(state): State<AppState>,
    Json(body): Json<SigninRequest>,
) -> Result<(HeaderMap, Json<UserResponse>), ApiError> {
    let user = state.users.find_by_email(&body.email).await.map_err(|e| match e {
        DaoError::NotFound => ApiError::NotFound(WRONG_CREDENTIALS.to_string()),
        other => other.into(),
    })?;

    if !state.auth.verify_password(&body.password, &user.password_hash)? {
        return Err(AuthError::InvalidCredentials.into());
    }

    let user_id = user
        .id
        .ok_or_else(|| ApiError::Internal("Stored user has no id".to_string()))?;
    let issued = state.auth.issue_token(user_id, &user.email, user.is_admin)?;
    let headers = session_cookie(&issued.token, issued.expires_in)?;

    Ok((headers, Json(user.into())))
}

pub async fn signout() -> Result<(HeaderMap, Json<MessageResponse>), ApiError> {
    Ok((
        clear_session_cookie()?,
        Json(MessageResponse::new("User logged out successfully")),
    ))
}

pub async fn validate_invite(
    State(state): State<AppState>,
    Json(body): Json<InviteCheckRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .invitations
        .find_valid(&body.email, &body.token)
        .await?
        .ok_or_else(|| ApiError::BadRequest(INVALID_INVITATION.to_string()))?;

    Ok(Json(serde_json::json!({ "success": true })))
}

/// Redeems an invitation: creates an admin account and signs it in.
pub async fn register_invited(
    State(state): State<AppState>,
    Json(body): Json<RegisterInvitedRequest>,
) -> Result<(StatusCode, HeaderMap, Json<UserResponse>), ApiError> {
    let invitation = state
        .invitations
        .find_valid(&body.email, &body.token)
        .await?
        .ok_or_else(|| ApiError::BadRequest(INVALID_INVITATION.to_string()))?;

    if state.users.email_taken(&body.email).await? {
        return Err(ApiError::BadRequest(
            "User with this email already exists".to_string(),
        ));
    }

    let phone_number = body
        .phone_number
        .clone()
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Phone number is required".to_string()))?;
    body.validate()?;

    let password_hash = state.auth.hash_password(&body.password)?;
    let user = state
        .users
        .create(body.username, body.email, password_hash, Some(phone_number), true)
        .await?;

    if let Some(invitation_id) = invitation.id {
        state.invitations.consume(invitation_id).await?;
    }

    let user_id = user
        .id
        .ok_or_else(|| ApiError::Internal("Stored user has no id".to_string()))?;
    let issued = state.auth.issue_token(user_id, &user.email, user.is_admin)?;
    let headers = session_cookie(&issued.token, issued.expires_in)?;

    info!(%user_id, "Invited admin registered");
    Ok((StatusCode::CREATED, headers, Json(user.into())))
}
