use std::time::Duration;

use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
};
use realty_db::models::User;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use super::{
    MessageResponse, clear_session_cookie, listing::ListingResponse, parse_id, rfc3339,
};
use crate::{
    error::{ApiError, OrNotFound},
    extractors::auth::{AdminUser, AuthUser},
    state::AppState,
};

/// Public view of a user; the password hash never leaves the service.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub avatar: Option<String>,
    pub is_admin: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            username: user.username,
            email: user.email,
            phone_number: user.phone_number,
            avatar: user.avatar,
            is_admin: user.is_admin,
            created_at: rfc3339(user.created_at),
            updated_at: rfc3339(user.updated_at),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, message = "Username cannot be empty"))]
    pub username: Option<String>,
    #[validate(email(message = "Invalid email"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: Option<String>,
    pub phone_number: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct InviteRequest {
    #[validate(email(message = "Invalid email"))]
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteResponse {
    pub message: String,
    pub email: String,
    pub expires_at: String,
}

pub async fn list(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.users.list().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

pub async fn get(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let uid = parse_id(&user_id, "user")?;
    let user = state.users.base.find_by_id(uid).await.or_not_found("User")?;
    Ok(Json(user.into()))
}

pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let uid = parse_id(&user_id, "user")?;
    auth.ensure_self(uid, "update")?;
    body.validate()?;

    let password_hash = body
        .password
        .as_deref()
        .map(|p| state.auth.hash_password(p))
        .transpose()?;

    let user = state
        .users
        .update_profile(
            uid,
            body.username,
            body.email,
            password_hash,
            body.phone_number,
            body.avatar,
        )
        .await
        .or_not_found("User")?;

    Ok(Json(user.into()))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
) -> Result<(HeaderMap, Json<MessageResponse>), ApiError> {
    let uid = parse_id(&user_id, "user")?;
    auth.ensure_self(uid, "delete")?;

    state.users.delete(uid).await.or_not_found("User")?;
    info!(user_id = %uid, "User deleted");

    Ok((
        clear_session_cookie()?,
        Json(MessageResponse::new("User deleted successfully")),
    ))
}

pub async fn listings(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<ListingResponse>>, ApiError> {
    let uid = parse_id(&user_id, "user")?;
    auth.ensure_self(uid, "view listings of")?;

    let listings = state.listings.find_by_owner(uid).await?;
    Ok(Json(listings.into_iter().map(ListingResponse::from).collect()))
}

/// Registration link for an invitation, with both query values percent-encoded.
fn invite_link(frontend_url: &str, token: &str, email: &str) -> String {
    format!(
        "{}/register-invited?token={}&email={}",
        frontend_url.trim_end_matches('/'),
        urlencoding::encode(token),
        urlencoding::encode(email)
    )
}

/// Issues (or re-issues) an admin invitation. Delivery is left to the
/// operator: the registration link is written to the log.
pub async fn invite(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(body): Json<InviteRequest>,
) -> Result<Json<InviteResponse>, ApiError> {
    body.validate()?;

    if state.users.email_taken(&body.email).await? {
        return Err(ApiError::BadRequest(
            "User with this email already exists".to_string(),
        ));
    }

    let ttl = Duration::from_secs(state.settings.invitation.ttl_secs);
    let invitation = state
        .invitations
        .create(body.email, admin.user_id, ttl)
        .await?;

    let link = invite_link(
        &state.settings.app.frontend_url,
        &invitation.token,
        &invitation.email,
    );
    info!(email = %invitation.email, invited_by = %admin.user_id, %link, "Invitation link");

    Ok(Json(InviteResponse {
        message: "Invitation sent successfully".to_string(),
        email: invitation.email,
        expires_at: rfc3339(invitation.expires_at),
    }))
}
