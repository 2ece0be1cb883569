pub mod auth;
pub mod category;
pub mod city;
pub mod listing;
pub mod message;
pub mod user;

use axum::http::{HeaderMap, HeaderValue, header};
use bson::{DateTime, oid::ObjectId};
use serde::Serialize;

use crate::{error::ApiError, extractors::auth::ACCESS_TOKEN_COOKIE};

pub(crate) fn parse_id(raw: &str, what: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid {what} id")))
}

pub(crate) fn rfc3339(dt: DateTime) -> String {
    dt.try_to_rfc3339_string().unwrap_or_default()
}

/// `Set-Cookie` carrying the session token. An empty token with zero max-age clears it.
pub(crate) fn session_cookie(token: &str, max_age: u64) -> Result<HeaderMap, ApiError> {
    let cookie = format!(
        "{ACCESS_TOKEN_COOKIE}={token}; HttpOnly; Path=/; SameSite=Lax; Max-Age={max_age}"
    );
    let value = HeaderValue::from_str(&cookie)
        .map_err(|e| ApiError::Internal(format!("Invalid cookie header: {e}")))?;

    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, value);
    Ok(headers)
}

pub(crate) fn clear_session_cookie() -> Result<HeaderMap, ApiError> {
    session_cookie("", 0)
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
