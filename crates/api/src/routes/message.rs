use axum::{Json, extract::State};
use bson::oid::ObjectId;
use realty_db::models::User;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::{Validate, ValidationError};

use crate::{
    error::{ApiError, OrNotFound},
    state::AppState,
};

const MISSING_FIELDS: &str = "Missing required fields";

/// A visitor's question about a listing, fanned out to every user.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InquiryRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub listing_id: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub recipient_id: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub email: String,
    pub phone: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub message: String,
}

/// An owner asking the agency to list their property.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SellRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub email: String,
    pub phone: Option<String>,
    pub property_type: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub property_location: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct DeliveryResponse {
    pub success: bool,
    pub message: String,
}

impl DeliveryResponse {
    fn sent(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

fn inquiry_subject(listing_name: &str) -> String {
    format!("New inquiry about listing: {listing_name}")
}

fn sell_request_subject(property_type: Option<&str>, location: &str) -> String {
    match property_type.map(str::trim).filter(|t| !t.is_empty()) {
        Some(kind) => format!("Nueva solicitud para vender una propiedad: {kind} en {location}"),
        None => format!("Nueva solicitud para vender una propiedad en {location}"),
    }
}

/// Every account receives a copy; there is no per-listing routing.
async fn recipients(state: &AppState) -> Result<Vec<User>, ApiError> {
    let users = state.users.list().await?;
    if users.is_empty() {
        return Err(ApiError::NotFound("No users found".to_string()));
    }
    Ok(users)
}

/// Outbound mail is not wired up; each delivery is written to the log with
/// the sender as reply-to.
fn deliver(recipients: &[User], reply_to: &str, subject: &str) {
    for user in recipients {
        info!(to = %user.email, %reply_to, %subject, "Message delivered");
    }
}

pub async fn send_public(
    State(state): State<AppState>,
    Json(body): Json<InquiryRequest>,
) -> Result<Json<DeliveryResponse>, ApiError> {
    body.validate()
        .map_err(|_| ApiError::BadRequest(MISSING_FIELDS.to_string()))?;

    let listing_id = ObjectId::parse_str(body.listing_id.trim())
        .map_err(|_| ApiError::NotFound("Listing not found".to_string()))?;
    let listing = state
        .listings
        .base
        .find_by_id(listing_id)
        .await
        .or_not_found("Listing")?;

    let users = recipients(&state).await?;
    let listing_url = format!(
        "{}/listing/{listing_id}",
        state.settings.app.frontend_url.trim_end_matches('/')
    );
    deliver(&users, &body.email, &inquiry_subject(&listing.name));
    info!(
        %listing_id,
        %listing_url,
        from = %body.name,
        phone = body.phone.as_deref().unwrap_or("Not provided"),
        recipients = users.len(),
        "Listing inquiry sent"
    );

    Ok(Json(DeliveryResponse::sent(
        "Message sent successfully to all users",
    )))
}

pub async fn sell_property(
    State(state): State<AppState>,
    Json(body): Json<SellRequest>,
) -> Result<Json<DeliveryResponse>, ApiError> {
    body.validate()
        .map_err(|_| ApiError::BadRequest(MISSING_FIELDS.to_string()))?;

    let users = recipients(&state).await?;
    let subject = sell_request_subject(body.property_type.as_deref(), &body.property_location);
    deliver(&users, &body.email, &subject);
    info!(
        from = %body.name,
        location = %body.property_location,
        recipients = users.len(),
        "Sell request sent"
    );

    Ok(Json(DeliveryResponse::sent(
        "Solicitud de venta enviada con éxito",
    )))
}
