use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use realty_db::models::{Currency, Listing, ListingType};
use realty_services::{
    ListingQuery, ListingSearchParams,
    dao::listing::{ListingInput, ListingPatch},
};
use serde::Serialize;
use validator::Validate;

use super::{MessageResponse, parse_id, rfc3339};
use crate::{
    error::{ApiError, OrNotFound},
    extractors::auth::AuthUser,
    state::AppState,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub address: String,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(rename = "type")]
    pub listing_type: ListingType,
    pub category: String,
    pub category_ref: Option<String>,
    pub city_ref: Option<String>,
    pub regular_price: f64,
    pub discount_price: Option<f64>,
    pub mxn_price: Option<f64>,
    pub usd_price: Option<f64>,
    pub offer: bool,
    pub currency: Currency,
    pub bedrooms: u32,
    pub bathrooms: f64,
    pub construction_area: f64,
    pub land_area: f64,
    pub furnished: bool,
    pub parking: bool,
    pub parking_spaces: u32,
    pub garden: bool,
    pub pets: bool,
    pub image_urls: Vec<String>,
    pub video_url: Option<String>,
    pub custom_characteristics: Vec<String>,
    pub user_ref: String,
    pub sold: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Listing> for ListingResponse {
    fn from(l: Listing) -> Self {
        Self {
            id: l.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: l.name,
            description: l.description,
            address: l.address,
            city: l.city,
            latitude: l.latitude,
            longitude: l.longitude,
            listing_type: l.listing_type,
            category: l.category,
            category_ref: l.category_ref.map(|id| id.to_hex()),
            city_ref: l.city_ref.map(|id| id.to_hex()),
            regular_price: l.regular_price,
            discount_price: l.discount_price,
            mxn_price: l.mxn_price,
            usd_price: l.usd_price,
            offer: l.offer,
            currency: l.currency,
            bedrooms: l.bedrooms,
            bathrooms: l.bathrooms,
            construction_area: l.construction_area,
            land_area: l.land_area,
            furnished: l.furnished,
            parking: l.parking,
            parking_spaces: l.parking_spaces,
            garden: l.garden,
            pets: l.pets,
            image_urls: l.image_urls,
            video_url: l.video_url,
            custom_characteristics: l.custom_characteristics,
            user_ref: l.user_ref.to_hex(),
            sold: l.sold,
            created_at: rfc3339(l.created_at),
            updated_at: rfc3339(l.updated_at),
        }
    }
}

/// Contact card for the owner of a listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerContactResponse {
    pub username: String,
    pub email: String,
    pub phone_number: Option<String>,
}

/// Public search. Malformed parameters never reject the request; they are
/// treated as absent.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<ListingSearchParams>,
) -> Result<Json<Vec<ListingResponse>>, ApiError> {
    let query = ListingQuery::from_params(&params);

    let listings = state
        .listings
        .search(&query)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to get listings: {e}")))?;

    Ok(Json(listings.into_iter().map(ListingResponse::from).collect()))
}

pub async fn get(
    State(state): State<AppState>,
    Path(listing_id): Path<String>,
) -> Result<Json<ListingResponse>, ApiError> {
    let lid = parse_id(&listing_id, "listing")?;
    let listing = state
        .listings
        .base
        .find_by_id(lid)
        .await
        .or_not_found("Listing")?;
    Ok(Json(listing.into()))
}

pub async fn owner_contact(
    State(state): State<AppState>,
    Path(listing_id): Path<String>,
) -> Result<Json<OwnerContactResponse>, ApiError> {
    let lid = parse_id(&listing_id, "listing")?;
    let listing = state
        .listings
        .base
        .find_by_id(lid)
        .await
        .or_not_found("Listing")?;
    let owner = state
        .users
        .base
        .find_by_id(listing.user_ref)
        .await
        .or_not_found("User")?;

    Ok(Json(OwnerContactResponse {
        username: owner.username,
        email: owner.email,
        phone_number: owner.phone_number,
    }))
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<ListingInput>,
) -> Result<(StatusCode, Json<ListingResponse>), ApiError> {
    body.validate()?;
    let listing = state.listings.create(auth.user_id, body).await?;
    Ok((StatusCode::CREATED, Json(listing.into())))
}

pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(listing_id): Path<String>,
    Json(body): Json<ListingPatch>,
) -> Result<Json<ListingResponse>, ApiError> {
    let lid = parse_id(&listing_id, "listing")?;
    body.validate()?;
    let listing = state
        .listings
        .update(lid, auth.user_id, body)
        .await
        .or_not_found("Listing")?;
    Ok(Json(listing.into()))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(listing_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let lid = parse_id(&listing_id, "listing")?;
    state
        .listings
        .delete(lid, auth.user_id)
        .await
        .or_not_found("Listing")?;
    Ok(Json(MessageResponse::new("Listing deleted successfully")))
}
