use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use realty_db::models::City;
use serde::{Deserialize, Serialize};

use super::{MessageResponse, parse_id, rfc3339};
use crate::{
    error::{ApiError, OrNotFound},
    extractors::auth::AdminUser,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CityRequest {
    pub name: Option<String>,
    pub state: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityResponse {
    pub id: String,
    pub name: String,
    pub state: String,
    pub label: String,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<City> for CityResponse {
    fn from(c: City) -> Self {
        let label = c.label();
        Self {
            id: c.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: c.name,
            state: c.state,
            label,
            active: c.active,
            created_at: rfc3339(c.created_at),
            updated_at: rfc3339(c.updated_at),
        }
    }
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<CityResponse>>, ApiError> {
    let cities = state.cities.list().await?;
    Ok(Json(cities.into_iter().map(CityResponse::from).collect()))
}

pub async fn get(
    State(state): State<AppState>,
    Path(city_id): Path<String>,
) -> Result<Json<CityResponse>, ApiError> {
    let cid = parse_id(&city_id, "city")?;
    let city = state.cities.base.find_by_id(cid).await.or_not_found("City")?;
    Ok(Json(city.into()))
}

pub async fn create(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(body): Json<CityRequest>,
) -> Result<(StatusCode, Json<CityResponse>), ApiError> {
    let city = state
        .cities
        .create(body.name, body.state, body.active)
        .await?;
    Ok((StatusCode::CREATED, Json(city.into())))
}

pub async fn update(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(city_id): Path<String>,
    Json(body): Json<CityRequest>,
) -> Result<Json<CityResponse>, ApiError> {
    let cid = parse_id(&city_id, "city")?;
    let city = state
        .cities
        .update(cid, body.name, body.state, body.active)
        .await
        .or_not_found("City")?;
    Ok(Json(city.into()))
}

pub async fn delete(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(city_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let cid = parse_id(&city_id, "city")?;
    state.cities.delete(cid).await.or_not_found("City")?;
    Ok(Json(MessageResponse::new("City deleted successfully")))
}
