use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use realty_db::models::Category;
use serde::{Deserialize, Serialize};

use super::{MessageResponse, parse_id, rfc3339};
use crate::{
    error::{ApiError, OrNotFound},
    extractors::auth::AdminUser,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Category> for CategoryResponse {
    fn from(c: Category) -> Self {
        Self {
            id: c.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: c.name,
            active: c.active,
            created_at: rfc3339(c.created_at),
            updated_at: rfc3339(c.updated_at),
        }
    }
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    let categories = state.categories.list().await?;
    Ok(Json(categories.into_iter().map(CategoryResponse::from).collect()))
}

pub async fn get(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let cid = parse_id(&category_id, "category")?;
    let category = state
        .categories
        .base
        .find_by_id(cid)
        .await
        .or_not_found("Category")?;
    Ok(Json(category.into()))
}

pub async fn create(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(body): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), ApiError> {
    let category = state.categories.create(body.name, body.active).await?;
    Ok((StatusCode::CREATED, Json(category.into())))
}

pub async fn update(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(category_id): Path<String>,
    Json(body): Json<CategoryRequest>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let cid = parse_id(&category_id, "category")?;
    let category = state
        .categories
        .update(cid, body.name, body.active)
        .await
        .or_not_found("Category")?;
    Ok(Json(category.into()))
}

pub async fn delete(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(category_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let cid = parse_id(&category_id, "category")?;
    state
        .categories
        .delete(cid)
        .await
        .or_not_found("Category")?;
    Ok(Json(MessageResponse::new("Category deleted successfully")))
}
