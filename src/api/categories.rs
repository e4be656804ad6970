use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::types::CategoryDto;
use super::validation::{parse_payload, validate_id};
use super::{ApiError, AppState};
use crate::db::{CategoryChanges, CategoryDeletion, NewCategory};

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

/// GET /api/categories (public)
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CategoryDto>>, ApiError> {
    let categories = state.store().list_categories().await?;
    Ok(Json(categories.into_iter().map(CategoryDto::from).collect()))
}

/// POST /api/categories
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<CategoryDto>), ApiError> {
    let payload: CreateCategoryRequest = parse_payload(payload, "category")?;

    let category = state
        .store()
        .create_category(NewCategory {
            name: payload.name,
            description: payload.description,
            icon: payload.icon.unwrap_or_else(|| "folder".to_string()),
            color: payload.color.unwrap_or_else(|| "blue".to_string()),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(CategoryDto::from(category))))
}

/// PUT /api/categories/{id}
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<CategoryDto>, ApiError> {
    let id = validate_id(id)?;
    let changes: UpdateCategoryRequest = parse_payload(payload, "category")?;

    let updated = state
        .store()
        .update_category(
            id,
            CategoryChanges {
                name: changes.name,
                description: changes.description,
                icon: changes.icon,
                color: changes.color,
            },
        )
        .await?;

    match updated {
        Some(category) => Ok(Json(CategoryDto::from(category))),
        None => Err(ApiError::not_found("Category", id)),
    }
}

/// DELETE /api/categories/{id}
/// The dependents guard is an expected refusal (400), distinct from a
/// missing id (404).
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let id = validate_id(id)?;

    match state.store().delete_category(id).await? {
        CategoryDeletion::Deleted => Ok(StatusCode::NO_CONTENT),
        CategoryDeletion::HasQuestions => Err(ApiError::Blocked(
            "Cannot delete category with existing questions".to_string(),
        )),
        CategoryDeletion::NotFound => Err(ApiError::not_found("Category", id)),
    }
}
