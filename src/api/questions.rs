use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::types::{QuestionDto, QuestionWithCategoryDto};
use super::validation::{parse_payload, validate_id};
use super::{ApiError, AppState};
use crate::db::{NewQuestion, QuestionChanges};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    pub title: String,
    pub content: String,
    pub answer: String,
    pub category_id: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateQuestionRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub answer: Option<String>,
    pub category_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct QuestionsQuery {
    pub category: Option<String>,
    pub search: Option<String>,
}

/// GET /api/questions?category=&search= (public)
/// `search` wins over `category` when both are present; empty-string
/// parameters count as absent.
pub async fn list_questions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QuestionsQuery>,
) -> Result<Json<Vec<QuestionWithCategoryDto>>, ApiError> {
    let search = query.search.filter(|s| !s.is_empty());
    let category = query.category.filter(|c| !c.is_empty());

    let questions = if let Some(search) = search {
        state.store().search_questions(&search).await?
    } else if let Some(category) = category {
        let category_id = category
            .parse::<i32>()
            .map_err(|_| ApiError::validation(format!("Invalid category id: {category}")))?;
        state
            .store()
            .list_questions_by_category(category_id)
            .await?
    } else {
        state.store().list_questions().await?
    };

    Ok(Json(questions.into_iter().map(Into::into).collect()))
}

/// GET /api/questions/{id} (public)
/// Every detail fetch counts one view. The response carries the
/// pre-increment snapshot, consistent with list reads.
pub async fn get_question(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<QuestionWithCategoryDto>, ApiError> {
    let id = validate_id(id)?;

    let Some(question) = state.store().get_question(id).await? else {
        return Err(ApiError::not_found("Question", id));
    };

    state.store().increment_question_views(id).await?;

    Ok(Json(question.into()))
}

/// POST /api/questions
pub async fn create_question(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<QuestionDto>), ApiError> {
    let payload: CreateQuestionRequest = parse_payload(payload, "question")?;

    let question = state
        .store()
        .create_question(NewQuestion {
            title: payload.title,
            content: payload.content,
            answer: payload.answer,
            category_id: payload.category_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(QuestionDto::from(question))))
}

/// PUT /api/questions/{id}
pub async fn update_question(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<QuestionDto>, ApiError> {
    let id = validate_id(id)?;
    let changes: UpdateQuestionRequest = parse_payload(payload, "question")?;

    let updated = state
        .store()
        .update_question(
            id,
            QuestionChanges {
                title: changes.title,
                content: changes.content,
                answer: changes.answer,
                category_id: changes.category_id,
            },
        )
        .await?;

    match updated {
        Some(question) => Ok(Json(QuestionDto::from(question))),
        None => Err(ApiError::not_found("Question", id)),
    }
}

/// DELETE /api/questions/{id}
pub async fn delete_question(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let id = validate_id(id)?;

    if state.store().delete_question(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Question", id))
    }
}
