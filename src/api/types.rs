use serde::Serialize;

use crate::db::{QuestionWithCategory, Stats};
use crate::entities::{categories, questions};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub color: String,
    pub created_at: String,
}

impl From<categories::Model> for CategoryDto {
    fn from(model: categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            icon: model.icon,
            color: model.color,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDto {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub answer: String,
    pub category_id: i32,
    pub views: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<questions::Model> for QuestionDto {
    fn from(model: questions::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            content: model.content,
            answer: model.answer,
            category_id: model.category_id,
            views: model.views,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Question fields plus the owning category snapshot, flattened the way
/// list and detail reads are consumed.
#[derive(Debug, Serialize)]
pub struct QuestionWithCategoryDto {
    #[serde(flatten)]
    pub question: QuestionDto,
    pub category: CategoryDto,
}

impl From<QuestionWithCategory> for QuestionWithCategoryDto {
    fn from(row: QuestionWithCategory) -> Self {
        Self {
            question: row.question.into(),
            category: row.category.into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsDto {
    pub total_questions: u64,
    pub total_categories: u64,
    pub total_views: i64,
}

impl From<Stats> for StatsDto {
    fn from(stats: Stats) -> Self {
        Self {
            total_questions: stats.total_questions,
            total_categories: stats.total_categories,
            total_views: stats.total_views,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct AuthUser {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: AuthUser,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckAuthResponse {
    pub is_authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<AuthUser>,
}
