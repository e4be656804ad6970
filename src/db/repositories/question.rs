use crate::entities::{categories, prelude::*, questions};
use anyhow::{Context, Result};
use sea_orm::sea_query::{Expr, ExprTrait, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::info;

/// A question joined with its owning category snapshot. Read-only
/// projection assembled at query time, never persisted.
#[derive(Debug, Clone)]
pub struct QuestionWithCategory {
    pub question: questions::Model,
    pub category: categories::Model,
}

#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub title: String,
    pub content: String,
    pub answer: String,
    pub category_id: i32,
}

/// Partial update; only `Some` fields are written. `updated_at` is
/// refreshed on every call, `created_at` and `views` are never touched.
#[derive(Debug, Clone, Default)]
pub struct QuestionChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub answer: Option<String>,
    pub category_id: Option<i32>,
}

#[derive(FromQueryResult)]
struct ViewsTotal {
    views: Option<i64>,
}

pub struct QuestionRepository {
    conn: DatabaseConnection,
}

impl QuestionRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn zip_category(
        (question, category): (questions::Model, Option<categories::Model>),
    ) -> Result<QuestionWithCategory> {
        let category = category.context("question references a missing category")?;
        Ok(QuestionWithCategory { question, category })
    }

    /// All questions with their categories, newest first.
    pub async fn list(&self) -> Result<Vec<QuestionWithCategory>> {
        let rows = Questions::find()
            .find_also_related(Categories)
            .order_by_desc(questions::Column::CreatedAt)
            .order_by_desc(questions::Column::Id)
            .all(&self.conn)
            .await?;

        rows.into_iter().map(Self::zip_category).collect()
    }

    pub async fn list_by_category(&self, category_id: i32) -> Result<Vec<QuestionWithCategory>> {
        let rows = Questions::find()
            .find_also_related(Categories)
            .filter(questions::Column::CategoryId.eq(category_id))
            .order_by_desc(questions::Column::CreatedAt)
            .order_by_desc(questions::Column::Id)
            .all(&self.conn)
            .await?;

        rows.into_iter().map(Self::zip_category).collect()
    }

    /// Does not touch the view counter; that is a separate call.
    pub async fn get(&self, id: i32) -> Result<Option<QuestionWithCategory>> {
        let row = Questions::find_by_id(id)
            .find_also_related(Categories)
            .one(&self.conn)
            .await?;

        row.map(Self::zip_category).transpose()
    }

    /// Fails on a nonexistent `category_id` (referential constraint).
    pub async fn create(&self, input: NewQuestion) -> Result<questions::Model> {
        let now = chrono::Utc::now().to_rfc3339();
        let active = questions::ActiveModel {
            title: Set(input.title),
            content: Set(input.content),
            answer: Set(input.answer),
            category_id: Set(input.category_id),
            views: Set(0),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active.insert(&self.conn).await?;
        info!("Created question {}: {}", model.id, model.title);
        Ok(model)
    }

    pub async fn update(
        &self,
        id: i32,
        changes: QuestionChanges,
    ) -> Result<Option<questions::Model>> {
        let Some(existing) = Questions::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: questions::ActiveModel = existing.into();
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(content) = changes.content {
            active.content = Set(content);
        }
        if let Some(answer) = changes.answer {
            active.answer = Set(answer);
        }
        if let Some(category_id) = changes.category_id {
            active.category_id = Set(category_id);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        Ok(Some(active.update(&self.conn).await?))
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Questions::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    /// Atomic `views = views + 1` issued to the store, so concurrent
    /// detail fetches never lose updates. Silent no-op on an absent id.
    pub async fn increment_views(&self, id: i32) -> Result<()> {
        Questions::update_many()
            .col_expr(
                questions::Column::Views,
                Expr::col(questions::Column::Views).add(1),
            )
            .filter(questions::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;

        Ok(())
    }

    /// Case-insensitive substring match against title, content, or
    /// answer; newest first.
    pub async fn search(&self, query: &str) -> Result<Vec<QuestionWithCategory>> {
        let pattern = format!("%{}%", query.to_lowercase());
        let matches = |column: questions::Column| {
            Expr::expr(Func::lower(Expr::col((questions::Entity, column))))
                .like(pattern.as_str())
        };

        let rows = Questions::find()
            .find_also_related(Categories)
            .filter(
                Condition::any()
                    .add(matches(questions::Column::Title))
                    .add(matches(questions::Column::Content))
                    .add(matches(questions::Column::Answer)),
            )
            .order_by_desc(questions::Column::CreatedAt)
            .order_by_desc(questions::Column::Id)
            .all(&self.conn)
            .await?;

        rows.into_iter().map(Self::zip_category).collect()
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(Questions::find().count(&self.conn).await?)
    }

    /// Sum of all view counters, 0 when there are no questions.
    pub async fn total_views(&self) -> Result<i64> {
        let total = Questions::find()
            .select_only()
            .column_as(Expr::col(questions::Column::Views).sum(), "views")
            .into_model::<ViewsTotal>()
            .one(&self.conn)
            .await?;

        Ok(total.and_then(|t| t.views).unwrap_or(0))
    }
}
