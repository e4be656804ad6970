use crate::entities::{categories, prelude::*, questions};
use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;

/// Fields for a new category. Display-tag defaults are applied by the
/// API layer before this struct is built.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: String,
    pub icon: String,
    pub color: String,
}

/// Partial update; only `Some` fields are written.
#[derive(Debug, Clone, Default)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

/// Outcome of a delete attempt. The dependents guard is a soft refusal,
/// distinguishable from a missing id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryDeletion {
    Deleted,
    HasQuestions,
    NotFound,
}

pub struct CategoryRepository {
    conn: DatabaseConnection,
}

impl CategoryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// All categories, ordered by name ascending.
    pub async fn list(&self) -> Result<Vec<categories::Model>> {
        let rows = Categories::find()
            .order_by_asc(categories::Column::Name)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    pub async fn get(&self, id: i32) -> Result<Option<categories::Model>> {
        Ok(Categories::find_by_id(id).one(&self.conn).await?)
    }

    /// Fails on a duplicate name (unique constraint).
    pub async fn create(&self, input: NewCategory) -> Result<categories::Model> {
        let active = categories::ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            icon: Set(input.icon),
            color: Set(input.color),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let model = active.insert(&self.conn).await?;
        info!("Created category {}: {}", model.id, model.name);
        Ok(model)
    }

    pub async fn update(
        &self,
        id: i32,
        changes: CategoryChanges,
    ) -> Result<Option<categories::Model>> {
        let Some(existing) = Categories::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        if changes.name.is_none()
            && changes.description.is_none()
            && changes.icon.is_none()
            && changes.color.is_none()
        {
            return Ok(Some(existing));
        }

        let mut active: categories::ActiveModel = existing.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(icon) = changes.icon {
            active.icon = Set(icon);
        }
        if let Some(color) = changes.color {
            active.color = Set(color);
        }

        Ok(Some(active.update(&self.conn).await?))
    }

    /// Refuses while any question still references the category.
    pub async fn delete(&self, id: i32) -> Result<CategoryDeletion> {
        let dependents = Questions::find()
            .filter(questions::Column::CategoryId.eq(id))
            .count(&self.conn)
            .await?;

        if dependents > 0 {
            return Ok(CategoryDeletion::HasQuestions);
        }

        let result = Categories::delete_by_id(id).exec(&self.conn).await?;
        if result.rows_affected > 0 {
            info!("Deleted category {}", id);
            Ok(CategoryDeletion::Deleted)
        } else {
            Ok(CategoryDeletion::NotFound)
        }
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(Categories::find().count(&self.conn).await?)
    }
}
