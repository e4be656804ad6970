use crate::entities::{prelude::*, users};
use anyhow::Result;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

/// Upsert payload keyed on the opaque external id.
#[derive(Debug, Clone)]
pub struct UpsertUser {
    pub id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: &str) -> Result<Option<users::Model>> {
        Ok(Users::find_by_id(id).one(&self.conn).await?)
    }

    /// Inserts, or updates every profile field and refreshes
    /// `updated_at` when the id already exists.
    pub async fn upsert(&self, input: UpsertUser) -> Result<users::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        match Users::find_by_id(&input.id).one(&self.conn).await? {
            Some(existing) => {
                let mut active: users::ActiveModel = existing.into();
                active.email = Set(input.email);
                active.first_name = Set(input.first_name);
                active.last_name = Set(input.last_name);
                active.profile_image_url = Set(input.profile_image_url);
                active.updated_at = Set(now);
                Ok(active.update(&self.conn).await?)
            }
            None => {
                let active = users::ActiveModel {
                    id: Set(input.id),
                    email: Set(input.email),
                    first_name: Set(input.first_name),
                    last_name: Set(input.last_name),
                    profile_image_url: Set(input.profile_image_url),
                    created_at: Set(now.clone()),
                    updated_at: Set(now),
                };
                Ok(active.insert(&self.conn).await?)
            }
        }
    }
}
