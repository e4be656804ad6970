use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::entities::{categories, questions, users};

pub mod migrator;
pub mod repositories;
mod session_store;

pub use repositories::category::{CategoryChanges, CategoryDeletion, NewCategory};
pub use repositories::question::{NewQuestion, QuestionChanges, QuestionWithCategory};
pub use repositories::user::UpsertUser;
pub use session_store::SeaOrmSessionStore;

/// Aggregate counters, computed on demand and never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub total_questions: u64,
    pub total_categories: u64,
    pub total_views: i64,
}

/// Categories seeded on first startup, only while the table is empty.
const DEFAULT_CATEGORIES: [(&str, &str, &str, &str); 4] = [
    (
        "Mathematics",
        "Algebra, Geometry, Calculus",
        "calculator",
        "blue",
    ),
    (
        "Science",
        "Physics, Chemistry, Biology",
        "microscope",
        "green",
    ),
    (
        "History",
        "World History, Ancient Civilizations",
        "monument",
        "purple",
    ),
    (
        "Literature",
        "Classic Literature, Poetry, Essays",
        "book",
        "amber",
    ),
];

/// Sole mediator between the API layer and persisted state.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn category_repo(&self) -> repositories::category::CategoryRepository {
        repositories::category::CategoryRepository::new(self.conn.clone())
    }

    fn question_repo(&self) -> repositories::question::QuestionRepository {
        repositories::question::QuestionRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    /// Session backend sharing this store's connection pool.
    #[must_use]
    pub fn session_store(&self) -> SeaOrmSessionStore {
        SeaOrmSessionStore::new(self.conn.clone())
    }

    /// Idempotent first-run seeding: inserts the four default
    /// categories only when the table is empty.
    pub async fn seed_default_categories(&self) -> Result<()> {
        if self.category_repo().count().await? > 0 {
            return Ok(());
        }

        for (name, description, icon, color) in DEFAULT_CATEGORIES {
            self.category_repo()
                .create(NewCategory {
                    name: name.to_string(),
                    description: description.to_string(),
                    icon: icon.to_string(),
                    color: color.to_string(),
                })
                .await?;
        }

        info!("Seeded {} default categories", DEFAULT_CATEGORIES.len());
        Ok(())
    }

    pub async fn list_categories(&self) -> Result<Vec<categories::Model>> {
        self.category_repo().list().await
    }

    pub async fn get_category(&self, id: i32) -> Result<Option<categories::Model>> {
        self.category_repo().get(id).await
    }

    pub async fn create_category(&self, input: NewCategory) -> Result<categories::Model> {
        self.category_repo().create(input).await
    }

    pub async fn update_category(
        &self,
        id: i32,
        changes: CategoryChanges,
    ) -> Result<Option<categories::Model>> {
        self.category_repo().update(id, changes).await
    }

    pub async fn delete_category(&self, id: i32) -> Result<CategoryDeletion> {
        self.category_repo().delete(id).await
    }

    pub async fn list_questions(&self) -> Result<Vec<QuestionWithCategory>> {
        self.question_repo().list().await
    }

    pub async fn list_questions_by_category(
        &self,
        category_id: i32,
    ) -> Result<Vec<QuestionWithCategory>> {
        self.question_repo().list_by_category(category_id).await
    }

    pub async fn get_question(&self, id: i32) -> Result<Option<QuestionWithCategory>> {
        self.question_repo().get(id).await
    }

    pub async fn create_question(&self, input: NewQuestion) -> Result<questions::Model> {
        self.question_repo().create(input).await
    }

    pub async fn update_question(
        &self,
        id: i32,
        changes: QuestionChanges,
    ) -> Result<Option<questions::Model>> {
        self.question_repo().update(id, changes).await
    }

    pub async fn delete_question(&self, id: i32) -> Result<bool> {
        self.question_repo().delete(id).await
    }

    pub async fn increment_question_views(&self, id: i32) -> Result<()> {
        self.question_repo().increment_views(id).await
    }

    pub async fn search_questions(&self, query: &str) -> Result<Vec<QuestionWithCategory>> {
        self.question_repo().search(query).await
    }

    pub async fn get_stats(&self) -> Result<Stats> {
        Ok(Stats {
            total_questions: self.question_repo().count().await?,
            total_categories: self.category_repo().count().await?,
            total_views: self.question_repo().total_views().await?,
        })
    }

    pub async fn get_user(&self, id: &str) -> Result<Option<users::Model>> {
        self.user_repo().get(id).await
    }

    pub async fn upsert_user(&self, input: UpsertUser) -> Result<users::Model> {
        self.user_repo().upsert(input).await
    }
}
