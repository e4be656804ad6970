use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use time::OffsetDateTime;
use tower_sessions::{
    SessionStore,
    session::{Id, Record},
    session_store,
};

use crate::entities::{prelude::*, sessions};

/// tower-sessions backend persisting session records in the app
/// database, one row per session id. Expired rows are invisible to
/// `load` and reclaimed by [`Self::delete_expired`], which the server
/// loop runs on an hourly schedule.
#[derive(Clone, Debug)]
pub struct SeaOrmSessionStore {
    conn: DatabaseConnection,
}

impl SeaOrmSessionStore {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Bulk-removes rows whose expiry has passed.
    pub async fn delete_expired(&self) -> session_store::Result<u64> {
        let result = Sessions::delete_many()
            .filter(sessions::Column::Expire.lte(OffsetDateTime::now_utc().unix_timestamp()))
            .exec(&self.conn)
            .await
            .map_err(backend_err)?;

        Ok(result.rows_affected)
    }
}

fn backend_err(err: sea_orm::DbErr) -> session_store::Error {
    session_store::Error::Backend(err.to_string())
}

#[async_trait]
impl SessionStore for SeaOrmSessionStore {
    async fn save(&self, record: &Record) -> session_store::Result<()> {
        let sess = serde_json::to_string(record)
            .map_err(|e| session_store::Error::Encode(e.to_string()))?;

        let active = sessions::ActiveModel {
            sid: Set(record.id.to_string()),
            sess: Set(sess),
            expire: Set(record.expiry_date.unix_timestamp()),
        };

        Sessions::insert(active)
            .on_conflict(
                OnConflict::column(sessions::Column::Sid)
                    .update_columns([sessions::Column::Sess, sessions::Column::Expire])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await
            .map_err(backend_err)?;

        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let row = Sessions::find_by_id(session_id.to_string())
            .filter(sessions::Column::Expire.gt(OffsetDateTime::now_utc().unix_timestamp()))
            .one(&self.conn)
            .await
            .map_err(backend_err)?;

        row.map(|r| serde_json::from_str(&r.sess))
            .transpose()
            .map_err(|e| session_store::Error::Decode(e.to_string()))
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        Sessions::delete_by_id(session_id.to_string())
            .exec(&self.conn)
            .await
            .map_err(backend_err)?;

        Ok(())
    }
}
