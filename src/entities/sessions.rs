use sea_orm::entity::prelude::*;

/// Server-side session record. Owned by the session store; business
/// entities never reference it.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub sid: String,

    /// JSON-serialized session record (opaque to the rest of the app).
    pub sess: String,

    /// Expiry as unix seconds; rows at or past this instant are dead.
    pub expire: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
