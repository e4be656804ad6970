use sea_orm::entity::prelude::*;

/// Identity record keyed by an opaque external identifier. Reserved for
/// future identity-provider integration; no route exercises it yet.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub id: String,

    #[sea_orm(unique)]
    pub email: Option<String>,

    pub first_name: Option<String>,

    pub last_name: Option<String>,

    pub profile_image_url: Option<String>,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
