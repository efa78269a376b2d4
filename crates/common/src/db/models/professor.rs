//! Professor entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "professors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub university_id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub name: String,

    /// College name, free text (submissions may type their own)
    #[sea_orm(column_type = "Text")]
    pub college: String,

    #[sea_orm(column_type = "Text")]
    pub department: String,

    /// Only approved professors show up in search results
    pub is_approved: bool,

    /// Duplicate submissions received while pending
    pub request_count: i32,

    /// Profile view counter, incremented fire-and-forget
    pub views: i64,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::university::Entity",
        from = "Column::UniversityId",
        to = "super::university::Column::Id"
    )]
    University,

    #[sea_orm(has_many = "super::review::Entity", on_delete = "Cascade")]
    Reviews,
}

impl Related<super::university::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::University.def()
    }
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
