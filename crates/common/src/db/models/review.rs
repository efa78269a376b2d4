//! Review entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reviews")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub professor_id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub content: String,

    /// Overall rating, 1-5
    pub rating: i16,

    /// Letter grade the student received (closed list, incl. "محتسب")
    #[sea_orm(column_type = "Text", nullable)]
    pub grade: Option<String>,

    /// Free-text course name; trimmed but not otherwise normalized
    #[sea_orm(column_type = "Text", nullable)]
    pub course: Option<String>,

    /// Sub-ratings, 1-5 or 0 when the student skipped them
    pub attendance_rating: i16,
    pub teaching_rating: i16,
    pub behavior_rating: i16,
    pub grading_rating: i16,

    /// Closed-vocabulary tags as a JSONB string array
    #[sea_orm(column_type = "JsonBinary")]
    pub tags: serde_json::Value,

    pub likes: i64,

    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Tags as a string vector; tolerates malformed stored values
    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::professor::Entity",
        from = "Column::ProfessorId",
        to = "super::professor::Column::Id"
    )]
    Professor,

    #[sea_orm(has_many = "super::reply::Entity", on_delete = "Cascade")]
    Replies,
}

impl Related<super::professor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Professor.def()
    }
}

impl Related<super::reply::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Replies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
