//! SeaORM entity models
//!
//! Database entities for Morshed

mod professor;
mod reply;
mod review;
mod university;

pub use professor::{
    Entity as ProfessorEntity,
    Model as Professor,
    ActiveModel as ProfessorActiveModel,
    Column as ProfessorColumn,
};

pub use review::{
    Entity as ReviewEntity,
    Model as Review,
    ActiveModel as ReviewActiveModel,
    Column as ReviewColumn,
};

pub use reply::{
    Entity as ReplyEntity,
    Model as Reply,
    ActiveModel as ReplyActiveModel,
    Column as ReplyColumn,
};

pub use university::{
    Entity as UniversityEntity,
    Model as University,
    ActiveModel as UniversityActiveModel,
    Column as UniversityColumn,
};
