//! Course entity - catalog item owned by one instructor

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum CourseStatus {
  #[sea_orm(string_value = "draft")]
  #[default]
  Draft,
  #[sea_orm(string_value = "published")]
  Published,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum Level {
  #[sea_orm(string_value = "beginner")]
  #[default]
  Beginner,
  #[sea_orm(string_value = "intermediate")]
  Intermediate,
  #[sea_orm(string_value = "advanced")]
  Advanced,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  pub title: String,
  #[sea_orm(unique)]
  pub slug: String,
  pub description: String,
  pub full_description: Option<String>,
  pub thumbnail: Option<String>,
  pub preview_video_url: Option<String>,
  pub category_id: Option<i32>,
  pub instructor_id: i32,
  /// Listed price in whole currency units
  pub price: i64,
  pub is_free: bool,
  /// Minutes
  pub duration: i32,
  pub level: Level,
  pub status: CourseStatus,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "super::user::Entity",
    from = "Column::InstructorId",
    to = "super::user::Column::Id"
  )]
  Instructor,
  #[sea_orm(
    belongs_to = "super::category::Entity",
    from = "Column::CategoryId",
    to = "super::category::Column::Id"
  )]
  Category,
  #[sea_orm(has_many = "super::section::Entity")]
  Sections,
  #[sea_orm(has_many = "super::lesson::Entity")]
  Lessons,
  #[sea_orm(has_many = "super::enrollment::Entity")]
  Enrollments,
  #[sea_orm(has_many = "super::discount::Entity")]
  Discounts,
}

impl Related<super::user::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Instructor.def()
  }
}

impl Related<super::category::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Category.def()
  }
}

impl Related<super::section::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Sections.def()
  }
}

impl Related<super::lesson::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Lessons.def()
  }
}

impl Related<super::enrollment::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Enrollments.def()
  }
}

impl Related<super::discount::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Discounts.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
