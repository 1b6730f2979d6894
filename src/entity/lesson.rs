use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lessons")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  pub section_id: i32,
  /// Denormalized from the section for progress counting
  pub course_id: i32,
  pub title: String,
  pub description: Option<String>,
  pub video_url: Option<String>,
  pub duration: i32,
  pub order_number: i32,
  pub is_free_preview: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "super::section::Entity",
    from = "Column::SectionId",
    to = "super::section::Column::Id"
  )]
  Section,
  #[sea_orm(
    belongs_to = "super::course::Entity",
    from = "Column::CourseId",
    to = "super::course::Column::Id"
  )]
  Course,
}

impl Related<super::section::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Section.def()
  }
}

impl Related<super::course::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Course.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
