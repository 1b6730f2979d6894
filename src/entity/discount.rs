//! CourseDiscount entity - time-bounded percentage discount on a course

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "course_discounts")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  pub course_id: i32,
  pub discount_percent: i32,
  pub start_date: DateTime,
  pub end_date: DateTime,
  pub is_active: bool,
  pub created_by: i32,
  pub created_at: DateTime,
}

impl Model {
  /// Active flag set and `at` inside `[start_date, end_date]`.
  pub fn is_live(&self, at: DateTime) -> bool {
    self.is_active && self.start_date <= at && at <= self.end_date
  }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "super::course::Entity",
    from = "Column::CourseId",
    to = "super::course::Column::Id"
  )]
  Course,
  #[sea_orm(
    belongs_to = "super::user::Entity",
    from = "Column::CreatedBy",
    to = "super::user::Column::Id"
  )]
  Creator,
}

impl Related<super::course::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Course.def()
  }
}

impl Related<super::user::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Creator.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
