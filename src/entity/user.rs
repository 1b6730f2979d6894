use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum Role {
  #[sea_orm(string_value = "user")]
  #[default]
  User,
  /// Instructor scoped to their own courses.
  #[sea_orm(string_value = "test_admin")]
  TestAdmin,
  #[sea_orm(string_value = "admin")]
  Admin,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum Status {
  #[sea_orm(string_value = "active")]
  #[default]
  Active,
  #[sea_orm(string_value = "suspended")]
  Suspended,
  #[sea_orm(string_value = "banned")]
  Banned,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  pub name: String,
  #[sea_orm(unique)]
  pub email: String,
  /// argon2 PHC string
  #[serde(skip_serializing)]
  pub password: String,
  pub role: Role,
  pub status: Status,
  pub bio: Option<String>,
  pub teaching_categories: Option<String>,
  pub profile_image: Option<String>,
  pub profile_banner: Option<String>,
  #[serde(skip_serializing)]
  pub reset_password_token: Option<String>,
  #[serde(skip_serializing)]
  pub reset_password_expires: Option<DateTime>,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(has_many = "super::course::Entity")]
  Courses,
  #[sea_orm(has_many = "super::enrollment::Entity")]
  Enrollments,
  #[sea_orm(has_many = "super::rating::Entity")]
  Ratings,
}

impl Related<super::course::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Courses.def()
  }
}

impl Related<super::enrollment::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Enrollments.def()
  }
}

impl Related<super::rating::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Ratings.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
