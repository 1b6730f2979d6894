//! AdminLog entity - audit trail of privileged actions

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "admin_logs")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  pub admin_id: i32,
  pub action: String,
  pub target_type: String,
  pub target_id: i32,
  pub details: Option<String>,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "super::user::Entity",
    from = "Column::AdminId",
    to = "super::user::Column::Id"
  )]
  Admin,
}

impl Related<super::user::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Admin.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
