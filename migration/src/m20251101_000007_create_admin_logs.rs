use sea_orm_migration::prelude::*;

use super::m20251101_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(AdminLogs::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(AdminLogs::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(AdminLogs::AdminId).integer().not_null())
          .col(ColumnDef::new(AdminLogs::Action).string().not_null())
          .col(ColumnDef::new(AdminLogs::TargetType).string().not_null())
          .col(ColumnDef::new(AdminLogs::TargetId).integer().not_null())
          .col(ColumnDef::new(AdminLogs::Details).text().null())
          .col(ColumnDef::new(AdminLogs::CreatedAt).date_time().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_admin_logs_admin")
              .from(AdminLogs::Table, AdminLogs::AdminId)
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_admin_logs_created")
          .table(AdminLogs::Table)
          .col(AdminLogs::CreatedAt)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(AdminLogs::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum AdminLogs {
  Table,
  Id,
  AdminId,
  Action,
  TargetType,
  TargetId,
  Details,
  CreatedAt,
}
