use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Users::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Users::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(Users::Name).string().not_null())
          .col(ColumnDef::new(Users::Email).string().not_null())
          .col(ColumnDef::new(Users::Password).string().not_null())
          .col(ColumnDef::new(Users::Role).string().not_null().default("user"))
          .col(
            ColumnDef::new(Users::Status).string().not_null().default("active"),
          )
          .col(ColumnDef::new(Users::Bio).text().null())
          .col(ColumnDef::new(Users::TeachingCategories).string().null())
          .col(ColumnDef::new(Users::ProfileImage).string().null())
          .col(ColumnDef::new(Users::ProfileBanner).string().null())
          .col(ColumnDef::new(Users::ResetPasswordToken).string().null())
          .col(ColumnDef::new(Users::ResetPasswordExpires).date_time().null())
          .col(ColumnDef::new(Users::CreatedAt).date_time().not_null())
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_users_email")
          .table(Users::Table)
          .col(Users::Email)
          .unique()
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(Users::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Users {
  Table,
  Id,
  Name,
  Email,
  Password,
  Role,
  Status,
  Bio,
  TeachingCategories,
  ProfileImage,
  ProfileBanner,
  ResetPasswordToken,
  ResetPasswordExpires,
  CreatedAt,
}
