use sea_orm_migration::prelude::*;

use super::{
  m20251101_000001_create_users::Users,
  m20251101_000003_create_courses::Courses,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(CourseRatings::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(CourseRatings::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(CourseRatings::CourseId).integer().not_null())
          .col(ColumnDef::new(CourseRatings::UserId).integer().not_null())
          .col(ColumnDef::new(CourseRatings::Rating).integer().not_null())
          .col(ColumnDef::new(CourseRatings::Review).text().null())
          .col(ColumnDef::new(CourseRatings::CreatedAt).date_time().not_null())
          .col(ColumnDef::new(CourseRatings::UpdatedAt).date_time().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_ratings_course")
              .from(CourseRatings::Table, CourseRatings::CourseId)
              .to(Courses::Table, Courses::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_ratings_user")
              .from(CourseRatings::Table, CourseRatings::UserId)
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_ratings_user_course")
          .table(CourseRatings::Table)
          .col(CourseRatings::UserId)
          .col(CourseRatings::CourseId)
          .unique()
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(CourseRatings::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum CourseRatings {
  Table,
  Id,
  CourseId,
  UserId,
  Rating,
  Review,
  CreatedAt,
  UpdatedAt,
}
