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
          .table(CourseDiscounts::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(CourseDiscounts::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(CourseDiscounts::CourseId).integer().not_null())
          .col(
            ColumnDef::new(CourseDiscounts::DiscountPercent).integer().not_null(),
          )
          .col(ColumnDef::new(CourseDiscounts::StartDate).date_time().not_null())
          .col(ColumnDef::new(CourseDiscounts::EndDate).date_time().not_null())
          .col(
            ColumnDef::new(CourseDiscounts::IsActive)
              .boolean()
              .not_null()
              .default(true),
          )
          .col(ColumnDef::new(CourseDiscounts::CreatedBy).integer().not_null())
          .col(ColumnDef::new(CourseDiscounts::CreatedAt).date_time().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_discounts_course")
              .from(CourseDiscounts::Table, CourseDiscounts::CourseId)
              .to(Courses::Table, Courses::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_discounts_creator")
              .from(CourseDiscounts::Table, CourseDiscounts::CreatedBy)
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_discounts_course_active")
          .table(CourseDiscounts::Table)
          .col(CourseDiscounts::CourseId)
          .col(CourseDiscounts::IsActive)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(CourseDiscounts::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum CourseDiscounts {
  Table,
  Id,
  CourseId,
  DiscountPercent,
  StartDate,
  EndDate,
  IsActive,
  CreatedBy,
  CreatedAt,
}
