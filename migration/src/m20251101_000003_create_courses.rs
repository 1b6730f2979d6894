use sea_orm_migration::prelude::*;

use super::{
  m20251101_000001_create_users::Users,
  m20251101_000002_create_categories::Categories,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Courses::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Courses::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(Courses::Title).string().not_null())
          .col(ColumnDef::new(Courses::Slug).string().not_null())
          .col(ColumnDef::new(Courses::Description).text().not_null())
          .col(ColumnDef::new(Courses::FullDescription).text().null())
          .col(ColumnDef::new(Courses::Thumbnail).string().null())
          .col(ColumnDef::new(Courses::PreviewVideoUrl).string().null())
          .col(ColumnDef::new(Courses::CategoryId).integer().null())
          .col(ColumnDef::new(Courses::InstructorId).integer().not_null())
          .col(
            ColumnDef::new(Courses::Price).big_integer().not_null().default(0),
          )
          .col(
            ColumnDef::new(Courses::IsFree).boolean().not_null().default(false),
          )
          .col(ColumnDef::new(Courses::Duration).integer().not_null().default(0))
          .col(
            ColumnDef::new(Courses::Level)
              .string()
              .not_null()
              .default("beginner"),
          )
          .col(
            ColumnDef::new(Courses::Status).string().not_null().default("draft"),
          )
          .col(ColumnDef::new(Courses::CreatedAt).date_time().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_courses_category")
              .from(Courses::Table, Courses::CategoryId)
              .to(Categories::Table, Categories::Id)
              .on_delete(ForeignKeyAction::SetNull),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_courses_instructor")
              .from(Courses::Table, Courses::InstructorId)
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_courses_slug")
          .table(Courses::Table)
          .col(Courses::Slug)
          .unique()
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_courses_instructor")
          .table(Courses::Table)
          .col(Courses::InstructorId)
          .to_owned(),
      )
      .await?;

    manager
      .create_table(
        Table::create()
          .table(CourseSections::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(CourseSections::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(CourseSections::CourseId).integer().not_null())
          .col(ColumnDef::new(CourseSections::Title).string().not_null())
          .col(ColumnDef::new(CourseSections::Description).text().null())
          .col(
            ColumnDef::new(CourseSections::OrderNumber)
              .integer()
              .not_null()
              .default(0),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_sections_course")
              .from(CourseSections::Table, CourseSections::CourseId)
              .to(Courses::Table, Courses::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_table(
        Table::create()
          .table(Lessons::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Lessons::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(Lessons::SectionId).integer().not_null())
          .col(ColumnDef::new(Lessons::CourseId).integer().not_null())
          .col(ColumnDef::new(Lessons::Title).string().not_null())
          .col(ColumnDef::new(Lessons::Description).text().null())
          .col(ColumnDef::new(Lessons::VideoUrl).string().null())
          .col(ColumnDef::new(Lessons::Duration).integer().not_null().default(0))
          .col(
            ColumnDef::new(Lessons::OrderNumber).integer().not_null().default(0),
          )
          .col(
            ColumnDef::new(Lessons::IsFreePreview)
              .boolean()
              .not_null()
              .default(false),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_lessons_section")
              .from(Lessons::Table, Lessons::SectionId)
              .to(CourseSections::Table, CourseSections::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_lessons_course")
              .from(Lessons::Table, Lessons::CourseId)
              .to(Courses::Table, Courses::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_lessons_course")
          .table(Lessons::Table)
          .col(Lessons::CourseId)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(Lessons::Table).to_owned()).await?;
    manager
      .drop_table(Table::drop().table(CourseSections::Table).to_owned())
      .await?;
    manager.drop_table(Table::drop().table(Courses::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Courses {
  Table,
  Id,
  Title,
  Slug,
  Description,
  FullDescription,
  Thumbnail,
  PreviewVideoUrl,
  CategoryId,
  InstructorId,
  Price,
  IsFree,
  Duration,
  Level,
  Status,
  CreatedAt,
}

#[derive(DeriveIden)]
pub enum CourseSections {
  Table,
  Id,
  CourseId,
  Title,
  Description,
  OrderNumber,
}

#[derive(DeriveIden)]
pub enum Lessons {
  Table,
  Id,
  SectionId,
  CourseId,
  Title,
  Description,
  VideoUrl,
  Duration,
  OrderNumber,
  IsFreePreview,
}
