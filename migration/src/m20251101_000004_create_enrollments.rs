use sea_orm_migration::prelude::*;

use super::{
  m20251101_000001_create_users::Users,
  m20251101_000003_create_courses::{Courses, Lessons},
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Enrollments::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Enrollments::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(Enrollments::UserId).integer().not_null())
          .col(ColumnDef::new(Enrollments::CourseId).integer().not_null())
          .col(ColumnDef::new(Enrollments::PaymentStatus).string().not_null())
          .col(
            ColumnDef::new(Enrollments::PaymentAmount)
              .big_integer()
              .not_null()
              .default(0),
          )
          .col(ColumnDef::new(Enrollments::EnrolledAt).date_time().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_enrollments_user")
              .from(Enrollments::Table, Enrollments::UserId)
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_enrollments_course")
              .from(Enrollments::Table, Enrollments::CourseId)
              .to(Courses::Table, Courses::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_enrollments_user_course")
          .table(Enrollments::Table)
          .col(Enrollments::UserId)
          .col(Enrollments::CourseId)
          .unique()
          .to_owned(),
      )
      .await?;

    manager
      .create_table(
        Table::create()
          .table(LessonProgress::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(LessonProgress::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(LessonProgress::UserId).integer().not_null())
          .col(ColumnDef::new(LessonProgress::LessonId).integer().not_null())
          .col(ColumnDef::new(LessonProgress::CourseId).integer().not_null())
          .col(
            ColumnDef::new(LessonProgress::IsCompleted)
              .boolean()
              .not_null()
              .default(false),
          )
          .col(ColumnDef::new(LessonProgress::CompletedAt).date_time().null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_progress_user")
              .from(LessonProgress::Table, LessonProgress::UserId)
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_progress_lesson")
              .from(LessonProgress::Table, LessonProgress::LessonId)
              .to(Lessons::Table, Lessons::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_progress_course")
              .from(LessonProgress::Table, LessonProgress::CourseId)
              .to(Courses::Table, Courses::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_progress_user_lesson")
          .table(LessonProgress::Table)
          .col(LessonProgress::UserId)
          .col(LessonProgress::LessonId)
          .unique()
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(LessonProgress::Table).to_owned())
      .await?;
    manager.drop_table(Table::drop().table(Enrollments::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Enrollments {
  Table,
  Id,
  UserId,
  CourseId,
  PaymentStatus,
  PaymentAmount,
  EnrolledAt,
}

#[derive(DeriveIden)]
pub enum LessonProgress {
  Table,
  Id,
  UserId,
  LessonId,
  CourseId,
  IsCompleted,
  CompletedAt,
}
