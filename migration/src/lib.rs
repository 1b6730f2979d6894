//! Database migrations using SeaORM

pub use sea_orm_migration::prelude::*;

mod m20251101_000001_create_users;
mod m20251101_000002_create_categories;
mod m20251101_000003_create_courses;
mod m20251101_000004_create_enrollments;
mod m20251101_000005_create_course_discounts;
mod m20251101_000006_create_course_ratings;
mod m20251101_000007_create_admin_logs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
  fn migrations() -> Vec<Box<dyn MigrationTrait>> {
    vec![
      Box::new(m20251101_000001_create_users::Migration),
      Box::new(m20251101_000002_create_categories::Migration),
      Box::new(m20251101_000003_create_courses::Migration),
      Box::new(m20251101_000004_create_enrollments::Migration),
      Box::new(m20251101_000005_create_course_discounts::Migration),
      Box::new(m20251101_000006_create_course_ratings::Migration),
      Box::new(m20251101_000007_create_admin_logs::Migration),
    ]
  }
}
