//! Fixtures shared by the service and HTTP tests

use migration::{Migrator, MigratorTrait};
use uuid::Uuid;

use crate::{
  access::Actor,
  entity::{
    CourseStatus, Level, PaymentStatus, Role, Status, course, enrollment,
    lesson, section, user,
  },
  prelude::*,
};

pub async fn setup_test_db() -> DatabaseConnection {
  let db = Database::connect("sqlite::memory:").await.unwrap();
  Migrator::up(&db, None).await.unwrap();
  db
}

pub fn email_of(name: &str) -> String {
  format!("{}@test.io", name.to_lowercase().replace(' ', "."))
}

pub async fn user(db: &DatabaseConnection, name: &str, role: Role) -> user::Model {
  user::ActiveModel {
    name: Set(name.to_string()),
    email: Set(email_of(name)),
    password: Set(String::new()),
    role: Set(role),
    status: Set(Status::Active),
    created_at: Set(now()),
    ..Default::default()
  }
  .insert(db)
  .await
  .unwrap()
}

pub async fn actor(db: &DatabaseConnection, name: &str, role: Role) -> Actor {
  user(db, name, role).await.into()
}

pub async fn course(
  db: &DatabaseConnection,
  instructor_id: i32,
  price: i64,
) -> course::Model {
  course::ActiveModel {
    title: Set(format!("Course {price}")),
    slug: Set(Uuid::new_v4().to_string()),
    description: Set("About".into()),
    instructor_id: Set(instructor_id),
    price: Set(price),
    is_free: Set(price == 0),
    duration: Set(60),
    level: Set(Level::Beginner),
    status: Set(CourseStatus::Published),
    created_at: Set(now()),
    ..Default::default()
  }
  .insert(db)
  .await
  .unwrap()
}

/// One section holding `n` lessons, in order.
pub async fn lessons(
  db: &DatabaseConnection,
  course_id: i32,
  n: usize,
) -> Vec<lesson::Model> {
  let section = section::ActiveModel {
    course_id: Set(course_id),
    title: Set("Intro".into()),
    order_number: Set(1),
    ..Default::default()
  }
  .insert(db)
  .await
  .unwrap();

  let mut lessons = Vec::with_capacity(n);
  for i in 0..n {
    let lesson = lesson::ActiveModel {
      section_id: Set(section.id),
      course_id: Set(course_id),
      title: Set(format!("Lesson {}", i + 1)),
      duration: Set(10),
      order_number: Set(i as i32 + 1),
      is_free_preview: Set(false),
      ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();
    lessons.push(lesson);
  }
  lessons
}

pub async fn enroll(db: &DatabaseConnection, user_id: i32, course_id: i32) {
  enrollment::ActiveModel {
    user_id: Set(user_id),
    course_id: Set(course_id),
    payment_status: Set(PaymentStatus::Paid),
    payment_amount: Set(0),
    enrolled_at: Set(now()),
    ..Default::default()
  }
  .insert(db)
  .await
  .unwrap();
}
