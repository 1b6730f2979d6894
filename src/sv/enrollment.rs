use std::collections::HashSet;

use sea_orm::sea_query::OnConflict;
use serde::Serialize;

use crate::{
  access::{Actor, Capability},
  entity::{CourseStatus, PaymentStatus, course, enrollment, lesson, progress, user},
  prelude::*,
  sv::{self, course::CourseCard},
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MyCourse {
  #[serde(flatten)]
  pub course: CourseCard,
  pub enrolled_at: DateTime,
  pub payment_status: PaymentStatus,
  /// What the learner paid at enroll time.
  pub paid_amount: i64,
  pub progress: u8,
  pub completed_lessons: u64,
  pub total_lessons: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRow {
  pub id: i32,
  pub name: String,
  pub email: String,
  pub enrolled_at: DateTime,
  pub course_id: i32,
  pub course_title: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Students {
  pub data: Vec<StudentRow>,
  pub total_courses: u64,
  pub total_students: usize,
}

pub struct Enrollment<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Enrollment<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn is_enrolled(&self, user_id: i32, course_id: i32) -> Result<bool> {
    let found = enrollment::Entity::find()
      .filter(enrollment::Column::UserId.eq(user_id))
      .filter(enrollment::Column::CourseId.eq(course_id))
      .count(self.db)
      .await?;
    Ok(found > 0)
  }

  pub async fn ensure_enrolled(&self, user_id: i32, course_id: i32) -> Result<()> {
    if self.is_enrolled(user_id, course_id).await? {
      Ok(())
    } else {
      Err(Error::Forbidden("You are not enrolled in this course"))
    }
  }

  /// Records the effective price at this moment, discount included. There is
  /// no payment step.
  pub async fn enroll(&self, user_id: i32, course_id: i32) -> Result<enrollment::Model> {
    let course = course::Entity::find_by_id(course_id)
      .filter(course::Column::Status.eq(CourseStatus::Published))
      .one(self.db)
      .await?
      .ok_or(Error::NotFound("Course"))?;

    let (payment_status, payment_amount) = if course.is_free {
      (PaymentStatus::Free, 0)
    } else {
      let discount = sv::Discount::new(self.db).live_for(&[course.id]).await?.remove(&course.id);
      let amount = discount
        .map_or(course.price, |d| utils::discount_price(course.price, d.discount_percent));
      (PaymentStatus::Paid, amount)
    };

    let model = enrollment::ActiveModel {
      user_id: Set(user_id),
      course_id: Set(course.id),
      payment_status: Set(payment_status),
      payment_amount: Set(payment_amount),
      enrolled_at: Set(now()),
      ..Default::default()
    };

    let inserted = enrollment::Entity::insert(model)
      .on_conflict(
        OnConflict::columns([enrollment::Column::UserId, enrollment::Column::CourseId])
          .do_nothing()
          .to_owned(),
      )
      .exec_without_returning(self.db)
      .await?;
    if inserted == 0 {
      return Err(Error::Conflict("Already enrolled in this course"));
    }

    info!(user = user_id, course = course.id, amount = payment_amount, "Enrolled");

    enrollment::Entity::find()
      .filter(enrollment::Column::UserId.eq(user_id))
      .filter(enrollment::Column::CourseId.eq(course.id))
      .one(self.db)
      .await?
      .ok_or(Error::NotFound("Enrollment"))
  }

  /// Newest enrollment first.
  pub async fn my_courses(&self, user_id: i32) -> Result<Vec<MyCourse>> {
    let rows = enrollment::Entity::find()
      .filter(enrollment::Column::UserId.eq(user_id))
      .find_also_related(course::Entity)
      .order_by_desc(enrollment::Column::EnrolledAt)
      .order_by_desc(enrollment::Column::Id)
      .all(self.db)
      .await?;

    let (enrollments, courses): (Vec<_>, Vec<_>) = rows
      .into_iter()
      .filter_map(|(enrollment, course)| course.map(|c| (enrollment, c)))
      .unzip();
    let ids: Vec<i32> = courses.iter().map(|c| c.id).collect();

    let totals = sv::count_by(
      self.db,
      lesson::Entity::find().filter(lesson::Column::CourseId.is_in(ids.clone())),
      lesson::Column::CourseId,
    )
    .await?;
    let completed = sv::count_by(
      self.db,
      progress::Entity::find()
        .filter(progress::Column::UserId.eq(user_id))
        .filter(progress::Column::IsCompleted.eq(true))
        .filter(progress::Column::CourseId.is_in(ids)),
      progress::Column::CourseId,
    )
    .await?;

    let cards = sv::Course::new(self.db).cards(courses).await?;
    Ok(
      enrollments
        .into_iter()
        .zip(cards)
        .map(|(enrollment, card)| {
          let total = totals.get(&card.id).copied().unwrap_or(0);
          let done = completed.get(&card.id).copied().unwrap_or(0);
          MyCourse {
            course: card,
            enrolled_at: enrollment.enrolled_at,
            payment_status: enrollment.payment_status,
            paid_amount: enrollment.payment_amount,
            progress: utils::percentage(done, total),
            completed_lessons: done,
            total_lessons: total,
          }
        })
        .collect(),
    )
  }

  /// Everyone enrolled in the actor's own courses, latest enrollment first.
  pub async fn my_students(&self, actor: &Actor) -> Result<Students> {
    actor.ensure(Capability::Teach)?;

    let courses: HashMap<i32, String> = course::Entity::find()
      .filter(course::Column::InstructorId.eq(actor.id))
      .all(self.db)
      .await?
      .into_iter()
      .map(|c| (c.id, c.title))
      .collect();

    let rows = enrollment::Entity::find()
      .filter(enrollment::Column::CourseId.is_in(courses.keys().copied()))
      .find_also_related(user::Entity)
      .order_by_desc(enrollment::Column::EnrolledAt)
      .order_by_desc(enrollment::Column::Id)
      .all(self.db)
      .await?;

    let data: Vec<StudentRow> = rows
      .into_iter()
      .filter_map(|(enrollment, student)| {
        let student = student?;
        Some(StudentRow {
          id: student.id,
          name: student.name,
          email: student.email,
          enrolled_at: enrollment.enrolled_at,
          course_id: enrollment.course_id,
          course_title: courses.get(&enrollment.course_id).cloned().unwrap_or_default(),
        })
      })
      .collect();

    let total_students = data.iter().map(|s| s.id).collect::<HashSet<_>>().len();
    Ok(Students { total_courses: courses.len() as u64, total_students, data })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    entity::{Role, discount},
    testing,
  };

  #[tokio::test]
  async fn test_enroll_once() {
    let db = testing::setup_test_db().await;
    let tutor = testing::user(&db, "Tutor", Role::TestAdmin).await;
    let learner = testing::user(&db, "Learner", Role::User).await;
    let course = testing::course(&db, tutor.id, 45_000).await;
    let sv = Enrollment::new(&db);

    let enrollment = sv.enroll(learner.id, course.id).await.unwrap();
    assert_eq!(enrollment.payment_status, PaymentStatus::Paid);
    assert_eq!(enrollment.payment_amount, 45_000);
    assert!(sv.is_enrolled(learner.id, course.id).await.unwrap());

    assert!(matches!(sv.enroll(learner.id, course.id).await, Err(Error::Conflict(_))));
    assert!(matches!(sv.enroll(learner.id, 999).await, Err(Error::NotFound(_))));
  }

  #[tokio::test]
  async fn test_enroll_free_and_draft() {
    let db = testing::setup_test_db().await;
    let tutor = testing::user(&db, "Tutor", Role::TestAdmin).await;
    let learner = testing::user(&db, "Learner", Role::User).await;
    let free = testing::course(&db, tutor.id, 0).await;
    let draft = testing::course(&db, tutor.id, 100).await;
    course::ActiveModel { status: Set(CourseStatus::Draft), ..draft.clone().into() }
      .update(&db)
      .await
      .unwrap();
    let sv = Enrollment::new(&db);

    let enrollment = sv.enroll(learner.id, free.id).await.unwrap();
    assert_eq!(enrollment.payment_status, PaymentStatus::Free);
    assert_eq!(enrollment.payment_amount, 0);

    assert!(matches!(sv.enroll(learner.id, draft.id).await, Err(Error::NotFound(_))));
  }

  #[tokio::test]
  async fn test_enroll_snapshots_discount() {
    let db = testing::setup_test_db().await;
    let tutor = testing::user(&db, "Tutor", Role::TestAdmin).await;
    let learner = testing::user(&db, "Learner", Role::User).await;
    let course = testing::course(&db, tutor.id, 100_000).await;
    let lessons = testing::lessons(&db, course.id, 4).await;

    discount::ActiveModel {
      course_id: Set(course.id),
      discount_percent: Set(50),
      start_date: Set(now() - TimeDelta::minutes(1)),
      end_date: Set(now() + TimeDelta::days(1)),
      is_active: Set(true),
      created_by: Set(tutor.id),
      created_at: Set(now()),
      ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    let sv = Enrollment::new(&db);
    assert_eq!(sv.enroll(learner.id, course.id).await.unwrap().payment_amount, 50_000);

    for lesson in &lessons[..3] {
      sv::Progress::new(&db).mark(learner.id, lesson.id).await.unwrap();
    }

    let mine = sv.my_courses(learner.id).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].paid_amount, 50_000);
    assert_eq!(mine[0].course.discount_price, Some(50_000));
    assert_eq!(mine[0].progress, 75);
    assert_eq!((mine[0].completed_lessons, mine[0].total_lessons), (3, 4));
  }

  #[tokio::test]
  async fn test_my_students() {
    let db = testing::setup_test_db().await;
    let tutor = testing::actor(&db, "Tutor", Role::TestAdmin).await;
    let other = testing::user(&db, "Other", Role::TestAdmin).await;
    let a = testing::course(&db, tutor.id, 10).await;
    let b = testing::course(&db, tutor.id, 20).await;
    let foreign = testing::course(&db, other.id, 30).await;

    let ann = testing::user(&db, "Ann", Role::User).await;
    let bob = testing::user(&db, "Bob", Role::User).await;
    testing::enroll(&db, ann.id, a.id).await;
    testing::enroll(&db, ann.id, b.id).await;
    testing::enroll(&db, bob.id, foreign.id).await;

    let students = Enrollment::new(&db).my_students(&tutor).await.unwrap();
    assert_eq!(students.data.len(), 2);
    assert_eq!(students.total_courses, 2);
    assert_eq!(students.total_students, 1);

    let learner = testing::actor(&db, "Learner", Role::User).await;
    assert!(matches!(
      Enrollment::new(&db).my_students(&learner).await,
      Err(Error::Forbidden(_))
    ));
  }
}
