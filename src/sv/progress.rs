use sea_orm::sea_query::{Expr, OnConflict};
use serde::Serialize;

use crate::{
  entity::{lesson, progress, section},
  prelude::*,
  sv,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
  pub course_id: i32,
  pub progress: u8,
  pub completed_lessons: u64,
  pub total_lessons: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marked {
  pub lesson_id: i32,
  pub is_completed: bool,
  #[serde(flatten)]
  pub summary: Summary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonState {
  pub id: i32,
  pub section_id: i32,
  pub title: String,
  pub order_number: i32,
  pub is_completed: bool,
  pub completed_at: Option<DateTime>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgress {
  #[serde(flatten)]
  pub summary: Summary,
  pub lessons: Vec<LessonState>,
}

pub struct Progress<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Progress<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Always derived from counts, never stored.
  pub async fn summary(&self, user_id: i32, course_id: i32) -> Result<Summary> {
    let total = lesson::Entity::find()
      .filter(lesson::Column::CourseId.eq(course_id))
      .count(self.db)
      .await?;
    let completed = progress::Entity::find()
      .filter(progress::Column::UserId.eq(user_id))
      .filter(progress::Column::CourseId.eq(course_id))
      .filter(progress::Column::IsCompleted.eq(true))
      .count(self.db)
      .await?;

    Ok(Summary {
      course_id,
      progress: utils::percentage(completed, total),
      completed_lessons: completed,
      total_lessons: total,
    })
  }

  async fn enrolled_lesson(&self, user_id: i32, lesson_id: i32) -> Result<lesson::Model> {
    let lesson = lesson::Entity::find_by_id(lesson_id)
      .one(self.db)
      .await?
      .ok_or(Error::NotFound("Lesson"))?;
    sv::Enrollment::new(self.db).ensure_enrolled(user_id, lesson.course_id).await?;
    Ok(lesson)
  }

  pub async fn mark(&self, user_id: i32, lesson_id: i32) -> Result<Marked> {
    let lesson = self.enrolled_lesson(user_id, lesson_id).await?;

    let model = progress::ActiveModel {
      user_id: Set(user_id),
      lesson_id: Set(lesson.id),
      course_id: Set(lesson.course_id),
      is_completed: Set(true),
      completed_at: Set(Some(now())),
      ..Default::default()
    };
    progress::Entity::insert(model)
      .on_conflict(
        OnConflict::columns([progress::Column::UserId, progress::Column::LessonId])
          .update_columns([progress::Column::IsCompleted, progress::Column::CompletedAt])
          .to_owned(),
      )
      .exec_without_returning(self.db)
      .await?;

    let summary = self.summary(user_id, lesson.course_id).await?;
    debug!(user = user_id, lesson = lesson.id, progress = summary.progress, "Lesson completed");
    Ok(Marked { lesson_id: lesson.id, is_completed: true, summary })
  }

  pub async fn unmark(&self, user_id: i32, lesson_id: i32) -> Result<Marked> {
    let lesson = self.enrolled_lesson(user_id, lesson_id).await?;

    progress::Entity::update_many()
      .col_expr(progress::Column::IsCompleted, Expr::value(false))
      .col_expr(progress::Column::CompletedAt, Expr::value(Option::<DateTime>::None))
      .filter(progress::Column::UserId.eq(user_id))
      .filter(progress::Column::LessonId.eq(lesson.id))
      .exec(self.db)
      .await?;

    let summary = self.summary(user_id, lesson.course_id).await?;
    debug!(user = user_id, lesson = lesson.id, progress = summary.progress, "Lesson reopened");
    Ok(Marked { lesson_id: lesson.id, is_completed: false, summary })
  }

  /// Per-lesson state in outline order: section order, then lesson order.
  pub async fn course(&self, user_id: i32, course_id: i32) -> Result<CourseProgress> {
    sv::Enrollment::new(self.db).ensure_enrolled(user_id, course_id).await?;

    let lessons = lesson::Entity::find()
      .filter(lesson::Column::CourseId.eq(course_id))
      .inner_join(section::Entity)
      .order_by_asc(section::Column::OrderNumber)
      .order_by_asc(lesson::Column::SectionId)
      .order_by_asc(lesson::Column::OrderNumber)
      .order_by_asc(lesson::Column::Id)
      .all(self.db)
      .await?;

    let mut done: HashMap<i32, progress::Model> = progress::Entity::find()
      .filter(progress::Column::UserId.eq(user_id))
      .filter(progress::Column::CourseId.eq(course_id))
      .all(self.db)
      .await?
      .into_iter()
      .map(|p| (p.lesson_id, p))
      .collect();

    let lessons: Vec<LessonState> = lessons
      .into_iter()
      .map(|lesson| {
        let state = done.remove(&lesson.id);
        LessonState {
          id: lesson.id,
          section_id: lesson.section_id,
          title: lesson.title,
          order_number: lesson.order_number,
          is_completed: state.as_ref().is_some_and(|p| p.is_completed),
          completed_at: state.and_then(|p| p.completed_at),
        }
      })
      .collect();

    let total = lessons.len() as u64;
    let completed = lessons.iter().filter(|l| l.is_completed).count() as u64;
    Ok(CourseProgress {
      summary: Summary {
        course_id,
        progress: utils::percentage(completed, total),
        completed_lessons: completed,
        total_lessons: total,
      },
      lessons,
    })
  }
}
