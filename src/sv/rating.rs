use sea_orm::sea_query::{Expr, Func, OnConflict, SimpleExpr};
use serde::{Deserialize, Serialize};

use crate::{
  entity::{rating, user},
  prelude::*,
  sv,
};

/// Progress a learner needs before rating a course.
pub const RATING_THRESHOLD: u8 = 80;

#[derive(Debug, Default, Deserialize)]
pub struct RatingForm {
  pub rating: Option<i32>,
  pub review: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
  Created,
  Updated,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
  /// Rounded to one decimal.
  pub average: f64,
  pub count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingRow {
  pub id: i32,
  pub rating: i32,
  pub review: Option<String>,
  pub user_name: String,
  pub created_at: DateTime,
  pub updated_at: DateTime,
}

fn round1(value: f64) -> f64 {
  (value * 10.0).round() / 10.0
}

fn average() -> SimpleExpr {
  SimpleExpr::from(Func::avg(Expr::col((rating::Entity, rating::Column::Rating))))
}

/// Average and count of ratings per course, restricted to `courses` if given.
pub(crate) async fn summary(
  db: &impl ConnectionTrait,
  courses: Option<&[i32]>,
) -> Result<HashMap<i32, Summary>> {
  let mut query = rating::Entity::find()
    .select_only()
    .column(rating::Column::CourseId)
    .column_as(average(), "average")
    .column_as(Expr::col((rating::Entity, rating::Column::Id)).count(), "count")
    .group_by(rating::Column::CourseId);
  if let Some(courses) = courses {
    query = query.filter(rating::Column::CourseId.is_in(courses.iter().copied()));
  }

  let rows: Vec<(i32, Option<f64>, i64)> = query.into_tuple().all(db).await?;
  Ok(
    rows
      .into_iter()
      .map(|(course, avg, count)| {
        let summary = Summary { average: round1(avg.unwrap_or(0.0)), count: count as u64 };
        (course, summary)
      })
      .collect(),
  )
}

/// Average over every rating on the platform.
pub(crate) async fn platform_average(db: &impl ConnectionTrait) -> Result<Option<f64>> {
  let avg: Option<Option<f64>> = rating::Entity::find()
    .select_only()
    .column_as(average(), "average")
    .into_tuple()
    .one(db)
    .await?;
  Ok(avg.flatten().map(round1))
}

pub struct Rating<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Rating<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// One rating per learner and course; rating again replaces the old one.
  pub async fn rate(&self, user_id: i32, course_id: i32, form: RatingForm) -> Result<Outcome> {
    let stars = form
      .rating
      .filter(|r| (1..=5).contains(r))
      .ok_or_else(|| Error::validation("Rating must be between 1 and 5"))?;

    sv::Course::new(self.db).get(course_id).await?;
    sv::Enrollment::new(self.db).ensure_enrolled(user_id, course_id).await?;

    let progress = sv::Progress::new(self.db).summary(user_id, course_id).await?;
    if progress.progress < RATING_THRESHOLD {
      return Err(Error::Forbidden(
        "You need to complete at least 80% of the course to rate it",
      ));
    }

    let outcome = match self.mine(user_id, course_id).await? {
      Some(_) => Outcome::Updated,
      None => Outcome::Created,
    };

    let stamp = now();
    let model = rating::ActiveModel {
      course_id: Set(course_id),
      user_id: Set(user_id),
      rating: Set(stars),
      review: Set(utils::trimmed(form.review)),
      created_at: Set(stamp),
      updated_at: Set(stamp),
      ..Default::default()
    };

    rating::Entity::insert(model)
      .on_conflict(
        OnConflict::columns([rating::Column::UserId, rating::Column::CourseId])
          .update_columns([
            rating::Column::Rating,
            rating::Column::Review,
            rating::Column::UpdatedAt,
          ])
          .to_owned(),
      )
      .exec_without_returning(self.db)
      .await?;

    debug!(user = user_id, course = course_id, stars, ?outcome, "Course rated");
    Ok(outcome)
  }

  pub async fn mine(&self, user_id: i32, course_id: i32) -> Result<Option<rating::Model>> {
    Ok(
      rating::Entity::find()
        .filter(rating::Column::UserId.eq(user_id))
        .filter(rating::Column::CourseId.eq(course_id))
        .one(self.db)
        .await?,
    )
  }

  /// Newest first, with the reviewer's name.
  pub async fn for_course(&self, course_id: i32) -> Result<Vec<RatingRow>> {
    let rows = rating::Entity::find()
      .filter(rating::Column::CourseId.eq(course_id))
      .find_also_related(user::Entity)
      .order_by_desc(rating::Column::CreatedAt)
      .order_by_desc(rating::Column::Id)
      .all(self.db)
      .await?;

    Ok(
      rows
        .into_iter()
        .map(|(rating, user)| RatingRow {
          id: rating.id,
          rating: rating.rating,
          review: rating.review,
          user_name: user.map(|u| u.name).unwrap_or_default(),
          created_at: rating.created_at,
          updated_at: rating.updated_at,
        })
        .collect(),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    entity::{Role, lesson},
    testing,
  };

  fn stars(n: i32) -> RatingForm {
    RatingForm { rating: Some(n), review: Some("Nice".into()) }
  }

  async fn complete(db: &DatabaseConnection, user_id: i32, lessons: &[lesson::Model]) {
    for lesson in lessons {
      sv::Progress::new(db).mark(user_id, lesson.id).await.unwrap();
    }
  }

  #[tokio::test]
  async fn test_rating_requires_progress() {
    let db = testing::setup_test_db().await;
    let tutor = testing::user(&db, "Tutor", Role::TestAdmin).await;
    let learner = testing::user(&db, "Learner", Role::User).await;
    let course = testing::course(&db, tutor.id, 100).await;
    let lessons = testing::lessons(&db, course.id, 5).await;
    let sv = Rating::new(&db);

    assert!(matches!(
      sv.rate(learner.id, course.id, stars(5)).await,
      Err(Error::Forbidden(_))
    ));

    testing::enroll(&db, learner.id, course.id).await;
    complete(&db, learner.id, &lessons[..3]).await;
    assert!(matches!(
      sv.rate(learner.id, course.id, stars(5)).await,
      Err(Error::Forbidden(_))
    ));

    complete(&db, learner.id, &lessons[3..4]).await;
    assert_eq!(sv.rate(learner.id, course.id, stars(5)).await.unwrap(), Outcome::Created);
    assert_eq!(sv.rate(learner.id, course.id, stars(3)).await.unwrap(), Outcome::Updated);

    let mine = sv.mine(learner.id, course.id).await.unwrap().unwrap();
    assert_eq!(mine.rating, 3);

    let rows = sv.for_course(course.id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].user_name, "Learner");
  }

  #[tokio::test]
  async fn test_rating_bounds() {
    let db = testing::setup_test_db().await;
    let learner = testing::user(&db, "Learner", Role::User).await;
    let sv = Rating::new(&db);

    for bad in [0, 6] {
      assert!(matches!(sv.rate(learner.id, 1, stars(bad)).await, Err(Error::Validation(_))));
    }
    assert!(matches!(
      sv.rate(learner.id, 1, RatingForm::default()).await,
      Err(Error::Validation(_))
    ));
  }

  #[tokio::test]
  async fn test_summary_averages() {
    let db = testing::setup_test_db().await;
    let tutor = testing::user(&db, "Tutor", Role::TestAdmin).await;
    let course = testing::course(&db, tutor.id, 0).await;
    let lessons = testing::lessons(&db, course.id, 1).await;

    for (name, n) in [("A", 4), ("B", 5), ("C", 5)] {
      let learner = testing::user(&db, name, Role::User).await;
      testing::enroll(&db, learner.id, course.id).await;
      complete(&db, learner.id, &lessons).await;
      Rating::new(&db).rate(learner.id, course.id, stars(n)).await.unwrap();
    }

    let summary = summary(&db, Some(&[course.id][..])).await.unwrap();
    assert_eq!(summary[&course.id], Summary { average: 4.7, count: 3 });
    assert_eq!(platform_average(&db).await.unwrap(), Some(4.7));
  }
}
