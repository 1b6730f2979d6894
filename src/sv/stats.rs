use sea_orm::sea_query::Expr;
use serde::Serialize;

use crate::{
  access::{Actor, Capability},
  entity::{CourseStatus, PaymentStatus, Role, course, enrollment, user},
  prelude::*,
  sv,
};

const TOP_COURSES: usize = 5;

/// Window for "new users" and "active instructors".
const RECENT_DAYS: i64 = 30;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopCourse {
  pub id: i32,
  pub title: String,
  pub thumbnail: Option<String>,
  pub enrollments: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
  /// Learner accounts, platform-wide viewers only.
  pub total_users: u64,
  pub total_courses: u64,
  pub total_enrollments: u64,
  pub total_revenue: i64,
  pub new_users: u64,
  pub top_courses: Vec<TopCourse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicStats {
  pub total_courses: u64,
  pub total_instructors: u64,
  pub active_instructors: u64,
  pub average_rating: Option<f64>,
}

pub struct Stats<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Stats<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Dashboard numbers. Instructors only see their own courses.
  pub async fn admin(&self, actor: &Actor) -> Result<AdminStats> {
    actor.ensure(Capability::Teach)?;
    let scope = actor.course_scope();
    let platform = actor.can(Capability::ViewPlatformStats);

    let (total_users, new_users) = if platform {
      let learners = user::Entity::find()
        .filter(user::Column::Role.eq(Role::User))
        .count(self.db)
        .await?;
      let recent = user::Entity::find()
        .filter(user::Column::CreatedAt.gte(now() - TimeDelta::days(RECENT_DAYS)))
        .count(self.db)
        .await?;
      (learners, recent)
    } else {
      (0, 0)
    };

    let mut courses = course::Entity::find()
      .filter(course::Column::Status.eq(CourseStatus::Published));
    let mut enrollments = enrollment::Entity::find();
    if let Some(instructor) = scope {
      courses = courses.filter(course::Column::InstructorId.eq(instructor));
      enrollments = enrollments
        .inner_join(course::Entity)
        .filter(course::Column::InstructorId.eq(instructor));
    }

    let courses = courses.all(self.db).await?;
    let total_enrollments = enrollments.clone().count(self.db).await?;

    let revenue: Option<Option<i64>> = enrollments
      .filter(enrollment::Column::PaymentStatus.eq(PaymentStatus::Paid))
      .select_only()
      .column_as(Expr::col((enrollment::Entity, enrollment::Column::PaymentAmount)).sum(), "total")
      .into_tuple()
      .one(self.db)
      .await?;

    let ids: Vec<i32> = courses.iter().map(|c| c.id).collect();
    let counts = sv::count_by(
      self.db,
      enrollment::Entity::find().filter(enrollment::Column::CourseId.is_in(ids)),
      enrollment::Column::CourseId,
    )
    .await?;

    let total_courses = courses.len() as u64;
    let mut top_courses: Vec<TopCourse> = courses
      .into_iter()
      .map(|c| TopCourse {
        enrollments: counts.get(&c.id).copied().unwrap_or(0),
        id: c.id,
        title: c.title,
        thumbnail: c.thumbnail,
      })
      .collect();
    top_courses.sort_by(|a, b| b.enrollments.cmp(&a.enrollments).then(a.id.cmp(&b.id)));
    top_courses.truncate(TOP_COURSES);

    Ok(AdminStats {
      total_users,
      total_courses,
      total_enrollments,
      total_revenue: revenue.flatten().unwrap_or(0),
      new_users,
      top_courses,
    })
  }

  /// Landing page numbers, no authentication.
  pub async fn public(&self) -> Result<PublicStats> {
    let total_courses = course::Entity::find()
      .filter(course::Column::Status.eq(CourseStatus::Published))
      .count(self.db)
      .await?;

    let total_instructors = user::Entity::find()
      .filter(user::Column::Role.is_in([Role::TestAdmin, Role::Admin]))
      .count(self.db)
      .await?;

    let active: Vec<i32> = course::Entity::find()
      .filter(course::Column::Status.eq(CourseStatus::Published))
      .filter(course::Column::CreatedAt.gte(now() - TimeDelta::days(RECENT_DAYS)))
      .select_only()
      .column(course::Column::InstructorId)
      .distinct()
      .into_tuple()
      .all(self.db)
      .await?;

    Ok(PublicStats {
      total_courses,
      total_instructors,
      active_instructors: active.len() as u64,
      average_rating: sv::rating::platform_average(self.db).await?,
    })
  }
}
