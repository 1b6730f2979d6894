use std::sync::Arc;

use axum::{Json, extract::State};
use json::json;

use super::{Created, Reply, created};
use crate::{
  plugins::server::extract::{AuthUser, Path, Query},
  state::AppState,
  sv::course::CourseFilter,
};

/// Size of the anonymous landing-page catalog.
const PUBLIC_CATALOG: u64 = 20;

pub async fn public_catalog(
  State(app): State<Arc<AppState>>,
  Query(filter): Query<CourseFilter>,
) -> Reply {
  let filter = CourseFilter { limit: Some(PUBLIC_CATALOG), ..filter };
  let courses = app.sv().course.published(&filter).await?;
  Ok(Json(json!({ "success": true, "count": courses.len(), "data": courses })))
}

pub async fn public_stats(State(app): State<Arc<AppState>>) -> Reply {
  let stats = app.sv().stats.public().await?;
  Ok(Json(json!({ "success": true, "data": stats })))
}

pub async fn list(
  State(app): State<Arc<AppState>>,
  AuthUser(_): AuthUser,
  Query(filter): Query<CourseFilter>,
) -> Reply {
  let courses = app.sv().course.published(&filter).await?;
  Ok(Json(json!({ "success": true, "count": courses.len(), "data": courses })))
}

pub async fn my_courses(
  State(app): State<Arc<AppState>>,
  AuthUser(actor): AuthUser,
) -> Reply {
  let courses = app.sv().enrollment.my_courses(actor.id).await?;
  Ok(Json(json!({ "success": true, "count": courses.len(), "data": courses })))
}

pub async fn detail(
  State(app): State<Arc<AppState>>,
  AuthUser(actor): AuthUser,
  Path(id): Path<i32>,
) -> Reply {
  let (course, enrolled) = app.sv().course.detail(&actor, id).await?;
  Ok(Json(json!({ "success": true, "data": course, "isEnrolled": enrolled })))
}

pub async fn enroll(
  State(app): State<Arc<AppState>>,
  AuthUser(actor): AuthUser,
  Path(id): Path<i32>,
) -> Created {
  let enrollment = app.sv().enrollment.enroll(actor.id, id).await?;
  Ok(created(json!({
    "success": true,
    "message": "Enrolled successfully",
    "data": enrollment,
  })))
}
