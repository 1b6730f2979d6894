use std::sync::Arc;

use axum::{Json, extract::State};
use json::json;

use super::Reply;
use crate::{plugins::server::extract::{AuthUser, Path}, state::AppState};

pub async fn complete(
  State(app): State<Arc<AppState>>,
  AuthUser(actor): AuthUser,
  Path(lesson): Path<i32>,
) -> Reply {
  let marked = app.sv().progress.mark(actor.id, lesson).await?;
  Ok(Json(json!({ "success": true, "message": "Lesson completed", "data": marked })))
}

pub async fn uncomplete(
  State(app): State<Arc<AppState>>,
  AuthUser(actor): AuthUser,
  Path(lesson): Path<i32>,
) -> Reply {
  let marked = app.sv().progress.unmark(actor.id, lesson).await?;
  Ok(Json(json!({
    "success": true,
    "message": "Lesson marked as not completed",
    "data": marked,
  })))
}

pub async fn progress(
  State(app): State<Arc<AppState>>,
  AuthUser(actor): AuthUser,
  Path(course): Path<i32>,
) -> Reply {
  let progress = app.sv().progress.course(actor.id, course).await?;
  Ok(Json(json!({ "success": true, "data": progress })))
}
