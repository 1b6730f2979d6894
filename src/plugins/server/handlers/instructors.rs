use std::sync::Arc;

use axum::{Json, extract::State};
use json::json;

use super::Reply;
use crate::{plugins::server::extract::{AuthUser, Path}, state::AppState};

pub async fn list(State(app): State<Arc<AppState>>, AuthUser(_): AuthUser) -> Reply {
  let instructors = app.sv().user.instructors().await?;
  Ok(Json(json!({ "success": true, "count": instructors.len(), "data": instructors })))
}

pub async fn detail(
  State(app): State<Arc<AppState>>,
  AuthUser(_): AuthUser,
  Path(id): Path<i32>,
) -> Reply {
  let instructor = app.sv().user.instructor(id).await?;
  Ok(Json(json!({ "success": true, "data": instructor })))
}
