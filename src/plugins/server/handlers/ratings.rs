use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
};
use json::json;

use super::{Created, Reply};
use crate::{
  plugins::server::extract::{AuthUser, Payload, Path},
  state::AppState,
  sv::rating::{Outcome, RatingForm},
};

pub async fn rate(
  State(app): State<Arc<AppState>>,
  AuthUser(actor): AuthUser,
  Path(course): Path<i32>,
  Payload(form): Payload<RatingForm>,
) -> Created {
  let outcome = app.sv().rating.rate(actor.id, course, form).await?;
  let (status, message) = match outcome {
    Outcome::Created => (StatusCode::CREATED, "Rating submitted"),
    Outcome::Updated => (StatusCode::OK, "Rating updated"),
  };

  Ok((
    status,
    Json(json!({ "success": true, "message": message, "data": { "status": outcome } })),
  ))
}

pub async fn for_course(
  State(app): State<Arc<AppState>>,
  AuthUser(_): AuthUser,
  Path(course): Path<i32>,
) -> Reply {
  let ratings = app.sv().rating.for_course(course).await?;
  Ok(Json(json!({ "success": true, "count": ratings.len(), "data": ratings })))
}

pub async fn mine(
  State(app): State<Arc<AppState>>,
  AuthUser(actor): AuthUser,
  Path(course): Path<i32>,
) -> Reply {
  let rating = app.sv().rating.mine(actor.id, course).await?;
  Ok(Json(json!({ "success": true, "data": rating })))
}
