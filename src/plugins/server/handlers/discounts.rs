use std::sync::Arc;

use axum::{Json, extract::State};
use json::json;

use super::{Created, Reply, created};
use crate::{
  plugins::server::extract::{AuthUser, Payload, Path},
  state::AppState,
  sv::discount::DiscountForm,
};

pub async fn active(State(app): State<Arc<AppState>>, AuthUser(_): AuthUser) -> Reply {
  let discounts = app.sv().discount.active().await?;
  Ok(Json(json!({ "success": true, "count": discounts.len(), "data": discounts })))
}

pub async fn create(
  State(app): State<Arc<AppState>>,
  AuthUser(actor): AuthUser,
  Path(course): Path<i32>,
  Payload(form): Payload<DiscountForm>,
) -> Created {
  let discount = app.sv().discount.create(&actor, course, form).await?;
  Ok(created(json!({ "success": true, "message": "Discount created", "data": discount })))
}

pub async fn for_course(
  State(app): State<Arc<AppState>>,
  AuthUser(actor): AuthUser,
  Path(course): Path<i32>,
) -> Reply {
  let discounts = app.sv().discount.for_course(&actor, course).await?;
  Ok(Json(json!({ "success": true, "count": discounts.len(), "data": discounts })))
}

pub async fn deactivate(
  State(app): State<Arc<AppState>>,
  AuthUser(actor): AuthUser,
  Path(id): Path<i32>,
) -> Reply {
  let discount = app.sv().discount.deactivate(&actor, id).await?;
  Ok(Json(json!({ "success": true, "message": "Discount deactivated", "data": discount })))
}

pub async fn delete(
  State(app): State<Arc<AppState>>,
  AuthUser(actor): AuthUser,
  Path(id): Path<i32>,
) -> Reply {
  app.sv().discount.delete(&actor, id).await?;
  Ok(Json(json!({ "success": true, "message": "Discount deleted" })))
}
