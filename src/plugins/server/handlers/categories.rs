use std::sync::Arc;

use axum::{Json, extract::State};
use json::json;

use super::{Created, Reply, created};
use crate::{
  plugins::server::extract::{AuthUser, Payload, Path},
  state::AppState,
  sv::category::CategoryForm,
};

pub async fn list(State(app): State<Arc<AppState>>) -> Reply {
  let categories = app.sv().category.all().await?;
  Ok(Json(json!({ "success": true, "count": categories.len(), "data": categories })))
}

pub async fn create(
  State(app): State<Arc<AppState>>,
  AuthUser(actor): AuthUser,
  Payload(form): Payload<CategoryForm>,
) -> Created {
  let category = app.sv().category.create(&actor, form).await?;
  Ok(created(json!({ "success": true, "message": "Category created", "data": category })))
}

pub async fn update(
  State(app): State<Arc<AppState>>,
  AuthUser(actor): AuthUser,
  Path(id): Path<i32>,
  Payload(form): Payload<CategoryForm>,
) -> Reply {
  let category = app.sv().category.update(&actor, id, form).await?;
  Ok(Json(json!({ "success": true, "message": "Category updated", "data": category })))
}

pub async fn delete(
  State(app): State<Arc<AppState>>,
  AuthUser(actor): AuthUser,
  Path(id): Path<i32>,
) -> Reply {
  app.sv().category.delete(&actor, id).await?;
  Ok(Json(json!({ "success": true, "message": "Category deleted" })))
}
