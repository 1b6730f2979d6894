pub mod admin;
pub mod auth;
pub mod categories;
pub mod courses;
pub mod discounts;
pub mod instructors;
pub mod lessons;
pub mod ratings;
pub mod users;

use axum::{Json, http::StatusCode};
use json::{Value, json};

use crate::prelude::*;

pub type Reply = Result<Json<Value>>;
pub type Created = Result<(StatusCode, Json<Value>)>;

pub fn created(body: Value) -> (StatusCode, Json<Value>) {
  (StatusCode::CREATED, Json(body))
}

pub async fn health() -> Json<Value> {
  Json(json!({ "success": true, "message": "OK", "time": now() }))
}
