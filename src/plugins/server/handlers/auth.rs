use std::sync::Arc;

use axum::{Json, extract::State};
use json::json;
use serde::Deserialize;

use super::{Created, Reply, created};
use crate::{
  plugins::server::extract::{AuthUser, Payload},
  prelude::*,
  state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RegisterReq {
  pub name: Option<String>,
  pub email: Option<String>,
  pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginReq {
  #[serde(default)]
  pub email: String,
  #[serde(default)]
  pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotReq {
  #[serde(default)]
  pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetReq {
  #[serde(default)]
  pub email: String,
  #[serde(default, alias = "resetCode")]
  pub code: String,
  #[serde(default, alias = "newPassword")]
  pub new_password: String,
}

pub async fn register(
  State(app): State<Arc<AppState>>,
  Payload(req): Payload<RegisterReq>,
) -> Created {
  let user = app.sv().user.register(req.name, req.email, req.password).await?;
  let token = app.keys.issue(user.id)?;

  Ok(created(json!({
    "success": true,
    "message": "Registration successful",
    "token": token,
    "user": user,
  })))
}

pub async fn login(
  State(app): State<Arc<AppState>>,
  Payload(req): Payload<LoginReq>,
) -> Reply {
  let user = app.sv().user.login(&req.email, &req.password).await?;
  let token = app.keys.issue(user.id)?;

  Ok(Json(json!({
    "success": true,
    "message": "Login successful",
    "token": token,
    "user": user,
  })))
}

pub async fn me(
  State(app): State<Arc<AppState>>,
  AuthUser(actor): AuthUser,
) -> Reply {
  let user = app.sv().user.get(actor.id).await?;
  Ok(Json(json!({ "success": true, "data": user })))
}

/// Without a mail service the code is logged and, outside production,
/// returned in the response.
pub async fn forgot_password(
  State(app): State<Arc<AppState>>,
  Payload(req): Payload<ForgotReq>,
) -> Reply {
  let (user, code) = app
    .sv()
    .user
    .forgot_password(&req.email, &app.keys, app.config.reset_code_ttl)
    .await?;

  if app.config.production {
    return Ok(Json(json!({
      "success": true,
      "message": "A reset code has been sent to your email",
    })));
  }

  info!(user = user.id, code, "Password reset code issued");
  Ok(Json(json!({
    "success": true,
    "message": "A reset code has been sent to your email",
    "resetCode": code,
  })))
}

pub async fn reset_password(
  State(app): State<Arc<AppState>>,
  Payload(req): Payload<ResetReq>,
) -> Reply {
  app
    .sv()
    .user
    .reset_password(&req.email, &req.code, &req.new_password, &app.keys)
    .await?;

  Ok(Json(json!({ "success": true, "message": "Password has been reset" })))
}
