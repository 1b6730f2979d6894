use std::sync::Arc;

use axum::{Json, extract::State};
use json::json;
use serde::Deserialize;

use super::Reply;
use crate::{
  plugins::server::extract::{AuthUser, Payload},
  state::AppState,
  sv::user::{InstructorProfile, ProfileUpdate},
};

#[derive(Debug, Deserialize)]
pub struct ChangePasswordReq {
  #[serde(default, alias = "currentPassword")]
  pub current_password: String,
  #[serde(default, alias = "newPassword")]
  pub new_password: String,
}

pub async fn update_profile(
  State(app): State<Arc<AppState>>,
  AuthUser(actor): AuthUser,
  Payload(update): Payload<ProfileUpdate>,
) -> Reply {
  let user = app.sv().user.update_profile(actor.id, update).await?;
  Ok(Json(json!({ "success": true, "message": "Profile updated", "data": user })))
}

pub async fn change_password(
  State(app): State<Arc<AppState>>,
  AuthUser(actor): AuthUser,
  Payload(req): Payload<ChangePasswordReq>,
) -> Reply {
  app
    .sv()
    .user
    .change_password(actor.id, &req.current_password, &req.new_password)
    .await?;
  Ok(Json(json!({ "success": true, "message": "Password changed" })))
}

pub async fn update_instructor_profile(
  State(app): State<Arc<AppState>>,
  AuthUser(actor): AuthUser,
  Payload(profile): Payload<InstructorProfile>,
) -> Reply {
  let user = app.sv().user.update_instructor_profile(&actor, profile).await?;
  Ok(Json(json!({
    "success": true,
    "message": "Instructor profile updated",
    "data": user,
  })))
}
