use std::sync::Arc;

use axum::{Json, extract::State};
use json::json;
use serde::Deserialize;

use super::{Created, Reply, created};
use crate::{
  access::Capability,
  entity::{Role, Status},
  plugins::server::extract::{AuthUser, Payload, Path, Query},
  state::AppState,
  sv::{
    course::{CourseForm, LessonForm, SectionForm},
    user::UserFilter,
  },
};

#[derive(Debug, Deserialize)]
pub struct LogQuery {
  pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct NewInstructorReq {
  pub name: Option<String>,
  pub email: Option<String>,
  pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusReq {
  pub status: Status,
}

#[derive(Debug, Deserialize)]
pub struct RoleReq {
  pub role: Role,
}

pub async fn stats(State(app): State<Arc<AppState>>, AuthUser(actor): AuthUser) -> Reply {
  let stats = app.sv().stats.admin(&actor).await?;
  Ok(Json(json!({ "success": true, "data": stats })))
}

pub async fn logs(
  State(app): State<Arc<AppState>>,
  AuthUser(actor): AuthUser,
  Query(query): Query<LogQuery>,
) -> Reply {
  actor.ensure(Capability::ViewAuditLog)?;
  let logs = app.sv().audit.recent(query.limit.unwrap_or(100)).await?;
  Ok(Json(json!({ "success": true, "count": logs.len(), "data": logs })))
}

pub async fn my_students(
  State(app): State<Arc<AppState>>,
  AuthUser(actor): AuthUser,
) -> Reply {
  let students = app.sv().enrollment.my_students(&actor).await?;
  Ok(Json(json!({
    "success": true,
    "data": students.data,
    "totalCourses": students.total_courses,
    "totalStudents": students.total_students,
  })))
}

pub async fn users(
  State(app): State<Arc<AppState>>,
  AuthUser(actor): AuthUser,
  Query(filter): Query<UserFilter>,
) -> Reply {
  actor.ensure(Capability::Teach)?;
  let users = app.sv().user.list(filter).await?;
  Ok(Json(json!({ "success": true, "count": users.len(), "data": users })))
}

pub async fn user(
  State(app): State<Arc<AppState>>,
  AuthUser(actor): AuthUser,
  Path(id): Path<i32>,
) -> Reply {
  actor.ensure(Capability::Teach)?;
  let user = app.sv().user.detail(id).await?;
  Ok(Json(json!({ "success": true, "data": user })))
}

pub async fn create_instructor(
  State(app): State<Arc<AppState>>,
  AuthUser(actor): AuthUser,
  Payload(req): Payload<NewInstructorReq>,
) -> Created {
  let user = app
    .sv()
    .user
    .create_instructor(&actor, req.name, req.email, req.password)
    .await?;
  Ok(created(json!({ "success": true, "message": "Instructor account created", "data": user })))
}

pub async fn set_status(
  State(app): State<Arc<AppState>>,
  AuthUser(actor): AuthUser,
  Path(id): Path<i32>,
  Payload(req): Payload<StatusReq>,
) -> Reply {
  let user = app.sv().user.set_status(&actor, id, req.status).await?;
  Ok(Json(json!({ "success": true, "message": "User status updated", "data": user })))
}

pub async fn set_role(
  State(app): State<Arc<AppState>>,
  AuthUser(actor): AuthUser,
  Path(id): Path<i32>,
  Payload(req): Payload<RoleReq>,
) -> Reply {
  let user = app.sv().user.set_role(&actor, id, req.role).await?;
  Ok(Json(json!({ "success": true, "message": "User role updated", "data": user })))
}

pub async fn courses(State(app): State<Arc<AppState>>, AuthUser(actor): AuthUser) -> Reply {
  let courses = app.sv().course.managed(&actor).await?;
  Ok(Json(json!({ "success": true, "count": courses.len(), "data": courses })))
}

pub async fn create_course(
  State(app): State<Arc<AppState>>,
  AuthUser(actor): AuthUser,
  Payload(form): Payload<CourseForm>,
) -> Created {
  let course = app.sv().course.create(&actor, form).await?;
  Ok(created(json!({ "success": true, "message": "Course created", "data": course })))
}

pub async fn update_course(
  State(app): State<Arc<AppState>>,
  AuthUser(actor): AuthUser,
  Path(id): Path<i32>,
  Payload(form): Payload<CourseForm>,
) -> Reply {
  let course = app.sv().course.update(&actor, id, form).await?;
  Ok(Json(json!({ "success": true, "message": "Course updated", "data": course })))
}

pub async fn delete_course(
  State(app): State<Arc<AppState>>,
  AuthUser(actor): AuthUser,
  Path(id): Path<i32>,
) -> Reply {
  app.sv().course.delete(&actor, id).await?;
  Ok(Json(json!({ "success": true, "message": "Course deleted" })))
}

pub async fn add_section(
  State(app): State<Arc<AppState>>,
  AuthUser(actor): AuthUser,
  Path(course): Path<i32>,
  Payload(form): Payload<SectionForm>,
) -> Created {
  let section = app.sv().course.add_section(&actor, course, form).await?;
  Ok(created(json!({ "success": true, "message": "Section added", "data": section })))
}

pub async fn update_section(
  State(app): State<Arc<AppState>>,
  AuthUser(actor): AuthUser,
  Path(id): Path<i32>,
  Payload(form): Payload<SectionForm>,
) -> Reply {
  let section = app.sv().course.update_section(&actor, id, form).await?;
  Ok(Json(json!({ "success": true, "message": "Section updated", "data": section })))
}

pub async fn delete_section(
  State(app): State<Arc<AppState>>,
  AuthUser(actor): AuthUser,
  Path(id): Path<i32>,
) -> Reply {
  app.sv().course.delete_section(&actor, id).await?;
  Ok(Json(json!({ "success": true, "message": "Section deleted" })))
}

pub async fn add_lesson(
  State(app): State<Arc<AppState>>,
  AuthUser(actor): AuthUser,
  Path(section): Path<i32>,
  Payload(form): Payload<LessonForm>,
) -> Created {
  let lesson = app.sv().course.add_lesson(&actor, section, form).await?;
  Ok(created(json!({ "success": true, "message": "Lesson added", "data": lesson })))
}

pub async fn update_lesson(
  State(app): State<Arc<AppState>>,
  AuthUser(actor): AuthUser,
  Path(id): Path<i32>,
  Payload(form): Payload<LessonForm>,
) -> Reply {
  let lesson = app.sv().course.update_lesson(&actor, id, form).await?;
  Ok(Json(json!({ "success": true, "message": "Lesson updated", "data": lesson })))
}

pub async fn delete_lesson(
  State(app): State<Arc<AppState>>,
  AuthUser(actor): AuthUser,
  Path(id): Path<i32>,
) -> Reply {
  app.sv().course.delete_lesson(&actor, id).await?;
  Ok(Json(json!({ "success": true, "message": "Lesson deleted" })))
}
