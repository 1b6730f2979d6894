use std::sync::Arc;

use axum::{
  extract::{FromRequest, FromRequestParts},
  http::{header, request::Parts},
};

use crate::{access::Actor, prelude::*, state::AppState};

/// Bearer-authenticated caller whose account is still active.
pub struct AuthUser(pub Actor);

impl FromRequestParts<Arc<AppState>> for AuthUser {
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    app: &Arc<AppState>,
  ) -> Result<Self> {
    let token = parts
      .headers
      .get(header::AUTHORIZATION)
      .and_then(|value| value.to_str().ok())
      .and_then(|value| value.strip_prefix("Bearer "))
      .map(str::trim)
      .filter(|token| !token.is_empty())
      .ok_or(Auth::MissingToken)?;

    let claims = app.keys.verify(token)?;
    let user = app.sv().user.by_id(claims.id).await?.ok_or(Auth::InvalidToken)?;
    if !user.status.is_active() {
      return Err(Auth::Inactive.into());
    }

    Ok(Self(user.into()))
  }
}

/// JSON body whose rejections answer with the usual error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct Payload<T>(pub T);

/// Path parameters rejected as a validation error.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct Path<T>(pub T);

/// Query string rejected as a validation error.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(Error))]
pub struct Query<T>(pub T);
