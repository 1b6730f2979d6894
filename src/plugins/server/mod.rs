mod extract;
mod handlers;

use std::{net::SocketAddr, sync::Arc};

use async_trait::async_trait;
use axum::{
  Router,
  http::HeaderValue,
  routing::{get, post, put},
};
use handlers::{
  admin, auth, categories, courses, discounts, instructors, lessons, ratings,
  users,
};
use tower::ServiceBuilder;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};

use crate::{prelude::*, state::AppState};

fn cors(origin: Option<&str>) -> CorsLayer {
  let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
  match origin.and_then(|origin| origin.parse::<HeaderValue>().ok()) {
    Some(origin) => layer.allow_origin(origin),
    None => layer.allow_origin(Any),
  }
}

type Routes = Router<Arc<AppState>>;

/// Credential attempts per peer, refilled one every `CREDENTIALS_REFILL`.
const CREDENTIALS_BURST: u32 = 10;
const CREDENTIALS_REFILL: Duration = Duration::from_secs(90);

/// Every route with tracing and CORS. Rate limiting needs the peer address
/// and is added by the plugin.
pub fn router(app: Arc<AppState>) -> Router {
  routes(app, |auth| auth)
}

/// `guard` wraps the credential endpoints, which get a stricter limit than
/// the rest of the API.
fn routes(app: Arc<AppState>, guard: impl FnOnce(Routes) -> Routes) -> Router {
  let credentials = Router::new()
    .route("/register", post(auth::register))
    .route("/login", post(auth::login))
    .route("/forgot-password", post(auth::forgot_password))
    .route("/reset-password", post(auth::reset_password));
  let auth = guard(credentials).route("/me", get(auth::me));

  let users = Router::new()
    .route("/profile", put(users::update_profile))
    .route("/change-password", put(users::change_password))
    .route("/instructor-profile", put(users::update_instructor_profile));

  let categories = Router::new()
    .route("/", get(categories::list).post(categories::create))
    .route("/{id}", put(categories::update).delete(categories::delete));

  let public = Router::new()
    .route("/courses", get(courses::public_catalog))
    .route("/stats", get(courses::public_stats));

  let courses = Router::new()
    .route("/", get(courses::list))
    .route("/my-courses", get(courses::my_courses))
    .route("/stats", get(courses::public_stats))
    .route("/{id}", get(courses::detail))
    .route("/{id}/enroll", post(courses::enroll));

  let instructors = Router::new()
    .route("/", get(instructors::list))
    .route("/{id}", get(instructors::detail));

  let lessons = Router::new()
    .route("/{id}/complete", post(lessons::complete).delete(lessons::uncomplete))
    .route("/{id}/progress", get(lessons::progress));

  let discounts = Router::new()
    .route("/active", get(discounts::active))
    .route("/courses/{id}", post(discounts::create).get(discounts::for_course))
    .route("/{id}/deactivate", put(discounts::deactivate))
    .route("/{id}", axum::routing::delete(discounts::delete));

  let ratings = Router::new()
    .route("/courses/{id}", post(ratings::rate).get(ratings::for_course))
    .route("/courses/{id}/my-rating", get(ratings::mine));

  let admin = Router::new()
    .route("/stats", get(admin::stats))
    .route("/logs", get(admin::logs))
    .route("/my-students", get(admin::my_students))
    .route("/users", get(admin::users))
    .route("/users/create-test-admin", post(admin::create_instructor))
    .route("/users/{id}", get(admin::user))
    .route("/users/{id}/status", put(admin::set_status))
    .route("/users/{id}/role", put(admin::set_role))
    .route("/courses", get(admin::courses).post(admin::create_course))
    .route("/courses/{id}", put(admin::update_course).delete(admin::delete_course))
    .route("/courses/{id}/sections", post(admin::add_section))
    .route("/sections/{id}", put(admin::update_section).delete(admin::delete_section))
    .route("/sections/{id}/lessons", post(admin::add_lesson))
    .route("/lessons/{id}", put(admin::update_lesson).delete(admin::delete_lesson));

  let cors = cors(app.config.frontend_url.as_deref());

  Router::new()
    .route("/health", get(handlers::health))
    .route("/api/health", get(handlers::health))
    .nest("/api/auth", auth)
    .nest("/api/users", users)
    .nest("/api/categories", categories)
    .nest("/api/public", public)
    .nest("/api/courses", courses)
    .nest("/api/instructors", instructors)
    .nest("/api/lessons", lessons)
    .nest("/api/discounts", discounts)
    .nest("/api/ratings", ratings)
    .nest("/api/admin", admin)
    .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
    .with_state(app)
}

pub struct Plugin;

#[async_trait]
impl super::Plugin for Plugin {
  fn name(&self) -> &'static str {
    "http"
  }

  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()> {
    let governor_conf = Arc::new(
      GovernorConfigBuilder::default()
        .per_second(2)
        .burst_size(100)
        .finish()
        .context("Failed to build rate limiter config")?,
    );
    let auth_conf = Arc::new(
      GovernorConfigBuilder::default()
        .period(CREDENTIALS_REFILL)
        .burst_size(CREDENTIALS_BURST)
        .finish()
        .context("Failed to build auth rate limiter config")?,
    );

    let limiter = governor_conf.limiter().clone();
    let auth_limiter = auth_conf.limiter().clone();

    let port = app.config.port;
    let router = routes(app, |auth| auth.layer(GovernorLayer::new(auth_conf)))
      .layer(GovernorLayer::new(governor_conf))
      .into_make_service_with_connect_info::<SocketAddr>();

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
      .await
      .with_context(|| format!("Failed to bind {addr}"))?;
    info!("HTTP Server listening on {addr}");

    let limiter = async {
      loop {
        time::sleep(Duration::from_secs(60)).await;
        limiter.retain_recent();
        auth_limiter.retain_recent();
      }
    };

    let server = async {
      axum::serve(listener, router).await.context("Axum server error")
    };

    tokio::select! {
      result = server => {
        match &result {
          Ok(_) => info!("Server stopped gracefully"),
          Err(err) => error!("Server stopped with error: {err}"),
        }
        result
      }
      _ = limiter => {
        error!("Rate limiter cleaner stopped unexpectedly!");
        Ok(())
      }
    }
  }
}
