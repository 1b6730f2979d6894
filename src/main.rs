//! Eduvia - course marketplace backend
//!
//! - SeaORM over SQLite with migrations applied at startup
//! - Axum REST API behind a per-IP rate limiter
//! - Background maintenance supervised alongside the server

mod access;
mod auth;
mod entity;
mod error;
mod plugins;
mod prelude;
mod state;
mod sv;
#[cfg(test)]
mod testing;
mod utils;

use std::sync::Arc;

use tracing_subscriber::{
  EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::{
  plugins::{App, cron, server},
  prelude::*,
  state::{AppState, Config},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
      "eduvia=debug,tower_http=debug,sea_orm=warn".into()
    }))
    .with(tracing_subscriber::fmt::layer())
    .init();

  let config = Config::from_env()?;
  error::expose_detail(!config.production);

  info!("Starting Eduvia v{}", env!("CARGO_PKG_VERSION"));
  let app = Arc::new(AppState::new(config).await?);

  App::new()
    .register(server::Plugin)
    .register(cron::Maintenance)
    .run(app)
    .await;

  tokio::signal::ctrl_c().await.context("Failed to listen for shutdown")?;
  info!("Shutting down");

  Ok(())
}
