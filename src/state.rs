use std::env;

use migration::{Migrator, MigratorTrait};

use crate::{auth::Keys, prelude::*, sv};

#[derive(Debug, Clone)]
pub struct Config {
  pub database_url: String,
  pub jwt_secret: String,
  pub jwt_expire: Duration,
  pub port: u16,
  /// Hides reset codes and 5xx detail from responses.
  pub production: bool,
  pub frontend_url: Option<String>,
  pub reset_code_ttl: Duration,
  pub maintenance_interval: Duration,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      database_url: String::from("sqlite:eduvia.db?mode=rwc"),
      jwt_secret: String::new(),
      jwt_expire: Duration::from_secs(7 * 24 * 3600),
      port: 5000,
      production: false,
      frontend_url: None,
      reset_code_ttl: Duration::from_secs(15 * 60),
      maintenance_interval: Duration::from_secs(3600),
    }
  }
}

fn duration_var(name: &str, default: Duration) -> anyhow::Result<Duration> {
  match env::var(name) {
    Ok(raw) => humantime::parse_duration(&raw)
      .with_context(|| format!("{name} is not a valid duration: {raw}")),
    Err(_) => Ok(default),
  }
}

impl Config {
  pub fn from_env() -> anyhow::Result<Self> {
    let default = Self::default();

    let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET not set")?;
    anyhow::ensure!(!jwt_secret.trim().is_empty(), "JWT_SECRET is empty");

    let port = match env::var("PORT") {
      Ok(raw) => raw.parse().with_context(|| format!("Invalid PORT: {raw}"))?,
      Err(_) => default.port,
    };

    Ok(Self {
      database_url: env::var("DATABASE_URL").unwrap_or(default.database_url),
      jwt_secret,
      jwt_expire: duration_var("JWT_EXPIRE", default.jwt_expire)?,
      port,
      production: env::var("APP_ENV").is_ok_and(|env| env == "production"),
      frontend_url: env::var("FRONTEND_URL").ok().filter(|url| !url.is_empty()),
      reset_code_ttl: duration_var("RESET_CODE_TTL", default.reset_code_ttl)?,
      maintenance_interval: duration_var(
        "MAINTENANCE_INTERVAL",
        default.maintenance_interval,
      )?,
    })
  }
}

pub struct Services<'a> {
  pub user: sv::User<'a>,
  pub category: sv::Category<'a>,
  pub course: sv::Course<'a>,
  pub enrollment: sv::Enrollment<'a>,
  pub progress: sv::Progress<'a>,
  pub discount: sv::Discount<'a>,
  pub rating: sv::Rating<'a>,
  pub stats: sv::Stats<'a>,
  pub audit: sv::Audit<'a>,
}

pub struct AppState {
  pub db: DatabaseConnection,
  pub keys: Keys,
  pub config: Config,
}

impl AppState {
  pub async fn new(config: Config) -> anyhow::Result<Self> {
    info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
      .await
      .context("Failed to connect to database")?;

    info!("Running migrations...");
    Migrator::up(&db, None).await.context("Failed to run migrations")?;

    Ok(Self::with_db(db, config))
  }

  pub fn with_db(db: DatabaseConnection, config: Config) -> Self {
    let keys = Keys::new(&config.jwt_secret, config.jwt_expire);
    Self { db, keys, config }
  }

  pub fn sv(&self) -> Services<'_> {
    Services {
      user: sv::User::new(&self.db),
      category: sv::Category::new(&self.db),
      course: sv::Course::new(&self.db),
      enrollment: sv::Enrollment::new(&self.db),
      progress: sv::Progress::new(&self.db),
      discount: sv::Discount::new(&self.db),
      rating: sv::Rating::new(&self.db),
      stats: sv::Stats::new(&self.db),
      audit: sv::Audit::new(&self.db),
    }
  }
}
