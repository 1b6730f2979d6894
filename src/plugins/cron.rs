use std::sync::Arc;

use async_trait::async_trait;

use crate::{prelude::*, state::AppState};

/// Periodic cleanup of expired discounts and password-reset codes.
pub struct Maintenance;

impl Maintenance {
  async fn tick(app: &AppState) -> Result<()> {
    let sv = app.sv();

    let expired = sv.discount.expire_stale().await?;
    if expired > 0 {
      info!("Deactivated {expired} expired discounts");
    }

    let cleared = sv.user.clear_expired_resets().await?;
    if cleared > 0 {
      debug!("Cleared {cleared} expired reset codes");
    }

    Ok(())
  }
}

#[async_trait]
impl super::Plugin for Maintenance {
  fn name(&self) -> &'static str {
    "maintenance"
  }

  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()> {
    let mut interval = time::interval(app.config.maintenance_interval);

    loop {
      interval.tick().await;
      if let Err(err) = Self::tick(&app).await {
        warn!("Maintenance pass failed: {err}");
      }
    }
  }
}
