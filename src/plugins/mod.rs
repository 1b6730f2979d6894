pub mod cron;
pub mod server;

use std::sync::Arc;

use crate::{prelude::*, state::AppState};

/// Long-running service restarted by [`App`] whenever it stops.
#[async_trait]
pub trait Plugin: Send + Sync {
  fn name(&self) -> &'static str {
    std::any::type_name::<Self>()
  }

  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()>;
}

/// Pause before a stopped, crashed or panicked plugin is started again.
const RESTART_BACKOFF: Duration = Duration::from_secs(5);

/// Supervisor for the HTTP server and the maintenance loop. Each plugin runs
/// on its own task and is restarted after [`RESTART_BACKOFF`] until the task
/// is cancelled.
pub struct App {
  plugins: Vec<Arc<dyn Plugin>>,
}

impl App {
  pub fn new() -> Self {
    Self { plugins: Vec::new() }
  }

  pub fn register<P: Plugin + 'static>(mut self, plugin: P) -> Self {
    self.plugins.push(Arc::new(plugin));
    self
  }

  pub async fn run(self, app: Arc<AppState>) {
    for plugin in self.plugins {
      let app = app.clone();

      tokio::spawn(async move {
        let name = plugin.name();
        info!("Service `{name}` initialized");

        loop {
          let app = app.clone();
          let plugin = plugin.clone();

          let handle = tokio::spawn(async move { plugin.start(app).await });

          match handle.await {
            Ok(Ok(())) => {
              warn!("Service `{name}` stopped unexpectedly");
            }
            Ok(Err(err)) => {
              error!("Service `{name}` crashed: {err:#}");
            }
            Err(join_err) => {
              if join_err.is_cancelled() {
                info!("Service `{name}` shut down");
                break;
              } else {
                error!("Service `{name}` panicked");
              }
            }
          }

          time::sleep(RESTART_BACKOFF).await;
          info!("Restarting service `{name}`");
        }
      });
    }
  }
}
