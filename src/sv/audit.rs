use serde::Serialize;

use crate::{
  access::Actor,
  entity::{admin_log, user},
  prelude::*,
};

#[derive(Debug, Serialize)]
pub struct LogEntry {
  #[serde(flatten)]
  pub log: admin_log::Model,
  pub admin_name: Option<String>,
  pub admin_email: Option<String>,
}

pub struct Audit<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Audit<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Writes through `conn` so the entry commits together with the change it
  /// describes.
  pub async fn record<C: ConnectionTrait>(
    conn: &C,
    actor: &Actor,
    action: &str,
    target_type: &str,
    target_id: i32,
    details: impl Into<String>,
  ) -> Result<()> {
    let details = details.into();
    info!(
      admin = actor.id,
      action, target_type, target_id, "Privileged action: {details}"
    );

    admin_log::ActiveModel {
      admin_id: Set(actor.id),
      action: Set(action.to_string()),
      target_type: Set(target_type.to_string()),
      target_id: Set(target_id),
      details: Set(Some(details)),
      created_at: Set(now()),
      ..Default::default()
    }
    .insert(conn)
    .await?;

    Ok(())
  }

  pub async fn recent(&self, limit: u64) -> Result<Vec<LogEntry>> {
    let rows = admin_log::Entity::find()
      .find_also_related(user::Entity)
      .order_by_desc(admin_log::Column::CreatedAt)
      .order_by_desc(admin_log::Column::Id)
      .limit(limit.clamp(1, 500))
      .all(self.db)
      .await?;

    Ok(
      rows
        .into_iter()
        .map(|(log, admin)| LogEntry {
          log,
          admin_name: admin.as_ref().map(|u| u.name.clone()),
          admin_email: admin.map(|u| u.email),
        })
        .collect(),
    )
  }
}
