pub mod audit;
pub mod category;
pub mod course;
pub mod discount;
pub mod enrollment;
pub mod progress;
pub mod rating;
pub mod stats;
pub mod user;

pub use audit::Audit;
pub use category::Category;
pub use course::Course;
pub use discount::Discount;
pub use enrollment::Enrollment;
pub use progress::Progress;
pub use rating::Rating;
pub use stats::Stats;
pub use user::User;

use sea_orm::{Select, sea_query::Expr};

use crate::prelude::*;

/// Row counts of `select` grouped by an integer key column.
pub(crate) async fn count_by<E>(
  db: &impl ConnectionTrait,
  select: Select<E>,
  key: E::Column,
) -> Result<HashMap<i32, u64>>
where
  E: EntityTrait,
{
  let rows: Vec<(i32, i64)> = select
    .select_only()
    .column(key)
    .column_as(Expr::col((E::default(), key)).count(), "count")
    .group_by(key)
    .into_tuple()
    .all(db)
    .await?;

  Ok(rows.into_iter().map(|(id, n)| (id, n as u64)).collect())
}
