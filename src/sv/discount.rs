use sea_orm::{Select, sea_query::Expr};
use serde::{Deserialize, Serialize};

use crate::{
  access::{Actor, Capability},
  entity::{CourseStatus, course, discount, user},
  prelude::*,
  sv::{self, course::CourseCard},
};

#[derive(Debug, Default, Deserialize)]
pub struct DiscountForm {
  #[serde(alias = "discountPercent")]
  pub discount_percent: Option<i32>,
  #[serde(alias = "endDate")]
  pub end_date: Option<String>,
}

/// Where `now` falls relative to a discount's window. The active flag is
/// reported separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Window {
  Upcoming,
  Active,
  Expired,
}

impl Window {
  pub fn of(discount: &discount::Model, at: DateTime) -> Self {
    if at < discount.start_date {
      Window::Upcoming
    } else if at > discount.end_date {
      Window::Expired
    } else {
      Window::Active
    }
  }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Created {
  pub id: i32,
  pub course_id: i32,
  pub course_title: String,
  pub discount_percent: i32,
  pub original_price: i64,
  pub discount_price: i64,
  pub start_date: DateTime,
  pub end_date: DateTime,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountRow {
  pub id: i32,
  pub course_id: i32,
  pub discount_percent: i32,
  pub start_date: DateTime,
  pub end_date: DateTime,
  pub is_active: bool,
  pub status: Window,
  pub created_by: i32,
  pub created_by_name: Option<String>,
  pub created_at: DateTime,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveDiscount {
  #[serde(flatten)]
  pub course: CourseCard,
  pub saved_amount: i64,
}

fn live(at: DateTime) -> Select<discount::Entity> {
  discount::Entity::find()
    .filter(discount::Column::IsActive.eq(true))
    .filter(discount::Column::StartDate.lte(at))
    .filter(discount::Column::EndDate.gte(at))
}

pub struct Discount<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Discount<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  async fn get(&self, id: i32) -> Result<discount::Model> {
    discount::Entity::find_by_id(id)
      .one(self.db)
      .await?
      .ok_or(Error::NotFound("Discount"))
  }

  /// Starts now and runs until `end_date`. A course holds at most one live
  /// discount at a time.
  pub async fn create(
    &self,
    actor: &Actor,
    course_id: i32,
    form: DiscountForm,
  ) -> Result<Created> {
    actor.ensure(Capability::Teach)?;

    let percent = form
      .discount_percent
      .filter(|p| (1..=100).contains(p))
      .ok_or_else(|| Error::validation("Discount percent must be between 1 and 100"))?;
    let end_date = utils::parse_datetime(&utils::require(form.end_date, "End date is required")?)?;
    let start_date = now();
    if end_date <= start_date {
      return Err(Error::validation("End date must be in the future"));
    }

    let txn = self.db.begin().await?;

    let course = course::Entity::find_by_id(course_id)
      .one(&txn)
      .await?
      .ok_or(Error::NotFound("Course"))?;
    actor.ensure_owner(course.instructor_id)?;

    let overlapping = live(start_date)
      .filter(discount::Column::CourseId.eq(course.id))
      .count(&txn)
      .await?;
    if overlapping > 0 {
      return Err(Error::Conflict("This course already has an active discount"));
    }

    let discount = discount::ActiveModel {
      course_id: Set(course.id),
      discount_percent: Set(percent),
      start_date: Set(start_date),
      end_date: Set(end_date),
      is_active: Set(true),
      created_by: Set(actor.id),
      created_at: Set(start_date),
      ..Default::default()
    }
    .insert(&txn)
    .await?;

    sv::Audit::record(
      &txn,
      actor,
      "create_discount",
      "course",
      course.id,
      format!("{percent}% discount on {} until {end_date}", course.title),
    )
    .await?;

    txn.commit().await?;

    Ok(Created {
      id: discount.id,
      course_id: course.id,
      discount_price: utils::discount_price(course.price, percent),
      original_price: course.price,
      course_title: course.title,
      discount_percent: percent,
      start_date,
      end_date,
    })
  }

  /// Full history of a course, newest first.
  pub async fn for_course(&self, actor: &Actor, course_id: i32) -> Result<Vec<DiscountRow>> {
    sv::Course::new(self.db).owned(actor, course_id).await?;

    let at = now();
    let rows = discount::Entity::find()
      .filter(discount::Column::CourseId.eq(course_id))
      .find_also_related(user::Entity)
      .order_by_desc(discount::Column::CreatedAt)
      .order_by_desc(discount::Column::Id)
      .all(self.db)
      .await?;

    Ok(
      rows
        .into_iter()
        .map(|(discount, creator)| DiscountRow {
          status: Window::of(&discount, at),
          id: discount.id,
          course_id: discount.course_id,
          discount_percent: discount.discount_percent,
          start_date: discount.start_date,
          end_date: discount.end_date,
          is_active: discount.is_active,
          created_by: discount.created_by,
          created_by_name: creator.map(|u| u.name),
          created_at: discount.created_at,
        })
        .collect(),
    )
  }

  async fn owned(&self, actor: &Actor, id: i32) -> Result<discount::Model> {
    let discount = self.get(id).await?;
    sv::Course::new(self.db).owned(actor, discount.course_id).await?;
    Ok(discount)
  }

  pub async fn deactivate(&self, actor: &Actor, id: i32) -> Result<discount::Model> {
    let discount = self.owned(actor, id).await?;

    let txn = self.db.begin().await?;
    let discount = discount::ActiveModel { is_active: Set(false), ..discount.into() }
      .update(&txn)
      .await?;
    sv::Audit::record(
      &txn,
      actor,
      "deactivate_discount",
      "discount",
      discount.id,
      "Discount deactivated",
    )
    .await?;
    txn.commit().await?;

    Ok(discount)
  }

  pub async fn delete(&self, actor: &Actor, id: i32) -> Result<()> {
    let discount = self.owned(actor, id).await?;

    let txn = self.db.begin().await?;
    discount::Entity::delete_by_id(discount.id).exec(&txn).await?;
    sv::Audit::record(&txn, actor, "delete_discount", "discount", discount.id, "Discount deleted")
      .await?;
    txn.commit().await?;

    Ok(())
  }

  /// Live discount per course among `courses`. The newest wins if several
  /// overlap.
  pub async fn live_for(&self, courses: &[i32]) -> Result<HashMap<i32, discount::Model>> {
    let rows = live(now())
      .filter(discount::Column::CourseId.is_in(courses.iter().copied()))
      .order_by_asc(discount::Column::CreatedAt)
      .order_by_asc(discount::Column::Id)
      .all(self.db)
      .await?;

    Ok(rows.into_iter().map(|d| (d.course_id, d)).collect())
  }

  /// Published courses on sale right now, biggest discount first.
  pub async fn active(&self) -> Result<Vec<ActiveDiscount>> {
    let discounts = live(now())
      .order_by_desc(discount::Column::DiscountPercent)
      .order_by_desc(discount::Column::CreatedAt)
      .all(self.db)
      .await?;

    let mut order: Vec<i32> = Vec::with_capacity(discounts.len());
    for discount in &discounts {
      if !order.contains(&discount.course_id) {
        order.push(discount.course_id);
      }
    }

    let mut courses: HashMap<i32, course::Model> = course::Entity::find()
      .filter(course::Column::Id.is_in(order.clone()))
      .filter(course::Column::Status.eq(CourseStatus::Published))
      .all(self.db)
      .await?
      .into_iter()
      .map(|c| (c.id, c))
      .collect();
    let courses = order.iter().filter_map(|id| courses.remove(id)).collect();

    let cards = sv::Course::new(self.db).cards(courses).await?;
    Ok(
      cards
        .into_iter()
        .filter(|card| card.discount_price.is_some())
        .map(|card| ActiveDiscount {
          saved_amount: card.price - card.discount_price.unwrap_or(card.price),
          course: card,
        })
        .collect(),
    )
  }

  /// Clears the active flag on discounts whose window has closed.
  pub async fn expire_stale(&self) -> Result<u64> {
    let res = discount::Entity::update_many()
      .col_expr(discount::Column::IsActive, Expr::value(false))
      .filter(discount::Column::IsActive.eq(true))
      .filter(discount::Column::EndDate.lt(now()))
      .exec(self.db)
      .await?;
    Ok(res.rows_affected)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{entity::Role, testing};

  fn form(percent: i32, end: &str) -> DiscountForm {
    DiscountForm { discount_percent: Some(percent), end_date: Some(end.into()) }
  }

  fn tomorrow() -> String {
    (now() + TimeDelta::days(1)).format("%Y-%m-%dT%H:%M:%S").to_string()
  }

  async fn insert(
    db: &DatabaseConnection,
    course_id: i32,
    created_by: i32,
    percent: i32,
    start: DateTime,
    end: DateTime,
  ) -> discount::Model {
    discount::ActiveModel {
      course_id: Set(course_id),
      discount_percent: Set(percent),
      start_date: Set(start),
      end_date: Set(end),
      is_active: Set(true),
      created_by: Set(created_by),
      created_at: Set(start),
      ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
  }

  #[tokio::test]
  async fn test_create_validation() {
    let db = testing::setup_test_db().await;
    let tutor = testing::actor(&db, "Tutor", Role::TestAdmin).await;
    let course = testing::course(&db, tutor.id, 100_000).await;
    let sv = Discount::new(&db);

    for bad in [form(0, &tomorrow()), form(101, &tomorrow()), form(10, "2001-01-01")] {
      assert!(matches!(sv.create(&tutor, course.id, bad).await, Err(Error::Validation(_))));
    }
    assert!(matches!(
      sv.create(&tutor, 999, form(10, &tomorrow())).await,
      Err(Error::NotFound(_))
    ));

    let created = sv.create(&tutor, course.id, form(50, &tomorrow())).await.unwrap();
    assert_eq!(created.discount_price, 50_000);
    assert_eq!(created.original_price, 100_000);
  }

  #[tokio::test]
  async fn test_discount_on_oversized_price() {
    let db = testing::setup_test_db().await;
    let tutor = testing::actor(&db, "Tutor", Role::TestAdmin).await;
    let course = testing::course(&db, tutor.id, 1_000_000_000_000_000_000).await;

    let created =
      Discount::new(&db).create(&tutor, course.id, form(50, &tomorrow())).await.unwrap();
    assert_eq!(created.discount_price, 500_000_000_000_000_000);

    let cards = sv::Course::new(&db).cards(vec![course]).await.unwrap();
    assert_eq!(cards[0].discount_price, Some(500_000_000_000_000_000));
  }

  #[tokio::test]
  async fn test_single_live_discount() {
    let db = testing::setup_test_db().await;
    let tutor = testing::actor(&db, "Tutor", Role::TestAdmin).await;
    let course = testing::course(&db, tutor.id, 100_000).await;
    let sv = Discount::new(&db);

    let first = sv.create(&tutor, course.id, form(20, &tomorrow())).await.unwrap();
    assert!(matches!(
      sv.create(&tutor, course.id, form(30, &tomorrow())).await,
      Err(Error::Conflict(_))
    ));

    sv.deactivate(&tutor, first.id).await.unwrap();
    sv.create(&tutor, course.id, form(30, &tomorrow())).await.unwrap();

    let rows = sv.for_course(&tutor, course.id).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].discount_percent, 30);
    assert_eq!(rows[0].created_by_name.as_deref(), Some("Tutor"));
    assert!(!rows[1].is_active);
  }

  #[tokio::test]
  async fn test_other_instructor_forbidden() {
    let db = testing::setup_test_db().await;
    let owner = testing::actor(&db, "Owner", Role::TestAdmin).await;
    let other = testing::actor(&db, "Other", Role::TestAdmin).await;
    let admin = testing::actor(&db, "Root", Role::Admin).await;
    let course = testing::course(&db, owner.id, 1000).await;
    let sv = Discount::new(&db);

    let discount = sv.create(&owner, course.id, form(10, &tomorrow())).await.unwrap();
    assert!(matches!(sv.deactivate(&other, discount.id).await, Err(Error::Forbidden(_))));
    assert!(matches!(sv.delete(&other, discount.id).await, Err(Error::Forbidden(_))));
    assert!(matches!(sv.for_course(&other, course.id).await, Err(Error::Forbidden(_))));
    assert!(matches!(
      sv.create(&other, course.id, form(10, &tomorrow())).await,
      Err(Error::Forbidden(_))
    ));

    sv.delete(&admin, discount.id).await.unwrap();
    assert!(sv.for_course(&owner, course.id).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_window_status() {
    let db = testing::setup_test_db().await;
    let tutor = testing::user(&db, "Tutor", Role::TestAdmin).await;
    let course = testing::course(&db, tutor.id, 1000).await;
    let at = now();

    let past = insert(&db, course.id, tutor.id, 10, at - TimeDelta::days(3), at - TimeDelta::days(1)).await;
    let soon = insert(&db, course.id, tutor.id, 10, at + TimeDelta::days(1), at + TimeDelta::days(3)).await;
    let live = insert(&db, course.id, tutor.id, 10, at - TimeDelta::days(1), at + TimeDelta::days(1)).await;

    assert_eq!(Window::of(&past, at), Window::Expired);
    assert_eq!(Window::of(&soon, at), Window::Upcoming);
    assert_eq!(Window::of(&live, at), Window::Active);

    assert_eq!(Discount::new(&db).expire_stale().await.unwrap(), 1);
    let past = discount::Entity::find_by_id(past.id).one(&db).await.unwrap().unwrap();
    assert!(!past.is_active);
  }

  #[tokio::test]
  async fn test_active_listing() {
    let db = testing::setup_test_db().await;
    let tutor = testing::actor(&db, "Tutor", Role::TestAdmin).await;
    let small = testing::course(&db, tutor.id, 1000).await;
    let big = testing::course(&db, tutor.id, 2000).await;
    let sv = Discount::new(&db);

    sv.create(&tutor, small.id, form(10, &tomorrow())).await.unwrap();
    sv.create(&tutor, big.id, form(40, &tomorrow())).await.unwrap();

    let active = sv.active().await.unwrap();
    assert_eq!(active.len(), 2);
    assert_eq!(active[0].course.id, big.id);
    assert_eq!(active[0].saved_amount, 800);
    assert_eq!(active[1].course.discount_price, Some(900));
  }
}
