use serde::{Deserialize, Serialize};

use crate::{
  access::{Actor, Capability},
  entity::{CourseStatus, category, course},
  prelude::*,
  sv,
};

#[derive(Debug, Default, Deserialize)]
pub struct CategoryForm {
  pub name: Option<String>,
  pub description: Option<String>,
  pub icon: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CategoryRow {
  #[serde(flatten)]
  pub category: category::Model,
  pub course_count: u64,
}

pub struct Category<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Category<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn get(&self, id: i32) -> Result<category::Model> {
    category::Entity::find_by_id(id)
      .one(self.db)
      .await?
      .ok_or(Error::NotFound("Category"))
  }

  /// Alphabetical, with the number of published courses in each.
  pub async fn all(&self) -> Result<Vec<CategoryRow>> {
    let categories = category::Entity::find()
      .order_by_asc(category::Column::Name)
      .all(self.db)
      .await?;

    let counts = sv::count_by(
      self.db,
      course::Entity::find()
        .filter(course::Column::Status.eq(CourseStatus::Published))
        .filter(course::Column::CategoryId.is_not_null()),
      course::Column::CategoryId,
    )
    .await?;

    Ok(
      categories
        .into_iter()
        .map(|category| CategoryRow {
          course_count: counts.get(&category.id).copied().unwrap_or(0),
          category,
        })
        .collect(),
    )
  }

  async fn ensure_slug_free(&self, slug: &str, except: Option<i32>) -> Result<()> {
    let mut query =
      category::Entity::find().filter(category::Column::Slug.eq(slug));
    if let Some(id) = except {
      query = query.filter(category::Column::Id.ne(id));
    }
    if query.count(self.db).await? > 0 {
      return Err(Error::Conflict("This category already exists"));
    }
    Ok(())
  }

  pub async fn create(
    &self,
    actor: &Actor,
    form: CategoryForm,
  ) -> Result<category::Model> {
    actor.ensure(Capability::ManageCategories)?;

    let name = utils::require(form.name, "Category name is required")?;
    let slug = utils::slugify(&name);
    if slug.is_empty() {
      return Err(Error::validation("Category name is required"));
    }
    self.ensure_slug_free(&slug, None).await?;

    let category = category::ActiveModel {
      name: Set(name),
      slug: Set(slug),
      description: Set(utils::trimmed(form.description)),
      icon: Set(utils::trimmed(form.icon)),
      ..Default::default()
    }
    .insert(self.db)
    .await?;

    info!(category = category.id, "Category created: {}", category.slug);
    Ok(category)
  }

  /// Renaming also moves the slug.
  pub async fn update(
    &self,
    actor: &Actor,
    id: i32,
    form: CategoryForm,
  ) -> Result<category::Model> {
    actor.ensure(Capability::ManageCategories)?;
    let category = self.get(id).await?;

    let mut model: category::ActiveModel = category.into();
    if let Some(name) = utils::trimmed(form.name) {
      let slug = utils::slugify(&name);
      self.ensure_slug_free(&slug, Some(id)).await?;
      model.name = Set(name);
      model.slug = Set(slug);
    }
    if let Some(description) = utils::trimmed(form.description) {
      model.description = Set(Some(description));
    }
    if let Some(icon) = utils::trimmed(form.icon) {
      model.icon = Set(Some(icon));
    }

    Ok(model.update(self.db).await?)
  }

  /// Refused while any course still points at the category.
  pub async fn delete(&self, actor: &Actor, id: i32) -> Result<()> {
    actor.ensure(Capability::ManageCategories)?;
    let category = self.get(id).await?;

    let courses = course::Entity::find()
      .filter(course::Column::CategoryId.eq(id))
      .count(self.db)
      .await?;
    if courses > 0 {
      return Err(Error::Conflict(
        "This category still has courses and cannot be deleted",
      ));
    }

    category::Entity::delete_by_id(category.id).exec(self.db).await?;
    info!(category = id, "Category deleted");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{entity::Role, testing};

  fn form(name: &str) -> CategoryForm {
    CategoryForm { name: Some(name.into()), ..Default::default() }
  }

  #[tokio::test]
  async fn test_crud() {
    let db = testing::setup_test_db().await;
    let admin = testing::actor(&db, "Root", Role::Admin).await;
    let sv = Category::new(&db);

    let web = sv.create(&admin, form("Web Development")).await.unwrap();
    assert_eq!(web.slug, "web-development");
    assert!(matches!(
      sv.create(&admin, form("web development")).await,
      Err(Error::Conflict(_))
    ));

    let renamed = sv.update(&admin, web.id, form("Web Design")).await.unwrap();
    assert_eq!(renamed.slug, "web-design");

    sv.create(&admin, form("AI")).await.unwrap();
    let all = sv.all().await.unwrap();
    assert_eq!(all[0].category.name, "AI");

    sv.delete(&admin, web.id).await.unwrap();
    assert!(matches!(sv.get(web.id).await, Err(Error::NotFound(_))));
  }

  #[tokio::test]
  async fn test_only_admin_manages() {
    let db = testing::setup_test_db().await;
    let instructor = testing::actor(&db, "Tutor", Role::TestAdmin).await;

    assert!(matches!(
      Category::new(&db).create(&instructor, form("Music")).await,
      Err(Error::Forbidden(_))
    ));
  }

  #[tokio::test]
  async fn test_delete_refused_with_courses() {
    let db = testing::setup_test_db().await;
    let admin = testing::actor(&db, "Root", Role::Admin).await;
    let sv = Category::new(&db);
    let music = sv.create(&admin, form("Music")).await.unwrap();

    let course = testing::course(&db, admin.id, 100).await;
    course::ActiveModel { category_id: Set(Some(music.id)), ..course.into() }
      .update(&db)
      .await
      .unwrap();

    assert_eq!(sv.all().await.unwrap()[0].course_count, 1);
    assert!(matches!(sv.delete(&admin, music.id).await, Err(Error::Conflict(_))));
  }
}
