use sea_orm::Condition;
use serde::{Deserialize, Serialize};

use crate::{
  access::{Actor, Capability},
  entity::{CourseStatus, Level, category, course, enrollment, lesson, section, user},
  prelude::*,
  sv,
};

#[derive(Debug, Default, Deserialize)]
pub struct CourseFilter {
  /// Category slug
  pub category: Option<String>,
  pub search: Option<String>,
  #[serde(skip)]
  pub instructor: Option<i32>,
  #[serde(skip)]
  pub limit: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CourseForm {
  pub title: Option<String>,
  pub description: Option<String>,
  pub full_description: Option<String>,
  pub category_id: Option<i32>,
  pub price: Option<i64>,
  pub is_free: Option<bool>,
  pub duration: Option<i32>,
  pub level: Option<Level>,
  pub thumbnail: Option<String>,
  pub preview_video_url: Option<String>,
  pub status: Option<CourseStatus>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SectionForm {
  pub title: Option<String>,
  pub description: Option<String>,
  pub order_number: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LessonForm {
  pub title: Option<String>,
  pub description: Option<String>,
  pub video_url: Option<String>,
  pub duration: Option<i32>,
  pub order_number: Option<i32>,
  pub is_free_preview: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InstructorRef {
  pub id: i32,
  pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseCard {
  pub id: i32,
  pub title: String,
  pub slug: String,
  pub description: String,
  pub thumbnail: Option<String>,
  /// Category slug
  pub category: Option<String>,
  pub category_id: Option<i32>,
  pub category_name: Option<String>,
  pub price: i64,
  pub is_free: bool,
  pub duration: i32,
  pub level: Level,
  pub status: CourseStatus,
  /// Average of all ratings, one decimal.
  pub rating: Option<f64>,
  pub rating_count: u64,
  pub students: u64,
  pub discount_percent: Option<i32>,
  pub discount_price: Option<i64>,
  pub discount_ends_at: Option<DateTime>,
  pub instructor: InstructorRef,
  pub created_at: DateTime,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonOutline {
  pub id: i32,
  pub title: String,
  pub description: Option<String>,
  pub duration: i32,
  pub order_number: i32,
  pub is_free_preview: bool,
  /// Hidden unless the viewer may watch the lesson.
  pub video_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionOutline {
  pub id: i32,
  pub title: String,
  pub description: Option<String>,
  pub order_number: i32,
  pub lessons: Vec<LessonOutline>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetail {
  #[serde(flatten)]
  pub card: CourseCard,
  pub full_description: Option<String>,
  pub preview_video_url: Option<String>,
  pub total_lessons: usize,
  pub sections: Vec<SectionOutline>,
}

pub struct Course<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Course<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn get(&self, id: i32) -> Result<course::Model> {
    course::Entity::find_by_id(id)
      .one(self.db)
      .await?
      .ok_or(Error::NotFound("Course"))
  }

  /// Loads a course the actor is allowed to manage.
  pub async fn owned(&self, actor: &Actor, id: i32) -> Result<course::Model> {
    let course = self.get(id).await?;
    actor.ensure_owner(course.instructor_id)?;
    Ok(course)
  }

  /// Decorates courses with instructor, category, students, rating and the
  /// discount live right now. Order is preserved.
  pub async fn cards(&self, courses: Vec<course::Model>) -> Result<Vec<CourseCard>> {
    if courses.is_empty() {
      return Ok(Vec::new());
    }

    let ids: Vec<i32> = courses.iter().map(|c| c.id).collect();
    let instructor_ids: Vec<i32> = courses.iter().map(|c| c.instructor_id).collect();
    let category_ids: Vec<i32> = courses.iter().filter_map(|c| c.category_id).collect();

    let instructors: HashMap<i32, String> = user::Entity::find()
      .filter(user::Column::Id.is_in(instructor_ids))
      .all(self.db)
      .await?
      .into_iter()
      .map(|u| (u.id, u.name))
      .collect();

    let categories: HashMap<i32, category::Model> = category::Entity::find()
      .filter(category::Column::Id.is_in(category_ids))
      .all(self.db)
      .await?
      .into_iter()
      .map(|c| (c.id, c))
      .collect();

    let students = sv::count_by(
      self.db,
      enrollment::Entity::find().filter(enrollment::Column::CourseId.is_in(ids.clone())),
      enrollment::Column::CourseId,
    )
    .await?;

    let ratings = sv::rating::summary(self.db, Some(ids.as_slice())).await?;
    let discounts = sv::Discount::new(self.db).live_for(&ids).await?;

    Ok(
      courses
        .into_iter()
        .map(|course| {
          let category = course.category_id.and_then(|id| categories.get(&id));
          let rating = ratings.get(&course.id);
          let discount = discounts.get(&course.id);

          CourseCard {
            id: course.id,
            category: category.map(|c| c.slug.clone()),
            category_name: category.map(|c| c.name.clone()),
            category_id: course.category_id,
            rating: rating.map(|r| r.average),
            rating_count: rating.map_or(0, |r| r.count),
            students: students.get(&course.id).copied().unwrap_or(0),
            discount_percent: discount.map(|d| d.discount_percent),
            discount_price: discount
              .map(|d| utils::discount_price(course.price, d.discount_percent)),
            discount_ends_at: discount.map(|d| d.end_date),
            instructor: InstructorRef {
              id: course.instructor_id,
              name: instructors.get(&course.instructor_id).cloned().unwrap_or_default(),
            },
            title: course.title,
            slug: course.slug,
            description: course.description,
            thumbnail: course.thumbnail,
            price: course.price,
            is_free: course.is_free,
            duration: course.duration,
            level: course.level,
            status: course.status,
            created_at: course.created_at,
          }
        })
        .collect(),
    )
  }

  /// Published catalog, newest first.
  pub async fn published(&self, filter: &CourseFilter) -> Result<Vec<CourseCard>> {
    let mut query = course::Entity::find()
      .filter(course::Column::Status.eq(CourseStatus::Published));

    if let Some(slug) = utils::trimmed(filter.category.clone()) {
      query = query
        .inner_join(category::Entity)
        .filter(category::Column::Slug.eq(slug));
    }
    if let Some(search) = utils::trimmed(filter.search.clone()) {
      query = query.filter(
        Condition::any()
          .add(course::Column::Title.contains(&search))
          .add(course::Column::Description.contains(&search)),
      );
    }
    if let Some(instructor) = filter.instructor {
      query = query.filter(course::Column::InstructorId.eq(instructor));
    }

    let courses = query
      .order_by_desc(course::Column::CreatedAt)
      .order_by_desc(course::Column::Id)
      .limit(filter.limit)
      .all(self.db)
      .await?;

    self.cards(courses).await
  }

  /// Instructors see their own courses, admins see everything. Drafts included.
  pub async fn managed(&self, actor: &Actor) -> Result<Vec<CourseCard>> {
    actor.ensure(Capability::Teach)?;

    let mut query = course::Entity::find();
    if let Some(instructor) = actor.course_scope() {
      query = query.filter(course::Column::InstructorId.eq(instructor));
    }

    let courses = query
      .order_by_desc(course::Column::CreatedAt)
      .order_by_desc(course::Column::Id)
      .all(self.db)
      .await?;

    self.cards(courses).await
  }

  /// Course page with its outline and whether the viewer is enrolled. Drafts
  /// are only visible to whoever may manage them.
  pub async fn detail(&self, viewer: &Actor, id: i32) -> Result<(CourseDetail, bool)> {
    let course = self.get(id).await?;
    let manages = viewer.ensure_owner(course.instructor_id).is_ok();
    if course.status != CourseStatus::Published && !manages {
      return Err(Error::NotFound("Course"));
    }

    let enrolled = sv::Enrollment::new(self.db).is_enrolled(viewer.id, id).await?;
    let can_watch = enrolled || manages;

    let sections = section::Entity::find()
      .filter(section::Column::CourseId.eq(id))
      .order_by_asc(section::Column::OrderNumber)
      .order_by_asc(section::Column::Id)
      .all(self.db)
      .await?;

    let lessons = lesson::Entity::find()
      .filter(lesson::Column::CourseId.eq(id))
      .order_by_asc(lesson::Column::OrderNumber)
      .order_by_asc(lesson::Column::Id)
      .all(self.db)
      .await?;
    let total_lessons = lessons.len();

    let mut by_section: HashMap<i32, Vec<LessonOutline>> = HashMap::new();
    for lesson in lessons {
      let visible = can_watch || lesson.is_free_preview;
      by_section.entry(lesson.section_id).or_default().push(LessonOutline {
        id: lesson.id,
        title: lesson.title,
        description: lesson.description,
        duration: lesson.duration,
        order_number: lesson.order_number,
        is_free_preview: lesson.is_free_preview,
        video_url: lesson.video_url.filter(|_| visible),
      });
    }

    let sections = sections
      .into_iter()
      .map(|s| SectionOutline {
        lessons: by_section.remove(&s.id).unwrap_or_default(),
        id: s.id,
        title: s.title,
        description: s.description,
        order_number: s.order_number,
      })
      .collect();

    let full_description = course.full_description.clone();
    let preview_video_url = course.preview_video_url.clone();
    let card = self
      .cards(vec![course])
      .await?
      .pop()
      .ok_or(Error::NotFound("Course"))?;

    let detail = CourseDetail {
      card,
      full_description,
      preview_video_url,
      total_lessons,
      sections,
    };
    Ok((detail, enrolled))
  }

  async fn ensure_category(&self, id: i32) -> Result<()> {
    sv::Category::new(self.db).get(id).await.map(|_| ())
  }

  pub async fn create(&self, actor: &Actor, form: CourseForm) -> Result<course::Model> {
    actor.ensure(Capability::Teach)?;

    let title = utils::require(form.title, "Title, description and category are required")?;
    let description =
      utils::require(form.description, "Title, description and category are required")?;
    let category_id = form
      .category_id
      .ok_or_else(|| Error::validation("Title, description and category are required"))?;
    self.ensure_category(category_id).await?;

    let price = utils::check_price(form.price.unwrap_or(0))?;

    let slug = format!("{}-{}", utils::slugify(&title), Utc::now().timestamp_millis());
    let full_description =
      utils::trimmed(form.full_description).or_else(|| Some(description.clone()));

    let model = course::ActiveModel {
      title: Set(title),
      slug: Set(slug),
      description: Set(description),
      full_description: Set(full_description),
      thumbnail: Set(utils::trimmed(form.thumbnail)),
      preview_video_url: Set(utils::trimmed(form.preview_video_url)),
      category_id: Set(Some(category_id)),
      instructor_id: Set(actor.id),
      price: Set(price),
      is_free: Set(form.is_free.unwrap_or(price == 0)),
      duration: Set(form.duration.unwrap_or(0).max(0)),
      level: Set(form.level.unwrap_or_default()),
      status: Set(form.status.unwrap_or(CourseStatus::Published)),
      created_at: Set(now()),
      ..Default::default()
    };

    let txn = self.db.begin().await?;
    let course = model.insert(&txn).await?;
    sv::Audit::record(
      &txn,
      actor,
      "create_course",
      "course",
      course.id,
      format!("Created course: {}", course.title),
    )
    .await?;
    txn.commit().await?;

    Ok(course)
  }

  /// Only the provided fields change.
  pub async fn update(
    &self,
    actor: &Actor,
    id: i32,
    form: CourseForm,
  ) -> Result<course::Model> {
    let course = self.owned(actor, id).await?;

    if let Some(category_id) = form.category_id {
      self.ensure_category(category_id).await?;
    }
    if let Some(price) = form.price {
      utils::check_price(price)?;
    }

    let mut model: course::ActiveModel = course.into();
    if let Some(title) = utils::trimmed(form.title) {
      model.title = Set(title);
    }
    if let Some(description) = utils::trimmed(form.description) {
      model.description = Set(description);
    }
    if let Some(full) = utils::trimmed(form.full_description) {
      model.full_description = Set(Some(full));
    }
    if let Some(category_id) = form.category_id {
      model.category_id = Set(Some(category_id));
    }
    if let Some(price) = form.price {
      model.price = Set(price);
    }
    if let Some(is_free) = form.is_free {
      model.is_free = Set(is_free);
    }
    if let Some(duration) = form.duration {
      model.duration = Set(duration.max(0));
    }
    if let Some(level) = form.level {
      model.level = Set(level);
    }
    if let Some(thumbnail) = utils::trimmed(form.thumbnail) {
      model.thumbnail = Set(Some(thumbnail));
    }
    if let Some(preview) = utils::trimmed(form.preview_video_url) {
      model.preview_video_url = Set(Some(preview));
    }
    if let Some(status) = form.status {
      model.status = Set(status);
    }

    let txn = self.db.begin().await?;
    let course = model.update(&txn).await?;
    sv::Audit::record(&txn, actor, "update_course", "course", course.id, "Course updated")
      .await?;
    txn.commit().await?;

    Ok(course)
  }

  /// Sections, lessons, enrollments, progress, discounts and ratings cascade.
  pub async fn delete(&self, actor: &Actor, id: i32) -> Result<()> {
    actor.ensure(Capability::DeleteCourses)?;
    let course = self.get(id).await?;

    let txn = self.db.begin().await?;
    course::Entity::delete_by_id(course.id).exec(&txn).await?;
    sv::Audit::record(
      &txn,
      actor,
      "delete_course",
      "course",
      course.id,
      format!("Deleted course: {}", course.title),
    )
    .await?;
    txn.commit().await?;

    Ok(())
  }

  async fn owned_section(&self, actor: &Actor, id: i32) -> Result<section::Model> {
    let section = section::Entity::find_by_id(id)
      .one(self.db)
      .await?
      .ok_or(Error::NotFound("Section"))?;
    self.owned(actor, section.course_id).await?;
    Ok(section)
  }

  async fn owned_lesson(&self, actor: &Actor, id: i32) -> Result<lesson::Model> {
    let lesson = lesson::Entity::find_by_id(id)
      .one(self.db)
      .await?
      .ok_or(Error::NotFound("Lesson"))?;
    self.owned(actor, lesson.course_id).await?;
    Ok(lesson)
  }

  /// Without an explicit order the section goes last.
  pub async fn add_section(
    &self,
    actor: &Actor,
    course_id: i32,
    form: SectionForm,
  ) -> Result<section::Model> {
    let course = self.owned(actor, course_id).await?;
    let title = utils::require(form.title, "Section title is required")?;

    let order_number = match form.order_number {
      Some(order) => order,
      None => {
        let existing = section::Entity::find()
          .filter(section::Column::CourseId.eq(course.id))
          .count(self.db)
          .await?;
        existing as i32 + 1
      }
    };

    let section = section::ActiveModel {
      course_id: Set(course.id),
      title: Set(title),
      description: Set(utils::trimmed(form.description)),
      order_number: Set(order_number),
      ..Default::default()
    }
    .insert(self.db)
    .await?;

    debug!(course = course.id, section = section.id, "Section added");
    Ok(section)
  }

  pub async fn update_section(
    &self,
    actor: &Actor,
    id: i32,
    form: SectionForm,
  ) -> Result<section::Model> {
    let section = self.owned_section(actor, id).await?;

    let mut model: section::ActiveModel = section.into();
    if let Some(title) = utils::trimmed(form.title) {
      model.title = Set(title);
    }
    if let Some(description) = utils::trimmed(form.description) {
      model.description = Set(Some(description));
    }
    if let Some(order) = form.order_number {
      model.order_number = Set(order);
    }

    Ok(model.update(self.db).await?)
  }

  pub async fn delete_section(&self, actor: &Actor, id: i32) -> Result<()> {
    let section = self.owned_section(actor, id).await?;
    section::Entity::delete_by_id(section.id).exec(self.db).await?;
    debug!(section = id, "Section deleted");
    Ok(())
  }

  pub async fn add_lesson(
    &self,
    actor: &Actor,
    section_id: i32,
    form: LessonForm,
  ) -> Result<lesson::Model> {
    let section = self.owned_section(actor, section_id).await?;
    let title = utils::require(form.title, "Lesson title is required")?;

    let order_number = match form.order_number {
      Some(order) => order,
      None => {
        let existing = lesson::Entity::find()
          .filter(lesson::Column::SectionId.eq(section.id))
          .count(self.db)
          .await?;
        existing as i32 + 1
      }
    };

    let lesson = lesson::ActiveModel {
      section_id: Set(section.id),
      course_id: Set(section.course_id),
      title: Set(title),
      description: Set(utils::trimmed(form.description)),
      video_url: Set(utils::trimmed(form.video_url)),
      duration: Set(form.duration.unwrap_or(0).max(0)),
      order_number: Set(order_number),
      is_free_preview: Set(form.is_free_preview.unwrap_or(false)),
      ..Default::default()
    }
    .insert(self.db)
    .await?;

    debug!(course = lesson.course_id, lesson = lesson.id, "Lesson added");
    Ok(lesson)
  }

  pub async fn update_lesson(
    &self,
    actor: &Actor,
    id: i32,
    form: LessonForm,
  ) -> Result<lesson::Model> {
    let lesson = self.owned_lesson(actor, id).await?;

    let mut model: lesson::ActiveModel = lesson.into();
    if let Some(title) = utils::trimmed(form.title) {
      model.title = Set(title);
    }
    if let Some(description) = utils::trimmed(form.description) {
      model.description = Set(Some(description));
    }
    if let Some(video) = utils::trimmed(form.video_url) {
      model.video_url = Set(Some(video));
    }
    if let Some(duration) = form.duration {
      model.duration = Set(duration.max(0));
    }
    if let Some(order) = form.order_number {
      model.order_number = Set(order);
    }
    if let Some(preview) = form.is_free_preview {
      model.is_free_preview = Set(preview);
    }

    Ok(model.update(self.db).await?)
  }

  pub async fn delete_lesson(&self, actor: &Actor, id: i32) -> Result<()> {
    let lesson = self.owned_lesson(actor, id).await?;
    lesson::Entity::delete_by_id(lesson.id).exec(self.db).await?;
    debug!(lesson = id, "Lesson deleted");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    entity::{Role, discount},
    testing,
  };

  async fn category(db: &DatabaseConnection, name: &str) -> category::Model {
    category::ActiveModel {
      name: Set(name.into()),
      slug: Set(utils::slugify(name)),
      ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
  }

  fn form(title: &str, category_id: i32, price: i64) -> CourseForm {
    CourseForm {
      title: Some(title.into()),
      description: Some(format!("{title} description")),
      category_id: Some(category_id),
      price: Some(price),
      ..Default::default()
    }
  }

  #[tokio::test]
  async fn test_create_requires_fields() {
    let db = testing::setup_test_db().await;
    let tutor = testing::actor(&db, "Tutor", Role::TestAdmin).await;
    let learner = testing::actor(&db, "Learner", Role::User).await;
    let web = category(&db, "Web").await;
    let sv = Course::new(&db);

    assert!(matches!(
      sv.create(&tutor, CourseForm::default()).await,
      Err(Error::Validation(_))
    ));
    assert!(matches!(
      sv.create(&tutor, form("Rust", 999, 100)).await,
      Err(Error::NotFound(_))
    ));
    assert!(matches!(
      sv.create(&learner, form("Rust", web.id, 100)).await,
      Err(Error::Forbidden(_))
    ));

    for price in [-1, utils::MAX_PRICE + 1, i64::MAX / 100] {
      assert!(matches!(
        sv.create(&tutor, form("Rust", web.id, price)).await,
        Err(Error::Validation(_))
      ));
    }

    let course = sv.create(&tutor, form("Rust Basics", web.id, 100)).await.unwrap();
    assert!(course.slug.starts_with("rust-basics-"));
    let huge = CourseForm { price: Some(i64::MAX / 100), ..Default::default() };
    assert!(matches!(sv.update(&tutor, course.id, huge).await, Err(Error::Validation(_))));
    assert_eq!(course.status, CourseStatus::Published);
    assert_eq!(course.instructor_id, tutor.id);
    assert!(!course.is_free);
  }

  #[tokio::test]
  async fn test_published_filters() {
    let db = testing::setup_test_db().await;
    let tutor = testing::actor(&db, "Tutor", Role::TestAdmin).await;
    let web = category(&db, "Web").await;
    let data = category(&db, "Data").await;
    let sv = Course::new(&db);

    sv.create(&tutor, form("Rust for the Web", web.id, 100)).await.unwrap();
    sv.create(&tutor, form("Pandas", data.id, 100)).await.unwrap();
    let mut draft = form("Hidden Draft", web.id, 100);
    draft.status = Some(CourseStatus::Draft);
    sv.create(&tutor, draft).await.unwrap();

    let all = sv.published(&CourseFilter::default()).await.unwrap();
    assert_eq!(all.len(), 2);

    let by_category = sv
      .published(&CourseFilter { category: Some("web".into()), ..Default::default() })
      .await
      .unwrap();
    assert_eq!(by_category.len(), 1);
    assert_eq!(by_category[0].category_name.as_deref(), Some("Web"));

    let searched = sv
      .published(&CourseFilter { search: Some("panda".into()), ..Default::default() })
      .await
      .unwrap();
    assert_eq!(searched.len(), 1);

    assert_eq!(sv.managed(&tutor).await.unwrap().len(), 3);
  }

  #[tokio::test]
  async fn test_cards_carry_discount_and_rating() {
    let db = testing::setup_test_db().await;
    let tutor = testing::user(&db, "Tutor", Role::TestAdmin).await;
    let course = testing::course(&db, tutor.id, 100_000).await;

    discount::ActiveModel {
      course_id: Set(course.id),
      discount_percent: Set(50),
      start_date: Set(now() - TimeDelta::hours(1)),
      end_date: Set(now() + TimeDelta::days(1)),
      is_active: Set(true),
      created_by: Set(tutor.id),
      created_at: Set(now()),
      ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    let cards = Course::new(&db).cards(vec![course]).await.unwrap();
    assert_eq!(cards[0].discount_price, Some(50_000));
    assert_eq!(cards[0].rating, None);
    assert_eq!(cards[0].instructor.name, "Tutor");
  }

  #[tokio::test]
  async fn test_detail_outline_and_visibility() {
    let db = testing::setup_test_db().await;
    let tutor = testing::actor(&db, "Tutor", Role::TestAdmin).await;
    let learner = testing::actor(&db, "Learner", Role::User).await;
    let web = category(&db, "Web").await;
    let sv = Course::new(&db);

    let course = sv.create(&tutor, form("Rust", web.id, 100)).await.unwrap();
    let intro = sv
      .add_section(&tutor, course.id, SectionForm { title: Some("Intro".into()), ..Default::default() })
      .await
      .unwrap();
    assert_eq!(intro.order_number, 1);

    sv.add_lesson(
      &tutor,
      intro.id,
      LessonForm {
        title: Some("Hello".into()),
        video_url: Some("https://v/1".into()),
        ..Default::default()
      },
    )
    .await
    .unwrap();

    let (detail, enrolled) = sv.detail(&learner, course.id).await.unwrap();
    assert!(!enrolled);
    assert_eq!(detail.total_lessons, 1);
    assert_eq!(detail.sections[0].lessons[0].video_url, None);

    testing::enroll(&db, learner.id, course.id).await;
    let (detail, enrolled) = sv.detail(&learner, course.id).await.unwrap();
    assert!(enrolled);
    assert_eq!(detail.sections[0].lessons[0].video_url.as_deref(), Some("https://v/1"));

    sv.update(
      &tutor,
      course.id,
      CourseForm { status: Some(CourseStatus::Draft), ..Default::default() },
    )
    .await
    .unwrap();
    assert!(matches!(sv.detail(&learner, course.id).await, Err(Error::NotFound(_))));
    assert!(sv.detail(&tutor, course.id).await.is_ok());
  }

  #[tokio::test]
  async fn test_delete_course_permissions() {
    let db = testing::setup_test_db().await;
    let owner = testing::actor(&db, "Owner", Role::TestAdmin).await;
    let other = testing::actor(&db, "Other", Role::TestAdmin).await;
    let admin = testing::actor(&db, "Root", Role::Admin).await;
    let course = testing::course(&db, owner.id, 100).await;
    let sv = Course::new(&db);

    assert!(matches!(sv.delete(&other, course.id).await, Err(Error::Forbidden(_))));
    sv.delete(&admin, course.id).await.unwrap();
    assert!(matches!(sv.get(course.id).await, Err(Error::NotFound(_))));

    let logs = sv::Audit::new(&db).recent(5).await.unwrap();
    assert_eq!(logs[0].log.action, "delete_course");
  }

  #[tokio::test]
  async fn test_outline_ownership() {
    let db = testing::setup_test_db().await;
    let owner = testing::actor(&db, "Owner", Role::TestAdmin).await;
    let other = testing::actor(&db, "Other", Role::TestAdmin).await;
    let admin = testing::actor(&db, "Root", Role::Admin).await;
    let course = testing::course(&db, owner.id, 100).await;
    let lessons = testing::lessons(&db, course.id, 1).await;
    let sv = Course::new(&db);

    let update = || CourseForm { price: Some(5), ..Default::default() };
    assert!(matches!(sv.update(&other, course.id, update()).await, Err(Error::Forbidden(_))));
    assert_eq!(sv.update(&admin, course.id, update()).await.unwrap().price, 5);

    assert!(matches!(
      sv.update_lesson(&other, lessons[0].id, LessonForm::default()).await,
      Err(Error::Forbidden(_))
    ));
    assert!(matches!(
      sv.delete_section(&other, lessons[0].section_id).await,
      Err(Error::Forbidden(_))
    ));

    let renamed = sv
      .update_lesson(
        &owner,
        lessons[0].id,
        LessonForm { title: Some("Renamed".into()), ..Default::default() },
      )
      .await
      .unwrap();
    assert_eq!(renamed.title, "Renamed");

    sv.delete_section(&owner, lessons[0].section_id).await.unwrap();
    assert!(lesson::Entity::find_by_id(lessons[0].id).one(&db).await.unwrap().is_none());
  }
}
