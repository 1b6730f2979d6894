use sea_orm::{Condition, sea_query::Expr};
use serde::{Deserialize, Serialize};

use crate::{
  access::{Actor, Capability},
  auth::{self, Keys},
  entity::{Role, Status, course, enrollment, progress, user},
  prelude::*,
  sv,
};

const DEFAULT_BIO: &str = "No introduction yet";
const DEFAULT_TEACHING: &str = "Uncategorized";

#[derive(Debug, Deserialize)]
pub struct ProfileUpdate {
  pub name: Option<String>,
  pub email: Option<String>,
  pub profile_image: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct InstructorProfile {
  pub bio: Option<String>,
  pub teaching_categories: Option<String>,
  pub profile_image: Option<String>,
  pub profile_banner: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserFilter {
  pub role: Option<Role>,
  pub status: Option<Status>,
  pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserRow {
  #[serde(flatten)]
  pub user: user::Model,
  pub enrolled_courses: u64,
  pub completed_lessons: u64,
}

#[derive(Debug, Serialize)]
pub struct EnrolledCourse {
  pub id: i32,
  pub title: String,
  pub thumbnail: Option<String>,
  pub enrolled_at: DateTime,
  pub payment_status: crate::entity::PaymentStatus,
}

#[derive(Debug, Serialize)]
pub struct UserDetail {
  #[serde(flatten)]
  pub user: user::Model,
  pub total_enrollments: u64,
  pub completed_lessons: u64,
  pub enrollments: Vec<EnrolledCourse>,
}

#[derive(Debug, Serialize)]
pub struct Instructor {
  pub id: i32,
  pub name: String,
  pub email: String,
  pub bio: Option<String>,
  pub teaching_categories: Option<String>,
  pub profile_image: Option<String>,
  pub profile_banner: Option<String>,
  pub created_at: DateTime,
  pub total_courses: u64,
  pub total_students: u64,
}

#[derive(Debug, Serialize)]
pub struct InstructorDetail {
  #[serde(flatten)]
  pub instructor: Instructor,
  pub courses: Vec<sv::course::CourseCard>,
}

pub struct User<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> User<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn by_id(&self, id: i32) -> Result<Option<user::Model>> {
    Ok(user::Entity::find_by_id(id).one(self.db).await?)
  }

  pub async fn get(&self, id: i32) -> Result<user::Model> {
    self.by_id(id).await?.ok_or(Error::NotFound("User"))
  }

  pub async fn by_email(&self, email: &str) -> Result<Option<user::Model>> {
    let user = user::Entity::find()
      .filter(user::Column::Email.eq(email))
      .one(self.db)
      .await?;
    Ok(user)
  }

  async fn ensure_email_free(&self, email: &str, except: Option<i32>) -> Result<()> {
    let mut query = user::Entity::find().filter(user::Column::Email.eq(email));
    if let Some(id) = except {
      query = query.filter(user::Column::Id.ne(id));
    }
    if query.count(self.db).await? > 0 {
      return Err(Error::Conflict("This email is already registered"));
    }
    Ok(())
  }

  /// Validated, hashed and not yet inserted.
  async fn account(
    &self,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    role: Role,
  ) -> Result<user::ActiveModel> {
    let name = utils::require(name, "Name, email and password are required")?;
    let email = utils::require(email, "Name, email and password are required")?;
    let password = password
      .filter(|p| !p.is_empty())
      .ok_or_else(|| Error::validation("Name, email and password are required"))?;

    let email = utils::normalize_email(&email)?;
    utils::check_password(&password)?;
    self.ensure_email_free(&email, None).await?;

    Ok(user::ActiveModel {
      name: Set(name),
      email: Set(email),
      password: Set(auth::hash_password(&password)?),
      role: Set(role),
      status: Set(Status::Active),
      created_at: Set(now()),
      ..Default::default()
    })
  }

  pub async fn register(
    &self,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
  ) -> Result<user::Model> {
    let user = self.account(name, email, password, Role::User).await?.insert(self.db).await?;
    info!(user = user.id, "Registered new account");
    Ok(user)
  }

  pub async fn login(&self, email: &str, password: &str) -> Result<user::Model> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || password.is_empty() {
      return Err(Error::validation("Email and password are required"));
    }

    let user =
      self.by_email(&email).await?.ok_or(Auth::InvalidCredentials)?;

    if !auth::verify_password(password, &user.password) {
      return Err(Auth::InvalidCredentials.into());
    }
    if !user.status.is_active() {
      return Err(Auth::Inactive.into());
    }

    Ok(user)
  }

  pub async fn update_profile(
    &self,
    id: i32,
    update: ProfileUpdate,
  ) -> Result<user::Model> {
    let name = utils::require(update.name, "Name and email are required")?;
    let email = utils::require(update.email, "Name and email are required")?;
    let email = utils::normalize_email(&email)?;

    let user = self.get(id).await?;
    if email != user.email {
      self.ensure_email_free(&email, Some(id)).await?;
    }

    let profile_image = match utils::trimmed(update.profile_image) {
      Some(image) => Some(image),
      None => user.profile_image.clone(),
    };

    let user = user::ActiveModel {
      name: Set(name),
      email: Set(email),
      profile_image: Set(profile_image),
      ..user.into()
    }
    .update(self.db)
    .await?;

    Ok(user)
  }

  pub async fn change_password(
    &self,
    id: i32,
    current: &str,
    new: &str,
  ) -> Result<()> {
    if current.is_empty() || new.is_empty() {
      return Err(Error::validation("All fields are required"));
    }
    utils::check_password(new)?;

    let user = self.get(id).await?;
    if !auth::verify_password(current, &user.password) {
      return Err(Auth::WrongPassword.into());
    }

    user::ActiveModel {
      password: Set(auth::hash_password(new)?),
      ..user.into()
    }
    .update(self.db)
    .await?;

    Ok(())
  }

  /// Only the provided fields change.
  pub async fn update_instructor_profile(
    &self,
    actor: &Actor,
    profile: InstructorProfile,
  ) -> Result<user::Model> {
    actor.ensure(Capability::Teach)?;
    let user = self.get(actor.id).await?;

    let mut model: user::ActiveModel = user.into();
    if let Some(bio) = utils::trimmed(profile.bio) {
      model.bio = Set(Some(bio));
    }
    if let Some(categories) = utils::trimmed(profile.teaching_categories) {
      model.teaching_categories = Set(Some(categories));
    }
    if let Some(image) = utils::trimmed(profile.profile_image) {
      model.profile_image = Set(Some(image));
    }
    if let Some(banner) = utils::trimmed(profile.profile_banner) {
      model.profile_banner = Set(Some(banner));
    }

    Ok(model.update(self.db).await?)
  }

  /// Stores the digest of a fresh code and hands the plain code back.
  pub async fn forgot_password(
    &self,
    email: &str,
    keys: &Keys,
    ttl: Duration,
  ) -> Result<(user::Model, String)> {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
      return Err(Error::validation("Email is required"));
    }

    let user = self.by_email(&email).await?.ok_or(Error::NotFound("Email"))?;

    let code = auth::reset_code();
    let expires = now()
      + TimeDelta::from_std(ttl).map_err(|err| Error::Internal(err.to_string()))?;

    let user = user::ActiveModel {
      reset_password_token: Set(Some(keys.reset_digest(&code))),
      reset_password_expires: Set(Some(expires)),
      ..user.into()
    }
    .update(self.db)
    .await?;

    Ok((user, code))
  }

  pub async fn reset_password(
    &self,
    email: &str,
    code: &str,
    new_password: &str,
    keys: &Keys,
  ) -> Result<()> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || code.is_empty() || new_password.is_empty() {
      return Err(Error::validation("All fields are required"));
    }
    utils::check_password(new_password)?;

    let user =
      self.by_email(&email).await?.ok_or(Auth::InvalidResetCode)?;

    let valid = match (&user.reset_password_token, user.reset_password_expires)
    {
      (Some(digest), Some(expires)) => {
        expires > now() && keys.verify_reset(code.trim(), digest)
      }
      _ => false,
    };
    if !valid {
      return Err(Auth::InvalidResetCode.into());
    }

    let user = user::ActiveModel {
      password: Set(auth::hash_password(new_password)?),
      reset_password_token: Set(None),
      reset_password_expires: Set(None),
      ..user.into()
    }
    .update(self.db)
    .await?;

    info!(user = user.id, "Password reset completed");
    Ok(())
  }

  pub async fn clear_expired_resets(&self) -> Result<u64> {
    let res = user::Entity::update_many()
      .col_expr(user::Column::ResetPasswordToken, Expr::value(Option::<String>::None))
      .col_expr(
        user::Column::ResetPasswordExpires,
        Expr::value(Option::<DateTime>::None),
      )
      .filter(user::Column::ResetPasswordExpires.lt(now()))
      .exec(self.db)
      .await?;
    Ok(res.rows_affected)
  }

  pub async fn list(&self, filter: UserFilter) -> Result<Vec<UserRow>> {
    let mut query = user::Entity::find();
    if let Some(role) = filter.role {
      query = query.filter(user::Column::Role.eq(role));
    }
    if let Some(status) = filter.status {
      query = query.filter(user::Column::Status.eq(status));
    }
    if let Some(search) = utils::trimmed(filter.search) {
      query = query.filter(
        Condition::any()
          .add(user::Column::Name.contains(&search))
          .add(user::Column::Email.contains(&search)),
      );
    }

    let users = query
      .order_by_desc(user::Column::CreatedAt)
      .order_by_desc(user::Column::Id)
      .all(self.db)
      .await?;

    let enrolled =
      sv::count_by(self.db, enrollment::Entity::find(), enrollment::Column::UserId)
        .await?;
    let completed = sv::count_by(
      self.db,
      progress::Entity::find().filter(progress::Column::IsCompleted.eq(true)),
      progress::Column::UserId,
    )
    .await?;

    Ok(
      users
        .into_iter()
        .map(|user| UserRow {
          enrolled_courses: enrolled.get(&user.id).copied().unwrap_or(0),
          completed_lessons: completed.get(&user.id).copied().unwrap_or(0),
          user,
        })
        .collect(),
    )
  }

  pub async fn detail(&self, id: i32) -> Result<UserDetail> {
    let user = self.get(id).await?;

    let enrollments = enrollment::Entity::find()
      .filter(enrollment::Column::UserId.eq(id))
      .find_also_related(course::Entity)
      .order_by_desc(enrollment::Column::EnrolledAt)
      .all(self.db)
      .await?;

    let completed_lessons = progress::Entity::find()
      .filter(progress::Column::UserId.eq(id))
      .filter(progress::Column::IsCompleted.eq(true))
      .count(self.db)
      .await?;

    let enrollments: Vec<_> = enrollments
      .into_iter()
      .filter_map(|(enrollment, course)| {
        course.map(|course| EnrolledCourse {
          id: course.id,
          title: course.title,
          thumbnail: course.thumbnail,
          enrolled_at: enrollment.enrolled_at,
          payment_status: enrollment.payment_status,
        })
      })
      .collect();

    Ok(UserDetail {
      user,
      total_enrollments: enrollments.len() as u64,
      completed_lessons,
      enrollments,
    })
  }

  pub async fn create_instructor(
    &self,
    actor: &Actor,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
  ) -> Result<user::Model> {
    actor.ensure(Capability::CreateInstructors)?;

    let model = self.account(name, email, password, Role::TestAdmin).await?;

    let txn = self.db.begin().await?;
    let user = model.insert(&txn).await?;
    sv::Audit::record(
      &txn,
      actor,
      "create_test_admin",
      "user",
      user.id,
      format!("Created instructor account: {}", user.email),
    )
    .await?;
    txn.commit().await?;

    Ok(user)
  }

  pub async fn set_status(
    &self,
    actor: &Actor,
    target_id: i32,
    status: Status,
  ) -> Result<user::Model> {
    let target = self.get(target_id).await?;
    actor.ensure_can_moderate(&target)?;

    let previous = target.status;
    let txn = self.db.begin().await?;
    let target = user::ActiveModel { status: Set(status), ..target.into() }
      .update(&txn)
      .await?;
    sv::Audit::record(
      &txn,
      actor,
      "update_user_status",
      "user",
      target.id,
      format!("Status: {previous:?} -> {status:?}"),
    )
    .await?;
    txn.commit().await?;

    Ok(target)
  }

  /// Promoting to an instructor role fills missing profile fields.
  pub async fn set_role(
    &self,
    actor: &Actor,
    target_id: i32,
    role: Role,
  ) -> Result<user::Model> {
    let target = self.get(target_id).await?;
    actor.ensure_can_assign_role(&target)?;

    let previous = target.role;
    let bio = target.bio.clone().or_else(|| Some(DEFAULT_BIO.to_string()));
    let teaching = target
      .teaching_categories
      .clone()
      .or_else(|| Some(DEFAULT_TEACHING.to_string()));

    let mut model: user::ActiveModel = target.into();
    model.role = Set(role);
    if role.is_instructor() {
      model.bio = Set(bio);
      model.teaching_categories = Set(teaching);
    }
    let txn = self.db.begin().await?;
    let target = model.update(&txn).await?;
    sv::Audit::record(
      &txn,
      actor,
      "update_user_role",
      "user",
      target.id,
      format!("Role: {previous:?} -> {role:?}"),
    )
    .await?;
    txn.commit().await?;

    Ok(target)
  }

  async fn instructor_rows(
    &self,
    users: Vec<user::Model>,
  ) -> Result<Vec<Instructor>> {
    let courses = sv::count_by(
      self.db,
      course::Entity::find()
        .filter(course::Column::Status.eq(crate::entity::CourseStatus::Published)),
      course::Column::InstructorId,
    )
    .await?;

    let pairs: Vec<(i32, i32)> = enrollment::Entity::find()
      .inner_join(course::Entity)
      .select_only()
      .column(course::Column::InstructorId)
      .column(enrollment::Column::UserId)
      .distinct()
      .into_tuple()
      .all(self.db)
      .await?;

    let mut students: HashMap<i32, u64> = HashMap::new();
    for (instructor, _) in pairs {
      *students.entry(instructor).or_default() += 1;
    }

    Ok(
      users
        .into_iter()
        .map(|u| Instructor {
          total_courses: courses.get(&u.id).copied().unwrap_or(0),
          total_students: students.get(&u.id).copied().unwrap_or(0),
          id: u.id,
          name: u.name,
          email: u.email,
          bio: u.bio,
          teaching_categories: u.teaching_categories,
          profile_image: u.profile_image,
          profile_banner: u.profile_banner,
          created_at: u.created_at,
        })
        .collect(),
    )
  }

  /// Ordered by published courses, then distinct students.
  pub async fn instructors(&self) -> Result<Vec<Instructor>> {
    let users = user::Entity::find()
      .filter(user::Column::Role.is_in([Role::TestAdmin, Role::Admin]))
      .order_by_asc(user::Column::Id)
      .all(self.db)
      .await?;

    let mut rows = self.instructor_rows(users).await?;
    rows.sort_by(|a, b| {
      (b.total_courses, b.total_students).cmp(&(a.total_courses, a.total_students))
    });
    Ok(rows)
  }

  pub async fn instructor(&self, id: i32) -> Result<InstructorDetail> {
    let user = self
      .by_id(id)
      .await?
      .filter(|u| u.role.is_instructor())
      .ok_or(Error::NotFound("Instructor"))?;

    let instructor = self
      .instructor_rows(vec![user])
      .await?
      .pop()
      .ok_or(Error::NotFound("Instructor"))?;

    let courses = sv::Course::new(self.db)
      .published(&sv::course::CourseFilter {
        instructor: Some(id),
        ..Default::default()
      })
      .await?;

    Ok(InstructorDetail { instructor, courses })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing;

  fn keys() -> Keys {
    Keys::new("test-secret", Duration::from_secs(3600))
  }

  async fn register(sv: &User<'_>, name: &str) -> user::Model {
    sv.register(
      Some(name.into()),
      Some(testing::email_of(name)),
      Some("secret1".into()),
    )
    .await
    .unwrap()
  }

  #[tokio::test]
  async fn test_register_and_login() {
    let db = testing::setup_test_db().await;
    let sv = User::new(&db);

    let user = register(&sv, "Bold").await;
    assert_eq!(user.role, Role::User);
    assert_ne!(user.password, "secret1");

    let logged = sv.login("BOLD@test.io", "secret1").await.unwrap();
    assert_eq!(logged.id, user.id);

    assert!(matches!(
      sv.login("bold@test.io", "wrong-pass").await,
      Err(Error::Auth(Auth::InvalidCredentials))
    ));
    assert!(matches!(
      sv.login("nobody@test.io", "secret1").await,
      Err(Error::Auth(Auth::InvalidCredentials))
    ));
  }

  #[tokio::test]
  async fn test_register_validation() {
    let db = testing::setup_test_db().await;
    let sv = User::new(&db);
    register(&sv, "Saraa").await;

    let dup = sv
      .register(Some("Other".into()), Some("saraa@test.io".into()), Some("secret1".into()))
      .await;
    assert!(matches!(dup, Err(Error::Conflict(_))));

    let short = sv
      .register(Some("Short".into()), Some("short@test.io".into()), Some("123".into()))
      .await;
    assert!(matches!(short, Err(Error::Validation(_))));

    let missing = sv.register(None, Some("x@test.io".into()), Some("secret1".into())).await;
    assert!(matches!(missing, Err(Error::Validation(_))));
  }

  #[tokio::test]
  async fn test_inactive_user_cannot_login() {
    let db = testing::setup_test_db().await;
    let sv = User::new(&db);
    let admin = testing::actor(&db, "Root", Role::Admin).await;
    let user = register(&sv, "Temuujin").await;

    sv.set_status(&admin, user.id, Status::Suspended).await.unwrap();

    assert!(matches!(
      sv.login("temuujin@test.io", "secret1").await,
      Err(Error::Auth(Auth::Inactive))
    ));
  }

  #[tokio::test]
  async fn test_password_reset_flow() {
    let db = testing::setup_test_db().await;
    let sv = User::new(&db);
    let keys = keys();
    register(&sv, "Nomin").await;

    let (user, code) = sv
      .forgot_password("nomin@test.io", &keys, Duration::from_secs(900))
      .await
      .unwrap();
    assert_eq!(code.len(), 6);
    assert_ne!(user.reset_password_token.as_deref(), Some(code.as_str()));

    let wrong = if code == "999999" { "100000" } else { "999999" };
    assert!(matches!(
      sv.reset_password("nomin@test.io", wrong, "newpass1", &keys).await,
      Err(Error::Auth(Auth::InvalidResetCode))
    ));

    sv.reset_password("nomin@test.io", &code, "newpass1", &keys).await.unwrap();
    assert!(sv.login("nomin@test.io", "newpass1").await.is_ok());

    // codes are single use
    assert!(
      sv.reset_password("nomin@test.io", &code, "another1", &keys).await.is_err()
    );

    assert!(matches!(
      sv.forgot_password("ghost@test.io", &keys, Duration::from_secs(900)).await,
      Err(Error::NotFound(_))
    ));
  }

  #[tokio::test]
  async fn test_expired_reset_is_rejected_and_cleared() {
    let db = testing::setup_test_db().await;
    let sv = User::new(&db);
    let keys = keys();
    register(&sv, "Anu").await;

    let (user, code) = sv
      .forgot_password("anu@test.io", &keys, Duration::from_secs(900))
      .await
      .unwrap();

    user::ActiveModel {
      reset_password_expires: Set(Some(now() - TimeDelta::minutes(1))),
      ..user.into()
    }
    .update(&db)
    .await
    .unwrap();

    assert!(sv.reset_password("anu@test.io", &code, "newpass1", &keys).await.is_err());
    assert_eq!(sv.clear_expired_resets().await.unwrap(), 1);

    let user = sv.by_email("anu@test.io").await.unwrap().unwrap();
    assert!(user.reset_password_token.is_none());
  }

  #[tokio::test]
  async fn test_change_password() {
    let db = testing::setup_test_db().await;
    let sv = User::new(&db);
    let user = register(&sv, "Dorj").await;

    assert!(matches!(
      sv.change_password(user.id, "nope", "newpass1").await,
      Err(Error::Auth(Auth::WrongPassword))
    ));
    sv.change_password(user.id, "secret1", "newpass1").await.unwrap();
    assert!(sv.login("dorj@test.io", "newpass1").await.is_ok());
  }

  #[tokio::test]
  async fn test_update_profile_rejects_taken_email() {
    let db = testing::setup_test_db().await;
    let sv = User::new(&db);
    let a = register(&sv, "Aaa").await;
    register(&sv, "Bbb").await;

    let taken = sv
      .update_profile(
        a.id,
        ProfileUpdate {
          name: Some("Aaa".into()),
          email: Some("bbb@test.io".into()),
          profile_image: None,
        },
      )
      .await;
    assert!(matches!(taken, Err(Error::Conflict(_))));

    let updated = sv
      .update_profile(
        a.id,
        ProfileUpdate {
          name: Some("Aaa Renamed".into()),
          email: Some("aaa@test.io".into()),
          profile_image: Some("/img/a.png".into()),
        },
      )
      .await
      .unwrap();
    assert_eq!(updated.name, "Aaa Renamed");
    assert_eq!(updated.profile_image.as_deref(), Some("/img/a.png"));
  }

  #[tokio::test]
  async fn test_role_change_rules() {
    let db = testing::setup_test_db().await;
    let sv = User::new(&db);
    let admin = testing::actor(&db, "Root", Role::Admin).await;
    let instructor = testing::actor(&db, "Tutor", Role::TestAdmin).await;
    let learner = testing::user(&db, "Learner", Role::User).await;

    assert!(matches!(
      sv.set_role(&admin, admin.id, Role::User).await,
      Err(Error::Forbidden(_))
    ));
    assert!(matches!(
      sv.set_role(&instructor, learner.id, Role::Admin).await,
      Err(Error::Forbidden(_))
    ));

    let promoted = sv.set_role(&admin, learner.id, Role::TestAdmin).await.unwrap();
    assert_eq!(promoted.role, Role::TestAdmin);
    assert_eq!(promoted.bio.as_deref(), Some(DEFAULT_BIO));

    let logs = sv::Audit::new(&db).recent(10).await.unwrap();
    assert_eq!(logs[0].log.action, "update_user_role");
  }

  #[tokio::test]
  async fn test_status_change_rules() {
    let db = testing::setup_test_db().await;
    let sv = User::new(&db);
    let admin = testing::actor(&db, "Root", Role::Admin).await;
    let other_admin = testing::user(&db, "Root Two", Role::Admin).await;
    let instructor = testing::actor(&db, "Tutor", Role::TestAdmin).await;
    let learner = testing::user(&db, "Learner", Role::User).await;

    assert!(sv.set_status(&admin, admin.id, Status::Banned).await.is_err());
    assert!(sv.set_status(&instructor, instructor.id, Status::Banned).await.is_err());
    assert!(matches!(
      sv.set_status(&instructor, other_admin.id, Status::Banned).await,
      Err(Error::Forbidden(_))
    ));

    let banned = sv.set_status(&instructor, learner.id, Status::Banned).await.unwrap();
    assert_eq!(banned.status, Status::Banned);
    assert!(sv.set_status(&admin, other_admin.id, Status::Suspended).await.is_ok());
  }

  #[tokio::test]
  async fn test_list_and_detail() {
    let db = testing::setup_test_db().await;
    let sv = User::new(&db);
    let tutor = testing::user(&db, "Tutor", Role::TestAdmin).await;
    let learner = testing::user(&db, "Learner", Role::User).await;
    testing::user(&db, "Someone", Role::User).await;

    let course = testing::course(&db, tutor.id, 1000).await;
    testing::enroll(&db, learner.id, course.id).await;

    let learners = sv
      .list(UserFilter { role: Some(Role::User), ..Default::default() })
      .await
      .unwrap();
    assert_eq!(learners.len(), 2);

    let found = sv
      .list(UserFilter { search: Some("learn".into()), ..Default::default() })
      .await
      .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].enrolled_courses, 1);

    let detail = sv.detail(learner.id).await.unwrap();
    assert_eq!(detail.total_enrollments, 1);
    assert_eq!(detail.enrollments[0].id, course.id);
  }

  #[tokio::test]
  async fn test_instructor_listing() {
    let db = testing::setup_test_db().await;
    let sv = User::new(&db);
    let busy = testing::user(&db, "Busy", Role::TestAdmin).await;
    testing::user(&db, "Idle", Role::TestAdmin).await;
    let a = testing::user(&db, "Student A", Role::User).await;
    let b = testing::user(&db, "Student B", Role::User).await;

    let c1 = testing::course(&db, busy.id, 100).await;
    let c2 = testing::course(&db, busy.id, 200).await;
    testing::enroll(&db, a.id, c1.id).await;
    testing::enroll(&db, a.id, c2.id).await;
    testing::enroll(&db, b.id, c2.id).await;

    let rows = sv.instructors().await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, busy.id);
    assert_eq!(rows[0].total_courses, 2);
    assert_eq!(rows[0].total_students, 2);

    let detail = sv.instructor(busy.id).await.unwrap();
    assert_eq!(detail.courses.len(), 2);
    assert!(matches!(sv.instructor(a.id).await, Err(Error::NotFound(_))));
  }
}
