//! Role capabilities and course ownership checks

use serde::Serialize;

use crate::{
  entity::{Role, Status, user},
  prelude::*,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
  /// Own courses, sections, lessons and discounts; read the admin panel.
  Teach,
  /// Touch courses regardless of their instructor.
  ManageAllCourses,
  DeleteCourses,
  ManageRoles,
  ManageCategories,
  /// Change another user's status.
  ModerateUsers,
  /// Platform-wide user counts and revenue.
  ViewPlatformStats,
  ViewAuditLog,
  CreateInstructors,
}

impl Role {
  pub fn can(self, cap: Capability) -> bool {
    use Capability::*;

    match self {
      Role::Admin => true,
      Role::TestAdmin => matches!(cap, Teach | ModerateUsers),
      Role::User => false,
    }
  }

  pub fn is_instructor(self) -> bool {
    self.can(Capability::Teach)
  }
}

/// Authenticated caller, loaded fresh from the database on every request.
#[derive(Debug, Clone, Serialize)]
pub struct Actor {
  pub id: i32,
  pub name: String,
  pub email: String,
  pub role: Role,
}

impl From<user::Model> for Actor {
  fn from(user: user::Model) -> Self {
    Self { id: user.id, name: user.name, email: user.email, role: user.role }
  }
}

impl Actor {
  pub fn can(&self, cap: Capability) -> bool {
    self.role.can(cap)
  }

  pub fn ensure(&self, cap: Capability) -> Result<()> {
    if self.can(cap) {
      Ok(())
    } else {
      Err(Error::Forbidden("You do not have permission for this action"))
    }
  }

  /// Instructors are confined to their own courses unless they manage all.
  pub fn ensure_owner(&self, instructor_id: i32) -> Result<()> {
    self.ensure(Capability::Teach)?;
    if self.id == instructor_id || self.can(Capability::ManageAllCourses) {
      Ok(())
    } else {
      Err(Error::Forbidden("You can only manage your own courses"))
    }
  }

  /// `Some(self.id)` when queries must be scoped to the actor's courses.
  pub fn course_scope(&self) -> Option<i32> {
    (!self.can(Capability::ManageAllCourses)).then_some(self.id)
  }

  pub fn ensure_can_moderate(&self, target: &user::Model) -> Result<()> {
    self.ensure(Capability::ModerateUsers)?;
    if target.id == self.id {
      return Err(Error::Forbidden("You cannot change your own status"));
    }
    if target.role == Role::Admin && self.role != Role::Admin {
      return Err(Error::Forbidden("Only an admin can change an admin's status"));
    }
    Ok(())
  }

  pub fn ensure_can_assign_role(&self, target: &user::Model) -> Result<()> {
    self.ensure(Capability::ManageRoles)?;
    if target.id == self.id {
      return Err(Error::Forbidden("You cannot change your own role"));
    }
    Ok(())
  }
}

impl Status {
  pub fn is_active(self) -> bool {
    self == Status::Active
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn actor(id: i32, role: Role) -> Actor {
    Actor { id, name: format!("user{id}"), email: format!("u{id}@x.io"), role }
  }

  fn target(id: i32, role: Role) -> user::Model {
    user::Model {
      id,
      name: "target".into(),
      email: "t@x.io".into(),
      password: String::new(),
      role,
      status: Status::Active,
      bio: None,
      teaching_categories: None,
      profile_image: None,
      profile_banner: None,
      reset_password_token: None,
      reset_password_expires: None,
      created_at: now(),
    }
  }

  #[test]
  fn test_capability_table() {
    use Capability::*;

    let all = [
      Teach,
      ManageAllCourses,
      DeleteCourses,
      ManageRoles,
      ManageCategories,
      ModerateUsers,
      ViewPlatformStats,
      ViewAuditLog,
      CreateInstructors,
    ];

    assert!(all.iter().all(|&cap| Role::Admin.can(cap)));
    assert!(all.iter().all(|&cap| !Role::User.can(cap)));

    let granted: Vec<_> =
      all.iter().copied().filter(|&cap| Role::TestAdmin.can(cap)).collect();
    assert_eq!(granted, vec![Teach, ModerateUsers]);
  }

  #[test]
  fn test_ownership() {
    let instructor = actor(2, Role::TestAdmin);
    assert!(instructor.ensure_owner(2).is_ok());
    assert!(matches!(instructor.ensure_owner(3), Err(Error::Forbidden(_))));
    assert_eq!(instructor.course_scope(), Some(2));

    let admin = actor(1, Role::Admin);
    assert!(admin.ensure_owner(3).is_ok());
    assert_eq!(admin.course_scope(), None);

    assert!(actor(5, Role::User).ensure_owner(5).is_err());
  }

  #[test]
  fn test_self_changes_always_fail() {
    let admin = actor(1, Role::Admin);
    let me = target(1, Role::Admin);

    assert!(admin.ensure_can_moderate(&me).is_err());
    assert!(admin.ensure_can_assign_role(&me).is_err());
  }

  #[test]
  fn test_only_admin_moderates_admin() {
    let instructor = actor(2, Role::TestAdmin);
    assert!(instructor.ensure_can_moderate(&target(1, Role::Admin)).is_err());
    assert!(instructor.ensure_can_moderate(&target(9, Role::User)).is_ok());
    assert!(instructor.ensure_can_assign_role(&target(9, Role::User)).is_err());

    let admin = actor(1, Role::Admin);
    assert!(admin.ensure_can_moderate(&target(3, Role::Admin)).is_ok());
  }
}
