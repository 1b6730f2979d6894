//! SeaORM entity definitions

pub mod admin_log;
pub mod category;
pub mod course;
pub mod discount;
pub mod enrollment;
pub mod lesson;
pub mod progress;
pub mod rating;
pub mod section;
pub mod user;

pub use course::{CourseStatus, Level};
pub use enrollment::PaymentStatus;
pub use user::{Role, Status};
