pub mod address;
pub mod audit_log;
pub mod course;
pub mod course_instructor;
pub mod course_offering;
pub mod course_prerequisite;
pub mod department;
pub mod enrollment;
pub mod instructor;
pub mod semester;
pub mod student;
pub mod student_profile;

use chrono::Utc;
use sea_orm::prelude::DateTime;

/// Timestamp written into `created_at`/`updated_at` columns
pub(crate) fn now() -> DateTime {
    Utc::now().naive_utc()
}
