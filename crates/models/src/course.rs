use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDepartment {
    pub name: String,
    /// Short code, e.g. "CS"
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInstructor {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCourse {
    /// Catalog code, e.g. "CS101"
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    /// Checked against [`crate::credits::Credits`] on write
    pub credits: i32,
    pub department_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSemester {
    /// e.g. "Fall 2025"
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub is_active: bool,
}

/// A section of a course scheduled in a semester
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOffering {
    pub course_id: Uuid,
    pub semester_id: Uuid,
    pub section: String,
    pub capacity: i32,
}
