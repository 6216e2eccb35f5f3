use crate::status::StudentStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Fields required to register a new student
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStudent {
    pub registration_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    /// Defaults to `active` when omitted
    #[serde(default)]
    pub status: Option<StudentStatus>,
    /// Defaults to today when omitted
    #[serde(default)]
    pub enrolled_date: Option<NaiveDate>,
}

impl NewStudent {
    pub fn new(
        registration_number: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            registration_number: registration_number.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone: None,
            date_of_birth: None,
            status: None,
            enrolled_date: None,
        }
    }
}

/// Partial update of a student's contact details; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<Option<String>>,
    pub date_of_birth: Option<Option<NaiveDate>>,
}

/// One-to-one profile details of a student
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewProfile {
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub bio: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
}

/// A postal address owned by a student
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAddress {
    /// e.g. "home", "term", "mailing"
    pub label: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: String,
    #[serde(default)]
    pub is_primary: bool,
}
