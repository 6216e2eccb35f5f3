use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator};

#[cfg(feature = "database")]
use sea_orm::{DeriveActiveEnum, sea_query::StringLen};

/// Standing of a student within the university
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[cfg_attr(
    feature = "database",
    derive(DeriveActiveEnum),
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StudentStatus {
    #[default]
    #[cfg_attr(feature = "database", sea_orm(string_value = "active"))]
    Active,
    #[cfg_attr(feature = "database", sea_orm(string_value = "suspended"))]
    Suspended,
    #[cfg_attr(feature = "database", sea_orm(string_value = "graduated"))]
    Graduated,
    #[cfg_attr(feature = "database", sea_orm(string_value = "withdrawn"))]
    Withdrawn,
}

/// State of a single enrollment in an offering
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[cfg_attr(
    feature = "database",
    derive(DeriveActiveEnum),
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EnrollmentStatus {
    #[default]
    #[cfg_attr(feature = "database", sea_orm(string_value = "enrolled"))]
    Enrolled,
    #[cfg_attr(feature = "database", sea_orm(string_value = "dropped"))]
    Dropped,
    #[cfg_attr(feature = "database", sea_orm(string_value = "completed"))]
    Completed,
    #[cfg_attr(feature = "database", sea_orm(string_value = "withdrawn"))]
    Withdrawn,
}

/// Role an instructor plays on a course
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[cfg_attr(
    feature = "database",
    derive(DeriveActiveEnum),
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InstructorRole {
    #[default]
    #[cfg_attr(feature = "database", sea_orm(string_value = "lead"))]
    Lead,
    #[cfg_attr(feature = "database", sea_orm(string_value = "assistant"))]
    Assistant,
}

impl StudentStatus {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    pub fn all() -> Vec<StudentStatus> {
        StudentStatus::iter().collect()
    }
}

impl EnrollmentStatus {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    pub fn all() -> Vec<EnrollmentStatus> {
        EnrollmentStatus::iter().collect()
    }
}

impl InstructorRole {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    pub fn all() -> Vec<InstructorRole> {
        InstructorRole::iter().collect()
    }
}
