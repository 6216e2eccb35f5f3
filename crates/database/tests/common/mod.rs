//! Shared fixtures for the store integration tests.
#![allow(dead_code)]

use chrono::NaiveDate;
use database::{
    db::connect_in_memory,
    entities::{course, course_offering, department, semester, student},
    services::{
        course::CourseService, department::DepartmentService, offering::OfferingService,
        semester::SemesterService, student::StudentService,
    },
};
use models::{
    course::{NewCourse, NewDepartment, NewOffering, NewSemester},
    student::NewStudent,
};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

/// Fresh in-memory database with every migration applied
pub async fn setup() -> DatabaseConnection {
    connect_in_memory()
        .await
        .expect("in-memory database should open and migrate")
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn new_course(code: &str, credits: i32, department_id: Option<Uuid>) -> NewCourse {
    NewCourse {
        code: code.to_string(),
        title: format!("{code} title"),
        description: None,
        credits,
        department_id,
    }
}

pub async fn department(db: &DatabaseConnection, name: &str, code: &str) -> department::Model {
    DepartmentService::create_department(
        db,
        NewDepartment {
            name: name.to_string(),
            code: code.to_string(),
        },
    )
    .await
    .expect("department should be created")
}

pub async fn course(
    db: &DatabaseConnection,
    code: &str,
    department_id: Option<Uuid>,
) -> course::Model {
    CourseService::create_course(db, new_course(code, 3, department_id))
        .await
        .expect("course should be created")
}

pub async fn fall_2025(db: &DatabaseConnection) -> semester::Model {
    SemesterService::create_semester(
        db,
        NewSemester {
            name: "Fall 2025".to_string(),
            start_date: date(2025, 9, 1),
            end_date: date(2025, 12, 20),
            is_active: true,
        },
    )
    .await
    .expect("semester should be created")
}

pub async fn offering(
    db: &DatabaseConnection,
    course_id: Uuid,
    semester_id: Uuid,
    section: &str,
) -> course_offering::Model {
    OfferingService::create_offering(
        db,
        NewOffering {
            course_id,
            semester_id,
            section: section.to_string(),
            capacity: 50,
        },
    )
    .await
    .expect("offering should be created")
}

pub async fn student(db: &DatabaseConnection, registration_number: &str) -> student::Model {
    let email = format!("{}@example.edu", registration_number.to_lowercase());
    StudentService::create_student(
        db,
        NewStudent::new(registration_number, "Test", "Student", email),
    )
    .await
    .expect("student should be created")
}
