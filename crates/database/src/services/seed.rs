use super::{
    audit::AuditService, course::CourseService, department::DepartmentService,
    enrollment::EnrollmentService, instructor::InstructorService, offering::OfferingService,
    semester::SemesterService, student::StudentService,
};
use crate::error::{StoreError, StoreResult};
use chrono::NaiveDate;
use log::info;
use models::{
    audit::NewAuditEntry,
    course::{NewCourse, NewDepartment, NewInstructor, NewOffering, NewSemester},
    status::InstructorRole,
    student::{NewAddress, NewProfile, NewStudent},
};
use sea_orm::{ConnectionTrait, DatabaseTransaction, TransactionTrait};
use serde_json::json;

const SEED_DEPARTMENT_CODE: &str = "CS";
const SEED_ACTOR: &str = "seed";

fn date(year: i32, month: u32, day: u32) -> StoreResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        StoreError::InvariantViolation(format!("invalid date {year}-{month}-{day}"))
    })
}

pub struct SeedService;

impl SeedService {
    /// Inserts the sample catalog and one enrolled student
    ///
    /// Returns `false` without writing anything when the sample data is already present.
    /// Every row is written in one transaction, so a failed seed leaves nothing behind.
    pub async fn seed_sample_data<C>(db: &C) -> StoreResult<bool>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let txn = db.begin().await?;
        if DepartmentService::find_by_code(&txn, SEED_DEPARTMENT_CODE)
            .await?
            .is_some()
        {
            info!("Sample data already present, skipping seed");
            return Ok(false);
        }

        Self::insert_sample_data(&txn).await?;
        txn.commit().await?;

        info!("Sample data seeded");
        Ok(true)
    }

    async fn insert_sample_data(db: &DatabaseTransaction) -> StoreResult<()> {
        info!("Seeding departments and instructors");
        let computer_science = DepartmentService::create_department(
            db,
            NewDepartment {
                name: "Computer Science".to_string(),
                code: SEED_DEPARTMENT_CODE.to_string(),
            },
        )
        .await?;
        let mathematics = DepartmentService::create_department(
            db,
            NewDepartment {
                name: "Mathematics".to_string(),
                code: "MATH".to_string(),
            },
        )
        .await?;

        let ada = InstructorService::create_instructor(
            db,
            NewInstructor {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada.lovelace@example.edu".to_string(),
                department_id: Some(computer_science.id),
            },
        )
        .await?;
        let alan = InstructorService::create_instructor(
            db,
            NewInstructor {
                first_name: "Alan".to_string(),
                last_name: "Turing".to_string(),
                email: "alan.turing@example.edu".to_string(),
                department_id: Some(computer_science.id),
            },
        )
        .await?;
        let emmy = InstructorService::create_instructor(
            db,
            NewInstructor {
                first_name: "Emmy".to_string(),
                last_name: "Noether".to_string(),
                email: "emmy.noether@example.edu".to_string(),
                department_id: Some(mathematics.id),
            },
        )
        .await?;

        info!("Seeding courses");
        let cs101 = CourseService::create_course(
            db,
            NewCourse {
                code: "CS101".to_string(),
                title: "Introduction to Programming".to_string(),
                description: Some("Fundamentals of programming and problem solving".to_string()),
                credits: 3,
                department_id: Some(computer_science.id),
            },
        )
        .await?;
        let cs201 = CourseService::create_course(
            db,
            NewCourse {
                code: "CS201".to_string(),
                title: "Data Structures".to_string(),
                description: Some("Lists, trees, graphs and their algorithms".to_string()),
                credits: 4,
                department_id: Some(computer_science.id),
            },
        )
        .await?;
        let math101 = CourseService::create_course(
            db,
            NewCourse {
                code: "MATH101".to_string(),
                title: "Calculus I".to_string(),
                description: None,
                credits: 4,
                department_id: Some(mathematics.id),
            },
        )
        .await?;

        CourseService::add_prerequisite(db, cs201.id, cs101.id).await?;
        CourseService::assign_instructor(db, cs101.id, ada.id, InstructorRole::Lead).await?;
        CourseService::assign_instructor(db, cs101.id, alan.id, InstructorRole::Assistant).await?;
        CourseService::assign_instructor(db, cs201.id, alan.id, InstructorRole::Lead).await?;
        CourseService::assign_instructor(db, math101.id, emmy.id, InstructorRole::Lead).await?;

        info!("Seeding semester and offerings");
        let fall = SemesterService::create_semester(
            db,
            NewSemester {
                name: "Fall 2025".to_string(),
                start_date: date(2025, 9, 1)?,
                end_date: date(2025, 12, 20)?,
                is_active: true,
            },
        )
        .await?;

        let cs101_a = OfferingService::create_offering(
            db,
            NewOffering {
                course_id: cs101.id,
                semester_id: fall.id,
                section: "A".to_string(),
                capacity: 50,
            },
        )
        .await?;
        for course_id in [cs201.id, math101.id] {
            OfferingService::create_offering(
                db,
                NewOffering {
                    course_id,
                    semester_id: fall.id,
                    section: "A".to_string(),
                    capacity: 40,
                },
            )
            .await?;
        }

        info!("Seeding sample student");
        let mut new_student = NewStudent::new("REG2025001", "John", "Doe", "john.doe@example.edu");
        new_student.phone = Some("+1-555-0100".to_string());
        new_student.date_of_birth = Some(date(2005, 4, 12)?);
        new_student.enrolled_date = Some(date(2025, 8, 25)?);
        let john = StudentService::create_student(db, new_student).await?;

        StudentService::create_profile(
            db,
            john.id,
            NewProfile {
                gender: Some("male".to_string()),
                nationality: Some("US".to_string()),
                bio: Some("First-year computer science student".to_string()),
                emergency_contact_name: Some("Jane Doe".to_string()),
                emergency_contact_phone: Some("+1-555-0101".to_string()),
            },
        )
        .await?;
        StudentService::add_address(
            db,
            john.id,
            NewAddress {
                label: "home".to_string(),
                line1: "123 Main Street".to_string(),
                line2: None,
                city: "Springfield".to_string(),
                state: Some("IL".to_string()),
                postal_code: Some("62701".to_string()),
                country: "US".to_string(),
                is_primary: true,
            },
        )
        .await?;

        let enrollment = EnrollmentService::create_enrollment(db, john.id, cs101_a.id).await?;

        AuditService::record_audit(
            db,
            NewAuditEntry::new("students", john.id, "create", SEED_ACTOR).with_details(json!({
                "registration_number": john.registration_number,
                "enrollment_id": enrollment.id,
            })),
        )
        .await?;

        Ok(())
    }
}
