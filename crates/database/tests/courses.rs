mod common;

use common::{course, date, department, fall_2025, new_course, offering, setup, student};
use database::{
    StoreError,
    entities::{
        course, course_instructor, course_offering, course_prerequisite, department, enrollment,
    },
    services::{
        course::CourseService, department::DepartmentService, enrollment::EnrollmentService,
        instructor::InstructorService, offering::OfferingService, semester::SemesterService,
    },
};
use models::{
    course::{NewInstructor, NewOffering, NewSemester},
    status::InstructorRole,
};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait, IntoActiveModel, PaginatorTrait};
use uuid::Uuid;

fn new_instructor(last_name: &str, department_id: Option<Uuid>) -> NewInstructor {
    NewInstructor {
        first_name: "Pat".to_string(),
        last_name: last_name.to_string(),
        email: format!("{}@example.edu", last_name.to_lowercase()),
        department_id,
    }
}

#[tokio::test]
async fn catalog_scenario_rejects_duplicate_section() {
    let db = setup().await;

    let cs = department(&db, "Computer Science", "CS").await;
    let cs101 = CourseService::create_course(&db, new_course("CS101", 3, Some(cs.id)))
        .await
        .expect("course should be created");
    assert_eq!(cs101.credits, 3);
    assert_eq!(cs101.department_id, Some(cs.id));

    let fall = fall_2025(&db).await;
    let section_a = NewOffering {
        course_id: cs101.id,
        semester_id: fall.id,
        section: "A".to_string(),
        capacity: 50,
    };
    let created = OfferingService::create_offering(&db, section_a.clone())
        .await
        .expect("offering should be created");
    assert_eq!(created.capacity, 50);

    let err = OfferingService::create_offering(&db, section_a)
        .await
        .unwrap_err();
    assert!(err.is_uniqueness_violation(), "got {err:?}");
    assert_eq!(course_offering::Entity::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn credits_must_be_positive() {
    let db = setup().await;

    let err = CourseService::create_course(&db, new_course("CS100", 0, None))
        .await
        .unwrap_err();
    assert!(err.is_invariant_violation(), "got {err:?}");

    let err = CourseService::create_course(&db, new_course("CS100", -2, None))
        .await
        .unwrap_err();
    assert!(err.is_invariant_violation(), "got {err:?}");

    let one = CourseService::create_course(&db, new_course("CS100", 1, None))
        .await
        .expect("one credit is allowed");
    assert_eq!(one.credits, 1);

    let err = CourseService::update_credits(&db, one.id, 0)
        .await
        .unwrap_err();
    assert!(err.is_invariant_violation());
    let updated = CourseService::update_credits(&db, one.id, 4)
        .await
        .expect("update should succeed");
    assert_eq!(updated.credits, 4);
}

#[tokio::test]
async fn course_codes_are_unique_and_departments_must_exist() {
    let db = setup().await;
    course(&db, "CS101", None).await;

    let err = CourseService::create_course(&db, new_course("CS101", 3, None))
        .await
        .unwrap_err();
    assert!(err.is_uniqueness_violation(), "got {err:?}");

    let err = CourseService::create_course(&db, new_course("CS102", 3, Some(Uuid::new_v4())))
        .await
        .unwrap_err();
    assert!(err.is_referential_violation(), "got {err:?}");

    let found = CourseService::find_by_code(&db, "CS101")
        .await
        .expect("lookup should succeed");
    assert!(found.is_some());
}

#[tokio::test]
async fn prerequisite_rules() {
    let db = setup().await;
    let cs101 = course(&db, "CS101", None).await;
    let cs201 = course(&db, "CS201", None).await;

    let err = CourseService::add_prerequisite(&db, cs101.id, cs101.id)
        .await
        .unwrap_err();
    assert!(err.is_invariant_violation(), "got {err:?}");

    let err = CourseService::add_prerequisite(&db, cs201.id, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(err.is_referential_violation(), "got {err:?}");

    let edge = CourseService::add_prerequisite(&db, cs201.id, cs101.id)
        .await
        .expect("edge should be added");
    assert_eq!(edge.course_id, cs201.id);
    assert_eq!(edge.prerequisite_course_id, cs101.id);

    let err = CourseService::add_prerequisite(&db, cs201.id, cs101.id)
        .await
        .unwrap_err();
    assert!(err.is_uniqueness_violation(), "got {err:?}");

    let prerequisites = CourseService::prerequisites_of(&db, cs201.id)
        .await
        .expect("listing should succeed");
    assert_eq!(prerequisites.len(), 1);
    assert_eq!(prerequisites[0].id, cs101.id);
}

#[tokio::test]
async fn prerequisite_cycles_are_rejected() {
    let db = setup().await;
    let cs101 = course(&db, "CS101", None).await;
    let cs201 = course(&db, "CS201", None).await;
    let cs301 = course(&db, "CS301", None).await;

    CourseService::add_prerequisite(&db, cs201.id, cs101.id)
        .await
        .expect("edge should be added");
    CourseService::add_prerequisite(&db, cs301.id, cs201.id)
        .await
        .expect("edge should be added");

    let err = CourseService::add_prerequisite(&db, cs101.id, cs201.id)
        .await
        .unwrap_err();
    assert!(err.is_invariant_violation(), "got {err:?}");

    let err = CourseService::add_prerequisite(&db, cs101.id, cs301.id)
        .await
        .unwrap_err();
    assert!(err.is_invariant_violation(), "got {err:?}");

    // Shortcut edges along the existing direction are fine
    CourseService::add_prerequisite(&db, cs301.id, cs101.id)
        .await
        .expect("edge should be added");

    CourseService::remove_prerequisite(&db, cs301.id, cs101.id)
        .await
        .expect("edge should be removed");
    let err = CourseService::remove_prerequisite(&db, cs301.id, cs101.id)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn instructors_are_assigned_with_roles() {
    let db = setup().await;
    let cs = department(&db, "Computer Science", "CS").await;
    let cs101 = course(&db, "CS101", Some(cs.id)).await;
    let cs201 = course(&db, "CS201", Some(cs.id)).await;
    let lead = InstructorService::create_instructor(&db, new_instructor("Turing", Some(cs.id)))
        .await
        .expect("instructor should be created");
    let assistant = InstructorService::create_instructor(&db, new_instructor("Hopper", None))
        .await
        .expect("instructor should be created");

    let link = CourseService::assign_instructor(&db, cs101.id, lead.id, InstructorRole::Lead)
        .await
        .expect("assignment should succeed");
    assert_eq!(link.role, InstructorRole::Lead);
    CourseService::assign_instructor(&db, cs101.id, assistant.id, InstructorRole::Assistant)
        .await
        .expect("assignment should succeed");

    let err = CourseService::assign_instructor(&db, cs101.id, lead.id, InstructorRole::Assistant)
        .await
        .unwrap_err();
    assert!(err.is_uniqueness_violation(), "got {err:?}");

    let err = CourseService::assign_instructor(&db, cs101.id, Uuid::new_v4(), InstructorRole::Lead)
        .await
        .unwrap_err();
    assert!(err.is_referential_violation(), "got {err:?}");

    CourseService::add_prerequisite(&db, cs201.id, cs101.id)
        .await
        .expect("edge should be added");

    let detail = CourseService::get_course_detail(&db, cs201.id)
        .await
        .expect("detail lookup should succeed")
        .expect("course should exist");
    assert!(detail.instructors.is_empty());
    assert_eq!(detail.prerequisites.len(), 1);

    let detail = CourseService::get_course_detail(&db, cs101.id)
        .await
        .expect("detail lookup should succeed")
        .expect("course should exist");
    assert_eq!(detail.department.map(|d| d.code), Some("CS".to_string()));
    assert_eq!(detail.instructors.len(), 2);
    assert_eq!(detail.instructors[0].instructor.id, lead.id);
    assert_eq!(detail.instructors[0].role, InstructorRole::Lead);
    assert_eq!(detail.instructors[1].role, InstructorRole::Assistant);

    CourseService::remove_instructor(&db, cs101.id, assistant.id)
        .await
        .expect("removal should succeed");
    let err = CourseService::remove_instructor(&db, cs101.id, assistant.id)
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    InstructorService::delete_instructor(&db, lead.id)
        .await
        .expect("delete should succeed");
    assert_eq!(course_instructor::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn delete_course_cascades() {
    let db = setup().await;
    let cs101 = course(&db, "CS101", None).await;
    let cs201 = course(&db, "CS201", None).await;
    let instructor = InstructorService::create_instructor(&db, new_instructor("Turing", None))
        .await
        .expect("instructor should be created");
    let fall = fall_2025(&db).await;
    let section = offering(&db, cs101.id, fall.id, "A").await;
    offering(&db, cs201.id, fall.id, "A").await;
    let john = student(&db, "REG2025001").await;

    EnrollmentService::create_enrollment(&db, john.id, section.id)
        .await
        .expect("enrollment should be created");
    CourseService::assign_instructor(&db, cs101.id, instructor.id, InstructorRole::Lead)
        .await
        .expect("assignment should succeed");
    CourseService::add_prerequisite(&db, cs201.id, cs101.id)
        .await
        .expect("edge should be added");

    let deletion = CourseService::delete_course(&db, cs101.id)
        .await
        .expect("delete should succeed");
    assert_eq!(deletion.offerings, 1);
    assert_eq!(deletion.enrollments, 1);
    assert_eq!(deletion.instructor_links, 1);
    assert_eq!(deletion.prerequisite_links, 1);

    assert_eq!(course_offering::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(enrollment::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(course_prerequisite::Entity::find().count(&db).await.unwrap(), 0);
    assert!(InstructorService::get_instructor(&db, instructor.id)
        .await
        .expect("lookup should succeed")
        .is_some());

    let err = CourseService::delete_course(&db, cs101.id)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn delete_department_nullifies_references() {
    let db = setup().await;
    let cs = department(&db, "Computer Science", "CS").await;
    let math = department(&db, "Mathematics", "MATH").await;
    let cs101 = course(&db, "CS101", Some(cs.id)).await;
    let math101 = course(&db, "MATH101", Some(math.id)).await;
    let instructor =
        InstructorService::create_instructor(&db, new_instructor("Turing", Some(cs.id)))
            .await
            .expect("instructor should be created");

    let deletion = DepartmentService::delete_department(&db, cs.id)
        .await
        .expect("delete should succeed");
    assert_eq!(deletion.courses, 1);
    assert_eq!(deletion.instructors, 1);

    let cs101 = CourseService::get_course(&db, cs101.id)
        .await
        .expect("lookup should succeed")
        .expect("course should survive");
    assert_eq!(cs101.department_id, None);

    let instructor = InstructorService::get_instructor(&db, instructor.id)
        .await
        .expect("lookup should succeed")
        .expect("instructor should survive");
    assert_eq!(instructor.department_id, None);

    let math101 = CourseService::get_course(&db, math101.id)
        .await
        .expect("lookup should succeed")
        .expect("course should survive");
    assert_eq!(math101.department_id, Some(math.id));

    assert!(DepartmentService::get_department(&db, cs.id)
        .await
        .expect("lookup should succeed")
        .is_none());
    let err = DepartmentService::delete_department(&db, cs.id)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn department_names_and_codes_are_unique() {
    let db = setup().await;
    department(&db, "Computer Science", "CS").await;

    let err = DepartmentService::create_department(
        &db,
        models::course::NewDepartment {
            name: "Computing".to_string(),
            code: "CS".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(err.is_uniqueness_violation(), "got {err:?}");

    let departments = DepartmentService::list_departments(&db)
        .await
        .expect("listing should succeed");
    assert_eq!(departments.len(), 1);
}

#[tokio::test]
async fn instructors_move_between_departments() {
    let db = setup().await;
    let cs = department(&db, "Computer Science", "CS").await;
    let math = department(&db, "Mathematics", "MATH").await;
    let instructor =
        InstructorService::create_instructor(&db, new_instructor("Noether", Some(cs.id)))
            .await
            .expect("instructor should be created");

    let err = InstructorService::create_instructor(&db, new_instructor("Noether", None))
        .await
        .unwrap_err();
    assert!(err.is_uniqueness_violation(), "got {err:?}");

    let moved = InstructorService::set_department(&db, instructor.id, Some(math.id))
        .await
        .expect("move should succeed");
    assert_eq!(moved.department_id, Some(math.id));

    let err = InstructorService::set_department(&db, instructor.id, Some(Uuid::new_v4()))
        .await
        .unwrap_err();
    assert!(err.is_referential_violation(), "got {err:?}");

    let in_math = InstructorService::list_for_department(&db, math.id)
        .await
        .expect("listing should succeed");
    assert_eq!(in_math.len(), 1);
    assert!(InstructorService::list_for_department(&db, cs.id)
        .await
        .expect("listing should succeed")
        .is_empty());
}

#[tokio::test]
async fn semester_and_offering_invariants() {
    let db = setup().await;
    let cs101 = course(&db, "CS101", None).await;

    let err = SemesterService::create_semester(
        &db,
        NewSemester {
            name: "Backwards".to_string(),
            start_date: date(2025, 12, 20),
            end_date: date(2025, 9, 1),
            is_active: false,
        },
    )
    .await
    .unwrap_err();
    assert!(err.is_invariant_violation(), "got {err:?}");

    let fall = fall_2025(&db).await;
    let err = SemesterService::create_semester(
        &db,
        NewSemester {
            name: "Fall 2025".to_string(),
            start_date: date(2026, 9, 1),
            end_date: date(2026, 12, 20),
            is_active: false,
        },
    )
    .await
    .unwrap_err();
    assert!(err.is_uniqueness_violation(), "got {err:?}");

    let err = OfferingService::create_offering(
        &db,
        NewOffering {
            course_id: cs101.id,
            semester_id: fall.id,
            section: "A".to_string(),
            capacity: 0,
        },
    )
    .await
    .unwrap_err();
    assert!(err.is_invariant_violation(), "got {err:?}");

    let err = OfferingService::create_offering(
        &db,
        NewOffering {
            course_id: cs101.id,
            semester_id: Uuid::new_v4(),
            section: "A".to_string(),
            capacity: 30,
        },
    )
    .await
    .unwrap_err();
    assert!(err.is_referential_violation(), "got {err:?}");

    offering(&db, cs101.id, fall.id, "B").await;
    offering(&db, cs101.id, fall.id, "A").await;
    let scheduled = OfferingService::list_for_semester(&db, fall.id)
        .await
        .expect("listing should succeed");
    let sections: Vec<_> = scheduled.iter().map(|s| s.offering.section.as_str()).collect();
    assert_eq!(sections, ["A", "B"]);
    assert!(scheduled.iter().all(|s| s.course.id == cs101.id));
}

#[tokio::test]
async fn semesters_toggle_and_cascade() {
    let db = setup().await;
    let cs101 = course(&db, "CS101", None).await;
    let fall = fall_2025(&db).await;
    let section = offering(&db, cs101.id, fall.id, "A").await;
    let john = student(&db, "REG2025001").await;
    EnrollmentService::create_enrollment(&db, john.id, section.id)
        .await
        .expect("enrollment should be created");

    let active = SemesterService::list_active(&db)
        .await
        .expect("listing should succeed");
    assert_eq!(active.len(), 1);

    SemesterService::set_active(&db, fall.id, false)
        .await
        .expect("toggle should succeed");
    assert!(SemesterService::list_active(&db)
        .await
        .expect("listing should succeed")
        .is_empty());

    let deletion = SemesterService::delete_semester(&db, fall.id)
        .await
        .expect("delete should succeed");
    assert_eq!(deletion.offerings, 1);
    assert_eq!(deletion.enrollments, 1);
    assert!(OfferingService::get_offering(&db, section.id)
        .await
        .expect("lookup should succeed")
        .is_none());
}

#[tokio::test]
async fn storage_rejects_rule_breaking_writes() {
    let db = setup().await;
    let cs101 = course(&db, "CS101", None).await;

    let mut model = cs101.clone().into_active_model();
    model.credits = Set(0);
    let err = model.update(&db).await.map_err(StoreError::from).unwrap_err();
    assert!(err.is_invariant_violation(), "got {err:?}");

    let edge = course_prerequisite::ActiveModel {
        course_id: Set(cs101.id),
        prerequisite_course_id: Set(cs101.id),
        ..Default::default()
    };
    let err = edge.insert(&db).await.map_err(StoreError::from).unwrap_err();
    assert!(err.is_invariant_violation(), "got {err:?}");

    let stored = CourseService::get_course(&db, cs101.id)
        .await
        .expect("lookup should succeed")
        .expect("course should exist");
    assert_eq!(stored.credits, 3);
    assert_eq!(course_prerequisite::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn course_row_delete_cascades_in_storage() {
    let db = setup().await;
    let cs101 = course(&db, "CS101", None).await;
    let cs201 = course(&db, "CS201", None).await;
    let cs301 = course(&db, "CS301", None).await;
    let instructor = InstructorService::create_instructor(&db, new_instructor("Hopper", None))
        .await
        .expect("instructor should be created");
    let fall = fall_2025(&db).await;
    let section = offering(&db, cs101.id, fall.id, "A").await;
    offering(&db, cs201.id, fall.id, "A").await;
    let john = student(&db, "REG2025001").await;

    EnrollmentService::create_enrollment(&db, john.id, section.id)
        .await
        .expect("enrollment should be created");
    CourseService::assign_instructor(&db, cs101.id, instructor.id, InstructorRole::Lead)
        .await
        .expect("assignment should succeed");
    CourseService::add_prerequisite(&db, cs201.id, cs101.id)
        .await
        .expect("edge should be added");
    CourseService::add_prerequisite(&db, cs101.id, cs301.id)
        .await
        .expect("edge should be added");

    let result = course::Entity::delete_by_id(cs101.id)
        .exec(&db)
        .await
        .expect("delete should succeed");
    assert_eq!(result.rows_affected, 1);

    let remaining = course_offering::Entity::find()
        .all(&db)
        .await
        .expect("listing should succeed");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].course_id, cs201.id);
    assert_eq!(enrollment::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(course_instructor::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(course_prerequisite::Entity::find().count(&db).await.unwrap(), 0);
    assert!(InstructorService::get_instructor(&db, instructor.id)
        .await
        .expect("lookup should succeed")
        .is_some());
}

#[tokio::test]
async fn department_row_delete_nulls_references_in_storage() {
    let db = setup().await;
    let cs = department(&db, "Computer Science", "CS").await;
    let cs101 = course(&db, "CS101", Some(cs.id)).await;
    let instructor =
        InstructorService::create_instructor(&db, new_instructor("Hopper", Some(cs.id)))
            .await
            .expect("instructor should be created");

    let result = department::Entity::delete_by_id(cs.id)
        .exec(&db)
        .await
        .expect("delete should succeed");
    assert_eq!(result.rows_affected, 1);

    let cs101 = CourseService::get_course(&db, cs101.id)
        .await
        .expect("lookup should succeed")
        .expect("course should survive");
    assert_eq!(cs101.department_id, None);

    let instructor = InstructorService::get_instructor(&db, instructor.id)
        .await
        .expect("lookup should succeed")
        .expect("instructor should survive");
    assert_eq!(instructor.department_id, None);
}
