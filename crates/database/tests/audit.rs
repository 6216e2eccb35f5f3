mod common;

use common::setup;
use database::{
    StoreError,
    entities::{audit_log, course, department, semester, student},
    services::{
        audit::AuditService, department::DepartmentService, seed::SeedService,
        student::StudentService,
    },
};
use models::{audit::NewAuditEntry, student::NewStudent};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, EntityTrait, IntoActiveModel, ModelTrait, PaginatorTrait,
    prelude::Expr,
};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn audit_entries_are_appended_for_any_entity_id() {
    let db = setup().await;
    let dangling = Uuid::new_v4();

    let first = AuditService::record_audit(
        &db,
        NewAuditEntry::new("students", dangling, "create", "registrar")
            .with_details(json!({ "source": "import" })),
    )
    .await
    .expect("audit entry should be recorded");
    assert_eq!(first.entity_id, dangling.to_string());
    assert_eq!(first.details, Some(json!({ "source": "import" })));

    let second = AuditService::record_audit(
        &db,
        NewAuditEntry::new("students", dangling, "create", "registrar"),
    )
    .await
    .expect("identical entries are both kept");
    assert_ne!(first.id, second.id);

    let entries = AuditService::list_for_entity(&db, "students", &dangling.to_string())
        .await
        .expect("listing should succeed");
    assert_eq!(entries.len(), 2);
    assert!(entries[0].created_at >= entries[1].created_at);

    assert!(AuditService::list_for_entity(&db, "courses", &dangling.to_string())
        .await
        .expect("listing should succeed")
        .is_empty());
}

#[tokio::test]
async fn audit_entry_requires_entity_and_action() {
    let db = setup().await;

    let err = AuditService::record_audit(&db, NewAuditEntry::new(" ", "1", "create", "registrar"))
        .await
        .unwrap_err();
    assert!(err.is_invariant_violation());

    let err = AuditService::record_audit(&db, NewAuditEntry::new("students", "1", "", "registrar"))
        .await
        .unwrap_err();
    assert!(err.is_invariant_violation());
}

#[tokio::test]
async fn audit_entries_cannot_be_changed_or_removed() {
    let db = setup().await;
    let entry = AuditService::record_audit(
        &db,
        NewAuditEntry::new("courses", "CS101", "update", "registrar"),
    )
    .await
    .expect("audit entry should be recorded");

    let mut model = entry.clone().into_active_model();
    model.action = Set("delete".to_string());
    assert!(model.update(&db).await.is_err());

    assert!(entry.clone().delete(&db).await.is_err());

    let stored = audit_log::Entity::find_by_id(entry.id)
        .one(&db)
        .await
        .expect("lookup should succeed")
        .expect("entry should still exist");
    assert_eq!(stored, entry);
}

#[tokio::test]
async fn audit_entries_reject_bulk_statements() {
    let db = setup().await;
    let entry = AuditService::record_audit(
        &db,
        NewAuditEntry::new("students", "REG2025001", "create", "registrar"),
    )
    .await
    .expect("audit entry should be recorded");

    let err = audit_log::Entity::update_many()
        .col_expr(audit_log::Column::Action, Expr::value("purge"))
        .exec(&db)
        .await
        .map_err(StoreError::from)
        .unwrap_err();
    assert!(err.is_invariant_violation());

    let err = audit_log::Entity::delete_by_id(entry.id)
        .exec(&db)
        .await
        .map_err(StoreError::from)
        .unwrap_err();
    assert!(err.is_invariant_violation());

    let err = audit_log::Entity::delete_many()
        .exec(&db)
        .await
        .map_err(StoreError::from)
        .unwrap_err();
    assert!(err.is_invariant_violation());

    let stored = audit_log::Entity::find_by_id(entry.id)
        .one(&db)
        .await
        .expect("lookup should succeed")
        .expect("entry should still exist");
    assert_eq!(stored, entry);
}

#[tokio::test]
async fn audit_entries_keep_long_values() {
    let db = setup().await;
    let entity_name = "student_profile_changes".repeat(4);
    let entity_id = "x".repeat(300);
    let action = "bulk-import-".repeat(20);
    let performed_by = "registrar.office@example.edu/".repeat(5);

    let entry = AuditService::record_audit(
        &db,
        NewAuditEntry::new(&entity_name, &entity_id, &action, &performed_by),
    )
    .await
    .expect("long values should be stored");
    assert_eq!(entry.entity_name, entity_name);
    assert_eq!(entry.entity_id, entity_id);
    assert_eq!(entry.action, action);
    assert_eq!(entry.performed_by, performed_by);
}

#[tokio::test]
async fn failed_seed_writes_nothing() {
    let db = setup().await;
    let holder = StudentService::create_student(
        &db,
        NewStudent::new("REG1999001", "Jane", "Smith", "john.doe@example.edu"),
    )
    .await
    .expect("student should be created");

    let err = SeedService::seed_sample_data(&db).await.unwrap_err();
    assert!(err.is_uniqueness_violation());

    assert!(DepartmentService::find_by_code(&db, "CS")
        .await
        .expect("lookup should succeed")
        .is_none());
    assert_eq!(department::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(course::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(semester::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(student::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(audit_log::Entity::find().count(&db).await.unwrap(), 0);

    StudentService::delete_student(&db, holder.id)
        .await
        .expect("student should be deleted");
    assert!(SeedService::seed_sample_data(&db)
        .await
        .expect("seed should succeed once the conflict is gone"));
}

#[tokio::test]
async fn seeding_is_idempotent() {
    let db = setup().await;

    let seeded = SeedService::seed_sample_data(&db)
        .await
        .expect("seed should succeed");
    assert!(seeded);

    let seeded_again = SeedService::seed_sample_data(&db)
        .await
        .expect("second seed should succeed");
    assert!(!seeded_again);

    assert_eq!(
        DepartmentService::list_departments(&db)
            .await
            .expect("listing should succeed")
            .len(),
        2
    );

    let john = StudentService::find_by_registration_number(&db, "REG2025001")
        .await
        .expect("lookup should succeed")
        .expect("seeded student should exist");
    let record = StudentService::get_student_record(&db, john.id)
        .await
        .expect("record lookup should succeed")
        .expect("record should exist");
    assert!(record.profile.is_some());
    assert_eq!(record.addresses.len(), 1);
    assert_eq!(record.enrollments.len(), 1);
    assert_eq!(record.enrollments[0].course.code, "CS101");

    assert_eq!(audit_log::Entity::find().count(&db).await.unwrap(), 1);
}
