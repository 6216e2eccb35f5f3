use super::{find_target, non_blank, require_parent};
use crate::{
    entities::{course_offering, enrollment, student},
    error::{StoreError, StoreResult},
};
use log::{debug, info, warn};
use models::status::EnrollmentStatus;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, TransactionTrait,
};
use uuid::Uuid;

pub struct EnrollmentService;

impl EnrollmentService {
    /// Enrolls a student in an offering with status `enrolled` and no grade
    pub async fn create_enrollment<C>(
        db: &C,
        student_id: Uuid,
        offering_id: Uuid,
    ) -> StoreResult<enrollment::Model>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let txn = db.begin().await?;
        require_parent::<student::Entity, _>(&txn, "student", student_id).await?;
        require_parent::<course_offering::Entity, _>(&txn, "offering", offering_id).await?;

        let model = enrollment::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(student_id),
            offering_id: Set(offering_id),
            status: Set(EnrollmentStatus::Enrolled),
            grade: Set(None),
            ..Default::default()
        };

        let enrollment = model
            .insert(&txn)
            .await
            .map_err(StoreError::from)
            .inspect_err(|e| warn!("Rejected enrollment of {student_id} in {offering_id}: {e}"))?;
        txn.commit().await?;

        debug!("Enrolled student {student_id} in offering {offering_id}");
        Ok(enrollment)
    }

    pub async fn get_enrollment<C>(
        db: &C,
        enrollment_id: Uuid,
    ) -> StoreResult<Option<enrollment::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(enrollment::Entity::find_by_id(enrollment_id).one(db).await?)
    }

    /// Sets the status, any transition between statuses is accepted
    pub async fn set_status<C>(
        db: &C,
        enrollment_id: Uuid,
        status: EnrollmentStatus,
    ) -> StoreResult<enrollment::Model>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let txn = db.begin().await?;
        let mut model = find_target::<enrollment::Entity, _>(&txn, "enrollment", enrollment_id)
            .await?
            .into_active_model();
        model.status = Set(status);

        let enrollment = model.update(&txn).await?;
        txn.commit().await?;

        info!("Enrollment {} is now {}", enrollment.id, status.as_str());
        Ok(enrollment)
    }

    /// Records a free-text grade, blank input clears it
    pub async fn set_grade<C>(
        db: &C,
        enrollment_id: Uuid,
        grade: Option<String>,
    ) -> StoreResult<enrollment::Model>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let txn = db.begin().await?;
        let mut model = find_target::<enrollment::Entity, _>(&txn, "enrollment", enrollment_id)
            .await?
            .into_active_model();
        model.grade = Set(non_blank(grade));

        let enrollment = model.update(&txn).await?;
        txn.commit().await?;
        Ok(enrollment)
    }

    pub async fn list_for_student<C>(
        db: &C,
        student_id: Uuid,
    ) -> StoreResult<Vec<enrollment::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(enrollment::Entity::find()
            .filter(enrollment::Column::StudentId.eq(student_id))
            .order_by_asc(enrollment::Column::EnrolledAt)
            .all(db)
            .await?)
    }

    pub async fn list_for_offering<C>(
        db: &C,
        offering_id: Uuid,
    ) -> StoreResult<Vec<enrollment::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(enrollment::Entity::find()
            .filter(enrollment::Column::OfferingId.eq(offering_id))
            .order_by_asc(enrollment::Column::EnrolledAt)
            .all(db)
            .await?)
    }

    pub async fn delete_enrollment<C>(db: &C, enrollment_id: Uuid) -> StoreResult<()>
    where
        C: ConnectionTrait,
    {
        let result = enrollment::Entity::delete_by_id(enrollment_id)
            .exec(db)
            .await?;
        if result.rows_affected == 0 {
            return Err(StoreError::not_found("enrollment", enrollment_id));
        }
        Ok(())
    }
}
