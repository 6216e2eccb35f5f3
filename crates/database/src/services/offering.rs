use super::{find_target, require_parent};
use crate::{
    entities::{course, course_offering, enrollment, semester},
    error::{StoreError, StoreResult, require},
};
use log::{debug, info, warn};
use models::course::NewOffering;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

/// An offering with the course it schedules
#[derive(Debug, Clone, Serialize)]
pub struct ScheduledOffering {
    pub offering: course_offering::Model,
    pub course: course::Model,
}

pub struct OfferingService;

impl OfferingService {
    /// Schedules a section of a course in a semester
    ///
    /// `(course, semester, section)` is unique and capacity must be positive.
    pub async fn create_offering<C>(
        db: &C,
        new_offering: NewOffering,
    ) -> StoreResult<course_offering::Model>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        require("section", &new_offering.section)?;
        if new_offering.capacity <= 0 {
            return Err(StoreError::InvariantViolation(format!(
                "capacity must be positive, got {}",
                new_offering.capacity
            )));
        }

        let txn = db.begin().await?;
        require_parent::<course::Entity, _>(&txn, "course", new_offering.course_id).await?;
        require_parent::<semester::Entity, _>(&txn, "semester", new_offering.semester_id).await?;

        let section = new_offering.section.trim().to_string();
        let model = course_offering::ActiveModel {
            id: Set(Uuid::new_v4()),
            course_id: Set(new_offering.course_id),
            semester_id: Set(new_offering.semester_id),
            section: Set(section.clone()),
            capacity: Set(new_offering.capacity),
            ..Default::default()
        };

        let offering = model
            .insert(&txn)
            .await
            .map_err(StoreError::from)
            .inspect_err(|e| {
                warn!(
                    "Rejected section {section} of course {}: {e}",
                    new_offering.course_id
                )
            })?;
        txn.commit().await?;

        debug!("Created offering {} (section {})", offering.id, offering.section);
        Ok(offering)
    }

    pub async fn get_offering<C>(
        db: &C,
        offering_id: Uuid,
    ) -> StoreResult<Option<course_offering::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(course_offering::Entity::find_by_id(offering_id).one(db).await?)
    }

    /// Offerings scheduled in a semester, ordered by course code then section
    pub async fn list_for_semester<C>(
        db: &C,
        semester_id: Uuid,
    ) -> StoreResult<Vec<ScheduledOffering>>
    where
        C: ConnectionTrait,
    {
        let rows = course_offering::Entity::find()
            .filter(course_offering::Column::SemesterId.eq(semester_id))
            .find_also_related(course::Entity)
            .order_by_asc(course::Column::Code)
            .order_by_asc(course_offering::Column::Section)
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(offering, course)| {
                course.map(|course| ScheduledOffering { offering, course })
            })
            .collect())
    }

    /// Deletes an offering and its enrollments, returning the number of enrollments removed
    pub async fn delete_offering<C>(db: &C, offering_id: Uuid) -> StoreResult<u64>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let txn = db.begin().await?;
        find_target::<course_offering::Entity, _>(&txn, "offering", offering_id).await?;

        let (_, enrollments) = Self::remove_offerings(&txn, vec![offering_id]).await?;
        txn.commit().await?;

        info!("Deleted offering {offering_id} with {enrollments} enrollments");
        Ok(enrollments)
    }

    /// Removes the given offerings and their enrollments, returning `(offerings, enrollments)`
    pub(crate) async fn remove_offerings<C>(
        db: &C,
        offering_ids: Vec<Uuid>,
    ) -> StoreResult<(u64, u64)>
    where
        C: ConnectionTrait,
    {
        if offering_ids.is_empty() {
            return Ok((0, 0));
        }

        let enrollments = enrollment::Entity::delete_many()
            .filter(enrollment::Column::OfferingId.is_in(offering_ids.clone()))
            .exec(db)
            .await?
            .rows_affected;
        let offerings = course_offering::Entity::delete_many()
            .filter(course_offering::Column::Id.is_in(offering_ids))
            .exec(db)
            .await?
            .rows_affected;

        Ok((offerings, enrollments))
    }
}
