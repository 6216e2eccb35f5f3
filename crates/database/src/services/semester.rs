use super::{find_target, offering::OfferingService};
use crate::{
    entities::{course_offering, semester},
    error::{StoreError, StoreResult, require},
};
use log::{debug, info, warn};
use models::course::NewSemester;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

/// Rows removed alongside a semester
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SemesterDeletion {
    pub offerings: u64,
    pub enrollments: u64,
}

pub struct SemesterService;

impl SemesterService {
    pub async fn create_semester<C>(
        db: &C,
        new_semester: NewSemester,
    ) -> StoreResult<semester::Model>
    where
        C: ConnectionTrait,
    {
        require("name", &new_semester.name)?;
        if new_semester.end_date < new_semester.start_date {
            return Err(StoreError::InvariantViolation(format!(
                "semester ends on {} before it starts on {}",
                new_semester.end_date, new_semester.start_date
            )));
        }

        let name = new_semester.name.trim().to_string();
        let model = semester::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.clone()),
            start_date: Set(new_semester.start_date),
            end_date: Set(new_semester.end_date),
            is_active: Set(new_semester.is_active),
            ..Default::default()
        };

        let semester = model
            .insert(db)
            .await
            .map_err(StoreError::from)
            .inspect_err(|e| warn!("Rejected semester {name}: {e}"))?;

        debug!("Created semester {} ({})", semester.id, semester.name);
        Ok(semester)
    }

    pub async fn get_semester<C>(db: &C, semester_id: Uuid) -> StoreResult<Option<semester::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(semester::Entity::find_by_id(semester_id).one(db).await?)
    }

    pub async fn set_active<C>(
        db: &C,
        semester_id: Uuid,
        is_active: bool,
    ) -> StoreResult<semester::Model>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let txn = db.begin().await?;
        let mut model = find_target::<semester::Entity, _>(&txn, "semester", semester_id)
            .await?
            .into_active_model();
        model.is_active = Set(is_active);

        let semester = model.update(&txn).await?;
        txn.commit().await?;
        Ok(semester)
    }

    /// Active semesters, most recent start first
    pub async fn list_active<C>(db: &C) -> StoreResult<Vec<semester::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(semester::Entity::find()
            .filter(semester::Column::IsActive.eq(true))
            .order_by_desc(semester::Column::StartDate)
            .all(db)
            .await?)
    }

    /// Deletes a semester with its offerings and their enrollments
    pub async fn delete_semester<C>(db: &C, semester_id: Uuid) -> StoreResult<SemesterDeletion>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let txn = db.begin().await?;
        find_target::<semester::Entity, _>(&txn, "semester", semester_id).await?;

        let offering_ids: Vec<Uuid> = course_offering::Entity::find()
            .select_only()
            .column(course_offering::Column::Id)
            .filter(course_offering::Column::SemesterId.eq(semester_id))
            .into_tuple::<Uuid>()
            .all(&txn)
            .await?;
        let (offerings, enrollments) = OfferingService::remove_offerings(&txn, offering_ids).await?;

        semester::Entity::delete_by_id(semester_id).exec(&txn).await?;
        txn.commit().await?;

        let deletion = SemesterDeletion {
            offerings,
            enrollments,
        };
        info!("Deleted semester {semester_id} with {deletion:?}");
        Ok(deletion)
    }
}
