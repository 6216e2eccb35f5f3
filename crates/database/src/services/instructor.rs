use super::{find_target, require_parent};
use crate::{
    entities::{course_instructor, department, instructor},
    error::{StoreError, StoreResult, require},
};
use log::{debug, warn};
use models::course::NewInstructor;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, TransactionTrait,
};
use uuid::Uuid;

pub struct InstructorService;

impl InstructorService {
    pub async fn create_instructor<C>(
        db: &C,
        new_instructor: NewInstructor,
    ) -> StoreResult<instructor::Model>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        require("first_name", &new_instructor.first_name)?;
        require("last_name", &new_instructor.last_name)?;
        require("email", &new_instructor.email)?;

        let txn = db.begin().await?;
        if let Some(department_id) = new_instructor.department_id {
            require_parent::<department::Entity, _>(&txn, "department", department_id).await?;
        }

        let email = new_instructor.email.trim().to_string();
        let model = instructor::ActiveModel {
            id: Set(Uuid::new_v4()),
            first_name: Set(new_instructor.first_name.trim().to_string()),
            last_name: Set(new_instructor.last_name.trim().to_string()),
            email: Set(email.clone()),
            department_id: Set(new_instructor.department_id),
            ..Default::default()
        };

        let instructor = model
            .insert(&txn)
            .await
            .map_err(StoreError::from)
            .inspect_err(|e| warn!("Rejected instructor {email}: {e}"))?;
        txn.commit().await?;

        debug!("Created instructor {} ({})", instructor.id, instructor.email);
        Ok(instructor)
    }

    pub async fn get_instructor<C>(
        db: &C,
        instructor_id: Uuid,
    ) -> StoreResult<Option<instructor::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(instructor::Entity::find_by_id(instructor_id).one(db).await?)
    }

    /// Moves an instructor to another department, or detaches them with `None`
    pub async fn set_department<C>(
        db: &C,
        instructor_id: Uuid,
        department_id: Option<Uuid>,
    ) -> StoreResult<instructor::Model>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let txn = db.begin().await?;
        let mut model = find_target::<instructor::Entity, _>(&txn, "instructor", instructor_id)
            .await?
            .into_active_model();

        if let Some(department_id) = department_id {
            require_parent::<department::Entity, _>(&txn, "department", department_id).await?;
        }
        model.department_id = Set(department_id);

        let instructor = model.update(&txn).await?;
        txn.commit().await?;
        Ok(instructor)
    }

    pub async fn list_for_department<C>(
        db: &C,
        department_id: Uuid,
    ) -> StoreResult<Vec<instructor::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(instructor::Entity::find()
            .filter(instructor::Column::DepartmentId.eq(department_id))
            .order_by_asc(instructor::Column::LastName)
            .order_by_asc(instructor::Column::FirstName)
            .all(db)
            .await?)
    }

    /// Deletes an instructor along with their course assignments
    pub async fn delete_instructor<C>(db: &C, instructor_id: Uuid) -> StoreResult<()>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let txn = db.begin().await?;
        find_target::<instructor::Entity, _>(&txn, "instructor", instructor_id).await?;

        course_instructor::Entity::delete_many()
            .filter(course_instructor::Column::InstructorId.eq(instructor_id))
            .exec(&txn)
            .await?;
        instructor::Entity::delete_by_id(instructor_id)
            .exec(&txn)
            .await?;

        txn.commit().await?;
        debug!("Deleted instructor {instructor_id}");
        Ok(())
    }
}
