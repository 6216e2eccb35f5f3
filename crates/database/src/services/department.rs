use super::find_target;
use crate::{
    entities::{course, department, instructor, now},
    error::{StoreError, StoreResult, require},
};
use log::{debug, info, warn};
use models::course::NewDepartment;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait, prelude::Expr,
};
use serde::Serialize;
use uuid::Uuid;

/// References cleared when a department is removed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DepartmentDeletion {
    pub instructors: u64,
    pub courses: u64,
}

pub struct DepartmentService;

impl DepartmentService {
    pub async fn create_department<C>(
        db: &C,
        new_department: NewDepartment,
    ) -> StoreResult<department::Model>
    where
        C: ConnectionTrait,
    {
        require("name", &new_department.name)?;
        require("code", &new_department.code)?;

        let code = new_department.code.trim().to_string();
        let model = department::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(new_department.name.trim().to_string()),
            code: Set(code.clone()),
            ..Default::default()
        };

        let department = model
            .insert(db)
            .await
            .map_err(StoreError::from)
            .inspect_err(|e| warn!("Rejected department {code}: {e}"))?;

        debug!("Created department {} ({})", department.id, department.code);
        Ok(department)
    }

    pub async fn get_department<C>(
        db: &C,
        department_id: Uuid,
    ) -> StoreResult<Option<department::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(department::Entity::find_by_id(department_id).one(db).await?)
    }

    pub async fn find_by_code<C>(db: &C, code: &str) -> StoreResult<Option<department::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(department::Entity::find()
            .filter(department::Column::Code.eq(code.trim()))
            .one(db)
            .await?)
    }

    pub async fn list_departments<C>(db: &C) -> StoreResult<Vec<department::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(department::Entity::find()
            .order_by_asc(department::Column::Name)
            .all(db)
            .await?)
    }

    /// Deletes a department; its instructors and courses survive with no department
    pub async fn delete_department<C>(
        db: &C,
        department_id: Uuid,
    ) -> StoreResult<DepartmentDeletion>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let txn = db.begin().await?;
        find_target::<department::Entity, _>(&txn, "department", department_id).await?;

        let instructors = instructor::Entity::update_many()
            .col_expr(
                instructor::Column::DepartmentId,
                Expr::value(Option::<Uuid>::None),
            )
            .col_expr(instructor::Column::UpdatedAt, Expr::value(now()))
            .filter(instructor::Column::DepartmentId.eq(department_id))
            .exec(&txn)
            .await?
            .rows_affected;
        let courses = course::Entity::update_many()
            .col_expr(course::Column::DepartmentId, Expr::value(Option::<Uuid>::None))
            .col_expr(course::Column::UpdatedAt, Expr::value(now()))
            .filter(course::Column::DepartmentId.eq(department_id))
            .exec(&txn)
            .await?
            .rows_affected;

        department::Entity::delete_by_id(department_id)
            .exec(&txn)
            .await?;
        txn.commit().await?;

        let deletion = DepartmentDeletion {
            instructors,
            courses,
        };
        info!("Deleted department {department_id}, detached {deletion:?}");
        Ok(deletion)
    }
}
