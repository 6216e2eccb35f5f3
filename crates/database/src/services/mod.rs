pub mod audit;
pub mod course;
pub mod department;
pub mod enrollment;
pub mod instructor;
pub mod offering;
pub mod seed;
pub mod semester;
pub mod student;

use crate::error::{StoreError, StoreResult};
use sea_orm::{ConnectionTrait, EntityTrait, PrimaryKeyTrait};
use uuid::Uuid;

/// Loads a row that an operation targets, failing with `NotFound` when it is absent
pub(crate) async fn find_target<E, C>(
    db: &C,
    entity: &'static str,
    id: Uuid,
) -> StoreResult<E::Model>
where
    E: EntityTrait,
    Uuid: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
    C: ConnectionTrait,
{
    E::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| StoreError::not_found(entity, id))
}

/// Checks that a referenced parent row exists, failing with `ReferentialViolation` otherwise
pub(crate) async fn require_parent<E, C>(
    db: &C,
    entity: &'static str,
    id: Uuid,
) -> StoreResult<E::Model>
where
    E: EntityTrait,
    Uuid: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
    C: ConnectionTrait,
{
    E::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| StoreError::missing_parent(entity, id))
}

/// Trims an optional text field, treating blank input as absent
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
