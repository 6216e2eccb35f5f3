use crate::{
    entities::audit_log,
    error::{StoreError, StoreResult, require},
};
use log::debug;
use models::audit::NewAuditEntry;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

pub struct AuditService;

impl AuditService {
    /// Appends an audit entry
    ///
    /// The entity id is stored as text and is not checked against any table.
    pub async fn record_audit<C>(db: &C, entry: NewAuditEntry) -> StoreResult<audit_log::Model>
    where
        C: ConnectionTrait,
    {
        require("entity_name", &entry.entity_name)?;
        require("action", &entry.action)?;

        let model = audit_log::ActiveModel {
            id: Set(Uuid::new_v4()),
            entity_name: Set(entry.entity_name.trim().to_string()),
            entity_id: Set(entry.entity_id.trim().to_string()),
            action: Set(entry.action.trim().to_string()),
            performed_by: Set(entry.performed_by.trim().to_string()),
            details: Set(entry.details),
            ..Default::default()
        };

        let record = model.insert(db).await.map_err(StoreError::from)?;
        debug!(
            "Audited {} on {} {} by {}",
            record.action, record.entity_name, record.entity_id, record.performed_by
        );
        Ok(record)
    }

    /// Entries for one entity, newest first
    pub async fn list_for_entity<C>(
        db: &C,
        entity_name: &str,
        entity_id: &str,
    ) -> StoreResult<Vec<audit_log::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(audit_log::Entity::find()
            .filter(audit_log::Column::EntityName.eq(entity_name.trim()))
            .filter(audit_log::Column::EntityId.eq(entity_id.trim()))
            .order_by_desc(audit_log::Column::CreatedAt)
            .all(db)
            .await?)
    }
}
