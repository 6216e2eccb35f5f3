use sea_orm_migration::{prelude::*, sea_orm::DatabaseBackend};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // No foreign keys, entries outlive the rows they describe
        manager
            .create_table(
                Table::create()
                    .table(AuditLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuditLogs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AuditLogs::EntityName).string().not_null())
                    .col(ColumnDef::new(AuditLogs::EntityId).text().not_null())
                    .col(ColumnDef::new(AuditLogs::Action).string().not_null())
                    .col(ColumnDef::new(AuditLogs::PerformedBy).string().not_null())
                    .col(ColumnDef::new(AuditLogs::Details).json())
                    .col(
                        ColumnDef::new(AuditLogs::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_audit_logs_entity")
                    .table(AuditLogs::Table)
                    .col(AuditLogs::EntityName)
                    .col(AuditLogs::EntityId)
                    .to_owned(),
            )
            .await?;

        // Entries are immutable once written, whatever path the statement takes
        let statements: &[&str] = match manager.get_database_backend() {
            DatabaseBackend::Postgres => &[
                "CREATE OR REPLACE FUNCTION reject_audit_log_change() RETURNS trigger AS $$
                BEGIN
                    RAISE EXCEPTION 'audit log entries are immutable'
                        USING ERRCODE = 'integrity_constraint_violation';
                END;
                $$ LANGUAGE plpgsql;",
                "CREATE TRIGGER audit_logs_no_update
                BEFORE UPDATE ON audit_logs
                FOR EACH ROW EXECUTE FUNCTION reject_audit_log_change();",
                "CREATE TRIGGER audit_logs_no_delete
                BEFORE DELETE ON audit_logs
                FOR EACH ROW EXECUTE FUNCTION reject_audit_log_change();",
            ],
            DatabaseBackend::Sqlite => &[
                "CREATE TRIGGER IF NOT EXISTS audit_logs_no_update
                BEFORE UPDATE ON audit_logs
                BEGIN
                    SELECT RAISE(ABORT, 'audit log entries are immutable');
                END;",
                "CREATE TRIGGER IF NOT EXISTS audit_logs_no_delete
                BEFORE DELETE ON audit_logs
                BEGIN
                    SELECT RAISE(ABORT, 'audit log entries are immutable');
                END;",
            ],
            _ => {
                return Err(DbErr::Migration(
                    "audit log triggers are only defined for Postgres and SQLite".to_string(),
                ));
            }
        };

        for statement in statements {
            manager.get_connection().execute_unprepared(statement).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let statements: &[&str] = match manager.get_database_backend() {
            DatabaseBackend::Postgres => &[
                "DROP TRIGGER IF EXISTS audit_logs_no_delete ON audit_logs;",
                "DROP TRIGGER IF EXISTS audit_logs_no_update ON audit_logs;",
                "DROP FUNCTION IF EXISTS reject_audit_log_change();",
            ],
            _ => &[
                "DROP TRIGGER IF EXISTS audit_logs_no_delete;",
                "DROP TRIGGER IF EXISTS audit_logs_no_update;",
            ],
        };

        for statement in statements {
            manager.get_connection().execute_unprepared(statement).await?;
        }

        manager
            .drop_table(Table::drop().table(AuditLogs::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum AuditLogs {
    Table,
    Id,
    EntityName,
    EntityId,
    Action,
    PerformedBy,
    Details,
    CreatedAt,
}
