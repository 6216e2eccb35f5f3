use sea_orm::{DbErr, RuntimeErr, SqlErr, sqlx};
use thiserror::Error;
use uuid::Uuid;

pub type StoreResult<T> = Result<T, StoreError>;

/// Engine codes for CHECK constraints and guard triggers: SQLite extended result
/// codes 275 and 1811, Postgres SQLSTATE 23514 and 23000
const RULE_VIOLATION_CODES: [&str; 4] = ["275", "1811", "23514", "23000"];

/// Errors surfaced by the store, named after the constraint that rejected the write
#[derive(Debug, Error)]
pub enum StoreError {
    /// A value declared unique (or a unique composite) already exists
    #[error("uniqueness violation: {0}")]
    UniquenessViolation(String),
    /// A referenced parent row does not exist
    #[error("referential violation: {0}")]
    ReferentialViolation(String),
    /// A declared check failed
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("database error: {0}")]
    Database(DbErr),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn missing_parent(entity: &'static str, id: Uuid) -> Self {
        Self::ReferentialViolation(format!("{entity} {id} does not exist"))
    }

    pub fn is_uniqueness_violation(&self) -> bool {
        matches!(self, Self::UniquenessViolation(_))
    }

    pub fn is_referential_violation(&self) -> bool {
        matches!(self, Self::ReferentialViolation(_))
    }

    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::InvariantViolation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

// Engine-reported constraint failures map onto the same variants as the pre-write checks
impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(message)) => Self::UniquenessViolation(message),
            Some(SqlErr::ForeignKeyConstraintViolation(message)) => {
                Self::ReferentialViolation(message)
            }
            _ => match engine_code(&err) {
                Some(code) if is_rule_violation(&code) => Self::InvariantViolation(err.to_string()),
                _ => Self::Database(err),
            },
        }
    }
}

fn engine_code(err: &DbErr) -> Option<String> {
    match err {
        DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Database(e)))
        | DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::Database(e))) => {
            e.code().map(|code| code.into_owned())
        }
        _ => None,
    }
}

fn is_rule_violation(code: &str) -> bool {
    RULE_VIOLATION_CODES.contains(&code)
}

/// Rejects blank values for required text fields
pub(crate) fn require(field: &'static str, value: &str) -> StoreResult<()> {
    if value.trim().is_empty() {
        Err(StoreError::InvariantViolation(format!(
            "{field} must not be empty"
        )))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_db_errors_stay_database_errors() {
        let err = StoreError::from(DbErr::Custom("boom".to_string()));
        assert!(matches!(err, StoreError::Database(_)));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_rule_violation_codes() {
        assert!(is_rule_violation("275"));
        assert!(is_rule_violation("1811"));
        assert!(is_rule_violation("23514"));
        assert!(!is_rule_violation("2067"));
        assert!(!is_rule_violation("23505"));
    }

    #[test]
    fn test_not_found_message() {
        let id = Uuid::nil();
        let err = StoreError::not_found("student", id);
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "student not found: 00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_require_rejects_blank_values() {
        assert!(require("email", "a@b.edu").is_ok());

        let err = require("email", "   ").unwrap_err();
        assert!(err.is_invariant_violation());
    }
}
