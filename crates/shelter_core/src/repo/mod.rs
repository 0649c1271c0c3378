//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define data-access contracts for animals and families.
//! - Isolate SQL details from the service layer and the console menu.
//! - Wrap every write in a transaction that rolls back on failure.
//!
//! # Invariants
//! - Every SQLite failure surfaces as [`RepoError::Storage`] carrying a
//!   human-readable message and the underlying [`DbError`].
//! - Rollback happens before the wrapped error is returned.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::family::FamilyValidationError;
use log::{error, warn};
use rusqlite::{Connection, Transaction};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod animal_repo;
pub mod family_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error returned by every repository operation.
#[derive(Debug)]
pub enum RepoError {
    /// The store rejected or failed an operation.
    Storage { message: String, source: DbError },
    /// Target row of an update does not exist.
    NotFound { entity: &'static str, id: i64 },
    /// Update was called on a value that has never been saved.
    Unsaved(&'static str),
    /// Save was called on a value that already has an identifier.
    AlreadySaved { entity: &'static str, id: i64 },
    /// Persisted family row fails model validation.
    Validation(FamilyValidationError),
    /// Persisted row cannot be decoded.
    InvalidData(String),
    /// Connection has not been migrated to the schema this binary expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl RepoError {
    /// Replaces the message of a storage failure. Other kinds are returned
    /// unchanged.
    pub fn with_context(self, message: impl Into<String>) -> Self {
        match self {
            Self::Storage { source, .. } => Self::Storage {
                message: message.into(),
                source,
            },
            other => other,
        }
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage { message, source } => write!(f, "{message}: {source}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Unsaved(entity) => write!(f, "{entity} has not been saved yet"),
            Self::AlreadySaved { entity, id } => write!(f, "{entity} is already saved with id {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table missing: {table}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage { source, .. } => Some(source),
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Storage {
            message: "storage operation failed".to_string(),
            source: value,
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::from(DbError::Sqlite(value))
    }
}

impl From<FamilyValidationError> for RepoError {
    fn from(value: FamilyValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Runs `work` inside one transaction.
///
/// Commits on success. On failure the transaction is rolled back first and
/// storage errors are relabeled with `context`.
pub(crate) fn in_transaction<T>(
    conn: &Connection,
    event: &'static str,
    context: &str,
    work: impl FnOnce(&Transaction<'_>) -> RepoResult<T>,
) -> RepoResult<T> {
    let tx = conn.unchecked_transaction().map_err(|err| {
        error!("event={event} module=repo status=error error_code=tx_begin_failed error={err}");
        RepoError::from(err).with_context(context)
    })?;

    match work(&tx) {
        Ok(value) => {
            tx.commit().map_err(|err| {
                error!("event={event} module=repo status=error error_code=tx_commit_failed error={err}");
                RepoError::from(err).with_context(context)
            })?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback() {
                warn!(
                    "event={event} module=repo status=error error_code=tx_rollback_failed error={rollback_err}"
                );
            }
            error!("event={event} module=repo status=error error={err}");
            Err(err.with_context(context))
        }
    }
}

/// Verifies that `conn` went through `open_db` before a repository uses it.
pub(crate) fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in ["familias", "animales"] {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
