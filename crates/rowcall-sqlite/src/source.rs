// crates/rowcall-sqlite/src/source.rs
// ============================================================================
// Module: SQLite Tabular Source
// Description: Forward-only tabular source over rusqlite result rows.
// Purpose: Feed SQL query results through the core decoding contracts.
// Dependencies: rowcall-core, rusqlite, serde, thiserror
// ============================================================================

//! ## Overview
//! This module adapts `rusqlite` query results to the core
//! [`TabularSource`] contract. [`SqliteSource`] wraps a `rusqlite::Rows`
//! cursor and snapshots each row's columns into owned values on advance, so
//! row accessors never borrow into the cursor. Connection opening applies
//! the configured pragmas and fails fast on invalid configuration.
//! Invariants:
//! - `rusqlite::Error` never crosses this crate's boundary; faults are
//!   translated into [`SqliteSourceError`].
//! - The cursor only moves forward; the source is consumed by one pass.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use rowcall_core::TabularSource;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::Row;
use rusqlite::Rows;
use rusqlite::types::Value;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default busy timeout (ms).
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Upper bound accepted for the configurable busy timeout (ms).
pub const MAX_BUSY_TIMEOUT_MS: u64 = 600_000;

// ============================================================================
// SECTION: Config
// ============================================================================

/// Connection configuration for SQLite-backed sources.
///
/// # Invariants
/// - `busy_timeout_ms` never exceeds [`MAX_BUSY_TIMEOUT_MS`] after
///   validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SqliteSourceConfig {
    /// Busy timeout applied to every opened connection (ms).
    pub busy_timeout_ms: u64,
    /// Opens connections read-only and enforces query-only mode.
    pub read_only: bool,
}

impl Default for SqliteSourceConfig {
    fn default() -> Self {
        Self {
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            read_only: false,
        }
    }
}

impl SqliteSourceConfig {
    /// Validates configured limits.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteSourceError::Invalid`] when a limit is out of range.
    pub fn validate(&self) -> Result<(), SqliteSourceError> {
        if self.busy_timeout_ms > MAX_BUSY_TIMEOUT_MS {
            return Err(SqliteSourceError::Invalid(format!(
                "busy_timeout_ms exceeds {MAX_BUSY_TIMEOUT_MS}"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// SQLite source errors.
///
/// # Invariants
/// - Error messages avoid embedding row payloads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SqliteSourceError {
    /// `SQLite` engine error.
    #[error("sqlite source db error: {0}")]
    Db(String),
    /// A column accessor was called with no current row.
    #[error("no current row")]
    NoCurrentRow,
    /// A column was missing or held an unexpected type.
    #[error("bad column {column}: {reason}")]
    BadColumn {
        /// Zero-based column index.
        column: usize,
        /// Human-readable mismatch description.
        reason: String,
    },
    /// Invalid source configuration.
    #[error("invalid sqlite source config: {0}")]
    Invalid(String),
}

impl From<rusqlite::Error> for SqliteSourceError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Db(error.to_string())
    }
}

// ============================================================================
// SECTION: Connections
// ============================================================================

/// Opens an `SQLite` connection for source queries.
///
/// # Errors
///
/// Returns [`SqliteSourceError`] when the configuration is invalid or the
/// database cannot be opened.
pub fn open_connection(
    path: &Path,
    config: &SqliteSourceConfig,
) -> Result<Connection, SqliteSourceError> {
    config.validate()?;
    let flags = if config.read_only {
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_FULL_MUTEX
    } else {
        OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_FULL_MUTEX
    };
    let connection = Connection::open_with_flags(path, flags)
        .map_err(|err| SqliteSourceError::Db(err.to_string()))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Opens an in-memory `SQLite` connection for source queries.
///
/// # Errors
///
/// Returns [`SqliteSourceError`] when the configuration is invalid or the
/// database cannot be opened.
pub fn open_in_memory(config: &SqliteSourceConfig) -> Result<Connection, SqliteSourceError> {
    config.validate()?;
    let connection =
        Connection::open_in_memory().map_err(|err| SqliteSourceError::Db(err.to_string()))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies connection pragmas derived from the configuration.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteSourceConfig,
) -> Result<(), SqliteSourceError> {
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteSourceError::Db(err.to_string()))?;
    if config.read_only {
        connection
            .pragma_update(None, "query_only", true)
            .map_err(|err| SqliteSourceError::Db(err.to_string()))?;
    }
    Ok(())
}

// ============================================================================
// SECTION: Source
// ============================================================================

/// Forward-only tabular source over a `rusqlite` row cursor.
///
/// # Invariants
/// - Each advance snapshots the current row's columns into owned values.
/// - Accessors never advance the cursor.
pub struct SqliteSource<'stmt> {
    /// Underlying row cursor.
    rows: Rows<'stmt>,
    /// Owned snapshot of the current row's columns.
    current: Option<Vec<Value>>,
}

impl<'stmt> SqliteSource<'stmt> {
    /// Wraps a query's row cursor.
    #[must_use]
    pub const fn new(rows: Rows<'stmt>) -> Self {
        Self {
            rows,
            current: None,
        }
    }

    /// Returns the current row's column snapshot.
    fn current(&self) -> Result<&[Value], SqliteSourceError> {
        self.current.as_deref().ok_or(SqliteSourceError::NoCurrentRow)
    }

    /// Returns the raw value at the given column of the current row.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteSourceError`] when there is no current row or the
    /// column does not exist.
    pub fn value_at(&self, column: usize) -> Result<&Value, SqliteSourceError> {
        self.current()?.get(column).ok_or(SqliteSourceError::BadColumn {
            column,
            reason: "column out of range".to_string(),
        })
    }

    /// Returns the column as a string slice.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteSourceError`] when the column is missing or not
    /// text.
    pub fn str_at(&self, column: usize) -> Result<&str, SqliteSourceError> {
        match self.value_at(column)? {
            Value::Text(text) => Ok(text),
            _ => Err(SqliteSourceError::BadColumn {
                column,
                reason: "expected text column".to_string(),
            }),
        }
    }

    /// Returns the column as an `i64`.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteSourceError`] when the column is missing or not an
    /// integer.
    pub fn i64_at(&self, column: usize) -> Result<i64, SqliteSourceError> {
        match self.value_at(column)? {
            Value::Integer(value) => Ok(*value),
            _ => Err(SqliteSourceError::BadColumn {
                column,
                reason: "expected integer column".to_string(),
            }),
        }
    }

    /// Returns the column as an `f64`, widening integers.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteSourceError`] when the column is missing or not
    /// numeric.
    #[allow(
        clippy::cast_precision_loss,
        reason = "Integer widening follows SQLite's own numeric affinity."
    )]
    pub fn f64_at(&self, column: usize) -> Result<f64, SqliteSourceError> {
        match self.value_at(column)? {
            Value::Real(value) => Ok(*value),
            Value::Integer(value) => Ok(*value as f64),
            _ => Err(SqliteSourceError::BadColumn {
                column,
                reason: "expected numeric column".to_string(),
            }),
        }
    }

    /// Returns true when the column holds SQL NULL.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteSourceError`] when there is no current row or the
    /// column does not exist.
    pub fn is_null_at(&self, column: usize) -> Result<bool, SqliteSourceError> {
        Ok(matches!(self.value_at(column)?, Value::Null))
    }
}

impl TabularSource for SqliteSource<'_> {
    type Error = SqliteSourceError;

    fn advance(&mut self) -> Result<bool, SqliteSourceError> {
        match self.rows.next() {
            Ok(Some(row)) => {
                self.current = Some(snapshot_row(row)?);
                Ok(true)
            }
            Ok(None) => {
                self.current = None;
                Ok(false)
            }
            Err(err) => {
                self.current = None;
                Err(err.into())
            }
        }
    }
}

/// Copies the current row's columns into owned values.
fn snapshot_row(row: &Row<'_>) -> Result<Vec<Value>, SqliteSourceError> {
    let column_count = row.as_ref().column_count();
    let mut cells = Vec::with_capacity(column_count);
    for column in 0..column_count {
        let value: Value =
            row.get(column).map_err(|err| SqliteSourceError::Db(err.to_string()))?;
        cells.push(value);
    }
    Ok(cells)
}
