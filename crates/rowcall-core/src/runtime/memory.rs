// crates/rowcall-core/src/runtime/memory.rs
// ============================================================================
// Module: Rowcall Memory Source
// Description: In-memory tabular source with fault injection.
// Purpose: Back handler wiring and tests without an external engine.
// Dependencies: crate::interfaces, serde_json, thiserror
// ============================================================================

//! ## Overview
//! [`MemorySource`] is a ready-made [`TabularSource`] over owned row
//! vectors of JSON cells. It exposes typed cell accessors for mappers and
//! supports injected advancement faults so the decode boundary's error
//! wrapping is testable end to end.
//! Invariants:
//! - The cursor starts before the first row and only moves forward.
//! - Accessors never advance the cursor.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use thiserror::Error;

use crate::interfaces::TabularSource;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Source-native faults raised by the in-memory source.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MemorySourceError {
    /// A cell accessor was called with no current row.
    #[error("no current row")]
    NoCurrentRow,
    /// A cell was missing or held an unexpected type.
    #[error("bad cell at column {column}: {reason}")]
    BadCell {
        /// Zero-based column index.
        column: usize,
        /// Human-readable mismatch description.
        reason: String,
    },
    /// An injected advancement fault, for decode-boundary tests.
    #[error("injected source fault at row {row}")]
    Injected {
        /// Zero-based row index at which the fault fired.
        row: usize,
    },
}

// ============================================================================
// SECTION: Memory Source
// ============================================================================

/// In-memory forward-only source over JSON cell rows.
///
/// # Invariants
/// - Rows are fixed at construction; advancement is the only mutation.
#[derive(Debug, Clone)]
pub struct MemorySource {
    /// Row data; each row is a vector of cells.
    rows: Vec<Vec<Value>>,
    /// Index of the current row; `None` before the first advance.
    cursor: Option<usize>,
    /// Row index at which `advance` raises an injected fault.
    fail_at_row: Option<usize>,
}

impl MemorySource {
    /// Creates a source over the given rows.
    #[must_use]
    pub const fn new(rows: Vec<Vec<Value>>) -> Self {
        Self {
            rows,
            cursor: None,
            fail_at_row: None,
        }
    }

    /// Injects an advancement fault when the cursor would enter row `row`.
    #[must_use]
    pub const fn fail_at_row(mut self, row: usize) -> Self {
        self.fail_at_row = Some(row);
        self
    }

    /// Returns the current row's cells.
    fn current(&self) -> Result<&[Value], MemorySourceError> {
        let index = self.cursor.ok_or(MemorySourceError::NoCurrentRow)?;
        self.rows.get(index).map(Vec::as_slice).ok_or(MemorySourceError::NoCurrentRow)
    }

    /// Returns the raw cell at the given column of the current row.
    ///
    /// # Errors
    ///
    /// Returns [`MemorySourceError`] when there is no current row or the
    /// column does not exist.
    pub fn value_at(&self, column: usize) -> Result<&Value, MemorySourceError> {
        self.current()?.get(column).ok_or(MemorySourceError::BadCell {
            column,
            reason: "column out of range".to_string(),
        })
    }

    /// Returns the cell at the given column as a string slice.
    ///
    /// # Errors
    ///
    /// Returns [`MemorySourceError`] when the cell is missing or not a
    /// string.
    pub fn str_at(&self, column: usize) -> Result<&str, MemorySourceError> {
        self.value_at(column)?.as_str().ok_or(MemorySourceError::BadCell {
            column,
            reason: "expected string cell".to_string(),
        })
    }

    /// Returns the cell at the given column as an `i64`.
    ///
    /// # Errors
    ///
    /// Returns [`MemorySourceError`] when the cell is missing or not an
    /// integer.
    pub fn i64_at(&self, column: usize) -> Result<i64, MemorySourceError> {
        self.value_at(column)?.as_i64().ok_or(MemorySourceError::BadCell {
            column,
            reason: "expected integer cell".to_string(),
        })
    }

    /// Returns the cell at the given column as a `bool`.
    ///
    /// # Errors
    ///
    /// Returns [`MemorySourceError`] when the cell is missing or not a
    /// boolean.
    pub fn bool_at(&self, column: usize) -> Result<bool, MemorySourceError> {
        self.value_at(column)?.as_bool().ok_or(MemorySourceError::BadCell {
            column,
            reason: "expected boolean cell".to_string(),
        })
    }
}

impl TabularSource for MemorySource {
    type Error = MemorySourceError;

    fn advance(&mut self) -> Result<bool, MemorySourceError> {
        let next = self.cursor.map_or(0, |current| current + 1);
        if self.fail_at_row == Some(next) {
            return Err(MemorySourceError::Injected { row: next });
        }
        // Past-the-end cursor positions leave no current row.
        self.cursor = Some(next);
        Ok(next < self.rows.len())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
