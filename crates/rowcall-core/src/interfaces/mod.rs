// crates/rowcall-core/src/interfaces/mod.rs
// ============================================================================
// Module: Rowcall Interfaces
// Description: Source-agnostic contracts for tabular decoding.
// Purpose: Define the cursor, mapper, and handler surfaces used by the runtime.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how Rowcall decodes heterogeneous tabular sources into
//! typed aggregates without embedding source-specific details. A handler
//! drives the cursor, maps each row through a pure mapper, and publishes
//! the aggregate into a [`Response`] holder, normalizing every source-native
//! fault into [`CallError`] at the decoding boundary.
//! Invariants:
//! - Handlers own cursor advancement exclusively; mappers read the current
//!   row only.
//! - No source-native error type escapes a decode call unwrapped.
//! - Handlers hold no per-call mutable state and are safe for concurrent
//!   invocation against independent source/response pairs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::response::Response;
use crate::core::response::ResponseCompletedError;

// ============================================================================
// SECTION: Tabular Source
// ============================================================================

/// Forward-only cursor over rows of a tabular source.
///
/// Row-scoped accessors live on concrete source types; this contract covers
/// only cursor advancement. A source starts positioned before its first row
/// and is consumed by a single forward pass.
pub trait TabularSource {
    /// Source-native fault type raised while advancing or reading rows.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Advances the cursor one row.
    ///
    /// Returns `true` when a new row is available and now current, `false`
    /// when the source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns the source-native error when advancement faults.
    fn advance(&mut self) -> Result<bool, Self::Error>;
}

// ============================================================================
// SECTION: Row Mapper
// ============================================================================

/// Pure function from the source's current row to a typed element.
///
/// # Invariants
/// - Must not advance or rewind the cursor; the handler owns advancement.
/// - `index` is a monotonically increasing zero-based hint with no assumed
///   numeric meaning.
pub trait RowMapper<S: TabularSource>: Send + Sync {
    /// Element type produced per row.
    type Output;

    /// Maps the source's current row into one element.
    ///
    /// # Errors
    ///
    /// Returns the source-native error when the current row cannot be read
    /// or converted.
    fn map_row(&self, source: &S, index: usize) -> Result<Self::Output, S::Error>;
}

impl<S, T, F> RowMapper<S> for F
where
    S: TabularSource,
    F: Fn(&S, usize) -> Result<T, S::Error> + Send + Sync,
{
    type Output = T;

    fn map_row(&self, source: &S, index: usize) -> Result<T, S::Error> {
        self(source, index)
    }
}

// ============================================================================
// SECTION: Call Errors
// ============================================================================

/// Normalized errors surfaced by decode calls.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - `Decoding` always carries the original low-level cause.
#[derive(Debug, Error)]
pub enum CallError {
    /// Source or mapper fault raised during a decode call.
    #[error("unexpected decoding failure: {0}")]
    Decoding(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// Scalar decode saw zero rows or more than one row.
    #[error("expected exactly one row, observed {rows}")]
    Cardinality {
        /// Rows observed before the handler stopped iterating.
        rows: usize,
    },
    /// The response holder was already completed by the caller.
    #[error(transparent)]
    Completed(#[from] ResponseCompletedError),
}

impl CallError {
    /// Wraps a source-native fault into the normalized decoding error.
    pub fn decoding<E>(cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Decoding(Box::new(cause))
    }
}

// ============================================================================
// SECTION: Response Handler
// ============================================================================

/// Decodes a tabular source into a typed aggregate.
///
/// Implementations hold only immutable configuration set at construction;
/// one instance may serve concurrent calls provided each call owns its own
/// `source`/`response` pair.
pub trait ResponseHandler<S: TabularSource>: Send + Sync {
    /// Aggregate type published into the response holder.
    type Output;

    /// Consumes the source in one forward pass and publishes the aggregate.
    ///
    /// On failure nothing is published; the response stays incomplete.
    ///
    /// # Errors
    ///
    /// Returns [`CallError`] when the source or mapper faults, when scalar
    /// cardinality is violated, or when `response` is already completed.
    fn add_to_response(
        &self,
        source: &mut S,
        response: &Response<Self::Output>,
    ) -> Result<(), CallError>;
}
