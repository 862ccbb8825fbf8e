// crates/rowcall-core/src/runtime/handlers.rs
// ============================================================================
// Module: Rowcall Accumulating Handlers
// Description: Set, list, and scalar response handler variants.
// Purpose: Decode a tabular source into deduplicated, ordered, or single values.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! Concrete [`ResponseHandler`] variants. Each wraps one immutable row
//! mapper and differs only in its accumulation policy:
//! - [`SetResponseHandler`] deduplicates by value equality; first-inserted
//!   wins among equal elements.
//! - [`ListResponseHandler`] preserves source order.
//! - [`SingleResponseHandler`] expects exactly one row.
//!
//! Invariants:
//! - A failed decode publishes nothing; the response stays incomplete.
//! - An already-completed response is rejected before the source is touched.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashSet;
use std::hash::Hash;

use crate::core::response::Response;
use crate::core::response::ResponseCompletedError;
use crate::interfaces::CallError;
use crate::interfaces::ResponseHandler;
use crate::interfaces::RowMapper;
use crate::interfaces::TabularSource;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Advances the source, wrapping source-native faults at the boundary.
fn advance<S: TabularSource>(source: &mut S) -> Result<bool, CallError> {
    source.advance().map_err(CallError::decoding)
}

/// Rejects response holders that were not freshly constructed.
fn ensure_incomplete<T>(response: &Response<T>) -> Result<(), CallError> {
    if response.is_complete() {
        return Err(CallError::Completed(ResponseCompletedError));
    }
    Ok(())
}

// ============================================================================
// SECTION: Set Handler
// ============================================================================

/// Accumulates mapped rows into a deduplicated set.
///
/// # Invariants
/// - Membership is independent of row order.
/// - Among equal-but-not-identical elements, the first-inserted wins.
#[derive(Debug, Clone)]
pub struct SetResponseHandler<M> {
    /// Per-row mapping function, immutable after construction.
    row_mapper: M,
}

impl<M> SetResponseHandler<M> {
    /// Creates a set-accumulating handler around the given mapper.
    #[must_use]
    pub const fn new(row_mapper: M) -> Self {
        Self { row_mapper }
    }
}

impl<S, M> ResponseHandler<S> for SetResponseHandler<M>
where
    S: TabularSource,
    M: RowMapper<S>,
    M::Output: Eq + Hash,
{
    type Output = HashSet<M::Output>;

    fn add_to_response(
        &self,
        source: &mut S,
        response: &Response<Self::Output>,
    ) -> Result<(), CallError> {
        ensure_incomplete(response)?;
        let mut set = HashSet::new();
        let mut index = 0_usize;
        while advance(source)? {
            let element = self.row_mapper.map_row(source, index).map_err(CallError::decoding)?;
            set.insert(element);
            index += 1;
        }
        response.set(set)?;
        Ok(())
    }
}

// ============================================================================
// SECTION: List Handler
// ============================================================================

/// Accumulates mapped rows into a list preserving source order.
#[derive(Debug, Clone)]
pub struct ListResponseHandler<M> {
    /// Per-row mapping function, immutable after construction.
    row_mapper: M,
}

impl<M> ListResponseHandler<M> {
    /// Creates a list-accumulating handler around the given mapper.
    #[must_use]
    pub const fn new(row_mapper: M) -> Self {
        Self { row_mapper }
    }
}

impl<S, M> ResponseHandler<S> for ListResponseHandler<M>
where
    S: TabularSource,
    M: RowMapper<S>,
{
    type Output = Vec<M::Output>;

    fn add_to_response(
        &self,
        source: &mut S,
        response: &Response<Self::Output>,
    ) -> Result<(), CallError> {
        ensure_incomplete(response)?;
        let mut list = Vec::new();
        let mut index = 0_usize;
        while advance(source)? {
            let element = self.row_mapper.map_row(source, index).map_err(CallError::decoding)?;
            list.push(element);
            index += 1;
        }
        response.set(list)?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Single Handler
// ============================================================================

/// Expects exactly one row and publishes its mapped value.
///
/// # Invariants
/// - Zero rows or a second row raises [`CallError::Cardinality`].
/// - Iteration stops on the second row; the source is not drained further.
#[derive(Debug, Clone)]
pub struct SingleResponseHandler<M> {
    /// Per-row mapping function, immutable after construction.
    row_mapper: M,
}

impl<M> SingleResponseHandler<M> {
    /// Creates a scalar handler around the given mapper.
    #[must_use]
    pub const fn new(row_mapper: M) -> Self {
        Self { row_mapper }
    }
}

impl<S, M> ResponseHandler<S> for SingleResponseHandler<M>
where
    S: TabularSource,
    M: RowMapper<S>,
{
    type Output = M::Output;

    fn add_to_response(
        &self,
        source: &mut S,
        response: &Response<Self::Output>,
    ) -> Result<(), CallError> {
        ensure_incomplete(response)?;
        if !advance(source)? {
            return Err(CallError::Cardinality { rows: 0 });
        }
        let value = self.row_mapper.map_row(source, 0).map_err(CallError::decoding)?;
        if advance(source)? {
            return Err(CallError::Cardinality { rows: 2 });
        }
        response.set(value)?;
        Ok(())
    }
}
