// crates/rowcall-core/src/core/response.rs
// ============================================================================
// Module: Rowcall Response Holder
// Description: Single-assignment result holder for decode calls.
// Purpose: Publish a decoded aggregate to the caller exactly once.
// Dependencies: thiserror, std
// ============================================================================

//! ## Overview
//! [`Response`] is the output slot a caller hands to a response handler for
//! one decode call. The handler publishes the final aggregate into the slot
//! at most once; readers observe either "absent" or the completed value,
//! never a partial result.
//! Invariants:
//! - The value is set at most once per instance.
//! - Before completion, [`Response::get`] returns `None`.
//! - A holder is owned by exactly one logical call; handlers reject holders
//!   that are already completed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::OnceLock;

use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Error raised when a response holder is assigned a second time.
///
/// # Invariants
/// - Raised only by [`Response::set`] and by handlers that receive an
///   already-completed holder.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("response already completed")]
pub struct ResponseCompletedError;

// ============================================================================
// SECTION: Response Holder
// ============================================================================

/// Single-assignment holder for the result of one decode call.
///
/// # Invariants
/// - `set` succeeds at most once; later attempts fail and the rejected
///   value is dropped.
/// - Safe to share across threads behind `Arc`; publication is atomic.
#[derive(Debug)]
pub struct Response<T> {
    /// Write-once slot holding the decoded aggregate.
    slot: OnceLock<T>,
}

impl<T> Default for Response<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Response<T> {
    /// Creates an empty, not-yet-completed response holder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slot: OnceLock::new(),
        }
    }

    /// Publishes the decoded value into the holder.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseCompletedError`] when the holder already carries a
    /// value; the rejected `value` is dropped.
    pub fn set(&self, value: T) -> Result<(), ResponseCompletedError> {
        self.slot.set(value).map_err(|_| ResponseCompletedError)
    }

    /// Returns the completed value, or `None` before completion.
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.slot.get()
    }

    /// Returns true when the holder carries a value.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.slot.get().is_some()
    }

    /// Consumes the holder and returns the value, if completed.
    #[must_use]
    pub fn into_inner(self) -> Option<T> {
        self.slot.into_inner()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
