// crates/rowcall-core/src/runtime/telemetry.rs
// ============================================================================
// Module: Rowcall Telemetry
// Description: Observability labels for decode calls.
// Purpose: Provide stable metric labels and buckets without hard deps.
// Dependencies: crate::interfaces
// ============================================================================

//! ## Overview
//! This module exposes a thin metrics vocabulary for decode calls: stable
//! outcome and handler labels plus row-count histogram buckets. It is
//! intentionally dependency-light so deployments can plug in Prometheus or
//! OpenTelemetry without redesign; nothing in the decode path depends on it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::interfaces::CallError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Bucket boundaries for rows-consumed-per-decode histograms.
pub const ROW_COUNT_BUCKETS: &[u64] = &[1, 2, 5, 10, 25, 50, 100, 250, 500, 1_000, 5_000, 10_000];

// ============================================================================
// SECTION: Metric Labels
// ============================================================================

/// Handler variant classification for decode metrics.
///
/// # Invariants
/// - Variants are stable for telemetry labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum HandlerKind {
    /// Set-accumulating handler.
    Set,
    /// List-accumulating handler.
    List,
    /// Scalar handler.
    Single,
}

impl HandlerKind {
    /// Returns a stable label for the handler variant.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::List => "list",
            Self::Single => "single",
        }
    }
}

/// Decode call outcome classification.
///
/// # Invariants
/// - Variants are stable for telemetry labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum DecodeOutcome {
    /// Decode completed and published its aggregate.
    Ok,
    /// A source or mapper fault was wrapped at the decode boundary.
    DecodingFault,
    /// Scalar cardinality was violated.
    CardinalityViolation,
    /// The caller handed in an already-completed response.
    ResponseCompleted,
}

impl DecodeOutcome {
    /// Returns a stable label for the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::DecodingFault => "decoding_fault",
            Self::CardinalityViolation => "cardinality_violation",
            Self::ResponseCompleted => "response_completed",
        }
    }

    /// Classifies a decode call result.
    #[must_use]
    pub fn classify(result: &Result<(), CallError>) -> Self {
        match result {
            Ok(()) => Self::Ok,
            Err(CallError::Decoding(_)) => Self::DecodingFault,
            Err(CallError::Cardinality { .. }) => Self::CardinalityViolation,
            Err(CallError::Completed(_)) => Self::ResponseCompleted,
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
