// crates/rowcall-core/tests/handlers.rs
// ============================================================================
// Module: Handler Decoding Unit Tests
// Description: Accumulation, error normalization, and concurrency tests.
// Purpose: Validate set/list/scalar decode semantics and the decode boundary.
// ============================================================================

//! ## Overview
//! Unit-level tests for the accumulating handlers:
//! - List decode preserves length and source order
//! - Set decode deduplicates by value equality, order-independently
//! - Scalar decode enforces exactly-one-row cardinality
//! - Source and mapper faults are wrapped; nothing partial is published
//! - One handler instance serves concurrent calls with isolated results

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::collections::HashSet;
use std::error::Error;
use std::sync::Arc;
use std::thread;

use rowcall_core::CallError;
use rowcall_core::ListResponseHandler;
use rowcall_core::MemorySource;
use rowcall_core::MemorySourceError;
use rowcall_core::Response;
use rowcall_core::ResponseHandler;
use rowcall_core::RowMapper;
use rowcall_core::SetResponseHandler;
use rowcall_core::SingleResponseHandler;
use serde_json::json;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn int_rows(values: &[i64]) -> MemorySource {
    MemorySource::new(values.iter().map(|value| vec![json!(value)]).collect())
}

struct IntCellMapper;

impl RowMapper<MemorySource> for IntCellMapper {
    type Output = i64;

    fn map_row(&self, source: &MemorySource, _index: usize) -> Result<i64, MemorySourceError> {
        source.i64_at(0)
    }
}

// ============================================================================
// SECTION: List Decoding
// ============================================================================

#[test]
fn list_preserves_source_order() {
    let handler = ListResponseHandler::new(IntCellMapper);
    let mut source = int_rows(&[3, 1, 2]);
    let response = Response::new();
    handler.add_to_response(&mut source, &response).expect("decode");
    assert_eq!(response.get(), Some(&vec![3, 1, 2]));
}

#[test]
fn list_decodes_empty_source() {
    let handler = ListResponseHandler::new(IntCellMapper);
    let mut source = int_rows(&[]);
    let response = Response::new();
    handler.add_to_response(&mut source, &response).expect("decode");
    assert_eq!(response.get(), Some(&Vec::new()));
}

#[test]
fn list_accepts_closure_mappers() {
    let mapper =
        |source: &MemorySource, _index: usize| -> Result<i64, MemorySourceError> { source.i64_at(0) };
    let handler = ListResponseHandler::new(mapper);
    let mut source = int_rows(&[7, 8]);
    let response = Response::new();
    handler.add_to_response(&mut source, &response).expect("decode");
    assert_eq!(response.get(), Some(&vec![7, 8]));
}

#[test]
fn mapper_receives_zero_based_indices() {
    let mapper = |_source: &MemorySource, index: usize| -> Result<i64, MemorySourceError> {
        Ok(i64::try_from(index).unwrap())
    };
    let handler = ListResponseHandler::new(mapper);
    let mut source = int_rows(&[10, 20, 30]);
    let response = Response::new();
    handler.add_to_response(&mut source, &response).expect("decode");
    assert_eq!(response.get(), Some(&vec![0, 1, 2]));
}

// ============================================================================
// SECTION: Set Decoding
// ============================================================================

#[test]
fn set_deduplicates_by_value_equality() {
    let handler = SetResponseHandler::new(IntCellMapper);
    let mut source = int_rows(&[5, 5, 9, 5, 9]);
    let response = Response::new();
    handler.add_to_response(&mut source, &response).expect("decode");
    let expected: HashSet<i64> = [5, 9].into_iter().collect();
    assert_eq!(response.get(), Some(&expected));
}

#[test]
fn set_membership_is_order_independent() {
    let handler = SetResponseHandler::new(IntCellMapper);

    let mut forward = int_rows(&[1, 2, 3, 2]);
    let forward_response = Response::new();
    handler.add_to_response(&mut forward, &forward_response).expect("decode");

    let mut permuted = int_rows(&[2, 3, 2, 1]);
    let permuted_response = Response::new();
    handler.add_to_response(&mut permuted, &permuted_response).expect("decode");

    assert_eq!(forward_response.get(), permuted_response.get());
}

// ============================================================================
// SECTION: Scalar Decoding
// ============================================================================

#[test]
fn single_yields_the_lone_row() {
    let handler = SingleResponseHandler::new(IntCellMapper);
    let mut source = int_rows(&[42]);
    let response = Response::new();
    handler.add_to_response(&mut source, &response).expect("decode");
    assert_eq!(response.get(), Some(&42));
}

#[test]
fn single_rejects_empty_source() {
    let handler = SingleResponseHandler::new(IntCellMapper);
    let mut source = int_rows(&[]);
    let response = Response::new();
    let err = handler.add_to_response(&mut source, &response).expect_err("cardinality");
    assert!(matches!(err, CallError::Cardinality { rows: 0 }));
    assert!(!response.is_complete());
}

#[test]
fn single_rejects_second_row() {
    let handler = SingleResponseHandler::new(IntCellMapper);
    let mut source = int_rows(&[1, 2, 3]);
    let response = Response::new();
    let err = handler.add_to_response(&mut source, &response).expect_err("cardinality");
    assert!(matches!(err, CallError::Cardinality { rows: 2 }));
    assert!(!response.is_complete());
}

// ============================================================================
// SECTION: Decode Boundary
// ============================================================================

#[test]
fn advancement_fault_is_wrapped_and_publishes_nothing() {
    let handler = ListResponseHandler::new(IntCellMapper);
    let mut source = int_rows(&[1, 2, 3]).fail_at_row(2);
    let response = Response::new();
    let err = handler.add_to_response(&mut source, &response).expect_err("fault");
    let CallError::Decoding(_) = &err else {
        panic!("expected decoding error, got {err}");
    };
    let cause = err.source().expect("wrapped cause");
    assert!(matches!(
        cause.downcast_ref::<MemorySourceError>(),
        Some(MemorySourceError::Injected { row: 2 })
    ));
    assert!(!response.is_complete());
}

#[test]
fn mapper_fault_is_wrapped_and_publishes_nothing() {
    let handler = ListResponseHandler::new(IntCellMapper);
    let mut source = MemorySource::new(vec![vec![json!(1)], vec![json!("not a number")]]);
    let response = Response::new();
    let err = handler.add_to_response(&mut source, &response).expect_err("fault");
    let cause = err.source().expect("wrapped cause");
    assert!(matches!(
        cause.downcast_ref::<MemorySourceError>(),
        Some(MemorySourceError::BadCell { column: 0, .. })
    ));
    assert!(!response.is_complete());
}

#[test]
fn completed_response_is_rejected_before_the_source_is_touched() {
    let handler = ListResponseHandler::new(IntCellMapper);
    // A fault on the very first advance proves the source was never read.
    let mut source = int_rows(&[1]).fail_at_row(0);
    let response = Response::new();
    response.set(vec![99]).expect("pre-complete");
    let err = handler.add_to_response(&mut source, &response).expect_err("rejected");
    assert!(matches!(err, CallError::Completed(_)));
    assert_eq!(response.get(), Some(&vec![99]));
}

// ============================================================================
// SECTION: Handler Reuse
// ============================================================================

#[test]
fn one_handler_serves_sequential_calls() {
    let handler = ListResponseHandler::new(IntCellMapper);
    for round in 0_i64..4 {
        let mut source = int_rows(&[round, round + 1]);
        let response = Response::new();
        handler.add_to_response(&mut source, &response).expect("decode");
        assert_eq!(response.get(), Some(&vec![round, round + 1]));
    }
}

#[test]
fn one_handler_serves_concurrent_calls_with_isolated_results() {
    let handler = Arc::new(SetResponseHandler::new(IntCellMapper));
    let mut workers = Vec::new();
    for worker in 0_i64..8 {
        let handler = Arc::clone(&handler);
        workers.push(thread::spawn(move || {
            let base = worker * 100;
            let mut source = int_rows(&[base, base + 1, base, base + 2]);
            let response = Response::new();
            handler.add_to_response(&mut source, &response).expect("decode");
            let expected: HashSet<i64> = [base, base + 1, base + 2].into_iter().collect();
            assert_eq!(response.get(), Some(&expected));
        }));
    }
    for worker in workers {
        worker.join().expect("worker");
    }
}
