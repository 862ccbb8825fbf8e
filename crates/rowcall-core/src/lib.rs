// crates/rowcall-core/src/lib.rs
// ============================================================================
// Module: Rowcall Core Library
// Description: Typed result decoding and field validation contracts.
// Purpose: Decode tabular sources into typed aggregates with normalized errors.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Rowcall Core turns forward-only tabular sources into typed aggregates
//! through the [`ResponseHandler`] contract, publishes them through the
//! single-assignment [`Response`] holder, and defines the context-gated
//! [`OptionalConstraint`] consumed by an external validation engine.
//! Invariants:
//! - Source-native faults never escape a decode call unwrapped.
//! - Handlers are immutable after construction and safe for concurrent use
//!   against independent source/response pairs.
//! - The service registry is sealed before first lookup.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::response::Response;
pub use crate::core::response::ResponseCompletedError;
pub use crate::core::validation::ConstraintConfigError;
pub use crate::core::validation::DEFAULT_VIOLATION_MESSAGE;
pub use crate::core::validation::FieldDescriptor;
pub use crate::core::validation::OptionalConstraint;
pub use crate::core::validation::PassKind;
pub use crate::core::validation::PayloadView;
pub use crate::core::validation::ValidationGroup;
pub use crate::core::validation::ValidationPass;
pub use crate::core::validation::ValueLookup;
pub use crate::core::validation::Violation;
pub use crate::core::validation::validate_field;
pub use crate::interfaces::CallError;
pub use crate::interfaces::ResponseHandler;
pub use crate::interfaces::RowMapper;
pub use crate::interfaces::TabularSource;
pub use crate::runtime::handlers::ListResponseHandler;
pub use crate::runtime::handlers::SetResponseHandler;
pub use crate::runtime::handlers::SingleResponseHandler;
pub use crate::runtime::memory::MemorySource;
pub use crate::runtime::memory::MemorySourceError;
pub use crate::runtime::registry::RegistryError;
pub use crate::runtime::registry::ServiceRegistry;
pub use crate::runtime::registry::ServiceRegistryBuilder;
pub use crate::runtime::telemetry::DecodeOutcome;
pub use crate::runtime::telemetry::HandlerKind;
pub use crate::runtime::telemetry::ROW_COUNT_BUCKETS;
