// crates/rowcall-core/src/runtime/mod.rs
// ============================================================================
// Module: Rowcall Runtime
// Description: Concrete handlers, service registry, and telemetry labels.
// Purpose: Group the runtime pieces built on the interface contracts.
// Dependencies: crate submodules
// ============================================================================

//! ## Overview
//! Runtime implementations of the interface contracts: the accumulating
//! [`handlers`], the sealed service [`registry`], the in-memory [`memory`]
//! source, and dependency-light [`telemetry`] labels.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod handlers;
pub mod memory;
pub mod registry;
pub mod telemetry;
