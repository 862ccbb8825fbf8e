// crates/rowcall-core/src/core/mod.rs
// ============================================================================
// Module: Rowcall Core Types
// Description: Response holder and field validation metadata.
// Purpose: Group the per-call data model shared across the toolkit.
// Dependencies: crate submodules
// ============================================================================

//! ## Overview
//! Core data types: the single-assignment [`response::Response`] holder and
//! the declarative [`validation`] contract consumed by an external
//! validation engine.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod response;
pub mod validation;
