// crates/rowcall-sqlite/src/lib.rs
// ============================================================================
// Module: Rowcall SQLite Library
// Description: SQLite-backed tabular source for the core decoding contracts.
// Purpose: Decode SQL query results through Rowcall response handlers.
// Dependencies: rowcall-core, rusqlite
// ============================================================================

//! ## Overview
//! Rowcall SQLite adapts `rusqlite` query results to the core
//! [`rowcall_core::TabularSource`] contract, so any response handler can
//! decode SQL rows. Connection helpers apply configured pragmas and
//! translate every `rusqlite` fault into [`SqliteSourceError`] at this
//! crate's boundary.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod source;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use source::DEFAULT_BUSY_TIMEOUT_MS;
pub use source::MAX_BUSY_TIMEOUT_MS;
pub use source::SqliteSource;
pub use source::SqliteSourceConfig;
pub use source::SqliteSourceError;
pub use source::open_connection;
pub use source::open_in_memory;
