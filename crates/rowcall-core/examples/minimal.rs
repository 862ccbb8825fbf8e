// crates/rowcall-core/examples/minimal.rs
// ============================================================================
// Module: Rowcall Minimal Example
// Description: Minimal end-to-end decode run using the in-memory source.
// Purpose: Demonstrate handler decoding and field validation.
// Dependencies: rowcall-core, serde_json
// ============================================================================

//! ## Overview
//! Decodes a small in-memory result set into a list and validates a payload
//! field. This example is backend-agnostic and suitable for quick verification.

use std::collections::BTreeMap;

use rowcall_core::FieldDescriptor;
use rowcall_core::ListResponseHandler;
use rowcall_core::MemorySource;
use rowcall_core::OptionalConstraint;
use rowcall_core::Response;
use rowcall_core::ResponseHandler;
use rowcall_core::RowMapper;
use rowcall_core::SingleResponseHandler;
use rowcall_core::ValidationPass;
use rowcall_core::validate_field;
use serde_json::Value;
use serde_json::json;

/// Error type for example preconditions.
#[derive(Debug)]
struct ExampleError(&'static str);

impl std::fmt::Display for ExampleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ExampleError {}

/// Row mapper that reads the name column of each row.
struct NameMapper;

impl RowMapper<MemorySource> for NameMapper {
    type Output = String;

    fn map_row(
        &self,
        source: &MemorySource,
        _index: usize,
    ) -> Result<Self::Output, <MemorySource as rowcall_core::TabularSource>::Error> {
        Ok(source.str_at(1)?.to_string())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Decode every row into an ordered list.
    let mut source = MemorySource::new(vec![
        vec![json!(1), json!("ada")],
        vec![json!(2), json!("grace")],
    ]);
    let handler = ListResponseHandler::new(NameMapper);
    let response = Response::new();
    handler.add_to_response(&mut source, &response)?;
    let names = response.get().ok_or(ExampleError("list response missing"))?;
    let _ = names;

    // Decode a filtered result set that must contain exactly one row.
    let mut lone = MemorySource::new(vec![vec![json!(2), json!("grace")]]);
    let single = SingleResponseHandler::new(NameMapper);
    let scalar = Response::new();
    single.add_to_response(&mut lone, &scalar)?;
    let _ = scalar.get();

    // Validate a required payload field before dispatching a request.
    let mut payload = BTreeMap::new();
    payload.insert("account".to_string(), Value::String("acct-1".to_string()));
    let constraint = OptionalConstraint::new().with_request_validation(true);
    let field = FieldDescriptor::new("account", constraint);
    let pass = ValidationPass::request(Vec::new());
    let violation = validate_field(&field, &pass, &payload)?;
    let _ = violation;

    Ok(())
}
