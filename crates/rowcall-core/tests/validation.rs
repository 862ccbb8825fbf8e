// crates/rowcall-core/tests/validation.rs
// ============================================================================
// Module: Field Validation Contract Unit Tests
// Description: Gating, key resolution, and misconfiguration tests.
// Purpose: Validate the optional-constraint semantics an engine must honor.
// ============================================================================

//! ## Overview
//! Unit-level tests for the field validation contract:
//! - Request/general context gating with and without the request flag
//! - Group intersection gating
//! - Effective key resolution and unresolvable-key configuration errors
//! - Blankness rules and the deprecated protocol-error alias

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

use rowcall_core::ConstraintConfigError;
use rowcall_core::DEFAULT_VIOLATION_MESSAGE;
use rowcall_core::FieldDescriptor;
use rowcall_core::OptionalConstraint;
use rowcall_core::PayloadView;
use rowcall_core::ValidationGroup;
use rowcall_core::ValidationPass;
use rowcall_core::validate_field;
use serde_json::json;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn absent_field(constraint: OptionalConstraint) -> (FieldDescriptor, PayloadView) {
    let field = FieldDescriptor::new("email", constraint);
    let payload = PayloadView::new().declare("email");
    (field, payload)
}

// ============================================================================
// SECTION: Context Gating
// ============================================================================

#[test]
fn request_flag_suppresses_violation_outside_request_passes() {
    let (field, payload) = absent_field(OptionalConstraint::new().with_request_validation(true));

    let general = validate_field(&field, &ValidationPass::general(Vec::new()), &payload).expect("evaluate");
    assert_eq!(general, None);

    let request = validate_field(&field, &ValidationPass::request(Vec::new()), &payload).expect("evaluate");
    let violation = request.expect("live violation");
    assert_eq!(violation.field, "email");
    assert_eq!(violation.message, DEFAULT_VIOLATION_MESSAGE);
}

#[test]
fn default_constraint_is_evaluated_in_every_context() {
    let (field, payload) = absent_field(OptionalConstraint::new());

    for pass in [ValidationPass::general(Vec::new()), ValidationPass::request(Vec::new())] {
        let outcome = validate_field(&field, &pass, &payload).expect("evaluate");
        assert!(outcome.is_some());
    }
}

#[test]
fn group_gating_requires_an_intersection() {
    let constraint = OptionalConstraint::new().with_group(ValidationGroup::new("update"));
    let (field, payload) = absent_field(constraint);

    let create_pass = ValidationPass::general([ValidationGroup::new("create")]);
    assert_eq!(validate_field(&field, &create_pass, &payload).expect("evaluate"), None);

    let update_pass = ValidationPass::general([ValidationGroup::new("update")]);
    assert!(validate_field(&field, &update_pass, &payload).expect("evaluate").is_some());
}

#[test]
fn request_flag_and_groups_gate_together() {
    let constraint = OptionalConstraint::new()
        .with_group(ValidationGroup::new("update"))
        .with_request_validation(true);
    let (field, payload) = absent_field(constraint);

    // Matching group, wrong context.
    let general = ValidationPass::general([ValidationGroup::new("update")]);
    assert_eq!(validate_field(&field, &general, &payload).expect("evaluate"), None);

    // Matching context, disjoint groups.
    let disjoint = ValidationPass::request([ValidationGroup::new("create")]);
    assert_eq!(validate_field(&field, &disjoint, &payload).expect("evaluate"), None);

    // Both match.
    let live = ValidationPass::request([ValidationGroup::new("update")]);
    assert!(validate_field(&field, &live, &payload).expect("evaluate").is_some());
}

// ============================================================================
// SECTION: Key Resolution
// ============================================================================

#[test]
fn explicit_key_overrides_the_field_name() {
    let constraint = OptionalConstraint::new().with_key("contact_email");
    assert_eq!(constraint.effective_key("email"), "contact_email");

    let field = FieldDescriptor::new("email", constraint);
    let payload = PayloadView::new().declare("contact_email");
    let violation = validate_field(&field, &ValidationPass::general(Vec::new()), &payload)
        .expect("evaluate")
        .expect("live violation");
    assert_eq!(violation.key, "contact_email");
    assert_eq!(violation.field, "email");
}

#[test]
fn empty_key_falls_back_to_the_field_name() {
    let constraint = OptionalConstraint::new();
    assert_eq!(constraint.effective_key("email"), "email");
}

#[test]
fn unresolvable_key_is_a_configuration_error() {
    let field = FieldDescriptor::new("email", OptionalConstraint::new().with_key("missing"));
    let payload = PayloadView::new().declare("email");
    let err = validate_field(&field, &ValidationPass::general(Vec::new()), &payload)
        .expect_err("configuration error");
    assert_eq!(
        err,
        ConstraintConfigError::UnresolvableKey {
            key: "missing".to_string()
        }
    );
}

#[test]
fn unresolvable_key_surfaces_even_when_the_constraint_is_not_live() {
    let constraint =
        OptionalConstraint::new().with_key("missing").with_request_validation(true);
    let field = FieldDescriptor::new("email", constraint);
    let payload = PayloadView::new().declare("email");
    // Non-request pass would suppress the violation, but misconfiguration
    // must still fail fast.
    let result = validate_field(&field, &ValidationPass::general(Vec::new()), &payload);
    assert!(result.is_err());
}

// ============================================================================
// SECTION: Blankness
// ============================================================================

#[test]
fn blank_values_violate_and_substantive_values_pass() {
    let field = FieldDescriptor::new("email", OptionalConstraint::new());
    let pass = ValidationPass::general(Vec::new());

    for blank in [json!(null), json!(""), json!("   ")] {
        let payload = PayloadView::new().with_value("email", blank);
        assert!(validate_field(&field, &pass, &payload).expect("evaluate").is_some());
    }

    for present in [json!("a@b.example"), json!(0), json!(false)] {
        let payload = PayloadView::new().with_value("email", present);
        assert_eq!(validate_field(&field, &pass, &payload).expect("evaluate"), None);
    }
}

#[test]
fn constraint_message_template_overrides_the_default() {
    let constraint = OptionalConstraint::new().with_message("email is required");
    let (field, payload) = absent_field(constraint);
    let violation = validate_field(&field, &ValidationPass::general(Vec::new()), &payload)
        .expect("evaluate")
        .expect("live violation");
    assert_eq!(violation.message, "email is required");
}

// ============================================================================
// SECTION: Deprecated Alias
// ============================================================================

#[test]
#[allow(deprecated, reason = "Exercises the compatibility path for the legacy flag.")]
fn protocol_error_alias_writes_through_to_request_validation() {
    let constraint = OptionalConstraint::new().with_protocol_error(true);
    assert!(constraint.request_validation);

    let (field, payload) = absent_field(constraint);
    assert_eq!(
        validate_field(&field, &ValidationPass::general(Vec::new()), &payload).expect("evaluate"),
        None
    );
    assert!(
        validate_field(&field, &ValidationPass::request(Vec::new()), &payload)
            .expect("evaluate")
            .is_some()
    );
}
