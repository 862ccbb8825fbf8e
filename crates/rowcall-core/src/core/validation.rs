// crates/rowcall-core/src/core/validation.rs
// ============================================================================
// Module: Rowcall Field Validation Contract
// Description: Context-gated optional-field constraint metadata.
// Purpose: Let one field declaration be optional or required per validation pass.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This module defines the declarative [`OptionalConstraint`] attached to
//! field descriptors and the gating contract an external validation engine
//! must honor. The constraint carries metadata only; [`validate_field`] is
//! the reference evaluation routine showing how a consuming engine resolves
//! the lookup key, distinguishes configuration errors from violations, and
//! applies group and context gating.
//! Invariants:
//! - `request_validation` is the single living context flag; the deprecated
//!   `protocol_error` spelling is mapped onto it at construction time.
//! - An unresolvable lookup key is a configuration error, never a violation.
//! - A violation is live only when the pass matches the constraint's groups
//!   and context.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Violation message used when a constraint declares no message template.
pub const DEFAULT_VIOLATION_MESSAGE: &str = "value is absent or blank";

// ============================================================================
// SECTION: Validation Groups
// ============================================================================

/// Marker partitioning which constraints are active in a validation pass.
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization is applied by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationGroup(String);

impl ValidationGroup {
    /// Creates a new validation group marker.
    #[must_use]
    pub fn new(group: impl Into<String>) -> Self {
        Self(group.into())
    }

    /// Returns the marker as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ValidationGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// SECTION: Validation Pass
// ============================================================================

/// Kind of validation pass being executed by the engine.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassKind {
    /// Validation of an inbound request payload.
    Request,
    /// Any other validation pass (persistence-time, response, ad hoc).
    General,
}

/// One validation invocation: its kind plus the active groups.
///
/// # Invariants
/// - Groups are a snapshot for the duration of the pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationPass {
    /// Kind of pass being executed.
    pub kind: PassKind,
    /// Groups active for this pass.
    pub groups: BTreeSet<ValidationGroup>,
}

impl ValidationPass {
    /// Creates an inbound-request validation pass.
    #[must_use]
    pub fn request(groups: impl IntoIterator<Item = ValidationGroup>) -> Self {
        Self {
            kind: PassKind::Request,
            groups: groups.into_iter().collect(),
        }
    }

    /// Creates a general (non-request) validation pass.
    #[must_use]
    pub fn general(groups: impl IntoIterator<Item = ValidationGroup>) -> Self {
        Self {
            kind: PassKind::General,
            groups: groups.into_iter().collect(),
        }
    }

    /// Returns true when this pass validates an inbound request.
    #[must_use]
    pub const fn is_request(&self) -> bool {
        matches!(self.kind, PassKind::Request)
    }
}

// ============================================================================
// SECTION: Optional Constraint
// ============================================================================

/// Declarative per-field constraint gating absent-or-blank violations.
///
/// # Invariants
/// - All attributes default to empty/false; an all-default constraint is
///   live in every pass.
/// - `request_validation` is the only stored context flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionalConstraint {
    /// Violation message template; empty selects the default message.
    pub message: String,
    /// Groups in which this constraint participates; empty matches any pass.
    pub groups: BTreeSet<ValidationGroup>,
    /// Metadata markers carried through to violations; not interpreted here.
    pub payload: BTreeSet<String>,
    /// Explicit lookup key; empty selects the field's own name.
    pub key: String,
    /// When true, the violation is live only during request validation.
    pub request_validation: bool,
}

impl OptionalConstraint {
    /// Creates an all-default constraint.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the violation message template.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Adds a validation group.
    #[must_use]
    pub fn with_group(mut self, group: ValidationGroup) -> Self {
        self.groups.insert(group);
        self
    }

    /// Adds a payload marker.
    #[must_use]
    pub fn with_payload_marker(mut self, marker: impl Into<String>) -> Self {
        self.payload.insert(marker.into());
        self
    }

    /// Sets the explicit lookup key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Sets the request-validation context flag.
    #[must_use]
    pub const fn with_request_validation(mut self, value: bool) -> Self {
        self.request_validation = value;
        self
    }

    /// Sets the legacy protocol-error flag.
    ///
    /// Retained for call sites written against the old attribute name; the
    /// value is stored in `request_validation`.
    #[deprecated(note = "use `with_request_validation`")]
    #[must_use]
    pub const fn with_protocol_error(self, value: bool) -> Self {
        self.with_request_validation(value)
    }

    /// Returns the key used to look up the value under validation.
    #[must_use]
    pub fn effective_key<'a>(&'a self, field_name: &'a str) -> &'a str {
        if self.key.is_empty() { field_name } else { &self.key }
    }

    /// Returns true when a violation of this constraint is live for `pass`.
    ///
    /// Live means: the pass's active groups intersect the constraint's
    /// groups (an empty group set matches any pass), and — when
    /// `request_validation` is set — the pass is an inbound-request pass.
    #[must_use]
    pub fn is_live(&self, pass: &ValidationPass) -> bool {
        if self.request_validation && !pass.is_request() {
            return false;
        }
        if self.groups.is_empty() {
            return true;
        }
        !self.groups.is_disjoint(&pass.groups)
    }

    /// Returns the violation message for this constraint.
    #[must_use]
    pub fn violation_message(&self) -> &str {
        if self.message.is_empty() {
            DEFAULT_VIOLATION_MESSAGE
        } else {
            &self.message
        }
    }
}

// ============================================================================
// SECTION: Field Descriptor
// ============================================================================

/// A named field together with its optional-value constraint.
///
/// # Invariants
/// - `name` is the property name used when the constraint key is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Property name of the field under validation.
    pub name: String,
    /// Constraint attached to the field.
    pub constraint: OptionalConstraint,
}

impl FieldDescriptor {
    /// Creates a field descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, constraint: OptionalConstraint) -> Self {
        Self {
            name: name.into(),
            constraint,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Constraint wiring errors surfaced to the validation engine.
///
/// # Invariants
/// - Raised for configuration defects only, never for validation failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConstraintConfigError {
    /// The effective lookup key names no known property.
    #[error("validation key '{key}' does not resolve to a known property")]
    UnresolvableKey {
        /// Effective lookup key that failed to resolve.
        key: String,
    },
}

// ============================================================================
// SECTION: Violation
// ============================================================================

/// A live absent-or-blank violation produced for one field.
///
/// # Invariants
/// - `key` is the effective lookup key used to resolve the value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Name of the violated field.
    pub field: String,
    /// Effective lookup key for the value under validation.
    pub key: String,
    /// Rendered violation message.
    pub message: String,
}

// ============================================================================
// SECTION: Value Lookup
// ============================================================================

/// Resolves lookup keys to candidate values on the object under validation.
pub trait ValueLookup {
    /// Resolves `key` to the candidate value.
    ///
    /// `Ok(None)` means the property is known but carries no value.
    ///
    /// # Errors
    ///
    /// Returns [`ConstraintConfigError::UnresolvableKey`] when `key` names
    /// no known property.
    fn resolve(&self, key: &str) -> Result<Option<&Value>, ConstraintConfigError>;
}

impl ValueLookup for BTreeMap<String, Value> {
    fn resolve(&self, key: &str) -> Result<Option<&Value>, ConstraintConfigError> {
        self.get(key).map(Some).ok_or_else(|| ConstraintConfigError::UnresolvableKey {
            key: key.to_string(),
        })
    }
}

/// Payload view separating declared properties from assigned values.
///
/// # Invariants
/// - Every key in `values` must also appear in `declared`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadView {
    /// Property names the payload schema declares.
    pub declared: BTreeSet<String>,
    /// Values assigned to declared properties.
    pub values: BTreeMap<String, Value>,
}

impl PayloadView {
    /// Creates an empty payload view.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a property without assigning a value.
    #[must_use]
    pub fn declare(mut self, name: impl Into<String>) -> Self {
        self.declared.insert(name.into());
        self
    }

    /// Declares a property and assigns its value.
    #[must_use]
    pub fn with_value(mut self, name: impl Into<String>, value: Value) -> Self {
        let name = name.into();
        self.declared.insert(name.clone());
        self.values.insert(name, value);
        self
    }
}

impl ValueLookup for PayloadView {
    fn resolve(&self, key: &str) -> Result<Option<&Value>, ConstraintConfigError> {
        if !self.declared.contains(key) {
            return Err(ConstraintConfigError::UnresolvableKey {
                key: key.to_string(),
            });
        }
        Ok(self.values.get(key))
    }
}

// ============================================================================
// SECTION: Evaluation
// ============================================================================

/// Returns true when the value counts as absent or blank.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_) => false,
    }
}

/// Evaluates one field against one validation pass.
///
/// The lookup key is resolved before gating so that configuration defects
/// surface on every pass, not only on passes where the constraint is live.
///
/// # Errors
///
/// Returns [`ConstraintConfigError`] when the effective key resolves to no
/// known property.
pub fn validate_field<L>(
    field: &FieldDescriptor,
    pass: &ValidationPass,
    values: &L,
) -> Result<Option<Violation>, ConstraintConfigError>
where
    L: ValueLookup + ?Sized,
{
    let key = field.constraint.effective_key(&field.name);
    let value = values.resolve(key)?;
    if !field.constraint.is_live(pass) {
        return Ok(None);
    }
    let blank = value.is_none_or(is_blank);
    if !blank {
        return Ok(None);
    }
    Ok(Some(Violation {
        field: field.name.clone(),
        key: key.to_string(),
        message: field.constraint.violation_message().to_string(),
    }))
}
