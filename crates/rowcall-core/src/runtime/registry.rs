// crates/rowcall-core/src/runtime/registry.rs
// ============================================================================
// Module: Rowcall Service Registry
// Description: Sealed registry for singleton collaborators keyed by type.
// Purpose: Provide explicit dependency lookup with fail-fast wiring checks.
// Dependencies: thiserror, std
// ============================================================================

//! ## Overview
//! The service registry replaces ambient application-context lookup with an
//! explicitly constructed, passed-by-reference object. Services are
//! registered during wiring through [`ServiceRegistryBuilder`]; `build`
//! seals the registry, after which it is read-only and safe for concurrent
//! lookups without locks.
//! Invariants:
//! - `(name, type)` pairs are unique; duplicates fail at registration time.
//! - Lookup by type alone succeeds only when exactly one candidate exists.
//! - The sealed registry is never mutated.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::any::TypeId;
use std::any::type_name;
use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Registry wiring and lookup errors.
///
/// # Invariants
/// - Raised for configuration defects; callers should fail fast, not retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No service of the requested type is registered.
    #[error("no service registered for type '{type_name}'")]
    NotFound {
        /// Requested service type.
        type_name: &'static str,
    },
    /// No service with the requested name and type is registered.
    #[error("no service named '{name}' registered for type '{type_name}'")]
    NotFoundNamed {
        /// Requested service type.
        type_name: &'static str,
        /// Requested service name.
        name: String,
    },
    /// More than one service of the requested type is registered.
    #[error("multiple services registered for type '{type_name}': {}", names.join(", "))]
    Ambiguous {
        /// Requested service type.
        type_name: &'static str,
        /// Names of the candidate registrations.
        names: Vec<String>,
    },
    /// A `(name, type)` pair was registered twice.
    #[error("service '{name}' already registered for type '{type_name}'")]
    Duplicate {
        /// Service type being registered.
        type_name: &'static str,
        /// Service name being registered.
        name: String,
    },
}

// ============================================================================
// SECTION: Entries
// ============================================================================

/// One registered service instance.
#[derive(Clone)]
struct RegistryEntry {
    /// Registration name, unique per type.
    name: String,
    /// Type-erased service instance.
    service: Arc<dyn Any + Send + Sync>,
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Accumulates registrations before the registry is sealed.
#[derive(Default)]
pub struct ServiceRegistryBuilder {
    /// Registrations grouped by type, in registration order.
    entries: HashMap<TypeId, Vec<RegistryEntry>>,
}

impl ServiceRegistryBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a service instance under the given name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] when the `(name, type)` pair is
    /// already registered.
    pub fn register<T>(&mut self, name: impl Into<String>, service: Arc<T>) -> Result<(), RegistryError>
    where
        T: Send + Sync + 'static,
    {
        let name = name.into();
        let slot = self.entries.entry(TypeId::of::<T>()).or_default();
        if slot.iter().any(|entry| entry.name == name) {
            return Err(RegistryError::Duplicate {
                type_name: type_name::<T>(),
                name,
            });
        }
        let service: Arc<dyn Any + Send + Sync> = service;
        slot.push(RegistryEntry {
            name,
            service,
        });
        Ok(())
    }

    /// Seals the builder into an immutable registry.
    #[must_use]
    pub fn build(self) -> ServiceRegistry {
        ServiceRegistry {
            entries: self.entries,
        }
    }
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Immutable service registry safe for concurrent lookups.
///
/// # Invariants
/// - Entries are fixed once built; lookups take no locks.
pub struct ServiceRegistry {
    /// Registrations grouped by type, in registration order.
    entries: HashMap<TypeId, Vec<RegistryEntry>>,
}

impl ServiceRegistry {
    /// Returns an empty registry.
    #[must_use]
    pub fn empty() -> Self {
        ServiceRegistryBuilder::new().build()
    }

    /// Looks up the unique service of type `T`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when no candidate exists and
    /// [`RegistryError::Ambiguous`] when more than one does.
    pub fn lookup<T>(&self) -> Result<Arc<T>, RegistryError>
    where
        T: Send + Sync + 'static,
    {
        let candidates = self.entries_of::<T>();
        match candidates {
            [] => Err(RegistryError::NotFound {
                type_name: type_name::<T>(),
            }),
            [entry] => downcast_entry(entry),
            _ => Err(RegistryError::Ambiguous {
                type_name: type_name::<T>(),
                names: candidates.iter().map(|entry| entry.name.clone()).collect(),
            }),
        }
    }

    /// Looks up a service of type `T` by registration name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFoundNamed`] when no matching
    /// registration exists.
    pub fn lookup_named<T>(&self, name: &str) -> Result<Arc<T>, RegistryError>
    where
        T: Send + Sync + 'static,
    {
        self.entries_of::<T>()
            .iter()
            .find(|entry| entry.name == name)
            .map_or_else(
                || {
                    Err(RegistryError::NotFoundNamed {
                        type_name: type_name::<T>(),
                        name: name.to_string(),
                    })
                },
                downcast_entry,
            )
    }

    /// Returns every registered service of type `T` in registration order.
    #[must_use]
    pub fn lookup_all<T>(&self) -> Vec<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        self.entries_of::<T>()
            .iter()
            .filter_map(|entry| Arc::clone(&entry.service).downcast::<T>().ok())
            .collect()
    }

    /// Returns the registrations recorded for type `T`.
    fn entries_of<T: 'static>(&self) -> &[RegistryEntry] {
        self.entries.get(&TypeId::of::<T>()).map_or(&[], Vec::as_slice)
    }
}

/// Downcasts a type-erased entry to its concrete service type.
fn downcast_entry<T>(entry: &RegistryEntry) -> Result<Arc<T>, RegistryError>
where
    T: Send + Sync + 'static,
{
    // Entries are keyed by TypeId, so the downcast cannot fail in practice.
    Arc::clone(&entry.service).downcast::<T>().map_err(|_| RegistryError::NotFound {
        type_name: type_name::<T>(),
    })
}
