// crates/ops-warden-core/src/runtime/registry.rs
// ============================================================================
// Module: Ops Warden Operation Registry
// Description: Registry mapping tool names to executable operations.
// Purpose: Route permitted invocations by tool identifier.
// Dependencies: crate::{core, interfaces}, thiserror
// ============================================================================

//! ## Overview
//! The operation registry resolves tool names to [`Operation`]
//! implementations stored behind trait objects. Registration is validated:
//! duplicate names are rejected so the mapping is consistent when the
//! gateway starts serving. Lookup is by exact name; a policy-allowed tool
//! that is absent here is a configuration inconsistency surfaced by the
//! gateway as an execution failure, not a policy violation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use thiserror::Error;

use crate::core::policy::ToolName;
use crate::interfaces::Operation;
use crate::interfaces::ToolDescriptor;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Registration failures.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A tool name was registered twice.
    #[error("operation already registered: {0}")]
    Duplicate(ToolName),
}

// ============================================================================
// SECTION: Operation Registry
// ============================================================================

/// Registry of executable operations keyed by tool name.
///
/// # Invariants
/// - Tool names are unique within the registry.
/// - Registered operations are `Send + Sync` and stored behind trait
///   objects.
#[derive(Default)]
pub struct OperationRegistry {
    /// Operation implementations keyed by tool name.
    operations: BTreeMap<ToolName, Box<dyn Operation>>,
}

impl OperationRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an operation under its descriptor name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] when the name is already taken.
    pub fn register(
        &mut self,
        operation: impl Operation + 'static,
    ) -> Result<(), RegistryError> {
        let name = operation.descriptor().name;
        if self.operations.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }
        self.operations.insert(name, Box::new(operation));
        Ok(())
    }

    /// Looks up an operation by exact tool name.
    #[must_use]
    pub fn get(&self, name: &ToolName) -> Option<&dyn Operation> {
        self.operations.get(name).map(AsRef::as_ref)
    }

    /// Returns true when the tool name is registered.
    #[must_use]
    pub fn contains(&self, name: &ToolName) -> bool {
        self.operations.contains_key(name)
    }

    /// Returns the number of registered operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns true when no operation is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Returns descriptors for every registered operation in name order.
    #[must_use]
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.operations.values().map(|operation| operation.descriptor()).collect()
    }
}

impl std::fmt::Debug for OperationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationRegistry")
            .field("tools", &self.operations.keys().collect::<Vec<_>>())
            .finish()
    }
}
