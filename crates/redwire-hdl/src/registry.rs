//! Name to circuit lookup used to resolve calls.

use std::collections::BTreeMap;
use std::sync::Arc;

use redwire_ir::AnnotatedCircuit;
use tracing::debug;

use crate::error::{HdlError, HdlResult};
use crate::options::HdlOptions;
use crate::parser::compile;

/// Registered circuits, keyed by name.
///
/// Populate the registry before compiling; compilation only reads it, so a
/// shared registry can serve independent compilations.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    circuits: BTreeMap<String, Arc<AnnotatedCircuit>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a circuit by name.
    pub fn get(&self, name: &str) -> Option<Arc<AnnotatedCircuit>> {
        self.circuits.get(name).cloned()
    }

    /// Check whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.circuits.contains_key(name)
    }

    /// Register a circuit under a new name.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        circuit: impl Into<Arc<AnnotatedCircuit>>,
    ) -> HdlResult<()> {
        let name = name.into();
        if self.circuits.contains_key(&name) {
            return Err(HdlError::DuplicateRegistration(name));
        }
        debug!(name = %name, "registered circuit");
        self.circuits.insert(name, circuit.into());
        Ok(())
    }

    /// Compile DSL source against this registry and register the result.
    pub fn register_source(
        &mut self,
        name: impl Into<String>,
        source: &str,
        options: &HdlOptions,
    ) -> HdlResult<()> {
        let name = name.into();
        if self.circuits.contains_key(&name) {
            return Err(HdlError::DuplicateRegistration(name));
        }
        let circuit = compile(source, self, options)?;
        self.register(name, circuit)
    }

    /// Registered names in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.circuits.keys().map(String::as_str)
    }

    /// Iterate over `(name, circuit)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<AnnotatedCircuit>)> + '_ {
        self.circuits.iter().map(|(name, c)| (name.as_str(), c))
    }

    /// Number of registered circuits.
    pub fn len(&self) -> usize {
        self.circuits.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.circuits.is_empty()
    }
}
