//! Procedure registry
//!
//! Maps procedure names to their implementations. Registering a name that is
//! already taken replaces the previous procedure.
//!
//! # Thread Safety
//!
//! Registries are cheaply cloneable: the map lives behind an `Arc` and is
//! copied only when a clone that shares it is modified. A dispatcher holds
//! its registry behind a lock and hands out `Arc` handles to procedures, so
//! a call in progress keeps running even if its name is replaced or removed.
//!
//! # Examples
//!
//! ```rust
//! use jrd_dispatch::{from_fn, Args, Fault, Registry};
//!
//! let mut registry = Registry::new();
//! registry.register(from_fn("ping", &[], |_args: Args| Ok::<_, Fault>("pong")));
//!
//! assert!(registry.has_procedure("ping"));
//! assert_eq!(registry.procedures(), vec!["ping".to_string()]);
//! ```

use crate::procedure::Procedure;
use std::collections::HashMap;
use std::sync::Arc;

/// Name to procedure map
#[derive(Clone, Default)]
pub struct Registry {
    procedures: Arc<HashMap<String, Arc<dyn Procedure>>>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a procedure under its own name
    ///
    /// Returns the procedure previously registered under that name, if any.
    pub fn register(&mut self, procedure: Box<dyn Procedure>) -> Option<Arc<dyn Procedure>> {
        let procedure: Arc<dyn Procedure> = Arc::from(procedure);
        let name = procedure.name().to_string();
        Arc::make_mut(&mut self.procedures).insert(name, procedure)
    }

    /// Remove a procedure; returns whether it was registered
    pub fn remove(&mut self, name: &str) -> bool {
        if !self.procedures.contains_key(name) {
            return false;
        }
        Arc::make_mut(&mut self.procedures).remove(name).is_some()
    }

    /// Get the procedure registered under `name`
    pub fn get(&self, name: &str) -> Option<Arc<dyn Procedure>> {
        self.procedures.get(name).cloned()
    }

    /// Check if a procedure is registered
    pub fn has_procedure(&self, name: &str) -> bool {
        self.procedures.contains_key(name)
    }

    /// All registered names, sorted
    pub fn procedures(&self) -> Vec<String> {
        let mut names: Vec<String> = self.procedures.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.procedures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procedures.is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("procedures", &self.procedures())
            .finish()
    }
}
