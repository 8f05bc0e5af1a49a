//! Module identities for the dependency graph.
//!
//! The registry is the node set of the graph: a name-keyed table that keeps
//! registration order, so every graph query iterates modules the same way
//! for the same insert history.

use indexmap::IndexMap;
use serde::Serialize;
use std::hash::{Hash, Hasher};

/// A named unit in the dependency graph.
///
/// Equality and hashing use the name only; the description is informational.
///
/// # Example
///
/// ```rust
/// use depscope::graph::Module;
///
/// let a = Module::new("auth", "Login and sessions");
/// let b = Module::new("auth", "");
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Module {
    /// Unique, case-sensitive module name
    pub name: String,
    /// Free-form description (may be empty)
    pub description: String,
}

impl Module {
    /// Creates a new module.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

impl PartialEq for Module {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Module {}

impl Hash for Module {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl std::fmt::Display for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Module: {}", self.name)
    }
}

/// Name-keyed, order-preserving table of registered modules.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: IndexMap<String, Module>,
}

impl ModuleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a module.
    ///
    /// Returns `false` without modifying the registry if the name is taken.
    pub fn insert(&mut self, module: Module) -> bool {
        if self.modules.contains_key(&module.name) {
            return false;
        }
        self.modules.insert(module.name.clone(), module);
        true
    }

    /// Removes a module, keeping the relative order of the others.
    pub fn remove(&mut self, name: &str) -> Option<Module> {
        self.modules.shift_remove(name)
    }

    /// Looks up a module by name.
    pub fn get(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }

    /// Checks if a module is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// Iterates module names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    /// Iterates modules in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    /// Returns the number of registered modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Checks if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
