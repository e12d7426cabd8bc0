// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Compiler registry for run-time compiler selection.
//!
//! Backends register a live [`Compiler`] handle under a name; callers look it
//! up by name and compile through the trait object without linking against
//! the concrete backend.

use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use super::Compiler;
use crate::error::RegistryError;
use crate::snapshot::SnapshotTable;

static GLOBAL: LazyLock<Arc<CompilerRegistry>> = LazyLock::new(|| Arc::new(CompilerRegistry::new()));

/// Compiler registry.
///
/// The registry is thread-safe and can be shared across threads. Handles
/// returned by [`get`](Self::get) stay usable after the compiler is
/// unregistered.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use qubit_os_compiler::compiler::{qmi::QmiCompiler, CompilerRegistry};
/// use qubit_os_compiler::config::QmiConfig;
///
/// let registry = CompilerRegistry::new();
/// registry.register(Arc::new(QmiCompiler::new(&QmiConfig::default())));
///
/// let compiler = registry.get("qmi")?;
/// let output = compiler.compile(&program)?;
/// ```
pub struct CompilerRegistry {
    /// Registered compilers
    compilers: SnapshotTable<Arc<dyn Compiler>>,

    /// Default compiler name. Only changed with the table's writers held off,
    /// so it never names a compiler that is not registered.
    default_compiler: RwLock<Option<String>>,
}

impl CompilerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            compilers: SnapshotTable::new(),
            default_compiler: RwLock::new(None),
        }
    }

    /// The process-wide registry.
    ///
    /// Shared as an `Arc` so a [`PluginHost`](super::PluginHost) can load
    /// plugins into it.
    pub fn global() -> &'static Arc<CompilerRegistry> {
        &GLOBAL
    }

    /// Register a compiler under its own name.
    pub fn register(&self, compiler: Arc<dyn Compiler>) {
        let name = compiler.name().to_string();
        self.register_as(name, compiler);
    }

    /// Register a compiler under `name`.
    ///
    /// If a compiler with the same name already exists, it will be replaced.
    pub fn register_as(&self, name: impl Into<String>, compiler: Arc<dyn Compiler>) {
        let name = name.into();
        info!(compiler = %name, "Registering compiler");

        self.compilers.modify(|compilers| {
            if compilers.insert(name.clone(), compiler).is_some() {
                debug!(compiler = %name, "Replaced existing compiler");
            }

            // If this is the first compiler, make it the default
            let mut default = self.default_compiler.write();
            if default.is_none() {
                debug!(compiler = %name, "Setting as default compiler");
                *default = Some(name.clone());
            }
        });
    }

    /// Unregister a compiler.
    ///
    /// Outstanding handles keep working; later lookups fail.
    pub fn unregister(&self, name: &str) -> Option<Arc<dyn Compiler>> {
        self.remove_if(name, |_| true)
    }

    /// Unregister `name` only if it still maps to `compiler`.
    ///
    /// Returns whether the entry was removed.
    pub fn unregister_instance(&self, name: &str, compiler: &Arc<dyn Compiler>) -> bool {
        self.remove_if(name, |current| same_compiler(current, compiler))
            .is_some()
    }

    fn remove_if(
        &self,
        name: &str,
        predicate: impl FnOnce(&Arc<dyn Compiler>) -> bool,
    ) -> Option<Arc<dyn Compiler>> {
        self.compilers
            .update(|compilers| {
                if !compilers.get(name).is_some_and(predicate) {
                    return Err(());
                }
                let removed = compilers.remove(name);
                info!(compiler = %name, "Unregistered compiler");

                // If this was the default, clear it
                let mut default = self.default_compiler.write();
                if default.as_deref() == Some(name) {
                    warn!(compiler = %name, "Unregistered default compiler");
                    *default = None;
                }
                Ok(removed)
            })
            .ok()
            .flatten()
    }

    /// Get a compiler by name.
    pub fn get(&self, name: &str) -> Result<Arc<dyn Compiler>, RegistryError> {
        self.compilers
            .get(name)
            .ok_or_else(|| RegistryError::UnknownCompiler(name.to_string()))
    }

    /// Set the default compiler.
    pub fn set_default(&self, name: &str) -> Result<(), RegistryError> {
        self.compilers.locked(|compilers| {
            if !compilers.contains_key(name) {
                return Err(RegistryError::UnknownCompiler(name.to_string()));
            }

            *self.default_compiler.write() = Some(name.to_string());
            info!(compiler = %name, "Set as default compiler");
            Ok(())
        })
    }

    /// Get the default compiler.
    pub fn get_default(&self) -> Result<Arc<dyn Compiler>, RegistryError> {
        let default = self.default_compiler.read().clone();
        match default {
            Some(name) => self.get(&name),
            None => Err(RegistryError::UnknownCompiler(
                "No default compiler configured".to_string(),
            )),
        }
    }

    /// Get a compiler by name, or the default if name is None.
    pub fn get_or_default(&self, name: Option<&str>) -> Result<Arc<dyn Compiler>, RegistryError> {
        match name {
            Some(n) => self.get(n),
            None => self.get_default(),
        }
    }

    /// List all registered compiler names, sorted.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.compilers.snapshot().keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a compiler is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.compilers.snapshot().contains_key(name)
    }

    /// Get the number of registered compilers.
    pub fn len(&self) -> usize {
        self.compilers.snapshot().len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the default compiler name.
    pub fn default_compiler_name(&self) -> Option<String> {
        self.default_compiler.read().clone()
    }
}

impl Default for CompilerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Identity comparison of two compiler handles.
pub(crate) fn same_compiler(a: &Arc<dyn Compiler>, b: &Arc<dyn Compiler>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
