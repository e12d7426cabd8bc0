// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Compiler plugins and the host that loads them.
//!
//! A plugin is a backend module's entry point: when the host starts it, the
//! plugin registers its compilers through a [`PluginContext`]; when the host
//! unloads it, every compiler it registered is removed from the registry. The
//! host only tracks ownership. Discovering and loading the code behind a
//! plugin is the embedding application's job.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{error, info, warn};

use super::registry::same_compiler;
use super::{Compiler, CompilerRegistry};
use crate::error::RegistryError;

/// Entry point of a compiler backend module.
pub trait CompilerPlugin: Send + Sync {
    /// Plugin name, unique per host.
    fn name(&self) -> &str;

    /// Register the plugin's compilers.
    fn start(&self, context: &mut PluginContext<'_>) -> Result<(), RegistryError>;

    /// Release plugin resources. Compilers registered through the context are
    /// removed by the host afterwards.
    fn stop(&self, _context: &mut PluginContext<'_>) -> Result<(), RegistryError> {
        Ok(())
    }
}

/// Registration handle passed to a plugin while it starts or stops.
pub struct PluginContext<'a> {
    registry: &'a CompilerRegistry,
    plugin: String,
    registered: Vec<(String, Arc<dyn Compiler>)>,
}

impl<'a> PluginContext<'a> {
    fn new(registry: &'a CompilerRegistry, plugin: &str) -> Self {
        Self {
            registry,
            plugin: plugin.to_string(),
            registered: Vec::new(),
        }
    }

    /// Name of the plugin this context belongs to.
    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    /// Register a compiler under its own name, owned by this plugin.
    pub fn register_compiler(&mut self, compiler: Arc<dyn Compiler>) {
        let name = compiler.name().to_string();
        self.register_compiler_as(name, compiler);
    }

    /// Register a compiler under `name`, owned by this plugin.
    pub fn register_compiler_as(&mut self, name: impl Into<String>, compiler: Arc<dyn Compiler>) {
        let name = name.into();
        self.registry.register_as(name.clone(), Arc::clone(&compiler));
        self.registered.push((name, compiler));
    }

    /// Names registered through this context so far.
    pub fn registered(&self) -> Vec<&str> {
        self.registered.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Remove everything registered through this context that is still ours.
    fn withdraw(&mut self) {
        for (name, compiler) in self.registered.drain(..) {
            if !self.registry.unregister_instance(&name, &compiler) {
                warn!(
                    plugin = %self.plugin,
                    compiler = %name,
                    "Compiler was replaced by another registration, leaving it in place"
                );
            }
        }
    }
}

struct LoadedPlugin {
    plugin: Box<dyn CompilerPlugin>,
    compilers: Vec<(String, Arc<dyn Compiler>)>,
}

/// Loads and unloads compiler plugins against a registry.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use qubit_os_compiler::compiler::{qmi::QmiPlugin, CompilerRegistry, PluginHost};
/// use qubit_os_compiler::config::QmiConfig;
///
/// let host = PluginHost::new(Arc::new(CompilerRegistry::new()));
/// host.load(Box::new(QmiPlugin::new(QmiConfig::default())))?;
/// let compiler = host.registry().get("qmi")?;
///
/// host.unload("qmi")?; // removes the "qmi" compiler again
/// ```
pub struct PluginHost {
    registry: Arc<CompilerRegistry>,
    loaded: Mutex<HashMap<String, LoadedPlugin>>,
}

impl PluginHost {
    pub fn new(registry: Arc<CompilerRegistry>) -> Self {
        Self {
            registry,
            loaded: Mutex::new(HashMap::new()),
        }
    }

    /// Registry the host's plugins register into.
    pub fn registry(&self) -> &Arc<CompilerRegistry> {
        &self.registry
    }

    /// Start a plugin.
    ///
    /// If the plugin fails to start, the compilers it registered before
    /// failing are removed again.
    pub fn load(&self, plugin: Box<dyn CompilerPlugin>) -> Result<(), RegistryError> {
        let name = plugin.name().to_string();
        let mut loaded = self.loaded.lock();
        if loaded.contains_key(&name) {
            return Err(RegistryError::PluginAlreadyLoaded(name));
        }

        let mut context = PluginContext::new(&self.registry, &name);
        if let Err(e) = plugin.start(&mut context) {
            error!(plugin = %name, error = %e, "Plugin failed to start");
            context.withdraw();
            return Err(e);
        }

        info!(plugin = %name, compilers = ?context.registered(), "Loaded plugin");
        let compilers = std::mem::take(&mut context.registered);
        loaded.insert(name, LoadedPlugin { plugin, compilers });
        Ok(())
    }

    /// Stop a plugin and remove the compilers it registered.
    ///
    /// The compilers are removed even if the plugin's `stop` fails; the
    /// failure is returned afterwards.
    pub fn unload(&self, name: &str) -> Result<(), RegistryError> {
        let entry = self
            .loaded
            .lock()
            .remove(name)
            .ok_or_else(|| RegistryError::PluginNotLoaded(name.to_string()))?;

        let mut context = PluginContext::new(&self.registry, name);
        context.registered = entry.compilers;
        let stopped = entry.plugin.stop(&mut context);
        if let Err(e) = &stopped {
            error!(plugin = %name, error = %e, "Plugin failed to stop cleanly");
        }
        context.withdraw();

        info!(plugin = %name, "Unloaded plugin");
        stopped
    }

    /// Unload every plugin, in name order.
    pub fn unload_all(&self) {
        for name in self.loaded() {
            let _ = self.unload(&name);
        }
    }

    /// Loaded plugin names, sorted.
    pub fn loaded(&self) -> Vec<String> {
        let mut names: Vec<String> = self.loaded.lock().keys().cloned().collect();
        names.sort();
        names
    }

    /// Whether a plugin owns the compiler currently registered under `name`.
    pub fn owner_of(&self, compiler: &str) -> Option<String> {
        let current = self.registry.get(compiler).ok()?;
        self.loaded
            .lock()
            .iter()
            .find(|(_, entry)| {
                entry
                    .compilers
                    .iter()
                    .any(|(name, c)| name == compiler && same_compiler(c, &current))
            })
            .map(|(plugin, _)| plugin.clone())
    }
}
