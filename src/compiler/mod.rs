// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Compilers and compiler plugins.
//!
//! This module provides the [`Compiler`] trait, the [`CompilerRegistry`]
//! that resolves compilers by name at run time, the [`PluginHost`] that ties
//! registrations to plugin lifetimes, and the built-in backends:
//!
//! - [`qmi::QmiCompiler`]: gate-model programs to native QMI lines
//! - [`annealer::AnnealerCompiler`]: bias/coupler programs to coupler terms

pub mod annealer;
pub mod native;
pub mod plugin;
pub mod qmi;
pub mod registry;

pub use plugin::{CompilerPlugin, PluginContext, PluginHost};
pub use registry::CompilerRegistry;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{CompileError, RegistryError};
use crate::program::Program;

/// Output of a compiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledProgram {
    /// Name of the compiler that produced this output
    pub backend: String,

    /// Register of the source program
    pub register: String,

    /// Target instruction lines, in program order
    pub lines: Vec<String>,
}

impl CompiledProgram {
    /// Serialized target text: lines joined by `'\n'`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for CompiledProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// The trait that all compilers must implement.
///
/// Compilation is a deterministic function of the program and the compiler's
/// configuration. The first error aborts and no partial output is returned.
pub trait Compiler: Send + Sync {
    /// Get the compiler name.
    fn name(&self) -> &str;

    /// Lower a program to the target format.
    fn compile(&self, program: &Program) -> Result<CompiledProgram, CompileError>;
}

/// Load the built-in backend plugins enabled in `config` and apply the
/// configured default compiler.
pub fn load_builtin_plugins(host: &PluginHost, config: &Config) -> Result<(), RegistryError> {
    let compilers = &config.compilers;
    if compilers.qmi.enabled {
        let plugin = qmi::QmiPlugin::new(compilers.qmi.clone()).with_limits(config.limits.clone());
        host.load(Box::new(plugin))?;
    }
    if compilers.annealer.enabled {
        let plugin = annealer::AnnealerPlugin::new(compilers.annealer.clone())
            .with_limits(config.limits.clone());
        host.load(Box::new(plugin))?;
    }
    if let Some(name) = &compilers.default {
        host.registry().set_default(name)?;
    }
    Ok(())
}
