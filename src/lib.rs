// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! QubitOS Compiler
//!
//! This crate provides a pluggable compilation framework for QubitOS:
//! quantum programs are built from instructions created by name, and lowered
//! to a target's instruction format by compilers resolved by name at run time.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           qubit-os-qc (CLI)              │
//! ├──────────────────┬──────────────────────┤
//! │ Program parser   │   Plugin host        │
//! ├──────────────────┼──────────────────────┤
//! │ Instruction      │   Compiler           │
//! │ Registry         │   Registry           │
//! ├──────────────────┼──────────────────────┤
//! │ Gates, Annealing │ QMI, Annealer        │
//! └──────────────────┴──────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`instruction`]: Instruction trait, registry and built-in instruction types
//! - [`program`]: Instruction sequences and the program text format
//! - [`compiler`]: Compiler trait, registry, plugins and built-in backends
//! - [`config`]: Configuration management
//! - [`validation`]: Input validation utilities
//! - [`error`]: Error types

pub mod compiler;
pub mod config;
pub mod error;
pub mod instruction;
pub mod program;
pub mod validation;

mod snapshot;

pub use compiler::{CompiledProgram, Compiler, CompilerRegistry, PluginHost};
pub use config::Config;
pub use error::{Error, Result};
pub use instruction::{Instruction, InstructionRegistry};
pub use program::{parse_program, Program};

#[cfg(test)]
pub mod test_utils;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
