// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared test utilities for compiler and registry tests.

use std::sync::Arc;

use crate::compiler::{CompiledProgram, Compiler, CompilerPlugin, PluginContext};
use crate::error::{CompileError, InstructionError, RegistryError};
use crate::instruction::Instruction;
use crate::program::Program;

/// Mock compiler that echoes each instruction's rendering as its output line.
pub struct MockCompiler {
    pub name: String,
}

impl MockCompiler {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    pub fn shared(name: &str) -> Arc<dyn Compiler> {
        Arc::new(Self::new(name))
    }
}

impl Compiler for MockCompiler {
    fn name(&self) -> &str {
        &self.name
    }

    fn compile(&self, program: &Program) -> Result<CompiledProgram, CompileError> {
        Ok(CompiledProgram {
            backend: self.name.clone(),
            register: program.register().to_string(),
            lines: program.render(),
        })
    }
}

/// Mock compiler that rejects the first instruction of every program.
pub struct FailingCompiler {
    pub name: String,
}

impl FailingCompiler {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl Compiler for FailingCompiler {
    fn name(&self) -> &str {
        &self.name
    }

    fn compile(&self, program: &Program) -> Result<CompiledProgram, CompileError> {
        let name = program
            .iter()
            .next()
            .map(|i| i.name().to_string())
            .unwrap_or_default();
        Err(CompileError::UnsupportedInstruction { name, index: 0 })
    }
}

/// Plugin that registers a [`MockCompiler`] under each of its names.
pub struct MockPlugin {
    pub name: String,
    pub compilers: Vec<String>,
}

impl MockPlugin {
    pub fn new(name: &str, compilers: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            compilers: compilers.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl CompilerPlugin for MockPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn start(&self, context: &mut PluginContext<'_>) -> Result<(), RegistryError> {
        for compiler in &self.compilers {
            context.register_compiler(MockCompiler::shared(compiler));
        }
        Ok(())
    }
}

/// Plugin that registers one compiler and then fails to start.
pub struct BrokenPlugin {
    pub name: String,
}

impl BrokenPlugin {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl CompilerPlugin for BrokenPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn start(&self, context: &mut PluginContext<'_>) -> Result<(), RegistryError> {
        context.register_compiler(MockCompiler::shared(&format!("{}-partial", self.name)));
        Err(RegistryError::Plugin {
            plugin: self.name.clone(),
            message: "device not reachable".to_string(),
        })
    }
}

/// Free-form instruction with any name and operand list.
#[derive(Debug, Clone)]
pub struct MockInstruction {
    pub name: String,
    pub bits: Vec<usize>,
}

impl MockInstruction {
    pub fn new(name: &str, bits: Vec<usize>) -> Self {
        Self {
            name: name.to_string(),
            bits,
        }
    }
}

impl Instruction for MockInstruction {
    fn name(&self) -> &str {
        &self.name
    }

    fn bits(&self) -> &[usize] {
        &self.bits
    }

    fn set_bits(&mut self, bits: Vec<usize>) -> Result<(), InstructionError> {
        self.bits = bits;
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn Instruction> {
        Box::new(self.clone())
    }
}
