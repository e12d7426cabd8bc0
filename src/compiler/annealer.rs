// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Annealer QMI backend.
//!
//! Lowers `Bias` and `Coupler` instructions to the sparse coupler-list form
//! an annealer accepts: one `i j weight` line per term, with linear biases
//! written on the diagonal (`i i h`) and couplers with `i < j`.

use std::sync::Arc;

use tracing::debug;

use super::{CompiledProgram, Compiler, CompilerPlugin, PluginContext};
use crate::config::{AnnealerConfig, ResourceLimits};
use crate::error::{CompileError, RegistryError, ValidationError};
use crate::instruction::annealing::{Bias, Coupler};
use crate::instruction::Instruction;
use crate::program::Program;
use crate::validation::{validate_operands, validate_program};

/// Registry name of the annealer compiler.
pub const COMPILER_NAME: &str = "annealer";

pub struct AnnealerCompiler {
    name: String,
    num_qubits: usize,
    limits: ResourceLimits,
}

impl AnnealerCompiler {
    pub fn new(config: &AnnealerConfig) -> Self {
        Self {
            name: COMPILER_NAME.to_string(),
            num_qubits: config.num_qubits,
            limits: ResourceLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: ResourceLimits) -> Self {
        self.limits = limits;
        self
    }

    fn lower(&self, index: usize, instruction: &dyn Instruction) -> Result<String, CompileError> {
        let (bits, params) = (instruction.bits(), instruction.params());
        let (i, j) = match (instruction.name(), bits, params) {
            (Bias::NAME, [q], [_]) => (*q, *q),
            (Coupler::NAME, [a, b], [_]) => ((*a).min(*b), (*a).max(*b)),
            _ => {
                return Err(CompileError::UnsupportedInstruction {
                    name: instruction.name().to_string(),
                    index,
                })
            }
        };
        validate_operands(index, bits, self.num_qubits)?;

        let weight = params[0];
        if !weight.is_finite() {
            return Err(ValidationError::Field {
                field: format!("instructions[{}].weight", index),
                message: format!("must be finite, got {}", weight),
            }
            .into());
        }
        Ok(format!("{} {} {}", i, j, weight))
    }
}

impl Compiler for AnnealerCompiler {
    fn name(&self) -> &str {
        &self.name
    }

    fn compile(&self, program: &Program) -> Result<CompiledProgram, CompileError> {
        validate_program(program, &self.limits)?;

        let lines = program
            .iter()
            .enumerate()
            .map(|(index, instruction)| self.lower(index, instruction))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(compiler = %self.name, terms = lines.len(), "Lowered program");
        Ok(CompiledProgram {
            backend: self.name.clone(),
            register: program.register().to_string(),
            lines,
        })
    }
}

/// Plugin that registers an [`AnnealerCompiler`].
pub struct AnnealerPlugin {
    config: AnnealerConfig,
    limits: ResourceLimits,
}

impl AnnealerPlugin {
    pub fn new(config: AnnealerConfig) -> Self {
        Self {
            config,
            limits: ResourceLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: ResourceLimits) -> Self {
        self.limits = limits;
        self
    }
}

impl CompilerPlugin for AnnealerPlugin {
    fn name(&self) -> &str {
        COMPILER_NAME
    }

    fn start(&self, context: &mut PluginContext<'_>) -> Result<(), RegistryError> {
        let compiler = AnnealerCompiler::new(&self.config).with_limits(self.limits.clone());
        context.register_compiler(Arc::new(compiler));
        Ok(())
    }
}
