// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! IR programs: a register name plus an ordered list of instructions.

mod parser;

pub use parser::parse_program;

use std::fmt;

use crate::error::InstructionError;
use crate::instruction::Instruction;

/// An IR program.
///
/// Instruction order is application order. Compilers borrow the program and
/// never modify it.
#[derive(Debug, Clone)]
pub struct Program {
    /// Name of the qubit register the instructions address
    register: String,

    /// Instructions in application order
    instructions: Vec<Box<dyn Instruction>>,
}

impl Program {
    /// Create an empty program over `register`.
    pub fn new(register: impl Into<String>) -> Self {
        Self {
            register: register.into(),
            instructions: Vec::new(),
        }
    }

    /// Register name.
    pub fn register(&self) -> &str {
        &self.register
    }

    /// Append an instruction.
    pub fn push(&mut self, instruction: impl Instruction + 'static) {
        self.instructions.push(Box::new(instruction));
    }

    /// Append an already boxed instruction, e.g. one from the registry.
    pub fn push_boxed(&mut self, instruction: Box<dyn Instruction>) {
        self.instructions.push(instruction);
    }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, instruction: impl Instruction + 'static) -> Self {
        self.push(instruction);
        self
    }

    /// Instructions in order.
    pub fn instructions(&self) -> &[Box<dyn Instruction>] {
        &self.instructions
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Instruction> {
        self.instructions.iter().map(|i| i.as_ref())
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Number of qubits addressed: one past the highest operand index.
    pub fn num_qubits(&self) -> usize {
        self.iter()
            .flat_map(|i| i.bits().iter().copied())
            .max()
            .map_or(0, |q| q + 1)
    }

    /// Rewrite every operand through `mapping`.
    ///
    /// Stops at the first instruction whose remapped operands are rejected;
    /// earlier instructions keep their new operands.
    pub fn remap_qubits(&mut self, mapping: impl Fn(usize) -> usize) -> Result<(), InstructionError> {
        for instruction in &mut self.instructions {
            let bits = instruction.bits().iter().map(|&b| mapping(b)).collect();
            instruction.set_bits(bits)?;
        }
        Ok(())
    }

    /// Render every instruction, one per line.
    pub fn render(&self) -> Vec<String> {
        self.iter().map(|i| i.render(&self.register)).collect()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.render().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", line)?;
        }
        Ok(())
    }
}
