// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Quantum instructions.
//!
//! This module provides the [`Instruction`] trait, the [`InstructionRegistry`]
//! that creates instructions by name, and the built-in instruction types:
//!
//! - [`gates`]: gate-model instructions (`H`, `X`, `Y`, `CNOT`, `Rz`, ...)
//! - [`annealing`]: annealer instructions (`Bias`, `Coupler`)
//!
//! Each module exports a `register` function that installs its factories into
//! a registry. Adding a new instruction type means adding such a module; the
//! registry and the compilers do not change.

use std::fmt;
use std::fmt::Write as _;

use crate::error::InstructionError;

/// Defines a concrete instruction type with fixed name, arity and parameter
/// count, plus its registry factory.
macro_rules! instruction_type {
    (
        $(#[$meta:meta])*
        $ty:ident, $name:literal, qubits = $arity:literal, params = $nparams:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $ty {
            bits: Vec<usize>,
            params: Vec<f64>,
        }

        impl $ty {
            /// Registry name of this instruction type.
            pub const NAME: &'static str = $name;
            /// Number of qubit operands.
            pub const ARITY: usize = $arity;
            /// Number of scalar parameters.
            pub const NUM_PARAMS: usize = $nparams;

            /// Construct with parameters defaulting to zero.
            pub fn new(bits: impl Into<Vec<usize>>) -> Result<Self, $crate::error::InstructionError> {
                Self::with_params(bits, vec![0.0; Self::NUM_PARAMS])
            }

            /// Construct with explicit parameters.
            pub fn with_params(
                bits: impl Into<Vec<usize>>,
                params: impl Into<Vec<f64>>,
            ) -> Result<Self, $crate::error::InstructionError> {
                let bits = bits.into();
                let params = params.into();
                $crate::instruction::check_operands(Self::NAME, Self::ARITY, &bits)?;
                $crate::instruction::check_params(Self::NAME, Self::NUM_PARAMS, &params)?;
                Ok(Self { bits, params })
            }

            /// Registry factory. An empty parameter list selects the defaults.
            pub fn create(
                bits: &[usize],
                params: &[f64],
            ) -> Result<Box<dyn $crate::instruction::Instruction>, $crate::error::InstructionError> {
                let instruction = if params.is_empty() {
                    Self::new(bits)?
                } else {
                    Self::with_params(bits, params)?
                };
                Ok(Box::new(instruction))
            }
        }

        impl $crate::instruction::Instruction for $ty {
            fn name(&self) -> &str {
                Self::NAME
            }

            fn bits(&self) -> &[usize] {
                &self.bits
            }

            fn params(&self) -> &[f64] {
                &self.params
            }

            fn set_bits(&mut self, bits: Vec<usize>) -> Result<(), $crate::error::InstructionError> {
                $crate::instruction::check_operands(Self::NAME, Self::ARITY, &bits)?;
                self.bits = bits;
                Ok(())
            }

            fn clone_box(&self) -> Box<dyn $crate::instruction::Instruction> {
                Box::new(self.clone())
            }
        }
    };
}

pub mod annealing;
pub mod gates;
pub mod registry;

pub use registry::{InstructionFactory, InstructionRegistry, RegistrationPolicy};

/// One instruction application: a named operation on an ordered list of qubits.
pub trait Instruction: fmt::Debug + Send + Sync {
    /// Instruction type name (e.g. `"Y"`).
    fn name(&self) -> &str;

    /// Qubit operands, in construction order.
    fn bits(&self) -> &[usize];

    /// Scalar parameters. Empty for unparametrized instructions.
    fn params(&self) -> &[f64] {
        &[]
    }

    /// Remap the qubit operands. The arity and distinctness rules of
    /// construction apply.
    fn set_bits(&mut self, bits: Vec<usize>) -> Result<(), InstructionError>;

    /// Render against a register, e.g. `"Y qreg0"` or `"Rz(0.5) qreg1"`.
    fn render(&self, register: &str) -> String {
        let mut out = self.name().to_string();
        let params = self.params();
        if !params.is_empty() {
            let params: Vec<String> = params.iter().map(|p| p.to_string()).collect();
            let _ = write!(out, "({})", params.join(", "));
        }
        for bit in self.bits() {
            let _ = write!(out, " {}{}", register, bit);
        }
        out
    }

    /// Clone into a new box.
    fn clone_box(&self) -> Box<dyn Instruction>;
}

impl Clone for Box<dyn Instruction> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Check operand count and distinctness for an instruction type.
pub(crate) fn check_operands(
    name: &str,
    arity: usize,
    bits: &[usize],
) -> Result<(), InstructionError> {
    if bits.len() != arity {
        return Err(InstructionError::InvalidArity {
            name: name.to_string(),
            expected: arity,
            actual: bits.len(),
        });
    }
    for (i, bit) in bits.iter().enumerate() {
        if bits[..i].contains(bit) {
            return Err(InstructionError::DuplicateOperand {
                name: name.to_string(),
                bit: *bit,
            });
        }
    }
    Ok(())
}

/// Check parameter count for an instruction type.
pub(crate) fn check_params(
    name: &str,
    expected: usize,
    params: &[f64],
) -> Result<(), InstructionError> {
    if params.len() != expected {
        return Err(InstructionError::InvalidParameters {
            name: name.to_string(),
            expected,
            actual: params.len(),
        });
    }
    Ok(())
}

/// Install every built-in instruction type into `registry`.
pub fn register_builtins(registry: &InstructionRegistry) -> Result<(), InstructionError> {
    gates::register(registry)?;
    annealing::register(registry)?;
    Ok(())
}
