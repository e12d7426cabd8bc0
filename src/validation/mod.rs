// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Input validation for programs handed to compilers.

use crate::config::ResourceLimits;
use crate::error::{CompileError, ValidationError};
use crate::program::Program;

/// Validate a register name.
///
/// Names start with an ASCII letter or `_` and continue with ASCII
/// alphanumerics or `_`.
pub fn validate_register_name(name: &str) -> Result<(), ValidationError> {
    let mut chars = name.chars();
    match chars.next() {
        None => {
            return Err(ValidationError::Field {
                field: "register".into(),
                message: "must not be empty".into(),
            })
        }
        Some(c) if !(c.is_ascii_alphabetic() || c == '_') => {
            return Err(ValidationError::Field {
                field: "register".into(),
                message: format!("'{}' must start with a letter or '_'", name),
            })
        }
        Some(_) => {}
    }

    if let Some(c) = chars.find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
        return Err(ValidationError::Field {
            field: "register".into(),
            message: format!("'{}' contains invalid character '{}'", name, c),
        });
    }

    Ok(())
}

/// Validate program-wide limits before lowering.
pub fn validate_program(program: &Program, limits: &ResourceLimits) -> Result<(), ValidationError> {
    validate_register_name(program.register())?;

    if program.len() > limits.max_instructions {
        return Err(ValidationError::ResourceLimit {
            resource: "instructions".into(),
            limit: limits.max_instructions as u64,
            requested: program.len() as u64,
        });
    }

    let num_qubits = program.num_qubits();
    if num_qubits > limits.max_qubits {
        return Err(ValidationError::ResourceLimit {
            resource: "qubits".into(),
            limit: limits.max_qubits as u64,
            requested: num_qubits as u64,
        });
    }

    Ok(())
}

/// Check every operand of the instruction at `index` against a backend's
/// qubit count.
pub fn validate_operands(index: usize, bits: &[usize], num_qubits: usize) -> Result<(), CompileError> {
    match bits.iter().find(|&&q| q >= num_qubits) {
        Some(&qubit) => Err(CompileError::QubitOutOfRange {
            index,
            qubit,
            limit: num_qubits,
        }),
        None => Ok(()),
    }
}
