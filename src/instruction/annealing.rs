// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Annealer instructions: qubit biases and coupler strengths of an Ising
//! problem.

use super::InstructionRegistry;
use crate::error::InstructionError;

instruction_type!(
    /// Linear bias `params[0]` on one qubit.
    Bias, "Bias", qubits = 1, params = 1
);
instruction_type!(
    /// Coupling strength `params[0]` between two qubits.
    Coupler, "Coupler", qubits = 2, params = 1
);

impl Bias {
    pub fn on(qubit: usize, weight: f64) -> Self {
        Self {
            bits: vec![qubit],
            params: vec![weight],
        }
    }

    pub fn weight(&self) -> f64 {
        self.params[0]
    }
}

impl Coupler {
    pub fn between(a: usize, b: usize, weight: f64) -> Result<Self, InstructionError> {
        Self::with_params([a, b], [weight])
    }

    pub fn weight(&self) -> f64 {
        self.params[0]
    }
}

/// Install the annealer instruction factories.
pub fn register(registry: &InstructionRegistry) -> Result<(), InstructionError> {
    registry.register_creator(Bias::NAME, Bias::create)?;
    registry.register_creator(Coupler::NAME, Coupler::create)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::Instruction;

    #[test]
    fn test_bias_render() {
        assert_eq!(Bias::on(3, -0.5).render("q"), "Bias(-0.5) q3");
    }

    #[test]
    fn test_coupler_render() {
        let c = Coupler::between(0, 4, 1.5).unwrap();
        assert_eq!(c.render("q"), "Coupler(1.5) q0 q4");
        assert_eq!(c.weight(), 1.5);
    }

    #[test]
    fn test_coupler_rejects_self_coupling() {
        assert!(matches!(
            Coupler::between(2, 2, 1.0),
            Err(InstructionError::DuplicateOperand { bit: 2, .. })
        ));
    }
}
