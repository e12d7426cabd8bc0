// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Gate-model instructions.

use super::InstructionRegistry;
use crate::error::InstructionError;

instruction_type!(
    /// Hadamard gate.
    H, "H", qubits = 1, params = 0
);
instruction_type!(
    /// Pauli-X gate.
    X, "X", qubits = 1, params = 0
);
instruction_type!(
    /// Pauli-Y gate.
    Y, "Y", qubits = 1, params = 0
);
instruction_type!(
    /// Pauli-Z gate.
    Z, "Z", qubits = 1, params = 0
);
instruction_type!(
    /// Phase gate (sqrt of Z).
    S, "S", qubits = 1, params = 0
);
instruction_type!(
    /// T gate (fourth root of Z).
    T, "T", qubits = 1, params = 0
);
instruction_type!(
    /// Rotation about X by `params[0]` radians.
    Rx, "Rx", qubits = 1, params = 1
);
instruction_type!(
    /// Rotation about Y by `params[0]` radians.
    Ry, "Ry", qubits = 1, params = 1
);
instruction_type!(
    /// Rotation about Z by `params[0]` radians.
    Rz, "Rz", qubits = 1, params = 1
);
instruction_type!(
    /// Controlled-NOT; `bits[0]` is the control, `bits[1]` the target.
    Cnot, "CNOT", qubits = 2, params = 0
);
instruction_type!(
    /// Controlled-Z.
    Cz, "CZ", qubits = 2, params = 0
);
instruction_type!(
    /// Swap two qubits.
    Swap, "Swap", qubits = 2, params = 0
);
instruction_type!(
    /// Computational-basis measurement.
    Measure, "Measure", qubits = 1, params = 0
);

macro_rules! single_qubit_constructors {
    ($($ty:ident),*) => {
        $(
            impl $ty {
                /// Apply to a single qubit.
                pub fn on(qubit: usize) -> Self {
                    Self {
                        bits: vec![qubit],
                        params: Vec::new(),
                    }
                }
            }
        )*
    };
}

macro_rules! rotation_constructors {
    ($($ty:ident),*) => {
        $(
            impl $ty {
                /// Rotate a single qubit by `angle` radians.
                pub fn on(qubit: usize, angle: f64) -> Self {
                    Self {
                        bits: vec![qubit],
                        params: vec![angle],
                    }
                }

                /// Rotation angle in radians.
                pub fn angle(&self) -> f64 {
                    self.params[0]
                }
            }
        )*
    };
}

single_qubit_constructors!(H, X, Y, Z, S, T, Measure);
rotation_constructors!(Rx, Ry, Rz);

/// Install the gate-model instruction factories.
pub fn register(registry: &InstructionRegistry) -> Result<(), InstructionError> {
    registry.register_creator(H::NAME, H::create)?;
    registry.register_creator(X::NAME, X::create)?;
    registry.register_creator(Y::NAME, Y::create)?;
    registry.register_creator(Z::NAME, Z::create)?;
    registry.register_creator(S::NAME, S::create)?;
    registry.register_creator(T::NAME, T::create)?;
    registry.register_creator(Rx::NAME, Rx::create)?;
    registry.register_creator(Ry::NAME, Ry::create)?;
    registry.register_creator(Rz::NAME, Rz::create)?;
    registry.register_creator(Cnot::NAME, Cnot::create)?;
    registry.register_creator(Cz::NAME, Cz::create)?;
    registry.register_creator(Swap::NAME, Swap::create)?;
    registry.register_creator(Measure::NAME, Measure::create)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::Instruction;

    #[test]
    fn test_y_creation() {
        let y = Y::on(0);
        assert_eq!(y.render("qreg"), "Y qreg0");
        assert_eq!(y.bits().len(), 1);
        assert_eq!(y.bits()[0], 0);
        assert_eq!(y.name(), "Y");

        let y2 = Y::on(44);
        assert_eq!(y2.render("qreg"), "Y qreg44");
        assert_eq!(y2.bits(), &[44]);
        assert_eq!(y2.name(), "Y");
    }

    #[test]
    fn test_exact_arity_succeeds_and_keeps_order() {
        let cnot = Cnot::new([5, 2]).unwrap();
        assert_eq!(cnot.bits(), &[5, 2]);
        let swap = Swap::new(vec![1, 0]).unwrap();
        assert_eq!(swap.bits(), &[1, 0]);
        let h = H::new([3]).unwrap();
        assert_eq!(h.bits(), &[3]);
    }

    #[test]
    fn test_wrong_arity_fails() {
        for bits in [Vec::<usize>::new(), vec![0, 1]] {
            let err = Y::new(bits.clone()).unwrap_err();
            assert_eq!(
                err,
                InstructionError::InvalidArity {
                    name: "Y".into(),
                    expected: 1,
                    actual: bits.len()
                }
            );
        }
        for bits in [Vec::<usize>::new(), vec![0], vec![0, 1, 2]] {
            assert!(matches!(
                Cnot::new(bits),
                Err(InstructionError::InvalidArity { expected: 2, .. })
            ));
        }
    }

    #[test]
    fn test_two_qubit_gate_rejects_repeated_operand() {
        assert!(matches!(
            Cz::new([1, 1]),
            Err(InstructionError::DuplicateOperand { bit: 1, .. })
        ));
    }

    #[test]
    fn test_multi_bit_render() {
        assert_eq!(Cnot::new([0, 1]).unwrap().render("q"), "CNOT q0 q1");
    }

    #[test]
    fn test_parametrized_render() {
        assert_eq!(Rz::on(1, 0.5).render("qreg"), "Rz(0.5) qreg1");
        assert_eq!(Rx::new([2]).unwrap().render("qreg"), "Rx(0) qreg2");
    }

    #[test]
    fn test_rotation_params() {
        let rz = Rz::with_params([0], [1.25]).unwrap();
        assert_eq!(rz.angle(), 1.25);
        assert_eq!(rz.params(), &[1.25]);
        assert!(matches!(
            Rz::with_params([0], [1.0, 2.0]),
            Err(InstructionError::InvalidParameters { expected: 1, actual: 2, .. })
        ));
        assert!(Y::on(0).params().is_empty());
    }

    #[test]
    fn test_set_bits_remaps() {
        let mut cnot = Cnot::new([0, 1]).unwrap();
        cnot.set_bits(vec![4, 3]).unwrap();
        assert_eq!(cnot.bits(), &[4, 3]);
        assert!(cnot.set_bits(vec![4]).is_err());
        assert!(cnot.set_bits(vec![2, 2]).is_err());
        assert_eq!(cnot.bits(), &[4, 3]);
    }

    #[test]
    fn test_factory_defaults_params() {
        let rz = Rz::create(&[0], &[]).unwrap();
        assert_eq!(rz.params(), &[0.0]);
        let rz = Rz::create(&[0], &[0.25]).unwrap();
        assert_eq!(rz.params(), &[0.25]);
        assert!(X::create(&[0], &[1.0]).is_err());
    }
}
