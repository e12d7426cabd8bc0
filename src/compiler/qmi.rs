// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Reference gate-model QMI backend.
//!
//! The native basis is `rx`, `ry`, `rz`, `cz` and `measure`. `rz` is a
//! virtual frame update with no duration or error. Every supported IR
//! instruction lowers to a fixed sequence in that basis:
//!
//! | IR          | Native sequence                          |
//! |-------------|------------------------------------------|
//! | `X`/`Y`/`Z` | `rx(π)` / `ry(π)` / `rz(π)`              |
//! | `H`         | `ry(π/2)`, `rx(π)`                       |
//! | `S`/`T`     | `rz(π/2)` / `rz(π/4)`                    |
//! | `Rx/Ry/Rz`  | the same rotation                        |
//! | `CZ`        | `cz`                                     |
//! | `CNOT c,t`  | `ry(-π/2) t`, `cz(c, t)`, `ry(π/2) t`    |
//! | `Swap a,b`  | three CNOTs, alternating direction       |
//! | `Measure`   | `measure`                                |
//!
//! Any other instruction name is unsupported.

use std::collections::HashMap;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};
use std::sync::Arc;

use tracing::debug;

use super::native::{CompiledSequence, NativeGate};
use super::{CompiledProgram, Compiler, CompilerPlugin, PluginContext};
use crate::config::{QmiConfig, ResourceLimits};
use crate::error::{CompileError, RegistryError};
use crate::instruction::gates::{Cnot, Cz, Measure, Rx, Ry, Rz, Swap, H, S, T, X, Y, Z};
use crate::program::Program;
use crate::validation::{validate_operands, validate_program};

/// Registry name of the gate-model compiler.
pub const COMPILER_NAME: &str = "qmi";

/// Per-gate cost model.
#[derive(Debug, Clone, Copy)]
struct GateCosts {
    single_qubit_ns: f64,
    two_qubit_ns: f64,
    measure_ns: f64,
    single_qubit_infidelity: f64,
    two_qubit_infidelity: f64,
    measure_infidelity: f64,
}

impl GateCosts {
    fn from_config(config: &QmiConfig) -> Self {
        Self {
            single_qubit_ns: config.single_qubit_duration_ns,
            two_qubit_ns: config.two_qubit_duration_ns,
            measure_ns: config.measure_duration_ns,
            single_qubit_infidelity: config.single_qubit_infidelity,
            two_qubit_infidelity: config.two_qubit_infidelity,
            measure_infidelity: config.measure_infidelity,
        }
    }

    fn rotation(&self, name: &'static str, qubit: usize, angle: f64) -> NativeGate {
        NativeGate {
            name,
            qubits: vec![qubit],
            parameters: vec![angle],
            duration_ns: self.single_qubit_ns,
            infidelity: self.single_qubit_infidelity,
        }
    }

    fn rx(&self, qubit: usize, angle: f64) -> NativeGate {
        self.rotation("rx", qubit, angle)
    }

    fn ry(&self, qubit: usize, angle: f64) -> NativeGate {
        self.rotation("ry", qubit, angle)
    }

    fn rz(&self, qubit: usize, angle: f64) -> NativeGate {
        // Virtual Z: frame update only
        NativeGate {
            duration_ns: 0.0,
            infidelity: 0.0,
            ..self.rotation("rz", qubit, angle)
        }
    }

    fn cz(&self, a: usize, b: usize) -> NativeGate {
        NativeGate {
            name: "cz",
            qubits: vec![a, b],
            parameters: Vec::new(),
            duration_ns: self.two_qubit_ns,
            infidelity: self.two_qubit_infidelity,
        }
    }

    fn measure(&self, qubit: usize) -> NativeGate {
        NativeGate {
            name: "measure",
            qubits: vec![qubit],
            parameters: Vec::new(),
            duration_ns: self.measure_ns,
            infidelity: self.measure_infidelity,
        }
    }

    fn cnot(&self, control: usize, target: usize) -> [NativeGate; 3] {
        [
            self.ry(target, -FRAC_PI_2),
            self.cz(control, target),
            self.ry(target, FRAC_PI_2),
        ]
    }
}

type LowerFn = fn(&[usize], &[f64], &GateCosts) -> Vec<NativeGate>;

/// How one IR instruction name lowers, and the operand shape it expects.
#[derive(Clone, Copy)]
struct Lowering {
    qubits: usize,
    params: usize,
    lower: LowerFn,
}

fn lowering_table() -> HashMap<&'static str, Lowering> {
    fn entry(qubits: usize, params: usize, lower: LowerFn) -> Lowering {
        Lowering {
            qubits,
            params,
            lower,
        }
    }

    HashMap::from([
        (X::NAME, entry(1, 0, |b, _, c| vec![c.rx(b[0], PI)])),
        (Y::NAME, entry(1, 0, |b, _, c| vec![c.ry(b[0], PI)])),
        (Z::NAME, entry(1, 0, |b, _, c| vec![c.rz(b[0], PI)])),
        (
            H::NAME,
            entry(1, 0, |b, _, c| vec![c.ry(b[0], FRAC_PI_2), c.rx(b[0], PI)]),
        ),
        (S::NAME, entry(1, 0, |b, _, c| vec![c.rz(b[0], FRAC_PI_2)])),
        (T::NAME, entry(1, 0, |b, _, c| vec![c.rz(b[0], FRAC_PI_4)])),
        (Rx::NAME, entry(1, 1, |b, p, c| vec![c.rx(b[0], p[0])])),
        (Ry::NAME, entry(1, 1, |b, p, c| vec![c.ry(b[0], p[0])])),
        (Rz::NAME, entry(1, 1, |b, p, c| vec![c.rz(b[0], p[0])])),
        (Cz::NAME, entry(2, 0, |b, _, c| vec![c.cz(b[0], b[1])])),
        (Cnot::NAME, entry(2, 0, |b, _, c| c.cnot(b[0], b[1]).to_vec())),
        (
            Swap::NAME,
            entry(2, 0, |b, _, c| {
                let mut gates = Vec::with_capacity(9);
                gates.extend(c.cnot(b[0], b[1]));
                gates.extend(c.cnot(b[1], b[0]));
                gates.extend(c.cnot(b[0], b[1]));
                gates
            }),
        ),
        (Measure::NAME, entry(1, 0, |b, _, c| vec![c.measure(b[0])])),
    ])
}

/// Gate-model compiler emitting one QMI line per native gate.
pub struct QmiCompiler {
    name: String,
    num_qubits: usize,
    costs: GateCosts,
    limits: ResourceLimits,
    table: HashMap<&'static str, Lowering>,
}

impl QmiCompiler {
    pub fn new(config: &QmiConfig) -> Self {
        Self {
            name: COMPILER_NAME.to_string(),
            num_qubits: config.num_qubits,
            costs: GateCosts::from_config(config),
            limits: ResourceLimits::default(),
            table: lowering_table(),
        }
    }

    /// Replace the program size limits checked before lowering.
    pub fn with_limits(mut self, limits: ResourceLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Number of addressable qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Gates the target physically executes.
    pub fn native_basis(&self) -> Vec<String> {
        ["rx", "ry", "rz", "cz", "measure"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// IR instruction names this compiler lowers, sorted.
    pub fn supported_instructions(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.table.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Lower a program to native gates with cost estimates.
    pub fn lower(&self, program: &Program) -> Result<CompiledSequence, CompileError> {
        validate_program(program, &self.limits)?;

        let mut gates = Vec::with_capacity(program.len());
        for (index, instruction) in program.iter().enumerate() {
            let (bits, params) = (instruction.bits(), instruction.params());
            let lowering = self
                .table
                .get(instruction.name())
                .filter(|l| l.qubits == bits.len() && l.params == params.len())
                .ok_or_else(|| CompileError::UnsupportedInstruction {
                    name: instruction.name().to_string(),
                    index,
                })?;
            validate_operands(index, bits, self.num_qubits)?;
            gates.extend((lowering.lower)(bits, params, &self.costs));
        }

        let sequence = CompiledSequence::new(&self.name, gates);
        debug!(
            compiler = %self.name,
            instructions = program.len(),
            native_gates = sequence.gates.len(),
            duration_ns = sequence.total_duration_ns,
            fidelity = sequence.estimated_fidelity(),
            "Lowered program"
        );
        Ok(sequence)
    }
}

impl Compiler for QmiCompiler {
    fn name(&self) -> &str {
        &self.name
    }

    fn compile(&self, program: &Program) -> Result<CompiledProgram, CompileError> {
        let sequence = self.lower(program)?;
        Ok(CompiledProgram {
            backend: self.name.clone(),
            register: program.register().to_string(),
            lines: sequence.lines(),
        })
    }
}

/// Plugin that registers a [`QmiCompiler`].
pub struct QmiPlugin {
    config: QmiConfig,
    limits: ResourceLimits,
}

impl QmiPlugin {
    pub fn new(config: QmiConfig) -> Self {
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

impl CompilerPlugin for QmiPlugin {
    fn name(&self) -> &str {
        COMPILER_NAME
    }

    fn start(&self, context: &mut PluginContext<'_>) -> Result<(), RegistryError> {
        let compiler = QmiCompiler::new(&self.config).with_limits(self.limits.clone());
        context.register_compiler(Arc::new(compiler));
        Ok(())
    }
}
