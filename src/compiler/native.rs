// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Native gates of a gate-model target.
//!
//! A target has a finite set of physically implemented gates (its native
//! basis). Lowering maps each IR instruction to a short sequence of these,
//! each carrying an estimated duration and infidelity so the sequence cost
//! can be reported alongside the QMI text.

use std::fmt;

/// A native gate that a target can physically execute.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeGate {
    /// Gate name (e.g., "cz", "rx", "measure").
    pub name: &'static str,

    /// Target qubit indices.
    pub qubits: Vec<usize>,

    /// Gate parameters (e.g., rotation angle for rx, rz).
    pub parameters: Vec<f64>,

    /// Estimated gate duration in nanoseconds.
    pub duration_ns: f64,

    /// Estimated gate infidelity (1 - fidelity).
    pub infidelity: f64,
}

impl fmt::Display for NativeGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.parameters.is_empty() {
            write!(f, "{}(q{})", self.name, format_qubits(&self.qubits))
        } else {
            let params: Vec<String> =
                self.parameters.iter().map(|p| format!("{:.6}", p)).collect();
            write!(
                f,
                "{}({}) q{}",
                self.name,
                params.join(", "),
                format_qubits(&self.qubits)
            )
        }
    }
}

fn format_qubits(qubits: &[usize]) -> String {
    qubits
        .iter()
        .map(|q| q.to_string())
        .collect::<Vec<_>>()
        .join(", q")
}

/// Result of lowering a program to native gates.
#[derive(Debug, Clone)]
pub struct CompiledSequence {
    /// Ordered sequence of native gates.
    pub gates: Vec<NativeGate>,

    /// Total estimated duration in nanoseconds, assuming serial execution.
    pub total_duration_ns: f64,

    /// Total estimated infidelity (sum of gate infidelities).
    pub total_infidelity: f64,

    /// Compiler name that produced this sequence.
    pub backend: String,
}

impl CompiledSequence {
    pub fn new(backend: impl Into<String>, gates: Vec<NativeGate>) -> Self {
        let total_duration_ns = gates.iter().map(|g| g.duration_ns).sum();
        let total_infidelity = gates.iter().map(|g| g.infidelity).sum();
        Self {
            gates,
            total_duration_ns,
            total_infidelity,
            backend: backend.into(),
        }
    }

    /// Estimated fidelity of the full sequence.
    pub fn estimated_fidelity(&self) -> f64 {
        // Product of individual gate fidelities
        self.gates.iter().map(|g| 1.0 - g.infidelity).product()
    }

    /// One QMI line per native gate.
    pub fn lines(&self) -> Vec<String> {
        self.gates.iter().map(|g| g.to_string()).collect()
    }
}
