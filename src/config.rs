// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration management for the compiler.
//!
//! Configuration is loaded from multiple sources with the following priority
//! (later sources override earlier ones):
//!
//! 1. Built-in defaults
//! 2. config.yaml file
//! 3. Environment variables (QUBITOS_*)
//! 4. CLI arguments

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::compiler::{annealer, qmi};
use crate::error::{Error, Result};
use crate::instruction::RegistrationPolicy;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Instruction registry settings
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Compiler configurations
    #[serde(default)]
    pub compilers: CompilersConfig,

    /// Program size limits
    #[serde(default)]
    pub limits: ResourceLimits,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file and environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = Config::default();

        // Load from file if specified
        if let Some(path) = config_path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                config = serde_yaml::from_str(&content)?;
            }
        } else {
            // Try default locations
            for path in &["config.yaml", "config.yml", "/etc/qubitos/compiler.yaml"] {
                let path = Path::new(path);
                if path.exists() {
                    let content = std::fs::read_to_string(path)?;
                    config = serde_yaml::from_str(&content)?;
                    break;
                }
            }
        }

        // Override with environment variables
        config.apply_env_overrides();

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("QUBITOS_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = env::var("QUBITOS_LOG_FORMAT") {
            self.logging.format = val;
        }
        if let Ok(val) = env::var("QUBITOS_STRICT_REGISTRY") {
            self.registry.strict = val.to_lowercase() == "true" || val == "1";
        }
        if let Ok(val) = env::var("QUBITOS_DEFAULT_COMPILER") {
            self.compilers.default = Some(val);
        }
        if let Ok(val) = env::var("QUBITOS_QMI_NUM_QUBITS") {
            if let Ok(n) = val.parse() {
                self.compilers.qmi.num_qubits = n;
            }
        }
        if let Ok(val) = env::var("QUBITOS_ANNEALER_NUM_QUBITS") {
            if let Ok(n) = val.parse() {
                self.compilers.annealer.num_qubits = n;
            }
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        let qmi = &self.compilers.qmi;
        let annealer = &self.compilers.annealer;

        if !qmi.enabled && !annealer.enabled {
            return Err(Error::Config(
                "At least one compiler must be enabled".into(),
            ));
        }
        if qmi.enabled && qmi.num_qubits == 0 {
            return Err(Error::Config("QMI qubit count cannot be 0".into()));
        }
        if annealer.enabled && annealer.num_qubits == 0 {
            return Err(Error::Config("Annealer qubit count cannot be 0".into()));
        }
        for (field, value) in [
            ("single_qubit_duration_ns", qmi.single_qubit_duration_ns),
            ("two_qubit_duration_ns", qmi.two_qubit_duration_ns),
            ("measure_duration_ns", qmi.measure_duration_ns),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::Config(format!(
                    "QMI {} must be a non-negative number",
                    field
                )));
            }
        }
        for (field, value) in [
            ("single_qubit_infidelity", qmi.single_qubit_infidelity),
            ("two_qubit_infidelity", qmi.two_qubit_infidelity),
            ("measure_infidelity", qmi.measure_infidelity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::Config(format!(
                    "QMI {} must be between 0 and 1",
                    field
                )));
            }
        }

        if let Some(name) = &self.compilers.default {
            let enabled = (name == qmi::COMPILER_NAME && qmi.enabled)
                || (name == annealer::COMPILER_NAME && annealer.enabled);
            if !enabled {
                return Err(Error::Config(format!(
                    "Default compiler '{}' is not an enabled compiler",
                    name
                )));
            }
        }

        if !["trace", "debug", "info", "warn", "error"].contains(&self.logging.level.as_str()) {
            return Err(Error::Config(format!(
                "Unknown log level '{}'",
                self.logging.level
            )));
        }
        if !["pretty", "json"].contains(&self.logging.format.as_str()) {
            return Err(Error::Config(format!(
                "Unknown log format '{}'",
                self.logging.format
            )));
        }
        Ok(())
    }
}

/// Instruction registry configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Reject duplicate instruction registrations instead of replacing
    #[serde(default)]
    pub strict: bool,
}

impl RegistryConfig {
    pub fn policy(&self) -> RegistrationPolicy {
        if self.strict {
            RegistrationPolicy::Strict
        } else {
            RegistrationPolicy::Overwrite
        }
    }
}

/// Compiler configurations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilersConfig {
    /// Compiler used when none is named
    #[serde(default = "default_compiler")]
    pub default: Option<String>,

    /// Gate-model QMI compiler
    #[serde(default)]
    pub qmi: QmiConfig,

    /// Annealer QMI compiler
    #[serde(default)]
    pub annealer: AnnealerConfig,
}

impl Default for CompilersConfig {
    fn default() -> Self {
        Self {
            default: default_compiler(),
            qmi: QmiConfig::default(),
            annealer: AnnealerConfig::default(),
        }
    }
}

fn default_compiler() -> Option<String> {
    Some(qmi::COMPILER_NAME.into())
}

/// Gate-model QMI compiler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QmiConfig {
    /// Whether the compiler is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Number of addressable qubits
    #[serde(default = "default_qmi_qubits")]
    pub num_qubits: usize,

    /// Duration of a physical single-qubit rotation
    #[serde(default = "default_single_qubit_duration")]
    pub single_qubit_duration_ns: f64,

    /// Duration of a CZ
    #[serde(default = "default_two_qubit_duration")]
    pub two_qubit_duration_ns: f64,

    /// Duration of a measurement
    #[serde(default = "default_measure_duration")]
    pub measure_duration_ns: f64,

    /// Infidelity of a physical single-qubit rotation
    #[serde(default = "default_single_qubit_infidelity")]
    pub single_qubit_infidelity: f64,

    /// Infidelity of a CZ
    #[serde(default = "default_two_qubit_infidelity")]
    pub two_qubit_infidelity: f64,

    /// Readout infidelity
    #[serde(default = "default_measure_infidelity")]
    pub measure_infidelity: f64,
}

impl Default for QmiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            num_qubits: default_qmi_qubits(),
            single_qubit_duration_ns: default_single_qubit_duration(),
            two_qubit_duration_ns: default_two_qubit_duration(),
            measure_duration_ns: default_measure_duration(),
            single_qubit_infidelity: default_single_qubit_infidelity(),
            two_qubit_infidelity: default_two_qubit_infidelity(),
            measure_infidelity: default_measure_infidelity(),
        }
    }
}

fn default_qmi_qubits() -> usize {
    20
}

fn default_single_qubit_duration() -> f64 {
    20.0
}

fn default_two_qubit_duration() -> f64 {
    60.0
}

fn default_measure_duration() -> f64 {
    400.0
}

fn default_single_qubit_infidelity() -> f64 {
    0.001
}

fn default_two_qubit_infidelity() -> f64 {
    0.01
}

fn default_measure_infidelity() -> f64 {
    0.02
}

/// Annealer QMI compiler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnealerConfig {
    /// Whether the compiler is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Number of addressable qubits
    #[serde(default = "default_annealer_qubits")]
    pub num_qubits: usize,
}

impl Default for AnnealerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            num_qubits: default_annealer_qubits(),
        }
    }
}

fn default_annealer_qubits() -> usize {
    2048
}

fn default_true() -> bool {
    true
}

/// Program size limits applied before lowering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceLimits {
    /// Maximum instructions per program
    #[serde(default = "default_max_instructions")]
    pub max_instructions: usize,

    /// Maximum qubits addressed by a program
    #[serde(default = "default_max_qubits")]
    pub max_qubits: usize,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_instructions: default_max_instructions(),
            max_qubits: default_max_qubits(),
        }
    }
}

fn default_max_instructions() -> usize {
    100_000
}

fn default_max_qubits() -> usize {
    4096
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}
