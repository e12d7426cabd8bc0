// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for the compiler framework.

use thiserror::Error;

/// Result type alias for compiler framework operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
    /// Instruction construction or registry error
    #[error("Instruction error: {0}")]
    Instruction(#[from] InstructionError),
    /// Compiler registry or plugin error
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
    /// Backend compilation error
    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),
    /// Validation error
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    /// Program text could not be parsed
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

/// Errors raised while constructing or looking up instructions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InstructionError {
    /// No factory registered under this name
    #[error("Unknown instruction: {0}")]
    Unknown(String),
    /// Wrong number of operands for the instruction type
    #[error("Instruction {name} expects {expected} operand(s), got {actual}")]
    InvalidArity {
        name: String,
        expected: usize,
        actual: usize,
    },
    /// Wrong number of parameters for the instruction type
    #[error("Instruction {name} expects {expected} parameter(s), got {actual}")]
    InvalidParameters {
        name: String,
        expected: usize,
        actual: usize,
    },
    /// The same qubit was given for two distinct operands
    #[error("Instruction {name} uses qubit {bit} more than once")]
    DuplicateOperand { name: String, bit: usize },
    /// Duplicate registration rejected by a strict registry
    #[error("Instruction already registered: {0}")]
    AlreadyRegistered(String),
}

/// Errors raised by a backend while lowering a program.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    /// The backend has no lowering for this instruction
    #[error("Unsupported instruction {name} at index {index}")]
    UnsupportedInstruction { name: String, index: usize },
    /// An operand is outside the backend's addressable qubits
    #[error("Instruction at index {index} addresses qubit {qubit}, backend has {limit} qubit(s)")]
    QubitOutOfRange {
        index: usize,
        qubit: usize,
        limit: usize,
    },
    /// Program-level validation failed
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl CompileError {
    /// Index of the offending instruction, if the error is tied to one.
    pub fn instruction_index(&self) -> Option<usize> {
        match self {
            CompileError::UnsupportedInstruction { index, .. }
            | CompileError::QubitOutOfRange { index, .. } => Some(*index),
            CompileError::Validation(_) => None,
        }
    }
}

/// Compiler registry and plugin host errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    /// No compiler registered under this name
    #[error("Unknown compiler: {0}")]
    UnknownCompiler(String),
    /// A plugin with this name is already loaded
    #[error("Plugin already loaded: {0}")]
    PluginAlreadyLoaded(String),
    /// No plugin with this name is loaded
    #[error("Plugin not loaded: {0}")]
    PluginNotLoaded(String),
    /// A plugin failed to start or stop
    #[error("Plugin {plugin} failed: {message}")]
    Plugin { plugin: String, message: String },
}

/// Validation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Field validation failed
    #[error("Field '{field}': {message}")]
    Field { field: String, message: String },
    /// Resource limit exceeded
    #[error("Resource limit exceeded for {resource}: limit={limit}, requested={requested}")]
    ResourceLimit {
        resource: String,
        limit: u64,
        requested: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    // =========================================================================
    // Display
    // =========================================================================

    #[test]
    fn test_error_display_config() {
        let e = Error::Config("no compilers".into());
        assert_eq!(e.to_string(), "Configuration error: no compilers");
    }

    #[test]
    fn test_error_display_parse() {
        let e = Error::Parse {
            line: 3,
            message: "missing operand".into(),
        };
        assert_eq!(e.to_string(), "Parse error at line 3: missing operand");
    }

    #[test]
    fn test_instruction_error_display_arity() {
        let e = InstructionError::InvalidArity {
            name: "CNOT".into(),
            expected: 2,
            actual: 1,
        };
        assert_eq!(e.to_string(), "Instruction CNOT expects 2 operand(s), got 1");
    }

    #[test]
    fn test_instruction_error_display_unknown() {
        let e = Error::Instruction(InstructionError::Unknown("Foo".into()));
        assert_eq!(e.to_string(), "Instruction error: Unknown instruction: Foo");
    }

    #[test]
    fn test_compile_error_display_unsupported() {
        let e = CompileError::UnsupportedInstruction {
            name: "Bias".into(),
            index: 4,
        };
        assert_eq!(e.to_string(), "Unsupported instruction Bias at index 4");
    }

    #[test]
    fn test_compile_error_display_validation_is_transparent() {
        let e = CompileError::Validation(ValidationError::Field {
            field: "register".into(),
            message: "must not be empty".into(),
        });
        assert_eq!(e.to_string(), "Field 'register': must not be empty");
    }

    #[test]
    fn test_registry_error_display() {
        let e = Error::Registry(RegistryError::UnknownCompiler("ibm".into()));
        assert_eq!(e.to_string(), "Registry error: Unknown compiler: ibm");
    }

    #[test]
    fn test_validation_error_display_resource_limit() {
        let e = ValidationError::ResourceLimit {
            resource: "instructions".into(),
            limit: 10,
            requested: 20,
        };
        assert_eq!(
            e.to_string(),
            "Resource limit exceeded for instructions: limit=10, requested=20"
        );
    }

    // =========================================================================
    // source() and conversions
    // =========================================================================

    #[test]
    fn test_error_source_compile() {
        let e: Error = CompileError::QubitOutOfRange {
            index: 0,
            qubit: 9,
            limit: 2,
        }
        .into();
        assert!(e.source().is_some());
    }

    #[test]
    fn test_error_source_none_for_config() {
        let e = Error::Config("x".into());
        assert!(e.source().is_none());
    }

    #[test]
    fn test_instruction_index() {
        let e = CompileError::UnsupportedInstruction {
            name: "X".into(),
            index: 7,
        };
        assert_eq!(e.instruction_index(), Some(7));

        let e = CompileError::Validation(ValidationError::Field {
            field: "f".into(),
            message: "m".into(),
        });
        assert_eq!(e.instruction_index(), None);
    }

    #[test]
    fn test_from_serde_yaml_error() {
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("{{{{").unwrap_err();
        let e: Error = yaml_err.into();
        assert!(matches!(e, Error::Serialization(_)));
    }

    #[test]
    fn test_from_io_error() {
        let e: Error = std::io::Error::other("disk").into();
        assert!(matches!(e, Error::Io(_)));
    }
}
