// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Instruction registry for creating instructions by name.
//!
//! Instruction-defining modules install a factory per type name during
//! startup; everything else creates instructions through
//! [`InstructionRegistry::create`] without knowing the concrete type.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use tracing::{debug, error, info};

use super::{register_builtins, Instruction};
use crate::error::InstructionError;
use crate::snapshot::SnapshotTable;

/// Factory building an instruction from qubit operands and parameters.
pub type InstructionFactory = Arc<
    dyn Fn(&[usize], &[f64]) -> Result<Box<dyn Instruction>, InstructionError> + Send + Sync,
>;

/// How a registry treats a second registration under an existing name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegistrationPolicy {
    /// The newest factory replaces the old one.
    #[default]
    Overwrite,
    /// Duplicate names are rejected.
    Strict,
}

static INSTANCE: LazyLock<InstructionRegistry> = LazyLock::new(InstructionRegistry::with_builtins);

/// Name to factory table for instruction types.
///
/// The registry is thread-safe: registration may race from several
/// initialization contexts, and lookups run against an immutable snapshot.
///
/// # Example
///
/// ```ignore
/// use qubit_os_compiler::instruction::InstructionRegistry;
///
/// let y = InstructionRegistry::instance().create("Y", &[0])?;
/// assert_eq!(y.render("qreg"), "Y qreg0");
/// ```
pub struct InstructionRegistry {
    /// Registered factories
    creators: SnapshotTable<InstructionFactory>,

    /// Duplicate registration policy
    policy: RwLock<RegistrationPolicy>,
}

impl InstructionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            creators: SnapshotTable::new(),
            policy: RwLock::new(RegistrationPolicy::default()),
        }
    }

    /// Create a registry holding the built-in instruction types.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        if let Err(e) = register_builtins(&registry) {
            error!(error = %e, "Failed to register built-in instructions");
        }
        registry
    }

    /// The process-wide registry.
    ///
    /// The first call creates it and registers the built-in instruction
    /// types; later calls return the same registry.
    pub fn instance() -> &'static InstructionRegistry {
        &INSTANCE
    }

    /// Register a factory under `name`.
    ///
    /// Under [`RegistrationPolicy::Overwrite`] an existing factory is
    /// replaced; under [`RegistrationPolicy::Strict`] the call fails with
    /// [`InstructionError::AlreadyRegistered`].
    pub fn register_creator<F>(&self, name: impl Into<String>, factory: F) -> Result<(), InstructionError>
    where
        F: Fn(&[usize], &[f64]) -> Result<Box<dyn Instruction>, InstructionError>
            + Send
            + Sync
            + 'static,
    {
        let name = name.into();
        let factory: InstructionFactory = Arc::new(factory);

        self.creators.update(|creators| {
            if creators.contains_key(&name) {
                if self.policy() == RegistrationPolicy::Strict {
                    return Err(InstructionError::AlreadyRegistered(name.clone()));
                }
                info!(instruction = %name, "Replacing instruction factory");
            } else {
                debug!(instruction = %name, "Registering instruction factory");
            }
            creators.insert(name.clone(), factory);
            Ok(())
        })
    }

    /// Create an instruction with default parameters.
    pub fn create(&self, name: &str, bits: &[usize]) -> Result<Box<dyn Instruction>, InstructionError> {
        self.create_with_params(name, bits, &[])
    }

    /// Create an instruction with explicit parameters.
    pub fn create_with_params(
        &self,
        name: &str,
        bits: &[usize],
        params: &[f64],
    ) -> Result<Box<dyn Instruction>, InstructionError> {
        let factory = self
            .creators
            .get(name)
            .ok_or_else(|| InstructionError::Unknown(name.to_string()))?;
        factory(bits, params)
    }

    /// Current factory table.
    pub fn snapshot(&self) -> Arc<HashMap<String, InstructionFactory>> {
        self.creators.snapshot()
    }

    /// Registered instruction names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.creators.snapshot().keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.creators.snapshot().contains_key(name)
    }

    /// Number of registered instruction types.
    pub fn len(&self) -> usize {
        self.creators.snapshot().len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current duplicate registration policy.
    pub fn policy(&self) -> RegistrationPolicy {
        *self.policy.read()
    }

    /// Change the duplicate registration policy.
    ///
    /// Applies to every registration that has not yet started; the built-in
    /// types of [`instance`](Self::instance) are installed before any caller
    /// can change it.
    pub fn set_policy(&self, policy: RegistrationPolicy) {
        self.creators.locked(|_| *self.policy.write() = policy);
        debug!(?policy, "Instruction registry policy changed");
    }
}

impl Default for InstructionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::gates::{Cnot, Rz, X, Y};

    #[test]
    fn test_instance_has_builtins() {
        let y = InstructionRegistry::instance().create("Y", &[0]).unwrap();
        assert_eq!(y.render("qreg"), "Y qreg0");
        assert_eq!(y.bits().len(), 1);
        assert_eq!(y.bits()[0], 0);
        assert_eq!(y.name(), "Y");
    }

    #[test]
    fn test_instance_is_shared() {
        let a = InstructionRegistry::instance() as *const InstructionRegistry;
        let b = InstructionRegistry::instance() as *const InstructionRegistry;
        assert_eq!(a, b);
    }

    #[test]
    fn test_create_returns_matching_name_and_bits() {
        let registry = InstructionRegistry::with_builtins();
        let cases: [(&str, Vec<usize>); 5] = [
            ("H", vec![7]),
            ("CNOT", vec![3, 1]),
            ("Swap", vec![0, 9]),
            ("Rz", vec![2]),
            ("Coupler", vec![5, 4]),
        ];
        for (name, bits) in cases {
            let instruction = registry.create(name, &bits).unwrap();
            assert_eq!(instruction.name(), name);
            assert_eq!(instruction.bits(), bits.as_slice());
        }
    }

    #[test]
    fn test_create_with_params() {
        let registry = InstructionRegistry::with_builtins();
        let rz = registry.create_with_params("Rz", &[1], &[0.5]).unwrap();
        assert_eq!(rz.render("qreg"), "Rz(0.5) qreg1");
    }

    #[test]
    fn test_create_unknown() {
        let registry = InstructionRegistry::with_builtins();
        let err = registry.create("Toffoli", &[0, 1, 2]).unwrap_err();
        assert_eq!(err, InstructionError::Unknown("Toffoli".into()));
    }

    #[test]
    fn test_create_propagates_arity_error() {
        let registry = InstructionRegistry::with_builtins();
        assert!(matches!(
            registry.create("CNOT", &[0]),
            Err(InstructionError::InvalidArity { expected: 2, actual: 1, .. })
        ));
    }

    #[test]
    fn test_last_registration_wins() {
        let registry = InstructionRegistry::new();
        registry.register_creator("Flip", X::create).unwrap();
        registry.register_creator("Flip", Y::create).unwrap();

        assert_eq!(registry.len(), 1);
        let instruction = registry.create("Flip", &[0]).unwrap();
        assert_eq!(instruction.name(), "Y");
    }

    #[test]
    fn test_strict_policy_rejects_duplicates() {
        let registry = InstructionRegistry::new();
        registry.set_policy(RegistrationPolicy::Strict);
        registry.register_creator("Flip", X::create).unwrap();

        let err = registry.register_creator("Flip", Y::create).unwrap_err();
        assert_eq!(err, InstructionError::AlreadyRegistered("Flip".into()));
        assert_eq!(registry.create("Flip", &[0]).unwrap().name(), "X");
    }

    #[test]
    fn test_strict_after_builtins_protects_them() {
        let registry = InstructionRegistry::with_builtins();
        registry.set_policy(RegistrationPolicy::Strict);

        let err = registry.register_creator("Y", X::create).unwrap_err();
        assert_eq!(err, InstructionError::AlreadyRegistered("Y".into()));
        assert_eq!(registry.create("Y", &[0]).unwrap().name(), "Y");
    }

    #[test]
    fn test_policy_change_seen_by_next_registration() {
        let registry = InstructionRegistry::new();
        registry.register_creator("Flip", X::create).unwrap();

        std::thread::scope(|scope| {
            scope.spawn(|| registry.set_policy(RegistrationPolicy::Strict));
        });

        assert!(registry.register_creator("Flip", Y::create).is_err());
        assert_eq!(registry.create("Flip", &[0]).unwrap().name(), "X");
    }

    #[test]
    fn test_custom_factory_closure() {
        let registry = InstructionRegistry::new();
        registry
            .register_creator("QuarterTurn", |bits: &[usize], _params: &[f64]| {
                Ok(Box::new(Rz::with_params(bits, [std::f64::consts::FRAC_PI_2])?)
                    as Box<dyn Instruction>)
            })
            .unwrap();

        let instruction = registry.create("QuarterTurn", &[3]).unwrap();
        assert_eq!(instruction.name(), "Rz");
        assert_eq!(instruction.params(), &[std::f64::consts::FRAC_PI_2]);
    }

    #[test]
    fn test_names_sorted() {
        let registry = InstructionRegistry::new();
        registry.register_creator("Y", Y::create).unwrap();
        registry.register_creator("CNOT", Cnot::create).unwrap();
        registry.register_creator("X", X::create).unwrap();
        assert_eq!(registry.names(), vec!["CNOT", "X", "Y"]);
        assert!(registry.contains("X"));
        assert!(!registry.contains("Z"));
    }

    #[test]
    fn test_empty_registry() {
        let registry = InstructionRegistry::default();
        assert!(registry.is_empty());
        assert_eq!(registry.policy(), RegistrationPolicy::Overwrite);
    }

    #[test]
    fn test_concurrent_registration() {
        let registry = InstructionRegistry::new();
        std::thread::scope(|scope| {
            for t in 0..8 {
                let registry = &registry;
                scope.spawn(move || {
                    for i in 0..25 {
                        let name = format!("G{}_{}", t, i);
                        registry.register_creator(name.clone(), Y::create).unwrap();
                        assert!(registry.contains(&name));
                    }
                });
            }
        });
        assert_eq!(registry.len(), 200);
        assert_eq!(registry.create("G7_24", &[1]).unwrap().bits(), &[1]);
    }

    #[test]
    fn test_reads_see_snapshot_during_writes() {
        let registry = InstructionRegistry::with_builtins();
        let before = registry.snapshot();
        registry.register_creator("Extra", X::create).unwrap();
        assert!(!before.contains_key("Extra"));
        assert!(registry.contains("Extra"));
    }
}
