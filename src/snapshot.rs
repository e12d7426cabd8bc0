// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Copy-on-write name table shared by the instruction and compiler registries.
//!
//! Writers are serialized and publish a fresh immutable map on every change.
//! Readers only hold the read guard long enough to clone the published `Arc`,
//! so lookups never wait on a writer that is building its next map.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

pub(crate) struct SnapshotTable<V> {
    /// Serializes writers.
    writer: Mutex<()>,
    /// Currently published entries.
    published: RwLock<Arc<HashMap<String, V>>>,
}

impl<V: Clone> SnapshotTable<V> {
    pub(crate) fn new() -> Self {
        Self {
            writer: Mutex::new(()),
            published: RwLock::new(Arc::new(HashMap::new())),
        }
    }

    /// The currently published entries.
    pub(crate) fn snapshot(&self) -> Arc<HashMap<String, V>> {
        Arc::clone(&self.published.read())
    }

    pub(crate) fn get(&self, name: &str) -> Option<V> {
        self.snapshot().get(name).cloned()
    }

    /// Apply `f` to a private copy of the table and publish the result.
    ///
    /// Nothing is published when `f` returns `Err`.
    pub(crate) fn update<R, E>(
        &self,
        f: impl FnOnce(&mut HashMap<String, V>) -> Result<R, E>,
    ) -> Result<R, E> {
        let _guard = self.writer.lock();
        let mut next = HashMap::clone(&self.snapshot());
        let result = f(&mut next)?;
        *self.published.write() = Arc::new(next);
        Ok(result)
    }

    /// Run `f` against the published entries with writers held off.
    ///
    /// State kept beside the table can be changed in `f` consistently with it.
    pub(crate) fn locked<R>(&self, f: impl FnOnce(&HashMap<String, V>) -> R) -> R {
        let _guard = self.writer.lock();
        f(&self.snapshot())
    }

    /// Infallible [`update`](Self::update).
    pub(crate) fn modify<R>(&self, f: impl FnOnce(&mut HashMap<String, V>) -> R) -> R {
        match self.update(|map| Ok::<_, Infallible>(f(map))) {
            Ok(result) => result,
            Err(never) => match never {},
        }
    }
}
