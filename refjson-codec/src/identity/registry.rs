//! Identity registry for one decode call

use std::any::Any;
use std::rc::Rc;

use ahash::AHashMap;
use refjson_format::{Error, IdKey, Limits, Result};
use tracing::{debug, trace};

use super::cell::Slot;

trait ErasedSlot {
    fn is_resolved(&self) -> bool;
    fn as_any(&self) -> &dyn Any;
}

impl<T: 'static> ErasedSlot for Slot<T> {
    fn is_resolved(&self) -> bool {
        Slot::is_resolved(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Id to object bindings for a single top-level decode call
///
/// Each key maps to one [`Slot`], created by whichever comes first: the bare
/// reference (`resolve`) or the object literal (`bind`). Slots are type-erased
/// so objects of different types can share one registry.
pub struct IdentityRegistry {
    bindings: AHashMap<IdKey, Box<dyn ErasedSlot>>,
    max_bindings: usize,
}

impl IdentityRegistry {
    /// Create a registry with the default binding limit
    pub fn new() -> Self {
        Self::with_limit(Limits::default().max_bindings)
    }

    /// Create a registry holding at most `max_bindings` keys
    pub fn with_limit(max_bindings: usize) -> Self {
        Self {
            bindings: AHashMap::new(),
            max_bindings,
        }
    }

    fn slot<T: 'static>(&mut self, key: &IdKey) -> Result<Slot<T>> {
        if let Some(existing) = self.bindings.get(key) {
            return existing
                .as_any()
                .downcast_ref::<Slot<T>>()
                .cloned()
                .ok_or_else(|| Error::ScopeTypeMismatch {
                    scope: key.scope.clone(),
                });
        }

        if self.bindings.len() >= self.max_bindings {
            return Err(Error::LimitExceeded(format!(
                "identity bindings exceed limit {}",
                self.max_bindings
            )));
        }

        let slot = Slot::pending();
        self.bindings.insert(key.clone(), Box::new(slot.clone()));
        Ok(slot)
    }

    /// Cell for `key`, created pending if the id has not been seen yet
    pub fn resolve<T: 'static>(&mut self, key: &IdKey) -> Result<Slot<T>> {
        let slot = self.slot::<T>(key)?;
        trace!(%key, resolved = slot.is_resolved(), "resolve identity");
        Ok(slot)
    }

    /// Bind a fully constructed object to `key`
    ///
    /// Binding the same instance twice is a no-op; binding a different instance
    /// fails with [`Error::DuplicateIdentity`].
    pub fn bind<T: 'static>(&mut self, key: &IdKey, object: &Rc<T>) -> Result<()> {
        let slot = self.slot::<T>(key)?;
        if !slot.fill(object) {
            return Err(Error::DuplicateIdentity { key: key.clone() });
        }
        trace!(%key, "bind identity");
        Ok(())
    }

    /// Object bound to `key`, if any
    pub fn lookup<T: 'static>(&self, key: &IdKey) -> Option<Rc<T>> {
        self.bindings
            .get(key)?
            .as_any()
            .downcast_ref::<Slot<T>>()?
            .get()
    }

    /// Number of keys seen (bound or pending)
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether no key has been seen
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Number of keys referenced but not yet bound
    pub fn pending_count(&self) -> usize {
        self.bindings.values().filter(|s| !s.is_resolved()).count()
    }

    /// Check that every referenced id was eventually defined
    pub fn materialize(&self) -> Result<()> {
        let mut unresolved: Vec<&IdKey> = self
            .bindings
            .iter()
            .filter(|(_, slot)| !slot.is_resolved())
            .map(|(key, _)| key)
            .collect();

        if unresolved.is_empty() {
            debug!(bindings = self.bindings.len(), "all identities resolved");
            return Ok(());
        }

        unresolved.sort();
        Err(Error::UnresolvedIdentity {
            key: unresolved[0].clone(),
            pending: unresolved.len(),
        })
    }
}

impl Default for IdentityRegistry {
    fn default() -> Self {
        Self::new()
    }
}
