//! Per-call decode and encode state

use std::rc::Rc;

use ahash::AHashMap;
use refjson_format::{Error, IdKey, IdScope, IdValue, Limits, Result};
use uuid::Uuid;

use crate::identity::{IdGenerator, IdentityInfo, IdentityRegistry, Slot};

/// Decoding options
#[derive(Debug, Clone)]
pub struct DecodeOpts {
    /// Fail on object members the bean does not know (skip them otherwise)
    pub fail_on_unknown_properties: bool,
    /// Security limits
    pub limits: Limits,
}

impl Default for DecodeOpts {
    fn default() -> Self {
        Self {
            fail_on_unknown_properties: true,
            limits: Limits::default(),
        }
    }
}

/// State for one top-level decode call
///
/// Carries the identity registry and options through every recursive decode.
/// A context is created per call and never shared between calls.
pub struct DecodeContext {
    registry: IdentityRegistry,
    opts: DecodeOpts,
}

impl DecodeContext {
    /// Create a context, validating the limits
    pub fn new(opts: DecodeOpts) -> Result<Self> {
        opts.limits.validate()?;
        Ok(Self {
            registry: IdentityRegistry::with_limit(opts.limits.max_bindings),
            opts,
        })
    }

    /// Decoding options
    pub fn options(&self) -> &DecodeOpts {
        &self.opts
    }

    /// Identity registry for this call
    pub fn registry(&self) -> &IdentityRegistry {
        &self.registry
    }

    /// Mutable identity registry for this call
    pub fn registry_mut(&mut self) -> &mut IdentityRegistry {
        &mut self.registry
    }

    /// See [`IdentityRegistry::resolve`]
    pub fn resolve<T: 'static>(&mut self, key: &IdKey) -> Result<Slot<T>> {
        self.registry.resolve(key)
    }

    /// See [`IdentityRegistry::bind`]
    pub fn bind<T: 'static>(&mut self, key: &IdKey, object: &Rc<T>) -> Result<()> {
        self.registry.bind(key, object)
    }

    /// End the call: every referenced id must have been defined
    pub fn finish(self) -> Result<()> {
        self.registry.materialize()
    }
}

impl Default for DecodeContext {
    fn default() -> Self {
        Self {
            registry: IdentityRegistry::new(),
            opts: DecodeOpts::default(),
        }
    }
}

/// Encoding options
#[derive(Debug, Clone, Default)]
pub struct EncodeOpts {
    /// Security limits (`max_depth` bounds nested objects)
    pub limits: Limits,
}

/// State for one top-level encode call
///
/// Remembers which objects were already written so later occurrences are
/// emitted as bare ids, and keeps the per-scope sequence counters.
pub struct EncodeContext {
    written: AHashMap<(IdScope, usize), IdValue>,
    sequences: AHashMap<IdScope, i64>,
    depth: usize,
    opts: EncodeOpts,
}

impl EncodeContext {
    /// Create a context, validating the limits
    pub fn new(opts: EncodeOpts) -> Result<Self> {
        opts.limits.validate()?;
        Ok(Self {
            written: AHashMap::new(),
            sequences: AHashMap::new(),
            depth: 0,
            opts,
        })
    }

    /// Encoding options
    pub fn options(&self) -> &EncodeOpts {
        &self.opts
    }

    /// Id already assigned to the object at `addr` in `scope`
    pub fn written_id(&self, scope: &IdScope, addr: usize) -> Option<&IdValue> {
        self.written.get(&(scope.clone(), addr))
    }

    /// Record that the object at `addr` was written with `id`
    pub fn remember(&mut self, scope: &IdScope, addr: usize, id: IdValue) {
        self.written.insert((scope.clone(), addr), id);
    }

    /// Produce a fresh id for generators that do not read it from the object
    pub fn generate_id(&mut self, identity: &IdentityInfo) -> Result<IdValue> {
        match identity.generator() {
            IdGenerator::IntSequence => {
                let counter = self.sequences.entry(identity.scope().clone()).or_insert(1);
                let id = *counter;
                *counter += 1;
                Ok(IdValue::Int(id))
            }
            IdGenerator::Uuid => Ok(IdValue::Uuid(Uuid::new_v4())),
            IdGenerator::Property => Err(Error::Configuration(format!(
                "scope {} takes its ids from property '{}', nothing to generate",
                identity.scope(),
                identity.property_name()
            ))),
        }
    }

    /// Enter a nested object or array
    pub fn enter(&mut self) -> Result<()> {
        if self.depth >= self.opts.limits.max_depth {
            return Err(Error::LimitExceeded(format!(
                "encoding depth exceeds limit {}",
                self.opts.limits.max_depth
            )));
        }
        self.depth += 1;
        Ok(())
    }

    /// Leave a nested object or array
    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

impl Default for EncodeContext {
    fn default() -> Self {
        Self {
            written: AHashMap::new(),
            sequences: AHashMap::new(),
            depth: 0,
            opts: EncodeOpts::default(),
        }
    }
}
