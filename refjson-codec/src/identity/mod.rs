//! Object identity: configuration, registry and reference cells
//!
//! An identity-bearing object is written once as a literal carrying its id in a
//! designated member, and everywhere else as the bare id. Decoding resolves bare
//! ids through the [`IdentityRegistry`], in whichever order ids and literals
//! appear.

pub mod cell;
pub mod generator;
pub mod registry;

pub use cell::{Ref, Slot};
pub use generator::IdGenerator;
pub use registry::IdentityRegistry;

use refjson_format::{Error, IdKey, IdScope, IdValue, Result};

/// Identity metadata for a type or an annotated property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityInfo {
    property: String,
    scope: IdScope,
    generator: IdGenerator,
}

impl IdentityInfo {
    /// Create identity metadata
    ///
    /// # Arguments
    /// * `property` - Member name carrying the id inside the object literal
    /// * `scope` - Namespace the ids live in
    /// * `generator` - How ids are produced and read
    pub fn new(property: impl Into<String>, scope: IdScope, generator: IdGenerator) -> Result<Self> {
        let property = property.into();
        if property.is_empty() {
            return Err(Error::Configuration(format!(
                "identity property name for scope {scope} cannot be empty"
            )));
        }
        Ok(Self {
            property,
            scope,
            generator,
        })
    }

    /// Integer sequence ids
    pub fn int_sequence(property: impl Into<String>, scope: IdScope) -> Result<Self> {
        Self::new(property, scope, IdGenerator::IntSequence)
    }

    /// Random UUID ids
    pub fn uuid(property: impl Into<String>, scope: IdScope) -> Result<Self> {
        Self::new(property, scope, IdGenerator::Uuid)
    }

    /// Ids taken from a property of the object itself
    pub fn property(property: impl Into<String>, scope: IdScope) -> Result<Self> {
        Self::new(property, scope, IdGenerator::Property)
    }

    /// Member name carrying the id
    pub fn property_name(&self) -> &str {
        &self.property
    }

    /// Identity namespace
    pub fn scope(&self) -> &IdScope {
        &self.scope
    }

    /// Generator policy
    pub fn generator(&self) -> IdGenerator {
        self.generator
    }

    /// Registry key for `id` in this scope
    pub fn key(&self, id: IdValue) -> IdKey {
        IdKey::new(self.scope.clone(), id)
    }
}
