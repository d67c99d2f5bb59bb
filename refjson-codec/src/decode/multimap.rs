//! Multi-valued map container and its builder
//!
//! Wire form: a JSON object whose members are stringified keys and whose values
//! are arrays, e.g. `{"a":[1,2],"b":[3]}`.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;

use indexmap::IndexMap;
use refjson_format::{Error, Result, TokenKind, TokenReader};
use smallvec::SmallVec;
use tracing::trace;

use super::{KeyDecoder, ValueDecoder};
use crate::backref::{propagate, Holder};
use crate::context::DecodeContext;

type Values<V> = SmallVec<[V; 4]>;

/// Key to ordered values, keys kept in first-insertion order
///
/// Duplicate values under one key are allowed. A key may be present with zero
/// values.
#[derive(Clone)]
pub struct Multimap<K, V> {
    entries: IndexMap<K, Values<V>, ahash::RandomState>,
}

impl<K: Hash + Eq, V> Multimap<K, V> {
    /// Empty multimap
    pub fn new() -> Self {
        Self {
            entries: IndexMap::with_hasher(ahash::RandomState::new()),
        }
    }

    /// Append `value` under `key`
    pub fn put(&mut self, key: K, value: V) {
        self.values_entry(key).push(value);
    }

    pub(crate) fn values_entry(&mut self, key: K) -> &mut Values<V> {
        self.entries.entry(key).or_default()
    }

    /// Values under `key` in insertion order (empty if absent)
    pub fn get<Q>(&self, key: &Q) -> &[V]
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Whether `key` is present, even with zero values
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    /// Every value, grouped by key
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values().flat_map(|v| v.iter())
    }

    /// `(key, value)` pairs, one per value
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries
            .iter()
            .flat_map(|(k, values)| values.iter().map(move |v| (k, v)))
    }

    /// `(key, values)` pairs, one per key
    pub fn entries(&self) -> impl Iterator<Item = (&K, &[V])> {
        self.entries.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Total number of values
    pub fn len(&self) -> usize {
        self.entries.values().map(|v| v.len()).sum()
    }

    /// Number of distinct keys
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no keys at all
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Hash + Eq, V> Default for Multimap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for Multimap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.put(k, v);
        }
        map
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for Multimap<K, V> {
    /// Order-sensitive: same keys in the same order, same values in the same order
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(other.entries.iter())
                .all(|((ka, va), (kb, vb))| ka == kb && va.as_slice() == vb.as_slice())
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Multimap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k, v.as_slice())))
            .finish()
    }
}

/// Read a multimap, decoding names with `keys` and array elements with `values`
///
/// On any error the partially built container is dropped and the error is
/// returned unchanged.
pub fn build_multimap<KD, VD>(
    reader: &mut dyn TokenReader,
    ctx: &mut DecodeContext,
    keys: &KD,
    values: &VD,
) -> Result<Multimap<KD::Key, VD::Value>>
where
    KD: KeyDecoder + ?Sized,
    KD::Key: Hash + Eq,
    VD: ValueDecoder + ?Sized,
{
    let mut map = Multimap::new();

    reader.begin_object()?;
    while reader.peek()? != TokenKind::EndObject {
        let name = reader.next_name()?;
        let key = keys.decode(&name, ctx)?;

        // Registers the key even when the array turns out empty.
        let slot = map.values_entry(key);
        reader.begin_array()?;
        while reader.peek()? != TokenKind::EndArray {
            slot.push(values.decode(reader, ctx)?);
        }
        reader.end_array()?;
    }
    reader.end_object()?;

    trace!(keys = map.key_count(), values = map.len(), "built multimap");
    Ok(map)
}

/// [`ValueDecoder`] for [`Multimap`] built from a key and a value decoder
#[derive(Debug, Clone)]
pub struct MultimapDecoder<KD, VD> {
    keys: KD,
    values: VD,
}

impl<KD, VD> MultimapDecoder<KD, VD> {
    /// Create the decoder from its two delegates
    pub fn new(keys: KD, values: VD) -> Self {
        Self { keys, values }
    }

    /// Start a builder
    pub fn builder() -> MultimapDecoderBuilder<KD, VD> {
        MultimapDecoderBuilder::default()
    }

    /// Key delegate
    pub fn key_decoder(&self) -> &KD {
        &self.keys
    }

    /// Value delegate
    pub fn value_decoder(&self) -> &VD {
        &self.values
    }
}

impl<KD, VD> ValueDecoder for MultimapDecoder<KD, VD>
where
    KD: KeyDecoder,
    KD::Key: Hash + Eq,
    VD: ValueDecoder,
{
    type Value = Multimap<KD::Key, VD::Value>;

    fn decode(&self, reader: &mut dyn TokenReader, ctx: &mut DecodeContext) -> Result<Self::Value> {
        build_multimap(reader, ctx, &self.keys, &self.values)
    }

    fn set_back_reference(&self, name: &str, holder: &Holder, value: &Self::Value, ctx: &mut DecodeContext) {
        for element in value.values() {
            propagate(&self.values, name, holder, element, ctx);
        }
    }
}

/// Builder for [`MultimapDecoder`] that checks both delegates are present
#[derive(Debug)]
pub struct MultimapDecoderBuilder<KD, VD> {
    keys: Option<KD>,
    values: Option<VD>,
}

impl<KD, VD> Default for MultimapDecoderBuilder<KD, VD> {
    fn default() -> Self {
        Self {
            keys: None,
            values: None,
        }
    }
}

impl<KD, VD> MultimapDecoderBuilder<KD, VD> {
    /// Set the key decoder
    pub fn key_decoder(mut self, keys: KD) -> Self {
        self.keys = Some(keys);
        self
    }

    /// Set the value decoder
    pub fn value_decoder(mut self, values: VD) -> Self {
        self.values = Some(values);
        self
    }

    /// Build, failing if a delegate is missing
    pub fn build(self) -> Result<MultimapDecoder<KD, VD>> {
        let keys = self
            .keys
            .ok_or_else(|| Error::Configuration("multimap key decoder is missing".to_string()))?;
        let values = self
            .values
            .ok_or_else(|| Error::Configuration("multimap value decoder is missing".to_string()))?;
        Ok(MultimapDecoder::new(keys, values))
    }
}
