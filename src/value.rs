//! The untyped value tree.

use std::borrow::Cow;

use indexmap::IndexSet;
use ordered_float::OrderedFloat;

use crate::primitives::{OrderedMap, Timestamp};

/// A map value. Keys are always resolved symbol-table strings: by the
/// time a [`Value::Map`] exists, every key has already round-tripped
/// through the symbol table, so the key type is a plain owned `String`
/// rather than a [`Value`].
pub type Map<'a> = OrderedMap<String, Value<'a>>;

/// A set value: unordered, no duplicates, compared as a set.
pub type Set<'a> = IndexSet<Value<'a>>;

/// The closed set of value variants the codec transports.
///
/// Carries a lifetime so zero-copy decoding (the `zero_copy` option) can
/// hand back [`Cow::Borrowed`] slices aliasing the input buffer
/// instead of allocating; owned construction and non-zero-copy decoding
/// always produce [`Cow::Owned`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// The null value.
    Null,
    /// `true` or `false`.
    Bool(bool),
    /// A signed integer fitting in the 64-bit two's-complement range.
    Int(i64),
    /// An IEEE-754 double-precision float.
    Float(OrderedFloat<f64>),
    /// A Unicode string, UTF-8 on the wire.
    ///
    /// Symbol references are a wire-level compaction of this same
    /// logical type (the encoder transparently substitutes a `SYMREF`
    /// tag for `STR` whenever the string is present in the symbol table),
    /// and decoding either tag produces this same variant, so round-trip
    /// holds without a separate runtime type.
    Str(Cow<'a, str>),
    /// An opaque octet sequence.
    Bytes(Cow<'a, [u8]>),
    /// An absolute instant, millisecond precision, UTC.
    Timestamp(Timestamp),
    /// An ordered sequence of values.
    List(Vec<Value<'a>>),
    /// An ordered sequence of values, distinct from [`Value::List`];
    /// preserves "immutable sequence" identity through round-trip.
    Tuple(Vec<Value<'a>>),
    /// An unordered collection of values, no duplicates.
    Set(Set<'a>),
    /// A mapping whose keys are symbol-table strings.
    Map(Map<'a>),
    /// An application-defined id plus an opaque payload (see the
    /// encoder's extension handler and the decoder's `ext_hook`).
    Ext(u64, Cow<'a, [u8]>),
}

impl<'a> Value<'a> {
    /// Returns an owned copy of this value with `'static` lifetime,
    /// cloning any borrowed slices.
    pub fn into_owned(self) -> Value<'static> {
        match self {
            Value::Null => Value::Null,
            Value::Bool(b) => Value::Bool(b),
            Value::Int(n) => Value::Int(n),
            Value::Float(f) => Value::Float(f),
            Value::Str(s) => Value::Str(Cow::Owned(s.into_owned())),
            Value::Bytes(b) => Value::Bytes(Cow::Owned(b.into_owned())),
            Value::Timestamp(t) => Value::Timestamp(t),
            Value::List(items) => {
                Value::List(items.into_iter().map(Value::into_owned).collect())
            }
            Value::Tuple(items) => {
                Value::Tuple(items.into_iter().map(Value::into_owned).collect())
            }
            Value::Set(items) => {
                Value::Set(items.into_iter().map(Value::into_owned).collect())
            }
            Value::Map(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, v.into_owned()))
                    .collect(),
            ),
            Value::Ext(id, payload) => Value::Ext(id, Cow::Owned(payload.into_owned())),
        }
    }

    /// Convenience constructor for a borrowed string.
    pub fn str(s: impl Into<Cow<'a, str>>) -> Self {
        Value::Str(s.into())
    }

    /// Convenience constructor for borrowed bytes.
    pub fn bytes(b: impl Into<Cow<'a, [u8]>>) -> Self {
        Value::Bytes(b.into())
    }
}

impl Eq for Value<'_> {}

impl std::hash::Hash for Value<'_> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(n) => n.hash(state),
            Value::Float(f) => f.hash(state),
            Value::Str(s) => s.hash(state),
            Value::Bytes(b) => b.hash(state),
            Value::Timestamp(t) => t.hash(state),
            Value::List(items) | Value::Tuple(items) => items.hash(state),
            Value::Set(items) => {
                // Hash as a set: combine element hashes order-independently.
                let mut acc: u64 = 0;
                for item in items {
                    let mut h = std::collections::hash_map::DefaultHasher::new();
                    item.hash(&mut h);
                    acc ^= std::hash::Hasher::finish(&h);
                }
                acc.hash(state);
            }
            Value::Map(entries) => entries.hash(state),
            Value::Ext(id, payload) => {
                id.hash(state);
                payload.hash(state);
            }
        }
    }
}

impl From<bool> for Value<'_> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value<'_> {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value<'_> {
    fn from(f: f64) -> Self {
        Value::Float(OrderedFloat(f))
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::Str(Cow::Borrowed(s))
    }
}

impl From<String> for Value<'_> {
    fn from(s: String) -> Self {
        Value::Str(Cow::Owned(s))
    }
}
