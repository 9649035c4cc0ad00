use std::hash::Hash;

use indexmap::{Equivalent, IndexMap};

/// A wrapper around [`IndexMap`] with custom [`PartialEq`]/[`Eq`]/[`Hash`]
/// so it can sit inside [`crate::Value`].
///
/// The map value is ordered-or-unordered: unlike AMQP's map (which is
/// order-significant), two [`OrderedMap`]s compare equal when they carry
/// the same key/value pairs regardless of insertion order, while
/// iteration (and therefore encoding) still walks entries in insertion
/// order.
#[derive(Debug, Clone, Default)]
pub struct OrderedMap<K, V>(IndexMap<K, V>);

impl<K, V> From<IndexMap<K, V>> for OrderedMap<K, V> {
    fn from(map: IndexMap<K, V>) -> Self {
        Self(map)
    }
}

impl<K, V> OrderedMap<K, V> {
    /// Creates an empty map with room for `capacity` entries before
    /// reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self(IndexMap::with_capacity(capacity))
    }

    /// Reference to the inner [`IndexMap`].
    ///
    /// Intentionally not an `AsRef` impl, to avoid accidental misuse.
    pub fn as_inner(&self) -> &IndexMap<K, V> {
        &self.0
    }

    /// Mutable reference to the inner [`IndexMap`].
    pub fn as_inner_mut(&mut self) -> &mut IndexMap<K, V> {
        &mut self.0
    }

    /// Consumes the wrapper and returns the inner [`IndexMap`].
    pub fn into_inner(self) -> IndexMap<K, V> {
        self.0
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, K, V> {
        self.0.iter()
    }
}

impl<K, V> OrderedMap<K, V>
where
    K: Hash + Eq,
{
    /// Calls [`IndexMap::insert`] internally.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.0.insert(key, value)
    }

    /// Calls [`IndexMap::get`] internally.
    pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<&V>
    where
        Q: Hash + Equivalent<K>,
    {
        self.0.get(key)
    }
}

impl<K, V> PartialEq for OrderedMap<K, V>
where
    K: Hash + Eq,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len()
            && self
                .0
                .iter()
                .all(|(k, v)| other.0.get(k).is_some_and(|ov| ov == v))
    }
}

impl<K, V> Eq for OrderedMap<K, V>
where
    K: Hash + Eq,
    V: Eq,
{
}

impl<K, V> Hash for OrderedMap<K, V>
where
    K: Hash + Eq + Ord,
    V: Hash,
{
    /// Order-independent: hashes a stable sort of entries by key so that
    /// maps equal under [`PartialEq`] also hash equal.
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        let mut entries: Vec<_> = self.0.iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        state.write_usize(entries.len());
        for entry in entries {
            entry.hash(state)
        }
    }
}

impl<K, V> FromIterator<(K, V)> for OrderedMap<K, V>
where
    K: Hash + Eq,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(IndexMap::from_iter(iter))
    }
}

impl<K, V> IntoIterator for OrderedMap<K, V> {
    type Item = (K, V);
    type IntoIter = indexmap::map::IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
