//! The decoder's explicit frame stack and pooled frame allocator.

use crate::value::{Map, Set, Value};

/// The kind of container a [`Frame`] is building, and its partially
/// constructed contents.
#[derive(Debug)]
pub enum Container<'a> {
    /// An ARR value under construction.
    List(Vec<Value<'a>>),
    /// A TUPLE value under construction; staged as a mutable sequence and
    /// finalised to [`Value::Tuple`] on close.
    Tuple(Vec<Value<'a>>),
    /// A SET value under construction.
    Set(Set<'a>),
    /// An OBJ value under construction, with the pending key (if any)
    /// read but not yet paired with a value.
    Map(Map<'a>, Option<String>),
}

/// One in-progress container: its kind, remaining slot count, and (for
/// maps) the pending key.
#[derive(Debug)]
pub struct Frame<'a> {
    /// The container under construction and its partially filled contents.
    pub container: Container<'a>,
    /// Slots still to fill before this frame closes.
    pub remaining: usize,
}

impl<'a> Frame<'a> {
    /// `count` is the number of elements the wire format promises; `reserve`
    /// is how many of those to actually pre-allocate for. The two differ
    /// when `count` comes from untrusted input: `reserve` is the caller's
    /// bounded guess, `count` still drives when the frame closes.
    fn new_list(count: usize, reserve: usize) -> Self {
        Frame {
            container: Container::List(Vec::with_capacity(reserve)),
            remaining: count,
        }
    }

    fn new_tuple(count: usize, reserve: usize) -> Self {
        Frame {
            container: Container::Tuple(Vec::with_capacity(reserve)),
            remaining: count,
        }
    }

    fn new_set(count: usize, reserve: usize) -> Self {
        Frame {
            container: Container::Set(Set::with_capacity(reserve)),
            remaining: count,
        }
    }

    fn new_map(count: usize, reserve: usize) -> Self {
        Frame {
            container: Container::Map(Map::with_capacity(reserve), None),
            remaining: count,
        }
    }

    /// Installs `value` into the next open slot. Only valid for
    /// list/tuple/set frames, or a
    /// map frame whose pending key has already been read.
    pub fn install(&mut self, value: Value<'a>) {
        match &mut self.container {
            Container::List(items) | Container::Tuple(items) => items.push(value),
            Container::Set(items) => {
                items.insert(value);
            }
            Container::Map(entries, pending_key) => {
                let key = pending_key
                    .take()
                    .expect("install called on a map frame with no pending key");
                entries.insert(key, value);
            }
        }
        self.remaining -= 1;
    }

    /// Sets the pending key of a map frame.
    ///
    /// Panics if called on a non-map frame; the decoder loop only calls
    /// this after confirming the top frame is a map.
    pub fn set_pending_key(&mut self, key: String) {
        match &mut self.container {
            Container::Map(_, pending_key) => *pending_key = Some(key),
            _ => panic!("set_pending_key called on a non-map frame"),
        }
    }

    /// Whether this is a map frame with no pending key.
    pub fn awaits_map_key(&self) -> bool {
        matches!(self.container, Container::Map(_, None))
    }

    /// Finalises a closed frame into its value.
    pub fn finish(self) -> Value<'a> {
        match self.container {
            Container::List(items) => Value::List(items),
            Container::Tuple(items) => Value::Tuple(items),
            Container::Set(items) => Value::Set(items),
            Container::Map(entries, _) => Value::Map(entries),
        }
    }
}

/// A small fixed-capacity pool that remembers the capacities of recently
/// freed sequence buffers, checked out in LIFO order and returned on
/// frame close.
///
/// Only `List`/`Tuple` frames (the dominant shape for deeply nested
/// payloads) are pooled; `Map`/`Set` frames always allocate fresh. The
/// pool is a pure optimisation (decode correctness never depends on its
/// size), so narrowing its scope to the common case does not change
/// decoder behaviour, only how much allocator pressure deep-but-plain
/// nesting produces. A decode's frames are
/// borrowed against that decode's own input lifetime, which differs call
/// to call, so the pool tracks freed *capacities* rather than the
/// buffers themselves; `Vec::with_capacity` still avoids the repeated
/// grow-and-copy that an unsized push pattern would otherwise cause.
#[derive(Debug)]
pub struct FramePool {
    free_capacities: Vec<usize>,
    capacity: usize,
}

impl FramePool {
    /// Creates a pool that retains at most `capacity` freed buffer sizes.
    pub fn new(capacity: usize) -> Self {
        Self {
            free_capacities: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Builds a list frame with `count` slots to fill, pre-sizing the
    /// buffer to `reserve` (or the pool's largest recent allocation, if
    /// that's more than `reserve`). `reserve` is the caller's
    /// responsibility to bound; this pool does not trust it on its own.
    pub fn take_list<'a>(&mut self, count: usize, reserve: usize) -> Frame<'a> {
        Frame::new_list(count, self.sized(reserve))
    }

    /// Builds a tuple frame, as [`FramePool::take_list`].
    pub fn take_tuple<'a>(&mut self, count: usize, reserve: usize) -> Frame<'a> {
        Frame::new_tuple(count, self.sized(reserve))
    }

    /// Builds a set frame. Never pooled (see [`FramePool`] docs).
    pub fn take_set<'a>(&mut self, count: usize, reserve: usize) -> Frame<'a> {
        Frame::new_set(count, reserve)
    }

    /// Builds a map frame. Never pooled (see [`FramePool`] docs).
    pub fn take_map<'a>(&mut self, count: usize, reserve: usize) -> Frame<'a> {
        Frame::new_map(count, reserve)
    }

    fn sized(&mut self, requested: usize) -> usize {
        match self.free_capacities.pop() {
            Some(freed) if freed > requested => freed,
            _ => requested,
        }
    }

    /// Remembers a closed frame's buffer capacity for reuse, if it's a
    /// shape the pool recycles and there's room. Takes the frame by
    /// reference so the caller can still call [`Frame::finish`] on it
    /// afterwards.
    pub fn recycle(&mut self, frame: &Frame<'_>) {
        if self.free_capacities.len() >= self.capacity {
            return;
        }
        if let Container::List(buf) | Container::Tuple(buf) = &frame.container {
            self.free_capacities.push(buf.capacity());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pooled_list_capacity_is_reused() {
        let mut pool = FramePool::new(4);
        let frame: Frame<'static> = pool.take_list(8, 8);
        pool.recycle(&frame);
        assert_eq!(pool.free_capacities.len(), 1);
        let frame: Frame<'static> = pool.take_list(2, 2);
        assert_eq!(pool.free_capacities.len(), 0);
        match frame.container {
            Container::List(buf) => assert!(buf.capacity() >= 8),
            _ => panic!("expected a list frame"),
        }
    }

    #[test]
    fn pool_respects_capacity() {
        let mut pool = FramePool::new(1);
        let a: Frame<'static> = pool.take_list(1, 1);
        let b: Frame<'static> = pool.take_list(1, 1);
        pool.recycle(&a);
        pool.recycle(&b);
        assert_eq!(pool.free_capacities.len(), 1);
    }

    #[test]
    fn reserve_bounds_the_allocation_independently_of_count() {
        let mut pool = FramePool::new(4);
        let frame: Frame<'static> = pool.take_list(1_000_000_000, 4);
        match &frame.container {
            Container::List(buf) => assert!(buf.capacity() < 1_000_000_000),
            _ => panic!("expected a list frame"),
        }
        assert_eq!(frame.remaining, 1_000_000_000);
    }

    #[test]
    fn install_decrements_remaining() {
        let mut frame = Frame::new_list(2, 2);
        frame.install(Value::Int(1));
        assert_eq!(frame.remaining, 1);
        frame.install(Value::Int(2));
        assert_eq!(frame.remaining, 0);
    }

    #[test]
    fn tuple_finishes_as_tuple_not_list() {
        let mut frame = Frame::new_tuple(1, 1);
        frame.install(Value::Int(1));
        match frame.finish() {
            Value::Tuple(items) => assert_eq!(items, vec![Value::Int(1)]),
            other => panic!("expected Tuple, got {other:?}"),
        }
    }
}
