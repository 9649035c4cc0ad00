//! The iterative frame-stack decoder.

use std::borrow::Cow;

use ordered_float::OrderedFloat;

use crate::cursor::Cursor;
use crate::error::DecodeError;
use crate::frame::{Frame, FramePool};
use crate::primitives::Timestamp;
use crate::symbol::SymbolTable;
use crate::tag::{zigzag_decode, Tag};
use crate::value::Value;

/// A caller-supplied hook invoked for every EXT payload. Absent a hook,
/// EXT decodes to [`Value::Ext`] directly.
pub type ExtHook<'h> = dyn Fn(u64, &[u8]) -> Result<Value<'static>, String> + 'h;

/// A caller-supplied hook invoked for every TIME payload. Absent a
/// hook, TIME decodes to [`Value::Timestamp`].
pub type TsHook<'h> = dyn Fn(i64) -> Result<Value<'static>, String> + 'h;

/// Configuration recognised by [`decode`].
pub struct DecodeOptions<'h> {
    /// When true, BYTES (and EXT) payloads borrow from the input buffer
    /// instead of being copied.
    pub zero_copy: bool,
    /// Invoked for every EXT payload; see [`ExtHook`].
    pub ext_hook: Option<Box<ExtHook<'h>>>,
    /// Invoked for every TIME payload; see [`TsHook`].
    pub ts_hook: Option<Box<TsHook<'h>>>,
    /// Maximum container nesting depth before decoding fails with
    /// [`DecodeError::DepthExceeded`].
    pub max_depth: usize,
    /// Number of freed sequence-frame capacities the internal
    /// [`FramePool`] retains.
    pub frame_pool_size: usize,
    /// When true, fail with [`DecodeError::TrailingBytes`] if the input
    /// has bytes left over after the first value. Lenient by default, to
    /// match existing encoders in the wild.
    pub strict_trailing: bool,
}

impl std::fmt::Debug for DecodeOptions<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodeOptions")
            .field("zero_copy", &self.zero_copy)
            .field("ext_hook", &self.ext_hook.as_ref().map(|_| "<fn>"))
            .field("ts_hook", &self.ts_hook.as_ref().map(|_| "<fn>"))
            .field("max_depth", &self.max_depth)
            .field("frame_pool_size", &self.frame_pool_size)
            .field("strict_trailing", &self.strict_trailing)
            .finish()
    }
}

impl<'h> Default for DecodeOptions<'h> {
    fn default() -> Self {
        Self {
            zero_copy: false,
            ext_hook: None,
            ts_hook: None,
            max_depth: 1024,
            frame_pool_size: 24,
            strict_trailing: false,
        }
    }
}

impl<'h> DecodeOptions<'h> {
    /// Creates a [`DecodeOptions`] with every field at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `zero_copy`.
    pub fn with_zero_copy(mut self, zero_copy: bool) -> Self {
        self.zero_copy = zero_copy;
        self
    }

    /// Sets the extension hook.
    pub fn with_ext_hook<F>(mut self, f: F) -> Self
    where
        F: Fn(u64, &[u8]) -> Result<Value<'static>, String> + 'h,
    {
        self.ext_hook = Some(Box::new(f));
        self
    }

    /// Sets the timestamp hook.
    pub fn with_ts_hook<F>(mut self, f: F) -> Self
    where
        F: Fn(i64) -> Result<Value<'static>, String> + 'h,
    {
        self.ts_hook = Some(Box::new(f));
        self
    }

    /// Sets `max_depth`.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets `frame_pool_size`.
    pub fn with_frame_pool_size(mut self, frame_pool_size: usize) -> Self {
        self.frame_pool_size = frame_pool_size;
        self
    }

    /// Sets `strict_trailing`.
    pub fn with_strict_trailing(mut self, strict_trailing: bool) -> Self {
        self.strict_trailing = strict_trailing;
        self
    }
}

/// Decodes exactly one value from the start of `input`. Trailing bytes
/// are left unconsumed unless `strict_trailing` is set.
pub fn decode<'a>(input: &'a [u8], symbols: &SymbolTable<'_>) -> Result<Value<'a>, DecodeError> {
    decode_with(input, symbols, &DecodeOptions::default())
}

/// As [`decode`], but with a [`DecodeOptions`] supplied.
pub fn decode_with<'a, 'h>(
    input: &'a [u8],
    symbols: &SymbolTable<'_>,
    options: &DecodeOptions<'h>,
) -> Result<Value<'a>, DecodeError> {
    let mut cursor = Cursor::new(input);
    let mut pool = FramePool::new(options.frame_pool_size);
    let mut stack: Vec<Frame<'a>> = Vec::new();

    let top_level = loop {
        // 1. Close frame (exactly one of the three steps runs per
        // iteration).
        if matches!(stack.last(), Some(top) if top.remaining == 0) {
            let frame = stack.pop().expect("checked by the guard above");
            pool.recycle(&frame);
            let value = frame.finish();
            match stack.last_mut() {
                Some(parent) => parent.install(value),
                None => break value,
            }
            continue;
        }

        // 2. Expect map key.
        if matches!(stack.last(), Some(top) if top.awaits_map_key()) {
            let tag = cursor.read_tag()?;
            if tag != Tag::Symref {
                return Err(DecodeError::MissingSymrefPrefix);
            }
            let index = cursor.read_varint()?;
            let key = symbols.resolve(index)?.to_string();
            stack
                .last_mut()
                .expect("checked by the guard above")
                .set_pending_key(key);
            continue;
        }

        // 3. Decode a value.
        let tag = cursor.read_tag()?;
        match open_container(tag, &mut cursor, &mut pool, stack.len(), options.max_depth)? {
            Some(frame) => stack.push(frame),
            None => {
                let value = decode_scalar(tag, &mut cursor, symbols, options)?;
                match stack.last_mut() {
                    Some(parent) => parent.install(value),
                    None => break value,
                }
            }
        }
    };

    if options.strict_trailing && !cursor.is_at_end() {
        return Err(DecodeError::TrailingBytes {
            consumed: cursor.position(),
            total: cursor.total_len(),
        });
    }

    Ok(top_level)
}

/// If `tag` opens a container, reads its count, checks the depth bound,
/// and returns a freshly pushed frame. Otherwise returns `None`, leaving
/// `tag` to be handled by [`decode_scalar`].
fn open_container<'a>(
    tag: Tag,
    cursor: &mut Cursor<'a>,
    pool: &mut FramePool,
    depth: usize,
    max_depth: usize,
) -> Result<Option<Frame<'a>>, DecodeError> {
    if !matches!(tag, Tag::Arr | Tag::Tuple | Tag::Set | Tag::Obj) {
        return Ok(None);
    }
    let count = cursor.read_varint()? as usize;
    if depth >= max_depth {
        return Err(DecodeError::DepthExceeded { limit: max_depth });
    }
    // `count` comes straight off the wire and is not trustworthy as an
    // allocation size: every element is at least one byte on the wire, so
    // the true count can never legitimately exceed the bytes left to read.
    // Pre-allocate for that bound and let the container grow from there;
    // `count` itself still drives the frame's `remaining` countdown.
    let reserve = count.min(cursor.remaining());
    let frame = match tag {
        Tag::Arr => pool.take_list(count, reserve),
        Tag::Tuple => pool.take_tuple(count, reserve),
        Tag::Set => pool.take_set(count, reserve),
        Tag::Obj => pool.take_map(count, reserve),
        _ => unreachable!("matched above"),
    };
    Ok(Some(frame))
}

/// Decodes every tag that is not a container opener.
fn decode_scalar<'a, 'h>(
    tag: Tag,
    cursor: &mut Cursor<'a>,
    symbols: &SymbolTable<'_>,
    options: &DecodeOptions<'h>,
) -> Result<Value<'a>, DecodeError> {
    match tag {
        Tag::Null => Ok(Value::Null),
        Tag::True => Ok(Value::Bool(true)),
        Tag::False => Ok(Value::Bool(false)),
        Tag::Int => Ok(Value::Int(zigzag_decode(cursor.read_varint()?))),
        Tag::Float => Ok(Value::Float(OrderedFloat(cursor.read_f64_be()?))),
        Tag::Str => {
            let len = cursor.read_varint()? as usize;
            let slice = cursor.read_slice(len)?;
            Ok(Value::Str(decode_str(slice, options.zero_copy)?))
        }
        // A symbol reference in value position (as opposed to a map-key
        // position) decodes to the same `Value::Str` a literal STR would
        // have.
        Tag::Symref => {
            let index = cursor.read_varint()?;
            let resolved = symbols.resolve(index)?;
            Ok(Value::Str(Cow::Owned(resolved.to_string())))
        }
        Tag::Bytes => {
            let len = cursor.read_varint()? as usize;
            let slice = cursor.read_slice(len)?;
            Ok(Value::Bytes(decode_bytes(slice, options.zero_copy)))
        }
        Tag::Time => {
            let ms = zigzag_decode(cursor.read_varint()?);
            match &options.ts_hook {
                Some(hook) => hook(ms).map_err(DecodeError::TsHookFailed),
                None => Ok(Value::Timestamp(Timestamp::from_millis(ms))),
            }
        }
        Tag::Ext => {
            let ext_id = cursor.read_varint()?;
            let len = cursor.read_varint()? as usize;
            let slice = cursor.read_slice(len)?;
            match &options.ext_hook {
                Some(hook) => hook(ext_id, slice).map_err(DecodeError::ExtHookFailed),
                None => Ok(Value::Ext(ext_id, decode_bytes(slice, options.zero_copy))),
            }
        }
        Tag::Arr | Tag::Obj | Tag::Set | Tag::Tuple => {
            unreachable!("container tags are intercepted by open_container")
        }
    }
}

fn decode_str(slice: &[u8], zero_copy: bool) -> Result<Cow<'_, str>, DecodeError> {
    if zero_copy {
        Ok(Cow::Borrowed(std::str::from_utf8(slice)?))
    } else {
        Ok(Cow::Owned(std::str::from_utf8(slice)?.to_string()))
    }
}

fn decode_bytes(slice: &[u8], zero_copy: bool) -> Cow<'_, [u8]> {
    if zero_copy {
        Cow::Borrowed(slice)
    } else {
        Cow::Owned(slice.to_vec())
    }
}
