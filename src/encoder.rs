//! Depth-first value-tree traversal that emits tagged bytes.

use bytes::BufMut;

use crate::error::EncodeError;
use crate::symbol::SymbolTable;
use crate::tag::{write_varint, zigzag_encode, Tag};
use crate::value::Value;

/// A caller-supplied hook for values the built-in dispatch does not know
/// how to encode.
///
/// Called at most once per unsupported value. Returning `None` means the
/// handler declines, and encoding fails with
/// [`EncodeError::UnsupportedType`].
pub type ExtHandler<'v> = dyn Fn(&Value<'v>) -> Option<(u64, Vec<u8>)> + 'v;

/// Configuration recognised by [`encode`].
#[derive(Default)]
pub struct EncodeOptions<'v> {
    /// Invoked once for any value that doesn't match a built-in variant.
    ///
    /// `Value` is a closed enum and every variant already has a built-in
    /// encoding, so `encode_into`'s dispatch never falls through to this
    /// handler; it is accepted and stored for forward compatibility but
    /// has no effect in this implementation.
    pub ext_handler: Option<Box<ExtHandler<'v>>>,
}

impl std::fmt::Debug for EncodeOptions<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodeOptions")
            .field("ext_handler", &self.ext_handler.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl<'v> EncodeOptions<'v> {
    /// Creates an [`EncodeOptions`] with no extension handler configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the extension handler.
    pub fn with_ext_handler<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value<'v>) -> Option<(u64, Vec<u8>)> + 'v,
    {
        self.ext_handler = Some(Box::new(f));
        self
    }
}

/// Encodes `value` into a fresh byte vector.
pub fn encode(value: &Value<'_>, symbols: &SymbolTable<'_>) -> Result<Vec<u8>, EncodeError> {
    encode_with(value, symbols, &EncodeOptions::default())
}

/// As [`encode`], but with an [`EncodeOptions`] (e.g. an extension
/// handler) supplied.
pub fn encode_with(
    value: &Value<'_>,
    symbols: &SymbolTable<'_>,
    options: &EncodeOptions<'_>,
) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::new();
    encode_into(value, symbols, options, &mut buf)?;
    Ok(buf)
}

/// Appends the encoding of `value` to `buf`. Kept separate from
/// [`encode`] so container elements can be written without an
/// intermediate allocation per element.
fn encode_into(
    value: &Value<'_>,
    symbols: &SymbolTable<'_>,
    options: &EncodeOptions<'_>,
    buf: &mut Vec<u8>,
) -> Result<(), EncodeError> {
    // Dispatch order: null, the boolean singletons, integer, float,
    // string, timestamp, list, tuple, set, map, bytes, then the
    // extension fallback.
    match value {
        Value::Null => buf.put_u8(Tag::Null as u8),
        Value::Bool(true) => buf.put_u8(Tag::True as u8),
        Value::Bool(false) => buf.put_u8(Tag::False as u8),
        Value::Int(n) => {
            buf.put_u8(Tag::Int as u8);
            write_varint(buf, zigzag_encode(*n));
        }
        Value::Float(f) => {
            buf.put_u8(Tag::Float as u8);
            buf.put_f64(f.into_inner());
        }
        Value::Str(s) => encode_string(s, symbols, buf),
        Value::Timestamp(ts) => {
            buf.put_u8(Tag::Time as u8);
            write_varint(buf, zigzag_encode(ts.as_millis()));
        }
        Value::List(items) => {
            buf.put_u8(Tag::Arr as u8);
            write_varint(buf, items.len() as u64);
            for item in items {
                encode_into(item, symbols, options, buf)?;
            }
        }
        Value::Tuple(items) => {
            buf.put_u8(Tag::Tuple as u8);
            write_varint(buf, items.len() as u64);
            for item in items {
                encode_into(item, symbols, options, buf)?;
            }
        }
        Value::Set(items) => {
            buf.put_u8(Tag::Set as u8);
            write_varint(buf, items.len() as u64);
            for item in items {
                encode_into(item, symbols, options, buf)?;
            }
        }
        Value::Map(entries) => {
            buf.put_u8(Tag::Obj as u8);
            write_varint(buf, entries.len() as u64);
            for (key, val) in entries.iter() {
                let index = symbols.require_index_of(key)?;
                buf.put_u8(Tag::Symref as u8);
                write_varint(buf, index);
                encode_into(val, symbols, options, buf)?;
            }
        }
        Value::Bytes(b) => {
            buf.put_u8(Tag::Bytes as u8);
            write_varint(buf, b.len() as u64);
            buf.extend_from_slice(b);
        }
        Value::Ext(id, payload) => {
            buf.put_u8(Tag::Ext as u8);
            write_varint(buf, *id);
            write_varint(buf, payload.len() as u64);
            buf.extend_from_slice(payload);
        }
    }
    Ok(())
}

fn encode_string(s: &str, symbols: &SymbolTable<'_>, buf: &mut Vec<u8>) {
    match symbols.index_of(s) {
        Some(index) => {
            buf.put_u8(Tag::Symref as u8);
            write_varint(buf, index);
        }
        None => {
            buf.put_u8(Tag::Str as u8);
            write_varint(buf, s.len() as u64);
            buf.extend_from_slice(s.as_bytes());
        }
    }
}
