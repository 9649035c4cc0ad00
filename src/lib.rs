#![deny(missing_docs, missing_debug_implementations)]

//! A self-describing, tag-based binary serialization codec.
//!
//! The codec transports a closed set of untyped values (see [`Value`])
//! over a compact byte grammar: a single leading tag byte, little-endian
//! base-128 varints for lengths and integers, and a ZigZag mapping that
//! keeps small-magnitude signed integers small on the wire. Map keys are
//! always resolved against an externally supplied [`SymbolTable`] shared
//! out of band by both peers, so repeated keys cost a tag byte and a
//! small varint instead of a full string.
//!
//! # Encoding and decoding
//!
//! - [`encode`] / [`encode_with`] turn a [`Value`] into bytes.
//! - [`decode`] / [`decode_with`] turn bytes back into a [`Value`],
//!   given the same symbol table the encoder used.
//!
//! ```
//! use tagcodec::{decode, encode, SymbolTable, Value};
//!
//! let symbols = vec!["id".to_string(), "name".to_string()];
//! let table = SymbolTable::new(&symbols);
//!
//! let mut map = tagcodec::Map::with_capacity(2);
//! map.insert("id".to_string(), Value::Int(7));
//! map.insert("name".to_string(), Value::str("north gate"));
//! let value = Value::Map(map);
//!
//! let bytes = encode(&value, &table).unwrap();
//! let decoded = decode(&bytes, &table).unwrap();
//! assert_eq!(decoded, value);
//! ```
//!
//! # Zero-copy decoding
//!
//! [`DecodeOptions::zero_copy`] makes BYTES (and EXT) payloads borrow
//! directly from the input buffer instead of being copied, at the cost
//! of tying the returned [`Value`]'s lifetime to the input's.
//!
//! # What this crate does not do
//!
//! There is no schema evolution, no symbol table embedded in the
//! payload, no canonical byte-for-byte form across differently ordered
//! maps/sets, and no streaming/incremental decode of partial buffers;
//! see the module docs on [`encoder`] and [`decoder`] for the precise
//! contracts.

pub mod cursor;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod frame;
pub mod primitives;
pub mod symbol;
pub mod tag;
pub mod value;

pub use decoder::{decode, decode_with, DecodeOptions};
pub use encoder::{encode, encode_with, EncodeOptions};
pub use error::{DecodeError, EncodeError};
pub use primitives::{OrderedMap, Timestamp};
pub use symbol::SymbolTable;
pub use value::{Map, Set, Value};
