//! Error types
//!
//! Encode and decode failures never need to report each other's
//! variants, so unlike a typical single-enum codec error this crate
//! keeps them apart.

/// Failures that can occur while encoding a [`Value`](crate::Value).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EncodeError {
    /// Dispatch reached the fallthrough with no extension handler match.
    #[error("unsupported value type")]
    UnsupportedType,

    /// A map key, or a string forced through a symbol path, is not present
    /// in the symbol table.
    #[error("unknown symbol: {key:?}")]
    UnknownSymbol {
        /// The string that could not be resolved against the symbol table.
        key: String,
    },
}

/// Failures that can occur while decoding a byte sequence into a
/// [`Value`](crate::Value).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    /// A byte, varint, float, or string/bytes span ran past the end of the
    /// input.
    #[error("truncated input")]
    Truncated,

    /// A varint's bit-length exceeded 64 bits.
    #[error("varint overflow")]
    VarintOverflow,

    /// The tag byte did not match any known wire tag.
    #[error("unknown tag byte: 0x{0:02x}")]
    UnknownTag(u8),

    /// A map entry's key did not begin with a `SYMREF` tag.
    #[error("map key is missing its SYMREF prefix")]
    MissingSymrefPrefix,

    /// A `SYMREF` index was not representable in the supplied symbol table.
    #[error("symbol index {index} out of range (table has {len} entries)")]
    SymbolIndexOutOfRange {
        /// The offending index.
        index: u64,
        /// The length of the symbol table that was consulted.
        len: usize,
    },

    /// Nesting exceeded the configured `max_depth`.
    #[error("nesting depth exceeded the configured limit of {limit}")]
    DepthExceeded {
        /// The configured limit that was exceeded.
        limit: usize,
    },

    /// A STR payload was not valid UTF-8.
    #[error("invalid UTF-8 in string payload: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// The caller-supplied `ext_hook` returned an error.
    #[error("extension hook failed: {0}")]
    ExtHookFailed(String),

    /// The caller-supplied `ts_hook` returned an error.
    #[error("timestamp hook failed: {0}")]
    TsHookFailed(String),

    /// Trailing bytes remained after the first value when
    /// `DecodeOptions::strict_trailing` was set.
    #[error("{consumed} of {total} bytes consumed; trailing bytes remain")]
    TrailingBytes {
        /// How many bytes the first value actually consumed.
        consumed: usize,
        /// The total length of the input buffer.
        total: usize,
    },
}
