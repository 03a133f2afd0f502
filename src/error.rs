//! Library error types.
//!
//! Two orthogonal taxonomies: [`EncodeError`] for wire-limit violations hit while
//! writing a [`Value`](crate::Value), and [`DecodeError`] for everything that can
//! go wrong reading bytes back into a `Value` or running a [`Codec`](crate::Codec)
//! over one. Both are plain enums with hand-written `Display`/`Error` impls, the
//! same shape as this crate's teacher's own `Error` type.

use std::fmt;

/// A msgpack-codec `Result`, defaulting to [`DecodeError`] since that is the
/// far more common failure mode (decoding untrusted bytes).
pub type Result<T, E = DecodeError> = std::result::Result<T, E>;

/// Failures that can occur while encoding a [`Value`](crate::Value) to bytes.
///
/// Each variant carries the offending quantity. Because [`Integer`](crate::Integer)
/// already represents exactly the wire-legal range `[-2^63, 2^64-1]`, `IntegerTooLarge`
/// can only be produced by code outside this crate's own encode path; it exists for
/// API completeness and for future integer representations that could exceed it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EncodeError {
    /// An integer fell outside `[-2^63, 2^64-1]`.
    IntegerTooLarge(i128),
    /// A string payload exceeded `2^32-1` bytes.
    StringTooLong(usize),
    /// A binary payload exceeded `2^32-1` bytes.
    BinaryTooLong(usize),
    /// An array had more than `2^32-1` elements.
    ArrayTooLong(usize),
    /// A map had more than `2^32-1` pairs.
    MapTooLong(usize),
    /// An extension type code fell in the reserved band `[-128, -2]`.
    InvalidExtensionTypeCode(i8),
    /// An extension payload exceeded `2^32-1` bytes.
    ExtensionDataTooLong(usize),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            EncodeError::IntegerTooLarge(n) => {
                write!(f, "integer {} is outside the representable range", n)
            }
            EncodeError::StringTooLong(len) => {
                write!(f, "string of {} bytes exceeds the maximum of 2^32-1", len)
            }
            EncodeError::BinaryTooLong(len) => {
                write!(f, "binary of {} bytes exceeds the maximum of 2^32-1", len)
            }
            EncodeError::ArrayTooLong(len) => {
                write!(f, "array of {} elements exceeds the maximum of 2^32-1", len)
            }
            EncodeError::MapTooLong(len) => {
                write!(f, "map of {} pairs exceeds the maximum of 2^32-1", len)
            }
            EncodeError::InvalidExtensionTypeCode(code) => write!(
                f,
                "extension type code {} is in the reserved range [-128, -2]",
                code
            ),
            EncodeError::ExtensionDataTooLong(len) => write!(
                f,
                "extension payload of {} bytes exceeds the maximum of 2^32-1",
                len
            ),
        }
    }
}

impl std::error::Error for EncodeError {}

/// Failures that can occur while decoding bytes into a [`Value`](crate::Value), or
/// while running a [`Codec`](crate::Codec) decoder over a `Value`.
///
/// This is a recursive tagged union: the `FieldError`/`IndexError` wrappers carry a
/// boxed inner error and are never lossy — the original leaf is always reachable by
/// walking the chain, which is exactly what [`format_error`](crate::format_error) does.
#[derive(Clone, Debug, PartialEq)]
pub enum DecodeError {
    // --- wire leaves ---
    /// The input ended before a value could be fully read.
    UnexpectedEof,
    /// The first byte of an element did not match any known format.
    InvalidFormat(u8),
    /// A string's declared byte length was not valid UTF-8.
    InvalidUtf8,
    /// An integer's wire representation could not be losslessly decoded.
    IntegerOverflow,
    /// The byte matched a reserved format marker (`0xc1`).
    ReservedFormat(u8),
    /// `unpack_exact` succeeded but bytes remained afterward.
    TrailingBytes(usize),
    /// The decoder's nesting guard tripped on adversarially deep input.
    DepthLimitExceeded,

    // --- codec leaves ---
    /// The decoded `Value` was not the expected shape.
    TypeMismatch {
        /// What the codec expected, e.g. `"Integer"`.
        expected: &'static str,
        /// The type name of what was actually found, e.g. `"String"`.
        got: &'static str,
    },
    /// An `objectN` record was missing a required field.
    MissingField(String),
    /// An `extension(code)` codec saw a different type code than expected.
    ExtensionTypeMismatch {
        /// The type code the codec required.
        expected: i8,
        /// The type code actually present.
        got: i8,
    },
    /// A constrained codec (e.g. `int_range`, `non_empty_string`) rejected its input.
    OutOfRange(String),
    /// A `fail`/`try_map` codec produced an application-defined message.
    CustomError(String),

    // --- wrappers ---
    /// The error occurred inside an `objectN`/`string_dict`/`dict` field named here.
    FieldError(String, Box<DecodeError>),
    /// The error occurred at this index inside a `list`/`non_empty_list`/tuple.
    IndexError(usize, Box<DecodeError>),
    /// Every alternative of a `one_of` codec failed; carries each error in try order.
    AllFailed(Vec<DecodeError>),
}

impl DecodeError {
    /// Construct a [`DecodeError::TypeMismatch`] leaf.
    pub fn type_mismatch(expected: &'static str, got: &'static str) -> Self {
        DecodeError::TypeMismatch { expected, got }
    }

    /// Wrap `self` in a [`DecodeError::FieldError`] naming `field`.
    pub fn in_field(self, field: impl Into<String>) -> Self {
        DecodeError::FieldError(field.into(), Box::new(self))
    }

    /// Wrap `self` in a [`DecodeError::IndexError`] at position `index`.
    pub fn at_index(self, index: usize) -> Self {
        DecodeError::IndexError(index, Box::new(self))
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&crate::format::leaf_text(self))
    }
}

impl std::error::Error for DecodeError {}
