//! The compositional, type-safe mapping layer between domain types and
//! [`Value`](crate::Value). A `Codec<T>` is a pair of pure functions — never
//! more, never less — so it composes the way a function does: build small
//! ones and glue them with [`map`](combinator::map), [`one_of`](combinator::one_of),
//! `objectN`, and friends.

mod combinator;
mod container;
mod primitive;
mod record;

pub use combinator::{fail, lazy, map, one_of, succeed, try_map, with_default};
pub use container::{any_extension, dict, extension, list, nullable, string_dict, timestamp, tuple2, tuple3, tuple4};
pub use primitive::{binary, bool, float, float_strict, int, int_range, non_empty_list, non_empty_string, raw_value, string};
pub use record::{
    object1, object2, object3, object4, object5, object6, object7, object8, Field,
};

use std::sync::Arc;

use crate::error::DecodeError;
use crate::value::Value;

type EncodeFn<T> = Arc<dyn Fn(&T) -> Value + Send + Sync>;
type DecodeFn<T> = Arc<dyn Fn(&Value) -> Result<T, DecodeError> + Send + Sync>;

/// A bidirectional mapping between `T` and [`Value`]: an infallible encoder and
/// a fallible decoder, bundled as one cloneable, thread-shareable unit.
///
/// Closures are held behind `Arc` rather than `Box` so a `Codec<T>` can be
/// freely cloned and shared across threads — stashed in a `OnceLock`, handed
/// to worker threads, whatever the caller needs — without forcing an `Arc`
/// wrapper of their own.
pub struct Codec<T> {
    encode: EncodeFn<T>,
    decode: DecodeFn<T>,
}

impl<T> Codec<T> {
    /// Build a codec directly from an encoder and a decoder. This is the one
    /// primitive every other combinator in this module is built from; the
    /// spec calls the public-facing version of this `custom`.
    pub fn new<E, D>(encode: E, decode: D) -> Codec<T>
    where
        E: Fn(&T) -> Value + Send + Sync + 'static,
        D: Fn(&Value) -> Result<T, DecodeError> + Send + Sync + 'static,
    {
        Codec {
            encode: Arc::new(encode),
            decode: Arc::new(decode),
        }
    }

    /// Encode a value to its [`Value`] tree. Infallible: codecs never fail to
    /// encode, only to decode.
    pub fn encode(&self, value: &T) -> Value {
        (self.encode)(value)
    }

    /// Decode a [`Value`] tree back to `T`.
    pub fn decode(&self, value: &Value) -> Result<T, DecodeError> {
        (self.decode)(value)
    }

    /// Encode straight to canonical MessagePack bytes.
    pub fn pack(&self, value: &T) -> Result<Vec<u8>, crate::error::EncodeError> {
        crate::encode::pack(&self.encode(value))
    }

    /// Decode a byte slice, requiring the whole slice to be consumed.
    pub fn unpack(&self, bytes: &[u8]) -> Result<T, DecodeError> {
        let value = crate::decode::unpack_exact(bytes)?;
        self.decode(&value)
    }
}

impl<T> Clone for Codec<T> {
    fn clone(&self) -> Self {
        Codec {
            encode: self.encode.clone(),
            decode: self.decode.clone(),
        }
    }
}

/// Alias for [`Codec::new`]: the public entry point §4.4 calls `custom`, for
/// hand-written codecs and the variant/tagged-union pattern.
pub fn custom<T, E, D>(encode: E, decode: D) -> Codec<T>
where
    E: Fn(&T) -> Value + Send + Sync + 'static,
    D: Fn(&Value) -> Result<T, DecodeError> + Send + Sync + 'static,
{
    Codec::new(encode, decode)
}
