//! Canonical MessagePack wire codec plus a compositional, type-safe `Codec<T>`
//! combinator layer.
//!
//! ```
//! use msgpack_codec::{pack, unpack_exact, Value, Integer};
//!
//! let bytes = pack(&Value::Integer(Integer::from(127u8))).unwrap();
//! assert_eq!(bytes, vec![0x7f]);
//! assert_eq!(unpack_exact(&bytes).unwrap(), Value::Integer(Integer::from(127u8)));
//! ```
//!
//! Application records are mapped to and from [`Value`] with [`Codec`]:
//!
//! ```
//! use msgpack_codec::codec::{int, object1, string, Field};
//!
//! struct Point { x: i64 }
//! let point_codec = object1(
//!     |x| Point { x },
//!     Field::new("x", int(), |p: &Point| p.x),
//! );
//! let bytes = point_codec.pack(&Point { x: 5 }).unwrap();
//! assert_eq!(point_codec.unpack(&bytes).unwrap().x, 5);
//! ```

#![forbid(unsafe_code)]

extern crate byteorder;

mod depth_tracking;
mod format;
mod integer;
mod marker;
mod timestamp;
mod value;

pub mod codec;
pub mod decode;
pub mod encode;
pub mod error;

pub use codec::Codec;
pub use decode::{unpack, unpack_exact};
pub use encode::pack;
pub use error::{DecodeError, EncodeError};
pub use format::format_error;
pub use integer::Integer;
pub use timestamp::Timestamp;
pub use value::Value;
