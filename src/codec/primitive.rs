//! Codecs for the primitive value shapes: the leaves every composite codec
//! eventually bottoms out on.

use crate::codec::container::list;
use crate::codec::Codec;
use crate::error::DecodeError;
use crate::integer::Integer;
use crate::value::Value;

/// Codec for `bool`, via `Value::Boolean`.
pub fn bool() -> Codec<bool> {
    Codec::new(
        |v: &bool| Value::Boolean(*v),
        |v: &Value| match v {
            Value::Boolean(b) => Ok(*b),
            other => Err(DecodeError::type_mismatch("Boolean", other.type_name())),
        },
    )
}

/// Codec for `i64`, via `Value::Integer`. Fails with `IntegerOverflow` if the
/// decoded wire integer doesn't fit in 64 signed bits (i.e. it's a `u64`
/// above `i64::MAX`).
pub fn int() -> Codec<i64> {
    Codec::new(
        |v: &i64| Value::Integer(Integer::from(*v)),
        |v: &Value| match v {
            Value::Integer(n) => n.as_i64().ok_or(DecodeError::IntegerOverflow),
            other => Err(DecodeError::type_mismatch("Integer", other.type_name())),
        },
    )
}

/// Codec for `String`, via `Value::String`.
pub fn string() -> Codec<String> {
    Codec::new(
        |v: &String| Value::String(v.clone()),
        |v: &Value| match v {
            Value::String(s) => Ok(s.clone()),
            other => Err(DecodeError::type_mismatch("String", other.type_name())),
        },
    )
}

/// Codec for `Vec<u8>`, via `Value::Binary`.
pub fn binary() -> Codec<Vec<u8>> {
    Codec::new(
        |v: &Vec<u8>| Value::Binary(v.clone()),
        |v: &Value| match v {
            Value::Binary(b) => Ok(b.clone()),
            other => Err(DecodeError::type_mismatch("Binary", other.type_name())),
        },
    )
}

/// Codec for `f64` that also accepts a wire `Integer`, widening it exactly.
pub fn float() -> Codec<f64> {
    Codec::new(
        |v: &f64| Value::Float(*v),
        |v: &Value| match v {
            Value::Float(f) => Ok(*f),
            Value::Integer(n) => Ok(n.as_f64()),
            other => Err(DecodeError::type_mismatch("Float", other.type_name())),
        },
    )
}

/// Codec for `f64` that rejects a wire `Integer` instead of widening it.
pub fn float_strict() -> Codec<f64> {
    Codec::new(
        |v: &f64| Value::Float(*v),
        |v: &Value| match v {
            Value::Float(f) => Ok(*f),
            other => Err(DecodeError::type_mismatch("Float", other.type_name())),
        },
    )
}

/// The identity codec: passes the `Value` tree through unchanged.
pub fn raw_value() -> Codec<Value> {
    Codec::new(|v: &Value| v.clone(), |v: &Value| Ok(v.clone()))
}

/// `int()` constrained to `[min, max]`; out-of-range values fail with `OutOfRange`.
pub fn int_range(min: i64, max: i64) -> Codec<i64> {
    let inner = int();
    Codec::new(
        move |v: &i64| inner.encode(v),
        move |v: &Value| {
            let n = inner.decode(v)?;
            if n < min || n > max {
                return Err(DecodeError::OutOfRange(format!(
                    "{} is outside the range [{}, {}]",
                    n, min, max
                )));
            }
            Ok(n)
        },
    )
}

/// `string()` constrained to reject the empty string.
pub fn non_empty_string() -> Codec<String> {
    let inner = string();
    Codec::new(
        move |v: &String| inner.encode(v),
        move |v: &Value| {
            let s = inner.decode(v)?;
            if s.is_empty() {
                return Err(DecodeError::OutOfRange("string must not be empty".to_string()));
            }
            Ok(s)
        },
    )
}

/// `list(inner)` constrained to reject the empty array.
pub fn non_empty_list<T>(inner: Codec<T>) -> Codec<Vec<T>>
where
    T: Send + Sync + 'static,
{
    let list_codec = list(inner);
    Codec::new(
        move |v: &Vec<T>| list_codec.encode(v),
        move |v: &Value| {
            let items = list_codec.decode(v)?;
            if items.is_empty() {
                return Err(DecodeError::OutOfRange("list must not be empty".to_string()));
            }
            Ok(items)
        },
    )
}
