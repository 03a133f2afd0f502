//! Codecs over container shapes: optional values, arrays, maps, and
//! extensions.

use std::collections::BTreeMap;

use crate::codec::Codec;
use crate::error::DecodeError;
use crate::value::Value;

/// `Nil` encodes `None`; anything else decodes via `inner` and is wrapped `Some`.
pub fn nullable<T>(inner: Codec<T>) -> Codec<Option<T>>
where
    T: Send + Sync + 'static,
{
    let enc = inner.clone();
    let dec = inner;
    Codec::new(
        move |v: &Option<T>| match v {
            Some(x) => enc.encode(x),
            None => Value::Nil,
        },
        move |v: &Value| match v {
            Value::Nil => Ok(None),
            other => dec.decode(other).map(Some),
        },
    )
}

/// Encodes/decodes a `Vec<T>` as an `Array`, element by element. A decode
/// failure on element `i` is wrapped in `IndexError(i, ...)`.
pub fn list<T>(inner: Codec<T>) -> Codec<Vec<T>>
where
    T: Send + Sync + 'static,
{
    let enc = inner.clone();
    let dec = inner;
    Codec::new(
        move |v: &Vec<T>| Value::Array(v.iter().map(|item| enc.encode(item)).collect()),
        move |v: &Value| match v {
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| dec.decode(item).map_err(|e| e.at_index(i)))
                .collect(),
            other => Err(DecodeError::type_mismatch("Array", other.type_name())),
        },
    )
}

/// Encodes/decodes a `BTreeMap<String, V>` as a `Map` with `String` keys.
/// `BTreeMap`'s sorted iteration order is what this crate uses to satisfy
/// the wire contract that encoder output order follow the iteration order
/// of the input mapping — see DESIGN.md.
pub fn string_dict<V>(inner: Codec<V>) -> Codec<BTreeMap<String, V>>
where
    V: Send + Sync + 'static,
{
    let enc = inner.clone();
    let dec = inner;
    Codec::new(
        move |v: &BTreeMap<String, V>| {
            Value::Map(
                v.iter()
                    .map(|(k, val)| (Value::String(k.clone()), enc.encode(val)))
                    .collect(),
            )
        },
        move |v: &Value| match v {
            Value::Map(pairs) => {
                let mut out = BTreeMap::new();
                for (k, val) in pairs {
                    let key = k
                        .as_str()
                        .ok_or_else(|| DecodeError::type_mismatch("String key", k.type_name()))?
                        .to_string();
                    let decoded = dec.decode(val).map_err(|e| e.in_field(key.clone()))?;
                    out.insert(key, decoded);
                }
                Ok(out)
            }
            other => Err(DecodeError::type_mismatch("Map", other.type_name())),
        },
    )
}

/// Encodes/decodes a `BTreeMap<K, V>` as a `Map`, using `key`/`value` codecs
/// for both sides of each pair.
pub fn dict<K, V>(key: Codec<K>, value: Codec<V>) -> Codec<BTreeMap<K, V>>
where
    K: Ord + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    Codec::new(
        move |v: &BTreeMap<K, V>| {
            Value::Map(
                v.iter()
                    .map(|(k, val)| (key.encode(k), value.encode(val)))
                    .collect(),
            )
        },
        move |v: &Value| match v {
            Value::Map(pairs) => {
                let mut out = BTreeMap::new();
                for (k, val) in pairs {
                    let decoded_key = key.decode(k)?;
                    let decoded_val = value.decode(val)?;
                    out.insert(decoded_key, decoded_val);
                }
                Ok(out)
            }
            other => Err(DecodeError::type_mismatch("Map", other.type_name())),
        },
    )
}

/// Encodes a `Vec<u8>` payload as `Extension(code, ...)`; decode requires
/// that exact type code, else `ExtensionTypeMismatch`.
pub fn extension(code: i8) -> Codec<Vec<u8>> {
    Codec::new(
        move |v: &Vec<u8>| Value::Extension(code, v.clone()),
        move |v: &Value| match v {
            Value::Extension(got, data) if *got == code => Ok(data.clone()),
            Value::Extension(got, _) => Err(DecodeError::ExtensionTypeMismatch { expected: code, got: *got }),
            other => Err(DecodeError::type_mismatch("Extension", other.type_name())),
        },
    )
}

/// The built-in Timestamp extension, mapped straight to/from
/// [`Timestamp`](crate::Timestamp) via its own smallest-fit wire packing
/// (§4.3). Decoding rejects a non-Timestamp extension type code with
/// `ExtensionTypeMismatch`, and a Timestamp-tagged extension whose payload
/// isn't 4, 8, or 12 bytes (or whose nanoseconds are out of range) with
/// `CustomError`.
pub fn timestamp() -> Codec<crate::Timestamp> {
    use std::convert::TryFrom;
    Codec::new(
        |v: &crate::Timestamp| Value::Extension(crate::marker::TIMESTAMP_EXT_TYPE, v.encode()),
        |v: &Value| match v {
            Value::Extension(crate::marker::TIMESTAMP_EXT_TYPE, data) => {
                crate::Timestamp::try_from(data.as_slice()).map_err(DecodeError::CustomError)
            }
            Value::Extension(got, _) => Err(DecodeError::ExtensionTypeMismatch {
                expected: crate::marker::TIMESTAMP_EXT_TYPE,
                got: *got,
            }),
            other => Err(DecodeError::type_mismatch("Extension", other.type_name())),
        },
    )
}

/// Exposes the raw `(type_code, data)` pair of any extension value.
pub fn any_extension() -> Codec<(i8, Vec<u8>)> {
    Codec::new(
        |v: &(i8, Vec<u8>)| Value::Extension(v.0, v.1.clone()),
        |v: &Value| match v {
            Value::Extension(code, data) => Ok((*code, data.clone())),
            other => Err(DecodeError::type_mismatch("Extension", other.type_name())),
        },
    )
}

/// Fixed-length 2-tuple, encoded as a 2-element `Array`.
pub fn tuple2<A, B>(a: Codec<A>, b: Codec<B>) -> Codec<(A, B)>
where
    A: Send + Sync + 'static,
    B: Send + Sync + 'static,
{
    Codec::new(
        move |v: &(A, B)| Value::Array(vec![a.encode(&v.0), b.encode(&v.1)]),
        move |v: &Value| match v {
            Value::Array(items) if items.len() == 2 => {
                Ok((a.decode(&items[0]).map_err(|e| e.at_index(0))?, b.decode(&items[1]).map_err(|e| e.at_index(1))?))
            }
            Value::Array(items) => Err(DecodeError::OutOfRange(format!(
                "expected an array of length 2, got length {}",
                items.len()
            ))),
            other => Err(DecodeError::type_mismatch("Array", other.type_name())),
        },
    )
}

/// Fixed-length 3-tuple, encoded as a 3-element `Array`.
pub fn tuple3<A, B, C>(a: Codec<A>, b: Codec<B>, c: Codec<C>) -> Codec<(A, B, C)>
where
    A: Send + Sync + 'static,
    B: Send + Sync + 'static,
    C: Send + Sync + 'static,
{
    Codec::new(
        move |v: &(A, B, C)| Value::Array(vec![a.encode(&v.0), b.encode(&v.1), c.encode(&v.2)]),
        move |v: &Value| match v {
            Value::Array(items) if items.len() == 3 => Ok((
                a.decode(&items[0]).map_err(|e| e.at_index(0))?,
                b.decode(&items[1]).map_err(|e| e.at_index(1))?,
                c.decode(&items[2]).map_err(|e| e.at_index(2))?,
            )),
            Value::Array(items) => Err(DecodeError::OutOfRange(format!(
                "expected an array of length 3, got length {}",
                items.len()
            ))),
            other => Err(DecodeError::type_mismatch("Array", other.type_name())),
        },
    )
}

/// Fixed-length 4-tuple, encoded as a 4-element `Array`.
pub fn tuple4<A, B, C, D>(a: Codec<A>, b: Codec<B>, c: Codec<C>, d: Codec<D>) -> Codec<(A, B, C, D)>
where
    A: Send + Sync + 'static,
    B: Send + Sync + 'static,
    C: Send + Sync + 'static,
    D: Send + Sync + 'static,
{
    Codec::new(
        move |v: &(A, B, C, D)| Value::Array(vec![a.encode(&v.0), b.encode(&v.1), c.encode(&v.2), d.encode(&v.3)]),
        move |v: &Value| match v {
            Value::Array(items) if items.len() == 4 => Ok((
                a.decode(&items[0]).map_err(|e| e.at_index(0))?,
                b.decode(&items[1]).map_err(|e| e.at_index(1))?,
                c.decode(&items[2]).map_err(|e| e.at_index(2))?,
                d.decode(&items[3]).map_err(|e| e.at_index(3))?,
            )),
            Value::Array(items) => Err(DecodeError::OutOfRange(format!(
                "expected an array of length 4, got length {}",
                items.len()
            ))),
            other => Err(DecodeError::type_mismatch("Array", other.type_name())),
        },
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::codec::primitive::{int, string};

    #[test]
    fn nullable_round_trip() {
        let c = nullable(int());
        assert_eq!(c.decode(&c.encode(&Some(5))), Ok(Some(5)));
        assert_eq!(c.decode(&c.encode(&None)), Ok(None));
        assert_eq!(c.encode(&None), Value::Nil);
    }

    #[test]
    fn list_wraps_element_errors_with_index() {
        let c = list(int());
        let v = Value::Array(vec![Value::Integer(crate::Integer::from(1u8)), Value::Nil]);
        let err = c.decode(&v).unwrap_err();
        assert_eq!(err, DecodeError::type_mismatch("Integer", "Nil").at_index(1));
    }

    #[test]
    fn string_dict_round_trip_and_rejects_non_string_key() {
        let c = string_dict(int());
        let mut map = BTreeMap::new();
        map.insert("a".to_string(), 1);
        map.insert("b".to_string(), 2);
        assert_eq!(c.decode(&c.encode(&map)), Ok(map));

        let bad = Value::Map(vec![(Value::Integer(crate::Integer::from(1u8)), Value::Nil)]);
        assert_eq!(
            c.decode(&bad),
            Err(DecodeError::type_mismatch("String key", "Integer"))
        );
    }

    #[test]
    fn extension_checks_type_code() {
        let c = extension(5);
        let v = Value::Extension(5, vec![1, 2, 3]);
        assert_eq!(c.decode(&v), Ok(vec![1, 2, 3]));

        let wrong = Value::Extension(6, vec![]);
        assert_eq!(
            c.decode(&wrong),
            Err(DecodeError::ExtensionTypeMismatch { expected: 5, got: 6 })
        );
    }

    #[test]
    fn timestamp_round_trips_through_smallest_encoding() {
        let c = timestamp();
        let ts = crate::Timestamp::from_unix_seconds(12345);
        let encoded = c.encode(&ts);
        assert_eq!(encoded, Value::Extension(crate::marker::TIMESTAMP_EXT_TYPE, ts.encode()));
        assert_eq!(c.decode(&encoded), Ok(ts));
    }

    #[test]
    fn timestamp_rejects_other_extension_codes() {
        let c = timestamp();
        let wrong = Value::Extension(5, vec![0u8; 4]);
        assert_eq!(
            c.decode(&wrong),
            Err(DecodeError::ExtensionTypeMismatch { expected: crate::marker::TIMESTAMP_EXT_TYPE, got: 5 })
        );
    }

    #[test]
    fn tuple2_checks_length() {
        let c = tuple2(int(), string());
        let v = Value::Array(vec![Value::Integer(crate::Integer::from(1u8))]);
        assert!(c.decode(&v).is_err());
    }
}
