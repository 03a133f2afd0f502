//! Canonical MessagePack encoding: every value is written using the shortest
//! format that can represent it. Unlike [`decode`](crate::decode), which must
//! accept any valid encoding an interoperating implementation might produce,
//! the encoder has only one legal output per value.
//!
//! Writing to a `Vec<u8>` can't fail, so every multi-byte field is appended
//! with `to_be_bytes()` + `extend_from_slice` rather than through
//! `byteorder::WriteBytesExt` (that crate's write half exists for fallible
//! sinks; `decode.rs`'s `ReadBytesExt` use on the read side is the one that
//! earns its keep, since truncated input is a real error there).

use crate::error::EncodeError;
use crate::integer::IntPriv;
use crate::marker::{fixext_marker, Marker};
use crate::value::Value;

/// Encode `value` to its canonical MessagePack byte representation.
pub fn pack(value: &Value) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::new();
    encode_value(value, &mut buf)?;
    Ok(buf)
}

fn encode_value(value: &Value, buf: &mut Vec<u8>) -> Result<(), EncodeError> {
    match value {
        Value::Nil => buf.push(Marker::Null.into_u8()),
        Value::Boolean(b) => buf.push(if *b { Marker::True } else { Marker::False }.into_u8()),
        Value::Integer(n) => encode_integer(n.as_priv(), buf)?,
        Value::Float(f) => {
            buf.push(Marker::F64.into_u8());
            buf.extend_from_slice(&f.to_be_bytes());
        }
        Value::String(s) => encode_str(s, buf)?,
        Value::Binary(b) => encode_bin(b, buf)?,
        Value::Array(items) => {
            encode_array_header(items.len(), buf)?;
            for item in items {
                encode_value(item, buf)?;
            }
        }
        Value::Map(pairs) => {
            encode_map_header(pairs.len(), buf)?;
            for (k, v) in pairs {
                encode_value(k, buf)?;
                encode_value(v, buf)?;
            }
        }
        Value::Extension(code, data) => encode_ext(*code, data, buf)?,
    }
    Ok(())
}

fn encode_integer(n: IntPriv, buf: &mut Vec<u8>) -> Result<(), EncodeError> {
    match n {
        IntPriv::PosInt(v) => {
            if v <= 0x7f {
                buf.push(Marker::PosFixInt(v as u8).into_u8());
            } else if v <= u8::MAX as u64 {
                buf.push(Marker::UInt8.into_u8());
                buf.push(v as u8);
            } else if v <= u16::MAX as u64 {
                buf.push(Marker::UInt16.into_u8());
                buf.extend_from_slice(&(v as u16).to_be_bytes());
            } else if v <= u32::MAX as u64 {
                buf.push(Marker::UInt32.into_u8());
                buf.extend_from_slice(&(v as u32).to_be_bytes());
            } else {
                buf.push(Marker::UInt64.into_u8());
                buf.extend_from_slice(&v.to_be_bytes());
            }
        }
        IntPriv::NegInt(v) => {
            if v >= -32 {
                buf.push(Marker::NegFixInt(v as i8).into_u8());
            } else if v >= i8::MIN as i64 {
                buf.push(Marker::Int8.into_u8());
                buf.push(v as i8 as u8);
            } else if v >= i16::MIN as i64 {
                buf.push(Marker::Int16.into_u8());
                buf.extend_from_slice(&(v as i16).to_be_bytes());
            } else if v >= i32::MIN as i64 {
                buf.push(Marker::Int32.into_u8());
                buf.extend_from_slice(&(v as i32).to_be_bytes());
            } else {
                buf.push(Marker::Int64.into_u8());
                buf.extend_from_slice(&v.to_be_bytes());
            }
        }
    }
    Ok(())
}

fn encode_str(s: &str, buf: &mut Vec<u8>) -> Result<(), EncodeError> {
    let len = s.len();
    if len > u32::MAX as usize {
        return Err(EncodeError::StringTooLong(len));
    }
    if len <= 31 {
        buf.push(Marker::FixStr(len as u8).into_u8());
    } else if len <= u8::MAX as usize {
        buf.push(Marker::Str8.into_u8());
        buf.push(len as u8);
    } else if len <= u16::MAX as usize {
        buf.push(Marker::Str16.into_u8());
        buf.extend_from_slice(&(len as u16).to_be_bytes());
    } else {
        buf.push(Marker::Str32.into_u8());
        buf.extend_from_slice(&(len as u32).to_be_bytes());
    }
    buf.extend_from_slice(s.as_bytes());
    Ok(())
}

fn encode_bin(b: &[u8], buf: &mut Vec<u8>) -> Result<(), EncodeError> {
    let len = b.len();
    if len > u32::MAX as usize {
        return Err(EncodeError::BinaryTooLong(len));
    }
    if len <= u8::MAX as usize {
        buf.push(Marker::Bin8.into_u8());
        buf.push(len as u8);
    } else if len <= u16::MAX as usize {
        buf.push(Marker::Bin16.into_u8());
        buf.extend_from_slice(&(len as u16).to_be_bytes());
    } else {
        buf.push(Marker::Bin32.into_u8());
        buf.extend_from_slice(&(len as u32).to_be_bytes());
    }
    buf.extend_from_slice(b);
    Ok(())
}

fn encode_array_header(len: usize, buf: &mut Vec<u8>) -> Result<(), EncodeError> {
    if len > u32::MAX as usize {
        return Err(EncodeError::ArrayTooLong(len));
    }
    if len <= 15 {
        buf.push(Marker::FixArray(len as u8).into_u8());
    } else if len <= u16::MAX as usize {
        buf.push(Marker::Array16.into_u8());
        buf.extend_from_slice(&(len as u16).to_be_bytes());
    } else {
        buf.push(Marker::Array32.into_u8());
        buf.extend_from_slice(&(len as u32).to_be_bytes());
    }
    Ok(())
}

fn encode_map_header(len: usize, buf: &mut Vec<u8>) -> Result<(), EncodeError> {
    if len > u32::MAX as usize {
        return Err(EncodeError::MapTooLong(len));
    }
    if len <= 15 {
        buf.push(Marker::FixMap(len as u8).into_u8());
    } else if len <= u16::MAX as usize {
        buf.push(Marker::Map16.into_u8());
        buf.extend_from_slice(&(len as u16).to_be_bytes());
    } else {
        buf.push(Marker::Map32.into_u8());
        buf.extend_from_slice(&(len as u32).to_be_bytes());
    }
    Ok(())
}

fn encode_ext(code: i8, data: &[u8], buf: &mut Vec<u8>) -> Result<(), EncodeError> {
    if (-128..=-2).contains(&code) {
        return Err(EncodeError::InvalidExtensionTypeCode(code));
    }
    let len = data.len();
    if len > u32::MAX as usize {
        return Err(EncodeError::ExtensionDataTooLong(len));
    }
    if let Some(marker) = fixext_marker(len) {
        buf.push(marker.into_u8());
    } else if len <= u8::MAX as usize {
        buf.push(Marker::Ext8.into_u8());
        buf.push(len as u8);
    } else if len <= u16::MAX as usize {
        buf.push(Marker::Ext16.into_u8());
        buf.extend_from_slice(&(len as u16).to_be_bytes());
    } else {
        buf.push(Marker::Ext32.into_u8());
        buf.extend_from_slice(&(len as u32).to_be_bytes());
    }
    buf.push(code as u8);
    buf.extend_from_slice(data);
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Integer;

    #[test]
    fn nil_and_bool() {
        assert_eq!(pack(&Value::Nil).unwrap(), vec![0xc0]);
        assert_eq!(pack(&Value::Boolean(true)).unwrap(), vec![0xc3]);
        assert_eq!(pack(&Value::Boolean(false)).unwrap(), vec![0xc2]);
    }

    #[test]
    fn posfixint_boundary() {
        assert_eq!(pack(&Value::Integer(Integer::from(127u8))).unwrap(), vec![0x7f]);
        assert_eq!(
            pack(&Value::Integer(Integer::from(128u16))).unwrap(),
            vec![0xcc, 0x80]
        );
    }

    #[test]
    fn negfixint_boundary() {
        assert_eq!(pack(&Value::Integer(Integer::from(-32i8))).unwrap(), vec![0xe0]);
        assert_eq!(
            pack(&Value::Integer(Integer::from(-33i8))).unwrap(),
            vec![0xd0, 0xdf]
        );
    }

    #[test]
    fn fixstr_and_str8() {
        let short = "a".repeat(31);
        let enc = pack(&Value::String(short.clone())).unwrap();
        assert_eq!(enc[0], 0xa0 | 31);
        let long = "a".repeat(32);
        let enc = pack(&Value::String(long)).unwrap();
        assert_eq!(enc[0], 0xd9);
        assert_eq!(enc[1], 32);
    }

    #[test]
    fn float_is_always_f64() {
        let enc = pack(&Value::Float(1.5)).unwrap();
        assert_eq!(enc[0], 0xcb);
        assert_eq!(enc.len(), 9);
    }

    #[test]
    fn array_and_map_headers() {
        let arr = Value::Array(vec![Value::Nil; 16]);
        let enc = pack(&arr).unwrap();
        assert_eq!(enc[0], 0xdc);

        let map = Value::Map(vec![(Value::Nil, Value::Nil); 16]);
        let enc = pack(&map).unwrap();
        assert_eq!(enc[0], 0xde);
    }

    #[test]
    fn fixext_prefers_exact_size() {
        let ext = Value::Extension(5, vec![0u8; 8]);
        let enc = pack(&ext).unwrap();
        assert_eq!(enc[0], 0xd7); // FixExt8
        assert_eq!(enc[1], 5);
    }

    #[test]
    fn reserved_extension_code_rejected() {
        let ext = Value::Extension(-5, vec![0u8]);
        assert_eq!(pack(&ext), Err(EncodeError::InvalidExtensionTypeCode(-5)));
    }

    #[test]
    fn timestamp_code_is_not_reserved() {
        let ext = Value::Extension(-1, vec![0u8; 4]);
        assert!(pack(&ext).is_ok());
    }

    mod random_boundaries {
        use super::*;
        use rand::prelude::*;

        #[test]
        fn binary_roundtrips_across_length_prefix_boundaries() {
            let mut test_cases: Vec<usize> = vec![0, 1];
            for i in 0..3 {
                test_cases.push(u8::MAX as usize - 1 + i);
                test_cases.push(u16::MAX as usize - 1 + i);
            }

            let mut rng = thread_rng();
            for len in test_cases {
                let mut data = vec![0u8; len];
                rng.fill_bytes(&mut data);
                let value = Value::Binary(data.clone());
                let bytes = pack(&value).unwrap();
                let decoded = crate::decode::unpack_exact(&bytes).unwrap();
                assert_eq!(decoded.as_slice(), Some(data.as_slice()));
            }
        }

        #[test]
        fn string_roundtrips_across_length_prefix_boundaries() {
            let test_cases: Vec<usize> = vec![0, 1, 30, 31, 32, 33, u8::MAX as usize, u8::MAX as usize + 1];

            let mut rng = thread_rng();
            for len in test_cases {
                let test: String = rand::distributions::Alphanumeric
                    .sample_iter(&mut rng)
                    .take(len)
                    .map(char::from)
                    .collect();
                let bytes = pack(&Value::String(test.clone())).unwrap();
                let decoded = crate::decode::unpack_exact(&bytes).unwrap();
                assert_eq!(decoded.as_str(), Some(test.as_str()));
            }
        }
    }
}
