//! Recursive-descent MessagePack decoding.
//!
//! Unlike [`encode`](crate::encode), which only ever produces the shortest
//! legal form, this decoder accepts *any* valid MessagePack encoding: a
//! non-canonical length prefix, or a 32-bit float where 64-bit would have
//! fit, is not an error here. An interoperating encoder elsewhere on the wire
//! owes us nothing about which format it picked, only that it picked a legal
//! one.

use byteorder::{BigEndian, ReadBytesExt};

use crate::depth_tracking::DepthTracker;
use crate::error::DecodeError;
use crate::integer::Integer;
use crate::marker::Marker;
use crate::value::Value;

/// Decode one value from the front of `bytes`, returning it along with
/// whatever bytes remain unconsumed.
pub fn unpack(bytes: &[u8]) -> Result<(Value, &[u8]), DecodeError> {
    let mut cursor = bytes;
    let mut depth = DepthTracker::new();
    let value = decode_value(&mut cursor, &mut depth)?;
    Ok((value, cursor))
}

/// Decode one value from `bytes`, requiring that the entire input be consumed.
pub fn unpack_exact(bytes: &[u8]) -> Result<Value, DecodeError> {
    let (value, rest) = unpack(bytes)?;
    if !rest.is_empty() {
        return Err(DecodeError::TrailingBytes(rest.len()));
    }
    Ok(value)
}

fn take<'a>(cursor: &mut &'a [u8], n: usize) -> Result<&'a [u8], DecodeError> {
    if cursor.len() < n {
        return Err(DecodeError::UnexpectedEof);
    }
    let (head, tail) = cursor.split_at(n);
    *cursor = tail;
    Ok(head)
}

fn read_marker(cursor: &mut &[u8]) -> Result<Marker, DecodeError> {
    let byte = cursor.read_u8().map_err(|_| DecodeError::UnexpectedEof)?;
    Ok(Marker::from_u8(byte))
}

fn decode_value(cursor: &mut &[u8], depth: &mut DepthTracker) -> Result<Value, DecodeError> {
    let marker = read_marker(cursor)?;
    decode_body(marker, cursor, depth)
}

fn decode_body(marker: Marker, cursor: &mut &[u8], depth: &mut DepthTracker) -> Result<Value, DecodeError> {
    match marker {
        Marker::PosFixInt(v) => {
            depth.enter(0)?;
            Ok(Value::Integer(Integer::from(v)))
        }
        Marker::NegFixInt(v) => {
            depth.enter(0)?;
            Ok(Value::Integer(Integer::from(v as i64)))
        }
        Marker::Null => {
            depth.enter(0)?;
            Ok(Value::Nil)
        }
        Marker::Reserved => Err(DecodeError::ReservedFormat(0xc1)),
        Marker::False => {
            depth.enter(0)?;
            Ok(Value::Boolean(false))
        }
        Marker::True => {
            depth.enter(0)?;
            Ok(Value::Boolean(true))
        }

        Marker::UInt8 => { depth.enter(0)?; Ok(Value::Integer(Integer::from(read_u8(cursor)?))) }
        Marker::UInt16 => { depth.enter(0)?; Ok(Value::Integer(Integer::from(cursor.read_u16::<BigEndian>().map_err(|_| DecodeError::UnexpectedEof)?))) }
        Marker::UInt32 => { depth.enter(0)?; Ok(Value::Integer(Integer::from(cursor.read_u32::<BigEndian>().map_err(|_| DecodeError::UnexpectedEof)?))) }
        Marker::UInt64 => { depth.enter(0)?; Ok(Value::Integer(Integer::from(cursor.read_u64::<BigEndian>().map_err(|_| DecodeError::UnexpectedEof)?))) }
        Marker::Int8 => { depth.enter(0)?; Ok(Value::Integer(Integer::from(read_i8(cursor)?))) }
        Marker::Int16 => { depth.enter(0)?; Ok(Value::Integer(Integer::from(cursor.read_i16::<BigEndian>().map_err(|_| DecodeError::UnexpectedEof)?))) }
        Marker::Int32 => { depth.enter(0)?; Ok(Value::Integer(Integer::from(cursor.read_i32::<BigEndian>().map_err(|_| DecodeError::UnexpectedEof)?))) }
        Marker::Int64 => { depth.enter(0)?; Ok(Value::Integer(Integer::from(cursor.read_i64::<BigEndian>().map_err(|_| DecodeError::UnexpectedEof)?))) }

        Marker::F32 => {
            depth.enter(0)?;
            Ok(Value::Float(
                cursor.read_f32::<BigEndian>().map_err(|_| DecodeError::UnexpectedEof)? as f64,
            ))
        }
        Marker::F64 => {
            depth.enter(0)?;
            Ok(Value::Float(
                cursor.read_f64::<BigEndian>().map_err(|_| DecodeError::UnexpectedEof)?,
            ))
        }

        Marker::FixStr(len) => { depth.enter(0)?; decode_str(cursor, len as usize) }
        Marker::Str8 => {
            let len = read_u8(cursor)? as usize;
            depth.enter(0)?;
            decode_str(cursor, len)
        }
        Marker::Str16 => {
            let len = cursor.read_u16::<BigEndian>().map_err(|_| DecodeError::UnexpectedEof)? as usize;
            depth.enter(0)?;
            decode_str(cursor, len)
        }
        Marker::Str32 => {
            let len = cursor.read_u32::<BigEndian>().map_err(|_| DecodeError::UnexpectedEof)? as usize;
            depth.enter(0)?;
            decode_str(cursor, len)
        }

        Marker::Bin8 => {
            let len = read_u8(cursor)? as usize;
            depth.enter(0)?;
            Ok(Value::Binary(take(cursor, len)?.to_vec()))
        }
        Marker::Bin16 => {
            let len = cursor.read_u16::<BigEndian>().map_err(|_| DecodeError::UnexpectedEof)? as usize;
            depth.enter(0)?;
            Ok(Value::Binary(take(cursor, len)?.to_vec()))
        }
        Marker::Bin32 => {
            let len = cursor.read_u32::<BigEndian>().map_err(|_| DecodeError::UnexpectedEof)? as usize;
            depth.enter(0)?;
            Ok(Value::Binary(take(cursor, len)?.to_vec()))
        }

        Marker::FixArray(len) => {
            depth.enter(len as u32)?;
            decode_array(cursor, depth, len as usize)
        }
        Marker::Array16 => {
            let len = cursor.read_u16::<BigEndian>().map_err(|_| DecodeError::UnexpectedEof)? as usize;
            depth.enter(len as u32)?;
            decode_array(cursor, depth, len)
        }
        Marker::Array32 => {
            let len = cursor.read_u32::<BigEndian>().map_err(|_| DecodeError::UnexpectedEof)? as usize;
            depth.enter(len as u32)?;
            decode_array(cursor, depth, len)
        }

        Marker::FixMap(len) => {
            depth.enter(2 * len as u32)?;
            decode_map(cursor, depth, len as usize)
        }
        Marker::Map16 => {
            let len = cursor.read_u16::<BigEndian>().map_err(|_| DecodeError::UnexpectedEof)? as usize;
            depth.enter(2 * len as u32)?;
            decode_map(cursor, depth, len)
        }
        Marker::Map32 => {
            let len = cursor.read_u32::<BigEndian>().map_err(|_| DecodeError::UnexpectedEof)? as usize;
            depth.enter(2 * len as u32)?;
            decode_map(cursor, depth, len)
        }

        Marker::FixExt1 => { depth.enter(0)?; decode_ext(cursor, 1) }
        Marker::FixExt2 => { depth.enter(0)?; decode_ext(cursor, 2) }
        Marker::FixExt4 => { depth.enter(0)?; decode_ext(cursor, 4) }
        Marker::FixExt8 => { depth.enter(0)?; decode_ext(cursor, 8) }
        Marker::FixExt16 => { depth.enter(0)?; decode_ext(cursor, 16) }
        Marker::Ext8 => {
            let len = read_u8(cursor)? as usize;
            depth.enter(0)?;
            decode_ext(cursor, len)
        }
        Marker::Ext16 => {
            let len = cursor.read_u16::<BigEndian>().map_err(|_| DecodeError::UnexpectedEof)? as usize;
            depth.enter(0)?;
            decode_ext(cursor, len)
        }
        Marker::Ext32 => {
            let len = cursor.read_u32::<BigEndian>().map_err(|_| DecodeError::UnexpectedEof)? as usize;
            depth.enter(0)?;
            decode_ext(cursor, len)
        }
    }
}

fn read_u8(cursor: &mut &[u8]) -> Result<u8, DecodeError> {
    cursor.read_u8().map_err(|_| DecodeError::UnexpectedEof)
}

fn read_i8(cursor: &mut &[u8]) -> Result<i8, DecodeError> {
    cursor.read_i8().map_err(|_| DecodeError::UnexpectedEof)
}

fn decode_str(cursor: &mut &[u8], len: usize) -> Result<Value, DecodeError> {
    let bytes = take(cursor, len)?;
    let s = std::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8)?;
    Ok(Value::String(s.to_string()))
}

fn decode_array(cursor: &mut &[u8], depth: &mut DepthTracker, len: usize) -> Result<Value, DecodeError> {
    let mut items = Vec::with_capacity(len.min(4096));
    for i in 0..len {
        items.push(decode_value(cursor, depth).map_err(|e| e.at_index(i))?);
    }
    Ok(Value::Array(items))
}

fn decode_map(cursor: &mut &[u8], depth: &mut DepthTracker, len: usize) -> Result<Value, DecodeError> {
    let mut pairs = Vec::with_capacity(len.min(4096));
    for _ in 0..len {
        let key = decode_value(cursor, depth)?;
        let value = decode_value(cursor, depth)?;
        pairs.push((key, value));
    }
    Ok(Value::Map(pairs))
}

fn decode_ext(cursor: &mut &[u8], len: usize) -> Result<Value, DecodeError> {
    let code = read_i8(cursor)?;
    let data = take(cursor, len)?.to_vec();
    Ok(Value::Extension(code, data))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn decodes_nil_and_bool() {
        assert_eq!(unpack_exact(&[0xc0]).unwrap(), Value::Nil);
        assert_eq!(unpack_exact(&[0xc2]).unwrap(), Value::Boolean(false));
        assert_eq!(unpack_exact(&[0xc3]).unwrap(), Value::Boolean(true));
    }

    #[test]
    fn decodes_posfixint_and_negfixint() {
        assert_eq!(unpack_exact(&[0x05]).unwrap().as_int().unwrap().as_u64(), Some(5));
        assert_eq!(unpack_exact(&[0xff]).unwrap().as_int().unwrap().as_i64(), Some(-1));
    }

    #[test]
    fn leniently_accepts_non_shortest_forms() {
        // 5 would canonically be a fixint, but a wide uint64 encoding is still legal input.
        let wide = [0xcf, 0, 0, 0, 0, 0, 0, 0, 5];
        assert_eq!(unpack_exact(&wide).unwrap().as_int().unwrap().as_u64(), Some(5));
    }

    #[test]
    fn accepts_float32_and_widens_to_f64() {
        let mut bytes = vec![0xca];
        bytes.extend_from_slice(&1.5f32.to_bits().to_be_bytes());
        assert_eq!(unpack_exact(&bytes).unwrap(), Value::Float(1.5));
    }

    #[test]
    fn rejects_reserved_marker() {
        assert_eq!(unpack_exact(&[0xc1]), Err(DecodeError::ReservedFormat(0xc1)));
    }

    #[test]
    fn rejects_invalid_utf8() {
        let bytes = [0xa1, 0xff];
        assert_eq!(unpack_exact(&bytes), Err(DecodeError::InvalidUtf8));
    }

    #[test]
    fn rejects_trailing_bytes() {
        let bytes = [0xc0, 0xc0];
        assert_eq!(unpack_exact(&bytes), Err(DecodeError::TrailingBytes(1)));
    }

    #[test]
    fn rejects_truncated_input() {
        assert_eq!(unpack_exact(&[0xcc]), Err(DecodeError::UnexpectedEof));
    }

    #[test]
    fn decodes_array_and_map() {
        let bytes = [0x92, 0x01, 0x02];
        let v = unpack_exact(&bytes).unwrap();
        assert_eq!(v.as_array().unwrap().len(), 2);

        let bytes = [0x81, 0xa1, b'a', 0x01];
        let v = unpack_exact(&bytes).unwrap();
        let pairs = v.as_map().unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0.as_str(), Some("a"));
    }

    #[test]
    fn decodes_fixext_timestamp() {
        let ts = crate::Timestamp::from_unix_seconds(100);
        let mut bytes = vec![0xd6, 0xff]; // FixExt4, type -1
        bytes.extend_from_slice(&ts.encode());
        let v = unpack_exact(&bytes).unwrap();
        assert_eq!(v.as_timestamp(), Some(ts));
    }

    #[test]
    fn deep_array_nesting_trips_depth_guard() {
        // [[[[...]]]]: MAX_DEPTH + 1 nested single-element fixarrays.
        let mut bytes = Vec::new();
        for _ in 0..(crate::depth_tracking::MAX_DEPTH + 2) {
            bytes.push(0x91); // FixArray(1)
        }
        bytes.push(0xc0);
        assert_eq!(unpack_exact(&bytes), Err(DecodeError::DepthLimitExceeded));
    }
}
