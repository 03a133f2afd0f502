//! The built-in Timestamp extension (type code -1): a plain Unix-epoch
//! `(seconds, nanoseconds)` pair, packed into whichever of the format's three
//! fixed layouts is smallest for the value at hand.
//!
//! Encoding writes through `to_be_bytes()` + `extend_from_slice` rather than
//! `byteorder::WriteBytesExt`, since a `Vec<u8>` can't fail to be written to;
//! decoding keeps `byteorder::ReadBytesExt`, where truncated input is a real
//! error worth propagating.

use std::cmp;
use std::convert::TryFrom;
use std::fmt;

use byteorder::{BigEndian, ReadBytesExt};

const NANOS_PER_SEC: u32 = 1_000_000_000;

/// A point in time: a signed count of seconds since the Unix epoch, plus a
/// nanosecond fraction in `[0, 999_999_999]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Timestamp {
    seconds: i64,
    nanoseconds: u32,
}

impl Timestamp {
    /// Build a timestamp from a seconds/nanoseconds pair. Fails if `nanoseconds`
    /// is `1_000_000_000` or more.
    pub fn new(seconds: i64, nanoseconds: u32) -> Option<Timestamp> {
        if nanoseconds >= NANOS_PER_SEC {
            return None;
        }
        Some(Timestamp { seconds, nanoseconds })
    }

    /// Build a timestamp from a whole number of Unix-epoch seconds.
    pub fn from_unix_seconds(seconds: i64) -> Timestamp {
        Timestamp { seconds, nanoseconds: 0 }
    }

    /// Build a timestamp from a Unix-epoch millisecond count.
    pub fn from_unix_millis(millis: i64) -> Timestamp {
        let seconds = millis.div_euclid(1_000);
        let nanoseconds = (millis.rem_euclid(1_000) as u32) * 1_000_000;
        Timestamp { seconds, nanoseconds }
    }

    /// Whole seconds since the Unix epoch.
    pub fn to_unix_seconds(&self) -> i64 {
        self.seconds
    }

    /// Milliseconds since the Unix epoch, truncating any remaining nanoseconds.
    pub fn to_unix_millis(&self) -> i64 {
        self.seconds * 1_000 + (self.nanoseconds / 1_000_000) as i64
    }

    /// The nanosecond fraction of the second.
    pub fn subsec_nanos(&self) -> u32 {
        self.nanoseconds
    }

    /// Encode in the smallest of the three Timestamp wire layouts.
    ///
    /// - Timestamp-32 (4 bytes): `nanoseconds == 0` and `seconds` fits in `u32`.
    /// - Timestamp-64 (8 bytes): `seconds` fits in 34 bits (unsigned).
    /// - Timestamp-96 (12 bytes): otherwise, full-width `i64` seconds.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size());
        self.encode_into(&mut out);
        out
    }

    pub(crate) fn encode_into(&self, out: &mut Vec<u8>) {
        if self.nanoseconds == 0 && self.seconds >= 0 && self.seconds <= u32::MAX as i64 {
            out.extend_from_slice(&(self.seconds as u32).to_be_bytes());
        } else if self.seconds >= 0 && self.seconds < (1i64 << 34) {
            let packed = ((self.nanoseconds as u64) << 34) | (self.seconds as u64);
            out.extend_from_slice(&packed.to_be_bytes());
        } else {
            out.extend_from_slice(&self.nanoseconds.to_be_bytes());
            out.extend_from_slice(&self.seconds.to_be_bytes());
        }
    }

    /// Number of bytes [`encode`](Self::encode) will produce.
    pub fn size(&self) -> usize {
        if self.nanoseconds == 0 && self.seconds >= 0 && self.seconds <= u32::MAX as i64 {
            4
        } else if self.seconds >= 0 && self.seconds < (1i64 << 34) {
            8
        } else {
            12
        }
    }
}

impl cmp::Ord for Timestamp {
    fn cmp(&self, other: &Timestamp) -> cmp::Ordering {
        match self.seconds.cmp(&other.seconds) {
            cmp::Ordering::Equal => self.nanoseconds.cmp(&other.nanoseconds),
            other => other,
        }
    }
}

impl cmp::PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Timestamp) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{:09}s since epoch", self.seconds, self.nanoseconds)
    }
}

impl TryFrom<&[u8]> for Timestamp {
    type Error = String;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let mut raw = value;
        let (seconds, nanoseconds) = match value.len() {
            4 => {
                let seconds = raw.read_u32::<BigEndian>().unwrap() as i64;
                (seconds, 0)
            }
            8 => {
                let packed = raw.read_u64::<BigEndian>().unwrap();
                let seconds = (packed & 0x3_ffff_ffff) as i64;
                let nanoseconds = (packed >> 34) as u32;
                (seconds, nanoseconds)
            }
            12 => {
                let nanoseconds = raw.read_u32::<BigEndian>().unwrap();
                let seconds = raw.read_i64::<BigEndian>().unwrap();
                (seconds, nanoseconds)
            }
            n => return Err(format!("not a recognized Timestamp length ({} bytes)", n)),
        };
        if nanoseconds >= NANOS_PER_SEC {
            return Err(format!("nanoseconds {} out of range", nanoseconds));
        }
        Ok(Timestamp { seconds, nanoseconds })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn edge_cases() -> Vec<(usize, Timestamp)> {
        vec![
            (4, Timestamp::new(0, 0).unwrap()),
            (4, Timestamp::new(1, 0).unwrap()),
            (8, Timestamp::new(1, 1).unwrap()),
            (4, Timestamp::new(u32::MAX as i64, 0).unwrap()),
            (8, Timestamp::new(u32::MAX as i64 + 1, 0).unwrap()),
            (8, Timestamp::new((1i64 << 34) - 1, 999_999_999).unwrap()),
            (12, Timestamp::new(1i64 << 34, 0).unwrap()),
            (12, Timestamp::new(-1, 0).unwrap()),
            (12, Timestamp::new(i64::MIN, 1).unwrap()),
        ]
    }

    #[test]
    fn roundtrip_and_smallest_encoding() {
        for (index, (len, case)) in edge_cases().into_iter().enumerate() {
            let enc = case.encode();
            assert_eq!(enc.len(), len, "case #{index}: {case}");
            assert_eq!(enc.len(), case.size());
            let decoded = Timestamp::try_from(enc.as_slice()).unwrap();
            assert_eq!(decoded, case);
        }
    }

    #[test]
    fn rejects_nanoseconds_overflow() {
        assert!(Timestamp::new(0, 1_000_000_000).is_none());
    }

    #[test]
    fn rejects_bad_lengths() {
        assert!(Timestamp::try_from([0u8; 5].as_slice()).is_err());
        assert!(Timestamp::try_from([0u8; 0].as_slice()).is_err());
    }

    #[test]
    fn millis_roundtrip() {
        let t = Timestamp::from_unix_millis(-1500);
        assert_eq!(t.to_unix_seconds(), -2);
        assert_eq!(t.subsec_nanos(), 500_000_000);
        assert_eq!(t.to_unix_millis(), -1500);
    }
}
