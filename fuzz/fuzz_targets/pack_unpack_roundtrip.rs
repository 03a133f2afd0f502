#![no_main]
use libfuzzer_sys::fuzz_target;
use msgpack_codec::{pack, unpack};

// Any `Value` this crate can decode, it must also be able to re-encode and
// decode again to the same value -- `pack` is canonical, so the second
// decode must agree with the first even when the original bytes weren't.
fuzz_target!(|data: &[u8]| {
    if let Ok((value, _rest)) = unpack(data) {
        let repacked = pack(&value).expect("a decoded Value always re-encodes");
        let (roundtripped, rest) = unpack(&repacked).expect("freshly packed bytes always decode");
        assert!(rest.is_empty());
        assert_eq!(value, roundtripped);
    }
});
