#![no_main]
use libfuzzer_sys::fuzz_target;
use msgpack_codec::unpack;

// The decoder must never panic on arbitrary input, valid or not.
fuzz_target!(|data: &[u8]| {
    let _ = unpack(data);
});
