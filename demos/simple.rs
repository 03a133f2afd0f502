//! End-to-end walkthrough: build a `Codec` for a small record type, pack it
//! to MessagePack bytes, and unpack it back.

use msgpack_codec::codec::{int, list, nullable, object4, string, Field};
use msgpack_codec::{format_error, unpack_exact};

struct User {
    id: i64,
    name: String,
    email: Option<String>,
    tags: Vec<String>,
}

fn user_codec() -> msgpack_codec::Codec<User> {
    object4(
        |id, name, email, tags| User { id, name, email, tags },
        Field::new("id", int(), |u: &User| u.id),
        Field::new("name", string(), |u: &User| u.name.clone()),
        Field::new("email", nullable(string()), |u: &User| u.email.clone()),
        Field::new("tags", list(string()), |u: &User| u.tags.clone()),
    )
}

fn main() {
    let codec = user_codec();

    let bob = User {
        id: 1,
        name: "Bob".to_string(),
        email: None,
        tags: vec!["admin".to_string(), "active".to_string()],
    };

    let bytes = codec.pack(&bob).expect("encoding a Value tree never fails");
    println!("packed {} bytes: {:02x?}", bytes.len(), bytes);

    let decoded = codec.unpack(&bytes).expect("bytes we just packed always decode");
    println!("decoded user #{}: {} (tags: {:?})", decoded.id, decoded.name, decoded.tags);

    // A malformed document, missing the required "name" field, produces a
    // diagnostic with a JSON-Pointer-like path to the problem.
    let raw = unpack_exact(&msgpack_codec::pack(&msgpack_codec::Value::Map(vec![(
        msgpack_codec::Value::String("id".to_string()),
        msgpack_codec::Value::Integer(msgpack_codec::Integer::from(2u8)),
    )])).unwrap())
    .unwrap();
    match codec.decode(&raw) {
        Ok(_) => unreachable!("id-only document is missing required fields"),
        Err(e) => println!("expected failure: {}", format_error(&e)),
    }
}
