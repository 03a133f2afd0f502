//! Record builders: `objectN` assembles a `Codec<R>` for a struct `R` out of
//! per-field codecs, encoding to (and decoding from) a `Value::Map` with one
//! entry per field.

use std::sync::Arc;

use crate::codec::Codec;
use crate::error::DecodeError;
use crate::value::Value;

/// Binds a wire field name to a `Codec<F>` and an accessor that pulls `F` out
/// of the containing record `R`. The record-builder primitive: `objectN` is
/// built entirely out of these.
pub struct Field<R, F> {
    name: &'static str,
    codec: Codec<F>,
    accessor: Arc<dyn Fn(&R) -> F + Send + Sync>,
}

impl<R, F> Field<R, F> {
    /// Build a field binding: `name` is the wire key, `codec` maps `F` to and
    /// from `Value`, `accessor` reads `F` out of a `&R`.
    pub fn new<A>(name: &'static str, codec: Codec<F>, accessor: A) -> Field<R, F>
    where
        A: Fn(&R) -> F + Send + Sync + 'static,
    {
        Field {
            name,
            codec,
            accessor: Arc::new(accessor),
        }
    }
}

impl<R, F> Clone for Field<R, F> {
    fn clone(&self) -> Self {
        Field {
            name: self.name,
            codec: self.codec.clone(),
            accessor: self.accessor.clone(),
        }
    }
}

fn find_field<'a>(pairs: &'a [(Value, Value)], name: &str) -> Option<&'a Value> {
    pairs.iter().find(|(k, _)| k.as_str() == Some(name)).map(|(_, v)| v)
}

fn decode_field<R, F>(pairs: &[(Value, Value)], field: &Field<R, F>) -> Result<F, DecodeError> {
    match find_field(pairs, field.name) {
        Some(v) => field.codec.decode(v).map_err(|e| e.in_field(field.name)),
        None => Err(DecodeError::MissingField(field.name.to_string())),
    }
}

macro_rules! object_n {
    ($fn_name:ident, $($f:ident : $ft:ident),+) => {
        /// Builds a `Codec<R>` from a constructor and one [`Field`] per struct
        /// field. Encoder emits a `Map` with one entry per field, in
        /// declaration order. Decoder requires a `Map`, looks up each field by
        /// name (first match wins on duplicate keys), wraps any sub-error in
        /// `FieldError(name, ...)`, and fails with `MissingField(name)` if a
        /// key is absent. Unknown extra keys in the input are ignored.
        pub fn $fn_name<R, $($ft),+, C>(
            constructor: C,
            $($f: Field<R, $ft>),+
        ) -> Codec<R>
        where
            R: Send + Sync + 'static,
            $($ft: Send + Sync + 'static),+,
            C: Fn($($ft),+) -> R + Send + Sync + 'static,
        {
            let decode_fields = ($($f.clone()),+,);
            Codec::new(
                move |r: &R| {
                    Value::Map(vec![
                        $((Value::String($f.name.to_string()), $f.codec.encode(&($f.accessor)(r)))),+
                    ])
                },
                move |v: &Value| match v {
                    Value::Map(pairs) => {
                        let ($($f),+,) = &decode_fields;
                        $(let $f = decode_field(pairs, $f)?;)+
                        Ok(constructor($($f),+))
                    }
                    other => Err(DecodeError::type_mismatch("Map", other.type_name())),
                },
            )
        }
    };
}

object_n!(object1, f1: F1);
object_n!(object2, f1: F1, f2: F2);
object_n!(object3, f1: F1, f2: F2, f3: F3);
object_n!(object4, f1: F1, f2: F2, f3: F3, f4: F4);
object_n!(object5, f1: F1, f2: F2, f3: F3, f4: F4, f5: F5);
object_n!(object6, f1: F1, f2: F2, f3: F3, f4: F4, f5: F5, f6: F6);
object_n!(object7, f1: F1, f2: F2, f3: F3, f4: F4, f5: F5, f6: F6, f7: F7);
object_n!(object8, f1: F1, f2: F2, f3: F3, f4: F4, f5: F5, f6: F6, f7: F7, f8: F8);

#[cfg(test)]
mod test {
    use super::*;
    use crate::codec::container::{list, nullable};
    use crate::codec::primitive::{int, string};

    #[derive(Clone, Debug, PartialEq)]
    struct User {
        id: i64,
        name: String,
        email: Option<String>,
        tags: Vec<String>,
    }

    fn user_codec() -> Codec<User> {
        object4(
            |id, name, email, tags| User { id, name, email, tags },
            Field::new("id", int(), |u: &User| u.id),
            Field::new("name", string(), |u: &User| u.name.clone()),
            Field::new("email", nullable(string()), |u: &User| u.email.clone()),
            Field::new("tags", list(string()), |u: &User| u.tags.clone()),
        )
    }

    #[test]
    fn user_round_trips() {
        let u = User {
            id: 1,
            name: "Bob".to_string(),
            email: None,
            tags: vec!["admin".to_string(), "active".to_string()],
        };
        let c = user_codec();
        assert_eq!(c.decode(&c.encode(&u)), Ok(u));
    }

    #[test]
    fn missing_field_errors() {
        let c = user_codec();
        let v = Value::Map(vec![
            (Value::String("id".into()), Value::Integer(crate::Integer::from(1u8))),
        ]);
        assert_eq!(c.decode(&v), Err(DecodeError::MissingField("name".to_string())));
    }

    #[test]
    fn field_type_mismatch_carries_name() {
        let c = object2(
            |name: String, age: i64| (name, age),
            Field::new("name", string(), |p: &(String, i64)| p.0.clone()),
            Field::new("age", int(), |p: &(String, i64)| p.1),
        );
        let v = Value::Map(vec![
            (Value::String("name".into()), Value::String("a".into())),
            (Value::String("age".into()), Value::String("old".into())),
        ]);
        let err = c.decode(&v).unwrap_err();
        assert_eq!(crate::format::format_error(&err), "at $.age: expected Integer, got String");
    }

    #[test]
    fn unknown_extra_fields_are_ignored() {
        let c = object1(
            |id: i64| id,
            Field::new("id", int(), |id: &i64| *id),
        );
        let v = Value::Map(vec![
            (Value::String("id".into()), Value::Integer(crate::Integer::from(1u8))),
            (Value::String("extra".into()), Value::Nil),
        ]);
        assert_eq!(c.decode(&v), Ok(1));
    }

    #[test]
    fn duplicate_keys_first_match_wins() {
        let c = object1(
            |id: i64| id,
            Field::new("id", int(), |id: &i64| *id),
        );
        let v = Value::Map(vec![
            (Value::String("id".into()), Value::Integer(crate::Integer::from(1u8))),
            (Value::String("id".into()), Value::Integer(crate::Integer::from(2u8))),
        ]);
        assert_eq!(c.decode(&v), Ok(1));
    }
}
