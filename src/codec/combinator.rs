//! Combinators that transform or compose existing codecs, rather than
//! bottoming out on a `Value` shape themselves.

use crate::codec::Codec;
use crate::error::DecodeError;
use crate::value::Value;

/// Bijective transform: `f` maps decoded `B` to the application type `A`, `g`
/// maps back. Infallible both ways — use [`try_map`] if constructing `A`
/// from `B` can fail.
pub fn map<A, B, F, G>(c: Codec<B>, f: F, g: G) -> Codec<A>
where
    A: Send + Sync + 'static,
    B: Send + Sync + 'static,
    F: Fn(B) -> A + Send + Sync + 'static,
    G: Fn(&A) -> B + Send + Sync + 'static,
{
    Codec::new(
        move |a: &A| c.encode(&g(a)),
        move |v: &Value| c.decode(v).map(&f),
    )
}

/// Decoder-fallible transform: like [`map`], but `f` may reject the decoded
/// `B` and fail with its own [`DecodeError`].
pub fn try_map<A, B, F, G>(c: Codec<B>, f: F, g: G) -> Codec<A>
where
    A: Send + Sync + 'static,
    B: Send + Sync + 'static,
    F: Fn(B) -> Result<A, DecodeError> + Send + Sync + 'static,
    G: Fn(&A) -> B + Send + Sync + 'static,
{
    Codec::new(
        move |a: &A| c.encode(&g(a)),
        move |v: &Value| c.decode(v).and_then(&f),
    )
}

/// Tries each codec's decoder in order, returning the first success. The
/// encoder always uses the first codec in the list (§9 Open Question: this
/// crate does not attempt to pick the alternative that would most faithfully
/// re-decode the value — that's the documented behavior, not a bug).
///
/// # Panics
/// If `codecs` is empty.
pub fn one_of<T>(codecs: Vec<Codec<T>>) -> Codec<T>
where
    T: Send + Sync + 'static,
{
    assert!(!codecs.is_empty(), "one_of requires at least one codec");
    Codec::new(
        move |v: &T| codecs[0].encode(v),
        move |v: &Value| {
            let mut errors = Vec::with_capacity(codecs.len());
            for c in &codecs {
                match c.decode(v) {
                    Ok(t) => return Ok(t),
                    Err(e) => errors.push(e),
                }
            }
            Err(DecodeError::AllFailed(errors))
        },
    )
}

/// Decode falls back to `default` on any failure of `c`'s decoder (including
/// when the value is `Nil`); the encoder is unaffected.
pub fn with_default<T>(c: Codec<T>, default: T) -> Codec<T>
where
    T: Clone + Send + Sync + 'static,
{
    Codec::new(
        move |v: &T| c.encode(v),
        move |v: &Value| Ok(c.decode(v).unwrap_or_else(|_| default.clone())),
    )
}

/// A codec that always encodes `Nil` and always decodes to a clone of `value`,
/// ignoring its input entirely.
pub fn succeed<T>(value: T) -> Codec<T>
where
    T: Clone + Send + Sync + 'static,
{
    Codec::new(move |_: &T| Value::Nil, move |_: &Value| Ok(value.clone()))
}

/// A codec whose decoder always fails with `CustomError(msg)`. Its encoder is
/// never meaningfully reachable in practice but must still produce a `Value`;
/// it emits `Nil`.
pub fn fail<T>(msg: impl Into<String>) -> Codec<T>
where
    T: Send + Sync + 'static,
{
    let msg = msg.into();
    Codec::new(
        move |_: &T| Value::Nil,
        move |_: &Value| Err(DecodeError::CustomError(msg.clone())),
    )
}

/// Defers construction of the inner codec until first use on each side,
/// breaking the definition cycle a self-referential `Codec<T>` would
/// otherwise require. `make` is called once per `encode`/`decode` call, not
/// memoized — see DESIGN.md for why that's the right tradeoff here.
pub fn lazy<T, F>(make: F) -> Codec<T>
where
    T: Send + Sync + 'static,
    F: Fn() -> Codec<T> + Send + Sync + 'static,
{
    Codec::new(
        move |v: &T| make().encode(v),
        move |v: &Value| make().decode(v),
    )
}
