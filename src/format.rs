//! Turns a [`DecodeError`] into a single human-readable line with a
//! JSON-Pointer-like path (`$.a.b[3].c`) showing where in the document the
//! failure occurred.

use crate::error::DecodeError;

/// Render `err` as `"at <path>: <message>"`, e.g. `"at $.users[2].name:
/// expected String, got Integer"`. If `err` is a bare leaf with no wrapping
/// `FieldError`/`IndexError`, there is no location to report and the
/// message is emitted with no `"at ..."` prefix at all.
pub fn format_error(err: &DecodeError) -> String {
    let mut path = String::from("$");
    let leaf = walk(err, &mut path);
    if path == "$" {
        leaf_text(leaf)
    } else {
        format!("at {}: {}", path, leaf_text(leaf))
    }
}

fn walk<'a>(err: &'a DecodeError, path: &mut String) -> &'a DecodeError {
    match err {
        DecodeError::FieldError(name, inner) => {
            path.push('.');
            path.push_str(name);
            walk(inner, path)
        }
        DecodeError::IndexError(index, inner) => {
            path.push('[');
            path.push_str(&index.to_string());
            path.push(']');
            walk(inner, path)
        }
        other => other,
    }
}

/// Render just the leaf message of `err`, with no path prefix. `DecodeError`'s
/// `Display` impl delegates to this so a bare leaf and a wrapped error agree
/// on wording for the part they share.
pub(crate) fn leaf_text(err: &DecodeError) -> String {
    match err {
        DecodeError::UnexpectedEof => "unexpected end of input".to_string(),
        DecodeError::InvalidFormat(byte) => format!("byte 0x{:02x} is not a valid format marker", byte),
        DecodeError::InvalidUtf8 => "string payload is not valid UTF-8".to_string(),
        DecodeError::IntegerOverflow => "integer could not be losslessly decoded".to_string(),
        DecodeError::ReservedFormat(byte) => format!("byte 0x{:02x} is a reserved format marker", byte),
        DecodeError::TrailingBytes(n) => format!("{} trailing byte(s) after the decoded value", n),
        DecodeError::DepthLimitExceeded => "nesting depth limit exceeded".to_string(),
        DecodeError::TypeMismatch { expected, got } => format!("expected {}, got {}", expected, got),
        DecodeError::MissingField(name) => format!("missing field \"{}\"", name),
        DecodeError::ExtensionTypeMismatch { expected, got } => {
            format!("expected extension type {}, got {}", expected, got)
        }
        DecodeError::OutOfRange(msg) => msg.clone(),
        DecodeError::CustomError(msg) => msg.clone(),
        DecodeError::FieldError(_, inner) | DecodeError::IndexError(_, inner) => leaf_text(inner),
        DecodeError::AllFailed(errs) => {
            let parts: Vec<String> = errs.iter().map(format_error).collect();
            format!("all alternatives failed: [{}]", parts.join(", "))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bare_leaf_has_no_prefix() {
        let err = DecodeError::type_mismatch("Integer", "String");
        assert_eq!(format_error(&err), "expected Integer, got String");
    }

    #[test]
    fn field_and_index_compose_a_path() {
        let err = DecodeError::type_mismatch("Integer", "String")
            .at_index(3)
            .in_field("b")
            .in_field("a");
        assert_eq!(format_error(&err), "at $.a.b[3]: expected Integer, got String");
    }

    #[test]
    fn missing_field_message() {
        let err = DecodeError::MissingField("name".to_string()).in_field("user");
        assert_eq!(format_error(&err), "at $.user: missing field \"name\"");
    }

    #[test]
    fn all_failed_lists_each_alternative() {
        let err = DecodeError::AllFailed(vec![
            DecodeError::type_mismatch("Integer", "String"),
            DecodeError::type_mismatch("Boolean", "String"),
        ]);
        assert_eq!(
            format_error(&err),
            "all alternatives failed: [expected Integer, got String, expected Boolean, got String]"
        );
    }
}
