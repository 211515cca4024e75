use itertools::Itertools;
use thiserror;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    InvalidJson(#[from] serde_json::Error),
    #[error("unexpected end of JSON input")]
    UnexpectedEndOfInput,
    #[error("unknown type name: {}", .type_name)]
    UnresolvedTypeName { type_name: String },
    #[error("cannot assign {found} to {target}")]
    WrongValueKind { found: &'static str, target: String },
    #[error("cannot parse {literal} as {target}")]
    BadNumber {
        literal: String,
        target: &'static str,
    },
    #[error("cannot parse {literal:?} as {target} while looking for an integer in a string")]
    BadQuotedNumber {
        literal: String,
        target: &'static str,
    },
    #[error("unknown value {value:?} for enum {enum_name}")]
    UnknownEnumValue { value: String, enum_name: String },
    #[error("bad Duration: {literal:?}")]
    BadDuration { literal: String },
    #[error("bad Timestamp: {literal:?}")]
    BadTimestamp { literal: String },
    #[error("unmarshaling Any not supported")]
    AnyNotSupported,
    #[error("invalid base64 in bytes field")]
    InvalidBase64(#[from] base64::DecodeError),
    #[error("field kind cannot be used as a map key")]
    InvalidMapKeyKind,
    #[error("fields [{}] do not exist in set of known fields [{}]", .unknown.iter().join(" "), .known.iter().join(" "))]
    UnknownFields {
        unknown: Vec<String>,
        known: Vec<String>,
    },
    #[error("unparsable field {}: {}", .field_stack.iter().join("."), .nested)]
    Field {
        field_stack: Vec<String>,
        nested: Box<Error>,
    },
}

/// Wraps an error with an enclosing field label. A leaf error becomes a path
/// error with a single segment; an existing path error gets the label
/// prepended, so nested callers build one root-to-leaf path without
/// re-traversal.
pub fn field_error(field_name: impl Into<String>, err: Error) -> Error {
    match err {
        Error::Field {
            mut field_stack,
            nested,
        } => {
            field_stack.insert(0, field_name.into());
            Error::Field {
                field_stack,
                nested,
            }
        }
        leaf => Error::Field {
            field_stack: vec![field_name.into()],
            nested: Box::new(leaf),
        },
    }
}
