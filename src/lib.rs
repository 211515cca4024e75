//! Schema-directed JSON unmarshaling for protobuf-style messages.
//!
//! The decoder walks a parsed JSON value under the direction of a message
//! descriptor and produces a typed [`value::MessageValue`], or a single
//! error whose rendering pinpoints the exact field path from the document
//! root to the offending value, e.g.
//! `unparsable field someEmbedded.someValue: cannot parse "x" as int64 ...`.

pub mod descriptor;
pub mod error;
pub mod testutil;
pub mod unmarshal;
pub mod value;
mod value_util;

pub use crate::error::{field_error, Error};
pub use crate::unmarshal::Unmarshaler;
pub use crate::value::{MapKey, MessageValue, Value};

use crate::descriptor::SchemaProvider;
use std::io;

/// Unmarshals a single JSON value from `reader` with a default
/// [`Unmarshaler`] (unknown fields disallowed).
pub fn unmarshal<R: io::Read>(
    reader: R,
    provider: &dyn SchemaProvider,
    message_type: &str,
) -> Result<MessageValue, Error> {
    Unmarshaler::default().unmarshal(reader, provider, message_type)
}

/// Unmarshals a message from a JSON string with a default [`Unmarshaler`].
pub fn unmarshal_str(
    json: &str,
    provider: &dyn SchemaProvider,
    message_type: &str,
) -> Result<MessageValue, Error> {
    Unmarshaler::default().unmarshal_str(json, provider, message_type)
}

/// Unmarshals the next message from a JSON value stream with a default
/// [`Unmarshaler`].
pub fn unmarshal_next<'de, R>(
    stream: &mut serde_json::StreamDeserializer<'de, R, serde_json::Value>,
    provider: &dyn SchemaProvider,
    message_type: &str,
) -> Result<MessageValue, Error>
where
    R: serde_json::de::Read<'de>,
{
    Unmarshaler::default().unmarshal_next(stream, provider, message_type)
}
