use crate::descriptor::SchemaProvider;
use crate::error::Error;
use crate::value::MessageValue;
use crate::value_util::Decoder;
use log::debug;
use std::io;

/// A configurable object for converting a JSON representation into a typed
/// message value. Read-only during a decode, so a single instance may be
/// shared by concurrent decode calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unmarshaler {
    /// Whether to allow messages to contain unknown fields, as opposed to
    /// failing to unmarshal.
    pub allow_unknown_fields: bool,
}

impl Unmarshaler {
    /// Unmarshals a single top-level JSON value from `reader` into an
    /// instance of `message_type`.
    pub fn unmarshal<R: io::Read>(
        &self,
        reader: R,
        provider: &dyn SchemaProvider,
        message_type: &str,
    ) -> Result<MessageValue, Error> {
        let mut stream = serde_json::Deserializer::from_reader(reader).into_iter();
        self.unmarshal_next(&mut stream, provider, message_type)
    }

    /// Unmarshals a message from a JSON string.
    pub fn unmarshal_str(
        &self,
        json: &str,
        provider: &dyn SchemaProvider,
        message_type: &str,
    ) -> Result<MessageValue, Error> {
        self.unmarshal(json.as_bytes(), provider, message_type)
    }

    /// Unmarshals the next message from a JSON value stream. Each call
    /// consumes exactly one JSON value and leaves the stream positioned at
    /// the next.
    pub fn unmarshal_next<'de, R>(
        &self,
        stream: &mut serde_json::StreamDeserializer<'de, R, serde_json::Value>,
        provider: &dyn SchemaProvider,
        message_type: &str,
    ) -> Result<MessageValue, Error>
    where
        R: serde_json::de::Read<'de>,
    {
        let raw = stream.next().ok_or(Error::UnexpectedEndOfInput)??;
        debug!("unmarshaling {} from a JSON value", message_type);

        let decoder = Decoder {
            provider,
            allow_unknown_fields: self.allow_unknown_fields,
        };
        decoder.decode_message_by_name(message_type, raw)
    }
}
