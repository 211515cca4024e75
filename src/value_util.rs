use crate::descriptor::{
    FieldDescriptor, FieldKind, MessageDescriptor, SchemaProvider, WellKnownType,
};
use crate::error::{field_error, Error};
use crate::value::{MapKey, MessageValue, Value};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use log::trace;
use serde_json::Map as JsonMap;
use std::collections::BTreeMap;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

const NANOS_PER_SEC: i128 = 1_000_000_000;

/// The recursive, schema-directed dispatcher. Read-only during a decode; one
/// instance may serve concurrent decode calls.
pub(crate) struct Decoder<'a> {
    pub provider: &'a dyn SchemaProvider,
    pub allow_unknown_fields: bool,
}

impl Decoder<'_> {
    pub fn decode_message_by_name(
        &self,
        type_name: &str,
        raw: serde_json::Value,
    ) -> Result<MessageValue, Error> {
        if let Some(well_known) = WellKnownType::from_full_name(type_name) {
            return self.decode_well_known(type_name, well_known, raw);
        }

        let descriptor =
            self.provider
                .message_by_name(type_name)
                .ok_or_else(|| Error::UnresolvedTypeName {
                    type_name: type_name.to_string(),
                })?;
        self.decode_message(descriptor, raw)
    }

    pub fn decode_value(&self, kind: &FieldKind, raw: serde_json::Value) -> Result<Value, Error> {
        match kind {
            FieldKind::Message(type_name) => self
                .decode_message_by_name(type_name, raw)
                .map(Value::Message),
            FieldKind::Enum(type_name) => self.decode_enum(type_name, raw),
            FieldKind::List(element) => self.decode_list(element, raw),
            FieldKind::Map { key, value } => self.decode_map(key, value, raw),
            FieldKind::Double => double_from(raw).map(Value::Double),
            FieldKind::Float => float_from(raw).map(Value::Float),
            FieldKind::Int32 => int32_from(raw).map(Value::Int32),
            FieldKind::Int64 => int64_from(raw).map(Value::Int64),
            FieldKind::Uint32 => uint32_from(raw).map(Value::Uint32),
            FieldKind::Uint64 => uint64_from(raw).map(Value::Uint64),
            FieldKind::Bool => bool_from(raw).map(Value::Bool),
            FieldKind::String => string_from(raw).map(Value::String),
            FieldKind::Bytes => bytes_from(raw).map(Value::Bytes),
        }
    }

    fn decode_well_known(
        &self,
        type_name: &str,
        well_known: WellKnownType,
        raw: serde_json::Value,
    ) -> Result<MessageValue, Error> {
        match well_known {
            WellKnownType::Any => Err(Error::AnyNotSupported),
            WellKnownType::Duration => decode_duration(raw),
            WellKnownType::Timestamp => decode_timestamp(raw),
            WellKnownType::Wrapper(inner_kind) => {
                // Wrappers use the same representation as the wrapped
                // primitive, except that null is allowed.
                let mut message = MessageValue::new(type_name);
                message.set_field("value", self.decode_value(&inner_kind, raw)?);
                Ok(message)
            }
        }
    }

    fn decode_message(
        &self,
        descriptor: &MessageDescriptor,
        raw: serde_json::Value,
    ) -> Result<MessageValue, Error> {
        let mut remaining = match raw {
            serde_json::Value::Object(mapping) => mapping,
            other => {
                return Err(Error::WrongValueKind {
                    found: json_kind(&other),
                    target: format!("message {}", descriptor.name),
                })
            }
        };

        trace!("decoding message {}", descriptor.name);

        let mut message = MessageValue::new(&descriptor.name);
        for field in &descriptor.fields {
            if field.is_internal {
                continue;
            }
            let raw_field = match consume_field(&mut remaining, field) {
                Some(value) => value,
                None => continue,
            };
            if raw_field.is_null() {
                // explicit null leaves the field at its default state
                continue;
            }
            let value = self
                .decode_value(&field.kind, raw_field)
                .map_err(|err| field_error(field.original_name.as_str(), err))?;
            message.set_field(field.original_name.clone(), value);
        }

        if !remaining.is_empty() {
            for oneof in &descriptor.oneofs {
                let mut populated = false;
                for alternative in &oneof.alternatives {
                    let raw_alternative = match consume_field(&mut remaining, alternative) {
                        Some(value) => value,
                        None => continue,
                    };
                    if populated {
                        // first alternative in declaration order wins; keys of
                        // later alternatives are consumed but ignored
                        continue;
                    }
                    let value = self
                        .decode_value(&alternative.kind, raw_alternative)
                        .map_err(|err| field_error(alternative.original_name.as_str(), err))?;
                    message.set_field(alternative.original_name.clone(), value);
                    populated = true;
                }
            }
        }

        if !self.allow_unknown_fields && !remaining.is_empty() {
            return Err(field_mismatch_error(&remaining, descriptor));
        }

        Ok(message)
    }

    fn decode_enum(&self, type_name: &str, raw: serde_json::Value) -> Result<Value, Error> {
        match raw {
            serde_json::Value::String(value_name) => {
                let descriptor = self.provider.enum_by_name(type_name).ok_or_else(|| {
                    Error::UnresolvedTypeName {
                        type_name: type_name.to_string(),
                    }
                })?;
                match descriptor.number(&value_name) {
                    Some(number) => Ok(Value::Enum(number)),
                    None => Err(Error::UnknownEnumValue {
                        value: value_name,
                        enum_name: descriptor.name.clone(),
                    }),
                }
            }
            // enums also accept their numeric encoding
            other => int32_from(other).map(Value::Enum),
        }
    }

    fn decode_list(&self, element: &FieldKind, raw: serde_json::Value) -> Result<Value, Error> {
        let items = match raw {
            serde_json::Value::Array(items) => items,
            other => {
                return Err(Error::WrongValueKind {
                    found: json_kind(&other),
                    target: "list field".to_string(),
                })
            }
        };

        let mut out = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let value = self
                .decode_value(element, item)
                .map_err(|err| field_error(format!("[{}]", index), err))?;
            out.push(value);
        }
        Ok(Value::List(out))
    }

    fn decode_map(
        &self,
        key_kind: &FieldKind,
        value_kind: &FieldKind,
        raw: serde_json::Value,
    ) -> Result<Value, Error> {
        let entries = match raw {
            serde_json::Value::Object(entries) => entries,
            other => {
                return Err(Error::WrongValueKind {
                    found: json_kind(&other),
                    target: "map field".to_string(),
                })
            }
        };

        let mut out = BTreeMap::new();
        for (key_text, raw_value) in entries {
            let key = self
                .decode_map_key(key_kind, &key_text)
                .map_err(|err| field_error(format!("['{}']key", key_text), err))?;
            let value = self
                .decode_value(value_kind, raw_value)
                .map_err(|err| field_error(format!("['{}']value", key_text), err))?;
            out.insert(key, value);
        }
        Ok(Value::Map(out))
    }

    fn decode_map_key(&self, kind: &FieldKind, key_text: &str) -> Result<MapKey, Error> {
        if let FieldKind::String = kind {
            // the parser already decoded the key into a string; other key
            // kinds were quoted post-serialization and need a re-parse
            return Ok(MapKey::String(key_text.to_string()));
        }

        let raw: serde_json::Value = serde_json::from_str(key_text)?;
        match self.decode_value(kind, raw)? {
            Value::Bool(value) => Ok(MapKey::Bool(value)),
            Value::Int32(value) => Ok(MapKey::Int32(value)),
            Value::Int64(value) => Ok(MapKey::Int64(value)),
            Value::Uint32(value) => Ok(MapKey::Uint32(value)),
            Value::Uint64(value) => Ok(MapKey::Uint64(value)),
            _ => Err(Error::InvalidMapKeyKind),
        }
    }
}

/// Removes a field's value from the object's remaining keys. Both the
/// original name and the camel alias are accepted; if both are present in the
/// data, the alias wins. `None` means the field is simply absent.
fn consume_field(
    remaining: &mut JsonMap<String, serde_json::Value>,
    field: &FieldDescriptor,
) -> Option<serde_json::Value> {
    let names = field.accepted_json_names();
    let original = remaining.remove(names.orig);
    let camel = if names.camel != names.orig {
        remaining.remove(names.camel)
    } else {
        None
    };
    camel.or(original)
}

fn field_mismatch_error(
    remaining: &JsonMap<String, serde_json::Value>,
    descriptor: &MessageDescriptor,
) -> Error {
    let unknown = remaining.keys().cloned().collect();
    let known = descriptor
        .fields
        .iter()
        .filter(|field| !field.is_internal)
        .chain(
            descriptor
                .oneofs
                .iter()
                .flat_map(|oneof| oneof.alternatives.iter()),
        )
        .map(|field| field.accepted_json_names().camel.to_string())
        .collect();
    Error::UnknownFields { unknown, known }
}

fn decode_duration(raw: serde_json::Value) -> Result<MessageValue, Error> {
    let literal = match raw {
        serde_json::Value::String(literal) => literal,
        other => {
            return Err(Error::WrongValueKind {
                found: json_kind(&other),
                target: "message google.protobuf.Duration".to_string(),
            })
        }
    };

    let (negative, magnitude) = match literal.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, literal.as_str()),
    };
    let parsed = parse_duration::parse(magnitude).map_err(|_| Error::BadDuration {
        literal: literal.clone(),
    })?;
    if parsed.as_nanos() > i64::MAX as u128 {
        return Err(Error::BadDuration { literal });
    }

    let mut total = parsed.as_nanos() as i128;
    if negative {
        total = -total;
    }
    // truncating split: the nanos remainder carries the sign of the seconds
    let seconds = (total / NANOS_PER_SEC) as i64;
    let nanos = (total % NANOS_PER_SEC) as i32;

    let mut message = MessageValue::new("google.protobuf.Duration");
    message.set_field("seconds", Value::Int64(seconds));
    message.set_field("nanos", Value::Int32(nanos));
    Ok(message)
}

fn decode_timestamp(raw: serde_json::Value) -> Result<MessageValue, Error> {
    let literal = match raw {
        serde_json::Value::String(literal) => literal,
        other => {
            return Err(Error::WrongValueKind {
                found: json_kind(&other),
                target: "message google.protobuf.Timestamp".to_string(),
            })
        }
    };

    let parsed =
        OffsetDateTime::parse(&literal, &Rfc3339).map_err(|_| Error::BadTimestamp { literal })?;
    let total = parsed.unix_timestamp_nanos();
    // euclidean split: a timestamp's nanos remainder is never negative
    let seconds = total.div_euclid(NANOS_PER_SEC) as i64;
    let nanos = total.rem_euclid(NANOS_PER_SEC) as i32;

    let mut message = MessageValue::new("google.protobuf.Timestamp");
    message.set_field("seconds", Value::Int64(seconds));
    message.set_field("nanos", Value::Int32(nanos));
    Ok(message)
}

fn double_from(raw: serde_json::Value) -> Result<f64, Error> {
    match raw {
        serde_json::Value::Null => Ok(0.0),
        serde_json::Value::Number(number) => number.as_f64().ok_or_else(|| Error::BadNumber {
            literal: number.to_string(),
            target: "double",
        }),
        serde_json::Value::String(literal) => Err(Error::BadNumber {
            literal: serde_json::Value::String(literal).to_string(),
            target: "double",
        }),
        other => Err(Error::WrongValueKind {
            found: json_kind(&other),
            target: "double field".to_string(),
        }),
    }
}

fn float_from(raw: serde_json::Value) -> Result<f32, Error> {
    match raw {
        serde_json::Value::Null => Ok(0.0),
        serde_json::Value::Number(number) => number
            .as_f64()
            .map(|value| value as f32)
            .ok_or_else(|| Error::BadNumber {
                literal: number.to_string(),
                target: "float",
            }),
        serde_json::Value::String(literal) => Err(Error::BadNumber {
            literal: serde_json::Value::String(literal).to_string(),
            target: "float",
        }),
        other => Err(Error::WrongValueKind {
            found: json_kind(&other),
            target: "float field".to_string(),
        }),
    }
}

fn int32_from(raw: serde_json::Value) -> Result<i32, Error> {
    match raw {
        serde_json::Value::Null => Ok(0),
        serde_json::Value::Number(number) => number
            .as_i64()
            .and_then(|value| i32::try_from(value).ok())
            .ok_or_else(|| Error::BadNumber {
                literal: number.to_string(),
                target: "int32",
            }),
        serde_json::Value::String(literal) => Err(Error::BadNumber {
            literal: serde_json::Value::String(literal).to_string(),
            target: "int32",
        }),
        other => Err(Error::WrongValueKind {
            found: json_kind(&other),
            target: "int32 field".to_string(),
        }),
    }
}

fn uint32_from(raw: serde_json::Value) -> Result<u32, Error> {
    match raw {
        serde_json::Value::Null => Ok(0),
        serde_json::Value::Number(number) => number
            .as_u64()
            .and_then(|value| u32::try_from(value).ok())
            .ok_or_else(|| Error::BadNumber {
                literal: number.to_string(),
                target: "uint32",
            }),
        serde_json::Value::String(literal) => Err(Error::BadNumber {
            literal: serde_json::Value::String(literal).to_string(),
            target: "uint32",
        }),
        other => Err(Error::WrongValueKind {
            found: json_kind(&other),
            target: "uint32 field".to_string(),
        }),
    }
}

fn int64_from(raw: serde_json::Value) -> Result<i64, Error> {
    match raw {
        serde_json::Value::Null => Ok(0),
        serde_json::Value::Number(number) => number.as_i64().ok_or_else(|| Error::BadNumber {
            literal: number.to_string(),
            target: "int64",
        }),
        // 64-bit integers can be encoded as strings; drop the quotes and
        // re-parse the interior as a bare number
        serde_json::Value::String(literal) => {
            literal
                .parse::<i64>()
                .map_err(|_| Error::BadQuotedNumber {
                    literal,
                    target: "int64",
                })
        }
        other => Err(Error::WrongValueKind {
            found: json_kind(&other),
            target: "int64 field".to_string(),
        }),
    }
}

fn uint64_from(raw: serde_json::Value) -> Result<u64, Error> {
    match raw {
        serde_json::Value::Null => Ok(0),
        serde_json::Value::Number(number) => number.as_u64().ok_or_else(|| Error::BadNumber {
            literal: number.to_string(),
            target: "uint64",
        }),
        serde_json::Value::String(literal) => {
            literal
                .parse::<u64>()
                .map_err(|_| Error::BadQuotedNumber {
                    literal,
                    target: "uint64",
                })
        }
        other => Err(Error::WrongValueKind {
            found: json_kind(&other),
            target: "uint64 field".to_string(),
        }),
    }
}

fn bool_from(raw: serde_json::Value) -> Result<bool, Error> {
    match raw {
        serde_json::Value::Null => Ok(false),
        serde_json::Value::Bool(value) => Ok(value),
        other => Err(Error::WrongValueKind {
            found: json_kind(&other),
            target: "bool field".to_string(),
        }),
    }
}

fn string_from(raw: serde_json::Value) -> Result<String, Error> {
    match raw {
        serde_json::Value::Null => Ok(String::new()),
        serde_json::Value::String(value) => Ok(value),
        other => Err(Error::WrongValueKind {
            found: json_kind(&other),
            target: "string field".to_string(),
        }),
    }
}

fn bytes_from(raw: serde_json::Value) -> Result<Vec<u8>, Error> {
    match raw {
        serde_json::Value::Null => Ok(Vec::new()),
        serde_json::Value::String(encoded) => Ok(BASE64_STANDARD.decode(encoded)?),
        other => Err(Error::WrongValueKind {
            found: json_kind(&other),
            target: "bytes field".to_string(),
        }),
    }
}

fn json_kind(raw: &serde_json::Value) -> &'static str {
    match raw {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
