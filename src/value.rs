use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A decoded, schema-typed value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Value {
    Double(f64),
    Float(f32),
    Int32(i32),
    Int64(i64),
    Uint32(u32),
    Uint64(u64),
    Bool(bool),
    String(String),
    Bytes(Vec<u8>),
    Enum(i32),
    Message(MessageValue),
    List(Vec<Value>),
    Map(BTreeMap<MapKey, Value>),
}

/// Map key kinds. JSON always carries keys as strings, but the schema may
/// declare any of these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MapKey {
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Uint32(u32),
    Uint64(u64),
    String(String),
}

/// A decoded message instance. Fields are keyed by their original name;
/// fields absent from the document are absent from the map, which is their
/// default/zero state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MessageValue {
    pub type_name: String,
    pub fields: HashMap<String, Value>,
}

impl MessageValue {
    pub fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            fields: HashMap::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_field_is_default_state() {
        let mut message = MessageValue::new("test.Empty");
        assert!(message.field("foo").is_none());

        message.set_field("foo", Value::Int32(3));
        assert_eq!(message.field("foo"), Some(&Value::Int32(3)));
    }

    #[test]
    fn set_field_overwrites() {
        let mut message = MessageValue::new("test.Empty");
        message.set_field("foo", Value::Int32(3));
        message.set_field("foo", Value::Int32(4));

        assert_eq!(message.field("foo"), Some(&Value::Int32(4)));
    }
}
