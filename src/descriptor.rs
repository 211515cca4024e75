use rustc_hash::FxHashMap;

/// Declared kind of a message field. This is the closed set the decoder
/// dispatches on; schema compilers supply one per field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Double,
    Float,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Bool,
    String,
    Bytes,
    Enum(String),
    Message(String),
    List(Box<FieldKind>),
    Map {
        key: Box<FieldKind>,
        value: Box<FieldKind>,
    },
}

#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub original_name: String,
    /// Camel-case alias, if the schema declares one.
    pub json_name: Option<String>,
    pub kind: FieldKind,
    /// Implementation-reserved fields are never read from JSON.
    pub is_internal: bool,
}

/// The two JSON key spellings accepted for a field.
pub struct FieldNames<'a> {
    pub orig: &'a str,
    pub camel: &'a str,
}

impl FieldDescriptor {
    pub fn new(original_name: &str, kind: FieldKind) -> Self {
        Self {
            original_name: original_name.to_string(),
            json_name: None,
            kind,
            is_internal: false,
        }
    }

    pub fn with_json_name(mut self, json_name: &str) -> Self {
        self.json_name = Some(json_name.to_string());
        self
    }

    pub fn internal(mut self) -> Self {
        self.is_internal = true;
        self
    }

    pub fn accepted_json_names(&self) -> FieldNames<'_> {
        FieldNames {
            orig: &self.original_name,
            camel: self.json_name.as_deref().unwrap_or(&self.original_name),
        }
    }
}

/// A group of mutually exclusive field alternatives sharing one slot, in
/// declaration order.
#[derive(Debug, Clone)]
pub struct OneofDescriptor {
    pub name: String,
    pub alternatives: Vec<FieldDescriptor>,
}

impl OneofDescriptor {
    pub fn new(name: &str, alternatives: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.to_string(),
            alternatives,
        }
    }
}

/// Standardized message shapes whose JSON representation differs from their
/// structural layout. Recognized by full type name, so user types that merely
/// share a short name are unaffected.
#[derive(Debug, Clone, PartialEq)]
pub enum WellKnownType {
    Wrapper(FieldKind),
    Any,
    Duration,
    Timestamp,
}

impl WellKnownType {
    pub fn from_full_name(name: &str) -> Option<Self> {
        let short_name = name.strip_prefix("google.protobuf.")?;
        match short_name {
            "DoubleValue" => Some(WellKnownType::Wrapper(FieldKind::Double)),
            "FloatValue" => Some(WellKnownType::Wrapper(FieldKind::Float)),
            "Int64Value" => Some(WellKnownType::Wrapper(FieldKind::Int64)),
            "UInt64Value" => Some(WellKnownType::Wrapper(FieldKind::Uint64)),
            "Int32Value" => Some(WellKnownType::Wrapper(FieldKind::Int32)),
            "UInt32Value" => Some(WellKnownType::Wrapper(FieldKind::Uint32)),
            "BoolValue" => Some(WellKnownType::Wrapper(FieldKind::Bool)),
            "StringValue" => Some(WellKnownType::Wrapper(FieldKind::String)),
            "BytesValue" => Some(WellKnownType::Wrapper(FieldKind::Bytes)),
            "Any" => Some(WellKnownType::Any),
            "Duration" => Some(WellKnownType::Duration),
            "Timestamp" => Some(WellKnownType::Timestamp),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MessageDescriptor {
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
    pub oneofs: Vec<OneofDescriptor>,
}

impl MessageDescriptor {
    pub fn new(name: &str, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.to_string(),
            fields,
            oneofs: Vec::new(),
        }
    }

    pub fn with_oneof(mut self, oneof: OneofDescriptor) -> Self {
        self.oneofs.push(oneof);
        self
    }
}

#[derive(Debug, Clone)]
pub struct EnumDescriptor {
    pub name: String,
    numbers_by_name: FxHashMap<String, i32>,
}

impl EnumDescriptor {
    pub fn new(name: &str, values: &[(&str, i32)]) -> Self {
        Self {
            name: name.to_string(),
            numbers_by_name: values
                .iter()
                .map(|(value_name, number)| (value_name.to_string(), *number))
                .collect(),
        }
    }

    /// Exact-match lookup, no case folding.
    pub fn number(&self, value_name: &str) -> Option<i32> {
        self.numbers_by_name.get(value_name).copied()
    }
}

/// Supplies descriptors for the target types of a decode. The decoder only
/// ever consults this interface; it never introspects live objects.
pub trait SchemaProvider {
    fn message_by_name(&self, name: &str) -> Option<&MessageDescriptor>;
    fn enum_by_name(&self, name: &str) -> Option<&EnumDescriptor>;
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    messages: FxHashMap<String, MessageDescriptor>,
    enums: FxHashMap<String, EnumDescriptor>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_message(&mut self, descriptor: MessageDescriptor) {
        self.messages.insert(descriptor.name.clone(), descriptor);
    }

    pub fn add_enum(&mut self, descriptor: EnumDescriptor) {
        self.enums.insert(descriptor.name.clone(), descriptor);
    }
}

impl SchemaProvider for Registry {
    fn message_by_name(&self, name: &str) -> Option<&MessageDescriptor> {
        self.messages.get(name)
    }

    fn enum_by_name(&self, name: &str) -> Option<&EnumDescriptor> {
        self.enums.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepted_names_default_to_original() {
        let field = FieldDescriptor::new("some_value", FieldKind::Int64);
        let names = field.accepted_json_names();

        assert_eq!(names.orig, "some_value");
        assert_eq!(names.camel, "some_value");
    }

    #[test]
    fn accepted_names_with_alias() {
        let field = FieldDescriptor::new("some_value", FieldKind::Int64).with_json_name("someValue");
        let names = field.accepted_json_names();

        assert_eq!(names.orig, "some_value");
        assert_eq!(names.camel, "someValue");
    }

    #[test]
    fn well_known_recognized_by_full_name() {
        assert_eq!(
            WellKnownType::from_full_name("google.protobuf.Duration"),
            Some(WellKnownType::Duration)
        );
        assert_eq!(
            WellKnownType::from_full_name("google.protobuf.UInt32Value"),
            Some(WellKnownType::Wrapper(FieldKind::Uint32))
        );
        assert_eq!(WellKnownType::from_full_name("my.pkg.Duration"), None);
        assert_eq!(WellKnownType::from_full_name("Duration"), None);
    }

    #[test]
    fn enum_lookup_is_exact() {
        let descriptor = EnumDescriptor::new("test.Answer", &[("YES", 0), ("NO", 1)]);

        assert_eq!(descriptor.number("YES"), Some(0));
        assert_eq!(descriptor.number("NO"), Some(1));
        assert_eq!(descriptor.number("yes"), None);
        assert_eq!(descriptor.number("MAYBE"), None);
    }

    #[test]
    fn registry_lookup() {
        let mut registry = Registry::new();
        registry.add_message(MessageDescriptor::new("test.Empty", vec![]));
        registry.add_enum(EnumDescriptor::new("test.Answer", &[("YES", 0)]));

        assert!(registry.message_by_name("test.Empty").is_some());
        assert!(registry.message_by_name("test.Missing").is_none());
        assert!(registry.enum_by_name("test.Answer").is_some());
        assert!(registry.enum_by_name("test.Missing").is_none());
    }
}
