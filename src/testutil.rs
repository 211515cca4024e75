use crate::descriptor::{FieldDescriptor, FieldKind, MessageDescriptor, Registry};
use lazy_static::lazy_static;

lazy_static! {
    pub static ref VALIDATOR_REGISTRY: Registry = validator_registry();
}

/// Schema mirroring the validator test messages: a repeated integer field
/// plus an embedded message with a string and a wide integer.
pub fn validator_registry() -> Registry {
    let mut registry = Registry::new();
    registry.add_message(MessageDescriptor::new(
        "validatortest.ValidatorMessage3",
        vec![
            FieldDescriptor::new("someIntRep", FieldKind::List(Box::new(FieldKind::Uint32))),
            FieldDescriptor::new(
                "someEmbedded",
                FieldKind::Message("validatortest.SomeEmbedded".to_string()),
            ),
        ],
    ));
    registry.add_message(MessageDescriptor::new(
        "validatortest.SomeEmbedded",
        vec![
            FieldDescriptor::new("identifier", FieldKind::String),
            FieldDescriptor::new("someValue", FieldKind::Int64),
        ],
    ));
    registry
}
