use nicejsonpb::testutil::VALIDATOR_REGISTRY;
use nicejsonpb::{unmarshal_str, Error, Value};

fn unmarshal_validator_message(input: &str) -> Result<nicejsonpb::MessageValue, Error> {
    unmarshal_str(
        input,
        &*VALIDATOR_REGISTRY,
        "validatortest.ValidatorMessage3",
    )
}

#[test]
fn finds_errors_in_arrays() {
    let input = r#"{"someIntRep": [2,5,1,"sdas",2.1]}"#;
    let err = unmarshal_validator_message(input).unwrap_err();

    assert_eq!(
        err.to_string(),
        "unparsable field someIntRep.[3]: cannot parse \"sdas\" as uint32"
    );
}

#[test]
fn handles_formatting_of_int64_as_string() {
    let input = r#"{"someEmbedded": {"someValue": "should_be_int"}}"#;
    let err = unmarshal_validator_message(input).unwrap_err();

    assert_eq!(
        err.to_string(),
        "unparsable field someEmbedded.someValue: cannot parse \"should_be_int\" as int64 while looking for an integer in a string"
    );
}

#[test]
fn finds_errors_in_nested() {
    let input = r#"{"someEmbedded": {"identifier": 3.1}}"#;
    let err = unmarshal_validator_message(input).unwrap_err();

    assert_eq!(
        err.to_string(),
        "unparsable field someEmbedded.identifier: cannot assign number to string field"
    );
}

#[test]
fn names_real_list_type_for_shape_mismatch() {
    let input = r#"{"someIntRep": "not_an_array"}"#;
    let err = unmarshal_validator_message(input).unwrap_err();

    assert_eq!(
        err.to_string(),
        "unparsable field someIntRep: cannot assign string to list field"
    );
}

#[test]
fn unknown_field_errors() {
    let input = r#"{"someEmbedded": {"someValue": 3, "someUnknown": 1, "anotherUnknown": "foo"}}"#;
    let err = unmarshal_validator_message(input).unwrap_err();

    // unknown keys come out in the deterministic (sorted) map order
    assert_eq!(
        err.to_string(),
        "unparsable field someEmbedded: fields [anotherUnknown someUnknown] do not exist in set of known fields [identifier someValue]"
    );

    // key sets matter, not listing positions
    match err {
        Error::Field { nested, .. } => match *nested {
            Error::UnknownFields { mut unknown, known } => {
                unknown.sort();
                assert_eq!(unknown, ["anotherUnknown", "someUnknown"]);
                assert_eq!(known, ["identifier", "someValue"]);
            }
            other => panic!("expected UnknownFields, got {:?}", other),
        },
        other => panic!("expected field-scoped error, got {:?}", other),
    }
}

#[test]
fn valid_document_decodes_fully() {
    let input = r#"{"someIntRep": [2,5,1], "someEmbedded": {"identifier": "id-1", "someValue": "42"}}"#;
    let message = unmarshal_validator_message(input).unwrap();

    assert_eq!(
        message.field("someIntRep"),
        Some(&Value::List(vec![
            Value::Uint32(2),
            Value::Uint32(5),
            Value::Uint32(1)
        ]))
    );
    match message.field("someEmbedded") {
        Some(Value::Message(embedded)) => {
            assert_eq!(
                embedded.field("identifier"),
                Some(&Value::String("id-1".to_string()))
            );
            assert_eq!(embedded.field("someValue"), Some(&Value::Int64(42)));
        }
        other => panic!("expected embedded message, got {:?}", other),
    }
}
