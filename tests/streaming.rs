use nicejsonpb::testutil::VALIDATOR_REGISTRY;
use nicejsonpb::{unmarshal_next, Error, Unmarshaler, Value};

#[test]
fn successive_values_from_one_stream() {
    let input = r#"
        {"someIntRep": [1]}
        {"someIntRep": [2, 3]}
    "#;
    let mut stream = serde_json::Deserializer::from_str(input).into_iter();

    let first = unmarshal_next(
        &mut stream,
        &*VALIDATOR_REGISTRY,
        "validatortest.ValidatorMessage3",
    )
    .unwrap();
    assert_eq!(
        first.field("someIntRep"),
        Some(&Value::List(vec![Value::Uint32(1)]))
    );

    let second = unmarshal_next(
        &mut stream,
        &*VALIDATOR_REGISTRY,
        "validatortest.ValidatorMessage3",
    )
    .unwrap();
    assert_eq!(
        second.field("someIntRep"),
        Some(&Value::List(vec![Value::Uint32(2), Value::Uint32(3)]))
    );

    let exhausted = unmarshal_next(
        &mut stream,
        &*VALIDATOR_REGISTRY,
        "validatortest.ValidatorMessage3",
    );
    assert!(matches!(exhausted, Err(Error::UnexpectedEndOfInput)));
}

#[test]
fn failure_leaves_stream_at_next_value() {
    let input = r#"{"someIntRep": "oops"} {"someIntRep": [4]}"#;
    let mut stream = serde_json::Deserializer::from_str(input).into_iter();
    let unmarshaler = Unmarshaler::default();

    let failed = unmarshaler.unmarshal_next(
        &mut stream,
        &*VALIDATOR_REGISTRY,
        "validatortest.ValidatorMessage3",
    );
    assert_eq!(
        failed.unwrap_err().to_string(),
        "unparsable field someIntRep: cannot assign string to list field"
    );

    let recovered = unmarshaler
        .unmarshal_next(
            &mut stream,
            &*VALIDATOR_REGISTRY,
            "validatortest.ValidatorMessage3",
        )
        .unwrap();
    assert_eq!(
        recovered.field("someIntRep"),
        Some(&Value::List(vec![Value::Uint32(4)]))
    );
}
