use std::cell::RefCell;

use beanpack::{
    decode, decode_any, BuilderSwap, DecodeError, FieldShape, NumberKind, Parent, Record,
    RecordShape, SchemaResolver, TargetType, TypeResolver, Value, ValueSwap,
};

fn person_resolver() -> SchemaResolver {
    SchemaResolver::new().record(
        RecordShape::new("Person")
            .field("name", TargetType::CharSequence)
            .field("age", TargetType::Number(NumberKind::I32)),
    )
}

fn str_value(s: &str) -> Value {
    Value::Str(s.to_owned())
}

/// {"name": "Bob", "age": 42}
const PERSON_BYTES: &[u8] = &[
    0x82, 0xa4, b'n', b'a', b'm', b'e', 0xa3, b'B', b'o', b'b', 0xa3, b'a', b'g', b'e', 0x2a,
];

#[test]
fn record_materializes_declared_fields() {
    let resolver = person_resolver();
    let value = decode(PERSON_BYTES, &TargetType::record("Person"), &resolver).unwrap();
    match value {
        Value::Record(record) => {
            assert_eq!(record.type_name, "Person");
            assert_eq!(record.get("name"), Some(&str_value("Bob")));
            assert_eq!(record.get("age"), Some(&Value::Int(42)));
        }
        other => panic!("expected a record, got {other:?}"),
    }
}

#[test]
fn unknown_fields_are_reported_not_fatal() {
    // {"name": "Bob", "extra": [1, 2]}
    let input = [
        0x82, 0xa4, b'n', b'a', b'm', b'e', 0xa3, b'B', b'o', b'b', 0xa5, b'e', b'x', b't', b'r',
        b'a', 0x92, 0x01, 0x02,
    ];
    let resolver = person_resolver();
    let value = decode(&input, &TargetType::record("Person"), &resolver).unwrap();
    match value {
        Value::Record(record) => {
            assert_eq!(record.get("name"), Some(&str_value("Bob")));
            assert_eq!(record.get("extra"), None);
        }
        other => panic!("expected a record, got {other:?}"),
    }
    assert_eq!(
        resolver.unknown_fields(),
        vec![("Person".to_owned(), "extra".to_owned())]
    );
}

#[test]
fn discriminator_is_consumed_positionally() {
    // {"_type": "Person", "name": "Bob"} — discriminator first
    let leading = [
        0x82, 0xa5, b'_', b't', b'y', b'p', b'e', 0xa6, b'P', b'e', b'r', b's', b'o', b'n', 0xa4,
        b'n', b'a', b'm', b'e', 0xa3, b'B', b'o', b'b',
    ];
    // {"name": "Bob", "_type": "Person"} — discriminator last
    let trailing = [
        0x82, 0xa4, b'n', b'a', b'm', b'e', 0xa3, b'B', b'o', b'b', 0xa5, b'_', b't', b'y', b'p',
        b'e', 0xa6, b'P', b'e', b'r', b's', b'o', b'n',
    ];
    for input in [leading.as_slice(), trailing.as_slice()] {
        let resolver = person_resolver();
        let value = decode(input, &TargetType::record("Person"), &resolver).unwrap();
        match value {
            Value::Record(record) => {
                assert_eq!(record.get("name"), Some(&str_value("Bob")));
                assert_eq!(record.get("_type"), None);
            }
            other => panic!("expected a record, got {other:?}"),
        }
        // discarded, not routed to the unknown-field hook
        assert_eq!(resolver.unknown_fields(), vec![]);
    }
}

#[test]
fn discriminator_name_is_configurable() {
    // {"@class": "Person", "name": "Bob"}
    let input = [
        0x82, 0xa6, b'@', b'c', b'l', b'a', b's', b's', 0xa6, b'P', b'e', b'r', b's', b'o', b'n',
        0xa4, b'n', b'a', b'm', b'e', 0xa3, b'B', b'o', b'b',
    ];
    let resolver = person_resolver().type_property("@class");
    let value = decode(&input, &TargetType::record("Person"), &resolver).unwrap();
    match value {
        Value::Record(record) => assert_eq!(record.get("name"), Some(&str_value("Bob"))),
        other => panic!("expected a record, got {other:?}"),
    }
}

#[test]
fn discriminator_is_an_ordinary_key_at_the_any_target() {
    // {"_type": "Person"}
    let input = [
        0x81, 0xa5, b'_', b't', b'y', b'p', b'e', 0xa6, b'P', b'e', b'r', b's', b'o', b'n',
    ];
    assert_eq!(
        decode_any(&input),
        Ok(Value::Map(vec![(
            str_value("_type"),
            str_value("Person")
        )]))
    );
}

#[test]
fn nested_records() {
    let resolver = SchemaResolver::new().record(
        RecordShape::new("Person")
            .field("name", TargetType::CharSequence)
            .field("spouse", TargetType::record("Person")),
    );
    // {"name": "Bob", "spouse": {"name": "Ann"}}
    let input = [
        0x82, 0xa4, b'n', b'a', b'm', b'e', 0xa3, b'B', b'o', b'b', 0xa6, b's', b'p', b'o', b'u',
        b's', b'e', 0x81, 0xa4, b'n', b'a', b'm', b'e', 0xa3, b'A', b'n', b'n',
    ];
    let value = decode(&input, &TargetType::record("Person"), &resolver).unwrap();
    match value {
        Value::Record(record) => match record.get("spouse") {
            Some(Value::Record(spouse)) => {
                assert_eq!(spouse.get("name"), Some(&str_value("Ann")));
            }
            other => panic!("expected a nested record, got {other:?}"),
        },
        other => panic!("expected a record, got {other:?}"),
    }
}

#[test]
fn unknown_record_type_is_a_construction_error() {
    let resolver = SchemaResolver::new();
    let err = decode(&[0x80], &TargetType::record("Missing"), &resolver).unwrap_err();
    match err {
        DecodeError::Construction { type_name, .. } => assert_eq!(type_name, "Missing"),
        other => panic!("expected a construction error, got {other:?}"),
    }
}

#[test]
fn non_string_field_name_is_a_mismatch() {
    let resolver = person_resolver();
    // {1: "x"} at a record target
    let err = decode(
        &[0x81, 0x01, 0xa1, b'x'],
        &TargetType::record("Person"),
        &resolver,
    )
    .unwrap_err();
    assert!(matches!(err, DecodeError::TypeMismatch { .. }));
}

#[test]
fn field_decode_errors_carry_the_field_path() {
    let resolver = person_resolver();
    // {"age": "old"}
    let input = [
        0x81, 0xa3, b'a', b'g', b'e', 0xa3, b'o', b'l', b'd',
    ];
    match decode(&input, &TargetType::record("Person"), &resolver) {
        Err(DecodeError::ScalarConversion { path, .. }) => assert_eq!(path, "$.age"),
        other => panic!("expected a scalar conversion error, got {other:?}"),
    }
}

struct EpochSwap;

impl ValueSwap for EpochSwap {
    fn intermediate(&self) -> TargetType {
        TargetType::Number(NumberKind::I64)
    }

    fn unswap(&self, value: Value) -> Result<Value, String> {
        match value {
            Value::Int(n) if n >= 0 => Ok(Value::Str(format!("epoch:{n}"))),
            other => Err(format!("{other:?} is not an epoch second")),
        }
    }
}

#[test]
fn value_swap_decodes_through_the_intermediate_type() {
    let resolver =
        SchemaResolver::new().swap(TargetType::record("Instant"), Box::new(EpochSwap));
    let ty = TargetType::record("Instant");
    assert_eq!(decode(&[0x05], &ty, &resolver), Ok(str_value("epoch:5")));
    // nil bypasses the transform entirely
    assert_eq!(decode(&[0xc0], &ty, &resolver), Ok(Value::Null));
    // transform rejection surfaces as a conversion error
    assert!(matches!(
        decode(&[0xff], &ty, &resolver),
        Err(DecodeError::ScalarConversion { .. })
    ));
}

struct PersonBuilderSwap;

impl BuilderSwap for PersonBuilderSwap {
    fn intermediate(&self) -> TargetType {
        TargetType::record("PersonBuilder")
    }

    fn finish(&self, builder: Value) -> Result<Value, String> {
        match builder {
            Value::Record(builder) => {
                let mut person = Record::new("Person");
                for (name, value) in builder.fields {
                    person.set(name, value);
                }
                if person.get("name").is_none() {
                    return Err("builder is missing 'name'".to_owned());
                }
                Ok(Value::Record(person))
            }
            other => Err(format!("expected a builder record, got {}", other.type_label())),
        }
    }
}

#[test]
fn builder_swap_decodes_the_builder_then_finishes() {
    let resolver = SchemaResolver::new()
        .record(RecordShape::new("PersonBuilder").field("name", TargetType::CharSequence))
        .builder_swap(TargetType::record("Person"), Box::new(PersonBuilderSwap));
    // {"name": "Bob"}
    let input = [0x81, 0xa4, b'n', b'a', b'm', b'e', 0xa3, b'B', b'o', b'b'];
    let value = decode(&input, &TargetType::record("Person"), &resolver).unwrap();
    match value {
        Value::Record(record) => {
            assert_eq!(record.type_name, "Person");
            assert_eq!(record.get("name"), Some(&str_value("Bob")));
        }
        other => panic!("expected a record, got {other:?}"),
    }

    // a failed finish is a construction error naming the declared type
    let err = decode(&[0x80], &TargetType::record("Person"), &resolver).unwrap_err();
    match err {
        DecodeError::Construction { type_name, .. } => {
            assert_eq!(type_name, "record Person");
        }
        other => panic!("expected a construction error, got {other:?}"),
    }
}

#[test]
fn string_factories_build_from_string_targets() {
    let resolver = SchemaResolver::new().string_factory(
        "Uuid",
        Box::new(|s| {
            if s.len() == 4 {
                Ok(Value::Str(s.to_ascii_uppercase()))
            } else {
                Err(format!("'{s}' is not a valid Uuid"))
            }
        }),
    );
    let ty = TargetType::FromString("Uuid".to_owned());
    assert_eq!(
        decode(&[0xa4, b'a', b'b', b'c', b'd'], &ty, &resolver),
        Ok(str_value("ABCD"))
    );
    assert!(matches!(
        decode(&[0xa1, b'x'], &ty, &resolver),
        Err(DecodeError::Construction { .. })
    ));
    // no factory registered
    let bare = SchemaResolver::new();
    assert!(matches!(
        decode(&[0xa1, b'x'], &TargetType::FromString("Uuid".to_owned()), &bare),
        Err(DecodeError::Construction { .. })
    ));
}

/// Resolver that rejects one field value and records parent notifications.
struct StrictResolver {
    shape: RecordShape,
    parents: RefCell<Vec<String>>,
}

impl StrictResolver {
    fn new() -> Self {
        Self {
            shape: RecordShape::new("Account")
                .field("owner", TargetType::CharSequence)
                .field("balance", TargetType::Number(NumberKind::I64)),
            parents: RefCell::new(Vec::new()),
        }
    }
}

impl TypeResolver for StrictResolver {
    fn record_shape(&self, name: &str) -> Option<&RecordShape> {
        (name == self.shape.name).then_some(&self.shape)
    }

    fn set_field(
        &self,
        record: &mut Record,
        field: &FieldShape,
        value: Value,
    ) -> Result<(), String> {
        if field.name == "balance" && matches!(value, Value::Int(n) if n < 0) {
            return Err("balance must be non-negative".to_owned());
        }
        record.set(field.name.clone(), value);
        Ok(())
    }

    fn set_parent(&self, _child: &mut Value, parent: Parent<'_>) {
        let rendered = match parent {
            Parent::Field { record, field } => format!("{record}.{field}"),
            Parent::Element { index } => format!("[{index}]"),
            Parent::Entry { key } => format!("{{{key}}}"),
        };
        self.parents.borrow_mut().push(rendered);
    }
}

#[test]
fn field_assignment_can_reject_values() {
    let resolver = StrictResolver::new();
    // {"owner": "Bob", "balance": -5}
    let input = [
        0x82, 0xa5, b'o', b'w', b'n', b'e', b'r', 0xa3, b'B', b'o', b'b', 0xa7, b'b', b'a', b'l',
        b'a', b'n', b'c', b'e', 0xfb,
    ];
    match decode(&input, &TargetType::record("Account"), &resolver) {
        Err(DecodeError::FieldAssignment { path, reason }) => {
            assert_eq!(path, "$.balance");
            assert_eq!(reason, "balance must be non-negative");
        }
        other => panic!("expected a field assignment error, got {other:?}"),
    }
}

#[test]
fn parent_hook_sees_structural_context() {
    let resolver = StrictResolver::new();
    // {"owner": "Bob", "balance": 10}
    let input = [
        0x82, 0xa5, b'o', b'w', b'n', b'e', b'r', 0xa3, b'B', b'o', b'b', 0xa7, b'b', b'a', b'l',
        b'a', b'n', b'c', b'e', 0x0a,
    ];
    decode(&input, &TargetType::record("Account"), &resolver).unwrap();
    assert_eq!(
        *resolver.parents.borrow(),
        vec!["Account.owner".to_owned(), "Account.balance".to_owned()]
    );

    // null children never trigger the hook
    let resolver = StrictResolver::new();
    // {"owner": null}
    let input = [0x81, 0xa5, b'o', b'w', b'n', b'e', b'r', 0xc0];
    decode(&input, &TargetType::record("Account"), &resolver).unwrap();
    assert!(resolver.parents.borrow().is_empty());
}
