//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Suo.
//! The Suo project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

use chrono::FixedOffset;
use proptest::prelude::*;

use suox::{construct_field, SuoField, SuoToValue, SuoValue};

fn wire(json: &str) -> SuoValue {
    SuoValue::from_json_str(json).unwrap()
}

#[test]
fn boolean_strings_follow_engine_semantics() {
    let field = SuoField::boolean();
    assert_eq!(
        field.deserialize(SuoValue::from("false")).unwrap(),
        SuoValue::Bool(false)
    );
    assert_eq!(
        field.deserialize(SuoValue::from("true")).unwrap(),
        SuoValue::Bool(true)
    );
    // Any other non-empty string is truthy, the empty string is not.
    assert_eq!(
        field.deserialize(SuoValue::from("no")).unwrap(),
        SuoValue::Bool(true)
    );
    assert_eq!(
        field.deserialize(SuoValue::from("")).unwrap(),
        SuoValue::Bool(false)
    );
}

#[test]
fn dates_parse_strings_and_epoch_milliseconds() {
    let field = SuoField::date();

    let parsed = field
        .deserialize(SuoValue::from("2024-01-02T03:04:05Z"))
        .unwrap();
    match &parsed {
        SuoValue::Date(date) => assert_eq!(date.to_iso_string(), "2024-01-02T03:04:05Z"),
        other => panic!("expected a date, got {:?}", other),
    }

    let from_epoch = field.deserialize(SuoValue::Int(1_699_999_999_000)).unwrap();
    match &from_epoch {
        SuoValue::Date(date) => {
            assert_eq!(date.to_iso_string(), "2023-11-14T22:13:19")
        }
        other => panic!("expected a date, got {:?}", other),
    }
}

#[test]
fn default_timezone_stamps_naive_datetimes_only() {
    let oslo = FixedOffset::east_opt(3600).unwrap();
    let field = SuoField::date_with_offset(oslo);

    let naive = field
        .deserialize(SuoValue::from("2024-01-02T03:04:05"))
        .unwrap();
    match &naive {
        SuoValue::Date(date) => assert_eq!(date.to_iso_string(), "2024-01-02T03:04:05+01:00"),
        other => panic!("expected a date, got {:?}", other),
    }

    // Aware input keeps its own offset.
    let aware = field
        .deserialize(SuoValue::from("2024-01-02T03:04:05-05:00"))
        .unwrap();
    match &aware {
        SuoValue::Date(date) => assert_eq!(date.to_iso_string(), "2024-01-02T03:04:05-05:00"),
        other => panic!("expected a date, got {:?}", other),
    }
}

#[test]
fn multi_valued_fields_coerce_element_wise() {
    let field = SuoField::integer().with_multi(true);
    let values = field
        .deserialize(wire(r#"["1", 2, null, 3.9]"#))
        .unwrap();
    assert_eq!(
        values,
        SuoValue::list(vec![
            SuoValue::Int(1),
            SuoValue::Int(2),
            SuoValue::Null,
            SuoValue::Int(3),
        ])
    );
}

#[test]
fn wire_declarations_build_object_fields() {
    let field = construct_field(wire(
        r#"{
            "type": "object",
            "properties": {
                "name": {"type": "text"},
                "age": {"type": "integer"}
            }
        }"#,
    ))
    .unwrap();

    assert_eq!(field.name(), "object");
    let doc_type = field.doc_type().unwrap();
    assert_eq!(doc_type.mapping().names(), vec!["name", "age"]);

    let rendered = field.to_value().unwrap();
    assert_eq!(
        rendered,
        wire(
            r#"{
                "properties": {
                    "name": {"type": "text"},
                    "age": {"type": "integer"}
                },
                "type": "object"
            }"#
        )
    );
}

#[test]
fn inner_fields_resolve_through_subfield() {
    let field = construct_field(wire(
        r#"{
            "type": "text",
            "analyzer": "snowball",
            "fields": {"raw": {"type": "keyword"}}
        }"#,
    ))
    .unwrap();

    let raw = field.subfield("raw").unwrap();
    assert_eq!(raw.name(), "keyword");
    assert!(field.subfield("missing").is_none());

    // The wire declaration and the programmatic form are the same field.
    let mut programmatic = SuoField::text();
    programmatic.set_param("analyzer", "snowball").unwrap();
    programmatic
        .set_param("fields", wire(r#"{"raw": {"type": "keyword"}}"#))
        .unwrap();
    assert_eq!(field, programmatic);
}

#[test]
fn range_fields_coerce_their_bounds() {
    let field = construct_field(wire(r#"{"type": "integer_range"}"#)).unwrap();
    let value = field.deserialize(wire(r#"{"gte": "2", "lt": 10}"#)).unwrap();

    let range = match value {
        SuoValue::Range(range) => range,
        other => panic!("expected a range, got {:?}", other),
    };
    assert_eq!(range.gte(), Some(SuoValue::Int(2)));
    assert_eq!(range.lt(), Some(SuoValue::Int(10)));
    assert!(range.contains(&SuoValue::Int(2)));
    assert!(range.contains(&SuoValue::Int(9)));
    assert!(!range.contains(&SuoValue::Int(10)));
}

#[test]
fn required_fields_reject_empty_values() {
    let field = SuoField::text().with_required(true);
    let err = field.clean(SuoValue::Null).unwrap_err();
    assert_eq!(
        err.to_string(),
        "validation error: Value required for this field."
    );

    let err = field.clean(SuoValue::list(vec![])).unwrap_err();
    assert!(err.to_string().contains("Value required"));

    // False is a value; a required boolean accepts it.
    let boolean = SuoField::boolean().with_required(true);
    assert_eq!(
        boolean.clean(SuoValue::Bool(false)).unwrap(),
        SuoValue::Bool(false)
    );
}

#[test]
fn coercion_failures_carry_the_offending_value() {
    let field = SuoField::integer();
    let err = field.deserialize(SuoValue::from("not-a-number")).unwrap_err();
    assert_eq!(
        err.to_string(),
        r#"validation error: Could not parse integer from the value ("not-a-number")"#
    );

    let ip = SuoField::ip();
    let err = ip.deserialize(SuoValue::from("999.0.0.1")).unwrap_err();
    assert!(err.to_string().contains("Could not parse ip"));
}

#[test]
fn dense_vectors_are_lists_of_floats() {
    let field = construct_field(wire(r#"{"type": "dense_vector", "dims": 3}"#)).unwrap();
    assert!(field.is_multi());

    let vector = field.deserialize(wire("[0.5, 1, 2.5]")).unwrap();
    assert_eq!(
        vector,
        SuoValue::list(vec![
            SuoValue::Float(0.5),
            SuoValue::Float(1.0),
            SuoValue::Float(2.5),
        ])
    );
}

#[test]
fn declaration_errors_surface_early() {
    let err = construct_field(wire(r#"{"type": "scaled_float"}"#)).unwrap_err();
    assert!(err.to_string().contains("scaling_factor"));

    let err = construct_field(wire(r#"{"analyzer": "snowball"}"#)).unwrap_err();
    assert!(err.to_string().contains(r#"needs to have a "type" key"#));

    let err = construct_field(wire(r#"{"type": "warp_field"}"#)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "DSL class 'warp_field' does not exist in field"
    );
}

proptest! {
    #[test]
    fn prop_integer_strings_round_trip(n in any::<i64>()) {
        let field = SuoField::integer();
        let parsed = field.deserialize(SuoValue::Str(n.to_string())).unwrap();
        prop_assert_eq!(parsed, SuoValue::Int(n));
    }

    #[test]
    fn prop_boolean_integers_follow_truthiness(n in any::<i64>()) {
        let field = SuoField::boolean();
        let parsed = field.deserialize(SuoValue::Int(n)).unwrap();
        prop_assert_eq!(parsed, SuoValue::Bool(n != 0));
    }

    #[test]
    fn prop_binary_round_trips_through_base64(
        data in proptest::collection::vec(any::<u8>(), 1..64)
    ) {
        let field = SuoField::binary();
        let encoded = field.serialize(&SuoValue::Bytes(data.clone())).unwrap();
        prop_assert!(matches!(encoded, SuoValue::Str(_)));
        let decoded = field.deserialize(encoded).unwrap();
        prop_assert_eq!(decoded, SuoValue::Bytes(data));
    }
}
