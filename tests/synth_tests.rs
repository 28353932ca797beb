/// Tests for example value and sample body synthesis
use apirecon::{Synthesizer, DEFAULT_MAX_DEPTH};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn registry() -> Value {
    json!({
        "Pet": {
            "type": "object",
            "required": ["name"],
            "properties": {
                "name": {"type": "string"},
                "status": {"type": "string", "enum": ["available", "sold"]},
                "tags": {"type": "array", "items": {"type": "string"}}
            }
        },
        "Node": {
            "type": "object",
            "properties": {
                "value": {"type": "integer"},
                "next": {"$ref": "#/definitions/Node"}
            }
        },
        "Loop": {"$ref": "#/definitions/Loop"}
    })
}

#[test]
fn enum_yields_first_value() {
    let reg = registry();
    let synth = Synthesizer::new(reg.as_object());
    assert_eq!(synth.example_value(&json!({"enum": ["a", "b"]})), json!("a"));
    assert_eq!(
        synth.example_value(&json!({"type": "integer", "enum": [7, 8]})),
        json!(7)
    );
}

#[test]
fn empty_schema_is_placeholder() {
    let synth = Synthesizer::new(None);
    assert_eq!(synth.example_value(&json!({})), json!("example"));
    assert_eq!(synth.example_value(&Value::Null), json!("example"));
}

#[test]
fn scalars_use_declared_values_first() {
    let synth = Synthesizer::new(None);
    assert_eq!(synth.example_value(&json!({"type": "string"})), json!("example"));
    assert_eq!(
        synth.example_value(&json!({"type": "string", "default": "d"})),
        json!("d")
    );
    assert_eq!(
        synth.example_value(&json!({"type": "string", "default": "d", "example": "e"})),
        json!("e")
    );
    assert_eq!(synth.example_value(&json!({"type": "integer"})), json!(0));
    assert_eq!(
        synth.example_value(&json!({"type": "integer", "default": 42})),
        json!(42)
    );
    assert_eq!(synth.example_value(&json!({"type": "number"})), json!(0.0));
    assert_eq!(synth.example_value(&json!({"type": "boolean"})), json!(true));
    assert_eq!(
        synth.example_value(&json!({"type": "boolean", "default": false})),
        json!(false)
    );
    assert_eq!(synth.example_value(&json!({"type": "file"})), json!("example"));
}

#[test]
fn arrays_hold_one_item() {
    let synth = Synthesizer::new(None);
    assert_eq!(
        synth.example_value(&json!({"type": "array", "items": {"type": "integer"}})),
        json!([0])
    );
    assert_eq!(synth.example_value(&json!({"type": "array"})), json!(["example"]));
}

#[test]
fn object_properties_keep_declaration_order() {
    let synth = Synthesizer::new(None);
    let value = synth.example_value(&json!({
        "type": "object",
        "properties": {
            "zulu": {"type": "string"},
            "alpha": {"type": "integer"},
            "mike": {"type": "boolean"}
        }
    }));
    let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["zulu", "alpha", "mike"]);
}

#[test]
fn refs_resolve_by_last_segment() {
    let reg = registry();
    let synth = Synthesizer::new(reg.as_object());
    let pet = json!({"name": "example", "status": "available", "tags": ["example"]});
    assert_eq!(synth.example_value(&json!({"$ref": "#/definitions/Pet"})), pet);
    assert_eq!(
        synth.example_value(&json!({"$ref": "#/components/schemas/Pet"})),
        pet
    );
}

#[test]
fn unresolved_ref_is_placeholder() {
    let reg = registry();
    let synth = Synthesizer::new(reg.as_object());
    assert_eq!(
        synth.example_value(&json!({"$ref": "#/definitions/Missing"})),
        json!("example")
    );
    // no registry at all
    assert_eq!(
        Synthesizer::new(None).example_value(&json!({"$ref": "#/definitions/Pet"})),
        json!("example")
    );
}

#[test]
fn self_referencing_schema_terminates() {
    let reg = registry();
    let synth = Synthesizer::new(reg.as_object());
    let value = synth.example_value(&json!({"$ref": "#/definitions/Node"}));
    assert!(value.is_object());

    // follow the `next` chain; it must bottom out in an empty object
    let mut cur = &value;
    let mut links = 0;
    while let Some(next) = cur.get("next") {
        cur = next;
        links += 1;
        assert!(links <= DEFAULT_MAX_DEPTH, "chain longer than the depth cap");
    }
    assert_eq!(cur, &json!({}));
}

#[test]
fn pure_ref_cycle_terminates() {
    let reg = registry();
    let synth = Synthesizer::new(reg.as_object());
    assert_eq!(synth.example_value(&json!({"$ref": "#/definitions/Loop"})), json!({}));
    assert_eq!(synth.sample_body(&json!({"$ref": "#/definitions/Loop"}), &[]), json!({}));
}

#[test]
fn depth_beyond_cap_is_empty_object() {
    let synth = Synthesizer::new(None);
    assert_eq!(
        synth.synthesize(&json!({"type": "string"}), DEFAULT_MAX_DEPTH + 1),
        json!({})
    );
    let shallow = Synthesizer::new(None).with_max_depth(0);
    assert_eq!(
        shallow.example_value(&json!({"type": "object", "properties": {"a": {"type": "string"}}})),
        json!({"a": {}})
    );
}

#[test]
fn required_fields_without_definitions_are_filled() {
    let synth = Synthesizer::new(None);
    let body = synth.sample_body(
        &json!({
            "type": "object",
            "properties": {"id": {"type": "integer"}},
            "required": ["id", "name"]
        }),
        &[],
    );
    assert_eq!(body, json!({"id": 123, "name": "sample_name"}));
}

#[test]
fn explicit_required_list_is_honoured() {
    let synth = Synthesizer::new(None);
    let body = synth.sample_body(
        &json!({"type": "object", "properties": {"a": {"type": "boolean"}}}),
        &["token".to_string()],
    );
    assert_eq!(body, json!({"a": true, "token": "sample_token"}));
    assert_eq!(
        synth.sample_body(&json!({}), &["x".to_string()]),
        json!({"x": "sample_x"})
    );
}

#[test]
fn sample_body_uses_field_names() {
    let reg = registry();
    let synth = Synthesizer::new(reg.as_object());
    let body = synth.sample_body(
        &json!({
            "type": "object",
            "properties": {
                "title": {"type": "string"},
                "count": {"type": "number"},
                "labels": {"type": "array", "items": {"type": "string"}},
                "pets": {"type": "array", "items": {"$ref": "#/definitions/Pet"}},
                "owner": {"$ref": "#/definitions/Pet"},
                "nickname": {"type": "string", "example": "rex"}
            }
        }),
        &[],
    );
    let pet = json!({
        "name": "sample_name",
        "status": "available",
        "tags": ["sample_tags_item"]
    });
    assert_eq!(
        body,
        json!({
            "title": "sample_title",
            "count": 123,
            "labels": ["sample_labels_item"],
            "pets": [pet.clone()],
            "owner": pet,
            "nickname": "rex"
        })
    );
}

#[test]
fn sample_body_treats_untyped_property_lists_as_objects() {
    let synth = Synthesizer::new(None);
    let body = synth.sample_body(&json!({"properties": {"q": {"type": "string"}}}), &[]);
    assert_eq!(body, json!({"q": "sample_q"}));
}

#[test]
fn sample_body_with_unresolved_ref_is_empty_object() {
    let synth = Synthesizer::new(None);
    assert_eq!(
        synth.sample_body(&json!({"$ref": "#/definitions/Ghost"}), &[]),
        json!({})
    );
}

#[test]
fn boolean_required_flag_does_not_make_an_object() {
    let synth = Synthesizer::new(None);
    let body = synth.sample_body(
        &json!({
            "type": "object",
            "properties": {
                "upload": {"type": "file", "required": true},
                "note": {"required": false}
            }
        }),
        &[],
    );
    assert_eq!(body, json!({"upload": "sample_upload", "note": "sample_note"}));
}
