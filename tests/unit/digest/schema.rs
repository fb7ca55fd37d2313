use super::*;
use serde_json::json;

fn schema() -> ArgSchema {
    ArgSchema::new()
        .item(ArgItem::new("timingStart", ArgKind::Timing).default_value(restriction::editor_current_timing()))
        .item(ArgItem::new("positionStart", ArgKind::Position))
        .item(ArgItem::new("fps", ArgKind::Int).default_value(60))
        .item(ArgItem::new("bpm", ArgKind::Double).default_value(restriction::song_bpm()))
}

fn obj(v: Value) -> serde_json::Map<String, Value> {
    v.as_object().unwrap().clone()
}

#[test]
fn missing_ids_reports_exactly_the_absent_items() {
    let s = schema();
    let mut bag = ArgBag::new();
    bag.insert("fps".into(), ArgValue::of_int(60));
    bag.insert("unrelated".into(), ArgValue::of_int(1));

    let missing = s.missing_ids(&bag);
    let expected: BTreeSet<String> = ["timingStart", "positionStart", "bpm"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(missing, expected);

    for item in s.items() {
        bag.insert(item.id.clone(), ArgValue::of_int(0));
    }
    assert!(s.missing_ids(&bag).is_empty());
}

#[test]
fn validate_rejects_missing_then_wrong_kind() {
    let s = schema();
    let err = s.validate(&ArgBag::new()).unwrap_err();
    assert!(matches!(err, ShardError::MissingArgument { .. }));
    assert!(err.to_string().contains("timingStart"));

    let mut bag = ArgBag::new();
    bag.insert("timingStart".into(), ArgValue::of_long(5));
    bag.insert("positionStart".into(), ArgValue::of_position(0.0, 1.0));
    bag.insert("fps".into(), ArgValue::of_int(60));
    bag.insert("bpm".into(), ArgValue::of_double(120.0));
    match s.validate(&bag).unwrap_err() {
        ShardError::TypeMismatch { id, expected, actual } => {
            assert_eq!(id, "timingStart");
            assert_eq!(expected, "TIMING");
            assert_eq!(actual, "LONG");
        }
        other => panic!("unexpected error: {other}"),
    }

    bag.insert("timingStart".into(), ArgValue::of_timing_at(5));
    s.validate(&bag).unwrap();
}

#[test]
fn validate_rejects_unresolved_placeholder() {
    let s = ArgSchema::new()
        .item(ArgItem::new("bpm", ArgKind::Double))
        .item(ArgItem::new("timingStart", ArgKind::Timing));
    let mut bag = ArgBag::new();
    bag.insert("bpm".into(), restriction::song_bpm());
    bag.insert("timingStart".into(), ArgValue::of_timing_at(0));
    assert!(matches!(s.validate(&bag), Err(ShardError::Validation(_))));

    bag.insert("bpm".into(), ArgValue::of_double(120.0));
    bag.insert("timingStart".into(), restriction::editor_delay_timing(250));
    let err = s.validate(&bag).unwrap_err();
    assert!(matches!(err, ShardError::Validation(_)));
    assert!(err.to_string().contains("timingStart"));

    bag.insert("timingStart".into(), ArgValue::of_timing_at(-599_999));
    s.validate(&bag).unwrap();
}

#[test]
fn duplicate_item_ids_are_rejected() {
    let s = ArgSchema::new()
        .item(ArgItem::new("a", ArgKind::Int))
        .item(ArgItem::new("a", ArgKind::Long));
    assert!(matches!(s.ensure_unique_ids(), Err(ShardError::Validation(_))));
    schema().ensure_unique_ids().unwrap();
}

#[test]
fn marshal_converts_per_declared_kind() {
    let bag = schema()
        .marshal(
            &obj(json!({
                "timingStart": 183333,
                "positionStart": [0.25, 0.0],
                "fps": 120,
                "bpm": 126,
                "ignored": "x"
            })),
            false,
        )
        .unwrap();
    assert_eq!(bag["timingStart"], ArgValue::of_timing_at(183333));
    assert_eq!(bag["positionStart"], ArgValue::of_position(0.25, 0.0));
    assert_eq!(bag["fps"], ArgValue::of_int(120));
    assert_eq!(bag["bpm"], ArgValue::of_double(126.0));
    assert!(!bag.contains_key("ignored"));
}

#[test]
fn marshal_reports_missing_and_shape_errors() {
    let s = schema();
    let err = s
        .marshal(&obj(json!({ "positionStart": [0.0, 0.0] })), false)
        .unwrap_err();
    assert!(matches!(err, ShardError::MissingArgument { ref id } if id == "timingStart"));

    let err = s
        .marshal(
            &obj(json!({ "timingStart": 1, "positionStart": [0.0], "fps": 1, "bpm": 1.0 })),
            false,
        )
        .unwrap_err();
    assert!(matches!(err, ShardError::TypeMismatch { ref id, .. } if id == "positionStart"));

    let err = s
        .marshal(
            &obj(json!({ "timingStart": "soon", "positionStart": [0.0, 0.0], "fps": 1, "bpm": 1.0 })),
            false,
        )
        .unwrap_err();
    assert!(matches!(
        err,
        ShardError::TypeMismatch { actual: "string", .. }
    ));
}

#[test]
fn marshal_defaults_skip_placeholders() {
    let s = schema();
    let raw = obj(json!({ "timingStart": 0, "positionStart": [0.0, 0.0], "bpm": 100.0 }));
    let bag = s.marshal(&raw, true).unwrap();
    assert_eq!(bag["fps"], ArgValue::of_int(60));

    let raw = obj(json!({ "timingStart": 0, "positionStart": [0.0, 0.0] }));
    let err = s.marshal(&raw, true).unwrap_err();
    assert!(matches!(err, ShardError::MissingArgument { ref id } if id == "bpm"));
}

#[test]
fn marshal_rejects_wire_placeholders() {
    let s = ArgSchema::new().item(ArgItem::new("bpm", ArgKind::Double));
    let err = s
        .marshal(&obj(json!({ "bpm": { "placeholder": "songBpm" } })), false)
        .unwrap_err();
    assert!(matches!(err, ShardError::Validation(_)));

    let timing = ArgSchema::new().item(ArgItem::new("timingStart", ArgKind::Timing));
    let err = timing
        .marshal(&obj(json!({ "timingStart": -600_000 })), false)
        .unwrap_err();
    assert!(matches!(err, ShardError::Validation(_)));

    let bag = s
        .marshal(&obj(json!({ "bpm": { "doubleValue": 90.0 } })), false)
        .unwrap();
    assert_eq!(bag["bpm"], ArgValue::of_double(90.0));
}

#[test]
fn marshal_parses_chart_text() {
    let s = ArgSchema::new().item(ArgItem::new("chart", ArgKind::Chart));
    let raw = obj(json!({ "chart": "AudioOffset:0\n-\ntiming(0,120.00,4.00);\n(100,1);\n" }));
    let bag = s.marshal(&raw, false).unwrap();
    let chart = bag["chart"].as_chart().unwrap();
    assert_eq!(chart.note_count(), 1);
}

#[test]
fn restrictions_encode_editor_timings() {
    assert_eq!(
        restriction::editor_current_timing(),
        ArgValue::of_timing_at(-600000)
    );
    assert_eq!(
        restriction::editor_delay_timing(1000),
        ArgValue::of_timing_at(-601000)
    );
    assert!(restriction::is_restriction(&restriction::song_length()));
    assert!(restriction::is_restriction(&restriction::editor_delay_timing(6000)));
    assert!(!restriction::is_restriction(&ArgValue::of_timing_at(0)));
    assert_eq!(
        schema().defaults().keys().collect::<Vec<_>>(),
        vec!["fps"]
    );
}

#[test]
fn advertises_items_with_type_tags() {
    let s = ArgSchema::new().item(
        ArgItem::new("timingEnd", ArgKind::Timing)
            .default_value(restriction::editor_delay_timing(1000))
            .named(LocalizedString::new("End Timing").zh_hans("结束时间")),
    );
    let v = serde_json::to_value(&s).unwrap();
    assert_eq!(
        v,
        json!([{
            "id": "timingEnd",
            "type": "TIMING",
            "defaultValue": { "timingValue": -601000 },
            "name": { "en": "End Timing", "zhHans": "结束时间" }
        }])
    );
}
