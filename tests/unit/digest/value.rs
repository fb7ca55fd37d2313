use super::*;

fn roundtrip(v: &ArgValue) -> ArgValue {
    let json = serde_json::to_string(v).unwrap();
    serde_json::from_str(&json).unwrap()
}

#[test]
fn accessors_match_active_payload() {
    assert_eq!(ArgValue::of_string("a").as_string().unwrap(), "a");
    assert_eq!(ArgValue::of_int(3).as_int().unwrap(), 3);
    assert_eq!(ArgValue::of_long(1 << 40).as_long().unwrap(), 1 << 40);
    assert_eq!(ArgValue::of_double(0.5).as_double().unwrap(), 0.5);
    assert!(ArgValue::of_boolean(true).as_boolean().unwrap());
    assert_eq!(
        ArgValue::of_position(0.25, 1.0).as_position().unwrap(),
        Position::new(0.25, 1.0)
    );
    assert_eq!(ArgValue::of_timing_at(183333).as_timing().unwrap(), 183333);
    assert_eq!(
        ArgValue::of_placeholder("songBpm").as_placeholder().unwrap(),
        "songBpm"
    );
}

#[test]
fn wrong_accessor_reports_type_mismatch() {
    let err = ArgValue::of_int(1).as_string().unwrap_err();
    match err {
        ShardError::TypeMismatch {
            id,
            expected,
            actual,
        } => {
            assert_eq!(id, "<value>");
            assert_eq!(expected, "STRING");
            assert_eq!(actual, "INT");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(ArgValue::of_long(5).as_timing().is_err());
    assert!(ArgValue::DoubleArray(vec![0.0, 1.0]).as_position().is_err());
}

#[test]
fn semantic_tags_widen_to_their_primitive() {
    assert_eq!(ArgValue::of_timing_at(42).as_long().unwrap(), 42);
    assert_eq!(
        ArgValue::of_position(0.5, 1.0).as_double_array().unwrap(),
        vec![0.5, 1.0]
    );
}

#[test]
fn wire_field_names_keep_semantic_tags() {
    let t = serde_json::to_value(ArgValue::of_timing_at(100)).unwrap();
    assert_eq!(t, serde_json::json!({ "timingValue": 100 }));
    let l = serde_json::to_value(ArgValue::of_long(100)).unwrap();
    assert_eq!(l, serde_json::json!({ "longValue": 100 }));
    let p = serde_json::to_value(ArgValue::of_position(0.25, 0.0)).unwrap();
    assert_eq!(p, serde_json::json!({ "positionValue": [0.25, 0.0] }));
    let ph = serde_json::to_value(ArgValue::of_placeholder("songLength")).unwrap();
    assert_eq!(ph, serde_json::json!({ "placeholder": "songLength" }));
}

#[test]
fn roundtrip_preserves_distinctions() {
    let values = [
        ArgValue::of_long(7),
        ArgValue::of_timing_at(7),
        ArgValue::DoubleArray(vec![0.0, 1.0]),
        ArgValue::of_position(0.0, 1.0),
        ArgValue::of_string("songBpm"),
        ArgValue::of_placeholder("songBpm"),
        ArgValue::BooleanArray(vec![true, false]),
    ];
    for v in &values {
        let back = roundtrip(v);
        assert_eq!(&back, v);
        assert_eq!(back.kind_name(), v.kind_name());
    }
}

#[test]
fn chart_payload_roundtrips() {
    let mut chart = Chart::default();
    chart.timing(0, 120.0, 4.0);
    let v = ArgValue::of_chart(chart.clone());
    assert_eq!(roundtrip(&v).as_chart().unwrap(), &chart);
}

#[test]
fn decode_rejects_empty_object() {
    assert!(serde_json::from_str::<ArgValue>("{}").is_err());
}

#[test]
fn decode_prefers_semantic_fields() {
    let v: ArgValue = serde_json::from_str(r#"{"longValue":2,"timingValue":-601000}"#).unwrap();
    assert_eq!(v, ArgValue::of_timing_at(-601000));
    let v: ArgValue =
        serde_json::from_str(r#"{"doubleArrayValue":[1.0],"positionValue":[1.0,2.5]}"#).unwrap();
    assert_eq!(v, ArgValue::of_position(1.0, 2.5));
}
