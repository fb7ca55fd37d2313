use super::*;
use crate::{
    chart::model::NO_INPUT,
    digest::bag::ArgBag,
    digest::value::ArgValue,
    foundation::core::ControllerBrand,
};

fn digestion(fps: i32, control: &str) -> Digestion {
    let mut args = ArgBag::new();
    args.insert("globalOffset".into(), ArgValue::of_long(0));
    args.insert("fps".into(), ArgValue::of_int(fps));
    args.insert("bpm".into(), ArgValue::of_double(126.0));
    args.insert("timingStart".into(), ArgValue::of_timing_at(183333));
    args.insert("timingEnd".into(), ArgValue::of_timing_at(184285));
    args.insert("positionStart".into(), ArgValue::of_position(0.25, 0.0));
    args.insert("positionEnd".into(), ArgValue::of_position(0.0, 1.0));
    args.insert("showFirstFrame".into(), ArgValue::of_boolean(false));
    args.insert("control".into(), ArgValue::of_string(control));
    Digestion::new(ControllerBrand::new("ArcadePlus", "0.5.3"), args)
}

fn arctap_offsets(chart: &Chart) -> Vec<(i64, f64)> {
    chart
        .groups
        .iter()
        .map(|g| {
            let (_, hide) = g.visible_window().unwrap();
            match &g.notes[..] {
                [Note::Arc(arc)] => (arc.arctaps[0] - hide, arc.start.x),
                other => panic!("expected one arc, got {other:?}"),
            }
        })
        .collect()
}

#[test]
fn parse_control_reads_segment_zoom_pairs() {
    let map = parse_control("0:2000; 1:1500").unwrap();
    assert_eq!(map.get(&0), Some(&2000));
    assert_eq!(map.get(&1), Some(&1500));
    assert!(parse_control("").unwrap().is_empty());
    assert!(matches!(parse_control("2000"), Err(ShardError::Validation(_))));
    assert!(matches!(parse_control("a:1"), Err(ShardError::Validation(_))));
}

#[test]
fn schema_declares_all_arguments() {
    let schema = ArcTapJump.schema();
    schema.ensure_unique_ids().unwrap();
    let ids: Vec<&str> = schema.items().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "globalOffset",
            "fps",
            "bpm",
            "timingStart",
            "timingEnd",
            "positionStart",
            "positionEnd",
            "showFirstFrame",
            "control"
        ]
    );
    assert_eq!(
        schema.get("control").unwrap().default_value,
        Some(ArgValue::of_string("0:2000"))
    );
}

#[test]
fn emits_one_hidden_frame_per_sample() {
    let mut chart = Chart::default();
    ArcTapJump
        .generate(&digestion(60, "0:2000"), &mut chart)
        .unwrap();

    // 60 fps over 952 ms gives 56 samples; frame 0 is hidden.
    assert_eq!(chart.groups.len(), 56);
    assert!(chart.groups.iter().all(|g| g.has_attr(NO_INPUT)));

    let offsets = arctap_offsets(&chart);
    assert!(offsets.iter().all(|(dt, _)| (0..=500).contains(dt)));
    let peak = offsets.iter().map(|(dt, _)| *dt).max().unwrap();
    assert!(peak >= 490, "peak {peak}");

    let (last_dt, last_x) = *offsets.last().unwrap();
    assert_eq!(last_dt, 0);
    assert_eq!(last_x, 0.0);
    assert!(offsets[0].1 < 0.25 && offsets[0].1 > 0.24);
}

#[test]
fn control_zoom_scales_the_jump() {
    let mut chart = Chart::default();
    ArcTapJump
        .generate(&digestion(60, "0:1000"), &mut chart)
        .unwrap();
    let peak = arctap_offsets(&chart).iter().map(|(dt, _)| *dt).max().unwrap();
    assert!((240..=250).contains(&peak), "peak {peak}");
}

#[test]
fn invalid_frame_rates_fail() {
    let mut chart = Chart::default();
    for fps in [0, -30] {
        let err = ArcTapJump
            .generate(&digestion(fps, "0:2000"), &mut chart)
            .unwrap_err();
        assert!(matches!(err, ShardError::SynthesisDomain(_)), "{err}");
    }
    assert!(chart.groups.is_empty());
}

#[test]
fn zero_zoom_is_rejected() {
    let mut chart = Chart::default();
    let err = ArcTapJump
        .generate(&digestion(60, "0:0"), &mut chart)
        .unwrap_err();
    assert!(matches!(err, ShardError::Validation(_)));
}
