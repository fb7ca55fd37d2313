use super::*;
use crate::{digest::bag::ArgBag, digest::value::ArgValue, foundation::core::ControllerBrand};

fn params() -> CollapseParams {
    CollapseParams {
        start: 10_000,
        end: 12_000,
        from: Position::new(0.0, 1.0),
        to: Position::new(1.0, 0.0),
        segments: 8,
        ease: Ease::Linear,
        amplifier: 0.1,
        amplitude: 0.05,
    }
}

#[test]
fn path_is_chained_and_covers_the_span() {
    let mut rng = StdRng::seed_from_u64(7);
    let arcs = collapse_trace(&params(), &mut rng).unwrap();
    assert_eq!(arcs.len(), 9);
    assert_eq!(arcs[0].start, Position::new(0.0, 1.0));
    assert_eq!(arcs.last().unwrap().end_time, 12_000);

    for pair in arcs.windows(2) {
        assert!(pair[0].end_time < pair[1].end_time);
        assert_eq!(pair[0].end, pair[1].start);
        // A start may be pulled back by at most half of its own segment.
        let half = ((pair[1].end_time - pair[0].end_time) / 2).max(1);
        assert!(pair[1].time >= pair[0].end_time - half);
    }
    for arc in &arcs {
        assert!(arc.trace);
        assert_eq!(arc.color, ArcColor::BLUE);
        assert!((X_MIN..=X_MAX).contains(&arc.end.x));
        assert!(arc.end.y >= 0.0);
    }
}

#[test]
fn same_seed_same_path() {
    let a = collapse_trace(&params(), &mut StdRng::seed_from_u64(42)).unwrap();
    let b = collapse_trace(&params(), &mut StdRng::seed_from_u64(42)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn degenerate_inputs_are_domain_errors() {
    let mut rng = StdRng::seed_from_u64(0);
    for p in [
        CollapseParams { segments: 0, ..params() },
        CollapseParams { end: 10_008, ..params() },
        CollapseParams { end: 9_000, ..params() },
        CollapseParams { amplifier: -0.1, ..params() },
        CollapseParams { amplitude: f64::INFINITY, ..params() },
        CollapseParams { start: -1, end: i64::MAX, ..params() },
    ] {
        let err = collapse_trace(&p, &mut rng).unwrap_err();
        assert!(matches!(err, ShardError::SynthesisDomain(_)), "{p:?}");
    }

    // Exactly one free millisecond per cut point still works.
    let tight = CollapseParams { end: 10_009, ..params() };
    let arcs = collapse_trace(&tight, &mut rng).unwrap();
    let ends: Vec<i64> = arcs.iter().map(|a| a.end_time).collect();
    assert_eq!(ends, (10_001..=10_009).collect::<Vec<_>>());
}

#[test]
fn generate_reads_seed_from_arguments() {
    let mut args = ArgBag::new();
    args.insert("timingStart".into(), ArgValue::of_timing_at(0));
    args.insert("timingEnd".into(), ArgValue::of_timing_at(1000));
    args.insert("positionStart".into(), ArgValue::of_position(0.5, 1.0));
    args.insert("positionEnd".into(), ArgValue::of_position(0.5, 0.0));
    args.insert("segments".into(), ArgValue::of_int(4));
    args.insert("amplifier".into(), ArgValue::of_double(0.1));
    args.insert("amplitude".into(), ArgValue::of_double(0.0));
    args.insert("seed".into(), ArgValue::of_long(3));
    let d = Digestion::new(ControllerBrand::new("ArcadePlus", "0.5.3"), args.clone());

    let mut first = Chart::default();
    TraceCollapse.generate(&d, &mut first).unwrap();
    let mut second = Chart::default();
    TraceCollapse.generate(&d, &mut second).unwrap();
    assert_eq!(first.main.notes.len(), 5);
    assert_eq!(first, second);

    args.insert("segments".into(), ArgValue::of_int(-1));
    let d = Digestion::new(ControllerBrand::new("ArcadePlus", "0.5.3"), args);
    let err = TraceCollapse.generate(&d, &mut Chart::default()).unwrap_err();
    assert!(matches!(err, ShardError::SynthesisDomain(_)));
}
