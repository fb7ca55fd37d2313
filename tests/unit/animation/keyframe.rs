use super::*;
use crate::chart::model::ArcNote;

fn params(duration: i64, show_first_frame: bool) -> AnimationParams<()> {
    AnimationParams {
        basic: BasicConfig {
            frame_rate: 240,
            bpm: 60.0,
            note_offset: 1000,
        },
        start_timing: 10_000,
        duration,
        radius: Tween::new(1.0, 3.0, Ease::Linear),
        position: Tween::new(Position::new(0.0, 0.0), Position::new(1.0, 1.0), Ease::Linear),
        extra_offset: 5,
        show_first_frame,
        extra: (),
    }
}

#[test]
fn sample_count_matches_reference_values() {
    assert_eq!(sample_count(240, 1000).unwrap(), 239);
    assert_eq!(sample_count(240, 500).unwrap(), 119);
    assert_eq!(sample_count(60, 952).unwrap(), 56);
}

#[test]
fn sample_count_rejects_degenerate_inputs() {
    for (fps, duration) in [(0, 1000), (240, 0), (240, -5), (1, 1000), (60, 20)] {
        let err = sample_count(fps, duration).unwrap_err();
        assert!(
            matches!(err, ShardError::SynthesisDomain(_)),
            "fps={fps} duration={duration}"
        );
    }
}

#[test]
fn every_frame_is_emitted_when_first_frame_shown() {
    let frames = synthesize(&params(1000, true), |_| Ok(vec![])).unwrap();
    assert_eq!(frames.len(), 240);
    assert_eq!(frames[0].index, 0);
    assert_eq!(frames[239].index, 239);
}

#[test]
fn hidden_first_frame_skips_exactly_frame_zero() {
    let frames = synthesize(&params(500, false), |_| Ok(vec![])).unwrap();
    assert_eq!(frames.len(), 119);
    assert_eq!(frames[0].index, 1);
    assert_eq!(frames.last().unwrap().index, 119);
}

#[test]
fn frame_block_carries_cancelling_tempo_markers() {
    let p = params(1000, true);
    let frames = synthesize(&p, |_| Ok(vec![])).unwrap();
    let f = &frames[1];
    // progress = 1/239 -> trunc(1000/239) = 4, next = trunc(2000/239) = 8.
    assert_eq!(f.show_timing, 10_004);
    assert_eq!(f.hide_timing, 10_008);

    let t = &f.group.timings;
    assert_eq!(t.len(), 5);
    assert_eq!((t[0].offset, t[0].bpm), (0, 60.0));
    assert_eq!((t[1].offset, t[1].bpm), (10_003, -60_000.0));
    assert_eq!((t[2].offset, t[2].bpm), (10_004, 0.0));
    assert_eq!((t[3].offset, t[3].bpm), (10_007, -60_000.0));
    assert_eq!((t[4].offset, t[4].bpm), (10_008, 60.0));
    assert!(t.iter().all(|m| m.beats == ANIMATION_BEATS));
    assert!(f.group.has_attr(NO_INPUT));
    assert_eq!(f.group.visible_window(), Some((10_004, 10_008)));
}

#[test]
fn windows_are_contiguous_and_ordered() {
    let frames = synthesize(&params(1000, true), |_| Ok(vec![])).unwrap();
    for pair in frames.windows(2) {
        assert_eq!(pair[0].hide_timing, pair[1].show_timing);
        assert!(pair[0].show_timing <= pair[0].hide_timing);
    }
    assert_eq!(frames[0].show_timing, 10_000);
}

#[test]
fn generator_sees_interpolated_sample() {
    let p = params(1000, true);
    let mut seen = Vec::new();
    synthesize(&p, |s| {
        seen.push((s.index, s.note_timing, s.radius, s.position, s.extra_offset));
        Ok(vec![Note::Arc(ArcNote::quick_arctap(s.note_timing, s.position))])
    })
    .unwrap();

    let (index, note_timing, radius, position, extra_offset) = seen[0];
    assert_eq!(index, 0);
    assert_eq!(note_timing, 10_004 + 1000 + 5);
    assert_eq!(radius, 1.0);
    assert_eq!(position, Position::new(0.0, 0.0));
    assert_eq!(extra_offset, 5);

    let (_, _, radius, position, _) = seen[239];
    assert_eq!(radius, 3.0);
    assert_eq!(position, Position::new(1.0, 1.0));
}

#[test]
fn generator_errors_abort_synthesis() {
    let err = synthesize(&params(1000, true), |s| {
        if s.index == 3 {
            Err(ShardError::missing("target"))
        } else {
            Ok(vec![])
        }
    })
    .unwrap_err();
    assert!(matches!(err, ShardError::MissingArgument { .. }));
}

#[test]
fn synthesize_into_commits_one_block_per_frame() {
    let mut chart = Chart::default();
    let n = synthesize_into(&mut chart, &params(500, false), |s| {
        Ok(vec![Note::Tap {
            time: s.note_timing,
            lane: 1,
        }])
    })
    .unwrap();
    assert_eq!(n, 119);
    assert_eq!(chart.groups.len(), 119);
    assert_eq!(chart.note_count(), 119);
}

#[test]
fn timeline_overflow_is_a_domain_error() {
    assert!(matches!(
        sample_count(u32::MAX, i64::MAX),
        Err(ShardError::SynthesisDomain(_))
    ));
    assert!(matches!(
        shift_timing(i64::MAX, 1),
        Err(ShardError::SynthesisDomain(_))
    ));
    assert_eq!(shift_timing(10, -1).unwrap(), 9);

    let mut p = params(1000, true);
    p.basic.note_offset = i64::MAX;
    let err = synthesize(&p, |_| Ok(vec![])).unwrap_err();
    assert!(matches!(err, ShardError::SynthesisDomain(_)));
}
