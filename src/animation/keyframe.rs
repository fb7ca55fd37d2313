//! Keyframe synthesis: render a continuous animation as a run of momentarily visible chart objects.
//!
//! The chart format has no sprite-animation primitive. Each sampled frame becomes one scoped
//! timing block whose tempo markers cancel the note-travel offset everywhere except the frame's
//! own `[show, hide)` window, so the objects emitted for that frame are only on screen while the
//! frame is current.

use crate::{
    animation::ease::Ease,
    animation::motion::ease_position,
    chart::model::{ANIMATION_BEATS, Chart, NO_INPUT, Note, TimingGroup},
    foundation::core::{Position, Timing},
    foundation::error::{ShardError, ShardResult},
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Quality and speed settings shared by every frame of an animation.
pub struct BasicConfig {
    /// Samples per second of animation.
    pub frame_rate: u32,
    /// Tempo the visible window plays at.
    pub bpm: f64,
    /// Note-travel offset cancelled outside the visible window (usually the song length).
    pub note_offset: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Start and end values with the easing between them.
pub struct Tween<T> {
    pub start: T,
    pub end: T,
    pub ease: Ease,
}

impl<T> Tween<T> {
    pub fn new(start: T, end: T, ease: Ease) -> Self {
        Self { start, end, ease }
    }
}

impl<T: Copy> Tween<T> {
    /// A tween that holds `value` for the whole animation.
    pub fn constant(value: T) -> Self {
        Self::new(value, value, Ease::Linear)
    }
}

#[derive(Clone, Debug)]
/// Everything one synthesis call consumes.
pub struct AnimationParams<E> {
    pub basic: BasicConfig,
    /// Absolute start of the animation.
    pub start_timing: Timing,
    /// Animation length in milliseconds.
    pub duration: i64,
    pub radius: Tween<f64>,
    pub position: Tween<Position>,
    /// Additional offset added to each frame's note timing.
    pub extra_offset: i64,
    /// When false, frame 0 is not emitted.
    pub show_first_frame: bool,
    /// Shard-specific payload handed to the frame generator.
    pub extra: E,
}

/// Values handed to the per-frame note generator.
#[derive(Clone, Copy, Debug)]
pub struct FrameSample<'a, E> {
    pub index: u32,
    /// `hide + note_offset + extra_offset`: where this frame's notes belong on the timeline.
    pub note_timing: Timing,
    pub radius: f64,
    pub position: Position,
    pub progress: f64,
    pub extra_offset: i64,
    pub extra: &'a E,
}

#[derive(Clone, Debug, PartialEq)]
/// One synthesized frame: its window and the scoped block that realizes it.
pub struct FrameGroup {
    pub index: u32,
    pub progress: f64,
    pub show_timing: Timing,
    pub hide_timing: Timing,
    pub group: TimingGroup,
}

/// Effective sample count `N = floor(frame_rate * duration / 1000) - 1`.
///
/// Fails when the parameters leave no usable denominator (`N < 1`).
pub fn sample_count(frame_rate: u32, duration: i64) -> ShardResult<u32> {
    if frame_rate == 0 {
        return Err(ShardError::synthesis("frame rate must be > 0"));
    }
    if duration <= 0 {
        return Err(ShardError::synthesis(format!(
            "duration must be > 0 ms, got {duration}"
        )));
    }
    let n = i64::from(frame_rate)
        .checked_mul(duration)
        .map(|ms| ms / 1000 - 1)
        .ok_or_else(|| {
            ShardError::synthesis(format!("{frame_rate} fps over {duration} ms overflows"))
        })?;
    if n < 1 {
        return Err(ShardError::synthesis(format!(
            "{frame_rate} fps over {duration} ms yields no frames"
        )));
    }
    u32::try_from(n).map_err(|_| ShardError::synthesis(format!("sample count {n} is too large")))
}

/// `base + delta`, failing instead of leaving the timeline.
pub fn shift_timing(base: Timing, delta: i64) -> ShardResult<Timing> {
    base.checked_add(delta).ok_or_else(|| {
        ShardError::synthesis(format!("timing {base} shifted by {delta} overflows"))
    })
}

/// Chart time at `progress` of the animation, truncated to whole milliseconds.
fn timing_at(start: Timing, duration: i64, progress: f64) -> ShardResult<Timing> {
    shift_timing(start, (duration as f64 * progress).trunc() as i64)
}

/// Sample `params` and build one scoped block per frame.
///
/// `frame` is called once per emitted frame and returns the notes for that frame's block.
#[tracing::instrument(skip(params, frame), fields(start = params.start_timing, duration = params.duration))]
pub fn synthesize<E, F>(params: &AnimationParams<E>, mut frame: F) -> ShardResult<Vec<FrameGroup>>
where
    F: FnMut(&FrameSample<'_, E>) -> ShardResult<Vec<Note>>,
{
    let n = sample_count(params.basic.frame_rate, params.duration)?;
    let denom = f64::from(n);
    let bpm = params.basic.bpm;
    let cancel = -bpm * params.basic.note_offset as f64;

    let mut out = Vec::with_capacity(n as usize + 1);
    for i in 0..=n {
        if i == 0 && !params.show_first_frame {
            continue;
        }

        let progress = f64::from(i) / denom;
        let next_progress = f64::from(i + 1) / denom;

        let r = &params.radius;
        let radius = r.start + (r.end - r.start) * r.ease.apply(progress);
        let p = &params.position;
        let position = ease_position(p.start, p.end, p.ease, progress);

        let show = timing_at(params.start_timing, params.duration, progress)?;
        let hide = timing_at(params.start_timing, params.duration, next_progress)?;

        let mut group = TimingGroup::with_attrs([NO_INPUT]);
        group
            .timing(0, bpm, ANIMATION_BEATS)
            .timing(shift_timing(show, -1)?, cancel, ANIMATION_BEATS)
            .timing(show, 0.0, ANIMATION_BEATS)
            .timing(shift_timing(hide, -1)?, cancel, ANIMATION_BEATS)
            .timing(hide, bpm, ANIMATION_BEATS);

        let note_timing = shift_timing(hide, params.basic.note_offset)
            .and_then(|t| shift_timing(t, params.extra_offset))?;
        let sample = FrameSample {
            index: i,
            note_timing,
            radius,
            position,
            progress,
            extra_offset: params.extra_offset,
            extra: &params.extra,
        };
        for note in frame(&sample)? {
            group.add_note(note);
        }

        out.push(FrameGroup {
            index: i,
            progress,
            show_timing: show,
            hide_timing: hide,
            group,
        });
    }

    tracing::debug!(samples = n, frames = out.len(), "synthesized animation");
    Ok(out)
}

/// Synthesize `params` and commit every frame block into `chart`. Returns the frame count.
pub fn synthesize_into<E, F>(
    chart: &mut Chart,
    params: &AnimationParams<E>,
    frame: F,
) -> ShardResult<usize>
where
    F: FnMut(&FrameSample<'_, E>) -> ShardResult<Vec<Note>>,
{
    let frames = synthesize(params, frame)?;
    let count = frames.len();
    for f in frames {
        chart.commit_group(f.group);
    }
    Ok(count)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/keyframe.rs"]
mod tests;
