//! `arctapjump`: an arctap that hops along a parabola from one position to another.
//!
//! Each frame carries a single arctap whose time is pushed back by the projectile's height above
//! the judgement plane, so the tap appears to rise and fall while sliding horizontally.

use std::collections::BTreeMap;

use crate::{
    animation::keyframe::{
        AnimationParams, BasicConfig, FrameSample, Tween, shift_timing, synthesize_into,
    },
    animation::motion::{Projectile, ZoomContext},
    chart::model::{ArcNote, Chart, Note},
    digest::bag::Digestion,
    digest::schema::{ArgItem, ArgKind, ArgSchema, restriction},
    foundation::core::{LocalizedString, Position},
    foundation::error::{ShardError, ShardResult},
    shard::generator::Generator,
};

pub const ID: &str = "arctapjump";

/// Height used as the projectile drop; with start and end on the plane the peak is a quarter of it.
const JUMP_HEIGHT: f64 = 1.0;

#[derive(Debug, Default)]
pub struct ArcTapJump;

#[derive(Clone, Copy, Debug)]
struct JumpTarget {
    target: Position,
    zoom: ZoomContext,
}

/// Parse `segment:zoom` pairs separated by `;`, e.g. `0:2000;1:1500`.
pub fn parse_control(control: &str) -> ShardResult<BTreeMap<usize, i64>> {
    let mut out = BTreeMap::new();
    for pair in control.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let (seg, zoom) = pair.split_once(':').ok_or_else(|| {
            ShardError::validation(format!("control entry `{pair}` must be `segment:zoom`"))
        })?;
        let seg = seg
            .trim()
            .parse()
            .map_err(|_| ShardError::validation(format!("bad control segment `{seg}`")))?;
        let zoom = zoom
            .trim()
            .parse()
            .map_err(|_| ShardError::validation(format!("bad control zoom `{zoom}`")))?;
        out.insert(seg, zoom);
    }
    Ok(out)
}

fn jump_frame(sample: &FrameSample<'_, JumpTarget>) -> ShardResult<Vec<Note>> {
    let JumpTarget { target, zoom } = *sample.extra;
    let arc = Projectile::new(
        Position::new(sample.position.x, 0.0),
        Position::new(target.x, 0.0),
        sample.radius,
    );
    let at = arc.sample(sample.progress, zoom);
    let offset = (zoom.time_offset(at.y) + sample.extra_offset as f64).trunc() as i64;
    let tap = ArcNote::quick_arctap(
        shift_timing(sample.note_timing, offset)?,
        Position::new(at.x, 0.0),
    );
    Ok(vec![Note::Arc(tap)])
}

impl Generator for ArcTapJump {
    fn id(&self) -> &str {
        ID
    }

    fn name(&self) -> LocalizedString {
        LocalizedString::new("Arctap Jump").zh_hans("Arctap 跳跃")
    }

    fn schema(&self) -> ArgSchema {
        ArgSchema::new()
            .item(
                ArgItem::new("globalOffset", ArgKind::Long)
                    .default_value(restriction::song_global_offset())
                    .named(LocalizedString::new("Anim: Global Offset").zh_hans("帧动画: 歌曲长度")),
            )
            .item(
                ArgItem::new("fps", ArgKind::Int)
                    .default_value(60)
                    .named(LocalizedString::new("Anim: FPS").zh_hans("帧动画: 质量 (FPS)")),
            )
            .item(
                ArgItem::new("bpm", ArgKind::Double)
                    .default_value(restriction::song_bpm())
                    .named(LocalizedString::new("Anim: BPM").zh_hans("帧动画: BPM")),
            )
            .item(
                ArgItem::new("timingStart", ArgKind::Timing)
                    .default_value(restriction::editor_current_timing())
                    .named(LocalizedString::new("Start Timing").zh_hans("起始时间")),
            )
            .item(
                ArgItem::new("timingEnd", ArgKind::Timing)
                    .default_value(restriction::editor_delay_timing(1000))
                    .named(LocalizedString::new("End Timing").zh_hans("结束时间")),
            )
            .item(
                ArgItem::new("positionStart", ArgKind::Position)
                    .named(LocalizedString::new("Start Position").zh_hans("起始位置")),
            )
            .item(
                ArgItem::new("positionEnd", ArgKind::Position)
                    .named(LocalizedString::new("End Position").zh_hans("结束位置")),
            )
            .item(
                ArgItem::new("showFirstFrame", ArgKind::Boolean)
                    .default_value(false)
                    .named(LocalizedString::new("Show first frame?").zh_hans("是否显示第一帧")),
            )
            .item(
                ArgItem::new("control", ArgKind::String)
                    .default_value("0:2000")
                    .named(LocalizedString::new("Gravity Control").zh_hans("重力参数")),
            )
    }

    fn generate(&self, d: &Digestion, chart: &mut Chart) -> ShardResult<()> {
        let start = d.digest_timing("timingStart")?;
        let end = d.digest_timing("timingEnd")?;
        let duration = end
            .checked_sub(start)
            .ok_or_else(|| ShardError::synthesis(format!("span {start}..{end} overflows")))?;
        let from = d.digest_position("positionStart")?;
        let to = d.digest_position("positionEnd")?;
        let fps = d.digest_int("fps")?;
        let basic = BasicConfig {
            frame_rate: u32::try_from(fps)
                .map_err(|_| ShardError::synthesis(format!("fps must be > 0, got {fps}")))?,
            bpm: d.digest_double("bpm")?,
            note_offset: d.digest_long("globalOffset")?,
        };

        let control = parse_control(d.digest_string("control")?)?;
        let mut zoom = ZoomContext::default();
        // Only segment 0 exists; entries for later segments are ignored.
        if let Some(z) = control.get(&0) {
            zoom.adjust(*z)?;
        }
        tracing::debug!(zoom = zoom.zoom(), start, end, "arctap jump segment");

        let params = AnimationParams {
            basic,
            start_timing: start,
            duration,
            radius: Tween::constant(JUMP_HEIGHT),
            position: Tween::constant(from),
            extra_offset: 0,
            show_first_frame: d.digest_boolean("showFirstFrame")?,
            extra: JumpTarget { target: to, zoom },
        };
        synthesize_into(chart, &params, jump_frame)?;
        Ok(())
    }

    fn is_internal(&self) -> bool {
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shards/arctap_jump.rs"]
mod tests;
