//! `tracecollapse`: a trace path that wanders and breaks apart on its way between two positions.
//!
//! The span is cut at random points into `segments + 1` trace arcs. Each arc starts where the
//! previous one ended, overshoots the eased guide path and is pulled back by the next one, with
//! per-segment jitter on position and start time. Output is reproducible for a given `seed`.

use std::collections::BTreeSet;

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    animation::ease::Ease,
    animation::motion::ease_position,
    chart::model::{ArcColor, ArcCurve, ArcNote, Chart, Note},
    digest::bag::Digestion,
    digest::schema::{ArgItem, ArgKind, ArgSchema, restriction},
    foundation::core::{LocalizedString, Position, Timing},
    foundation::error::{ShardError, ShardResult},
    shard::generator::Generator,
};

pub const ID: &str = "tracecollapse";

/// Arcs may not leave `[X_MIN, X_MAX]` horizontally or drop below the ground.
const X_MIN: f64 = -0.5;
const X_MAX: f64 = 1.5;

/// Share of segments that keep their exact cut time.
const STEADY_START: f64 = 0.2;

/// Upper bound for `amplifier` and `amplitude`; larger values only pin arcs to the clamp.
const MAX_JITTER: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollapseParams {
    pub start: Timing,
    pub end: Timing,
    pub from: Position,
    pub to: Position,
    pub segments: u32,
    pub ease: Ease,
    /// Base jitter size.
    pub amplifier: f64,
    /// How far the per-segment jitter size may stray from `amplifier`.
    pub amplitude: f64,
}

impl CollapseParams {
    fn check(&self) -> ShardResult<()> {
        if self.segments == 0 {
            return Err(ShardError::synthesis("segments must be > 0"));
        }
        let span = self.end.checked_sub(self.start).ok_or_else(|| {
            ShardError::synthesis(format!("span {}..{} overflows", self.start, self.end))
        })?;
        if span <= i64::from(self.segments) {
            return Err(ShardError::synthesis(format!(
                "{span} ms cannot hold {} cut points",
                self.segments
            )));
        }
        for (name, v) in [("amplifier", self.amplifier), ("amplitude", self.amplitude)] {
            if !(0.0..=MAX_JITTER).contains(&v) {
                return Err(ShardError::synthesis(format!(
                    "{name} must be within 0..={MAX_JITTER}, got {v}"
                )));
            }
        }
        Ok(())
    }
}

/// Uniform in `[-half, half)`; zero when there is no room.
fn jitter(rng: &mut impl Rng, half: f64) -> f64 {
    if half > 0.0 {
        rng.random_range(-half..half)
    } else {
        0.0
    }
}

/// Distinct cut times strictly inside `(start, end)`, ascending, framed by `start` and `end`.
fn cut_points(rng: &mut impl Rng, start: Timing, end: Timing, count: u32) -> Vec<Timing> {
    let mut cuts = BTreeSet::new();
    while cuts.len() < count as usize {
        cuts.insert(rng.random_range(start + 1..end));
    }
    std::iter::once(start)
        .chain(cuts)
        .chain(std::iter::once(end))
        .collect()
}

/// Mirror `cur` across the guide point at `progress`, then jitter it.
fn overshoot(
    p: &CollapseParams,
    cur: Position,
    progress: f64,
    amp: f64,
    rng: &mut impl Rng,
) -> Position {
    let guide = ease_position(p.from, p.to, p.ease, progress);
    let toward = |from: f64, to: f64| if to > from { 1.0 } else { -1.0 };
    let x = cur.x
        + toward(cur.x, guide.x) * 2.0 * (guide.x - cur.x).abs()
        + jitter(rng, amp * 3.0);
    let y = cur.y
        + toward(cur.y, guide.y) * 2.0 * (guide.y - cur.y).abs()
        + jitter(rng, amp / 2.0);
    Position::new(x.clamp(X_MIN, X_MAX), y.max(0.0))
}

/// Build the collapsing trace path.
pub fn collapse_trace(p: &CollapseParams, rng: &mut impl Rng) -> ShardResult<Vec<ArcNote>> {
    p.check()?;
    let bounds = cut_points(rng, p.start, p.end, p.segments);
    let n = f64::from(p.segments);

    let mut amp = p.amplifier + jitter(rng, p.amplitude);
    let mut cur = p.from;
    let mut next = overshoot(p, cur, 1.0 / n, amp, rng);
    let mut arcs = Vec::with_capacity(bounds.len() - 1);

    for (idx, w) in bounds.windows(2).enumerate() {
        let (cut, until) = (w[0], w[1]);
        amp = p.amplifier + jitter(rng, p.amplitude);

        let half = ((until - cut) / 2).max(1);
        let shift = if rng.random::<f64>() < STEADY_START {
            0
        } else {
            rng.random_range(-half..half)
        };
        arcs.push(ArcNote::new(
            cut.saturating_add(shift),
            until,
            cur,
            ArcCurve::S,
            next,
            ArcColor::BLUE,
            true,
        ));

        let drift = cur.offset_with(
            jitter(rng, p.amplifier / 2.0),
            jitter(rng, p.amplifier / 2.0),
        );
        cur = next;
        next = overshoot(p, drift, (idx + 1) as f64 / n, amp, rng);
    }
    Ok(arcs)
}

#[derive(Debug, Default)]
pub struct TraceCollapse;

impl Generator for TraceCollapse {
    fn id(&self) -> &str {
        ID
    }

    fn name(&self) -> LocalizedString {
        LocalizedString::new("Trace Collapse").zh_hans("黑线崩塌")
    }

    fn schema(&self) -> ArgSchema {
        ArgSchema::new()
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
                ArgItem::new("segments", ArgKind::Int)
                    .default_value(8)
                    .named(LocalizedString::new("Segments").zh_hans("段数")),
            )
            .item(
                ArgItem::new("amplifier", ArgKind::Double)
                    .default_value(0.1)
                    .named(LocalizedString::new("Amplifier").zh_hans("抖动幅度")),
            )
            .item(
                ArgItem::new("amplitude", ArgKind::Double)
                    .default_value(0.05)
                    .named(LocalizedString::new("Amplitude").zh_hans("幅度浮动")),
            )
            .item(
                ArgItem::new("seed", ArgKind::Long)
                    .default_value(0i64)
                    .named(LocalizedString::new("Random Seed").zh_hans("随机种子")),
            )
    }

    fn generate(&self, d: &Digestion, chart: &mut Chart) -> ShardResult<()> {
        let segments = d.digest_int("segments")?;
        let params = CollapseParams {
            start: d.digest_timing("timingStart")?,
            end: d.digest_timing("timingEnd")?,
            from: d.digest_position("positionStart")?,
            to: d.digest_position("positionEnd")?,
            segments: u32::try_from(segments).map_err(|_| {
                ShardError::synthesis(format!("segments must be > 0, got {segments}"))
            })?,
            ease: Ease::Linear,
            amplifier: d.digest_double("amplifier")?,
            amplitude: d.digest_double("amplitude")?,
        };
        let seed = d.digest_long("seed")?;
        let mut rng = StdRng::seed_from_u64(seed as u64);
        let arcs = collapse_trace(&params, &mut rng)?;
        tracing::debug!(seed, arcs = arcs.len(), "collapsed trace");
        for arc in arcs {
            chart.add_note(Note::Arc(arc));
        }
        Ok(())
    }

    fn is_internal(&self) -> bool {
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shards/trace_collapse.rs"]
mod tests;
