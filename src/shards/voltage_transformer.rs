//! `voltagetransformer`: adds a short horizontal kink to every stationary arc of a chart.

use crate::{
    chart::model::{ArcCurve, ArcNote, Chart, Note},
    digest::bag::Digestion,
    digest::schema::{ArgItem, ArgKind, ArgSchema},
    foundation::core::LocalizedString,
    foundation::error::{ShardError, ShardResult},
    shard::generator::Generator,
};

pub const ID: &str = "voltagetransformer";

/// Kink width per millisecond of arc length.
pub const AMPLIFIER: f64 = 0.17 / 237.0;

#[derive(Debug, Default)]
pub struct VoltageTransformer;

/// Split a stationary arc into hold, kink out, kink back, hold.
pub fn kink(arc: &ArcNote) -> ShardResult<[ArcNote; 4]> {
    let dt = arc.end_time.checked_sub(arc.time).ok_or_else(|| {
        ShardError::synthesis(format!("arc {}..{} is too long", arc.time, arc.end_time))
    })?;
    let seg = dt / 3;
    let t1 = arc.time + seg;
    let t2 = arc.time + (seg as f64 * 1.5) as i64;
    let t3 = arc.time + seg * 2;
    let rest = arc.start;
    let peak = rest.offset_with(-AMPLIFIER * dt as f64, 0.0);

    let piece = |from_t, to_t, from, to| {
        ArcNote::new(from_t, to_t, from, ArcCurve::S, to, arc.color, false)
    };
    Ok([
        piece(arc.time, t1, rest, rest),
        piece(t1, t2, rest, peak),
        piece(t2, t3, peak, rest),
        piece(t3, arc.end_time, rest, rest),
    ])
}

impl Generator for VoltageTransformer {
    fn id(&self) -> &str {
        ID
    }

    fn name(&self) -> LocalizedString {
        LocalizedString::new("Voltage Transformer").zh_hans("变压器")
    }

    fn schema(&self) -> ArgSchema {
        ArgSchema::new().item(
            ArgItem::new("chart", ArgKind::Chart)
                .named(LocalizedString::new("Chart Objects").zh_hans("物件")),
        )
    }

    fn generate(&self, d: &Digestion, chart: &mut Chart) -> ShardResult<()> {
        let source = d.digest_chart("chart")?;
        let mut kinked = 0usize;
        for note in &source.main.notes {
            match note {
                Note::Arc(arc) if !arc.trace && arc.start == arc.end => {
                    for piece in kink(arc)? {
                        chart.add_note(Note::Arc(piece));
                    }
                    kinked += 1;
                }
                other => {
                    chart.add_note(other.clone());
                }
            }
        }
        tracing::debug!(kinked, "transformed stationary arcs");
        Ok(())
    }

    fn is_internal(&self) -> bool {
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shards/voltage_transformer.rs"]
mod tests;
