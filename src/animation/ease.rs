//! Per-axis progress curves of arcs.
//!
//! An arc's curve tag names one easing for x and, for the two-part tags, another for y:
//! `si` eases x with [`Ease::SineIn`], `siso` eases x in and y out, `b` uses the cubic bezier on
//! both axes. Keyframe tweens reuse the same set so synthesized motion lines up with real arcs.

use crate::chart::model::ArcCurve;

/// Monotonic `[0, 1] -> [0, 1]` progress remapping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Ease {
    /// `s` axis.
    #[default]
    Linear,
    /// `si` axis: `sin(t * pi/2)`, leaves its start quickly.
    SineIn,
    /// `so` axis: `1 - cos(t * pi/2)`, settles on its end quickly.
    SineOut,
    /// `b` axis: `3t^2 - 2t^3`.
    Bezier,
}

impl Ease {
    pub const ALL: [Ease; 4] = [Ease::Linear, Ease::SineIn, Ease::SineOut, Ease::Bezier];

    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        let quarter = t * std::f64::consts::FRAC_PI_2;
        match self {
            Self::Linear => t,
            Self::SineIn => quarter.sin(),
            // 1 - cos(pi/2) is one ulp short of 1.
            Self::SineOut if t >= 1.0 => 1.0,
            Self::SineOut => 1.0 - quarter.cos(),
            Self::Bezier => t * t * (3.0 - 2.0 * t),
        }
    }
}

impl ArcCurve {
    /// Easing of the x and y axes.
    pub fn eases(self) -> (Ease, Ease) {
        use Ease::{Bezier, Linear, SineIn, SineOut};
        match self {
            Self::S => (Linear, Linear),
            Self::B => (Bezier, Bezier),
            Self::Si => (SineIn, Linear),
            Self::So => (SineOut, Linear),
            Self::SiSi => (SineIn, SineIn),
            Self::SiSo => (SineIn, SineOut),
            Self::SoSi => (SineOut, SineIn),
            Self::SoSo => (SineOut, SineOut),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
