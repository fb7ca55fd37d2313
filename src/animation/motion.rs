use crate::{
    animation::ease::Ease,
    chart::model::ArcNote,
    foundation::core::Position,
    foundation::error::{ShardError, ShardResult},
};

/// Gravity used by [`Projectile`], in virtual units per squared unit of fall time.
pub const GRAVITY: f64 = 9.81;

/// Zoom applied when no per-segment override is given.
pub const DEFAULT_ZOOM: i64 = 2000;

/// Identity easing.
pub fn linear_ease(progress: f64) -> f64 {
    progress
}

/// Blend two positions per axis: `a + ease(progress) * (b - a)`.
pub fn ease_position(a: Position, b: Position, ease: Ease, progress: f64) -> Position {
    let e = ease.apply(progress);
    Position::new(a.x + e * (b.x - a.x), a.y + e * (b.y - a.y))
}

/// Where `arc` sits at `progress` of its duration, following its curve tag per axis.
pub fn arc_position(arc: &ArcNote, progress: f64) -> Position {
    let (ex, ey) = arc.curve.eases();
    let (a, b) = (arc.start, arc.end);
    Position::new(
        a.x + ex.apply(progress) * (b.x - a.x),
        a.y + ey.apply(progress) * (b.y - a.y),
    )
}

/// Scale between arc coordinates and the integer grid used by projectile models.
///
/// Owned by one synthesis call; shards adjust it per segment instead of sharing a global.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZoomContext {
    zoom: i64,
}

impl Default for ZoomContext {
    fn default() -> Self {
        Self { zoom: DEFAULT_ZOOM }
    }
}

impl ZoomContext {
    pub fn new(zoom: i64) -> ShardResult<Self> {
        if zoom <= 0 {
            return Err(ShardError::validation(format!(
                "zoom constant must be > 0, got {zoom}"
            )));
        }
        Ok(Self { zoom })
    }

    pub fn zoom(self) -> i64 {
        self.zoom
    }

    /// Replace the zoom for subsequent segments.
    pub fn adjust(&mut self, zoom: i64) -> ShardResult<()> {
        *self = Self::new(zoom)?;
        Ok(())
    }

    /// Snap an arc x coordinate onto the zoom grid (truncating toward zero).
    pub fn quantize(self, x: f64) -> f64 {
        (x * self.zoom as f64).trunc()
    }

    /// Map a grid value back to arc coordinates.
    pub fn dequantize(self, v: f64) -> f64 {
        v / self.zoom as f64
    }

    /// Convert a vertical distance into a chart time offset in milliseconds.
    pub fn time_offset(self, distance: f64) -> f64 {
        distance * self.zoom as f64
    }
}

/// Closed-form projectile motion between two points.
///
/// Horizontal motion is linear in progress. Vertical motion follows
/// `y(t) = y0 + v0*t - 0.5*g*t^2` over the fall duration `T = sqrt(2*drop/g)`, with `v0` chosen
/// so that `y(T)` lands on the end point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projectile {
    pub start: Position,
    pub end: Position,
    /// Vertical drop that determines the fall duration. Non-positive values degrade to a
    /// straight line.
    pub drop: f64,
    pub gravity: f64,
}

impl Projectile {
    pub fn new(start: Position, end: Position, drop: f64) -> Self {
        Self {
            start,
            end,
            drop,
            gravity: GRAVITY,
        }
    }

    /// Total virtual fall time `T`.
    pub fn fall_duration(&self) -> f64 {
        if self.drop <= 0.0 || self.gravity <= 0.0 {
            return 0.0;
        }
        (2.0 * self.drop / self.gravity).sqrt()
    }

    /// Launch velocity that lands the arc on `end.y` at `T`.
    pub fn launch_velocity(&self) -> f64 {
        let t = self.fall_duration();
        if t == 0.0 {
            return 0.0;
        }
        (self.end.y - self.start.y + 0.5 * self.gravity * t * t) / t
    }

    /// Vertical coordinate at `progress` in `[0, 1]`.
    pub fn vertical(&self, progress: f64) -> f64 {
        let total = self.fall_duration();
        if total == 0.0 {
            return self.start.y + (self.end.y - self.start.y) * progress;
        }
        if progress >= 1.0 {
            return self.end.y;
        }
        let t = total * progress;
        self.start.y + self.launch_velocity() * t - 0.5 * self.gravity * t * t
    }

    /// Position along the arc with x snapped to the zoom grid of `zoom`.
    pub fn sample(&self, progress: f64, zoom: ZoomContext) -> Position {
        let x0 = zoom.quantize(self.start.x);
        let x1 = zoom.quantize(self.end.x);
        let x = x0 + (x1 - x0) * progress;
        Position::new(zoom.dequantize(x), self.vertical(progress))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/motion.rs"]
mod tests;
