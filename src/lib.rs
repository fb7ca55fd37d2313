//! Shardsmith is a pluggable chart-generation host for rhythm-game charts.
//!
//! A *shard* declares a typed argument schema and turns a bag of arguments into a chart. The host
//! keeps a registry of shards and at most one live instance per shard id, and drives each instance
//! through initialize, feed and generate for every request.
//!
//! # Pieces
//!
//! 1. **Arguments**: [`ArgValue`] is the closed set of argument kinds; [`ArgSchema`] declares
//!    which ids a shard reads and validates or marshals a bag against them.
//! 2. **Lifecycle**: [`ShardInstance`] enforces `Constructed -> Initialized -> Fed -> Generated`;
//!    [`ShardRegistry`] and [`InstanceCache`] own descriptors and live instances.
//! 3. **Synthesis**: [`synthesize`] renders a continuous animation as one hidden-until-due scoped
//!    timing block per sampled frame, with motion models in [`Projectile`] and [`ease_position`].
//! 4. **Host**: [`Host`] wires it together for a transport front end or the `shardsmith` CLI.
#![forbid(unsafe_code)]

mod animation;
mod chart;
mod digest;
mod foundation;
mod host;
mod shard;

/// Shards shipped with the host.
pub mod shards;

pub use animation::ease::Ease;
pub use animation::keyframe::{
    AnimationParams, BasicConfig, FrameGroup, FrameSample, Tween, sample_count, shift_timing,
    synthesize, synthesize_into,
};
pub use animation::motion::{
    DEFAULT_ZOOM, GRAVITY, Projectile, ZoomContext, arc_position, ease_position, linear_ease,
};
pub use chart::aff::{parse as parse_aff, serialize as serialize_aff};
pub use chart::model::{
    ANIMATION_BEATS, ArcColor, ArcCurve, ArcNote, Chart, ChartConfig, NO_INPUT, Note, TimingGroup,
    TimingPoint,
};
pub use digest::bag::{ArgBag, Digestion};
pub use digest::schema::{ArgItem, ArgKind, ArgSchema, restriction};
pub use digest::value::ArgValue;
pub use foundation::core::{ControllerBrand, LocalizedString, Position, Timing};
pub use foundation::error::{ErrorKind, ErrorReport, ShardError, ShardResult};
pub use host::brand::parse_brand;
pub use host::config::{ConnectionConfig, HostConfig, ShardsConfig};
pub use host::session::{GenerateRequest, GenerateResponse, Host};
pub use shard::generator::{Generator, ShardFactory, ShardMeta, factory};
pub use shard::instance::{LifecycleState, ShardInstance};
pub use shard::registry::{
    InstanceCache, ShardDescriptor, ShardRegistry, SharedInstance, lock_instance,
};
