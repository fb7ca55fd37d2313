//! Shards shipped with the host.

pub mod arctap_jump;
pub mod trace_collapse;
pub mod voltage_transformer;

use crate::{
    foundation::error::ShardResult,
    shard::generator::{ShardFactory, factory},
    shard::registry::ShardRegistry,
};

/// Factories of every built-in shard.
pub fn builtins() -> Vec<ShardFactory> {
    vec![
        factory(|| arctap_jump::ArcTapJump),
        factory(|| trace_collapse::TraceCollapse),
        factory(|| voltage_transformer::VoltageTransformer),
    ]
}

/// Register every built-in shard whose id passes `enabled`.
pub fn register_builtins(
    registry: &mut ShardRegistry,
    enabled: impl Fn(&str) -> bool,
) -> ShardResult<usize> {
    let mut count = 0;
    for make in builtins() {
        let id = make().id().to_string();
        if !enabled(&id) {
            tracing::info!(shard = %id, "built-in shard disabled");
            continue;
        }
        registry.register_generator(make)?;
        count += 1;
    }
    Ok(count)
}
