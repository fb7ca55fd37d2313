//! Request pipeline: resolve the shard, marshal arguments, then initialize, feed and generate the
//! cached instance.

use std::collections::BTreeMap;

use crate::{
    chart::model::{Chart, ChartConfig},
    digest::schema::ArgSchema,
    foundation::core::ControllerBrand,
    foundation::error::{ErrorReport, ShardResult},
    host::config::HostConfig,
    shard::generator::ShardMeta,
    shard::registry::{InstanceCache, ShardRegistry, lock_instance},
    shards,
};

/// One generation request as received from a client.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GenerateRequest {
    /// Shard id.
    pub id: String,
    /// Raw arguments keyed by schema item id.
    #[serde(default)]
    pub args: serde_json::Map<String, serde_json::Value>,
    /// Seed for the output chart's header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ChartConfig>,
}

/// Outcome of a request: a chart or a structured error.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GenerateResponse {
    Chart(Chart),
    Error(ErrorReport),
}

/// Shard registry and instance cache behind one request entry point.
#[derive(Debug)]
pub struct Host {
    registry: ShardRegistry,
    cache: InstanceCache,
    config: HostConfig,
}

impl Host {
    pub fn new(registry: ShardRegistry, config: HostConfig) -> Self {
        Self {
            registry,
            cache: InstanceCache::new(),
            config,
        }
    }

    /// Host with every built-in shard not disabled by `config`.
    pub fn with_builtins(config: HostConfig) -> ShardResult<Self> {
        let mut registry = ShardRegistry::new();
        shards::register_builtins(&mut registry, |id| config.shards.is_enabled(id))?;
        Ok(Self::new(registry, config))
    }

    pub fn registry(&self) -> &ShardRegistry {
        &self.registry
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Argument schemas keyed by shard id.
    pub fn advertise(&self) -> BTreeMap<String, ArgSchema> {
        self.registry.advertise()
    }

    /// Metadata of every registered shard, ordered by id.
    pub fn shards(&self) -> Vec<ShardMeta> {
        self.registry
            .list_descriptors()
            .map(|d| d.meta.clone())
            .collect()
    }

    /// Run one generation request.
    ///
    /// Concrete schema defaults fill absent arguments; placeholders never do.
    #[tracing::instrument(skip(self, request), fields(shard = %request.id, brand = %brand))]
    pub fn handle(&self, brand: &ControllerBrand, request: &GenerateRequest) -> ShardResult<Chart> {
        let descriptor = self.registry.lookup(&request.id)?;
        let bag = descriptor.schema().marshal(&request.args, true)?;

        let shared = self
            .cache
            .get_or_create(&request.id, || descriptor.instantiate())?;
        let mut inst = lock_instance(&shared)?;
        let config_path = if descriptor.meta.has_config {
            self.config.shards.config_path(&request.id)
        } else {
            None
        };
        inst.initialize(&request.id, config_path)?;
        inst.feed(brand.clone(), bag)?;
        inst.generate(request.config.clone())
    }

    /// [`Host::handle`], with failures turned into an [`ErrorReport`].
    pub fn respond(&self, brand: &ControllerBrand, request: &GenerateRequest) -> GenerateResponse {
        match self.handle(brand, request) {
            Ok(chart) => GenerateResponse::Chart(chart),
            Err(err) => {
                tracing::warn!(shard = %request.id, error = %err, "generation failed");
                GenerateResponse::Error(err.report())
            }
        }
    }

    /// Deliver the termination hook to every live instance.
    pub fn terminate(&self) -> ShardResult<usize> {
        self.cache.terminate_all()
    }

    /// Number of live shard instances.
    pub fn live_instances(&self) -> ShardResult<usize> {
        self.cache.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/session.rs"]
mod tests;
