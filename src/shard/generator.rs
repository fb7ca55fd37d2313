use std::sync::Arc;

use crate::{
    chart::model::Chart,
    digest::bag::Digestion,
    digest::schema::ArgSchema,
    foundation::core::LocalizedString,
    foundation::error::ShardResult,
};

/// A shard: a declared argument schema plus the logic that turns fed arguments into a chart.
///
/// Implementations must be deterministic for identical digestions unless they document otherwise.
pub trait Generator: Send {
    /// Globally unique shard id.
    fn id(&self) -> &str;

    /// Display name.
    fn name(&self) -> LocalizedString;

    /// Declared arguments, in display order.
    fn schema(&self) -> ArgSchema;

    /// Append this shard's output to `chart`.
    fn generate(&self, digestion: &Digestion, chart: &mut Chart) -> ShardResult<()>;

    /// Called once, right after the owning instance is initialized.
    fn on_genesis(&mut self) -> ShardResult<()> {
        Ok(())
    }

    /// Called once when the host shuts down.
    fn on_termination(&mut self) {}

    /// Built-in shards shipped with the host.
    fn is_internal(&self) -> bool {
        false
    }

    /// Whether the shard reads a per-shard configuration file.
    fn has_config(&self) -> bool {
        false
    }
}

/// Constructs a fresh generator. Called at most once per id by the instance cache.
pub type ShardFactory = Arc<dyn Fn() -> Box<dyn Generator> + Send + Sync>;

/// Wrap a constructor as a [`ShardFactory`].
pub fn factory<G, F>(make: F) -> ShardFactory
where
    G: Generator + 'static,
    F: Fn() -> G + Send + Sync + 'static,
{
    Arc::new(move || Box::new(make()) as Box<dyn Generator>)
}

/// Advertised metadata of a registered shard.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShardMeta {
    pub id: String,
    pub name: LocalizedString,
    pub schema: ArgSchema,
    pub internal: bool,
    #[serde(skip)]
    pub has_config: bool,
}

impl ShardMeta {
    /// Read the metadata a generator declares about itself.
    pub fn of(generator: &dyn Generator) -> Self {
        Self {
            id: generator.id().to_string(),
            name: generator.name(),
            schema: generator.schema(),
            internal: generator.is_internal(),
            has_config: generator.has_config(),
        }
    }
}
