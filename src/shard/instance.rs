use std::path::{Path, PathBuf};

use crate::{
    chart::model::{Chart, ChartConfig},
    digest::bag::{ArgBag, Digestion},
    digest::schema::ArgSchema,
    foundation::core::ControllerBrand,
    foundation::error::{ShardError, ShardResult},
    shard::generator::Generator,
};

/// Lifecycle position of a [`ShardInstance`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum LifecycleState {
    /// Only schema and display metadata are available.
    Constructed,
    /// Id and configuration assigned; genesis hook has run.
    Initialized,
    /// Holds a validated argument bag and caller identity.
    Fed,
    /// Produced at least one chart from the current bag. Feeding again returns to `Fed`.
    Generated,
}

/// A live shard: the generator plus the state driven by initialize, feed and generate.
pub struct ShardInstance {
    generator: Box<dyn Generator>,
    schema: ArgSchema,
    state: LifecycleState,
    id: Option<String>,
    config: Option<PathBuf>,
    digestion: Option<Digestion>,
    terminated: bool,
}

impl std::fmt::Debug for ShardInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardInstance")
            .field("shard", &self.generator.id())
            .field("state", &self.state)
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl ShardInstance {
    /// Instance enforcing the schema the generator declares.
    pub fn new(generator: Box<dyn Generator>) -> Self {
        let schema = generator.schema();
        Self::with_schema(generator, schema)
    }

    /// Instance enforcing `schema`, typically the one the shard was registered and advertised with.
    pub fn with_schema(generator: Box<dyn Generator>, schema: ArgSchema) -> Self {
        Self {
            generator,
            schema,
            state: LifecycleState::Constructed,
            id: None,
            config: None,
            digestion: None,
            terminated: false,
        }
    }

    /// Skip straight to `Fed`, bypassing the genesis hook. Intended for test harnesses.
    #[cfg(any(test, feature = "test-harness"))]
    pub fn prefed(
        generator: Box<dyn Generator>,
        brand: ControllerBrand,
        args: ArgBag,
    ) -> ShardResult<Self> {
        let mut inst = Self::new(generator);
        inst.schema.validate(&args)?;
        inst.id = Some("test-harness".to_string());
        inst.digestion = Some(Digestion::new(brand, args));
        inst.state = LifecycleState::Fed;
        Ok(inst)
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn schema(&self) -> &ArgSchema {
        &self.schema
    }

    pub fn shard_id(&self) -> &str {
        self.generator.id()
    }

    /// Id assigned by [`ShardInstance::initialize`].
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config.as_deref()
    }

    /// Assign the id and configuration handle, then run the genesis hook.
    ///
    /// Idempotent: once initialized, later calls do nothing.
    pub fn initialize(&mut self, id: &str, config: Option<PathBuf>) -> ShardResult<()> {
        if self.state != LifecycleState::Constructed {
            return Ok(());
        }
        self.generator.on_genesis()?;
        self.id = Some(id.to_string());
        self.config = config;
        self.state = LifecycleState::Initialized;
        tracing::info!(shard = id, "shard initialized");
        Ok(())
    }

    /// Replace the working argument bag and caller identity.
    ///
    /// The bag must satisfy the schema: every declared id present with a resolved value of its kind.
    pub fn feed(&mut self, brand: ControllerBrand, args: ArgBag) -> ShardResult<()> {
        if self.state == LifecycleState::Constructed {
            return Err(ShardError::not_initialized(format!(
                "`{}` must be initialized before feed",
                self.generator.id()
            )));
        }
        self.schema.validate(&args)?;
        self.digestion = Some(Digestion::new(brand, args));
        self.state = LifecycleState::Fed;
        Ok(())
    }

    /// Arguments from the latest feed.
    pub fn digestion(&self) -> ShardResult<&Digestion> {
        self.digestion.as_ref().ok_or_else(|| {
            ShardError::not_initialized(format!(
                "`{}` has not been fed any arguments",
                self.generator.id()
            ))
        })
    }

    pub fn brand(&self) -> ShardResult<&ControllerBrand> {
        Ok(self.digestion()?.brand())
    }

    /// Run the generator against the current bag. Repeatable without re-feeding.
    #[tracing::instrument(skip(self, initial), fields(shard = self.generator.id()))]
    pub fn generate(&mut self, initial: Option<ChartConfig>) -> ShardResult<Chart> {
        let digestion = self.digestion()?;
        let mut chart = Chart::new(initial.unwrap_or_default());
        self.generator.generate(digestion, &mut chart)?;
        self.state = LifecycleState::Generated;
        tracing::debug!(
            notes = chart.note_count(),
            groups = chart.groups.len(),
            "generated chart"
        );
        Ok(chart)
    }

    /// Deliver the termination hook. Only the first call reaches the generator.
    pub fn terminate(&mut self) -> bool {
        if self.terminated {
            return false;
        }
        self.terminated = true;
        self.generator.on_termination();
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shard/instance.rs"]
mod tests;
