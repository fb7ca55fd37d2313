use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::{
    digest::schema::ArgSchema,
    foundation::core::LocalizedString,
    foundation::error::{ShardError, ShardResult},
    shard::generator::{ShardFactory, ShardMeta},
    shard::instance::ShardInstance,
};

/// Registry entry: advertised metadata plus the factory that builds the shard.
#[derive(Clone)]
pub struct ShardDescriptor {
    pub meta: ShardMeta,
    pub factory: ShardFactory,
}

impl std::fmt::Debug for ShardDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardDescriptor")
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}

impl ShardDescriptor {
    pub fn id(&self) -> &str {
        &self.meta.id
    }

    pub fn schema(&self) -> &ArgSchema {
        &self.meta.schema
    }

    /// Build a fresh, unshared instance that enforces the advertised schema.
    pub fn instantiate(&self) -> ShardInstance {
        ShardInstance::with_schema((self.factory)(), self.meta.schema.clone())
    }
}

/// Known shards keyed by id.
///
/// Filled once at startup, read-only afterwards.
#[derive(Default, Debug)]
pub struct ShardRegistry {
    shards: BTreeMap<String, ShardDescriptor>,
}

impl ShardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shard under `id`.
    ///
    /// Fails with [`ShardError::DuplicateId`] when the id is taken, even by an identical entry.
    pub fn register(
        &mut self,
        id: &str,
        schema: ArgSchema,
        name: LocalizedString,
        factory: ShardFactory,
    ) -> ShardResult<()> {
        self.insert(ShardDescriptor {
            meta: ShardMeta {
                id: id.to_string(),
                name,
                schema,
                internal: false,
                has_config: false,
            },
            factory,
        })
    }

    /// Register a shard, reading id, name and schema from one instance built by `factory`.
    pub fn register_generator(&mut self, factory: ShardFactory) -> ShardResult<()> {
        let generator = factory();
        let meta = ShardMeta::of(generator.as_ref());
        self.insert(ShardDescriptor { meta, factory })
    }

    fn insert(&mut self, descriptor: ShardDescriptor) -> ShardResult<()> {
        let id = descriptor.id().to_string();
        if self.shards.contains_key(&id) {
            return Err(ShardError::duplicate_id(id));
        }
        descriptor.schema().ensure_unique_ids()?;
        tracing::info!(
            shard = %id,
            args = descriptor.schema().items().len(),
            internal = descriptor.meta.internal,
            "registered shard"
        );
        self.shards.insert(id, descriptor);
        Ok(())
    }

    pub fn lookup(&self, id: &str) -> ShardResult<&ShardDescriptor> {
        self.shards
            .get(id)
            .ok_or_else(|| ShardError::unknown_shard(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.shards.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.shards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.is_empty()
    }

    /// Descriptors ordered by id.
    pub fn list_descriptors(&self) -> impl Iterator<Item = &ShardDescriptor> {
        self.shards.values()
    }

    /// Argument schemas keyed by shard id, as sent to a connecting client.
    pub fn advertise(&self) -> BTreeMap<String, ArgSchema> {
        self.shards
            .iter()
            .map(|(id, d)| (id.clone(), d.schema().clone()))
            .collect()
    }
}

/// Shared handle to a cached instance.
pub type SharedInstance = Arc<Mutex<ShardInstance>>;

/// At most one live instance per shard id, created lazily.
#[derive(Default, Debug)]
pub struct InstanceCache {
    instances: Mutex<HashMap<String, SharedInstance>>,
}

impl InstanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> ShardResult<MutexGuard<'_, HashMap<String, SharedInstance>>> {
        self.instances
            .lock()
            .map_err(|_| anyhow::anyhow!("instance cache lock poisoned").into())
    }

    /// Return the cached instance for `id`, building it with `create` on first use.
    ///
    /// The cache lock is held across `create`, so concurrent callers never build two instances.
    pub fn get_or_create(
        &self,
        id: &str,
        create: impl FnOnce() -> ShardInstance,
    ) -> ShardResult<SharedInstance> {
        let mut table = self.table()?;
        let entry = table.entry(id.to_string()).or_insert_with(|| {
            tracing::info!(shard = id, "creating shard instance");
            Arc::new(Mutex::new(create()))
        });
        Ok(Arc::clone(entry))
    }

    pub fn get(&self, id: &str) -> ShardResult<Option<SharedInstance>> {
        Ok(self.table()?.get(id).cloned())
    }

    pub fn len(&self) -> ShardResult<usize> {
        Ok(self.table()?.len())
    }

    /// Deliver the termination hook to every cached instance. Returns how many were notified.
    pub fn terminate_all(&self) -> ShardResult<usize> {
        let instances: Vec<SharedInstance> = self.table()?.values().cloned().collect();
        let mut notified = 0;
        for inst in instances {
            let mut inst = lock_instance(&inst)?;
            if inst.terminate() {
                notified += 1;
            }
        }
        tracing::info!(notified, "sent termination to shards");
        Ok(notified)
    }
}

/// Lock a cached instance, mapping poisoning into a request error.
pub fn lock_instance(inst: &SharedInstance) -> ShardResult<MutexGuard<'_, ShardInstance>> {
    inst.lock()
        .map_err(|_| anyhow::anyhow!("shard instance lock poisoned").into())
}

#[cfg(test)]
#[path = "../../tests/unit/shard/registry.rs"]
mod tests;
