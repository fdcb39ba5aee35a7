//! Object Pool Manager
//!
//! Registry of tagged [`ObjectPool`]s. Gameplay code asks for entities by tag
//! and the manager routes the request to the matching pool.
//!
//! Misuse (duplicate tags, unknown tags, over-shrinking) never aborts the
//! caller: the manager logs a warning and either does nothing or clamps.
//! Check the returned `Option`/count where it matters.
//!
//! # Usage
//!
//! ```rust
//! use spawn_pool::pooling::ObjectPoolManager;
//! use spawn_pool::scene::{Prefab, SceneWorld};
//!
//! let mut world = SceneWorld::new();
//! let bullet = world.register_prefab(Prefab::new("bullet"));
//! let mut pools = ObjectPoolManager::new(&mut world).unwrap();
//!
//! pools.create_pool(&mut world, "bullet", bullet, 3);
//! let first = pools.acquire(&mut world, "bullet").unwrap();
//! assert!(world.is_active_object(first));
//!
//! // Unknown tags are reported, not fatal
//! assert!(pools.acquire(&mut world, "missile").is_none());
//! ```

use super::error::PoolError;
use super::host::{EntityHost, PrototypeLibrary};
use super::pool::ObjectPool;
use crate::core::config::PoolConfig;
use crate::foundation::math::{Quat, Vec3};
use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

/// Name of the container all pool containers are parented under
pub const ROOT_CONTAINER_NAME: &str = "Object Pools";

thread_local! {
    static MANAGER_ACTIVE: Cell<bool> = const { Cell::new(false) };
}

/// Marks the current thread as owning a live manager until dropped
///
/// Not `Send`: the claim must be released on the thread whose flag it set.
struct ThreadClaim(PhantomData<*const ()>);

impl ThreadClaim {
    fn acquire() -> Result<Self, PoolError> {
        MANAGER_ACTIVE.with(|active| {
            if active.replace(true) {
                Err(PoolError::ManagerAlreadyActive)
            } else {
                Ok(Self(PhantomData))
            }
        })
    }
}

impl Drop for ThreadClaim {
    fn drop(&mut self) {
        MANAGER_ACTIVE.with(|active| active.set(false));
    }
}

/// Startup description of one pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolDescriptor<P> {
    /// Tag the pool is registered under
    pub tag: String,
    /// Prototype to instantiate copies of
    pub prototype: P,
    /// Number of instances created up front
    pub count: usize,
}

impl<P> PoolDescriptor<P> {
    /// Create a descriptor
    pub fn new(tag: impl Into<String>, prototype: P, count: usize) -> Self {
        Self {
            tag: tag.into(),
            prototype,
            count,
        }
    }
}

/// Statistics for the pool manager
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolManagerStats {
    /// Number of registered pools
    pub active_pools: usize,
    /// Instances across all pools
    pub total_instances: usize,
    /// Successful acquisitions since creation
    pub total_acquired: u64,
    /// Instances created since creation
    pub total_created: u64,
    /// Instances destroyed since creation
    pub total_destroyed: u64,
}

/// Registry mapping tags to object pools
///
/// The limit is one live manager per host thread, not per process: a second
/// [`ObjectPoolManager::new`] on the same thread fails until the first is
/// dropped, while other threads may hold their own. A manager is tied to the
/// thread that created it and cannot be sent elsewhere:
///
/// ```compile_fail
/// use spawn_pool::foundation::math::{Quat, Vec3};
/// use spawn_pool::pooling::{EntityHost, ObjectPoolManager};
///
/// // Every associated type is `Send`, the manager still is not
/// struct Counter(u32);
///
/// impl EntityHost for Counter {
///     type Prototype = u32;
///     type Entity = u32;
///     type Container = u32;
/// #   fn create_container(&mut self, _: &str, _: Option<u32>) -> u32 { self.0 += 1; self.0 }
/// #   fn destroy_container(&mut self, _: u32) {}
/// #   fn instantiate(&mut self, _: &u32, _: u32) -> u32 { self.0 += 1; self.0 }
/// #   fn destroy(&mut self, _: u32) {}
/// #   fn set_active(&mut self, _: u32, _: bool) {}
/// #   fn is_active(&self, _: u32) -> bool { false }
/// #   fn set_placement(&mut self, _: u32, _: Vec3, _: Quat) {}
/// #   fn placement(&self, _: u32) -> Option<(Vec3, Quat)> { None }
/// #   fn has_spawn_hook(&self, _: u32) -> bool { false }
/// #   fn run_spawn_hook(&mut self, _: u32) {}
/// }
///
/// let mut host = Counter(0);
/// let pools = ObjectPoolManager::new(&mut host).unwrap();
/// std::thread::spawn(move || drop(pools));
/// ```
pub struct ObjectPoolManager<H: EntityHost> {
    root: H::Container,
    pools: HashMap<String, ObjectPool<H>>,
    stats: PoolManagerStats,
    _claim: ThreadClaim,
}

impl<H: EntityHost> ObjectPoolManager<H> {
    /// Create the manager and its root container
    pub fn new(host: &mut H) -> Result<Self, PoolError> {
        let claim = ThreadClaim::acquire()?;
        let root = host.create_container(ROOT_CONTAINER_NAME, None);
        log::debug!("Object pool manager created with root container {:?}", root);

        Ok(Self {
            root,
            pools: HashMap::new(),
            stats: PoolManagerStats::default(),
            _claim: claim,
        })
    }

    fn report(err: &PoolError) {
        log::warn!("{err}");
    }

    /// Create a pool of `count` inactive instances under `tag`
    ///
    /// Returns `false` (and leaves the existing pool untouched) when the tag
    /// is already registered. A `count` of zero is rejected too, since a
    /// registered tag always has at least one instance behind it.
    pub fn create_pool(&mut self, host: &mut H, tag: &str, prototype: H::Prototype, count: usize) -> bool {
        if self.pools.contains_key(tag) {
            Self::report(&PoolError::DuplicateTag { tag: tag.to_string() });
            return false;
        }
        if count == 0 {
            Self::report(&PoolError::EmptyPool { tag: tag.to_string() });
            return false;
        }

        let holder = host.create_container(&format!("{tag} - Object Pool"), Some(self.root));
        let pool = ObjectPool::new(host, tag, prototype, holder, count);
        self.pools.insert(tag.to_string(), pool);

        self.stats.total_created += count as u64;
        self.update_stats();

        log::info!("Created object pool '{}' with {} instances", tag, count);
        true
    }

    /// Create every described pool, in order
    ///
    /// Returns how many pools were actually created.
    pub fn bootstrap<I>(&mut self, host: &mut H, descriptors: I) -> usize
    where
        I: IntoIterator<Item = PoolDescriptor<H::Prototype>>,
    {
        let mut created = 0;
        for descriptor in descriptors {
            if self.create_pool(host, &descriptor.tag, descriptor.prototype, descriptor.count) {
                created += 1;
            }
        }
        created
    }

    /// Rotate the pool for `tag` and spawn the selected instance
    ///
    /// The instance is handed out whether or not it is still active, so a
    /// pool smaller than the number of concurrently live entities will
    /// recycle entities that are still in use.
    pub fn acquire(&mut self, host: &mut H, tag: &str) -> Option<H::Entity> {
        let entity = self.pool_for(tag, "get object from")?.acquire(host);
        if entity.is_some() {
            self.stats.total_acquired += 1;
        }
        entity
    }

    /// Like [`ObjectPoolManager::acquire`], placing the instance first
    pub fn acquire_at(&mut self, host: &mut H, tag: &str, position: Vec3, rotation: Quat) -> Option<H::Entity> {
        let entity = self
            .pool_for(tag, "get object from")?
            .acquire_at(host, position, rotation);
        if entity.is_some() {
            self.stats.total_acquired += 1;
        }
        entity
    }

    /// Add `count` inactive instances to the tail of the pool's ring
    ///
    /// Returns the number of instances added.
    pub fn grow(&mut self, host: &mut H, tag: &str, count: usize) -> usize {
        if count == 0 {
            return 0;
        }
        let Some(pool) = self.pool_for(tag, "increase size of") else {
            return 0;
        };
        pool.grow(host, count);
        log::debug!("Grew pool '{}' by {} to {}", tag, count, pool.len());

        self.stats.total_created += count as u64;
        self.update_stats();
        count
    }

    /// Destroy up to `count` instances from the head of the pool's ring
    ///
    /// An emptied pool is unregistered and its container destroyed. Returns
    /// the number of instances destroyed.
    pub fn shrink(&mut self, host: &mut H, tag: &str, count: usize) -> usize {
        if count == 0 {
            return 0;
        }
        let Some(pool) = self.pool_for(tag, "decrease size of") else {
            return 0;
        };

        if count > pool.len() {
            Self::report(&PoolError::OverShrink {
                tag: tag.to_string(),
                size: pool.len(),
                requested: count,
            });
        }
        let destroyed = pool.shrink(host, count);
        log::debug!("Shrank pool '{}' by {} to {}", tag, destroyed, pool.len());

        if pool.is_empty() {
            if let Some(pool) = self.pools.remove(tag) {
                pool.destroy(host);
            }
            log::info!("Removed empty object pool '{}'", tag);
        }

        self.stats.total_destroyed += destroyed as u64;
        self.update_stats();
        destroyed
    }

    fn pool_for(&mut self, tag: &str, operation: &'static str) -> Option<&mut ObjectPool<H>> {
        let pool = self.pools.get_mut(tag);
        if pool.is_none() {
            Self::report(&PoolError::UnknownTag { tag: tag.to_string(), operation });
        }
        pool
    }

    /// Check if a specific pool exists
    pub fn has_pool(&self, tag: &str) -> bool {
        self.pools.contains_key(tag)
    }

    /// Borrow the pool registered under `tag`
    pub fn pool(&self, tag: &str) -> Option<&ObjectPool<H>> {
        self.pools.get(tag)
    }

    /// Capacity of the pool registered under `tag`
    pub fn pool_size(&self, tag: &str) -> Option<usize> {
        self.pools.get(tag).map(ObjectPool::len)
    }

    /// Registered tags, in no particular order
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.pools.keys().map(String::as_str)
    }

    /// Number of registered pools
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    /// Check if any pools exist
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Container every pool container is parented under
    pub fn root_container(&self) -> H::Container {
        self.root
    }

    /// Get pool manager statistics
    pub fn stats(&self) -> &PoolManagerStats {
        &self.stats
    }

    fn update_stats(&mut self) {
        self.stats.active_pools = self.pools.len();
        self.stats.total_instances = self.pools.values().map(ObjectPool::len).sum();
    }

    /// Destroy every pooled entity and container
    pub fn shutdown(mut self, host: &mut H) {
        let destroyed: usize = self.pools.drain().map(|(_, pool)| pool.destroy(host)).sum();
        host.destroy_container(self.root);
        log::info!("Object pool manager shut down, destroyed {} instances", destroyed);
    }
}

impl<H: PrototypeLibrary> ObjectPoolManager<H> {
    /// Create the pools listed in configuration, resolving prefab names
    ///
    /// Entries naming an unknown prefab are skipped with a warning.
    pub fn bootstrap_from_config(&mut self, host: &mut H, pools: &[PoolConfig]) -> usize {
        let descriptors: Vec<_> = pools
            .iter()
            .filter_map(|config| match host.find_prototype(&config.prefab) {
                Some(prototype) => Some(PoolDescriptor::new(config.tag.clone(), prototype, config.count)),
                None => {
                    Self::report(&PoolError::UnknownPrototype {
                        tag: config.tag.clone(),
                        prefab: config.prefab.clone(),
                    });
                    None
                }
            })
            .collect();
        self.bootstrap(host, descriptors)
    }
}

impl<H: EntityHost> fmt::Debug for ObjectPoolManager<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectPoolManager")
            .field("root", &self.root)
            .field("pools", &self.pools)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pooling::recording_host::{HostEvent, RecordingHost};

    fn setup() -> (RecordingHost, ObjectPoolManager<RecordingHost>) {
        let mut host = RecordingHost::new();
        let manager = ObjectPoolManager::new(&mut host).unwrap();
        (host, manager)
    }

    #[test]
    fn test_create_pool() {
        let (mut host, mut pools) = setup();

        assert!(pools.create_pool(&mut host, "bullet", "bullet", 5));

        assert_eq!(pools.pool_size("bullet"), Some(5));
        assert_eq!(pools.pool("bullet").unwrap().active_count(&host), 0);
        let (holder, parent) = host.container_named("bullet - Object Pool").unwrap();
        assert_eq!(parent, Some(pools.root_container()));
        assert_eq!(pools.pool("bullet").unwrap().container(), holder);
    }

    #[test]
    fn test_duplicate_tag_leaves_pool_untouched() {
        let (mut host, mut pools) = setup();
        pools.create_pool(&mut host, "bullet", "bullet", 2);
        let before: Vec<u32> = pools.pool("bullet").unwrap().entities().collect();
        host.clear_events();

        assert!(!pools.create_pool(&mut host, "bullet", "hooked", 7));

        assert!(host.events().is_empty());
        assert_eq!(pools.pool("bullet").unwrap().entities().collect::<Vec<_>>(), before);
        assert_eq!(*pools.pool("bullet").unwrap().prototype(), "bullet");
    }

    #[test]
    fn test_bullet_rotation_example() {
        let (mut host, mut pools) = setup();
        pools.create_pool(&mut host, "bullet", "bullet", 3);
        let created: Vec<u32> = pools.pool("bullet").unwrap().entities().collect();

        let a = pools.acquire(&mut host, "bullet").unwrap();
        let b = pools.acquire(&mut host, "bullet").unwrap();
        let c = pools.acquire(&mut host, "bullet").unwrap();
        let d = pools.acquire(&mut host, "bullet").unwrap();

        assert_eq!(vec![a, b, c], created);
        assert_eq!(d, a);
        assert_eq!(pools.stats().total_acquired, 4);
    }

    #[test]
    fn test_acquire_activates_and_runs_hook() {
        let (mut host, mut pools) = setup();
        pools.create_pool(&mut host, "spark", "hooked", 1);

        let entity = pools.acquire(&mut host, "spark").unwrap();

        assert!(host.is_active(entity));
        assert_eq!(host.spawn_count(entity), 1);
        host.deactivate(entity);
        pools.acquire(&mut host, "spark");
        assert_eq!(host.spawn_count(entity), 2);
    }

    #[test]
    fn test_acquire_at_sets_placement() {
        let (mut host, mut pools) = setup();
        pools.create_pool(&mut host, "bullet", "bullet", 2);
        let position = Vec3::new(0.0, 10.0, -3.0);
        let rotation = Quat::from_euler_angles(0.1, 0.2, 0.3);

        let entity = pools.acquire_at(&mut host, "bullet", position, rotation).unwrap();

        assert!(host.is_active(entity));
        assert_eq!(host.placement(entity), Some((position, rotation)));
    }

    #[test]
    fn test_unknown_tag_is_not_fatal() {
        let (mut host, mut pools) = setup();
        host.clear_events();

        assert_eq!(pools.acquire(&mut host, "ghost"), None);
        assert_eq!(pools.acquire_at(&mut host, "ghost", Vec3::zeros(), Quat::identity()), None);
        assert_eq!(pools.grow(&mut host, "ghost", 3), 0);
        assert_eq!(pools.shrink(&mut host, "ghost", 3), 0);

        assert!(host.events().is_empty());
        assert!(pools.is_empty());
        assert_eq!(pools.stats().total_acquired, 0);
    }

    #[test]
    fn test_grow() {
        let (mut host, mut pools) = setup();
        pools.create_pool(&mut host, "bullet", "bullet", 2);
        let original: Vec<u32> = pools.pool("bullet").unwrap().entities().collect();

        assert_eq!(pools.grow(&mut host, "bullet", 3), 3);

        let pool = pools.pool("bullet").unwrap();
        let all: Vec<u32> = pool.entities().collect();
        assert_eq!(all.len(), 5);
        assert_eq!(&all[..2], original.as_slice());
        assert!(all[2..].iter().all(|e| !host.is_active(*e)));
        assert!(all[2..].iter().all(|e| host.container_of(*e) == Some(pool.container())));
        assert_eq!(pools.stats().total_instances, 5);
    }

    #[test]
    fn test_zero_counts_are_no_ops() {
        let (mut host, mut pools) = setup();
        pools.create_pool(&mut host, "bullet", "bullet", 2);
        host.clear_events();

        assert_eq!(pools.grow(&mut host, "bullet", 0), 0);
        assert_eq!(pools.shrink(&mut host, "bullet", 0), 0);
        // Zero is checked before the tag, so no warning either
        assert_eq!(pools.grow(&mut host, "ghost", 0), 0);

        assert!(host.events().is_empty());
        assert_eq!(pools.pool_size("bullet"), Some(2));
    }

    #[test]
    fn test_shrink() {
        let (mut host, mut pools) = setup();
        pools.create_pool(&mut host, "bullet", "bullet", 4);
        let order: Vec<u32> = pools.pool("bullet").unwrap().entities().collect();

        assert_eq!(pools.shrink(&mut host, "bullet", 3), 3);

        assert_eq!(pools.pool_size("bullet"), Some(1));
        assert!(order[..3].iter().all(|e| !host.is_alive(*e)));
        assert!(host.is_alive(order[3]));
        assert_eq!(pools.stats().total_destroyed, 3);
    }

    #[test]
    fn test_over_shrink_clamps_and_removes_pool() {
        let (mut host, mut pools) = setup();
        pools.create_pool(&mut host, "bullet", "bullet", 2);
        let (holder, _) = host.container_named("bullet - Object Pool").unwrap();

        assert_eq!(pools.shrink(&mut host, "bullet", 5), 2);

        assert!(!pools.has_pool("bullet"));
        assert_eq!(pools.pool_size("bullet"), None);
        assert_eq!(host.live_count(), 0);
        assert!(host.events().contains(&HostEvent::ContainerDestroyed { container: holder }));
        // The tag can be reused afterwards
        assert!(pools.create_pool(&mut host, "bullet", "bullet", 1));
    }

    #[test]
    fn test_bootstrap_in_order_rejecting_duplicates() {
        let (mut host, mut pools) = setup();
        let created = pools.bootstrap(
            &mut host,
            vec![
                PoolDescriptor::new("bullet", "bullet", 2),
                PoolDescriptor::new("spark", "hooked", 1),
                PoolDescriptor::new("bullet", "hooked", 9),
            ],
        );

        assert_eq!(created, 2);
        assert_eq!(pools.pool_size("bullet"), Some(2));
        assert_eq!(pools.pool_size("spark"), Some(1));
        let mut tags: Vec<&str> = pools.tags().collect();
        tags.sort_unstable();
        assert_eq!(tags, vec!["bullet", "spark"]);

        let bullet = pools.pool("bullet").unwrap().entities().next().unwrap();
        let spark = pools.pool("spark").unwrap().entities().next().unwrap();
        assert!(bullet < spark, "configuration order is creation order");
    }

    #[test]
    fn test_bootstrap_from_config_skips_unknown_prefab() {
        let (mut host, mut pools) = setup();
        let config = vec![
            PoolConfig::new("bullet", "bullet", 3),
            PoolConfig::new("laser", "no_such_prefab", 3),
            PoolConfig::new("fx", "hooked_bullet", 2),
        ];

        assert_eq!(pools.bootstrap_from_config(&mut host, &config), 2);
        assert!(!pools.has_pool("laser"));
        let fx = pools.pool("fx").unwrap().entities().next().unwrap();
        assert_eq!(host.prototype_of(fx), Some("hooked_bullet"));
    }

    #[test]
    fn test_second_manager_on_thread_rejected() {
        let (mut host, pools) = setup();
        assert!(matches!(
            ObjectPoolManager::new(&mut host),
            Err(PoolError::ManagerAlreadyActive)
        ));
        drop(pools);
        assert!(ObjectPoolManager::new(&mut host).is_ok());
    }

    #[test]
    fn test_claims_are_per_thread() {
        let (_host, _pools) = setup();

        let worker = std::thread::spawn(|| {
            let mut host = RecordingHost::new();
            let first = ObjectPoolManager::new(&mut host);
            let second = ObjectPoolManager::new(&mut host);
            (first.is_ok(), matches!(second, Err(PoolError::ManagerAlreadyActive)))
        });

        assert_eq!(worker.join().unwrap(), (true, true));
        // The worker's claim never touched this thread's flag
        let mut other = RecordingHost::new();
        assert!(matches!(
            ObjectPoolManager::new(&mut other),
            Err(PoolError::ManagerAlreadyActive)
        ));
    }

    #[test]
    fn test_claim_released_on_owning_thread() {
        let worker = std::thread::spawn(|| {
            let mut host = RecordingHost::new();
            drop(ObjectPoolManager::new(&mut host).unwrap());
            ObjectPoolManager::new(&mut host).is_ok()
        });
        assert!(worker.join().unwrap());

        let (mut host, pools) = setup();
        drop(pools);
        assert!(ObjectPoolManager::new(&mut host).is_ok());
    }

    #[test]
    fn test_zero_count_pool_rejected() {
        let (mut host, mut pools) = setup();
        host.clear_events();

        assert!(!pools.create_pool(&mut host, "spark", "plain", 0));

        assert!(!pools.has_pool("spark"));
        assert_eq!(pools.pool_size("spark"), None);
        assert!(host.events().is_empty(), "no container is created for a rejected pool");
        assert_eq!(pools.acquire(&mut host, "spark"), None);
        assert_eq!(pools.stats().active_pools, 0);
        // The tag stays free for a real pool
        assert!(pools.create_pool(&mut host, "spark", "plain", 1));
    }

    #[test]
    fn test_bootstrap_skips_zero_count_entries() {
        let (mut host, mut pools) = setup();
        let config = vec![
            PoolConfig::new("bullet", "bullet", 2),
            PoolConfig::new("spark", "hooked", 0),
        ];

        assert_eq!(pools.bootstrap_from_config(&mut host, &config), 1);
        assert!(pools.has_pool("bullet"));
        assert!(!pools.has_pool("spark"));
    }

    #[test]
    fn test_shutdown_destroys_everything() {
        let (mut host, mut pools) = setup();
        pools.create_pool(&mut host, "bullet", "bullet", 3);
        pools.create_pool(&mut host, "spark", "hooked", 2);

        pools.shutdown(&mut host);

        assert_eq!(host.live_count(), 0);
        assert_eq!(host.container_count(), 0);
        // The thread claim is released with the manager
        assert!(ObjectPoolManager::new(&mut host).is_ok());
    }

    #[test]
    fn test_error_messages() {
        let err = PoolError::UnknownTag { tag: "ghost".into(), operation: "get object from" };
        assert_eq!(
            err.to_string(),
            "Tried to get object from pool 'ghost', but pool does not exist! Call create_pool() first?"
        );
        let err = PoolError::OverShrink { tag: "bullet".into(), size: 2, requested: 5 };
        assert!(err.to_string().contains("only holds 2"));
        let err = PoolError::EmptyPool { tag: "spark".into() };
        assert!(err.to_string().contains("at least one"));
    }
}
