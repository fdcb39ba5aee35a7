//! A single tagged pool of recyclable entities
//!
//! Instances live in a ring. [`ObjectPool::acquire`] takes the head, puts it
//! straight back at the tail, and spawns it, so the least recently handed out
//! instance is always next. The pool does not look at whether that instance
//! is still in use: asking for more concurrent entities than the pool holds
//! silently recycles live ones. Sizing the pool is the caller's job.

use super::host::EntityHost;
use super::instance::PooledInstance;
use crate::foundation::math::{Quat, Vec3};
use std::collections::VecDeque;
use std::fmt;

/// Tagged ring of pooled entities sharing one prototype
pub struct ObjectPool<H: EntityHost> {
    tag: String,
    prototype: H::Prototype,
    container: H::Container,
    queue: VecDeque<PooledInstance<H::Entity>>,
}

impl<H: EntityHost> ObjectPool<H> {
    /// Create a pool and instantiate `count` inactive instances
    pub fn new(
        host: &mut H,
        tag: impl Into<String>,
        prototype: H::Prototype,
        container: H::Container,
        count: usize,
    ) -> Self {
        let mut pool = Self {
            tag: tag.into(),
            prototype,
            container,
            queue: VecDeque::with_capacity(count),
        };
        pool.grow(host, count);
        pool
    }

    /// Tag this pool is registered under
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Prototype every instance is created from
    pub fn prototype(&self) -> &H::Prototype {
        &self.prototype
    }

    /// Container grouping this pool's entities
    pub fn container(&self) -> H::Container {
        self.container
    }

    /// Current capacity
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether the pool holds no instances
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Entities in rotation order (next to be handed out first)
    pub fn entities(&self) -> impl Iterator<Item = H::Entity> + '_ {
        self.queue.iter().map(PooledInstance::entity)
    }

    /// Number of instances the host currently reports as active
    pub fn active_count(&self, host: &H) -> usize {
        self.queue.iter().filter(|instance| instance.is_active(host)).count()
    }

    /// Rotate the ring by one and spawn the selected instance
    ///
    /// Returns `None` only for an empty pool.
    pub fn acquire(&mut self, host: &mut H) -> Option<H::Entity> {
        let instance = self.rotate()?;
        instance.spawn(host);
        Some(instance.entity())
    }

    /// Like [`ObjectPool::acquire`], placing the instance before it spawns
    pub fn acquire_at(&mut self, host: &mut H, position: Vec3, rotation: Quat) -> Option<H::Entity> {
        let instance = self.rotate()?;
        instance.spawn_at(host, position, rotation);
        Some(instance.entity())
    }

    fn rotate(&mut self) -> Option<&PooledInstance<H::Entity>> {
        let instance = self.queue.pop_front()?;
        self.queue.push_back(instance);
        self.queue.back()
    }

    /// Append `count` new inactive instances at the tail of the ring
    pub fn grow(&mut self, host: &mut H, count: usize) {
        self.queue.reserve(count);
        for _ in 0..count {
            let instance = PooledInstance::create(host, &self.prototype, self.container);
            self.queue.push_back(instance);
        }
    }

    /// Destroy up to `count` instances from the head of the ring
    ///
    /// Returns how many were destroyed (clamped to the current size).
    pub fn shrink(&mut self, host: &mut H, count: usize) -> usize {
        let count = count.min(self.queue.len());
        for instance in self.queue.drain(..count) {
            instance.destroy(host);
        }
        count
    }

    /// Destroy every instance and the pool's container
    pub fn destroy(mut self, host: &mut H) -> usize {
        let destroyed = self.shrink(host, self.queue.len());
        host.destroy_container(self.container);
        destroyed
    }
}

impl<H: EntityHost> fmt::Debug for ObjectPool<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectPool")
            .field("tag", &self.tag)
            .field("container", &self.container)
            .field("size", &self.queue.len())
            .finish_non_exhaustive()
    }
}
