//! A single recyclable entity owned by a pool

use super::host::EntityHost;
use crate::foundation::math::{Quat, Vec3};

/// Wrapper around one pooled entity
///
/// The entity belongs to the pool for its entire life. Callers only ever see
/// the entity handle; the wrapper itself never leaves the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PooledInstance<E> {
    entity: E,
    has_spawn_hook: bool,
}

impl<E: Copy> PooledInstance<E> {
    /// Instantiate a new inactive entity from `prototype` under `container`
    ///
    /// The spawn-hook capability is checked once here and cached.
    pub fn create<H>(host: &mut H, prototype: &H::Prototype, container: H::Container) -> Self
    where
        H: EntityHost<Entity = E>,
    {
        let entity = host.instantiate(prototype, container);
        host.set_active(entity, false);
        let has_spawn_hook = host.has_spawn_hook(entity);
        Self { entity, has_spawn_hook }
    }

    /// Handle of the wrapped entity
    pub fn entity(&self) -> E {
        self.entity
    }

    /// Whether the entity carries a spawn hook
    pub fn has_spawn_hook(&self) -> bool {
        self.has_spawn_hook
    }

    /// Whether the entity is currently active in the host
    pub fn is_active<H>(&self, host: &H) -> bool
    where
        H: EntityHost<Entity = E>,
    {
        host.is_active(self.entity)
    }

    /// Run the spawn hook (if any), then activate
    pub fn spawn<H>(&self, host: &mut H)
    where
        H: EntityHost<Entity = E>,
    {
        if self.has_spawn_hook {
            host.run_spawn_hook(self.entity);
        }
        host.set_active(self.entity, true);
    }

    /// Move the entity, then [`PooledInstance::spawn`] it
    pub fn spawn_at<H>(&self, host: &mut H, position: Vec3, rotation: Quat)
    where
        H: EntityHost<Entity = E>,
    {
        host.set_placement(self.entity, position, rotation);
        self.spawn(host);
    }

    /// Release the entity to the host's destruction facility
    pub fn destroy<H>(self, host: &mut H)
    where
        H: EntityHost<Entity = E>,
    {
        host.destroy(self.entity);
    }
}
