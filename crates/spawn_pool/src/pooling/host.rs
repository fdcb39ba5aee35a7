//! Host-side seams the pools are built on
//!
//! The pooling code never creates or destroys entities itself. It asks an
//! [`EntityHost`] to do so, which keeps the pools independent of any specific
//! scene representation. [`crate::scene::SceneWorld`] is the in-memory
//! implementation shipped with this crate.

use crate::foundation::math::{Quat, Vec3};
use std::fmt;

/// Optional spawn capability an entity may carry
///
/// Hosts discover this at runtime (see [`EntityHost::has_spawn_hook`]).
/// Entities without it are spawned with no extra callback.
pub trait PoolObject {
    /// Called when the object has been spawned from the object pool.
    ///
    /// Runs before the object is set active, so per-spawn state can be reset
    /// without visible side effects.
    fn on_object_spawn(&mut self);
}

/// Entity instantiation and lifecycle facility provided by the host
pub trait EntityHost {
    /// Template new entities are copied from
    type Prototype;
    /// Handle to a live entity
    type Entity: Copy + Eq + fmt::Debug;
    /// Handle to a logical grouping of entities
    type Container: Copy + Eq + fmt::Debug;

    /// Create a named container, optionally nested under `parent`
    fn create_container(&mut self, name: &str, parent: Option<Self::Container>) -> Self::Container;

    /// Remove a container created by [`EntityHost::create_container`]
    fn destroy_container(&mut self, container: Self::Container);

    /// Produce a new entity from `prototype` inside `container`
    fn instantiate(&mut self, prototype: &Self::Prototype, container: Self::Container) -> Self::Entity;

    /// Destroy an entity and reclaim its resources
    fn destroy(&mut self, entity: Self::Entity);

    /// Activate or deactivate an entity
    fn set_active(&mut self, entity: Self::Entity, active: bool);

    /// Whether an entity is currently active
    fn is_active(&self, entity: Self::Entity) -> bool;

    /// Set world position and rotation
    fn set_placement(&mut self, entity: Self::Entity, position: Vec3, rotation: Quat);

    /// Current world position and rotation, if the entity exists
    fn placement(&self, entity: Self::Entity) -> Option<(Vec3, Quat)>;

    /// Whether the entity implements [`PoolObject`]
    fn has_spawn_hook(&self, entity: Self::Entity) -> bool;

    /// Invoke [`PoolObject::on_object_spawn`] on the entity, if present
    fn run_spawn_hook(&mut self, entity: Self::Entity);
}

/// Lookup of prototypes by the names used in configuration files
pub trait PrototypeLibrary: EntityHost {
    /// Find the prototype registered under `name`
    fn find_prototype(&self, name: &str) -> Option<Self::Prototype>;
}
