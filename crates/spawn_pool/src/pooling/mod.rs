//! # Object Pooling
//!
//! Tagged pools of pre-instantiated entities that are recycled instead of
//! being created and destroyed on demand.
//!
//! ```text
//! ObjectPoolManager  (tag -> pool)
//!         └── ObjectPool  (ring of instances, one prototype, one container)
//!                 └── PooledInstance  (entity handle + cached spawn hook)
//!                             ↓
//!                     EntityHost  (instantiate / activate / destroy)
//! ```
//!
//! Entities are never handed back explicitly. Consumers deactivate them when
//! done and the ring eventually hands them out again.

pub mod error;
pub mod host;
pub mod instance;
pub mod pool;
pub mod manager;

#[cfg(test)]
pub(crate) mod recording_host;

pub use error::PoolError;
pub use host::{EntityHost, PoolObject, PrototypeLibrary};
pub use instance::PooledInstance;
pub use pool::ObjectPool;
pub use manager::{ObjectPoolManager, PoolDescriptor, PoolManagerStats, ROOT_CONTAINER_NAME};
