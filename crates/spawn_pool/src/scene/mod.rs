//! # Scene World
//!
//! A deliberately small in-memory host: named containers, game objects with
//! an active flag and a transform, and behaviour components. It implements
//! [`EntityHost`](crate::pooling::EntityHost) so pools can run without an
//! external engine, and backs the demo application and tests.

mod behaviour;
mod prefab;
mod world;

pub use behaviour::{AsAny, Behaviour};
pub use prefab::{BehaviourFactory, Prefab};
pub use world::{GameObject, SceneWorld};
