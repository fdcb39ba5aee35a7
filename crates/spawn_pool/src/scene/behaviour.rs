//! Behaviour components attached to game objects

use crate::pooling::PoolObject;
use std::any::Any;

/// Downcasting support for behaviours
pub trait AsAny: Any {
    /// Borrow as `&dyn Any`
    fn as_any(&self) -> &dyn Any;
    /// Borrow as `&mut dyn Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Component attached to a game object
///
/// Behaviours opt into pool spawn notifications by returning themselves from
/// [`Behaviour::as_pool_object`]; the world checks this at runtime.
pub trait Behaviour: AsAny {
    /// Spawn capability, if this behaviour has one
    fn as_pool_object(&mut self) -> Option<&mut dyn PoolObject> {
        None
    }

    /// Called when the object is handed back via [`SceneWorld::despawn`](super::SceneWorld::despawn)
    fn on_despawn(&mut self) {}
}
