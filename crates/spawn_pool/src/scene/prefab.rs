//! Prefab templates that the world instantiates copies of

use super::behaviour::Behaviour;
use crate::foundation::math::Transform;
use std::fmt;
use std::rc::Rc;

/// Constructor for a fresh behaviour instance
pub type BehaviourFactory = Rc<dyn Fn() -> Box<dyn Behaviour>>;

/// Template for game objects
///
/// Every instantiated copy starts with the prefab's transform and a fresh
/// set of behaviours built from its factories.
#[derive(Clone)]
pub struct Prefab {
    name: String,
    transform: Transform,
    behaviours: Vec<BehaviourFactory>,
}

impl Prefab {
    /// Create an empty prefab
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            behaviours: Vec::new(),
        }
    }

    /// Set the initial transform
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Attach a behaviour built by `factory` to every copy
    pub fn with_behaviour<B, F>(mut self, factory: F) -> Self
    where
        B: Behaviour,
        F: Fn() -> B + 'static,
    {
        self.behaviours.push(Rc::new(move || Box::new(factory()) as Box<dyn Behaviour>));
        self
    }

    /// Prefab name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Initial transform of each copy
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub(crate) fn build_behaviours(&self) -> Vec<Box<dyn Behaviour>> {
        self.behaviours.iter().map(|factory| factory()).collect()
    }
}

impl fmt::Debug for Prefab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prefab")
            .field("name", &self.name)
            .field("transform", &self.transform)
            .field("behaviours", &self.behaviours.len())
            .finish()
    }
}
