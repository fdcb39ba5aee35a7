//! In-memory world of containers and game objects

use super::behaviour::Behaviour;
use super::prefab::Prefab;
use crate::foundation::collections::{ContainerId, HandleMap, ObjectId};
use crate::foundation::math::{Quat, Transform, Vec3};
use crate::pooling::{EntityHost, PrototypeLibrary};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Named grouping node
#[derive(Debug, Clone)]
struct Container {
    name: String,
    parent: Option<ContainerId>,
}

/// A live object in the world
pub struct GameObject {
    name: String,
    active: bool,
    transform: Transform,
    container: Option<ContainerId>,
    behaviours: Vec<Box<dyn Behaviour>>,
    spawn_hook: bool,
}

impl GameObject {
    /// Object name (copied from its prefab)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the object is active
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// World transform
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Container the object was created in
    pub fn container(&self) -> Option<ContainerId> {
        self.container
    }

    /// First behaviour of type `T`
    pub fn behaviour<T: Behaviour>(&self) -> Option<&T> {
        self.behaviours
            .iter()
            .find_map(|behaviour| (**behaviour).as_any().downcast_ref::<T>())
    }

    /// First behaviour of type `T`, mutably
    pub fn behaviour_mut<T: Behaviour>(&mut self) -> Option<&mut T> {
        self.behaviours
            .iter_mut()
            .find_map(|behaviour| (**behaviour).as_any_mut().downcast_mut::<T>())
    }
}

impl fmt::Debug for GameObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameObject")
            .field("name", &self.name)
            .field("active", &self.active)
            .field("transform", &self.transform)
            .field("container", &self.container)
            .field("behaviours", &self.behaviours.len())
            .finish()
    }
}

/// Minimal host world used by the demo and tests
#[derive(Debug, Default)]
pub struct SceneWorld {
    objects: HandleMap<ObjectId, GameObject>,
    containers: HandleMap<ContainerId, Container>,
    prefabs: HashMap<String, Rc<Prefab>>,
}

impl SceneWorld {
    /// Create an empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a prefab under its name and return the shared template
    ///
    /// Registering a name twice replaces the earlier prefab for future
    /// lookups; pools already created keep the template they were given.
    pub fn register_prefab(&mut self, prefab: Prefab) -> Rc<Prefab> {
        let prefab = Rc::new(prefab);
        if self.prefabs.insert(prefab.name().to_string(), Rc::clone(&prefab)).is_some() {
            log::warn!("Prefab '{}' registered twice, replacing", prefab.name());
        }
        prefab
    }

    /// Look up a registered prefab
    pub fn prefab(&self, name: &str) -> Option<Rc<Prefab>> {
        self.prefabs.get(name).cloned()
    }

    /// Borrow an object
    pub fn object(&self, id: ObjectId) -> Option<&GameObject> {
        self.objects.get(id)
    }

    /// Borrow an object mutably
    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut GameObject> {
        self.objects.get_mut(id)
    }

    /// Whether `id` refers to a live, active object
    pub fn is_active_object(&self, id: ObjectId) -> bool {
        self.objects.get(id).is_some_and(GameObject::is_active)
    }

    /// Whether `id` refers to a live object
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    /// Number of live objects
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Number of active objects
    pub fn active_count(&self) -> usize {
        self.objects.values().filter(|object| object.active).count()
    }

    /// Objects created inside `container`
    pub fn objects_in(&self, container: ContainerId) -> impl Iterator<Item = ObjectId> + '_ {
        self.objects
            .iter()
            .filter(move |(_, object)| object.container == Some(container))
            .map(|(id, _)| id)
    }

    /// Find a container by name
    pub fn find_container(&self, name: &str) -> Option<ContainerId> {
        self.containers
            .iter()
            .find(|(_, container)| container.name == name)
            .map(|(id, _)| id)
    }

    /// Name of a container
    pub fn container_name(&self, container: ContainerId) -> Option<&str> {
        self.containers.get(container).map(|c| c.name.as_str())
    }

    /// Parent of a container
    pub fn container_parent(&self, container: ContainerId) -> Option<ContainerId> {
        self.containers.get(container).and_then(|c| c.parent)
    }

    /// Number of live containers
    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    /// Deactivate an object and notify its behaviours
    ///
    /// This is how consumers hand a pooled object back: the pool will
    /// reuse it when its turn in the rotation comes around.
    pub fn despawn(&mut self, id: ObjectId) {
        let Some(object) = self.objects.get_mut(id) else {
            log::warn!("Tried to despawn missing object {:?}", id);
            return;
        };
        object.active = false;
        for behaviour in &mut object.behaviours {
            behaviour.on_despawn();
        }
    }
}

impl EntityHost for SceneWorld {
    type Prototype = Rc<Prefab>;
    type Entity = ObjectId;
    type Container = ContainerId;

    fn create_container(&mut self, name: &str, parent: Option<ContainerId>) -> ContainerId {
        self.containers.insert(Container {
            name: name.to_string(),
            parent,
        })
    }

    fn destroy_container(&mut self, container: ContainerId) {
        if self.containers.remove(container).is_none() {
            log::warn!("Tried to destroy missing container {:?}", container);
        }
    }

    fn instantiate(&mut self, prototype: &Rc<Prefab>, container: ContainerId) -> ObjectId {
        let mut behaviours = prototype.build_behaviours();
        let spawn_hook = behaviours
            .iter_mut()
            .any(|behaviour| behaviour.as_pool_object().is_some());

        self.objects.insert(GameObject {
            name: prototype.name().to_string(),
            active: true,
            transform: prototype.transform().clone(),
            container: Some(container),
            behaviours,
            spawn_hook,
        })
    }

    fn destroy(&mut self, entity: ObjectId) {
        if self.objects.remove(entity).is_none() {
            log::warn!("Tried to destroy missing object {:?}", entity);
        }
    }

    fn set_active(&mut self, entity: ObjectId, active: bool) {
        if let Some(object) = self.objects.get_mut(entity) {
            object.active = active;
        }
    }

    fn is_active(&self, entity: ObjectId) -> bool {
        self.is_active_object(entity)
    }

    fn set_placement(&mut self, entity: ObjectId, position: Vec3, rotation: Quat) {
        if let Some(object) = self.objects.get_mut(entity) {
            object.transform.set_placement(position, rotation);
        }
    }

    fn placement(&self, entity: ObjectId) -> Option<(Vec3, Quat)> {
        self.objects
            .get(entity)
            .map(|object| (object.transform.position, object.transform.rotation))
    }

    fn has_spawn_hook(&self, entity: ObjectId) -> bool {
        self.objects.get(entity).is_some_and(|object| object.spawn_hook)
    }

    fn run_spawn_hook(&mut self, entity: ObjectId) {
        let Some(object) = self.objects.get_mut(entity) else {
            return;
        };
        if let Some(hook) = object
            .behaviours
            .iter_mut()
            .find_map(|behaviour| behaviour.as_pool_object())
        {
            hook.on_object_spawn();
        }
    }
}

impl PrototypeLibrary for SceneWorld {
    fn find_prototype(&self, name: &str) -> Option<Rc<Prefab>> {
        self.prefab(name)
    }
}
