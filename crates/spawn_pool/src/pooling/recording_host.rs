//! In-memory host that records every call, for pool tests

use super::host::{EntityHost, PrototypeLibrary};
use crate::foundation::math::{Quat, Vec3};
use std::collections::HashMap;

/// Observable host side effect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Instantiated { entity: u32, container: u32 },
    Destroyed { entity: u32 },
    SetActive { entity: u32, active: bool },
    Placed { entity: u32 },
    SpawnHook { entity: u32, was_active: bool },
    ContainerCreated { container: u32 },
    ContainerDestroyed { container: u32 },
}

#[derive(Debug)]
struct MockEntity {
    prototype: &'static str,
    container: u32,
    active: bool,
    position: Vec3,
    rotation: Quat,
    spawn_count: u32,
}

/// Prototypes whose name starts with `hooked` carry a spawn hook
#[derive(Debug)]
pub struct RecordingHost {
    next_id: u32,
    entities: HashMap<u32, MockEntity>,
    containers: HashMap<u32, (String, Option<u32>)>,
    prototypes: Vec<&'static str>,
    events: Vec<HostEvent>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            entities: HashMap::new(),
            containers: HashMap::new(),
            prototypes: vec!["plain", "hooked", "bullet", "hooked_bullet"],
            events: Vec::new(),
        }
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn events(&self) -> &[HostEvent] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    pub fn is_alive(&self, entity: u32) -> bool {
        self.entities.contains_key(&entity)
    }

    pub fn live_count(&self) -> usize {
        self.entities.len()
    }

    pub fn container_of(&self, entity: u32) -> Option<u32> {
        self.entities.get(&entity).map(|e| e.container)
    }

    pub fn prototype_of(&self, entity: u32) -> Option<&'static str> {
        self.entities.get(&entity).map(|e| e.prototype)
    }

    pub fn spawn_count(&self, entity: u32) -> u32 {
        self.entities.get(&entity).map_or(0, |e| e.spawn_count)
    }

    pub fn container_named(&self, name: &str) -> Option<(u32, Option<u32>)> {
        self.containers
            .iter()
            .find(|(_, (n, _))| n == name)
            .map(|(id, (_, parent))| (*id, *parent))
    }

    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    /// Consumer-side deactivation
    pub fn deactivate(&mut self, entity: u32) {
        self.set_active(entity, false);
    }
}

impl EntityHost for RecordingHost {
    type Prototype = &'static str;
    type Entity = u32;
    type Container = u32;

    fn create_container(&mut self, name: &str, parent: Option<u32>) -> u32 {
        let container = self.next_id();
        self.containers.insert(container, (name.to_string(), parent));
        self.events.push(HostEvent::ContainerCreated { container });
        container
    }

    fn destroy_container(&mut self, container: u32) {
        self.containers.remove(&container);
        self.events.push(HostEvent::ContainerDestroyed { container });
    }

    fn instantiate(&mut self, prototype: &&'static str, container: u32) -> u32 {
        let entity = self.next_id();
        self.entities.insert(
            entity,
            MockEntity {
                prototype,
                container,
                active: true,
                position: Vec3::zeros(),
                rotation: Quat::identity(),
                spawn_count: 0,
            },
        );
        self.events.push(HostEvent::Instantiated { entity, container });
        entity
    }

    fn destroy(&mut self, entity: u32) {
        self.entities.remove(&entity);
        self.events.push(HostEvent::Destroyed { entity });
    }

    fn set_active(&mut self, entity: u32, active: bool) {
        if let Some(e) = self.entities.get_mut(&entity) {
            e.active = active;
        }
        self.events.push(HostEvent::SetActive { entity, active });
    }

    fn is_active(&self, entity: u32) -> bool {
        self.entities.get(&entity).is_some_and(|e| e.active)
    }

    fn set_placement(&mut self, entity: u32, position: Vec3, rotation: Quat) {
        if let Some(e) = self.entities.get_mut(&entity) {
            e.position = position;
            e.rotation = rotation;
        }
        self.events.push(HostEvent::Placed { entity });
    }

    fn placement(&self, entity: u32) -> Option<(Vec3, Quat)> {
        self.entities.get(&entity).map(|e| (e.position, e.rotation))
    }

    fn has_spawn_hook(&self, entity: u32) -> bool {
        self.entities
            .get(&entity)
            .is_some_and(|e| e.prototype.starts_with("hooked"))
    }

    fn run_spawn_hook(&mut self, entity: u32) {
        let was_active = self.is_active(entity);
        if let Some(e) = self.entities.get_mut(&entity) {
            e.spawn_count += 1;
        }
        self.events.push(HostEvent::SpawnHook { entity, was_active });
    }
}

impl PrototypeLibrary for RecordingHost {
    fn find_prototype(&self, name: &str) -> Option<&'static str> {
        self.prototypes.iter().copied().find(|p| *p == name)
    }
}
