//! Arena-backed scene graph implementing [`SceneHost`].
//!
//! Backs the demo binary and the test-suite. It models the parts of a real
//! engine the inspector cares about: entities that die while handles to them
//! are still held, several wrapper instances over one native entity, transform
//! facets that belong to an entity, and plain objects that have no native
//! backing at all.
//!
//! Destroyed slots are reused. A native key carries the slot generation, so a
//! handle to the previous occupant stays dead after its slot is refilled.

use std::collections::HashMap;

use ratatui::layout::Rect;

use super::{
    ContainerId, EntityCategory, EntityHandle, HandleId, NativeKey, Pointer, Property, SceneHost,
};
use crate::layout::rect_contains;

const NATIVE_BASE: u64 = 0x7f00_0000;
const GENERATION_SHIFT: u32 = 40;
const SLOT_MASK: u64 = (1 << GENERATION_SHIFT) - 1;

#[derive(Debug, Clone)]
struct Node {
    name: String,
    parent: Option<usize>,
    children: Vec<usize>,
    active: bool,
    alive: bool,
    generation: u32,
    spawned: u64,
    container: ContainerId,
    bounds: Option<Rect>,
    wrapper: HandleId,
    spatial_wrapper: HandleId,
}

#[derive(Debug, Clone)]
struct ObjectEntry {
    name: String,
    properties: Vec<Property>,
}

#[derive(Debug, Clone)]
struct Container {
    id: ContainerId,
    name: String,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryScene {
    nodes: Vec<Node>,
    free: Vec<usize>,
    spawn_count: u64,
    objects: HashMap<HandleId, ObjectEntry>,
    containers: Vec<Container>,
    active: Option<ContainerId>,
    next_handle: u64,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc_handle(&mut self) -> HandleId {
        self.next_handle = self.next_handle.saturating_add(1);
        HandleId(self.next_handle)
    }

    fn native_key(&self, index: usize, spatial: bool) -> NativeKey {
        let generation = (self.nodes[index].generation as u64) << GENERATION_SHIFT;
        NativeKey(NATIVE_BASE + generation + ((index as u64) << 1) + spatial as u64)
    }

    /// Resolves a handle to its arena slot, dead or alive. Handles to an
    /// earlier occupant of a reused slot resolve to nothing.
    fn slot(&self, handle: EntityHandle) -> Option<(usize, bool)> {
        let key = handle.native?.0.checked_sub(NATIVE_BASE)?;
        let index = ((key & SLOT_MASK) >> 1) as usize;
        let generation = key >> GENERATION_SHIFT;
        let spatial = key & 1 == 1;
        let node = self.nodes.get(index)?;
        (node.generation as u64 == generation).then_some((index, spatial))
    }

    /// Live slots in spawn order.
    fn live_indices(&self) -> Vec<usize> {
        let mut live: Vec<usize> = (0..self.nodes.len())
            .filter(|index| self.nodes[*index].alive)
            .collect();
        live.sort_by_key(|index| self.nodes[*index].spawned);
        live
    }

    fn live_node(&self, handle: EntityHandle) -> Option<(usize, &Node)> {
        let (index, _) = self.slot(handle)?;
        let node = &self.nodes[index];
        node.alive.then_some((index, node))
    }

    fn entity_handle(&self, index: usize) -> EntityHandle {
        EntityHandle::new(
            self.nodes[index].wrapper,
            Some(self.native_key(index, false)),
            EntityCategory::Entity,
        )
    }

    pub fn add_container(&mut self, name: impl Into<String>) -> ContainerId {
        let id = ContainerId(self.containers.len() as u32);
        self.containers.push(Container {
            id,
            name: name.into(),
        });
        if self.active.is_none() {
            self.active = Some(id);
        }
        id
    }

    pub fn set_active_container(&mut self, container: ContainerId) {
        if self.containers.iter().any(|c| c.id == container) {
            self.active = Some(container);
        }
    }

    pub fn remove_container(&mut self, container: ContainerId) {
        let doomed: Vec<usize> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.alive && node.parent.is_none() && node.container == container)
            .map(|(index, _)| index)
            .collect();
        for index in doomed {
            self.destroy_index(index);
        }
        self.containers.retain(|c| c.id != container);
        if self.active == Some(container) {
            self.active = self.containers.first().map(|c| c.id);
        }
    }

    fn push_node(&mut self, name: String, parent: Option<usize>, container: ContainerId) -> usize {
        let wrapper = self.alloc_handle();
        let spatial_wrapper = self.alloc_handle();
        self.spawn_count += 1;
        let mut node = Node {
            name,
            parent,
            children: Vec::new(),
            active: true,
            alive: true,
            generation: 0,
            spawned: self.spawn_count,
            container,
            bounds: None,
            wrapper,
            spatial_wrapper,
        };
        let index = match self.free.pop() {
            Some(index) => {
                node.generation = self.nodes[index].generation.wrapping_add(1);
                self.nodes[index] = node;
                index
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        };
        if let Some(parent) = parent {
            self.nodes[parent].children.push(index);
        }
        index
    }

    pub fn spawn_root(&mut self, container: ContainerId, name: impl Into<String>) -> EntityHandle {
        let index = self.push_node(name.into(), None, container);
        self.entity_handle(index)
    }

    /// Spawns under `parent`. A dead parent yields a dead-on-arrival root in
    /// the parent's former container so callers always get a handle back.
    pub fn spawn_child(&mut self, parent: EntityHandle, name: impl Into<String>) -> EntityHandle {
        match self.live_node(parent) {
            Some((parent_index, node)) => {
                let container = node.container;
                let index = self.push_node(name.into(), Some(parent_index), container);
                self.entity_handle(index)
            }
            None => {
                let container = self
                    .slot(parent)
                    .map(|(index, _)| self.nodes[index].container)
                    .unwrap_or(ContainerId(0));
                let index = self.push_node(name.into(), None, container);
                self.nodes[index].alive = false;
                self.free.push(index);
                self.entity_handle(index)
            }
        }
    }

    /// Registers a plain object without native backing.
    pub fn add_object(&mut self, name: impl Into<String>, properties: Vec<Property>) -> EntityHandle {
        let id = self.alloc_handle();
        self.objects.insert(
            id,
            ObjectEntry {
                name: name.into(),
                properties,
            },
        );
        EntityHandle::new(id, None, EntityCategory::Object)
    }

    /// A fresh wrapper over the same native entity.
    pub fn rewrap(&mut self, handle: EntityHandle) -> EntityHandle {
        let id = self.alloc_handle();
        EntityHandle::new(id, handle.native, handle.category)
    }

    /// Transform-like facet of an entity.
    pub fn spatial(&self, handle: EntityHandle) -> Option<EntityHandle> {
        let (index, _) = self.slot(handle)?;
        Some(EntityHandle::new(
            self.nodes[index].spatial_wrapper,
            Some(self.native_key(index, true)),
            EntityCategory::Spatial,
        ))
    }

    pub fn set_active(&mut self, handle: EntityHandle, active: bool) {
        if let Some((index, _)) = self.live_node(handle) {
            self.nodes[index].active = active;
        }
    }

    /// Screen area the entity covers in the viewport, used for raycasts.
    pub fn set_bounds(&mut self, handle: EntityHandle, bounds: Rect) {
        if let Some((index, _)) = self.live_node(handle) {
            self.nodes[index].bounds = Some(bounds);
        }
    }

    pub fn rename(&mut self, handle: EntityHandle, name: impl Into<String>) {
        if let Some((index, _)) = self.live_node(handle) {
            self.nodes[index].name = name.into();
        }
    }

    /// Moves `handle` under `new_parent`, or to the root of its container.
    pub fn reparent(&mut self, handle: EntityHandle, new_parent: Option<EntityHandle>) {
        let Some((index, _)) = self.live_node(handle) else {
            return;
        };
        let parent_index = match new_parent {
            Some(parent) => match self.live_node(parent) {
                Some((parent_index, _)) if !self.is_ancestor(index, parent_index) => {
                    Some(parent_index)
                }
                _ => return,
            },
            None => None,
        };
        if let Some(old) = self.nodes[index].parent {
            self.nodes[old].children.retain(|child| *child != index);
        }
        self.nodes[index].parent = parent_index;
        if let Some(parent_index) = parent_index {
            self.nodes[parent_index].children.push(index);
            let container = self.nodes[parent_index].container;
            self.set_container_recursive(index, container);
        }
    }

    fn is_ancestor(&self, ancestor: usize, mut node: usize) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.nodes[node].parent {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    fn set_container_recursive(&mut self, index: usize, container: ContainerId) {
        self.nodes[index].container = container;
        let children = self.nodes[index].children.clone();
        for child in children {
            self.set_container_recursive(child, container);
        }
    }

    /// Destroys the entity and its whole subtree.
    pub fn destroy(&mut self, handle: EntityHandle) {
        if handle.category == EntityCategory::Object {
            self.objects.remove(&handle.id);
            return;
        }
        if let Some((index, _)) = self.live_node(handle) {
            self.destroy_index(index);
        }
    }

    fn destroy_index(&mut self, index: usize) {
        let children = std::mem::take(&mut self.nodes[index].children);
        for child in children {
            self.destroy_index(child);
        }
        if let Some(parent) = self.nodes[index].parent
            && self.nodes[parent].alive
        {
            self.nodes[parent].children.retain(|child| *child != index);
        }
        self.nodes[index].alive = false;
        self.nodes[index].bounds = None;
        self.free.push(index);
    }

    /// First live entity with this exact name.
    pub fn handle_of(&self, name: &str) -> Option<EntityHandle> {
        self.live_indices()
            .into_iter()
            .find(|index| self.nodes[*index].name == name)
            .map(|index| self.entity_handle(index))
    }

    pub fn live_entity_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.alive).count()
    }
}

impl SceneHost for MemoryScene {
    fn containers(&self) -> Vec<ContainerId> {
        self.containers.iter().map(|c| c.id).collect()
    }

    fn active_container(&self) -> Option<ContainerId> {
        self.active
    }

    fn container_name(&self, container: ContainerId) -> String {
        self.containers
            .iter()
            .find(|c| c.id == container)
            .map(|c| c.name.clone())
            .unwrap_or_default()
    }

    fn enumerate_root_entities(&self, container: ContainerId) -> Vec<EntityHandle> {
        self.live_indices()
            .into_iter()
            .filter(|index| {
                let node = &self.nodes[*index];
                node.parent.is_none() && node.container == container
            })
            .map(|index| self.entity_handle(index))
            .collect()
    }

    fn enumerate_children(&self, node: EntityHandle) -> Vec<EntityHandle> {
        match self.live_node(node) {
            Some((_, entry)) => entry
                .children
                .iter()
                .map(|child| self.entity_handle(*child))
                .collect(),
            None => Vec::new(),
        }
    }

    fn child_count(&self, node: EntityHandle) -> usize {
        self.live_node(node)
            .map(|(_, entry)| entry.children.len())
            .unwrap_or(0)
    }

    fn parent(&self, node: EntityHandle) -> Option<EntityHandle> {
        let (_, entry) = self.live_node(node)?;
        entry.parent.map(|parent| self.entity_handle(parent))
    }

    fn enumerate_all_entities(&self) -> Vec<EntityHandle> {
        self.live_indices()
            .into_iter()
            .map(|index| self.entity_handle(index))
            .collect()
    }

    fn container_of(&self, handle: EntityHandle) -> Option<ContainerId> {
        self.live_node(handle).map(|(_, node)| node.container)
    }

    fn raycast_from_pointer(&self, pointer: Pointer) -> Option<EntityHandle> {
        let active = self.active?;
        self.live_indices()
            .into_iter()
            .rev()
            .map(|index| (index, &self.nodes[index]))
            .find(|(_, node)| {
                node.active
                    && node.container == active
                    && node
                        .bounds
                        .is_some_and(|bounds| rect_contains(bounds, pointer.column, pointer.row))
            })
            .map(|(index, _)| self.entity_handle(index))
    }

    fn is_live(&self, handle: EntityHandle) -> bool {
        match handle.category {
            EntityCategory::Object => self.objects.contains_key(&handle.id),
            _ => self.live_node(handle).is_some(),
        }
    }

    fn display_name(&self, handle: EntityHandle) -> String {
        if handle.category == EntityCategory::Object {
            return self
                .objects
                .get(&handle.id)
                .map(|object| object.name.clone())
                .unwrap_or_default();
        }
        match self.slot(handle) {
            Some((index, _)) => self.nodes[index].name.clone(),
            None => String::new(),
        }
    }

    fn active_state(&self, handle: EntityHandle) -> bool {
        self.live_node(handle).is_some_and(|(_, node)| node.active)
    }

    fn native_backing_pointer(&self, handle: EntityHandle) -> Option<NativeKey> {
        self.live_node(handle).and(handle.native)
    }

    fn owning_entity(&self, handle: EntityHandle) -> Option<EntityHandle> {
        if handle.category != EntityCategory::Spatial {
            return None;
        }
        let (index, _) = self.slot(handle)?;
        Some(self.entity_handle(index))
    }

    fn describe(&self, handle: EntityHandle) -> Vec<Property> {
        match handle.category {
            EntityCategory::Object => self
                .objects
                .get(&handle.id)
                .map(|object| object.properties.clone())
                .unwrap_or_default(),
            _ => match self.live_node(handle) {
                Some((_, node)) => {
                    let mut props = vec![
                        Property::new("name", node.name.clone()),
                        Property::new("active", node.active.to_string()),
                        Property::new("children", node.children.len().to_string()),
                    ];
                    if let Some(bounds) = node.bounds {
                        props.push(Property::new(
                            "bounds",
                            format!(
                                "{}x{} at ({}, {})",
                                bounds.width, bounds.height, bounds.x, bounds.y
                            ),
                        ));
                    }
                    props
                }
                None => Vec::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> (MemoryScene, ContainerId) {
        let mut scene = MemoryScene::new();
        let level = scene.add_container("Level");
        (scene, level)
    }

    #[test]
    fn roots_and_children_enumerate_in_spawn_order() {
        let (mut scene, level) = scene();
        let a = scene.spawn_root(level, "A");
        let b = scene.spawn_root(level, "B");
        let a1 = scene.spawn_child(a, "A1");
        let a2 = scene.spawn_child(a, "A2");
        assert_eq!(scene.enumerate_root_entities(level), vec![a, b]);
        assert_eq!(scene.enumerate_children(a), vec![a1, a2]);
        assert_eq!(scene.parent(a2), Some(a));
        assert_eq!(scene.hierarchy_path(a2), "A/A2");
    }

    #[test]
    fn destroy_kills_subtree_and_native_pointer() {
        let (mut scene, level) = scene();
        let a = scene.spawn_root(level, "A");
        let a1 = scene.spawn_child(a, "A1");
        scene.destroy(a);
        assert!(!scene.is_live(a));
        assert!(!scene.is_live(a1));
        assert_eq!(scene.native_backing_pointer(a), None);
        assert!(scene.enumerate_root_entities(level).is_empty());
        assert!(scene.enumerate_children(a).is_empty());
    }

    #[test]
    fn reused_slots_leave_old_handles_dead() {
        let (mut scene, level) = scene();
        let first = scene.spawn_root(level, "First");
        scene.spawn_child(first, "Trail");
        scene.spawn_root(level, "Anchor");
        for _ in 0..50 {
            let spark = scene.spawn_root(level, "Spark");
            scene.spawn_child(spark, "Trail");
            scene.destroy(spark);
        }
        scene.destroy(first);
        let slots = scene.nodes.len();

        let next = scene.spawn_root(level, "Next");
        assert_eq!(scene.nodes.len(), slots);
        assert!(!scene.is_live(first));
        assert_eq!(scene.native_backing_pointer(first), None);
        assert_eq!(scene.display_name(first), "");
        assert!(scene.is_live(next));
        assert_ne!(first.native, next.native);
        // reuse does not disturb spawn order
        let names: Vec<String> = scene
            .enumerate_root_entities(level)
            .into_iter()
            .map(|h| scene.display_name(h))
            .collect();
        assert_eq!(names, ["Anchor", "Next"]);
    }

    #[test]
    fn rename_updates_display_name() {
        let (mut scene, level) = scene();
        let a = scene.spawn_root(level, "A");
        scene.rename(a, "Renamed");
        assert_eq!(scene.display_name(a), "Renamed");
        assert_eq!(scene.handle_of("Renamed"), Some(a));
        assert_eq!(scene.handle_of("A"), None);
    }

    #[test]
    fn rewrap_keeps_native_key_with_new_id() {
        let (mut scene, level) = scene();
        let a = scene.spawn_root(level, "A");
        let again = scene.rewrap(a);
        assert_ne!(a.id, again.id);
        assert_eq!(
            scene.native_backing_pointer(a),
            scene.native_backing_pointer(again)
        );
        assert!(scene.is_live(again));
    }

    #[test]
    fn spatial_facet_routes_to_owner() {
        let (mut scene, level) = scene();
        let a = scene.spawn_root(level, "A");
        let facet = scene.spatial(a).unwrap();
        assert_eq!(facet.category, EntityCategory::Spatial);
        assert_ne!(facet.native, a.native);
        assert_eq!(scene.owning_entity(facet), Some(a));
        assert_eq!(scene.owning_entity(a), None);
    }

    #[test]
    fn raycast_prefers_latest_active_entity_in_active_container() {
        let (mut scene, level) = scene();
        let other = scene.add_container("Other");
        let floor = scene.spawn_root(level, "Floor");
        let crate_box = scene.spawn_root(level, "Crate");
        let hidden = scene.spawn_root(other, "Hidden");
        let area = Rect::new(0, 0, 10, 10);
        scene.set_bounds(floor, area);
        scene.set_bounds(crate_box, Rect::new(2, 2, 2, 2));
        scene.set_bounds(hidden, area);
        assert_eq!(scene.raycast_from_pointer(Pointer::new(3, 3)), Some(crate_box));
        assert_eq!(scene.raycast_from_pointer(Pointer::new(8, 8)), Some(floor));
        scene.set_active(crate_box, false);
        assert_eq!(scene.raycast_from_pointer(Pointer::new(3, 3)), Some(floor));
        assert_eq!(scene.raycast_from_pointer(Pointer::new(30, 3)), None);
    }

    #[test]
    fn reparent_rejects_cycles() {
        let (mut scene, level) = scene();
        let a = scene.spawn_root(level, "A");
        let b = scene.spawn_child(a, "B");
        scene.reparent(a, Some(b));
        assert_eq!(scene.parent(a), None);
        scene.reparent(b, None);
        assert_eq!(scene.enumerate_root_entities(level), vec![a, b]);
    }

    #[test]
    fn objects_have_no_native_pointer() {
        let (mut scene, _) = scene();
        let obj = scene.add_object("Settings", vec![Property::new("volume", "0.8")]);
        assert!(scene.is_live(obj));
        assert_eq!(scene.native_backing_pointer(obj), None);
        assert_eq!(scene.describe(obj).len(), 1);
        scene.destroy(obj);
        assert!(!scene.is_live(obj));
    }
}
