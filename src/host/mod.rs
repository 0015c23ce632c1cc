//! The host application's side of the inspector.
//!
//! Everything the inspector knows about the live object graph comes through
//! [`SceneHost`]. The graph is mutated by the host between frames, so a handle
//! obtained on one frame is only a hint on the next: callers check
//! [`SceneHost::is_live`] before touching it again.

pub mod memory;

pub use memory::MemoryScene;

/// Scope being browsed, e.g. one loaded level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContainerId(pub u32);

/// Identity of a wrapper instance. Two handles with the same id are the same
/// reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandleId(pub u64);

/// Address of engine-managed native state backing a wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NativeKey(pub u64);

/// Capability tag used to pick the kind of window a handle opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityCategory {
    /// Renderable scene entity.
    Entity,
    /// Transform-like facet of a scene entity; inspects its owner.
    Spatial,
    /// Any other object.
    Object,
}

/// Opaque reference to an object in the inspected graph.
///
/// `native` is the secondary identity key: the same native entity may be
/// reachable through several wrappers with different `id`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityHandle {
    pub id: HandleId,
    pub native: Option<NativeKey>,
    pub category: EntityCategory,
}

impl EntityHandle {
    pub const fn new(id: HandleId, native: Option<NativeKey>, category: EntityCategory) -> Self {
        Self {
            id,
            native,
            category,
        }
    }

    pub fn is_scene_entity(&self) -> bool {
        matches!(
            self.category,
            EntityCategory::Entity | EntityCategory::Spatial
        )
    }
}

/// Pointer position in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pointer {
    pub column: u16,
    pub row: u16,
}

impl Pointer {
    pub const fn new(column: u16, row: u16) -> Self {
        Self { column, row }
    }
}

/// One named value shown by a generic object window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub value: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Queries the inspector issues against the running application.
///
/// Implementations must tolerate handles to destroyed entities in every
/// method: liveness queries answer `false`, enumerations answer empty, and
/// accessors return a neutral value instead of panicking.
pub trait SceneHost {
    fn containers(&self) -> Vec<ContainerId>;
    fn active_container(&self) -> Option<ContainerId>;
    fn container_name(&self, container: ContainerId) -> String;

    fn enumerate_root_entities(&self, container: ContainerId) -> Vec<EntityHandle>;
    fn enumerate_children(&self, node: EntityHandle) -> Vec<EntityHandle>;
    fn parent(&self, node: EntityHandle) -> Option<EntityHandle>;

    /// Every entity the process knows about, loaded or not.
    fn enumerate_all_entities(&self) -> Vec<EntityHandle>;
    fn container_of(&self, handle: EntityHandle) -> Option<ContainerId>;

    fn raycast_from_pointer(&self, pointer: Pointer) -> Option<EntityHandle>;

    fn is_live(&self, handle: EntityHandle) -> bool;
    fn display_name(&self, handle: EntityHandle) -> String;
    fn active_state(&self, handle: EntityHandle) -> bool;
    fn native_backing_pointer(&self, handle: EntityHandle) -> Option<NativeKey>;

    fn child_count(&self, node: EntityHandle) -> usize {
        self.enumerate_children(node).len()
    }

    /// `/`-separated names from the root down to `handle`.
    fn hierarchy_path(&self, handle: EntityHandle) -> String {
        let mut names = vec![self.display_name(handle)];
        let mut cursor = self.parent(handle);
        while let Some(node) = cursor {
            names.push(self.display_name(node));
            cursor = self.parent(node);
        }
        names.reverse();
        names.join("/")
    }

    /// Scene entity a `Spatial` facet belongs to.
    fn owning_entity(&self, _handle: EntityHandle) -> Option<EntityHandle> {
        None
    }

    fn describe(&self, _handle: EntityHandle) -> Vec<Property> {
        Vec::new()
    }
}
