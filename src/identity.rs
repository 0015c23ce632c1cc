//! Entity identity across wrapper instances.
//!
//! A wrapper handle is compared by reference first. When that fails, two
//! handles still denote the same entity if the host reports the same native
//! backing pointer for both. The host stops reporting a pointer once the entity
//! dies, so a destroyed handle only ever matches itself.

use crate::host::{EntityHandle, SceneHost};

pub fn same_entity(host: &dyn SceneHost, a: EntityHandle, b: EntityHandle) -> bool {
    if a.id == b.id {
        return true;
    }
    match (
        host.native_backing_pointer(a),
        host.native_backing_pointer(b),
    ) {
        (Some(left), Some(right)) => left == right,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MemoryScene, Property};

    #[test]
    fn reference_equality_wins() {
        let mut scene = MemoryScene::new();
        let level = scene.add_container("Level");
        let a = scene.spawn_root(level, "A");
        assert!(same_entity(&scene, a, a));
    }

    #[test]
    fn distinct_wrappers_over_one_native_entity_match() {
        let mut scene = MemoryScene::new();
        let level = scene.add_container("Level");
        let a = scene.spawn_root(level, "A");
        let b = scene.rewrap(a);
        assert!(same_entity(&scene, a, b));
        assert!(same_entity(&scene, b, a));
    }

    #[test]
    fn different_entities_do_not_match() {
        let mut scene = MemoryScene::new();
        let level = scene.add_container("Level");
        let a = scene.spawn_root(level, "A");
        let b = scene.spawn_root(level, "B");
        assert!(!same_entity(&scene, a, b));
    }

    #[test]
    fn destroyed_handle_only_matches_itself() {
        let mut scene = MemoryScene::new();
        let level = scene.add_container("Level");
        let a = scene.spawn_root(level, "A");
        let b = scene.rewrap(a);
        scene.destroy(a);
        assert!(same_entity(&scene, a, a));
        assert!(!same_entity(&scene, a, b));
    }

    #[test]
    fn plain_objects_compare_by_reference_only() {
        let mut scene = MemoryScene::new();
        let one = scene.add_object("Config", Vec::<Property>::new());
        let two = scene.add_object("Config", Vec::new());
        assert!(!same_entity(&scene, one, two));
        assert!(same_entity(&scene, one, one));
    }
}
