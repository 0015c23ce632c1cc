use std::time::Instant;

use ratatui::layout::Rect;

use scene_lens::browser::NodeTarget;
use scene_lens::host::{MemoryScene, SceneHost};
use scene_lens::{Inspector, InspectorConfig};

fn two_levels() -> (MemoryScene, Inspector, Instant) {
    let mut scene = MemoryScene::new();
    let level = scene.add_container("Level");
    let hub = scene.spawn_root(level, "Hub");
    for i in 0..4 {
        scene.spawn_child(hub, format!("Spoke{i}"));
    }
    scene.spawn_root(level, "Lamp");
    let arena = scene.add_container("Arena");
    for name in ["Floor", "Wall", "Goal"] {
        scene.spawn_root(arena, name);
    }
    let mut inspector = Inspector::new(InspectorConfig::default());
    inspector.resize(Rect::new(0, 0, 160, 48));
    let now = Instant::now();
    inspector.tick(&scene, now);
    (scene, inspector, now)
}

#[test]
fn removed_container_resets_browser_onto_the_next_one() {
    let (mut scene, mut inspector, now) = two_levels();
    let level = scene.containers()[0];
    let arena = scene.containers()[1];
    assert_eq!(inspector.browser().container(), Some(level));

    let hub = scene.handle_of("Hub").unwrap();
    inspector
        .browser_mut()
        .set_target(&scene, NodeTarget::Node(hub), now);
    inspector.browser_mut().search(&scene, "spoke");
    assert!(inspector.browser().is_searching());
    assert_eq!(inspector.browser().total_count(), 4);

    scene.remove_container(level);
    // same instant: the switch forces a refresh past the throttle
    inspector.tick(&scene, now);

    let browser = inspector.browser();
    assert!(!browser.is_searching());
    assert_eq!(browser.target(), NodeTarget::Root);
    assert_eq!(browser.container(), Some(arena));
    assert_eq!(browser.total_count(), 3);
    let labels: Vec<&str> = browser
        .current_page()
        .iter()
        .map(|row| row.label.as_str())
        .collect();
    assert_eq!(labels, ["Floor", "Wall", "Goal"]);
}

#[test]
fn host_switch_drops_search_and_target() {
    let (mut scene, mut inspector, now) = two_levels();
    let arena = scene.containers()[1];
    let hub = scene.handle_of("Hub").unwrap();
    inspector
        .browser_mut()
        .set_target(&scene, NodeTarget::Node(hub), now);
    inspector.browser_mut().search(&scene, "lamp");

    scene.set_active_container(arena);
    inspector.tick(&scene, now);

    let browser = inspector.browser();
    assert!(!browser.is_searching());
    assert_eq!(browser.target(), NodeTarget::Root);
    assert_eq!(browser.container(), Some(arena));
    assert_eq!(browser.total_count(), 3);
    assert_eq!(browser.page_offset(), 0);
}
