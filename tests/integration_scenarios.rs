use std::time::{Duration, Instant};

use scene_lens::browser::HierarchyBrowser;
use scene_lens::host::{ContainerId, MemoryScene};
use scene_lens::window::{WindowId, WindowRegistry};

fn labels(browser: &HierarchyBrowser) -> Vec<String> {
    browser
        .current_page()
        .iter()
        .map(|row| row.label.clone())
        .collect()
}

fn expected(range: std::ops::Range<usize>) -> Vec<String> {
    range.map(|i| format!("Root{i:02}")).collect()
}

fn level_with_roots(count: usize) -> (MemoryScene, ContainerId) {
    let mut scene = MemoryScene::new();
    let level = scene.add_container("MainLevel");
    for i in 0..count {
        scene.spawn_root(level, format!("Root{i:02}"));
    }
    (scene, level)
}

#[test]
fn paging_through_45_roots_20_at_a_time() {
    let (scene, level) = level_with_roots(45);
    let mut browser = HierarchyBrowser::new(20, Duration::from_secs(1));
    browser.on_container_switch(Some(level));
    let now = Instant::now();
    assert!(browser.refresh(&scene, now));

    assert_eq!(labels(&browser), expected(0..20));
    assert_eq!(browser.page_label().as_deref(), Some("Page 1/3"));

    browser.next_page(&scene, now);
    assert_eq!(labels(&browser), expected(20..40));

    browser.next_page(&scene, now);
    assert_eq!(labels(&browser), expected(40..45));
    assert_eq!(browser.page_label().as_deref(), Some("Page 3/3"));

    // clamped at the last page
    browser.next_page(&scene, now);
    assert_eq!(browser.page_offset(), 2);
    assert_eq!(labels(&browser), expected(40..45));
}

#[test]
fn reopening_same_entity_through_another_wrapper() {
    let mut scene = MemoryScene::new();
    let level = scene.add_container("MainLevel");
    let h1 = scene.spawn_root(level, "MainCamera");
    let h2 = scene.rewrap(h1);
    assert_ne!(h1.id, h2.id);

    let mut registry = WindowRegistry::default();
    let (w, created) = registry.open(&scene, h1);
    assert!(created);
    assert_eq!(w, WindowId(500_000));

    let (again, created) = registry.open(&scene, h2);
    assert!(!created);
    assert_eq!(again, WindowId(500_000));
    assert_eq!(registry.len(), 1);
}

#[test]
fn search_is_case_insensitive() {
    let mut scene = MemoryScene::new();
    let level = scene.add_container("MainLevel");
    let camera = scene.spawn_root(level, "MainCamera");
    scene.spawn_root(level, "Light");
    let camera2 = scene.spawn_root(level, "Camera2");

    let mut browser = HierarchyBrowser::new(20, Duration::from_secs(1));
    browser.on_container_switch(Some(level));
    browser.refresh(&scene, Instant::now());

    browser.search(&scene, "cam");
    let found: Vec<_> = browser.search_results().iter().map(|r| r.handle).collect();
    assert_eq!(found, vec![camera, camera2]);
    assert_eq!(browser.total_count(), 2);

    browser.search(&scene, "CAM");
    assert_eq!(browser.search_results().len(), 2);
}
