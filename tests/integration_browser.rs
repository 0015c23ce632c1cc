use std::cell::Cell;
use std::time::{Duration, Instant};

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use scene_lens::browser::view::rows;
use scene_lens::browser::{DESTROYED_LABEL, HierarchyBrowser, NodeTarget, ScenePanel};
use scene_lens::host::{
    ContainerId, EntityHandle, MemoryScene, NativeKey, Pointer, Property, SceneHost,
};
use scene_lens::ui::UiFrame;

/// Forwards to a [`MemoryScene`] and counts the accessors that must never be
/// reached for a destroyed row.
struct CountingHost<'a> {
    inner: &'a MemoryScene,
    names: Cell<usize>,
    actives: Cell<usize>,
}

impl<'a> CountingHost<'a> {
    fn new(inner: &'a MemoryScene) -> Self {
        Self {
            inner,
            names: Cell::new(0),
            actives: Cell::new(0),
        }
    }
}

impl SceneHost for CountingHost<'_> {
    fn containers(&self) -> Vec<ContainerId> {
        self.inner.containers()
    }
    fn active_container(&self) -> Option<ContainerId> {
        self.inner.active_container()
    }
    fn container_name(&self, container: ContainerId) -> String {
        self.inner.container_name(container)
    }
    fn enumerate_root_entities(&self, container: ContainerId) -> Vec<EntityHandle> {
        self.inner.enumerate_root_entities(container)
    }
    fn enumerate_children(&self, node: EntityHandle) -> Vec<EntityHandle> {
        self.inner.enumerate_children(node)
    }
    fn parent(&self, node: EntityHandle) -> Option<EntityHandle> {
        self.inner.parent(node)
    }
    fn enumerate_all_entities(&self) -> Vec<EntityHandle> {
        self.inner.enumerate_all_entities()
    }
    fn container_of(&self, handle: EntityHandle) -> Option<ContainerId> {
        self.inner.container_of(handle)
    }
    fn raycast_from_pointer(&self, pointer: Pointer) -> Option<EntityHandle> {
        self.inner.raycast_from_pointer(pointer)
    }
    fn is_live(&self, handle: EntityHandle) -> bool {
        self.inner.is_live(handle)
    }
    fn display_name(&self, handle: EntityHandle) -> String {
        self.names.set(self.names.get() + 1);
        self.inner.display_name(handle)
    }
    fn active_state(&self, handle: EntityHandle) -> bool {
        self.actives.set(self.actives.get() + 1);
        self.inner.active_state(handle)
    }
    fn native_backing_pointer(&self, handle: EntityHandle) -> Option<NativeKey> {
        self.inner.native_backing_pointer(handle)
    }
    fn describe(&self, handle: EntityHandle) -> Vec<Property> {
        self.inner.describe(handle)
    }
}

fn level(names: &[&str]) -> (MemoryScene, ContainerId) {
    let mut scene = MemoryScene::new();
    let level = scene.add_container("Level");
    for name in names {
        scene.spawn_root(level, *name);
    }
    (scene, level)
}

fn browser_for(scene: &MemoryScene, level: ContainerId, limit: usize) -> (HierarchyBrowser, Instant) {
    let mut browser = HierarchyBrowser::new(limit, Duration::from_secs(1));
    browser.on_container_switch(Some(level));
    let now = Instant::now();
    browser.refresh(scene, now);
    (browser, now)
}

#[test]
fn shrinking_past_the_page_resets_offset() {
    let (mut scene, level) = level(&[]);
    let mut roots = Vec::new();
    for i in 0..25 {
        roots.push(scene.spawn_root(level, format!("Node{i}")));
    }
    let (mut browser, now) = browser_for(&scene, level, 10);
    browser.next_page(&scene, now);
    browser.next_page(&scene, now);
    assert_eq!(browser.page_offset(), 2);

    for handle in &roots[5..] {
        scene.destroy(*handle);
    }
    browser.invalidate();
    browser.refresh(&scene, now);
    assert_eq!(browser.total_count(), 5);
    assert_eq!(browser.page_offset(), 0);
    assert_eq!(browser.current_page().len(), 5);
}

#[test]
fn page_is_sorted_by_child_count_before_slicing() {
    let (mut scene, level) = level(&["A", "B", "C", "D", "E"]);
    let counts = [0usize, 3, 1, 5, 2];
    for (name, count) in ["A", "B", "C", "D", "E"].iter().zip(counts) {
        let handle = scene.handle_of(name).unwrap();
        for i in 0..count {
            scene.spawn_child(handle, format!("{name}{i}"));
        }
    }
    let (mut browser, now) = browser_for(&scene, level, 2);
    let first: Vec<usize> = browser.current_page().iter().map(|r| r.child_count).collect();
    assert_eq!(first, vec![5, 3]);
    browser.next_page(&scene, now);
    let second: Vec<usize> = browser.current_page().iter().map(|r| r.child_count).collect();
    assert_eq!(second, vec![2, 1]);
    assert_eq!(browser.current_page()[0].label, "[2 children] E");
}

#[test]
fn cancelling_search_restores_browse_state() {
    let (mut scene, level) = level(&[]);
    let parent = scene.spawn_root(level, "Parent");
    for i in 0..30 {
        scene.spawn_child(parent, format!("Child{i}"));
    }
    let (mut browser, now) = browser_for(&scene, level, 10);
    browser.set_target(&scene, NodeTarget::Node(parent), now);
    browser.next_page(&scene, now);
    let before = (browser.target(), browser.page_offset(), browser.total_count());

    browser.search(&scene, "child1");
    assert!(browser.is_searching());
    assert_eq!(browser.total_count(), 11);
    browser.prev_page(&scene, now);
    assert_eq!(browser.page_offset(), 0);

    browser.cancel_search();
    assert!(!browser.is_searching());
    assert_eq!(
        (browser.target(), browser.page_offset(), browser.total_count()),
        before
    );
}

#[test]
fn destroyed_rows_never_touch_name_or_active_state() {
    let (mut scene, level) = level(&["Keep", "Doomed"]);
    let (browser, _) = browser_for(&scene, level, 10);
    scene.destroy(scene.handle_of("Doomed").unwrap());

    let host = CountingHost::new(&scene);
    let listing = rows(&host, &browser);
    assert_eq!(listing.len(), 2);
    let dead = listing.iter().find(|row| row.destroyed).unwrap();
    assert_eq!(dead.text, DESTROYED_LABEL);
    assert_eq!(host.names.get(), 0);
    assert_eq!(host.actives.get(), 0);

    let area = Rect::new(0, 0, 56, 12);
    let mut buf = Buffer::empty(area);
    let mut panel = ScenePanel::new();
    {
        let mut frame = UiFrame::from_parts(area, &mut buf);
        panel.render(&mut frame, area, &host, &browser, true);
    }
    assert_eq!(host.names.get(), 0);
    assert_eq!(host.actives.get(), 0);
    let text: String = (0..area.height)
        .flat_map(|y| (0..area.width).map(move |x| (x, y)))
        .map(|pos| buf.cell(pos).unwrap().symbol().to_string())
        .collect();
    assert!(text.contains(DESTROYED_LABEL));
}

#[test]
fn rejected_limit_keeps_previous_value() {
    let (scene, level) = level(&["A", "B", "C"]);
    let (mut browser, _) = browser_for(&scene, level, 2);
    assert!(browser.set_page_limit_text("abc").is_err());
    assert!(browser.set_page_limit_text("-3").is_err());
    assert!(browser.set_page_limit_text("0").is_err());
    assert_eq!(browser.page_limit(), 2);
    assert_eq!(browser.set_page_limit_text(" 5 "), Ok(5));
    assert_eq!(browser.page_limit(), 5);
}

#[test]
fn renames_appear_once_the_refresh_interval_passes() {
    let (mut scene, level) = level(&["Old"]);
    let (mut browser, now) = browser_for(&scene, level, 10);
    let handle = scene.handle_of("Old").unwrap();
    scene.rename(handle, "New");

    assert!(!browser.refresh(&scene, now + Duration::from_millis(500)));
    assert_eq!(browser.current_page()[0].label, "Old");
    assert!(browser.refresh(&scene, now + Duration::from_secs(1)));
    assert_eq!(browser.current_page()[0].label, "New");
}
