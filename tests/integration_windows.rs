use std::time::Instant;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use scene_lens::error::ContentError;
use scene_lens::host::{MemoryScene, Property, SceneHost};
use scene_lens::ui::UiFrame;
use scene_lens::window::{
    ContentRenderer, TraversalState, WindowId, WindowKind, WindowRegistry, WindowView,
};
use scene_lens::{Inspector, InspectorConfig};

const SCREEN: Rect = Rect {
    x: 0,
    y: 0,
    width: 160,
    height: 48,
};

fn screen_text(buf: &Buffer) -> String {
    let mut out = String::new();
    for y in 0..buf.area.height {
        for x in 0..buf.area.width {
            out.push_str(buf.cell((x, y)).map(|c| c.symbol()).unwrap_or(" "));
        }
        out.push('\n');
    }
    out
}

fn draw(inspector: &mut Inspector, scene: &MemoryScene) -> Buffer {
    let mut buf = Buffer::empty(SCREEN);
    {
        let mut frame = UiFrame::from_parts(SCREEN, &mut buf);
        inspector.draw(&mut frame, scene);
    }
    buf
}

/// Fails for entities named "Bad", draws a marker for everything else.
struct Picky;

impl ContentRenderer for Picky {
    fn render(
        &mut self,
        frame: &mut UiFrame<'_>,
        area: Rect,
        window: &WindowView<'_>,
        host: &dyn SceneHost,
        traversal: &mut TraversalState,
    ) -> Result<(), ContentError> {
        traversal.scroll += 1;
        if host.display_name(window.target) == "Bad" {
            return Err(ContentError::Render("bad entity".into()));
        }
        frame.put_str(area.x, area.y, "body-ok", Default::default());
        Ok(())
    }
}

#[test]
fn ids_strictly_increase_across_opens() {
    let mut scene = MemoryScene::new();
    let level = scene.add_container("Level");
    let mut registry = WindowRegistry::default();
    registry.set_layout(SCREEN, Rect::new(0, 0, 56, 47));
    let mut ids: Vec<WindowId> = Vec::new();
    for i in 0..12 {
        let handle = scene.spawn_root(level, format!("E{i}"));
        let (id, created) = registry.open(&scene, handle);
        assert!(created);
        ids.push(id);
        if i % 3 == 0 {
            registry.close(id);
        }
    }
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(ids[0], WindowId(500_000));
}

#[test]
fn placement_is_deterministic_and_cascades() {
    let mut scene = MemoryScene::new();
    let level = scene.add_container("Level");
    let a = scene.spawn_root(level, "A");
    let b = scene.spawn_root(level, "B");

    let open_two = |scene: &MemoryScene| {
        let mut registry = WindowRegistry::default();
        registry.set_layout(SCREEN, Rect::new(0, 0, 56, 47));
        let (wa, _) = registry.open(scene, a);
        let (wb, _) = registry.open(scene, b);
        (
            registry.window(wa).unwrap().rect(),
            registry.window(wb).unwrap().rect(),
        )
    };
    let (ra, rb) = open_two(&scene);
    assert_eq!(ra, Rect::new(58, 0, 48, 18));
    assert_eq!(rb, Rect::new(60, 1, 48, 18));
    assert_eq!(open_two(&scene), (ra, rb));

    // no room beside the anchor: origin
    let mut narrow = WindowRegistry::default();
    narrow.set_layout(Rect::new(0, 0, 60, 30), Rect::new(0, 0, 56, 29));
    let (w, _) = narrow.open(&scene, a);
    assert_eq!(narrow.window(w).unwrap().rect().x, 0);
}

#[test]
fn generic_objects_get_generic_windows() {
    let mut scene = MemoryScene::new();
    scene.add_container("Level");
    let settings = scene.add_object("RenderSettings", vec![Property::new("fog", "on")]);
    let mut registry = WindowRegistry::default();
    let (id, _) = registry.open(&scene, settings);
    assert_eq!(registry.window(id).unwrap().kind(), WindowKind::Generic);
}

#[test]
fn one_faulty_window_does_not_stop_the_others() {
    let mut scene = MemoryScene::new();
    let level = scene.add_container("Level");
    let good = scene.spawn_root(level, "Good");
    let bad = scene.spawn_root(level, "Bad");

    let mut inspector = Inspector::new(InspectorConfig::default());
    inspector.set_renderer(Box::new(Picky));
    inspector.resize(SCREEN);
    inspector.tick(&scene, Instant::now());
    let (w_bad, _) = inspector.inspect(&scene, bad);
    let (w_good, _) = inspector.inspect(&scene, good);

    let text = screen_text(&draw(&mut inspector, &scene));
    assert!(text.contains("body-ok"));

    let registry = inspector.registry();
    let faulty = registry.window(w_bad).unwrap();
    assert_eq!(faulty.last_fault(), Some("render failed: bad entity"));
    assert_eq!(faulty.traversal().scroll, 0);
    let healthy = registry.window(w_good).unwrap();
    assert_eq!(healthy.last_fault(), None);
    assert_eq!(healthy.traversal().scroll, 1);
    assert_eq!(registry.len(), 2);
}

#[test]
fn destroyed_target_keeps_window_with_placeholder() {
    let mut scene = MemoryScene::new();
    let level = scene.add_container("Level");
    let spark = scene.spawn_root(level, "Spark");

    let mut inspector = Inspector::new(InspectorConfig::default());
    inspector.resize(SCREEN);
    let now = Instant::now();
    inspector.tick(&scene, now);
    let (id, _) = inspector.inspect(&scene, spark);
    scene.destroy(spark);

    inspector.tick(&scene, now);
    let text = screen_text(&draw(&mut inspector, &scene));
    assert!(text.contains("(Destroyed)"));
    assert!(text.contains("The target no longer exists."));
    assert!(inspector.registry().window(id).is_some());

    // the stale handle still dedups onto the same window
    let (again, created) = inspector.inspect(&scene, spark);
    assert_eq!(again, id);
    assert!(!created);
}
