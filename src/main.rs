use std::time::{Duration, Instant};

use clap::Parser;
use ratatui::prelude::Rect;
use ratatui::style::{Modifier, Style};

use scene_lens::cli::Cli;
use scene_lens::config::InspectorConfig;
use scene_lens::drivers::{ConsoleInputDriver, ConsoleOutputDriver, OutputDriver};
use scene_lens::error::InspectorError;
use scene_lens::event_loop::{ControlFlow, EventLoop};
use scene_lens::host::{ContainerId, EntityHandle, MemoryScene, SceneHost};
use scene_lens::log_buffer::{self, LogBuffer};
use scene_lens::theme;
use scene_lens::tracing_sub::{self, LogSink};
use scene_lens::ui::UiFrame;
use scene_lens::Inspector;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const SPARK_PERIOD: Duration = Duration::from_secs(3);
const SPARK_SPOTS: [(u16, u16); 4] = [(92, 24), (110, 28), (128, 22), (100, 32)];

fn main() -> Result<(), InspectorError> {
    let cli = Cli::parse();
    let config = InspectorConfig::try_from(&cli)?;

    let log = LogBuffer::default();
    log_buffer::set_global_log(log.clone());
    log_buffer::install_panic_hook();
    let sink = match &config.log_file {
        Some(path) => LogSink::file(path)?,
        None => LogSink::Buffer(log.clone()),
    };
    tracing_sub::init_default(sink);

    let mut demo = DemoScene::build(config.demo_roots);
    tracing::info!(
        entities = demo.scene.live_entity_count(),
        "demo scene ready"
    );
    let mut inspector = Inspector::new(config).with_log_buffer(log);

    let mut output = ConsoleOutputDriver::new()?;
    output.enter()?;
    let mut event_loop = EventLoop::new(ConsoleInputDriver::new(), FRAME_INTERVAL);
    let result = event_loop.run(|_driver, event| {
        let now = Instant::now();
        match event {
            None => {
                demo.step(now);
                inspector.tick(&demo.scene, now);
                output.draw(|mut frame| {
                    demo.draw_viewport(&mut frame);
                    inspector.draw(&mut frame, &demo.scene);
                })?;
                Ok(ControlFlow::Continue)
            }
            Some(event) => Ok(inspector.handle_event(&demo.scene, &event, now)),
        }
    });
    output.exit()?;
    result?;
    Ok(())
}

/// Scene the binary inspects: a busy main level and a small sandbox, with a
/// few entities drawn as blocks so they can be picked with the mouse.
struct DemoScene {
    scene: MemoryScene,
    main_level: ContainerId,
    blocks: Vec<(EntityHandle, Rect, (u8, u8, u8))>,
    spark: Option<EntityHandle>,
    spark_spot: usize,
    last_spark: Option<Instant>,
}

impl DemoScene {
    fn build(root_count: usize) -> Self {
        let mut scene = MemoryScene::new();
        let main_level = scene.add_container("MainLevel");
        let sandbox = scene.add_container("Sandbox");
        let mut blocks = Vec::new();

        let camera = scene.spawn_root(main_level, "MainCamera");
        scene.spawn_child(camera, "Lens");
        scene.spawn_child(camera, "AudioListener");
        scene.spawn_root(main_level, "Light");
        let camera2 = scene.spawn_root(main_level, "Camera2");
        scene.set_active(camera2, false);

        let environment = scene.spawn_root(main_level, "Environment");
        let terrain = scene.spawn_child(environment, "Terrain");
        let rocks = scene.spawn_child(terrain, "Rocks");
        for i in 0..4 {
            scene.spawn_child(rocks, format!("Rock_{i}"));
        }
        let trees = scene.spawn_child(environment, "Trees");
        for i in 0..6 {
            scene.spawn_child(trees, format!("Tree_{i}"));
        }

        let player = scene.spawn_root(main_level, "Player");
        scene.spawn_child(player, "Head");
        scene.spawn_child(player, "Body");
        let crate_box = scene.spawn_root(main_level, "Crate");
        let beacon = scene.spawn_root(main_level, "Beacon");
        for (handle, rect, rgb) in [
            (player, Rect::new(80, 6, 10, 5), (60, 120, 220)),
            (crate_box, Rect::new(100, 14, 12, 5), (160, 110, 60)),
            (beacon, Rect::new(124, 8, 8, 4), (220, 200, 60)),
        ] {
            scene.set_bounds(handle, rect);
            blocks.push((handle, rect, rgb));
        }

        let named = scene.enumerate_root_entities(main_level).len();
        for i in named..root_count {
            let prop = scene.spawn_root(main_level, format!("Prop_{i:03}"));
            for c in 0..(i % 3) {
                scene.spawn_child(prop, format!("Part_{c}"));
            }
        }

        let cube = scene.spawn_root(sandbox, "Cube");
        scene.spawn_child(cube, "Collider");
        let sphere = scene.spawn_root(sandbox, "Sphere");
        scene.spawn_child(sphere, "Collider");
        scene.spawn_root(sandbox, "Plane");

        let mut demo = Self {
            scene,
            main_level,
            blocks,
            spark: None,
            spark_spot: 0,
            last_spark: None,
        };
        demo.respawn_spark();
        demo
    }

    /// Destroys the spark and spawns a new one elsewhere every few seconds so
    /// windows onto the old one go stale.
    fn step(&mut self, now: Instant) {
        let due = self
            .last_spark
            .is_none_or(|last| now.duration_since(last) >= SPARK_PERIOD);
        if !due {
            return;
        }
        if self.last_spark.is_some() {
            self.respawn_spark();
        }
        self.last_spark = Some(now);
    }

    fn respawn_spark(&mut self) {
        if let Some(old) = self.spark.take() {
            self.scene.destroy(old);
            self.blocks.retain(|(handle, _, _)| *handle != old);
        }
        let (x, y) = SPARK_SPOTS[self.spark_spot % SPARK_SPOTS.len()];
        self.spark_spot += 1;
        let spark = self.scene.spawn_root(self.main_level, "Spark");
        self.scene.spawn_child(spark, "Trail");
        let rect = Rect::new(x, y, 6, 2);
        self.scene.set_bounds(spark, rect);
        self.blocks.push((spark, rect, (240, 90, 40)));
        self.spark = Some(spark);
        tracing::debug!(column = x, row = y, "spark respawned");
    }

    fn draw_viewport(&self, frame: &mut UiFrame<'_>) {
        if self.scene.active_container() != Some(self.main_level) {
            return;
        }
        for (handle, rect, rgb) in &self.blocks {
            if !self.scene.is_live(*handle) || !self.scene.active_state(*handle) {
                continue;
            }
            let style = Style::default().bg(theme::rgb_to_color(*rgb));
            frame.fill(*rect, style);
            let name = self.scene.display_name(*handle);
            frame.put_str(
                rect.x,
                rect.y,
                &name,
                style.add_modifier(Modifier::BOLD),
            );
        }
    }
}
