//! Pointer-driven picking of scene entities.

use ratatui::style::Style;

use crate::host::{EntityHandle, Pointer, SceneHost};
use crate::theme;
use crate::ui::UiFrame;
use crate::window::{WindowId, WindowRegistry};

/// Input sampled for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PickInput {
    pub pointer: Option<Pointer>,
    /// The toggle input fired this tick.
    pub toggle: bool,
    /// A confirm click landed this tick.
    pub confirm: bool,
}

#[derive(Debug, Default)]
pub struct SpatialPicker {
    enabled: bool,
    hovered: Option<EntityHandle>,
    hovered_label: String,
    pointer: Option<Pointer>,
}

impl SpatialPicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
        if !self.enabled {
            self.clear_hover();
        }
        tracing::debug!(enabled = self.enabled, "picker toggled");
    }

    pub fn disable(&mut self) {
        self.enabled = false;
        self.clear_hover();
    }

    pub fn current_hover_label(&self) -> &str {
        &self.hovered_label
    }

    pub fn hovered(&self) -> Option<EntityHandle> {
        self.hovered
    }

    fn clear_hover(&mut self) {
        self.hovered = None;
        self.hovered_label.clear();
    }

    /// Runs one tick: raycast under the pointer, and on a confirm click over
    /// a hit, turn picking off and open (or focus) a window for the hit.
    ///
    /// Picking is forced off while the UI is hidden, and does nothing while
    /// the pointer is over a window or the anchor panel.
    pub fn update(
        &mut self,
        host: &dyn SceneHost,
        registry: &mut WindowRegistry,
        ui_visible: bool,
        input: PickInput,
    ) -> Option<(WindowId, bool)> {
        if !ui_visible {
            if self.enabled {
                tracing::debug!("picker disabled while UI is hidden");
            }
            self.disable();
            return None;
        }
        if input.toggle {
            self.toggle();
        }
        if input.pointer.is_some() {
            self.pointer = input.pointer;
        }
        if !self.enabled {
            return None;
        }
        let Some(pointer) = self.pointer else {
            self.clear_hover();
            return None;
        };
        if registry.pointer_over_any_window(pointer) {
            self.clear_hover();
            return None;
        }

        match host
            .raycast_from_pointer(pointer)
            .filter(|hit| host.is_live(*hit))
        {
            Some(hit) => {
                if self.hovered != Some(hit) {
                    self.hovered_label = host.hierarchy_path(hit);
                }
                self.hovered = Some(hit);
            }
            None => self.clear_hover(),
        }

        let hit = self.hovered?;
        if !input.confirm {
            return None;
        }
        self.disable();
        let opened = registry.open(host, hit);
        tracing::debug!(window_id = %opened.0, created = opened.1, "picked entity");
        Some(opened)
    }

    /// Draws the hover label centered one row above the pointer, over a
    /// shadow copy offset one cell down and right.
    pub fn render(&self, frame: &mut UiFrame<'_>) {
        if !self.enabled || self.hovered_label.is_empty() {
            return;
        }
        let Some(pointer) = self.pointer else {
            return;
        };
        let area = frame.area();
        let len = self.hovered_label.chars().count() as u16;
        let max_x = (area.x + area.width).saturating_sub(len).max(area.x);
        let x = pointer.column.saturating_sub(len / 2).clamp(area.x, max_x);
        let y = if pointer.row > area.y {
            pointer.row - 1
        } else {
            pointer.row.saturating_add(1)
        };
        frame.put_str(
            x.saturating_add(1),
            y.saturating_add(1),
            &self.hovered_label,
            Style::default().fg(theme::picker_shadow_fg()),
        );
        frame.put_str(
            x,
            y,
            &self.hovered_label,
            Style::default().fg(theme::picker_label_fg()),
        );
    }
}
