//! Window bodies.
//!
//! The registry owns window chrome, identity and placement; what goes inside
//! a window is delegated to a [`ContentRenderer`]. [`SummaryRenderer`] is the
//! built-in one: a flat, scrollable list of facts about the target.

use ratatui::prelude::Rect;
use ratatui::style::Style;

use super::{TraversalState, WindowId, WindowKind};
use crate::error::ContentError;
use crate::host::{EntityHandle, SceneHost};
use crate::theme;
use crate::ui::{UiFrame, safe_set_string};

/// Read-only facts about the window being drawn.
#[derive(Debug, Clone, Copy)]
pub struct WindowView<'a> {
    pub id: WindowId,
    pub kind: WindowKind,
    pub target: EntityHandle,
    pub title: &'a str,
    pub last_fault: Option<&'a str>,
}

pub trait ContentRenderer {
    /// Draw the body of a window whose target is live.
    fn render(
        &mut self,
        frame: &mut UiFrame<'_>,
        area: Rect,
        window: &WindowView<'_>,
        host: &dyn SceneHost,
        traversal: &mut TraversalState,
    ) -> Result<(), ContentError>;
}

#[derive(Debug, Default)]
pub struct SummaryRenderer;

impl SummaryRenderer {
    pub fn lines(&self, window: &WindowView<'_>, host: &dyn SceneHost) -> Vec<String> {
        let target = window.target;
        let mut lines = Vec::new();
        match window.kind {
            WindowKind::Entity => {
                lines.push(format!("Path: {}", host.hierarchy_path(target)));
                let active = if host.active_state(target) { "yes" } else { "no" };
                lines.push(format!("Active: {active}"));
                if let Some(container) = host.container_of(target) {
                    lines.push(format!("Container: {}", host.container_name(container)));
                }
                let children = host.enumerate_children(target);
                lines.push(format!("Children ({}):", children.len()));
                for child in children {
                    if host.is_live(child) {
                        lines.push(format!("  {}", host.display_name(child)));
                    }
                }
            }
            WindowKind::Generic => {
                lines.push(format!("Object: {}", host.display_name(target)));
                let props = host.describe(target);
                if props.is_empty() {
                    lines.push("(no readable properties)".to_string());
                }
                for prop in props {
                    lines.push(format!("{}: {}", prop.name, prop.value));
                }
            }
        }
        lines
    }
}

impl ContentRenderer for SummaryRenderer {
    fn render(
        &mut self,
        frame: &mut UiFrame<'_>,
        area: Rect,
        window: &WindowView<'_>,
        host: &dyn SceneHost,
        traversal: &mut TraversalState,
    ) -> Result<(), ContentError> {
        if area.width == 0 || area.height == 0 {
            return Ok(());
        }
        if !host.is_live(window.target) {
            return Err(ContentError::Destroyed);
        }
        let mut y = area.y;
        let mut view = area.height as usize;
        let bounds = area.intersection(frame.area());
        let buffer = frame.buffer_mut();
        if let Some(fault) = window.last_fault {
            let style = Style::default().fg(theme::alert_fg());
            safe_set_string(buffer, bounds, area.x, y, &format!("! {fault}"), style);
            y = y.saturating_add(1);
            view = view.saturating_sub(1);
        }
        let lines = self.lines(window, host);
        let max_scroll = lines.len().saturating_sub(view);
        if traversal.scroll > max_scroll {
            traversal.scroll = max_scroll;
        }
        for line in lines.iter().skip(traversal.scroll).take(view) {
            safe_set_string(buffer, bounds, area.x, y, line, Style::default());
            y = y.saturating_add(1);
        }
        Ok(())
    }
}
