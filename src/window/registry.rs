use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::prelude::Rect;
use ratatui::style::Style;

use super::{
    ContentRenderer, DefaultDecorator, HeaderHit, InspectionWindow, Placement, WindowDecorator,
    WindowId, WindowView,
};
use crate::constants::FIRST_WINDOW_ID;
use crate::error::ContentError;
use crate::host::{EntityCategory, EntityHandle, Pointer, SceneHost};
use crate::identity::same_entity;
use crate::layout::{HeaderDrag, rect_contains};
use crate::theme;
use crate::ui::{UiFrame, safe_set_string};

/// Owns every open inspection window.
///
/// `windows` keeps creation order, which is the order `open` scans for an
/// existing window. `z_order` runs bottom to top.
pub struct WindowRegistry {
    windows: Vec<InspectionWindow>,
    z_order: Vec<WindowId>,
    focused: Option<WindowId>,
    next_id: u64,
    placement: Placement,
    last_placed: Option<Rect>,
    screen: Rect,
    anchor: Rect,
    ui_visible: bool,
    // closes requested while the window list was being walked; applied by `begin_frame`
    pending_close: Vec<WindowId>,
    drag: Option<HeaderDrag<WindowId>>,
    decorator: Arc<dyn WindowDecorator>,
}

impl Default for WindowRegistry {
    fn default() -> Self {
        Self::new(Placement::default())
    }
}

impl WindowRegistry {
    pub fn new(placement: Placement) -> Self {
        Self {
            windows: Vec::new(),
            z_order: Vec::new(),
            focused: None,
            next_id: FIRST_WINDOW_ID,
            placement,
            last_placed: None,
            screen: Rect::default(),
            anchor: Rect::default(),
            ui_visible: true,
            pending_close: Vec::new(),
            drag: None,
            decorator: Arc::new(DefaultDecorator),
        }
    }

    pub fn set_decorator(&mut self, decorator: Arc<dyn WindowDecorator>) {
        self.decorator = decorator;
    }

    /// Screen bounds and the anchor panel new windows are placed beside.
    pub fn set_layout(&mut self, screen: Rect, anchor: Rect) {
        self.screen = screen;
        self.anchor = anchor;
    }

    pub fn anchor(&self) -> Rect {
        self.anchor
    }

    pub fn set_ui_visible(&mut self, visible: bool) {
        self.ui_visible = visible;
        if !visible {
            self.drag = None;
        }
    }

    pub fn ui_visible(&self) -> bool {
        self.ui_visible
    }

    pub fn next_id(&mut self) -> WindowId {
        let id = WindowId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    /// Rect for a new window; remembers it so the next call can cascade.
    pub fn place_new_window(&mut self) -> Rect {
        let rect = self
            .placement
            .place(self.screen, self.anchor, self.last_placed);
        self.last_placed = Some(rect);
        rect
    }

    /// Opens a window onto `handle`, or focuses the one already showing the
    /// same entity. The flag reports whether a window was created.
    ///
    /// Destroyed handles still get a window; it shows a placeholder.
    pub fn open(&mut self, host: &dyn SceneHost, handle: EntityHandle) -> (WindowId, bool) {
        let target = Self::resolve_target(host, handle);
        if let Some(id) = self
            .windows
            .iter()
            .find(|window| same_entity(host, window.target, target))
            .map(|window| window.id)
        {
            self.pending_close.retain(|pending| *pending != id);
            self.focus(id);
            tracing::debug!(window_id = %id, "focused existing window");
            return (id, false);
        }

        let id = self.next_id();
        let rect = self.place_new_window();
        let title = if host.is_live(target) {
            host.display_name(target)
        } else {
            "<destroyed>".to_string()
        };
        let window = InspectionWindow::new(id, rect, target, title);
        tracing::debug!(window_id = %id, kind = ?window.kind, "opened window");
        self.windows.push(window);
        self.z_order.push(id);
        self.focused = Some(id);
        (id, true)
    }

    fn resolve_target(host: &dyn SceneHost, handle: EntityHandle) -> EntityHandle {
        if handle.category == EntityCategory::Spatial
            && let Some(owner) = host.owning_entity(handle)
        {
            return owner;
        }
        handle
    }

    /// Raises the window to the top and gives it input focus.
    pub fn focus(&mut self, id: WindowId) -> bool {
        let Some(pos) = self.z_order.iter().position(|&x| x == id) else {
            return false;
        };
        let item = self.z_order.remove(pos);
        self.z_order.push(item);
        self.focused = Some(id);
        true
    }

    pub fn focused(&self) -> Option<WindowId> {
        self.focused
    }

    pub fn cycle_focus(&mut self, forward: bool) {
        if self.windows.is_empty() {
            return;
        }
        let current = self
            .focused
            .and_then(|id| self.windows.iter().position(|w| w.id == id));
        let len = self.windows.len() as isize;
        let next = match current {
            Some(idx) => {
                let step = if forward { 1 } else { -1 };
                (idx as isize + step).rem_euclid(len) as usize
            }
            None => 0,
        };
        let id = self.windows[next].id;
        self.focus(id);
    }

    pub fn close(&mut self, id: WindowId) -> bool {
        let Some(pos) = self.windows.iter().position(|w| w.id == id) else {
            return false;
        };
        tracing::debug!(window_id = %id, "closing window");
        self.windows.remove(pos);
        self.z_order.retain(|x| *x != id);
        if self.drag.is_some_and(|drag| drag.id == id) {
            self.drag = None;
        }
        if self.focused == Some(id) {
            self.focused = self.z_order.last().copied();
        }
        true
    }

    /// Queues a close for the start of the next frame.
    pub fn request_close(&mut self, id: WindowId) {
        if !self.pending_close.contains(&id) {
            self.pending_close.push(id);
        }
    }

    pub fn begin_frame(&mut self) {
        for id in std::mem::take(&mut self.pending_close) {
            self.close(id);
        }
    }

    pub fn windows(&self) -> impl Iterator<Item = &InspectionWindow> {
        self.windows.iter()
    }

    pub fn window(&self, id: WindowId) -> Option<&InspectionWindow> {
        self.windows.iter().find(|w| w.id == id)
    }

    pub fn window_mut(&mut self, id: WindowId) -> Option<&mut InspectionWindow> {
        self.windows.iter_mut().find(|w| w.id == id)
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn z_order(&self) -> &[WindowId] {
        &self.z_order
    }

    pub fn scroll_focused(&mut self, delta: isize) {
        if let Some(id) = self.focused
            && let Some(window) = self.window_mut(id)
        {
            window.traversal.scroll_by(delta);
        }
    }

    /// Whether the pointer is over any window or the anchor panel. Always
    /// false while the UI is hidden.
    pub fn pointer_over_any_window(&self, pointer: Pointer) -> bool {
        if !self.ui_visible {
            return false;
        }
        self.windows
            .iter()
            .any(|window| rect_contains(window.rect, pointer.column, pointer.row))
            || rect_contains(self.anchor, pointer.column, pointer.row)
    }

    /// Topmost window under the pointer.
    pub fn window_at(&self, pointer: Pointer) -> Option<WindowId> {
        self.z_order.iter().rev().copied().find(|id| {
            self.window(*id)
                .is_some_and(|w| rect_contains(w.rect, pointer.column, pointer.row))
        })
    }

    /// Focus, close and drag handling. Returns whether a window consumed the
    /// event.
    pub fn handle_mouse(&mut self, mouse: &MouseEvent) -> bool {
        if !self.ui_visible {
            return false;
        }
        let pointer = Pointer::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(id) = self.window_at(pointer) else {
                    return false;
                };
                self.focus(id);
                let Some(rect) = self.window(id).map(|w| w.rect) else {
                    return true;
                };
                match self.decorator.hit(rect, mouse.column, mouse.row) {
                    Some(HeaderHit::Close) => self.request_close(id),
                    Some(HeaderHit::Header) => {
                        self.drag = Some(HeaderDrag::new(id, rect, mouse.column, mouse.row));
                    }
                    _ => {}
                }
                true
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let Some(drag) = self.drag else {
                    return false;
                };
                let bounds = self.screen;
                if let Some(window) = self.window_mut(drag.id) {
                    window.rect = drag.apply(window.rect, mouse.column, mouse.row, bounds);
                }
                true
            }
            MouseEventKind::Up(MouseButton::Left) => self.drag.take().is_some(),
            MouseEventKind::ScrollDown | MouseEventKind::ScrollUp => {
                let Some(id) = self.window_at(pointer) else {
                    return false;
                };
                let delta = if matches!(mouse.kind, MouseEventKind::ScrollDown) {
                    1
                } else {
                    -1
                };
                if let Some(window) = self.window_mut(id) {
                    window.traversal.scroll_by(delta);
                }
                true
            }
            _ => false,
        }
    }

    /// Draws every window bottom to top. A failing body is logged and only
    /// affects its own window.
    pub fn render_windows(
        &mut self,
        frame: &mut UiFrame<'_>,
        host: &dyn SceneHost,
        renderer: &mut dyn ContentRenderer,
    ) {
        if !self.ui_visible {
            return;
        }
        let order = self.z_order.clone();
        let decorator = Arc::clone(&self.decorator);
        for id in order {
            let focused = self.focused == Some(id);
            let Some(window) = self.window_mut(id) else {
                continue;
            };
            let live = host.is_live(window.target);
            let mut title = format!("{} {} {}", window.kind.label(), window.id, window.title);
            if !live {
                title.push_str(" (Destroyed)");
            }
            decorator.render_window(frame, window.rect, &title, focused);
            let area = decorator.content_rect(window.rect);
            if !live {
                render_destroyed_placeholder(frame, area);
                continue;
            }

            let mut traversal = window.traversal;
            let fault = window.last_fault.clone();
            let view = WindowView {
                id: window.id,
                kind: window.kind,
                target: window.target,
                title: &window.title,
                last_fault: fault.as_deref(),
            };
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                renderer.render(frame, area, &view, host, &mut traversal)
            }));
            let failure = match outcome {
                Ok(Ok(())) => None,
                Ok(Err(ContentError::Destroyed)) => {
                    render_destroyed_placeholder(frame, area);
                    None
                }
                Ok(Err(err)) => Some(err.to_string()),
                Err(payload) => Some(panic_message(payload.as_ref())),
            };
            match failure {
                None => window.traversal = traversal,
                Some(message) => {
                    tracing::error!(window_id = %id, error = %message, "window draw failed");
                    window.traversal.reset();
                    window.last_fault = Some(message);
                }
            }
        }
    }
}

fn render_destroyed_placeholder(frame: &mut UiFrame<'_>, area: Rect) {
    let bounds = area.intersection(frame.area());
    let style = Style::default().fg(theme::alert_fg());
    let buffer = frame.buffer_mut();
    safe_set_string(buffer, bounds, area.x, area.y, "null (Destroyed)", style);
    safe_set_string(
        buffer,
        bounds,
        area.x,
        area.y.saturating_add(1),
        "The target no longer exists.",
        Style::default(),
    );
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("panic: {msg}")
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("panic: {msg}")
    } else {
        "panic: <non-string payload>".to_string()
    }
}
