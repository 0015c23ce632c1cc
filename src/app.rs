//! The inspector context object.
//!
//! [`Inspector`] owns every piece of inspector state and is handed the host
//! on each call; nothing here is global. The embedding loop calls
//! [`Inspector::handle_event`] for input, [`Inspector::tick`] once per frame
//! and [`Inspector::draw`] to paint.

use std::time::Instant;

use crossterm::event::{
    Event, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use crate::browser::view::PanelHit;
use crate::browser::{HierarchyBrowser, NodeTarget, ScenePanel};
use crate::components::{Component, FieldOutcome, LogView, StatusBar, TextField};
use crate::config::InspectorConfig;
use crate::constants::PANEL_WIDTH;
use crate::event_loop::ControlFlow;
use crate::host::{ContainerId, EntityHandle, Pointer, SceneHost};
use crate::keybindings::{Action, KeyBindings};
use crate::log_buffer::LogBuffer;
use crate::picker::{PickInput, SpatialPicker};
use crate::state::{AppState, EditTarget};
use crate::ui::UiFrame;
use crate::window::{ContentRenderer, SummaryRenderer, WindowId, WindowRegistry};

pub struct Inspector {
    config: InspectorConfig,
    state: AppState,
    registry: WindowRegistry,
    browser: HierarchyBrowser,
    picker: SpatialPicker,
    panel: ScenePanel,
    keys: KeyBindings,
    search_field: TextField,
    limit_field: TextField,
    status: StatusBar,
    log: Option<LogBuffer>,
    log_view: Option<LogView>,
    renderer: Box<dyn ContentRenderer>,
    pointer: Option<Pointer>,
    screen: Rect,
    host_active: Option<ContainerId>,
}

impl Inspector {
    pub fn new(config: InspectorConfig) -> Self {
        let registry = WindowRegistry::new(config.placement());
        let browser = HierarchyBrowser::new(config.page_limit, config.refresh_interval);
        Self {
            config,
            state: AppState::new(),
            registry,
            browser,
            picker: SpatialPicker::new(),
            panel: ScenePanel::new(),
            keys: KeyBindings::default(),
            search_field: TextField::new(),
            limit_field: TextField::new(),
            status: StatusBar::new(),
            log: None,
            log_view: None,
            renderer: Box::new(SummaryRenderer),
            pointer: None,
            screen: Rect::default(),
            host_active: None,
        }
    }

    /// Feeds the log overlay and the status-bar message from `buffer`.
    pub fn with_log_buffer(mut self, buffer: LogBuffer) -> Self {
        self.log_view = Some(LogView::new(buffer.clone()));
        self.log = Some(buffer);
        self
    }

    pub fn set_renderer(&mut self, renderer: Box<dyn ContentRenderer>) {
        self.renderer = renderer;
    }

    pub fn set_keybindings(&mut self, keys: KeyBindings) {
        self.keys = keys;
    }

    pub fn config(&self) -> &InspectorConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut WindowRegistry {
        &mut self.registry
    }

    pub fn browser(&self) -> &HierarchyBrowser {
        &self.browser
    }

    pub fn browser_mut(&mut self) -> &mut HierarchyBrowser {
        &mut self.browser
    }

    pub fn picker(&self) -> &SpatialPicker {
        &self.picker
    }

    pub fn panel(&self) -> &ScenePanel {
        &self.panel
    }

    pub fn ui_visible(&self) -> bool {
        self.state.ui_visible()
    }

    pub fn set_ui_visible(&mut self, visible: bool) {
        self.state.set_ui_visible(visible);
        self.sync_visibility();
    }

    /// Screen area and the anchor panel rect derived from it.
    pub fn resize(&mut self, screen: Rect) {
        self.screen = screen;
        let body = Rect {
            height: screen.height.saturating_sub(1),
            ..screen
        };
        let panel = Rect {
            width: PANEL_WIDTH.min(body.width),
            ..body
        };
        self.registry.set_layout(body, panel);
    }

    /// Opens (or focuses) a window onto `handle`.
    pub fn inspect(&mut self, host: &dyn SceneHost, handle: EntityHandle) -> (WindowId, bool) {
        self.registry.open(host, handle)
    }

    /// Opens a window for the node the browser is showing. Nothing happens
    /// at the root.
    pub fn inspect_current(&mut self, host: &dyn SceneHost) -> Option<(WindowId, bool)> {
        match self.browser.target() {
            NodeTarget::Node(handle) => Some(self.registry.open(host, handle)),
            NodeTarget::Root => None,
        }
    }

    pub fn inspect_selected(&mut self, host: &dyn SceneHost) -> Option<(WindowId, bool)> {
        let handle = self.panel.selected_handle(host, &self.browser)?;
        Some(self.registry.open(host, handle))
    }

    pub fn prev_container(&mut self, host: &dyn SceneHost) {
        self.step_container(host, -1);
    }

    pub fn next_container(&mut self, host: &dyn SceneHost) {
        self.step_container(host, 1);
    }

    fn step_container(&mut self, host: &dyn SceneHost, step: isize) {
        let containers = host.containers();
        if containers.is_empty() {
            return;
        }
        let len = containers.len() as isize;
        let next = match self
            .browser
            .container()
            .and_then(|current| containers.iter().position(|c| *c == current))
        {
            Some(index) => (index as isize + step).rem_euclid(len) as usize,
            None => 0,
        };
        self.switch_container(host, Some(containers[next]));
    }

    fn switch_container(&mut self, host: &dyn SceneHost, container: Option<ContainerId>) {
        if let Some(c) = container {
            tracing::debug!(container = %host.container_name(c), "switching scene");
        }
        self.browser.on_container_switch(container);
        self.panel.set_selected(0);
        self.state.set_editing(None);
    }

    /// Per-frame work: pending closes, visibility, container tracking,
    /// throttled refresh and picker hover.
    ///
    /// A change of the host's active container always moves the browser to
    /// it. Between such changes the operator may cycle containers freely.
    pub fn tick(&mut self, host: &dyn SceneHost, now: Instant) {
        self.registry.begin_frame();
        self.sync_visibility();

        let containers = host.containers();
        let active = host.active_container().filter(|c| containers.contains(c));
        if active != self.host_active {
            self.host_active = active;
            if active.is_some() && active != self.browser.container() {
                self.switch_container(host, active);
            }
        }
        let stale = self
            .browser
            .container()
            .is_none_or(|current| !containers.contains(&current));
        if stale {
            let fallback = host
                .active_container()
                .filter(|c| containers.contains(c))
                .or_else(|| containers.first().copied());
            if fallback != self.browser.container() {
                self.switch_container(host, fallback);
            }
        }

        if self.state.ui_visible() {
            self.browser.refresh(host, now);
        }
        self.pick(host, PickInput::default());
        self.update_status();
    }

    fn sync_visibility(&mut self) {
        if let Some(visible) = self.state.take_ui_visibility_change() {
            tracing::debug!(visible, "inspector visibility changed");
            self.registry.set_ui_visible(visible);
            if !visible {
                self.picker.disable();
            }
        }
    }

    fn pick(&mut self, host: &dyn SceneHost, mut input: PickInput) -> Option<(WindowId, bool)> {
        if input.pointer.is_none() {
            input.pointer = self.pointer;
        }
        self.picker
            .update(host, &mut self.registry, self.state.ui_visible(), input)
    }

    fn update_status(&mut self) {
        let hints: Vec<String> = [Action::ToggleUi, Action::TogglePicker, Action::ToggleLog]
            .into_iter()
            .filter_map(|action| self.keys.hint(action))
            .collect();
        self.status.set_hints(hints.join(" | "));
        let mut state = format!("{} windows", self.registry.len());
        if self.picker.enabled() {
            state = format!("PICK  {state}");
        }
        self.status.set_state(state);
        if let Some(line) = self.log.as_ref().and_then(LogBuffer::latest) {
            self.status.set_message(line);
        }
    }

    /// Routes one input event. Only the quit binding ends the loop.
    pub fn handle_event(&mut self, host: &dyn SceneHost, event: &Event, now: Instant) -> ControlFlow {
        match event {
            Event::Key(key) => self.handle_key(host, key, now),
            Event::Mouse(mouse) => {
                self.handle_mouse(host, mouse, now);
                ControlFlow::Continue
            }
            Event::Resize(width, height) => {
                self.resize(Rect::new(0, 0, *width, *height));
                ControlFlow::Continue
            }
            _ => ControlFlow::Continue,
        }
    }

    fn handle_key(&mut self, host: &dyn SceneHost, key: &KeyEvent, now: Instant) -> ControlFlow {
        if key.kind == KeyEventKind::Release {
            return ControlFlow::Continue;
        }
        match self.keys.action_for_key(key) {
            Some(Action::Quit) => return ControlFlow::Quit,
            Some(Action::ToggleUi) => {
                self.state.toggle_ui_visible();
                self.sync_visibility();
                return ControlFlow::Continue;
            }
            _ => {}
        }
        if !self.state.ui_visible() {
            return ControlFlow::Continue;
        }

        if let Some(target) = self.state.editing() {
            self.edit_key(host, target, key, now);
            return ControlFlow::Continue;
        }

        if self.keys.matches(Action::ToggleLog, key) {
            if self.log_view.is_some() {
                self.state.toggle_log_visible();
            }
            return ControlFlow::Continue;
        }
        if self.state.log_visible()
            && let Some(view) = self.log_view.as_mut()
            && view.handle_event(&Event::Key(*key))
        {
            return ControlFlow::Continue;
        }

        if let Some(action) = self.keys.action_for_key(key) {
            self.apply_action(host, action, now);
        }
        ControlFlow::Continue
    }

    fn edit_key(&mut self, host: &dyn SceneHost, target: EditTarget, key: &KeyEvent, now: Instant) {
        let event = Event::Key(*key);
        let field = match target {
            EditTarget::Search => &mut self.search_field,
            EditTarget::PageLimit => &mut self.limit_field,
        };
        field.handle_event(&event);
        let Some(outcome) = field.take_outcome() else {
            return;
        };
        self.state.set_editing(None);
        match (target, outcome) {
            (EditTarget::Search, FieldOutcome::Submitted(query)) => {
                self.browser.search(host, &query);
                self.panel.set_selected(0);
            }
            (EditTarget::PageLimit, FieldOutcome::Submitted(text)) => {
                if self.browser.set_page_limit_text(&text).is_ok() {
                    self.panel.set_selected(0);
                }
                self.browser.refresh(host, now);
            }
            (_, FieldOutcome::Cancelled) => {}
        }
    }

    fn begin_edit(&mut self, target: EditTarget) {
        match target {
            EditTarget::Search => self.search_field.set_value(self.browser.query()),
            EditTarget::PageLimit => self
                .limit_field
                .set_value(self.browser.page_limit().to_string()),
        }
        self.state.set_editing(Some(target));
    }

    fn descend(&mut self, host: &dyn SceneHost, handle: EntityHandle, now: Instant) {
        if !host.is_live(handle) {
            return;
        }
        self.browser.set_target(host, NodeTarget::Node(handle), now);
        self.panel.set_selected(0);
    }

    fn apply_action(&mut self, host: &dyn SceneHost, action: Action, now: Instant) {
        let rows = self.browser.current_page().len();
        match action {
            Action::SelectUp => self.panel.move_selection(-1, rows),
            Action::SelectDown => self.panel.move_selection(1, rows),
            Action::Descend => {
                if let Some(handle) = self.panel.selected_handle(host, &self.browser) {
                    self.descend(host, handle, now);
                }
            }
            Action::TraverseUp => {
                self.browser.traverse_up(host, now);
                self.panel.set_selected(0);
            }
            Action::InspectSelected => {
                self.inspect_selected(host);
            }
            Action::InspectCurrent => {
                self.inspect_current(host);
            }
            Action::EditSearch => self.begin_edit(EditTarget::Search),
            Action::EditLimit => self.begin_edit(EditTarget::PageLimit),
            Action::CancelSearch => {
                if self.browser.is_searching() {
                    self.browser.cancel_search();
                    self.panel.set_selected(0);
                }
            }
            Action::PrevPage => self.browser.prev_page(host, now),
            Action::NextPage => self.browser.next_page(host, now),
            Action::PrevContainer => self.prev_container(host),
            Action::NextContainer => self.next_container(host),
            Action::TogglePicker => {
                self.pick(
                    host,
                    PickInput {
                        toggle: true,
                        ..PickInput::default()
                    },
                );
            }
            Action::CycleWindow => self.registry.cycle_focus(true),
            Action::CycleWindowBack => self.registry.cycle_focus(false),
            Action::CloseWindow => {
                if let Some(id) = self.registry.focused() {
                    self.registry.close(id);
                }
            }
            Action::ScrollWindowUp => self.registry.scroll_focused(-1),
            Action::ScrollWindowDown => self.registry.scroll_focused(1),
            Action::Quit | Action::ToggleUi | Action::ToggleLog => {}
        }
    }

    fn handle_mouse(&mut self, host: &dyn SceneHost, mouse: &MouseEvent, now: Instant) {
        let pointer = Pointer::new(mouse.column, mouse.row);
        self.pointer = Some(pointer);
        if !self.state.ui_visible() {
            return;
        }
        if self.state.log_visible()
            && let Some(view) = self.log_view.as_mut()
            && matches!(
                mouse.kind,
                MouseEventKind::ScrollUp | MouseEventKind::ScrollDown
            )
            && view.handle_event(&Event::Mouse(*mouse))
        {
            return;
        }

        if mouse.kind == MouseEventKind::Down(MouseButton::Right)
            && mouse.modifiers.contains(KeyModifiers::SHIFT)
        {
            self.pick(
                host,
                PickInput {
                    pointer: Some(pointer),
                    toggle: true,
                    confirm: false,
                },
            );
            return;
        }

        if self.registry.handle_mouse(mouse) {
            return;
        }

        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        if let Some(hit) = self.panel.hit(mouse.column, mouse.row) {
            // clicking outside an edit field commits nothing and ends the edit
            self.state.set_editing(None);
            self.apply_hit(host, hit, now);
            return;
        }
        if self.picker.enabled() {
            self.pick(
                host,
                PickInput {
                    pointer: Some(pointer),
                    toggle: false,
                    confirm: true,
                },
            );
        }
    }

    fn apply_hit(&mut self, host: &dyn SceneHost, hit: PanelHit, now: Instant) {
        match hit {
            PanelHit::PrevContainer => self.prev_container(host),
            PanelHit::NextContainer => self.next_container(host),
            PanelHit::SearchField => self.begin_edit(EditTarget::Search),
            PanelHit::LimitField => self.begin_edit(EditTarget::PageLimit),
            PanelHit::PrevPage => self.browser.prev_page(host, now),
            PanelHit::NextPage => self.browser.next_page(host, now),
            PanelHit::TraverseUp => {
                self.browser.traverse_up(host, now);
                self.panel.set_selected(0);
            }
            PanelHit::InspectCurrent => {
                self.inspect_current(host);
            }
            PanelHit::CancelSearch => {
                self.browser.cancel_search();
                self.panel.set_selected(0);
            }
            PanelHit::Row(index) => {
                self.panel.set_selected(index);
                if let Some(handle) = self.browser.current_page().get(index).map(|c| c.handle) {
                    self.descend(host, handle, now);
                }
            }
            PanelHit::InspectRow(index) => {
                if let Some(handle) = self
                    .browser
                    .current_page()
                    .get(index)
                    .map(|c| c.handle)
                    .filter(|h| host.is_live(*h))
                {
                    self.registry.open(host, handle);
                }
            }
        }
    }

    /// Paints the panel, the windows, the picker label, the log overlay and
    /// the status bar. Draws nothing while the UI is hidden.
    pub fn draw(&mut self, frame: &mut UiFrame<'_>, host: &dyn SceneHost) {
        let area = frame.area();
        if area != self.screen {
            self.resize(area);
        }
        if !self.state.ui_visible() {
            return;
        }

        let anchor = self.registry.anchor();
        let editing = self.state.editing();
        self.panel
            .render(frame, anchor, host, &self.browser, editing.is_none());
        match editing {
            Some(EditTarget::Search) => {
                let rect = self.panel.search_field_rect();
                self.search_field.render(frame, rect, true);
            }
            Some(EditTarget::PageLimit) => {
                let rect = self.panel.limit_field_rect();
                self.limit_field.render(frame, rect, true);
            }
            None => {}
        }

        self.registry
            .render_windows(frame, host, self.renderer.as_mut());
        self.picker.render(frame);

        let body_height = area.height.saturating_sub(1);
        if self.state.log_visible()
            && let Some(view) = self.log_view.as_mut()
        {
            let top = area.y + body_height / 2;
            let log_area = Rect::new(area.x, top, area.width, body_height - body_height / 2);
            view.render(frame, log_area, true);
        }

        if area.height > 0 {
            let bar = Rect::new(area.x, area.y + body_height, area.width, 1);
            self.status.render(frame, bar, false);
        }
    }
}
