/// Edit field that currently owns keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Search,
    PageLimit,
}

#[derive(Debug, Clone, Copy)]
pub struct AppState {
    ui_visible: bool,
    ui_visible_dirty: bool,
    log_visible: bool,
    editing: Option<EditTarget>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            ui_visible: true,
            ui_visible_dirty: false,
            log_visible: false,
            editing: None,
        }
    }

    pub fn ui_visible(&self) -> bool {
        self.ui_visible
    }

    pub fn set_ui_visible(&mut self, visible: bool) {
        if self.ui_visible == visible {
            return;
        }
        self.ui_visible = visible;
        self.ui_visible_dirty = true;
        if !visible {
            self.editing = None;
        }
    }

    pub fn toggle_ui_visible(&mut self) {
        let visible = !self.ui_visible;
        self.set_ui_visible(visible);
    }

    /// Reports a visibility change once.
    pub fn take_ui_visibility_change(&mut self) -> Option<bool> {
        if self.ui_visible_dirty {
            self.ui_visible_dirty = false;
            Some(self.ui_visible)
        } else {
            None
        }
    }

    pub fn log_visible(&self) -> bool {
        self.log_visible
    }

    pub fn toggle_log_visible(&mut self) {
        self.log_visible = !self.log_visible;
    }

    pub fn editing(&self) -> Option<EditTarget> {
        self.editing
    }

    pub fn set_editing(&mut self, target: Option<EditTarget>) {
        self.editing = target;
    }
}
