pub mod contents;
pub mod decorator;

mod registry;

use std::fmt;

use ratatui::prelude::Rect;

use crate::constants::{
    ANCHOR_GAP, ANCHOR_MIN_ROOM, CASCADE_OFFSET, DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH,
};
use crate::host::{EntityCategory, EntityHandle};

pub use contents::{ContentRenderer, SummaryRenderer, WindowView};
pub use decorator::{DefaultDecorator, HeaderHit, WindowDecorator};
pub use registry::WindowRegistry;

/// Process-unique window identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Closed set of window constructors, keyed by the handle's category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    Entity,
    Generic,
}

impl WindowKind {
    pub fn for_category(category: EntityCategory) -> Self {
        match category {
            EntityCategory::Entity | EntityCategory::Spatial => WindowKind::Entity,
            EntityCategory::Object => WindowKind::Generic,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WindowKind::Entity => "Entity",
            WindowKind::Generic => "Object",
        }
    }
}

/// Per-window cursor into the target's contents. Dropped back to the start
/// whenever drawing the window fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalState {
    pub scroll: usize,
}

impl TraversalState {
    pub fn reset(&mut self) {
        self.scroll = 0;
    }

    pub fn scroll_by(&mut self, delta: isize) {
        self.scroll = if delta.is_negative() {
            self.scroll.saturating_sub(delta.unsigned_abs())
        } else {
            self.scroll.saturating_add(delta as usize)
        };
    }
}

#[derive(Debug, Clone)]
pub struct InspectionWindow {
    id: WindowId,
    rect: Rect,
    target: EntityHandle,
    kind: WindowKind,
    title: String,
    traversal: TraversalState,
    last_fault: Option<String>,
}

impl InspectionWindow {
    fn new(id: WindowId, rect: Rect, target: EntityHandle, title: String) -> Self {
        Self {
            id,
            rect,
            target,
            kind: WindowKind::for_category(target.category),
            title,
            traversal: TraversalState::default(),
            last_fault: None,
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub fn target(&self) -> EntityHandle {
        self.target
    }

    pub fn kind(&self) -> WindowKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn traversal(&self) -> TraversalState {
        self.traversal
    }

    pub fn traversal_mut(&mut self) -> &mut TraversalState {
        &mut self.traversal
    }

    pub fn last_fault(&self) -> Option<&str> {
        self.last_fault.as_deref()
    }
}

/// Geometry rules for new windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub window_size: (u16, u16),
    pub cascade_offset: (u16, u16),
    pub anchor_gap: u16,
    pub anchor_min_room: u16,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            window_size: (DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT),
            cascade_offset: CASCADE_OFFSET,
            anchor_gap: ANCHOR_GAP,
            anchor_min_room: ANCHOR_MIN_ROOM,
        }
    }
}

impl Placement {
    /// Rect for the next window: right of `anchor` when the whole window fits
    /// there, otherwise at the screen origin. A result equal to `last_placed`
    /// is shifted down-right by the cascade offset.
    pub fn place(&self, screen: Rect, anchor: Rect, last_placed: Option<Rect>) -> Rect {
        let (width, height) = self.window_size;
        let mut rect = Rect {
            x: screen.x,
            y: screen.y,
            width,
            height,
        };
        let anchor_right = anchor.x as u32 + anchor.width as u32;
        let beside = (self.anchor_gap as u32 + width as u32).max(self.anchor_min_room as u32);
        let room_needed = anchor_right + beside;
        if anchor.width > 0 && room_needed <= screen.x as u32 + screen.width as u32 {
            rect.x = anchor.x.saturating_add(anchor.width).saturating_add(self.anchor_gap);
            rect.y = anchor.y;
        }
        if last_placed == Some(rect) {
            rect.x = rect.x.saturating_add(self.cascade_offset.0);
            rect.y = rect.y.saturating_add(self.cascade_offset.1);
        }
        rect
    }
}
