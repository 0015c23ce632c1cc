use ratatui::style::Color;

use crate::host::{EntityHandle, SceneHost};
use crate::theme;

/// Color class of a hierarchy row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    ActiveWithChildren,
    ActiveLeaf,
    Inactive,
}

impl NodeState {
    pub fn classify(active: bool, child_count: usize) -> Self {
        match (active, child_count) {
            (false, _) => NodeState::Inactive,
            (true, 0) => NodeState::ActiveLeaf,
            (true, _) => NodeState::ActiveWithChildren,
        }
    }

    pub fn color(self) -> Color {
        match self {
            NodeState::ActiveWithChildren => theme::node_active_branch_fg(),
            NodeState::ActiveLeaf => theme::node_active_leaf_fg(),
            NodeState::Inactive => theme::node_inactive_fg(),
        }
    }
}

/// One row of a refresh snapshot. Only valid until the next refresh; the
/// handle may be stale by the time the row is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeCache {
    pub handle: EntityHandle,
    pub label: String,
    pub child_count: usize,
    pub state: NodeState,
}

impl NodeCache {
    /// Reads the live fields of `handle`. Callers pass live handles; a dead
    /// one yields an empty, inactive row.
    pub fn snapshot(host: &dyn SceneHost, handle: EntityHandle) -> Self {
        let child_count = host.child_count(handle);
        Self::with_count(host, handle, child_count)
    }

    pub(crate) fn with_count(host: &dyn SceneHost, handle: EntityHandle, child_count: usize) -> Self {
        let name = host.display_name(handle);
        let active = host.active_state(handle);
        Self {
            handle,
            label: row_label(&name, child_count),
            child_count,
            state: NodeState::classify(active, child_count),
        }
    }
}

pub fn row_label(name: &str, child_count: usize) -> String {
    if child_count == 0 {
        name.to_string()
    } else {
        format!("[{child_count} children] {name}")
    }
}
