//! Paged, throttled view over the live entity tree.
//!
//! The browser never holds on to the tree between refreshes. Every refresh
//! enumerates the current node's children (or the container's roots), sorts
//! them by child count and snapshots just the visible page into
//! [`NodeCache`] rows. Search is a separate mode with its own result list that
//! leaves the browse position untouched.

pub mod cache;
pub mod pager;
pub mod view;

use std::time::{Duration, Instant};

use crate::error::InputError;
use crate::host::{ContainerId, EntityHandle, SceneHost};

pub use cache::{NodeCache, NodeState};
pub use pager::{Pager, parse_limit};
pub use view::{DESTROYED_LABEL, NodeRow, ScenePanel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseMode {
    Browsing,
    Searching,
}

/// Node whose children are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeTarget {
    /// Root entities of the browsed container.
    Root,
    Node(EntityHandle),
}

#[derive(Debug)]
pub struct HierarchyBrowser {
    container: Option<ContainerId>,
    target: NodeTarget,
    mode: BrowseMode,
    pager: Pager,
    // browse position saved while searching
    stashed: Option<(usize, usize)>,
    refresh_interval: Duration,
    last_refresh: Option<Instant>,
    force_refresh: bool,
    page: Vec<NodeCache>,
    query: String,
    results: Vec<NodeCache>,
}

impl HierarchyBrowser {
    pub fn new(page_limit: usize, refresh_interval: Duration) -> Self {
        Self {
            container: None,
            target: NodeTarget::Root,
            mode: BrowseMode::Browsing,
            pager: Pager::new(page_limit),
            stashed: None,
            refresh_interval,
            last_refresh: None,
            force_refresh: true,
            page: Vec::new(),
            query: String::new(),
            results: Vec::new(),
        }
    }

    pub fn container(&self) -> Option<ContainerId> {
        self.container
    }

    pub fn target(&self) -> NodeTarget {
        self.target
    }

    pub fn mode(&self) -> BrowseMode {
        self.mode
    }

    pub fn is_searching(&self) -> bool {
        self.mode == BrowseMode::Searching
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page_offset(&self) -> usize {
        self.pager.offset()
    }

    pub fn page_limit(&self) -> usize {
        self.pager.limit()
    }

    pub fn total_count(&self) -> usize {
        self.pager.total()
    }

    pub fn page_label(&self) -> Option<String> {
        self.pager.label()
    }

    pub fn last_refresh(&self) -> Option<Instant> {
        self.last_refresh
    }

    pub fn refresh_pending(&self) -> bool {
        self.force_refresh
    }

    /// Rows of the current page: the refresh snapshot while browsing, the
    /// visible slice of the results while searching.
    pub fn current_page(&self) -> &[NodeCache] {
        match self.mode {
            BrowseMode::Browsing => &self.page,
            BrowseMode::Searching => {
                let range = self.pager.range();
                self.results.get(range).unwrap_or(&[])
            }
        }
    }

    pub fn search_results(&self) -> &[NodeCache] {
        &self.results
    }

    /// Header line for the listing.
    pub fn header(&self, host: &dyn SceneHost) -> String {
        match self.target {
            NodeTarget::Root => "Root entities".to_string(),
            NodeTarget::Node(node) if host.is_live(node) => host.hierarchy_path(node),
            NodeTarget::Node(_) => DESTROYED_LABEL.to_string(),
        }
    }

    /// Next tick refreshes regardless of the throttle.
    pub fn invalidate(&mut self) {
        self.force_refresh = true;
    }

    pub fn on_container_switch(&mut self, container: Option<ContainerId>) {
        tracing::debug!(?container, "browser container switched");
        self.container = container;
        self.target = NodeTarget::Root;
        if self.is_searching() {
            self.cancel_search();
        }
        self.pager.restore(0, 0);
        self.page.clear();
        self.force_refresh = true;
    }

    /// Throttled refresh. Returns whether the listing was rebuilt.
    pub fn refresh(&mut self, host: &dyn SceneHost, now: Instant) -> bool {
        if self.is_searching() {
            return false;
        }
        let due = self
            .last_refresh
            .is_none_or(|last| now.saturating_duration_since(last) >= self.refresh_interval);
        if !self.force_refresh && !due {
            return false;
        }
        self.rebuild(host);
        self.last_refresh = Some(now);
        self.force_refresh = false;
        true
    }

    fn rebuild(&mut self, host: &dyn SceneHost) {
        if let NodeTarget::Node(node) = self.target
            && !host.is_live(node)
        {
            tracing::debug!("browsed node was destroyed; returning to root");
            self.target = NodeTarget::Root;
        }

        let handles = match (self.target, self.container) {
            (NodeTarget::Node(node), _) => host.enumerate_children(node),
            (NodeTarget::Root, Some(container)) => host.enumerate_root_entities(container),
            (NodeTarget::Root, None) => Vec::new(),
        };
        let mut counted: Vec<(EntityHandle, usize)> = handles
            .into_iter()
            .filter(|handle| host.is_live(*handle))
            .map(|handle| (handle, host.child_count(handle)))
            .collect();

        self.pager.set_total(counted.len());
        // stable: equal counts keep enumeration order
        counted.sort_by(|a, b| b.1.cmp(&a.1));

        let range = self.pager.range();
        self.page = counted[range]
            .iter()
            .map(|(handle, count)| NodeCache::with_count(host, *handle, *count))
            .collect();
    }

    /// Lists the children of `target`, leaving search mode if active.
    pub fn set_target(&mut self, host: &dyn SceneHost, target: NodeTarget, now: Instant) {
        if self.is_searching() {
            self.cancel_search();
        }
        if self.target != target {
            self.pager.restore(0, self.pager.total());
        }
        self.target = target;
        self.force_refresh = true;
        self.refresh(host, now);
    }

    pub fn traverse_up(&mut self, host: &dyn SceneHost, now: Instant) {
        let target = match self.target {
            NodeTarget::Node(node) => host
                .parent(node)
                .map(NodeTarget::Node)
                .unwrap_or(NodeTarget::Root),
            NodeTarget::Root => NodeTarget::Root,
        };
        self.set_target(host, target, now);
    }

    /// Case-insensitive name search over every live entity of the browsed
    /// container. A blank query matches nothing.
    pub fn search(&mut self, host: &dyn SceneHost, query: &str) {
        if !self.is_searching() {
            self.stashed = Some((self.pager.offset(), self.pager.total()));
            self.mode = BrowseMode::Searching;
        }
        self.query = query.to_string();
        self.results = match self.container {
            Some(container) if !query.trim().is_empty() => {
                let needle = query.to_lowercase();
                host.enumerate_all_entities()
                    .into_iter()
                    .filter(|handle| {
                        host.is_live(*handle)
                            && host.container_of(*handle) == Some(container)
                            && host.display_name(*handle).to_lowercase().contains(&needle)
                    })
                    .map(|handle| NodeCache::snapshot(host, handle))
                    .collect()
            }
            _ => Vec::new(),
        };
        self.pager.set_total(self.results.len());
        tracing::debug!(query, matches = self.results.len(), "search");
    }

    /// Back to browsing at the position held before the search started.
    pub fn cancel_search(&mut self) {
        if !self.is_searching() {
            return;
        }
        self.mode = BrowseMode::Browsing;
        self.results.clear();
        if let Some((offset, total)) = self.stashed.take() {
            self.pager.restore(offset, total);
        }
    }

    pub fn set_page_limit(&mut self, limit: usize) -> Result<(), InputError> {
        if limit == 0 {
            tracing::warn!("rejected page limit 0");
            return Err(InputError::NonPositive(0));
        }
        self.pager.set_limit(limit);
        if self.is_searching() {
            self.pager.clamp();
        }
        self.force_refresh = true;
        Ok(())
    }

    /// Applies edit-field text. On error the previous limit stays in effect.
    pub fn set_page_limit_text(&mut self, text: &str) -> Result<usize, InputError> {
        let limit = parse_limit(text).inspect_err(|err| {
            tracing::warn!(input = text, error = %err, "rejected page limit");
        })?;
        self.set_page_limit(limit)?;
        Ok(limit)
    }

    pub fn next_page(&mut self, host: &dyn SceneHost, now: Instant) {
        self.pager.next();
        self.after_page_move(host, now);
    }

    pub fn prev_page(&mut self, host: &dyn SceneHost, now: Instant) {
        self.pager.prev();
        self.after_page_move(host, now);
    }

    fn after_page_move(&mut self, host: &dyn SceneHost, now: Instant) {
        if !self.is_searching() {
            self.force_refresh = true;
            self.refresh(host, now);
        }
    }
}
