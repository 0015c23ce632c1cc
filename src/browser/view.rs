use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};

use super::{HierarchyBrowser, NodeCache, NodeTarget};
use crate::host::{EntityHandle, SceneHost};
use crate::layout::rect_contains;
use crate::theme;
use crate::ui::{UiFrame, truncate_to_width};

/// Label drawn in place of a row whose entity no longer exists.
pub const DESTROYED_LABEL: &str = "null (Destroyed)";

const INSPECT_GLYPH: &str = "[i]";

/// Drawable form of a cached row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRow {
    pub handle: EntityHandle,
    pub text: String,
    pub color: Color,
    pub destroyed: bool,
}

impl NodeRow {
    /// Only liveness is queried; a dead row never reaches the name or active
    /// accessors.
    pub fn from_cache(host: &dyn SceneHost, cache: &NodeCache) -> Self {
        if !host.is_live(cache.handle) {
            return Self {
                handle: cache.handle,
                text: DESTROYED_LABEL.to_string(),
                color: theme::alert_fg(),
                destroyed: true,
            };
        }
        Self {
            handle: cache.handle,
            text: cache.label.clone(),
            color: cache.state.color(),
            destroyed: false,
        }
    }
}

pub fn rows(host: &dyn SceneHost, browser: &HierarchyBrowser) -> Vec<NodeRow> {
    browser
        .current_page()
        .iter()
        .map(|cache| NodeRow::from_cache(host, cache))
        .collect()
}

/// Clickable parts of the scene panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelHit {
    PrevContainer,
    NextContainer,
    SearchField,
    LimitField,
    PrevPage,
    NextPage,
    TraverseUp,
    InspectCurrent,
    CancelSearch,
    Row(usize),
    InspectRow(usize),
}

/// The anchor panel: container switcher, search and limit fields, page
/// buttons and the listing itself.
#[derive(Debug, Default)]
pub struct ScenePanel {
    selected: usize,
    row_count: usize,
    hits: Vec<(Rect, PanelHit)>,
    search_field: Rect,
    limit_field: Rect,
}

impl ScenePanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn set_selected(&mut self, index: usize) {
        self.selected = index.min(self.row_count.saturating_sub(1));
    }

    pub fn move_selection(&mut self, delta: isize, row_count: usize) {
        self.row_count = row_count;
        if row_count == 0 {
            self.selected = 0;
            return;
        }
        self.selected = if delta.is_negative() {
            self.selected.saturating_sub(delta.unsigned_abs())
        } else {
            self.selected.saturating_add(delta as usize).min(row_count - 1)
        };
    }

    /// Live handle under the selection cursor.
    pub fn selected_handle(
        &self,
        host: &dyn SceneHost,
        browser: &HierarchyBrowser,
    ) -> Option<EntityHandle> {
        browser
            .current_page()
            .get(self.selected)
            .map(|cache| cache.handle)
            .filter(|handle| host.is_live(*handle))
    }

    /// Where the search edit field sits, as of the last render.
    pub fn search_field_rect(&self) -> Rect {
        self.search_field
    }

    pub fn limit_field_rect(&self) -> Rect {
        self.limit_field
    }

    pub fn hit(&self, column: u16, row: u16) -> Option<PanelHit> {
        self.hits
            .iter()
            .find(|(rect, _)| rect_contains(*rect, column, row))
            .map(|(_, hit)| *hit)
    }

    pub fn render(
        &mut self,
        frame: &mut UiFrame<'_>,
        area: Rect,
        host: &dyn SceneHost,
        browser: &HierarchyBrowser,
        focused: bool,
    ) {
        self.hits.clear();
        let border = if focused {
            theme::panel_focus_border()
        } else {
            theme::panel_border()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Scene Explorer")
            .border_style(Style::default().fg(border));
        let inner = block.inner(area);
        frame.fill(area, Style::default());
        frame.render_widget(block, area);
        if inner.width < 8 || inner.height < 5 {
            return;
        }

        let x = inner.x;
        let width = inner.width;
        let right = x + width;
        let plain = Style::default();
        let header = Style::default()
            .fg(theme::panel_header_fg())
            .add_modifier(Modifier::BOLD);

        // container switcher
        let mut y = inner.y;
        frame.put_str(x, y, "Scene:", header);
        let name = browser
            .container()
            .map(|c| host.container_name(c))
            .unwrap_or_else(|| "(none)".to_string());
        if host.containers().len() > 1 {
            self.button(frame, x + 7, y, "<", PanelHit::PrevContainer);
            self.button(frame, x + 9, y, ">", PanelHit::NextContainer);
            frame.put_str(x + 11, y, &name, Style::default().fg(theme::accent_alt()));
        } else {
            frame.put_str(x + 7, y, &name, Style::default().fg(theme::accent_alt()));
        }

        // search field
        y += 1;
        frame.put_str(x, y, "Search:", header);
        self.search_field = Rect::new(x + 8, y, width.saturating_sub(8), 1);
        frame.put_str(x + 8, y, browser.query(), plain.add_modifier(Modifier::UNDERLINED));
        self.hits.push((self.search_field, PanelHit::SearchField));

        // limit field and page buttons
        y += 1;
        frame.put_str(x, y, "Limit:", header);
        self.limit_field = Rect::new(x + 7, y, 5, 1);
        let limit_text = browser.page_limit().to_string();
        frame.put_str(x + 7, y, &limit_text, plain.add_modifier(Modifier::UNDERLINED));
        self.hits.push((self.limit_field, PanelHit::LimitField));
        if let Some(label) = browser.page_label() {
            self.button(frame, x + 13, y, "< Prev", PanelHit::PrevPage);
            frame.put_str(x + 20, y, &label, plain);
            let next_x = right.saturating_sub(6).max(x + 21 + label.len() as u16);
            self.button(frame, next_x, y, "Next >", PanelHit::NextPage);
        }

        // listing header
        y += 1;
        if browser.is_searching() {
            self.button(frame, x, y, "<- Cancel search", PanelHit::CancelSearch);
            let count = format!("{} found", browser.total_count());
            let count_x = right.saturating_sub(count.len() as u16);
            frame.put_str(count_x, y, &count, plain);
        } else {
            match browser.target() {
                NodeTarget::Root => frame.put_str(x, y, "Root entities:", header),
                NodeTarget::Node(_) => {
                    self.button(frame, x, y, "<-", PanelHit::TraverseUp);
                    let path = truncate_to_width(&browser.header(host), width.saturating_sub(7) as usize);
                    frame.put_str(x + 3, y, &path, Style::default().fg(theme::accent_alt()));
                    self.button(
                        frame,
                        right.saturating_sub(INSPECT_GLYPH.len() as u16),
                        y,
                        INSPECT_GLYPH,
                        PanelHit::InspectCurrent,
                    );
                }
            }
        }

        // rows
        y += 1;
        let list = rows(host, browser);
        self.row_count = list.len();
        if self.selected >= list.len() {
            self.selected = list.len().saturating_sub(1);
        }
        if list.is_empty() {
            let (text, style) = if browser.is_searching() {
                ("No results found!", Style::default().fg(theme::alert_fg()))
            } else {
                ("(empty)", Style::default().fg(theme::panel_border()))
            };
            frame.put_str(x, y, text, style.add_modifier(Modifier::ITALIC));
            return;
        }
        let bottom = inner.y + inner.height;
        let label_width = width.saturating_sub(INSPECT_GLYPH.len() as u16 + 1);
        for (index, row) in list.iter().enumerate() {
            if y >= bottom {
                break;
            }
            let mut style = Style::default().fg(row.color);
            if row.destroyed {
                style = style.add_modifier(Modifier::ITALIC);
            }
            if focused && index == self.selected {
                style = style.add_modifier(Modifier::REVERSED);
            }
            let text = truncate_to_width(&row.text, label_width as usize);
            frame.put_str(x, y, &text, style);
            self.hits.push((Rect::new(x, y, label_width, 1), PanelHit::Row(index)));
            if !row.destroyed {
                self.button(
                    frame,
                    right.saturating_sub(INSPECT_GLYPH.len() as u16),
                    y,
                    INSPECT_GLYPH,
                    PanelHit::InspectRow(index),
                );
            }
            y += 1;
        }
    }

    fn button(&mut self, frame: &mut UiFrame<'_>, x: u16, y: u16, label: &str, hit: PanelHit) {
        let style = Style::default()
            .fg(theme::selection_fg())
            .bg(theme::selection_bg());
        frame.put_str(x, y, label, style);
        self.hits
            .push((Rect::new(x, y, label.chars().count() as u16, 1), hit));
    }
}
