use ratatui::style::Color;

// Centralized theme colors. Small helpers so RGB values go through
// `crate::term_color` and degrade on terminals without truecolor.

pub const ACCENT_RGB: (u8, u8, u8) = (200, 100, 0);
pub const ACCENT_ALT_RGB: (u8, u8, u8) = (255, 165, 0);
pub const NODE_BRANCH_RGB: (u8, u8, u8) = (120, 220, 120);
pub const NODE_LEAF_RGB: (u8, u8, u8) = (90, 150, 90);
pub const ALERT_RGB: (u8, u8, u8) = (230, 70, 70);

pub fn rgb_to_color(rgb: (u8, u8, u8)) -> Color {
    crate::term_color::map_rgb_to_color(rgb.0, rgb.1, rgb.2)
}

pub fn accent() -> Color {
    rgb_to_color(ACCENT_RGB)
}

pub fn accent_alt() -> Color {
    rgb_to_color(ACCENT_ALT_RGB)
}

// Hierarchy rows
pub fn node_active_branch_fg() -> Color {
    rgb_to_color(NODE_BRANCH_RGB)
}
pub fn node_active_leaf_fg() -> Color {
    rgb_to_color(NODE_LEAF_RGB)
}
pub fn node_inactive_fg() -> Color {
    alert_fg()
}
pub fn alert_fg() -> Color {
    rgb_to_color(ALERT_RGB)
}

// Panel
pub fn panel_border() -> Color {
    Color::DarkGray
}
pub fn panel_focus_border() -> Color {
    accent_alt()
}
pub fn panel_header_fg() -> Color {
    Color::White
}
pub fn selection_bg() -> Color {
    Color::Gray
}
pub fn selection_fg() -> Color {
    Color::Black
}

// Status bar
pub fn status_bg() -> Color {
    Color::DarkGray
}
pub fn status_fg() -> Color {
    Color::White
}

// Decorator
pub fn decorator_header_bg() -> Color {
    Color::Blue
}
pub fn decorator_header_inactive_bg() -> Color {
    Color::DarkGray
}
pub fn decorator_header_fg() -> Color {
    Color::White
}
pub fn decorator_border() -> Color {
    Color::DarkGray
}

// Picker label
pub fn picker_label_fg() -> Color {
    Color::White
}
pub fn picker_shadow_fg() -> Color {
    Color::Black
}

// Log overlay highlight
pub fn log_highlight() -> Color {
    accent_alt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    #[test]
    fn accent_returns_a_color_variant() {
        match accent() {
            Color::Rgb(_, _, _) | Color::Indexed(_) => {}
            other => panic!("unexpected color variant {other:?}"),
        }
    }

    #[test]
    fn node_state_colors_are_distinct() {
        assert_ne!(node_active_branch_fg(), node_active_leaf_fg());
        assert_ne!(node_active_leaf_fg(), node_inactive_fg());
    }
}
