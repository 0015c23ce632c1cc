use ratatui::style::Color;

/// Color depth the terminal claims to support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorDepth {
    TrueColor,
    Indexed256,
}

impl ColorDepth {
    /// Reads `COLORTERM`; anything other than `truecolor`/`24bit` is treated
    /// as a 256-color terminal.
    pub fn detect() -> Self {
        match std::env::var("COLORTERM") {
            Ok(value) => {
                let value = value.to_ascii_lowercase();
                if value.contains("truecolor") || value.contains("24bit") {
                    ColorDepth::TrueColor
                } else {
                    ColorDepth::Indexed256
                }
            }
            Err(_) => ColorDepth::Indexed256,
        }
    }
}

pub fn map_rgb_to_color(r: u8, g: u8, b: u8) -> Color {
    map_rgb_for_depth(ColorDepth::detect(), r, g, b)
}

pub fn map_rgb_for_depth(depth: ColorDepth, r: u8, g: u8, b: u8) -> Color {
    match depth {
        ColorDepth::TrueColor => Color::Rgb(r, g, b),
        ColorDepth::Indexed256 => Color::Indexed(nearest_xterm_index(r, g, b)),
    }
}

// xterm cube channel levels for steps 0..=5
const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

/// Nearest entry among the 6x6x6 cube (16..=231) and the gray ramp
/// (232..=255).
fn nearest_xterm_index(r: u8, g: u8, b: u8) -> u8 {
    let step = |v: u8| -> usize {
        CUBE_LEVELS
            .iter()
            .enumerate()
            .min_by_key(|(_, level)| (**level as i32 - v as i32).abs())
            .map(|(idx, _)| idx)
            .unwrap_or(0)
    };
    let (ri, gi, bi) = (step(r), step(g), step(b));
    let cube = (CUBE_LEVELS[ri], CUBE_LEVELS[gi], CUBE_LEVELS[bi]);
    let cube_index = 16 + 36 * ri + 6 * gi + bi;

    let avg = (r as u32 + g as u32 + b as u32) / 3;
    let gray_step = (avg.saturating_sub(8) / 10).min(23);
    let gray_level = (8 + gray_step * 10) as u8;

    let cube_dist = distance_sq((r, g, b), cube);
    let gray_dist = distance_sq((r, g, b), (gray_level, gray_level, gray_level));
    if gray_dist < cube_dist {
        (232 + gray_step) as u8
    } else {
        cube_index as u8
    }
}

fn distance_sq(a: (u8, u8, u8), b: (u8, u8, u8)) -> u32 {
    let d = |x: u8, y: u8| {
        let diff = x as i32 - y as i32;
        (diff * diff) as u32
    };
    d(a.0, b.0) + d(a.1, b.1) + d(a.2, b.2)
}
