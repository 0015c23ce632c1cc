use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    ANCHOR_GAP, ANCHOR_MIN_ROOM, CASCADE_OFFSET, DEFAULT_PAGE_LIMIT, DEFAULT_REFRESH_INTERVAL,
    DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH, MAX_REFRESH_INTERVAL,
    MIN_REFRESH_INTERVAL, MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH,
};
use crate::error::ConfigError;
use crate::window::Placement;

/// Settings for one [`Inspector`](crate::app::Inspector).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectorConfig {
    pub page_limit: usize,
    pub refresh_interval: Duration,
    pub window_size: (u16, u16),
    pub cascade_offset: (u16, u16),
    pub anchor_gap: u16,
    pub anchor_min_room: u16,
    pub log_file: Option<PathBuf>,
    pub demo_roots: usize,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            page_limit: DEFAULT_PAGE_LIMIT,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            window_size: (DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT),
            cascade_offset: CASCADE_OFFSET,
            anchor_gap: ANCHOR_GAP,
            anchor_min_room: ANCHOR_MIN_ROOM,
            log_file: None,
            demo_roots: 45,
        }
    }
}

impl InspectorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_limit == 0 {
            return Err(ConfigError::PageLimit);
        }
        if !(MIN_REFRESH_INTERVAL..=MAX_REFRESH_INTERVAL).contains(&self.refresh_interval) {
            return Err(ConfigError::RefreshInterval {
                min_ms: MIN_REFRESH_INTERVAL.as_millis() as u64,
                max_ms: MAX_REFRESH_INTERVAL.as_millis() as u64,
            });
        }
        let (width, height) = self.window_size;
        if width < MIN_WINDOW_WIDTH || height < MIN_WINDOW_HEIGHT {
            return Err(ConfigError::WindowSize {
                min_width: MIN_WINDOW_WIDTH,
                min_height: MIN_WINDOW_HEIGHT,
            });
        }
        Ok(())
    }

    pub fn placement(&self) -> Placement {
        Placement {
            window_size: self.window_size,
            cascade_offset: self.cascade_offset,
            anchor_gap: self.anchor_gap,
            anchor_min_room: self.anchor_min_room,
        }
    }
}
