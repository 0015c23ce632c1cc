//! Shared crate-wide constants.

use std::time::Duration;

/// Identifier handed to the first inspection window of the process. Later
/// windows count upward from here and ids are never handed out twice.
pub const FIRST_WINDOW_ID: u64 = 500_000;

/// Default size of a freshly opened inspection window, in terminal cells.
pub const DEFAULT_WINDOW_WIDTH: u16 = 48;
pub const DEFAULT_WINDOW_HEIGHT: u16 = 18;

/// Smallest window size accepted from configuration.
pub const MIN_WINDOW_WIDTH: u16 = 12;
pub const MIN_WINDOW_HEIGHT: u16 = 5;

/// Offset applied to a new window whose computed rect coincides with the
/// previously placed one.
///
/// Units: terminal columns, terminal rows.
pub const CASCADE_OFFSET: (u16, u16) = (2, 1);

/// Horizontal gap between the anchor panel and a window placed to its right.
pub const ANCHOR_GAP: u16 = 2;

/// Lower bound on the columns right of the anchor panel for a window to be
/// placed beside it. The whole window plus the gap must fit as well.
pub const ANCHOR_MIN_ROOM: u16 = 10;

/// Number of hierarchy rows listed per page unless the operator changes it.
pub const DEFAULT_PAGE_LIMIT: usize = 20;

/// Minimum time between two unforced hierarchy refreshes.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Accepted range for the refresh interval coming from configuration.
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_millis(50);
pub const MAX_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Width of the hierarchy panel that anchors window placement.
pub const PANEL_WIDTH: u16 = 56;

/// Lines kept by the in-memory log buffer.
pub const LOG_BUFFER_LINES: usize = 2000;
