//! Live inspector for scene graphs, drawn in the terminal.
//!
//! The host application implements [`host::SceneHost`] and drives an
//! [`app::Inspector`] from its own frame loop. [`host::MemoryScene`] is a
//! self-contained host used by the demo binary and the tests.

pub mod app;
pub mod browser;
pub mod cli;
pub mod components;
pub mod config;
pub mod constants;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod host;
pub mod identity;
pub mod keybindings;
pub mod layout;
pub mod log_buffer;
pub mod picker;
pub mod state;
pub mod term_color;
pub mod theme;
pub mod tracing_sub;
pub mod ui;
pub mod window;

pub use app::Inspector;
pub use config::InspectorConfig;
pub use error::{ConfigError, ContentError, InputError, InspectorError};
pub use host::{EntityCategory, EntityHandle, MemoryScene, SceneHost};
