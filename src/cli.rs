use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use indoc::indoc;

use crate::config::InspectorConfig;
use crate::constants::{DEFAULT_PAGE_LIMIT, DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH};
use crate::error::ConfigError;

const KEY_HELP: &str = indoc! {"
    Keys:
      F7                 show / hide the inspector
      Up / Down          select a row
      Enter / Backspace  browse into the selection / back to the parent
      i / c              inspect the selected row / the current node
      /  Esc             search the scene / cancel the search
      l                  edit the page limit
      [ ] or PgUp PgDn   previous / next page
      < >                previous / next scene
      p, Shift+RClick    toggle mouse picking (left click picks)
      Tab  x             cycle windows / close the focused window
      F12                log overlay
      Ctrl+Q             quit
"};

#[derive(Parser, Debug)]
#[command(
    name = "scene-lens",
    version = env!("CARGO_PKG_VERSION"),
    about = "Live scene-graph inspector running against a generated demo scene",
    after_help = KEY_HELP
)]
pub struct Cli {
    /// Rows listed per page in the hierarchy browser.
    #[arg(short = 'l', long = "page-limit", value_name = "N", default_value_t = DEFAULT_PAGE_LIMIT)]
    pub page_limit: usize,

    /// Minimum time between two automatic hierarchy refreshes.
    #[arg(short = 'r', long = "refresh-ms", value_name = "MS", default_value_t = 1000)]
    pub refresh_ms: u64,

    /// Width of a new inspection window, in cells.
    #[arg(long = "window-width", value_name = "COLS", default_value_t = DEFAULT_WINDOW_WIDTH)]
    pub window_width: u16,

    /// Height of a new inspection window, in cells.
    #[arg(long = "window-height", value_name = "ROWS", default_value_t = DEFAULT_WINDOW_HEIGHT)]
    pub window_height: u16,

    /// Number of root entities generated in the main demo level.
    #[arg(long = "demo-roots", value_name = "N", default_value_t = 45)]
    pub demo_roots: usize,

    /// Append logs to this file instead of the in-app log overlay.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl TryFrom<&Cli> for InspectorConfig {
    type Error = ConfigError;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        let config = InspectorConfig {
            page_limit: cli.page_limit,
            refresh_interval: Duration::from_millis(cli.refresh_ms),
            window_size: (cli.window_width, cli.window_height),
            log_file: cli.log_file.clone(),
            demo_roots: cli.demo_roots,
            ..InspectorConfig::default()
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_convert() {
        let cli = Cli::parse_from(["scene-lens"]);
        let config = InspectorConfig::try_from(&cli).unwrap();
        assert_eq!(config, InspectorConfig::default());
    }

    #[test]
    fn flags_override_and_validate() {
        let cli = Cli::parse_from([
            "scene-lens",
            "--page-limit",
            "5",
            "--refresh-ms",
            "250",
            "--log-file",
            "/tmp/lens.log",
        ]);
        let config = InspectorConfig::try_from(&cli).unwrap();
        assert_eq!(config.page_limit, 5);
        assert_eq!(config.refresh_interval, Duration::from_millis(250));
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/lens.log")));

        let cli = Cli::parse_from(["scene-lens", "--page-limit", "0"]);
        assert_eq!(InspectorConfig::try_from(&cli), Err(ConfigError::PageLimit));
    }
}
