//! Screen configuration
//!
//! Loaded from JSON. Every field is optional:
//!
//! ```json
//! {
//!     "fallback_rows": 24,
//!     "fallback_cols": 80,
//!     "scratch_bound": "target_window",
//!     "echo": false,
//!     "can_change_color": false,
//!     "log_filter": "info"
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{ColorCapabilities, Size};
use crate::error::Result;

/// Which window sizes the scratch area for formatted output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScratchBound {
    /// The window being printed to
    #[default]
    TargetWindow,
    /// The standard window, whatever the target
    StandardWindow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Rows to assume when the display cannot report its size
    #[serde(default = "default_rows")]
    pub fallback_rows: usize,
    /// Columns to assume when the display cannot report its size
    #[serde(default = "default_cols")]
    pub fallback_cols: usize,
    #[serde(default)]
    pub scratch_bound: ScratchBound,
    /// Echo mode at startup
    #[serde(default)]
    pub echo: bool,
    /// Whether the display accepts palette redefinition
    #[serde(default)]
    pub can_change_color: bool,
    /// env_logger filter used by the demo binary
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_rows() -> usize {
    24
}

fn default_cols() -> usize {
    80
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fallback_rows: default_rows(),
            fallback_cols: default_cols(),
            scratch_bound: ScratchBound::default(),
            echo: false,
            can_change_color: false,
            log_filter: default_log_filter(),
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn fallback_size(&self) -> Size {
        Size::new(self.fallback_rows, self.fallback_cols)
    }

    pub fn color_capabilities(&self) -> ColorCapabilities {
        ColorCapabilities {
            has_colors: true,
            can_change_color: self.can_change_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_defaults_from_empty_object() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.fallback_size(), Size::new(24, 80));
        assert_eq!(config.scratch_bound, ScratchBound::TargetWindow);
    }

    #[test]
    fn test_parse_fields() {
        let config = Config::from_json(
            r#"{"scratch_bound": "standard_window", "echo": true, "can_change_color": true, "fallback_rows": 50}"#,
        )
        .unwrap();
        assert_eq!(config.scratch_bound, ScratchBound::StandardWindow);
        assert!(config.echo);
        assert!(config.color_capabilities().can_change_color);
        assert_eq!(config.fallback_rows, 50);
        assert_eq!(config.fallback_cols, 80);
    }

    #[test]
    fn test_bad_json() {
        let err = Config::from_json(r#"{"echo": "yes"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load("/nonexistent/cellcurses.json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Backend);
    }
}
