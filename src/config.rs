//! Tunable geometry and timing policy for a [`PanelManager`](crate::window::PanelManager).
//!
//! Every field has a default taken from [`crate::constants`]; a JSON file only
//! needs to name the fields it overrides.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    CASCADE_OFFSET, CASCADE_ORIGIN, DEFAULT_HEIGHT, DEFAULT_WIDTH, DOUBLE_CLICK_WINDOW,
    FULLSCREEN_CHROME_OFFSET, MIN_HEIGHT, MIN_VISIBLE_MARGIN, MIN_WIDTH, MINIMIZED_HEIGHT,
    PULSE_DURATION,
};
use crate::error::WmError;
use crate::geometry::{Limits, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WmConfig {
    pub min_width: i32,
    pub min_height: i32,
    pub minimized_height: i32,
    pub chrome_offset: i32,
    pub cascade_offset: i32,
    pub cascade_origin: i32,
    pub default_width: i32,
    pub default_height: i32,
    pub visible_margin: i32,
    pub pulse_ms: u64,
    pub double_click_ms: u64,
}

impl Default for WmConfig {
    fn default() -> Self {
        Self {
            min_width: MIN_WIDTH,
            min_height: MIN_HEIGHT,
            minimized_height: MINIMIZED_HEIGHT,
            chrome_offset: FULLSCREEN_CHROME_OFFSET,
            cascade_offset: CASCADE_OFFSET,
            cascade_origin: CASCADE_ORIGIN,
            default_width: DEFAULT_WIDTH,
            default_height: DEFAULT_HEIGHT,
            visible_margin: MIN_VISIBLE_MARGIN,
            pulse_ms: PULSE_DURATION.as_millis() as u64,
            double_click_ms: DOUBLE_CLICK_WINDOW.as_millis() as u64,
        }
    }
}

impl WmConfig {
    pub fn from_json(text: &str) -> Result<Self, WmError> {
        let config: Self = serde_json::from_str(text)?;
        Ok(config.sanitized())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, WmError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Minimum sizes never drop below the crate constants; a config can only
    /// make panels roomier.
    fn sanitized(mut self) -> Self {
        self.min_width = self.min_width.max(MIN_WIDTH);
        self.min_height = self.min_height.max(MIN_HEIGHT);
        self.minimized_height = self.minimized_height.max(1);
        self.chrome_offset = self.chrome_offset.max(0);
        self.visible_margin = self.visible_margin.max(0);
        self.default_width = self.default_width.max(self.min_width);
        self.default_height = self.default_height.max(self.min_height);
        self
    }

    pub fn limits(&self) -> Limits {
        Limits {
            min_width: self.min_width,
            min_height: self.min_height,
            minimized_height: self.minimized_height,
        }
    }

    pub fn default_size(&self) -> Size {
        Size::new(self.default_width, self.default_height)
    }

    pub fn pulse_duration(&self) -> Duration {
        Duration::from_millis(self.pulse_ms)
    }

    pub fn double_click_window(&self) -> Duration {
        Duration::from_millis(self.double_click_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = WmConfig::from_json(r#"{ "cascade_offset": 50 }"#).unwrap();
        assert_eq!(config.cascade_offset, 50);
        assert_eq!(config.min_width, MIN_WIDTH);
        assert_eq!(config.pulse_duration(), PULSE_DURATION);
    }

    #[test]
    fn minimums_cannot_shrink_below_constants() {
        let config = WmConfig::from_json(r#"{ "min_width": 10, "min_height": 20 }"#).unwrap();
        assert_eq!(config.min_width, MIN_WIDTH);
        assert_eq!(config.min_height, MIN_HEIGHT);
    }

    #[test]
    fn malformed_json_is_a_serde_error() {
        let err = WmConfig::from_json("{ nope").unwrap_err();
        assert!(matches!(err, WmError::Serde(_)));
    }
}
