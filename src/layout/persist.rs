//! Optional on-disk layout: one record per open panel.
//!
//! Content is never part of a snapshot; restoring asks the caller for a
//! content handle per record (see `PanelManager::restore_layout`).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::WmError;
use crate::geometry::{Point, Size};
use crate::window::{LifecycleState, PanelId, PanelKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRecord {
    pub id: PanelId,
    pub panel_type: PanelKind,
    pub title: String,
    pub position: Point,
    pub size: Size,
    pub z_index: i64,
    pub lifecycle_state: LifecycleState,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub panels: Vec<LayoutRecord>,
}

impl LayoutSnapshot {
    pub fn to_json(&self) -> Result<String, WmError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, WmError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), WmError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, WmError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}
