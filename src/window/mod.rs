mod panel_manager;
pub mod pulse;
pub mod session;
pub mod z_order;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WmError;
use crate::geometry::{Geometry, Point, Size};

pub use panel_manager::{ContentHost, MAX_RESTORED_ID, NullHost, OpenedPanel, PanelManager};

/// Process-unique panel identity. Ids are never recycled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanelId(u64);

impl PanelId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    #[default]
    Normal,
    Minimized,
    Fullscreen,
}

/// Panel types with a registered renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PanelKind {
    Notes,
    Music,
    Settings,
    AiText,
    ImageEditor,
    PdfViewer,
    Code,
    Browser,
}

impl PanelKind {
    pub const ALL: [PanelKind; 8] = [
        PanelKind::Notes,
        PanelKind::Music,
        PanelKind::Settings,
        PanelKind::AiText,
        PanelKind::ImageEditor,
        PanelKind::PdfViewer,
        PanelKind::Code,
        PanelKind::Browser,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            PanelKind::Notes => "notes",
            PanelKind::Music => "music",
            PanelKind::Settings => "settings",
            PanelKind::AiText => "ai-text",
            PanelKind::ImageEditor => "image-editor",
            PanelKind::PdfViewer => "pdf-viewer",
            PanelKind::Code => "code",
            PanelKind::Browser => "browser",
        }
    }

    pub const fn default_title(self) -> &'static str {
        match self {
            PanelKind::Notes => "Notes",
            PanelKind::Music => "Music",
            PanelKind::Settings => "Settings",
            PanelKind::AiText => "AI Text",
            PanelKind::ImageEditor => "Image Editor",
            PanelKind::PdfViewer => "PDF Viewer",
            PanelKind::Code => "Code",
            PanelKind::Browser => "Browser",
        }
    }
}

impl fmt::Display for PanelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PanelKind {
    type Err = WmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PanelKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| WmError::UnknownPanelType(s.to_string()))
    }
}

/// A movable, stackable panel hosting externally owned content `C`.
#[derive(Debug, Clone)]
pub struct Panel<C> {
    id: PanelId,
    title: String,
    kind: PanelKind,
    content: C,
    geometry: Geometry,
    z_index: i64,
    state: LifecycleState,
    // fullscreen snapshot; Some iff state == Fullscreen
    saved: Option<Geometry>,
    // pre-minimize height; Some iff state == Minimized
    minimized_from: Option<i32>,
    is_new: bool,
    focus_seq: u64,
}

impl<C> Panel<C> {
    fn new(id: PanelId, kind: PanelKind, title: String, content: C, geometry: Geometry) -> Self {
        Self {
            id,
            title,
            kind,
            content,
            geometry,
            z_index: 0,
            state: LifecycleState::Normal,
            saved: None,
            minimized_from: None,
            is_new: true,
            focus_seq: 0,
        }
    }

    pub fn id(&self) -> PanelId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> PanelKind {
        self.kind
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn position(&self) -> Point {
        self.geometry.position
    }

    pub fn size(&self) -> Size {
        self.geometry.size
    }

    pub fn z_index(&self) -> i64 {
        self.z_index
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn saved_geometry(&self) -> Option<Geometry> {
        self.saved
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn is_minimized(&self) -> bool {
        self.state == LifecycleState::Minimized
    }

    pub fn is_fullscreen(&self) -> bool {
        self.state == LifecycleState::Fullscreen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_kind_parses_registered_names() {
        for kind in PanelKind::ALL {
            assert_eq!(kind.as_str().parse::<PanelKind>().unwrap(), kind);
        }
        let err = "spreadsheet".parse::<PanelKind>().unwrap_err();
        assert!(matches!(err, WmError::UnknownPanelType(name) if name == "spreadsheet"));
    }

    #[test]
    fn panel_kind_serializes_kebab_case() {
        let json = serde_json::to_string(&PanelKind::ImageEditor).unwrap();
        assert_eq!(json, "\"image-editor\"");
    }
}
