use base64::{Engine as _, engine::general_purpose::STANDARD};

use super::FileCategory;

/// A file handed over by the ingestion layer (drag-and-drop, file picker).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl DroppedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

/// How a destination panel wants the file's bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    Text,
    DataUri,
}

pub fn read_mode(category: FileCategory) -> ReadMode {
    match category {
        FileCategory::Image | FileCategory::Pdf | FileCategory::Audio | FileCategory::Video => {
            ReadMode::DataUri
        }
        FileCategory::Code | FileCategory::Generic => ReadMode::Text,
    }
}

/// Initial content for a panel opened from a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelContent {
    Empty,
    Text(String),
    DataUri(String),
}

impl PanelContent {
    pub fn from_file(file: &DroppedFile, category: FileCategory) -> Self {
        match read_mode(category) {
            ReadMode::Text => PanelContent::Text(String::from_utf8_lossy(&file.bytes).into_owned()),
            ReadMode::DataUri => {
                let mime = match file.mime_type.trim() {
                    "" => "application/octet-stream",
                    mime => mime,
                };
                let encoded = STANDARD.encode(&file.bytes);
                PanelContent::DataUri(format!("data:{mime};base64,{encoded}"))
            }
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PanelContent::Empty => "",
            PanelContent::Text(text) | PanelContent::DataUri(text) => text,
        }
    }
}
