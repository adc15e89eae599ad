//! File-to-panel routing.
//!
//! A dropped file is categorized from its MIME type, the external classifier
//! is asked for a panel type, and the deterministic fallback table takes over
//! whenever the classifier is missing, fails, or answers with nothing useful.

mod category;
pub mod classifier;
mod content;
mod dispatch;

use std::sync::Arc;

pub use category::{CODE_MIME_TYPES, FileCategory, category_for_mime};
pub use classifier::{ClassifierError, ClassifierReply, FileClassifier, NoClassifier};
pub use content::{DroppedFile, PanelContent, ReadMode, read_mode};
pub use dispatch::DropDispatcher;

use crate::error::WmError;
use crate::window::PanelKind;

/// Panel type used when the classifier cannot be trusted.
pub const fn fallback_panel_type(category: FileCategory) -> &'static str {
    match category {
        FileCategory::Image => "image-editor",
        FileCategory::Pdf => "pdf-viewer",
        FileCategory::Code => "code",
        FileCategory::Audio => "music",
        FileCategory::Video => "browser",
        FileCategory::Generic => "notes",
    }
}

/// Everything needed to open one panel for a dropped file.
#[derive(Debug)]
pub struct PanelRequest {
    pub kind: PanelKind,
    pub title: String,
    pub content: PanelContent,
    /// Set when the routed type had no renderer and `notes` was used instead.
    pub notice: Option<WmError>,
}

#[derive(Clone)]
pub struct FileRouter {
    classifier: Arc<dyn FileClassifier>,
}

impl FileRouter {
    pub fn new(classifier: Arc<dyn FileClassifier>) -> Self {
        Self { classifier }
    }

    pub fn without_classifier() -> Self {
        Self::new(Arc::new(NoClassifier))
    }

    /// Pick a panel type name for a file.
    ///
    /// The classifier's answer is trimmed and lower-cased but otherwise used
    /// verbatim; it is not checked against the registered panel types.
    pub async fn classify(&self, file_name: &str, category: FileCategory) -> String {
        let fallback = fallback_panel_type(category);
        let reply = match self
            .classifier
            .classify_file(file_name, category.as_str())
            .await
        {
            Ok(reply) => reply,
            Err(err) => {
                let failure = WmError::ClassificationFailure(err.to_string());
                tracing::warn!(
                    file = file_name,
                    %category,
                    %failure,
                    fallback,
                    "using fallback panel type"
                );
                return fallback.to_string();
            }
        };
        let text = reply.text.trim().to_lowercase();
        if text.is_empty() || text.contains("error") {
            tracing::warn!(
                file = file_name,
                %category,
                reply = %reply.text,
                fallback,
                "classifier reply unusable, using fallback panel type"
            );
            return fallback.to_string();
        }
        tracing::debug!(file = file_name, %category, panel_type = %text, "classified file");
        text
    }

    /// Route a dropped file to a ready-to-open panel request. An unknown
    /// panel type opens as notes and carries a notice for the user.
    pub async fn route(&self, file: &DroppedFile) -> PanelRequest {
        let category = category_for_mime(&file.mime_type);
        let type_name = self.classify(&file.name, category).await;
        let (kind, notice) = match type_name.parse::<PanelKind>() {
            Ok(kind) => (kind, None),
            Err(err) => (PanelKind::Notes, Some(err)),
        };
        PanelRequest {
            kind,
            title: file.name.clone(),
            content: PanelContent::from_file(file, category),
            notice,
        }
    }
}

impl std::fmt::Debug for FileRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileRouter").finish_non_exhaustive()
    }
}
