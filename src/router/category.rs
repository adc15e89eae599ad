use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse content category derived from a MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Image,
    Pdf,
    Code,
    Audio,
    Video,
    Generic,
}

impl FileCategory {
    pub const ALL: [FileCategory; 6] = [
        FileCategory::Image,
        FileCategory::Pdf,
        FileCategory::Code,
        FileCategory::Audio,
        FileCategory::Video,
        FileCategory::Generic,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            FileCategory::Image => "image",
            FileCategory::Pdf => "pdf",
            FileCategory::Code => "code",
            FileCategory::Audio => "audio",
            FileCategory::Video => "video",
            FileCategory::Generic => "generic",
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text and source MIME types that open as code.
pub const CODE_MIME_TYPES: &[&str] = &[
    "text/plain",
    "text/html",
    "text/css",
    "text/csv",
    "text/markdown",
    "text/xml",
    "text/javascript",
    "text/x-python",
    "text/x-c",
    "text/x-c++src",
    "text/x-java-source",
    "text/x-rust",
    "text/x-shellscript",
    "application/json",
    "application/xml",
    "application/javascript",
    "application/typescript",
    "application/x-sh",
    "application/x-python-code",
];

/// Map a MIME type to its category. Parameters such as `; charset=utf-8` are
/// ignored and matching is case-insensitive.
pub fn category_for_mime(mime: &str) -> FileCategory {
    let essence = mime
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if essence.starts_with("image/") {
        FileCategory::Image
    } else if essence == "application/pdf" {
        FileCategory::Pdf
    } else if CODE_MIME_TYPES.contains(&essence.as_str()) {
        FileCategory::Code
    } else if essence.starts_with("audio/") {
        FileCategory::Audio
    } else if essence.starts_with("video/") {
        FileCategory::Video
    } else {
        FileCategory::Generic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_table() {
        let cases = [
            ("image/png", FileCategory::Image),
            ("image/svg+xml", FileCategory::Image),
            ("application/pdf", FileCategory::Pdf),
            ("text/plain", FileCategory::Code),
            ("application/json", FileCategory::Code),
            ("text/x-rust", FileCategory::Code),
            ("audio/mpeg", FileCategory::Audio),
            ("video/mp4", FileCategory::Video),
            ("application/zip", FileCategory::Generic),
            ("text/rtf", FileCategory::Generic),
            ("", FileCategory::Generic),
        ];
        for (mime, expected) in cases {
            assert_eq!(category_for_mime(mime), expected, "{mime}");
        }
    }

    #[test]
    fn parameters_and_case_are_ignored() {
        assert_eq!(
            category_for_mime("Text/HTML; charset=UTF-8"),
            FileCategory::Code
        );
        assert_eq!(category_for_mime(" APPLICATION/PDF "), FileCategory::Pdf);
    }
}
