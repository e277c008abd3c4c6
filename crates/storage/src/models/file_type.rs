use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Upload format families accepted by the file hub and the submission portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Text,
    Audio,
    Image,
    Video,
    Pdf,
    Docx,
}

impl FileType {
    pub const ALL: [FileType; 6] = [
        Self::Text,
        Self::Audio,
        Self::Image,
        Self::Video,
        Self::Pdf,
        Self::Docx,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Audio => "audio",
            Self::Image => "image",
            Self::Video => "video",
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }

    /// Extensions (lowercase, with leading dot) accepted for this format.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Text => &[".txt", ".md", ".js", ".json", ".html", ".css", ".ts", ".tsx"],
            Self::Audio => &[".mp3", ".wav", ".ogg", ".m4a"],
            Self::Image => &[".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg"],
            Self::Video => &[".mp4", ".webm", ".mov", ".avi"],
            Self::Pdf => &[".pdf"],
            Self::Docx => &[".doc", ".docx"],
        }
    }

    pub fn supports_extension(&self, extension: &str) -> bool {
        let extension = normalize_extension(extension);
        self.extensions().contains(&extension.as_str())
    }

    /// Infers the format family from a file extension such as `.PDF` or `md`.
    pub fn from_extension(extension: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|file_type| file_type.supports_extension(extension))
    }

    /// Infers the format family from a file name.
    pub fn from_filename(filename: &str) -> Option<Self> {
        extension_of(filename).and_then(Self::from_extension)
    }

    pub fn bucket_name(&self) -> String {
        format!("{}-bucket", self.as_str())
    }

    /// Fallback MIME type when the uploader did not send one.
    pub fn default_mime_type(&self) -> &'static str {
        match self {
            Self::Text => "text/plain",
            Self::Audio => "audio/mpeg",
            Self::Image => "image/png",
            Self::Video => "video/mp4",
            Self::Pdf => "application/pdf",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text)
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|file_type| file_type.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Invalid file type '{}'. Expected one of: text, audio, image, video, pdf, docx",
                    s
                )
            })
    }
}

/// Returns the final extension of `filename` including the leading dot.
pub fn extension_of(filename: &str) -> Option<&str> {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    name.rfind('.')
        .filter(|&idx| idx + 1 < name.len())
        .map(|idx| &name[idx..])
}

fn normalize_extension(extension: &str) -> String {
    let lower = extension.trim().to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{}", lower)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supports_extension_case_insensitive() {
        assert!(FileType::Pdf.supports_extension(".PDF"));
        assert!(FileType::Text.supports_extension("md"));
        assert!(!FileType::Image.supports_extension(".pdf"));
    }

    #[test]
    fn test_from_filename() {
        assert_eq!(FileType::from_filename("slides.docx"), Some(FileType::Docx));
        assert_eq!(
            FileType::from_filename("team_alpha_hack.tar.mp4"),
            Some(FileType::Video)
        );
        assert_eq!(FileType::from_filename("README"), None);
        assert_eq!(FileType::from_filename("archive.zip"), None);
        assert_eq!(FileType::from_filename("trailing."), None);
    }

    #[test]
    fn test_extension_of_ignores_directories() {
        assert_eq!(extension_of("dir.v2/notes"), None);
        assert_eq!(extension_of("dir.v2/notes.txt"), Some(".txt"));
    }

    #[test]
    fn test_bucket_name() {
        assert_eq!(FileType::Audio.bucket_name(), "audio-bucket");
    }

    #[test]
    fn test_parse_round_trip_names() {
        for file_type in FileType::ALL {
            assert_eq!(file_type.as_str().parse::<FileType>(), Ok(file_type));
        }
        assert!("spreadsheet".parse::<FileType>().is_err());
    }
}
