use serde::{Deserialize, Serialize};
use std::fmt;

/// The document media types the service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MimeKind {
    Pdf,
    Docx,
    Xlsx,
    Png,
    Jpeg,
    Text,
}

impl MimeKind {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "application/pdf" => Some(MimeKind::Pdf),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(MimeKind::Docx)
            }
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => {
                Some(MimeKind::Xlsx)
            }
            "image/png" => Some(MimeKind::Png),
            "image/jpeg" => Some(MimeKind::Jpeg),
            "text/plain" => Some(MimeKind::Text),
            _ => None,
        }
    }

    pub fn as_mime(&self) -> &'static str {
        match self {
            MimeKind::Pdf => "application/pdf",
            MimeKind::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            MimeKind::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            MimeKind::Png => "image/png",
            MimeKind::Jpeg => "image/jpeg",
            MimeKind::Text => "text/plain",
        }
    }
}

impl fmt::Display for MimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_mime())
    }
}
