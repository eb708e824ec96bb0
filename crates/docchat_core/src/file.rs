//! FileCandidate - A file offered for upload

use std::path::Path;

use bytes::Bytes;

pub const PDF_MEDIA_TYPE: &str = "application/pdf";
const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// A file selected or dropped by the user, together with its declared
/// media type. Nothing here checks that the content really is a PDF.
#[derive(Clone, Debug)]
pub struct FileCandidate {
    pub name: String,
    pub media_type: String,
    pub bytes: Bytes,
}

impl FileCandidate {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, declaring its media type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let media_type = media_type_for(path);
        Ok(Self::new(name, media_type, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Whether the declared media type indicates PDF content.
    pub fn is_pdf(&self) -> bool {
        self.media_type.to_ascii_lowercase().contains("pdf")
    }
}

fn media_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => PDF_MEDIA_TYPE,
        _ => FALLBACK_MEDIA_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_detection_is_case_insensitive() {
        assert!(FileCandidate::new("a.pdf", "application/PDF", Vec::new()).is_pdf());
        assert!(FileCandidate::new("a", "application/x-pdf", Vec::new()).is_pdf());
        assert!(!FileCandidate::new("a.png", "image/png", Vec::new()).is_pdf());
    }

    #[tokio::test]
    async fn test_from_path_infers_media_type() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("report.PDF");
        std::fs::write(&pdf, b"%PDF-1.7").unwrap();
        let txt = dir.path().join("notes.txt");
        std::fs::write(&txt, b"hello").unwrap();

        let candidate = FileCandidate::from_path(&pdf).await.unwrap();
        assert_eq!(candidate.name, "report.PDF");
        assert_eq!(candidate.media_type, PDF_MEDIA_TYPE);
        assert_eq!(candidate.size(), 8);

        let candidate = FileCandidate::from_path(&txt).await.unwrap();
        assert!(!candidate.is_pdf());
    }
}
