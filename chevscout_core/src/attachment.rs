use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use std::path::Path;
use tokio::fs;

use crate::error::AdvisorError;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// The only file types the form accepts. Everything else is rejected before
/// any read or network call.
const ALLOWED: &[(&str, &str)] = &[("pdf", PDF_MIME), ("docx", DOCX_MIME)];

/// Maps a CV path to its MIME type via the extension allow-list.
pub fn mime_for_path(path: &str) -> Option<&'static str> {
    let ext = Path::new(path.trim()).extension()?.to_str()?.to_lowercase();
    ALLOWED
        .iter()
        .find(|(allowed, _)| *allowed == ext)
        .map(|(_, mime)| *mime)
}

/// A CV file in transport form: base64 payload plus its MIME type.
/// Derived once per submission and owned by the in-flight request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CvAttachment {
    pub data: String,
    pub mime_type: &'static str,
}

impl CvAttachment {
    /// Reads the file fully into memory and encodes it. The caller has
    /// already validated the extension; a vanished or unreadable file still
    /// fails here and surfaces as a submission error.
    pub async fn load(path: &str) -> Result<Self, AdvisorError> {
        let mime_type = mime_for_path(path)
            .ok_or_else(|| AdvisorError::Validation("Invalid file type".to_string()))?;

        let bytes = fs::read(path.trim())
            .await
            .map_err(|e| AdvisorError::Validation(format!("Could not read CV file: {}", e)))?;

        Ok(Self::from_bytes(&bytes, mime_type))
    }

    pub fn from_bytes(bytes: &[u8], mime_type: &'static str) -> Self {
        Self {
            data: BASE64_STANDARD.encode(bytes),
            mime_type,
        }
    }

    /// Accepts pre-encoded input that may carry a `data:<mime>;base64,`
    /// prefix and keeps only the payload.
    pub fn from_encoded(encoded: &str, mime_type: &'static str) -> Self {
        let data = match encoded.split_once(";base64,") {
            Some((prefix, payload)) if prefix.starts_with("data:") => payload,
            _ => encoded,
        };
        Self {
            data: data.to_string(),
            mime_type,
        }
    }

    pub fn decode(&self) -> Result<Vec<u8>, AdvisorError> {
        BASE64_STANDARD
            .decode(&self.data)
            .map_err(|e| AdvisorError::Validation(format!("Corrupt attachment payload: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_accepts_pdf_and_docx_only() {
        assert_eq!(mime_for_path("cv.pdf"), Some(PDF_MIME));
        assert_eq!(mime_for_path("/home/me/My CV.DOCX"), Some(DOCX_MIME));
        assert_eq!(mime_for_path("  cv.pdf  "), Some(PDF_MIME));
        assert_eq!(mime_for_path("cv.doc"), None);
        assert_eq!(mime_for_path("cv.txt"), None);
        assert_eq!(mime_for_path("cv"), None);
        assert_eq!(mime_for_path(""), None);
    }

    #[test]
    fn encode_decode_round_trips_original_bytes() {
        let bytes: Vec<u8> = (0u8..=255).collect();
        let attachment = CvAttachment::from_bytes(&bytes, PDF_MIME);
        assert_eq!(attachment.decode().unwrap(), bytes);
        assert_eq!(attachment.mime_type, PDF_MIME);
    }

    #[test]
    fn data_url_prefix_is_stripped() {
        let attachment = CvAttachment::from_bytes(b"%PDF-1.7", PDF_MIME);
        let with_prefix = format!("data:application/pdf;base64,{}", attachment.data);
        let reparsed = CvAttachment::from_encoded(&with_prefix, PDF_MIME);
        assert_eq!(reparsed.data, attachment.data);
        assert_eq!(reparsed.decode().unwrap(), b"%PDF-1.7");
    }

    #[test]
    fn bare_payload_passes_through_unchanged() {
        let reparsed = CvAttachment::from_encoded("aGVsbG8=", DOCX_MIME);
        assert_eq!(reparsed.decode().unwrap(), b"hello");
    }

    #[tokio::test]
    async fn load_reads_and_encodes_a_real_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.pdf");
        std::fs::write(&path, b"%PDF-1.4 fake body").unwrap();

        let attachment = CvAttachment::load(path.to_str().unwrap()).await.unwrap();
        assert_eq!(attachment.mime_type, PDF_MIME);
        assert_eq!(attachment.decode().unwrap(), b"%PDF-1.4 fake body");
    }

    #[tokio::test]
    async fn load_rejects_disallowed_extension_before_reading() {
        let err = CvAttachment::load("/nowhere/cv.txt").await.unwrap_err();
        assert!(matches!(err, AdvisorError::Validation(_)));
        assert_eq!(err.to_string(), "Invalid file type");
    }

    #[tokio::test]
    async fn load_surfaces_read_failures() {
        let err = CvAttachment::load("/nowhere/missing.pdf").await.unwrap_err();
        assert!(err.to_string().contains("Could not read CV file"));
    }
}
