use crate::domain::application::DocumentUpload;
use crate::error::Result;
use std::path::Path;

/// MIME type for a proof document, inferred from its extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

/// Reads a file from disk into an upload.
pub async fn load_document(path: &Path) -> Result<DocumentUpload> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(DocumentUpload {
        file_name,
        mime_type: mime_for_path(path).to_string(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("a.pdf")), "application/pdf");
        assert_eq!(mime_for_path(Path::new("a.PNG")), "image/png");
        assert_eq!(mime_for_path(Path::new("scan.JPG")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("scan.jpeg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("bundle.zip")), "application/octet-stream");
        assert_eq!(mime_for_path(Path::new("noext")), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_load_document() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"%PDF-1.4 test").unwrap();

        let upload = load_document(file.path()).await.unwrap();
        assert_eq!(upload.mime_type, "application/pdf");
        assert_eq!(upload.bytes.len(), 13);
        assert!(upload.file_name.ends_with(".pdf"));
    }
}
