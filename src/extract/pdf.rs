use std::path::{Path, PathBuf};

use log::warn;
use mupdf::Document;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to open {0}: {1}")]
    Open(PathBuf, String),
    #[error("failed to read page count of {0}: {1}")]
    PageCount(PathBuf, String),
}

/// Low-level text extraction seam.
///
/// Returns one string per page, in page order. A page that yields no text
/// contributes an empty string; only a document-level failure is an error.
pub trait TextExtractor {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, ExtractError>;
}

/// In-process extractor backed by MuPDF.
pub struct MupdfExtractor;

impl TextExtractor for MupdfExtractor {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, ExtractError> {
        let path_str = path.to_string_lossy();
        let doc = Document::open(&*path_str)
            .map_err(|err| ExtractError::Open(path.to_path_buf(), err.to_string()))?;
        let page_count = doc
            .page_count()
            .map_err(|err| ExtractError::PageCount(path.to_path_buf(), err.to_string()))?;

        let mut pages = Vec::with_capacity(page_count as usize);
        for index in 0..page_count {
            let text = match doc.load_page(index).and_then(|page| page.to_text()) {
                Ok(text) => text,
                Err(err) => {
                    // An unreadable page is tolerated as empty text.
                    warn!(
                        "page {index} of {} could not be extracted: {err}",
                        path.display()
                    );
                    String::new()
                }
            };
            pages.push(text);
        }
        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Minimal one-page PDF with a single text object. MuPDF repairs the
    /// imprecise xref table on load.
    fn minimal_pdf(text: &str) -> Vec<u8> {
        let content = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
        let mut pdf = String::new();
        pdf.push_str("%PDF-1.4\n");
        pdf.push_str("1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");
        pdf.push_str("2 0 obj\n<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n");
        pdf.push_str(
            "3 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R \
             /Resources << /Font << /F1 << /Type /Font /Subtype /Type1 /BaseFont /Helvetica >> \
             >> >> >>\nendobj\n",
        );
        pdf.push_str(&format!(
            "4 0 obj\n<< /Length {} >>\nstream\n{}\nendstream\nendobj\n",
            content.len(),
            content
        ));
        // Placeholder xref offsets; MuPDF rebuilds the table on load.
        pdf.push_str("xref\n0 5\n0000000000 65535 f\n");
        for i in 1..5 {
            pdf.push_str(&format!("{:010} 00000 n\n", 9 + i * 100));
        }
        pdf.push_str("trailer\n<< /Size 5 /Root 1 0 R >>\nstartxref\n");
        pdf.push_str(&format!("{}\n%%EOF", pdf.len()));
        pdf.into_bytes()
    }

    #[test]
    fn extracts_text_from_single_page() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("demo.pdf");
        fs::write(&path, minimal_pdf("Hello")).unwrap();

        let pages = MupdfExtractor.extract_pages(&path).unwrap();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].contains("Hello"));
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let result = MupdfExtractor.extract_pages(Path::new("/no/such/file.pdf"));
        assert!(matches!(result, Err(ExtractError::Open(_, _))));
    }

    #[test]
    fn garbage_file_is_an_open_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.pdf");
        fs::write(&path, b"this is not a pdf at all").unwrap();

        let result = MupdfExtractor.extract_pages(&path);
        assert!(result.is_err());
    }
}
