use std::path::{Path, PathBuf};

use serde::Serialize;

use super::convert::ConvertError;

/// One request to convert a single PDF into an audio + transcript pair.
///
/// The source is read-only input; everything the job produces goes under
/// `output_root`. Jobs are consumed entirely within one background worker
/// and never persisted.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    pub source: PathBuf,
    pub output_root: PathBuf,
}

impl ConversionJob {
    pub fn new(source: PathBuf, output_root: PathBuf) -> Result<Self, ConvertError> {
        if !source.exists() {
            return Err(ConvertError::MissingSource(source));
        }
        if !has_pdf_extension(&source) {
            return Err(ConvertError::NotPdf(source));
        }
        Ok(Self {
            source,
            output_root,
        })
    }

    /// File name without the `.pdf` extension.
    pub fn base_name(&self) -> String {
        self.source
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled".to_string())
    }
}

pub(crate) fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// The artifacts of one successful conversion. Ownership of the files
/// transfers to the filesystem once the bundle is returned.
#[derive(Debug)]
pub struct OutputBundle {
    pub dir: PathBuf,
    pub audio: PathBuf,
    pub transcript: PathBuf,
    pub text: String,
}

/// Per-job completion message sent back to the control thread.
#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConversionOutcome {
    Completed { source: PathBuf, dir: PathBuf },
    Failed { source: PathBuf, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn rejects_missing_source() {
        let result = ConversionJob::new("/no/such/book.pdf".into(), "/tmp".into());
        assert!(matches!(result, Err(ConvertError::MissingSource(_))));
    }

    #[test]
    fn rejects_non_pdf_source() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("notes.txt");
        file.touch().unwrap();
        let result = ConversionJob::new(file.path().to_path_buf(), temp.path().to_path_buf());
        assert!(matches!(result, Err(ConvertError::NotPdf(_))));
    }

    #[test]
    fn accepts_uppercase_extension() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("BOOK.PDF");
        file.touch().unwrap();
        let job = ConversionJob::new(file.path().to_path_buf(), temp.path().to_path_buf()).unwrap();
        assert_eq!(job.base_name(), "BOOK");
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let outcome = ConversionOutcome::Failed {
            source: "a.pdf".into(),
            message: "boom".into(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["message"], "boom");
    }
}
