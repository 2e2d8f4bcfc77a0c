//! PDF text extraction.
//!
//! The pipeline only depends on the [`TextExtractor`] trait, so tests can
//! substitute a scripted extractor. The default implementation,
//! [`MupdfExtractor`], reads the document in-process through MuPDF.

pub mod pdf;

pub use pdf::{ExtractError, MupdfExtractor, TextExtractor};
