//! Document inputs and per-page text extraction.
//!
//! The engine never parses PDF structure itself. It asks a
//! [`PageTextSource`] for one string per page, with line breaks preserved,
//! and works on that text.

use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};

/// Page separator used by pre-extracted text dumps (form feed).
pub const PAGE_BREAK: char = '\u{c}';

/// A document submitted for analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// Display name, usually the file name. Carries the reporting month.
    pub name: String,
    /// Raw document bytes.
    pub bytes: Vec<u8>,
}

impl SourceDocument {
    /// Creates a document from a name and its bytes.
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads a document from disk, naming it after its file name.
    pub fn from_path<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let bytes = fs::read(path).map_err(|e| EngineError::UnreadableDocument {
            name: name.clone(),
            message: e.to_string(),
        })?;

        Ok(Self { name, bytes })
    }

    /// The lower-cased file extension, if any.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
    }
}

/// Produces the plain text of each page of a document.
pub trait PageTextSource {
    /// Returns one string per page, in page order.
    fn page_texts(&self, document: &SourceDocument) -> EngineResult<Vec<String>>;
}

/// Extracts page text from PDF files with `pdf-extract`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfPageSource;

impl PageTextSource for PdfPageSource {
    fn page_texts(&self, document: &SourceDocument) -> EngineResult<Vec<String>> {
        // pdf-extract panics on some malformed files instead of returning an error.
        let extracted = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(&document.bytes)
        }));

        match extracted {
            Ok(Ok(pages)) => {
                debug!(document = %document.name, pages = pages.len(), "PDF text extracted");
                Ok(pages)
            }
            Ok(Err(e)) => Err(EngineError::UnreadableDocument {
                name: document.name.clone(),
                message: e.to_string(),
            }),
            Err(_) => Err(EngineError::UnreadableDocument {
                name: document.name.clone(),
                message: "PDF text extraction aborted".to_string(),
            }),
        }
    }
}

/// Reads pre-extracted UTF-8 text, one page per form-feed separated block.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextPageSource;

impl PageTextSource for PlainTextPageSource {
    fn page_texts(&self, document: &SourceDocument) -> EngineResult<Vec<String>> {
        let text =
            std::str::from_utf8(&document.bytes).map_err(|e| EngineError::UnreadableDocument {
                name: document.name.clone(),
                message: e.to_string(),
            })?;

        Ok(text.split(PAGE_BREAK).map(str::to_string).collect())
    }
}

/// Chooses the page source from the document's extension: `.txt` files are
/// read as text, everything else as PDF.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoPageSource;

impl PageTextSource for AutoPageSource {
    fn page_texts(&self, document: &SourceDocument) -> EngineResult<Vec<String>> {
        match document.extension().as_deref() {
            Some("txt") => PlainTextPageSource.page_texts(document),
            _ => PdfPageSource.page_texts(document),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_splits_on_form_feed() {
        let document = SourceDocument::new("ep5_062024.txt", "page one\n\u{c}page two\n");
        let pages = PlainTextPageSource.page_texts(&document).unwrap();
        assert_eq!(pages, vec!["page one\n", "page two\n"]);
    }

    #[test]
    fn test_plain_text_rejects_invalid_utf8() {
        let document = SourceDocument::new("bad.txt", vec![0xff, 0xfe, 0x00]);
        match PlainTextPageSource.page_texts(&document) {
            Err(EngineError::UnreadableDocument { name, .. }) => assert_eq!(name, "bad.txt"),
            other => panic!("Expected UnreadableDocument, got {:?}", other),
        }
    }

    #[test]
    fn test_pdf_source_rejects_garbage() {
        let document = SourceDocument::new("ep5_062024.pdf", b"definitely not a pdf".to_vec());
        assert!(matches!(
            PdfPageSource.page_texts(&document),
            Err(EngineError::UnreadableDocument { .. })
        ));
    }

    #[test]
    fn test_auto_source_dispatches_on_extension() {
        let text = SourceDocument::new("EP5_062024.TXT", "only page");
        assert_eq!(AutoPageSource.page_texts(&text).unwrap(), vec!["only page"]);

        let pdf = SourceDocument::new("ep5_062024.pdf", b"not a pdf".to_vec());
        assert!(AutoPageSource.page_texts(&pdf).is_err());
    }

    #[test]
    fn test_from_path_missing_file() {
        match SourceDocument::from_path("/nonexistent/ep5_062024.pdf") {
            Err(EngineError::UnreadableDocument { name, .. }) => {
                assert_eq!(name, "ep5_062024.pdf")
            }
            other => panic!("Expected UnreadableDocument, got {:?}", other),
        }
    }

    #[test]
    fn test_extension_is_lowercased() {
        let document = SourceDocument::new("EP5.PDF", Vec::new());
        assert_eq!(document.extension().as_deref(), Some("pdf"));
    }
}
