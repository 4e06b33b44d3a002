//! Document parsing.
//!
//! The pipeline only sees [`DocumentParser`]; [`FileParser`] is the default
//! backend for markdown, plain text and (with the `pdf` feature) PDF files.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ParseError;

/// Text and metadata extracted from one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub title: String,
    pub text: String,
    pub page_count: Option<u32>,
}

/// Turns a file into text.
pub trait DocumentParser: Send + Sync {
    fn parse(&self, path: &Path) -> Result<ParsedDocument, ParseError>;
}

/// Parser dispatching on file extension.
#[derive(Debug, Clone)]
pub struct FileParser {
    max_file_size: u64,
}

impl FileParser {
    /// Create a parser rejecting files larger than `max_file_size` bytes.
    pub fn new(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    fn read_text(path: &Path) -> Result<String, ParseError> {
        std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::InvalidData => ParseError::NotUtf8(path.to_path_buf()),
            _ => ParseError::Io(e),
        })
    }

    #[cfg(feature = "pdf")]
    fn read_pdf(path: &Path) -> Result<(String, u32), ParseError> {
        let text = pdf_extract::extract_text(path).map_err(|e| ParseError::Pdf(e.to_string()))?;
        let pages = count_pages(&text);
        Ok((text, pages))
    }

    #[cfg(not(feature = "pdf"))]
    fn read_pdf(_path: &Path) -> Result<(String, u32), ParseError> {
        Err(ParseError::PdfFeatureNotEnabled)
    }
}

impl Default for FileParser {
    fn default() -> Self {
        Self::new(crate::config::DiscoveryConfig::default().max_file_size)
    }
}

impl DocumentParser for FileParser {
    fn parse(&self, path: &Path) -> Result<ParsedDocument, ParseError> {
        let size = std::fs::metadata(path)?.len();
        if size > self.max_file_size {
            return Err(ParseError::TooLarge {
                size,
                max: self.max_file_size,
            });
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let title = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let document = match extension.as_str() {
            "md" | "txt" => ParsedDocument {
                title,
                text: Self::read_text(path)?,
                page_count: None,
            },
            "pdf" => {
                let (text, pages) = Self::read_pdf(path)?;
                ParsedDocument {
                    title,
                    text,
                    page_count: Some(pages),
                }
            }
            _ => return Err(ParseError::Unsupported(path.to_path_buf())),
        };

        debug!(
            "Parsed {} ({} bytes of text)",
            path.display(),
            document.text.len()
        );
        Ok(document)
    }
}

/// Page count of extracted PDF text.
///
/// Pages are separated by form feeds. A single empty segment after the last
/// form feed is the terminator, not a page; blank pages elsewhere still count.
pub fn count_pages(text: &str) -> u32 {
    let segments = text.strip_suffix('\x0C').unwrap_or(text).split('\x0C').count();
    u32::try_from(segments).unwrap_or(u32::MAX)
}
