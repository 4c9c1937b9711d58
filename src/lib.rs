//! # redline
//!
//! Tracked-change and comment extraction from Word documents.
//!
//! This library opens the OOXML markup inside a `.docx` package and returns
//! the insertions, deletions, moved text, and comments (including the
//! document text each comment's range markers bracket) recorded by the
//! editor's revision tracking.
//!
//! ## Quick Start
//!
//! ```no_run
//! let result = redline::extract_file("contract.docx")?;
//!
//! for change in &result.insertions {
//!     println!("{} inserted {:?}", change.author, change.text);
//! }
//! for comment in &result.comments {
//!     println!("{}: {}", comment.author, comment.text);
//! }
//! # Ok::<(), redline::Error>(())
//! ```
//!
//! Extraction is a pure function of the input buffer: no shared state, no
//! retries, and calling it twice on the same bytes yields structurally
//! identical results. For in-memory data use [`extract_bytes`]; for finer
//! control over the package, [`RedlineParser`] exposes the same pipeline
//! stepwise.

pub mod anchors;
pub mod changes;
pub mod comments;
pub mod container;
pub mod error;
mod fragment;
pub mod model;
pub mod runs;

pub use container::DocxContainer;
pub use error::{Error, Result};
pub use model::{ChangeKind, Comment, ExtractionResult, Summary, TrackedChange};

use std::path::Path;

/// Parser over one document package.
///
/// ```no_run
/// use redline::RedlineParser;
///
/// let result = RedlineParser::open("report.docx")?.parse()?;
/// println!("{} comments", result.comments.len());
/// # Ok::<(), redline::Error>(())
/// ```
pub struct RedlineParser {
    container: DocxContainer,
}

impl RedlineParser {
    /// Open a document package for extraction.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            container: DocxContainer::open(path)?,
        })
    }

    /// Create a parser from in-memory package bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Ok(Self {
            container: DocxContainer::from_bytes(data)?,
        })
    }

    /// Run the full extraction pipeline and return the result.
    ///
    /// Fails with [`Error::MalformedPackage`] when the package has no main
    /// document part; every other fault surfaces as
    /// [`Error::ExtractionFailed`] with the underlying cause.
    pub fn parse(&self) -> Result<ExtractionResult> {
        let document_xml = self.container.document_xml()?;
        let comments_xml = self.container.comments_xml()?;

        let insertions = changes::scan_changes(&document_xml, ChangeKind::Insertion)?;
        let deletions = changes::scan_changes(&document_xml, ChangeKind::Deletion)?;
        let move_from = changes::scan_changes(&document_xml, ChangeKind::MoveFrom)?;
        let move_to = changes::scan_changes(&document_xml, ChangeKind::MoveTo)?;

        let comments = match comments_xml {
            Some(ref xml) => {
                let comments = comments::scan_comments(xml)?;
                anchors::resolve_anchors(&document_xml, comments)?
            }
            // No comments part, no comments processing.
            None => Vec::new(),
        };

        Ok(ExtractionResult {
            insertions,
            deletions,
            move_from,
            move_to,
            comments,
        })
    }

    /// Get a reference to the underlying container.
    pub fn container(&self) -> &DocxContainer {
        &self.container
    }
}

/// Extract tracked changes and comments from in-memory package bytes.
///
/// ```no_run
/// let data = std::fs::read("document.docx")?;
/// let result = redline::extract_bytes(&data)?;
/// println!("{:?}", result.summary());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn extract_bytes(data: &[u8]) -> Result<ExtractionResult> {
    RedlineParser::from_bytes(data.to_vec())?.parse()
}

/// Extract tracked changes and comments from a document file.
pub fn extract_file(path: impl AsRef<Path>) -> Result<ExtractionResult> {
    RedlineParser::open(path)?.parse()
}
