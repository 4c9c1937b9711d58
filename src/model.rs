//! Value types produced by an extraction.

use serde::{Deserialize, Serialize};

/// The four tracked-change kinds recorded in a document body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    /// Text inserted while change tracking was on (`w:ins`).
    Insertion,
    /// Text deleted while change tracking was on (`w:del`).
    Deletion,
    /// The source of a tracked move (`w:moveFrom`).
    MoveFrom,
    /// The destination of a tracked move (`w:moveTo`).
    MoveTo,
}

impl ChangeKind {
    /// The document-body element recording this kind of change.
    pub(crate) fn element_tag(self) -> &'static [u8] {
        match self {
            ChangeKind::Insertion => b"w:ins",
            ChangeKind::Deletion => b"w:del",
            ChangeKind::MoveFrom => b"w:moveFrom",
            ChangeKind::MoveTo => b"w:moveTo",
        }
    }
}

/// An author-attributed edit recorded in the markup rather than applied
/// directly.
///
/// Immutable once produced; held only in the result's ordered sequence for
/// its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedChange {
    /// Which of the four change kinds this is.
    pub kind: ChangeKind,

    /// Change author, `"Unknown"` when the element does not record one.
    pub author: String,

    /// ISO-8601 timestamp, or empty when the element does not record one.
    pub date: String,

    /// Concatenated literal text-run content of the change. Never empty:
    /// changes without text are dropped during scanning.
    pub text: String,

    /// Revision id, when the element carries one. Opaque, author-assigned,
    /// and not guaranteed unique in a malformed document.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<String>,
}

/// A comment definition from the comments part, optionally enriched with the
/// document-body text its range markers bracket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment id, matched by string identity to its range markers.
    pub id: String,

    /// Comment author, `"Unknown"` when not recorded.
    pub author: String,

    /// ISO-8601 timestamp, or empty when not recorded.
    pub date: String,

    /// Comment body text. May be empty; comments are kept regardless.
    pub text: String,

    /// Document-body text bracketed by this comment's range markers, set by
    /// anchor resolution when both markers are present in order.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub anchored_text: Option<String>,
}

/// Everything extracted from one document package.
///
/// A value returned once per extraction call and discarded; it has no
/// identity beyond the call that produced it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Tracked insertions, in scan order.
    #[serde(default)]
    pub insertions: Vec<TrackedChange>,

    /// Tracked deletions, in scan order.
    #[serde(default)]
    pub deletions: Vec<TrackedChange>,

    /// Tracked move sources, in scan order.
    #[serde(default)]
    pub move_from: Vec<TrackedChange>,

    /// Tracked move destinations, in scan order.
    #[serde(default)]
    pub move_to: Vec<TrackedChange>,

    /// Comments from the comments part, in definition order.
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl ExtractionResult {
    /// Counts reported alongside the full result.
    pub fn summary(&self) -> Summary {
        Summary {
            insertions: self.insertions.len(),
            deletions: self.deletions.len(),
            moves: self.move_from.len() + self.move_to.len(),
            comments: self.comments.len(),
        }
    }

    /// Check whether the document recorded no tracked changes or comments.
    pub fn is_empty(&self) -> bool {
        self.insertions.is_empty()
            && self.deletions.is_empty()
            && self.move_from.is_empty()
            && self.move_to.is_empty()
            && self.comments.is_empty()
    }

    /// Convert to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Convert to compact JSON.
    pub fn to_json_compact(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Per-kind counts for one extraction; moves combine both directions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub insertions: usize,
    pub deletions: usize,
    pub moves: usize,
    pub comments: usize,
}
