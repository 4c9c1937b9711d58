//! Comment-anchor resolution over the document body.
//!
//! Comment range markers are zero-width elements delimiting the span of
//! text a comment refers to. Resolution records each marker's document-order
//! position in a single pass, then extracts the text runs falling strictly
//! between a comment's start and end markers.

use crate::error::{Error, Result};
use crate::model::Comment;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;

/// Enrich comments with the document-body text their range markers bracket.
///
/// Comments whose id has no start marker, no end marker, or markers out of
/// order keep `anchored_text` unset. Positions are document-order event
/// indices, so markup unrelated to the anchored span cannot shift them.
pub fn resolve_anchors(document_xml: &str, comments: Vec<Comment>) -> Result<Vec<Comment>> {
    let map = AnchorMap::build(document_xml)?;

    Ok(comments
        .into_iter()
        .map(|comment| {
            let anchored_text = map.anchored_text(&comment.id);
            Comment {
                anchored_text,
                ..comment
            }
        })
        .collect())
}

/// Marker positions and text runs gathered in one pass over the body.
struct AnchorMap {
    /// Range-start position per id; first occurrence wins.
    starts: HashMap<String, usize>,
    /// Range-end position per id; overwritten on repeat.
    ends: HashMap<String, usize>,
    /// Every text run with the position of its `w:t` element.
    runs: Vec<(usize, String)>,
}

impl AnchorMap {
    fn build(document_xml: &str) -> Result<Self> {
        let mut reader = quick_xml::Reader::from_str(document_xml);
        reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        let mut starts: HashMap<String, usize> = HashMap::new();
        let mut ends: HashMap<String, usize> = HashMap::new();
        let mut runs: Vec<(usize, String)> = Vec::new();
        let mut pos = 0usize;
        let mut open_run: Option<usize> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    match e.name().as_ref() {
                        b"w:commentRangeStart" => {
                            if let Some(id) = marker_id(e) {
                                starts.entry(id).or_insert(pos);
                            }
                        }
                        b"w:commentRangeEnd" => {
                            if let Some(id) = marker_id(e) {
                                ends.insert(id, pos);
                            }
                        }
                        b"w:t" => open_run = Some(pos),
                        _ => {}
                    }
                }
                Ok(Event::Text(ref e)) => {
                    if let Some(run_pos) = open_run {
                        let text = e.unescape().unwrap_or_default();
                        // A run's text may arrive as several events; keep
                        // them under the run's single position.
                        match runs.last_mut() {
                            Some((last_pos, existing)) if *last_pos == run_pos => {
                                existing.push_str(&text);
                            }
                            _ => runs.push((run_pos, text.into_owned())),
                        }
                    }
                }
                Ok(Event::End(ref e)) => {
                    if e.name().as_ref() == b"w:t" {
                        open_run = None;
                    }
                }
                Ok(Event::Eof) => break,
                Err(err) => return Err(Error::ExtractionFailed(err.to_string())),
                _ => {}
            }
            pos += 1;
            buf.clear();
        }

        Ok(Self { starts, ends, runs })
    }

    fn anchored_text(&self, id: &str) -> Option<String> {
        let start = *self.starts.get(id)?;
        let end = *self.ends.get(id)?;
        if end <= start {
            return None;
        }

        Some(
            self.runs
                .iter()
                .filter(|(run_pos, _)| *run_pos > start && *run_pos < end)
                .map(|(_, text)| text.as_str())
                .collect(),
        )
    }
}

fn marker_id(e: &BytesStart) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == b"w:id")
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}
