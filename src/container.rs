//! ZIP container access for the two document parts an extraction reads.

use crate::error::{Error, Result};
use std::cell::RefCell;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

/// Archive path of the main document body. Required.
pub const DOCUMENT_PART: &str = "word/document.xml";

/// Archive path of the comments part. Optional.
pub const COMMENTS_PART: &str = "word/comments.xml";

/// Read-only view over a `.docx` ZIP archive.
///
/// Only the two parts named above are ever read; everything else in the
/// package is left untouched.
pub struct DocxContainer {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
}

impl DocxContainer {
    /// Open a document package from a file path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Open a document package from in-memory bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let cursor = Cursor::new(data);
        let archive = zip::ZipArchive::new(cursor)?;
        Ok(Self {
            archive: RefCell::new(archive),
        })
    }

    /// Read the main document body.
    ///
    /// Fails with [`Error::MalformedPackage`] when the part is absent; a
    /// package without it is not a usable document.
    pub fn document_xml(&self) -> Result<String> {
        self.read_part(DOCUMENT_PART)?
            .ok_or_else(|| Error::MalformedPackage(DOCUMENT_PART.to_string()))
    }

    /// Read the comments part, or `None` when the document has no comments.
    pub fn comments_xml(&self) -> Result<Option<String>> {
        self.read_part(COMMENTS_PART)
    }

    fn read_part(&self, path: &str) -> Result<Option<String>> {
        let mut archive = self.archive.borrow_mut();
        let mut file = match archive.by_name(path) {
            Ok(file) => file,
            Err(zip::result::ZipError::FileNotFound) => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        Ok(Some(decode_xml_bytes(&bytes)?))
    }
}

impl std::fmt::Debug for DocxContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let archive = self.archive.borrow();
        f.debug_struct("DocxContainer")
            .field("entries", &archive.len())
            .finish()
    }
}

/// Decode XML part bytes handling UTF-8 (with or without BOM) and UTF-16
/// LE/BE content.
///
/// OOXML parts are normally UTF-8, but documents produced by older tooling
/// occasionally carry UTF-16 parts.
pub(crate) fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    if bytes.len() >= 3 && bytes[0] == 0xEF && bytes[1] == 0xBB && bytes[2] == 0xBF {
        // UTF-8 BOM: EF BB BF
        return String::from_utf8(bytes[3..].to_vec())
            .map_err(|err| Error::ExtractionFailed(err.to_string()));
    }

    if bytes.len() >= 2 && bytes[0] == 0xFF && bytes[1] == 0xFE {
        // UTF-16 LE BOM: FF FE
        return decode_utf16(&bytes[2..], u16::from_le_bytes);
    }

    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        // UTF-16 BE BOM: FE FF
        return decode_utf16(&bytes[2..], u16::from_be_bytes);
    }

    match String::from_utf8(bytes.to_vec()) {
        Ok(s) => Ok(s),
        Err(_) => Ok(String::from_utf8_lossy(bytes).into_owned()),
    }
}

fn decode_utf16(bytes: &[u8], combine: fn([u8; 2]) -> u16) -> Result<String> {
    // Ignore a trailing odd byte
    let len = bytes.len() & !1;
    let units = (0..len)
        .step_by(2)
        .map(|i| combine([bytes[i], bytes[i + 1]]));

    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|err| Error::ExtractionFailed(err.to_string()))
}
