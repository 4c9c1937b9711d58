//! End-to-end extraction tests over synthetic document packages.
//!
//! Each test assembles a minimal `.docx` archive in memory and runs the full
//! pipeline on it, asserting over the returned `ExtractionResult`.

use redline::{extract_bytes, extract_file, ChangeKind, Error};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

fn package(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut buffer = Vec::new();
    let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    for (name, content) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(content).unwrap();
    }

    zip.finish().unwrap();
    buffer
}

fn document_part(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>{}</w:body>
</w:document>"#,
        body
    )
}

fn comments_part(definitions: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:comments xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">{}</w:comments>"#,
        definitions
    )
}

fn docx(body: &str, comments: Option<&str>) -> Vec<u8> {
    let content_types = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;
    let rels = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

    let document = document_part(body);
    let mut entries: Vec<(&str, &[u8])> = vec![
        ("[Content_Types].xml", content_types.as_slice()),
        ("_rels/.rels", rels.as_slice()),
        ("word/document.xml", document.as_bytes()),
    ];

    let comments_xml = comments.map(comments_part);
    if let Some(ref xml) = comments_xml {
        entries.push(("word/comments.xml", xml.as_bytes()));
    }

    package(&entries)
}

#[test]
fn test_no_comments_part_yields_empty_comments() {
    let data = docx("<w:p><w:r><w:t>plain text</w:t></w:r></w:p>", None);
    let result = extract_bytes(&data).unwrap();

    assert!(result.comments.is_empty());
    assert!(result.is_empty());
}

#[test]
fn test_missing_document_part_is_malformed() {
    let data = package(&[("word/styles.xml", b"<w:styles/>")]);
    let err = extract_bytes(&data).unwrap_err();
    assert!(matches!(err, Error::MalformedPackage(ref part) if part == "word/document.xml"));
}

#[test]
fn test_garbage_bytes_fail_extraction() {
    let err = extract_bytes(b"not a zip archive").unwrap_err();
    assert!(matches!(err, Error::ExtractionFailed(_)));
}

#[test]
fn test_extraction_is_idempotent() {
    let data = docx(
        r#"<w:p><w:ins w:id="1" w:author="A" w:date="2024-01-01T00:00:00Z"><w:r><w:t>added</w:t></w:r></w:ins></w:p>"#,
        Some(r#"<w:comment w:id="0" w:author="B"><w:p><w:r><w:t>note</w:t></w:r></w:p></w:comment>"#),
    );

    let first = extract_bytes(&data).unwrap();
    let second = extract_bytes(&data).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_single_insertion_entry() {
    let data = docx(
        r#"<w:p><w:ins w:author="A" w:date="2024-01-01T00:00:00Z"><w:r><w:t>hello</w:t></w:r></w:ins></w:p>"#,
        None,
    );
    let result = extract_bytes(&data).unwrap();

    assert_eq!(result.insertions.len(), 1);
    let change = &result.insertions[0];
    assert_eq!(change.kind, ChangeKind::Insertion);
    assert_eq!(change.author, "A");
    assert_eq!(change.date, "2024-01-01T00:00:00Z");
    assert_eq!(change.text, "hello");
}

#[test]
fn test_textless_change_dropped_empty_comment_kept() {
    let data = docx(
        r#"<w:p><w:ins w:author="A"><w:r><w:rPr><w:b/></w:rPr></w:r></w:ins><w:del w:author="A"/></w:p>"#,
        Some(r#"<w:comment w:id="1" w:author="B"><w:p/></w:comment>"#),
    );
    let result = extract_bytes(&data).unwrap();

    assert!(result.insertions.is_empty());
    assert!(result.deletions.is_empty());
    assert_eq!(result.comments.len(), 1);
    assert_eq!(result.comments[0].text, "");
}

#[test]
fn test_deletion_text_not_counted_as_insertion() {
    let data = docx(
        r#"<w:p><w:del w:author="A"><w:r><w:delText>removed</w:delText></w:r></w:del></w:p>"#,
        None,
    );
    let result = extract_bytes(&data).unwrap();

    assert_eq!(result.deletions.len(), 1);
    assert_eq!(result.deletions[0].text, "removed");
    assert!(result.insertions.is_empty());
}

#[test]
fn test_anchored_text_resolved() {
    let data = docx(
        r#"<w:p><w:commentRangeStart w:id="1"/><w:r><w:t>target phrase</w:t></w:r><w:commentRangeEnd w:id="1"/></w:p>"#,
        Some(r#"<w:comment w:id="1" w:author="B"><w:p><w:r><w:t>check this</w:t></w:r></w:p></w:comment>"#),
    );
    let result = extract_bytes(&data).unwrap();

    assert_eq!(result.comments.len(), 1);
    assert_eq!(
        result.comments[0].anchored_text.as_deref(),
        Some("target phrase")
    );
}

#[test]
fn test_unmatched_range_leaves_anchor_unset() {
    let data = docx(
        r#"<w:p><w:commentRangeStart w:id="1"/><w:r><w:t>dangling</w:t></w:r></w:p>"#,
        Some(r#"<w:comment w:id="1" w:author="B"><w:p><w:r><w:t>note</w:t></w:r></w:p></w:comment>"#),
    );
    let result = extract_bytes(&data).unwrap();

    assert_eq!(result.comments.len(), 1);
    assert_eq!(result.comments[0].anchored_text, None);
}

#[test]
fn test_missing_attributes_never_fault() {
    let data = docx(
        r#"<w:p><w:ins><w:r><w:t>x</w:t></w:r></w:ins><w:moveFrom><w:r><w:t>y</w:t></w:r></w:moveFrom></w:p>"#,
        None,
    );
    let result = extract_bytes(&data).unwrap();

    assert_eq!(result.insertions[0].author, "Unknown");
    assert_eq!(result.insertions[0].date, "");
    assert_eq!(result.insertions[0].id, None);
    assert_eq!(result.move_from[0].author, "Unknown");
}

#[test]
fn test_full_revision_mix() {
    let body = r#"<w:p>
      <w:ins w:id="1" w:author="A" w:date="2024-03-01T09:00:00Z"><w:r><w:t>new text</w:t></w:r></w:ins>
      <w:del w:id="2" w:author="B" w:date="2024-03-01T10:00:00Z"><w:r><w:delText>old text</w:delText></w:r></w:del>
      <w:moveFrom w:id="3" w:author="C"><w:r><w:t>moved away</w:t></w:r></w:moveFrom>
      <w:moveTo w:id="4" w:author="C"><w:r><w:t>moved here</w:t></w:r></w:moveTo>
      <w:commentRangeStart w:id="0"/><w:r><w:t>flagged span</w:t></w:r><w:commentRangeEnd w:id="0"/>
    </w:p>"#;
    let comments =
        r#"<w:comment w:id="0" w:author="D" w:date="2024-03-02T08:00:00Z"><w:p><w:r><w:t>please verify</w:t></w:r></w:p></w:comment>"#;

    let result = extract_bytes(&docx(body, Some(comments))).unwrap();

    assert_eq!(result.insertions.len(), 1);
    assert_eq!(result.insertions[0].text, "new text");
    assert_eq!(result.insertions[0].id.as_deref(), Some("1"));

    assert_eq!(result.deletions.len(), 1);
    assert_eq!(result.deletions[0].author, "B");

    assert_eq!(result.move_from.len(), 1);
    assert_eq!(result.move_to.len(), 1);
    assert_eq!(result.move_to[0].text, "moved here");

    assert_eq!(result.comments.len(), 1);
    assert_eq!(result.comments[0].text, "please verify");
    assert_eq!(
        result.comments[0].anchored_text.as_deref(),
        Some("flagged span")
    );

    let summary = result.summary();
    assert_eq!(summary.insertions, 1);
    assert_eq!(summary.deletions, 1);
    assert_eq!(summary.moves, 2);
    assert_eq!(summary.comments, 1);
}

#[test]
fn test_scan_order_within_a_kind() {
    let body = r#"<w:p><w:ins w:author="A"><w:r><w:t>first</w:t></w:r></w:ins></w:p>
<w:p><w:ins w:author="B"><w:r><w:t>second</w:t></w:r></w:ins></w:p>"#;
    let result = extract_bytes(&docx(body, None)).unwrap();

    let texts: Vec<_> = result.insertions.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, ["first", "second"]);
}

#[test]
fn test_extract_file_round_trip() {
    let data = docx(
        r#"<w:p><w:ins w:author="A"><w:r><w:t>from disk</w:t></w:r></w:ins></w:p>"#,
        None,
    );

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.docx");
    std::fs::write(&path, &data).unwrap();

    let result = extract_file(&path).unwrap();
    assert_eq!(result.insertions.len(), 1);
    assert_eq!(result.insertions[0].text, "from disk");
}

#[test]
fn test_bom_prefixed_document_part() {
    let mut document = Vec::from(&b"\xEF\xBB\xBF"[..]);
    document.extend_from_slice(
        document_part(r#"<w:p><w:ins w:author="A"><w:r><w:t>bom</w:t></w:r></w:ins></w:p>"#)
            .as_bytes(),
    );
    let data = package(&[("word/document.xml", &document)]);

    let result = extract_bytes(&data).unwrap();
    assert_eq!(result.insertions.len(), 1);
    assert_eq!(result.insertions[0].text, "bom");
}

#[test]
fn test_json_envelope_fields() {
    let data = docx(
        r#"<w:p><w:ins w:author="A"><w:r><w:t>x</w:t></w:r></w:ins></w:p>"#,
        None,
    );
    let result = extract_bytes(&data).unwrap();
    let json = result.to_json().unwrap();

    assert!(json.contains("\"insertions\""));
    assert!(json.contains("\"Insertion\""));
    assert!(json.contains("\"author\": \"A\""));
    // No id on the element, so none in the output.
    assert!(!json.contains("\"id\""));
}
