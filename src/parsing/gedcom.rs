use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::record::Record;
use crate::store::Gedcom;
use crate::utils::validation::{check_record_limit, is_gzipped, MAX_LEVEL};

/// Byte-order mark as decoded from UTF-8
const BOM: char = '\u{FEFF}';

/// UTF-8 byte-order mark mis-decoded as three Latin-1 characters
const MISDECODED_BOM: &str = "\u{EF}\u{BB}\u{BF}";

/// Tag of the end-of-file sentinel, re-emitted by the writer
pub const TRAILER_TAG: &str = "TRLR";

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid line {line}: {content:?}")]
    InvalidLine { line: usize, content: String },

    #[error("Line {line} is nested too deeply (level {level}, maximum {MAX_LEVEL})")]
    NestingTooDeep { line: usize, level: usize },

    #[error("{0}")]
    TooManyRecords(String),
}

/// Parse a GEDCOM file, decompressing it first if the name ends in `.gz`
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or any error from
/// [`parse_text`].
pub fn parse_file(path: &Path) -> Result<Gedcom, ParseError> {
    let file = File::open(path)?;
    let mut bytes = Vec::new();
    if is_gzipped(path) {
        GzDecoder::new(file).read_to_end(&mut bytes)?;
    } else {
        BufReader::new(file).read_to_end(&mut bytes)?;
    }

    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!(path = %path.display(), "Input is not valid UTF-8, decoding lossily");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };

    let store = parse_text(&text)?;
    debug!(path = %path.display(), records = store.len(), "Parsed GEDCOM file");
    Ok(store)
}

/// Parse GEDCOM text into a store.
///
/// Lines nest under the nearest preceding line with a smaller level. Blank
/// lines are skipped and the `0 TRLR` sentinel is not stored.
///
/// # Errors
///
/// Returns `ParseError::InvalidLine` for a line without a numeric level and a
/// tag (or a nested line before any level-0 line), `ParseError::NestingTooDeep`
/// if a level exceeds the maximum, or `ParseError::TooManyRecords` if the
/// record limit is exceeded.
pub fn parse_text(text: &str) -> Result<Gedcom, ParseError> {
    let text = strip_bom(text);
    let mut store = Gedcom::new();
    let mut records = 0usize;

    // Currently open lines; index i holds the open line at level i
    let mut open: Vec<Record> = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_number = idx + 1;
        if raw.trim().is_empty() {
            continue;
        }

        let Some((level, record)) = Record::parse_line(raw) else {
            return Err(ParseError::InvalidLine {
                line: line_number,
                content: raw.to_string(),
            });
        };
        if level > MAX_LEVEL {
            return Err(ParseError::NestingTooDeep {
                line: line_number,
                level,
            });
        }
        if level > 0 && open.is_empty() {
            return Err(ParseError::InvalidLine {
                line: line_number,
                content: raw.to_string(),
            });
        }

        while open.len() > level {
            close_line(&mut open, &mut store, &mut records)?;
        }
        // A skipped level nests under the deepest open line
        open.push(record);
    }

    while !open.is_empty() {
        close_line(&mut open, &mut store, &mut records)?;
    }

    Ok(store)
}

/// Pop the deepest open line and attach it to its parent, or to the store if top-level
fn close_line(
    open: &mut Vec<Record>,
    store: &mut Gedcom,
    records: &mut usize,
) -> Result<(), ParseError> {
    let Some(record) = open.pop() else {
        return Ok(());
    };
    if let Some(parent) = open.last_mut() {
        parent.push_child(record);
        return Ok(());
    }

    if record.tag == TRAILER_TAG {
        return Ok(());
    }
    if let Some(msg) = check_record_limit(*records) {
        return Err(ParseError::TooManyRecords(msg));
    }
    *records += 1;

    let id = record.id().map(str::to_string);
    if store.insert(record).is_some() {
        warn!(
            id = id.as_deref().unwrap_or_default(),
            "Duplicate record id, keeping the later record"
        );
    }
    Ok(())
}

fn strip_bom(text: &str) -> &str {
    text.strip_prefix(BOM)
        .or_else(|| text.strip_prefix(MISDECODED_BOM))
        .unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::RecordKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SIMPLE: &str = "0 HEAD\n1 CHAR UTF-8\n0 @I1@ INDI\n1 NAME John /Smith/\n1 BIRT\n2 DATE 1 JAN 1900\n2 PLAC London\n1 FAMS @F1@\n0 @F1@ FAM\n1 HUSB @I1@\n0 TRLR\n";

    #[test]
    fn test_parse_text_nesting() {
        let store = parse_text(SIMPLE).unwrap();
        assert_eq!(store.len(), 3);

        let indi = store.get("@I1@").unwrap();
        assert_eq!(indi.children.len(), 3);
        let birth = indi.child("BIRT").unwrap();
        assert_eq!(birth.child_value("DATE"), Some("1 JAN 1900"));
        assert_eq!(birth.child_value("PLAC"), Some("London"));
        assert_eq!(
            store.family("@F1@").unwrap().husband(),
            Some("@I1@")
        );
    }

    #[test]
    fn test_trailer_not_stored() {
        let store = parse_text(SIMPLE).unwrap();
        assert!(store.records().all(|r| r.tag != TRAILER_TAG));
    }

    #[test]
    fn test_crlf_and_bom() {
        let text = format!("\u{FEFF}{}", SIMPLE.replace('\n', "\r\n"));
        let store = parse_text(&text).unwrap();
        assert_eq!(store.records().next().unwrap().tag, "HEAD");
        assert_eq!(
            store.get("@I1@").unwrap().child_value("NAME"),
            Some("John /Smith/")
        );
    }

    #[test]
    fn test_misdecoded_bom() {
        let text = format!("\u{EF}\u{BB}\u{BF}{SIMPLE}");
        let store = parse_text(&text).unwrap();
        assert_eq!(store.records().next().unwrap().tag, "HEAD");
    }

    #[test]
    fn test_blank_lines_skipped() {
        let store = parse_text("0 HEAD\n\n   \n0 @I1@ INDI\n").unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_invalid_line() {
        let err = parse_text("0 HEAD\nnot a line\n").unwrap_err();
        match err {
            ParseError::InvalidLine { line, content } => {
                assert_eq!(line, 2);
                assert_eq!(content, "not a line");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_orphan_nested_line() {
        let err = parse_text("1 NAME John\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidLine { line: 1, .. }));
    }

    #[test]
    fn test_nesting_too_deep() {
        let err = parse_text("0 HEAD\n100 NOTE deep\n").unwrap_err();
        assert!(matches!(err, ParseError::NestingTooDeep { line: 2, level: 100 }));
    }

    #[test]
    fn test_duplicate_id_replaced() {
        let store = parse_text("0 @I1@ INDI\n1 SEX M\n0 @I1@ INDI\n1 SEX F\n").unwrap();
        assert_eq!(store.count(RecordKind::Individual), 1);
        assert_eq!(store.get("@I1@").unwrap().child_value("SEX"), Some("F"));
    }

    #[test]
    fn test_parse_file_plain_and_gz() {
        let mut plain = NamedTempFile::with_suffix(".ged").unwrap();
        plain.write_all(SIMPLE.as_bytes()).unwrap();
        assert_eq!(parse_file(plain.path()).unwrap().len(), 3);

        let gz = NamedTempFile::with_suffix(".ged.gz").unwrap();
        let mut encoder =
            flate2::write::GzEncoder::new(gz.reopen().unwrap(), flate2::Compression::default());
        encoder.write_all(SIMPLE.as_bytes()).unwrap();
        encoder.finish().unwrap();
        assert_eq!(parse_file(gz.path()).unwrap().len(), 3);
    }

    #[test]
    fn test_parse_file_lossy_utf8() {
        let mut file = NamedTempFile::with_suffix(".ged").unwrap();
        file.write_all(b"0 @N1@ NOTE caf\xe9\n").unwrap();
        let store = parse_file(file.path()).unwrap();
        assert_eq!(store.get("@N1@").unwrap().value(), Some("caf\u{FFFD}"));
    }

    #[test]
    fn test_missing_file() {
        let err = parse_file(Path::new("/nonexistent/tree.ged")).unwrap_err();
        assert!(matches!(err, ParseError::Io(_)));
    }
}
