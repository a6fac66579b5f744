use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::core::record::LINE_ENDING;
use crate::parsing::gedcom::TRAILER_TAG;
use crate::store::Gedcom;
use crate::utils::validation::is_gzipped;

/// UTF-8 byte-order mark written at the start of every file
const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Write the store as GEDCOM text: BOM, every record in order, then the trailer
///
/// # Errors
///
/// Returns any error raised by the underlying writer.
pub fn write_gedcom<W: Write>(store: &Gedcom, writer: &mut W) -> io::Result<()> {
    writer.write_all(BOM)?;
    for record in store.records() {
        record.write_to(0, writer)?;
    }
    write!(writer, "0 {TRAILER_TAG}{LINE_ENDING}")?;
    writer.flush()
}

/// Write the store to `path`, gzip-compressed if the name ends in `.gz`
///
/// # Errors
///
/// Returns `io::Error` if the file cannot be created or written.
pub fn write_file(store: &Gedcom, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    if is_gzipped(path) {
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        write_gedcom(store, &mut encoder)?;
        encoder.finish()?.flush()
    } else {
        write_gedcom(store, &mut BufWriter::new(file))
    }
}
