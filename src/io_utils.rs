//! CSV reader/writer construction, delimiter resolution, and input decoding.
//!
//! All file I/O flows through here: extension-based delimiter detection
//! (`.tsv` → tab, anything else → comma) with manual override, input decoding
//! via `encoding_rs` defaulting to UTF-8, and the `-` path convention for
//! standard streams.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{anyhow, Context, Result};
use encoding_rs::{Encoding, UTF_8};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    match label {
        Some(value) => Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'")),
        None => Ok(UTF_8),
    }
}

pub fn resolve_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

pub fn open_csv_reader(path: &Path, delimiter: u8) -> Result<csv::Reader<Box<dyn Read>>> {
    let reader: Box<dyn Read> = if is_dash(path) {
        Box::new(std::io::stdin().lock())
    } else {
        Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Opening input file {path:?}"))?,
        ))
    };
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true);
    Ok(builder.from_reader(reader))
}

pub fn open_csv_writer(path: Option<&Path>, delimiter: u8) -> Result<csv::Writer<Box<dyn Write>>> {
    let writer: Box<dyn Write> = match path {
        Some(p) if !is_dash(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Creating output file {p:?}"))?,
        )),
        _ => Box::new(std::io::stdout()),
    };
    let mut builder = csv::WriterBuilder::new();
    builder.delimiter(delimiter).double_quote(true);
    Ok(builder.from_writer(writer))
}

/// Opens `path` for appending rows. The flag reports whether the caller must
/// write a header first (file new or empty).
pub fn open_csv_appender(path: &Path, delimiter: u8) -> Result<(csv::Writer<File>, bool)> {
    let needs_header = std::fs::metadata(path)
        .map(|meta| meta.len() == 0)
        .unwrap_or(true);
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Opening master file {path:?} for append"))?;
    let mut builder = csv::WriterBuilder::new();
    builder.delimiter(delimiter).double_quote(true);
    Ok((builder.from_writer(file), needs_header))
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}

pub fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn delimiter_resolution_follows_extension_with_override() {
        assert_eq!(resolve_delimiter(&PathBuf::from("data.csv"), None), b',');
        assert_eq!(resolve_delimiter(&PathBuf::from("data.tsv"), None), b'\t');
        assert_eq!(
            resolve_delimiter(&PathBuf::from("data.tsv"), Some(b';')),
            b';'
        );
    }

    #[test]
    fn unknown_encoding_label_is_rejected() {
        assert!(resolve_encoding(Some("not-an-encoding")).is_err());
        assert_eq!(resolve_encoding(None).unwrap(), UTF_8);
        assert_eq!(
            resolve_encoding(Some("windows-1257")).unwrap().name(),
            "windows-1257"
        );
    }
}
