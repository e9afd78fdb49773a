//! Loader collaborator: reads a delimited file into a raw frame.
//!
//! Parsing bytes into tabular form is the loader's whole job; the pipeline
//! itself never touches I/O. Any reader or decode failure maps to the load
//! error kind.

use std::path::Path;

use encoding_rs::Encoding;
use log::debug;

use crate::error::CleanError;
use crate::frame::RawTable;
use crate::io_utils;
use crate::value::Cell;

/// Reads `path` into a raw table. Headers are taken from the first record;
/// every data field becomes a text cell (or the missing marker when blank).
/// Typing is the coercion stage's job, not the loader's.
pub fn load_table(
    path: &Path,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<RawTable, CleanError> {
    read_table(path, delimiter, encoding).map_err(|err| CleanError::Load(format!("{err:#}")))
}

fn read_table(
    path: &Path,
    delimiter: u8,
    encoding: &'static Encoding,
) -> anyhow::Result<RawTable> {
    let mut reader = io_utils::open_csv_reader(path, delimiter)?;
    let headers = reader.byte_headers()?.clone();
    let columns = io_utils::decode_record(&headers, encoding)?
        .into_iter()
        .map(|label| label.trim().to_string())
        .collect::<Vec<_>>();

    let mut frame = RawTable::new(columns);
    for (idx, record) in reader.byte_records().enumerate() {
        let record = record.map_err(|err| anyhow::anyhow!("row {}: {err}", idx + 2))?;
        let decoded = io_utils::decode_record(&record, encoding)?;
        let mut row = decoded
            .iter()
            .map(|field| Cell::from_raw(field))
            .collect::<Vec<_>>();
        // Flexible reads may return short rows; pad so cells stay aligned
        // with the header positions.
        row.resize(frame.column_count().max(row.len()), Cell::Missing);
        frame.rows.push(row);
    }
    debug!(
        "Loaded {} row(s) across {} column(s) from {path:?}",
        frame.row_count(),
        frame.column_count()
    );
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::UTF_8;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write contents");
        file
    }

    #[test]
    fn loads_headers_and_rows() {
        let file = write_temp("Gads,Alga\n2022,1450\n2021,\n");
        let table = load_table(file.path(), b',', UTF_8).unwrap();
        assert_eq!(table.columns, vec!["Gads", "Alga"]);
        assert_eq!(table.rows[0], vec![Cell::text("2022"), Cell::text("1450")]);
        assert_eq!(table.rows[1], vec![Cell::text("2021"), Cell::Missing]);
    }

    #[test]
    fn short_rows_are_padded_with_missing() {
        let file = write_temp("a,b,c\n1,2\n");
        let table = load_table(file.path(), b',', UTF_8).unwrap();
        assert_eq!(table.rows[0].len(), 3);
        assert_eq!(table.rows[0][2], Cell::Missing);
    }

    #[test]
    fn unreadable_file_maps_to_load_error() {
        let err = load_table(Path::new("/definitely/not/here.csv"), b',', UTF_8).unwrap_err();
        assert!(matches!(err, CleanError::Load(_)));
        assert!(err.to_string().starts_with("Failed to load file"));
    }
}
