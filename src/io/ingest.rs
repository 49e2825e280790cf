//! CSV ingest.
//!
//! This module only turns a delimited file into a `RawTable` of strings.
//! Column naming, typing, and filtering all happen in `crate::series`.
//!
//! Design goals:
//! - **Tolerant reading** (ragged rows, surrounding whitespace)
//! - **Line numbers kept** so later parse errors point at the file
//! - **No interpretation** of cell contents here

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::domain::{RawRecord, RawTable};
use crate::error::AppError;

/// Read a CSV file into a `RawTable`.
pub fn read_raw_table(path: &Path) -> Result<RawTable, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    let table = read_raw_table_from(file)?;
    log::info!(
        "read {} rows x {} columns from {}",
        table.records.len(),
        table.headers.len(),
        path.display()
    );
    Ok(table)
}

/// Read CSV from any reader (first row is the header).
pub fn read_raw_table_from<R: Read>(reader: R) -> Result<RawTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        let record =
            result.map_err(|e| AppError::new(2, format!("CSV parse error on line {line}: {e}")))?;
        records.push(RawRecord::new(line, record.iter().map(str::to_string).collect()));
    }

    Ok(RawTable { headers, records })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "Period\\Unit:,[Australian dollar ],[US dollar ]\n\
                          2021-01-08,1.5758,1.2250\n\
                          2021-01-07,1.5836, 1.2338 \n\
                          2021-01-01,-,-\n";

    #[test]
    fn reads_headers_and_rows() {
        let table = read_raw_table_from(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.headers, vec!["Period\\Unit:", "[Australian dollar ]", "[US dollar ]"]);
        assert_eq!(table.records.len(), 3);
        assert_eq!(table.records[0].line, 2);
        assert_eq!(table.records[1].cell(2), "1.2338");
        assert_eq!(table.records[2].cell(1), "-");
    }

    #[test]
    fn headers_only_file_has_no_records() {
        let table = read_raw_table_from("Period\\Unit:,[US dollar ]\n".as_bytes()).unwrap();
        assert_eq!(table.headers.len(), 2);
        assert!(table.records.is_empty());
    }

    #[test]
    fn ragged_rows_are_accepted() {
        let table = read_raw_table_from("a,b,c\n1,2\n".as_bytes()).unwrap();
        assert_eq!(table.records[0].cell(2), "");
    }

    #[test]
    fn reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let table = read_raw_table(file.path()).unwrap();
        assert_eq!(table.records.len(), 3);
    }

    #[test]
    fn missing_file_is_exit_code_2() {
        let err = read_raw_table(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
