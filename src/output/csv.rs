//! CSV persistence for the final record set
//!
//! Hand-rolled writer with minimal quoting: a field is quoted only when it
//! contains a comma, quote, or line break, with inner quotes doubled. The
//! file starts with a UTF-8 BOM so spreadsheet tools detect the encoding.

use crate::record::{AdRecord, CSV_HEADERS};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the record set as a CSV file
///
/// # Arguments
///
/// * `records` - The deduplicated records, one row each
/// * `output_path` - Path the CSV file is written to
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the file
/// * `Err(std::io::Error)` - Failed to create or write the file
pub fn write_csv(records: &[AdRecord], output_path: &Path) -> std::io::Result<()> {
    let csv = format_csv(records);

    let mut file = File::create(output_path)?;
    // Spreadsheet tools need the BOM to detect UTF-8
    file.write_all("\u{FEFF}".as_bytes())?;
    file.write_all(csv.as_bytes())?;

    Ok(())
}

/// Formats the record set as CSV text (header row plus one row per record)
pub fn format_csv(records: &[AdRecord]) -> String {
    let mut out = String::new();

    out.push_str(&CSV_HEADERS.join(","));
    out.push('\n');

    for record in records {
        let row: Vec<String> = record.to_fields().iter().map(|f| escape_field(f)).collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

/// Quotes a field when its content would break the row structure
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
