// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Spreadsheet export.
//!
//! Export rows are written as CSV with a header line in
//! [`EXPORT_COLUMNS`] order.

use std::io::Write;

use achievement_log_domain::{EXPORT_COLUMNS, ExportRow};

use crate::error::ApiError;

fn csv_error(err: &csv::Error) -> ApiError {
    ApiError::Internal {
        message: format!("Failed to write CSV: {err}"),
    }
}

/// Writes `rows` as CSV, header first.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn write_export_csv<W: Write>(rows: &[ExportRow], writer: W) -> Result<(), ApiError> {
    let mut csv_writer: csv::Writer<W> = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(EXPORT_COLUMNS)
        .map_err(|e| csv_error(&e))?;
    for row in rows {
        csv_writer
            .write_record(row.cells())
            .map_err(|e| csv_error(&e))?;
    }

    csv_writer.flush().map_err(|e| ApiError::Internal {
        message: format!("Failed to flush CSV: {e}"),
    })
}

/// Renders `rows` as an in-memory CSV document.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_export_csv(rows: &[ExportRow]) -> Result<Vec<u8>, ApiError> {
    let mut buffer: Vec<u8> = Vec::new();
    write_export_csv(rows, &mut buffer)?;
    Ok(buffer)
}

/// Suggested download name for an export, optionally scoped to a class.
#[must_use]
pub fn export_filename(class_filter: Option<&str>, stamp: &str) -> String {
    class_filter.map_or_else(
        || format!("achievements_{stamp}.csv"),
        |class_name| {
            let safe_class: String = class_name
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
                .collect();
            format!("achievements_{safe_class}_{stamp}.csv")
        },
    )
}
