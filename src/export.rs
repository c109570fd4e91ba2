//! Writes records to CSV files that the client downloads.

use axum::{
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::Error;

/// The content type of CSV downloads.
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Serialize `rows` as CSV with a header row taken from the field names of `T`.
///
/// # Errors
/// Returns an [Error::ExportError] if a row cannot be serialized.
pub fn write_csv<T: Serialize>(rows: &[T]) -> Result<Vec<u8>, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for row in rows {
        writer.serialize(row)?;
    }

    writer
        .into_inner()
        .map_err(|error| Error::ExportError(error.to_string()))
}

/// Build a response that makes the client download `rows` as `file_name`.
///
/// # Errors
/// Returns an [Error::ExportError] if a row cannot be serialized.
pub fn csv_download<T: Serialize>(file_name: &str, rows: &[T]) -> Result<Response, Error> {
    let body = write_csv(rows)?;
    let disposition = format!("attachment; filename=\"{}\"", sanitize_file_name(file_name));

    Ok((
        [(CONTENT_TYPE, CSV_CONTENT_TYPE.to_owned()), (CONTENT_DISPOSITION, disposition)],
        body,
    )
        .into_response())
}

/// Replace characters that cannot appear in a quoted header value.
fn sanitize_file_name(file_name: &str) -> String {
    file_name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c == ' ' || c.is_ascii_graphic() => c,
            _ => '_',
        })
        .collect()
}
