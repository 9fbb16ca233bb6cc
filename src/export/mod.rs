//! Export layer: projects a report payload onto an ordered column list
//! and renders it in the requested file format.
//!
//! Only the spreadsheet renderer is implemented. `pdf` and `word` are
//! recognized formats that fail loudly with [`ExportError::NotImplemented`]
//! — they must never fall back to a different format behind the caller's
//! back. An empty or unrecognized format string, by contrast, has always
//! meant "give me the default" and parses to excel.

pub mod excel;
pub mod mapper;

pub use mapper::{CellValue, TabularProjection};

use thiserror::Error;

use crate::db::DatabaseError;
use crate::models::AvailableField;
use crate::report::ReportPayload;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Excel,
    Pdf,
    Word,
}

impl ExportFormat {
    /// Parse a caller-supplied format string. `pdf` and `word` are
    /// recognized (and rejected later at dispatch); anything else —
    /// including the empty string — is the excel default.
    pub fn parse(s: &str) -> Self {
        match s {
            "pdf" => ExportFormat::Pdf,
            "word" => ExportFormat::Word,
            _ => ExportFormat::Excel,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Excel => "excel",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Word => "word",
        }
    }
}

/// A rendered report ready to ship as an attachment.
#[derive(Debug)]
pub struct RenderedReport {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: &'static str,
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("{} export is not implemented", .0.as_str())]
    NotImplemented(ExportFormat),

    #[error(transparent)]
    Storage(#[from] DatabaseError),

    #[error("Failed to build workbook: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
}

/// Project the payload onto the resolved field list and dispatch to the
/// format renderer.
pub fn render(
    payload: &ReportPayload,
    fields: &[AvailableField],
    format: ExportFormat,
) -> Result<RenderedReport, ExportError> {
    let projection = mapper::project(payload, fields);
    match format {
        ExportFormat::Excel => excel::render(payload, &projection),
        ExportFormat::Pdf => Err(ExportError::NotImplemented(ExportFormat::Pdf)),
        ExportFormat::Word => Err(ExportError::NotImplemented(ExportFormat::Word)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_formats_parse_exactly() {
        assert_eq!(ExportFormat::parse("excel"), ExportFormat::Excel);
        assert_eq!(ExportFormat::parse("pdf"), ExportFormat::Pdf);
        assert_eq!(ExportFormat::parse("word"), ExportFormat::Word);
    }

    #[test]
    fn empty_and_unknown_formats_default_to_excel() {
        assert_eq!(ExportFormat::parse(""), ExportFormat::Excel);
        assert_eq!(ExportFormat::parse("csv"), ExportFormat::Excel);
        // Case matters: format strings are exact, like the rest of the wire.
        assert_eq!(ExportFormat::parse("PDF"), ExportFormat::Excel);
    }

    #[test]
    fn not_implemented_message_names_the_format() {
        let err = ExportError::NotImplemented(ExportFormat::Pdf);
        assert_eq!(err.to_string(), "pdf export is not implemented");
    }
}
