//! base64zero - Base64 payload decoder, spreadsheet extractor and encoder
//!
//! This crate decodes Base64 text (raw or as a data URI) into typed binary payloads,
//! parses spreadsheet payloads into per-sheet row data, extracts user-selected row
//! ranges and columns, and exports them as JSON, XLSX, or a ZIP bundle.
//! In the other direction it turns file bytes into data URIs and common text
//! representations (HTML, CSS, JSON, XML).
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use base64zero::{ExportFormat, PipelineBuilder};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create a pipeline with default settings (100 MiB cap)
//!     let pipeline = PipelineBuilder::new().build()?;
//!
//!     // Decode a Base64-encoded workbook
//!     let base64 = std::fs::read_to_string("report.xlsx.b64")?;
//!     let payload = pipeline.decode(&base64)?;
//!
//!     // Parse sheets and export rows 1..=10 of the first sheet
//!     let sheets = pipeline.parse(&payload)?;
//!     let columns = vec!["Name".to_string(), "Total".to_string()];
//!     let artifact = pipeline.export_sheet(&sheets[0], &columns, "1", "10", ExportFormat::Json)?;
//!     std::fs::write(&artifact.name, &artifact.bytes)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Export All Sheets
//!
//! ```rust,no_run
//! use base64zero::{ColumnSelection, ExportFormat, PipelineBuilder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = PipelineBuilder::new().build()?;
//! let payload = pipeline.read_payload(std::fs::File::open("report.xlsx")?, Some("report.xlsx"))?;
//! let sheets = pipeline.parse(&payload)?;
//!
//! let selection = ColumnSelection::new()
//!     .with_columns("Sales", ["Region", "Amount"])
//!     .with_columns("Costs", ["Item"]);
//! let bundle = pipeline.export_all(&sheets, &selection, "2", "", ExportFormat::Xlsx, chrono::Utc::now())?;
//! std::fs::write(&bundle.name, &bundle.bytes)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Encode a File
//!
//! ```rust
//! use base64zero::{format, to_data_uri, EncodeMode};
//!
//! let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
//! let uri = to_data_uri(&png, Some("logo.png"));
//! assert_eq!(uri, "data:image/png;base64,iVBORw0KGgo=");
//! assert_eq!(
//!     format(&uri, "logo.png", EncodeMode::CssBg),
//!     "background-image: url('data:image/png;base64,iVBORw0KGgo=');"
//! );
//! ```

mod api;
mod builder;
mod decoder;
mod error;
mod normalize;
mod output;
mod parser;
mod security;
mod selection;
mod sniff;
mod types;

// 公開API
pub use api::{ArchiveCompression, EncodeMode, ExportFormat, PreviewKind};
pub use builder::{Pipeline, PipelineBuilder};
pub use decoder::decode;
pub use error::Base64ZeroError;
pub use normalize::{extract_mime_and_data, normalize};
pub use output::{
    archive_name, bundle_archive, default_file_name, format, sheet_artifact_name, timestamp,
    to_data_uri, to_json, to_spreadsheet, JsonFormatter, XlsxFormatter,
};
pub use parser::parse;
pub use security::MAX_PAYLOAD_SIZE;
pub use selection::{filter_rows, validate_range};
pub use sniff::{extension_for_mime, sniff, sniff_bytes, sniff_extension, sniff_suffix};
pub use types::{
    CellValue, ColumnSelection, DecodedPayload, ExportArtifact, RowObject, RowRange, SheetData,
};
