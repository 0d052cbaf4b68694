//! Artifact Naming
//!
//! 成果物のファイル名規則。タイムスタンプは呼び出し側から注入します。

use chrono::{DateTime, Utc};

use crate::api::ExportFormat;
use crate::sniff;
use crate::types::RowRange;

/// 14桁のUTCタイムスタンプ（`YYYYMMDDhhmmss`）
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y%m%d%H%M%S").to_string()
}

/// シート単位の成果物名
///
/// `<sheetName>_rows_<start>-<end>_selected_columns.<ext>`
pub fn sheet_artifact_name(sheet_name: &str, range: RowRange, format: ExportFormat) -> String {
    format!(
        "{}_rows_{}-{}_selected_columns.{}",
        sheet_name,
        range.start(),
        range.end(),
        format.extension()
    )
}

/// 全シートをまとめたアーカイブ名
///
/// `all_sheets_rows_<start>-<end or 'end'>_<timestamp>.zip`
pub fn archive_name(start: &str, end: &str, at: DateTime<Utc>) -> String {
    let end = match end.trim() {
        "" => "end",
        e => e,
    };
    format!("all_sheets_rows_{}-{}_{}.zip", start.trim(), end, timestamp(at))
}

/// ファイル名が指定されなかった場合の既定名
///
/// `file_<timestamp><suffix>.<ext>`（拡張子はMIMEタイプから決定、不明なら`bin`）
pub fn default_file_name(mime_type: &str, suffix: &str, at: DateTime<Utc>) -> String {
    with_extension(
        &format!("file_{}{}", timestamp(at), suffix),
        sniff::extension_for_mime(mime_type),
    )
}

pub(crate) fn with_extension(stem: &str, ext: &str) -> String {
    format!("{}.{}", stem, ext)
}
