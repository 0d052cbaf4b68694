//! Output Format Module
//!
//! 絞り込んだ行データのエクスポート（JSON/XLSX/ZIP）と、
//! データURIのテキスト表現への変換を提供するモジュール。

mod archive;
mod encode;
mod formatters;
mod naming;

use crate::api::ExportFormat;
use crate::error::Base64ZeroError;
use crate::types::RowObject;

pub use archive::bundle_archive;
pub use encode::{format, to_data_uri};
pub use formatters::{to_json, to_spreadsheet, JsonFormatter, XlsxFormatter};
pub use naming::{archive_name, default_file_name, sheet_artifact_name, timestamp};
pub(crate) use naming::with_extension;

/// 出力フォーマッター（Strategy Pattern）
///
/// 各エクスポート形式をenumとして表現し、網羅的なmatchで振り分けます。
#[derive(Debug, Clone, Copy)]
pub(crate) enum OutputFormatter {
    Json,
    Xlsx,
}

impl OutputFormatter {
    /// エクスポート形式からフォーマッターを生成
    pub fn from_format(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Json => OutputFormatter::Json,
            ExportFormat::Xlsx => OutputFormatter::Xlsx,
        }
    }

    /// 行データを指定された形式のバイト列にする
    ///
    /// # 引数
    ///
    /// * `rows` - 絞り込み済みの行
    /// * `sheet_name` - XLSX出力時のシート名
    pub fn render(&self, rows: &[RowObject], sheet_name: &str) -> Result<Vec<u8>, Base64ZeroError> {
        match self {
            OutputFormatter::Json => JsonFormatter.render(rows),
            OutputFormatter::Xlsx => XlsxFormatter.render(rows, sheet_name),
        }
    }
}
