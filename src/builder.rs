//! Builder Module
//!
//! Fluent Builder APIを提供し、`Pipeline`インスタンスを段階的に構築する。

use std::io::Read;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::api::{ArchiveCompression, EncodeMode, ExportFormat};
use crate::decoder::decode_with_limit;
use crate::error::Base64ZeroError;
use crate::normalize::{extract_mime_and_data, normalize_with_fallback};
use crate::output::{self, OutputFormatter};
use crate::security::SecurityConfig;
use crate::selection::{filter_rows, validate_range};
use crate::sniff;
use crate::types::{ColumnSelection, DecodedPayload, ExportArtifact, SheetData};

/// エンコード成果物の既定名に付ける接尾辞
const ENCODED_SUFFIX: &str = "_base64";

/// ZIPアーカイブのMIMEタイプ
const ZIP_MIME: &str = "application/zip";

/// パイプラインの設定を保持する内部構造体
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PipelineConfig {
    /// サイズ上限
    pub security: SecurityConfig,

    /// 判定できない場合に使用するMIMEタイプ（Noneの場合はエラー）
    pub fallback_mime: Option<String>,

    /// アーカイブの圧縮方式
    pub archive_compression: ArchiveCompression,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            security: SecurityConfig::default(),
            fallback_mime: None,
            archive_compression: ArchiveCompression::Deflated,
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use base64zero::{ArchiveCompression, PipelineBuilder};
///
/// # fn main() -> Result<(), base64zero::Base64ZeroError> {
/// let pipeline = PipelineBuilder::new()
///     .with_max_payload_size(10 * 1024 * 1024)
///     .with_archive_compression(ArchiveCompression::Stored)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct PipelineBuilder {
    config: PipelineConfig,
}

impl PipelineBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - サイズ上限: 104,857,600バイト（100 MiB、この値を含む）
    /// - フォールバックMIMEタイプ: なし（判定できなければ`UnknownFileType`）
    /// - アーカイブ圧縮: Deflate
    pub fn new() -> Self {
        Self::default()
    }

    /// デコード後ペイロードの最大サイズ（バイト）を指定する
    pub fn with_max_payload_size(mut self, max: u64) -> Self {
        self.config.security.max_payload_size = max;
        self
    }

    /// シグネチャ・拡張子のどちらでも判定できない場合のMIMEタイプを指定する
    ///
    /// ```rust,no_run
    /// use base64zero::PipelineBuilder;
    ///
    /// let builder = PipelineBuilder::new()
    ///     .with_fallback_mime("application/octet-stream");
    /// ```
    pub fn with_fallback_mime(mut self, mime: impl Into<String>) -> Self {
        self.config.fallback_mime = Some(mime.into());
        self
    }

    /// アーカイブの圧縮方式を指定する
    pub fn with_archive_compression(mut self, compression: ArchiveCompression) -> Self {
        self.config.archive_compression = compression;
        self
    }

    /// 設定を検証し、`Pipeline`インスタンスを生成する
    ///
    /// # 発生し得るエラー
    ///
    /// * `Base64ZeroError::Config(String)`:
    ///   * サイズ上限が0
    ///   * フォールバックMIMEタイプが`type/subtype`形式でない
    pub fn build(self) -> Result<Pipeline, Base64ZeroError> {
        if self.config.security.max_payload_size == 0 {
            return Err(Base64ZeroError::Config(
                "Invalid max payload size: must be greater than 0".to_string(),
            ));
        }

        if let Some(ref mime) = self.config.fallback_mime {
            let valid = matches!(
                mime.split_once('/'),
                Some((ty, sub)) if !ty.is_empty() && !sub.is_empty() && !mime.contains([',', ';'])
            );
            if !valid {
                return Err(Base64ZeroError::Config(format!(
                    "Invalid fallback MIME type: '{}'",
                    mime
                )));
            }
        }

        Ok(Pipeline {
            config: self.config,
        })
    }
}

/// デコード・解析・抽出・エクスポート処理のファサード
///
/// すべての操作は状態を持たず、入力に対して独立に動作します。
/// 失敗した操作は部分的な状態を残しません。
///
/// # 使用例
///
/// ```rust,no_run
/// use base64zero::{ColumnSelection, ExportFormat, PipelineBuilder};
///
/// # fn main() -> Result<(), base64zero::Base64ZeroError> {
/// let pipeline = PipelineBuilder::new().build()?;
/// let base64 = std::fs::read_to_string("report.xlsx.b64")?;
///
/// let payload = pipeline.decode(&base64)?;
/// let sheets = pipeline.parse(&payload)?;
///
/// let selection = ColumnSelection::new().with_columns("Sheet1", ["Name", "Total"]);
/// let artifact = pipeline.export_sheet(
///     &sheets[0],
///     selection.columns("Sheet1"),
///     "1",
///     "",
///     ExportFormat::Json,
/// )?;
/// std::fs::write(&artifact.name, &artifact.bytes)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Base64文字列をデータURIに正規化する
    pub fn normalize(&self, input: &str) -> Result<String, Base64ZeroError> {
        normalize_with_fallback(input, self.config.fallback_mime.as_deref())
    }

    /// Base64文字列（データURI可）をデコードする
    ///
    /// # 処理フロー
    ///
    /// 1. データURIへの正規化（MIMEタイプの判定）
    /// 2. MIMEタイプとBase64データの抽出
    /// 3. サイズ上限を確認してからデコード
    pub fn decode(&self, input: &str) -> Result<DecodedPayload, Base64ZeroError> {
        let normalized = self.normalize(input)?;
        let (mime, data) = extract_mime_and_data(&normalized)?;
        decode_with_limit(&mime, &data, &self.config.security)
    }

    /// アップロードされたファイルを読み込む
    ///
    /// 上限を1バイト超えた時点で読み込みを打ち切ります。
    /// MIMEタイプはシグネチャ、ファイル名の拡張子、フォールバックの順で決定します。
    ///
    /// # エラー
    ///
    /// * `Base64ZeroError::PayloadTooLarge` - 上限を超える場合
    /// * `Base64ZeroError::EmptyPayload` - 空ファイルの場合
    /// * `Base64ZeroError::UnknownFileType` - MIMEタイプを判定できない場合
    pub fn read_payload<R: Read>(
        &self,
        reader: R,
        file_name: Option<&str>,
    ) -> Result<DecodedPayload, Base64ZeroError> {
        let max = self.config.security.max_payload_size;
        let mut buffer = Vec::new();
        reader.take(max.saturating_add(1)).read_to_end(&mut buffer)?;

        self.config.security.check_payload_size(buffer.len() as u64)?;
        if buffer.is_empty() {
            return Err(Base64ZeroError::EmptyPayload);
        }

        let mime = sniff::sniff(&buffer, file_name)
            .or(self.config.fallback_mime.as_deref())
            .ok_or(Base64ZeroError::UnknownFileType)?;

        debug!(mime, size = buffer.len(), "Read payload from file");
        Ok(DecodedPayload::new(mime, buffer))
    }

    /// スプレッドシートのペイロードを解析する
    ///
    /// # エラー
    ///
    /// * `Base64ZeroError::NotASpreadsheet` - XLS/XLSX以外のMIMEタイプの場合
    /// * `Base64ZeroError::NoValidSheets` - 有効なシートがない場合
    pub fn parse(&self, payload: &DecodedPayload) -> Result<Vec<SheetData>, Base64ZeroError> {
        if !payload.is_spreadsheet() {
            return Err(Base64ZeroError::NotASpreadsheet(payload.mime_type().to_string()));
        }
        self.config
            .security
            .check_payload_size(payload.len() as u64)?;

        crate::parser::parse(payload.bytes())
    }

    /// 1シート分の行・列を抽出してエクスポートする
    ///
    /// 成果物名は`<sheetName>_rows_<start>-<end>_selected_columns.<ext>`です。
    pub fn export_sheet(
        &self,
        sheet: &SheetData,
        columns: &[String],
        start: &str,
        end: &str,
        format: ExportFormat,
    ) -> Result<ExportArtifact, Base64ZeroError> {
        let range = validate_range(sheet, start, end)?;
        let rows = filter_rows(sheet, columns, range)?;
        let bytes = OutputFormatter::from_format(format).render(&rows, &sheet.sheet_name)?;

        Ok(ExportArtifact {
            name: output::sheet_artifact_name(&sheet.sheet_name, range, format),
            mime_type: format.mime_type().to_string(),
            bytes,
        })
    }

    /// 全シートの行・列を抽出し、1つのZIPアーカイブにまとめる
    ///
    /// シートはソース順に処理されます。列が選択されていないシート、範囲が不正なシート、
    /// 絞り込み結果が空のシートはスキップされます。
    ///
    /// 成果物名は`all_sheets_rows_<start>-<end or 'end'>_<timestamp>.zip`です。
    ///
    /// # エラー
    ///
    /// * `Base64ZeroError::NoArtifactsToBundle` - 有効なシートが1つもない場合
    pub fn export_all(
        &self,
        sheets: &[SheetData],
        selection: &ColumnSelection,
        start: &str,
        end: &str,
        format: ExportFormat,
        at: DateTime<Utc>,
    ) -> Result<ExportArtifact, Base64ZeroError> {
        let mut artifacts = Vec::new();

        for sheet in sheets {
            let columns = selection.columns(&sheet.sheet_name);
            if columns.is_empty() {
                debug!(sheet = %sheet.sheet_name, "No columns selected, skipping sheet");
                continue;
            }

            match self.export_sheet(sheet, columns, start, end, format) {
                Ok(artifact) => artifacts.push(artifact),
                Err(
                    e @ (Base64ZeroError::InvalidStartRow(_)
                    | Base64ZeroError::InvalidEndRow { .. }
                    | Base64ZeroError::StartExceedsRowCount { .. }
                    | Base64ZeroError::EndExceedsRowCount { .. }
                    | Base64ZeroError::NoDataInSelection(_)),
                ) => {
                    warn!(sheet = %sheet.sheet_name, error = %e, "Skipping sheet in bundle export");
                }
                Err(e) => return Err(e),
            }
        }

        let bytes = output::bundle_archive(&artifacts, self.config.archive_compression)?;
        Ok(ExportArtifact {
            name: output::archive_name(start, end, at),
            mime_type: ZIP_MIME.to_string(),
            bytes,
        })
    }

    /// ファイルのバイト列を指定モードのテキスト表現に変換する
    pub fn encode(
        &self,
        bytes: &[u8],
        file_name: &str,
        mode: EncodeMode,
    ) -> Result<String, Base64ZeroError> {
        self.config.security.check_payload_size(bytes.len() as u64)?;
        let name = (!file_name.is_empty()).then_some(file_name);
        Ok(output::format(&output::to_data_uri(bytes, name), file_name, mode))
    }

    /// エンコード結果を保存用の成果物にする
    ///
    /// ファイル名が指定された場合は`<stem>.<mode-ext>`、
    /// 指定されない場合は`file_<timestamp>_base64.<mode-ext>`になります。
    pub fn encode_artifact(
        &self,
        bytes: &[u8],
        file_name: &str,
        mode: EncodeMode,
        at: DateTime<Utc>,
    ) -> Result<ExportArtifact, Base64ZeroError> {
        let text = self.encode(bytes, file_name, mode)?;

        let stem = match file_name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem.to_string(),
            _ if !file_name.is_empty() => file_name.to_string(),
            _ => format!("file_{}{}", output::timestamp(at), ENCODED_SUFFIX),
        };

        Ok(ExportArtifact {
            name: output::with_extension(&stem, mode.file_extension()),
            mime_type: mode.mime_type().to_string(),
            bytes: text.into_bytes(),
        })
    }

    /// デコード済みペイロードを保存用の成果物にする
    ///
    /// ファイル名が指定されない場合は`file_<timestamp>.<ext>`になります。
    pub fn decoded_artifact(
        &self,
        payload: &DecodedPayload,
        file_name: Option<&str>,
        at: DateTime<Utc>,
    ) -> ExportArtifact {
        let name = match file_name {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => output::default_file_name(payload.mime_type(), "", at),
        };

        ExportArtifact {
            name,
            mime_type: payload.mime_type().to_string(),
            bytes: payload.bytes().to_vec(),
        }
    }
}
