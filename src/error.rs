//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// base64zeroクレート全体で使用するエラー型
///
/// Base64文字列の正規化、デコード、スプレッドシートの解析、行・列の抽出、
/// エクスポート処理中に発生するすべてのエラーを統一的に扱うために使用されます。
/// 各バリアントは、UI層がユーザー向けメッセージを組み立てられるだけの情報を保持します。
///
/// # エラーの種類
///
/// - 入力系: `UnknownFileType`, `MalformedDataUri`, `InvalidBase64`, `EmptyPayload`, `PayloadTooLarge`
/// - 解析系: `NoValidSheets`, `NotASpreadsheet`, `Parse`
/// - 範囲・選択系: `InvalidStartRow`, `InvalidEndRow`, `StartExceedsRowCount`,
///   `EndExceedsRowCount`, `NoColumnsSelected`, `NoDataInSelection`
/// - 出力系: `NoArtifactsToBundle`, `Workbook`, `Zip`, `Json`, `Io`
/// - 設定系: `Config`, `UnknownEncodeMode`, `SecurityViolation`
///
/// # 使用例
///
/// ```rust,no_run
/// use base64zero::{Base64ZeroError, PipelineBuilder};
///
/// # fn main() -> Result<(), Base64ZeroError> {
/// let pipeline = PipelineBuilder::new().build()?;
/// match pipeline.decode("not base64 at all") {
///     Err(Base64ZeroError::UnknownFileType) => println!("型を判定できません"),
///     Err(e) => println!("{}", e),
///     Ok(payload) => println!("{} bytes", payload.len()),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Error, Debug)]
pub enum Base64ZeroError {
    /// バイトシグネチャ・拡張子のいずれからもMIMEタイプを判定できなかった
    #[error("Unknown file type: could not determine MIME type from content or suffix")]
    UnknownFileType,

    /// `data:<mime>;base64,<data>`形式に一致しない
    #[error("Malformed data URI: {0}")]
    MalformedDataUri(String),

    /// Base64デコードに失敗した
    ///
    /// `#[from]`属性により、`base64::DecodeError`から自動的に変換されます。
    #[error("Invalid Base64 input: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// デコード結果が0バイトだった
    #[error("Decoded payload is empty")]
    EmptyPayload,

    /// デコード後のサイズが上限を超えた
    #[error("Payload too large: {size} bytes (max: {max} bytes)")]
    PayloadTooLarge {
        /// デコード後のサイズ（バイト）
        size: u64,
        /// 許容される最大サイズ（バイト）
        max: u64,
    },

    /// 有効なシートが1つも得られなかった
    #[error("No valid sheets found in workbook")]
    NoValidSheets,

    /// スプレッドシート以外のペイロードを解析しようとした
    #[error("Payload is not a spreadsheet: {0}")]
    NotASpreadsheet(String),

    /// 開始行が正の整数ではない
    #[error("Invalid start row: '{0}' is not a positive integer")]
    InvalidStartRow(String),

    /// 終了行が整数ではない、または開始行より小さい
    #[error("Invalid end row: '{end}' must be an integer >= {start}")]
    InvalidEndRow {
        /// 入力された終了行
        end: String,
        /// 検証済みの開始行
        start: usize,
    },

    /// 開始行がシートの行数を超えている
    #[error("Start row {start} exceeds row count {total}")]
    StartExceedsRowCount {
        /// 開始行（1始まり）
        start: usize,
        /// シートのデータ行数
        total: usize,
    },

    /// 終了行がシートの行数を超えている
    #[error("End row {end} exceeds row count {total}")]
    EndExceedsRowCount {
        /// 終了行（1始まり）
        end: usize,
        /// シートのデータ行数
        total: usize,
    },

    /// 列が1つも選択されていない
    #[error("No columns selected for sheet '{0}'")]
    NoColumnsSelected(String),

    /// 選択範囲にデータが存在しない
    #[error("No data in selection for sheet '{0}'")]
    NoDataInSelection(String),

    /// アーカイブにまとめる成果物が存在しない
    #[error("No artifacts to bundle: no sheet has a column selection with data in range")]
    NoArtifactsToBundle,

    /// 未知のエンコードモード名
    #[error("Unknown encode mode: '{0}'")]
    UnknownEncodeMode(String),

    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// スプレッドシートの解析中に発生したエラー（calamine由来）
    #[error("Failed to parse spreadsheet: {0}")]
    Parse(#[from] calamine::Error),

    /// XLSX出力中に発生したエラー（rust_xlsxwriter由来）
    #[error("Failed to write workbook: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    /// ZIPアーカイブの生成エラー
    #[error("ZIP archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// JSONシリアライズエラー
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// 設定の検証に失敗したエラー
    ///
    /// `PipelineBuilder::build()`時に設定を検証し、無効な設定が検出された
    /// 場合に発生します。
    ///
    /// # 例
    ///
    /// ```rust,no_run
    /// use base64zero::{Base64ZeroError, PipelineBuilder};
    ///
    /// let result = PipelineBuilder::new().with_max_payload_size(0).build();
    ///
    /// match result {
    ///     Err(Base64ZeroError::Config(msg)) => {
    ///         println!("設定エラー: {}", msg);
    ///     }
    ///     _ => {}
    /// }
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// セキュリティ制限に違反したエラー
    ///
    /// アーカイブのエントリ名にパストラバーサルや絶対パスが含まれる場合に発生します。
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}
