//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

use std::fmt;
use std::str::FromStr;

use crate::error::Base64ZeroError;
use crate::sniff;

/// エンコード結果の出力形式
///
/// データURIをどのテキスト表現に変換するかを指定します。
///
/// # 出力例（`fileName = "logo.png"`）
///
/// | モード     | 出力                                                        |
/// | ---------- | ----------------------------------------------------------- |
/// | PlainText  | `iVBORw0KGgo...`                                            |
/// | DataUri    | `data:image/png;base64,iVBORw0KGgo...`                      |
/// | ImgTag     | `<img src="data:..." alt="logo.png" />`                     |
/// | CssBg      | `background-image: url('data:...');`                        |
/// | HtmlLink   | `<a href="data:..." download="logo.png">Download Image</a>` |
/// | Json       | `{"fileName": "logo.png", "base64": "data:..."}`            |
/// | Xml        | `<image><name>logo.png</name><base64>data:...</base64></image>` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodeMode {
    /// Base64本体のみ
    PlainText,
    /// データURIそのまま
    DataUri,
    /// HTMLの`<img>`タグ
    ImgTag,
    /// CSSの`background-image`ルール
    CssBg,
    /// HTMLのダウンロードリンク
    HtmlLink,
    /// JSONオブジェクト
    Json,
    /// XML要素
    Xml,
}

impl EncodeMode {
    /// すべてのモード（表示順）
    pub const ALL: [EncodeMode; 7] = [
        EncodeMode::PlainText,
        EncodeMode::DataUri,
        EncodeMode::ImgTag,
        EncodeMode::CssBg,
        EncodeMode::HtmlLink,
        EncodeMode::Json,
        EncodeMode::Xml,
    ];

    /// モード名（camelCase）
    pub fn name(&self) -> &'static str {
        match self {
            EncodeMode::PlainText => "plainText",
            EncodeMode::DataUri => "dataUri",
            EncodeMode::ImgTag => "imgTag",
            EncodeMode::CssBg => "cssBg",
            EncodeMode::HtmlLink => "htmlLink",
            EncodeMode::Json => "json",
            EncodeMode::Xml => "xml",
        }
    }

    /// 保存時のファイル拡張子
    pub fn file_extension(&self) -> &'static str {
        match self {
            EncodeMode::PlainText | EncodeMode::DataUri | EncodeMode::CssBg => "txt",
            EncodeMode::ImgTag | EncodeMode::HtmlLink => "html",
            EncodeMode::Json => "json",
            EncodeMode::Xml => "xml",
        }
    }

    /// 保存時のMIMEタイプ
    pub fn mime_type(&self) -> &'static str {
        match self.file_extension() {
            "html" => "text/html",
            "json" => "application/json",
            "xml" => "application/xml",
            _ => "text/plain",
        }
    }
}

impl fmt::Display for EncodeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EncodeMode {
    type Err = Base64ZeroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EncodeMode::ALL
            .iter()
            .copied()
            .find(|mode| mode.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Base64ZeroError::UnknownEncodeMode(s.to_string()))
    }
}

/// 行データのエクスポート形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// 2スペースインデントのJSON配列
    Json,
    /// 単一シートのXLSX（OOXML）
    Xlsx,
}

impl ExportFormat {
    /// ファイル拡張子
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    /// MIMEタイプ
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Xlsx => sniff::XLSX_MIME,
        }
    }
}

/// ZIPアーカイブの圧縮方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArchiveCompression {
    /// 無圧縮
    Stored,
    /// Deflate圧縮（デフォルト）
    #[default]
    Deflated,
}

/// プレビュー方法の分類
///
/// UI層がデコード結果をどのように表示するかを判断するために使用します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreviewKind {
    /// `image/*`
    Image,
    /// PDF文書
    Document,
    /// XLS/XLSX
    Spreadsheet,
    /// プレーンテキスト
    Text,
    /// その他のバイナリ
    Binary,
}

impl PreviewKind {
    /// MIMEタイプから分類する
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("image/") {
            PreviewKind::Image
        } else if mime == sniff::PDF_MIME {
            PreviewKind::Document
        } else if sniff::is_spreadsheet_mime(mime) {
            PreviewKind::Spreadsheet
        } else if mime.starts_with("text/") {
            PreviewKind::Text
        } else {
            PreviewKind::Binary
        }
    }
}
