//! Encode Formatter
//!
//! エンコード方向の出力。ファイルのバイト列をデータURIにし、
//! そのデータURIを各種テキスト表現（HTML/CSS/JSON/XML など）に変換します。

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use quick_xml::escape::escape;
use serde_json::Value;

use crate::api::EncodeMode;
use crate::sniff;

/// ファイル名が空の場合の代替テキスト
const DEFAULT_LABEL: &str = "image";

/// 型を判定できないバイト列のMIMEタイプ
const OCTET_STREAM: &str = "application/octet-stream";

/// ファイルのバイト列をデータURIに変換する
///
/// MIMEタイプはシグネチャ、ファイル名の拡張子、`application/octet-stream`の順で決定します。
///
/// ```rust
/// use base64zero::to_data_uri;
///
/// let uri = to_data_uri(b"Hello", Some("greeting.txt"));
/// assert_eq!(uri, "data:text/plain;base64,SGVsbG8=");
/// ```
pub fn to_data_uri(bytes: &[u8], file_name: Option<&str>) -> String {
    let mime = sniff::sniff(bytes, file_name).unwrap_or(OCTET_STREAM);
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// データURIを指定モードのテキスト表現に変換する
///
/// 副作用のない決定的な関数です。
///
/// ```rust
/// use base64zero::{format, EncodeMode};
///
/// let uri = "data:image/png;base64,iVBORw0KGgo=";
/// assert_eq!(
///     format(uri, "", EncodeMode::ImgTag),
///     r#"<img src="data:image/png;base64,iVBORw0KGgo=" alt="image" />"#
/// );
/// ```
pub fn format(data_uri: &str, file_name: &str, mode: EncodeMode) -> String {
    match mode {
        EncodeMode::PlainText => data_uri
            .split_once(',')
            .map(|(_, payload)| payload)
            .unwrap_or(data_uri)
            .to_string(),
        EncodeMode::DataUri => data_uri.to_string(),
        EncodeMode::ImgTag => format!(
            r#"<img src="{}" alt="{}" />"#,
            data_uri,
            escape(label(file_name))
        ),
        EncodeMode::CssBg => format!("background-image: url('{}');", data_uri),
        EncodeMode::HtmlLink => format!(
            r#"<a href="{}" download="{}">Download Image</a>"#,
            data_uri,
            escape(label(file_name))
        ),
        EncodeMode::Json => format!(
            "{{\n  \"fileName\": {},\n  \"base64\": {}\n}}",
            Value::from(file_name),
            Value::from(data_uri)
        ),
        EncodeMode::Xml => format!(
            "<image><name>{}</name><base64>{}</base64></image>",
            escape(file_name),
            data_uri
        ),
    }
}

fn label(file_name: &str) -> &str {
    if file_name.is_empty() {
        DEFAULT_LABEL
    } else {
        file_name
    }
}
