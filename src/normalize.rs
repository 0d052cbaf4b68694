//! Base64 Normalizer Module
//!
//! 生のBase64文字列を`data:<mime>;base64,<payload>`形式の正規化済み文字列に変換するモジュール。

use base64::Engine as _;
use tracing::debug;

use crate::decoder::FORGIVING;
use crate::error::Base64ZeroError;
use crate::sniff;

const DATA_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// MIME判定のためにデコードする先頭文字数の上限
const SNIFF_PREFIX_LEN: usize = 24;

/// Base64文字列をデータURIに正規化する
///
/// - 前後の空白を除いた入力が`data:`で始まる場合はそのまま返します（冪等）。
/// - それ以外の場合は空白を除去し、末尾の`.<ext>`を取り除いてからデータURIを組み立てます。
///   拡張子は型推定にのみ使用され、出力のペイロードには残りません。
/// - 先頭バイトのシグネチャを優先し、判定できない場合のみ拡張子で判定します。
///
/// # エラー
///
/// * `Base64ZeroError::UnknownFileType` - どちらの方法でもMIMEタイプを判定できない場合
///
/// # 使用例
///
/// ```rust
/// use base64zero::normalize;
///
/// let uri = normalize("iVBORw0KGgo=").unwrap();
/// assert_eq!(uri, "data:image/png;base64,iVBORw0KGgo=");
///
/// let uri = normalize("SGVsbG8=.txt").unwrap();
/// assert_eq!(uri, "data:text/plain;base64,SGVsbG8=");
/// ```
pub fn normalize(input: &str) -> Result<String, Base64ZeroError> {
    normalize_with_fallback(input, None)
}

/// フォールバックMIMEタイプ付きで正規化する（`Pipeline`の設定から使用）
pub(crate) fn normalize_with_fallback(
    input: &str,
    fallback_mime: Option<&str>,
) -> Result<String, Base64ZeroError> {
    let trimmed = input.trim();
    if trimmed.starts_with(DATA_PREFIX) {
        return Ok(trimmed.to_string());
    }

    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let (payload, ext) = split_suffix(&compact);

    let mime = if let Some(mime) = sniff_base64_prefix(payload) {
        debug!(mime, "MIME type detected from payload signature");
        mime
    } else if let Some(mime) = ext.and_then(sniff::sniff_extension) {
        debug!(mime, ext, "MIME type inferred from suffix");
        mime
    } else if let Some(mime) = fallback_mime {
        debug!(mime, "Using configured fallback MIME type");
        mime
    } else {
        return Err(Base64ZeroError::UnknownFileType);
    };

    Ok(format!("{}{}{}{}", DATA_PREFIX, mime, BASE64_MARKER, payload))
}

/// 末尾の`.<ext>`を分離する
///
/// Base64のアルファベットに`.`は含まれないため、最後の`.`以降が英数字のみであれば拡張子とみなします。
fn split_suffix(compact: &str) -> (&str, Option<&str>) {
    match compact.rsplit_once('.') {
        Some((payload, ext))
            if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            (payload, Some(ext))
        }
        _ => (compact, None),
    }
}

/// Base64の先頭部分だけをデコードしてシグネチャを判定する
fn sniff_base64_prefix(payload: &str) -> Option<&'static str> {
    let mut prefix_len = payload.len().min(SNIFF_PREFIX_LEN);
    // 余り1文字はどのバイトにも満たない
    if prefix_len % 4 == 1 {
        prefix_len -= 1;
    }
    if prefix_len == 0 {
        return None;
    }

    let prefix = payload.get(..prefix_len)?;
    let decoded = FORGIVING.decode(prefix).ok()?;
    sniff::sniff_bytes(&decoded)
}

/// データURIからMIMEタイプとBase64データを取り出す
///
/// # エラー
///
/// * `Base64ZeroError::MalformedDataUri` - `data:<mime>;base64,<data>`形式に一致しない場合
pub fn extract_mime_and_data(normalized: &str) -> Result<(String, String), Base64ZeroError> {
    let malformed = || Base64ZeroError::MalformedDataUri(truncate_for_message(normalized));

    let rest = normalized.strip_prefix(DATA_PREFIX).ok_or_else(malformed)?;
    let (mime, data) = rest.split_once(BASE64_MARKER).ok_or_else(malformed)?;

    let mime = mime.trim();
    if mime.is_empty() || mime.contains(',') || !mime.contains('/') {
        return Err(malformed());
    }

    Ok((mime.to_string(), data.to_string()))
}

/// エラーメッセージ用に入力を短縮する
fn truncate_for_message(input: &str) -> String {
    const MAX_CHARS: usize = 64;
    if input.chars().count() <= MAX_CHARS {
        input.to_string()
    } else {
        let head: String = input.chars().take(MAX_CHARS).collect();
        format!("{}...", head)
    }
}
