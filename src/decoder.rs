//! Payload Decoder Module
//!
//! 正規化済みのBase64データをバイト列に変換するモジュール。
//! スプレッドシートの構造については何も知らず、バイト列とMIMEタイプのみを生成します。

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use tracing::debug;

use crate::error::Base64ZeroError;
use crate::security::SecurityConfig;
use crate::types::DecodedPayload;

/// パディングの有無を問わず受け付けるデコーダー
pub(crate) const FORGIVING: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Base64データをデコードする（上限: 100 MiB）
///
/// # 引数
///
/// * `mime_type` - 正規化で解決済みのMIMEタイプ
/// * `base64_data` - Base64文字列（内部の空白は除去されます）
///
/// # エラー
///
/// * `Base64ZeroError::PayloadTooLarge` - デコード後のサイズが上限を超える場合
/// * `Base64ZeroError::InvalidBase64` - アルファベットやパディングが不正な場合
/// * `Base64ZeroError::EmptyPayload` - デコード結果が0バイトの場合
///
/// # 使用例
///
/// ```rust
/// use base64zero::decode;
///
/// let payload = decode("text/plain", "SGVs bG8=").unwrap();
/// assert_eq!(payload.bytes(), b"Hello");
/// assert_eq!(payload.mime_type(), "text/plain");
/// ```
pub fn decode(mime_type: &str, base64_data: &str) -> Result<DecodedPayload, Base64ZeroError> {
    decode_with_limit(mime_type, base64_data, &SecurityConfig::default())
}

/// サイズ上限を指定してデコードする
pub(crate) fn decode_with_limit(
    mime_type: &str,
    base64_data: &str,
    security: &SecurityConfig,
) -> Result<DecodedPayload, Base64ZeroError> {
    let compact: String = base64_data.chars().filter(|c| !c.is_whitespace()).collect();

    // デコード前にサイズを確定させ、上限超過の入力では作業を始めない
    security.check_payload_size(decoded_len(&compact))?;

    let bytes = FORGIVING.decode(compact.as_bytes())?;
    if bytes.is_empty() {
        return Err(Base64ZeroError::EmptyPayload);
    }
    security.check_payload_size(bytes.len() as u64)?;

    debug!(mime_type, size = bytes.len(), "Decoded Base64 payload");
    Ok(DecodedPayload::new(mime_type, bytes))
}

/// 空白除去済みBase64文字列のデコード後バイト数
///
/// 正しいBase64であれば正確な値になります。
fn decoded_len(compact: &str) -> u64 {
    let significant = compact.trim_end_matches('=').len() as u64;
    significant * 3 / 4
}
