//! Security Module
//!
//! サイズ上限とアーカイブのエントリ名検証を提供するモジュール。
//! 上限を超える入力は、解析処理を始める前に拒否します。

use crate::error::Base64ZeroError;

/// デコード後ペイロードの最大サイズ（100 MiB）
pub const MAX_PAYLOAD_SIZE: u64 = 104_857_600;

/// セキュリティ設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SecurityConfig {
    /// デコード後の最大サイズ（バイト、この値を含む）
    /// デフォルト: 100MiB (104_857_600 bytes)
    pub max_payload_size: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_payload_size: MAX_PAYLOAD_SIZE,
        }
    }
}

impl SecurityConfig {
    /// ペイロードサイズを検証する
    ///
    /// 上限ちょうどのサイズは許容し、1バイトでも超えれば拒否します。
    pub fn check_payload_size(&self, size: u64) -> Result<(), Base64ZeroError> {
        if size > self.max_payload_size {
            return Err(Base64ZeroError::PayloadTooLarge {
                size,
                max: self.max_payload_size,
            });
        }
        Ok(())
    }
}

/// アーカイブのエントリ名の検証
///
/// パストラバーサルを防ぐため、アーカイブに書き込むエントリ名を検証します。
/// シート名はソースファイル由来のため、`..`などを含む可能性があります。
///
/// # 戻り値
///
/// * `Ok(())` - 名前が安全な場合
/// * `Err(String)` - 名前が危険な場合（`..`のパス要素や絶対パスを含む）
pub(crate) fn validate_zip_path(path: &str) -> Result<(), String> {
    if path.is_empty() {
        return Err("Empty path is not allowed".to_string());
    }

    // Windows形式の`C:\`やUnix形式の`/`で始まるパス
    if path.starts_with('/') || path.starts_with("C:\\") || path.starts_with("c:\\") {
        return Err(format!("Absolute path is not allowed: {}", path));
    }

    // `..`が1つのパス要素として現れる場合のみ拒否（`Q1..Q2`のような名前は許容）
    if path.split(['/', '\\']).any(|segment| segment == "..") {
        return Err(format!("Path traversal detected: {}", path));
    }

    if path.contains('\\') {
        return Err(format!("Backslash in path is not allowed: {}", path));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_payload_size_boundary() {
        let config = SecurityConfig::default();
        assert!(config.check_payload_size(104_857_600).is_ok());
        match config.check_payload_size(104_857_601) {
            Err(Base64ZeroError::PayloadTooLarge { size, max }) => {
                assert_eq!(size, 104_857_601);
                assert_eq!(max, 104_857_600);
            }
            other => panic!("Expected PayloadTooLarge, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_zip_path_valid() {
        assert!(validate_zip_path("Sheet1_rows_1-10_selected_columns.json").is_ok());
        assert!(validate_zip_path("売上_rows_1-3_selected_columns.xlsx").is_ok());
    }

    #[test]
    fn test_validate_zip_path_empty() {
        assert!(validate_zip_path("").is_err());
    }

    #[test]
    fn test_validate_zip_path_absolute() {
        assert!(validate_zip_path("/etc/passwd").is_err());
        assert!(validate_zip_path("C:\\Windows\\system32").is_err());
        assert!(validate_zip_path("c:\\data.json").is_err());
    }

    #[test]
    fn test_validate_zip_path_traversal() {
        assert!(validate_zip_path("../etc/passwd").is_err());
        assert!(validate_zip_path("a/../../b").is_err());
        assert!(validate_zip_path("..").is_err());
        assert!(validate_zip_path("a/..").is_err());
    }

    #[test]
    fn test_validate_zip_path_dots_inside_name() {
        assert!(validate_zip_path("Q1..Q2_rows_1-1_selected_columns.json").is_ok());
        assert!(validate_zip_path("..evil_rows_1-1_selected_columns.json").is_ok());
        assert!(validate_zip_path("report...json").is_ok());
    }

    #[test]
    fn test_validate_zip_path_backslash() {
        assert!(validate_zip_path("dir\\file.json").is_err());
    }
}
