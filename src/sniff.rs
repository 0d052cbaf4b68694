//! MIME Sniffer Module
//!
//! 先頭バイトのシグネチャ、またはファイル名の拡張子からMIMEタイプを推定するモジュール。
//! すべての関数は副作用のない純粋関数で、判定できない場合は`None`を返します。

pub(crate) const PNG_MIME: &str = "image/png";
pub(crate) const JPEG_MIME: &str = "image/jpeg";
pub(crate) const GIF_MIME: &str = "image/gif";
pub(crate) const PDF_MIME: &str = "application/pdf";
pub(crate) const XLSX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub(crate) const XLS_MIME: &str = "application/vnd.ms-excel";
pub(crate) const TEXT_MIME: &str = "text/plain";

/// 拡張子 → MIMEタイプの対応表
const SUFFIX_TABLE: &[(&str, &str)] = &[
    ("png", PNG_MIME),
    ("jpg", JPEG_MIME),
    ("jpeg", JPEG_MIME),
    ("gif", GIF_MIME),
    ("pdf", PDF_MIME),
    ("xls", XLS_MIME),
    ("xlsx", XLSX_MIME),
    ("txt", TEXT_MIME),
];

/// MIMEタイプ → 既定拡張子の対応表（`jpeg`より`jpg`を優先）
const EXTENSION_TABLE: &[(&str, &str)] = &[
    (PNG_MIME, "png"),
    (JPEG_MIME, "jpg"),
    (GIF_MIME, "gif"),
    (PDF_MIME, "pdf"),
    (XLS_MIME, "xls"),
    (XLSX_MIME, "xlsx"),
    (TEXT_MIME, "txt"),
];

/// 判定結果が得られない場合の拡張子
pub(crate) const FALLBACK_EXTENSION: &str = "bin";

/// 先頭バイトからMIMEタイプを判定する
///
/// シグネチャは以下の順で照合されます。
///
/// | 先頭バイト                     | MIMEタイプ                |
/// | ------------------------------ | ------------------------- |
/// | `89 50 4E 47`                  | `image/png`               |
/// | `FF D8 FF`                     | `image/jpeg`              |
/// | `25 50 44 46`                  | `application/pdf`         |
/// | `47 49 46 38`                  | `image/gif`               |
/// | `50 4B {03,05,07} {04,06,08}`  | XLSX（OOXML ZIPコンテナ） |
/// | `D0 CF 11 E0`                  | `application/vnd.ms-excel`|
pub fn sniff_bytes(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0x89, 0x50, 0x4E, 0x47, ..] => Some(PNG_MIME),
        [0xFF, 0xD8, 0xFF, ..] => Some(JPEG_MIME),
        [0x25, 0x50, 0x44, 0x46, ..] => Some(PDF_MIME),
        [0x47, 0x49, 0x46, 0x38, ..] => Some(GIF_MIME),
        [0x50, 0x4B, 0x03 | 0x05 | 0x07, 0x04 | 0x06 | 0x08, ..] => Some(XLSX_MIME),
        [0xD0, 0xCF, 0x11, 0xE0, ..] => Some(XLS_MIME),
        _ => None,
    }
}

/// 拡張子（`.`なし、大文字小文字は区別しない）からMIMEタイプを判定する
pub fn sniff_extension(ext: &str) -> Option<&'static str> {
    SUFFIX_TABLE
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map(|(_, mime)| *mime)
}

/// ファイル名やパスの末尾`.<ext>`からMIMEタイプを判定する
pub fn sniff_suffix(name: &str) -> Option<&'static str> {
    let (_, ext) = name.rsplit_once('.')?;
    sniff_extension(ext)
}

/// バイト判定を優先し、失敗した場合のみ拡張子で判定する
pub fn sniff(bytes: &[u8], name: Option<&str>) -> Option<&'static str> {
    sniff_bytes(bytes).or_else(|| name.and_then(sniff_suffix))
}

/// MIMEタイプに対応する既定の拡張子（不明な場合は`bin`）
pub fn extension_for_mime(mime: &str) -> &'static str {
    EXTENSION_TABLE
        .iter()
        .find(|(known, _)| *known == mime)
        .map(|(_, ext)| *ext)
        .unwrap_or(FALLBACK_EXTENSION)
}

/// スプレッドシートとして解析対象となるMIMEタイプか
pub(crate) fn is_spreadsheet_mime(mime: &str) -> bool {
    mime == XLSX_MIME || mime == XLS_MIME
}
