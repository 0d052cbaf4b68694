//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::api::PreviewKind;
use crate::sniff;

/// セルの値を表す列挙型
///
/// スプレッドシートから読み取った値の閉じた表現です。
/// JSONへのシリアライズ時、`Empty`は空文字列、`Date`はISO 8601文字列になります。
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// 文字列
    Text(String),

    /// 数値（f64）
    Number(f64),

    /// 論理値
    Bool(bool),

    /// 日時（型付き日付をサポートする形式のみ）
    Date(NaiveDateTime),

    /// 空セル
    Empty,
}

impl CellValue {
    /// 値が空かどうかを判定
    ///
    /// 空セルに加えて、空文字列も空として扱います。
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// 値を文字列として取得（ヘッダー名の生成に使用）
    pub fn as_raw_string(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => match integral(*n) {
                Some(i) => i.to_string(),
                None => n.to_string(),
            },
            CellValue::Bool(b) => b.to_string(),
            CellValue::Date(dt) => format_iso(dt),
            CellValue::Empty => String::new(),
        }
    }
}

/// 整数として表現できる数値であれば`i64`を返す
pub(crate) fn integral(n: f64) -> Option<i64> {
    // 2^53 を超えると f64 は整数を正確に表現できない
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE {
        Some(n as i64)
    } else {
        None
    }
}

fn format_iso(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Number(n) => match integral(*n) {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
            CellValue::Bool(b) => serializer.serialize_bool(*b),
            CellValue::Date(dt) => serializer.serialize_str(&format_iso(dt)),
            CellValue::Empty => serializer.serialize_str(""),
        }
    }
}

/// 1行分のデータ（列ラベル → セル値）
///
/// キーの挿入順を保持します。JSON出力のキー順はこの順序に従います。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowObject {
    cells: Vec<(String, CellValue)>,
}

impl RowObject {
    /// 空の行を生成
    pub fn new() -> Self {
        Self::default()
    }

    /// 値を設定する。既存のキーであれば値を置き換え、位置は維持する
    pub fn insert(&mut self, key: impl Into<String>, value: CellValue) {
        let key = key.into();
        match self.cells.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.cells.push((key, value)),
        }
    }

    /// 容量を指定して空の行を生成
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: Vec::with_capacity(capacity),
        }
    }

    /// 重複しないことが分かっているキーを末尾に追加する
    ///
    /// 既存キーの検索を行わないため、呼び出し側がキーの一意性を保証する必要があります。
    pub(crate) fn push_unique(&mut self, key: String, value: CellValue) {
        self.cells.push((key, value));
    }

    /// キーに対応する値を取得
    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// 位置のヒントを使ってキーに対応する値を取得する
    ///
    /// `index`の位置のキーが一致しない場合は全体を検索します。
    pub(crate) fn get_at(&self, index: usize, key: &str) -> Option<&CellValue> {
        match self.cells.get(index) {
            Some((k, v)) if k == key => Some(v),
            _ => self.get(key),
        }
    }

    /// キーが存在するか
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// 挿入順のキー一覧
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(k, _)| k.as_str())
    }

    /// 挿入順の（キー, 値）一覧
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Serialize for RowObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (key, value) in &self.cells {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// デコード済みペイロード
///
/// `bytes`は常に1バイト以上、かつ上限サイズ以下であることが保証されます。
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedPayload {
    mime_type: String,
    bytes: Vec<u8>,
}

impl DecodedPayload {
    /// 検証済みのMIMEタイプとバイト列から生成（デコーダー専用）
    pub(crate) fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// 解決済みのMIMEタイプ
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// デコード済みのバイト列
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// バイト列の所有権を取得
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// 常に`false`（空のペイロードは生成されない）
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// プレビュー方法の分類
    pub fn preview_kind(&self) -> PreviewKind {
        PreviewKind::from_mime(&self.mime_type)
    }

    /// スプレッドシート形式かどうか
    pub fn is_spreadsheet(&self) -> bool {
        sniff::is_spreadsheet_mime(&self.mime_type)
    }
}

/// 1シート分の解析結果
#[derive(Debug, Clone, PartialEq)]
pub struct SheetData {
    /// シート名（ソースファイル由来）
    pub sheet_name: String,

    /// 重複排除済みの列ラベル（1件以上）
    pub header_row: Vec<String>,

    /// 生のセル行列（0行目がヘッダー候補）
    pub data: Vec<Vec<CellValue>>,

    /// 行オブジェクト（空行は除外済み、ソース順）
    pub rows: Vec<RowObject>,
}

impl SheetData {
    /// データ行数（範囲検証の基準）
    pub fn total_row_count(&self) -> usize {
        self.rows.len()
    }
}

/// 1始まり・両端を含む行範囲
///
/// `selection::validate_range`で検証された値のみが生成されます。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    start: usize,
    end: usize,
}

impl RowRange {
    pub(crate) fn new(start: usize, end: usize) -> Self {
        debug_assert!(start >= 1 && end >= start);
        Self { start, end }
    }

    /// 開始行（1始まり）
    pub fn start(&self) -> usize {
        self.start
    }

    /// 終了行（1始まり、含む）
    pub fn end(&self) -> usize {
        self.end
    }

    /// 0始まりのインデックス（両端を含む）
    pub fn to_indices(&self) -> (usize, usize) {
        (self.start - 1, self.end - 1)
    }

    /// 範囲内の行数
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// 常に`false`（`end >= start`）
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// シートごとの列選択
///
/// 列ラベルは`SheetData::header_row`の値（重複排除の接尾辞を含む）と完全一致する必要があります。
/// 選択順は保持され、エクスポート時のキー順になります。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnSelection {
    sheets: HashMap<String, Vec<String>>,
}

impl ColumnSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// 列を選択に追加する（同じ列の重複追加は無視）
    pub fn select(&mut self, sheet: impl Into<String>, column: impl Into<String>) -> &mut Self {
        let column = column.into();
        let columns = self.sheets.entry(sheet.into()).or_default();
        if !columns.contains(&column) {
            columns.push(column);
        }
        self
    }

    /// 複数の列をまとめて追加する
    pub fn with_columns<I, C>(mut self, sheet: &str, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        for column in columns {
            self.select(sheet, column);
        }
        self
    }

    /// 列を選択から外す
    pub fn deselect(&mut self, sheet: &str, column: &str) {
        if let Some(columns) = self.sheets.get_mut(sheet) {
            columns.retain(|c| c != column);
        }
    }

    /// シートの選択列（未選択なら空）
    pub fn columns(&self, sheet: &str) -> &[String] {
        self.sheets.get(sheet).map(Vec::as_slice).unwrap_or(&[])
    }

    /// どのシートにも列が選択されていないか
    pub fn is_empty(&self) -> bool {
        self.sheets.values().all(Vec::is_empty)
    }
}

/// エクスポート成果物
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// ファイル名
    pub name: String,

    /// MIMEタイプ
    pub mime_type: String,

    /// 内容
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_cell_value_is_empty() {
        assert!(CellValue::Empty.is_empty());
        assert!(CellValue::Text(String::new()).is_empty());
        assert!(!CellValue::Number(0.0).is_empty());
        assert!(!CellValue::Bool(false).is_empty());
        assert!(!CellValue::Date(date(2024, 1, 1)).is_empty());
    }

    #[test]
    fn test_cell_value_as_raw_string() {
        assert_eq!(CellValue::Empty.as_raw_string(), "");
        assert_eq!(CellValue::Number(42.0).as_raw_string(), "42");
        assert_eq!(CellValue::Number(42.5).as_raw_string(), "42.5");
        assert_eq!(CellValue::Bool(true).as_raw_string(), "true");
        assert_eq!(
            CellValue::Date(date(2024, 3, 5)).as_raw_string(),
            "2024-03-05T00:00:00.000Z"
        );
    }

    #[test]
    fn test_cell_value_serialize() {
        let values = vec![
            CellValue::Text("a".to_string()),
            CellValue::Number(3.0),
            CellValue::Number(1.25),
            CellValue::Bool(true),
            CellValue::Date(date(2025, 11, 20)),
            CellValue::Empty,
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(
            json,
            r#"["a",3,1.25,true,"2025-11-20T00:00:00.000Z",""]"#
        );
    }

    #[test]
    fn test_row_object_preserves_insertion_order() {
        let mut row = RowObject::new();
        row.insert("Zeta", CellValue::Number(1.0));
        row.insert("Alpha", CellValue::Number(2.0));
        row.insert("Mid", CellValue::Number(3.0));
        row.insert("Zeta", CellValue::Number(9.0));

        assert_eq!(row.keys().collect::<Vec<_>>(), vec!["Zeta", "Alpha", "Mid"]);
        assert_eq!(row.get("Zeta"), Some(&CellValue::Number(9.0)));
        assert_eq!(
            serde_json::to_string(&row).unwrap(),
            r#"{"Zeta":9,"Alpha":2,"Mid":3}"#
        );
    }

    #[test]
    fn test_row_range_indices() {
        let range = RowRange::new(3, 7);
        assert_eq!(range.to_indices(), (2, 6));
        assert_eq!(range.len(), 5);

        let single = RowRange::new(1, 1);
        assert_eq!(single.to_indices(), (0, 0));
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn test_column_selection() {
        let mut selection = ColumnSelection::new();
        assert!(selection.is_empty());

        selection.select("Sheet1", "B").select("Sheet1", "A").select("Sheet1", "B");
        assert_eq!(selection.columns("Sheet1"), &["B".to_string(), "A".to_string()]);
        assert!(selection.columns("Sheet2").is_empty());

        selection.deselect("Sheet1", "B");
        assert_eq!(selection.columns("Sheet1"), &["A".to_string()]);

        selection.deselect("Sheet1", "A");
        assert!(selection.is_empty());
    }

    #[test]
    fn test_decoded_payload_classification() {
        let payload = DecodedPayload::new("image/png", vec![0x89, 0x50, 0x4E, 0x47]);
        assert_eq!(payload.preview_kind(), PreviewKind::Image);
        assert!(!payload.is_spreadsheet());
        assert_eq!(payload.len(), 4);

        let sheet = DecodedPayload::new("application/vnd.ms-excel", vec![0xD0]);
        assert!(sheet.is_spreadsheet());
        assert_eq!(sheet.preview_kind(), PreviewKind::Spreadsheet);
    }
}
