//! Workbook Parser Module
//!
//! calamineを使用したワークブックレベルの操作。
//! XLSX/XLSM/XLSB/XLS/ODSを自動判別して読み込みます。

use std::io::{Cursor, Read, Seek};

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use super::header::{build_header, overflow_key};
use crate::error::Base64ZeroError;
use crate::types::{CellValue, RowObject, SheetData};

/// スプレッドシートのバイト列を解析する
///
/// シートはソース順に返され、行もソース順を維持します。
/// ヘッダー・データ行ともに空のシートは結果から除外されます。
///
/// # エラー
///
/// * `Base64ZeroError::Parse` - ワークブックとして読み込めない場合
/// * `Base64ZeroError::NoValidSheets` - 有効なシートが1つもない場合
///
/// # 使用例
///
/// ```rust,no_run
/// # fn main() -> Result<(), base64zero::Base64ZeroError> {
/// let bytes = std::fs::read("report.xlsx")?;
/// for sheet in base64zero::parse(&bytes)? {
///     println!("{}: {} rows", sheet.sheet_name, sheet.total_row_count());
/// }
/// # Ok(())
/// # }
/// ```
pub fn parse(bytes: &[u8]) -> Result<Vec<SheetData>, Base64ZeroError> {
    let mut parser = WorkbookParser::open(Cursor::new(bytes.to_vec()))?;

    let mut sheets = Vec::new();
    for sheet_name in parser.sheet_names() {
        let matrix = parser.read_matrix(&sheet_name)?;
        let sheet = build_sheet(sheet_name, matrix);

        if sheet.data.is_empty() && sheet.rows.is_empty() {
            debug!(sheet = %sheet.sheet_name, "Skipping empty sheet");
            continue;
        }

        debug!(
            sheet = %sheet.sheet_name,
            columns = sheet.header_row.len(),
            rows = sheet.rows.len(),
            "Parsed sheet"
        );
        sheets.push(sheet);
    }

    if sheets.is_empty() {
        return Err(Base64ZeroError::NoValidSheets);
    }
    Ok(sheets)
}

/// ワークブックパーサー
///
/// calamineのラッパーとして、ワークブックレベルの操作を提供します。
pub(crate) struct WorkbookParser<RS: Read + Seek> {
    workbook: Sheets<RS>,
}

impl<RS: Read + Seek + Clone> WorkbookParser<RS> {
    /// ワークブックを開く（形式は内容から自動判別）
    pub fn open(reader: RS) -> Result<Self, Base64ZeroError> {
        let workbook = open_workbook_auto_from_rs(reader)?;
        Ok(Self { workbook })
    }

    /// すべてのシート名（ソース順）
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names().to_vec()
    }

    /// シートのセル行列を取得する
    ///
    /// 0行目がヘッダー候補、1行目以降がデータ行です。
    pub fn read_matrix(
        &mut self,
        sheet_name: &str,
    ) -> Result<Vec<Vec<CellValue>>, Base64ZeroError> {
        let range: Range<Data> = self.workbook.worksheet_range(sheet_name)?;
        Ok(range
            .rows()
            .map(|row| row.iter().map(convert_cell).collect())
            .collect())
    }
}

/// calamineのセル値を変換する
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => {
            if dt.is_duration() {
                CellValue::Number(dt.as_f64())
            } else {
                dt.as_datetime()
                    .map(CellValue::Date)
                    .unwrap_or(CellValue::Number(dt.as_f64()))
            }
        }
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(CellValue::Date)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
        Data::Empty => CellValue::Empty,
    }
}

/// ODSなどのISO 8601日時文字列を解析する
fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    s.parse::<NaiveDateTime>().ok().or_else(|| {
        s.parse::<NaiveDate>()
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    })
}

/// セル行列から`SheetData`を構築する
///
/// 空行（すべてのセルが空）は行オブジェクトに含めません。
pub(crate) fn build_sheet(sheet_name: String, data: Vec<Vec<CellValue>>) -> SheetData {
    let (header_cells, data_rows) = match data.split_first() {
        Some((first, rest)) => (Some(first.as_slice()), rest),
        None => (None, &[][..]),
    };
    let header_row = build_header(header_cells, data_rows);

    let rows = data_rows
        .iter()
        .filter(|row| row.iter().any(|cell| !cell.is_empty()))
        .map(|row| {
            let mut object = RowObject::with_capacity(row.len());
            for (i, cell) in row.iter().enumerate() {
                match header_row.get(i) {
                    // ヘッダーラベルは重複排除済み
                    Some(label) => object.push_unique(label.clone(), cell.clone()),
                    // 超過列のキーはヘッダーラベルと衝突し得る
                    None => object.insert(overflow_key(i), cell.clone()),
                }
            }
            object
        })
        .collect();

    SheetData {
        sheet_name,
        header_row,
        data,
        rows,
    }
}


// 実際のワークブックを使う解析テストは統合テスト（tests/）で実装します。
