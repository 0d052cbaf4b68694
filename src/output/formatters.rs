//! Output Formatters Implementation
//!
//! 各エクスポート形式の実装を提供するモジュール。

use chrono::{NaiveDate, NaiveDateTime};
use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::error::Base64ZeroError;
use crate::types::{CellValue, RowObject};

/// 日時セルの表示書式
const DATETIME_NUM_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// 1日のミリ秒数
const MS_PER_DAY: f64 = 86_400_000.0;

/// JSON形式のフォーマッター
///
/// 2スペースインデントのJSON配列を出力します。キー順は各行の挿入順（選択順）です。
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn render(&self, rows: &[RowObject]) -> Result<Vec<u8>, Base64ZeroError> {
        Ok(serde_json::to_vec_pretty(rows)?)
    }
}

/// XLSX形式のフォーマッター
///
/// 先頭行のキー（出現順）を列とする単一シートのワークブックを出力します。
/// 0行目はヘッダー、1行目以降がデータです。
pub struct XlsxFormatter;

impl XlsxFormatter {
    pub fn render(&self, rows: &[RowObject], sheet_name: &str) -> Result<Vec<u8>, Base64ZeroError> {
        let columns: Vec<&str> = rows.first().map(|r| r.keys().collect()).unwrap_or_default();
        let date_format = Format::new().set_num_format(DATETIME_NUM_FORMAT);

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet_name)?;

        for (col_idx, column) in columns.iter().enumerate() {
            let col = u16::try_from(col_idx).map_err(|_| XlsxError::RowColumnLimitError)?;
            worksheet.write_string(0, col, *column)?;
        }

        for (row_idx, row) in rows.iter().enumerate() {
            let excel_row = u32::try_from(row_idx + 1).map_err(|_| XlsxError::RowColumnLimitError)?;

            for (col_idx, column) in columns.iter().enumerate() {
                let col = u16::try_from(col_idx).map_err(|_| XlsxError::RowColumnLimitError)?;
                match row.get(column) {
                    Some(CellValue::Text(s)) => {
                        worksheet.write_string(excel_row, col, s.as_str())?;
                    }
                    Some(CellValue::Number(n)) => {
                        worksheet.write_number(excel_row, col, *n)?;
                    }
                    Some(CellValue::Bool(b)) => {
                        worksheet.write_boolean(excel_row, col, *b)?;
                    }
                    Some(CellValue::Date(dt)) => {
                        worksheet.write_number_with_format(
                            excel_row,
                            col,
                            excel_serial(dt)?,
                            &date_format,
                        )?;
                    }
                    Some(CellValue::Empty) | None => {}
                }
            }
        }

        Ok(workbook.save_to_buffer()?)
    }
}

/// 行データをJSONバイト列に変換する
///
/// 同じ入力に対しては常にバイト単位で同一の出力になります。
pub fn to_json(rows: &[RowObject]) -> Result<Vec<u8>, Base64ZeroError> {
    JsonFormatter.render(rows)
}

/// 行データを単一シートのXLSXバイト列に変換する
pub fn to_spreadsheet(rows: &[RowObject], sheet_name: &str) -> Result<Vec<u8>, Base64ZeroError> {
    XlsxFormatter.render(rows, sheet_name)
}

/// 日時をExcelのシリアル値（1900年システム）に変換
///
/// 1899-12-30起算。1900-03-01より前の日付はExcelのうるう年バグの分だけずれます。
fn excel_serial(dt: &NaiveDateTime) -> Result<f64, XlsxError> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or(XlsxError::DateTimeRangeError(dt.to_string()))?;
    Ok((*dt - epoch).num_milliseconds() as f64 / MS_PER_DAY)
}
