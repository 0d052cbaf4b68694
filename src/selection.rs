//! Row/Column Selector Module
//!
//! 1始まり・両端を含む行範囲の検証と、選択列による行の絞り込みを行うモジュール。
//! 範囲は暗黙に丸められることはなく、不正な値はエラーとして返されます。

use std::collections::{HashMap, HashSet};

use crate::error::Base64ZeroError;
use crate::types::{RowObject, RowRange, SheetData};

/// 行範囲を検証する
///
/// # 引数
///
/// * `sheet` - 対象シート（行数の基準）
/// * `start` - 開始行（1始まりの正の整数）
/// * `end` - 終了行（空の場合はシートの行数）
///
/// # エラー
///
/// 以下の順で検証します。
///
/// * `InvalidStartRow` - `start`が正の整数でない
/// * `InvalidEndRow` - `end`が指定され、整数でないか`start`より小さい
/// * `StartExceedsRowCount` - `start`が行数を超える
/// * `EndExceedsRowCount` - `end`が行数を超える
///
/// # 使用例
///
/// ```rust,no_run
/// use base64zero::{validate_range, SheetData};
///
/// # fn demo(sheet: &SheetData) -> Result<(), base64zero::Base64ZeroError> {
/// let range = validate_range(sheet, "2", "")?;
/// assert_eq!(range.end(), sheet.total_row_count());
/// # Ok(())
/// # }
/// ```
pub fn validate_range(
    sheet: &SheetData,
    start: &str,
    end: &str,
) -> Result<RowRange, Base64ZeroError> {
    let total = sheet.total_row_count();

    let start_row = match start.trim().parse::<usize>() {
        Ok(n) if n >= 1 => n,
        _ => return Err(Base64ZeroError::InvalidStartRow(start.to_string())),
    };

    let end_row = if end.trim().is_empty() {
        total
    } else {
        match end.trim().parse::<usize>() {
            Ok(n) if n >= start_row => n,
            _ => {
                return Err(Base64ZeroError::InvalidEndRow {
                    end: end.to_string(),
                    start: start_row,
                })
            }
        }
    };

    if start_row > total {
        return Err(Base64ZeroError::StartExceedsRowCount {
            start: start_row,
            total,
        });
    }
    if end_row > total {
        return Err(Base64ZeroError::EndExceedsRowCount { end: end_row, total });
    }

    Ok(RowRange::new(start_row, end_row))
}

/// 範囲内の行を選択列で絞り込む
///
/// 出力される各行は、選択列のうち行に存在するキーのみを選択順に含みます。
/// 結果が空になった行は除外されます。行の順序はソース順のままです。
///
/// # エラー
///
/// * `NoColumnsSelected` - `selected_columns`が空
/// * `NoDataInSelection` - 絞り込みの結果が空
pub fn filter_rows(
    sheet: &SheetData,
    selected_columns: &[String],
    range: RowRange,
) -> Result<Vec<RowObject>, Base64ZeroError> {
    if selected_columns.is_empty() {
        return Err(Base64ZeroError::NoColumnsSelected(sheet.sheet_name.clone()));
    }

    // 選択列の重複を除き、ヘッダー上の位置を一度だけ求めておく
    let positions: HashMap<&str, usize> = sheet
        .header_row
        .iter()
        .enumerate()
        .map(|(i, label)| (label.as_str(), i))
        .collect();
    let mut seen = HashSet::new();
    let columns: Vec<(&String, Option<usize>)> = selected_columns
        .iter()
        .filter(|column| seen.insert(column.as_str()))
        .map(|column| (column, positions.get(column.as_str()).copied()))
        .collect();

    let (first, last) = range.to_indices();
    let filtered: Vec<RowObject> = sheet
        .rows
        .iter()
        .skip(first)
        .take(last + 1 - first)
        .filter_map(|row| {
            let mut object = RowObject::with_capacity(columns.len());
            for (column, position) in &columns {
                let value = match position {
                    Some(i) => row.get_at(*i, column),
                    None => row.get(column),
                };
                if let Some(value) = value {
                    object.push_unique((*column).clone(), value.clone());
                }
            }
            (!object.is_empty()).then_some(object)
        })
        .collect();

    if filtered.is_empty() {
        return Err(Base64ZeroError::NoDataInSelection(sheet.sheet_name.clone()));
    }
    Ok(filtered)
}
