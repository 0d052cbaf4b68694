//! Header Module
//!
//! ヘッダー行の生成と列ラベルの重複排除。

use std::collections::{HashMap, HashSet};

use crate::types::CellValue;

/// ヘッダー行を生成する
///
/// # 引数
///
/// * `header_cells` - 行列の0行目（存在しない場合は`None`）
/// * `data_rows` - 1行目以降のデータ行
///
/// # 処理
///
/// 1. ヘッダー行が存在しない、またはすべて空の場合、データ行の最大列数`N`（最小1）で
///    `Column 1`..`Column N`を生成します。
/// 2. それ以外は各セルの文字列表現を使用し、空セルは`Column <1始まりの列番号>`で補います。
/// 3. 重複したラベルは出現順に`_1`, `_2`, ...の接尾辞を付けます。
pub(crate) fn build_header(
    header_cells: Option<&[CellValue]>,
    data_rows: &[Vec<CellValue>],
) -> Vec<String> {
    let labels: Vec<String> = match header_cells {
        Some(cells) if cells.iter().any(|c| !c.is_empty()) => cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                if cell.is_empty() {
                    synthetic_label(i)
                } else {
                    cell.as_raw_string()
                }
            })
            .collect(),
        _ => {
            let width = data_rows.iter().map(Vec::len).max().unwrap_or(0).max(1);
            (0..width).map(synthetic_label).collect()
        }
    };

    dedupe(labels)
}

/// 空ヘッダー用のラベル（`Column 1`, `Column 2`, ...）
fn synthetic_label(index: usize) -> String {
    format!("Column {}", index + 1)
}

/// ヘッダー長を超える列のキー（`Col<1始まりの列番号>`）
pub(crate) fn overflow_key(index: usize) -> String {
    format!("Col{}", index + 1)
}

/// ラベルの重複を排除する
///
/// 最初の出現はそのまま、2回目以降は`<label>_<出現回数-1>`になります。
/// 生成したラベルが既存のラベルと衝突する場合は、番号を進めて一意にします。
fn dedupe(labels: Vec<String>) -> Vec<String> {
    let mut occurrences: HashMap<String, usize> = HashMap::new();
    let mut used: HashSet<String> = HashSet::new();
    let mut result = Vec::with_capacity(labels.len());

    for label in labels {
        let count = occurrences.entry(label.clone()).or_insert(0);
        let mut candidate = if *count == 0 {
            label.clone()
        } else {
            format!("{}_{}", label, count)
        };
        while used.contains(&candidate) {
            *count += 1;
            candidate = format!("{}_{}", label, count);
        }
        *count += 1;

        used.insert(candidate.clone());
        result.push(candidate);
    }

    result
}
