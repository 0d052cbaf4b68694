//! Parser Module
//!
//! calamineを使用したスプレッドシート解析の実装。
//! バイト列から、シートごとのヘッダー行・生のセル行列・行オブジェクトを抽出します。

mod header;
mod workbook;

pub use workbook::parse;
