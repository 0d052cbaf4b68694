//! Integration Tests for base64zero
//!
//! デコード→解析→抽出→エクスポートの一連の流れと、エンコード方向の出力を検証します。
//! ワークブックはrust_xlsxwriterでメモリ上に生成します。

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{TimeZone, Utc};
use rust_xlsxwriter::*;
use std::io::{Cursor, Read, Write};
use zip::ZipArchive;

use base64zero::{
    CellValue, ColumnSelection, EncodeMode, ExportFormat, Pipeline, PipelineBuilder,
    PreviewKind,
};

// Helper module for generating test fixtures
mod fixtures {
    use super::*;

    /// Name/Age/Cityの10行を持つSheet1と、空のSheet2
    pub fn generate_people_with_empty_sheet() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();

        let sheet1 = workbook.add_worksheet();
        sheet1.set_name("Sheet1")?;
        sheet1.write_string(0, 0, "Name")?;
        sheet1.write_string(0, 1, "Age")?;
        sheet1.write_string(0, 2, "City")?;
        for i in 1..=10u32 {
            sheet1.write_string(i, 0, format!("Person{}", i))?;
            sheet1.write_number(i, 1, 20.0 + i as f64)?;
            sheet1.write_string(i, 2, if i % 2 == 0 { "Tokyo" } else { "Osaka" })?;
        }

        let sheet2 = workbook.add_worksheet();
        sheet2.set_name("Sheet2")?;

        Ok(workbook.save_to_buffer()?)
    }

    /// 同名ヘッダーが3つ並ぶシート
    pub fn generate_duplicate_headers() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        for col in 0..3u16 {
            worksheet.write_string(0, col, "Name")?;
        }
        worksheet.write_string(1, 0, "a")?;
        worksheet.write_string(1, 1, "b")?;
        worksheet.write_string(1, 2, "c")?;

        Ok(workbook.save_to_buffer()?)
    }

    /// データ行の間に空行を含むシート
    pub fn generate_with_blank_row() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        worksheet.write_string(0, 0, "Item")?;
        worksheet.write_string(0, 1, "Qty")?;
        worksheet.write_string(1, 0, "Apple")?;
        worksheet.write_number(1, 1, 3.0)?;
        // 2行目は空行
        worksheet.write_string(3, 0, "Banana")?;
        worksheet.write_number(3, 1, 5.0)?;

        Ok(workbook.save_to_buffer()?)
    }

    /// 文字列・数値・真偽値・日付を含むシート
    pub fn generate_typed_cells() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Typed")?;

        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        let date = ExcelDateTime::from_ymd(2024, 1, 15)?;

        worksheet.write_string(0, 0, "Label")?;
        worksheet.write_string(0, 1, "Price")?;
        worksheet.write_string(0, 2, "Active")?;
        worksheet.write_string(0, 3, "Since")?;

        worksheet.write_string(1, 0, "Widget")?;
        worksheet.write_number(1, 1, 12.5)?;
        worksheet.write_boolean(1, 2, true)?;
        worksheet.write_datetime_with_format(1, 3, &date, &date_format)?;

        Ok(workbook.save_to_buffer()?)
    }

    /// Sales（5行）、Costs（2行）、Notes（1行）の3シート
    pub fn generate_three_sheets() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();

        let sales = workbook.add_worksheet();
        sales.set_name("Sales")?;
        sales.write_string(0, 0, "Region")?;
        sales.write_string(0, 1, "Amount")?;
        for i in 1..=5u32 {
            sales.write_string(i, 0, format!("R{}", i))?;
            sales.write_number(i, 1, (i * 100) as f64)?;
        }

        let costs = workbook.add_worksheet();
        costs.set_name("Costs")?;
        costs.write_string(0, 0, "Item")?;
        costs.write_string(0, 1, "Cost")?;
        costs.write_string(1, 0, "Rent")?;
        costs.write_number(1, 1, 1000.0)?;
        costs.write_string(2, 0, "Power")?;
        costs.write_number(2, 1, 200.0)?;

        let notes = workbook.add_worksheet();
        notes.set_name("Notes")?;
        notes.write_string(0, 0, "Memo")?;
        notes.write_string(1, 0, "draft")?;

        Ok(workbook.save_to_buffer()?)
    }
}

fn pipeline() -> Pipeline {
    PipelineBuilder::new().build().unwrap()
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn encode_fixture(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// 生のBase64からワークブックを復元し、空のシートは除外される
#[test]
fn test_decode_and_parse_skips_empty_sheet() {
    let xlsx = fixtures::generate_people_with_empty_sheet().unwrap();
    let pipeline = pipeline();

    let payload = pipeline.decode(&encode_fixture(&xlsx)).unwrap();
    assert_eq!(
        payload.mime_type(),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert_eq!(payload.preview_kind(), PreviewKind::Spreadsheet);
    assert_eq!(payload.bytes(), xlsx.as_slice());

    let sheets = pipeline.parse(&payload).unwrap();
    assert_eq!(sheets.len(), 1);
    assert_eq!(sheets[0].sheet_name, "Sheet1");
    assert_eq!(sheets[0].header_row, vec!["Name", "Age", "City"]);
    assert_eq!(sheets[0].total_row_count(), 10);
    assert_eq!(
        sheets[0].rows[0].get("Name"),
        Some(&CellValue::Text("Person1".to_string()))
    );
}

/// 同名ヘッダーには出現順に連番が付く
#[test]
fn test_duplicate_headers_are_suffixed() {
    let xlsx = fixtures::generate_duplicate_headers().unwrap();
    let sheets = base64zero::parse(&xlsx).unwrap();

    assert_eq!(sheets[0].header_row, vec!["Name", "Name_1", "Name_2"]);
    let row = &sheets[0].rows[0];
    assert_eq!(row.get("Name"), Some(&CellValue::Text("a".to_string())));
    assert_eq!(row.get("Name_1"), Some(&CellValue::Text("b".to_string())));
    assert_eq!(row.get("Name_2"), Some(&CellValue::Text("c".to_string())));
}

/// 空行は行オブジェクトに含まれない
#[test]
fn test_blank_rows_are_dropped() {
    let xlsx = fixtures::generate_with_blank_row().unwrap();
    let sheets = base64zero::parse(&xlsx).unwrap();

    assert_eq!(sheets[0].total_row_count(), 2);
    assert_eq!(sheets[0].data.len(), 4);
    assert_eq!(
        sheets[0].rows[1].get("Item"),
        Some(&CellValue::Text("Banana".to_string()))
    );
}

/// 10行のシートに対する範囲の境界
#[test]
fn test_range_boundaries_on_ten_rows() {
    let xlsx = fixtures::generate_people_with_empty_sheet().unwrap();
    let sheets = base64zero::parse(&xlsx).unwrap();
    let sheet = &sheets[0];

    let full = base64zero::validate_range(sheet, "1", "10").unwrap();
    assert_eq!((full.start(), full.end()), (1, 10));

    let open_ended = base64zero::validate_range(sheet, "4", "").unwrap();
    assert_eq!((open_ended.start(), open_ended.end()), (4, 10));

    assert!(matches!(
        base64zero::validate_range(sheet, "1", "11"),
        Err(base64zero::Base64ZeroError::EndExceedsRowCount { end: 11, total: 10 })
    ));
    assert!(matches!(
        base64zero::validate_range(sheet, "11", ""),
        Err(base64zero::Base64ZeroError::StartExceedsRowCount { start: 11, total: 10 })
    ));
    assert!(matches!(
        base64zero::validate_range(sheet, "0", ""),
        Err(base64zero::Base64ZeroError::InvalidStartRow(_))
    ));
    assert!(matches!(
        base64zero::validate_range(sheet, "5", "3"),
        Err(base64zero::Base64ZeroError::InvalidEndRow { start: 5, .. })
    ));
}

/// JSONエクスポートは選択順のキーで、毎回同じバイト列になる
#[test]
fn test_export_sheet_json() {
    let xlsx = fixtures::generate_people_with_empty_sheet().unwrap();
    let pipeline = pipeline();
    let sheets = base64zero::parse(&xlsx).unwrap();

    let selected = columns(&["City", "Name"]);
    let artifact = pipeline
        .export_sheet(&sheets[0], &selected, "2", "3", ExportFormat::Json)
        .unwrap();

    assert_eq!(artifact.name, "Sheet1_rows_2-3_selected_columns.json");
    assert_eq!(artifact.mime_type, "application/json");

    let json = String::from_utf8(artifact.bytes.clone()).unwrap();
    let expected = "[\n  {\n    \"City\": \"Tokyo\",\n    \"Name\": \"Person2\"\n  },\n  {\n    \"City\": \"Osaka\",\n    \"Name\": \"Person3\"\n  }\n]";
    assert_eq!(json, expected);

    let again = pipeline
        .export_sheet(&sheets[0], &selected, "2", "3", ExportFormat::Json)
        .unwrap();
    assert_eq!(artifact.bytes, again.bytes);
}

/// 型付きセルのJSON表現
#[test]
fn test_typed_cells_json() {
    let xlsx = fixtures::generate_typed_cells().unwrap();
    let pipeline = pipeline();
    let sheets = base64zero::parse(&xlsx).unwrap();

    let selected = columns(&["Label", "Price", "Active", "Since"]);
    let artifact = pipeline
        .export_sheet(&sheets[0], &selected, "1", "", ExportFormat::Json)
        .unwrap();

    let value: serde_json::Value = serde_json::from_slice(&artifact.bytes).unwrap();
    assert_eq!(value[0]["Label"], "Widget");
    assert_eq!(value[0]["Price"], 12.5);
    assert_eq!(value[0]["Active"], true);
    assert_eq!(value[0]["Since"], "2024-01-15T00:00:00.000Z");
}

/// XLSXエクスポートを再度解析すると、選択列がヘッダーになっている
#[test]
fn test_export_sheet_xlsx_round_trip() {
    let xlsx = fixtures::generate_people_with_empty_sheet().unwrap();
    let pipeline = pipeline();
    let sheets = base64zero::parse(&xlsx).unwrap();

    let artifact = pipeline
        .export_sheet(&sheets[0], &columns(&["Age", "Name"]), "1", "4", ExportFormat::Xlsx)
        .unwrap();
    assert_eq!(artifact.name, "Sheet1_rows_1-4_selected_columns.xlsx");

    let exported = base64zero::parse(&artifact.bytes).unwrap();
    assert_eq!(exported.len(), 1);
    assert_eq!(exported[0].sheet_name, "Sheet1");
    assert_eq!(exported[0].header_row, vec!["Age", "Name"]);
    assert_eq!(exported[0].total_row_count(), 4);
    assert_eq!(exported[0].rows[3].get("Age"), Some(&CellValue::Number(24.0)));
}

/// 全シートのエクスポートは選択のあるシートのみをソース順にまとめる
#[test]
fn test_export_all_bundles_selected_sheets() {
    let xlsx = fixtures::generate_three_sheets().unwrap();
    let pipeline = pipeline();
    let sheets = base64zero::parse(&xlsx).unwrap();
    let at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 30, 0).unwrap();

    let selection = ColumnSelection::new()
        .with_columns("Costs", ["Item"])
        .with_columns("Sales", ["Amount", "Region"]);

    let bundle = pipeline
        .export_all(&sheets, &selection, "1", "", ExportFormat::Json, at)
        .unwrap();
    assert_eq!(bundle.name, "all_sheets_rows_1-end_20250601123000.zip");
    assert_eq!(bundle.mime_type, "application/zip");

    let mut archive = ZipArchive::new(Cursor::new(bundle.bytes)).unwrap();
    assert_eq!(archive.len(), 2);
    assert_eq!(
        archive.by_index(0).unwrap().name(),
        "Sales_rows_1-5_selected_columns.json"
    );
    assert_eq!(
        archive.by_index(1).unwrap().name(),
        "Costs_rows_1-2_selected_columns.json"
    );

    let mut content = String::new();
    archive
        .by_name("Costs_rows_1-2_selected_columns.json")
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(value, serde_json::json!([{ "Item": "Rent" }, { "Item": "Power" }]));
}

/// 範囲外のシートはスキップされ、残りのシートだけがまとめられる
#[test]
fn test_export_all_skips_sheet_out_of_range() {
    let xlsx = fixtures::generate_three_sheets().unwrap();
    let pipeline = pipeline();
    let sheets = base64zero::parse(&xlsx).unwrap();
    let at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 30, 0).unwrap();

    let selection = ColumnSelection::new()
        .with_columns("Sales", ["Region"])
        .with_columns("Costs", ["Item"]);

    let bundle = pipeline
        .export_all(&sheets, &selection, "2", "4", ExportFormat::Xlsx, at)
        .unwrap();
    assert_eq!(bundle.name, "all_sheets_rows_2-4_20250601123000.zip");

    let mut archive = ZipArchive::new(Cursor::new(bundle.bytes)).unwrap();
    assert_eq!(archive.len(), 1);

    let mut xlsx = Vec::new();
    archive
        .by_name("Sales_rows_2-4_selected_columns.xlsx")
        .unwrap()
        .read_to_end(&mut xlsx)
        .unwrap();
    let exported = base64zero::parse(&xlsx).unwrap();
    assert_eq!(exported[0].total_row_count(), 3);
    assert_eq!(
        exported[0].rows[0].get("Region"),
        Some(&CellValue::Text("R2".to_string()))
    );
}

/// 有効なシートが1つもなければエラー
#[test]
fn test_export_all_without_selection() {
    let xlsx = fixtures::generate_three_sheets().unwrap();
    let pipeline = pipeline();
    let sheets = base64zero::parse(&xlsx).unwrap();

    let result = pipeline.export_all(
        &sheets,
        &ColumnSelection::new(),
        "1",
        "",
        ExportFormat::Json,
        Utc::now(),
    );
    assert!(matches!(
        result,
        Err(base64zero::Base64ZeroError::NoArtifactsToBundle)
    ));
}

/// 8バイトのPNGシグネチャをimgタグにする
#[test]
fn test_png_signature_img_tag() {
    let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    let pipeline = pipeline();

    let payload = pipeline.decode("iVBORw0KGgo=").unwrap();
    assert_eq!(payload.mime_type(), "image/png");
    assert_eq!(payload.bytes(), &png);
    assert_eq!(payload.preview_kind(), PreviewKind::Image);

    assert_eq!(
        pipeline.encode(&png, "", EncodeMode::ImgTag).unwrap(),
        r#"<img src="data:image/png;base64,iVBORw0KGgo=" alt="image" />"#
    );
}

/// エンコード結果を再度デコードすると元のバイト列に戻る
#[test]
fn test_data_uri_round_trip() {
    let xlsx = fixtures::generate_typed_cells().unwrap();
    let pipeline = pipeline();

    let uri = base64zero::to_data_uri(&xlsx, Some("typed.xlsx"));
    assert!(uri.starts_with(
        "data:application/vnd.openxmlformats-officedocument.spreadsheetml.sheet;base64,"
    ));

    let payload = pipeline.decode(&uri).unwrap();
    assert_eq!(payload.bytes(), xlsx.as_slice());
    assert_eq!(pipeline.parse(&payload).unwrap()[0].sheet_name, "Typed");
}

/// アップロードされたファイルから読み込む
#[test]
fn test_read_payload_from_file() {
    let xlsx = fixtures::generate_three_sheets().unwrap();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&xlsx).unwrap();
    file.flush().unwrap();

    let pipeline = pipeline();
    let reader = std::fs::File::open(file.path()).unwrap();
    let payload = pipeline.read_payload(reader, Some("report.xlsx")).unwrap();
    assert!(payload.is_spreadsheet());

    let names: Vec<String> = pipeline
        .parse(&payload)
        .unwrap()
        .into_iter()
        .map(|s| s.sheet_name)
        .collect();
    assert_eq!(names, vec!["Sales", "Costs", "Notes"]);
}

/// エンコード結果の成果物名
#[test]
fn test_encode_artifact_modes() {
    let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    let pipeline = pipeline();
    let at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 30, 0).unwrap();

    let expected = [
        (EncodeMode::PlainText, "logo.txt", "text/plain"),
        (EncodeMode::DataUri, "logo.txt", "text/plain"),
        (EncodeMode::ImgTag, "logo.html", "text/html"),
        (EncodeMode::CssBg, "logo.txt", "text/plain"),
        (EncodeMode::HtmlLink, "logo.html", "text/html"),
        (EncodeMode::Json, "logo.json", "application/json"),
        (EncodeMode::Xml, "logo.xml", "application/xml"),
    ];
    for (mode, name, mime) in expected {
        let artifact = pipeline.encode_artifact(&png, "logo.png", mode, at).unwrap();
        assert_eq!(artifact.name, name, "mode {}", mode);
        assert_eq!(artifact.mime_type, mime, "mode {}", mode);
    }
}
