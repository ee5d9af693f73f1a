use dossier_sheet::{CellValue, Sheet, SheetError};
use tempfile::tempdir;

// ===== Sheet Creation Tests =====

#[test]
fn test_sheet_from_strings() {
    let sheet = Sheet::from_data(vec![
        vec!["姓名", "生源地名称", "身份证号"],
        vec!["张三", "浙江省杭州市", "110101200001010011"],
    ]);

    assert_eq!(sheet.row_count(), 2);
    assert_eq!(sheet.col_count(), 3);
    assert_eq!(
        sheet.get(0, 0).unwrap(),
        &CellValue::String("姓名".to_string())
    );
}

// ===== Row Operations Tests =====

#[test]
fn test_rebuild_after_header() {
    let mut sheet = Sheet::from_data(vec![
        vec!["姓名", "班级"],
        vec!["旧数据", "1班"],
        vec!["旧数据", "2班"],
    ]);

    sheet.truncate_rows(1);
    sheet.row_append(vec!["张三", "3班"]).unwrap();

    assert_eq!(sheet.row_count(), 2);
    assert_eq!(sheet.get(1, 0).unwrap().as_str(), "张三");
}

#[test]
fn test_row_length_mismatch() {
    let mut sheet = Sheet::from_data(vec![vec![1, 2, 3]]);

    let result = sheet.row_append(vec![1, 2]);
    assert!(matches!(result, Err(SheetError::LengthMismatch { .. })));
}

// ===== File Round Trips =====

#[test]
fn test_xlsx_round_trip_keeps_text_identifiers() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("records.xlsx");

    let sheet = Sheet::from_data(vec![
        vec!["姓名", "转递编号"],
        vec!["张三", "000123"],
    ]);
    sheet.save_as_xlsx(&path).unwrap();

    let loaded = Sheet::from_xlsx(&path).unwrap();
    assert_eq!(loaded.get(1, 1).unwrap().as_str(), "000123");
}

#[test]
fn test_xlsx_unknown_sheet_is_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("one.xlsx");
    Sheet::from_data(vec![vec!["a"]]).save_as_xlsx(&path).unwrap();

    let result = Sheet::from_xlsx_sheet(&path, "missing");
    assert!(matches!(result, Err(SheetError::Workbook(_))));
}
