use labview_xlsx::chart::YAxis;
use labview_xlsx::timestamp::{INVALID_TIMESTAMP_TEXT, LABVIEW_EPOCH};
use labview_xlsx::{
    COLUMNS, CellValue, ConvertOptions, MemorySheet, ProcessingSummary, convert_text,
    convert_upload, emit_rows,
};

// Helper: run the pipeline into an in-memory sheet
fn run(text: &str) -> (MemorySheet, ProcessingSummary) {
    let options = ConvertOptions::default();
    let mut sheet = MemorySheet::new(&options.sheet_name);
    let summary = emit_rows(text, &mut sheet, &options).unwrap();
    (sheet, summary)
}

// Helper: check a single cell
fn assert_cell(sheet: &MemorySheet, row: u32, col: u16, expected: &CellValue) {
    let cell = sheet.cell(row, col);
    assert_eq!(cell, Some(expected), "cell ({}, {})", row, col);
    println!("✓ Cell ({}, {}) holds {:?} as expected", row, col, expected);
}

#[test]
fn header_is_written_and_frozen() {
    let (sheet, _) = run("");
    let titles: Vec<&str> = COLUMNS.iter().map(|c| c.title).collect();
    assert_eq!(sheet.headers, titles);
    assert_eq!(
        sheet.headers,
        vec!["timestamp", "tensione (mV)", "temperatura (°C)"]
    );
    assert_eq!(sheet.column_widths, vec![23.0, 15.0, 18.0]);
    assert_eq!(sheet.frozen_rows, 1);
    println!("✓ Header row written with fixed titles and widths");
}

#[test]
fn reference_line_is_fully_valid() {
    let (sheet, summary) = run("0;100,0;ignored;25,50\n");

    assert_cell(&sheet, 1, 0, &CellValue::DateTime(LABVIEW_EPOCH.naive_utc()));
    assert_cell(&sheet, 1, 1, &CellValue::Number(100.0));
    assert_cell(&sheet, 1, 2, &CellValue::Number(25.5));
    assert_eq!(summary.lines_processed, 1);
    assert_eq!(summary.error_count(), 0);
    assert_eq!(summary.max_valid_data_row, Some(1));
}

#[test]
fn short_lines_emit_nothing_and_count_once() {
    let (sheet, summary) = run("1;2;3\nonly one field\n");

    assert_eq!(sheet.data_row_count(), 0);
    assert_eq!(summary.malformed_lines, 2);
    assert_eq!(summary.error_count(), 2);
    assert_eq!(summary.lines_processed, 0);
    println!("✓ Malformed lines skipped and counted");
}

#[test]
fn blank_lines_are_not_errors() {
    let (sheet, summary) = run("\n   \n0;1;2;3\r\n\r\n");
    assert_eq!(sheet.data_row_count(), 1);
    assert_eq!(summary.error_count(), 0);
}

#[test]
fn zero_valid_rows_means_header_only_and_no_chart() {
    let (sheet, summary) = run("a;b;c\n");
    assert_eq!(sheet.data_row_count(), 0);
    assert!(sheet.chart.is_none());
    assert!(!summary.has_chart_data());
}

#[test]
fn invalid_rows_stay_visible_but_off_the_chart() {
    let text = "\
0;10;x;20
bad;11;x;21
2;1,2,3;x;22
3;13;x;n/a
";
    let (sheet, summary) = run(text);

    assert_eq!(sheet.data_row_count(), 4);
    assert_cell(&sheet, 2, 0, &CellValue::Text(INVALID_TIMESTAMP_TEXT.to_string()));
    assert_cell(&sheet, 2, 1, &CellValue::Number(11.0));
    assert_cell(&sheet, 3, 1, &CellValue::Text("1.2.3".to_string()));
    assert_cell(&sheet, 4, 2, &CellValue::Text("n/a".to_string()));

    assert_eq!(summary.lines_processed, 4);
    assert_eq!(summary.invalid_timestamps, 1);
    assert_eq!(summary.invalid_numerics, 2);
    assert_eq!(summary.max_valid_data_row, Some(1));

    let chart = sheet.chart.expect("row 1 is valid");
    assert_eq!(chart.series[0].values.formula(), "='Sheet1'!$B$2:$B$2");
    println!("✓ Only the valid prefix is charted");
}

#[test]
fn chart_bound_follows_last_valid_row_not_last_row() {
    let text = "0;1;x;1\nbad;2;x;2\n2;3;x;3\n3;oops;x;4\n";
    let (sheet, summary) = run(text);

    assert_eq!(summary.max_valid_data_row, Some(3));
    let chart = sheet.chart.unwrap();
    assert_eq!(chart.series[0].categories.formula(), "='Sheet1'!$A$2:$A$4");
    assert_eq!(chart.series[1].values.formula(), "='Sheet1'!$C$2:$C$4");
    assert_eq!(chart.series[1].y_axis, YAxis::Secondary);
}

#[test]
fn malformed_lines_do_not_leave_gaps() {
    let (sheet, summary) = run("0;1;x;1\n1;2\n2;3;x;3\n");

    assert_cell(&sheet, 2, 1, &CellValue::Number(3.0));
    assert!(sheet.cell(3, 0).is_none());
    assert_eq!(summary.max_valid_data_row, Some(2));
}

#[test]
fn negative_readings_lose_their_sign() {
    let (sheet, _) = run("0;-12,5;x;-3\n");
    assert_cell(&sheet, 1, 1, &CellValue::Number(12.5));
    assert_cell(&sheet, 1, 2, &CellValue::Number(3.0));
}

#[test]
fn separate_runs_share_no_state() {
    let (_, first) = run("0;1;x;1\n1;2;x;2\n");
    let (_, second) = run("0;1;x;1\n");
    assert_eq!(first.max_valid_data_row, Some(2));
    assert_eq!(second.max_valid_data_row, Some(1));
    assert_eq!(second.lines_processed, 1);
}

#[test]
fn xlsx_output_is_a_zip_archive() {
    let conversion = convert_text("0;100,0;x;25,50\n1;101;x;26\n", &ConvertOptions::default())
        .unwrap();
    assert!(conversion.bytes.starts_with(b"PK\x03\x04"));
    assert_eq!(conversion.summary.max_valid_data_row, Some(2));

    let empty = convert_text("", &ConvertOptions::default()).unwrap();
    assert!(empty.bytes.starts_with(b"PK\x03\x04"));
    println!("✓ Workbooks produced with and without a chart");
}

#[test]
fn custom_sheet_name_flows_into_chart_references() {
    let options = ConvertOptions {
        sheet_name: "Misure".to_string(),
        ..ConvertOptions::default()
    };
    let mut sheet = MemorySheet::new(&options.sheet_name);
    emit_rows("0;1;x;2\n", &mut sheet, &options).unwrap();
    let chart = sheet.chart.unwrap();
    assert_eq!(chart.series[0].name.formula(), "='Misure'!$B$1");

    assert!(convert_text("0;1;x;2\n", &options).is_ok());
}

#[test]
fn latin1_upload_written_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("sonda.txt");
    std::fs::write(&input, b"0;1,5;\xb0;2,5\n").unwrap();

    let bytes = std::fs::read(&input).unwrap();
    let file = convert_upload(&bytes, "sonda.txt", &ConvertOptions::default()).unwrap();
    assert_eq!(file.filename, "sonda.xlsx");

    let output = dir.path().join(&file.filename);
    std::fs::write(&output, &file.bytes).unwrap();
    assert!(output.exists());
    assert_eq!(file.summary.error_count(), 0);
}
