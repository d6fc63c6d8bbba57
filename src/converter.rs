//! Row emitter: turns decoded log text into sheet rows and a chart.
//!
//! Every call owns its own counters and writer; nothing is shared between
//! conversions, so concurrent callers each get an independent pipeline.

use std::path::Path;

use serde::Serialize;

use crate::cell::ParsedRow;
use crate::chart::{self, ChartOptions, FIRST_DATA_ROW};
use crate::decode::decode_text;
use crate::error::{ConvertError, LineIssue};
use crate::line::{self, ParsedLine};
use crate::sheet::{ColumnSpec, SheetWriter, XlsxSheet};

/// Output columns, in sheet order
pub const COLUMNS: [ColumnSpec; 3] = [
    ColumnSpec {
        title: "timestamp",
        width: 23.0,
    },
    ColumnSpec {
        title: "tensione (mV)",
        width: 15.0,
    },
    ColumnSpec {
        title: "temperatura (°C)",
        width: 18.0,
    },
];

pub const XLSX_EXTENSION: &str = "xlsx";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConvertOptions {
    pub sheet_name: String,
    pub chart: ChartOptions,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            sheet_name: "Sheet1".to_string(),
            chart: ChartOptions::default(),
        }
    }
}

/// Counters for one conversion run
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProcessingSummary {
    /// Rows written to the sheet, whether or not every field decoded
    pub lines_processed: usize,
    pub malformed_lines: usize,
    pub invalid_timestamps: usize,
    /// Failed voltage or temperature fields (a line can add two)
    pub invalid_numerics: usize,
    /// Parsed lines dropped because the sheet was full or the write failed
    pub rows_not_written: usize,
    /// Highest 0-based sheet row whose three fields all decoded
    pub max_valid_data_row: Option<u32>,
}

impl ProcessingSummary {
    pub fn record(&mut self, issue: LineIssue) {
        match issue {
            LineIssue::MalformedLine => self.malformed_lines += 1,
            LineIssue::InvalidTimestamp => self.invalid_timestamps += 1,
            LineIssue::InvalidNumeric => self.invalid_numerics += 1,
            LineIssue::RowNotWritten => self.rows_not_written += 1,
        }
    }

    /// Every skipped line and failed field, each counted once
    pub fn error_count(&self) -> usize {
        self.malformed_lines
            + self.invalid_timestamps
            + self.invalid_numerics
            + self.rows_not_written
    }

    pub fn has_chart_data(&self) -> bool {
        self.max_valid_data_row.is_some()
    }

    fn record_row(&mut self, row: &ParsedRow) {
        if !row.timestamp.is_typed() {
            self.record(LineIssue::InvalidTimestamp);
        }
        for measurement in [&row.voltage, &row.temperature] {
            if !measurement.is_typed() {
                self.record(LineIssue::InvalidNumeric);
            }
        }
        if row.is_fully_valid() {
            self.max_valid_data_row = Some(row.row_index);
        }
        self.lines_processed += 1;
    }
}

/// Writes header, rows and (when possible) the chart into `writer`.
///
/// Per-line problems never end the run. Lines past the sheet's last row and
/// rows whose cells cannot be written are dropped and counted; only header
/// and chart failures are returned as errors.
///
/// # Arguments
/// * `text` - Decoded log content
/// * `writer` - Sheet to fill
/// * `options` - Chart layout
///
/// # Returns
/// * `Result<ProcessingSummary, ConvertError>` - Counters for the run
///
/// # Examples
/// ```
/// use labview_xlsx::{ConvertOptions, MemorySheet, emit_rows};
///
/// let options = ConvertOptions::default();
/// let mut sheet = MemorySheet::new("Sheet1");
/// let summary = emit_rows("0;100,0;x;25,50\n1;2\n", &mut sheet, &options).unwrap();
///
/// assert_eq!(summary.lines_processed, 1);
/// assert_eq!(summary.error_count(), 1);
/// assert!(sheet.chart.is_some());
/// ```
pub fn emit_rows<W: SheetWriter>(
    text: &str,
    writer: &mut W,
    options: &ConvertOptions,
) -> Result<ProcessingSummary, ConvertError> {
    let mut summary = ProcessingSummary::default();
    writer.write_header(&COLUMNS)?;

    let max_row = writer.max_row();
    let mut row_index = FIRST_DATA_ROW;
    for (line_number, raw_line) in line::split_lines(text).enumerate() {
        let fields = match line::parse_line(raw_line) {
            ParsedLine::Blank => continue,
            ParsedLine::Malformed { field_count } => {
                log::debug!(
                    "line {}: {} field(s), need {}",
                    line_number + 1,
                    field_count,
                    line::MIN_FIELDS
                );
                summary.record(LineIssue::MalformedLine);
                continue;
            }
            ParsedLine::Record(fields) => fields,
        };

        if row_index > max_row {
            if summary.rows_not_written == 0 {
                log::warn!(
                    "sheet is full at row {}, dropping line {} and the rest",
                    max_row + 1,
                    line_number + 1
                );
            }
            summary.record(LineIssue::RowNotWritten);
            continue;
        }

        let row = ParsedRow::from_fields(row_index, &fields);
        if let Err(e) = write_row(writer, &row) {
            log::warn!("line {}: row not written: {}", line_number + 1, e);
            summary.record(LineIssue::RowNotWritten);
            continue;
        }
        summary.record_row(&row);
        row_index += 1;
    }

    match chart::compose_chart(
        writer.sheet_name(),
        summary.max_valid_data_row,
        &options.chart,
    ) {
        Some(spec) => writer.insert_chart(&spec)?,
        None => log::warn!("no fully valid rows, chart omitted"),
    }

    Ok(summary)
}

fn write_row<W: SheetWriter>(writer: &mut W, row: &ParsedRow) -> Result<(), ConvertError> {
    for (col, value) in row.cells().into_iter().enumerate() {
        writer.write_cell(row.row_index, col as u16, value)?;
    }
    Ok(())
}

/// The finished spreadsheet for one input
#[derive(Debug)]
pub struct Conversion {
    pub bytes: Vec<u8>,
    pub summary: ProcessingSummary,
}

/// Converts decoded log text into a finished xlsx workbook.
///
/// # Arguments
/// * `text` - Decoded log content
/// * `options` - Sheet name and chart layout
///
/// # Returns
/// * `Result<Conversion, ConvertError>` - Workbook bytes and the run's counters
///
/// # Examples
/// ```
/// use labview_xlsx::{ConvertOptions, convert_text};
///
/// let conversion = convert_text("0;100,0;x;25,50\n", &ConvertOptions::default()).unwrap();
///
/// assert!(conversion.bytes.starts_with(b"PK"));
/// assert_eq!(conversion.summary.lines_processed, 1);
/// assert_eq!(conversion.summary.max_valid_data_row, Some(1));
/// ```
pub fn convert_text(text: &str, options: &ConvertOptions) -> Result<Conversion, ConvertError> {
    let mut sheet = XlsxSheet::new(&options.sheet_name)?;
    let summary = emit_rows(text, &mut sheet, options)?;
    let bytes = sheet.finish()?;

    log::info!(
        "rows processed: {}, rows with errors/skipped: {}",
        summary.lines_processed,
        summary.error_count()
    );
    Ok(Conversion { bytes, summary })
}

/// A converted upload, ready to hand back to the requester
#[derive(Debug)]
pub struct ConvertedFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
    pub summary: ProcessingSummary,
}

/// Decodes an uploaded log and converts it
pub fn convert_upload(
    bytes: &[u8],
    original_filename: &str,
    options: &ConvertOptions,
) -> Result<ConvertedFile, ConvertError> {
    let text = decode_text(bytes)?;
    let filename = output_filename(original_filename);
    log::info!("converting {} -> {}", original_filename, filename);

    let conversion = convert_text(&text, options)?;
    Ok(ConvertedFile {
        filename,
        content_type: XLSX_CONTENT_TYPE,
        bytes: conversion.bytes,
        summary: conversion.summary,
    })
}

/// Base name of the upload with its last extension replaced by `.xlsx`
pub fn output_filename(original: &str) -> String {
    // uploads from Windows browsers may carry backslash-separated paths
    let name = original.rsplit(['/', '\\']).next().unwrap_or(original);
    let stem = Path::new(name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or("output");
    format!("{}.{}", stem, XLSX_EXTENSION)
}
