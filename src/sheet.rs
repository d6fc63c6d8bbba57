use std::collections::BTreeMap;

use rust_xlsxwriter::{
    Chart, ChartAxis, ChartAxisTickType, ChartFormat, ChartLegendPosition, ChartLine, ChartLineDashType,
    ChartMarker, ChartType, Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError,
};

use crate::cell::CellValue;
use crate::chart::{AxisSpec, ChartSpec, Gridlines, SeriesColor, YAxis};
use crate::error::ConvertError;

/// Number format of the timestamp column
pub const DATE_FORMAT: &str = "yyyy-mm-dd hh:mm:ss.000";

/// Last 0-based row of an xlsx worksheet (1,048,576 rows in total)
pub const XLSX_MAX_ROW: u32 = 1_048_575;

/// A fixed output column: header title and width in characters
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnSpec {
    pub title: &'static str,
    pub width: f64,
}

/// The cell/chart surface the row emitter writes into.
pub trait SheetWriter {
    fn sheet_name(&self) -> &str;

    /// Highest 0-based row this sheet can hold
    fn max_row(&self) -> u32 {
        XLSX_MAX_ROW
    }

    /// Writes the header row, freezes it and sets column widths
    fn write_header(&mut self, columns: &[ColumnSpec]) -> Result<(), ConvertError>;

    fn write_cell(&mut self, row: u32, col: u16, value: &CellValue) -> Result<(), ConvertError>;

    fn insert_chart(&mut self, chart: &ChartSpec) -> Result<(), ConvertError>;
}

/// Writes into a real xlsx worksheet
pub struct XlsxSheet {
    name: String,
    worksheet: Worksheet,
    header_format: Format,
    date_format: Format,
}

impl XlsxSheet {
    pub fn new(name: &str) -> Result<Self, ConvertError> {
        let mut worksheet = Worksheet::new();
        worksheet.set_name(name)?;

        Ok(XlsxSheet {
            name: name.to_string(),
            worksheet,
            header_format: Format::new()
                .set_bold()
                .set_background_color("#DDEBF7")
                .set_border(FormatBorder::Thin),
            date_format: Format::new()
                .set_num_format(DATE_FORMAT)
                .set_align(FormatAlign::Left),
        })
    }

    /// Packs the worksheet into a workbook and serializes it to xlsx bytes
    pub fn finish(self) -> Result<Vec<u8>, ConvertError> {
        let mut workbook = Workbook::new();
        workbook.push_worksheet(self.worksheet);

        let buffer = workbook.save_to_buffer()?;
        Ok(buffer)
    }
}

impl SheetWriter for XlsxSheet {
    fn sheet_name(&self) -> &str {
        &self.name
    }

    fn write_header(&mut self, columns: &[ColumnSpec]) -> Result<(), ConvertError> {
        for (col, column) in columns.iter().enumerate() {
            let col = col as u16;
            self.worksheet
                .write_string_with_format(0, col, column.title, &self.header_format)?;
            self.worksheet.set_column_width(col, column.width)?;
        }
        self.worksheet.set_freeze_panes(1, 0)?;
        Ok(())
    }

    fn write_cell(&mut self, row: u32, col: u16, value: &CellValue) -> Result<(), ConvertError> {
        match value {
            CellValue::DateTime(instant) => {
                self.worksheet
                    .write_datetime_with_format(row, col, instant, &self.date_format)?;
            }
            CellValue::Number(number) => {
                self.worksheet.write_number(row, col, *number)?;
            }
            CellValue::Text(text) => {
                self.worksheet.write_string(row, col, text)?;
            }
        }
        Ok(())
    }

    fn insert_chart(&mut self, spec: &ChartSpec) -> Result<(), ConvertError> {
        let chart = build_chart(spec);
        let (row, col) = spec.anchor;
        self.worksheet.insert_chart(row, col, &chart)?;
        Ok(())
    }
}

fn build_chart(spec: &ChartSpec) -> Chart {
    let mut chart = Chart::new(ChartType::ScatterStraightWithMarkers);
    chart.title().set_name(spec.title.as_str());
    chart.set_width(spec.width).set_height(spec.height);

    for series in &spec.series {
        chart
            .add_series()
            .set_name(series.name.formula().as_str())
            .set_categories(series.categories.formula().as_str())
            .set_values(series.values.formula().as_str())
            .set_format(
                ChartFormat::new().set_line(ChartLine::new().set_color(color(series.color))),
            )
            .set_marker(ChartMarker::new().set_none())
            .set_secondary_axis(series.y_axis == YAxis::Secondary);
    }

    let x_axis = chart.x_axis();
    x_axis
        .set_name(spec.x_axis.title.as_str())
        .set_date_axis(true)
        .set_num_format(&spec.x_axis.num_format)
        .set_major_tick_type(ChartAxisTickType::Cross)
        .set_minor_tick_type(ChartAxisTickType::None);
    if let Some(dash) = dash_type(spec.x_axis.gridlines) {
        x_axis
            .set_major_gridlines(true)
            .set_major_gridlines_line(ChartLine::new().set_dash_type(dash));
    }

    style_value_axis(chart.y_axis(), &spec.y_axis);
    style_value_axis(chart.y2_axis(), &spec.y2_axis);

    chart.legend().set_position(ChartLegendPosition::Top);
    chart
}

fn style_value_axis(axis: &mut ChartAxis, spec: &AxisSpec) {
    axis.set_name(spec.title.as_str());
    match dash_type(spec.gridlines) {
        Some(dash) => {
            axis.set_major_gridlines(true)
                .set_major_gridlines_line(ChartLine::new().set_dash_type(dash));
        }
        None => {
            axis.set_major_gridlines(false);
        }
    }
    if let Some(line_color) = spec.line_color {
        axis.set_format(
            ChartFormat::new().set_line(ChartLine::new().set_color(color(line_color))),
        );
    }
}

fn dash_type(gridlines: Gridlines) -> Option<ChartLineDashType> {
    match gridlines {
        Gridlines::Hidden => None,
        Gridlines::Dash => Some(ChartLineDashType::Dash),
        Gridlines::LongDash => Some(ChartLineDashType::LongDash),
    }
}

fn color(color: SeriesColor) -> Color {
    match color {
        SeriesColor::Blue => Color::Blue,
        SeriesColor::Red => Color::Red,
    }
}

/// Records everything written to it. Backs the dry-run report and the tests.
#[derive(Debug, Default)]
pub struct MemorySheet {
    pub name: String,
    pub headers: Vec<String>,
    pub column_widths: Vec<f64>,
    pub frozen_rows: u32,
    pub cells: BTreeMap<(u32, u16), CellValue>,
    pub chart: Option<ChartSpec>,
    pub max_row: u32,
}

impl MemorySheet {
    pub fn new(name: &str) -> Self {
        MemorySheet {
            name: name.to_string(),
            max_row: XLSX_MAX_ROW,
            ..Default::default()
        }
    }

    /// Shrinks the sheet so the row limit can be hit cheaply
    pub fn with_max_row(mut self, max_row: u32) -> Self {
        self.max_row = max_row;
        self
    }

    pub fn cell(&self, row: u32, col: u16) -> Option<&CellValue> {
        self.cells.get(&(row, col))
    }

    /// Number of rows holding at least one data cell, header excluded
    pub fn data_row_count(&self) -> usize {
        let mut rows: Vec<u32> = self.cells.keys().map(|(row, _)| *row).collect();
        rows.dedup();
        rows.len()
    }
}

impl SheetWriter for MemorySheet {
    fn sheet_name(&self) -> &str {
        &self.name
    }

    fn max_row(&self) -> u32 {
        self.max_row
    }

    fn write_header(&mut self, columns: &[ColumnSpec]) -> Result<(), ConvertError> {
        self.headers = columns.iter().map(|c| c.title.to_string()).collect();
        self.column_widths = columns.iter().map(|c| c.width).collect();
        self.frozen_rows = 1;
        Ok(())
    }

    fn write_cell(&mut self, row: u32, col: u16, value: &CellValue) -> Result<(), ConvertError> {
        if row > self.max_row {
            return Err(ConvertError::Workbook(XlsxError::RowColumnLimitError));
        }
        self.cells.insert((row, col), value.clone());
        Ok(())
    }

    fn insert_chart(&mut self, chart: &ChartSpec) -> Result<(), ConvertError> {
        self.chart = Some(chart.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ChartOptions, compose_chart};

    const COLUMNS: [ColumnSpec; 2] = [
        ColumnSpec {
            title: "a",
            width: 10.0,
        },
        ColumnSpec {
            title: "b",
            width: 12.0,
        },
    ];

    #[test]
    fn xlsx_sheet_produces_a_zip_container() {
        let mut sheet = XlsxSheet::new("Sheet1").unwrap();
        sheet.write_header(&COLUMNS).unwrap();
        sheet.write_cell(1, 0, &CellValue::Number(1.5)).unwrap();
        sheet
            .write_cell(1, 1, &CellValue::Text("Timestamp Invalido".to_string()))
            .unwrap();
        let chart = compose_chart("Sheet1", Some(1), &ChartOptions::default()).unwrap();
        sheet.insert_chart(&chart).unwrap();

        let bytes = sheet.finish().unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn invalid_sheet_name_is_rejected() {
        assert!(matches!(
            XlsxSheet::new("bad/name"),
            Err(ConvertError::Workbook(_))
        ));
    }

    #[test]
    fn memory_sheet_records_writes() {
        let mut sheet = MemorySheet::new("Data");
        sheet.write_header(&COLUMNS).unwrap();
        sheet.write_cell(1, 1, &CellValue::Number(2.0)).unwrap();
        sheet.write_cell(1, 0, &CellValue::Number(1.0)).unwrap();
        sheet.write_cell(2, 0, &CellValue::Number(3.0)).unwrap();

        assert_eq!(sheet.headers, vec!["a", "b"]);
        assert_eq!(sheet.frozen_rows, 1);
        assert_eq!(sheet.cell(1, 1), Some(&CellValue::Number(2.0)));
        assert_eq!(sheet.data_row_count(), 2);
        assert!(sheet.chart.is_none());
    }
}
