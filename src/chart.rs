//! Description of the voltage/temperature chart.
//!
//! [`compose_chart`] is a pure function of the sheet name and the last fully
//! valid data row. Nothing here touches the workbook; the writer in
//! [`crate::sheet`] turns a [`ChartSpec`] into an actual chart.

use serde::Serialize;

/// Sheet column holding the timestamps (the shared X axis)
pub const TIMESTAMP_COLUMN: u16 = 0;
pub const VOLTAGE_COLUMN: u16 = 1;
pub const TEMPERATURE_COLUMN: u16 = 2;

/// First sheet row holding data (0-based; row 0 is the header)
pub const FIRST_DATA_ROW: u32 = 1;

/// Layout knobs for the chart
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartOptions {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Top-left cell of the chart, 0-based (row, col)
    pub anchor: (u32, u16),
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: "Tensione e temperatura nel tempo".to_string(),
            width: 1000,
            height: 600,
            anchor: (0, 4),
        }
    }
}

/// Which vertical axis a series is plotted against
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum YAxis {
    Primary,
    Secondary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SeriesColor {
    Blue,
    Red,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Gridlines {
    Hidden,
    Dash,
    LongDash,
}

/// A single cell on a named sheet, 0-based
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CellRef {
    pub sheet: String,
    pub row: u32,
    pub col: u16,
}

impl CellRef {
    /// Absolute formula reference, e.g. `='Sheet1'!$B$1`
    pub fn formula(&self) -> String {
        format!(
            "={}!${}${}",
            quote_sheet_name(&self.sheet),
            column_letter(self.col),
            self.row + 1
        )
    }
}

/// A vertical run of cells in one column, 0-based and inclusive
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CellRange {
    pub sheet: String,
    pub col: u16,
    pub first_row: u32,
    pub last_row: u32,
}

impl CellRange {
    /// Absolute formula reference, e.g. `='Sheet1'!$A$2:$A$10`
    pub fn formula(&self) -> String {
        let col = column_letter(self.col);
        format!(
            "={}!${}${}:${}${}",
            quote_sheet_name(&self.sheet),
            col,
            self.first_row + 1,
            col,
            self.last_row + 1
        )
    }

    pub fn point_count(&self) -> u32 {
        self.last_row - self.first_row + 1
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SeriesSpec {
    /// Header cell the series takes its legend name from
    pub name: CellRef,
    pub categories: CellRange,
    pub values: CellRange,
    pub y_axis: YAxis,
    pub color: SeriesColor,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AxisSpec {
    pub title: String,
    pub gridlines: Gridlines,
    pub line_color: Option<SeriesColor>,
}

/// The X axis carries dates, so it also gets a number format
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimeAxisSpec {
    pub title: String,
    pub num_format: String,
    pub gridlines: Gridlines,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub anchor: (u32, u16),
    pub x_axis: TimeAxisSpec,
    pub y_axis: AxisSpec,
    pub y2_axis: AxisSpec,
    /// Voltage first, then temperature
    pub series: Vec<SeriesSpec>,
}

/// Builds the chart over rows `FIRST_DATA_ROW..=max_valid_data_row`.
///
/// Returns `None` when no fully valid data row exists. A single valid row
/// still yields a one-point range.
///
/// # Arguments
/// * `sheet_name` - Sheet the series formulas point at
/// * `max_valid_data_row` - Highest 0-based row whose three cells all decoded
/// * `options` - Title, size and anchor
///
/// # Returns
/// * `Option<ChartSpec>` - Voltage on the primary axis, temperature on the secondary
///
/// # Examples
/// ```
/// use labview_xlsx::{ChartOptions, compose_chart};
///
/// let spec = compose_chart("Sheet1", Some(3), &ChartOptions::default()).unwrap();
/// assert_eq!(spec.series[0].values.formula(), "='Sheet1'!$B$2:$B$4");
/// assert_eq!(spec.series[1].values.formula(), "='Sheet1'!$C$2:$C$4");
///
/// assert!(compose_chart("Sheet1", None, &ChartOptions::default()).is_none());
/// ```
pub fn compose_chart(
    sheet_name: &str,
    max_valid_data_row: Option<u32>,
    options: &ChartOptions,
) -> Option<ChartSpec> {
    let last_row = max_valid_data_row.filter(|row| *row >= FIRST_DATA_ROW)?;

    let range = |col: u16| CellRange {
        sheet: sheet_name.to_string(),
        col,
        first_row: FIRST_DATA_ROW,
        last_row,
    };
    let header = |col: u16| CellRef {
        sheet: sheet_name.to_string(),
        row: 0,
        col,
    };

    let voltage = SeriesSpec {
        name: header(VOLTAGE_COLUMN),
        categories: range(TIMESTAMP_COLUMN),
        values: range(VOLTAGE_COLUMN),
        y_axis: YAxis::Primary,
        color: SeriesColor::Blue,
    };
    let temperature = SeriesSpec {
        name: header(TEMPERATURE_COLUMN),
        categories: range(TIMESTAMP_COLUMN),
        values: range(TEMPERATURE_COLUMN),
        y_axis: YAxis::Secondary,
        color: SeriesColor::Red,
    };

    Some(ChartSpec {
        title: options.title.clone(),
        width: options.width,
        height: options.height,
        anchor: options.anchor,
        x_axis: TimeAxisSpec {
            title: "Tempo".to_string(),
            num_format: "dd hh:mm".to_string(),
            gridlines: Gridlines::Dash,
        },
        y_axis: AxisSpec {
            title: "Tensione (mV)".to_string(),
            gridlines: Gridlines::LongDash,
            line_color: Some(SeriesColor::Blue),
        },
        y2_axis: AxisSpec {
            title: "Temperatura (°C)".to_string(),
            gridlines: Gridlines::Hidden,
            line_color: Some(SeriesColor::Red),
        },
        series: vec![voltage, temperature],
    })
}

/// Convert a 0-based column index to letters (0 = A, 25 = Z, 26 = AA)
pub fn column_letter(col: u16) -> String {
    let mut name = String::new();
    let mut n = col as u32 + 1;

    while n > 0 {
        n -= 1;
        name.insert(0, (b'A' + (n % 26) as u8) as char);
        n /= 26;
    }

    name
}

fn quote_sheet_name(sheet: &str) -> String {
    format!("'{}'", sheet.replace('\'', "''"))
}
