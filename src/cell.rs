use chrono::NaiveDateTime;
use serde::Serialize;

use crate::line::SensorFields;
use crate::numeric;
use crate::timestamp::{self, INVALID_TIMESTAMP_TEXT};

/// What ends up in one sheet cell.
///
/// Values that fail to decode are kept as `Text` so bad data stays visible.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum CellValue {
    DateTime(NaiveDateTime),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// True for typed values, false for fallback text
    pub fn is_typed(&self) -> bool {
        !matches!(self, CellValue::Text(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// One data row of the output sheet, built from a single log line.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedRow {
    /// 0-based sheet row; the header sits at 0 so data starts at 1
    pub row_index: u32,
    pub timestamp: CellValue,
    pub voltage: CellValue,
    pub temperature: CellValue,
}

impl ParsedRow {
    pub fn from_fields(row_index: u32, fields: &SensorFields<'_>) -> Self {
        let timestamp = match timestamp::decode(fields.timestamp) {
            Ok(instant) => CellValue::DateTime(instant),
            Err(e) => {
                log::debug!("row {}: {}", row_index, e);
                CellValue::Text(INVALID_TIMESTAMP_TEXT.to_string())
            }
        };

        ParsedRow {
            row_index,
            timestamp,
            voltage: measurement_cell(fields.voltage),
            temperature: measurement_cell(fields.temperature),
        }
    }

    /// All three fields decoded to typed values
    pub fn is_fully_valid(&self) -> bool {
        self.timestamp.is_typed() && self.voltage.is_typed() && self.temperature.is_typed()
    }

    pub fn cells(&self) -> [&CellValue; 3] {
        [&self.timestamp, &self.voltage, &self.temperature]
    }
}

fn measurement_cell(raw: &str) -> CellValue {
    match numeric::parse_measurement(raw) {
        Ok(value) => CellValue::Number(value),
        Err(text) => CellValue::Text(text),
    }
}
