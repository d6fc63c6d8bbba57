/*!
# LabVIEW log to spreadsheet converter

Turns the semicolon-delimited logs written by LabVIEW voltage/temperature
sensors into an xlsx workbook: one sheet of parsed values plus a scatter chart
with voltage on the primary Y axis and temperature on a secondary one.

## Pipeline

For every non-empty input line:

1. **line**: split on `;`, require at least four fields, keep fields 0, 1 and 3
2. **timestamp**: decode seconds since 1904-01-01 UTC into a naive instant
3. **numeric**: canonicalize `,`/`.` decimals and parse voltage and temperature
4. **converter**: write the row (typed values, or visible text when a field
   fails) and track the last row where all three fields decoded

After the last line, **chart** derives the series ranges from that row and
the **sheet** writer embeds the chart. Bad lines never abort a run; they are
counted in [`ProcessingSummary`] and left readable in the sheet.

## Modules

- **line**: line splitting and field extraction
- **timestamp**: LabVIEW epoch decoding
- **numeric**: measurement normalization
- **cell**: typed cell values and parsed rows
- **chart**: pure chart description over the emitted rows
- **sheet**: writer seam (xlsx and in-memory)
- **converter**: per-invocation pipeline, summary and output naming
- **decode**: upload text decoding
- **app**: HTTP upload service (feature `web`)
*/

#[cfg(feature = "web")]
pub mod app;
pub mod cell;
pub mod chart;
pub mod converter;
pub mod decode;
pub mod error;
pub mod line;
pub mod numeric;
pub mod sheet;
pub mod timestamp;

pub use cell::{CellValue, ParsedRow};
pub use chart::{ChartOptions, ChartSpec, compose_chart};
pub use converter::{
    COLUMNS, ConvertOptions, Conversion, ConvertedFile, ProcessingSummary, convert_text,
    convert_upload, emit_rows, output_filename,
};
pub use decode::decode_text;
pub use error::{ConvertError, LineIssue, TimestampError};
pub use sheet::{MemorySheet, SheetWriter, XlsxSheet};
