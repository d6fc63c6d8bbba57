/// Field separator of the sensor log
pub const FIELD_SEPARATOR: char = ';';

/// Position of each column this tool keeps. Index 2 is an unused legacy field.
pub const TIMESTAMP_FIELD: usize = 0;
pub const VOLTAGE_FIELD: usize = 1;
pub const TEMPERATURE_FIELD: usize = 3;

/// A line needs at least this many fields to be processed
pub const MIN_FIELDS: usize = TEMPERATURE_FIELD + 1;

/// The three raw fields kept from one log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorFields<'a> {
    pub timestamp: &'a str,
    pub voltage: &'a str,
    pub temperature: &'a str,
}

/// Result of looking at one input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedLine<'a> {
    /// Empty or whitespace only; ignored without counting an error
    Blank,
    /// Too few fields; no row is emitted
    Malformed { field_count: usize },
    Record(SensorFields<'a>),
}

/// Characters that end a line: `\n`, `\r`, vertical tab, form feed, the
/// file/group/record separators, NEL and the Unicode line/paragraph separators
pub const LINE_BREAKS: [char; 10] = [
    '\n', '\r', '\u{0b}', '\u{0c}', '\u{1c}', '\u{1d}', '\u{1e}', '\u{85}', '\u{2028}', '\u{2029}',
];

/// Splits decoded text into lines on any of [`LINE_BREAKS`].
///
/// A `\r\n` pair yields an empty piece between the two characters; empty
/// pieces are dropped later as blank lines.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(LINE_BREAKS)
}

/// Classifies one line of the log.
///
/// Surrounding whitespace is trimmed first. Fields 0, 1 and 3 are picked as
/// timestamp, voltage and temperature; field 2 and anything past the fourth
/// are ignored.
///
/// # Arguments
/// * `line` - A single line, without its terminator
///
/// # Returns
/// * `ParsedLine` - `Blank`, `Malformed` with the field count, or the borrowed fields
///
/// # Examples
/// ```
/// use labview_xlsx::line::{ParsedLine, parse_line};
///
/// match parse_line(" 0;100,0;x;25,50 ") {
///     ParsedLine::Record(fields) => {
///         assert_eq!(fields.voltage, "100,0");
///         assert_eq!(fields.temperature, "25,50");
///     }
///     other => panic!("unexpected {:?}", other),
/// }
/// assert!(matches!(parse_line("1;2"), ParsedLine::Malformed { field_count: 2 }));
/// assert!(matches!(parse_line("   "), ParsedLine::Blank));
/// ```
pub fn parse_line(line: &str) -> ParsedLine<'_> {
    let line = line.trim();
    if line.is_empty() {
        return ParsedLine::Blank;
    }

    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if fields.len() < MIN_FIELDS {
        return ParsedLine::Malformed {
            field_count: fields.len(),
        };
    }

    ParsedLine::Record(SensorFields {
        timestamp: fields[TIMESTAMP_FIELD],
        voltage: fields[VOLTAGE_FIELD],
        temperature: fields[TEMPERATURE_FIELD],
    })
}
