//! Row projection: raw text fields to typed, styled cells
//!
//! Lazy and single-pass: each input row is pulled, projected and handed to
//! the sheet writer before the next one is read. The projector owns its
//! upstream cursor and performs no I/O of its own.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::columns::{ColumnTransform, TransformTable};
use crate::error::{Result, SheetError};
use crate::types::{datetime_to_serial, time_to_serial, Cell, CellStyle, CellValue};

/// Iterator adaptor turning decoded field rows into [`Cell`] rows
///
/// The first `header_rows` rows become bold text regardless of content;
/// every later row is type-converted per column. A single unparsable field
/// ends the iteration with an error.
pub struct RowProjector<'a, I> {
    source: I,
    transforms: &'a TransformTable,
    header_rows: usize,
    row: u64,
}

impl<'a, I> RowProjector<'a, I>
where
    I: Iterator<Item = Result<Vec<String>>>,
{
    pub fn new(source: I, transforms: &'a TransformTable, header_rows: usize) -> Self {
        RowProjector {
            source,
            transforms,
            header_rows,
            row: 0,
        }
    }

    fn project_data_row(&self, fields: Vec<String>) -> Result<Vec<Cell>> {
        let mut cells = Vec::with_capacity(fields.len());
        for (col, value) in fields.into_iter().enumerate() {
            cells.push(self.project_cell(col, value)?);
        }
        Ok(cells)
    }

    fn project_cell(&self, col: usize, value: String) -> Result<Cell> {
        // Empty fields are never parsed, whatever the column's transform says.
        if value.is_empty() {
            return Ok(Cell::plain(CellValue::EmptyText));
        }

        match self.transforms.get(col) {
            ColumnTransform::PassThrough => Ok(Cell::plain(CellValue::Text(value))),
            ColumnTransform::ParseInteger => {
                let parsed: i64 = value.parse().map_err(|_| SheetError::IntegerParse {
                    row: self.row,
                    col: col + 1,
                    value: value.clone(),
                })?;
                Ok(Cell::plain(CellValue::Integer(parsed)))
            }
            ColumnTransform::ParseDateTime {
                input_pattern,
                output_format,
            } => {
                let serial = parse_datetime_serial(&value, input_pattern).ok_or_else(|| {
                    SheetError::DateTimeParse {
                        row: self.row,
                        col: col + 1,
                        value: value.clone(),
                        pattern: input_pattern.clone(),
                    }
                })?;
                Ok(Cell::new(
                    CellValue::DateTime(serial),
                    CellStyle::NumberFormat(output_format.clone()),
                ))
            }
        }
    }
}

impl<'a, I> Iterator for RowProjector<'a, I>
where
    I: Iterator<Item = Result<Vec<String>>>,
{
    type Item = Result<Vec<Cell>>;

    fn next(&mut self) -> Option<Self::Item> {
        let fields = match self.source.next()? {
            Ok(fields) => fields,
            Err(err) => return Some(Err(err)),
        };
        self.row += 1;

        if self.row <= self.header_rows as u64 {
            let cells = fields
                .into_iter()
                .map(|field| Cell::new(CellValue::Text(field), CellStyle::Bold))
                .collect();
            return Some(Ok(cells));
        }

        Some(self.project_data_row(fields))
    }
}

/// Date-only patterns parse to midnight and time-only patterns to the bare
/// day fraction, so every shape strptime accepts yields a serial.
fn parse_datetime_serial(value: &str, pattern: &str) -> Option<f64> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, pattern) {
        return Some(datetime_to_serial(dt));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, pattern) {
        return Some(datetime_to_serial(date.and_time(NaiveTime::MIN)));
    }
    NaiveTime::parse_from_str(value, pattern)
        .map(time_to_serial)
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::TransformTable;

    fn rows(raw: &[&[&str]]) -> Vec<Result<Vec<String>>> {
        raw.iter()
            .map(|fields| Ok(fields.iter().map(|f| f.to_string()).collect()))
            .collect()
    }

    fn project(
        raw: &[&[&str]],
        transforms: &TransformTable,
        header_rows: usize,
    ) -> Result<Vec<Vec<Cell>>> {
        RowProjector::new(rows(raw).into_iter(), transforms, header_rows).collect()
    }

    #[test]
    fn test_no_directives_passes_text_through_unstyled() {
        let transforms = TransformTable::new();
        let out = project(&[&["a", "1"], &["01.02.2020", "x"]], &transforms, 0).unwrap();
        for row in &out {
            for cell in row {
                assert_eq!(cell.style, CellStyle::Default);
                assert!(matches!(cell.value, CellValue::Text(_)));
            }
        }
    }

    #[test]
    fn test_header_rows_are_bold_and_never_converted() {
        let mut transforms = TransformTable::new();
        transforms.set(0, ColumnTransform::ParseInteger);

        // "123" in the header stays text even though column A parses integers
        let out = project(&[&["123"], &["456"]], &transforms, 1).unwrap();
        assert_eq!(
            out[0][0],
            Cell::new(CellValue::Text("123".to_string()), CellStyle::Bold)
        );
        assert_eq!(out[1][0], Cell::plain(CellValue::Integer(456)));
    }

    #[test]
    fn test_empty_field_skips_parsing() {
        let mut transforms = TransformTable::new();
        transforms.set(0, ColumnTransform::ParseInteger);

        let out = project(&[&[""]], &transforms, 0).unwrap();
        assert_eq!(out[0][0], Cell::plain(CellValue::EmptyText));
    }

    #[test]
    fn test_invalid_integer_is_fatal() {
        let mut transforms = TransformTable::new();
        transforms.set(0, ColumnTransform::ParseInteger);

        let err = project(&[&["12"], &["twelve"]], &transforms, 0).unwrap_err();
        assert!(matches!(
            err,
            SheetError::IntegerParse { row: 2, col: 1, .. }
        ));
    }

    #[test]
    fn test_datetime_column_gets_number_format_style() {
        let mut transforms = TransformTable::new();
        transforms.set(
            0,
            ColumnTransform::ParseDateTime {
                input_pattern: "%d.%m.%Y".to_string(),
                output_format: "dd.mm.yyyy".to_string(),
            },
        );

        let out = project(&[&["01.02.2020"]], &transforms, 0).unwrap();
        assert_eq!(
            out[0][0],
            Cell::new(
                CellValue::DateTime(43_862.0),
                CellStyle::NumberFormat("dd.mm.yyyy".to_string())
            )
        );
    }

    #[test]
    fn test_datetime_with_time_component() {
        let mut transforms = TransformTable::new();
        transforms.set(
            0,
            ColumnTransform::ParseDateTime {
                input_pattern: "%d.%m.%Y %H:%M".to_string(),
                output_format: "dd.mm.yyyy hh:mm".to_string(),
            },
        );

        let out = project(&[&["01.02.2020 12:00"]], &transforms, 0).unwrap();
        assert_eq!(out[0][0].value, CellValue::DateTime(43_862.5));
    }

    #[test]
    fn test_time_only_pattern_yields_day_fraction() {
        let mut transforms = TransformTable::new();
        transforms.set(
            0,
            ColumnTransform::ParseDateTime {
                input_pattern: "%H:%M".to_string(),
                output_format: "hh:mm".to_string(),
            },
        );

        let out = project(&[&["12:00"], &["06:30"]], &transforms, 0).unwrap();
        assert_eq!(
            out[0][0],
            Cell::new(
                CellValue::DateTime(0.5),
                CellStyle::NumberFormat("hh:mm".to_string())
            )
        );
        assert_eq!(out[1][0].value, CellValue::DateTime(23_400.0 / 86_400.0));
    }

    #[test]
    fn test_mismatched_datetime_is_fatal() {
        let mut transforms = TransformTable::new();
        transforms.set(
            0,
            ColumnTransform::ParseDateTime {
                input_pattern: "%d.%m.%Y".to_string(),
                output_format: "dd.mm.yyyy".to_string(),
            },
        );

        let err = project(&[&["2020-02-01"]], &transforms, 0).unwrap_err();
        assert!(matches!(
            err,
            SheetError::DateTimeParse { row: 1, col: 1, .. }
        ));
    }

    #[test]
    fn test_transform_past_row_width_never_triggers() {
        let mut transforms = TransformTable::new();
        transforms.set(5, ColumnTransform::ParseInteger);

        let out = project(&[&["a", "b"]], &transforms, 0).unwrap();
        assert_eq!(out[0].len(), 2);
    }
}
