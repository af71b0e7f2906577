//! Parsed configuration surface and directive syntax
//!
//! Directives use spreadsheet column letters (`A`, `G`, `AA`, ...); this
//! layer converts them to numeric indices before they reach the transform
//! and width tables, so the core never sees letter notation.

use encoding_rs::Encoding;

use crate::columns::{ColumnTransform, ColumnWidths, TransformTable, WidthRange};
use crate::error::{Result, SheetError};

/// Complete configuration for one conversion
///
/// Built by the caller (the CLI, typically) before the first input byte is
/// read; read-only afterwards.
#[derive(Debug)]
pub struct Config {
    /// Character encoding every input field is decoded with
    pub encoding: &'static Encoding,
    /// Display name of the single output sheet
    pub sheet_name: String,
    /// Field delimiter in the input
    pub delimiter: u8,
    /// Quoting character in the input
    pub quote: u8,
    /// Leading rows passed through with bold style, without type conversion
    pub header_rows: usize,
    /// Per-column transforms for data rows
    pub transforms: TransformTable,
    /// Column width declarations for the sheet header
    pub widths: ColumnWidths,
}

impl Config {
    /// Create a configuration with the defaults the directive syntax assumes:
    /// semicolon delimiter, double-quote quoting, no header rows.
    pub fn new(encoding_label: &str, sheet_name: &str) -> Result<Self> {
        let encoding = Encoding::for_label(encoding_label.as_bytes()).ok_or_else(|| {
            SheetError::Config(format!("unknown input encoding '{encoding_label}'"))
        })?;

        Ok(Config {
            encoding,
            sheet_name: sheet_name.to_string(),
            delimiter: b';',
            quote: b'"',
            header_rows: 0,
            transforms: TransformTable::new(),
            widths: ColumnWidths::new(),
        })
    }

    /// Apply a comma-separated list of integer columns, e.g. `A,G,AA`
    pub fn add_integer_cols(&mut self, spec: &str) -> Result<()> {
        for letters in spec.split(',') {
            let col = column_index_from_letters(letters)?;
            self.transforms.set(col - 1, ColumnTransform::ParseInteger);
        }
        Ok(())
    }

    /// Apply a datetime directive: `COLUMN;IN-FORMAT;OUT-FORMAT`
    pub fn add_datetime_spec(&mut self, spec: &str) -> Result<()> {
        let mut parts = spec.splitn(3, ';');
        let (letters, input_pattern, output_format) =
            match (parts.next(), parts.next(), parts.next()) {
                (Some(c), Some(i), Some(o)) if !i.is_empty() && !o.is_empty() => (c, i, o),
                _ => {
                    return Err(SheetError::Config(format!(
                        "datetime spec '{spec}' must be COLUMN;IN-FORMAT;OUT-FORMAT"
                    )))
                }
            };

        let col = column_index_from_letters(letters)?;
        self.transforms.set(
            col - 1,
            ColumnTransform::ParseDateTime {
                input_pattern: input_pattern.to_string(),
                output_format: output_format.to_string(),
            },
        );
        Ok(())
    }

    /// Apply a width directive: `COLUMN,WIDTH` or `LO-HI,WIDTH`
    pub fn add_col_width(&mut self, spec: &str) -> Result<()> {
        let (range, width) = spec.split_once(',').ok_or_else(|| {
            SheetError::Config(format!("width spec '{spec}' must be COLUMN,WIDTH"))
        })?;

        let width: f64 = width
            .trim()
            .parse()
            .map_err(|_| SheetError::Config(format!("invalid width in '{spec}'")))?;

        let (lo, hi) = match range.split_once('-') {
            Some((lo, hi)) => (
                column_index_from_letters(lo)?,
                column_index_from_letters(hi)?,
            ),
            None => {
                let col = column_index_from_letters(range)?;
                (col, col)
            }
        };

        if hi < lo {
            return Err(SheetError::Config(format!(
                "column range '{range}' runs backwards"
            )));
        }

        self.widths.push(WidthRange {
            min: lo as u32,
            max: hi as u32,
            width,
        });
        Ok(())
    }
}

/// Convert spreadsheet column letters to a 1-based index: `A` -> 1, `AA` -> 27
pub fn column_index_from_letters(letters: &str) -> Result<usize> {
    let trimmed = letters.trim();
    if trimmed.is_empty() {
        return Err(SheetError::Config("empty column reference".to_string()));
    }

    let mut index = 0usize;
    for ch in trimmed.chars() {
        let ch = ch.to_ascii_uppercase();
        if !ch.is_ascii_uppercase() {
            return Err(SheetError::Config(format!(
                "invalid column letters '{trimmed}'"
            )));
        }
        index = index * 26 + (ch as usize - 'A' as usize + 1);
    }
    Ok(index)
}
