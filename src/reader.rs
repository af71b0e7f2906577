//! Delimited text input: field splitting plus character decoding
//!
//! Splits the raw byte stream into ordered field rows with the configured
//! delimiter and quote character, then decodes every field under the
//! declared input encoding. Decoding is strict: a field the encoding cannot
//! represent aborts the conversion instead of inserting replacement
//! characters. Completely blank lines yield no record, so they produce no
//! output row downstream.

use std::io::Read;

use csv::{ByteRecord, ByteRecordsIntoIter, ReaderBuilder};
use encoding_rs::Encoding;

use crate::error::{Result, SheetError};

/// Forward-only reader over delimited input, yielding decoded field rows
pub struct DelimitedReader<R: Read> {
    records: ByteRecordsIntoIter<R>,
    encoding: &'static Encoding,
    row: u64,
}

impl<R: Read> DelimitedReader<R> {
    pub fn new(input: R, delimiter: u8, quote: u8, encoding: &'static Encoding) -> Self {
        let reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .quote(quote)
            .has_headers(false)
            .flexible(true)
            .from_reader(input);

        DelimitedReader {
            records: reader.into_byte_records(),
            encoding,
            row: 0,
        }
    }

    fn decode_record(&self, record: &ByteRecord) -> Result<Vec<String>> {
        let mut fields = Vec::with_capacity(record.len());
        for (col, raw) in record.iter().enumerate() {
            match self
                .encoding
                .decode_without_bom_handling_and_without_replacement(raw)
            {
                Some(text) => fields.push(text.into_owned()),
                None => {
                    return Err(SheetError::Decode {
                        row: self.row,
                        col: col + 1,
                        encoding: self.encoding.name().to_string(),
                    })
                }
            }
        }
        Ok(fields)
    }
}

impl<R: Read> Iterator for DelimitedReader<R> {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(err) => return Some(Err(err.into())),
        };
        self.row += 1;
        Some(self.decode_record(&record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{UTF_8, WINDOWS_1250};

    fn read_all(input: &[u8], encoding: &'static Encoding) -> Result<Vec<Vec<String>>> {
        DelimitedReader::new(input, b';', b'"', encoding).collect()
    }

    #[test]
    fn test_semicolon_fields() {
        let rows = read_all(b"id;name\n1;Alice\n", UTF_8).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["id", "name"]);
        assert_eq!(rows[1], vec!["1", "Alice"]);
    }

    #[test]
    fn test_quoted_field_keeps_delimiter() {
        let rows = read_all(b"\"a;b\";c\n", UTF_8).unwrap();
        assert_eq!(rows[0], vec!["a;b", "c"]);
    }

    #[test]
    fn test_trailing_empty_field() {
        let rows = read_all(b"2;Bob;\n", UTF_8).unwrap();
        assert_eq!(rows[0], vec!["2", "Bob", ""]);
    }

    #[test]
    fn test_windows_1250_decoding() {
        // 0xE8 is 'č' in windows-1250
        let rows = read_all(b"\xE8au;x\n", WINDOWS_1250).unwrap();
        assert_eq!(rows[0][0], "čau");
    }

    #[test]
    fn test_undecodable_field_is_fatal() {
        // 0xE8 alone is not valid UTF-8
        let err = read_all(b"\xE8au;x\n", UTF_8).unwrap_err();
        assert!(matches!(err, SheetError::Decode { row: 1, col: 1, .. }));
    }

    #[test]
    fn test_rows_keep_their_own_width() {
        let rows = read_all(b"a;b;c\nd;e\n", UTF_8).unwrap();
        assert_eq!(rows[0].len(), 3);
        assert_eq!(rows[1].len(), 2);
    }
}
