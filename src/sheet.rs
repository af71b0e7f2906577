//! Streaming worksheet part writer
//!
//! Emits the worksheet XML as an append-only byte stream: a header block,
//! one `<row>` element per input row, and a trailer. The header is produced
//! by an explicit, ordered pipeline of fragment producers; the column-width
//! block is one producer in that pipeline, spliced in at the exact position
//! the format requires (between the format defaults and `<sheetData>`).
//! Never holds more than one row in memory.

use std::io::Write;

use crate::columns::ColumnWidths;
use crate::error::Result;
use crate::styles::StyleTable;
use crate::types::{Cell, CellValue};

/// Streaming writer for a single worksheet part
///
/// Owns the output stream for the part's lifetime. The width and style
/// tables are injected at construction and read-only from then on.
/// `finish` writes the trailer and hands the output stream back.
pub struct SheetWriter<'a, W: Write> {
    out: W,
    widths: &'a ColumnWidths,
    styles: &'a StyleTable,
    row_count: u32,
    xml_buffer: Vec<u8>,
}

impl<'a, W: Write> SheetWriter<'a, W> {
    /// Create the writer and emit the complete header block.
    /// Rows can stream immediately afterwards.
    pub fn new(out: W, widths: &'a ColumnWidths, styles: &'a StyleTable) -> Result<Self> {
        let mut writer = SheetWriter {
            out,
            widths,
            styles,
            row_count: 0,
            xml_buffer: Vec::with_capacity(4096),
        };
        writer.write_header()?;
        Ok(writer)
    }

    /// Header fragments, invoked in the exact order the format requires.
    /// No fragment starts before the previous one is fully written.
    fn write_header(&mut self) -> Result<()> {
        let fragments: [fn(&mut Self) -> Result<()>; 7] = [
            Self::fragment_document_open,
            Self::fragment_sheet_properties,
            Self::fragment_dimension,
            Self::fragment_sheet_views,
            Self::fragment_format_defaults,
            Self::fragment_column_widths,
            Self::fragment_sheet_data_open,
        ];
        for fragment in fragments {
            fragment(self)?;
        }
        Ok(())
    }

    fn fragment_document_open(&mut self) -> Result<()> {
        self.out
            .write_all(b"<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n")?;
        self.out.write_all(
            b"<worksheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\" \
              xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\">",
        )?;
        Ok(())
    }

    fn fragment_sheet_properties(&mut self) -> Result<()> {
        self.out
            .write_all(b"<sheetPr><outlinePr summaryBelow=\"1\" summaryRight=\"1\"/></sheetPr>")?;
        Ok(())
    }

    /// The true extent is unknown until the row source is exhausted, and the
    /// part cannot be patched once streamed, so a fixed A1 anchor is written.
    /// Readers recompute the used range from sheetData.
    fn fragment_dimension(&mut self) -> Result<()> {
        self.out.write_all(b"<dimension ref=\"A1\"/>")?;
        Ok(())
    }

    fn fragment_sheet_views(&mut self) -> Result<()> {
        self.out.write_all(
            b"<sheetViews><sheetView workbookViewId=\"0\">\
              <selection activeCell=\"A1\" sqref=\"A1\"/>\
              </sheetView></sheetViews>",
        )?;
        Ok(())
    }

    fn fragment_format_defaults(&mut self) -> Result<()> {
        self.out
            .write_all(b"<sheetFormatPr defaultRowHeight=\"15\"/>")?;
        Ok(())
    }

    /// One `<col>` declaration per width range, in table order. An empty
    /// table emits nothing; an empty `<cols>` wrapper would be invalid.
    fn fragment_column_widths(&mut self) -> Result<()> {
        if self.widths.is_empty() {
            return Ok(());
        }

        let mut num = itoa::Buffer::new();
        self.xml_buffer.clear();
        self.xml_buffer.extend_from_slice(b"<cols>");
        for range in self.widths.iter() {
            self.xml_buffer.extend_from_slice(b"<col min=\"");
            self.xml_buffer
                .extend_from_slice(num.format(range.min).as_bytes());
            self.xml_buffer.extend_from_slice(b"\" max=\"");
            self.xml_buffer
                .extend_from_slice(num.format(range.max).as_bytes());
            self.xml_buffer.extend_from_slice(b"\" width=\"");
            self.xml_buffer
                .extend_from_slice(range.width.to_string().as_bytes());
            self.xml_buffer.extend_from_slice(b"\" customWidth=\"1\"/>");
        }
        self.xml_buffer.extend_from_slice(b"</cols>");
        self.out.write_all(&self.xml_buffer)?;
        Ok(())
    }

    fn fragment_sheet_data_open(&mut self) -> Result<()> {
        self.out.write_all(b"<sheetData>")?;
        Ok(())
    }

    /// Append one row, 1-based row index assigned in input order.
    /// An empty slice still produces an empty `<row>` element.
    pub fn write_row(&mut self, cells: &[Cell]) -> Result<()> {
        self.row_count += 1;
        let mut num = itoa::Buffer::new();

        self.xml_buffer.clear();
        self.xml_buffer.extend_from_slice(b"<row r=\"");
        self.xml_buffer
            .extend_from_slice(num.format(self.row_count).as_bytes());
        self.xml_buffer.extend_from_slice(b"\">");

        for (col, cell) in cells.iter().enumerate() {
            self.push_cell(col, cell, &mut num);
        }

        self.xml_buffer.extend_from_slice(b"</row>");
        self.out.write_all(&self.xml_buffer)?;
        Ok(())
    }

    fn push_cell(&mut self, col: usize, cell: &Cell, num: &mut itoa::Buffer) {
        self.xml_buffer.extend_from_slice(b"<c r=\"");
        push_column_letters(&mut self.xml_buffer, col as u32 + 1);
        self.xml_buffer
            .extend_from_slice(num.format(self.row_count).as_bytes());
        self.xml_buffer.push(b'"');

        let style_index = self.styles.style_index(&cell.style);
        if style_index > 0 {
            self.xml_buffer.extend_from_slice(b" s=\"");
            self.xml_buffer
                .extend_from_slice(num.format(style_index).as_bytes());
            self.xml_buffer.push(b'"');
        }

        match &cell.value {
            CellValue::EmptyText => {
                self.xml_buffer.extend_from_slice(b"/>");
            }
            CellValue::Text(text) => {
                self.xml_buffer.extend_from_slice(b" t=\"inlineStr\"><is><t>");
                write_escaped(&mut self.xml_buffer, text);
                self.xml_buffer.extend_from_slice(b"</t></is></c>");
            }
            CellValue::Integer(value) => {
                self.xml_buffer.extend_from_slice(b" t=\"n\"><v>");
                self.xml_buffer
                    .extend_from_slice(num.format(*value).as_bytes());
                self.xml_buffer.extend_from_slice(b"</v></c>");
            }
            CellValue::DateTime(serial) => {
                self.xml_buffer.extend_from_slice(b" t=\"n\"><v>");
                self.xml_buffer
                    .extend_from_slice(serial.to_string().as_bytes());
                self.xml_buffer.extend_from_slice(b"</v></c>");
            }
        }
    }

    /// Write the trailer, closing the open elements in reverse order of
    /// opening, and return the output stream. The sheet is immutable after
    /// this.
    pub fn finish(mut self) -> Result<W> {
        self.out.write_all(b"</sheetData></worksheet>")?;
        self.out.flush()?;
        Ok(self.out)
    }

    /// Number of rows written so far
    pub fn row_count(&self) -> u32 {
        self.row_count
    }
}

/// Append the column letters for a 1-based index (1 -> A, 27 -> AA)
pub(crate) fn push_column_letters(buffer: &mut Vec<u8>, mut n: u32) {
    if n == 0 {
        return;
    }
    let mut tmp = [0u8; 10];
    let mut len = 0;
    while n > 0 {
        let rem = (n - 1) % 26;
        tmp[len] = b'A' + rem as u8;
        len += 1;
        n = (n - 1) / 26;
    }
    for i in (0..len).rev() {
        buffer.push(tmp[i]);
    }
}

pub(crate) fn write_escaped(buffer: &mut Vec<u8>, text: &str) {
    for c in text.chars() {
        match c {
            '&' => buffer.extend_from_slice(b"&amp;"),
            '<' => buffer.extend_from_slice(b"&lt;"),
            '>' => buffer.extend_from_slice(b"&gt;"),
            '"' => buffer.extend_from_slice(b"&quot;"),
            '\'' => buffer.extend_from_slice(b"&apos;"),
            _ => {
                let mut buf = [0; 4];
                buffer.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
    }
}
