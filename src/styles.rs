//! Style table: the bold header font plus named number formats
//!
//! The worksheet part references styles by cellXfs index while it streams,
//! and styles.xml is only written when the package closes, so both sides
//! resolve indices through this one table. Slots are fixed: 0 is the
//! default, 1 is the bold header font, and every distinct datetime output
//! format code occupies 2+n in first-registration order.

use std::io::Write;

use indexmap::IndexSet;

use crate::error::Result;
use crate::types::CellStyle;

/// First numFmtId available for custom formats in a styleSheet.
const CUSTOM_NUMFMT_BASE: u32 = 164;

/// Registry of every cell format the conversion can emit
#[derive(Debug, Default)]
pub struct StyleTable {
    number_formats: IndexSet<String>,
}

impl StyleTable {
    pub fn new() -> Self {
        StyleTable {
            number_formats: IndexSet::new(),
        }
    }

    /// Register a number format code and return its cellXfs index.
    /// Registering the same code twice returns the same index.
    pub fn register_number_format(&mut self, code: &str) -> u32 {
        let (position, _) = self.number_formats.insert_full(code.to_string());
        position as u32 + 2
    }

    /// Resolve a cell style to the `s` attribute it carries in the sheet part
    pub fn style_index(&self, style: &CellStyle) -> u32 {
        match style {
            CellStyle::Default => 0,
            CellStyle::Bold => 1,
            CellStyle::NumberFormat(code) => self
                .number_formats
                .get_index_of(code.as_str())
                .map(|position| position as u32 + 2)
                .unwrap_or(0),
        }
    }

    /// Write the styles.xml part
    pub fn write_xml<W: Write>(&self, writer: &mut W) -> Result<()> {
        let mut xml = String::with_capacity(1024);
        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n");
        xml.push_str(
            "<styleSheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\">\n",
        );

        // An empty numFmts element trips up some strict consumers, so the
        // wrapper only appears once a format has been registered.
        if !self.number_formats.is_empty() {
            xml.push_str(&format!("<numFmts count=\"{}\">", self.number_formats.len()));
            for (position, code) in self.number_formats.iter().enumerate() {
                xml.push_str(&format!(
                    "<numFmt numFmtId=\"{}\" formatCode=\"",
                    CUSTOM_NUMFMT_BASE + position as u32
                ));
                push_escaped(&mut xml, code);
                xml.push_str("\"/>");
            }
            xml.push_str("</numFmts>\n");
        }

        xml.push_str(
            "<fonts count=\"2\">\n\
             <font><sz val=\"11\"/><name val=\"Calibri\"/></font>\n\
             <font><b/><sz val=\"11\"/><name val=\"Calibri\"/></font>\n\
             </fonts>\n\
             <fills count=\"2\">\n\
             <fill><patternFill patternType=\"none\"/></fill>\n\
             <fill><patternFill patternType=\"gray125\"/></fill>\n\
             </fills>\n\
             <borders count=\"1\">\n\
             <border><left/><right/><top/><bottom/><diagonal/></border>\n\
             </borders>\n\
             <cellStyleXfs count=\"1\">\n\
             <xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\"/>\n\
             </cellStyleXfs>\n",
        );

        xml.push_str(&format!(
            "<cellXfs count=\"{}\">\n",
            self.number_formats.len() + 2
        ));
        xml.push_str("<xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\" xfId=\"0\"/>\n");
        xml.push_str(
            "<xf numFmtId=\"0\" fontId=\"1\" fillId=\"0\" borderId=\"0\" xfId=\"0\" applyFont=\"1\"/>\n",
        );
        for position in 0..self.number_formats.len() {
            xml.push_str(&format!(
                "<xf numFmtId=\"{}\" fontId=\"0\" fillId=\"0\" borderId=\"0\" xfId=\"0\" applyNumberFormat=\"1\"/>\n",
                CUSTOM_NUMFMT_BASE + position as u32
            ));
        }
        xml.push_str("</cellXfs>\n</styleSheet>");

        writer.write_all(xml.as_bytes())?;
        Ok(())
    }
}

fn push_escaped(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
}
