//! End-to-end conversion pipeline
//!
//! Wires reader -> projector -> sheet writer -> package assembler. Fully
//! sequential and pull-based: the sheet writer pulls the next row only when
//! it is ready to emit it, so at most one row is in flight.

use std::io::{Read, Seek, Write};

use crate::config::Config;
use crate::error::Result;
use crate::projector::RowProjector;
use crate::reader::DelimitedReader;
use crate::sheet::SheetWriter;
use crate::styles::StyleTable;
use crate::workbook::PackageWriter;

/// Convert delimited text on `input` into a complete XLSX package on
/// `output`.
///
/// A pure transform from (configuration + input stream) to (output stream):
/// no environment, no persisted state. Any parse or decode failure aborts
/// before the package is sealed, so a sealed package is always valid.
pub fn convert<R: Read, W: Write + Seek>(config: &Config, input: R, output: W) -> Result<W> {
    let mut styles = StyleTable::new();
    for format in config.transforms.output_formats() {
        styles.register_number_format(format);
    }

    let package = PackageWriter::new(&config.sheet_name, &styles);
    let zip = package.begin(output)?;

    let mut sheet = SheetWriter::new(zip, &config.widths, &styles)?;
    let rows = RowProjector::new(
        DelimitedReader::new(input, config.delimiter, config.quote, config.encoding),
        &config.transforms,
        config.header_rows,
    );
    for row in rows {
        sheet.write_row(&row?)?;
    }

    let zip = sheet.finish()?;
    package.finish(zip)
}
