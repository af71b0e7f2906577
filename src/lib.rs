//! # sheetstream
//!
//! A streaming CSV-to-XLSX converter: reads delimited text from an input
//! stream and writes a minimal, valid single-sheet XLSX package to an output
//! stream, one row at a time, without buffering the sheet in memory.
//!
//! ## Features
//!
//! - **Streaming Write**: one row in flight, constant memory for any input
//! - **Typed Columns**: convert designated columns to integers or datetimes
//! - **Column Widths**: per-column and per-range width declarations
//! - **Bold Headers**: leading rows styled bold, never type-converted
//! - **Any Encoding**: input decoded per a declared character encoding
//! - **Fail Fast**: one bad cell aborts the conversion, no partial output
//!
//! ## Quick Start
//!
//! ```rust
//! use std::io::Cursor;
//! use sheetstream::{convert, Config};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = Config::new("utf-8", "People")?;
//! config.header_rows = 1;
//! config.add_integer_cols("A")?;
//! config.add_datetime_spec("C;%d.%m.%Y;dd.mm.yyyy")?;
//! config.add_col_width("B,30")?;
//!
//! let input = "id;name;joined\n1;Alice;01.02.2020\n2;Bob;\n";
//! let package = convert(&config, input.as_bytes(), Cursor::new(Vec::new()))?;
//! assert!(!package.into_inner().is_empty());
//! # Ok(())
//! # }
//! ```

pub mod columns;
pub mod config;
pub mod convert;
pub mod error;
pub mod projector;
pub mod reader;
pub mod sheet;
pub mod styles;
pub mod types;
pub mod workbook;

pub use columns::{ColumnTransform, ColumnWidths, TransformTable, WidthRange};
pub use config::Config;
pub use convert::convert;
pub use error::{Result, SheetError};
pub use sheet::SheetWriter;
pub use styles::StyleTable;
pub use types::{Cell, CellStyle, CellValue};
pub use workbook::PackageWriter;
