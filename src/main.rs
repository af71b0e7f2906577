//! csv2xlsx - convert delimited text on stdin into an XLSX package on stdout

use std::io::{self, Cursor, Write};

use anyhow::Context;
use clap::Parser;

use sheetstream::{convert, Config};

#[derive(Parser)]
#[command(name = "csv2xlsx")]
#[command(
    version,
    about = "Converts CSV from stdin into XLSX on stdout, with optional integer/datetime \
             column conversion and column widths",
    after_help = "Completely blank input lines produce no output row, so later row numbers \
                  shift up past them. A line of empty fields (e.g. \";;\") still produces a \
                  row of empty cells."
)]
struct Cli {
    /// The character encoding of the input CSV, e.g. utf-8 or windows-1250
    input_encoding: String,

    /// The name to put on the single sheet
    sheet_name: String,

    /// Cell delimiter in the input
    #[arg(short, long, default_value = ";")]
    delimiter: char,

    /// Quoting character in the input
    #[arg(short, long, default_value = "\"")]
    quotechar: char,

    /// Number of leading rows to pass through with bold style, without any
    /// type conversions
    #[arg(short = 'H', long, default_value_t = 0, value_name = "NUMBER")]
    header_rows: usize,

    /// Comma-delimited list of columns whose values should be converted to
    /// integer, e.g. -i A,G,AA
    #[arg(short, long, value_name = "COLUMNS")]
    integer_cols: Option<String>,

    /// Column that should be treated as a date, time or datetime value:
    /// semicolon-delimited tuple of column, input format and output format,
    /// e.g. -t "C;%d.%m.%Y %H:%M;dd.mm.yyyy hh:mm" (repeatable)
    #[arg(short = 't', long = "datetime-spec", value_name = "COLUMN;I-FORMAT;O-FORMAT")]
    datetime_spec: Vec<String>,

    /// Width for a given column or column range, e.g. -w A,20 -w O-R,30
    /// (repeatable)
    #[arg(short = 'w', long = "col-width", value_name = "COLUMN,WIDTH")]
    col_width: Vec<String>,
}

fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = Config::new(&cli.input_encoding, &cli.sheet_name)?;

    anyhow::ensure!(cli.delimiter.is_ascii(), "delimiter must be ASCII");
    anyhow::ensure!(cli.quotechar.is_ascii(), "quote character must be ASCII");
    config.delimiter = cli.delimiter as u8;
    config.quote = cli.quotechar as u8;
    config.header_rows = cli.header_rows;

    if let Some(cols) = &cli.integer_cols {
        config.add_integer_cols(cols)?;
    }
    for spec in &cli.datetime_spec {
        config.add_datetime_spec(spec)?;
    }
    for spec in &cli.col_width {
        config.add_col_width(spec)?;
    }

    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = build_config(&cli)?;

    // stdout is not seekable, so the package is assembled in memory first
    // and copied out in one piece once the conversion has succeeded.
    let package = convert(&config, io::stdin().lock(), Cursor::new(Vec::new()))
        .context("conversion failed")?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(package.get_ref())?;
    stdout.flush()?;
    Ok(())
}
