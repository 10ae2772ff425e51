//! Delimited-text ingestion and export.
//!
//! Uploads arrive as CSV/TSV exports of the purchase order workbook. This
//! module turns them into a [`RawTable`] of decoded strings and writes derived
//! tables back out; everything typed happens in [`crate::normalize`].
//!
//! - **Delimiter resolution**: `.tsv` → tab, anything else → comma, unless overridden.
//! - **Encoding**: input decoding via `encoding_rs`, defaulting to UTF-8 (a
//!   leading byte order mark is stripped by the decoder).
//! - **stdin**: the `-` path reads standard input.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use csv::QuoteStyle;
use encoding_rs::{Encoding, UTF_8};
use log::debug;

use crate::data::{Table, render_cell};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

/// Undecorated tabular input: header names and string cells, as read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }
}

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true);
    builder.from_reader(reader)
}

pub fn open_input(path: &Path) -> Result<Box<dyn Read>> {
    if is_dash(path) {
        Ok(Box::new(std::io::stdin().lock()))
    } else {
        Ok(Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Opening input file {path:?}"))?,
        )))
    }
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}

pub fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}

/// Reads a whole delimited stream into memory.
pub fn read_raw_table<R>(
    reader: R,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<RawTable>
where
    R: Read,
{
    let mut reader = open_csv_reader(reader, delimiter);
    let headers = reader.byte_headers().context("Reading header row")?.clone();
    let headers = decode_record(&headers, encoding).context("Decoding header row")?;
    let mut rows = Vec::new();
    for (row_idx, record) in reader.byte_records().enumerate() {
        let record = record.with_context(|| format!("Reading row {}", row_idx + 2))?;
        let decoded = decode_record(&record, encoding)
            .with_context(|| format!("Decoding row {}", row_idx + 2))?;
        rows.push(decoded);
    }
    debug!("Read {} column(s) and {} row(s)", headers.len(), rows.len());
    Ok(RawTable::new(headers, rows))
}

pub fn read_raw_table_from_path(
    path: &Path,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<RawTable> {
    let input = open_input(path)?;
    read_raw_table(input, delimiter, encoding).with_context(|| format!("Reading {path:?}"))
}

/// Writes `table` as CSV. `None` or `-` means stdout.
pub fn write_table_csv(table: &Table, path: Option<&Path>, delimiter: u8) -> Result<()> {
    let base: Box<dyn Write> = match path {
        Some(p) if !is_dash(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Creating output file {p:?}"))?,
        )),
        _ => Box::new(std::io::stdout()),
    };
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Necessary)
        .from_writer(base);
    writer
        .write_record(table.headers())
        .context("Writing header row")?;
    for row in table.rows() {
        writer
            .write_record(row.cells.iter().map(render_cell))
            .with_context(|| format!("Writing row {}", row.position + 1))?;
    }
    writer.flush().context("Flushing CSV output")?;
    Ok(())
}
