use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Int16Type, Int32Type, Int64Type, Int8Type};
use csv::ByteRecord;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::CatalogError;
use super::model::RawRecord;

/// File extensions the loader understands, in catalog lookup order.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["parquet", "csv", "json"];

/// Encoding of the `text` field in a source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextEncoding {
    /// Passed through untouched; decoded later by the normalizer.
    #[default]
    Utf8,
    /// ISO-8859-1, transcoded to UTF-8 on load.
    Latin1,
}

impl TextEncoding {
    fn to_utf8(self, bytes: Vec<u8>) -> Vec<u8> {
        match self {
            TextEncoding::Utf8 => bytes,
            // Every Latin-1 byte is the code point of the same value.
            TextEncoding::Latin1 => bytes
                .iter()
                .map(|&b| char::from(b))
                .collect::<String>()
                .into_bytes(),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load raw records from a flat file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – `text` (string or binary) and `polarity` (integer) columns
/// * `.csv`     – header row naming `text` and `polarity`, or the headerless
///   six-column Sentiment140 layout `polarity, id, date, query, user, text`.
///   A file whose first cell is an integer has no header.
/// * `.json`    – `[{ "text": "...", "polarity": 4, ... }, ...]`
pub fn load_file(path: &Path) -> Result<Vec<RawRecord>, CatalogError> {
    load_file_with(path, TextEncoding::Utf8)
}

/// [`load_file`] for sources whose text is stored in `encoding`.
pub fn load_file_with(
    path: &Path,
    encoding: TextEncoding,
) -> Result<Vec<RawRecord>, CatalogError> {
    let mut records = load_by_extension(path)?;
    if encoding != TextEncoding::Utf8 {
        for record in &mut records {
            record.text = encoding.to_utf8(std::mem::take(&mut record.text));
        }
    }
    Ok(records)
}

fn load_by_extension(path: &Path) -> Result<Vec<RawRecord>, CatalogError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => Err(read_error(
            path,
            format!("Unsupported file extension: .{other}"),
        )),
    }
}

fn read_error(
    path: &Path,
    err: impl Into<Box<dyn std::error::Error + Send + Sync>>,
) -> CatalogError {
    CatalogError::Read {
        path: path.to_path_buf(),
        source: err.into(),
    }
}

fn malformed(row: usize, reason: impl Into<String>) -> CatalogError {
    CatalogError::Malformed {
        row,
        reason: reason.into(),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Column positions of the two fields we need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CsvLayout {
    polarity: usize,
    text: usize,
}

impl CsvLayout {
    /// `polarity, id, date, query, user, text` as distributed upstream.
    const SENTIMENT140: CsvLayout = CsvLayout {
        polarity: 0,
        text: 5,
    };

    /// A first row starting with an integer cell is data in the upstream
    /// layout. Anything else is a header and must name both columns.
    fn from_header(path: &Path, row: &ByteRecord) -> Result<Option<Self>, CatalogError> {
        let leading_integer = row
            .get(0)
            .and_then(|f| std::str::from_utf8(f).ok())
            .is_some_and(|s| s.trim().parse::<i64>().is_ok());
        if leading_integer {
            return Ok(None);
        }

        let position = |name: &str| row.iter().position(|f| f.trim_ascii() == name.as_bytes());
        match (position("polarity"), position("text")) {
            (Some(polarity), Some(text)) => Ok(Some(CsvLayout { polarity, text })),
            (None, _) => Err(read_error(path, "CSV header missing 'polarity' column")),
            (_, None) => Err(read_error(path, "CSV header missing 'text' column")),
        }
    }

    fn parse(&self, record: &ByteRecord, row: usize) -> Result<RawRecord, CatalogError> {
        let raw_polarity = record
            .get(self.polarity)
            .ok_or_else(|| malformed(row, "missing 'polarity' field"))?;
        let polarity = std::str::from_utf8(raw_polarity)
            .ok()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .ok_or_else(|| {
                malformed(
                    row,
                    format!(
                        "polarity '{}' is not an integer",
                        String::from_utf8_lossy(raw_polarity)
                    ),
                )
            })?;
        let text = record
            .get(self.text)
            .ok_or_else(|| malformed(row, "missing 'text' field"))?;

        Ok(RawRecord::new(text, polarity))
    }
}

/// Fields are read as bytes: decoding is the normalizer's job, and upstream
/// files are not guaranteed to be UTF-8.
fn load_csv(path: &Path) -> Result<Vec<RawRecord>, CatalogError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| read_error(path, e))?;

    let mut rows = reader.byte_records();
    let mut records = Vec::new();

    let first = match rows.next() {
        Some(first) => first.map_err(|e| read_error(path, e))?,
        None => return Ok(records),
    };
    let layout = match CsvLayout::from_header(path, &first)? {
        Some(layout) => layout,
        None => {
            records.push(CsvLayout::SENTIMENT140.parse(&first, 0)?);
            CsvLayout::SENTIMENT140
        }
    };
    log::debug!("{}: csv layout {layout:?}", path.display());

    for result in rows {
        let record = result.map_err(|e| read_error(path, e))?;
        records.push(layout.parse(&record, records.len())?);
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "text": "is upset that he can't update his Facebook", "polarity": 0 },
///   { "text": "my whole body feels itchy", "polarity": 4, "user": "..." }
/// ]
/// ```
///
/// Extra keys are ignored.
fn load_json(path: &Path) -> Result<Vec<RawRecord>, CatalogError> {
    let text = std::fs::read_to_string(path).map_err(|e| read_error(path, e))?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|e| read_error(path, e))?;

    let rows = root
        .as_array()
        .ok_or_else(|| read_error(path, "Expected top-level JSON array"))?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let obj = row
                .as_object()
                .ok_or_else(|| malformed(i, "not a JSON object"))?;
            let text = obj
                .get("text")
                .and_then(|v| v.as_str())
                .ok_or_else(|| malformed(i, "missing or non-string 'text'"))?;
            let polarity = obj
                .get("polarity")
                .and_then(|v| v.as_i64())
                .ok_or_else(|| malformed(i, "missing or non-integer 'polarity'"))?;
            Ok(RawRecord::new(text, polarity))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of raw records.
///
/// Expected schema:
/// - `text`: Utf8, LargeUtf8, Binary or LargeBinary
/// - `polarity`: Int8, Int16, Int32 or Int64
/// - Any other columns are ignored
fn load_parquet(path: &Path) -> Result<Vec<RawRecord>, CatalogError> {
    let file = std::fs::File::open(path).map_err(|e| read_error(path, e))?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| read_error(path, e))?;
    let reader = builder.build().map_err(|e| read_error(path, e))?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.map_err(|e| read_error(path, e))?;
        let schema = batch.schema();

        let text_idx = schema
            .index_of("text")
            .map_err(|_| read_error(path, "Parquet file missing 'text' column"))?;
        let polarity_idx = schema
            .index_of("polarity")
            .map_err(|_| read_error(path, "Parquet file missing 'polarity' column"))?;

        let text_col = batch.column(text_idx);
        let polarity_col = batch.column(polarity_idx);

        for row in 0..batch.num_rows() {
            let index = records.len();
            let text = extract_text(text_col, row).map_err(|reason| malformed(index, reason))?;
            let polarity =
                extract_polarity(polarity_col, row).map_err(|reason| malformed(index, reason))?;
            records.push(RawRecord::new(text, polarity));
        }
    }

    Ok(records)
}

// -- Parquet / Arrow helpers --

fn extract_text(col: &ArrayRef, row: usize) -> Result<Vec<u8>, String> {
    if col.is_null(row) {
        return Err("null 'text'".to_string());
    }
    let bytes: &[u8] = match col.data_type() {
        DataType::Utf8 => col.as_string::<i32>().value(row).as_bytes(),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).as_bytes(),
        DataType::Binary => col.as_binary::<i32>().value(row),
        DataType::LargeBinary => col.as_binary::<i64>().value(row),
        other => return Err(format!("'text' column has unsupported type {other:?}")),
    };
    Ok(bytes.to_vec())
}

fn extract_polarity(col: &ArrayRef, row: usize) -> Result<i64, String> {
    if col.is_null(row) {
        return Err("null 'polarity'".to_string());
    }
    match col.data_type() {
        DataType::Int8 => Ok(col.as_primitive::<Int8Type>().value(row) as i64),
        DataType::Int16 => Ok(col.as_primitive::<Int16Type>().value(row) as i64),
        DataType::Int32 => Ok(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => Ok(col.as_primitive::<Int64Type>().value(row)),
        other => Err(format!("'polarity' column has unsupported type {other:?}")),
    }
}
