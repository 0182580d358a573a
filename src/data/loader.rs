use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::{can_cast_types, cast};
use arrow::datatypes::{DataType, Date32Type};
use arrow::record_batch::RecordBatch;
use chrono::{NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::error::DataLoadError;
use super::model::{ContentType, Dataset, Title};

/// Columns every source must provide. Everything else is ignored.
pub const REQUIRED_COLUMNS: [&str; 5] = ["type", "date_added", "country", "listed_in", "rating"];

/// Accepted `date_added` layouts, tried in order.
const DATE_FORMATS: [&str; 3] = ["%B %d, %Y", "%b %d, %Y", "%m/%d/%Y"];
const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

// ---------------------------------------------------------------------------
// Raw rows and cleaning
// ---------------------------------------------------------------------------

/// One source row before cleaning. Every cell is optional; empty cells are
/// treated as missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTitle {
    #[serde(default)]
    pub show_id: Option<String>,
    #[serde(rename = "type", default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub date_added: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub listed_in: Option<String>,
    #[serde(default)]
    pub rating: Option<String>,
}

/// What happened to the source rows during cleaning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub rows_read: usize,
    pub dropped_bad_date: usize,
    pub dropped_unknown_type: usize,
}

impl LoadReport {
    pub fn rows_kept(&self) -> usize {
        self.rows_read - self.dropped_bad_date - self.dropped_unknown_type
    }
}

/// Parse a `date_added` cell. Returns `None` for anything unrecognised.
pub fn parse_date_added(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d);
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_TIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Turn raw rows into titles. Rows with an unparseable date or an
/// unrecognised type are dropped and counted.
pub fn clean(raw_rows: Vec<RawTitle>) -> (Vec<Title>, LoadReport) {
    let mut report = LoadReport {
        rows_read: raw_rows.len(),
        ..LoadReport::default()
    };
    let mut titles = Vec::with_capacity(raw_rows.len());

    for raw in raw_rows {
        let id = raw.show_id.as_deref().unwrap_or("?");
        let Some(date_added) = raw.date_added.as_deref().and_then(parse_date_added) else {
            log::trace!("{id}: unusable date_added {:?}", raw.date_added);
            report.dropped_bad_date += 1;
            continue;
        };
        let Some(content_type) = raw.content_type.as_deref().and_then(ContentType::parse) else {
            log::trace!("{id}: unknown type {:?}", raw.content_type);
            report.dropped_unknown_type += 1;
            continue;
        };

        titles.push(Title::new(
            content_type,
            date_added,
            non_empty(raw.country),
            non_empty(raw.listed_in),
            non_empty(raw.rating),
        ));
    }

    (titles, report)
}

fn non_empty(cell: Option<String>) -> Option<String> {
    cell.filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a catalog from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one title per record (the usual export)
/// * `.json`    – `[{ "type": "Movie", "date_added": "...", ... }, ...]`
/// * `.parquet` – string (or date) columns named like the CSV header
pub fn load_file(path: &Path) -> Result<Dataset, DataLoadError> {
    load_file_with_report(path).map(|(dataset, _)| dataset)
}

/// [`load_file`], also returning what was dropped while cleaning.
pub fn load_file_with_report(path: &Path) -> Result<(Dataset, LoadReport), DataLoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let raw_rows = match ext.as_str() {
        "csv" => read_csv(path)?,
        "json" => read_json(path)?,
        "parquet" | "pq" => read_parquet(path)?,
        other => return Err(DataLoadError::UnsupportedExtension(other.to_string())),
    };

    let (titles, report) = clean(raw_rows);
    if report.dropped_bad_date > 0 || report.dropped_unknown_type > 0 {
        log::warn!(
            "{}: kept {} rows, dropped {} without a usable date_added and {} with an unknown type",
            path.display(),
            report.rows_kept(),
            report.dropped_bad_date,
            report.dropped_unknown_type
        );
    }

    let dataset = Dataset::from_titles(titles)?;
    log::info!(
        "Loaded {} of {} titles from {}",
        dataset.len(),
        report.rows_read,
        path.display()
    );
    Ok((dataset, report))
}

// ---------------------------------------------------------------------------
// Snapshot cache
// ---------------------------------------------------------------------------

/// Host-owned cache: each file is parsed at most once per process.
///
/// Entries are stored under the path as given and under its canonical form,
/// so `./titles.csv` and `titles.csv` share one snapshot.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, Arc<Dataset>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the snapshot for `path`, reading it only on first request.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<Dataset>, DataLoadError> {
        if let Some(ds) = self.lookup(path) {
            log::debug!("Reusing cached snapshot of {}", path.display());
            return Ok(ds);
        }
        let dataset = Arc::new(load_file(path)?);
        if let Some(canonical) = canonical_key(path) {
            self.entries.insert(canonical, Arc::clone(&dataset));
        }
        self.entries.insert(path.to_path_buf(), Arc::clone(&dataset));
        Ok(dataset)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.lookup(path).is_some()
    }

    fn lookup(&self, path: &Path) -> Option<Arc<Dataset>> {
        self.entries
            .get(path)
            .or_else(|| canonical_key(path).and_then(|key| self.entries.get(&key)))
            .cloned()
    }
}

/// `None` when the path cannot be resolved (e.g. the file is gone).
fn canonical_key(path: &Path) -> Option<PathBuf> {
    std::fs::canonicalize(path).ok()
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// Header row with at least [`REQUIRED_COLUMNS`]; empty cells are nulls.
fn read_csv(path: &Path) -> Result<Vec<RawTitle>, DataLoadError> {
    let file = std::fs::File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(file);

    let headers: BTreeSet<String> = reader.headers()?.iter().map(str::to_string).collect();
    require_columns(|name| headers.contains(name))?;

    reader
        .deserialize::<RawTitle>()
        .map(|row| row.map_err(DataLoadError::from))
        .collect()
}

fn require_columns(has: impl Fn(&str) -> bool) -> Result<(), DataLoadError> {
    match REQUIRED_COLUMNS.iter().copied().find(|c| !has(c)) {
        Some(missing) => Err(DataLoadError::MissingColumn(missing)),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`:
///
/// ```json
/// [
///   { "type": "Movie", "date_added": "September 25, 2021",
///     "country": "India, Canada", "listed_in": "Dramas", "rating": "PG" },
///   ...
/// ]
/// ```
///
/// A key missing from one record is a null; a key missing from every record
/// is a missing column.
fn read_json(path: &Path) -> Result<Vec<RawTitle>, DataLoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text)?;
    let records: Vec<serde_json::Map<String, JsonValue>> = serde_json::from_value(root)?;

    let seen: BTreeSet<&str> = records
        .iter()
        .flat_map(|obj| obj.keys().map(String::as_str))
        .collect();
    require_columns(|name| seen.contains(name))?;

    Ok(records
        .iter()
        .map(|obj| RawTitle {
            show_id: json_cell(obj, "show_id"),
            content_type: json_cell(obj, "type"),
            date_added: json_cell(obj, "date_added"),
            country: json_cell(obj, "country"),
            listed_in: json_cell(obj, "listed_in"),
            rating: json_cell(obj, "rating"),
        })
        .collect())
}

fn json_cell(obj: &serde_json::Map<String, JsonValue>, key: &str) -> Option<String> {
    match obj.get(key)? {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Load a Parquet file written by Pandas (`df.to_parquet()`) or Polars.
///
/// Text columns may be Utf8, LargeUtf8 or dictionary-encoded; `date_added`
/// may also be a Date32 / Timestamp column.
fn read_parquet(path: &Path) -> Result<Vec<RawTitle>, DataLoadError> {
    let file = std::fs::File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    require_columns(|name| builder.schema().index_of(name).is_ok())?;
    let reader = builder.build()?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        read_batch(&batch, &mut rows)?;
    }
    Ok(rows)
}

fn read_batch(batch: &RecordBatch, rows: &mut Vec<RawTitle>) -> Result<(), DataLoadError> {
    let text = |name: &'static str| -> Result<Option<ArrayRef>, DataLoadError> {
        batch
            .column_by_name(name)
            .map(|col| as_utf8(name, col))
            .transpose()
    };

    let show_id = text("show_id")?;
    let content_type = text("type")?.ok_or(DataLoadError::MissingColumn("type"))?;
    let country = text("country")?.ok_or(DataLoadError::MissingColumn("country"))?;
    let listed_in = text("listed_in")?.ok_or(DataLoadError::MissingColumn("listed_in"))?;
    let rating = text("rating")?.ok_or(DataLoadError::MissingColumn("rating"))?;
    let date_col = batch
        .column_by_name("date_added")
        .ok_or(DataLoadError::MissingColumn("date_added"))?;
    let dates = DateColumn::new(date_col)?;

    for row in 0..batch.num_rows() {
        rows.push(RawTitle {
            show_id: show_id.as_ref().and_then(|c| string_at(c, row)),
            content_type: string_at(&content_type, row),
            date_added: dates.string_at(row),
            country: string_at(&country, row),
            listed_in: string_at(&listed_in, row),
            rating: string_at(&rating, row),
        });
    }
    Ok(())
}

/// Normalise any text-like column to a plain Utf8 array.
fn as_utf8(name: &'static str, col: &ArrayRef) -> Result<ArrayRef, DataLoadError> {
    if col.data_type() == &DataType::Utf8 {
        return Ok(Arc::clone(col));
    }
    if !can_cast_types(col.data_type(), &DataType::Utf8) {
        return Err(DataLoadError::UnsupportedColumnType {
            column: name,
            data_type: format!("{:?}", col.data_type()),
        });
    }
    Ok(cast(col, &DataType::Utf8)?)
}

fn string_at(col: &ArrayRef, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    Some(col.as_string::<i32>().value(row).to_string())
}

/// `date_added` is either text (parsed later like every other source) or a
/// temporal column, rendered back to ISO so cleaning stays format-agnostic.
enum DateColumn {
    Text(ArrayRef),
    Temporal(ArrayRef),
}

impl DateColumn {
    fn new(col: &ArrayRef) -> Result<Self, DataLoadError> {
        match col.data_type() {
            DataType::Date32 => Ok(DateColumn::Temporal(Arc::clone(col))),
            DataType::Date64 | DataType::Timestamp(_, _) => {
                Ok(DateColumn::Temporal(cast(col, &DataType::Date32)?))
            }
            _ => Ok(DateColumn::Text(as_utf8("date_added", col)?)),
        }
    }

    fn string_at(&self, row: usize) -> Option<String> {
        match self {
            DateColumn::Text(col) => string_at(col, row),
            DateColumn::Temporal(col) => {
                if col.is_null(row) {
                    return None;
                }
                col.as_primitive::<Date32Type>()
                    .value_as_date(row)
                    .map(|d| d.format("%Y-%m-%d").to_string())
            }
        }
    }
}
