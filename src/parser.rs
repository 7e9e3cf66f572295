use csv::{ReaderBuilder, Trim};
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::schedule::{CourseClass, Day, OptionIdAllocator, Period, ScheduleError, TimeSlot};

/// Errors raised while turning a catalog file into classes
#[derive(Debug)]
pub enum CatalogError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
    /// A CSV row holds a value that does not name a day or period.
    InvalidRow { line: u64, message: String },
    /// The catalog describes an impossible class or option.
    Schedule(ScheduleError),
    /// The catalog lists no classes.
    Empty,
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::Csv(e) => write!(f, "CSV error: {}", e),
            Self::Json(e) => write!(f, "JSON error: {}", e),
            Self::InvalidRow { line, message } => write!(f, "line {}: {}", line, message),
            Self::Schedule(e) => write!(f, "invalid catalog: {}", e),
            Self::Empty => write!(f, "catalog lists no classes"),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<std::io::Error> for CatalogError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<csv::Error> for CatalogError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e)
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<ScheduleError> for CatalogError {
    fn from(e: ScheduleError) -> Self {
        Self::Schedule(e)
    }
}

/// One row of the CSV catalog: a single slot of one option of one class
#[derive(Debug, Clone, Deserialize)]
struct CatalogRow {
    code: String,
    name: String,
    option: String,
    day: String,
    period: String,
}

/// A class as written in a JSON catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassRecord {
    pub name: String,
    pub options: Vec<Vec<TimeSlot>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub classes: Vec<ClassRecord>,
}

/// Loads a catalog, choosing the format by extension (`.json` or CSV)
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Vec<CourseClass>, CatalogError> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    debug!("Loading catalog from {}", path.display());
    if is_json {
        let text = std::fs::read_to_string(path)?;
        parse_json_catalog(&text)
    } else {
        read_csv_catalog(File::open(path)?)
    }
}

/// Reads a CSV catalog with the header `code,name,option,day,period`.
///
/// Rows are grouped into classes by `code` and into options by the
/// `option` label, both in order of first appearance. Lines starting
/// with `#` are skipped.
pub fn read_csv_catalog<R: Read>(reader: R) -> Result<Vec<CourseClass>, CatalogError> {
    let mut reader = ReaderBuilder::new()
        .comment(Some(b'#'))
        .trim(Trim::All)
        .from_reader(reader);
    let headers = reader.headers()?.clone();

    let mut records: Vec<ClassRecord> = Vec::new();
    let mut class_index: HashMap<String, usize> = HashMap::new();
    // (class position, option label) -> option position
    let mut option_index: HashMap<(usize, String), usize> = HashMap::new();

    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let row: CatalogRow = record.deserialize(Some(&headers))?;

        let day: Day = row
            .day
            .parse()
            .map_err(|message| CatalogError::InvalidRow { line, message })?;
        let period: Period = row
            .period
            .parse()
            .map_err(|message| CatalogError::InvalidRow { line, message })?;

        let class_pos = *class_index.entry(row.code.clone()).or_insert_with(|| {
            records.push(ClassRecord {
                name: row.name.clone(),
                options: Vec::new(),
            });
            records.len() - 1
        });
        let class = &mut records[class_pos];
        if class.name != row.name {
            warn!(
                "line {}: class {} is already named '{}', ignoring '{}'",
                line, row.code, class.name, row.name
            );
        }

        let option_pos = *option_index
            .entry((class_pos, row.option.clone()))
            .or_insert_with(|| {
                class.options.push(Vec::new());
                class.options.len() - 1
            });
        class.options[option_pos].push(TimeSlot::new(day, period));
    }

    build_classes(records)
}

/// Parses a JSON catalog (`{"classes": [{"name": .., "options": [[slot, ..], ..]}]}`)
pub fn parse_json_catalog(text: &str) -> Result<Vec<CourseClass>, CatalogError> {
    let file: CatalogFile = serde_json::from_str(text)?;
    build_classes(file.classes)
}

/// Validates records and assigns option ids in catalog order
pub fn build_classes(records: Vec<ClassRecord>) -> Result<Vec<CourseClass>, CatalogError> {
    if records.is_empty() {
        return Err(CatalogError::Empty);
    }

    let mut ids = OptionIdAllocator::new();
    let mut classes = Vec::with_capacity(records.len());
    for record in records {
        let options = record
            .options
            .into_iter()
            .map(|slots| ids.option(slots))
            .collect::<Result<Vec<_>, _>>()?;
        classes.push(CourseClass::new(record.name, options)?);
    }

    debug!(
        "Built {} classes with {} options",
        classes.len(),
        ids.allocated()
    );
    Ok(classes)
}
