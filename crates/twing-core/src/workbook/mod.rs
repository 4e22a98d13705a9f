//! Record source: reads an `.xlsx` workbook into ordered sheets of typed records.
//!
//! The workbook is an OOXML zip package. Sheet order comes from
//! `xl/workbook.xml`; each sheet's first row is the header and names the
//! fields of every following row. Only the `date` and `hash` fields are
//! typed; every other column is kept as a string for diagnostics.

mod archive;
mod error;
mod sheet;
mod value;

pub use error::InputFileError;

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

use sheet::RawRow;

/// Header name of the date column.
pub const DATE_FIELD: &str = "date";
/// Header name of the media hash column.
pub const HASH_FIELD: &str = "hash";

/// One data row of a sheet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    /// 1-based worksheet row number (row 1 is the header).
    pub row: u32,
    pub date: Option<String>,
    pub hash: Option<String>,
    /// Remaining columns, keyed by header name. Not used for planning.
    pub fields: BTreeMap<String, String>,
}

impl Record {
    /// Builds a record from header names and the cells of one row.
    fn from_cells(row: u32, headers: &[(u32, String)], cells: &BTreeMap<u32, String>) -> Self {
        let mut fields = BTreeMap::new();
        for (col, name) in headers {
            if let Some(v) = cells.get(col) {
                fields.insert(name.clone(), v.clone());
            }
        }
        let date = fields.remove(DATE_FIELD);
        let hash = fields.remove(HASH_FIELD);
        Record {
            row,
            date,
            hash,
            fields,
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {} {{ date: {:?}, hash: {:?}",
            self.row,
            self.date.as_deref().unwrap_or(""),
            self.hash.as_deref().unwrap_or("")
        )?;
        for (k, v) in &self.fields {
            write!(f, ", {}: {:?}", k, v)?;
        }
        write!(f, " }}")
    }
}

/// A named sheet and its records in row order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub records: Vec<Record>,
}

/// Loads every sheet of the workbook at `path`, in workbook order.
pub fn load(path: &Path) -> Result<Vec<Sheet>, InputFileError> {
    let file = File::open(path).map_err(|source| InputFileError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let sheets = load_from_reader(BufReader::new(file))?;
    tracing::debug!(
        path = %path.display(),
        sheets = sheets.len(),
        "loaded workbook"
    );
    Ok(sheets)
}

/// Like [`load`] but reads the package from any seekable reader.
pub fn load_from_reader<R: Read + Seek>(reader: R) -> Result<Vec<Sheet>, InputFileError> {
    let mut zip = ZipArchive::new(reader)?;
    let rels = archive::read_workbook_relationships(&mut zip)?;
    let entries = archive::read_sheet_entries(&mut zip, &rels)?;
    let shared = archive::read_shared_strings(&mut zip, rels.shared_strings.as_deref())?;

    let mut sheets = Vec::with_capacity(entries.len());
    for entry in entries {
        let rows = sheet::read_rows(&mut zip, &entry.path, &shared)?;
        sheets.push(Sheet {
            name: entry.name,
            records: records_from_rows(rows),
        });
    }
    Ok(sheets)
}

/// First row is the header; blank rows are dropped.
fn records_from_rows(rows: Vec<RawRow>) -> Vec<Record> {
    let mut rows = rows.into_iter();
    let Some(header_row) = rows.next() else {
        return Vec::new();
    };
    let headers = header_names(&header_row);

    rows.filter(|r| r.cells.values().any(|v| !v.is_empty()))
        .map(|r| Record::from_cells(r.number, &headers, &r.cells))
        .collect()
}

/// Column index → field name. Empty header cells drop their column; repeated
/// names get a `_1`, `_2`, ... suffix so no column is silently shadowed.
fn header_names(header: &RawRow) -> Vec<(u32, String)> {
    let mut seen: BTreeMap<String, u32> = BTreeMap::new();
    let mut out = Vec::with_capacity(header.cells.len());
    for (col, name) in &header.cells {
        if name.is_empty() {
            continue;
        }
        let n = seen.entry(name.clone()).or_insert(0);
        let unique = if *n == 0 {
            name.clone()
        } else {
            format!("{}_{}", name, n)
        };
        *n += 1;
        out.push((*col, unique));
    }
    out
}
