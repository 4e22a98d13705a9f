//! Worksheet part parsing: `<sheetData>` rows into column-indexed cell strings.

use quick_xml::events::{BytesStart, Event};
use std::collections::BTreeMap;
use std::io::{Read, Seek};
use zip::ZipArchive;

use super::archive::{open_part, xml_err};
use super::value::{coerce, CellKind};
use super::InputFileError;

/// One worksheet row: 1-based row number and 0-based column → coerced value.
#[derive(Debug, Clone, Default)]
pub(super) struct RawRow {
    pub number: u32,
    pub cells: BTreeMap<u32, String>,
}

struct CellState {
    col: u32,
    kind: CellKind,
    text: String,
}

/// Zero-based column index from a cell reference like "AB12".
pub(super) fn column_index(cell_ref: &[u8]) -> Option<u32> {
    let mut col: u32 = 0;
    let mut letters = 0;
    for &b in cell_ref {
        if b.is_ascii_alphabetic() {
            col = col.checked_mul(26)?.checked_add(u32::from(b.to_ascii_uppercase() - b'A' + 1))?;
            letters += 1;
        } else {
            break;
        }
    }
    if letters == 0 {
        None
    } else {
        Some(col - 1)
    }
}

fn parse_u32(value: &[u8]) -> Option<u32> {
    std::str::from_utf8(value).ok()?.trim().parse().ok()
}

fn start_row(e: &BytesStart<'_>, previous: u32) -> RawRow {
    let number = e
        .attributes()
        .flatten()
        .find(|a| a.key.as_ref() == b"r")
        .and_then(|a| parse_u32(&a.value))
        .unwrap_or_else(|| previous.saturating_add(1));
    RawRow {
        number,
        cells: BTreeMap::new(),
    }
}

fn start_cell(e: &BytesStart<'_>, next_col: u32) -> CellState {
    let mut col = next_col;
    let mut kind = CellKind::Number;
    for attr in e.attributes().flatten() {
        match attr.key.as_ref() {
            b"r" => {
                if let Some(c) = column_index(&attr.value) {
                    col = c;
                }
            }
            b"t" => kind = CellKind::from_attr(&attr.value),
            _ => {}
        }
    }
    CellState {
        col,
        kind,
        text: String::new(),
    }
}

/// Reads all rows of the worksheet part at `path`, in document order.
pub(super) fn read_rows<R: Read + Seek>(
    zip: &mut ZipArchive<R>,
    path: &str,
    shared: &[String],
) -> Result<Vec<RawRow>, InputFileError> {
    let Some(mut xml) = open_part(zip, path)? else {
        return Err(InputFileError::MissingPart(path.to_string()));
    };

    let mut rows = Vec::new();
    let mut row: Option<RawRow> = None;
    let mut cell: Option<CellState> = None;
    let mut capture = false;
    let mut last_row = 0;
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf).map_err(xml_err(path))? {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"row" => row = Some(start_row(e, last_row)),
                b"c" if row.is_some() => {
                    let next_col = row
                        .as_ref()
                        .and_then(|r| r.cells.keys().next_back().map(|c| c.saturating_add(1)))
                        .unwrap_or(0);
                    cell = Some(start_cell(e, next_col));
                }
                b"v" | b"t" if cell.is_some() => capture = true,
                _ => {}
            },
            Event::Empty(ref e) if e.local_name().as_ref() == b"row" => {
                last_row = start_row(e, last_row).number;
            }
            Event::Text(ref e) if capture => {
                if let Some(c) = cell.as_mut() {
                    let text = e.unescape().map_err(xml_err(path))?;
                    c.text.push_str(&text);
                }
            }
            Event::CData(ref e) if capture => {
                if let Some(c) = cell.as_mut() {
                    c.text.push_str(&String::from_utf8_lossy(e));
                }
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"v" | b"t" => capture = false,
                b"c" => {
                    if let (Some(c), Some(r)) = (cell.take(), row.as_mut()) {
                        r.cells.insert(c.col, coerce(c.kind, &c.text, shared));
                    }
                }
                b"row" => {
                    if let Some(r) = row.take() {
                        last_row = r.number;
                        rows.push(r);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(rows)
}
