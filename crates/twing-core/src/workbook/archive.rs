//! Package-level parts: workbook relationships, sheet list, shared strings.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{BufReader, Read, Seek};
use zip::result::ZipError;
use zip::ZipArchive;

use super::InputFileError;

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
const DEFAULT_SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";

/// Relationships from `xl/_rels/workbook.xml.rels`, resolved to full part paths.
#[derive(Debug, Default)]
pub(super) struct WorkbookRelationships {
    /// rId → part path, e.g. "rId1" → "xl/worksheets/sheet1.xml".
    pub worksheets: HashMap<String, String>,
    pub shared_strings: Option<String>,
}

/// A sheet as listed in `xl/workbook.xml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct SheetEntry {
    pub name: String,
    pub path: String,
}

pub(super) fn open_part<'a, R: Read + Seek>(
    zip: &'a mut ZipArchive<R>,
    part: &str,
) -> Result<Option<Reader<BufReader<zip::read::ZipFile<'a>>>>, InputFileError> {
    match zip.by_name(part) {
        Ok(file) => {
            let mut xml = Reader::from_reader(BufReader::new(file));
            xml.trim_text(false);
            Ok(Some(xml))
        }
        Err(ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub(super) fn xml_err(part: &str) -> impl FnOnce(quick_xml::Error) -> InputFileError + '_ {
    move |source| InputFileError::Xml {
        part: part.to_string(),
        source,
    }
}

fn attr_string(value: &[u8]) -> String {
    String::from_utf8_lossy(value).into_owned()
}

/// Targets are relative to `xl/` unless absolute within the package.
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(stripped) => stripped.to_string(),
        None => format!("xl/{}", target),
    }
}

/// Parse workbook relationships. The part is optional; a missing file yields no entries.
pub(super) fn read_workbook_relationships<R: Read + Seek>(
    zip: &mut ZipArchive<R>,
) -> Result<WorkbookRelationships, InputFileError> {
    let mut rels = WorkbookRelationships::default();
    let Some(mut xml) = open_part(zip, WORKBOOK_RELS_PART)? else {
        return Ok(rels);
    };

    let mut buf = Vec::new();
    loop {
        match xml
            .read_event_into(&mut buf)
            .map_err(xml_err(WORKBOOK_RELS_PART))?
        {
            Event::Empty(ref e) | Event::Start(ref e)
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let mut id = String::new();
                let mut target = String::new();
                let mut rel_type = String::new();
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Id" => id = attr_string(&attr.value),
                        b"Target" => target = attr_string(&attr.value),
                        b"Type" => rel_type = attr_string(&attr.value),
                        _ => {}
                    }
                }
                if !target.is_empty() {
                    if rel_type.ends_with("/worksheet") && !id.is_empty() {
                        rels.worksheets.insert(id, resolve_target(&target));
                    } else if rel_type.ends_with("/sharedStrings") {
                        rels.shared_strings = Some(resolve_target(&target));
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(rels)
}

/// Sheet names and part paths in workbook order.
pub(super) fn read_sheet_entries<R: Read + Seek>(
    zip: &mut ZipArchive<R>,
    rels: &WorkbookRelationships,
) -> Result<Vec<SheetEntry>, InputFileError> {
    let Some(mut xml) = open_part(zip, WORKBOOK_PART)? else {
        return Err(InputFileError::MissingPart(WORKBOOK_PART.to_string()));
    };

    let mut sheets = Vec::new();
    let mut buf = Vec::new();
    loop {
        match xml.read_event_into(&mut buf).map_err(xml_err(WORKBOOK_PART))? {
            Event::Empty(ref e) | Event::Start(ref e) if e.local_name().as_ref() == b"sheet" => {
                let mut name = String::new();
                let mut r_id = String::new();
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"name" => {
                            name = attr
                                .unescape_value()
                                .map(|v| v.into_owned())
                                .unwrap_or_else(|_| attr_string(&attr.value));
                        }
                        // r:id (namespace prefixed)
                        key if key.ends_with(b":id") => r_id = attr_string(&attr.value),
                        _ => {}
                    }
                }
                if !name.is_empty() {
                    let path = rels.worksheets.get(&r_id).cloned().unwrap_or_else(|| {
                        format!("xl/worksheets/sheet{}.xml", sheets.len() + 1)
                    });
                    sheets.push(SheetEntry { name, path });
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(sheets)
}

/// Shared string table. Rich-text runs are concatenated; phonetic runs are skipped.
pub(super) fn read_shared_strings<R: Read + Seek>(
    zip: &mut ZipArchive<R>,
    part: Option<&str>,
) -> Result<Vec<String>, InputFileError> {
    let part = part.unwrap_or(DEFAULT_SHARED_STRINGS_PART);
    let Some(mut xml) = open_part(zip, part)? else {
        return Ok(Vec::new());
    };

    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_si = false;
    let mut in_t = false;
    let mut in_phonetic = false;
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf).map_err(xml_err(part))? {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"si" => {
                    in_si = true;
                    current.clear();
                }
                b"rPh" => in_phonetic = true,
                b"t" if in_si && !in_phonetic => in_t = true,
                _ => {}
            },
            Event::Empty(ref e) if e.local_name().as_ref() == b"si" => strings.push(String::new()),
            Event::Text(ref e) if in_t => {
                let text = e.unescape().map_err(xml_err(part))?;
                current.push_str(&text);
            }
            Event::CData(ref e) if in_t => {
                current.push_str(&String::from_utf8_lossy(e));
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"si" => {
                    strings.push(std::mem::take(&mut current));
                    in_si = false;
                }
                b"rPh" => in_phonetic = false,
                b"t" => in_t = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(strings)
}
