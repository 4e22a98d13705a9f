//! Builds small but real xlsx packages in memory for tests.

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// A test cell. Strings go through the shared string table unless inline.
#[derive(Debug, Clone)]
pub enum Cell {
    Shared(String),
    Inline(String),
    Number(String),
    Bool(bool),
    Empty,
}

pub fn s(v: &str) -> Cell {
    Cell::Shared(v.to_string())
}

pub fn inline(v: &str) -> Cell {
    Cell::Inline(v.to_string())
}

pub fn n(v: &str) -> Cell {
    Cell::Number(v.to_string())
}

/// Header row `date, hash` followed by one row per `(date, hash)`; empty strings become empty cells.
pub fn date_hash_rows(rows: &[(&str, &str)]) -> Vec<Vec<Cell>> {
    let mut out = vec![vec![s("date"), s("hash")]];
    for (d, h) in rows {
        let cell = |v: &str| if v.is_empty() { Cell::Empty } else { s(v) };
        out.push(vec![cell(d), cell(h)]);
    }
    out
}

fn escape(v: &str) -> String {
    v.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn column_letters(mut col: usize) -> String {
    let mut out = Vec::new();
    loop {
        out.push(b'A' + (col % 26) as u8);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    out.reverse();
    String::from_utf8(out).unwrap()
}

/// Serializes sheets (name, rows) to xlsx bytes. Row `i` is written as worksheet row `i + 1`.
pub fn workbook(sheets: &[(&str, Vec<Vec<Cell>>)]) -> Vec<u8> {
    let mut shared: Vec<String> = Vec::new();
    let mut sheet_xml = Vec::new();

    for (_, rows) in sheets {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
        );
        for (ri, row) in rows.iter().enumerate() {
            let r = ri + 1;
            xml.push_str(&format!(r#"<row r="{}">"#, r));
            for (ci, cell) in row.iter().enumerate() {
                let cref = format!("{}{}", column_letters(ci), r);
                match cell {
                    Cell::Shared(v) => {
                        let idx = match shared.iter().position(|x| x == v) {
                            Some(i) => i,
                            None => {
                                shared.push(v.clone());
                                shared.len() - 1
                            }
                        };
                        xml.push_str(&format!(r#"<c r="{}" t="s"><v>{}</v></c>"#, cref, idx));
                    }
                    Cell::Inline(v) => xml.push_str(&format!(
                        r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                        cref,
                        escape(v)
                    )),
                    Cell::Number(v) => {
                        xml.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, cref, v))
                    }
                    Cell::Bool(b) => xml.push_str(&format!(
                        r#"<c r="{}" t="b"><v>{}</v></c>"#,
                        cref,
                        if *b { 1 } else { 0 }
                    )),
                    Cell::Empty => {}
                }
            }
            xml.push_str("</row>");
        }
        xml.push_str("</sheetData></worksheet>");
        sheet_xml.push(xml);
    }

    let mut workbook_xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#,
    );
    let mut rels_xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for (i, (name, _)) in sheets.iter().enumerate() {
        workbook_xml.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape(name),
            i + 1,
            i + 1
        ));
        rels_xml.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            i + 1,
            i + 1
        ));
    }
    workbook_xml.push_str("</sheets></workbook>");
    rels_xml.push_str(&format!(
        r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/></Relationships>"#,
        sheets.len() + 1
    ));

    let mut sst = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">"#,
        shared.len()
    );
    for v in &shared {
        sst.push_str(&format!("<si><t>{}</t></si>", escape(v)));
    }
    sst.push_str("</sst>");

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let opts = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut put = |name: &str, data: &str| {
        zip.start_file(name, opts).unwrap();
        zip.write_all(data.as_bytes()).unwrap();
    };
    put(
        "[Content_Types].xml",
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#,
    );
    put("xl/workbook.xml", &workbook_xml);
    put("xl/_rels/workbook.xml.rels", &rels_xml);
    put("xl/sharedStrings.xml", &sst);
    for (i, xml) in sheet_xml.iter().enumerate() {
        put(&format!("xl/worksheets/sheet{}.xml", i + 1), xml);
    }
    zip.finish().unwrap().into_inner()
}

/// Writes `workbook(sheets)` to `path`.
pub fn write_workbook(path: &std::path::Path, sheets: &[(&str, Vec<Vec<Cell>>)]) {
    std::fs::write(path, workbook(sheets)).unwrap();
}
