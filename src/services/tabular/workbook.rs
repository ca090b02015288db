//! Minimal SpreadsheetML package writer: one workbook, one worksheet.

use super::cell::{self, CellValue, TabularGrid};
use super::TabularError;
use crate::services::template::xml_escape;
use chrono::{SecondsFormat, Utc};
use std::io::{Seek, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const SHEET_NAME: &str = "Sheet1";

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const CONTENT_TYPES: &str = concat!(
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
    r#"<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
    r#"<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
    r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#,
    r#"</Types>"#
);

const ROOT_RELS: &str = concat!(
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>"#,
    r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>"#,
    r#"</Relationships>"#
);

const WORKBOOK_RELS: &str = concat!(
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>"#,
    r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
    r#"</Relationships>"#
);

const STYLES: &str = concat!(
    r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    r#"<fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>"#,
    r#"<fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills>"#,
    r#"<borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>"#,
    r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#,
    r#"<cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs>"#,
    r#"<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>"#,
    r#"</styleSheet>"#
);

/// Writes `grid` as a complete `.xlsx` package into `writer`.
pub fn write_workbook<W: Write + Seek>(grid: &TabularGrid, writer: W) -> Result<W, TabularError> {
    let sheet = sheet_xml(grid)?;
    if grid
        .title
        .as_deref()
        .is_some_and(|t| t.chars().any(is_forbidden_in_xml))
    {
        return Err(TabularError::InvalidCharacter("title".to_string()));
    }

    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts: [(&str, String); 7] = [
        ("[Content_Types].xml", with_declaration(CONTENT_TYPES)),
        ("_rels/.rels", with_declaration(ROOT_RELS)),
        ("docProps/core.xml", core_properties_xml(grid.title.as_deref())),
        ("xl/workbook.xml", workbook_xml()),
        ("xl/_rels/workbook.xml.rels", with_declaration(WORKBOOK_RELS)),
        ("xl/styles.xml", with_declaration(STYLES)),
        ("xl/worksheets/sheet1.xml", sheet),
    ];

    for (name, body) in parts {
        zip.start_file(name, options)?;
        zip.write_all(body.as_bytes())?;
    }

    Ok(zip.finish()?)
}

fn with_declaration(body: &str) -> String {
    format!("{XML_DECLARATION}\n{body}")
}

fn workbook_xml() -> String {
    format!(
        concat!(
            "{decl}\n",
            r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
            r#"<sheets><sheet name="{sheet}" sheetId="1" r:id="rId1"/></sheets>"#,
            r#"</workbook>"#
        ),
        decl = XML_DECLARATION,
        sheet = SHEET_NAME
    )
}

fn core_properties_xml(title: Option<&str>) -> String {
    let created = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let title = title
        .map(|t| format!("<dc:title>{}</dc:title>", xml_escape(t)))
        .unwrap_or_default();
    format!(
        concat!(
            "{decl}\n",
            r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
            r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
            r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
            "{title}",
            r#"<dcterms:created xsi:type="dcterms:W3CDTF">{created}</dcterms:created>"#,
            r#"</cp:coreProperties>"#
        ),
        decl = XML_DECLARATION,
        title = title,
        created = created
    )
}

/// Renders the worksheet part. Row `n` of the grid lands on sheet row `n + 1`,
/// its first cell in column `A`.
pub(crate) fn sheet_xml(grid: &TabularGrid) -> Result<String, TabularError> {
    let mut rows = String::new();
    for (idx, row) in grid.rows.iter().enumerate() {
        let row_number = to_index(idx, TabularError::RowOutOfRange)?;
        rows.push_str(&format!(r#"<row r="{row_number}">"#));
        for (col, value) in row.iter().enumerate() {
            let column = to_index(col, TabularError::ColumnOutOfRange)?;
            let reference = cell::cell_name(column, row_number)?;
            rows.push_str(&cell_xml(&reference, value)?);
        }
        rows.push_str("</row>");
    }

    let dimension = match (grid.rows.len(), grid.width()) {
        (0, _) | (_, 0) => "A1".to_string(),
        (height, width) => format!(
            "A1:{}",
            cell::cell_name(
                to_index(width - 1, TabularError::ColumnOutOfRange)?,
                to_index(height - 1, TabularError::RowOutOfRange)?
            )?
        ),
    };

    Ok(format!(
        concat!(
            "{decl}\n",
            r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
            r#"<dimension ref="{dimension}"/>"#,
            "<sheetData>{rows}</sheetData>",
            "</worksheet>"
        ),
        decl = XML_DECLARATION,
        dimension = dimension,
        rows = rows
    ))
}

fn cell_xml(reference: &str, value: &CellValue) -> Result<String, TabularError> {
    Ok(match value {
        CellValue::Empty => String::new(),
        CellValue::Bool(b) => format!(r#"<c r="{reference}" t="b"><v>{}</v></c>"#, u8::from(*b)),
        CellValue::Integer(n) => format!(r#"<c r="{reference}"><v>{n}</v></c>"#),
        CellValue::Number(n) => {
            if !n.is_finite() {
                return Err(TabularError::NonFiniteNumber(reference.to_string()));
            }
            format!(r#"<c r="{reference}"><v>{n}</v></c>"#)
        }
        CellValue::Text(s) => {
            if s.chars().any(is_forbidden_in_xml) {
                return Err(TabularError::InvalidCharacter(reference.to_string()));
            }
            format!(
                r#"<c r="{reference}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                xml_escape(s)
            )
        }
    })
}

/// Characters outside the XML 1.0 `Char` production. Tab, LF and CR are allowed.
fn is_forbidden_in_xml(c: char) -> bool {
    matches!(
        c,
        '\u{0}'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}'
    )
}

/// 0-based position to 1-based sheet index; `out_of_range` names the axis.
pub(super) fn to_index(
    position: usize,
    out_of_range: fn(u32) -> TabularError,
) -> Result<u32, TabularError> {
    u32::try_from(position)
        .ok()
        .and_then(|p| p.checked_add(1))
        .ok_or_else(|| out_of_range(u32::MAX))
}
