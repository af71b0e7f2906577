//! Package assembly: wraps the streamed worksheet part into an XLSX container
//!
//! The container is a ZIP archive whose parts cross-reference each other by
//! fixed IDs: the workbook points at the single sheet through rId1 and at
//! styles.xml through rId2, and every part is declared in
//! `[Content_Types].xml`. Strings are written inline in the sheet part, so
//! no sharedStrings part exists and none is referenced.

use std::io::{Seek, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;
use crate::styles::StyleTable;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>
</Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
</Relationships>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

const CORE_PROPS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
<dc:creator>sheetstream</dc:creator>
</cp:coreProperties>"#;

const APP_PROPS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties">
<Application>sheetstream</Application>
</Properties>"#;

/// Two-phase package writer around the streamed sheet part
///
/// `begin` writes the static parts and opens the sheet entry; the returned
/// ZIP writer is handed to the sheet writer for the streaming phase.
/// `finish` takes it back, writes the remaining parts and seals the archive.
pub struct PackageWriter<'a> {
    sheet_name: &'a str,
    styles: &'a StyleTable,
}

impl<'a> PackageWriter<'a> {
    pub fn new(sheet_name: &'a str, styles: &'a StyleTable) -> Self {
        PackageWriter { sheet_name, styles }
    }

    fn file_options() -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(6))
    }

    /// Write the static preamble parts and open the sheet part's entry
    pub fn begin<W: Write + Seek>(&self, output: W) -> Result<ZipWriter<W>> {
        let mut zip = ZipWriter::new(output);
        let options = Self::file_options();

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(CONTENT_TYPES.as_bytes())?;

        zip.start_file("_rels/.rels", options)?;
        zip.write_all(ROOT_RELS.as_bytes())?;

        zip.start_file("docProps/core.xml", options)?;
        zip.write_all(CORE_PROPS.as_bytes())?;

        zip.start_file("docProps/app.xml", options)?;
        zip.write_all(APP_PROPS.as_bytes())?;

        zip.start_file("xl/worksheets/sheet1.xml", options)?;
        Ok(zip)
    }

    /// Write the remaining parts, seal the archive and hand back the sink.
    /// Expects the sheet part's bytes to be complete.
    pub fn finish<W: Write + Seek>(&self, mut zip: ZipWriter<W>) -> Result<W> {
        let options = Self::file_options();

        zip.start_file("xl/workbook.xml", options)?;
        zip.write_all(self.workbook_xml().as_bytes())?;

        zip.start_file("xl/_rels/workbook.xml.rels", options)?;
        zip.write_all(WORKBOOK_RELS.as_bytes())?;

        zip.start_file("xl/styles.xml", options)?;
        self.styles.write_xml(&mut zip)?;

        Ok(zip.finish()?)
    }

    fn workbook_xml(&self) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
             <workbook xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\" \
             xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\">\n\
             <sheets>\n\
             <sheet name=\"{}\" sheetId=\"1\" r:id=\"rId1\"/>\n\
             </sheets>\n\
             </workbook>",
            escape_attr(self.sheet_name)
        )
    }
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    fn build_package_bytes(sheet_name: &str) -> Vec<u8> {
        let styles = StyleTable::new();
        let package = PackageWriter::new(sheet_name, &styles);

        let mut zip = package.begin(Cursor::new(Vec::new())).unwrap();
        zip.write_all(b"<worksheet><sheetData></sheetData></worksheet>")
            .unwrap();
        package.finish(zip).unwrap().into_inner()
    }

    fn part(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        let mut entry = archive.by_name(name).unwrap();
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn test_package_parts_present() {
        let bytes = build_package_bytes("Data");
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let names: Vec<_> = archive.file_names().collect();

        for expected in [
            "[Content_Types].xml",
            "_rels/.rels",
            "docProps/core.xml",
            "docProps/app.xml",
            "xl/worksheets/sheet1.xml",
            "xl/workbook.xml",
            "xl/_rels/workbook.xml.rels",
            "xl/styles.xml",
        ] {
            assert!(names.contains(&expected), "missing part {expected}");
        }
        assert!(!names.iter().any(|n| n.contains("sharedStrings")));
    }

    #[test]
    fn test_workbook_references_sheet_by_fixed_id() {
        let bytes = build_package_bytes("Data");
        let workbook = part(&bytes, "xl/workbook.xml");
        assert!(workbook.contains("<sheet name=\"Data\" sheetId=\"1\" r:id=\"rId1\"/>"));

        let rels = part(&bytes, "xl/_rels/workbook.xml.rels");
        assert!(rels.contains("Id=\"rId1\""));
        assert!(rels.contains("Target=\"worksheets/sheet1.xml\""));
        assert!(rels.contains("Target=\"styles.xml\""));
    }

    #[test]
    fn test_sheet_name_is_escaped() {
        let bytes = build_package_bytes("A & \"B\"");
        let workbook = part(&bytes, "xl/workbook.xml");
        assert!(workbook.contains("name=\"A &amp; &quot;B&quot;\""));
    }
}
