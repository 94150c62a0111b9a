//! Text extraction for document inputs.
//!
//! Plain-text files are read as UTF-8. PDF pages go through `pdf-extract`;
//! DOCX files are zip archives whose body lives in `word/document.xml`.

use anyhow::{anyhow, bail, Context};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::Read;
use std::path::Path;

static PARAGRAPH_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"</w:p>|<w:br\s*/>").unwrap());
static TAB: Lazy<Regex> = Lazy::new(|| Regex::new(r"<w:tab\s*/>").unwrap());
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

const TEXT_EXTENSIONS: [&str; 9] = ["txt", "text", "md", "markdown", "csv", "json", "srt", "vtt", "log"];

/// Kind of document, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Text,
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Files without an extension are treated as text.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let ext = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => ext.to_lowercase(),
            None => return Ok(Self::Text),
        };

        match ext.as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            e if TEXT_EXTENSIONS.contains(&e) => Ok(Self::Text),
            _ => bail!("Unsupported file type: .{}", ext),
        }
    }
}

/// Read the text content of a document.
pub fn extract_text(path: &Path) -> anyhow::Result<String> {
    let kind = DocumentKind::from_path(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    tracing::debug!(path = %path.display(), kind = ?kind, "Extracting document text");

    let text = match kind {
        DocumentKind::Text => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        DocumentKind::Pdf => extract_pdf(path)
            .with_context(|| format!("PDF extraction failed for {}", path.display()))?,
        DocumentKind::Docx => extract_docx(path)
            .with_context(|| format!("DOCX extraction failed for {}", path.display()))?,
    };

    tracing::info!(chars = text.len(), "Extracted document text");
    Ok(text)
}

fn extract_pdf(path: &Path) -> anyhow::Result<String> {
    // pdf-extract panics on some malformed files
    std::panic::catch_unwind(|| pdf_extract::extract_text(path))
        .map_err(|_| anyhow!("PDF parser panicked"))?
        .map_err(|e| anyhow!("{}", e))
}

fn extract_docx(path: &Path) -> anyhow::Result<String> {
    let file = std::fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file).context("Invalid DOCX archive")?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .context("DOCX has no word/document.xml")?
        .read_to_string(&mut xml)?;

    Ok(docx_xml_to_text(&xml))
}

/// Flatten WordprocessingML into plain text, one line per paragraph.
fn docx_xml_to_text(xml: &str) -> String {
    let text = PARAGRAPH_END.replace_all(xml, "\n");
    let text = TAB.replace_all(&text, "\t");
    let text = TAG.replace_all(&text, "");

    let text = text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&");

    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_with_suffix(suffix: &str) -> tempfile::NamedTempFile {
        tempfile::Builder::new().suffix(suffix).tempfile().unwrap()
    }

    fn write_docx(file: &tempfile::NamedTempFile, document_xml: &str) {
        let mut zip = zip::ZipWriter::new(file.reopen().unwrap());
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("word/document.xml", options).unwrap();
        zip.write_all(document_xml.as_bytes()).unwrap();
        zip.finish().unwrap();
    }

    /// A one-page PDF with a correct xref table.
    fn minimal_pdf(text: &str) -> Vec<u8> {
        let content = format!("BT /F1 24 Tf 72 700 Td ({}) Tj ET", text);
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R \
             /Resources << /Font << /F1 5 0 R >> >> >>"
                .to_string(),
            format!(
                "<< /Length {} >>\nstream\n{}\nendstream",
                content.len(),
                content
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).into_bytes());
        }

        let xref_at = pdf.len();
        pdf.extend(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).into_bytes());
        for offset in offsets {
            pdf.extend(format!("{:010} 00000 n \n", offset).into_bytes());
        }
        pdf.extend(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
                objects.len() + 1,
                xref_at
            )
            .into_bytes(),
        );
        pdf
    }

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(DocumentKind::from_path(Path::new("a.PDF")).unwrap(), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_path(Path::new("a.docx")).unwrap(), DocumentKind::Docx);
        assert_eq!(DocumentKind::from_path(Path::new("notes.md")).unwrap(), DocumentKind::Text);
        assert_eq!(DocumentKind::from_path(Path::new("transcript")).unwrap(), DocumentKind::Text);
        assert!(DocumentKind::from_path(Path::new("old.doc")).is_err());
    }

    #[test]
    fn test_unsupported_type_is_reported() {
        let file = temp_with_suffix(".pptx");
        let err = extract_text(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("Unsupported file type: .pptx"));
    }

    #[test]
    fn test_docx_paragraphs_become_lines() {
        let file = temp_with_suffix(".docx");
        write_docx(
            &file,
            r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document><w:body>
<w:p><w:r><w:t>Alice met Bob.</w:t></w:r></w:p>
<w:p><w:r><w:t xml:space="preserve">Fish &amp; chips</w:t></w:r><w:r><w:tab/><w:t>&lt;cheap&gt;</w:t></w:r></w:p>
</w:body></w:document>"#,
        );

        let text = extract_text(file.path()).unwrap();
        assert_eq!(text, "Alice met Bob.\nFish & chips\t<cheap>");
    }

    #[test]
    fn test_docx_without_body_fails() {
        let file = temp_with_suffix(".docx");
        let mut zip = zip::ZipWriter::new(file.reopen().unwrap());
        zip.start_file("other.xml", zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.finish().unwrap();

        let err = extract_text(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("word/document.xml"));
    }

    #[test]
    fn test_pdf_text_is_extracted() {
        let mut file = temp_with_suffix(".pdf");
        file.write_all(&minimal_pdf("Hello PDF world")).unwrap();
        file.flush().unwrap();

        let text = extract_text(file.path()).unwrap();
        assert!(text.contains("Hello"), "{:?}", text);
    }

    #[test]
    fn test_corrupt_pdf_is_an_error() {
        let mut file = temp_with_suffix(".pdf");
        file.write_all(b"this is not a pdf").unwrap();

        let err = extract_text(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("PDF extraction failed"));
    }
}
