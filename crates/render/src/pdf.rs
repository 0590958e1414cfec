//! Minimal PDF 1.4 writer for exported solutions.
//!
//! Text is set in the built-in Courier font on US Letter pages with 1 inch
//! margins. Courier is monospaced, so word wrapping is exact by character
//! count. Output is byte-for-byte deterministic for a given input: no
//! timestamps or random IDs are embedded.

use pumpwise_core::error::RenderError;
use pumpwise_core::render::{Document, DocumentRenderer};
use std::fmt::Write as _;
use tracing::debug;

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 72.0;
const FONT_SIZE: f32 = 11.0;
const LINE_HEIGHT: f32 = 14.0;
/// Courier glyphs are 600/1000 em wide.
const CHAR_WIDTH: f32 = FONT_SIZE * 0.6;

pub const PDF_MIME: &str = "application/pdf";

/// Renders text into a paginated PDF document.
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    file_name: String,
    title: Option<String>,
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self::new("pump_solution.pdf")
    }
}

impl PdfRenderer {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            title: None,
        }
    }

    /// Print `title` above the text on the first page and in the document info.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    fn columns() -> usize {
        ((PAGE_WIDTH - 2.0 * MARGIN) / CHAR_WIDTH) as usize
    }

    fn lines_per_page() -> usize {
        ((PAGE_HEIGHT - 2.0 * MARGIN) / LINE_HEIGHT) as usize
    }

    fn layout(&self, text: &str) -> Vec<Vec<String>> {
        let mut lines = Vec::new();
        if let Some(title) = &self.title {
            lines.extend(wrap(title, Self::columns()));
            lines.push(String::new());
        }
        lines.extend(wrap(text, Self::columns()));

        lines
            .chunks(Self::lines_per_page())
            .map(<[String]>::to_vec)
            .collect()
    }
}

impl DocumentRenderer for PdfRenderer {
    fn name(&self) -> &str {
        "pdf"
    }

    fn render(&self, text: &str) -> Result<Document, RenderError> {
        if text.trim().is_empty() {
            return Err(RenderError::EmptyInput);
        }

        let pages = self.layout(text);
        let bytes = write_pdf(&pages, self.title.as_deref());

        debug!(pages = pages.len(), bytes = bytes.len(), "Rendered PDF");
        Ok(Document {
            bytes,
            mime_type: PDF_MIME.into(),
            file_name: self.file_name.clone(),
        })
    }
}

/// Word-wrap `text` to at most `width` characters per line.
///
/// Existing line breaks are kept, blank lines survive, and words longer
/// than a line are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();

    for paragraph in text.replace("\r\n", "\n").replace('\t', "    ").split('\n') {
        let mut line = String::new();
        let mut line_len = 0;

        for word in paragraph.split_whitespace() {
            let mut chars: Vec<char> = word.chars().collect();

            while chars.len() > width {
                if line_len > 0 {
                    out.push(std::mem::take(&mut line));
                    line_len = 0;
                }
                let rest = chars.split_off(width);
                out.push(chars.into_iter().collect());
                chars = rest;
            }

            let word_len = chars.len();
            if word_len == 0 {
                continue;
            }
            if line_len > 0 && line_len + 1 + word_len > width {
                out.push(std::mem::take(&mut line));
                line_len = 0;
            }
            if line_len > 0 {
                line.push(' ');
                line_len += 1;
            }
            line.extend(chars);
            line_len += word_len;
        }

        out.push(line);
    }

    // Drop trailing blank lines so a final newline doesn't cost a page.
    while out.len() > 1 && out.last().is_some_and(String::is_empty) {
        out.pop();
    }
    out
}

/// Encode `s` as a WinAnsi PDF literal string body.
fn encode_literal(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    for c in s.chars() {
        let byte = match c {
            '(' | ')' | '\\' => {
                out.push(b'\\');
                c as u8
            }
            '\u{20AC}' => 0x80,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2026}' => 0x85,
            c if (' '..='~').contains(&c) => c as u8,
            c if ('\u{A0}'..='\u{FF}').contains(&c) => c as u32 as u8,
            _ => b'?',
        };
        out.push(byte);
    }
    out
}

fn page_content(lines: &[String]) -> Vec<u8> {
    let mut content = Vec::new();
    let top = PAGE_HEIGHT - MARGIN - FONT_SIZE;
    content.extend_from_slice(
        format!("BT\n/F1 {FONT_SIZE} Tf\n{LINE_HEIGHT} TL\n{MARGIN} {top} Td\n").as_bytes(),
    );
    for line in lines {
        content.push(b'(');
        content.extend(encode_literal(line));
        content.extend_from_slice(b") Tj T*\n");
    }
    content.extend_from_slice(b"ET\n");
    content
}

/// Serialize pages into a complete PDF file.
///
/// Object layout: 1 catalog, 2 page tree, 3 font, 4 info, then a page
/// object and its content stream for every page.
fn write_pdf(pages: &[Vec<String>], title: Option<&str>) -> Vec<u8> {
    let first_page_obj = 5;
    let page_ids: Vec<usize> = (0..pages.len()).map(|i| first_page_obj + 2 * i).collect();

    let mut objects: Vec<Vec<u8>> = Vec::new();

    objects.push(b"<< /Type /Catalog /Pages 2 0 R >>".to_vec());

    let mut kids = String::new();
    for id in &page_ids {
        let _ = write!(kids, "{id} 0 R ");
    }
    objects.push(
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.trim_end(),
            pages.len()
        )
        .into_bytes(),
    );

    objects.push(
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Courier /Encoding /WinAnsiEncoding >>".to_vec(),
    );

    let mut info = b"<< /Producer (pumpwise)".to_vec();
    if let Some(title) = title {
        info.extend_from_slice(b" /Title (");
        info.extend(encode_literal(title));
        info.push(b')');
    }
    info.extend_from_slice(b" >>");
    objects.push(info);

    for (lines, page_id) in pages.iter().zip(&page_ids) {
        objects.push(
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
                 /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
                page_id + 1
            )
            .into_bytes(),
        );

        let content = page_content(lines);
        let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
        stream.extend(content);
        stream.extend_from_slice(b"endstream");
        objects.push(stream);
    }

    let mut out = b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n", i + 1).as_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref_offset = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        let _ = write!(xref, "{offset:010} 00000 n \n");
    }
    let _ = write!(
        xref,
        "trailer\n<< /Size {} /Root 1 0 R /Info 4 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
        objects.len() + 1
    );
    out.extend_from_slice(xref.as_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_text(doc: &Document) -> String {
        String::from_utf8_lossy(&doc.bytes).into_owned()
    }

    #[test]
    fn renders_pdf_document() {
        let doc = PdfRenderer::default()
            .render("Use a centrifugal pump with a mechanical seal.")
            .unwrap();
        assert_eq!(doc.mime_type, "application/pdf");
        assert_eq!(doc.file_name, "pump_solution.pdf");
        assert!(doc.bytes.starts_with(b"%PDF-1.4"));
        assert!(doc.bytes.ends_with(b"%%EOF\n"));
        assert!(as_text(&doc).contains("(Use a centrifugal pump with a mechanical seal.) Tj"));
    }

    #[test]
    fn empty_text_rejected() {
        for text in ["", "  \n\t"] {
            assert!(matches!(
                PdfRenderer::default().render(text),
                Err(RenderError::EmptyInput)
            ));
        }
    }

    #[test]
    fn output_is_deterministic() {
        let renderer = PdfRenderer::default().with_title("Suggested Solution");
        let a = renderer.render("Same text").unwrap();
        let b = renderer.render("Same text").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn xref_offsets_point_at_objects() {
        let doc = PdfRenderer::default().render("line one\nline two").unwrap();
        // Offsets are byte positions; the binary header comment is not UTF-8.
        let bytes = &doc.bytes;
        let marker = b"startxref\n";
        let tail_at = bytes
            .windows(marker.len())
            .rposition(|w| w == marker)
            .unwrap()
            + marker.len();
        let tail = std::str::from_utf8(&bytes[tail_at..]).unwrap();
        let xref_start: usize = tail.lines().next().unwrap().parse().unwrap();
        assert!(bytes[xref_start..].starts_with(b"xref\n"));

        let xref = std::str::from_utf8(&bytes[xref_start..]).unwrap();
        let entries: Vec<&str> = xref
            .lines()
            .skip(3)
            .take_while(|l| l.ends_with(" n "))
            .collect();
        assert_eq!(entries.len(), 6);
        for (i, entry) in entries.iter().enumerate() {
            let offset: usize = entry[..10].parse().unwrap();
            assert!(
                bytes[offset..].starts_with(format!("{} 0 obj", i + 1).as_bytes()),
                "object {} misplaced",
                i + 1
            );
        }
    }

    #[test]
    fn special_characters_escaped_and_encoded() {
        let doc = PdfRenderer::default()
            .render("Flow (max) 5 m³/h at 80 °C \\ done")
            .unwrap();
        let bytes = &doc.bytes;
        let needle: &[u8] = b"(Flow \\(max\\) 5 m\xB3/h at 80 \xB0C \\\\ done) Tj";
        assert!(bytes.windows(needle.len()).any(|w| w == needle));
    }

    #[test]
    fn long_text_spans_pages() {
        let text = (0..120)
            .map(|i| format!("Line {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let doc = PdfRenderer::default().render(&text).unwrap();
        let body = as_text(&doc);
        let per_page = PdfRenderer::lines_per_page();
        let expected = 120usize.div_ceil(per_page);
        assert!(body.contains(&format!("/Count {expected}")));
        assert!(body.contains("(Line 119) Tj"));
    }

    #[test]
    fn title_goes_first() {
        let doc = PdfRenderer::new("out.pdf")
            .with_title("Suggested Pump Solution")
            .render("Body")
            .unwrap();
        let body = as_text(&doc);
        assert_eq!(doc.file_name, "out.pdf");
        assert!(body.contains("/Title (Suggested Pump Solution)"));
        let title_at = body.find("(Suggested Pump Solution) Tj").unwrap();
        let body_at = body.find("(Body) Tj").unwrap();
        assert!(title_at < body_at);
    }

    #[test]
    fn wrap_breaks_on_words() {
        let lines = wrap("the quick brown fox jumps", 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn wrap_keeps_blank_lines_and_splits_long_words() {
        let lines = wrap("a\n\nabcdefghijkl end\n", 5);
        assert_eq!(lines, vec!["a", "", "abcde", "fghij", "kl", "end"]);
    }

    #[test]
    fn wrap_respects_width() {
        let text = "Centrifugal pumps suit clean low-viscosity fluids at moderate head. ".repeat(20);
        let width = PdfRenderer::columns();
        assert!(wrap(&text, width).iter().all(|l| l.chars().count() <= width));
    }
}
