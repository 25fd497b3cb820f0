//! Minimal PDF 1.4 writer.
//!
//! Supports exactly what the inventory report needs: A4 pages, the two standard
//! Helvetica faces, left-aligned text and stroked rectangles. Output depends only
//! on the inputs (no random document ids, no clock reads), so the same pages and
//! metadata always serialize to the same bytes.

use chrono::{DateTime, Utc};
use std::fmt::Write as _;

/// A4 portrait width in points.
pub const PAGE_WIDTH: f32 = 595.0;
/// A4 portrait height in points.
pub const PAGE_HEIGHT: f32 = 842.0;

// Fixed object numbers; pages follow from FIRST_PAGE_OBJECT in (page, contents) pairs
const CATALOG_OBJECT: usize = 1;
const PAGES_OBJECT: usize = 2;
const REGULAR_FONT_OBJECT: usize = 3;
const BOLD_FONT_OBJECT: usize = 4;
const INFO_OBJECT: usize = 5;
const FIRST_PAGE_OBJECT: usize = 6;

/// Standard fonts available on every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    /// Helvetica
    Regular,
    /// Helvetica-Bold
    Bold,
}

impl Font {
    const fn resource_name(self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
        }
    }
}

/// Drawing operations for one page. Coordinates are in points from the bottom-left corner.
#[derive(Debug, Clone)]
pub struct Page {
    content: String,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    /// Creates an empty page with a thin stroke width.
    #[must_use]
    pub fn new() -> Self {
        Self {
            content: "0.5 w\n".to_string(),
        }
    }

    /// Draws `text` with its baseline starting at (`x`, `y`).
    pub fn text(&mut self, x: f32, y: f32, font: Font, size: f32, text: &str) {
        let _ = writeln!(
            self.content,
            "BT /{} {size:.1} Tf {x:.2} {y:.2} Td ({}) Tj ET",
            font.resource_name(),
            escape_text(text)
        );
    }

    /// Strokes the outline of a rectangle whose lower-left corner is (`x`, `y`).
    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let _ = writeln!(self.content, "{x:.2} {y:.2} {width:.2} {height:.2} re S");
    }

    fn as_bytes(&self) -> &[u8] {
        self.content.as_bytes()
    }
}

/// Document-level metadata written to the info dictionary.
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    /// Document title
    pub title: String,
    /// Creation timestamp, supplied by the caller
    pub created_at: DateTime<Utc>,
}

/// Serializes `pages` into a complete PDF file.
#[must_use]
pub fn render(pages: &[Page], info: &DocumentInfo) -> Vec<u8> {
    let mut out: Vec<u8> = Vec::new();
    let mut offsets: Vec<usize> = Vec::new();

    out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

    let page_ids: Vec<usize> = (0..pages.len())
        .map(|i| FIRST_PAGE_OBJECT + 2 * i)
        .collect();
    let kids = page_ids
        .iter()
        .map(|id| format!("{id} 0 R"))
        .collect::<Vec<_>>()
        .join(" ");

    write_object(
        &mut out,
        &mut offsets,
        CATALOG_OBJECT,
        format!("<< /Type /Catalog /Pages {PAGES_OBJECT} 0 R >>").as_bytes(),
    );
    write_object(
        &mut out,
        &mut offsets,
        PAGES_OBJECT,
        format!("<< /Type /Pages /Kids [{kids}] /Count {} >>", pages.len()).as_bytes(),
    );
    write_object(
        &mut out,
        &mut offsets,
        REGULAR_FONT_OBJECT,
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
    );
    write_object(
        &mut out,
        &mut offsets,
        BOLD_FONT_OBJECT,
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>",
    );
    write_object(
        &mut out,
        &mut offsets,
        INFO_OBJECT,
        format!(
            "<< /Title ({}) /Producer (stockroom) /CreationDate ({}) >>",
            escape_text(&info.title),
            info.created_at.format("D:%Y%m%d%H%M%SZ")
        )
        .as_bytes(),
    );

    for (page, page_id) in pages.iter().zip(&page_ids) {
        let contents_id = page_id + 1;
        write_object(
            &mut out,
            &mut offsets,
            *page_id,
            format!(
                "<< /Type /Page /Parent {PAGES_OBJECT} 0 R \
                 /MediaBox [0 0 {PAGE_WIDTH:.0} {PAGE_HEIGHT:.0}] \
                 /Resources << /Font << /F1 {REGULAR_FONT_OBJECT} 0 R /F2 {BOLD_FONT_OBJECT} 0 R >> >> \
                 /Contents {contents_id} 0 R >>"
            )
            .as_bytes(),
        );

        let stream = page.as_bytes();
        let mut body = format!("<< /Length {} >>\nstream\n", stream.len()).into_bytes();
        body.extend_from_slice(stream);
        body.extend_from_slice(b"endstream");
        write_object(&mut out, &mut offsets, contents_id, &body);
    }

    let xref_offset = out.len();
    let object_count = offsets.len() + 1;
    let mut xref = format!("xref\n0 {object_count}\n0000000000 65535 f \n");
    for offset in &offsets {
        let _ = writeln!(xref, "{offset:010} 00000 n ");
    }
    let _ = write!(
        xref,
        "trailer\n<< /Size {object_count} /Root {CATALOG_OBJECT} 0 R /Info {INFO_OBJECT} 0 R >>\n\
         startxref\n{xref_offset}\n%%EOF\n"
    );
    out.extend_from_slice(xref.as_bytes());
    out
}

/// Objects must be written in id order so `offsets[id - 1]` is the object's offset.
fn write_object(out: &mut Vec<u8>, offsets: &mut Vec<usize>, id: usize, body: &[u8]) {
    debug_assert_eq!(offsets.len() + 1, id);
    offsets.push(out.len());
    out.extend_from_slice(format!("{id} 0 obj\n").as_bytes());
    out.extend_from_slice(body);
    out.extend_from_slice(b"\nendobj\n");
}

/// Escapes a string for a PDF literal.
///
/// Characters outside printable ASCII are written as octal escapes of their
/// `WinAnsiEncoding` byte; anything the standard fonts cannot show becomes `?`.
#[must_use]
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' | '(' | ')' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            ' '..='~' => escaped.push(ch),
            _ => match win_ansi_byte(ch) {
                Some(byte) => {
                    let _ = write!(escaped, "\\{byte:03o}");
                }
                None => escaped.push('?'),
            },
        }
    }
    escaped
}

/// `WinAnsiEncoding` byte for a non-ASCII character.
///
/// 0xA0..=0xFF agree with Latin-1; 0x80..=0x9F hold typographic punctuation
/// and a handful of extra letters.
const fn win_ansi_byte(ch: char) -> Option<u8> {
    let byte = match ch {
        '\u{a0}'..='\u{ff}' => ch as u8,
        '\u{20ac}' => 0x80,
        '\u{201a}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201e}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02c6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8a,
        '\u{2039}' => 0x8b,
        '\u{0152}' => 0x8c,
        '\u{017d}' => 0x8e,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201c}' => 0x93,
        '\u{201d}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02dc}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9a,
        '\u{203a}' => 0x9b,
        '\u{0153}' => 0x9c,
        '\u{017e}' => 0x9e,
        '\u{0178}' => 0x9f,
        _ => return None,
    };
    Some(byte)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use chrono::TimeZone;

    fn info() -> DocumentInfo {
        DocumentInfo {
            title: "Test".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
        }
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a(b)c\\"), "a\\(b\\)c\\\\");
        assert_eq!(escape_text("Categoría"), "Categor\\355a");
        assert_eq!(escape_text("box 📦"), "box ?");
        assert_eq!(escape_text("tab\there"), "tab?here");
    }

    #[test]
    fn test_escape_text_maps_win_ansi_punctuation() {
        assert_eq!(escape_text("\u{20ac}5"), "\\2005");
        assert_eq!(escape_text("\u{201c}ok\u{201d}"), "\\223ok\\224");
        assert_eq!(escape_text("a\u{2013}b\u{2026}"), "a\\226b\\205");
        assert_eq!(escape_text("\u{0160}koda"), "\\212koda");
        // 0x81 is unassigned in WinAnsi, so its Unicode twin has no mapping
        assert_eq!(escape_text("\u{81}"), "?");
    }

    #[test]
    fn test_render_structure() {
        let mut page = Page::new();
        page.text(10.0, 20.0, Font::Bold, 12.0, "Hello");
        page.rect(0.0, 0.0, 5.0, 5.0);
        let bytes = render(&[page], &info());
        let text = String::from_utf8_lossy(&bytes);

        assert!(bytes.starts_with(b"%PDF-1.4\n"));
        assert!(text.ends_with("%%EOF\n"));
        assert!(text.contains("/Count 1"));
        assert!(text.contains("BT /F2 12.0 Tf 10.00 20.00 Td (Hello) Tj ET"));
        assert!(text.contains("0.00 0.00 5.00 5.00 re S"));
        assert!(text.contains("/CreationDate (D:20260102030405Z)"));
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let bytes = render(&[Page::new(), Page::new()], &info());
        let text = String::from_utf8_lossy(&bytes).into_owned();

        let xref_start = text.find("xref\n").unwrap();
        let entries: Vec<usize> = text[xref_start..]
            .lines()
            .skip(3)
            .take_while(|line| line.ends_with(" n "))
            .map(|line| line[..10].parse().unwrap())
            .collect();
        // catalog, pages, 2 fonts, info, then 2 * (page, contents)
        assert_eq!(entries.len(), 9);
        for (i, offset) in entries.iter().enumerate() {
            let expected = format!("{} 0 obj", i + 1);
            assert!(bytes[*offset..].starts_with(expected.as_bytes()));
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let mut page = Page::new();
        page.text(1.0, 2.0, Font::Regular, 8.0, "Same");
        assert_eq!(
            render(std::slice::from_ref(&page), &info()),
            render(&[page], &info())
        );
    }
}
