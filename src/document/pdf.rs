//! # Minimal PDF Writer
//!
//! Writes a single-page PDF 1.4 file containing text drawn with the built-in
//! Helvetica fonts. No fonts are embedded and no compression is applied, so
//! output is small, deterministic and byte-comparable in tests.
//!
//! ## Object Layout
//!
//! | Object | Content |
//! |--------|---------|
//! | 1 | Catalog |
//! | 2 | Page tree |
//! | 3 | Page (MediaBox, font resources) |
//! | 4 | Content stream |
//! | 5 | Font F1 (Helvetica, WinAnsiEncoding) |
//! | 6 | Font F2 (Helvetica-Bold, WinAnsiEncoding) |
//! | 7 | Info dictionary |
//!
//! Coordinates passed in are millimeters from the top-left corner; they are
//! converted to PDF points from the bottom-left corner.

use std::fmt::Write as _;

use super::metrics::{Font, MM_PER_PT};

/// One page under construction
#[derive(Debug, Clone)]
pub struct PdfPage {
    width_mm: f32,
    height_mm: f32,
    content: Vec<u8>,
    title: String,
}

impl PdfPage {
    pub fn new(width_mm: f32, height_mm: f32) -> Self {
        Self {
            width_mm,
            height_mm,
            content: Vec::new(),
            title: String::new(),
        }
    }

    /// Set the document title stored in the info dictionary.
    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    /// Draw WinAnsi-encoded text with its baseline at (`x_mm`, `y_mm`).
    pub fn text(&mut self, font: Font, size: f32, x_mm: f32, y_mm: f32, encoded: &[u8]) {
        let x = x_mm / MM_PER_PT;
        let y = (self.height_mm - y_mm) / MM_PER_PT;
        let mut op = String::new();
        let _ = write!(
            op,
            "BT /{} {} Tf {:.2} {:.2} Td ",
            font.resource(),
            fmt_num(size),
            x,
            y
        );
        self.content.extend(op.as_bytes());
        self.content.extend(literal_string(encoded));
        self.content.extend(b" Tj ET\n");
    }

    /// Raw content stream drawn so far
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Serialize the complete document.
    pub fn finish(self) -> Vec<u8> {
        let width = self.width_mm / MM_PER_PT;
        let height = self.height_mm / MM_PER_PT;

        let mut out: Vec<u8> = Vec::with_capacity(self.content.len() + 1024);
        out.extend(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

        let mut offsets = Vec::with_capacity(7);
        let mut object = |out: &mut Vec<u8>, body: &[u8]| {
            offsets.push(out.len());
            let number = offsets.len();
            out.extend(format!("{} 0 obj\n", number).as_bytes());
            out.extend(body);
            out.extend(b"\nendobj\n");
        };

        object(&mut out, b"<< /Type /Catalog /Pages 2 0 R >>");
        object(&mut out, b"<< /Type /Pages /Kids [3 0 R] /Count 1 >>");
        object(
            &mut out,
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Resources << /Font << /F1 5 0 R /F2 6 0 R >> >> /Contents 4 0 R >>",
                width, height
            )
            .as_bytes(),
        );

        let mut stream = format!("<< /Length {} >>\nstream\n", self.content.len()).into_bytes();
        stream.extend(&self.content);
        stream.extend(b"\nendstream");
        object(&mut out, &stream);

        for font in [Font::Helvetica, Font::HelveticaBold] {
            object(
                &mut out,
                format!(
                    "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                    font.base_name()
                )
                .as_bytes(),
            );
        }

        let mut info = b"<< /Producer (struk) /Title ".to_vec();
        info.extend(literal_string(&win_ansi(&self.title)));
        info.extend(b" >>");
        object(&mut out, &info);

        let xref_offset = out.len();
        out.extend(format!("xref\n0 {}\n", offsets.len() + 1).as_bytes());
        out.extend(b"0000000000 65535 f \n");
        for offset in &offsets {
            out.extend(format!("{:010} 00000 n \n", offset).as_bytes());
        }
        out.extend(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R /Info 7 0 R >>\nstartxref\n{}\n%%EOF\n",
                offsets.len() + 1,
                xref_offset
            )
            .as_bytes(),
        );
        out
    }
}

/// Format a number without a trailing `.0`.
fn fmt_num(n: f32) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        format!("{:.2}", n)
    }
}

/// Encode a string as WinAnsi (Windows-1252) bytes.
///
/// Latin-1 passes through, the typographic punctuation of 0x80-0x9F is
/// mapped, everything else becomes `?`.
pub fn win_ansi(s: &str) -> Vec<u8> {
    s.chars()
        .map(|ch| match ch {
            ' '..='~' => ch as u8,
            '\t' => b' ',
            '\u{A0}'..='\u{FF}' => ch as u32 as u8,
            '€' => 0x80,
            '‚' => 0x82,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            _ => b'?',
        })
        .collect()
}

/// PDF literal string: parentheses and backslash escaped, high bytes octal.
fn literal_string(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() + 2);
    out.push(b'(');
    for &b in bytes {
        match b {
            b'(' | b')' | b'\\' => {
                out.push(b'\\');
                out.push(b);
            }
            0x20..=0x7E => out.push(b),
            _ => out.extend(format!("\\{:03o}", b).as_bytes()),
        }
    }
    out.push(b')');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_ansi() {
        assert_eq!(win_ansi("m³"), vec![b'm', 0xB3]);
        assert_eq!(win_ansi("Ñ€"), vec![0xD1, 0x80]);
        assert_eq!(win_ansi("日本"), b"??".to_vec());
    }

    #[test]
    fn test_literal_string_escapes() {
        assert_eq!(literal_string(b"a(b)\\"), b"(a\\(b\\)\\\\)".to_vec());
        assert_eq!(literal_string(&[b'm', 0xB3]), b"(m\\263)".to_vec());
    }

    #[test]
    fn test_text_op_converts_to_points() {
        let mut page = PdfPage::new(58.0, 75.0);
        page.text(Font::Helvetica, 8.0, 25.4, 75.0 - 25.4, b"x");
        assert_eq!(page.content(), b"BT /F1 8 Tf 72.00 72.00 Td (x) Tj ET\n");
    }

    #[test]
    fn test_finish_structure() {
        let mut page = PdfPage::new(58.0, 75.0);
        page.set_title("receipt");
        page.text(Font::HelveticaBold, 11.0, 10.0, 6.0, b"Hi");
        let pdf = page.finish();
        let text = String::from_utf8_lossy(&pdf);

        assert!(pdf.starts_with(b"%PDF-1.4\n"));
        assert!(pdf.ends_with(b"%%EOF\n"));
        assert!(text.contains("/MediaBox [0 0 164.41 212.60]"));
        assert!(text.contains("/BaseFont /Helvetica-Bold"));
        assert!(text.contains("/Title (receipt)"));
        assert!(text.contains("xref\n0 8\n"));
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let pdf = PdfPage::new(58.0, 75.0).finish();
        let text = String::from_utf8_lossy(&pdf).into_owned();
        let xref = text.find("xref\n").unwrap();
        let entries: Vec<usize> = text[xref..]
            .lines()
            .skip(3)
            .take(7)
            .map(|line| line[..10].parse().unwrap())
            .collect();
        for (i, offset) in entries.iter().enumerate() {
            let expected = format!("{} 0 obj", i + 1);
            assert_eq!(&pdf[*offset..*offset + expected.len()], expected.as_bytes());
        }
    }
}
