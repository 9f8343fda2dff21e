//! # Standard Font Metrics
//!
//! Advance widths of the PDF base-14 fonts Helvetica and Helvetica-Bold,
//! in 1/1000 em, taken from the Adobe AFM files. PDF viewers render these
//! fonts from their own copies, so measuring with the AFM widths is exact.
//!
//! Only WinAnsi code points are measured; see [`super::pdf::win_ansi`].

/// A built-in PDF font
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Helvetica,
    HelveticaBold,
}

impl Font {
    /// PostScript base font name
    pub fn base_name(self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Resource name inside the page
    pub fn resource(self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
        }
    }

    /// Advance width of one WinAnsi byte in 1/1000 em.
    pub fn glyph_width(self, byte: u8) -> u16 {
        let table = match self {
            Font::Helvetica => &HELVETICA,
            Font::HelveticaBold => &HELVETICA_BOLD,
        };
        match byte {
            0x20..=0x7E => table[(byte - 0x20) as usize],
            // superscripts, degree and friends share the digit-height glyph box
            0xB2 | 0xB3 | 0xB9 => 333,
            0xB0 => 400,
            0xA0 => 278,
            _ => match self {
                Font::Helvetica => 556,
                Font::HelveticaBold => 611,
            },
        }
    }

    /// Width of encoded text in millimeters at `size` points.
    pub fn text_width_mm(self, encoded: &[u8], size: f32) -> f32 {
        let units: u32 = encoded.iter().map(|&b| self.glyph_width(b) as u32).sum();
        units as f32 / 1000.0 * size * MM_PER_PT
    }
}

/// Millimeters per PostScript point
pub const MM_PER_PT: f32 = 25.4 / 72.0;

/// Helvetica, 0x20 (space) through 0x7E (asciitilde)
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold, 0x20 (space) through 0x7E (asciitilde)
#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_widths() {
        assert_eq!(Font::Helvetica.glyph_width(b' '), 278);
        assert_eq!(Font::Helvetica.glyph_width(b'0'), 556);
        assert_eq!(Font::Helvetica.glyph_width(b'@'), 1015);
        assert_eq!(Font::Helvetica.glyph_width(b'i'), 222);
        assert_eq!(Font::Helvetica.glyph_width(b'~'), 584);
        assert_eq!(Font::HelveticaBold.glyph_width(b'@'), 975);
        assert_eq!(Font::HelveticaBold.glyph_width(b'z'), 500);
        assert_eq!(Font::Helvetica.glyph_width(0xB3), 333);
    }

    #[test]
    fn test_text_width_mm() {
        // ten digits at 10pt: 5560/1000 * 10pt = 55.6pt
        let width = Font::Helvetica.text_width_mm(b"0123456789", 10.0);
        assert!((width - 55.6 * MM_PER_PT).abs() < 1e-3);
        assert_eq!(Font::Helvetica.text_width_mm(b"", 8.0), 0.0);
    }

    #[test]
    fn test_font_names() {
        assert_eq!(Font::Helvetica.base_name(), "Helvetica");
        assert_eq!(Font::HelveticaBold.resource(), "F2");
    }
}
