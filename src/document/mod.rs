//! # Vector Receipt Renderer
//!
//! Lays a [`Payload`] out on a narrow single-page PDF, for viewing, saving or
//! printing through the regular document path.
//!
//! ```text
//! ┌──────── 58mm ────────┐
//! │   Tentrem Perkasa    │  bold 11pt, centred
//! │ -------------------- │
//! │ No Struk        1042 │  label at x=4, value right edge at x=54
//! │ Nopol     AB 1234 CD │
//! │ ...                  │
//! │ -------------------- │
//! │ Panjang       150 cm │
//! │ ...                  │
//! │ Volume      0.72 m³  │
//! │ -------------------- │
//! └──────────────────────┘  75mm
//! ```
//!
//! Rendering and saving are separate steps: [`VectorRenderer::render`]
//! only produces bytes, [`persist`] writes them. [`VectorRenderer::render_with`]
//! composes both behind an explicit option.
//!
//! ```
//! use struk::document::VectorRenderer;
//! use struk::payload::Payload;
//!
//! let payload = Payload::new().vehicle_plate("AB 1").date("2026-01-20");
//! let receipt = VectorRenderer::default().render(&payload);
//! assert_eq!(receipt.filename, "receipt_AB 1_2026-01-20.pdf");
//! assert!(receipt.bytes.starts_with(b"%PDF-"));
//! ```

pub mod metrics;
pub mod pdf;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::StrukError;
use crate::payload::{Payload, with_unit};
use crate::printer::PageLayout;
use crate::receipt::TITLE;
use metrics::Font;
use pdf::{PdfPage, win_ansi};

/// Unit suffix of the dimension lines
pub const DIMENSION_UNIT: &str = "cm";

/// Volume unit on the vector receipt
pub const VOLUME_UNIT: &str = "m³";

/// A rendered receipt and the file name it should be saved under
#[derive(Debug, Clone, PartialEq)]
pub struct VectorReceipt {
    pub bytes: Vec<u8>,
    pub filename: String,
}

/// Where one `label value` line is drawn, in millimeters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelValuePlacement {
    pub label_x: f32,
    /// Start of the value column, `label_column` past the margin
    pub value_column: f32,
    pub value_x: f32,
    pub value_width: f32,
    pub value_right: f32,
}

impl LabelValuePlacement {
    /// The value is wider than its column and runs into the label column.
    pub fn overflows(&self) -> bool {
        self.value_x < self.value_column
    }
}

/// Options for [`VectorRenderer::render_with`]
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Also save the document into this directory
    pub persist_dir: Option<PathBuf>,
}

/// Renders payloads onto a fixed page layout.
#[derive(Debug, Clone)]
pub struct VectorRenderer {
    layout: PageLayout,
    rule: String,
}

impl VectorRenderer {
    /// Create a renderer, checking the layout can be drawn.
    pub fn new(layout: PageLayout) -> Result<Self, StrukError> {
        layout.validate().map_err(StrukError::RendererInit)?;
        Ok(Self::with_valid_layout(layout))
    }

    fn with_valid_layout(layout: PageLayout) -> Self {
        let dash = Font::Helvetica.text_width_mm(b"-", layout.body_size);
        let count = (layout.content_width() / dash).floor() as usize;
        Self {
            layout,
            rule: "-".repeat(count),
        }
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    /// The separator rule drawn between blocks
    pub fn rule(&self) -> &str {
        &self.rule
    }

    /// Place a value so that its right edge sits on the value column edge.
    ///
    /// The value column starts `label_column` past the margin and ends at the
    /// content edge. The right edge is the same for every value; long values
    /// extend left over the label column rather than wrapping.
    pub fn place_label_value(&self, value: &str) -> LabelValuePlacement {
        let value_width = Font::Helvetica.text_width_mm(&win_ansi(value), self.layout.body_size);
        let value_right = self.layout.value_right();
        LabelValuePlacement {
            label_x: self.layout.margin,
            value_column: self.layout.value_column(),
            value_x: value_right - value_width,
            value_width,
            value_right,
        }
    }

    /// Render a payload to PDF bytes.
    pub fn render(&self, payload: &Payload) -> VectorReceipt {
        let layout = &self.layout;
        let filename = receipt_filename(payload);

        let mut page = PdfPage::new(layout.page_width, layout.page_height);
        page.set_title(filename.trim_end_matches(".pdf"));
        let mut y = layout.first_baseline;

        let title = win_ansi(TITLE);
        let title_width = Font::HelveticaBold.text_width_mm(&title, layout.title_size);
        let title_x = layout.page_width / 2.0 - title_width / 2.0;
        page.text(Font::HelveticaBold, layout.title_size, title_x, y, &title);
        y += layout.line_height;

        self.draw_rule(&mut page, y);
        y += layout.line_height;

        for (label, value) in payload.header_lines() {
            self.draw_label_value(&mut page, y, label, &value);
            y += layout.line_height;
        }

        self.draw_rule(&mut page, y);
        y += layout.line_height;

        for (label, value) in payload.dimension_lines() {
            self.draw_label_value(&mut page, y, label, &with_unit(&value, DIMENSION_UNIT));
            y += layout.line_height;
        }
        let volume = with_unit(&payload.volume_text(), VOLUME_UNIT);
        self.draw_label_value(&mut page, y, "Volume", &volume);
        y += layout.line_height;

        self.draw_rule(&mut page, y);

        let bytes = page.finish();
        debug!(filename = %filename, bytes = bytes.len(), "Rendered vector receipt");
        VectorReceipt { bytes, filename }
    }

    /// Render, and save the document when `options.persist_dir` is set.
    ///
    /// Returns the receipt and the saved path, if any.
    pub fn render_with(
        &self,
        payload: &Payload,
        options: &RenderOptions,
    ) -> Result<(VectorReceipt, Option<PathBuf>), StrukError> {
        let receipt = self.render(payload);
        let saved = match &options.persist_dir {
            Some(dir) => Some(persist(&receipt.bytes, dir, &receipt.filename)?),
            None => None,
        };
        Ok((receipt, saved))
    }

    fn draw_rule(&self, page: &mut PdfPage, y: f32) {
        page.text(
            Font::Helvetica,
            self.layout.body_size,
            self.layout.margin,
            y,
            self.rule.as_bytes(),
        );
    }

    fn draw_label_value(&self, page: &mut PdfPage, y: f32, label: &str, value: &str) {
        let size = self.layout.body_size;
        let placement = self.place_label_value(value);
        if placement.overflows() {
            debug!(label, value, "Value runs into the label column");
        }
        page.text(Font::Helvetica, size, placement.label_x, y, &win_ansi(label));
        page.text(Font::Helvetica, size, placement.value_x, y, &win_ansi(value));
    }
}

impl Default for VectorRenderer {
    fn default() -> Self {
        Self::with_valid_layout(PageLayout::MM58)
    }
}

/// Characters no file name may contain on any supported platform
const FILENAME_RESERVED: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// `receipt_<plate>_<date>.pdf`, as a single path component.
///
/// Reserved characters and control characters inside the plate or date
/// become `-`.
pub fn receipt_filename(payload: &Payload) -> String {
    let clean = |s: String| {
        s.chars()
            .map(|c| {
                if FILENAME_RESERVED.contains(&c) || c.is_control() {
                    '-'
                } else {
                    c
                }
            })
            .collect::<String>()
    };
    format!(
        "receipt_{}_{}.pdf",
        clean(payload.plate_text()),
        clean(payload.date_text())
    )
}

/// Save document bytes as `dir/filename`, creating `dir` if needed.
pub fn persist(bytes: &[u8], dir: &Path, filename: &str) -> Result<PathBuf, StrukError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    fs::write(&path, bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "Saved receipt");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Payload {
        Payload::new()
            .receipt_id(1042)
            .vehicle_plate("AB 1234 CD")
            .date("2026-01-20 12:00")
            .operator_name("sari")
            .supplier_name("CV Maju")
            .dimensions(150, 80, 60, 5)
            .volume(0.72)
    }

    #[test]
    fn test_rule_fits_content_width() {
        let renderer = VectorRenderer::default();
        assert_eq!(renderer.rule().len(), 53);
    }

    #[test]
    fn test_value_right_edge_is_fixed() {
        let renderer = VectorRenderer::default();
        for value in ["", "1", "150 cm", "PT Sumber Rejeki Abadi Sentosa Jaya"] {
            let p = renderer.place_label_value(value);
            assert!((p.value_x + p.value_width - 54.0).abs() < 1e-3, "{value}");
            assert_eq!(p.value_right, 54.0);
            assert_eq!(p.label_x, 4.0);
        }
    }

    #[test]
    fn test_value_column_follows_label_column() {
        let renderer = VectorRenderer::default();
        let short = renderer.place_label_value("150 cm");
        assert_eq!(short.value_column, 30.0);
        assert!(!short.overflows());

        let long = renderer.place_label_value("PT Sumber Rejeki Abadi Sentosa Jaya");
        assert!(long.overflows());

        let narrow = VectorRenderer::new(PageLayout {
            label_column: 10.0,
            ..PageLayout::MM58
        })
        .unwrap();
        let p = narrow.place_label_value("150 cm");
        assert_eq!(p.value_column, 14.0);
        assert_eq!(p.value_right, 54.0);
    }

    #[test]
    fn test_render_draws_all_lines() {
        let receipt = VectorRenderer::default().render(&sample());
        let text = String::from_utf8_lossy(&receipt.bytes);
        for expected in [
            "(Tentrem Perkasa)",
            "(No Struk)",
            "(1042)",
            "(AB 1234 CD)",
            "(2026-01-20 12:00)",
            "(sari)",
            "(CV Maju)",
            "(150 cm)",
            "(5 cm)",
            "(0.72 m\\263)",
        ] {
            assert!(text.contains(expected), "missing {expected}");
        }
        // three rules
        assert_eq!(text.matches(renderer_rule()).count(), 3);
    }

    fn renderer_rule() -> &'static str {
        "(-----------------------------------------------------)"
    }

    #[test]
    fn test_render_empty_payload() {
        let receipt = VectorRenderer::default().render(&Payload::new());
        assert!(receipt.bytes.starts_with(b"%PDF-1.4"));
        assert_eq!(receipt.filename, "receipt__.pdf");
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = VectorRenderer::default();
        assert_eq!(renderer.render(&sample()), renderer.render(&sample()));
    }

    #[test]
    fn test_filename_sanitized() {
        let payload = Payload::new().vehicle_plate("AB/1").date("20/01/2026 12:00");
        assert_eq!(receipt_filename(&payload), "receipt_AB-1_20-01-2026 12-00.pdf");
    }

    #[test]
    fn test_filename_portable() {
        let payload = Payload::new()
            .vehicle_plate("B*1?<x>|\"q\"")
            .date("2026-01-20\t12:00");
        assert_eq!(
            receipt_filename(&payload),
            "receipt_B-1--x---q-_2026-01-20-12-00.pdf"
        );
    }

    #[test]
    fn test_new_rejects_bad_layout() {
        let layout = PageLayout {
            label_column: 80.0,
            ..PageLayout::MM58
        };
        assert!(matches!(
            VectorRenderer::new(layout),
            Err(StrukError::RendererInit(_))
        ));
        assert!(VectorRenderer::new(PageLayout::MM58).is_ok());
    }

    #[test]
    fn test_render_with_without_persist() {
        let (receipt, saved) = VectorRenderer::default()
            .render_with(&sample(), &RenderOptions::default())
            .unwrap();
        assert!(saved.is_none());
        assert!(!receipt.bytes.is_empty());
    }
}
