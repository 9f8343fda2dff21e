//! # Paper Configuration
//!
//! This module defines the paper classes receipts are laid out for.
//!
//! ## Supported Paper
//!
//! | Profile | Paper | Columns (Font A) | Label column |
//! |---------|-------|------------------|--------------|
//! | MM58 | 58mm | 32 chars | 12 chars |
//! | MM80 | 80mm | 48 chars | 12 chars |
//!
//! ## Usage
//!
//! ```
//! use struk::printer::PaperProfile;
//!
//! let paper = PaperProfile::MM58;
//! println!("{} columns, {} for values", paper.columns, paper.value_width());
//! ```

/// # Paper Profile
///
/// Character-grid geometry of a thermal paper class, as used by the
/// control-code path.
///
/// ## Column Layout
///
/// ```text
/// |<- label_width ->|: |<----- value_width ----->| |
/// No Struk        :                 1042
/// ```
///
/// The value area is `columns - label_width - 3`: two columns for `": "`
/// and one reserved blank column at the right edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaperProfile {
    /// Profile name
    pub name: &'static str,

    /// Characters per line in the default font
    pub columns: usize,

    /// Width of the label column in characters
    pub label_width: usize,

    /// Lines fed before the cut command
    pub feed_lines: u8,
}

impl PaperProfile {
    /// # 58mm Receipt Paper
    ///
    /// The common handheld thermal printer class, 32 columns in Font A.
    pub const MM58: Self = Self {
        name: "58mm",
        columns: 32,
        label_width: 12,
        feed_lines: 2,
    };

    /// # 80mm Receipt Paper
    ///
    /// Desktop thermal printers, 48 columns in Font A.
    pub const MM80: Self = Self {
        name: "80mm",
        columns: 48,
        label_width: 12,
        feed_lines: 2,
    };

    /// Columns available to a right-aligned value.
    #[inline]
    pub fn value_width(&self) -> usize {
        self.columns.saturating_sub(self.label_width + 3)
    }

    /// Parse a profile name (`"58mm"`, `"58"`, `"80mm"`, `"80"`).
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().trim_end_matches("mm") {
            "58" => Ok(Self::MM58),
            "80" => Ok(Self::MM80),
            _ => Err(format!("Unknown paper '{}'. Use '58mm' or '80mm'", s)),
        }
    }
}

impl Default for PaperProfile {
    fn default() -> Self {
        Self::MM58
    }
}

// ============================================================================
// VECTOR PAGE LAYOUT
// ============================================================================

/// # Vector Page Layout
///
/// Geometry of the single-page vector receipt, in millimeters with the origin
/// at the top-left corner of the page.
///
/// ## Page Area (MM58)
///
/// ```text
/// ├ 4 ┼──── label 26 ────┼──── value 24 ────┼ 4 ┤
///     x=4                                  x=54
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    /// Page width
    pub page_width: f32,

    /// Page height
    pub page_height: f32,

    /// Left and right margin
    pub margin: f32,

    /// Baseline of the title line
    pub first_baseline: f32,

    /// Distance between baselines
    pub line_height: f32,

    /// Width of the label column
    pub label_column: f32,

    /// Title font size in points
    pub title_size: f32,

    /// Body font size in points
    pub body_size: f32,
}

impl PageLayout {
    /// 58mm wide, 75mm tall receipt page.
    pub const MM58: Self = Self {
        page_width: 58.0,
        page_height: 75.0,
        margin: 4.0,
        first_baseline: 6.0,
        line_height: 5.0,
        label_column: 26.0,
        title_size: 11.0,
        body_size: 8.0,
    };

    /// Width between the margins
    #[inline]
    pub fn content_width(&self) -> f32 {
        self.page_width - self.margin * 2.0
    }

    /// X position where the value column starts
    #[inline]
    pub fn value_column(&self) -> f32 {
        self.margin + self.label_column
    }

    /// Width of the value column: the content left over by the label column
    #[inline]
    pub fn value_column_width(&self) -> f32 {
        self.content_width() - self.label_column
    }

    /// X position of the value column's right edge
    #[inline]
    pub fn value_right(&self) -> f32 {
        self.value_column() + self.value_column_width()
    }

    /// Check that the layout can be drawn.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.page_width > 0.0 && self.page_height > 0.0) {
            return Err(format!(
                "page size {}x{} must be positive",
                self.page_width, self.page_height
            ));
        }
        if !(self.margin >= 0.0 && self.content_width() > 0.0) {
            return Err(format!(
                "margin {} leaves no content width on a {} wide page",
                self.margin, self.page_width
            ));
        }
        if !(self.label_column > 0.0 && self.label_column < self.content_width()) {
            return Err(format!(
                "label column {} must fit inside content width {}",
                self.label_column,
                self.content_width()
            ));
        }
        if !(self.line_height > 0.0 && self.title_size > 0.0 && self.body_size > 0.0) {
            return Err("line height and font sizes must be positive".to_string());
        }
        Ok(())
    }
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::MM58
    }
}

// ============================================================================
// TESTS
// ============================================================================
