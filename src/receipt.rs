//! # Thermal Receipt Encoder
//!
//! Turns a [`Payload`] into the ESC/POS byte stream for a thermal printer.
//! Encoding is pure: it cannot fail and touches nothing but its own buffer.
//!
//! ## Stream Layout (58mm, 32 columns)
//!
//! ```text
//! ESC @
//! ESC a 1  "Tentrem Perkasa" LF  ESC a 0
//! --------------------------------
//! No Struk    :              1042
//! Nopol       :        AB 1234 CD
//! Tgl         :  2026-01-20 12:00
//! Operator    :              sari
//! Supplier    :           CV Maju
//! --------------------------------
//! Panjang     :               150
//! Lebar       :                80
//! Tinggi      :                60
//! Plus        :                 5
//! Volume      :           0.72 m3
//! --------------------------------
//! ESC d 2  GS V 0
//! ```
//!
//! Values that do not fit the value column are truncated, never wrapped.

use crate::payload::{Payload, with_unit};
use crate::printer::PaperProfile;
use crate::protocol::buffer::CommandBuffer;

/// Title line printed at the top of every receipt
pub const TITLE: &str = "Tentrem Perkasa";

/// Volume unit on the thermal receipt (plain ASCII for the printer font)
pub const VOLUME_UNIT: &str = "m3";

/// Compose one fixed-column `label: value` line.
///
/// The label is padded to `label_width`, followed by `": "`, then the value
/// right-aligned in `total_cols - label_width - 3` columns and one blank
/// column. Values longer than the value column are cut to fit.
///
/// ```
/// use struk::receipt::label_value_fixed;
///
/// let line = label_value_fixed("Panjang", "150", 32, 12);
/// assert_eq!(line, "Panjang     :               150 ");
/// assert_eq!(line.chars().count(), 32);
/// ```
pub fn label_value_fixed(label: &str, value: &str, total_cols: usize, label_width: usize) -> String {
    let available = total_cols.saturating_sub(label_width + 3);
    let value: String = value.chars().take(available).collect();
    format!(
        "{:<lw$}: {:>av$} ",
        label,
        value,
        lw = label_width,
        av = available
    )
}

/// Encode a receipt for the given paper.
pub fn encode(payload: &Payload, paper: &PaperProfile) -> Vec<u8> {
    let field = |label: &str, value: &str| {
        label_value_fixed(label, value, paper.columns, paper.label_width)
    };

    let mut buf = CommandBuffer::new();
    buf.centered(TITLE).rule(paper.columns);

    for (label, value) in payload.header_lines() {
        buf.line(&field(label, &value));
    }
    buf.rule(paper.columns);

    for (label, value) in payload.dimension_lines() {
        buf.line(&field(label, &value));
    }
    buf.line(&field("Volume", &with_unit(&payload.volume_text(), VOLUME_UNIT)));
    buf.rule(paper.columns);

    buf.feed_and_cut(paper.feed_lines);
    buf.into_bytes()
}

/// Encode a receipt for 58mm paper.
pub fn encode_58mm(payload: &Payload) -> Vec<u8> {
    encode(payload, &PaperProfile::MM58)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_label_value_short_value() {
        let line = label_value_fixed("Panjang", "150", 32, 12);
        assert_eq!(line.chars().count(), 32);
        assert!(line.starts_with("Panjang     : "));
        assert!(line.ends_with("150 "));
    }

    #[test]
    fn test_label_value_truncates_long_value() {
        let line = label_value_fixed("Supplier", "PT Sumber Rejeki Abadi Sentosa", 32, 12);
        assert_eq!(line.chars().count(), 32);
        assert_eq!(line, "Supplier    : PT Sumber Rejeki  ");
    }

    #[test]
    fn test_label_value_exact_fit() {
        let value = "x".repeat(17);
        let line = label_value_fixed("Tgl", &value, 32, 12);
        assert_eq!(line, format!("Tgl         : {} ", value));
    }

    #[test]
    fn test_label_value_empty_value() {
        let line = label_value_fixed("Nopol", "", 32, 12);
        assert_eq!(line, format!("Nopol       : {}", " ".repeat(18)));
    }

    #[test]
    fn test_label_value_counts_characters_not_bytes() {
        let line = label_value_fixed("Operator", "Ñoño", 32, 12);
        assert_eq!(line.chars().count(), 32);
    }

    #[test]
    fn test_encode_frame() {
        let data = encode_58mm(&Payload::new());
        assert_eq!(&data[..2], &[0x1B, 0x40]);
        assert!(data.ends_with(&[0x1B, 0x64, 0x02, 0x1D, 0x56, 0x00]));
    }

    #[test]
    fn test_encode_title_block() {
        let data = encode_58mm(&Payload::new());
        let mut expected = vec![0x1B, 0x40, 0x1B, 0x61, 0x01];
        expected.extend(b"Tentrem Perkasa\n");
        expected.extend([0x1B, 0x61, 0x00]);
        expected.extend("-".repeat(32).as_bytes());
        expected.push(b'\n');
        assert_eq!(&data[..expected.len()], &expected[..]);
    }

    #[test]
    fn test_encode_volume_uses_ascii_unit() {
        let data = encode_58mm(&Payload::new().volume(1234.5));
        let text = String::from_utf8(data).unwrap();
        assert!(text.contains("Volume      :        1234.50 m3 \n"));
    }

    #[test]
    fn test_encode_dimensions_are_bare() {
        let data = encode_58mm(&Payload::new().dimensions(150, 80, 60, 5));
        let text = String::from_utf8(data).unwrap();
        assert!(text.contains("Panjang     :               150 \n"));
        assert!(text.contains("Plus        :                 5 \n"));
        assert!(!text.contains("cm"));
    }

    #[test]
    fn test_encode_80mm_uses_wider_rule() {
        let data = encode(&Payload::new(), &PaperProfile::MM80);
        let text = String::from_utf8_lossy(&data);
        assert!(text.contains(&format!("{}\n", "-".repeat(48))));
    }
}
