//! # Receipt Rendering Tests
//!
//! End-to-end checks of both renderers against the same payloads.
//!
//! - **Thermal**: the full ESC/POS stream is compared byte for byte.
//! - **Vector**: the PDF content stream is checked for every drawn line.

use pretty_assertions::assert_eq;
use struk::document::{self, RenderOptions, VectorRenderer};
use struk::receipt::{self, label_value_fixed};
use struk::{PaperProfile, Payload};

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

// ============================================================================
// THERMAL
// ============================================================================

#[test]
fn test_escpos_full_stream() {
    let data = receipt::encode_58mm(&sample());

    let mut expected: Vec<u8> = vec![0x1B, 0x40, 0x1B, 0x61, 0x01];
    expected.extend(b"Tentrem Perkasa\n");
    expected.extend([0x1B, 0x61, 0x00]);
    let rule = format!("{}\n", "-".repeat(32));
    let body = [
        rule.clone(),
        "No Struk    :              1042 \n".to_string(),
        "Nopol       :        AB 1234 CD \n".to_string(),
        "Tgl         :  2026-01-20 12:00 \n".to_string(),
        "Operator    :              sari \n".to_string(),
        "Supplier    :           CV Maju \n".to_string(),
        rule.clone(),
        "Panjang     :               150 \n".to_string(),
        "Lebar       :                80 \n".to_string(),
        "Tinggi      :                60 \n".to_string(),
        "Plus        :                 5 \n".to_string(),
        "Volume      :           0.72 m3 \n".to_string(),
        rule,
    ]
    .concat();
    expected.extend(body.as_bytes());
    expected.extend([0x1B, 0x64, 0x02, 0x1D, 0x56, 0x00]);

    assert_eq!(data, expected);
}

#[test]
fn test_escpos_frame_for_any_payload() {
    let payloads = [
        Payload::new(),
        sample(),
        Payload::new().supplier_name("x".repeat(200)).volume("not a number"),
    ];
    for payload in &payloads {
        for paper in [PaperProfile::MM58, PaperProfile::MM80] {
            let data = receipt::encode(payload, &paper);
            assert_eq!(&data[..2], &[0x1B, 0x40]);
            assert!(data.ends_with(&[0x1B, 0x64, 0x02, 0x1D, 0x56, 0x00]));
        }
    }
}

#[test]
fn test_escpos_lines_have_fixed_width() {
    let payload = Payload::new()
        .receipt_id("RCPT-2026-000000000001")
        .supplier_name("PT Sumber Rejeki Abadi Sentosa");
    let data = receipt::encode_58mm(&payload);
    let text = String::from_utf8(data).unwrap();
    for line in text.lines().filter(|l| l.contains(" : ") || l.contains(": ")) {
        assert_eq!(line.chars().count(), 32, "{line:?}");
    }
}

#[test]
fn test_label_value_boundaries() {
    let short = label_value_fixed("Panjang", "150", 32, 12);
    let long = label_value_fixed("Panjang", "123456789012345678901234", 32, 12);
    assert_eq!(short.chars().count(), 32);
    assert_eq!(long.chars().count(), 32);
    assert_eq!(long, "Panjang     : 12345678901234567 ");
}

// ============================================================================
// VECTOR
// ============================================================================

#[test]
fn test_pdf_missing_fields_render() {
    let receipt = VectorRenderer::default().render(&Payload::new());
    let text = String::from_utf8_lossy(&receipt.bytes);
    assert!(text.contains("(No Struk)"));
    assert!(text.contains("(Volume)"));
    assert!(receipt.bytes.ends_with(b"%%EOF\n"));
}

#[test]
fn test_pdf_page_size() {
    let receipt = VectorRenderer::default().render(&sample());
    let text = String::from_utf8_lossy(&receipt.bytes);
    // 58mm x 75mm in points
    assert!(text.contains("/MediaBox [0 0 164.41 212.60]"));
}

#[test]
fn test_volume_units_differ_between_paths() {
    let payload = Payload::new().volume(1234.5);

    let pdf = VectorRenderer::default().render(&payload);
    let pdf_text = String::from_utf8_lossy(&pdf.bytes);
    // "m³" in WinAnsi: 0xB3, octal-escaped
    assert!(pdf_text.contains("(1234.50 m\\263)"));

    let escpos = receipt::encode_58mm(&payload);
    let escpos_text = String::from_utf8(escpos).unwrap();
    assert!(escpos_text.contains("1234.50 m3 \n"));
}

#[test]
fn test_volume_midpoints_round_up_in_both_paths() {
    for (volume, shown) in [(0.125, "0.13"), (0.375, "0.38"), (0.625, "0.63")] {
        let payload = Payload::new().volume(volume);

        let escpos = String::from_utf8(receipt::encode_58mm(&payload)).unwrap();
        let line = format!("Volume      : {:>17} \n", format!("{shown} m3"));
        assert!(escpos.contains(&line), "{volume}: {escpos:?}");

        let pdf = VectorRenderer::default().render(&payload);
        let pdf_text = String::from_utf8_lossy(&pdf.bytes);
        assert!(pdf_text.contains(&format!("({shown} m\\263)")), "{volume}");
    }
}

#[test]
fn test_pdf_dimensions_carry_cm() {
    let receipt = VectorRenderer::default().render(&sample());
    let text = String::from_utf8_lossy(&receipt.bytes);
    for value in ["(150 cm)", "(80 cm)", "(60 cm)", "(5 cm)"] {
        assert!(text.contains(value), "missing {value}");
    }
}

#[test]
fn test_pdf_persist_is_explicit() {
    let dir = std::env::temp_dir().join(format!("struk-test-{}", uuid::Uuid::new_v4()));

    let (_, saved) = VectorRenderer::default()
        .render_with(&sample(), &RenderOptions::default())
        .unwrap();
    assert!(saved.is_none());
    assert!(!dir.exists());

    let options = RenderOptions {
        persist_dir: Some(dir.clone()),
    };
    let (receipt, saved) = VectorRenderer::default()
        .render_with(&sample(), &options)
        .unwrap();
    let path = saved.unwrap();
    assert_eq!(path, dir.join("receipt_AB 1234 CD_2026-01-20 12-00.pdf"));
    assert_eq!(std::fs::read(&path).unwrap(), receipt.bytes);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_persist_standalone() {
    let dir = std::env::temp_dir().join(format!("struk-test-{}", uuid::Uuid::new_v4()));
    let path = document::persist(b"%PDF-1.4", &dir, "a.pdf").unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4");
    std::fs::remove_dir_all(&dir).unwrap();
}
