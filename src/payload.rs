//! # Receipt Payload
//!
//! The device-neutral set of fields printed on one shipment receipt. Both
//! renderers read a [`Payload`]; neither mutates it nor derives new values
//! from it (volume is printed as supplied, never recomputed from the
//! dimensions).
//!
//! ## Lenient Input
//!
//! Every field is optional. A missing field displays as the empty string so
//! that a half-filled record still produces a receipt instead of an error.
//!
//! ## JSON Shape
//!
//! ```json
//! {
//!   "receiptId": 1042,
//!   "vehiclePlate": "AB 1234 CD",
//!   "date": "2026-01-20 12:00",
//!   "operatorName": "sari",
//!   "supplierName": "CV Maju",
//!   "length": 150, "width": 80, "height": 60, "plusMargin": 5,
//!   "volume": 0.72
//! }
//! ```
//!
//! The record layer's field names (`kirimanId`, `nopol`, `kirimanDate`,
//! `username`, `supplier`, `panjang`, `lebar`, `tinggi`, `plus`) are accepted
//! as aliases.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A single display value.
///
/// Numbers and text are the usual shapes. Any other JSON value is kept as
/// is and displayed the way the record layer stringifies it (`true`,
/// `1,2`, `[object Object]`), so an odd field never rejects the receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Bool(bool),
    Other(serde_json::Value),
}

impl FieldValue {
    /// Numeric reading of the value.
    ///
    /// Text is trimmed and parsed; empty text reads as `0`, anything
    /// unparsable reads as `NaN`. Booleans read as `1`/`0`, other values
    /// through their display text.
    pub fn as_number(&self) -> f64 {
        match self {
            FieldValue::Number(n) => *n,
            FieldValue::Text(s) => parse_number(s),
            FieldValue::Bool(b) => f64::from(u8::from(*b)),
            FieldValue::Other(v) => parse_number(&display_json(v)),
        }
    }
}

fn parse_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        0.0
    } else {
        s.parse().unwrap_or(f64::NAN)
    }
}

/// Display text of an arbitrary JSON value.
///
/// Arrays join their elements with `,` (nulls as empty), objects read as
/// `[object Object]`.
fn display_json(value: &serde_json::Value) -> String {
    use serde_json::Value;

    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.as_f64().map(format_number).unwrap_or_else(|| n.to_string()),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(display_json).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => f.write_str(&format_number(*n)),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Other(v) => f.write_str(&display_json(v)),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<u32> for FieldValue {
    fn from(n: u32) -> Self {
        FieldValue::Number(n as f64)
    }
}

/// Format a number the way the record layer prints it.
///
/// Integral values have no fraction, non-finite values are spelled out.
fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        // -0 prints as 0
        "0".to_string()
    } else {
        n.to_string()
    }
}

/// Format a fixed two-decimal reading, spelling out non-finite values.
///
/// Rounds the exact binary value; an exact midpoint goes away from zero, so
/// `0.125` reads `0.13`. Magnitudes from `1e21` up print like
/// [`format_number`].
fn format_fixed2(n: f64) -> String {
    if !n.is_finite() || n.abs() >= 1e21 {
        return format_number(n);
    }
    // -0 reads as 0
    let n = if n == 0.0 { 0.0 } else { n };
    match Decimal::from_f64_retain(n) {
        Some(d) => format!(
            "{:.2}",
            d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        ),
        None => format!("{:.2}", n),
    }
}

/// The fields of one shipment receipt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Payload {
    #[serde(alias = "kirimanId")]
    pub receipt_id: Option<FieldValue>,
    #[serde(alias = "nopol")]
    pub vehicle_plate: Option<FieldValue>,
    #[serde(alias = "kirimanDate")]
    pub date: Option<FieldValue>,
    #[serde(alias = "username")]
    pub operator_name: Option<FieldValue>,
    #[serde(alias = "supplier")]
    pub supplier_name: Option<FieldValue>,
    #[serde(alias = "panjang")]
    pub length: Option<FieldValue>,
    #[serde(alias = "lebar")]
    pub width: Option<FieldValue>,
    #[serde(alias = "tinggi")]
    pub height: Option<FieldValue>,
    #[serde(alias = "plus")]
    pub plus_margin: Option<FieldValue>,
    pub volume: Option<FieldValue>,
}

/// Display text of an optional field.
fn text(field: &Option<FieldValue>) -> String {
    field.as_ref().map(ToString::to_string).unwrap_or_default()
}

impl Payload {
    /// An empty payload; every field displays as the empty string.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a payload from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn receipt_id(mut self, value: impl Into<FieldValue>) -> Self {
        self.receipt_id = Some(value.into());
        self
    }

    pub fn vehicle_plate(mut self, value: impl Into<FieldValue>) -> Self {
        self.vehicle_plate = Some(value.into());
        self
    }

    pub fn date(mut self, value: impl Into<FieldValue>) -> Self {
        self.date = Some(value.into());
        self
    }

    pub fn operator_name(mut self, value: impl Into<FieldValue>) -> Self {
        self.operator_name = Some(value.into());
        self
    }

    pub fn supplier_name(mut self, value: impl Into<FieldValue>) -> Self {
        self.supplier_name = Some(value.into());
        self
    }

    /// Set length, width, height and plus margin (all in cm).
    pub fn dimensions(
        mut self,
        length: impl Into<FieldValue>,
        width: impl Into<FieldValue>,
        height: impl Into<FieldValue>,
        plus_margin: impl Into<FieldValue>,
    ) -> Self {
        self.length = Some(length.into());
        self.width = Some(width.into());
        self.height = Some(height.into());
        self.plus_margin = Some(plus_margin.into());
        self
    }

    pub fn volume(mut self, value: impl Into<FieldValue>) -> Self {
        self.volume = Some(value.into());
        self
    }

    pub fn receipt_id_text(&self) -> String {
        text(&self.receipt_id)
    }

    pub fn plate_text(&self) -> String {
        text(&self.vehicle_plate)
    }

    pub fn date_text(&self) -> String {
        text(&self.date)
    }

    pub fn operator_text(&self) -> String {
        text(&self.operator_name)
    }

    pub fn supplier_text(&self) -> String {
        text(&self.supplier_name)
    }

    /// Dimension lines in print order: length, width, height, plus margin.
    ///
    /// Labels are the ones printed on the receipt.
    pub fn dimension_lines(&self) -> [(&'static str, String); 4] {
        [
            ("Panjang", text(&self.length)),
            ("Lebar", text(&self.width)),
            ("Tinggi", text(&self.height)),
            ("Plus", text(&self.plus_margin)),
        ]
    }

    /// Header lines in print order: receipt id, plate, date, operator, supplier.
    pub fn header_lines(&self) -> [(&'static str, String); 5] {
        [
            ("No Struk", self.receipt_id_text()),
            ("Nopol", self.plate_text()),
            ("Tgl", self.date_text()),
            ("Operator", self.operator_text()),
            ("Supplier", self.supplier_text()),
        ]
    }

    /// Volume rounded to two decimals, without unit.
    ///
    /// Empty when no volume was supplied.
    pub fn volume_text(&self) -> String {
        self.volume
            .as_ref()
            .map(|v| format_fixed2(v.as_number()))
            .unwrap_or_default()
    }
}

/// Append a unit to a present value; missing values stay empty.
pub fn with_unit(value: &str, unit: &str) -> String {
    if value.is_empty() {
        String::new()
    } else {
        format!("{} {}", value, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_display_empty() {
        let payload = Payload::new();
        assert_eq!(payload.receipt_id_text(), "");
        assert_eq!(payload.plate_text(), "");
        assert_eq!(payload.volume_text(), "");
        for (_, value) in payload.dimension_lines() {
            assert!(value.is_empty());
        }
    }

    #[test]
    fn test_number_display() {
        assert_eq!(FieldValue::Number(150.0).to_string(), "150");
        assert_eq!(FieldValue::Number(150.5).to_string(), "150.5");
        assert_eq!(FieldValue::Number(-0.0).to_string(), "0");
        assert_eq!(FieldValue::Number(f64::NAN).to_string(), "NaN");
        assert_eq!(FieldValue::Number(f64::INFINITY).to_string(), "Infinity");
    }

    #[test]
    fn test_volume_rounding() {
        assert_eq!(Payload::new().volume(1234.5).volume_text(), "1234.50");
        assert_eq!(Payload::new().volume(0.7249).volume_text(), "0.72");
        assert_eq!(Payload::new().volume("12.5").volume_text(), "12.50");
        assert_eq!(Payload::new().volume("").volume_text(), "0.00");
        assert_eq!(Payload::new().volume("abc").volume_text(), "NaN");
    }

    #[test]
    fn test_volume_midpoint_rounds_up() {
        // 50 x 50 x 50 cm
        assert_eq!(Payload::new().volume(0.125).volume_text(), "0.13");
        assert_eq!(Payload::new().volume(0.375).volume_text(), "0.38");
        assert_eq!(Payload::new().volume(0.625).volume_text(), "0.63");
        assert_eq!(Payload::new().volume("0.125").volume_text(), "0.13");
        // not an exact midpoint in binary
        assert_eq!(Payload::new().volume(1.005).volume_text(), "1.00");
        assert_eq!(Payload::new().volume(-0.0).volume_text(), "0.00");
    }

    #[test]
    fn test_json_camel_case() {
        let payload = Payload::from_json(
            r#"{"receiptId": 7, "vehiclePlate": "B 1 XY", "volume": "2.5", "plusMargin": 5}"#,
        )
        .unwrap();
        assert_eq!(payload.receipt_id_text(), "7");
        assert_eq!(payload.plate_text(), "B 1 XY");
        assert_eq!(payload.volume_text(), "2.50");
        assert_eq!(payload.dimension_lines()[3].1, "5");
    }

    #[test]
    fn test_json_record_aliases() {
        let payload = Payload::from_json(
            r#"{"kirimanId": "K-1", "nopol": "AB 1", "kirimanDate": "2026-01-20",
                "username": "sari", "supplier": "CV Maju",
                "panjang": 150, "lebar": 80, "tinggi": 60, "plus": 5}"#,
        )
        .unwrap();
        assert_eq!(payload.receipt_id_text(), "K-1");
        assert_eq!(payload.operator_text(), "sari");
        assert_eq!(payload.supplier_text(), "CV Maju");
        assert_eq!(payload.dimension_lines()[0].1, "150");
    }

    #[test]
    fn test_json_nulls_are_missing() {
        let payload = Payload::from_json(r#"{"vehiclePlate": null}"#).unwrap();
        assert_eq!(payload.vehicle_plate, None);
    }

    #[test]
    fn test_json_odd_values_display() {
        let payload = Payload::from_json(
            r#"{"receiptId": true, "supplierName": {"name": "CV Maju"},
                "operatorName": ["sari", 2], "volume": false}"#,
        )
        .unwrap();
        assert_eq!(payload.receipt_id_text(), "true");
        assert_eq!(payload.supplier_text(), "[object Object]");
        assert_eq!(payload.operator_text(), "sari,2");
        assert_eq!(payload.volume_text(), "0.00");
    }

    #[test]
    fn test_odd_values_as_number() {
        assert_eq!(FieldValue::Bool(true).as_number(), 1.0);
        assert_eq!(FieldValue::Other(serde_json::json!([])).as_number(), 0.0);
        assert_eq!(FieldValue::Other(serde_json::json!(["2.5"])).as_number(), 2.5);
        assert!(FieldValue::Other(serde_json::json!({})).as_number().is_nan());
    }

    #[test]
    fn test_with_unit() {
        assert_eq!(with_unit("150", "cm"), "150 cm");
        assert_eq!(with_unit("", "cm"), "");
    }
}
