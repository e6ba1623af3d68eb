use serde::{Deserialize, Serialize};

/// A loosely-typed cell value as it arrives from the spreadsheet-shaped
/// tables: either a number or free text. Every chord-row field is an
/// `Option<RawValue>`; all type inspection of these values happens in this
/// module and nowhere else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    pub fn text(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

/// True for absent values, NaN floats and blank-after-trim strings.
pub fn is_empty(value: Option<&RawValue>) -> bool {
    match value {
        None => true,
        Some(RawValue::Number(n)) => n.is_nan(),
        Some(RawValue::Text(t)) => t.trim().is_empty(),
    }
}

/// Canonical string form of a raw value. Integral floats drop the
/// trailing `.0`. A float that prints as `digits.DD` (exactly two digits
/// after the dot, both sides all digits) is kept with the dot so
/// `split_tokens` can still treat it as a mis-encoded comma list
/// ("21,25" round-tripped through a float cell as 21.25).
pub fn to_display_string(value: &RawValue) -> String {
    match value {
        RawValue::Text(t) => t.clone(),
        RawValue::Number(n) => {
            if n.is_nan() {
                return String::new();
            }
            if n.fract() == 0.0 && n.is_finite() {
                return format!("{n:.0}");
            }
            // Fractional floats keep their dot; "21.25" stays intact here
            // so split_tokens can recover the intended "21,25".
            format!("{}", n)
        }
    }
}

/// Splits a raw string into value tokens. Comma is the canonical list
/// separator. A dot-separated string whose parts are all digits is
/// treated as a mis-encoded comma list ("21.25" probably meant "21,25").
/// Anything else is a single token.
pub fn split_tokens(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.contains(',') {
        return raw
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect();
    }
    if raw.contains('.') {
        let parts: Vec<&str> = raw.split('.').collect();
        if parts.len() >= 2 && parts.iter().all(|part| all_digits(part)) {
            return parts.iter().map(|part| part.to_string()).collect();
        }
    }
    if raw.is_empty() {
        return Vec::new();
    }
    vec![raw.to_string()]
}

/// Full normalization: empty values give no tokens, everything else is
/// stringified and split.
pub fn normalize(value: Option<&RawValue>) -> Vec<String> {
    match value {
        Some(value) if !is_empty(Some(value)) => split_tokens(&to_display_string(value)),
        _ => Vec::new(),
    }
}

/// Key equality across the separator/precision conventions the source
/// tables disagree on: exact trimmed match, match after swapping `.` for
/// `,`, or numeric match within 1e-3.
pub fn values_match(a: &str, b: &str) -> bool {
    let a_trim = a.trim();
    let b_trim = b.trim();
    if a_trim == b_trim {
        return true;
    }
    if a_trim.replace('.', ",") == b_trim.replace('.', ",") {
        return true;
    }
    if let (Ok(a_num), Ok(b_num)) = (a_trim.parse::<f64>(), b_trim.parse::<f64>()) {
        if (a_num - b_num).abs() < 0.001 {
            return true;
        }
    }
    false
}

fn all_digits(part: &str) -> bool {
    !part.is_empty() && part.chars().all(|c| c.is_ascii_digit())
}
