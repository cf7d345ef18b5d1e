//! Dimension input normalization and range assessment.
#![allow(dead_code)]
//!
//! Customers type wall dimensions as free text: "5000", "5.7m", "5000mm",
//! with stray whitespace and any casing. The normalizer collapses all of that
//! into whole millimeters, or nothing at all. Empty and unparseable input are
//! deliberately indistinguishable: both mean "no usable value yet" and neither
//! is an error. The assessment functions then place a normalized value against
//! the supported envelope and produce a verdict the field UI can render
//! directly.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Supported envelope
// ────────────────────────────────────────────────────────────────────────────

/// Narrowest wall the standard catalog covers.
pub const MIN_WALL_WIDTH_MM: i64 = 1000;

/// Widest wall the standard catalog covers.
pub const MAX_WALL_WIDTH_MM: i64 = 6000;

/// Upper bound of the manual custom-quotation path for extra-wide walls.
pub const MAX_QUOTABLE_WIDTH_MM: i64 = 10_000;

/// Lowest supported wall height.
pub const MIN_WALL_HEIGHT_MM: i64 = 2200;

/// Highest supported wall height.
pub const MAX_WALL_HEIGHT_MM: i64 = 4000;

/// Normalized magnitudes above this are treated as unparseable. Keeps the
/// `f64` to `i64` conversion exact and absurd input ("1e300") out of verdicts.
const MAX_PLAUSIBLE_MM: f64 = 1e12;

// ────────────────────────────────────────────────────────────────────────────
// Normalization
// ────────────────────────────────────────────────────────────────────────────

/// Converts raw dimension text to whole millimeters.
///
/// A trailing `m` (any case) means meters, so the value is scaled by 1000.
/// A trailing `mm` or no suffix at all is already millimeters. Fractional
/// results round to the nearest whole millimeter. Returns `None` for empty,
/// non-numeric, or non-finite input.
///
/// The function is pure: same input, same output, no side effects.
pub fn normalize_dimension(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let lower = trimmed.to_ascii_lowercase();
    // "mm" is stripped before the meters rule so "5000mm" stays 5000, not
    // five million.
    let (number_part, in_meters) = if let Some(stripped) = lower.strip_suffix("mm") {
        (stripped, false)
    } else if let Some(stripped) = lower.strip_suffix('m') {
        (stripped, true)
    } else {
        (lower.as_str(), false)
    };

    let value: f64 = number_part.trim().parse().ok()?;
    // f64 parsing accepts "inf" and "nan" spellings.
    if !value.is_finite() {
        return None;
    }

    let mm = if in_meters { value * 1000.0 } else { value };
    let rounded = mm.round();
    if rounded.abs() > MAX_PLAUSIBLE_MM {
        return None;
    }
    Some(rounded as i64)
}

/// Boundary-inclusive width check against the standard catalog range.
pub fn is_valid_width(mm: i64) -> bool {
    (MIN_WALL_WIDTH_MM..=MAX_WALL_WIDTH_MM).contains(&mm)
}

/// Boundary-inclusive height check against the supported range.
pub fn is_valid_height(mm: i64) -> bool {
    (MIN_WALL_HEIGHT_MM..=MAX_WALL_HEIGHT_MM).contains(&mm)
}

// ────────────────────────────────────────────────────────────────────────────
// Verdicts
// ────────────────────────────────────────────────────────────────────────────

/// Assessment of a normalized width value.
///
/// `Oversize` is not a failure: walls above the standard range but within the
/// quotable limit route to a manual quotation flow instead of the module
/// allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidthVerdict {
    /// Nothing entered yet, or the text did not parse.
    Missing,
    /// Below the minimum the catalog supports.
    TooNarrow { mm: i64 },
    /// Within the standard catalog range; the allocator can run.
    Standard { mm: i64 },
    /// Above the standard range but eligible for a custom quotation.
    Oversize { mm: i64 },
    /// Beyond even the custom-quotation limit.
    BeyondQuotable { mm: i64 },
}

impl WidthVerdict {
    /// The normalized value, when one parsed.
    pub fn normalized_mm(&self) -> Option<i64> {
        match self {
            WidthVerdict::Missing => None,
            WidthVerdict::TooNarrow { mm }
            | WidthVerdict::Standard { mm }
            | WidthVerdict::Oversize { mm }
            | WidthVerdict::BeyondQuotable { mm } => Some(*mm),
        }
    }

    /// True when the width can anchor module placement.
    pub fn is_standard(&self) -> bool {
        matches!(self, WidthVerdict::Standard { .. })
    }
}

/// Assessment of a normalized height value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeightVerdict {
    /// Nothing entered yet, or the text did not parse.
    Missing,
    TooLow { mm: i64 },
    Standard { mm: i64 },
    TooHigh { mm: i64 },
}

impl HeightVerdict {
    pub fn normalized_mm(&self) -> Option<i64> {
        match self {
            HeightVerdict::Missing => None,
            HeightVerdict::TooLow { mm }
            | HeightVerdict::Standard { mm }
            | HeightVerdict::TooHigh { mm } => Some(*mm),
        }
    }

    pub fn is_standard(&self) -> bool {
        matches!(self, HeightVerdict::Standard { .. })
    }
}

/// Classifies a normalized width against the supported envelope.
pub fn assess_width(mm: Option<i64>) -> WidthVerdict {
    match mm {
        None => WidthVerdict::Missing,
        Some(v) if is_valid_width(v) => WidthVerdict::Standard { mm: v },
        Some(v) if v < MIN_WALL_WIDTH_MM => WidthVerdict::TooNarrow { mm: v },
        Some(v) if v <= MAX_QUOTABLE_WIDTH_MM => WidthVerdict::Oversize { mm: v },
        Some(v) => WidthVerdict::BeyondQuotable { mm: v },
    }
}

/// Classifies a normalized height against the supported envelope.
pub fn assess_height(mm: Option<i64>) -> HeightVerdict {
    match mm {
        None => HeightVerdict::Missing,
        Some(v) if is_valid_height(v) => HeightVerdict::Standard { mm: v },
        Some(v) if v < MIN_WALL_HEIGHT_MM => HeightVerdict::TooLow { mm: v },
        Some(v) => HeightVerdict::TooHigh { mm: v },
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
