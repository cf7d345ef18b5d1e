//! Candidate classification against remaining wall capacity.
//!
//! Drives the palette affordances: every catalog width is classified before
//! the customer clicks, so ineligible modules can be disabled up front and
//! near-perfect ones highlighted.

use serde::{Deserialize, Serialize};

use crate::configurator::catalog::{CATALOG_WIDTHS_MM, EDGE_TOLERANCE_MM, OPTIMAL_FIT_WINDOW_MM};

/// How one candidate width relates to the remaining wall capacity.
///
/// The three classes are mutually exclusive and cover every candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitClass {
    /// Lands within the optimal-fit window below the remaining width without
    /// exceeding it.
    OptimalFit,
    /// Placeable, either with plenty of room left or by using the trim
    /// tolerance.
    Fits,
    /// Cannot be placed even with the trim tolerance.
    TooLarge,
}

/// Classifies a candidate width against signed remaining capacity.
///
/// `remaining_mm` may be negative for an over-filled wall, in which case
/// every candidate is too large.
pub fn classify_candidate(candidate_mm: u32, remaining_mm: i64) -> FitClass {
    let candidate = i64::from(candidate_mm);
    if candidate > remaining_mm + i64::from(EDGE_TOLERANCE_MM) {
        FitClass::TooLarge
    } else if candidate <= remaining_mm
        && candidate >= remaining_mm - i64::from(OPTIMAL_FIT_WINDOW_MM)
    {
        FitClass::OptimalFit
    } else {
        FitClass::Fits
    }
}

/// One palette button's state for the current wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub width_mm: u32,
    pub fit: FitClass,
}

/// Classifies the whole catalog against the current remaining capacity.
pub fn classify_palette(remaining_mm: i64) -> Vec<PaletteEntry> {
    CATALOG_WIDTHS_MM
        .iter()
        .map(|&width_mm| PaletteEntry {
            width_mm,
            fit: classify_candidate(width_mm, remaining_mm),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimal_fit_near_remaining() {
        // 800 into 900 remaining: within 200 mm of a perfect fill.
        assert_eq!(classify_candidate(800, 900), FitClass::OptimalFit);
        // Exact fill is optimal too.
        assert_eq!(classify_candidate(1200, 1200), FitClass::OptimalFit);
        // Lower edge of the window.
        assert_eq!(classify_candidate(1000, 1200), FitClass::OptimalFit);
    }

    #[test]
    fn test_plain_fit_leaves_meaningful_room() {
        // Just below the optimal window.
        assert_eq!(classify_candidate(999, 1200), FitClass::Fits);
        assert_eq!(classify_candidate(400, 5000), FitClass::Fits);
    }

    #[test]
    fn test_tolerance_overshoot_fits_but_is_not_optimal() {
        // 1200 into 1100 remaining: placeable only via the 100 mm trim band.
        assert_eq!(classify_candidate(1200, 1100), FitClass::Fits);
        // One past the band.
        assert_eq!(classify_candidate(1200, 1099), FitClass::TooLarge);
    }

    #[test]
    fn test_too_large_when_tolerance_cannot_absorb() {
        assert_eq!(classify_candidate(1200, 900), FitClass::TooLarge);
        assert_eq!(classify_candidate(400, 299), FitClass::TooLarge);
    }

    #[test]
    fn test_negative_remaining_rejects_everything() {
        for width in CATALOG_WIDTHS_MM {
            assert_eq!(classify_candidate(width, -50), FitClass::TooLarge);
        }
    }

    #[test]
    fn test_band_boundaries_for_one_candidate() {
        // Walk a 1200 mm candidate across the remaining-width axis and pin
        // every band transition.
        let cases = [
            (1099, FitClass::TooLarge),
            (1100, FitClass::Fits), // tolerance overshoot begins
            (1199, FitClass::Fits),
            (1200, FitClass::OptimalFit), // exact fill
            (1400, FitClass::OptimalFit), // window edge
            (1401, FitClass::Fits),
            (5000, FitClass::Fits),
        ];
        for (remaining, expected) in cases {
            assert_eq!(
                classify_candidate(1200, remaining),
                expected,
                "1200 mm at {remaining} mm remaining"
            );
        }
    }

    #[test]
    fn test_palette_covers_every_catalog_width() {
        let palette = classify_palette(900);
        assert_eq!(palette.len(), CATALOG_WIDTHS_MM.len());
        let widths: Vec<u32> = palette.iter().map(|p| p.width_mm).collect();
        assert_eq!(widths, CATALOG_WIDTHS_MM.to_vec());
        let of_800 = palette.iter().find(|p| p.width_mm == 800).unwrap();
        assert_eq!(of_800.fit, FitClass::OptimalFit);
        let of_1200 = palette.iter().find(|p| p.width_mm == 1200).unwrap();
        assert_eq!(of_1200.fit, FitClass::TooLarge);
    }
}
