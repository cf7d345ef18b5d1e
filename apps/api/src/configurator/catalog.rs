//! Fixed module palette and placement constants.
//!
//! The panel system ships six module widths; a wall is filled by stacking
//! these side by side along the width axis. Accessories (TV mount, fireplace
//! insert) are not modules of their own: each reserves a pair of 1000 mm
//! modules. Everything that does capacity arithmetic reads its constants from
//! here so the two tolerance bands stay in one place.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The module widths the palette offers, in millimeters.
pub const CATALOG_WIDTHS_MM: [u32; 6] = [400, 600, 800, 1000, 1100, 1200];

/// Trim/edge fitting tolerance: a placement may overshoot the wall width by
/// up to this much and still be physically installable.
pub const EDGE_TOLERANCE_MM: u32 = 100;

/// A candidate within this much of the remaining width, without exceeding it,
/// counts as an optimal fit.
pub const OPTIMAL_FIT_WINDOW_MM: u32 = 200;

/// Width of each module an accessory reserves.
pub const ACCESSORY_MODULE_WIDTH_MM: u32 = 1000;

/// Modules per accessory reservation.
pub const ACCESSORY_PAIR_SIZE: usize = 2;

/// Returns true if `width_mm` is one of the palette widths.
pub fn is_catalog_width(width_mm: u32) -> bool {
    CATALOG_WIDTHS_MM.contains(&width_mm)
}

/// Accessories that reserve a fixed pair of 1000 mm modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessoryKind {
    Tv,
    Fire,
}

impl AccessoryKind {
    /// Total width the accessory's reserved pair consumes.
    pub fn reserved_width_mm(self) -> u32 {
        ACCESSORY_MODULE_WIDTH_MM * ACCESSORY_PAIR_SIZE as u32
    }
}

impl fmt::Display for AccessoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessoryKind::Tv => write!(f, "TV mount"),
            AccessoryKind::Fire => write!(f, "fireplace"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_membership() {
        for width in CATALOG_WIDTHS_MM {
            assert!(is_catalog_width(width));
        }
        assert!(!is_catalog_width(0));
        assert!(!is_catalog_width(500));
        assert!(!is_catalog_width(1300));
    }

    #[test]
    fn test_accessory_reserves_two_thousand_mm() {
        assert_eq!(AccessoryKind::Tv.reserved_width_mm(), 2000);
        assert_eq!(AccessoryKind::Fire.reserved_width_mm(), 2000);
    }

    #[test]
    fn test_accessory_serde_tags() {
        assert_eq!(serde_json::to_string(&AccessoryKind::Tv).unwrap(), "\"tv\"");
        assert_eq!(
            serde_json::from_str::<AccessoryKind>("\"fire\"").unwrap(),
            AccessoryKind::Fire
        );
    }
}
