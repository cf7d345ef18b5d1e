//! Wall envelope and module capacity allocation.
//!
//! [`WallComposition`] owns the ordered sequence of placed modules for one
//! wall. Placement is checked against the wall width plus the trim tolerance,
//! and the remaining width is signed so an over-filled wall (a shrunk envelope
//! with modules still standing, or a tolerated overshoot) is reported rather
//! than hidden. Every mutation returns an outcome value; nothing here panics
//! or silently drops a request.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::configurator::catalog::{AccessoryKind, ACCESSORY_MODULE_WIDTH_MM, EDGE_TOLERANCE_MM};

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// Validated wall dimensions, in whole millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallEnvelope {
    pub width_mm: u32,
    pub height_mm: u32,
}

/// One placed panel module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSegment {
    /// Placement instance id. Several segments may share a catalog width, so
    /// removal goes by id, never by width.
    pub id: Uuid,
    pub width_mm: u32,
    /// Set when the segment is one half of an accessory's reserved pair.
    pub accessory: Option<AccessoryKind>,
}

/// Allocation state of a composition relative to the wall width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionState {
    Empty,
    Populated,
    /// Placed modules exceed the wall width. Reachable through the trim
    /// tolerance or by shrinking the envelope under a standing composition.
    OverCapacity,
}

/// Capacity figures derived from a composition and a wall width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Utilization {
    pub total_width_mm: u32,
    pub utilization_percent: f64,
    /// Signed: negative when the wall is over-filled.
    pub remaining_mm: i64,
}

/// Outcome of a single-module placement attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    Placed { segment: ModuleSegment },
    /// Capacity check failed; the composition was not touched.
    Rejected { candidate_mm: u32, remaining_mm: i64 },
}

/// Outcome of an accessory pair placement attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PairPlacement {
    Placed { segments: [ModuleSegment; 2] },
    /// Not enough capacity for the full pair; nothing was placed.
    Rejected { required_mm: u32, remaining_mm: i64 },
    /// A reservation for this accessory already exists, complete or not.
    AlreadyReserved { kind: AccessoryKind },
}

/// Outcome of a removal attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Removal {
    Removed { segment: ModuleSegment },
    /// Unknown id; the composition was not touched.
    NotFound,
}

// ────────────────────────────────────────────────────────────────────────────
// Composition
// ────────────────────────────────────────────────────────────────────────────

/// Ordered sequence of placed modules for one wall.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WallComposition {
    modules: Vec<ModuleSegment>,
}

impl WallComposition {
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
        }
    }

    pub fn modules(&self) -> &[ModuleSegment] {
        &self.modules
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Sum of all placed module widths.
    pub fn total_width_mm(&self) -> u32 {
        self.modules.iter().map(|m| m.width_mm).sum()
    }

    /// Wall width minus placed width. Negative when over-filled.
    pub fn remaining_mm(&self, wall_width_mm: u32) -> i64 {
        i64::from(wall_width_mm) - i64::from(self.total_width_mm())
    }

    /// Appends one module if total width stays within the wall width plus the
    /// trim tolerance.
    ///
    /// The palette affordances should have disabled ineligible candidates
    /// already; this is the final check before mutation, and a stale click
    /// that slips past it gets a reported rejection, not a panic. The caller
    /// is expected to have validated `candidate_mm` as a catalog width.
    pub fn add_module(&mut self, wall_width_mm: u32, candidate_mm: u32) -> Placement {
        if !self.fits_within_tolerance(wall_width_mm, candidate_mm) {
            return Placement::Rejected {
                candidate_mm,
                remaining_mm: self.remaining_mm(wall_width_mm),
            };
        }
        let segment = ModuleSegment {
            id: Uuid::new_v4(),
            width_mm: candidate_mm,
            accessory: None,
        };
        self.modules.push(segment.clone());
        Placement::Placed { segment }
    }

    /// Places the reserved pair of 1000 mm modules for `kind`.
    ///
    /// The pair is atomic: either both modules fit within the tolerance band
    /// and are placed together, or neither is. At most one reservation per
    /// accessory; a leftover orphan from a partial removal also blocks a new
    /// pair until it is removed.
    pub fn add_accessory_pair(&mut self, wall_width_mm: u32, kind: AccessoryKind) -> PairPlacement {
        if self.accessory_segment_count(kind) > 0 {
            return PairPlacement::AlreadyReserved { kind };
        }
        let required_mm = kind.reserved_width_mm();
        if !self.fits_within_tolerance(wall_width_mm, required_mm) {
            return PairPlacement::Rejected {
                required_mm,
                remaining_mm: self.remaining_mm(wall_width_mm),
            };
        }
        let make_segment = || ModuleSegment {
            id: Uuid::new_v4(),
            width_mm: ACCESSORY_MODULE_WIDTH_MM,
            accessory: Some(kind),
        };
        let segments = [make_segment(), make_segment()];
        self.modules.extend(segments.iter().cloned());
        PairPlacement::Placed { segments }
    }

    /// Removes the segment with the given id. An unknown id is a no-op.
    pub fn remove_module(&mut self, id: Uuid) -> Removal {
        match self.modules.iter().position(|m| m.id == id) {
            Some(index) => Removal::Removed {
                segment: self.modules.remove(index),
            },
            None => Removal::NotFound,
        }
    }

    /// Removes every module.
    pub fn clear(&mut self) {
        self.modules.clear();
    }

    /// Allocation state against the given wall width.
    pub fn state(&self, wall_width_mm: u32) -> CompositionState {
        if self.modules.is_empty() {
            CompositionState::Empty
        } else if self.remaining_mm(wall_width_mm) < 0 {
            CompositionState::OverCapacity
        } else {
            CompositionState::Populated
        }
    }

    /// Derived capacity figures against the given wall width.
    pub fn utilization(&self, wall_width_mm: u32) -> Utilization {
        let total_width_mm = self.total_width_mm();
        let utilization_percent = if wall_width_mm == 0 {
            0.0
        } else {
            f64::from(total_width_mm) / f64::from(wall_width_mm) * 100.0
        };
        Utilization {
            total_width_mm,
            utilization_percent,
            remaining_mm: self.remaining_mm(wall_width_mm),
        }
    }

    /// Number of placed segments tagged for `kind`. Two means a complete
    /// reservation, one means an orphan.
    pub fn accessory_segment_count(&self, kind: AccessoryKind) -> usize {
        self.modules
            .iter()
            .filter(|m| m.accessory == Some(kind))
            .count()
    }

    fn fits_within_tolerance(&self, wall_width_mm: u32, candidate_mm: u32) -> bool {
        i64::from(self.total_width_mm()) + i64::from(candidate_mm)
            <= i64::from(wall_width_mm) + i64::from(EDGE_TOLERANCE_MM)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_filled_wall(widths: &[u32], wall_width_mm: u32) -> WallComposition {
        let mut composition = WallComposition::new();
        for &width in widths {
            let outcome = composition.add_module(wall_width_mm, width);
            assert!(
                matches!(outcome, Placement::Placed { .. }),
                "setup placement of {width} mm must succeed"
            );
        }
        composition
    }

    #[test]
    fn test_empty_composition_figures() {
        let composition = WallComposition::new();
        assert!(composition.is_empty());
        assert_eq!(composition.total_width_mm(), 0);
        assert_eq!(composition.remaining_mm(5700), 5700);
        assert_eq!(composition.state(5700), CompositionState::Empty);
    }

    #[test]
    fn test_sequential_fill_totals() {
        let composition = make_filled_wall(&[1200, 1200, 1200, 1200, 800], 5700);
        assert_eq!(composition.total_width_mm(), 5600);
        assert_eq!(composition.remaining_mm(5700), 100);
        assert_eq!(composition.state(5700), CompositionState::Populated);
    }

    #[test]
    fn test_rejection_leaves_composition_unchanged() {
        let mut composition = make_filled_wall(&[1200, 1200, 1200, 1200], 5700);
        let before = composition.clone();

        let outcome = composition.add_module(5700, 1200);
        assert_eq!(
            outcome,
            Placement::Rejected {
                candidate_mm: 1200,
                remaining_mm: 900
            }
        );
        assert_eq!(composition, before);
    }

    #[test]
    fn test_tolerance_band_permits_overshoot() {
        // 1100 onto a bare 1000 mm wall: exactly the tolerance limit.
        let mut composition = WallComposition::new();
        let outcome = composition.add_module(1000, 1100);
        assert!(matches!(outcome, Placement::Placed { .. }));
        assert_eq!(composition.remaining_mm(1000), -100);
        assert_eq!(composition.state(1000), CompositionState::OverCapacity);

        let figures = composition.utilization(1000);
        assert_eq!(figures.total_width_mm, 1100);
        assert!((figures.utilization_percent - 110.0).abs() < 1e-9);
        assert_eq!(figures.remaining_mm, -100);
    }

    #[test]
    fn test_overshoot_past_tolerance_is_rejected() {
        let mut composition = make_filled_wall(&[1000], 1000);
        // A full 1000 mm wall can still absorb 100 mm, but not 400.
        let outcome = composition.add_module(1000, 400);
        assert!(matches!(outcome, Placement::Rejected { .. }));
        assert_eq!(composition.total_width_mm(), 1000);
    }

    #[test]
    fn test_remove_by_id() {
        let mut composition = WallComposition::new();
        let first = match composition.add_module(5000, 1200) {
            Placement::Placed { segment } => segment,
            other => panic!("unexpected outcome: {other:?}"),
        };
        let second = match composition.add_module(5000, 800) {
            Placement::Placed { segment } => segment,
            other => panic!("unexpected outcome: {other:?}"),
        };

        let outcome = composition.remove_module(first.id);
        assert_eq!(outcome, Removal::Removed { segment: first });
        assert_eq!(composition.modules(), &[second]);
        assert_eq!(composition.total_width_mm(), 800);
    }

    #[test]
    fn test_remove_unknown_id_is_a_no_op() {
        let mut composition = make_filled_wall(&[1200, 800], 5000);
        let before = composition.clone();

        assert_eq!(composition.remove_module(Uuid::new_v4()), Removal::NotFound);
        assert_eq!(composition, before);
    }

    #[test]
    fn test_clear_resets_totals() {
        let mut composition = make_filled_wall(&[1200, 1200, 800], 5000);
        composition.clear();
        assert!(composition.is_empty());
        assert_eq!(composition.total_width_mm(), 0);
        assert_eq!(composition.remaining_mm(5000), 5000);
        assert_eq!(composition.state(5000), CompositionState::Empty);
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let composition = make_filled_wall(&[400, 1200, 600], 5000);
        let widths: Vec<u32> = composition.modules().iter().map(|m| m.width_mm).collect();
        assert_eq!(widths, vec![400, 1200, 600]);
    }

    #[test]
    fn test_shrunk_wall_surfaces_over_capacity() {
        // 4800 mm of modules sized for a 5700 mm wall, then judged against a
        // 4000 mm one. The composition itself never changes.
        let composition = make_filled_wall(&[1200, 1200, 1200, 1200], 5700);
        assert_eq!(composition.state(4000), CompositionState::OverCapacity);
        assert_eq!(composition.remaining_mm(4000), -800);
        let figures = composition.utilization(4000);
        assert!(figures.utilization_percent > 100.0);
    }

    #[test]
    fn test_utilization_percentage() {
        let composition = make_filled_wall(&[1200, 1200, 1200, 1200], 5700);
        let figures = composition.utilization(5700);
        assert_eq!(figures.total_width_mm, 4800);
        assert!((figures.utilization_percent - 84.2105).abs() < 0.001);
        assert_eq!(figures.remaining_mm, 900);
    }

    #[test]
    fn test_zero_wall_width_does_not_divide_by_zero() {
        let composition = make_filled_wall(&[400], 5000);
        let figures = composition.utilization(0);
        assert_eq!(figures.utilization_percent, 0.0);
        assert_eq!(figures.remaining_mm, -400);
    }

    #[test]
    fn test_accessory_pair_places_two_tagged_modules() {
        let mut composition = WallComposition::new();
        let outcome = composition.add_accessory_pair(5000, AccessoryKind::Tv);

        let segments = match outcome {
            PairPlacement::Placed { segments } => segments,
            other => panic!("unexpected outcome: {other:?}"),
        };
        assert!(segments.iter().all(|s| s.width_mm == 1000));
        assert!(segments.iter().all(|s| s.accessory == Some(AccessoryKind::Tv)));
        assert_ne!(segments[0].id, segments[1].id);
        assert_eq!(composition.total_width_mm(), 2000);
        assert_eq!(composition.accessory_segment_count(AccessoryKind::Tv), 2);
        assert_eq!(composition.accessory_segment_count(AccessoryKind::Fire), 0);
    }

    #[test]
    fn test_accessory_pair_is_atomic() {
        // 600 mm already placed on a 2400 mm wall: the pair needs 2000 mm but
        // only 1900 mm fits even with tolerance, so nothing may be placed.
        let mut composition = make_filled_wall(&[600], 2400);
        let outcome = composition.add_accessory_pair(2400, AccessoryKind::Fire);

        assert_eq!(
            outcome,
            PairPlacement::Rejected {
                required_mm: 2000,
                remaining_mm: 1800
            }
        );
        assert_eq!(composition.modules().len(), 1);
        assert_eq!(composition.total_width_mm(), 600);
    }

    #[test]
    fn test_second_reservation_for_same_accessory_is_refused() {
        let mut composition = WallComposition::new();
        composition.add_accessory_pair(6000, AccessoryKind::Tv);

        let outcome = composition.add_accessory_pair(6000, AccessoryKind::Tv);
        assert_eq!(
            outcome,
            PairPlacement::AlreadyReserved {
                kind: AccessoryKind::Tv
            }
        );
        assert_eq!(composition.total_width_mm(), 2000);

        // A different accessory is still welcome.
        let outcome = composition.add_accessory_pair(6000, AccessoryKind::Fire);
        assert!(matches!(outcome, PairPlacement::Placed { .. }));
        assert_eq!(composition.total_width_mm(), 4000);
    }

    #[test]
    fn test_outcome_tags_serialize_as_snake_case() {
        let mut composition = make_filled_wall(&[1200, 1200, 1200, 1200], 5700);

        let outcome = composition.add_module(5700, 1200);
        let value = serde_json::to_value(&outcome).expect("placement outcome must serialize");
        assert_eq!(value["rejected"]["candidate_mm"], 1200);
        assert_eq!(value["rejected"]["remaining_mm"], 900);

        let outcome = composition.add_accessory_pair(5700, AccessoryKind::Fire);
        let value = serde_json::to_value(&outcome).expect("pair outcome must serialize");
        assert_eq!(value["rejected"]["required_mm"], 2000);

        let outcome = composition.remove_module(Uuid::new_v4());
        let value = serde_json::to_value(&outcome).expect("removal outcome must serialize");
        assert_eq!(value, "not_found");
    }

    #[test]
    fn test_removing_one_pair_member_leaves_an_orphan() {
        let mut composition = WallComposition::new();
        let segments = match composition.add_accessory_pair(5000, AccessoryKind::Tv) {
            PairPlacement::Placed { segments } => segments,
            other => panic!("unexpected outcome: {other:?}"),
        };

        composition.remove_module(segments[0].id);
        assert_eq!(composition.accessory_segment_count(AccessoryKind::Tv), 1);

        // The orphan blocks a fresh reservation until it is removed too.
        let outcome = composition.add_accessory_pair(5000, AccessoryKind::Tv);
        assert_eq!(
            outcome,
            PairPlacement::AlreadyReserved {
                kind: AccessoryKind::Tv
            }
        );

        composition.remove_module(segments[1].id);
        assert_eq!(composition.accessory_segment_count(AccessoryKind::Tv), 0);
        let outcome = composition.add_accessory_pair(5000, AccessoryKind::Tv);
        assert!(matches!(outcome, PairPlacement::Placed { .. }));
    }
}
