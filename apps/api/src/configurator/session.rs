//! Session-scoped configurator controller.
//!
//! [`ConfiguratorSession`] owns one customer's journey: raw dimension text,
//! normalized values, accessory wishes, and the wall composition. Every
//! transition is a plain synchronous method; the HTTP layer and the debounced
//! commit path both funnel through [`ConfiguratorSession::commit_dimension`],
//! so there is exactly one place where input becomes state.
//!
//! The envelope rule: module placement is anchored to a wall envelope that
//! exists only while both dimensions sit in the standard range. Re-commits
//! that keep the envelope valid preserve the composition (a shrunk wall then
//! reports over-capacity instead of silently losing work); a commit that
//! invalidates either dimension discards the composition.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::configurator::catalog::{AccessoryKind, ACCESSORY_PAIR_SIZE, EDGE_TOLERANCE_MM};
use crate::configurator::dimensions::{
    assess_height, assess_width, normalize_dimension, HeightVerdict, WidthVerdict,
};
use crate::configurator::fitting::{classify_palette, PaletteEntry};
use crate::configurator::wall::{
    CompositionState, ModuleSegment, PairPlacement, Placement, Removal, Utilization,
    WallComposition, WallEnvelope,
};

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// Which dimension field an input event targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionField {
    Width,
    Height,
}

/// Whether accessory reservations gate completion or merely warn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessoryEnforcement {
    Advisory,
    Required,
}

impl FromStr for AccessoryEnforcement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "advisory" => Ok(AccessoryEnforcement::Advisory),
            "required" => Ok(AccessoryEnforcement::Required),
            other => Err(format!("unknown accessory enforcement '{other}'")),
        }
    }
}

/// Returned when an allocator operation arrives before both dimensions are
/// in the standard range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeNotReady;

/// Last committed text for one dimension field.
#[derive(Debug, Clone, Default)]
struct DimensionEntry {
    raw: String,
    normalized_mm: Option<i64>,
}

/// Width field as the UI should render it.
#[derive(Debug, Clone, Serialize)]
pub struct WidthReading {
    pub raw: String,
    pub normalized_mm: Option<i64>,
    pub verdict: WidthVerdict,
}

/// Height field as the UI should render it.
#[derive(Debug, Clone, Serialize)]
pub struct HeightReading {
    pub raw: String,
    pub normalized_mm: Option<i64>,
    pub verdict: HeightVerdict,
}

/// Reservation condition of one accessory's module pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessoryCondition {
    NotPlaced,
    /// One module of the pair was removed; the other still stands.
    Orphaned,
    Complete,
}

/// One accessory's requested-versus-placed picture.
#[derive(Debug, Clone, Serialize)]
pub struct AccessoryStatus {
    pub kind: AccessoryKind,
    pub requested: bool,
    pub placed_segments: usize,
    pub condition: AccessoryCondition,
}

/// Advisory routing signal for walls wider than the standard catalog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuotationSignal {
    pub width_mm: i64,
    /// False once the width exceeds even the manual quotation limit.
    pub quotable: bool,
}

/// Weight of a completion warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningSeverity {
    Advisory,
    Blocking,
}

/// What a completion warning is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionIssue {
    DimensionsNotValid,
    WallEmpty,
    ExceedsTolerance,
    AccessoryNotPlaced,
    AccessoryOrphaned,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletionWarning {
    pub issue: CompletionIssue,
    pub severity: WarningSeverity,
    /// Set for accessory-related warnings.
    pub accessory: Option<AccessoryKind>,
    pub description: String,
}

/// Completion picture for the current configuration.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionReport {
    /// True when no blocking warning remains.
    pub complete: bool,
    pub enforcement: AccessoryEnforcement,
    pub warnings: Vec<CompletionWarning>,
}

/// Read-only view of the whole session for the rendering layer.
#[derive(Debug, Clone, Serialize)]
pub struct WallSnapshot {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub width: WidthReading,
    pub height: HeightReading,
    pub has_tv: bool,
    pub has_fire: bool,
    /// Present while both dimensions are in the standard range.
    pub envelope: Option<WallEnvelope>,
    pub modules: Vec<ModuleSegment>,
    pub total_width_mm: u32,
    /// Capacity figures; present once the envelope is.
    pub utilization: Option<Utilization>,
    pub state: CompositionState,
    pub is_over_capacity: bool,
    /// Palette affordances; present once the envelope is.
    pub palette: Option<Vec<PaletteEntry>>,
    pub accessories: Vec<AccessoryStatus>,
    /// Present for widths above the standard range.
    pub quotation: Option<QuotationSignal>,
    pub completion: CompletionReport,
}

// ────────────────────────────────────────────────────────────────────────────
// Controller
// ────────────────────────────────────────────────────────────────────────────

/// One customer's configurator state and the transitions over it.
#[derive(Debug, Clone)]
pub struct ConfiguratorSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    width: DimensionEntry,
    height: DimensionEntry,
    has_tv: bool,
    has_fire: bool,
    envelope: Option<WallEnvelope>,
    composition: WallComposition,
}

impl ConfiguratorSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            width: DimensionEntry::default(),
            height: DimensionEntry::default(),
            has_tv: false,
            has_fire: false,
            envelope: None,
            composition: WallComposition::new(),
        }
    }

    pub fn envelope(&self) -> Option<WallEnvelope> {
        self.envelope
    }

    pub fn composition(&self) -> &WallComposition {
        &self.composition
    }

    pub fn width_verdict(&self) -> WidthVerdict {
        assess_width(self.width.normalized_mm)
    }

    pub fn height_verdict(&self) -> HeightVerdict {
        assess_height(self.height.normalized_mm)
    }

    /// Normalizes and commits one field, then re-derives the envelope.
    pub fn commit_dimension(&mut self, field: DimensionField, raw: &str) {
        let entry = DimensionEntry {
            raw: raw.trim().to_string(),
            normalized_mm: normalize_dimension(raw),
        };
        match field {
            DimensionField::Width => self.width = entry,
            DimensionField::Height => self.height = entry,
        }
        self.refresh_envelope();
    }

    /// Applies accessory wishes. `None` leaves a flag untouched.
    pub fn set_accessory_flags(&mut self, has_tv: Option<bool>, has_fire: Option<bool>) {
        if let Some(flag) = has_tv {
            self.has_tv = flag;
        }
        if let Some(flag) = has_fire {
            self.has_fire = flag;
        }
    }

    /// Clears dimensions, accessory wishes, and the composition.
    pub fn reset(&mut self) {
        self.width = DimensionEntry::default();
        self.height = DimensionEntry::default();
        self.has_tv = false;
        self.has_fire = false;
        self.envelope = None;
        self.composition.clear();
    }

    /// Places one catalog module against the current envelope.
    pub fn add_module(&mut self, candidate_mm: u32) -> Result<Placement, EnvelopeNotReady> {
        let envelope = self.envelope.ok_or(EnvelopeNotReady)?;
        Ok(self.composition.add_module(envelope.width_mm, candidate_mm))
    }

    /// Places the reserved pair for an accessory against the current envelope.
    pub fn add_accessory(
        &mut self,
        kind: AccessoryKind,
    ) -> Result<PairPlacement, EnvelopeNotReady> {
        let envelope = self.envelope.ok_or(EnvelopeNotReady)?;
        Ok(self.composition.add_accessory_pair(envelope.width_mm, kind))
    }

    /// Removes one placed module. Without an envelope the composition is
    /// empty, so this degenerates to a no-op.
    pub fn remove_module(&mut self, module_id: Uuid) -> Removal {
        self.composition.remove_module(module_id)
    }

    /// Empties the wall while keeping dimensions and accessory wishes.
    pub fn clear_wall(&mut self) {
        self.composition.clear();
    }

    /// Re-derives the envelope after a dimension commit. Leaving the valid
    /// state discards the composition; staying valid preserves it.
    fn refresh_envelope(&mut self) {
        let next = match (self.width_verdict(), self.height_verdict()) {
            (WidthVerdict::Standard { mm: width }, HeightVerdict::Standard { mm: height }) => {
                Some(WallEnvelope {
                    width_mm: width as u32,
                    height_mm: height as u32,
                })
            }
            _ => None,
        };
        if next.is_none() {
            self.composition.clear();
        }
        self.envelope = next;
    }

    // ────────────────────────────────────────────────────────────────────
    // Derived views
    // ────────────────────────────────────────────────────────────────────

    /// Assembles the full read-only view for one render.
    pub fn snapshot(&self, enforcement: AccessoryEnforcement) -> WallSnapshot {
        let state = match self.envelope {
            Some(envelope) => self.composition.state(envelope.width_mm),
            None => CompositionState::Empty,
        };
        WallSnapshot {
            session_id: self.id,
            created_at: self.created_at,
            width: WidthReading {
                raw: self.width.raw.clone(),
                normalized_mm: self.width.normalized_mm,
                verdict: self.width_verdict(),
            },
            height: HeightReading {
                raw: self.height.raw.clone(),
                normalized_mm: self.height.normalized_mm,
                verdict: self.height_verdict(),
            },
            has_tv: self.has_tv,
            has_fire: self.has_fire,
            envelope: self.envelope,
            modules: self.composition.modules().to_vec(),
            total_width_mm: self.composition.total_width_mm(),
            utilization: self
                .envelope
                .map(|envelope| self.composition.utilization(envelope.width_mm)),
            state,
            is_over_capacity: state == CompositionState::OverCapacity,
            palette: self
                .envelope
                .map(|envelope| classify_palette(self.composition.remaining_mm(envelope.width_mm))),
            accessories: vec![
                self.accessory_status(AccessoryKind::Tv),
                self.accessory_status(AccessoryKind::Fire),
            ],
            quotation: quotation_signal(self.width_verdict()),
            completion: self.completion(enforcement),
        }
    }

    /// Requested-versus-placed picture for one accessory.
    pub fn accessory_status(&self, kind: AccessoryKind) -> AccessoryStatus {
        let placed_segments = self.composition.accessory_segment_count(kind);
        let condition = if placed_segments == 0 {
            AccessoryCondition::NotPlaced
        } else if placed_segments < ACCESSORY_PAIR_SIZE {
            AccessoryCondition::Orphaned
        } else {
            AccessoryCondition::Complete
        };
        AccessoryStatus {
            kind,
            requested: self.accessory_requested(kind),
            placed_segments,
            condition,
        }
    }

    /// Judges whether the configuration is finishable and lists everything
    /// standing in the way or worth flagging.
    pub fn completion(&self, enforcement: AccessoryEnforcement) -> CompletionReport {
        let mut warnings = Vec::new();

        match self.envelope {
            None => warnings.push(CompletionWarning {
                issue: CompletionIssue::DimensionsNotValid,
                severity: WarningSeverity::Blocking,
                accessory: None,
                description: "Wall dimensions are not valid yet".to_string(),
            }),
            Some(envelope) => {
                if self.composition.is_empty() {
                    warnings.push(CompletionWarning {
                        issue: CompletionIssue::WallEmpty,
                        severity: WarningSeverity::Blocking,
                        accessory: None,
                        description: "No modules placed yet".to_string(),
                    });
                }
                let overshoot = -self.composition.remaining_mm(envelope.width_mm);
                if overshoot > i64::from(EDGE_TOLERANCE_MM) {
                    warnings.push(CompletionWarning {
                        issue: CompletionIssue::ExceedsTolerance,
                        severity: WarningSeverity::Blocking,
                        accessory: None,
                        description: format!(
                            "Placed modules overshoot the wall by {overshoot} mm; \
                             the trim tolerance absorbs at most {EDGE_TOLERANCE_MM} mm"
                        ),
                    });
                }
            }
        }

        let accessory_severity = match enforcement {
            AccessoryEnforcement::Advisory => WarningSeverity::Advisory,
            AccessoryEnforcement::Required => WarningSeverity::Blocking,
        };
        for kind in [AccessoryKind::Tv, AccessoryKind::Fire] {
            let status = self.accessory_status(kind);
            if status.requested && status.condition == AccessoryCondition::NotPlaced {
                warnings.push(CompletionWarning {
                    issue: CompletionIssue::AccessoryNotPlaced,
                    severity: accessory_severity,
                    accessory: Some(kind),
                    description: format!("{kind} needs its reserved pair of 1000 mm modules"),
                });
            }
            if status.condition == AccessoryCondition::Orphaned {
                warnings.push(CompletionWarning {
                    issue: CompletionIssue::AccessoryOrphaned,
                    severity: accessory_severity,
                    accessory: Some(kind),
                    description: format!(
                        "{kind} reservation is down to a single module; \
                         remove it or restore the pair"
                    ),
                });
            }
        }

        let complete = !warnings
            .iter()
            .any(|warning| warning.severity == WarningSeverity::Blocking);
        CompletionReport {
            complete,
            enforcement,
            warnings,
        }
    }

    fn accessory_requested(&self, kind: AccessoryKind) -> bool {
        match kind {
            AccessoryKind::Tv => self.has_tv,
            AccessoryKind::Fire => self.has_fire,
        }
    }
}

impl Default for ConfiguratorSession {
    fn default() -> Self {
        Self::new()
    }
}

fn quotation_signal(verdict: WidthVerdict) -> Option<QuotationSignal> {
    match verdict {
        WidthVerdict::Oversize { mm } => Some(QuotationSignal {
            width_mm: mm,
            quotable: true,
        }),
        WidthVerdict::BeyondQuotable { mm } => Some(QuotationSignal {
            width_mm: mm,
            quotable: false,
        }),
        _ => None,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
