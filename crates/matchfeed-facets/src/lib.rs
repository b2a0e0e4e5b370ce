//! # matchfeed-facets
//!
//! Eight specialized views over one window's raw events, computed on demand
//! rather than on every flush. All extractors are pure and independent of
//! the accumulator: given the same raw event list (and roster) they always
//! produce the same output, and none of them looks at prior windows.
//!
//! Dispatch is an exhaustive match on [`FacetKind`] — adding a variant
//! without wiring an extractor is a compile error.

#![deny(unsafe_code)]

mod capsule;
mod chains;
mod discipline;
mod keeper;
mod market;
mod set_piece;
mod threat;
mod tilt;

pub use capsule::{CapsuleSides, CapsuleStats, NarrativeCapsule};
pub use chains::{Chain, ChainOutcome, ChainTotals, PossessionChains, StartZone};
pub use discipline::{Discipline, RepeatOffender, SideDiscipline};
pub use keeper::{KeeperActions, SideKeeper};
pub use market::{MarketHooks, SideMarket};
pub use set_piece::{SetPieceThreat, SideSetPiece};
pub use threat::{PlayerThreat, PlayerThreatEntry};
pub use tilt::{FieldTilt, SideTilt};

use serde::{Deserialize, Serialize};

use matchfeed_core::{CanonicalEvent, EventKind, Roster};

/// The eight analytical lenses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetKind {
    /// Per-player attacking threat ranking.
    PlayerThreat,
    /// Per-side fouls/cards with repeat offenders.
    Discipline,
    /// Corner counts and danger-zone delivery proxy.
    SetPiece,
    /// Weighted territorial-pressure approximation.
    FieldTilt,
    /// Greedy same-side possession-run segmentation.
    PossessionChains,
    /// Goalkeeper save/claim/punch counts.
    KeeperActions,
    /// Bounded [0, 1] per-side interest scores.
    MarketHooks,
    /// Deterministic prose capsule plus the stat bundle behind it.
    NarrativeCapsule,
}

impl FacetKind {
    /// All kinds, in a stable order.
    pub const ALL: [FacetKind; 8] = [
        Self::PlayerThreat,
        Self::Discipline,
        Self::SetPiece,
        Self::FieldTilt,
        Self::PossessionChains,
        Self::KeeperActions,
        Self::MarketHooks,
        Self::NarrativeCapsule,
    ];

    /// Wire string (matches the serde rename).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PlayerThreat => "player_threat",
            Self::Discipline => "discipline",
            Self::SetPiece => "set_piece",
            Self::FieldTilt => "field_tilt",
            Self::PossessionChains => "possession_chains",
            Self::KeeperActions => "keeper_actions",
            Self::MarketHooks => "market_hooks",
            Self::NarrativeCapsule => "narrative_capsule",
        }
    }

    /// Parse a wire string back into a kind.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == raw)
    }
}

/// A computed facet payload, tagged by its kind on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "facet", rename_all = "snake_case")]
pub enum Facet {
    /// See [`PlayerThreat`].
    PlayerThreat(PlayerThreat),
    /// See [`Discipline`].
    Discipline(Discipline),
    /// See [`SetPieceThreat`].
    SetPiece(SetPieceThreat),
    /// See [`FieldTilt`].
    FieldTilt(FieldTilt),
    /// See [`PossessionChains`].
    PossessionChains(PossessionChains),
    /// See [`KeeperActions`].
    KeeperActions(KeeperActions),
    /// See [`MarketHooks`].
    MarketHooks(MarketHooks),
    /// See [`NarrativeCapsule`].
    NarrativeCapsule(NarrativeCapsule),
}

/// Compute one facet over a window's raw events.
#[must_use]
pub fn extract(kind: FacetKind, events: &[CanonicalEvent], roster: &Roster) -> Facet {
    match kind {
        FacetKind::PlayerThreat => Facet::PlayerThreat(threat::extract(events)),
        FacetKind::Discipline => Facet::Discipline(discipline::extract(events, roster)),
        FacetKind::SetPiece => Facet::SetPiece(set_piece::extract(events, roster)),
        FacetKind::FieldTilt => Facet::FieldTilt(tilt::extract(events, roster)),
        FacetKind::PossessionChains => {
            Facet::PossessionChains(chains::extract(events, roster))
        }
        FacetKind::KeeperActions => Facet::KeeperActions(keeper::extract(events, roster)),
        FacetKind::MarketHooks => Facet::MarketHooks(market::extract(events, roster)),
        FacetKind::NarrativeCapsule => {
            Facet::NarrativeCapsule(capsule::extract(events, roster))
        }
    }
}

/// Event kinds treated as happening in the attacking zone.
///
/// A fixed proxy set shared by the field-tilt and possession-chain facets —
/// these kinds can only occur (or overwhelmingly occur) in the final third.
pub(crate) fn is_attacking_kind(kind: EventKind) -> bool {
    matches!(
        kind,
        EventKind::Goal
            | EventKind::Shot
            | EventKind::Corner
            | EventKind::KeyPass
            | EventKind::PassIntoBox
            | EventKind::Assist
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
