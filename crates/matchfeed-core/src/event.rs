//! Canonical match events.
//!
//! A [`CanonicalEvent`] is the normalized form every downstream component
//! consumes. Events are produced once by the normalizer and never mutated.
//! Provider records whose type has no mapping here are dropped before they
//! ever reach this representation — there is no "unknown" variant.

use serde::{Deserialize, Serialize};

/// Closed set of recognized event types.
///
/// The wire strings are snake_case and consumed by the recap generator, so
/// renames are breaking changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A shot that crossed the line.
    Goal,
    /// Any other shot attempt.
    Shot,
    /// Foul committed.
    Foul,
    /// Yellow or red card shown (color in [`EventAttributes::card`]).
    Card,
    /// Corner kick awarded.
    Corner,
    /// Substitution.
    Substitution,
    /// Pass that produced a shot.
    KeyPass,
    /// Pass ending inside the box-zone rectangle.
    PassIntoBox,
    /// Pass that produced a goal.
    Assist,
    /// Goalkeeper save.
    Save,
    /// Goalkeeper claim (cross or loose ball collected).
    Claim,
    /// Goalkeeper punch.
    Punch,
}

impl EventKind {
    /// Wire string for this kind (matches the serde rename).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Goal => "goal",
            Self::Shot => "shot",
            Self::Foul => "foul",
            Self::Card => "card",
            Self::Corner => "corner",
            Self::Substitution => "substitution",
            Self::KeyPass => "key_pass",
            Self::PassIntoBox => "pass_into_box",
            Self::Assist => "assist",
            Self::Save => "save",
            Self::Claim => "claim",
            Self::Punch => "punch",
        }
    }

    /// Whether this kind belongs in a window's key-moment list.
    ///
    /// Key moments additionally require a known player; that filter is
    /// applied by the compressor, not here.
    #[must_use]
    pub fn is_key_moment(self) -> bool {
        matches!(
            self,
            Self::Goal | Self::Shot | Self::Card | Self::Corner | Self::Assist
        )
    }

    /// Whether this kind counts as a shot attempt (goals included).
    #[must_use]
    pub fn is_shot_attempt(self) -> bool {
        matches!(self, Self::Goal | Self::Shot)
    }

    /// Whether this kind is a goalkeeper action.
    #[must_use]
    pub fn is_keeper_action(self) -> bool {
        matches!(self, Self::Save | Self::Claim | Self::Punch)
    }
}

/// Card color shown by the referee.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardColor {
    /// Caution.
    Yellow,
    /// Dismissal.
    Red,
}

/// Type-specific annotations carried alongside the event kind.
///
/// All fields are optional; an empty attribute set is omitted from the wire
/// format entirely.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAttributes {
    /// For shot events: whether the attempt was on target. Goals are always
    /// on target regardless of this flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_target: Option<bool>,
    /// For card events: the color shown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<CardColor>,
}

impl EventAttributes {
    /// Whether every attribute is unset.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.on_target.is_none() && self.card.is_none()
    }
}

/// A normalized, schema-conformant match event.
///
/// Immutable once produced. `timestamp_sec` is absolute match clock
/// (period offsets already applied by the normalizer).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalEvent {
    /// Absolute match-clock timestamp in seconds.
    pub timestamp_sec: u64,
    /// Event type.
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Provider team name, if the record carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    /// Player name, if the record carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<String>,
    /// Type-specific annotations.
    #[serde(default, skip_serializing_if = "EventAttributes::is_empty")]
    pub attributes: EventAttributes,
}

impl CanonicalEvent {
    /// Build an event with no team, player, or attributes.
    #[must_use]
    pub fn new(timestamp_sec: u64, kind: EventKind) -> Self {
        Self {
            timestamp_sec,
            kind,
            team: None,
            player: None,
            attributes: EventAttributes::default(),
        }
    }

    /// Whether the event is a shot attempt that was on target.
    ///
    /// Goals count unconditionally; other shots only when flagged.
    #[must_use]
    pub fn is_on_target(&self) -> bool {
        match self.kind {
            EventKind::Goal => true,
            EventKind::Shot => self.attributes.on_target == Some(true),
            _ => false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
