//! Two-slot team roster: synthetic home/away assignment.
//!
//! The provider feed names teams but does not say which is the home side.
//! The first two distinct non-null team names observed in the stream are
//! assigned the `home` and `away` roles once, at stream start. This is a
//! heuristic, not a guarantee of correct home/away assignment — but it is
//! stable, and every side-scoped aggregate downstream keys off it.
//!
//! The roster is resolved once and passed by reference into all side-scoped
//! computations; it is never re-derived per call.

use serde::{Deserialize, Serialize};

/// Synthetic side of a resolved team.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    /// First distinct team name observed.
    Home,
    /// Second distinct team name observed.
    Away,
}

impl TeamSide {
    /// The other side.
    #[must_use]
    pub fn opponent(self) -> Self {
        match self {
            Self::Home => Self::Away,
            Self::Away => Self::Home,
        }
    }
}

/// Resolved two-slot roster for one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roster {
    /// Provider name assigned the home role.
    pub home: String,
    /// Provider name assigned the away role.
    pub away: String,
}

impl Roster {
    /// Build a roster from two already-known labels.
    #[must_use]
    pub fn new(home: impl Into<String>, away: impl Into<String>) -> Self {
        Self {
            home: home.into(),
            away: away.into(),
        }
    }

    /// Resolve a provider team name to its synthetic side.
    ///
    /// Names outside the two slots have no canonical side; events carrying
    /// them are excluded from side-scoped aggregates (they remain in raw
    /// snapshots untouched).
    #[must_use]
    pub fn side_of(&self, team: &str) -> Option<TeamSide> {
        if team == self.home {
            Some(TeamSide::Home)
        } else if team == self.away {
            Some(TeamSide::Away)
        } else {
            None
        }
    }

    /// Provider label for a side.
    #[must_use]
    pub fn label(&self, side: TeamSide) -> &str {
        match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }
}

/// Accumulates distinct team names until both slots are filled.
#[derive(Clone, Debug, Default)]
pub struct RosterBuilder {
    home: Option<String>,
    away: Option<String>,
}

impl RosterBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe one (possibly absent) team name from the stream.
    ///
    /// The first distinct name fills the home slot, the second fills the
    /// away slot; anything after that is ignored.
    pub fn observe(&mut self, team: Option<&str>) {
        let Some(name) = team else { return };
        match (&self.home, &self.away) {
            (None, _) => self.home = Some(name.to_string()),
            (Some(home), None) if home != name => self.away = Some(name.to_string()),
            _ => {}
        }
    }

    /// Whether both slots are filled.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.home.is_some() && self.away.is_some()
    }

    /// Finish, returning the roster if both slots were filled.
    #[must_use]
    pub fn build(self) -> Option<Roster> {
        Some(Roster {
            home: self.home?,
            away: self.away?,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
