//! Goalkeeper action counts.

use serde::{Deserialize, Serialize};

use matchfeed_core::{CanonicalEvent, EventKind, Roster, TeamSide};

/// Per-side keeper counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideKeeper {
    /// Saves made.
    pub saves: u32,
    /// Crosses claimed.
    pub claims: u32,
    /// Punched clearances.
    pub punches: u32,
}

/// Keeper-actions facet payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeeperActions {
    /// Home-side counters.
    pub home: SideKeeper,
    /// Away-side counters.
    pub away: SideKeeper,
}

pub(crate) fn extract(events: &[CanonicalEvent], roster: &Roster) -> KeeperActions {
    let mut facet = KeeperActions::default();
    for event in events {
        if !event.kind.is_keeper_action() {
            continue;
        }
        let Some(side) = event.team.as_deref().and_then(|t| roster.side_of(t)) else {
            continue;
        };
        let counters = match side {
            TeamSide::Home => &mut facet.home,
            TeamSide::Away => &mut facet.away,
        };
        match event.kind {
            EventKind::Save => counters.saves += 1,
            EventKind::Claim => counters.claims += 1,
            EventKind::Punch => counters.punches += 1,
            _ => {}
        }
    }
    facet
}
