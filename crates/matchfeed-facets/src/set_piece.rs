//! Set-piece threat: corners plus a danger-zone delivery proxy.

use serde::{Deserialize, Serialize};

use matchfeed_core::{CanonicalEvent, EventKind, Roster, TeamSide};

/// Per-side set-piece counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideSetPiece {
    /// Corners won.
    pub corners: u32,
    /// Key passes and passes into the box, combined.
    pub danger_zone_deliveries: u32,
}

/// Set-piece facet payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPieceThreat {
    /// Home-side counters.
    pub home: SideSetPiece,
    /// Away-side counters.
    pub away: SideSetPiece,
}

pub(crate) fn extract(events: &[CanonicalEvent], roster: &Roster) -> SetPieceThreat {
    let mut facet = SetPieceThreat::default();
    for event in events {
        let Some(side) = event.team.as_deref().and_then(|t| roster.side_of(t)) else {
            continue;
        };
        let counters = match side {
            TeamSide::Home => &mut facet.home,
            TeamSide::Away => &mut facet.away,
        };
        match event.kind {
            EventKind::Corner => counters.corners += 1,
            EventKind::KeyPass | EventKind::PassIntoBox => {
                counters.danger_zone_deliveries += 1;
            }
            _ => {}
        }
    }
    facet
}
