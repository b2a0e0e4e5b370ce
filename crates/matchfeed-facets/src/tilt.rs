//! Field-tilt proxy.
//!
//! True territorial possession needs positional tracking the event stream
//! does not carry, so tilt is approximated by charging a fixed five seconds
//! of pressure per attacking-zone event.

use serde::{Deserialize, Serialize};

use matchfeed_core::{CanonicalEvent, EventKind, Roster, TeamSide};

use crate::is_attacking_kind;

/// Seconds of pressure credited per attacking-zone event.
const SECONDS_PER_EVENT: u32 = 5;

/// Per-side tilt counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideTilt {
    /// Approximate seconds of attacking pressure.
    pub pressure_sec: u32,
    /// Events placing the ball in the attacking third.
    pub attacking_third_entries: u32,
    /// Events placing the ball in the box.
    pub box_entries: u32,
}

/// Field-tilt facet payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTilt {
    /// Home-side counters.
    pub home: SideTilt,
    /// Away-side counters.
    pub away: SideTilt,
}

pub(crate) fn extract(events: &[CanonicalEvent], roster: &Roster) -> FieldTilt {
    let mut facet = FieldTilt::default();
    for event in events {
        if !is_attacking_kind(event.kind) {
            continue;
        }
        let Some(side) = event.team.as_deref().and_then(|t| roster.side_of(t)) else {
            continue;
        };
        let counters = match side {
            TeamSide::Home => &mut facet.home,
            TeamSide::Away => &mut facet.away,
        };
        counters.pressure_sec += SECONDS_PER_EVENT;
        counters.attacking_third_entries += 1;
        if matches!(event.kind, EventKind::PassIntoBox | EventKind::Goal) {
            counters.box_entries += 1;
        }
    }
    facet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::event;

    #[test]
    fn pressure_is_five_seconds_per_attacking_event() {
        let roster = Roster::new("A", "B");
        let events = vec![
            event(10, EventKind::Shot, Some("A"), Some("X")),
            event(20, EventKind::Corner, Some("A"), None),
            event(30, EventKind::KeyPass, Some("B"), Some("Y")),
        ];
        let facet = extract(&events, &roster);
        assert_eq!(facet.home.pressure_sec, 10);
        assert_eq!(facet.home.attacking_third_entries, 2);
        assert_eq!(facet.away.pressure_sec, 5);
    }

    #[test]
    fn box_entries_from_box_passes_and_goals() {
        let roster = Roster::new("A", "B");
        let events = vec![
            event(10, EventKind::PassIntoBox, Some("A"), Some("X")),
            event(20, EventKind::Goal, Some("A"), Some("X")),
            event(30, EventKind::Shot, Some("A"), Some("X")),
        ];
        let facet = extract(&events, &roster);
        assert_eq!(facet.home.box_entries, 2);
        assert_eq!(facet.home.attacking_third_entries, 3);
    }

    #[test]
    fn defensive_events_contribute_nothing() {
        let roster = Roster::new("A", "B");
        let events = vec![
            event(10, EventKind::Foul, Some("A"), Some("X")),
            event(20, EventKind::Save, Some("B"), Some("K")),
        ];
        assert_eq!(extract(&events, &roster), FieldTilt::default());
    }
}
