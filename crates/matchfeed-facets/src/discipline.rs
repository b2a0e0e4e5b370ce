//! Discipline summary: fouls, cards, repeat offenders.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use matchfeed_core::{CanonicalEvent, EventKind, Roster, TeamSide};

/// Combined foul+card infractions at which a player is flagged.
const REPEAT_THRESHOLD: u32 = 2;

/// Per-side discipline counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideDiscipline {
    /// Fouls committed.
    pub fouls: u32,
    /// Cards shown.
    pub cards: u32,
}

/// A player with repeated infractions in the window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeatOffender {
    /// Player name.
    pub player: String,
    /// Team name from the player's first infraction, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    /// Combined foul + card count.
    pub infractions: u32,
}

/// Discipline facet payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discipline {
    /// Home-side counters.
    pub home: SideDiscipline,
    /// Away-side counters.
    pub away: SideDiscipline,
    /// Players with at least two combined infractions, in first-infraction
    /// order.
    pub repeat_offenders: Vec<RepeatOffender>,
}

pub(crate) fn extract(events: &[CanonicalEvent], roster: &Roster) -> Discipline {
    let mut home = SideDiscipline::default();
    let mut away = SideDiscipline::default();
    // Player → (team, infractions), insertion-ordered via first_seen.
    let mut offenders: HashMap<&str, (Option<String>, u32, usize)> = HashMap::new();

    for (index, event) in events.iter().enumerate() {
        if !matches!(event.kind, EventKind::Foul | EventKind::Card) {
            continue;
        }
        let side = event.team.as_deref().and_then(|t| roster.side_of(t));
        if let Some(side) = side {
            let counters = match side {
                TeamSide::Home => &mut home,
                TeamSide::Away => &mut away,
            };
            match event.kind {
                EventKind::Foul => counters.fouls += 1,
                EventKind::Card => counters.cards += 1,
                _ => {}
            }
        }
        if let Some(player) = event.player.as_deref() {
            let entry = offenders
                .entry(player)
                .or_insert_with(|| (event.team.clone(), 0, index));
            entry.1 += 1;
        }
    }

    let mut repeat: Vec<(usize, RepeatOffender)> = offenders
        .into_iter()
        .filter(|(_, (_, count, _))| *count >= REPEAT_THRESHOLD)
        .map(|(player, (team, infractions, first_seen))| {
            (
                first_seen,
                RepeatOffender {
                    player: player.to_string(),
                    team,
                    infractions,
                },
            )
        })
        .collect();
    repeat.sort_by_key(|(first_seen, _)| *first_seen);

    Discipline {
        home,
        away,
        repeat_offenders: repeat.into_iter().map(|(_, o)| o).collect(),
    }
}
