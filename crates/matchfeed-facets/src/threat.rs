//! Player-threat ranking.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use matchfeed_core::{CanonicalEvent, EventKind};

/// Entries returned by the ranking.
const TOP_N: usize = 3;

// Score weights.
const W_SOT: u32 = 3;
const W_SHOT: u32 = 2;

/// One ranked player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerThreatEntry {
    /// Player name.
    pub player: String,
    /// Team name from the player's first event, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    /// Shot attempts (goals included).
    pub shots: u32,
    /// On-target attempts.
    pub shots_on_target: u32,
    /// Box touches (passes into the box).
    pub box_touches: u32,
    /// Key passes (assists included).
    pub key_passes: u32,
    /// `3·sot + 2·shots + box_touches + key_passes`.
    pub score: u32,
}

/// Top attacking threats in the window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerThreat {
    /// At most three players, highest score first; ties broken by first
    /// appearance in the event list.
    pub top: Vec<PlayerThreatEntry>,
}

#[derive(Default)]
struct Tally {
    team: Option<String>,
    shots: u32,
    shots_on_target: u32,
    box_touches: u32,
    key_passes: u32,
    first_seen: usize,
}

pub(crate) fn extract(events: &[CanonicalEvent]) -> PlayerThreat {
    let mut tallies: HashMap<&str, Tally> = HashMap::new();

    for (index, event) in events.iter().enumerate() {
        let Some(player) = event.player.as_deref() else {
            continue;
        };
        let relevant = event.kind.is_shot_attempt()
            || matches!(
                event.kind,
                EventKind::PassIntoBox | EventKind::KeyPass | EventKind::Assist
            );
        if !relevant {
            continue;
        }
        let tally = tallies.entry(player).or_insert_with(|| Tally {
            team: event.team.clone(),
            first_seen: index,
            ..Tally::default()
        });
        match event.kind {
            EventKind::Goal | EventKind::Shot => {
                tally.shots += 1;
                if event.is_on_target() {
                    tally.shots_on_target += 1;
                }
            }
            EventKind::PassIntoBox => tally.box_touches += 1,
            EventKind::KeyPass | EventKind::Assist => tally.key_passes += 1,
            _ => unreachable!("filtered above"),
        }
    }

    let mut entries: Vec<(usize, PlayerThreatEntry)> = tallies
        .into_iter()
        .map(|(player, t)| {
            let score =
                W_SOT * t.shots_on_target + W_SHOT * t.shots + t.box_touches + t.key_passes;
            (
                t.first_seen,
                PlayerThreatEntry {
                    player: player.to_string(),
                    team: t.team,
                    shots: t.shots,
                    shots_on_target: t.shots_on_target,
                    box_touches: t.box_touches,
                    key_passes: t.key_passes,
                    score,
                },
            )
        })
        .collect();

    entries.sort_by(|(seen_a, a), (seen_b, b)| {
        b.score.cmp(&a.score).then(seen_a.cmp(seen_b))
    });
    entries.truncate(TOP_N);

    PlayerThreat {
        top: entries.into_iter().map(|(_, e)| e).collect(),
    }
}
