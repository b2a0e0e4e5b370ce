//! Narrative capsule.
//!
//! A single template-filled sentence summarizing the window, alongside the
//! raw stat bundle the sentence was built from. The text is fully
//! deterministic: the same events and roster always produce the same string.

use serde::{Deserialize, Serialize};

use matchfeed_core::{CanonicalEvent, EventKind, Roster, TeamSide};

/// One side's stat bundle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapsuleStats {
    /// Shot attempts (goals included).
    pub shots: u32,
    /// On-target attempts.
    pub shots_on_target: u32,
    /// Goals.
    pub goals: u32,
    /// Corners won.
    pub corners: u32,
    /// Cards shown.
    pub cards: u32,
}

/// Both sides' stat bundles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapsuleSides {
    /// Home-side stats.
    pub home: CapsuleStats,
    /// Away-side stats.
    pub away: CapsuleStats,
}

/// Narrative-capsule facet payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeCapsule {
    /// The filled template.
    pub headline: String,
    /// The numbers behind it.
    pub stats: CapsuleSides,
}

pub(crate) fn extract(events: &[CanonicalEvent], roster: &Roster) -> NarrativeCapsule {
    let mut stats = CapsuleSides::default();
    for event in events {
        let Some(side) = event.team.as_deref().and_then(|t| roster.side_of(t)) else {
            continue;
        };
        let tally = match side {
            TeamSide::Home => &mut stats.home,
            TeamSide::Away => &mut stats.away,
        };
        match event.kind {
            EventKind::Goal | EventKind::Shot => {
                tally.shots += 1;
                if event.is_on_target() {
                    tally.shots_on_target += 1;
                }
                if event.kind == EventKind::Goal {
                    tally.goals += 1;
                }
            }
            EventKind::Corner => tally.corners += 1,
            EventKind::Card => tally.cards += 1,
            _ => {}
        }
    }

    NarrativeCapsule {
        headline: headline(roster, &stats),
        stats,
    }
}

fn headline(roster: &Roster, stats: &CapsuleSides) -> String {
    let home = roster.label(TeamSide::Home);
    let away = roster.label(TeamSide::Away);
    let h = &stats.home;
    let a = &stats.away;

    let lead = match h.goals.cmp(&a.goals) {
        std::cmp::Ordering::Greater => format!("{home} lead {}-{}", h.goals, a.goals),
        std::cmp::Ordering::Less => format!("{away} lead {}-{}", a.goals, h.goals),
        std::cmp::Ordering::Equal if h.goals > 0 => {
            format!("{home} and {away} are level at {}-{}", h.goals, a.goals)
        }
        std::cmp::Ordering::Equal => format!("{home} and {away} remain goalless"),
    };

    format!(
        "{lead}; shots {}-{} ({}-{} on target), corners {}-{}, cards {}-{}.",
        h.shots,
        a.shots,
        h.shots_on_target,
        a.shots_on_target,
        h.corners,
        a.corners,
        h.cards,
        a.cards,
    )
}
