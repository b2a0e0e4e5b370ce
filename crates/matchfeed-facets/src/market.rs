//! Market-hook scores.
//!
//! Coarse per-side interest signals in `[0, 1]`, produced by weighting raw
//! counts and capping the sum against a fixed scale. The scales are tuned so
//! a busy-but-ordinary window lands mid-range and only an exceptional one
//! saturates.

use serde::{Deserialize, Serialize};

use matchfeed_core::{CanonicalEvent, EventKind, Roster, TeamSide};

/// Weighted attacking volume at which `attack` saturates.
const ATTACK_SCALE: f64 = 10.0;
/// Weighted infraction volume at which `disruption` saturates.
const DISRUPTION_SCALE: f64 = 8.0;

/// Per-side market-hook scores.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideMarket {
    /// `min(1, (2·sot + shots + corners) / 10)`.
    pub attack: f64,
    /// `min(1, (fouls + 2·cards) / 8)`.
    pub disruption: f64,
}

/// Market-hooks facet payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketHooks {
    /// Home-side scores.
    pub home: SideMarket,
    /// Away-side scores.
    pub away: SideMarket,
}

#[derive(Default)]
struct Counts {
    shots: u32,
    shots_on_target: u32,
    corners: u32,
    fouls: u32,
    cards: u32,
}

impl Counts {
    fn scores(&self) -> SideMarket {
        let attack = f64::from(2 * self.shots_on_target + self.shots + self.corners)
            / ATTACK_SCALE;
        let disruption = f64::from(self.fouls + 2 * self.cards) / DISRUPTION_SCALE;
        SideMarket {
            attack: attack.min(1.0),
            disruption: disruption.min(1.0),
        }
    }
}

pub(crate) fn extract(events: &[CanonicalEvent], roster: &Roster) -> MarketHooks {
    let mut home = Counts::default();
    let mut away = Counts::default();
    for event in events {
        let Some(side) = event.team.as_deref().and_then(|t| roster.side_of(t)) else {
            continue;
        };
        let counts = match side {
            TeamSide::Home => &mut home,
            TeamSide::Away => &mut away,
        };
        match event.kind {
            EventKind::Goal | EventKind::Shot => {
                counts.shots += 1;
                if event.is_on_target() {
                    counts.shots_on_target += 1;
                }
            }
            EventKind::Corner => counts.corners += 1,
            EventKind::Foul => counts.fouls += 1,
            EventKind::Card => counts.cards += 1,
            _ => {}
        }
    }
    MarketHooks {
        home: home.scores(),
        away: away.scores(),
    }
}
