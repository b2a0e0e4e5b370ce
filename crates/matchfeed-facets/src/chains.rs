//! Possession-chain segmentation.
//!
//! Segments the window's event sequence into maximal runs of consecutive
//! same-side events. Events with no resolvable side (unknown team, or no
//! team at all) are skipped and do not break a run.

use serde::{Deserialize, Serialize};

use matchfeed_core::{CanonicalEvent, EventKind, Roster, TeamSide};

use crate::is_attacking_kind;

/// Where a chain began, inferred from its first event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartZone {
    /// First event is an attacking-zone kind.
    AttackingThird,
    /// Anything else.
    Midfield,
}

/// How a chain ended: the last notable event seen in the run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainOutcome {
    /// Ended in a goal.
    Goal,
    /// Ended in an on-target shot.
    ShotOnTarget,
    /// Ended in an off-target shot.
    Shot,
    /// Ended by winning a corner.
    CornerWon,
    /// No notable ending.
    Lost,
}

/// One maximal same-side run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chain {
    /// Team name the run belongs to.
    pub team: String,
    /// Timestamp of the run's first event.
    pub start_sec: u64,
    /// Events in the run.
    pub events: u32,
    /// Zone classification of the first event.
    pub start_zone: StartZone,
    /// Outcome tag.
    pub end: ChainOutcome,
}

/// Per-side chain totals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainTotals {
    /// Number of chains.
    pub chains: u32,
    /// Chains containing at least one attacking-zone event.
    pub reached_attacking_third: u32,
    /// Chains containing at least one box-entry event.
    pub reached_box: u32,
    /// Shot attempts produced across all chains.
    pub shots: u32,
}

/// Possession-chain facet payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PossessionChains {
    /// Every chain, in sequence order.
    pub chains: Vec<Chain>,
    /// Home-side totals.
    pub home: ChainTotals,
    /// Away-side totals.
    pub away: ChainTotals,
}

struct Run {
    side: TeamSide,
    team: String,
    start_sec: u64,
    events: u32,
    start_zone: StartZone,
    outcome: ChainOutcome,
    reached_attacking_third: bool,
    reached_box: bool,
    shots: u32,
}

impl Run {
    fn open(side: TeamSide, event: &CanonicalEvent, team: &str) -> Self {
        let start_zone = if is_attacking_kind(event.kind) {
            StartZone::AttackingThird
        } else {
            StartZone::Midfield
        };
        let mut run = Self {
            side,
            team: team.to_string(),
            start_sec: event.timestamp_sec,
            events: 0,
            start_zone,
            outcome: ChainOutcome::Lost,
            reached_attacking_third: false,
            reached_box: false,
            shots: 0,
        };
        run.absorb(event);
        run
    }

    fn absorb(&mut self, event: &CanonicalEvent) {
        self.events += 1;
        if is_attacking_kind(event.kind) {
            self.reached_attacking_third = true;
        }
        if matches!(event.kind, EventKind::PassIntoBox | EventKind::Goal) {
            self.reached_box = true;
        }
        if event.kind.is_shot_attempt() {
            self.shots += 1;
        }
        let notable = match event.kind {
            EventKind::Goal => Some(ChainOutcome::Goal),
            EventKind::Shot => Some(if event.is_on_target() {
                ChainOutcome::ShotOnTarget
            } else {
                ChainOutcome::Shot
            }),
            EventKind::Corner => Some(ChainOutcome::CornerWon),
            _ => None,
        };
        if let Some(outcome) = notable {
            self.outcome = outcome;
        }
    }

    fn close(self, facet: &mut PossessionChains) {
        let totals = match self.side {
            TeamSide::Home => &mut facet.home,
            TeamSide::Away => &mut facet.away,
        };
        totals.chains += 1;
        if self.reached_attacking_third {
            totals.reached_attacking_third += 1;
        }
        if self.reached_box {
            totals.reached_box += 1;
        }
        totals.shots += self.shots;
        facet.chains.push(Chain {
            team: self.team,
            start_sec: self.start_sec,
            events: self.events,
            start_zone: self.start_zone,
            end: self.outcome,
        });
    }
}

pub(crate) fn extract(events: &[CanonicalEvent], roster: &Roster) -> PossessionChains {
    let mut facet = PossessionChains::default();
    let mut current: Option<Run> = None;

    for event in events {
        let Some(team) = event.team.as_deref() else {
            continue;
        };
        let Some(side) = roster.side_of(team) else {
            continue;
        };
        match current.as_mut() {
            Some(run) if run.side == side => run.absorb(event),
            Some(_) => {
                if let Some(run) = current.take() {
                    run.close(&mut facet);
                }
                current = Some(Run::open(side, event, team));
            }
            None => current = Some(Run::open(side, event, team)),
        }
    }
    if let Some(run) = current {
        run.close(&mut facet);
    }
    facet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::event;
    use matchfeed_core::EventAttributes;

    #[test]
    fn same_side_run_then_turnover() {
        let roster = Roster::new("A", "B");
        let mut shot = event(20, EventKind::Shot, Some("A"), Some("X"));
        shot.attributes = EventAttributes {
            on_target: Some(true),
            card: None,
        };
        let events = vec![
            event(10, EventKind::KeyPass, Some("A"), Some("X")),
            shot,
            event(30, EventKind::Foul, Some("B"), Some("Y")),
        ];
        let facet = extract(&events, &roster);
        assert_eq!(facet.chains.len(), 2);
        assert_eq!(facet.chains[0].team, "A");
        assert_eq!(facet.chains[0].end, ChainOutcome::ShotOnTarget);
        assert_eq!(facet.chains[1].team, "B");
        assert_eq!(facet.chains[1].end, ChainOutcome::Lost);
        assert_eq!(facet.home.chains, 1);
        assert_eq!(facet.home.shots, 1);
        assert_eq!(facet.away.chains, 1);
    }

    #[test]
    fn start_zone_from_first_event_kind() {
        let roster = Roster::new("A", "B");
        let attacking = extract(
            &[event(10, EventKind::Corner, Some("A"), None)],
            &roster,
        );
        assert_eq!(attacking.chains[0].start_zone, StartZone::AttackingThird);

        let midfield = extract(
            &[
                event(10, EventKind::Foul, Some("A"), Some("X")),
                event(20, EventKind::Shot, Some("A"), Some("X")),
            ],
            &roster,
        );
        assert_eq!(midfield.chains[0].start_zone, StartZone::Midfield);
        assert_eq!(midfield.chains[0].end, ChainOutcome::Shot);
    }

    #[test]
    fn sideless_events_do_not_break_a_run() {
        let roster = Roster::new("A", "B");
        let events = vec![
            event(10, EventKind::KeyPass, Some("A"), Some("X")),
            event(15, EventKind::Substitution, None, Some("Z")),
            event(20, EventKind::Shot, Some("A"), Some("X")),
        ];
        let facet = extract(&events, &roster);
        assert_eq!(facet.chains.len(), 1);
        assert_eq!(facet.chains[0].events, 2);
    }

    #[test]
    fn last_notable_event_wins() {
        let roster = Roster::new("A", "B");
        let events = vec![
            event(10, EventKind::Shot, Some("A"), Some("X")),
            event(20, EventKind::Corner, Some("A"), None),
        ];
        let facet = extract(&events, &roster);
        assert_eq!(facet.chains[0].end, ChainOutcome::CornerWon);
    }

    #[test]
    fn goal_chain_counts_as_box_reach() {
        let roster = Roster::new("A", "B");
        let events = vec![
            event(10, EventKind::PassIntoBox, Some("A"), Some("X")),
            event(20, EventKind::Goal, Some("A"), Some("X")),
        ];
        let facet = extract(&events, &roster);
        assert_eq!(facet.chains[0].end, ChainOutcome::Goal);
        assert_eq!(facet.home.reached_box, 1);
        assert_eq!(facet.home.reached_attacking_third, 1);
    }
}
