//! Compressed-snapshot (STKM) derivation.
//!
//! Pure: one window's raw events, the window bounds, the resolved roster,
//! and the optional previous snapshot in — one [`CompressedSnapshot`] out.
//! No locking, no I/O.
//!
//! The running score is *incremental*: previous score plus goals seen in
//! this window only, never recomputed from full history. Correctness
//! therefore requires exactly-once, in-order flushing per game, which the
//! accumulator enforces.

use matchfeed_core::{
    CanonicalEvent, CompressedSnapshot, CounterDeltas, EventKind, KeyMoment, KeyMomentBuffer,
    Roster, Score, SideCounters, TeamSide, WindowBounds,
};

/// Derive the compressed summary for one window.
///
/// Events keyed to a team outside the roster (or carrying no team) have no
/// canonical side and are excluded from side-scoped counters; they can
/// still surface as key moments.
#[must_use]
pub fn compress(
    bounds: &WindowBounds,
    events: &[CanonicalEvent],
    roster: Option<&Roster>,
    prev: Option<&CompressedSnapshot>,
) -> CompressedSnapshot {
    let mut home = SideCounters::default();
    let mut away = SideCounters::default();
    let mut moments = KeyMomentBuffer::default();

    for event in events {
        let side = roster.and_then(|r| event.team.as_deref().and_then(|t| r.side_of(t)));
        if let Some(side) = side {
            let counters = match side {
                TeamSide::Home => &mut home,
                TeamSide::Away => &mut away,
            };
            tally(counters, event);
        }
        if event.kind.is_key_moment()
            && let Some(player) = event.player.clone()
        {
            moments.push(KeyMoment {
                timestamp_sec: event.timestamp_sec,
                kind: event.kind,
                team: event.team.clone(),
                player,
                on_target: match event.kind {
                    EventKind::Shot => event.attributes.on_target,
                    _ => None,
                },
                card: event.attributes.card,
            });
        }
    }

    let prev_score = prev.map(|p| p.score).unwrap_or_default();
    let score = Score {
        home: prev_score.home + home.goals,
        away: prev_score.away + away.goals,
    };

    let (home_deltas, away_deltas) = match prev {
        Some(p) => (home.delta_from(&p.home), away.delta_from(&p.away)),
        None => (CounterDeltas::default(), CounterDeltas::default()),
    };

    CompressedSnapshot {
        game_id: bounds.game_id.clone(),
        start_sec: bounds.start_sec,
        end_sec: bounds.end_sec,
        home,
        away,
        score,
        key_moments: moments.into_vec(),
        home_deltas,
        away_deltas,
    }
}

fn tally(counters: &mut SideCounters, event: &CanonicalEvent) {
    match event.kind {
        EventKind::Goal => {
            counters.goals += 1;
            counters.shots += 1;
            counters.shots_on_target += 1;
        }
        EventKind::Shot => {
            counters.shots += 1;
            if event.is_on_target() {
                counters.shots_on_target += 1;
            }
        }
        EventKind::PassIntoBox => counters.box_entries += 1,
        EventKind::Corner => counters.corners += 1,
        EventKind::Foul => counters.fouls += 1,
        EventKind::Card => counters.cards += 1,
        EventKind::Substitution
        | EventKind::KeyPass
        | EventKind::Assist
        | EventKind::Save
        | EventKind::Claim
        | EventKind::Punch => {}
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use matchfeed_core::{CardColor, EventAttributes, KEY_MOMENT_CAP};

    fn bounds(start: u64) -> WindowBounds {
        WindowBounds {
            game_id: "g1".into(),
            start_sec: start,
            end_sec: start + 300,
        }
    }

    fn roster() -> Roster {
        Roster::new("A", "B")
    }

    fn event(ts: u64, kind: EventKind, team: &str, player: &str) -> CanonicalEvent {
        CanonicalEvent {
            timestamp_sec: ts,
            kind,
            team: Some(team.into()),
            player: Some(player.into()),
            attributes: EventAttributes::default(),
        }
    }

    #[test]
    fn counters_split_by_side() {
        let events = vec![
            event(10, EventKind::Shot, "A", "X"),
            event(20, EventKind::Goal, "A", "X"),
            event(30, EventKind::Corner, "B", "Y"),
            event(40, EventKind::Foul, "B", "Y"),
            event(50, EventKind::PassIntoBox, "A", "Z"),
        ];
        let snap = compress(&bounds(0), &events, Some(&roster()), None);
        assert_eq!(snap.home.shots, 2); // goal counts within shots
        assert_eq!(snap.home.goals, 1);
        assert_eq!(snap.home.box_entries, 1);
        assert_eq!(snap.away.corners, 1);
        assert_eq!(snap.away.fouls, 1);
    }

    #[test]
    fn goals_always_on_target_in_counters() {
        let mut on_target_shot = event(5, EventKind::Shot, "A", "X");
        on_target_shot.attributes.on_target = Some(true);
        let events = vec![
            on_target_shot,
            event(6, EventKind::Shot, "A", "X"), // unflagged
            event(7, EventKind::Goal, "A", "X"),
        ];
        let snap = compress(&bounds(0), &events, Some(&roster()), None);
        assert_eq!(snap.home.shots, 3);
        assert_eq!(snap.home.shots_on_target, 2);
    }

    #[test]
    fn unresolved_side_excluded_from_counters_not_moments() {
        let events = vec![
            event(10, EventKind::Goal, "C", "Stray"), // third team name
        ];
        let snap = compress(&bounds(0), &events, Some(&roster()), None);
        assert_eq!(snap.home.goals, 0);
        assert_eq!(snap.away.goals, 0);
        assert_eq!(snap.score, Score::default());
        // Still a key moment — raw data is not censored.
        assert_eq!(snap.key_moments.len(), 1);
        assert_eq!(snap.key_moments[0].player, "Stray");
    }

    #[test]
    fn no_roster_means_no_side_counters() {
        let events = vec![event(10, EventKind::Shot, "A", "X")];
        let snap = compress(&bounds(0), &events, None, None);
        assert_eq!(snap.home, SideCounters::default());
        assert_eq!(snap.away, SideCounters::default());
    }

    #[test]
    fn running_score_accumulates_incrementally() {
        let w0 = compress(
            &bounds(0),
            &[event(10, EventKind::Goal, "A", "X")],
            Some(&roster()),
            None,
        );
        assert_eq!(w0.score, Score { home: 1, away: 0 });

        let w1 = compress(
            &bounds(300),
            &[
                event(310, EventKind::Goal, "B", "Y"),
                event(320, EventKind::Goal, "B", "Z"),
            ],
            Some(&roster()),
            Some(&w0),
        );
        assert_eq!(w1.score, Score { home: 1, away: 2 });

        let w2 = compress(&bounds(600), &[], Some(&roster()), Some(&w1));
        assert_eq!(w2.score, Score { home: 1, away: 2 });
    }

    #[test]
    fn deltas_zero_without_previous() {
        let snap = compress(
            &bounds(0),
            &[event(10, EventKind::Shot, "A", "X")],
            Some(&roster()),
            None,
        );
        assert_eq!(snap.home_deltas, CounterDeltas::default());
        assert_eq!(snap.away_deltas, CounterDeltas::default());
    }

    #[test]
    fn deltas_compare_against_previous_window() {
        let w0 = compress(
            &bounds(0),
            &[
                event(10, EventKind::Shot, "A", "X"),
                event(20, EventKind::Shot, "A", "X"),
                event(30, EventKind::Foul, "B", "Y"),
            ],
            Some(&roster()),
            None,
        );
        let w1 = compress(
            &bounds(300),
            &[event(310, EventKind::Shot, "A", "X")],
            Some(&roster()),
            Some(&w0),
        );
        assert_eq!(w1.home_deltas.shots, -1);
        assert_eq!(w1.away_deltas.fouls, -1);
        assert_eq!(w1.away_deltas.cards, 0);
    }

    #[test]
    fn key_moments_most_recent_first_and_capped() {
        let events: Vec<CanonicalEvent> = (0..20)
            .map(|i| event(i * 10, EventKind::Shot, "A", "X"))
            .collect();
        let snap = compress(&bounds(0), &events, Some(&roster()), None);
        assert_eq!(snap.key_moments.len(), KEY_MOMENT_CAP);
        assert_eq!(snap.key_moments[0].timestamp_sec, 190);
        assert_eq!(snap.key_moments[KEY_MOMENT_CAP - 1].timestamp_sec, 120);
    }

    #[test]
    fn moments_without_player_filtered() {
        let mut anonymous = event(10, EventKind::Goal, "A", "X");
        anonymous.player = None;
        let snap = compress(&bounds(0), &[anonymous], Some(&roster()), None);
        assert!(snap.key_moments.is_empty());
        // The goal still counted.
        assert_eq!(snap.home.goals, 1);
    }

    #[test]
    fn moment_annotations_projected() {
        let mut shot = event(10, EventKind::Shot, "A", "X");
        shot.attributes.on_target = Some(true);
        let mut card = event(20, EventKind::Card, "B", "Y");
        card.attributes.card = Some(CardColor::Yellow);
        let snap = compress(&bounds(0), &[shot, card], Some(&roster()), None);
        assert_eq!(snap.key_moments[0].card, Some(CardColor::Yellow));
        assert_eq!(snap.key_moments[1].on_target, Some(true));
    }

    #[test]
    fn non_impactful_kinds_not_moments() {
        let events = vec![
            event(10, EventKind::Substitution, "A", "X"),
            event(20, EventKind::KeyPass, "A", "X"),
            event(30, EventKind::Save, "B", "K"),
        ];
        let snap = compress(&bounds(0), &events, Some(&roster()), None);
        assert!(snap.key_moments.is_empty());
    }
}
