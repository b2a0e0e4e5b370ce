//! # matchfeed-normalize
//!
//! Maps provider-native match records to the canonical schema.
//!
//! Normalization is pure and stateless: one record in, one
//! [`CanonicalEvent`] out — or nothing. A record whose type has no defined
//! mapping is a *drop*, not an error; the canonical stream never carries an
//! "unknown" variant.

#![deny(unsafe_code)]

mod record;

pub use record::ProviderRecord;

use matchfeed_core::{
    CanonicalEvent, CardColor, EventAttributes, EventKind, Roster, RosterBuilder,
};
use tracing::debug;

/// Pitch coordinates are provider-normalized to a 0–100 grid with the
/// attacking goal at x = 100. A pass "into the box" is one ending inside
/// this fixed rectangle approximating the penalty area.
const BOX_MIN_X: f64 = 83.0;
const BOX_MIN_Y: f64 = 21.1;
const BOX_MAX_Y: f64 = 78.9;

/// Normalize one provider record.
///
/// Returns `None` when the record has no defined mapping (expected
/// filtering, not an error).
#[must_use]
pub fn normalize(record: &ProviderRecord) -> Option<CanonicalEvent> {
    let (kind, attributes) = resolve_kind(record)?;
    Some(CanonicalEvent {
        timestamp_sec: absolute_seconds(record.period, record.minute, record.second),
        kind,
        team: record.team.clone(),
        player: record.player.clone(),
        attributes,
    })
}

/// Normalize a full pre-recorded log.
///
/// Drops unmappable records, stably sorts the survivors by timestamp (the
/// replay emitter requires ascending input), and resolves the two-slot
/// roster from the first two distinct non-null team names in the canonical
/// stream. The roster is `None` if fewer than two names ever appear.
#[must_use]
pub fn normalize_log(records: &[ProviderRecord]) -> (Vec<CanonicalEvent>, Option<Roster>) {
    let mut events: Vec<CanonicalEvent> = records.iter().filter_map(normalize).collect();
    let dropped = records.len() - events.len();
    if dropped > 0 {
        debug!(dropped, kept = events.len(), "dropped unmappable provider records");
    }
    events.sort_by_key(|e| e.timestamp_sec);

    let mut builder = RosterBuilder::new();
    for event in &events {
        builder.observe(event.team.as_deref());
        if builder.is_complete() {
            break;
        }
    }
    (events, builder.build())
}

/// Absolute match clock from period-relative minute/second.
///
/// Period offsets: 0 for period 1, +45 min for period 2, +90/+105 min for
/// extra time. Some feeds ship the minute already absolute (e.g. 52' during
/// period 2); adding the offset again would double-count, so the offset is
/// skipped whenever the minute is at or past it.
#[must_use]
pub fn absolute_seconds(period: u32, minute: u32, second: u32) -> u64 {
    let offset_min = period_offset_minutes(period);
    let minute = u64::from(minute);
    let absolute_min = if minute >= offset_min {
        minute
    } else {
        minute + offset_min
    };
    absolute_min * 60 + u64::from(second)
}

fn period_offset_minutes(period: u32) -> u64 {
    match period {
        0 | 1 => 0,
        2 => 45,
        3 => 90,
        _ => 105,
    }
}

/// Resolve the canonical kind (and its annotations) for a record.
///
/// Shot priority: outcome "goal" wins, everything else is a plain shot with
/// an on-target flag. Pass priority: assist > key pass > pass into box >
/// drop.
fn resolve_kind(record: &ProviderRecord) -> Option<(EventKind, EventAttributes)> {
    let plain = |kind| Some((kind, EventAttributes::default()));
    match record.type_name.as_str() {
        "shot" => Some(resolve_shot(record)),
        "pass" => resolve_pass(record).map(|kind| (kind, EventAttributes::default())),
        "foul" => plain(EventKind::Foul),
        "card" => Some((
            EventKind::Card,
            EventAttributes {
                on_target: None,
                card: record.card_color.as_deref().and_then(parse_card_color),
            },
        )),
        "corner" => plain(EventKind::Corner),
        "substitution" => plain(EventKind::Substitution),
        "save" => plain(EventKind::Save),
        "claim" => plain(EventKind::Claim),
        "punch" => plain(EventKind::Punch),
        other => {
            debug!(type_name = other, "dropping record with unmapped type");
            None
        }
    }
}

fn resolve_shot(record: &ProviderRecord) -> (EventKind, EventAttributes) {
    let outcome = record.outcome.as_deref().unwrap_or_default();
    if outcome == "goal" {
        return (EventKind::Goal, EventAttributes::default());
    }
    let on_target = matches!(outcome, "on_target" | "saved");
    (
        EventKind::Shot,
        EventAttributes {
            on_target: Some(on_target),
            card: None,
        },
    )
}

fn resolve_pass(record: &ProviderRecord) -> Option<EventKind> {
    if record.assisted_goal == Some(true) {
        return Some(EventKind::Assist);
    }
    if record.assisted_shot == Some(true) {
        return Some(EventKind::KeyPass);
    }
    if let (Some(x), Some(y)) = (record.end_x, record.end_y)
        && ends_in_box(x, y)
    {
        return Some(EventKind::PassIntoBox);
    }
    None
}

fn ends_in_box(x: f64, y: f64) -> bool {
    x >= BOX_MIN_X && (BOX_MIN_Y..=BOX_MAX_Y).contains(&y)
}

fn parse_card_color(raw: &str) -> Option<CardColor> {
    match raw {
        "yellow" => Some(CardColor::Yellow),
        "red" => Some(CardColor::Red),
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn record(type_name: &str) -> ProviderRecord {
        ProviderRecord {
            type_name: type_name.into(),
            period: 1,
            minute: 10,
            second: 30,
            team: Some("Arsenal".into()),
            player: Some("Saka".into()),
            outcome: None,
            card_color: None,
            assisted_goal: None,
            assisted_shot: None,
            end_x: None,
            end_y: None,
        }
    }

    // -- timestamps --

    #[test]
    fn period_one_has_no_offset() {
        assert_eq!(absolute_seconds(1, 10, 30), 630);
    }

    #[test]
    fn period_two_adds_offset_to_relative_minutes() {
        // 3' into the second half = 48 minutes absolute.
        assert_eq!(absolute_seconds(2, 3, 0), 48 * 60);
    }

    #[test]
    fn period_two_absolute_minute_not_double_offset() {
        // Minute already >= 45: the feed shipped it absolute.
        assert_eq!(absolute_seconds(2, 52, 12), 52 * 60 + 12);
        assert_eq!(absolute_seconds(2, 45, 0), 45 * 60);
    }

    #[test]
    fn extra_time_offsets() {
        assert_eq!(absolute_seconds(3, 2, 0), 92 * 60);
        assert_eq!(absolute_seconds(3, 93, 0), 93 * 60);
        assert_eq!(absolute_seconds(4, 1, 0), 106 * 60);
    }

    // -- shots --

    #[test]
    fn shot_with_goal_outcome_becomes_goal() {
        let mut r = record("shot");
        r.outcome = Some("goal".into());
        let e = normalize(&r).unwrap();
        assert_eq!(e.kind, EventKind::Goal);
        assert!(e.is_on_target());
    }

    #[test]
    fn saved_shot_is_on_target() {
        let mut r = record("shot");
        r.outcome = Some("saved".into());
        let e = normalize(&r).unwrap();
        assert_eq!(e.kind, EventKind::Shot);
        assert_eq!(e.attributes.on_target, Some(true));
    }

    #[test]
    fn off_target_shot() {
        let mut r = record("shot");
        r.outcome = Some("off_target".into());
        let e = normalize(&r).unwrap();
        assert_eq!(e.kind, EventKind::Shot);
        assert_eq!(e.attributes.on_target, Some(false));
    }

    // -- passes --

    #[test]
    fn pass_that_produced_goal_is_assist() {
        let mut r = record("pass");
        r.assisted_goal = Some(true);
        r.assisted_shot = Some(true); // assist outranks key pass
        assert_eq!(normalize(&r).unwrap().kind, EventKind::Assist);
    }

    #[test]
    fn pass_that_produced_shot_is_key_pass() {
        let mut r = record("pass");
        r.assisted_shot = Some(true);
        assert_eq!(normalize(&r).unwrap().kind, EventKind::KeyPass);
    }

    #[test]
    fn pass_ending_in_box_zone() {
        let mut r = record("pass");
        r.end_x = Some(90.0);
        r.end_y = Some(50.0);
        assert_eq!(normalize(&r).unwrap().kind, EventKind::PassIntoBox);
    }

    #[test]
    fn pass_outside_box_zone_dropped() {
        let mut r = record("pass");
        r.end_x = Some(60.0);
        r.end_y = Some(50.0);
        assert!(normalize(&r).is_none());

        // Deep but wide of the box.
        r.end_x = Some(95.0);
        r.end_y = Some(10.0);
        assert!(normalize(&r).is_none());
    }

    #[test]
    fn plain_pass_without_location_dropped() {
        assert!(normalize(&record("pass")).is_none());
    }

    // -- other kinds --

    #[test]
    fn card_color_parsed() {
        let mut r = record("card");
        r.card_color = Some("red".into());
        let e = normalize(&r).unwrap();
        assert_eq!(e.kind, EventKind::Card);
        assert_eq!(e.attributes.card, Some(CardColor::Red));
    }

    #[test]
    fn unknown_card_color_left_unset() {
        let mut r = record("card");
        r.card_color = Some("orange".into());
        assert_eq!(normalize(&r).unwrap().attributes.card, None);
    }

    #[test]
    fn keeper_actions_map_directly() {
        assert_eq!(normalize(&record("save")).unwrap().kind, EventKind::Save);
        assert_eq!(normalize(&record("claim")).unwrap().kind, EventKind::Claim);
        assert_eq!(normalize(&record("punch")).unwrap().kind, EventKind::Punch);
    }

    #[test]
    fn unmapped_type_is_dropped_not_error() {
        assert!(normalize(&record("offside")).is_none());
        assert!(normalize(&record("")).is_none());
    }

    // -- full-log normalization --

    #[test]
    fn normalize_log_sorts_drops_and_resolves_roster() {
        let mut shot_late = record("shot");
        shot_late.minute = 30;
        let mut foul_early = record("foul");
        foul_early.minute = 2;
        foul_early.team = Some("Spurs".into());
        let junk = record("offside");

        let (events, roster) = normalize_log(&[shot_late, junk, foul_early]);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, EventKind::Foul);
        assert_eq!(events[1].kind, EventKind::Shot);

        let roster = roster.unwrap();
        assert_eq!(roster.home, "Spurs"); // earliest canonical event
        assert_eq!(roster.away, "Arsenal");
    }

    #[test]
    fn normalize_log_without_two_teams_has_no_roster() {
        let (events, roster) = normalize_log(&[record("shot"), record("corner")]);
        assert_eq!(events.len(), 2);
        assert!(roster.is_none());
    }
}
