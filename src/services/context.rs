use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::models::{Context, DeviceType, Season, TimeOfDay, UserSegment};

/// Derives the generation context from wall-clock time and the
/// caller-supplied device. Pure function, no failure modes.
///
/// Segment and holiday detection are stubbed until the profile store is
/// wired into generation.
pub fn build_context(now: DateTime<Utc>, device: DeviceType, region: &str) -> Context {
    Context {
        timestamp: now,
        season: season_for(now),
        time_of_day: time_of_day_for(now),
        day_of_week: now.weekday().to_string(),
        region: region.to_string(),
        device,
        user_segment: UserSegment::NewUser,
        is_holiday: false,
    }
}

/// Calendar season from the month: 3-5 spring, 6-8 summer, 9-11 fall,
/// everything else winter.
pub fn season_for(t: DateTime<Utc>) -> Season {
    match t.month() {
        3..=5 => Season::Spring,
        6..=8 => Season::Summer,
        9..=11 => Season::Fall,
        _ => Season::Winter,
    }
}

/// Time-of-day bucket from the hour: [5,12) morning, [12,17) afternoon,
/// [17,21) evening, everything else night.
pub fn time_of_day_for(t: DateTime<Utc>) -> TimeOfDay {
    match t.hour() {
        5..=11 => TimeOfDay::Morning,
        12..=16 => TimeOfDay::Afternoon,
        17..=20 => TimeOfDay::Evening,
        _ => TimeOfDay::Night,
    }
}
