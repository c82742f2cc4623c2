use crate::models::{Context, TimeOfDay};

/// Default cache lifetime, one hour
const BASE_TTL_SECONDS: u64 = 3600;
/// Evening shoppers churn trending signals fastest
const EVENING_TTL_SECONDS: u64 = 1800;
/// Overnight activity is sparse; recompute rarely
const NIGHT_TTL_SECONDS: u64 = 21600;

/// Picks the TTL for a cached recommendation set from the context's
/// time-of-day bucket. Pure function, no failure modes.
pub fn cache_ttl(context: &Context) -> u64 {
    match context.time_of_day {
        TimeOfDay::Evening => EVENING_TTL_SECONDS,
        TimeOfDay::Night => NIGHT_TTL_SECONDS,
        TimeOfDay::Morning | TimeOfDay::Afternoon => BASE_TTL_SECONDS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeviceType, Season, UserSegment};
    use chrono::Utc;

    fn context_at(time_of_day: TimeOfDay) -> Context {
        Context {
            timestamp: Utc::now(),
            season: Season::Winter,
            time_of_day,
            day_of_week: "Mon".to_string(),
            region: "US".to_string(),
            device: DeviceType::Desktop,
            user_segment: UserSegment::NewUser,
            is_holiday: false,
        }
    }

    #[test]
    fn test_ttl_per_time_of_day() {
        assert_eq!(cache_ttl(&context_at(TimeOfDay::Morning)), 3600);
        assert_eq!(cache_ttl(&context_at(TimeOfDay::Afternoon)), 3600);
        assert_eq!(cache_ttl(&context_at(TimeOfDay::Evening)), 1800);
        assert_eq!(cache_ttl(&context_at(TimeOfDay::Night)), 21600);
    }
}
