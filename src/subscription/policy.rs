use time::{Duration, OffsetDateTime};

/// Every new account starts with this many days of full access.
pub const TRIAL_DAYS: i64 = 7;

const MS_PER_DAY: i128 = 86_400_000;

pub fn trial_end(trial_start: OffsetDateTime) -> OffsetDateTime {
    trial_start + Duration::days(TRIAL_DAYS)
}

/// A paid subscription ends the trial regardless of the clock.
pub fn is_trial_active(
    is_subscribed: bool,
    trial_start: OffsetDateTime,
    now: OffsetDateTime,
) -> bool {
    !is_subscribed && now < trial_end(trial_start)
}

/// Whole days until the trial ends, rounded up. Any remainder still counts
/// as a day, so an active trial never reports 0.
pub fn days_left(trial_start: OffsetDateTime, now: OffsetDateTime) -> i64 {
    let remaining = (trial_end(trial_start) - now).whole_milliseconds();
    if remaining <= 0 {
        return 0;
    }
    ((remaining + MS_PER_DAY - 1) / MS_PER_DAY) as i64
}
