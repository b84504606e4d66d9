//! Crack time estimation
//!
//! Translates a guess count into attack durations under four attacker
//! scenarios, a human-readable rendering of each, and a 0-4 score.

/// Guesses per second under each attack scenario.
const ONLINE_THROTTLED_RATE: f64 = 100.0 / 3600.0;
const ONLINE_UNTHROTTLED_RATE: f64 = 10.0;
const OFFLINE_SLOW_HASH_RATE: f64 = 1e4;
const OFFLINE_FAST_HASH_RATE: f64 = 1e10;

/// Safety margin around the score thresholds so that estimator noise near a
/// boundary does not flip the score.
const DELTA: f64 = 5.0;

const MINUTE: f64 = 60.0;
const HOUR: f64 = MINUTE * 60.0;
const DAY: f64 = HOUR * 24.0;
const MONTH: f64 = DAY * 31.0;
const YEAR: f64 = MONTH * 12.0;
const CENTURY: f64 = YEAR * 100.0;

/// Crack time in seconds under each attack scenario.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrackTimesSeconds {
    /// Online attack against a rate-limited service, 100 guesses per hour.
    pub online_throttling_100_per_hour: f64,
    /// Online attack with no rate limiting, 10 guesses per second.
    pub online_no_throttling_10_per_second: f64,
    /// Offline attack against a slow hash, 10^4 guesses per second.
    pub offline_slow_hashing_1e4_per_second: f64,
    /// Offline attack against a fast hash, 10^10 guesses per second.
    pub offline_fast_hashing_1e10_per_second: f64,
}

/// Human-readable rendering of [`CrackTimesSeconds`], field for field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrackTimesDisplay {
    pub online_throttling_100_per_hour: String,
    pub online_no_throttling_10_per_second: String,
    pub offline_slow_hashing_1e4_per_second: String,
    pub offline_fast_hashing_1e10_per_second: String,
}

#[derive(Debug, Clone)]
pub(crate) struct AttackTimes {
    pub(crate) crack_times_seconds: CrackTimesSeconds,
    pub(crate) crack_times_display: CrackTimesDisplay,
    pub(crate) score: u8,
}

pub(crate) fn estimate_attack_times(guesses: f64) -> AttackTimes {
    let crack_times_seconds = CrackTimesSeconds {
        online_throttling_100_per_hour: guesses / ONLINE_THROTTLED_RATE,
        online_no_throttling_10_per_second: guesses / ONLINE_UNTHROTTLED_RATE,
        offline_slow_hashing_1e4_per_second: guesses / OFFLINE_SLOW_HASH_RATE,
        offline_fast_hashing_1e10_per_second: guesses / OFFLINE_FAST_HASH_RATE,
    };

    let crack_times_display = CrackTimesDisplay {
        online_throttling_100_per_hour: display_time(
            crack_times_seconds.online_throttling_100_per_hour,
        ),
        online_no_throttling_10_per_second: display_time(
            crack_times_seconds.online_no_throttling_10_per_second,
        ),
        offline_slow_hashing_1e4_per_second: display_time(
            crack_times_seconds.offline_slow_hashing_1e4_per_second,
        ),
        offline_fast_hashing_1e10_per_second: display_time(
            crack_times_seconds.offline_fast_hashing_1e10_per_second,
        ),
    };

    AttackTimes {
        crack_times_seconds,
        crack_times_display,
        score: guesses_to_score(guesses),
    }
}

/// Maps a guess count onto the 0-4 score scale.
pub(crate) fn guesses_to_score(guesses: f64) -> u8 {
    if guesses < 1e3 + DELTA {
        0
    } else if guesses < 1e6 + DELTA {
        1
    } else if guesses < 1e8 + DELTA {
        2
    } else if guesses < 1e10 + DELTA {
        3
    } else {
        4
    }
}

fn display_time(seconds: f64) -> String {
    let (count, unit) = if seconds < 1.0 {
        return "less than a second".to_string();
    } else if seconds < MINUTE {
        (seconds, "second")
    } else if seconds < HOUR {
        (seconds / MINUTE, "minute")
    } else if seconds < DAY {
        (seconds / HOUR, "hour")
    } else if seconds < MONTH {
        (seconds / DAY, "day")
    } else if seconds < YEAR {
        (seconds / MONTH, "month")
    } else if seconds < CENTURY {
        (seconds / YEAR, "year")
    } else {
        return "centuries".to_string();
    };

    let count = count.round() as u64;
    if count == 1 {
        format!("1 {unit}")
    } else {
        format!("{count} {unit}s")
    }
}
