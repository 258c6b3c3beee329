//! The utilities module provides general capabilities, that may span the
//! input modeling, models, output analysis, and simulator modules.  The
//! utilities are centered around error reporting, common arithmetic, and
//! clock formatting.

pub mod errors;
pub mod tokens;

pub const SECONDS_PER_MINUTE: u64 = 60;
pub const SECONDS_PER_HOUR: u64 = 3600;

/// Rounds a fraction of a population to a whole voter count, with halves
/// rounded away from zero.  Negative or non-finite products count as zero
/// voters.
pub fn round_to_count(fraction_percent: f64, population: i64) -> u64 {
    let count = ((fraction_percent / 100.0) * population as f64).round();
    if count.is_finite() && count > 0.0 {
        count as u64
    } else {
        0
    }
}

/// Ceiling division for non-negative floating point quotients, returned as
/// a whole count.
pub fn ceil_div(numerator: f64, denominator: f64) -> usize {
    let quotient = (numerator / denominator).ceil();
    if quotient.is_finite() && quotient > 0.0 {
        quotient as usize
    } else {
        0
    }
}

/// Formats a number of seconds as `HH:MM:SS`.  Durations of a day or more
/// keep counting hours past 23.
pub fn clock_time(seconds: u64) -> String {
    let hours = seconds / SECONDS_PER_HOUR;
    let minutes = (seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let seconds = seconds % SECONDS_PER_MINUTE;
    format!["{:02}:{:02}:{:02}", hours, minutes, seconds]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_away_from_zero() {
        assert![round_to_count(50.0, 5) == 3];
        assert![round_to_count(10.0, 4) == 0];
        assert![round_to_count(25.0, 10) == 3];
        assert![round_to_count(100.0, 0) == 0];
        assert![round_to_count(10.0, -40) == 0];
    }

    #[test]
    fn ceil_div_counts_partial_units() {
        assert![ceil_div(3.0, 1.0) == 3];
        assert![ceil_div(2.5, 1.0) == 3];
        assert![ceil_div(101.0, 2.0) == 51];
        assert![ceil_div(0.0, 4.0) == 0];
    }

    #[test]
    fn formats_clock_time() {
        assert_eq![clock_time(0), "00:00:00"];
        assert_eq![clock_time(3661), "01:01:01"];
        assert_eq![clock_time(46799), "12:59:59"];
        assert_eq![clock_time(90000), "25:00:00"];
    }
}
