//! Formatting helpers for durations and rates in the run report.

use std::time::Duration;

/// Formats a duration as HH:MM:SS.mmm (e.g. 3725.5s -> "01:02:05.500").
///
/// Hours are not wrapped, so a 25 hour run prints as "25:00:00.000".
#[must_use]
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_millis = elapsed.as_millis();
    let hours = total_millis / 3_600_000;
    let minutes = (total_millis % 3_600_000) / 60_000;
    let secs = (total_millis % 60_000) / 1000;
    let millis = total_millis % 1000;
    format!("{hours:02}:{minutes:02}:{secs:02}.{millis:03}")
}

/// Formats a rate in items per second with two decimals, or "n/a" when
/// there is no rate to report.
#[must_use]
pub fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(r) if r.is_finite() => format!("{r:.2} i/s"),
        _ => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::ZERO), "00:00:00.000");
        assert_eq!(format_elapsed(Duration::from_millis(1500)), "00:00:01.500");
        assert_eq!(format_elapsed(Duration::from_secs(59)), "00:00:59.000");
        assert_eq!(format_elapsed(Duration::from_secs(3599)), "00:59:59.000");
        assert_eq!(format_elapsed(Duration::from_millis(3_725_500)), "01:02:05.500");
        assert_eq!(format_elapsed(Duration::from_secs(90_061)), "25:01:01.000");

        // Sub-millisecond precision is truncated
        assert_eq!(format_elapsed(Duration::from_micros(1999)), "00:00:00.001");
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(Some(0.0)), "0.00 i/s");
        assert_eq!(format_rate(Some(12.346)), "12.35 i/s");
        assert_eq!(format_rate(Some(1000.0)), "1000.00 i/s");
        assert_eq!(format_rate(None), "n/a");
        assert_eq!(format_rate(Some(f64::INFINITY)), "n/a");
        assert_eq!(format_rate(Some(f64::NAN)), "n/a");
    }
}
