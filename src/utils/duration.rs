//! Human-friendly duration parsing for configuration values.

use std::time::Duration;

/// Parse a duration such as `"30s"`, `"500ms"`, `"1m30s"`, `"1.5h"` or a
/// bare number of seconds (`"45"`).
///
/// Returns `None` for anything else, including negative values.
pub fn parse_duration(input: &str) -> Option<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(secs) = input.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }

    let mut total_ms = 0f64;
    let mut rest = input;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_len == 0 {
            return None;
        }
        let value: f64 = rest[..number_len].parse().ok()?;
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let ms_per_unit = match &rest[..unit_len] {
            "ms" => 1.0,
            "s" => 1_000.0,
            "m" => 60_000.0,
            "h" => 3_600_000.0,
            _ => return None,
        };
        rest = &rest[unit_len..];

        total_ms += value * ms_per_unit;
    }

    total_ms
        .is_finite()
        .then(|| Duration::from_nanos((total_ms * 1_000_000.0).round() as u64))
}
