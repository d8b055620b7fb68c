/*!
 * Timecode codec for the subtitle interchange format.
 *
 * Converts between textual timestamps (`HH:MM:SS,mmm`, `HH:MM:SS.mmm`, `MM:SS.mmm`)
 * and floating-point seconds. Parsing is lenient: anything that is not a digit or a
 * separator is stripped first, and `parse_timecode` falls back to `0.0` on input it
 * cannot make sense of so that a single bad timestamp never blocks a whole file.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::TimelineError;

// @const: Characters that cannot be part of a timestamp
static NON_TIMECODE_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^0-9:.,]").unwrap()
});

// @const: Two- or three-field timestamp with optional fraction
static TIMECODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(\d+):)?(\d+):(\d+)(?:[.,](\d+))?$").unwrap()
});

/// Parse a timestamp into seconds, returning an error on structurally invalid input
pub fn try_parse_timecode(timestamp: &str) -> Result<f64, TimelineError> {
    let cleaned = NON_TIMECODE_CHARS.replace_all(timestamp, "");
    let caps = TIMECODE_REGEX
        .captures(&cleaned)
        .ok_or_else(|| TimelineError::InvalidTimecode(timestamp.to_string()))?;

    let field = |idx: usize| -> Result<f64, TimelineError> {
        match caps.get(idx) {
            Some(m) => m
                .as_str()
                .parse::<u64>()
                .map(|v| v as f64)
                .map_err(|_| TimelineError::InvalidTimecode(timestamp.to_string())),
            None => Ok(0.0),
        }
    };

    let hours = field(1)?;
    let minutes = field(2)?;
    let seconds = field(3)?;

    // The fraction is a decimal fraction of a second, whatever its width
    let fraction = match caps.get(4) {
        Some(m) => format!("0.{}", m.as_str())
            .parse::<f64>()
            .map_err(|_| TimelineError::InvalidTimecode(timestamp.to_string()))?,
        None => 0.0,
    };

    Ok(hours * 3600.0 + minutes * 60.0 + seconds + fraction)
}

/// Parse a timestamp into seconds, falling back to `0.0` on invalid input
pub fn parse_timecode(timestamp: &str) -> f64 {
    match try_parse_timecode(timestamp) {
        Ok(seconds) => seconds,
        Err(e) => {
            debug!("Falling back to 0s: {}", e);
            0.0
        }
    }
}

/// Format seconds as `HH:MM:SS,mmm`, rounding to the nearest millisecond
pub fn format_timecode(seconds: f64) -> String {
    let total_ms = if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    };

    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1_000;
    let millis = total_ms % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}
