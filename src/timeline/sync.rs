/*!
 * Duration synchronization.
 *
 * When the footage under a timeline is replaced by a track of a different length
 * (typically a generated voice-over), every timing value is multiplied by the same
 * stretch ratio `target / current`. This models a uniform linear time-stretch, so
 * relative spacing and pacing survive exactly and order is preserved.
 */

use log::{debug, info};

use crate::errors::TimelineError;
use crate::subtitle_processor::{SubtitleEntry, Timeline};

/// Compute the stretch ratio between two durations
///
/// Fails when either duration is not a positive finite number: a zero current
/// duration makes the ratio undefined and a zero target means the replacement
/// track's length could not be determined.
pub fn stretch_ratio(current_duration: f64, target_duration: f64) -> Result<f64, TimelineError> {
    let valid = |d: f64| d.is_finite() && d > 0.0;
    if !valid(current_duration) || !valid(target_duration) {
        return Err(TimelineError::InvalidDuration {
            current: current_duration,
            target: target_duration,
        });
    }
    Ok(target_duration / current_duration)
}

/// Produce a copy of `timeline` rescaled from `current_duration` to `target_duration`
pub fn synchronize(
    timeline: &Timeline,
    current_duration: f64,
    target_duration: f64,
) -> Result<Timeline, TimelineError> {
    let ratio = stretch_ratio(current_duration, target_duration)?;

    let entries = timeline
        .iter()
        .map(|entry| {
            let mut entry = entry.clone();
            scale_entry(&mut entry, ratio);
            entry
        })
        .collect();

    info!(
        "Synchronized {} entries from {:.3}s to {:.3}s (ratio {:.4})",
        timeline.len(),
        current_duration,
        target_duration,
        ratio
    );
    Ok(Timeline::from_entries(entries))
}

/// Rescale `timeline` in place; on error nothing is modified
pub fn synchronize_in_place(
    timeline: &mut Timeline,
    current_duration: f64,
    target_duration: f64,
) -> Result<(), TimelineError> {
    let ratio = stretch_ratio(current_duration, target_duration)?;
    for entry in timeline.entries_mut() {
        scale_entry(entry, ratio);
    }
    debug!("Rescaled {} entries in place by {:.4}", timeline.len(), ratio);
    Ok(())
}

fn scale_entry(entry: &mut SubtitleEntry, ratio: f64) {
    entry.start *= ratio;
    entry.end *= ratio;
    if let Some(words) = entry.words.as_mut() {
        for word in words {
            word.start *= ratio;
            word.end *= ratio;
        }
    }
}
