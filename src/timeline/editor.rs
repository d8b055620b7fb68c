/*!
 * In-place edit primitives for a timeline.
 *
 * Every operation takes an exclusive borrow of the whole timeline for its duration.
 * Timing inputs that are not finite numbers leave the timeline untouched.
 */

use log::debug;

use crate::errors::TimelineError;
use crate::subtitle_processor::{Position, SubtitleEntry, Timeline, WordTiming, validate_span};

/// Move the start of entry `index` to `new_start`, shifting it and every later entry
/// by the same offset
///
/// Shifted `start`, `end` and word times are clamped to `>= 0` independently, so an
/// entry pushed past zero can come out shorter than it was. Entries before `index`
/// are not touched.
pub fn ripple_shift(timeline: &mut Timeline, index: usize, new_start: f64) -> Result<(), TimelineError> {
    timeline.check_index(index)?;
    if !new_start.is_finite() {
        debug!("Ignoring ripple shift of entry {} to non-finite start", index);
        return Ok(());
    }

    let delta = new_start - timeline.entries()[index].start;
    for entry in &mut timeline.entries_mut()[index..] {
        shift_entry(entry, delta);
    }

    debug!("Ripple shifted entries {}.. by {:.3}s", index, delta);
    Ok(())
}

/// Rebuilding variant of [`ripple_shift`]: returns the shifted timeline and leaves the
/// input as it was
pub fn rippled(timeline: &Timeline, index: usize, new_start: f64) -> Result<Timeline, TimelineError> {
    timeline.check_index(index)?;
    if !new_start.is_finite() {
        return Ok(timeline.clone());
    }

    let delta = new_start - timeline.entries()[index].start;
    let entries = timeline
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let mut entry = entry.clone();
            if i >= index {
                shift_entry(&mut entry, delta);
            }
            entry
        })
        .collect();

    Ok(Timeline::from_entries(entries))
}

fn shift_entry(entry: &mut SubtitleEntry, delta: f64) {
    entry.start = (entry.start + delta).max(0.0);
    entry.end = (entry.end + delta).max(0.0);
    if let Some(words) = entry.words.as_mut() {
        for word in words {
            word.start = (word.start + delta).max(0.0);
            word.end = (word.end + delta).max(0.0);
        }
    }
}

/// Set the end of a single entry
///
/// The new end is not checked against the entry's start and later entries do not
/// move. An inverted entry is never reported active by lookup.
pub fn set_end(timeline: &mut Timeline, index: usize, new_end: f64) -> Result<(), TimelineError> {
    timeline.check_index(index)?;
    if !new_end.is_finite() {
        debug!("Ignoring end edit of entry {} to non-finite value", index);
        return Ok(());
    }

    timeline.entries_mut()[index].end = new_end;
    Ok(())
}

/// Replace the text of a single entry
pub fn set_text(timeline: &mut Timeline, index: usize, new_text: &str) -> Result<(), TimelineError> {
    timeline.check_index(index)?;
    timeline.entries_mut()[index].set_text(new_text);
    Ok(())
}

/// Replace (or clear) the render position of a single entry
pub fn set_position(timeline: &mut Timeline, index: usize, position: Option<Position>) -> Result<(), TimelineError> {
    timeline.check_index(index)?;
    timeline.entries_mut()[index].position = position;
    Ok(())
}

/// Split entry `index` at time `at` into two consecutive entries
///
/// Word timings are partitioned by start time and the text follows them. Without
/// word timings the text tokens are divided in proportion to the time split.
pub fn split_entry(timeline: &mut Timeline, index: usize, at: f64) -> Result<(), TimelineError> {
    timeline.check_index(index)?;
    let entry = timeline.entries()[index].clone();
    validate_span(entry.start, at)?;
    validate_span(at, entry.end)?;

    let (first_lines, second_lines, first_words, second_words) = match &entry.words {
        Some(words) => {
            let (before, after): (Vec<WordTiming>, Vec<WordTiming>) =
                words.iter().cloned().partition(|w| w.start < at);
            let first_words = before
                .into_iter()
                .map(|mut w| {
                    w.end = w.end.min(at);
                    w
                })
                .collect::<Vec<_>>();
            (
                vec![join_words(&first_words)],
                vec![join_words(&after)],
                Some(first_words),
                Some(after),
            )
        }
        None => {
            let tokens: Vec<&str> = entry.lines.iter().flat_map(|l| l.split_whitespace()).collect();
            let ratio = (at - entry.start) / entry.duration();
            let cut = ((tokens.len() as f64) * ratio).round() as usize;
            let cut = if tokens.len() >= 2 { cut.clamp(1, tokens.len() - 1) } else { cut.min(tokens.len()) };
            (
                vec![tokens[..cut].join(" ")],
                vec![tokens[cut..].join(" ")],
                None,
                None,
            )
        }
    };

    let mut first = SubtitleEntry::new_unchecked(entry.seq_num, entry.start, at, first_lines);
    first.position = entry.position;
    first.words = first_words;

    let mut second = SubtitleEntry::new_unchecked(entry.seq_num + 1, at, entry.end, second_lines);
    second.position = entry.position;
    second.words = second_words;

    let entries = timeline.entries_vec_mut();
    entries[index] = first;
    entries.insert(index + 1, second);

    debug!("Split entry {} at {:.3}s", index, at);
    Ok(())
}

fn join_words(words: &[WordTiming]) -> String {
    words.iter().map(|w| w.text.as_str()).collect::<Vec<_>>().join(" ")
}

/// Merge entry `index` with the entry that follows it
///
/// The merged entry spans from the first start to the later of the two ends and keeps
/// the first entry's position and sequence number.
pub fn merge_with_next(timeline: &mut Timeline, index: usize) -> Result<(), TimelineError> {
    timeline.check_index(index)?;
    timeline.check_index(index + 1)?;

    let entries = timeline.entries_vec_mut();
    let next = entries.remove(index + 1);
    let entry = &mut entries[index];

    entry.end = entry.end.max(next.end);
    entry.lines.extend(next.lines);
    entry.words = match (entry.words.take(), next.words) {
        (Some(mut a), Some(b)) => {
            a.extend(b);
            Some(a)
        }
        (a, b) => a.or(b),
    };

    debug!("Merged entry {} with its successor", index);
    Ok(())
}
