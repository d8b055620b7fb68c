/*!
 * Timecode validation for timelines.
 *
 * The engine tolerates timelines that break its own assumptions (inverted entries
 * after an end-time edit, out-of-order entries from a sloppy source). This module
 * reports those conditions on demand:
 * - Logically consistent spans (0 <= start < end)
 * - Word timings nested inside their entry
 * - Chronological order and non-overlapping entries
 * - Reasonable durations and reading speed
 */

use log::debug;

use crate::subtitle_processor::{SubtitleEntry, Timeline};

/// Maximum characters per second for readable subtitles
const DEFAULT_MAX_CPS: f64 = 25.0;

/// Minimum duration for a subtitle in seconds
const MIN_SUBTITLE_DURATION_SECS: f64 = 0.5;

/// Maximum duration for a single subtitle in seconds
const MAX_SUBTITLE_DURATION_SECS: f64 = 30.0;

/// Result of timecode validation for a single entry
#[derive(Debug, Clone)]
pub struct TimecodeEntryResult {
    /// Position of the entry in the timeline
    pub index: usize,
    /// Sequence number of the entry
    pub seq_num: usize,
    /// Whether the entry passed validation
    pub passed: bool,
    /// Issues found
    pub issues: Vec<TimecodeIssue>,
}

impl TimecodeEntryResult {
    fn new(index: usize, seq_num: usize, issues: Vec<TimecodeIssue>) -> Self {
        let passed = issues.iter().all(|i| !i.is_failure());
        Self {
            index,
            seq_num,
            passed,
            issues,
        }
    }
}

/// Types of timecode issues
#[derive(Debug, Clone, PartialEq)]
pub enum TimecodeIssue {
    /// End is not after start
    InvalidTimeRange { start: f64, end: f64 },
    /// Start lies before zero
    NegativeStart { start: f64 },
    /// A word timing escapes its entry
    WordOutsideEntry { word: String, start: f64, end: f64 },
    /// Duration is too short
    DurationTooShort { duration: f64, min_duration: f64 },
    /// Duration is too long
    DurationTooLong { duration: f64, max_duration: f64 },
    /// Reading speed exceeds limit
    ReadingSpeedTooHigh { cps: f64, max_cps: f64 },
    /// Starts before the entry preceding it in the timeline
    OutOfOrder { prev_seq_num: usize },
    /// Overlaps with another entry
    OverlapsWithEntry { other_seq_num: usize, overlap: f64 },
}

impl TimecodeIssue {
    /// Duration and reading speed problems are warnings, the rest are failures
    pub fn is_failure(&self) -> bool {
        !matches!(
            self,
            TimecodeIssue::DurationTooShort { .. }
                | TimecodeIssue::DurationTooLong { .. }
                | TimecodeIssue::ReadingSpeedTooHigh { .. }
        )
    }
}

impl std::fmt::Display for TimecodeIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimecodeIssue::InvalidTimeRange { start, end } => {
                write!(f, "Invalid time range: start {:.3}s >= end {:.3}s", start, end)
            }
            TimecodeIssue::NegativeStart { start } => {
                write!(f, "Negative start time: {:.3}s", start)
            }
            TimecodeIssue::WordOutsideEntry { word, start, end } => {
                write!(f, "Word {:?} [{:.3}s, {:.3}s] lies outside its entry", word, start, end)
            }
            TimecodeIssue::DurationTooShort { duration, min_duration } => {
                write!(f, "Duration too short: {:.3}s (min: {:.3}s)", duration, min_duration)
            }
            TimecodeIssue::DurationTooLong { duration, max_duration } => {
                write!(f, "Duration too long: {:.3}s (max: {:.3}s)", duration, max_duration)
            }
            TimecodeIssue::ReadingSpeedTooHigh { cps, max_cps } => {
                write!(f, "Reading speed too high: {:.1} CPS (max: {:.1})", cps, max_cps)
            }
            TimecodeIssue::OutOfOrder { prev_seq_num } => {
                write!(f, "Starts before preceding entry {}", prev_seq_num)
            }
            TimecodeIssue::OverlapsWithEntry { other_seq_num, overlap } => {
                write!(f, "Overlaps with entry {} by {:.3}s", other_seq_num, overlap)
            }
        }
    }
}

/// Result of validating a whole timeline
#[derive(Debug, Clone)]
pub struct TimecodeValidationResult {
    /// Overall pass/fail status
    pub passed: bool,
    /// Results for each entry
    pub entry_results: Vec<TimecodeEntryResult>,
    /// Total number of issues
    pub total_issues: usize,
    /// Number of overlapping entry pairs
    pub overlap_count: usize,
}

impl TimecodeValidationResult {
    /// Get all failed entries
    pub fn failed_entries(&self) -> Vec<&TimecodeEntryResult> {
        self.entry_results.iter().filter(|r| !r.passed).collect()
    }
}

/// Configuration for timecode validation
#[derive(Debug, Clone)]
pub struct TimecodeValidatorConfig {
    /// Maximum characters per second
    pub max_cps: f64,
    /// Minimum subtitle duration in seconds
    pub min_duration: f64,
    /// Maximum subtitle duration in seconds
    pub max_duration: f64,
    /// Whether to check for overlaps
    pub check_overlaps: bool,
}

impl Default for TimecodeValidatorConfig {
    fn default() -> Self {
        Self {
            max_cps: DEFAULT_MAX_CPS,
            min_duration: MIN_SUBTITLE_DURATION_SECS,
            max_duration: MAX_SUBTITLE_DURATION_SECS,
            check_overlaps: true,
        }
    }
}

/// Timecode validator for timelines
#[derive(Debug, Clone, Default)]
pub struct TimecodeValidator {
    config: TimecodeValidatorConfig,
}

impl TimecodeValidator {
    /// Create a new validator with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new validator with custom configuration
    pub fn with_config(config: TimecodeValidatorConfig) -> Self {
        Self { config }
    }

    /// Issues of a single entry, independent of its neighbors
    pub fn entry_issues(&self, entry: &SubtitleEntry) -> Vec<TimecodeIssue> {
        let mut issues = Vec::new();

        if entry.start < 0.0 {
            issues.push(TimecodeIssue::NegativeStart { start: entry.start });
        }

        if entry.end <= entry.start {
            issues.push(TimecodeIssue::InvalidTimeRange {
                start: entry.start,
                end: entry.end,
            });
            // Duration checks make no sense on an inverted span
            return issues;
        }

        for word in entry.words.iter().flatten() {
            if word.start < entry.start || word.end > entry.end || word.end < word.start {
                issues.push(TimecodeIssue::WordOutsideEntry {
                    word: word.text.clone(),
                    start: word.start,
                    end: word.end,
                });
            }
        }

        let duration = entry.duration();
        if duration < self.config.min_duration {
            issues.push(TimecodeIssue::DurationTooShort {
                duration,
                min_duration: self.config.min_duration,
            });
        }
        if duration > self.config.max_duration {
            issues.push(TimecodeIssue::DurationTooLong {
                duration,
                max_duration: self.config.max_duration,
            });
        }

        let cps = Self::calculate_cps(entry);
        if cps > self.config.max_cps {
            issues.push(TimecodeIssue::ReadingSpeedTooHigh {
                cps,
                max_cps: self.config.max_cps,
            });
        }

        issues
    }

    /// Validate every entry of a timeline and the relations between them
    pub fn validate_timeline(&self, timeline: &Timeline) -> TimecodeValidationResult {
        let entries = timeline.entries();
        let mut issues: Vec<Vec<TimecodeIssue>> = entries.iter().map(|e| self.entry_issues(e)).collect();

        for i in 1..entries.len() {
            if entries[i].start < entries[i - 1].start {
                issues[i].push(TimecodeIssue::OutOfOrder {
                    prev_seq_num: entries[i - 1].seq_num,
                });
            }
        }

        let mut overlap_count = 0;
        if self.config.check_overlaps && entries.len() > 1 {
            // Sort indices by start time for overlap detection
            let mut sorted: Vec<usize> = (0..entries.len()).collect();
            sorted.sort_by(|&a, &b| entries[a].start.total_cmp(&entries[b].start));

            for pair in sorted.windows(2) {
                let (current, next) = (&entries[pair[0]], &entries[pair[1]]);
                if current.end > next.start && next.end > next.start {
                    overlap_count += 1;
                    issues[pair[1]].push(TimecodeIssue::OverlapsWithEntry {
                        other_seq_num: current.seq_num,
                        overlap: current.end - next.start,
                    });
                }
            }
        }

        let entry_results: Vec<TimecodeEntryResult> = issues
            .into_iter()
            .enumerate()
            .map(|(i, entry_issues)| TimecodeEntryResult::new(i, entries[i].seq_num, entry_issues))
            .collect();

        let total_issues: usize = entry_results.iter().map(|r| r.issues.len()).sum();
        let passed = entry_results.iter().all(|r| r.passed);

        debug!(
            "Timecode validation: {} entries, {} issues, {} overlaps",
            entries.len(),
            total_issues,
            overlap_count
        );

        TimecodeValidationResult {
            passed,
            entry_results,
            total_issues,
            overlap_count,
        }
    }

    /// Calculate reading speed (characters per second) for an entry
    pub fn calculate_cps(entry: &SubtitleEntry) -> f64 {
        let duration = entry.duration();
        if duration <= 0.0 {
            return f64::INFINITY;
        }
        entry.text().chars().count() as f64 / duration
    }
}
