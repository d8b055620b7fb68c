/*!
 * Active-entry lookup for playback.
 *
 * An entry is active at `t` when `start <= t <= end + grace`. When several entries
 * match, the first one in timeline order wins.
 */

use crate::app_config::LookupConfig;
use crate::subtitle_processor::{SubtitleEntry, Timeline, WordTiming};

/// Grace window used by the playback overlay to keep captions up a little longer
pub const DEFAULT_PLAYBACK_GRACE_SECS: f64 = 0.5;

/// First entry active at `t`, without a grace window
pub fn active_entry(timeline: &Timeline, t: f64) -> Option<&SubtitleEntry> {
    ActiveLookup::default().active_entry(timeline, t)
}

/// First word of `entry` active at `t`
pub fn active_word(entry: &SubtitleEntry, t: f64) -> Option<&WordTiming> {
    entry.words.as_ref()?.iter().find(|w| w.contains(t))
}

/// Lookup with a configurable grace window
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ActiveLookup {
    grace_window: f64,
}

impl ActiveLookup {
    /// Negative or non-finite windows are treated as no window
    pub fn new(grace_window: f64) -> Self {
        let grace_window = if grace_window.is_finite() && grace_window > 0.0 {
            grace_window
        } else {
            0.0
        };
        Self { grace_window }
    }

    pub fn from_config(config: &LookupConfig) -> Self {
        Self::new(config.grace_window_secs)
    }

    pub fn grace_window(&self) -> f64 {
        self.grace_window
    }

    /// Index of the first active entry, by linear scan
    pub fn active_entry_index(&self, timeline: &Timeline, t: f64) -> Option<usize> {
        timeline.iter().position(|e| e.contains(t, self.grace_window))
    }

    pub fn active_entry<'a>(&self, timeline: &'a Timeline, t: f64) -> Option<&'a SubtitleEntry> {
        self.active_entry_index(timeline, t)
            .map(|i| &timeline.entries()[i])
    }

    /// Build a search index for repeated lookups against the same timeline
    pub fn index<'a>(&self, timeline: &'a Timeline) -> LookupIndex<'a> {
        LookupIndex::build(timeline, self.grace_window)
    }
}

/// Precomputed lookup structure for a fixed timeline
///
/// For a chronological timeline it keeps the running maximum of entry ends, so the
/// first active entry is found with two binary searches. Unordered timelines fall
/// back to a linear scan.
#[derive(Debug, Clone)]
pub struct LookupIndex<'a> {
    timeline: &'a Timeline,
    grace_window: f64,
    running_max_end: Option<Vec<f64>>,
}

impl<'a> LookupIndex<'a> {
    pub fn build(timeline: &'a Timeline, grace_window: f64) -> Self {
        let grace_window = ActiveLookup::new(grace_window).grace_window();
        let running_max_end = timeline.is_chronological().then(|| {
            timeline
                .iter()
                .scan(f64::NEG_INFINITY, |max, e| {
                    *max = max.max(e.end);
                    Some(*max)
                })
                .collect()
        });

        Self {
            timeline,
            grace_window,
            running_max_end,
        }
    }

    pub fn active_entry_index(&self, t: f64) -> Option<usize> {
        let Some(running_max_end) = &self.running_max_end else {
            return ActiveLookup::new(self.grace_window).active_entry_index(self.timeline, t);
        };

        // Entries [0, started) have start <= t
        let started = self.timeline.entries().partition_point(|e| e.start <= t);
        // The first index whose end reaches t - grace is the first entry whose own end does
        let first = running_max_end[..started].partition_point(|&max_end| max_end + self.grace_window < t);

        (first < started).then_some(first)
    }

    pub fn active_entry(&self, t: f64) -> Option<&'a SubtitleEntry> {
        self.active_entry_index(t).map(|i| &self.timeline.entries()[i])
    }
}
