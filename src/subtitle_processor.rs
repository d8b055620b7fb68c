use std::fmt;
use std::path::Path;
use anyhow::{Context, Result};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::app_config::ParserConfig;
use crate::errors::TimelineError;
use crate::file_utils::FileManager;
use crate::timecode::{format_timecode, parse_timecode, try_parse_timecode};

// @module: Subtitle data model and interchange text parsing/serialization

/// Separator used when joining the lines of an entry into a single string
pub const LINE_SEPARATOR: &str = "\n";

/// Token separating start and end on a timing line
pub const TIMING_ARROW: &str = "-->";

// @const: A line made only of digits (display index)
static INDEX_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+$").unwrap()
});

// @struct: Normalized on-screen position, 0-100 on each axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Create a position, clamping both axes into 0..=100
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: clamp_percent(x),
            y: clamp_percent(y),
        }
    }
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

// @struct: Word-level timing nested inside an entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordTiming {
    pub text: String,
    pub start: f64,
    pub end: f64,
}

impl WordTiming {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }

    /// Whether `t` falls inside `[start, end]`
    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t <= self.end
    }
}

// @struct: Single subtitle entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleEntry {
    // @field: Display ordinal, not used for timing
    pub seq_num: usize,

    // @field: Start time in seconds
    pub start: f64,

    // @field: End time in seconds
    pub end: f64,

    // @field: Text lines
    pub lines: Vec<String>,

    // @field: Render position, carried untouched by timing transforms
    #[serde(default)]
    pub position: Option<Position>,

    // @field: Word-level timings for highlighting
    #[serde(default)]
    pub words: Option<Vec<WordTiming>>,
}

impl SubtitleEntry {
    // @creates: Validated subtitle entry
    // @validates: 0 <= start < end, both finite
    pub fn new(seq_num: usize, start: f64, end: f64, lines: Vec<String>) -> Result<Self, TimelineError> {
        validate_span(start, end)?;
        Ok(Self::new_unchecked(seq_num, start, end, lines))
    }

    /// Creates an entry without validating its span
    ///
    /// Used by the best-effort parser and for entries that already went through
    /// an unvalidated end-time edit.
    pub fn new_unchecked(seq_num: usize, start: f64, end: f64, lines: Vec<String>) -> Self {
        SubtitleEntry {
            seq_num,
            start,
            end,
            lines,
            position: None,
            words: None,
        }
    }

    /// Convenience constructor taking the text as a single string
    pub fn from_text(seq_num: usize, start: f64, end: f64, text: &str) -> Result<Self, TimelineError> {
        Self::new(seq_num, start, end, split_lines(text))
    }

    /// Attach a render position
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    // @validates: Every word lies inside the entry span
    pub fn with_words(mut self, words: Vec<WordTiming>) -> Result<Self, TimelineError> {
        if let Some(word) = words
            .iter()
            .find(|w| w.start < self.start || w.end > self.end || w.end < w.start)
        {
            return Err(TimelineError::InvalidEntry(format!(
                "word {:?} [{}, {}] is not nested inside entry {} [{}, {}]",
                word.text, word.start, word.end, self.seq_num, self.start, self.end
            )));
        }
        self.words = Some(words);
        Ok(self)
    }

    /// Text of the entry with lines joined by the line separator
    pub fn text(&self) -> String {
        self.lines.join(LINE_SEPARATOR)
    }

    /// Replace the text, splitting it on the line separator
    pub fn set_text(&mut self, text: &str) {
        self.lines = split_lines(text);
    }

    /// Duration in seconds (may be negative after an unvalidated end edit)
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether `t` lies in `[start, end + grace]`
    pub fn contains(&self, t: f64, grace: f64) -> bool {
        self.start <= t && t <= self.end + grace
    }

    /// Start time formatted as an SRT timestamp
    pub fn format_start_time(&self) -> String {
        format_timecode(self.start)
    }

    /// End time formatted as an SRT timestamp
    pub fn format_end_time(&self) -> String {
        format_timecode(self.end)
    }
}

pub(crate) fn validate_span(start: f64, end: f64) -> Result<(), TimelineError> {
    if !start.is_finite() || !end.is_finite() {
        return Err(TimelineError::InvalidEntry(format!(
            "non-finite time range [{}, {}]",
            start, end
        )));
    }
    if start < 0.0 {
        return Err(TimelineError::InvalidEntry(format!("negative start time {}", start)));
    }
    if end <= start {
        return Err(TimelineError::InvalidEntry(format!(
            "end time {} <= start time {}",
            end, start
        )));
    }
    Ok(())
}

fn split_lines(text: &str) -> Vec<String> {
    text.split(LINE_SEPARATOR).map(|l| l.to_string()).collect()
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} {} {}", self.format_start_time(), TIMING_ARROW, self.format_end_time())?;
        write!(f, "{}", self.text())
    }
}

/// Outcome of a best-effort parse
#[derive(Debug, Clone, Default)]
pub struct ParseReport {
    /// Parsed timeline, in block order
    pub timeline: Timeline,
    /// Blocks dropped because they had no timing line
    pub dropped_blocks: usize,
    /// Trailing index numerals stripped from entry text
    pub stray_numerals: usize,
}

/// One timing line with its optional index and text, carved out of a block
struct RawCue<'a> {
    index: Option<&'a str>,
    timing: &'a str,
    text: Vec<&'a str>,
}

/// Ordered sequence of subtitle entries owned by one editing session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    entries: Vec<SubtitleEntry>,
}

impl Timeline {
    /// Create an empty timeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already ordered list of entries
    pub fn from_entries(entries: Vec<SubtitleEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[SubtitleEntry] {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [SubtitleEntry] {
        &mut self.entries
    }

    pub(crate) fn entries_vec_mut(&mut self) -> &mut Vec<SubtitleEntry> {
        &mut self.entries
    }

    pub fn into_entries(self) -> Vec<SubtitleEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SubtitleEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SubtitleEntry> {
        self.entries.iter()
    }

    /// Append an entry at the end of the timeline
    pub fn push(&mut self, entry: SubtitleEntry) {
        self.entries.push(entry);
    }

    /// End time of the last entry, or 0 for an empty timeline
    pub fn total_duration(&self) -> f64 {
        self.entries.iter().map(|e| e.end).fold(0.0, f64::max)
    }

    /// Whether entries are sorted by start time
    pub fn is_chronological(&self) -> bool {
        self.entries.windows(2).all(|w| w[0].start <= w[1].start)
    }

    pub(crate) fn check_index(&self, index: usize) -> Result<(), TimelineError> {
        if index >= self.entries.len() {
            return Err(TimelineError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        Ok(())
    }

    /// Read and parse an SRT file
    pub fn from_srt_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = FileManager::read_to_string(path)
            .with_context(|| format!("Failed to read subtitle file: {}", path.display()))?;
        Ok(Self::parse_srt_string(&content))
    }

    /// Write the timeline to an SRT file
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        FileManager::write_to_file(path, &self.to_srt_string())
            .with_context(|| format!("Failed to write subtitle file: {}", path.display()))
    }

    /// Parse interchange text into a timeline, dropping unusable blocks
    pub fn parse_srt_string(content: &str) -> Self {
        Self::parse_srt_with_report(content).timeline
    }

    /// Parse interchange text and report what was dropped along the way
    pub fn parse_srt_with_report(content: &str) -> ParseReport {
        // Lenient decoding never fails
        Self::parse_with_decoder(content, |ts| Ok(parse_timecode(ts))).unwrap_or_default()
    }

    /// Parse according to the parser configuration
    ///
    /// With `strict_timecodes` set, the first unparsable timestamp aborts the parse
    /// instead of decoding as 0.
    pub fn parse_srt_with_config(content: &str, config: &ParserConfig) -> Result<ParseReport, TimelineError> {
        if config.strict_timecodes {
            Self::parse_with_decoder(content, try_parse_timecode)
        } else {
            Ok(Self::parse_srt_with_report(content))
        }
    }

    fn parse_with_decoder<F>(content: &str, mut decode: F) -> Result<ParseReport, TimelineError>
    where
        F: FnMut(&str) -> Result<f64, TimelineError>,
    {
        let mut report = ParseReport::default();
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        // Serialized text always ends with a line break; a cut-off stream may not
        let cut_off = !content.ends_with('\n');

        let mut cues = Vec::new();
        for block in split_blocks(content) {
            let block_cues = split_cues(&block, &mut report.stray_numerals);
            if block_cues.is_empty() {
                debug!("Dropping block without timing line: {:?}", block.first());
                report.dropped_blocks += 1;
                continue;
            }
            cues.extend(block_cues);
        }

        let mut cues = cues.into_iter().peekable();
        while let Some(mut cue) = cues.next() {
            let seq_num = cue
                .index
                .and_then(|idx| idx.parse::<usize>().ok())
                .unwrap_or(report.timeline.len() + 1);

            // A trailing numeral is the next block's index only if that block lacks one
            let next_index_missing = match cues.peek() {
                Some(next) => next.index.is_none(),
                None => cut_off,
            };
            let trailing_index = next_index_missing
                && cue.text.last().is_some_and(|last| {
                    is_index_line(last) && last.trim().parse::<usize>().ok() == Some(seq_num + 1)
                });
            if trailing_index {
                cue.text.pop();
                report.stray_numerals += 1;
            }

            let (start, end) = parse_timing_line(cue.timing, &mut decode)?;
            if end <= start {
                warn!(
                    "Entry {} has an inverted time range [{}, {}]",
                    seq_num, start, end
                );
            }

            let lines = cue.text.iter().map(|l| l.to_string()).collect();
            report
                .timeline
                .push(SubtitleEntry::new_unchecked(seq_num, start, end, lines));
        }

        if report.timeline.is_empty() && !content.trim().is_empty() {
            warn!("No subtitle entries found in non-empty content");
        } else if report.dropped_blocks > 0 || report.stray_numerals > 0 {
            debug!(
                "Parsed {} entries ({} blocks dropped, {} stray numerals stripped)",
                report.timeline.len(),
                report.dropped_blocks,
                report.stray_numerals
            );
        }

        Ok(report)
    }

    /// Serialize to interchange text, renumbering entries from 1
    pub fn to_srt_string(&self) -> String {
        let mut output = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                format!(
                    "{}\n{} {} {}\n{}",
                    i + 1,
                    entry.format_start_time(),
                    TIMING_ARROW,
                    entry.format_end_time(),
                    entry.text()
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        if !output.is_empty() {
            output.push('\n');
        }
        output
    }
}

impl fmt::Display for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_srt_string())
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a SubtitleEntry;
    type IntoIter = std::slice::Iter<'a, SubtitleEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn is_index_line(line: &str) -> bool {
    INDEX_LINE_REGEX.is_match(line.trim())
}

/// Split content into blocks of non-blank lines
fn split_blocks(content: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    for line in content.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

/// Carve a block into cues, one per timing line
///
/// A block normally holds a single cue. When the blank line between two blocks was
/// lost, the second timing line starts a new cue and the numeral right above it is
/// that cue's index, not text of the previous one.
fn split_cues<'a>(block: &[&'a str], stray_numerals: &mut usize) -> Vec<RawCue<'a>> {
    let timing_positions: Vec<usize> = block
        .iter()
        .enumerate()
        .filter(|(_, line)| line.contains(TIMING_ARROW))
        .map(|(i, _)| i)
        .collect();

    let mut cues: Vec<RawCue<'a>> = Vec::with_capacity(timing_positions.len());
    for (k, &pos) in timing_positions.iter().enumerate() {
        let lower_bound = if k == 0 { 0 } else { timing_positions[k - 1] + 1 };
        let index = if pos > lower_bound && is_index_line(block[pos - 1]) {
            Some(block[pos - 1].trim())
        } else {
            None
        };

        if k > 0 && index.is_some() {
            if let Some(prev) = cues.last_mut() {
                prev.text.pop();
                *stray_numerals += 1;
            }
        }

        let text_end = timing_positions.get(k + 1).copied().unwrap_or(block.len());
        cues.push(RawCue {
            index,
            timing: block[pos],
            text: block[pos + 1..text_end].to_vec(),
        });
    }

    cues
}

/// Split a timing line on the arrow and decode both sides
fn parse_timing_line<F>(line: &str, decode: &mut F) -> Result<(f64, f64), TimelineError>
where
    F: FnMut(&str) -> Result<f64, TimelineError>,
{
    let (left, right) = line.split_once(TIMING_ARROW).unwrap_or((line, ""));
    // Anything after the end timestamp (cue settings, coordinates) is ignored
    let right = right.split_whitespace().next().unwrap_or("");
    Ok((decode(left.trim())?, decode(right)?))
}
