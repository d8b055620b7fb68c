/*!
 * Tests for interchange text parsing and serialization
 */

use anyhow::Result;
use cuesync::app_config::ParserConfig;
use cuesync::errors::TimelineError;
use cuesync::subtitle_processor::{Position, SubtitleEntry, Timeline, WordTiming};
use crate::common::{self, assert_close, assert_same_timing, TWO_BLOCK_SRT};

/// Two well-formed blocks
#[test]
fn test_parse_withTwoBlocks_shouldProduceTwoEntries() {
    let timeline = Timeline::parse_srt_string(TWO_BLOCK_SRT);

    assert_eq!(timeline.len(), 2);
    let first = &timeline.entries()[0];
    assert_eq!(first.start, 1.0);
    assert_eq!(first.end, 3.0);
    assert_eq!(first.text(), "Hello");
    let second = &timeline.entries()[1];
    assert_eq!(second.start, 3.5);
    assert_eq!(second.end, 6.0);
    assert_eq!(second.text(), "World");
}

/// A block without a timing line disappears
#[test]
fn test_parse_withBlockMissingTimingLine_shouldDropIt() {
    let content = format!("{}\n\n3\nnotatime\nStray", TWO_BLOCK_SRT);

    let report = Timeline::parse_srt_with_report(&content);

    assert_eq!(report.timeline.len(), 2);
    assert_eq!(report.dropped_blocks, 1);
    assert!(report.timeline.iter().all(|e| e.text() != "Stray"));
}

#[test]
fn test_parse_withoutIndexLines_shouldFallBackToOrdinal() {
    let content = "00:00:01,000 --> 00:00:02,000\nFirst\n\n00:00:03,000 --> 00:00:04,000\nSecond";

    let timeline = Timeline::parse_srt_string(content);

    assert_eq!(timeline.len(), 2);
    assert_eq!(timeline.entries()[0].seq_num, 1);
    assert_eq!(timeline.entries()[1].seq_num, 2);
}

#[test]
fn test_parse_withNonNumericIndex_shouldFallBackToOrdinal() {
    let content = "intro\n00:00:01,000 --> 00:00:02,000\nFirst";

    let timeline = Timeline::parse_srt_string(content);

    assert_eq!(timeline.entries()[0].seq_num, 1);
    assert_eq!(timeline.entries()[0].text(), "First");
}

#[test]
fn test_parse_withMultilineText_shouldKeepLines() {
    let content = "1\n00:00:01,000 --> 00:00:02,000\nHello\nWorld\n";

    let timeline = Timeline::parse_srt_string(content);

    assert_eq!(timeline.entries()[0].lines, vec!["Hello", "World"]);
    assert_eq!(timeline.entries()[0].text(), "Hello\nWorld");
}

#[test]
fn test_parse_withCrlfBomAndExtraBlankLines_shouldNormalize() {
    let content = "\u{feff}1\r\n00:00:01,000 --> 00:00:02,000\r\nHello  \r\n\r\n\r\n\r\n2\r\n00:00:02.500 --> 00:00:04.000\r\nWorld\r\n";

    let timeline = Timeline::parse_srt_string(content);

    assert_eq!(timeline.len(), 2);
    assert_eq!(timeline.entries()[0].text(), "Hello");
    assert_eq!(timeline.entries()[1].start, 2.5);
}

#[test]
fn test_parse_withMissingBlankLineBetweenBlocks_shouldStripStrayIndex() {
    let content = "1\n00:00:01,000 --> 00:00:02,000\nHello\n2\n00:00:03,000 --> 00:00:04,000\nWorld";

    let report = Timeline::parse_srt_with_report(content);

    assert_eq!(report.timeline.len(), 2);
    assert_eq!(report.timeline.entries()[0].text(), "Hello");
    assert_eq!(report.timeline.entries()[1].text(), "World");
    assert_eq!(report.timeline.entries()[1].seq_num, 2);
    assert_eq!(report.stray_numerals, 1);
}

#[test]
fn test_parse_withTrailingNextIndex_shouldStripIt() {
    // Streaming parse cut off right after the next block's index
    let content = "4\n00:00:01,000 --> 00:00:02,000\nHello\n5";

    let report = Timeline::parse_srt_with_report(content);

    assert_eq!(report.timeline.entries()[0].text(), "Hello");
    assert_eq!(report.stray_numerals, 1);
}

#[test]
fn test_parse_withNumeralBeforeUnindexedBlock_shouldStripIt() {
    let content = "1\n00:00:01,000 --> 00:00:02,000\nHello\n2\n\n00:00:03,000 --> 00:00:04,000\nWorld\n";

    let report = Timeline::parse_srt_with_report(content);

    assert_eq!(report.timeline.entries()[0].text(), "Hello");
    assert_eq!(report.timeline.entries()[1].text(), "World");
    assert_eq!(report.stray_numerals, 1);
}

#[test]
fn test_parse_withNumeralBeforeIndexedBlock_shouldKeepIt() {
    let content = "1\n00:00:01,000 --> 00:00:02,000\nCountdown\n2\n\n2\n00:00:03,000 --> 00:00:04,000\nWorld\n";

    let report = Timeline::parse_srt_with_report(content);

    assert_eq!(report.timeline.entries()[0].lines, vec!["Countdown", "2"]);
    assert_eq!(report.stray_numerals, 0);
}

#[test]
fn test_parse_withUnrelatedTrailingNumber_shouldKeepIt() {
    let content = "4\n00:00:01,000 --> 00:00:02,000\nCount to\n10";

    let timeline = Timeline::parse_srt_string(content);

    assert_eq!(timeline.entries()[0].lines, vec!["Count to", "10"]);
}

#[test]
fn test_parse_withBadTimestamp_shouldFallBackToZero() {
    let content = "1\nxx:yy --> 00:00:02,000\nHello";

    let timeline = Timeline::parse_srt_string(content);

    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline.entries()[0].start, 0.0);
    assert_eq!(timeline.entries()[0].end, 2.0);
}

#[test]
fn test_parseWithConfig_withStrictTimecodes_shouldFail() {
    let content = "1\nxx:yy --> 00:00:02,000\nHello";
    let config = ParserConfig { strict_timecodes: true };

    let result = Timeline::parse_srt_with_config(content, &config);

    assert!(matches!(result, Err(TimelineError::InvalidTimecode(_))));
}

#[test]
fn test_parse_shouldKeepBlockOrder() {
    let content = "1\n00:00:05,000 --> 00:00:06,000\nLater\n\n2\n00:00:01,000 --> 00:00:02,000\nEarlier";

    let timeline = Timeline::parse_srt_string(content);

    assert_eq!(timeline.entries()[0].text(), "Later");
    assert!(!timeline.is_chronological());
}

#[test]
fn test_parse_withEmptyInput_shouldReturnEmptyTimeline() {
    assert!(Timeline::parse_srt_string("").is_empty());
    assert!(Timeline::parse_srt_string("\n\n  \n").is_empty());
}

#[test]
fn test_serialize_shouldRenumberAndJoinWithOneBlankLine() {
    let timeline = Timeline::from_entries(vec![
        SubtitleEntry::from_text(7, 1.0, 3.0, "Hello").unwrap(),
        SubtitleEntry::from_text(42, 3.5, 6.0, "World\nAgain").unwrap(),
    ]);

    let srt = timeline.to_srt_string();

    assert_eq!(
        srt,
        "1\n00:00:01,000 --> 00:00:03,000\nHello\n\n2\n00:00:03,500 --> 00:00:06,000\nWorld\nAgain\n"
    );
}

#[test]
fn test_serialize_withEmptyTimeline_shouldBeEmpty() {
    assert_eq!(Timeline::new().to_srt_string(), "");
}

#[test]
fn test_roundTrip_shouldPreserveSpansAndText() {
    let original = common::timeline_of(&[
        (0.0, 1.234, "Zero start"),
        (1.5, 2.75, "Two\nlines"),
        (3600.001, 3601.999, "An hour in"),
    ]);

    let reparsed = Timeline::parse_srt_string(&original.to_srt_string());

    assert_same_timing(&reparsed, &original);
}

#[test]
fn test_roundTrip_withNumericCaptionLines_shouldKeepThem() {
    let timelines = [
        common::timeline_of(&[(1.0, 2.0, "2"), (3.0, 4.0, "World")]),
        common::timeline_of(&[(1.0, 2.0, "Countdown\n2"), (3.0, 4.0, "World")]),
        common::timeline_of(&[(1.0, 2.0, "Hello"), (3.0, 4.0, "Countdown\n3")]),
    ];

    for original in &timelines {
        let reparsed = Timeline::parse_srt_string(&original.to_srt_string());
        assert_same_timing(&reparsed, original);
    }
}

#[test]
fn test_roundTrip_withIndentedLine_shouldKeepLeadingWhitespace() {
    let original = common::timeline_of(&[(1.0, 2.0, "Speaker:\n    indented reply")]);

    let reparsed = Timeline::parse_srt_string(&original.to_srt_string());

    assert_eq!(reparsed.entries()[0].lines, vec!["Speaker:", "    indented reply"]);
}

#[test]
fn test_roundTrip_shouldRoundToMilliseconds() {
    let original = common::timeline_of(&[(1.00049, 2.9996, "Rounded")]);

    let reparsed = Timeline::parse_srt_string(&original.to_srt_string());

    assert_close(reparsed.entries()[0].start, 1.0);
    assert_close(reparsed.entries()[0].end, 3.0);
}

#[test]
fn test_entryDisplay_shouldFormatBlock() {
    let entry = SubtitleEntry::from_text(3, 61.234, 65.432, "Hello").unwrap();

    assert_eq!(format!("{}", entry), "3\n00:01:01,234 --> 00:01:05,432\nHello");
}

#[test]
fn test_newEntry_withInvalidSpan_shouldFail() {
    assert!(matches!(
        SubtitleEntry::from_text(1, 2.0, 2.0, "x"),
        Err(TimelineError::InvalidEntry(_))
    ));
    assert!(SubtitleEntry::from_text(1, -1.0, 2.0, "x").is_err());
    assert!(SubtitleEntry::from_text(1, 0.0, f64::NAN, "x").is_err());
}

#[test]
fn test_withWords_withWordOutsideSpan_shouldFail() {
    let entry = SubtitleEntry::from_text(1, 1.0, 2.0, "a b").unwrap();

    let result = entry.with_words(vec![WordTiming::new("a", 1.0, 1.5), WordTiming::new("b", 1.5, 2.5)]);

    assert!(result.is_err());
}

#[test]
fn test_position_shouldClampToPercentRange() {
    let position = Position::new(-5.0, 140.0);
    assert_eq!(position, Position { x: 0.0, y: 100.0 });
}

#[test]
fn test_fileRoundTrip_shouldWriteAndReadBack() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("nested").join("out.srt");
    let original = common::sample_timeline();

    original.write_to_srt(&path)?;
    let loaded = Timeline::from_srt_file(&path)?;

    assert_same_timing(&loaded, &original);
    Ok(())
}

#[test]
fn test_fromSrtFile_withExistingFile_shouldParse() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "in.srt", TWO_BLOCK_SRT)?;

    let timeline = Timeline::from_srt_file(&path)?;

    assert_eq!(timeline.len(), 2);
    Ok(())
}

#[test]
fn test_fromSrtFile_withMissingFile_shouldFail() {
    assert!(Timeline::from_srt_file("/definitely/not/here.srt").is_err());
}
