/*!
 * Tests for ripple shift and single-entry edits
 */

use cuesync::errors::TimelineError;
use cuesync::subtitle_processor::{Position, SubtitleEntry, Timeline, WordTiming};
use cuesync::timeline::{merge_with_next, ripple_shift, rippled, set_end, set_position, set_text, split_entry};
use crate::common::{self, assert_close, TWO_BLOCK_SRT};

/// Moving the first entry by one second moves everything after it
#[test]
fn test_rippleShift_onFirstEntry_shouldShiftWholeTimeline() {
    let mut timeline = Timeline::parse_srt_string(TWO_BLOCK_SRT);

    ripple_shift(&mut timeline, 0, 2.0).unwrap();

    let spans: Vec<(f64, f64)> = timeline.iter().map(|e| (e.start, e.end)).collect();
    assert_eq!(spans, vec![(2.0, 4.0), (4.5, 7.0)]);
}

#[test]
fn test_rippleShift_inMiddle_shouldLeaveEarlierEntriesAlone() {
    let original = common::sample_timeline();
    let mut timeline = original.clone();

    ripple_shift(&mut timeline, 1, 5.75).unwrap();

    assert_eq!(timeline.entries()[0], original.entries()[0]);
    for j in 1..timeline.len() {
        assert_close(timeline.entries()[j].start - original.entries()[j].start, 0.75);
        assert_close(timeline.entries()[j].end - original.entries()[j].end, 0.75);
    }
}

#[test]
fn test_rippleShift_backwardsPastZero_shouldClampEachBoundIndependently() {
    let mut timeline = common::timeline_of(&[(1.0, 2.0, "a"), (3.0, 5.0, "b")]);

    // delta = -2.5: first entry would become [-1.5, -0.5], second [0.5, 2.5]
    ripple_shift(&mut timeline, 0, -1.5).unwrap();

    let first = &timeline.entries()[0];
    assert_eq!(first.start, 0.0);
    assert_eq!(first.end, 0.0);
    assert_close(timeline.entries()[1].start, 0.5);
    assert_close(timeline.entries()[1].end, 2.5);
}

#[test]
fn test_rippleShift_withPartialClamp_shouldShortenEntry() {
    let mut timeline = common::timeline_of(&[(1.0, 3.0, "a")]);

    ripple_shift(&mut timeline, 0, -0.5).unwrap();

    // Start clamps to 0 while end keeps the full delta
    assert_eq!(timeline.entries()[0].start, 0.0);
    assert_close(timeline.entries()[0].end, 1.5);
}

#[test]
fn test_rippleShift_withNan_shouldBeNoOp() {
    let original = common::sample_timeline();
    let mut timeline = original.clone();

    ripple_shift(&mut timeline, 1, f64::NAN).unwrap();

    assert_eq!(timeline, original);
}

#[test]
fn test_rippleShift_withBadIndex_shouldFail() {
    let mut timeline = common::sample_timeline();

    let result = ripple_shift(&mut timeline, 3, 1.0);

    assert_eq!(result, Err(TimelineError::IndexOutOfRange { index: 3, len: 3 }));
}

#[test]
fn test_rippleShift_shouldCarryPositionAndWords() {
    let entry = SubtitleEntry::from_text(1, 1.0, 2.0, "hi there")
        .unwrap()
        .with_position(Position::new(50.0, 90.0))
        .with_words(vec![WordTiming::new("hi", 1.0, 1.4), WordTiming::new("there", 1.4, 2.0)])
        .unwrap();
    let mut timeline = Timeline::from_entries(vec![entry]);

    ripple_shift(&mut timeline, 0, 3.0).unwrap();

    let entry = &timeline.entries()[0];
    assert_eq!(entry.position, Some(Position::new(50.0, 90.0)));
    let words = entry.words.as_ref().unwrap();
    assert_close(words[0].start, 3.0);
    assert_close(words[1].end, 4.0);
}

#[test]
fn test_rippled_shouldMatchInPlaceShift() {
    let original = common::sample_timeline();
    let mut in_place = original.clone();

    ripple_shift(&mut in_place, 1, 2.0).unwrap();
    let rebuilt = rippled(&original, 1, 2.0).unwrap();

    assert_eq!(rebuilt, in_place);
}

#[test]
fn test_setEnd_shouldOnlyTouchThatEntry() {
    let original = common::sample_timeline();
    let mut timeline = original.clone();

    set_end(&mut timeline, 0, 4.5).unwrap();

    assert_eq!(timeline.entries()[0].end, 4.5);
    assert_eq!(timeline.entries()[0].start, original.entries()[0].start);
    assert_eq!(timeline.entries()[1..], original.entries()[1..]);
}

#[test]
fn test_setEnd_beforeStart_shouldBeAccepted() {
    let mut timeline = common::sample_timeline();

    set_end(&mut timeline, 1, 2.0).unwrap();

    assert_eq!(timeline.entries()[1].end, 2.0);
    assert!(timeline.entries()[1].duration() < 0.0);
}

#[test]
fn test_setEnd_withNan_shouldBeNoOp() {
    let original = common::sample_timeline();
    let mut timeline = original.clone();

    set_end(&mut timeline, 0, f64::NAN).unwrap();

    assert_eq!(timeline, original);
}

#[test]
fn test_setText_shouldReplaceTextOnly() {
    let original = common::sample_timeline();
    let mut timeline = original.clone();

    set_text(&mut timeline, 2, "Edited\ntwice").unwrap();

    let entry = &timeline.entries()[2];
    assert_eq!(entry.lines, vec!["Edited", "twice"]);
    assert_eq!(entry.start, original.entries()[2].start);
    assert_eq!(entry.end, original.entries()[2].end);
}

#[test]
fn test_setPosition_shouldSetAndClear() {
    let mut timeline = common::sample_timeline();

    set_position(&mut timeline, 0, Some(Position::new(10.0, 20.0))).unwrap();
    assert_eq!(timeline.entries()[0].position, Some(Position::new(10.0, 20.0)));

    set_position(&mut timeline, 0, None).unwrap();
    assert_eq!(timeline.entries()[0].position, None);
}

#[test]
fn test_splitEntry_withoutWords_shouldDivideTokens() {
    let mut timeline = common::timeline_of(&[(0.0, 4.0, "one two three four")]);

    split_entry(&mut timeline, 0, 2.0).unwrap();

    assert_eq!(timeline.len(), 2);
    assert_eq!(timeline.entries()[0].text(), "one two");
    assert_eq!((timeline.entries()[0].start, timeline.entries()[0].end), (0.0, 2.0));
    assert_eq!(timeline.entries()[1].text(), "three four");
    assert_eq!((timeline.entries()[1].start, timeline.entries()[1].end), (2.0, 4.0));
}

#[test]
fn test_splitEntry_withWords_shouldPartitionWords() {
    let entry = SubtitleEntry::from_text(1, 0.0, 3.0, "a b c")
        .unwrap()
        .with_words(vec![
            WordTiming::new("a", 0.0, 1.0),
            WordTiming::new("b", 1.0, 2.2),
            WordTiming::new("c", 2.2, 3.0),
        ])
        .unwrap();
    let mut timeline = Timeline::from_entries(vec![entry]);

    split_entry(&mut timeline, 0, 2.0).unwrap();

    assert_eq!(timeline.entries()[0].text(), "a b");
    assert_eq!(timeline.entries()[0].words.as_ref().unwrap()[1].end, 2.0);
    assert_eq!(timeline.entries()[1].text(), "c");
}

#[test]
fn test_splitEntry_outsideSpan_shouldFail() {
    let mut timeline = common::timeline_of(&[(1.0, 2.0, "x")]);

    assert!(matches!(split_entry(&mut timeline, 0, 2.0), Err(TimelineError::InvalidEntry(_))));
    assert!(split_entry(&mut timeline, 0, 0.5).is_err());
    assert_eq!(timeline.len(), 1);
}

#[test]
fn test_mergeWithNext_shouldSpanBothEntries() {
    let mut timeline = common::sample_timeline();

    merge_with_next(&mut timeline, 0).unwrap();

    assert_eq!(timeline.len(), 2);
    let merged = &timeline.entries()[0];
    assert_eq!((merged.start, merged.end), (1.0, 9.0));
    assert_eq!(merged.text(), "This is a test subtitle.\nIt contains multiple entries.");
}

#[test]
fn test_mergeWithNext_onLastEntry_shouldFail() {
    let mut timeline = common::sample_timeline();

    let result = merge_with_next(&mut timeline, 2);

    assert_eq!(result, Err(TimelineError::IndexOutOfRange { index: 3, len: 3 }));
    assert_eq!(timeline.len(), 3);
}
