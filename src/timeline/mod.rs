/*!
 * Timeline operations.
 *
 * This module provides:
 * - Ripple, end-time, text and position edits (`editor`)
 * - Uniform time-stretch synchronization (`sync`)
 * - Active entry and word lookup for playback (`lookup`)
 */

pub mod editor;
pub mod lookup;
pub mod sync;

// Re-export main types
pub use editor::{merge_with_next, rippled, ripple_shift, set_end, set_position, set_text, split_entry};
pub use lookup::{active_entry, active_word, ActiveLookup, LookupIndex, DEFAULT_PLAYBACK_GRACE_SECS};
pub use sync::{stretch_ratio, synchronize, synchronize_in_place};
