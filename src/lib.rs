/*!
 * # cuesync - Subtitle timeline engine for captioning and dubbing editors
 *
 * A Rust library that keeps timed captions consistent while a human edits them
 * and while the footage underneath them changes.
 *
 * ## Features
 *
 * - Parse and serialize SRT-style interchange text, tolerating partial files
 * - Ripple, end-time, text and position edits on a timeline
 * - Uniform time-stretch of a whole timeline when a voice-over changes the duration
 * - Active caption and word lookup for playback, with an optional grace window
 * - Editing sessions that discard stale responses from external services
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `timecode`: Timestamp <-> seconds codec
 * - `subtitle_processor`: Entry and timeline model, interchange text parser and serializer
 * - `timeline`: Timeline operations:
 *   - `timeline::editor`: Ripple shift and single-entry edits
 *   - `timeline::sync`: Duration synchronization
 *   - `timeline::lookup`: Active entry and word lookup
 * - `session`: Editing session, generation tokens and collaborator contracts
 * - `burn_in`: Style directive for the transcoding tool
 * - `validation`: Timeline integrity checks
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the library
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod burn_in;
pub mod errors;
pub mod file_utils;
pub mod session;
pub mod subtitle_processor;
pub mod timecode;
pub mod timeline;
pub mod validation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, CollaboratorError, SessionError, TimelineError};
pub use session::{EditingSession, SharedSession};
pub use subtitle_processor::{Position, SubtitleEntry, Timeline, WordTiming};
pub use timecode::{format_timecode, parse_timecode};
pub use timeline::{active_entry, active_word, ripple_shift, synchronize};
