/*!
 * Validation module for timeline integrity.
 *
 * - `timecodes`: Validates timing data integrity (spans, word nesting, order, overlaps)
 */

pub mod timecodes;

// Re-export main types
pub use timecodes::{TimecodeIssue, TimecodeValidationResult, TimecodeValidator, TimecodeValidatorConfig};
