/*!
 * Session management module for interactive editing.
 *
 * This module provides:
 * - The editing session that exclusively owns a timeline
 * - Generation tokens that keep stale collaborator responses out
 * - Contracts for the external collaborators a session orchestrates
 */

pub mod collaborators;
pub mod manager;
pub mod models;

// Re-export main types
pub use collaborators::{BurnInRenderer, DurationProbe, SpeechSynthesizer, SubtitleSource, SubtitleTranslator};
pub use manager::{EditingSession, SharedSession};
pub use models::{FootageRef, RequestToken, SessionInfo};
