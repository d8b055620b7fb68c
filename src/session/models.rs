/*!
 * Session-specific models.
 *
 * These structures describe what an editing session tracks besides its timeline:
 * the footage the captions are timed against and the tokens attached to
 * outstanding collaborator requests.
 */

use serde::{Deserialize, Serialize};

/// Generation token attached to an outgoing collaborator request
///
/// A response may only be applied while the session is still at the generation its
/// request was issued under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestToken(pub(crate) u64);

impl RequestToken {
    /// The session generation this token was issued for
    pub fn generation(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RequestToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Reference to the footage a timeline is timed against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootageRef {
    /// Opaque identifier understood by the player and transcoder
    pub media_id: String,
    /// Effective duration in seconds
    pub duration: f64,
}

impl FootageRef {
    pub fn new(media_id: impl Into<String>, duration: f64) -> Self {
        Self {
            media_id: media_id.into(),
            duration,
        }
    }
}

/// Read-only view of a session for display and tracking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Session ID
    pub id: String,
    /// Active footage, if any
    pub footage: Option<FootageRef>,
    /// Number of entries in the timeline
    pub entry_count: usize,
    /// Current request generation
    pub generation: u64,
    /// Number of timeline replacements so far
    pub revision: u64,
}

impl std::fmt::Display for SessionInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let media = self
            .footage
            .as_ref()
            .map(|f| format!("{} ({:.2}s)", f.media_id, f.duration))
            .unwrap_or_else(|| "no footage".to_string());
        write!(
            f,
            "[{}] {}, {} entries, generation {}, revision {}",
            &self.id[..8.min(self.id.len())],
            media,
            self.entry_count,
            self.generation,
            self.revision
        )
    }
}
