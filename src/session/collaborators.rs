/*!
 * Contracts for the external services an editing session talks to.
 *
 * The engine treats all of them as black boxes:
 * - `SubtitleSource`: transcription, returns interchange text for media bytes
 * - `SubtitleTranslator`: translation, returns interchange text for interchange text
 * - `SpeechSynthesizer`: text-to-speech, returns raw audio bytes
 * - `DurationProbe`: measures the playback duration of audio bytes
 * - `BurnInRenderer`: the transcoding tool that burns captions into media
 */

use async_trait::async_trait;
use bytes::Bytes;

use crate::burn_in::BurnInStyle;
use crate::errors::CollaboratorError;

/// Produces interchange text for a piece of media
#[async_trait]
pub trait SubtitleSource: Send + Sync {
    /// Transcribe `media` into interchange text
    async fn transcribe(&self, media: Bytes) -> Result<String, CollaboratorError>;
}

/// Translates interchange text into another language
#[async_trait]
pub trait SubtitleTranslator: Send + Sync {
    /// Translate `srt` into `target_language`, keeping the block structure
    async fn translate(&self, srt: &str, target_language: &str) -> Result<String, CollaboratorError>;
}

/// Generates a voice-over for a script
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `script` into raw audio bytes
    async fn synthesize(&self, script: &str) -> Result<Bytes, CollaboratorError>;
}

/// Measures how long a piece of audio plays for
#[async_trait]
pub trait DurationProbe: Send + Sync {
    /// Playback duration of `audio` in seconds
    async fn measure(&self, audio: &Bytes) -> Result<f64, CollaboratorError>;
}

/// Burns captions into media
#[async_trait]
pub trait BurnInRenderer: Send + Sync {
    /// Render `srt` onto `media` with `style`, returning the transformed media
    async fn burn_in(&self, media: Bytes, srt: String, style: BurnInStyle) -> Result<Bytes, CollaboratorError>;
}
