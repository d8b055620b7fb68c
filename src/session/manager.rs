/*!
 * Editing session lifecycle.
 *
 * This module handles:
 * - Owning the single timeline of an editing session
 * - Tagging collaborator requests with generation tokens and dropping stale responses
 * - Applying edits and synchronization as atomic timeline replacements
 * - Orchestrating collaborator round-trips without holding the session lock across awaits
 */

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use log::{debug, info, warn};
use parking_lot::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::app_config::Config;
use crate::burn_in::BurnInStyle;
use crate::errors::{CollaboratorError, SessionError, TimelineError};
use crate::subtitle_processor::{Position, SubtitleEntry, Timeline, WordTiming};
use crate::timeline::{self, ActiveLookup};

use super::collaborators::{BurnInRenderer, DurationProbe, SpeechSynthesizer, SubtitleSource, SubtitleTranslator};
use super::models::{FootageRef, RequestToken, SessionInfo};

/// One interactive editing session: one timeline, one footage reference
#[derive(Debug, Clone)]
pub struct EditingSession {
    id: String,
    config: Config,
    timeline: Timeline,
    footage: Option<FootageRef>,
    generation: u64,
    revision: u64,
}

impl EditingSession {
    /// Create an empty session
    pub fn new(config: Config) -> Self {
        let id = Uuid::new_v4().to_string();
        debug!("Creating editing session {}", &id[..8]);
        Self {
            id,
            config,
            timeline: Timeline::new(),
            footage: None,
            generation: 0,
            revision: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn footage(&self) -> Option<&FootageRef> {
        self.footage.as_ref()
    }

    /// Current request generation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of times the timeline has been replaced
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            id: self.id.clone(),
            footage: self.footage.clone(),
            entry_count: self.timeline.len(),
            generation: self.generation,
            revision: self.revision,
        }
    }

    // =========================================================================
    // Footage and request generations
    // =========================================================================

    /// Switch to a new video: the timeline starts over empty and every request
    /// issued for the previous video becomes stale
    pub fn load_video(&mut self, footage: FootageRef) {
        info!("Loading {} ({:.2}s) into session {}", footage.media_id, footage.duration, &self.id[..8]);
        self.generation += 1;
        self.footage = Some(footage);
        self.replace_timeline(Timeline::new());
    }

    /// Issue a token for a new collaborator request, superseding all earlier ones
    pub fn begin_request(&mut self) -> RequestToken {
        self.generation += 1;
        RequestToken(self.generation)
    }

    /// Whether a response carrying `token` may still be applied
    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.generation
    }

    fn check_token(&self, token: RequestToken) -> Result<(), SessionError> {
        if !self.is_current(token) {
            warn!("Discarding stale response {} (session at #{})", token, self.generation);
            return Err(SessionError::StaleResponse {
                received: token.0,
                current: self.generation,
            });
        }
        Ok(())
    }

    fn replace_timeline(&mut self, timeline: Timeline) {
        self.timeline = timeline;
        self.revision += 1;
    }

    /// Replace the timeline with a collaborator's result
    pub fn apply_timeline(&mut self, token: RequestToken, timeline: Timeline) -> Result<(), SessionError> {
        self.check_token(token)?;
        debug!("Applying {} entries from response {}", timeline.len(), token);
        self.replace_timeline(timeline);
        Ok(())
    }

    /// Parse a collaborator's interchange text and replace the timeline with it
    ///
    /// Returns the number of entries applied.
    pub fn apply_srt(&mut self, token: RequestToken, srt: &str) -> Result<usize, SessionError> {
        self.check_token(token)?;
        let report = Timeline::parse_srt_with_config(srt, &self.config.parser)?;
        if report.dropped_blocks > 0 {
            debug!("Response {} had {} unusable blocks", token, report.dropped_blocks);
        }
        let count = report.timeline.len();
        self.replace_timeline(report.timeline);
        Ok(count)
    }

    /// Switch to replacement footage, stretching the timeline to its duration
    ///
    /// Timeline and footage change together or not at all.
    pub fn apply_footage(&mut self, token: RequestToken, footage: FootageRef) -> Result<(), SessionError> {
        self.check_token(token)?;
        self.retime_to_footage(footage)
    }

    /// Switch to replacement footage immediately, without a request round-trip
    pub fn retime_to_footage(&mut self, footage: FootageRef) -> Result<(), SessionError> {
        let current = self.footage.as_ref().ok_or(SessionError::NoFootage)?;
        let synced = timeline::synchronize(&self.timeline, current.duration, footage.duration)?;
        info!(
            "Retimed session {} from {} to {}",
            &self.id[..8],
            current.media_id,
            footage.media_id
        );
        self.footage = Some(footage);
        self.replace_timeline(synced);
        Ok(())
    }

    // =========================================================================
    // Edits
    // =========================================================================

    /// Run an edit against a copy of the timeline and swap it in on success
    pub fn edit<F>(&mut self, f: F) -> Result<(), SessionError>
    where
        F: FnOnce(&mut Timeline) -> Result<(), TimelineError>,
    {
        let mut next = self.timeline.clone();
        f(&mut next)?;
        self.replace_timeline(next);
        Ok(())
    }

    pub fn ripple_shift(&mut self, index: usize, new_start: f64) -> Result<(), SessionError> {
        let next = timeline::rippled(&self.timeline, index, new_start)?;
        self.replace_timeline(next);
        Ok(())
    }

    pub fn set_end(&mut self, index: usize, new_end: f64) -> Result<(), SessionError> {
        self.edit(|tl| timeline::set_end(tl, index, new_end))
    }

    pub fn set_text(&mut self, index: usize, new_text: &str) -> Result<(), SessionError> {
        self.edit(|tl| timeline::set_text(tl, index, new_text))
    }

    pub fn set_position(&mut self, index: usize, position: Option<Position>) -> Result<(), SessionError> {
        self.edit(|tl| timeline::set_position(tl, index, position))
    }

    // =========================================================================
    // Read side
    // =========================================================================

    /// Interchange text for export or for a later collaborator call
    pub fn export_srt(&self) -> String {
        self.timeline.to_srt_string()
    }

    /// Plain script of the timeline, one entry per line
    pub fn script(&self) -> String {
        self.timeline
            .iter()
            .map(|e| e.lines.join(" "))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn active_entry(&self, t: f64) -> Option<&SubtitleEntry> {
        ActiveLookup::from_config(&self.config.lookup).active_entry(&self.timeline, t)
    }

    pub fn active_word(&self, t: f64) -> Option<&WordTiming> {
        self.active_entry(t)
            .and_then(|entry| timeline::active_word(entry, t))
    }
}

impl Default for EditingSession {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Session handle shared between the UI thread and in-flight collaborator calls
#[derive(Debug, Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<EditingSession>>,
}

impl SharedSession {
    pub fn new(session: EditingSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Lock the session for synchronous work; never hold the guard across an await
    pub fn lock(&self) -> MutexGuard<'_, EditingSession> {
        self.inner.lock()
    }

    pub fn info(&self) -> SessionInfo {
        self.inner.lock().info()
    }

    /// Copy of the current timeline
    pub fn snapshot(&self) -> Timeline {
        self.inner.lock().timeline().clone()
    }

    /// Await a collaborator call, giving up after the configured timeout
    async fn call<T, F>(&self, request: F) -> Result<T, CollaboratorError>
    where
        F: Future<Output = Result<T, CollaboratorError>>,
    {
        let secs = self.inner.lock().config().collaborators.timeout_secs;
        match tokio::time::timeout(Duration::from_secs(secs), request).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Collaborator call timed out after {}s", secs);
                Err(CollaboratorError::TimedOut(secs))
            }
        }
    }

    /// Transcribe media and replace the timeline with the result
    pub async fn transcribe<S>(&self, source: &S, media: Bytes) -> Result<usize, SessionError>
    where
        S: SubtitleSource + ?Sized,
    {
        let token = self.inner.lock().begin_request();
        let srt = self.call(source.transcribe(media)).await?;
        self.inner.lock().apply_srt(token, &srt)
    }

    /// Translate the current timeline and replace it with the result
    pub async fn translate<T>(&self, translator: &T, target_language: &str) -> Result<usize, SessionError>
    where
        T: SubtitleTranslator + ?Sized,
    {
        let (token, srt) = {
            let mut session = self.inner.lock();
            (session.begin_request(), session.export_srt())
        };
        let translated = self.call(translator.translate(&srt, target_language)).await?;
        self.inner.lock().apply_srt(token, &translated)
    }

    /// Generate a voice-over for the current script and stretch the timeline to it
    ///
    /// Returns the generated audio. If synthesis or measuring fails, timeline and
    /// footage stay as they were.
    pub async fn redub<T, P>(&self, synthesizer: &T, probe: &P) -> Result<Bytes, SessionError>
    where
        T: SpeechSynthesizer + ?Sized,
        P: DurationProbe + ?Sized,
    {
        let (token, script, media_id) = {
            let mut session = self.inner.lock();
            let media_id = session
                .footage()
                .map(|f| f.media_id.clone())
                .ok_or(SessionError::NoFootage)?;
            (session.begin_request(), session.script(), media_id)
        };

        let audio = self.call(synthesizer.synthesize(&script)).await?;
        let duration = self.call(probe.measure(&audio)).await?;
        debug!("Voice-over for request {} measured {:.3}s", token, duration);

        let footage = FootageRef::new(format!("{}-dub{}", media_id, token.generation()), duration);
        self.inner.lock().apply_footage(token, footage)?;
        Ok(audio)
    }

    /// Burn the current timeline into `media`
    pub async fn export_burn_in<R>(&self, renderer: &R, media: Bytes, video_height: u32) -> Result<Bytes, SessionError>
    where
        R: BurnInRenderer + ?Sized,
    {
        let (srt, style) = {
            let session = self.inner.lock();
            let style = BurnInStyle::for_timeline(session.timeline(), video_height, &session.config().burn_in);
            (session.export_srt(), style)
        };
        debug!("Burning in captions with style {}", style);
        Ok(self.call(renderer.burn_in(media, srt, style)).await?)
    }
}

impl From<EditingSession> for SharedSession {
    fn from(session: EditingSession) -> Self {
        Self::new(session)
    }
}
