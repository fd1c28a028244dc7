/// Recording backend
///
/// Handles that produce no sound and remember every call made on them.
/// Used for silent runs (no audio device) and throughout the tests.
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use super::source::{AssetProvider, PendingPlayback, PlayRequest, PlaybackResolver, SoundHandle};
use crate::error::AudioError;

/// Calls across every handle of one provider, in the order they were made.
type CallLog = Arc<Mutex<Vec<(String, HandleCall)>>>;

/// A single call observed on a recording handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HandleCall {
    Pause,
    Rewind,
    Play,
    Volume(f32),
    Muted(bool),
}

/// How a recording handle answers `play`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayBehavior {
    Start,
    Defer,
    Refuse,
}

#[derive(Debug)]
struct RecordingState {
    calls: Vec<HandleCall>,
    volume: f32,
    muted: bool,
    playing: bool,
    ended: bool,
    behavior: PlayBehavior,
}

/// Inspection side of a `RecordingHandle`, kept by whoever created it.
#[derive(Debug, Clone)]
pub struct HandleProbe {
    state: Arc<Mutex<RecordingState>>,
    resolvers: Arc<Mutex<Vec<PlaybackResolver>>>,
}

/// Sound handle that records calls instead of producing audio.
pub struct RecordingHandle {
    name: String,
    state: Arc<Mutex<RecordingState>>,
    resolvers: Arc<Mutex<Vec<PlaybackResolver>>>,
    log: Option<CallLog>,
}

impl RecordingHandle {
    pub fn new(name: impl Into<String>) -> (Self, HandleProbe) {
        Self::with_behavior(name, PlayBehavior::Start)
    }

    pub fn with_behavior(name: impl Into<String>, behavior: PlayBehavior) -> (Self, HandleProbe) {
        Self::build(name.into(), behavior, None)
    }

    fn build(name: String, behavior: PlayBehavior, log: Option<CallLog>) -> (Self, HandleProbe) {
        let state = Arc::new(Mutex::new(RecordingState {
            calls: Vec::new(),
            volume: 1.0,
            muted: false,
            playing: false,
            ended: false,
            behavior,
        }));
        let resolvers = Arc::new(Mutex::new(Vec::new()));
        let probe = HandleProbe {
            state: Arc::clone(&state),
            resolvers: Arc::clone(&resolvers),
        };
        (
            Self {
                name,
                state,
                resolvers,
                log,
            },
            probe,
        )
    }

    fn record(&self, state: &mut RecordingState, call: HandleCall) {
        state.calls.push(call);
        if let Some(log) = &self.log {
            log.lock().push((self.name.clone(), call));
        }
    }
}

impl SoundHandle for RecordingHandle {
    fn pause(&mut self) {
        let mut state = self.state.lock();
        self.record(&mut state, HandleCall::Pause);
        state.playing = false;
    }

    fn rewind(&mut self) {
        let mut state = self.state.lock();
        self.record(&mut state, HandleCall::Rewind);
        state.ended = false;
    }

    fn play(&mut self) -> PlayRequest {
        let mut state = self.state.lock();
        self.record(&mut state, HandleCall::Play);
        match state.behavior {
            PlayBehavior::Start => {
                state.playing = true;
                PlayRequest::Started
            }
            PlayBehavior::Defer => {
                state.playing = true;
                let (resolver, pending) = PendingPlayback::channel(self.name.as_str());
                self.resolvers.lock().push(resolver);
                PlayRequest::Pending(pending)
            }
            PlayBehavior::Refuse => {
                PlayRequest::Rejected(AudioError::rejected(&self.name, "playback refused"))
            }
        }
    }

    fn set_volume(&mut self, volume: f32) {
        let mut state = self.state.lock();
        self.record(&mut state, HandleCall::Volume(volume));
        state.volume = volume;
    }

    fn set_muted(&mut self, muted: bool) {
        let mut state = self.state.lock();
        self.record(&mut state, HandleCall::Muted(muted));
        state.muted = muted;
    }

    fn has_ended(&self) -> bool {
        self.state.lock().ended
    }
}

impl HandleProbe {
    pub fn calls(&self) -> Vec<HandleCall> {
        self.state.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    pub fn play_count(&self) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| **c == HandleCall::Play)
            .count()
    }

    pub fn volume(&self) -> f32 {
        self.state.lock().volume
    }

    pub fn is_muted(&self) -> bool {
        self.state.lock().muted
    }

    pub fn is_playing(&self) -> bool {
        self.state.lock().playing
    }

    /// Simulate the resource reaching its natural end.
    pub fn finish(&self) {
        let mut state = self.state.lock();
        state.playing = false;
        state.ended = true;
    }

    /// Answer the oldest deferred play request.
    pub fn resolve_next(&self, result: Result<(), AudioError>) -> bool {
        let mut resolvers = self.resolvers.lock();
        if resolvers.is_empty() {
            return false;
        }
        let resolver = resolvers.remove(0);
        drop(resolvers);

        if result.is_err() {
            self.state.lock().playing = false;
        }
        resolver.resolve(result);
        true
    }
}

/// Provider that hands out recording handles for a fixed set of assets.
#[derive(Default)]
pub struct RecordingProvider {
    available: Mutex<HashMap<String, PlayBehavior>>,
    probes: Mutex<HashMap<String, HandleProbe>>,
    log: CallLog,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `asset_id` locatable.
    pub fn with_asset(self, asset_id: impl Into<String>) -> Self {
        self.with_asset_behavior(asset_id, PlayBehavior::Start)
    }

    pub fn with_asset_behavior(self, asset_id: impl Into<String>, behavior: PlayBehavior) -> Self {
        self.available.lock().insert(asset_id.into(), behavior);
        self
    }

    /// Probe for a handle handed out earlier, by asset id.
    pub fn probe(&self, asset_id: &str) -> Option<HandleProbe> {
        self.probes.lock().get(asset_id).cloned()
    }

    /// Every call made on this provider's handles, as `(asset id, call)`.
    pub fn call_log(&self) -> Vec<(String, HandleCall)> {
        self.log.lock().clone()
    }

    pub fn clear_call_log(&self) {
        self.log.lock().clear();
    }
}

impl AssetProvider for RecordingProvider {
    fn locate(&self, asset_id: &str) -> Result<Box<dyn SoundHandle>, AudioError> {
        let behavior = self
            .available
            .lock()
            .get(asset_id)
            .copied()
            .ok_or_else(|| AudioError::MissingResource(asset_id.to_string()))?;

        let (handle, probe) = RecordingHandle::build(
            asset_id.to_string(),
            behavior,
            Some(Arc::clone(&self.log)),
        );
        self.probes.lock().insert(asset_id.to_string(), probe);
        Ok(Box::new(handle))
    }
}

/// Provider that locates any asset as a silent handle.
pub struct PermissiveProvider;

impl AssetProvider for PermissiveProvider {
    fn locate(&self, asset_id: &str) -> Result<Box<dyn SoundHandle>, AudioError> {
        let (handle, _probe) = RecordingHandle::new(asset_id);
        Ok(Box::new(handle))
    }
}
