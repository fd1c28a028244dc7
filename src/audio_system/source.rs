/// Playable handle abstraction
///
/// The controller never talks to an audio device directly. It drives
/// `SoundHandle`s handed out by an `AssetProvider`, which keeps the core
/// independent of the media backend (rodio in production, recording
/// handles in tests and silent runs).
use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};

use crate::error::AudioError;

/// A pre-loaded, individually controllable audio resource.
///
/// Handles are driven from a single logical task and need not be `Send`.
pub trait SoundHandle {
    /// Pause playback, keeping the current position.
    fn pause(&mut self);

    /// Move the play position back to the start.
    fn rewind(&mut self);

    /// Request playback from the current position.
    fn play(&mut self) -> PlayRequest;

    /// Set the output volume (0.0-1.0).
    fn set_volume(&mut self, volume: f32);

    /// Mute or unmute without losing the volume setting.
    fn set_muted(&mut self, muted: bool);

    /// True once a started playback has run to its natural end.
    fn has_ended(&self) -> bool;
}

/// Source of playable handles, queried once per logical name at startup.
pub trait AssetProvider {
    fn locate(&self, asset_id: &str) -> Result<Box<dyn SoundHandle>, AudioError>;
}

/// Outcome of `SoundHandle::play`.
pub enum PlayRequest {
    /// Playback began immediately.
    Started,

    /// The backend will report success or rejection later.
    Pending(PendingPlayback),

    /// The backend refused synchronously.
    Rejected(AudioError),
}

/// Resolution state of a pending play request.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingStatus {
    Waiting,
    Started,
    Rejected(AudioError),
}

/// Receiving half of an asynchronous play request.
///
/// Resolution is observed by polling, so the rejection path always runs
/// on whichever task owns the controller.
#[derive(Debug)]
pub struct PendingPlayback {
    name: String,
    rx: Receiver<Result<(), AudioError>>,
}

/// Sending half of an asynchronous play request, held by the backend.
#[derive(Debug)]
pub struct PlaybackResolver {
    tx: Sender<Result<(), AudioError>>,
}

impl PendingPlayback {
    /// Create a linked resolver/pending pair for the resource `name`.
    pub fn channel(name: impl Into<String>) -> (PlaybackResolver, PendingPlayback) {
        let (tx, rx) = bounded(1);
        let pending = PendingPlayback {
            name: name.into(),
            rx,
        };
        (PlaybackResolver { tx }, pending)
    }

    /// Check for a resolution without blocking.
    pub fn status(&self) -> PendingStatus {
        match self.rx.try_recv() {
            Ok(Ok(())) => PendingStatus::Started,
            Ok(Err(err)) => PendingStatus::Rejected(err),
            Err(TryRecvError::Empty) => PendingStatus::Waiting,
            Err(TryRecvError::Disconnected) => PendingStatus::Rejected(AudioError::rejected(
                &self.name,
                "play request dropped without resolution",
            )),
        }
    }
}

impl PlaybackResolver {
    pub fn resolve(self, result: Result<(), AudioError>) {
        // Receiver gone means the controller no longer cares
        let _ = self.tx.send(result);
    }
}
