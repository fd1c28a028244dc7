/// Playback controller
///
/// Owns the registry, the play-state bookkeeping and the global settings.
/// Every public method is total: failures are logged and swallowed, never
/// returned to the caller.
use std::collections::BTreeSet;

use super::conflicts::{ConflictCoordinator, PlayToken, PlaybackState};
use super::registry::ResourceRegistry;
use super::settings::GlobalAudioSettings;
use super::source::{AssetProvider, PendingPlayback, PendingStatus, PlayRequest};
use super::variants::VariantResolver;
use crate::catalog::MUSIC_NAME;
use crate::error::AudioError;
use crate::messaging::{Event, EventBus, WeakEventBus};

/// A play request whose outcome the backend has not reported yet.
struct PendingEntry {
    name: String,
    /// `None` for the music track, which is not tracked in the play state.
    token: Option<PlayToken>,
    playback: PendingPlayback,
}

pub struct PlaybackController {
    registry: ResourceRegistry,
    variants: VariantResolver,
    conflicts: ConflictCoordinator,
    state: PlaybackState,
    settings: GlobalAudioSettings,
    pending: Vec<PendingEntry>,
    events: Option<WeakEventBus>,
}

impl PlaybackController {
    /// Build a controller over `registry`, pushing `settings` to every handle.
    pub fn new(mut registry: ResourceRegistry, settings: GlobalAudioSettings) -> Self {
        registry.apply_settings(&settings);
        Self {
            registry,
            variants: VariantResolver::new(),
            conflicts: ConflictCoordinator::new(),
            state: PlaybackState::new(),
            settings,
            pending: Vec::new(),
            events: None,
        }
    }

    /// Probe `provider` for the whole catalog and build a controller over it.
    pub fn load(provider: &dyn AssetProvider, settings: GlobalAudioSettings) -> Self {
        let registry = ResourceRegistry::load(provider, &settings);
        Self::new(registry, settings)
    }

    pub fn with_variants(mut self, variants: VariantResolver) -> Self {
        self.variants = variants;
        self
    }

    /// Publish notifications on `bus` for as long as it exists.
    pub fn with_event_sink(mut self, bus: &EventBus) -> Self {
        self.set_event_sink(bus);
        self
    }

    pub fn set_event_sink(&mut self, bus: &EventBus) {
        self.events = Some(bus.downgrade());
    }

    /// Play a logical sound: stop its conflicts, pick a variant, safe-play it.
    pub fn play_sound(&mut self, requested: &str) {
        if self.settings.is_muted() {
            tracing::debug!("Muted, ignoring play request for '{}'", requested);
            return;
        }
        if requested.is_empty() {
            tracing::warn!(
                "{}",
                AudioError::InvalidInput("empty sound name".to_string())
            );
            return;
        }
        if requested == MUSIC_NAME {
            tracing::warn!(
                "{}",
                AudioError::InvalidInput(format!("'{}' is controlled by toggle_music", requested))
            );
            return;
        }

        self.conflicts
            .stop_conflicting(requested, &mut self.state, &mut self.registry);

        let target = match self.variants.resolve(requested, &self.registry) {
            Some(variant) => variant.to_string(),
            None => requested.to_string(),
        };

        if !self.registry.contains(&target) {
            tracing::warn!("{}", AudioError::MissingResource(target));
            return;
        }

        self.play_safe(&target);
    }

    /// Pause, rewind, mark as playing, then request playback.
    ///
    /// The entry is marked before `play` so every failure path can clear it.
    fn play_safe(&mut self, name: &str) {
        let Some(handle) = self.registry.get_mut(name) else {
            tracing::warn!("{}", AudioError::MissingResource(name.to_string()));
            return;
        };

        handle.pause();
        handle.rewind();
        let token = self.state.mark(name);
        let request = handle.play();
        self.prune_pending();

        match request {
            PlayRequest::Started => {
                tracing::info!("Playing '{}'", name);
            }
            PlayRequest::Pending(playback) => {
                tracing::debug!("Play request for '{}' pending", name);
                self.pending.push(PendingEntry {
                    name: name.to_string(),
                    token: Some(token),
                    playback,
                });
            }
            PlayRequest::Rejected(err) => {
                tracing::error!("{}", err);
                self.state.remove_if_current(name, token);
            }
        }
    }

    /// Hard-stop every tracked sound and clear the play state.
    pub fn stop_all_sounds(&mut self) {
        let names = self.state.drain();
        for name in &names {
            if let Some(handle) = self.registry.get_mut(name) {
                handle.pause();
                handle.rewind();
            }
        }
        self.prune_pending();
        tracing::debug!("Stopped all sounds ({} were playing)", names.len());
    }

    /// Hard-stop `name` if it is tracked as playing.
    pub fn stop_sound(&mut self, name: &str) {
        if !self.state.remove(name) {
            return;
        }
        if let Some(handle) = self.registry.get_mut(name) {
            handle.pause();
            handle.rewind();
        }
        self.prune_pending();
        tracing::debug!("Stopped '{}'", name);
    }

    /// Start the background music from the top, or stop it.
    pub fn toggle_music(&mut self, play: bool) {
        let Some(music) = self.registry.music_mut() else {
            tracing::debug!("No background music registered");
            return;
        };

        // A new music request supersedes any still pending
        self.pending.retain(|entry| entry.token.is_some());

        if !play {
            music.pause();
            music.rewind();
            tracing::debug!("Background music stopped");
            return;
        }

        music.rewind();
        match music.play() {
            PlayRequest::Started => tracing::info!("Background music started"),
            PlayRequest::Pending(playback) => self.pending.push(PendingEntry {
                name: MUSIC_NAME.to_string(),
                token: None,
                playback,
            }),
            PlayRequest::Rejected(err) => tracing::error!("{}", err),
        }
    }

    /// Flip the global mute flag and push it to every resource.
    pub fn toggle_mute(&mut self) {
        let muted = self.settings.toggle_mute();
        self.registry.apply_mute(muted);
        tracing::info!("Audio {}", if muted { "muted" } else { "unmuted" });
        self.emit(Event::MuteChanged { muted });
    }

    /// Set the global volume, clamped to 0.0-1.0 (NaN counts as 0).
    pub fn set_volume(&mut self, volume: f64) {
        let volume = self.settings.set_volume(volume);
        self.registry.apply_volume(&self.settings);
        tracing::debug!("Volume set to {:.2}", volume);
        self.emit(Event::VolumeChanged { volume });
    }

    pub fn get_mute_status(&self) -> bool {
        self.settings.is_muted()
    }

    pub fn get_volume(&self) -> f32 {
        self.settings.volume()
    }

    /// Observe pending play outcomes and natural completions.
    ///
    /// Must be called from the same task as every other entry point; this
    /// is what serializes backend callbacks with play-state mutations.
    pub fn poll(&mut self) {
        self.prune_pending();
        let state = &mut self.state;
        self.pending.retain(|entry| match entry.playback.status() {
            PendingStatus::Waiting => true,
            PendingStatus::Started => {
                tracing::info!("Playing '{}'", entry.name);
                false
            }
            PendingStatus::Rejected(err) => {
                tracing::error!("Playback of '{}' failed: {}", entry.name, err);
                if let Some(token) = entry.token {
                    state.remove_if_current(&entry.name, token);
                }
                false
            }
        });

        let finished: Vec<String> = self
            .state
            .names()
            .into_iter()
            .filter(|name| {
                self.registry
                    .get(name)
                    .map_or(true, |handle| handle.has_ended())
            })
            .collect();

        for name in finished {
            self.state.remove(&name);
            tracing::debug!("'{}' finished playing", name);
            self.emit(Event::SoundFinished { name });
        }
    }

    pub fn is_playing(&self, name: &str) -> bool {
        self.state.contains(name)
    }

    pub fn playing_names(&self) -> BTreeSet<String> {
        self.state.names()
    }

    pub fn registered_names(&self) -> BTreeSet<String> {
        self.registry.names()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Forget pending requests whose play has since been restarted or stopped.
    fn prune_pending(&mut self) {
        let state = &self.state;
        self.pending.retain(|entry| match entry.token {
            Some(token) => state.is_current(&entry.name, token),
            None => true,
        });
    }

    fn emit(&self, event: Event) {
        if let Some(bus) = self.events.as_ref().and_then(WeakEventBus::upgrade) {
            bus.publish(event);
        }
    }
}
