/// Resource registry
///
/// Owns every playable handle, keyed by logical name. Filled once at
/// startup by probing an asset provider; names are never added or removed
/// afterwards.
use std::collections::{BTreeSet, HashMap};

use super::settings::GlobalAudioSettings;
use super::source::{AssetProvider, SoundHandle};
use crate::catalog::{self, MUSIC_NAME};

/// Registered audio resources, including the background music track.
#[derive(Default)]
pub struct ResourceRegistry {
    handles: HashMap<String, Box<dyn SoundHandle>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Probe `provider` for every catalog sound plus the music track.
    ///
    /// Missing assets are logged and left unregistered for the process
    /// lifetime; there is no retry.
    pub fn load(provider: &dyn AssetProvider, settings: &GlobalAudioSettings) -> Self {
        let mut registry = Self::new();

        let names = catalog::SOUND_NAMES
            .iter()
            .copied()
            .chain(std::iter::once(MUSIC_NAME));
        for name in names {
            registry.register_from(provider, name, settings);
        }

        tracing::info!(
            "Registered {} of {} audio resources",
            registry.len(),
            catalog::SOUND_NAMES.len() + 1
        );
        registry
    }

    /// Look up `name` on `provider` and register the handle if found.
    pub fn register_from(
        &mut self,
        provider: &dyn AssetProvider,
        name: &str,
        settings: &GlobalAudioSettings,
    ) -> bool {
        match provider.locate(&catalog::asset_id(name)) {
            Ok(handle) => self.register(name, handle, settings),
            Err(e) => {
                tracing::warn!("Audio resource '{}' unavailable: {}", name, e);
                false
            }
        }
    }

    /// Record `handle` under `name`, applying the current settings to it.
    ///
    /// A name is registered at most once; later attempts are refused.
    pub fn register(
        &mut self,
        name: &str,
        mut handle: Box<dyn SoundHandle>,
        settings: &GlobalAudioSettings,
    ) -> bool {
        if self.handles.contains_key(name) {
            tracing::warn!("Audio resource '{}' already registered, ignoring", name);
            return false;
        }

        handle.set_volume(volume_for(name, settings));
        handle.set_muted(settings.is_muted());
        self.handles.insert(name.to_string(), handle);

        tracing::debug!("Registered audio resource '{}'", name);
        true
    }

    pub fn get(&self, name: &str) -> Option<&dyn SoundHandle> {
        self.handles.get(name).map(|h| &**h)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut (dyn SoundHandle + 'static)> {
        self.handles.get_mut(name).map(|h| &mut **h)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handles.contains_key(name)
    }

    /// Registered names, sorted for stable diagnostics output.
    pub fn names(&self) -> BTreeSet<String> {
        self.handles.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn music_mut(&mut self) -> Option<&mut (dyn SoundHandle + 'static)> {
        self.get_mut(MUSIC_NAME)
    }

    /// Push volume and mute state to every handle.
    pub fn apply_settings(&mut self, settings: &GlobalAudioSettings) {
        for (name, handle) in self.handles.iter_mut() {
            handle.set_volume(volume_for(name, settings));
            handle.set_muted(settings.is_muted());
        }
    }

    /// Push only the mute flag to every handle.
    pub fn apply_mute(&mut self, muted: bool) {
        for handle in self.handles.values_mut() {
            handle.set_muted(muted);
        }
    }

    /// Push only the volume to every handle.
    pub fn apply_volume(&mut self, settings: &GlobalAudioSettings) {
        for (name, handle) in self.handles.iter_mut() {
            handle.set_volume(volume_for(name, settings));
        }
    }
}

fn volume_for(name: &str, settings: &GlobalAudioSettings) -> f32 {
    if name == MUSIC_NAME {
        settings.music_volume()
    } else {
        settings.volume()
    }
}
