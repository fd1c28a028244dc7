/// Conflict coordinator and play-state bookkeeping
///
/// Tracks which resources are believed to be playing and halts every
/// member of a trigger's conflict group before that trigger starts.
use std::collections::{BTreeSet, HashMap};

use super::registry::ResourceRegistry;
use crate::catalog::CONFLICT_GROUPS;

/// Identifies one play of one resource.
///
/// A late rejection only clears the entry whose token it was issued for,
/// so a restart is never undone by the failure of the play it replaced.
pub type PlayToken = u64;

/// Names of the resources currently believed to be playing.
#[derive(Debug, Default)]
pub struct PlaybackState {
    playing: HashMap<String, PlayToken>,
    next_token: PlayToken,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `name` as playing, superseding any earlier entry.
    pub fn mark(&mut self, name: &str) -> PlayToken {
        self.next_token += 1;
        self.playing.insert(name.to_string(), self.next_token);
        self.next_token
    }

    pub fn contains(&self, name: &str) -> bool {
        self.playing.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.playing.remove(name).is_some()
    }

    /// True if `name` is still tracked under `token`.
    pub fn is_current(&self, name: &str, token: PlayToken) -> bool {
        self.playing.get(name) == Some(&token)
    }

    /// Remove `name` only if it is still tracked under `token`.
    pub fn remove_if_current(&mut self, name: &str, token: PlayToken) -> bool {
        if self.is_current(name, token) {
            self.playing.remove(name);
            true
        } else {
            false
        }
    }

    pub fn names(&self) -> BTreeSet<String> {
        self.playing.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.playing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playing.is_empty()
    }

    pub fn drain(&mut self) -> Vec<String> {
        self.playing.drain().map(|(name, _)| name).collect()
    }
}

/// Fixed table of which sounds must be halted before a trigger plays.
pub struct ConflictCoordinator {
    groups: HashMap<&'static str, &'static [&'static str]>,
}

impl ConflictCoordinator {
    pub fn new() -> Self {
        Self::with_groups(CONFLICT_GROUPS)
    }

    pub fn with_groups(groups: &'static [(&'static str, &'static [&'static str])]) -> Self {
        Self {
            groups: groups.iter().copied().collect(),
        }
    }

    /// Conflict group of `name`, or just `name` itself when none is configured.
    pub fn conflicts_for(&self, name: &str) -> BTreeSet<String> {
        match self.groups.get(name) {
            Some(members) => members.iter().map(|m| m.to_string()).collect(),
            None => BTreeSet::from([name.to_string()]),
        }
    }

    /// Hard-stop every playing member of `name`'s conflict group.
    ///
    /// Runs to completion before returning. Returns the names stopped.
    pub fn stop_conflicting(
        &self,
        name: &str,
        state: &mut PlaybackState,
        registry: &mut ResourceRegistry,
    ) -> Vec<String> {
        let mut stopped = Vec::new();

        for member in self.conflicts_for(name) {
            if !state.remove(&member) {
                continue;
            }
            if let Some(handle) = registry.get_mut(&member) {
                handle.pause();
                handle.rewind();
            }
            tracing::debug!("Stopped '{}' (conflicts with '{}')", member, name);
            stopped.push(member);
        }

        stopped
    }
}

impl Default for ConflictCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio_system::recording::{HandleCall, RecordingHandle};
    use crate::audio_system::settings::GlobalAudioSettings;

    #[test]
    fn test_unlisted_name_conflicts_with_itself() {
        let coordinator = ConflictCoordinator::new();
        let conflicts = coordinator.conflicts_for("acierto");
        assert_eq!(conflicts, BTreeSet::from(["acierto".to_string()]));
    }

    #[test]
    fn test_victory_triggers_share_a_group() {
        let coordinator = ConflictCoordinator::new();
        let victoria = coordinator.conflicts_for("victoria");
        let nivel = coordinator.conflicts_for("victoria-nivel");

        assert_eq!(victoria, nivel);
        assert!(victoria.contains("victoria-nivel"));
        assert!(victoria.contains("victoria2"));
    }

    #[test]
    fn test_stop_conflicting_halts_only_playing_members() {
        let settings = GlobalAudioSettings::default();
        let mut registry = ResourceRegistry::new();
        let (v1, v1_probe) = RecordingHandle::new("victoria1");
        let (v2, v2_probe) = RecordingHandle::new("victoria2");
        registry.register("victoria1", Box::new(v1), &settings);
        registry.register("victoria2", Box::new(v2), &settings);
        v1_probe.clear_calls();
        v2_probe.clear_calls();

        let mut state = PlaybackState::new();
        state.mark("victoria2");
        state.mark("acierto");

        let coordinator = ConflictCoordinator::new();
        let stopped = coordinator.stop_conflicting("victoria-nivel", &mut state, &mut registry);

        assert_eq!(stopped, vec!["victoria2".to_string()]);
        assert_eq!(v2_probe.calls(), vec![HandleCall::Pause, HandleCall::Rewind]);
        assert!(v1_probe.calls().is_empty());
        assert!(state.contains("acierto"));
        assert!(!state.contains("victoria2"));
    }

    #[test]
    fn test_stale_token_does_not_clear_newer_play() {
        let mut state = PlaybackState::new();
        let first = state.mark("acierto");
        let second = state.mark("acierto");

        assert_ne!(first, second);
        assert!(!state.is_current("acierto", first));
        assert!(!state.remove_if_current("acierto", first));
        assert!(state.contains("acierto"));
        assert!(state.remove_if_current("acierto", second));
        assert!(state.is_empty());
    }
}
