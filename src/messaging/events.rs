/// Event types exchanged with the external event source
///
/// Inbound events are requests for the audio core; outbound events are
/// notifications it emits after a change.
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Flip the global mute flag
    ToggleMute,

    /// Set the global volume; the payload is coerced to a number
    SetVolume { value: Value },

    /// Play a logical sound name
    PlaySound { name: String },

    /// Stop one sound if it is playing
    StopSound { name: String },

    /// Stop every playing sound
    StopAll,

    /// Start or stop the background music
    ToggleMusic { play: bool },

    /// Mute flag changed (outbound)
    MuteChanged { muted: bool },

    /// Volume changed (outbound)
    VolumeChanged { volume: f32 },

    /// A sound reached its natural end (outbound)
    SoundFinished { name: String },

    /// Stop processing events
    Shutdown,
}

/// Payload-free discriminant of `Event`, used to key handler bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ToggleMute,
    SetVolume,
    PlaySound,
    StopSound,
    StopAll,
    ToggleMusic,
    MuteChanged,
    VolumeChanged,
    SoundFinished,
    Shutdown,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::ToggleMute => EventKind::ToggleMute,
            Event::SetVolume { .. } => EventKind::SetVolume,
            Event::PlaySound { .. } => EventKind::PlaySound,
            Event::StopSound { .. } => EventKind::StopSound,
            Event::StopAll => EventKind::StopAll,
            Event::ToggleMusic { .. } => EventKind::ToggleMusic,
            Event::MuteChanged { .. } => EventKind::MuteChanged,
            Event::VolumeChanged { .. } => EventKind::VolumeChanged,
            Event::SoundFinished { .. } => EventKind::SoundFinished,
            Event::Shutdown => EventKind::Shutdown,
        }
    }

    /// Get a human-readable description of the event
    pub fn description(&self) -> String {
        match self {
            Event::ToggleMute => "Toggle mute".to_string(),
            Event::SetVolume { value } => format!("Set volume: {}", value),
            Event::PlaySound { name } => format!("Play sound: {}", name),
            Event::StopSound { name } => format!("Stop sound: {}", name),
            Event::StopAll => "Stop all sounds".to_string(),
            Event::ToggleMusic { play } => {
                format!("Music {}", if *play { "on" } else { "off" })
            }
            Event::MuteChanged { muted } => format!("Mute changed: {}", muted),
            Event::VolumeChanged { volume } => format!("Volume changed: {:.2}", volume),
            Event::SoundFinished { name } => format!("Sound finished: {}", name),
            Event::Shutdown => "Shutting down".to_string(),
        }
    }
}

impl EventKind {
    /// Wire name of the event on the external bus.
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::ToggleMute => "toggle-mute",
            EventKind::SetVolume => "set-volume",
            EventKind::PlaySound => "play-sound",
            EventKind::StopSound => "stop-sound",
            EventKind::StopAll => "stop-all",
            EventKind::ToggleMusic => "toggle-music",
            EventKind::MuteChanged => "mute-changed",
            EventKind::VolumeChanged => "volume-changed",
            EventKind::SoundFinished => "sound-finished",
            EventKind::Shutdown => "shutdown",
        }
    }

    /// True for notifications the core emits rather than consumes.
    pub fn is_outbound(&self) -> bool {
        matches!(
            self,
            EventKind::MuteChanged | EventKind::VolumeChanged | EventKind::SoundFinished
        )
    }
}
