//! Sound coordination for a quiz game: maps logical sound names to
//! pre-loaded resources, keeps related sounds from overlapping and applies
//! global mute/volume, all driven by events.

pub mod audio_system;
pub mod catalog;
pub mod config;
pub mod error;
pub mod messaging;

pub use audio_system::{GlobalAudioSettings, PlaybackController};
pub use error::{AudioError, ConfigError};
pub use messaging::{Event, EventAdapter, EventBus};
