pub mod conflicts;
pub mod controller;
pub mod player;
pub mod recording;
pub mod registry;
pub mod settings;
/// Audio system module
///
/// Coordinates playback of pre-loaded sound effects and background music:
/// - Variant groups pick one of several interchangeable resources at random
/// - Conflict groups halt related sounds before a new one starts
/// - Global mute/volume applied uniformly to every resource
///
/// ## Architecture
///
/// ```text
/// PlaybackController
///   ├── ResourceRegistry      name -> Box<dyn SoundHandle>
///   ├── VariantResolver       "victoria" -> victoria1 | victoria2 | victoria3
///   ├── ConflictCoordinator   "victoria" halts victoria1..3 + victoria-nivel
///   ├── PlaybackState         names believed to be playing
///   └── GlobalAudioSettings   volume, mute (music at 0.2x volume)
/// ```
///
/// ## Usage
///
/// ```rust,ignore
/// use audio_system::{PlaybackController, RodioProvider, GlobalAudioSettings};
///
/// let provider = RodioProvider::new("assets/sounds", "mp3")?;
/// let mut controller = PlaybackController::load(&provider, GlobalAudioSettings::default());
///
/// controller.play_sound("victoria"); // one random victory variant
/// controller.play_sound("acierto");  // plays alongside, no conflict
/// controller.poll();                 // observe completions
/// ```
pub mod source;
pub mod variants;

// Re-export commonly used types
pub use conflicts::{ConflictCoordinator, PlayToken, PlaybackState};
pub use controller::PlaybackController;
pub use player::{RodioHandle, RodioProvider};
pub use recording::{
    HandleCall, HandleProbe, PermissiveProvider, PlayBehavior, RecordingHandle, RecordingProvider,
};
pub use registry::ResourceRegistry;
pub use settings::GlobalAudioSettings;
pub use source::{
    AssetProvider, PendingPlayback, PendingStatus, PlayRequest, PlaybackResolver, SoundHandle,
};
pub use variants::VariantResolver;
