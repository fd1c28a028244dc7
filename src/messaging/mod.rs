/// Messaging module
///
/// The audio core is driven by events from an external source:
/// - **Inbound**: requests such as `play-sound`, `toggle-mute`, `set-volume`
/// - **Outbound**: notifications such as `mute-changed`
///
/// ## Architecture
///
/// ```text
/// ┌──────────┐   Event    ┌─────────────┐   Event    ┌──────────────┐
/// │ Producer │ ─────────> │  Event Bus  │ ─────────> │ EventAdapter │
/// │ (host)   │            │             │ <───────── │              │
/// └──────────┘            └─────────────┘ mute-changed└──────────────┘
///                                                           │ calls
///                                                           ▼
///                                                  ┌────────────────────┐
///                                                  │ PlaybackController │
///                                                  └────────────────────┘
/// ```
///
/// ## Usage
///
/// ```rust,ignore
/// let bus = EventBus::new();
/// let controller = PlaybackController::load(&provider, GlobalAudioSettings::default());
/// let mut adapter = EventAdapter::new(controller, &bus);
///
/// bus.publish(Event::PlaySound { name: "victoria".into() });
/// adapter.run(Duration::from_millis(50));
/// ```

pub mod adapter;
pub mod bus;
pub mod events;

// Re-export commonly used types
pub use adapter::{coerce_volume, EventAdapter, Handler, StopReason};
pub use bus::{EventBus, SubscriberId, WeakEventBus};
pub use events::{Event, EventKind};
