/// Event adapter
///
/// Bridges the event bus to the playback controller. Handlers are bound
/// per event kind when the adapter is built; events without a binding
/// (including the controller's own outbound notifications) are ignored.
use std::collections::HashMap;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use serde_json::Value;

use super::bus::{EventBus, SubscriberId, WeakEventBus};
use super::events::{Event, EventKind};
use crate::audio_system::PlaybackController;
use crate::error::AudioError;

/// Handler invoked for one bound event kind.
pub type Handler = fn(&mut PlaybackController, &Event) -> Result<(), AudioError>;

/// Inbound bindings installed on every adapter.
pub fn default_bindings() -> Vec<(EventKind, Handler)> {
    vec![
        (EventKind::ToggleMute, on_toggle_mute as Handler),
        (EventKind::SetVolume, on_set_volume as Handler),
        (EventKind::PlaySound, on_play_sound as Handler),
        (EventKind::StopSound, on_stop_sound as Handler),
        (EventKind::StopAll, on_stop_all as Handler),
        (EventKind::ToggleMusic, on_toggle_music as Handler),
    ]
}

/// Why `run` returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Shutdown,
    Disconnected,
}

pub struct EventAdapter {
    controller: PlaybackController,
    bindings: HashMap<EventKind, Handler>,
    inbox: Receiver<Event>,
    bus: WeakEventBus,
    subscription: SubscriberId,
}

impl EventAdapter {
    /// Subscribe to `bus` and route its events to `controller`.
    ///
    /// The controller's notifications are published back on the same bus.
    /// Neither side keeps the bus alive: dropping the host's last handle
    /// ends `run`.
    pub fn new(mut controller: PlaybackController, bus: &EventBus) -> Self {
        controller.set_event_sink(bus);
        let (inbox, subscription) = bus.subscribe();

        Self {
            controller,
            bindings: default_bindings().into_iter().collect(),
            inbox,
            bus: bus.downgrade(),
            subscription,
        }
    }

    /// Route one event. Returns false when no handler is bound for it.
    pub fn dispatch(&mut self, event: &Event) -> bool {
        let kind = event.kind();
        let Some(handler) = self.bindings.get(&kind) else {
            if kind.is_outbound() {
                tracing::trace!("Skipping own notification '{}'", kind.name());
            } else {
                tracing::trace!("No handler bound for '{}'", kind.name());
            }
            return false;
        };

        tracing::debug!("Handling event: {}", event.description());
        if let Err(e) = handler(&mut self.controller, event) {
            tracing::warn!("Failed to handle '{}': {}", kind.name(), e);
        }
        true
    }

    /// Handle everything already queued, then poll the controller.
    ///
    /// Returns true if a shutdown event was seen.
    pub fn drain(&mut self) -> bool {
        let mut shutdown = false;
        while let Ok(event) = self.inbox.try_recv() {
            if event == Event::Shutdown {
                shutdown = true;
                break;
            }
            self.dispatch(&event);
        }
        self.controller.poll();
        shutdown
    }

    /// Process events until shutdown or until the bus goes away.
    ///
    /// Wakes at least every `tick` to observe completions and pending plays,
    /// so all controller state changes happen on this thread.
    pub fn run(&mut self, tick: Duration) -> StopReason {
        tracing::info!("Audio event loop started");

        let reason = loop {
            match self.inbox.recv_timeout(tick) {
                Ok(Event::Shutdown) => break StopReason::Shutdown,
                Ok(event) => {
                    self.dispatch(&event);
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break StopReason::Disconnected,
            }
            self.controller.poll();
        };

        self.controller.stop_all_sounds();
        self.controller.toggle_music(false);
        tracing::info!("Audio event loop stopped ({:?})", reason);
        reason
    }

    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PlaybackController {
        &mut self.controller
    }
}

impl Drop for EventAdapter {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.unsubscribe(self.subscription);
        }
    }
}

fn on_toggle_mute(controller: &mut PlaybackController, _event: &Event) -> Result<(), AudioError> {
    controller.toggle_mute();
    Ok(())
}

fn on_set_volume(controller: &mut PlaybackController, event: &Event) -> Result<(), AudioError> {
    let Event::SetVolume { value } = event else {
        return Err(unexpected(event));
    };
    let volume = coerce_volume(value);
    if !value.is_number() {
        tracing::warn!(
            "{}",
            AudioError::InvalidInput(format!("volume payload {} coerced to {}", value, volume))
        );
    }
    controller.set_volume(volume);
    Ok(())
}

fn on_play_sound(controller: &mut PlaybackController, event: &Event) -> Result<(), AudioError> {
    let Event::PlaySound { name } = event else {
        return Err(unexpected(event));
    };
    controller.play_sound(name);
    Ok(())
}

fn on_stop_sound(controller: &mut PlaybackController, event: &Event) -> Result<(), AudioError> {
    let Event::StopSound { name } = event else {
        return Err(unexpected(event));
    };
    controller.stop_sound(name);
    Ok(())
}

fn on_stop_all(controller: &mut PlaybackController, _event: &Event) -> Result<(), AudioError> {
    controller.stop_all_sounds();
    Ok(())
}

fn on_toggle_music(controller: &mut PlaybackController, event: &Event) -> Result<(), AudioError> {
    let Event::ToggleMusic { play } = event else {
        return Err(unexpected(event));
    };
    controller.toggle_music(*play);
    Ok(())
}

fn unexpected(event: &Event) -> AudioError {
    AudioError::InvalidInput(format!("unexpected payload for {}", event.kind().name()))
}

/// Numeric value of a volume payload.
///
/// Numbers pass through, numeric strings are parsed, booleans become 1/0
/// and anything else is 0. Clamping happens in the controller.
pub fn coerce_volume(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(0.0)
            }
        }
        Value::Bool(true) => 1.0,
        _ => 0.0,
    }
}
