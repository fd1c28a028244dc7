// Integration tests for the soundboard
// These drive the controller the way the event source does and check the
// play-state bookkeeping against what the handles actually saw.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;

use soundboard::audio_system::{
    GlobalAudioSettings, HandleCall, PlaybackController, RecordingProvider, VariantResolver,
};
use soundboard::catalog::MUSIC_NAME;
use soundboard::messaging::{Event, EventAdapter, EventBus};

/// Helper to build a provider exposing the given logical names
fn provider_with(names: &[&str]) -> RecordingProvider {
    names.iter().fold(RecordingProvider::new(), |p, name| {
        p.with_asset(format!("sound-{}", name))
    })
}

fn controller_for(provider: &RecordingProvider, seed: u64) -> PlaybackController {
    PlaybackController::load(provider, GlobalAudioSettings::default())
        .with_variants(VariantResolver::with_rng(Box::new(StdRng::seed_from_u64(seed))))
}

/// Position of the first `call` made on `asset` in the provider's log
fn position(log: &[(String, HandleCall)], asset: &str, call: HandleCall) -> Option<usize> {
    log.iter().position(|(id, c)| id == asset && *c == call)
}

/// Asserts `asset` was paused and rewound before any handle started playing
fn assert_halted_before_play(provider: &RecordingProvider, asset: &str) {
    let log = provider.call_log();
    let first_play = log
        .iter()
        .position(|(_, call)| *call == HandleCall::Play)
        .expect("nothing was played");
    let pause = position(&log, asset, HandleCall::Pause).expect("not paused");
    let rewind = position(&log, asset, HandleCall::Rewind).expect("not rewound");

    assert!(pause < rewind, "{} rewound before pause: {:?}", asset, log);
    assert!(rewind < first_play, "{} still playing at start: {:?}", asset, log);
}

#[test]
fn test_victory_restarts_within_group() {
    let provider = provider_with(&["victoria1", "victoria2", "victoria3"]);
    let mut controller = controller_for(&provider, 11);

    controller.play_sound("victoria2");
    assert!(controller.is_playing("victoria2"));
    provider.clear_call_log();

    controller.play_sound("victoria");

    assert_halted_before_play(&provider, "sound-victoria2");
    let playing = controller.playing_names();
    assert_eq!(playing.len(), 1);
    let chosen = playing.iter().next().unwrap();
    assert!(["victoria1", "victoria2", "victoria3"].contains(&chosen.as_str()));
}

#[test]
fn test_victory_halts_level_victory() {
    let provider = provider_with(&["victoria1", "victoria-nivel"]);
    let mut controller = controller_for(&provider, 7);

    controller.play_sound("victoria-nivel");
    provider.clear_call_log();

    controller.play_sound("victoria");

    assert_halted_before_play(&provider, "sound-victoria-nivel");
    assert!(!provider.probe("sound-victoria-nivel").unwrap().is_playing());
    let playing: Vec<String> = controller.playing_names().into_iter().collect();
    assert_eq!(playing, vec!["victoria1".to_string()]);
}

#[test]
fn test_error_group_keeps_one_entry() {
    let provider = provider_with(&["error1", "error2"]);
    let mut controller = controller_for(&provider, 3);

    controller.play_sound("error1");
    provider.clear_call_log();

    controller.play_sound("error");

    assert_halted_before_play(&provider, "sound-error1");
    let playing = controller.playing_names();
    assert_eq!(playing.len(), 1);
    assert!(playing.iter().all(|name| name.starts_with("error")));
}

#[test]
fn test_defeat_and_level_victory_overlap() {
    let provider = provider_with(&["derrota", "victoria-nivel"]);
    let mut controller = controller_for(&provider, 1);

    controller.play_sound("victoria-nivel");
    controller.play_sound("derrota");
    assert!(controller.is_playing("victoria-nivel"));
    assert!(controller.is_playing("derrota"));

    controller.play_sound("victoria-nivel");
    assert!(controller.is_playing("derrota"));
    assert_eq!(controller.playing_names().len(), 2);
}

#[test]
fn test_level_victory_halts_victory_variants() {
    let provider = provider_with(&["victoria1", "victoria-nivel"]);
    let mut controller = controller_for(&provider, 5);

    controller.play_sound("victoria");
    assert!(controller.is_playing("victoria1"));

    controller.play_sound("victoria-nivel");

    assert!(!controller.is_playing("victoria1"));
    assert!(controller.is_playing("victoria-nivel"));
    assert!(!provider.probe("sound-victoria1").unwrap().is_playing());
}

#[test]
fn test_replay_restarts_without_duplicate_entry() {
    let provider = provider_with(&["acierto"]);
    let mut controller = controller_for(&provider, 1);
    let probe = provider.probe("sound-acierto").unwrap();

    controller.play_sound("acierto");
    probe.clear_calls();
    controller.play_sound("acierto");

    assert_eq!(controller.playing_names().len(), 1);
    assert_eq!(probe.play_count(), 1);
    assert!(probe.calls().contains(&HandleCall::Rewind));
}

#[test]
fn test_nonexistent_sound_changes_nothing() {
    let provider = provider_with(&["acierto"]);
    let mut controller = controller_for(&provider, 1);
    controller.play_sound("acierto");

    controller.play_sound("nonexistent");

    assert_eq!(controller.playing_names().len(), 1);
    assert!(controller.is_playing("acierto"));
}

#[test]
fn test_non_conflicting_sounds_play_together() {
    let provider = provider_with(&["acierto", "click"]);
    let mut controller = controller_for(&provider, 1);

    controller.play_sound("acierto");
    controller.play_sound("click");

    assert!(controller.is_playing("acierto"));
    assert!(controller.is_playing("click"));
}

#[test]
fn test_stop_all_pauses_and_rewinds_everything() {
    let names = ["acierto", "click", "error1"];
    let provider = provider_with(&names);
    let mut controller = controller_for(&provider, 1);
    for name in names {
        controller.play_sound(name);
    }
    for name in names {
        provider.probe(&format!("sound-{}", name)).unwrap().clear_calls();
    }

    controller.stop_all_sounds();

    assert!(controller.playing_names().is_empty());
    for name in names {
        let calls = provider.probe(&format!("sound-{}", name)).unwrap().calls();
        assert_eq!(calls, vec![HandleCall::Pause, HandleCall::Rewind]);
    }
}

#[test]
fn test_variant_eventually_selects_every_member() {
    let provider = provider_with(&["error1", "error2"]);
    let mut controller = controller_for(&provider, 42);

    let mut seen = HashSet::new();
    for _ in 0..100 {
        controller.play_sound("error");
        let playing = controller.playing_names();
        assert_eq!(playing.len(), 1, "group members overlapped: {:?}", playing);
        seen.extend(playing);
    }

    assert_eq!(seen.len(), 2);
}

#[test]
fn test_volume_clamping_through_events() {
    let bus = EventBus::new();
    let provider = provider_with(&["acierto"]);
    let mut adapter = EventAdapter::new(controller_for(&provider, 1), &bus);

    bus.publish(Event::SetVolume { value: json!(-1) });
    adapter.drain();
    assert_eq!(adapter.controller().get_volume(), 0.0);

    bus.publish(Event::SetVolume { value: json!(5) });
    adapter.drain();
    assert_eq!(adapter.controller().get_volume(), 1.0);

    bus.publish(Event::SetVolume {
        value: json!("abc"),
    });
    adapter.drain();
    assert_eq!(adapter.controller().get_volume(), 0.0);
}

#[test]
fn test_mute_round_trip_restores_handles() {
    let provider = provider_with(&["acierto", MUSIC_NAME]);
    let mut controller = controller_for(&provider, 1);
    let sound = provider.probe("sound-acierto").unwrap();
    let music = provider.probe("sound-musica-fondo").unwrap();
    let original = controller.get_mute_status();

    controller.toggle_mute();
    assert!(sound.is_muted());
    assert!(music.is_muted());

    controller.toggle_mute();
    assert_eq!(controller.get_mute_status(), original);
    assert_eq!(sound.is_muted(), original);
    assert_eq!(music.is_muted(), original);
}

#[test]
fn test_finished_sound_is_reported_on_bus() {
    let bus = EventBus::new();
    let (rx, _id) = bus.subscribe();
    let provider = provider_with(&["click"]);
    let mut adapter = EventAdapter::new(controller_for(&provider, 1), &bus);

    bus.publish(Event::PlaySound {
        name: "click".to_string(),
    });
    adapter.drain();
    provider.probe("sound-click").unwrap().finish();
    adapter.drain();

    assert!(!adapter.controller().is_playing("click"));
    let events: Vec<Event> = rx.try_iter().collect();
    assert!(events.contains(&Event::SoundFinished {
        name: "click".to_string()
    }));
}
