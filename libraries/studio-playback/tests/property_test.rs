//! Property-based tests for the playback coordinator
//!
//! Uses proptest to verify invariants across random action sequences.

use proptest::prelude::*;
use std::time::Duration;
use studio_playback::{NowPlaying, PlaybackCoordinator, PlaybackSnapshot, PlayerStatus};

// ===== Helpers =====

fn arbitrary_track() -> impl Strategy<Value = NowPlaying> {
    (
        "[0-9]{1,6}",                                     // id
        "[A-Za-z ]{1,30}",                                // title
        "[A-Za-z ]{1,20}",                                // artist
        proptest::option::of(1u64..600),                  // duration (seconds)
    )
        .prop_map(|(id, title, artist, duration)| NowPlaying {
            url: format!("https://cdn.example/audio/{}.mp3", id),
            id,
            title,
            artist,
            thumbnail_url: None,
            duration: duration.map(Duration::from_secs),
        })
}

#[derive(Debug, Clone)]
enum Action {
    Play(NowPlaying),
    Toggle,
    Volume(f32),
    Mute,
    Seek(f32),
    Clear,
}

fn arbitrary_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        arbitrary_track().prop_map(Action::Play),
        Just(Action::Toggle),
        (-1.0f32..2.0).prop_map(Action::Volume),
        Just(Action::Mute),
        (0.0f32..1.0).prop_map(Action::Seek),
        Just(Action::Clear),
    ]
}

fn apply(player: &mut PlaybackCoordinator, action: Action) {
    match action {
        Action::Play(track) => player.play_track(track).unwrap(),
        Action::Toggle => {
            player.toggle_play().ok();
        }
        Action::Volume(v) => player.set_volume(v).unwrap(),
        Action::Mute => player.toggle_mute(),
        Action::Seek(f) => {
            player.seek_fraction(f).ok();
        }
        Action::Clear => player.clear_queue(),
    }
}

// ===== Property Tests =====

proptest! {
    /// Property: a second play_track always wins and leaves the player playing
    #[test]
    fn play_track_interrupts(
        first in arbitrary_track(),
        second in arbitrary_track(),
        paused_between in any::<bool>(),
    ) {
        let mut player = PlaybackCoordinator::default();
        player.play_track(first).unwrap();
        if paused_between {
            player.toggle_play().unwrap();
        }

        player.play_track(second.clone()).unwrap();

        prop_assert_eq!(player.current_track(), Some(&second));
        prop_assert!(player.is_playing());
        prop_assert_eq!(player.output().source(), Some(second.url.as_str()));
    }

    /// Property: clear_queue returns to the initial tuple from any state
    #[test]
    fn clear_always_restores_defaults(
        actions in prop::collection::vec(arbitrary_action(), 0..30)
    ) {
        let mut player = PlaybackCoordinator::default();
        for action in actions {
            apply(&mut player, action);
        }

        player.clear_queue();

        prop_assert_eq!(player.snapshot(), PlaybackSnapshot::default());
        prop_assert_eq!(player.status(), PlayerStatus::Idle);
        prop_assert!(player.output().source().is_none());
    }

    /// Property: toggling twice restores the playing flag
    #[test]
    fn toggle_twice_is_identity(
        actions in prop::collection::vec(arbitrary_action(), 0..20),
        track in arbitrary_track(),
    ) {
        let mut player = PlaybackCoordinator::default();
        player.play_track(track).unwrap();
        for action in actions {
            apply(&mut player, action);
        }

        let before = player.is_playing();
        let had_track = player.current_track().is_some();

        let first = player.toggle_play();
        let second = player.toggle_play();

        prop_assert_eq!(first.is_ok(), had_track);
        prop_assert_eq!(second.is_ok(), had_track);
        prop_assert_eq!(player.is_playing(), before);
    }

    /// Property: stored volume is always within range and device gain follows mute
    #[test]
    fn volume_stays_in_range(
        actions in prop::collection::vec(arbitrary_action(), 0..30)
    ) {
        let mut player = PlaybackCoordinator::default();
        for action in actions {
            apply(&mut player, action);
        }

        let volume = player.volume();
        prop_assert!((0.0..=1.0).contains(&volume.level()));

        let gain = player.output().gain();
        if volume.is_muted() {
            prop_assert!(gain.abs() < f32::EPSILON);
        } else {
            prop_assert!((gain - volume.level()).abs() < f32::EPSILON);
        }
    }
}

// ===== Scenarios =====

#[test]
fn mute_silences_output_but_keeps_level() {
    let mut player = PlaybackCoordinator::default();

    player.set_volume(0.3).unwrap();
    player.toggle_mute();

    assert!(player.output().gain().abs() < f32::EPSILON);
    assert!((player.snapshot().volume - 0.3).abs() < f32::EPSILON);
    assert!(player.snapshot().muted);
}

#[tokio::test]
async fn shared_coordinator_is_seen_by_all_handles() {
    let shared = PlaybackCoordinator::headless(0.8);
    let widget = shared.clone();
    let mut updates = shared.lock().await.subscribe();

    let track = NowPlaying {
        id: "7".into(),
        title: "Neon Drive".into(),
        artist: "Night Runner".into(),
        url: "https://cdn.example/audio/7.mp3".into(),
        thumbnail_url: None,
        duration: Some(Duration::from_secs(180)),
    };
    shared.lock().await.play_track(track).unwrap();

    updates.changed().await.unwrap();
    assert_eq!(
        updates.borrow().current_track.as_ref().map(|t| t.title.as_str()),
        Some("Neon Drive")
    );
    assert_eq!(widget.lock().await.status(), PlayerStatus::Playing);
}
