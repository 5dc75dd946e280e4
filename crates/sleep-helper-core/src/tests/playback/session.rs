use crate::{
    AudioCategory, AudioEntry, AudioSource, CoreError, PlaybackPhase, PlaybackSession,
    TransportOutcome,
    tests::fakes::{FakePlayer, PlayerCall},
};

use std::{path::PathBuf, time::Duration};

const READY_TIMEOUT: Duration = Duration::from_secs(3);

fn remote(id: &str, url: &str) -> AudioEntry {
    AudioEntry::bundled(id, id, AudioCategory::WhiteNoise, url)
}

/// WHAT: Loading a reachable entry ends in Playing with the entry current
/// WHY: The player screen shows the loaded item and a pause button
#[tokio::test]
async fn given_reachable_entry_when_loading_then_playing() {
    // Given: An empty session
    let (player, calls) = FakePlayer::new();
    let mut session = PlaybackSession::new(player, READY_TIMEOUT);
    let entry = remote("1", "https://example.com/rain.mp3");

    // When: Loading the entry
    session.load(entry.clone()).await.unwrap();

    // Then: Playing, not loading, entry current, player prepared then played
    let state = session.state();
    assert_eq!(state.current, Some(entry));
    assert!(state.is_playing());
    assert!(!state.is_loading());
    assert_eq!(
        *calls.lock().unwrap(),
        vec![
            PlayerCall::Prepare("https://example.com/rain.mp3".to_string()),
            PlayerCall::Play,
        ]
    );
    session.release().await.unwrap();
}

/// WHAT: Loading passes through Loading before Playing
/// WHY: Observers rely on the published state machine order
#[tokio::test]
async fn given_subscriber_when_loading_then_loading_published_with_item() {
    // Given: A subscriber on an empty session
    let (player, _calls) = FakePlayer::new();
    let mut session = PlaybackSession::new(player, READY_TIMEOUT);
    let mut rx = session.subscribe();
    let entry = remote("1", "https://example.com/rain.mp3");

    // When: Loading
    session.load(entry.clone()).await.unwrap();

    // Then: Latest state is Playing with the entry
    assert!(rx.has_changed().unwrap());
    let state = rx.borrow_and_update().clone();
    assert_eq!(state.phase, PlaybackPhase::Playing);
    assert_eq!(state.current, Some(entry));
    session.release().await.unwrap();
}

/// WHAT: An unreachable source fails with PlaybackSourceError and resets
/// WHY: A failed load must not leave the UI stuck loading
#[tokio::test]
async fn given_unreachable_source_when_loading_then_source_error_and_empty() {
    // Given: An entry whose URL cannot be reached
    let (player, calls) = FakePlayer::new();
    let mut session = PlaybackSession::new(player, READY_TIMEOUT);
    let entry = remote("9", "https://unreachable.invalid/none.mp3");

    // When: Loading it
    let result = session.load(entry).await;

    // Then: Source error, nothing current, not playing, player stopped
    assert!(matches!(result, Err(CoreError::PlaybackSourceError { .. })));
    let state = session.state();
    assert_eq!(state.current, None);
    assert!(!state.is_playing());
    assert_eq!(state.phase, PlaybackPhase::Empty);
    assert_eq!(calls.lock().unwrap().last(), Some(&PlayerCall::Stop));
    session.release().await.unwrap();
}

/// WHAT: A source that never becomes ready times out and resets
/// WHY: Readiness waits must be bounded
#[tokio::test(start_paused = true)]
async fn given_stalled_source_when_loading_then_timeout_and_empty() {
    // Given: A source that never confirms readiness
    let (player, _calls) = FakePlayer::new();
    let mut session = PlaybackSession::new(player, READY_TIMEOUT);
    let entry = remote("8", "https://stalled.example.com/slow.mp3");

    // When: Loading it
    let result = session.load(entry).await;

    // Then: Timeout and Empty
    assert!(matches!(result, Err(CoreError::Timeout { .. })));
    assert_eq!(session.state().phase, PlaybackPhase::Empty);
    session.release().await.unwrap();
}

/// WHAT: Toggling twice from Playing pauses then resumes
/// WHY: The play/pause button must round-trip
#[tokio::test]
async fn given_playing_when_toggling_twice_then_playing_again() {
    // Given: A playing session
    let (player, calls) = FakePlayer::new();
    let mut session = PlaybackSession::new(player, READY_TIMEOUT);
    session
        .load(remote("1", "https://example.com/rain.mp3"))
        .await
        .unwrap();

    // When: Toggling twice
    let first = session.toggle_play_pause().await.unwrap();
    let paused_phase = session.state().phase;
    let second = session.toggle_play_pause().await.unwrap();

    // Then: Paused in between, Playing at the end
    assert_eq!(first, TransportOutcome::Paused);
    assert_eq!(paused_phase, PlaybackPhase::Paused);
    assert_eq!(second, TransportOutcome::Playing);
    assert!(session.state().is_playing());
    let calls = calls.lock().unwrap().clone();
    assert_eq!(calls[calls.len() - 2..], [PlayerCall::Pause, PlayerCall::Play]);
    session.release().await.unwrap();
}

/// WHAT: Toggling with nothing loaded is a reported no-op
/// WHY: The media key may be pressed before anything was played
#[tokio::test]
async fn given_empty_session_when_toggling_then_nothing_loaded_and_unchanged() {
    // Given: An empty session
    let (player, calls) = FakePlayer::new();
    let mut session = PlaybackSession::new(player, READY_TIMEOUT);

    // When: Toggling
    let outcome = session.toggle_play_pause().await.unwrap();

    // Then: Reported no-op, nothing current, player untouched
    assert_eq!(outcome, TransportOutcome::NothingLoaded);
    assert_eq!(session.state().current, None);
    assert!(calls.lock().unwrap().is_empty());
    session.release().await.unwrap();
}

/// WHAT: Loading a second entry replaces the first
/// WHY: Only one item may hold the shared player at a time
#[tokio::test]
async fn given_playing_when_loading_other_entry_then_previous_stopped_and_replaced() {
    // Given: A session playing a remote track
    let (player, calls) = FakePlayer::new();
    let mut session = PlaybackSession::new(player, READY_TIMEOUT);
    session
        .load(remote("1", "https://example.com/rain.mp3"))
        .await
        .unwrap();

    // When: Loading a local recording
    let recording = AudioEntry {
        id: "REC_bedtime_20240309_210507.mp3".to_string(),
        title: "bedtime".to_string(),
        category: AudioCategory::Recording,
        source: AudioSource::Local(PathBuf::from(
            "/data/recordings/REC_bedtime_20240309_210507.mp3",
        )),
        cover_id: None,
        duration_ms: 0,
    };
    session.load(recording.clone()).await.unwrap();

    // Then: Previous stopped before the new prepare, new entry current
    let calls = calls.lock().unwrap().clone();
    assert_eq!(calls[2], PlayerCall::Stop);
    assert!(matches!(&calls[3], PlayerCall::Prepare(locator) if locator.ends_with(".mp3")));
    assert_eq!(session.state().current, Some(recording));
    session.release().await.unwrap();
}

/// WHAT: Seek forwards to the player only when something is loaded
/// WHY: External controllers may seek at any time
#[tokio::test]
async fn given_loaded_and_empty_when_seeking_then_forwarded_only_when_loaded() {
    // Given: An empty session
    let (player, calls) = FakePlayer::new();
    let mut session = PlaybackSession::new(player, READY_TIMEOUT);

    // When/Then: Seeking while empty is ignored
    let ignored = session.seek(Duration::from_secs(30)).await.unwrap();
    assert_eq!(ignored, TransportOutcome::NothingLoaded);
    assert!(calls.lock().unwrap().is_empty());

    // When/Then: Seeking while playing reaches the player
    session
        .load(remote("1", "https://example.com/rain.mp3"))
        .await
        .unwrap();
    let outcome = session.seek(Duration::from_secs(30)).await.unwrap();
    assert_eq!(outcome, TransportOutcome::Playing);
    assert_eq!(
        calls.lock().unwrap().last(),
        Some(&PlayerCall::Seek(Duration::from_secs(30)))
    );
    session.release().await.unwrap();
}

/// WHAT: Release stops, frees once and rejects later operations
/// WHY: The shared player must not leak or be reused after teardown
#[tokio::test]
async fn given_playing_when_releasing_twice_then_released_once_and_later_ops_fail() {
    // Given: A playing session
    let (player, calls) = FakePlayer::new();
    let mut session = PlaybackSession::new(player, READY_TIMEOUT);
    session
        .load(remote("1", "https://example.com/rain.mp3"))
        .await
        .unwrap();

    // When: Releasing twice
    session.release().await.unwrap();
    session.release().await.unwrap();

    // Then: One release call, Empty state, later load rejected
    let releases = calls
        .lock()
        .unwrap()
        .iter()
        .filter(|call| **call == PlayerCall::Release)
        .count();
    assert_eq!(releases, 1);
    assert_eq!(session.state().phase, PlaybackPhase::Empty);
    let result = session
        .load(remote("2", "https://example.com/waves.mp3"))
        .await;
    assert!(matches!(result, Err(CoreError::SessionReleased { .. })));
}

/// WHAT: A source that plays to its end leaves the entry current but paused
/// WHY: The play button must reflect that nothing is audible any more
#[tokio::test]
async fn given_short_source_when_it_finishes_then_paused_with_entry_kept() {
    // Given: A session playing a source that ends right away
    let (player, _calls) = FakePlayer::new();
    let mut session = PlaybackSession::new(player, READY_TIMEOUT);
    let entry = remote("3", "https://example.com/short-chime.mp3");
    session.load(entry.clone()).await.unwrap();

    // When: Checking for the end of the source
    let changed = session.sync_finished().await;

    // Then: Paused, entry still current, a second check changes nothing
    assert!(changed);
    let state = session.state();
    assert_eq!(state.phase, PlaybackPhase::Paused);
    assert_eq!(state.current, Some(entry));
    assert!(!session.sync_finished().await);
    session.release().await.unwrap();
}

/// WHAT: Toggling after the source ended plays it again
/// WHY: A media-key press on a finished track should restart it, not pause
#[tokio::test]
async fn given_finished_source_when_toggling_then_played_again() {
    // Given: A short source that already reached its end
    let (player, calls) = FakePlayer::new();
    let mut session = PlaybackSession::new(player, READY_TIMEOUT);
    session
        .load(remote("3", "https://example.com/short-chime.mp3"))
        .await
        .unwrap();

    // When: Toggling without an explicit finish check first
    let outcome = session.toggle_play_pause().await.unwrap();

    // Then: Playing again via a fresh play, not a pause
    assert_eq!(outcome, TransportOutcome::Playing);
    let calls = calls.lock().unwrap().clone();
    assert_eq!(calls.last(), Some(&PlayerCall::Play));
    assert!(!calls.contains(&PlayerCall::Pause));
    session.release().await.unwrap();
}

/// WHAT: A player that cannot pause reports the error and keeps playing
/// WHY: A failed pause must not unload what is still audible
#[tokio::test]
async fn given_player_refusing_pause_when_pausing_then_error_and_still_playing() {
    // Given: A playing source whose player cannot pause
    let (player, calls) = FakePlayer::new();
    let mut session = PlaybackSession::new(player, READY_TIMEOUT);
    let entry = remote("4", "https://example.com/nopause.mp3");
    session.load(entry.clone()).await.unwrap();

    // When: Pausing
    let result = session.pause().await;

    // Then: Error reported, entry still current and playing, player not stopped
    assert!(matches!(result, Err(CoreError::PlaybackSourceError { .. })));
    let state = session.state();
    assert_eq!(state.phase, PlaybackPhase::Playing);
    assert_eq!(state.current, Some(entry));
    assert!(!calls.lock().unwrap().contains(&PlayerCall::Stop));
    session.release().await.unwrap();
}
