use crate::{
    CatalogStore, CoreError, HostHandle, MediaHost, PlaybackPhase, PlaybackSession,
    TransportOutcome,
    tests::fakes::{FakePlayer, PlayerCall, touch},
};

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::task::JoinHandle;

fn spawn_host(dir: &std::path::Path) -> (HostHandle, JoinHandle<()>, Arc<Mutex<Vec<PlayerCall>>>) {
    let (player, calls) = FakePlayer::new();
    let session = PlaybackSession::new(player, Duration::from_secs(3));
    let catalog = Arc::new(CatalogStore::new(dir, "mp3"));
    let (handle, task) = MediaHost::spawn(session, catalog);
    (handle, task, calls)
}

fn release_count(calls: &Arc<Mutex<Vec<PlayerCall>>>) -> usize {
    calls
        .lock()
        .unwrap()
        .iter()
        .filter(|call| **call == PlayerCall::Release)
        .count()
}

/// WHAT: Loading a bundled id through the host starts playback
/// WHY: Screens address playback by catalog id only
#[tokio::test]
async fn given_bundled_id_when_loading_through_host_then_playing() {
    // Given: A running host
    let dir = tempfile::tempdir().unwrap();
    let (handle, task, _calls) = spawn_host(dir.path());

    // When: Loading bundled entry "4"
    let entry = handle.load("4").await.unwrap();

    // Then: The handle observes the entry playing
    assert_eq!(entry.title, "小红帽");
    let state = handle.state();
    assert_eq!(state.current_id(), Some("4"));
    assert!(state.is_playing());

    handle.shutdown().await.unwrap();
    task.await.unwrap();
}

/// WHAT: Unknown ids return NotFound without touching the player
/// WHY: A stale id must not disturb what is currently playing
#[tokio::test]
async fn given_unknown_id_when_loading_through_host_then_not_found_and_state_kept() {
    // Given: A host playing entry "1"
    let dir = tempfile::tempdir().unwrap();
    let (handle, task, calls) = spawn_host(dir.path());
    handle.load("1").await.unwrap();
    let calls_before = calls.lock().unwrap().len();

    // When: Loading an id that does not exist
    let result = handle.load("REC_gone_20240101_000000.mp3").await;

    // Then: NotFound and the current item keeps playing
    assert!(matches!(result, Err(CoreError::NotFound { .. })));
    assert_eq!(calls.lock().unwrap().len(), calls_before);
    assert_eq!(handle.state().current_id(), Some("1"));

    handle.shutdown().await.unwrap();
    task.await.unwrap();
}

/// WHAT: Clones of the handle drive the same player
/// WHY: Media keys and the player screen share one session
#[tokio::test]
async fn given_cloned_handle_when_toggling_then_original_observes_pause() {
    // Given: A host playing through one handle
    let dir = tempfile::tempdir().unwrap();
    let (handle, task, _calls) = spawn_host(dir.path());
    let media_keys = handle.clone();
    handle.load("2").await.unwrap();

    // When: The clone toggles
    let outcome = media_keys.toggle_play_pause().await.unwrap();

    // Then: The original handle sees the pause
    assert_eq!(outcome, TransportOutcome::Paused);
    assert_eq!(handle.state().phase, PlaybackPhase::Paused);
    assert_eq!(handle.play().await.unwrap(), TransportOutcome::Playing);
    assert_eq!(handle.pause().await.unwrap(), TransportOutcome::Paused);

    handle.shutdown().await.unwrap();
    task.await.unwrap();
}

/// WHAT: Shutdown releases once and later requests fail
/// WHY: The boundary owns the player for its whole lifetime
#[tokio::test]
async fn given_running_host_when_shutdown_then_released_once_and_unavailable() {
    // Given: A host with something playing
    let dir = tempfile::tempdir().unwrap();
    let (handle, task, calls) = spawn_host(dir.path());
    handle.load("3").await.unwrap();

    // When: Shutting down and waiting for the task
    handle.shutdown().await.unwrap();
    task.await.unwrap();

    // Then: One release, Empty state, requests rejected
    assert_eq!(release_count(&calls), 1);
    assert_eq!(handle.state().phase, PlaybackPhase::Empty);
    let result = handle.toggle_play_pause().await;
    assert!(matches!(result, Err(CoreError::HostUnavailable { .. })));
}

/// WHAT: Dropping every handle releases the player
/// WHY: The player must not leak if the shell exits without shutdown
#[tokio::test]
async fn given_all_handles_dropped_when_host_drains_then_released() {
    // Given: A host with one handle
    let dir = tempfile::tempdir().unwrap();
    let (handle, task, calls) = spawn_host(dir.path());
    handle.load("5").await.unwrap();

    // When: Dropping the only handle
    drop(handle);
    task.await.unwrap();

    // Then: Released exactly once
    assert_eq!(release_count(&calls), 1);
}

/// WHAT: The host notices on its own when a playing source reaches its end
/// WHY: Observers must not show Playing for a track that already stopped
#[tokio::test(start_paused = true)]
async fn given_short_recording_when_it_ends_then_host_publishes_paused() {
    // Given: A host playing a recording that ends right away
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "REC_short_20240101_000000.mp3");
    let (handle, task, _calls) = spawn_host(dir.path());
    let mut rx = handle.subscribe();
    handle.load("REC_short_20240101_000000.mp3").await.unwrap();

    // When: Waiting for the next published change without sending commands
    let state = tokio::time::timeout(
        Duration::from_secs(5),
        rx.wait_for(|state| state.phase == PlaybackPhase::Paused),
    )
    .await
    .unwrap()
    .unwrap()
    .clone();

    // Then: Paused with the recording still current
    assert_eq!(state.current_id(), Some("REC_short_20240101_000000.mp3"));

    handle.shutdown().await.unwrap();
    task.await.unwrap();
}
