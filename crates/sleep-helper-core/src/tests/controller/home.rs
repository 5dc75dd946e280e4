use crate::{
    AudioCategory, CatalogStore, HomeController, HomeState, Screen, tests::fakes::touch,
};

use std::sync::Arc;

/// WHAT: Entering home fills all three categories
/// WHY: The home screen shows every list on first paint
#[tokio::test]
async fn given_catalog_when_entering_home_then_all_lists_loaded() {
    // Given: Two recordings on disk
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "REC_bedtime_20240309_210507.mp3");
    touch(dir.path(), "REC_grandma_20240310_200000.mp3");
    let mut home = HomeController::new(Arc::new(CatalogStore::new(dir.path(), "mp3")));

    // When: The screen becomes visible
    home.on_enter().await;

    // Then: Every category populated, loading finished
    let state = home.state();
    assert_eq!(state.white_noise.len(), 3);
    assert_eq!(state.stories.len(), 2);
    assert_eq!(state.list(AudioCategory::Recording).len(), 2);
    assert!(!state.is_loading);
    assert!(state.error.is_none());
}

/// WHAT: Reloading twice without storage changes gives identical state
/// WHY: Reload on every visit must be idempotent
#[tokio::test]
async fn given_unchanged_storage_when_reloading_twice_then_identical_state() {
    // Given: A loaded home controller
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "REC_bedtime_20240309_210507.mp3");
    let home = HomeController::new(Arc::new(CatalogStore::new(dir.path(), "mp3")));
    home.load_data().await;
    let first = home.state();

    // When: Reloading again
    home.load_data().await;
    let second = home.state();

    // Then: Same state both times
    assert_eq!(first, second);
}

/// WHAT: Re-entering home surfaces recordings made since the last visit
/// WHY: New clips must appear when the parent returns from the recorder
#[tokio::test]
async fn given_new_recording_when_reentering_home_then_listed() {
    // Given: A home visit with no recordings
    let dir = tempfile::tempdir().unwrap();
    let mut home = HomeController::new(Arc::new(CatalogStore::new(dir.path(), "mp3")));
    home.on_enter().await;
    assert!(home.state().recordings.is_empty());

    // When: A recording appears and the screen is entered again
    touch(dir.path(), "REC_bedtime_20240309_210507.mp3");
    home.on_exit().await;
    home.on_enter().await;

    // Then: The new recording is listed
    let recordings = home.state().recordings;
    assert_eq!(recordings.len(), 1);
    assert_eq!(recordings[0].title, "bedtime");
}

/// WHAT: Category updates are published in WhiteNoise, Story, Recording order
/// WHY: Later categories must never be visible before earlier ones
#[tokio::test]
async fn given_subscriber_when_loading_then_categories_published_in_order() {
    // Given: A subscriber on a fresh controller
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "REC_bedtime_20240309_210507.mp3");
    let home = HomeController::new(Arc::new(CatalogStore::new(dir.path(), "mp3")));
    let mut rx = home.subscribe();

    // Collect every snapshot published during a load.
    let observer = tokio::spawn(async move {
        let mut seen: Vec<HomeState> = Vec::new();
        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update().clone();
            let done = !state.is_loading && !state.recordings.is_empty();
            seen.push(state);
            if done {
                break;
            }
        }
        seen
    });

    // When: Loading
    home.load_data().await;
    let seen = observer.await.unwrap();

    // Then: No snapshot shows a later category filled before an earlier one
    assert!(!seen.is_empty());
    for state in &seen {
        if !state.recordings.is_empty() {
            assert!(!state.stories.is_empty());
        }
        if !state.stories.is_empty() {
            assert!(!state.white_noise.is_empty());
        }
    }
    assert!(!seen.last().unwrap().is_loading);
}

/// WHAT: A broken recordings location reports an error but keeps bundled lists
/// WHY: Storage problems must not blank the whole home screen
#[tokio::test]
async fn given_unreadable_recordings_path_when_loading_then_error_and_bundled_kept() {
    // Given: A recordings "directory" that is actually a file
    let dir = tempfile::tempdir().unwrap();
    let blocker = touch(dir.path(), "blocker");
    let home = HomeController::new(Arc::new(CatalogStore::new(blocker, "mp3")));

    // When: Loading
    home.load_data().await;

    // Then: Bundled lists present, error reported, not stuck loading
    let state = home.state();
    assert_eq!(state.white_noise.len(), 3);
    assert!(state.recordings.is_empty());
    assert!(state.error.is_some());
    assert!(!state.is_loading);
}
