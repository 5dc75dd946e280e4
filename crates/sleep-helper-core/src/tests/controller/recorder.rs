use crate::{
    RecorderController, RecordingSession, RecordingTimeouts, Screen,
    tests::fakes::{BeginBehavior, FakeCapture, FinishBehavior},
};

fn controller(
    dir: &std::path::Path,
    begin: BeginBehavior,
    finish: FinishBehavior,
) -> (RecorderController, crate::tests::fakes::CaptureLog) {
    let (backend, log) = FakeCapture::new(begin, finish);
    let session = RecordingSession::new(backend, dir, RecordingTimeouts::default());
    (RecorderController::new(session), log)
}

/// WHAT: Start then stop goes recording -> idle with the file remembered
/// WHY: The recorder shows the last saved clip
#[tokio::test]
async fn given_recorder_when_start_then_stop_then_last_recording_set() {
    // Given: A recorder over a working backend
    let dir = tempfile::tempdir().unwrap();
    let (mut recorder, _log) =
        controller(dir.path(), BeginBehavior::Start, FinishBehavior::Finalize);

    // When: Starting
    recorder.start_recording("bedtime").await;

    // Then: Recording with an output file and a start time
    let recording = recorder.state();
    assert!(recording.is_recording);
    let output = recording.output.clone().unwrap();
    assert!(recording.started_at.is_some());
    assert!(recorder.elapsed().is_some());

    // When: Stopping
    recorder.stop_recording().await;

    // Then: Idle and the file is remembered
    let state = recorder.state();
    assert!(!state.is_recording);
    assert!(state.started_at.is_none());
    assert!(state.output.is_none());
    assert_eq!(state.last_recording, Some(output));
    assert!(state.warning.is_none());
}

/// WHAT: A second start shows an error but keeps the capture running
/// WHY: Double taps on record must not restart or leak the capture
#[tokio::test]
async fn given_recording_when_starting_again_then_error_and_still_recording() {
    // Given: A running capture
    let dir = tempfile::tempdir().unwrap();
    let (mut recorder, log) =
        controller(dir.path(), BeginBehavior::Start, FinishBehavior::Finalize);
    recorder.start_recording("bedtime").await;
    let first = recorder.state();

    // When: Starting again
    recorder.start_recording("again").await;

    // Then: Error shown, same capture running since the same moment
    let state = recorder.state();
    assert!(state.is_recording);
    assert_eq!(state.output, first.output);
    assert_eq!(state.started_at, first.started_at);
    assert!(state.error.is_some());
    assert_eq!(log.begins(), 1);
}

/// WHAT: A refused microphone leaves the recorder idle with an error
/// WHY: The UI must not show a recording that never started
#[tokio::test]
async fn given_refusing_microphone_when_starting_then_idle_with_error() {
    // Given: A backend that refuses
    let dir = tempfile::tempdir().unwrap();
    let (mut recorder, _log) =
        controller(dir.path(), BeginBehavior::Refuse, FinishBehavior::Finalize);

    // When: Starting
    recorder.start_recording("bedtime").await;

    // Then: Idle with an error
    let state = recorder.state();
    assert!(!state.is_recording);
    assert!(state.error.is_some());
}

/// WHAT: Incomplete finalize is a warning, not an error
/// WHY: Stopping too quickly must still return the recorder to idle
#[tokio::test]
async fn given_too_short_capture_when_stopping_then_warning_and_idle() {
    // Given: A capture whose finalize fails
    let dir = tempfile::tempdir().unwrap();
    let (mut recorder, _log) =
        controller(dir.path(), BeginBehavior::Start, FinishBehavior::TooShort);
    recorder.start_recording("quick").await;

    // When: Stopping
    recorder.stop_recording().await;

    // Then: Idle with a warning and the partial file remembered
    let state = recorder.state();
    assert!(!state.is_recording);
    assert!(state.warning.is_some());
    assert!(state.error.is_none());
    assert!(state.last_recording.is_some());
}

/// WHAT: Leaving the recorder force-stops the capture
/// WHY: A torn-down screen must not orphan the microphone
#[tokio::test]
async fn given_recording_when_exiting_screen_then_capture_stopped() {
    // Given: A running capture
    let dir = tempfile::tempdir().unwrap();
    let (mut recorder, log) =
        controller(dir.path(), BeginBehavior::Start, FinishBehavior::Finalize);
    recorder.on_enter().await;
    recorder.start_recording("bedtime").await;

    // When: The screen is torn down
    recorder.on_exit().await;

    // Then: Capture finished and released
    assert_eq!(log.finishes(), 1);
    assert_eq!(log.live(), 0);
    assert!(!recorder.state().is_recording);
}

/// WHAT: Leaving an idle recorder does nothing
/// WHY: Teardown must be safe regardless of UI state
#[tokio::test]
async fn given_idle_when_exiting_screen_then_nothing_finished() {
    // Given: An idle recorder
    let dir = tempfile::tempdir().unwrap();
    let (mut recorder, log) =
        controller(dir.path(), BeginBehavior::Start, FinishBehavior::Finalize);

    // When: The screen is torn down
    recorder.on_exit().await;

    // Then: No capture touched
    assert_eq!(log.finishes(), 0);
    assert!(!recorder.state().is_recording);
}
