use sleep_helper_core::{
    AudioCategory, AudioEntry, HomeController, HomeState, PlayerController, PlayerState,
    RecorderController, RecorderState, Screen,
};

use std::{fmt::Write, time::Duration};

/// The screen the console is currently showing.
///
/// Each variant owns the controller built for this visit; navigating away
/// drops it after `on_exit`.
pub enum ActiveScreen {
    /// Catalog lists.
    Home(HomeController),
    /// Now-playing view.
    Player(PlayerController),
    /// Capture view.
    Recorder(RecorderController),
}

impl ActiveScreen {
    /// Short name for logs and the prompt.
    pub fn name(&self) -> &'static str {
        match self {
            ActiveScreen::Home(_) => "home",
            ActiveScreen::Player(_) => "player",
            ActiveScreen::Recorder(_) => "recorder",
        }
    }

    /// Lifecycle hooks of the wrapped controller.
    pub fn as_screen_mut(&mut self) -> &mut dyn Screen {
        match self {
            ActiveScreen::Home(controller) => controller,
            ActiveScreen::Player(controller) => controller,
            ActiveScreen::Recorder(controller) => controller,
        }
    }

    /// Text rendering of the controller's current state.
    ///
    /// The player is re-read from the media host first, since media keys and
    /// the end of a track change playback without going through the screen.
    pub fn render(&self) -> String {
        match self {
            ActiveScreen::Home(controller) => render_home(&controller.state()),
            ActiveScreen::Player(controller) => {
                controller.refresh();
                render_player(&controller.state())
            }
            ActiveScreen::Recorder(controller) => {
                render_recorder(&controller.state(), controller.elapsed())
            }
        }
    }
}

pub(crate) fn render_home(state: &HomeState) -> String {
    let mut out = String::new();

    if state.is_loading {
        out.push_str("Loading...\n");
    }
    for category in AudioCategory::ALL {
        let _ = writeln!(out, "== {} ==", category.display_name());
        let entries = state.list(category);
        if entries.is_empty() {
            out.push_str("  (empty)\n");
        }
        for entry in entries {
            let _ = writeln!(out, "{}", entry_line(entry));
        }
    }
    if let Some(error) = &state.error {
        let _ = writeln!(out, "! {error}");
    }

    out
}

pub(crate) fn render_player(state: &PlayerState) -> String {
    let mut out = String::new();

    match &state.current {
        Some(entry) => {
            let status = if state.is_loading {
                "loading"
            } else if state.is_playing {
                "playing"
            } else {
                "paused"
            };
            let _ = writeln!(out, "[{status}] {}", entry.title);
            let _ = writeln!(out, "  {}", entry.source);
        }
        None if state.is_loading => out.push_str("[loading]\n"),
        None => out.push_str("Nothing loaded\n"),
    }
    if let Some(error) = &state.error {
        let _ = writeln!(out, "! {error}");
    }

    out
}

pub(crate) fn render_recorder(state: &RecorderState, elapsed: Option<Duration>) -> String {
    let mut out = String::new();

    if state.is_recording {
        let secs = elapsed.map(|d| d.as_secs()).unwrap_or_default();
        let _ = writeln!(out, "● Recording {:02}:{:02}", secs / 60, secs % 60);
        if let Some(output) = &state.output {
            let _ = writeln!(out, "  {}", output.display());
        }
    } else {
        out.push_str("Not recording\n");
    }
    if let Some(last) = &state.last_recording {
        let _ = writeln!(out, "Saved {}", last.display());
    }
    if let Some(warning) = &state.warning {
        let _ = writeln!(out, "~ {warning}");
    }
    if let Some(error) = &state.error {
        let _ = writeln!(out, "! {error}");
    }

    out
}

pub(crate) fn entry_line(entry: &AudioEntry) -> String {
    format!("  [{}] {}", entry.id, entry.title)
}
