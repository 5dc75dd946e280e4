use crate::{AppError, AppResult};

use std::panic::Location;

use error_location::ErrorLocation;

/// One line of console input, parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Go to the home screen.
    Home,
    /// Open the player screen for an entry.
    Play {
        /// Catalog id of the entry.
        id: String,
    },
    /// Pause or resume the current item.
    Toggle,
    /// Open the recorder screen and start a capture.
    Record {
        /// User-supplied recording name.
        name: String,
    },
    /// Stop the running capture.
    Stop,
    /// Print every catalog entry.
    List,
    /// Print the command summary.
    Help,
    /// Request application shutdown.
    Quit,
}

impl AppCommand {
    /// Command summary printed by `help`.
    pub const USAGE: &'static str = "\
Commands:
  home           show the catalog
  play <id>      play an entry
  toggle         pause or resume
  record <name>  start recording
  stop           stop recording
  list           list every entry with its id
  help           show this help
  quit           exit";

    /// Parse one input line. Blank lines yield `None`.
    ///
    /// The argument of `play` and `record` is the rest of the line, so
    /// recording names may contain spaces.
    #[track_caller]
    pub fn parse(line: &str) -> AppResult<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "home" => AppCommand::Home,
            "play" => AppCommand::Play {
                id: required(verb, rest)?,
            },
            "toggle" | "pause" => AppCommand::Toggle,
            "record" => AppCommand::Record {
                name: required(verb, rest)?,
            },
            "stop" => AppCommand::Stop,
            "list" | "ls" => AppCommand::List,
            "help" | "?" => AppCommand::Help,
            "quit" | "exit" => AppCommand::Quit,
            _ => {
                return Err(AppError::InvalidCommand {
                    input: line.to_string(),
                    reason: "Unknown command".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        Ok(Some(command))
    }
}

#[track_caller]
fn required(verb: &str, rest: &str) -> AppResult<String> {
    if rest.is_empty() {
        return Err(AppError::InvalidCommand {
            input: verb.to_string(),
            reason: format!("Usage: {verb} <{}>", if verb == "play" { "id" } else { "name" }),
            location: ErrorLocation::from(Location::caller()),
        });
    }
    Ok(rest.to_string())
}
