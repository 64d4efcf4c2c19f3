//! Line protocol spoken with the session microcontroller.
//!
//! Every message is a single newline-terminated line of text. Inbound lines
//! are parsed into [`Inbound`]; outbound lines are built from [`Command`],
//! whose `Display` implementation is the exact wire form (without the
//! trailing newline, which the transport appends).

use super::session::SessionResult;
use std::fmt::{Display, Formatter, Result};

/// Marker the device prints when the user starts a countdown.
const COUNTDOWN_MARKER: &str = "Starting countdown for";

/// Maximum number of title characters sent in a `distraction_` line.
pub const TITLE_LIMIT: usize = 20;

/// A line received from the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// Reply to our `heartbeat`.
    HeartbeatOk,
    /// The tamper sensor on the candy door fired.
    TamperAlert,
    /// A focus countdown started. `minutes` is `None` when the line could
    /// not be read as `... for <N> minutes`.
    CountdownStarted { minutes: Option<u32> },
    /// The countdown finished (or the device ended it early).
    Done,
    /// Debug chatter and anything else the device prints.
    Other(String),
}

impl Inbound {
    /// Parses one line. Exact tags are matched before the countdown marker.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        match line {
            "heartbeat_ok" => Inbound::HeartbeatOk,
            "tamper_email" => Inbound::TamperAlert,
            "done" => Inbound::Done,
            _ if line.contains(COUNTDOWN_MARKER) => Inbound::CountdownStarted {
                minutes: parse_countdown_minutes(line),
            },
            _ => Inbound::Other(line.to_string()),
        }
    }
}

/// Extracts the integer between `"for "` and `" minutes"`.
fn parse_countdown_minutes(line: &str) -> Option<u32> {
    let (_, rest) = line.split_once("for ")?;
    let (number, _) = rest.split_once(" minutes")?;
    number.trim().parse().ok()
}

/// A line sent to the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Heartbeat,
    Buzzer,
    Distraction { count: usize, title: String },
    Extend(u32),
    CandyLock(u32),
    EndSession,
    Summary(usize),
    Result(SessionResult),
}

impl Command {
    /// Builds a distraction line, cutting the title to [`TITLE_LIMIT`] characters.
    pub fn distraction(count: usize, title: &str) -> Self {
        Command::Distraction {
            count,
            title: title.chars().take(TITLE_LIMIT).collect(),
        }
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Command::Heartbeat => write!(f, "heartbeat"),
            Command::Buzzer => write!(f, "buzzer"),
            Command::Distraction { count, title } => write!(f, "distraction_{}_{}", count, title),
            Command::Extend(minutes) => write!(f, "extend_{}", minutes),
            Command::CandyLock(minutes) => write!(f, "candy_lock_{}", minutes),
            Command::EndSession => write!(f, "end_session"),
            Command::Summary(count) => write!(f, "summary_{}", count),
            Command::Result(result) => write!(f, "{}", result),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_tags_are_recognized() {
        assert_eq!(Inbound::parse("heartbeat_ok"), Inbound::HeartbeatOk);
        assert_eq!(Inbound::parse("tamper_email\r"), Inbound::TamperAlert);
        assert_eq!(Inbound::parse("done"), Inbound::Done);
    }

    #[test]
    fn tags_are_case_sensitive() {
        assert_eq!(Inbound::parse("DONE"), Inbound::Other("DONE".to_string()));
        assert_eq!(Inbound::parse("Heartbeat_OK"), Inbound::Other("Heartbeat_OK".to_string()));
    }

    #[test]
    fn countdown_marker_matches_anywhere_in_line() {
        assert_eq!(
            Inbound::parse("Starting countdown for 25 minutes"),
            Inbound::CountdownStarted { minutes: Some(25) }
        );
        assert_eq!(
            Inbound::parse(">> Starting countdown for 5 minutes now"),
            Inbound::CountdownStarted { minutes: Some(5) }
        );
    }

    #[test]
    fn malformed_countdown_still_starts_a_session() {
        assert_eq!(
            Inbound::parse("Starting countdown for banana minutes"),
            Inbound::CountdownStarted { minutes: None }
        );
        assert_eq!(
            Inbound::parse("Starting countdown for 20 seconds"),
            Inbound::CountdownStarted { minutes: None }
        );
    }

    #[test]
    fn firmware_chatter_is_other() {
        assert_eq!(
            Inbound::parse("Received: heartbeat"),
            Inbound::Other("Received: heartbeat".to_string())
        );
    }

    #[test]
    fn commands_render_wire_form() {
        assert_eq!(Command::Heartbeat.to_string(), "heartbeat");
        assert_eq!(Command::Extend(10).to_string(), "extend_10");
        assert_eq!(Command::CandyLock(20).to_string(), "candy_lock_20");
        assert_eq!(Command::EndSession.to_string(), "end_session");
        assert_eq!(Command::Summary(2).to_string(), "summary_2");
        assert_eq!(Command::Result(SessionResult::Fail).to_string(), "fail");
        assert_eq!(Command::Result(SessionResult::Success).to_string(), "success");
    }

    #[test]
    fn distraction_title_is_truncated_by_characters() {
        let cmd = Command::distraction(3, "YouTube - Funny cats compilation 2024");
        assert_eq!(cmd.to_string(), "distraction_3_YouTube - Funny cats");

        let cmd = Command::distraction(1, "ümlaut ünïcödé títlé ovér twenty");
        let Command::Distraction { title, .. } = cmd else { unreachable!() };
        assert_eq!(title.chars().count(), TITLE_LIMIT);
    }
}
