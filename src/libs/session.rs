//! Per-session state and the punishment ladder.
//!
//! [`SessionRecord`] is owned by the monitor and reset at every countdown
//! start. [`Punishment`] is a pure function of the distraction count.

use super::protocol::Command;
use std::fmt::{Display, Formatter};
use tokio::time::Instant;

/// Outcome reported to the device when the session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionResult {
    #[default]
    Success,
    Fail,
}

impl Display for SessionResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionResult::Success => write!(f, "success"),
            SessionResult::Fail => write!(f, "fail"),
        }
    }
}

/// Escalation tier keyed by the distraction count within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punishment {
    /// First distraction.
    Extend,
    /// Second distraction.
    ExtendAndLock,
    /// Third and every later distraction. Terminal for the session.
    EndSession,
}

impl Punishment {
    /// Tier for a post-increment count. `None` for zero.
    pub fn for_count(count: usize) -> Option<Self> {
        match count {
            0 => None,
            1 => Some(Punishment::Extend),
            2 => Some(Punishment::ExtendAndLock),
            _ => Some(Punishment::EndSession),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Punishment::Extend => "Session extended by 10 minutes",
            Punishment::ExtendAndLock => "Session extended by 20 min + Candy locked 10 min",
            Punishment::EndSession => "Session ended + Email sent + Candy locked 20 min",
        }
    }

    /// Device commands for this tier, in send order.
    pub fn commands(&self) -> Vec<Command> {
        match self {
            Punishment::Extend => vec![Command::Extend(10)],
            Punishment::ExtendAndLock => vec![Command::Extend(20), Command::CandyLock(10)],
            Punishment::EndSession => vec![Command::EndSession, Command::CandyLock(20)],
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Punishment::EndSession)
    }
}

/// State of the current (or last) focus session.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub session_active: bool,
    pub connection_lost: bool,
    pub current_punishment: String,
    pub result: SessionResult,
    pub previous_title: String,
    pub planned_duration_minutes: u32,
    pub last_heartbeat: Instant,
    distracting_titles: Vec<String>,
}

impl SessionRecord {
    pub fn new() -> Self {
        Self {
            session_active: false,
            connection_lost: false,
            current_punishment: String::new(),
            result: SessionResult::Success,
            previous_title: String::new(),
            planned_duration_minutes: 0,
            last_heartbeat: Instant::now(),
            distracting_titles: Vec::new(),
        }
    }

    /// Resets everything a new countdown invalidates and activates the session.
    ///
    /// Link state and the heartbeat clock belong to the connection, not the
    /// session, and are left alone.
    pub fn start(&mut self, planned_duration_minutes: u32) {
        self.session_active = true;
        self.result = SessionResult::Success;
        self.distracting_titles.clear();
        self.current_punishment.clear();
        self.previous_title.clear();
        self.planned_duration_minutes = planned_duration_minutes;
    }

    /// Records a distraction and returns the new count.
    pub fn record_distraction(&mut self, title: &str) -> usize {
        self.distracting_titles.push(title.to_string());
        self.distracting_titles.len()
    }

    /// Ends the session with a failing outcome.
    pub fn fail(&mut self) {
        self.session_active = false;
        self.result = SessionResult::Fail;
    }

    pub fn distraction_count(&self) -> usize {
        self.distracting_titles.len()
    }

    pub fn distracting_titles(&self) -> &[String] {
        &self.distracting_titles
    }
}

impl Default for SessionRecord {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_follow_count() {
        assert_eq!(Punishment::for_count(0), None);
        assert_eq!(Punishment::for_count(1), Some(Punishment::Extend));
        assert_eq!(Punishment::for_count(2), Some(Punishment::ExtendAndLock));
        assert_eq!(Punishment::for_count(3), Some(Punishment::EndSession));
        assert_eq!(Punishment::for_count(17), Some(Punishment::EndSession));
    }

    #[test]
    fn tier_commands() {
        assert_eq!(Punishment::Extend.commands(), vec![Command::Extend(10)]);
        assert_eq!(
            Punishment::ExtendAndLock.commands(),
            vec![Command::Extend(20), Command::CandyLock(10)]
        );
        assert_eq!(
            Punishment::EndSession.commands(),
            vec![Command::EndSession, Command::CandyLock(20)]
        );
        assert!(Punishment::EndSession.is_terminal());
        assert!(!Punishment::ExtendAndLock.is_terminal());
    }

    #[tokio::test]
    async fn start_resets_session_fields() {
        let mut record = SessionRecord::new();
        record.record_distraction("Reddit");
        record.fail();
        record.previous_title = "Reddit".to_string();
        record.current_punishment = "x".to_string();

        record.start(25);

        assert!(record.session_active);
        assert_eq!(record.result, SessionResult::Success);
        assert_eq!(record.distraction_count(), 0);
        assert!(record.distracting_titles().is_empty());
        assert!(record.previous_title.is_empty());
        assert!(record.current_punishment.is_empty());
        assert_eq!(record.planned_duration_minutes, 25);
    }

    #[tokio::test]
    async fn count_tracks_titles() {
        let mut record = SessionRecord::new();
        assert_eq!(record.record_distraction("a"), 1);
        assert_eq!(record.record_distraction("b"), 2);
        assert_eq!(record.distraction_count(), record.distracting_titles().len());
        assert_eq!(record.distracting_titles(), ["a", "b"]);
    }
}
