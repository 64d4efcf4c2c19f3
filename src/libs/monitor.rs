//! The focus session state machine.
//!
//! A [`Monitor`] owns the device link and the [`SessionRecord`] and drives
//! everything from one strictly sequential loop:
//!
//! 1. probe link health; on failure mark the connection lost, back off and reconnect
//! 2. handle at most one line from the device
//! 3. while a session is active, check the focused window and classify new titles
//! 4. sleep for the poll interval
//!
//! Only this loop mutates the record. Emails and dialogs go through the
//! [`Dispatcher`] with owned snapshots of whatever they need.

use crate::libs::classifier::Classifier;
use crate::libs::config::MonitorConfig;
use crate::libs::focus::FocusSource;
use crate::libs::messages::Message;
use crate::libs::notifier::{Dialog, Dispatcher, Email, Notifier};
use crate::libs::protocol::{Command, Inbound};
use crate::libs::session::{Punishment, SessionRecord};
use crate::libs::transport::{Connector, Transport};
use crate::{msg_debug, msg_error, msg_info, msg_print, msg_success, msg_warning};
use anyhow::Result;
use chrono::Local;
use std::sync::Arc;
use tokio::time::{self, Instant};

/// External pieces the monitor talks to.
pub struct Collaborators<K> {
    pub connector: Box<dyn Connector>,
    pub classifier: K,
    pub focus: Box<dyn FocusSource>,
    pub notifier: Arc<dyn Notifier>,
}

pub struct Monitor<K: Classifier> {
    config: MonitorConfig,
    subject_name: String,
    connector: Box<dyn Connector>,
    link: Option<Box<dyn Transport>>,
    classifier: K,
    focus: Box<dyn FocusSource>,
    dispatcher: Dispatcher,
    session: SessionRecord,
    reconnect_attempts: u64,
}

impl<K: Classifier> Monitor<K> {
    /// Creates a monitor with no open link. Call [`Monitor::connect`] before [`Monitor::run`].
    pub fn new(config: MonitorConfig, parts: Collaborators<K>) -> Self {
        Monitor {
            config,
            subject_name: crate::libs::config::DEFAULT_SUBJECT.to_string(),
            connector: parts.connector,
            link: None,
            classifier: parts.classifier,
            focus: parts.focus,
            dispatcher: Dispatcher::new(parts.notifier),
            session: SessionRecord::new(),
            reconnect_attempts: 0,
        }
    }

    /// Name used for the monitored person in alert emails.
    pub fn with_subject_name(mut self, name: impl Into<String>) -> Self {
        self.subject_name = name.into();
        self
    }

    pub fn session(&self) -> &SessionRecord {
        &self.session
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn link_name(&self) -> Option<&str> {
        self.link.as_ref().map(|link| link.name())
    }

    /// Opens a fresh link and waits for the board to finish resetting.
    ///
    /// On success the connection is healthy again and the heartbeat clock restarts.
    pub async fn connect(&mut self) -> bool {
        match self.connector.connect() {
            Ok(link) => {
                msg_success!(Message::LinkConnected(link.name().to_string()));
                self.link = Some(link);
                time::sleep(self.config.settle_time()).await;
                self.session.connection_lost = false;
                self.session.last_heartbeat = Instant::now();
                true
            }
            Err(e) => {
                msg_error!(Message::LinkOpenFailed(e.to_string()));
                false
            }
        }
    }

    /// Closes whatever link is left and opens a new one.
    pub async fn reconnect(&mut self) -> bool {
        self.reconnect_attempts += 1;
        msg_info!(Message::LinkReconnecting(self.reconnect_attempts));
        self.close_link();
        let connected = self.connect().await;
        if connected {
            self.reconnect_attempts = 0;
            msg_success!(Message::LinkReconnected);
        } else {
            msg_warning!(Message::LinkReconnectFailed);
        }
        connected
    }

    /// Sends a heartbeat when one is due and reports whether the link is open.
    pub fn probe(&mut self) -> bool {
        let Some(link) = self.link.as_mut() else {
            return false;
        };
        if self.session.last_heartbeat.elapsed() > self.config.heartbeat_interval() {
            if let Err(e) = link.write_line(&Command::Heartbeat.to_string()) {
                msg_debug!(Message::LinkProbeFailed(e.to_string()));
                return false;
            }
            self.session.last_heartbeat = Instant::now();
            msg_debug!(Message::HeartbeatSent);
        }
        link.is_open()
    }

    /// Marks the connection lost. Only the first call after a healthy period has any effect.
    ///
    /// Losing the device mid-session is treated as a cheating attempt: the
    /// session fails and the guardian is told.
    pub fn on_connection_lost(&mut self) {
        if self.session.connection_lost {
            return;
        }
        self.session.connection_lost = true;
        msg_error!(Message::LinkLost);

        if self.session.session_active {
            self.session.fail();
            msg_error!(Message::LinkLostDuringSession);
            self.dispatcher.dialog(Dialog::disconnected());
            self.dispatcher.email(Email::disconnection(
                &self.subject_name,
                self.session.distracting_titles(),
                Local::now(),
            ));
        }
    }

    /// Reacts to one line from the device.
    pub async fn handle_line(&mut self, line: &str) {
        match Inbound::parse(line) {
            Inbound::HeartbeatOk => {}
            Inbound::TamperAlert => {
                msg_error!(Message::TamperDetected);
                self.dispatcher.email(Email::tamper_alert(Local::now()));
                self.dispatcher.dialog(Dialog::tamper());
            }
            Inbound::CountdownStarted { minutes } => {
                let minutes = minutes.unwrap_or_else(|| {
                    msg_warning!(Message::SessionDurationUnparsed(line.trim().to_string()));
                    0
                });
                self.session.start(minutes);
                msg_info!(Message::SessionStarted(minutes));
            }
            Inbound::Done => self.finish_session().await,
            Inbound::Other(text) => msg_debug!(Message::LinkLineIgnored(text)),
        }
    }

    async fn finish_session(&mut self) {
        msg_info!(Message::SessionCompleted);
        self.session.session_active = false;

        let count = self.session.distraction_count();
        if count > 0 {
            msg_info!(Message::SessionSummary(count));
            if self.link_healthy() {
                self.send(Command::Summary(count));
                time::sleep(self.config.summary_delay()).await;
            }
        }
        if self.link_healthy() {
            self.send(Command::Result(self.session.result));
        }
        msg_info!(Message::SessionResult(self.session.result.to_string()));
    }

    /// Classifies the focused window if it changed since the last check.
    pub async fn poll_focus(&mut self) {
        if !self.session.session_active || self.session.connection_lost {
            return;
        }
        let title = match self.focus.active_title() {
            Ok(Some(title)) => title,
            Ok(None) => return,
            Err(e) => {
                msg_debug!(Message::FocusQueryFailed(e.to_string()));
                return;
            }
        };
        if title == self.session.previous_title {
            return;
        }

        msg_print!(Message::FocusMonitoring(title.clone()));
        self.session.previous_title = title.clone();

        // Classifier outages fail open
        let distracting = match self.classifier.is_distracting(&title).await {
            Ok(verdict) => verdict,
            Err(e) => {
                msg_warning!(Message::ClassifierFailed(e.to_string()));
                false
            }
        };
        if distracting {
            self.punish(&title);
        }
    }

    fn punish(&mut self, title: &str) {
        let count = self.session.record_distraction(title);
        let Some(punishment) = Punishment::for_count(count) else {
            return;
        };
        self.session.current_punishment = punishment.description().to_string();
        msg_error!(Message::DistractionDetected(count, title.to_string()));

        if let Err(e) = self.focus.close_active() {
            msg_warning!(Message::FocusCloseFailed(e.to_string()));
        }

        if self.link_healthy() {
            self.send(Command::Buzzer);
            self.send(Command::distraction(count, title));
        }
        self.dispatcher
            .dialog(Dialog::distraction_warning(count, punishment.description()));

        if !self.link_healthy() {
            msg_warning!(Message::PunishmentSkippedLinkDown);
            return;
        }
        if punishment.is_terminal() {
            self.dispatcher.email(Email::too_many_distractions(
                &self.subject_name,
                self.session.distracting_titles(),
            ));
        }
        for command in punishment.commands() {
            self.send(command);
        }
        msg_warning!(Message::PunishmentApplied(punishment.description().to_string()));

        if punishment.is_terminal() {
            self.session.fail();
            msg_error!(Message::SessionEndedByDistractions(count));
        }
    }

    /// One loop iteration. Returns `false` when the link was down and a
    /// recovery attempt ran instead of normal processing.
    pub async fn tick(&mut self) -> bool {
        if !self.probe() {
            self.on_connection_lost();
            time::sleep(self.config.reconnect_backoff()).await;
            self.reconnect().await;
            return false;
        }

        let received = self.link.as_mut().map(|link| link.try_read_line());
        match received {
            Some(Ok(Some(line))) => {
                msg_debug!(Message::LinkLineReceived(line.clone()));
                self.handle_line(&line).await;
            }
            Some(Err(e)) => msg_error!(Message::LinkReadFailed(e.to_string())),
            Some(Ok(None)) | None => {}
        }

        self.poll_focus().await;
        true
    }

    /// Runs until the surrounding task is dropped.
    pub async fn run(&mut self) -> Result<()> {
        msg_info!(Message::MonitorStarted {
            port: self.link_name().unwrap_or("-").to_string(),
            poll_interval: self.config.poll_interval,
        });
        msg_print!(Message::MonitorAwaitingSession);
        msg_print!(Message::MonitorTamperGuardActive);

        loop {
            if self.tick().await {
                time::sleep(self.config.poll_interval()).await;
            }
        }
    }

    /// Closes the link. Used on operator interrupt.
    pub fn shutdown(&mut self) {
        self.close_link();
        msg_info!(Message::LinkClosed);
    }

    fn close_link(&mut self) {
        if let Some(mut link) = self.link.take() {
            let _ = link.close();
        }
    }

    /// Healthy means not marked lost and the transport reports open.
    fn link_healthy(&self) -> bool {
        !self.session.connection_lost && self.link.as_ref().is_some_and(|link| link.is_open())
    }

    /// Writes one command. Failures are logged; the transport then reports
    /// closed and the next probe starts recovery.
    fn send(&mut self, command: Command) {
        let Some(link) = self.link.as_mut() else {
            return;
        };
        if let Err(e) = link.write_line(&command.to_string()) {
            msg_error!(Message::LinkWriteFailed(e.to_string()));
        }
    }
}
