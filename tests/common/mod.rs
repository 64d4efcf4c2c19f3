//! In-memory stand-ins for the device, classifier, desktop and notifier.
#![allow(dead_code)]

use anyhow::{anyhow, Result};
use focuswarden::libs::classifier::{Classifier, ClassifierError};
use focuswarden::libs::config::MonitorConfig;
use focuswarden::libs::focus::FocusSource;
use focuswarden::libs::monitor::{Collaborators, Monitor};
use focuswarden::libs::notifier::{Dialog, Email, Notifier};
use focuswarden::libs::transport::{Connector, LinkError, Transport};
use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};
use std::io;
use std::sync::Arc;
use test_context::AsyncTestContext;

/// Both ends of the fake serial cable.
#[derive(Default)]
pub struct Wire {
    pub written: Vec<String>,
    pub inbound: VecDeque<String>,
    /// Device present; `connect()` succeeds only while true.
    pub plugged: bool,
    /// Current transport reports open.
    pub open: bool,
    /// Next write fails and closes the transport.
    pub fail_writes: bool,
    pub connects: usize,
    pub closes: usize,
}

pub type SharedWire = Arc<Mutex<Wire>>;

pub struct FakeTransport {
    wire: SharedWire,
}

impl Transport for FakeTransport {
    fn write_line(&mut self, line: &str) -> Result<(), LinkError> {
        let mut wire = self.wire.lock();
        if !wire.open {
            return Err(LinkError::Closed);
        }
        if wire.fail_writes {
            wire.open = false;
            return Err(LinkError::Io(io::Error::new(io::ErrorKind::BrokenPipe, "unplugged")));
        }
        wire.written.push(line.to_string());
        Ok(())
    }

    fn try_read_line(&mut self) -> Result<Option<String>, LinkError> {
        let mut wire = self.wire.lock();
        if !wire.open {
            return Err(LinkError::Closed);
        }
        Ok(wire.inbound.pop_front())
    }

    fn is_open(&self) -> bool {
        self.wire.lock().open
    }

    fn close(&mut self) -> Result<(), LinkError> {
        let mut wire = self.wire.lock();
        wire.open = false;
        wire.closes += 1;
        Ok(())
    }

    fn name(&self) -> &str {
        "fake0"
    }
}

pub struct FakeConnector {
    wire: SharedWire,
}

impl Connector for FakeConnector {
    fn connect(&self) -> Result<Box<dyn Transport>, LinkError> {
        let mut wire = self.wire.lock();
        if !wire.plugged {
            return Err(LinkError::Io(io::Error::new(io::ErrorKind::NotFound, "no such device")));
        }
        wire.open = true;
        wire.connects += 1;
        Ok(Box::new(FakeTransport {
            wire: Arc::clone(&self.wire),
        }))
    }
}

/// Titles listed in `distracting` are distractions; titles in `failing` error out.
#[derive(Default)]
pub struct Verdicts {
    pub distracting: HashSet<String>,
    pub failing: HashSet<String>,
    pub asked: Vec<String>,
}

pub struct FakeClassifier {
    verdicts: Arc<Mutex<Verdicts>>,
}

impl Classifier for FakeClassifier {
    async fn is_distracting(&self, title: &str) -> Result<bool, ClassifierError> {
        let mut verdicts = self.verdicts.lock();
        verdicts.asked.push(title.to_string());
        if verdicts.failing.contains(title) {
            return Err(ClassifierError::EmptyReply);
        }
        Ok(verdicts.distracting.contains(title))
    }
}

#[derive(Default)]
pub struct Desktop {
    pub title: Option<String>,
    pub broken: bool,
    pub closes: usize,
}

pub struct FakeFocus {
    desktop: Arc<Mutex<Desktop>>,
}

impl FocusSource for FakeFocus {
    fn active_title(&self) -> Result<Option<String>> {
        let desktop = self.desktop.lock();
        if desktop.broken {
            return Err(anyhow!("no display"));
        }
        Ok(desktop.title.clone())
    }

    fn close_active(&self) -> Result<()> {
        self.desktop.lock().closes += 1;
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub emails: Mutex<Vec<Email>>,
    pub dialogs: Mutex<Vec<Dialog>>,
}

impl Notifier for RecordingNotifier {
    fn send_email(&self, email: &Email) -> Result<()> {
        self.emails.lock().push(email.clone());
        Ok(())
    }

    fn show_dialog(&self, dialog: &Dialog) -> Result<()> {
        self.dialogs.lock().push(dialog.clone());
        Ok(())
    }
}

pub struct Harness {
    pub monitor: Monitor<FakeClassifier>,
    pub wire: SharedWire,
    pub verdicts: Arc<Mutex<Verdicts>>,
    pub desktop: Arc<Mutex<Desktop>>,
    pub notifier: Arc<RecordingNotifier>,
}

impl Harness {
    /// A monitor already connected to a plugged-in fake device.
    pub async fn connected() -> Self {
        let wire: SharedWire = Arc::new(Mutex::new(Wire {
            plugged: true,
            ..Default::default()
        }));
        let verdicts = Arc::new(Mutex::new(Verdicts::default()));
        let desktop = Arc::new(Mutex::new(Desktop::default()));
        let notifier = Arc::new(RecordingNotifier::default());

        let parts = Collaborators {
            connector: Box::new(FakeConnector { wire: Arc::clone(&wire) }),
            classifier: FakeClassifier {
                verdicts: Arc::clone(&verdicts),
            },
            focus: Box::new(FakeFocus {
                desktop: Arc::clone(&desktop),
            }),
            notifier: notifier.clone(),
        };
        let mut monitor = Monitor::new(MonitorConfig::default(), parts).with_subject_name("Sam");
        assert!(monitor.connect().await, "fake device should connect");

        Harness {
            monitor,
            wire,
            verdicts,
            desktop,
            notifier,
        }
    }

    pub fn written(&self) -> Vec<String> {
        self.wire.lock().written.clone()
    }

    pub fn clear_written(&self) {
        self.wire.lock().written.clear();
    }

    pub fn push_line(&self, line: &str) {
        self.wire.lock().inbound.push_back(line.to_string());
    }

    pub fn unplug(&self) {
        let mut wire = self.wire.lock();
        wire.plugged = false;
        wire.open = false;
    }

    pub fn plug_in(&self) {
        self.wire.lock().plugged = true;
    }

    pub fn mark_distracting(&self, title: &str) {
        self.verdicts.lock().distracting.insert(title.to_string());
    }

    pub fn mark_failing(&self, title: &str) {
        self.verdicts.lock().failing.insert(title.to_string());
    }

    pub fn asked(&self) -> Vec<String> {
        self.verdicts.lock().asked.clone()
    }

    pub fn focus(&self, title: &str) {
        self.desktop.lock().title = Some(title.to_string());
    }

    pub async fn start_session(&mut self, minutes: u32) {
        self.monitor
            .handle_line(&format!("Starting countdown for {} minutes", minutes))
            .await;
    }

    /// Focuses `title` and runs one focus poll.
    pub async fn visit(&mut self, title: &str) {
        self.focus(title);
        self.monitor.poll_focus().await;
    }

    /// Waits for background notifications, then returns what they delivered.
    pub async fn delivered(&self) -> (Vec<Email>, Vec<Dialog>) {
        self.monitor.dispatcher().settle().await;
        (self.notifier.emails.lock().clone(), self.notifier.dialogs.lock().clone())
    }
}

impl AsyncTestContext for Harness {
    async fn setup() -> Self {
        Harness::connected().await
    }
}
