//! Email alerts and modal dialogs.
//!
//! Both are slow (SMTP round trips, a dialog waits for the user), so the
//! monitor never calls a [`Notifier`] directly. It hands an owned [`Email`]
//! or [`Dialog`] to the [`Dispatcher`], which runs the call on the blocking
//! pool and only logs the outcome.

use crate::libs::config::MailConfig;
use crate::libs::messages::Message;
use crate::{msg_bail_anyhow, msg_error, msg_success};
use anyhow::Result;
use chrono::{DateTime, Local};
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message as MailMessage, SmtpTransport, Transport as _};
use parking_lot::Mutex;
use rfd::{MessageButtons, MessageDialog, MessageLevel};
use std::sync::Arc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogLevel {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub level: DialogLevel,
    pub title: String,
    pub text: String,
}

fn titles_or_none(titles: &[String]) -> String {
    if titles.is_empty() {
        "None detected".to_string()
    } else {
        titles.join(", ")
    }
}

impl Email {
    pub fn tamper_alert(at: DateTime<Local>) -> Self {
        Email {
            subject: "🚨 URGENT: Candy Door Tamper Attempt Detected".to_string(),
            body: format!(
                "🚨 CANDY DOOR TAMPER ATTEMPT DETECTED!\n\n\
                 Unauthorized attempt to access the candy detected at {}.",
                at.format("%Y-%m-%d %H:%M:%S")
            ),
        }
    }

    pub fn disconnection(subject_name: &str, titles: &[String], at: DateTime<Local>) -> Self {
        Email {
            subject: "🚨 URGENT: Device Disconnection During Focus Session".to_string(),
            body: format!(
                "🚨 CHEATING ATTEMPT DETECTED!\n\n\
                 {} disconnected the focus device during an active session at {}.\n\
                 The session has been marked as failed.\n\n\
                 Distractions so far ({}): {}",
                subject_name,
                at.format("%Y-%m-%d %H:%M:%S"),
                titles.len(),
                titles_or_none(titles)
            ),
        }
    }

    pub fn too_many_distractions(subject_name: &str, titles: &[String]) -> Self {
        Email {
            subject: "Focus Session - Multiple Distractions Detected".to_string(),
            body: format!(
                "{} was off task {} times during the focus session, which has been ended.\n\n\
                 Distractions: {}",
                subject_name,
                titles.len(),
                titles_or_none(titles)
            ),
        }
    }
}

impl Dialog {
    pub fn distraction_warning(count: usize, punishment: &str) -> Self {
        Dialog {
            level: DialogLevel::Warning,
            title: "FOCUS WARNING".to_string(),
            text: format!(
                "🚨 DISTRACTION WARNING!\n\nDistraction Count: {}\nCurrent Punishment: {}",
                count, punishment
            ),
        }
    }

    pub fn tamper() -> Self {
        Dialog {
            level: DialogLevel::Error,
            title: "TAMPER ATTEMPT DETECTED!".to_string(),
            text: "🚨 UNAUTHORIZED CANDY ACCESS DETECTED!\n\nEmail sent to parent!".to_string(),
        }
    }

    pub fn disconnected() -> Self {
        Dialog {
            level: DialogLevel::Error,
            title: "CHEATING DETECTED!".to_string(),
            text: "🚨 DEVICE DISCONNECTED!\n\nSession terminated and email sent.".to_string(),
        }
    }
}

/// Delivers alerts. Calls may block for as long as they need.
pub trait Notifier: Send + Sync {
    fn send_email(&self, email: &Email) -> Result<()>;
    fn show_dialog(&self, dialog: &Dialog) -> Result<()>;
}

/// SMTP email plus native message boxes.
pub struct DesktopNotifier {
    mail: MailConfig,
}

impl DesktopNotifier {
    pub fn new(mail: MailConfig) -> Self {
        Self { mail }
    }
}

impl Notifier for DesktopNotifier {
    fn send_email(&self, email: &Email) -> Result<()> {
        let Some(recipient) = self.mail.recipient.as_deref() else {
            msg_bail_anyhow!(Message::EmailRecipientMissing);
        };
        let Some((sender, password)) = self.mail.credentials() else {
            msg_bail_anyhow!(Message::EmailCredentialsMissing);
        };

        let message = MailMessage::builder()
            .from(sender.parse::<Mailbox>()?)
            .to(recipient.parse::<Mailbox>()?)
            .subject(email.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())?;

        let mailer = SmtpTransport::starttls_relay(&self.mail.smtp_server)?
            .port(self.mail.smtp_port)
            .credentials(Credentials::new(sender.to_string(), password.to_string()))
            .build();
        mailer.send(&message)?;

        msg_success!(Message::EmailSent(recipient.to_string()));
        Ok(())
    }

    fn show_dialog(&self, dialog: &Dialog) -> Result<()> {
        let level = match dialog.level {
            DialogLevel::Warning => MessageLevel::Warning,
            DialogLevel::Error => MessageLevel::Error,
        };
        MessageDialog::new()
            .set_level(level)
            .set_title(dialog.title.as_str())
            .set_description(dialog.text.as_str())
            .set_buttons(MessageButtons::Ok)
            .show();
        Ok(())
    }
}

/// Runs notifier calls as fire-and-forget background tasks.
///
/// Each task owns its payload; nothing flows back to the caller.
pub struct Dispatcher {
    notifier: Arc<dyn Notifier>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl Dispatcher {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier,
            tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn email(&self, email: Email) {
        self.spawn(move |notifier| {
            if let Err(e) = notifier.send_email(&email) {
                msg_error!(Message::EmailFailed(e.to_string()));
            }
        });
    }

    pub fn dialog(&self, dialog: Dialog) {
        self.spawn(move |notifier| {
            if let Err(e) = notifier.show_dialog(&dialog) {
                msg_error!(Message::DialogFailed(e.to_string()));
            }
        });
    }

    /// Waits for every task spawned so far.
    pub async fn settle(&self) {
        let handles = std::mem::take(&mut *self.tasks.lock());
        for handle in handles {
            if let Err(e) = handle.await {
                msg_error!(Message::BackgroundTaskFailed(e.to_string()));
            }
        }
    }

    fn spawn<F>(&self, job: F)
    where
        F: FnOnce(&dyn Notifier) + Send + 'static,
    {
        let notifier = Arc::clone(&self.notifier);
        let handle = tokio::task::spawn_blocking(move || job(notifier.as_ref()));
        let mut tasks = self.tasks.lock();
        tasks.retain(|task| !task.is_finished());
        tasks.push(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::config::{DEFAULT_SMTP_PORT, DEFAULT_SMTP_SERVER};

    fn mail_config(recipient: Option<&str>, sender: Option<&str>) -> MailConfig {
        MailConfig {
            recipient: recipient.map(str::to_string),
            sender: sender.map(str::to_string),
            password: sender.map(|_| "secret".to_string()),
            smtp_server: DEFAULT_SMTP_SERVER.to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
            subject_name: "Sam".to_string(),
        }
    }

    #[test]
    fn email_without_recipient_is_refused() {
        let notifier = DesktopNotifier::new(mail_config(None, Some("me@example.com")));
        let err = notifier.send_email(&Email::tamper_alert(Local::now())).unwrap_err();
        assert!(err.to_string().contains("PARENT_EMAIL"));
    }

    #[test]
    fn email_without_credentials_is_refused() {
        let notifier = DesktopNotifier::new(mail_config(Some("parent@example.com"), None));
        let err = notifier.send_email(&Email::tamper_alert(Local::now())).unwrap_err();
        assert!(err.to_string().contains("credentials"));
    }

    #[test]
    fn disconnection_email_lists_titles() {
        let titles = vec!["YouTube".to_string(), "Reddit".to_string()];
        let email = Email::disconnection("Sam", &titles, Local::now());
        assert!(email.body.contains("Sam disconnected"));
        assert!(email.body.contains("(2): YouTube, Reddit"));

        let email = Email::disconnection("Sam", &[], Local::now());
        assert!(email.body.contains("None detected"));
    }

    #[test]
    fn warning_dialog_shows_count_and_punishment() {
        let dialog = Dialog::distraction_warning(2, "Session extended by 20 min + Candy locked 10 min");
        assert_eq!(dialog.level, DialogLevel::Warning);
        assert!(dialog.text.contains("Distraction Count: 2"));
        assert!(dialog.text.contains("Candy locked 10 min"));
    }
}
