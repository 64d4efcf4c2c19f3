//! Configuration for the focuswarden monitor.
//!
//! Everything comes from the process environment, optionally seeded from a
//! `.env` file in the working directory. There is no config file on disk:
//! the secrets involved (SMTP password, classifier URL) are expected to be
//! provisioned alongside the binary.
//!
//! ## Variables
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `API_ENDPOINT` | classifier URL | unset |
//! | `CLASSIFIER_TIMEOUT_SECS` | HTTP timeout | `10` |
//! | `PARENT_EMAIL` | alert recipient | unset |
//! | `EMAIL_ADDRESS` / `EMAIL_PASSWORD` | SMTP credentials | unset |
//! | `SMTP_SERVER` / `SMTP_PORT` | SMTP submission host | `smtp.gmail.com` / `587` |
//! | `SERIAL_PORT` | port used when discovery finds nothing | platform default |
//! | `SERIAL_BAUD` | baud rate | `9600` |
//! | `FOCUS_SUBJECT` | name used in alert emails | `The user` |

use crate::libs::messages::Message;
use crate::{msg_debug, msg_warning};
use serde::Serialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_SMTP_SERVER: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_BAUD_RATE: u32 = 9600;
pub const DEFAULT_CLASSIFIER_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SUBJECT: &str = "The user";

#[cfg(windows)]
pub const DEFAULT_SERIAL_PORT: &str = "COM3";
#[cfg(not(windows))]
pub const DEFAULT_SERIAL_PORT: &str = "/dev/ttyACM0";

/// Timing of the monitor loop. All values in milliseconds.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct MonitorConfig {
    /// Pause between loop iterations.
    pub poll_interval: u64,
    /// Minimum gap between two `heartbeat` probes.
    pub heartbeat_interval: u64,
    /// Wait after detecting a dead link before trying to reconnect.
    pub reconnect_backoff: u64,
    /// Wait after opening the port; the board resets when the port opens.
    pub settle_time: u64,
    /// Wait between `summary_<n>` and the result line so the device can show it.
    pub summary_delay: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            poll_interval: 500,
            heartbeat_interval: 5_000,
            reconnect_backoff: 5_000,
            settle_time: 3_000,
            summary_delay: 2_000,
        }
    }
}

impl MonitorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval)
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval)
    }

    pub fn reconnect_backoff(&self) -> Duration {
        Duration::from_millis(self.reconnect_backoff)
    }

    pub fn settle_time(&self) -> Duration {
        Duration::from_millis(self.settle_time)
    }

    pub fn summary_delay(&self) -> Duration {
        Duration::from_millis(self.summary_delay)
    }
}

/// Serial link settings.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SerialConfig {
    /// Port used when no recognized device is found.
    pub fallback_port: String,
    pub baud_rate: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        SerialConfig {
            fallback_port: DEFAULT_SERIAL_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
        }
    }
}

/// Remote title classifier settings.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ClassifierConfig {
    pub endpoint: Option<String>,
    pub timeout_secs: u64,
}

/// Outbound email settings.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct MailConfig {
    /// Guardian address that receives every alert.
    pub recipient: Option<String>,
    pub sender: Option<String>,
    #[serde(serialize_with = "mask_secret")]
    pub password: Option<String>,
    pub smtp_server: String,
    pub smtp_port: u16,
    /// How the monitored person is named in email bodies.
    pub subject_name: String,
}

impl MailConfig {
    /// Sender and password, when both are present.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.sender.as_deref(), self.password.as_deref()) {
            (Some(sender), Some(password)) => Some((sender, password)),
            _ => None,
        }
    }
}

fn mask_secret<S: serde::Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(_) => serializer.serialize_str("********"),
        None => serializer.serialize_none(),
    }
}

/// Root configuration.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    pub monitor: MonitorConfig,
    pub serial: SerialConfig,
    pub classifier: ClassifierConfig,
    pub mail: MailConfig,
}

impl Config {
    /// Loads `.env` (if present) into the process environment, then reads the config.
    pub fn from_env() -> Self {
        match dotenv::dotenv() {
            Ok(path) => msg_debug!(Message::ConfigEnvLoaded(path.display().to_string())),
            Err(_) => msg_debug!(Message::ConfigEnvNotFound),
        }
        Self::read()
    }

    /// Reads the config from the current process environment only.
    pub fn read() -> Self {
        Config {
            monitor: MonitorConfig::default(),
            serial: SerialConfig {
                fallback_port: non_empty("SERIAL_PORT").unwrap_or_else(|| DEFAULT_SERIAL_PORT.to_string()),
                baud_rate: number("SERIAL_BAUD", DEFAULT_BAUD_RATE),
            },
            classifier: ClassifierConfig {
                endpoint: non_empty("API_ENDPOINT"),
                timeout_secs: number("CLASSIFIER_TIMEOUT_SECS", DEFAULT_CLASSIFIER_TIMEOUT_SECS),
            },
            mail: MailConfig {
                recipient: non_empty("PARENT_EMAIL"),
                sender: non_empty("EMAIL_ADDRESS"),
                password: non_empty("EMAIL_PASSWORD"),
                smtp_server: non_empty("SMTP_SERVER").unwrap_or_else(|| DEFAULT_SMTP_SERVER.to_string()),
                smtp_port: number("SMTP_PORT", DEFAULT_SMTP_PORT),
                subject_name: non_empty("FOCUS_SUBJECT").unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
            },
        }
    }
}

/// A variable's trimmed value, treating empty as unset.
fn non_empty(var: &str) -> Option<String> {
    env::var(var).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

/// A numeric variable, falling back to `default` (with a warning) when malformed.
fn number<T: FromStr>(var: &str, default: T) -> T {
    match non_empty(var) {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            msg_warning!(Message::ConfigInvalidNumber(var.to_string(), raw));
            default
        }),
    }
}
