//! Display implementation for focuswarden messages.
//!
//! All console text is produced here so wording stays consistent between
//! the monitor loop, the CLI subcommands and the background notifiers.
//! Call sites pick a [`Message`] variant and hand it to one of the `msg_*!`
//! macros; they never format their own strings.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === MONITOR MESSAGES ===
            Message::MonitorStarted { port, poll_interval } => {
                format!("Monitor is running on {} (poll interval {}ms)", port, poll_interval)
            }
            Message::MonitorAwaitingSession => "🎯 Start a focus session on your device to begin!".to_string(),
            Message::MonitorTamperGuardActive => "🛡️ Anti-tamper system is active - candy door is protected!".to_string(),
            Message::MonitorExitedNormally => "Monitor exited normally".to_string(),
            Message::MonitorShuttingDown => "👋 Shutting down...".to_string(),
            Message::MonitorError(error) => format!("Monitor error: {}", error),

            // === SIGNAL MESSAGES ===
            Message::WatcherReceivedSigterm => "Received SIGTERM, shutting down gracefully...".to_string(),
            Message::WatcherReceivedSigint => "Received SIGINT, shutting down gracefully...".to_string(),
            Message::WatcherReceivedCtrlC => "Received Ctrl+C, shutting down gracefully...".to_string(),
            Message::WatcherCtrlCListenFailed(error) => format!("Failed to listen for Ctrl+C: {}", error),
            Message::WatcherSignalHandlingNotSupported => "Warning: Signal handling not supported on this platform".to_string(),
            Message::FailedToCreateSigtermHandler => "Failed to create SIGTERM handler".to_string(),
            Message::FailedToCreateSigintHandler => "Failed to create SIGINT handler".to_string(),

            // === LINK MESSAGES ===
            Message::LinkConnecting(port) => format!("Attempting to connect to the device on {}...", port),
            Message::LinkConnected(port) => format!("Connected on {}! Ready for focus sessions.", port),
            Message::LinkOpenFailed(error) => format!("Failed to connect to the device: {}", error),
            Message::LinkInitialConnectFailed => "Could not connect to the device. Please check the connection and try again.".to_string(),
            Message::LinkLost => "Device link lost".to_string(),
            Message::LinkLostDuringSession => "🚨 DEVICE DISCONNECTED DURING A SESSION! This counts as cheating!".to_string(),
            Message::LinkReconnecting(attempt) => format!("🔄 Attempting to reconnect to the device (attempt {})...", attempt),
            Message::LinkReconnected => "Device reconnected!".to_string(),
            Message::LinkReconnectFailed => "Reconnect failed, will retry".to_string(),
            Message::LinkWriteFailed(error) => format!("Failed to write to the device: {}", error),
            Message::LinkReadFailed(error) => format!("Failed to read from the device: {}", error),
            Message::LinkProbeFailed(error) => format!("Heartbeat probe failed: {}", error),
            Message::LinkLineReceived(line) => format!("📨 Device says: '{}'", line),
            Message::LinkLineIgnored(line) => format!("Ignoring device line: '{}'", line),
            Message::LinkClosed => "Device link closed".to_string(),
            Message::HeartbeatSent => "Heartbeat sent".to_string(),
            Message::PortFallback(port) => format!("No recognized device found, falling back to {}", port),

            // === PORT LISTING MESSAGES ===
            Message::PortsHeader => "Serial ports".to_string(),
            Message::PortsNoneFound => "No serial ports found".to_string(),
            Message::PortsDiscoveryFailed(error) => format!("Failed to enumerate serial ports: {}", error),
            Message::PortsSelected(port) => format!("The monitor would connect to {}", port),

            // === SESSION MESSAGES ===
            Message::SessionStarted(minutes) => format!("🎯 Focus session started ({} min planned)! Now monitoring...", minutes),
            Message::SessionDurationUnparsed(line) => format!("Could not read the session duration from '{}', assuming 0", line),
            Message::SessionCompleted => "⏰ Focus session completed!".to_string(),
            Message::SessionSummary(count) => format!("📊 SESSION SUMMARY: {} distractions.", count),
            Message::SessionResult(result) => format!("Session result: {}", result),
            Message::SessionEndedByDistractions(count) => format!("Session ended after {} distractions", count),

            // === FOCUS MESSAGES ===
            Message::FocusMonitoring(title) => format!("🔍 Monitoring: {}", title),
            Message::FocusQueryFailed(error) => format!("Failed to read the active window: {}", error),
            Message::FocusCloseFailed(error) => format!("Failed to close the active window: {}", error),

            // === CLASSIFIER MESSAGES ===
            Message::ClassifierVerdict(title, reply) => format!("AI response for '{}': {}", title, reply),
            Message::ClassifierFailed(error) => format!("AI call failed, treating the window as on task: {}", error),
            Message::ClassifierEndpointNotSet => "API_ENDPOINT is not set; every window will be treated as on task".to_string(),
            Message::ClassifyResult { title, distracting } => {
                if *distracting {
                    format!("'{}' is DISTRACTING", title)
                } else {
                    format!("'{}' is on task", title)
                }
            }

            // === DISTRACTION MESSAGES ===
            Message::DistractionDetected(count, title) => format!("🚨 DISTRACTION #{} DETECTED: {}", count, title),
            Message::PunishmentApplied(description) => format!("Punishment: {}", description),
            Message::PunishmentSkippedLinkDown => "Device link is down, punishment commands skipped".to_string(),

            // === NOTIFICATION MESSAGES ===
            Message::TamperDetected => "🚨 Candy door tamper attempt reported by the device".to_string(),
            Message::EmailSent(recipient) => format!("Email sent successfully to {}", recipient),
            Message::EmailFailed(error) => format!("Error sending email: {}", error),
            Message::EmailCredentialsMissing => "Email credentials not provided (EMAIL_ADDRESS / EMAIL_PASSWORD)".to_string(),
            Message::EmailRecipientMissing => "PARENT_EMAIL is not set, email skipped".to_string(),
            Message::DialogFailed(error) => format!("Failed to show dialog: {}", error),
            Message::BackgroundTaskFailed(error) => format!("Background task failed: {}", error),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigEnvLoaded(path) => format!("Loaded environment from {}", path),
            Message::ConfigEnvNotFound => "No .env file found, using process environment".to_string(),
            Message::ConfigInvalidNumber(var, value) => format!("{} has invalid value '{}', using default", var, value),
        };
        write!(f, "{}", text)
    }
}
