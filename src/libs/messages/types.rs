/// Every user-facing message the application prints.
///
/// Text lives in `display.rs`; call sites only pick a variant.
#[derive(Debug, Clone)]
pub enum Message {
    // === MONITOR MESSAGES ===
    MonitorStarted {
        port: String,
        poll_interval: u64,
    },
    MonitorAwaitingSession,
    MonitorTamperGuardActive,
    MonitorExitedNormally,
    MonitorShuttingDown,
    MonitorError(String),

    // === SIGNAL MESSAGES ===
    WatcherReceivedSigterm,
    WatcherReceivedSigint,
    WatcherReceivedCtrlC,
    WatcherCtrlCListenFailed(String), // error
    WatcherSignalHandlingNotSupported,
    FailedToCreateSigtermHandler,
    FailedToCreateSigintHandler,

    // === LINK MESSAGES ===
    LinkConnecting(String),          // port
    LinkConnected(String),           // port
    LinkOpenFailed(String),          // error
    LinkInitialConnectFailed,
    LinkLost,
    LinkLostDuringSession,
    LinkReconnecting(u64),           // attempt
    LinkReconnected,
    LinkReconnectFailed,
    LinkWriteFailed(String),         // error
    LinkReadFailed(String),          // error
    LinkProbeFailed(String),         // error
    LinkLineReceived(String),        // line
    LinkLineIgnored(String),         // line
    LinkClosed,
    HeartbeatSent,
    PortFallback(String),            // default port

    // === PORT LISTING MESSAGES ===
    PortsHeader,
    PortsNoneFound,
    PortsDiscoveryFailed(String), // error
    PortsSelected(String),        // port

    // === SESSION MESSAGES ===
    SessionStarted(u32),            // planned minutes
    SessionDurationUnparsed(String), // raw line
    SessionCompleted,
    SessionSummary(usize),          // distraction count
    SessionResult(String),          // success / fail
    SessionEndedByDistractions(usize),

    // === FOCUS MESSAGES ===
    FocusMonitoring(String),   // title
    FocusQueryFailed(String),  // error
    FocusCloseFailed(String),  // error

    // === CLASSIFIER MESSAGES ===
    ClassifierVerdict(String, String), // title, reply
    ClassifierFailed(String),          // error
    ClassifierEndpointNotSet,
    ClassifyResult {
        title: String,
        distracting: bool,
    },

    // === DISTRACTION MESSAGES ===
    DistractionDetected(usize, String), // count, title
    PunishmentApplied(String),          // description
    PunishmentSkippedLinkDown,

    // === NOTIFICATION MESSAGES ===
    TamperDetected,
    EmailSent(String),            // recipient
    EmailFailed(String),          // error
    EmailCredentialsMissing,
    EmailRecipientMissing,
    DialogFailed(String),         // error
    BackgroundTaskFailed(String), // error

    // === CONFIGURATION MESSAGES ===
    ConfigEnvLoaded(String),             // path
    ConfigEnvNotFound,
    ConfigInvalidNumber(String, String), // variable, value
}
