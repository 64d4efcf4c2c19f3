use crate::libs::classifier::HttpClassifier;
use crate::libs::config::Config;
use crate::libs::daemon;
use crate::libs::focus::SystemFocus;
use crate::libs::messages::Message;
use crate::libs::monitor::{Collaborators, Monitor};
use crate::libs::notifier::DesktopNotifier;
use crate::libs::transport::SerialConnector;
use crate::{msg_bail_anyhow, msg_warning};
use anyhow::Result;
use clap::Args;
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct WatchArgs {
    #[arg(long, help = "Serial port to use instead of auto-discovery")]
    port: Option<String>,
    #[arg(long, help = "Serial baud rate")]
    baud: Option<u32>,
}

// Connects to the device and watches focus sessions until interrupted.
pub async fn cmd(args: WatchArgs) -> Result<()> {
    let mut config = Config::from_env();
    if let Some(baud) = args.baud {
        config.serial.baud_rate = baud;
    }
    if config.classifier.endpoint.is_none() {
        msg_warning!(Message::ClassifierEndpointNotSet);
    }

    let parts = Collaborators {
        connector: Box::new(SerialConnector::new(config.serial.clone(), args.port)),
        classifier: HttpClassifier::new(&config.classifier)?,
        focus: Box::new(SystemFocus::new()),
        notifier: Arc::new(DesktopNotifier::new(config.mail.clone())),
    };
    let mut monitor = Monitor::new(config.monitor.clone(), parts).with_subject_name(config.mail.subject_name.clone());

    if !monitor.connect().await {
        msg_bail_anyhow!(Message::LinkInitialConnectFailed);
    }

    daemon::run_with_signal_handling(&mut monitor).await
}
