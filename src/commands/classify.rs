use crate::libs::classifier::{Classifier, HttpClassifier};
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::{msg_bail_anyhow, msg_error_anyhow, msg_print};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ClassifyArgs {
    #[arg(help = "Window title to classify")]
    title: String,
}

// Asks the classifier about a single title. Unlike the monitor, errors are reported, not swallowed.
pub async fn cmd(args: ClassifyArgs) -> Result<()> {
    let config = Config::from_env();
    if config.classifier.endpoint.is_none() {
        msg_bail_anyhow!(Message::ClassifierEndpointNotSet);
    }

    let classifier = HttpClassifier::new(&config.classifier)?;
    let title = args.title.trim().to_string();
    let distracting = classifier
        .is_distracting(&title)
        .await
        .map_err(|e| msg_error_anyhow!(Message::ClassifierFailed(e.to_string())))?;

    msg_print!(Message::ClassifyResult { title, distracting });
    Ok(())
}
