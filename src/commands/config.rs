use crate::libs::config::Config;
use anyhow::Result;

// Prints the resolved configuration as JSON. The SMTP password is masked.
pub fn cmd() -> Result<()> {
    let config = Config::from_env();
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
