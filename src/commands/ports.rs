use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::libs::transport::{list_ports, select_port};
use crate::libs::view::View;
use crate::{msg_error_anyhow, msg_info, msg_print, msg_warning};
use anyhow::Result;

// Lists serial ports and shows which one `watch` would connect to.
pub fn cmd() -> Result<()> {
    let config = Config::from_env();
    let ports = list_ports().map_err(|e| msg_error_anyhow!(Message::PortsDiscoveryFailed(e.to_string())))?;

    if ports.is_empty() {
        msg_info!(Message::PortsNoneFound);
        msg_warning!(Message::PortFallback(config.serial.fallback_port));
        return Ok(());
    }

    msg_print!(Message::PortsHeader, true);
    let selected = select_port(&ports);
    View::ports(&ports, selected);

    match selected {
        Some(port) => msg_info!(Message::PortsSelected(port.name.clone())),
        None => msg_warning!(Message::PortFallback(config.serial.fallback_port)),
    }
    Ok(())
}
