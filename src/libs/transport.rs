//! Serial link to the session microcontroller.
//!
//! The monitor only sees the [`Transport`] and [`Connector`] traits. The
//! serial implementations here are thin: discovery picks the first port whose
//! description names a known USB bridge, reads are non-blocking line drains,
//! and any I/O failure drops the port so the next health probe reports the
//! link as closed.

use crate::libs::config::SerialConfig;
use crate::libs::messages::Message;
use crate::{msg_info, msg_warning};
use serialport::{SerialPort, SerialPortType};
use std::io::Write;
use std::time::Duration;
use thiserror::Error;

/// Substrings of a port description that identify the session device.
pub const DEVICE_IDENTIFIERS: [&str; 3] = ["Arduino", "CH340", "USB"];

/// Read timeout applied to the opened port.
const READ_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("link is closed")]
    Closed,
}

/// A line-oriented, bidirectional channel to the device.
///
/// Implementations must report `is_open() == false` after any failed read or
/// write so the monitor's health probe notices the fault.
pub trait Transport: Send {
    /// Writes `line` followed by a newline.
    fn write_line(&mut self, line: &str) -> Result<(), LinkError>;

    /// Returns the next complete line if one has arrived, without waiting for more.
    fn try_read_line(&mut self) -> Result<Option<String>, LinkError>;

    fn is_open(&self) -> bool;

    fn close(&mut self) -> Result<(), LinkError>;

    /// Human-readable endpoint name, used in log lines.
    fn name(&self) -> &str;
}

/// Finds the device endpoint and opens a fresh [`Transport`] to it.
pub trait Connector: Send {
    fn connect(&self) -> Result<Box<dyn Transport>, LinkError>;
}

/// A serial port as seen by discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortCandidate {
    pub name: String,
    pub description: String,
}

/// Lists the serial ports present on this machine.
pub fn list_ports() -> Result<Vec<PortCandidate>, LinkError> {
    let ports = serialport::available_ports()?;
    Ok(ports
        .into_iter()
        .map(|port| PortCandidate {
            description: describe(&port.port_type),
            name: port.port_name,
        })
        .collect())
}

fn describe(port_type: &SerialPortType) -> String {
    match port_type {
        SerialPortType::UsbPort(info) => {
            let parts: Vec<&str> = [info.manufacturer.as_deref(), info.product.as_deref()]
                .into_iter()
                .flatten()
                .collect();
            if parts.is_empty() {
                "USB Serial".to_string()
            } else {
                format!("{} (USB)", parts.join(" "))
            }
        }
        SerialPortType::BluetoothPort => "Bluetooth".to_string(),
        SerialPortType::PciPort => "PCI".to_string(),
        SerialPortType::Unknown => "Unknown".to_string(),
    }
}

/// First candidate whose description contains a [`DEVICE_IDENTIFIERS`] entry.
pub fn select_port(candidates: &[PortCandidate]) -> Option<&PortCandidate> {
    candidates
        .iter()
        .find(|candidate| DEVICE_IDENTIFIERS.iter().any(|id| candidate.description.contains(id)))
}

/// Opens the discovered (or configured) serial port.
pub struct SerialConnector {
    config: SerialConfig,
    /// Skips discovery entirely when set.
    port_override: Option<String>,
}

impl SerialConnector {
    pub fn new(config: SerialConfig, port_override: Option<String>) -> Self {
        Self { config, port_override }
    }

    /// The port the next `connect()` will open.
    pub fn resolve_port(&self) -> String {
        if let Some(port) = &self.port_override {
            return port.clone();
        }
        let discovered = list_ports()
            .ok()
            .and_then(|candidates| select_port(&candidates).map(|candidate| candidate.name.clone()));
        discovered.unwrap_or_else(|| {
            msg_warning!(Message::PortFallback(self.config.fallback_port.clone()));
            self.config.fallback_port.clone()
        })
    }
}

impl Connector for SerialConnector {
    fn connect(&self) -> Result<Box<dyn Transport>, LinkError> {
        let name = self.resolve_port();
        msg_info!(Message::LinkConnecting(name.clone()));
        let port = serialport::new(&name, self.config.baud_rate).timeout(READ_TIMEOUT).open()?;
        Ok(Box::new(SerialTransport::new(name, port)))
    }
}

pub struct SerialTransport {
    name: String,
    port: Option<Box<dyn SerialPort>>,
    pending: Vec<u8>,
}

impl SerialTransport {
    pub fn new(name: String, port: Box<dyn SerialPort>) -> Self {
        Self {
            name,
            port: Some(port),
            pending: Vec::new(),
        }
    }

    /// Drops the port after an I/O failure.
    fn fault(&mut self, error: LinkError) -> LinkError {
        self.port = None;
        error
    }
}

fn read_available(port: &mut dyn SerialPort) -> Result<Vec<u8>, LinkError> {
    let available = port.bytes_to_read()? as usize;
    let mut buf = vec![0; available];
    if available > 0 {
        port.read_exact(&mut buf)?;
    }
    Ok(buf)
}

/// Removes and returns the first non-empty line from `pending`.
fn split_line(pending: &mut Vec<u8>) -> Option<String> {
    while let Some(pos) = pending.iter().position(|&b| b == b'\n') {
        let raw: Vec<u8> = pending.drain(..=pos).collect();
        let line = String::from_utf8_lossy(&raw).trim().to_string();
        if !line.is_empty() {
            return Some(line);
        }
    }
    None
}

impl Transport for SerialTransport {
    fn write_line(&mut self, line: &str) -> Result<(), LinkError> {
        let Some(port) = self.port.as_mut() else {
            return Err(LinkError::Closed);
        };
        let written = port.write_all(format!("{}\n", line).as_bytes()).and_then(|()| port.flush());
        written.map_err(|e| self.fault(e.into()))
    }

    fn try_read_line(&mut self) -> Result<Option<String>, LinkError> {
        if let Some(line) = split_line(&mut self.pending) {
            return Ok(Some(line));
        }
        let chunk = match self.port.as_mut() {
            Some(port) => read_available(&mut **port),
            None => return Err(LinkError::Closed),
        };
        let chunk = chunk.map_err(|e| self.fault(e))?;
        self.pending.extend_from_slice(&chunk);
        Ok(split_line(&mut self.pending))
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn close(&mut self) -> Result<(), LinkError> {
        self.port = None;
        self.pending.clear();
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
