use super::transport::PortCandidate;
use prettytable::{row, Table};

pub struct View {}

impl View {
    /// Prints discovered serial ports, marking the one the monitor would pick.
    pub fn ports(ports: &[PortCandidate], selected: Option<&PortCandidate>) {
        let mut table = Table::new();

        table.add_row(row!["", "PORT", "DESCRIPTION"]);
        for port in ports {
            let marker = if selected == Some(port) { "*" } else { "" };
            table.add_row(row![marker, port.name, port.description]);
        }
        table.printstd();
    }
}
