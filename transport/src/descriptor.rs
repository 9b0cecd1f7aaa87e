//! VISA-style resource descriptors.
//!
//! Supported forms:
//!
//! - `TCPIP[board]::<host>::<port>::SOCKET`: raw socket session.
//! - `<interface>[board]::<address...>::INSTR`: instrument resource on
//!   `TCPIP`, `GPIB` or `USB`.
//!
//! Keywords are case-insensitive.

use std::fmt;
use std::str::FromStr;

use crate::error::TransportError;

/// Hardware interface of a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interface {
    Tcpip,
    Gpib,
    Usb,
}

impl Interface {
    fn keyword(self) -> &'static str {
        match self {
            Self::Tcpip => "TCPIP",
            Self::Gpib => "GPIB",
            Self::Usb => "USB",
        }
    }
}

/// A parsed resource descriptor.
///
/// # Examples
///
/// ```
/// use labctl_transport::Descriptor;
///
/// let d: Descriptor = "TCPIP0::172.23.6.95::1394::SOCKET".parse().unwrap();
/// assert_eq!(
///     d,
///     Descriptor::Socket { board: 0, host: "172.23.6.95".into(), port: 1394 }
/// );
///
/// let d: Descriptor = "GPIB0::12::INSTR".parse().unwrap();
/// assert!(!d.is_socket());
/// assert!("SERIAL::1".parse::<Descriptor>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Descriptor {
    /// Raw TCP socket.
    Socket { board: u32, host: String, port: u16 },
    /// Instrument resource reached through a vendor library.
    Instr {
        interface: Interface,
        board: u32,
        address: String,
    },
}

impl Descriptor {
    /// Returns `true` for raw socket descriptors.
    pub fn is_socket(&self) -> bool {
        matches!(self, Self::Socket { .. })
    }
}

fn split_interface(segment: &str) -> Option<(Interface, u32)> {
    let upper = segment.to_ascii_uppercase();
    let (interface, rest) = [Interface::Tcpip, Interface::Gpib, Interface::Usb]
        .into_iter()
        .find_map(|interface| {
            upper
                .strip_prefix(interface.keyword())
                .map(|rest| (interface, rest))
        })?;
    let board = if rest.is_empty() { 0 } else { rest.parse().ok()? };
    Some((interface, board))
}

impl FromStr for Descriptor {
    type Err = TransportError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || TransportError::InvalidDescriptor(text.to_string());
        let parts: Vec<&str> = text.trim().split("::").collect();
        let (first, rest) = parts.split_first().ok_or_else(invalid)?;
        let (interface, board) = split_interface(first).ok_or_else(invalid)?;
        let (class, middle) = rest.split_last().ok_or_else(invalid)?;

        if middle.is_empty() || middle.iter().any(|part| part.is_empty()) {
            return Err(invalid());
        }

        if class.eq_ignore_ascii_case("SOCKET") {
            let [host, port] = middle else {
                return Err(invalid());
            };
            if interface != Interface::Tcpip {
                return Err(invalid());
            }
            let port = port.parse().map_err(|_| invalid())?;
            return Ok(Self::Socket {
                board,
                host: host.to_string(),
                port,
            });
        }

        if class.eq_ignore_ascii_case("INSTR") {
            return Ok(Self::Instr {
                interface,
                board,
                address: middle.join("::"),
            });
        }

        Err(invalid())
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Socket { board, host, port } => write!(f, "TCPIP{board}::{host}::{port}::SOCKET"),
            Self::Instr {
                interface,
                board,
                address,
            } => write!(f, "{}{board}::{address}::INSTR", interface.keyword()),
        }
    }
}
