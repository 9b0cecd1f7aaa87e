//! Raw SCPI socket sessions.

use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::debug;

use crate::Instrument;
use crate::descriptor::Descriptor;
use crate::error::{
    Result, TransportError, VI_ERROR_CONN_LOST, VI_ERROR_NSUP_OPER, VI_ERROR_RSRC_NFOUND,
    VI_ERROR_TMO,
};

/// Message terminator appended to writes and expected at the end of reads.
pub const TERMINATOR: u8 = b'\n';

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Instrument session over a `TCPIP::host::port::SOCKET` resource.
///
/// Writes append a newline. Reads stop at the first newline or after
/// `buffer_size` bytes; bytes received past that point are kept for the
/// next read.
#[derive(Debug)]
pub struct SocketInstrument {
    stream: Option<TcpStream>,
    descriptor: Option<Descriptor>,
    connect_timeout: Duration,
    pending: Vec<u8>,
}

impl Default for SocketInstrument {
    fn default() -> Self {
        Self::new()
    }
}

impl SocketInstrument {
    /// Creates a closed session.
    pub fn new() -> Self {
        Self {
            stream: None,
            descriptor: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            pending: Vec::new(),
        }
    }

    /// Sets the timeout used when connecting.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Returns `true` while a connection is open.
    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Descriptor of the open session.
    pub fn descriptor(&self) -> Option<&Descriptor> {
        self.descriptor.as_ref()
    }
}

fn timeout_error() -> TransportError {
    TransportError::status(VI_ERROR_TMO, "Timeout expired before operation completed.")
}

fn connection_lost() -> TransportError {
    TransportError::status(VI_ERROR_CONN_LOST, "The connection for the given session has been lost.")
}

fn is_timeout(kind: ErrorKind) -> bool {
    matches!(kind, ErrorKind::WouldBlock | ErrorKind::TimedOut)
}

impl Instrument for SocketInstrument {
    fn open(&mut self, descriptor: &str) -> Result<()> {
        let parsed: Descriptor = descriptor.parse()?;
        let Descriptor::Socket { host, port, .. } = &parsed else {
            return Err(TransportError::status(
                VI_ERROR_NSUP_OPER,
                format!("Socket session cannot open \"{parsed}\"."),
            ));
        };

        self.close()?;

        let addrs: Vec<_> = (host.as_str(), *port)
            .to_socket_addrs()
            .map_err(|err| {
                TransportError::status(
                    VI_ERROR_RSRC_NFOUND,
                    format!("Cannot resolve \"{host}\": {err}"),
                )
            })?
            .collect();

        let mut last_error = None;
        for addr in &addrs {
            match TcpStream::connect_timeout(addr, self.connect_timeout) {
                Ok(stream) => {
                    stream.set_nodelay(true)?;
                    debug!(resource = %parsed, %addr, "Opened socket session");
                    self.stream = Some(stream);
                    self.descriptor = Some(parsed);
                    return Ok(());
                }
                Err(err) => last_error = Some(err),
            }
        }

        let reason = last_error.map_or_else(|| "no address".to_string(), |err| err.to_string());
        Err(TransportError::status(
            VI_ERROR_RSRC_NFOUND,
            format!("Cannot open \"{parsed}\": {reason}"),
        ))
    }

    fn write(&mut self, command: &str) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(TransportError::NotOpen)?;
        let mut message = Vec::with_capacity(command.len() + 1);
        message.extend_from_slice(command.as_bytes());
        message.push(TERMINATOR);
        stream.write_all(&message)?;
        stream.flush()?;
        debug!(command, "Write");
        Ok(())
    }

    fn read(&mut self, buffer_size: usize, timeout: Duration) -> Result<String> {
        let stream = self.stream.as_mut().ok_or(TransportError::NotOpen)?;
        let buffer_size = buffer_size.max(1);
        stream.set_read_timeout(Some(timeout.max(Duration::from_millis(1))))?;

        let mut response = std::mem::take(&mut self.pending);
        loop {
            let window = &response[..buffer_size.min(response.len())];
            if let Some(pos) = window.iter().position(|byte| *byte == TERMINATOR) {
                self.pending = response.split_off(pos + 1);
                break;
            }
            if response.len() >= buffer_size {
                self.pending = response.split_off(buffer_size);
                break;
            }

            let mut chunk = vec![0u8; buffer_size - response.len()];
            match stream.read(&mut chunk) {
                Ok(0) => {
                    self.pending = response;
                    return Err(connection_lost());
                }
                Ok(n) => response.extend_from_slice(&chunk[..n]),
                Err(err) if err.kind() == ErrorKind::Interrupted => {}
                Err(err) if is_timeout(err.kind()) => {
                    self.pending = response;
                    return Err(timeout_error());
                }
                Err(err) => return Err(err.into()),
            }
        }

        let text = String::from_utf8_lossy(&response).into_owned();
        debug!(bytes = response.len(), response = %text.trim_end(), "Read");
        Ok(text)
    }

    fn close(&mut self) -> Result<()> {
        self.pending.clear();
        let Some(stream) = self.stream.take() else {
            return Ok(());
        };
        let resource = self.descriptor.take();
        match stream.shutdown(Shutdown::Both) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotConnected => {}
            Err(err) => return Err(err.into()),
        }
        debug!(resource = ?resource.map(|d| d.to_string()), "Closed socket session");
        Ok(())
    }
}

impl Drop for SocketInstrument {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
