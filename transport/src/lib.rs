//! Instrument sessions for SCPI-speaking lab equipment.
//!
//! [`Instrument`] is the session interface host programs talk to:
//! open a resource descriptor, write commands, read responses, close.
//! [`SocketInstrument`] implements it for raw `TCPIP::host::port::SOCKET`
//! resources. Other descriptor kinds parse but need a vendor library.
//!
//! # Example
//!
//! ```no_run
//! use labctl_transport::{Instrument, SocketInstrument};
//!
//! let mut scope = SocketInstrument::new();
//! scope.open("TCPIP0::192.168.1.20::5025::SOCKET")?;
//! println!("{}", scope.query("*IDN?")?);
//! scope.close()?;
//! # Ok::<(), labctl_transport::TransportError>(())
//! ```

mod descriptor;
mod error;
mod socket;

use std::time::Duration;

use tracing::debug;

pub use descriptor::{Descriptor, Interface};
pub use error::{
    Result, TransportError, VI_ERROR_CONN_LOST, VI_ERROR_INV_RSRC_NAME, VI_ERROR_NSUP_OPER,
    VI_ERROR_RSRC_NFOUND, VI_ERROR_TMO,
};
pub use socket::{SocketInstrument, TERMINATOR};

/// Read buffer size used by [`Instrument::query`].
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Read timeout used by [`Instrument::query`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(2000);

/// A session with one instrument.
pub trait Instrument {
    /// Opens the resource named by `descriptor`, closing any open session.
    fn open(&mut self, descriptor: &str) -> Result<()>;

    /// Sends one command.
    fn write(&mut self, command: &str) -> Result<()>;

    /// Reads one response of at most `buffer_size` bytes.
    fn read(&mut self, buffer_size: usize, timeout: Duration) -> Result<String>;

    /// Closes the session. Closing a closed session is a no-op.
    fn close(&mut self) -> Result<()>;

    /// Writes `command` and returns the trimmed response.
    fn query(&mut self, command: &str) -> Result<String> {
        self.query_with(command, DEFAULT_BUFFER_SIZE, DEFAULT_TIMEOUT)
    }

    /// Like [`query`](Instrument::query) with explicit read parameters.
    fn query_with(&mut self, command: &str, buffer_size: usize, timeout: Duration) -> Result<String> {
        self.write(command)?;
        Ok(self.read(buffer_size, timeout)?.trim().to_string())
    }
}

/// Opens each descriptor in turn and keeps the first whose `*IDN?` response
/// contains `identity`.
///
/// Returns the matching descriptor with the session left open, or `None`
/// when no resource matches. Resources that fail to open, answer or close
/// are skipped.
pub fn open_by_identity<I, S>(instrument: &mut I, descriptors: &[S], identity: &str) -> Result<Option<String>>
where
    I: Instrument + ?Sized,
    S: AsRef<str>,
{
    for descriptor in descriptors {
        let descriptor = descriptor.as_ref();
        if let Err(err) = instrument.open(descriptor) {
            debug!(descriptor, error = %err, "Skipping resource");
            continue;
        }
        match instrument.query("*IDN?") {
            Ok(idn) if idn.contains(identity) => {
                debug!(descriptor, idn, "Matched instrument identity");
                return Ok(Some(descriptor.to_string()));
            }
            Ok(idn) => debug!(descriptor, idn, "Identity mismatch"),
            Err(err) => debug!(descriptor, error = %err, "Identity query failed"),
        }
        if let Err(err) = instrument.close() {
            debug!(descriptor, error = %err, "Close failed, skipping resource");
        }
    }
    Ok(None)
}
