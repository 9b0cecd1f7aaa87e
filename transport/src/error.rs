//! Error types for instrument sessions.
//!
//! Failures reported by an instrument session carry a VISA-style status code
//! and a description, so host programs can print the same diagnostics a
//! vendor library would.

use thiserror::Error;

/// Timeout expired before the operation completed.
pub const VI_ERROR_TMO: i32 = 0xBFFF_0015_u32 as i32;
/// Resource name is not valid for the session type.
pub const VI_ERROR_INV_RSRC_NAME: i32 = 0xBFFF_0012_u32 as i32;
/// Resource could not be located.
pub const VI_ERROR_RSRC_NFOUND: i32 = 0xBFFF_0011_u32 as i32;
/// Operation not supported by this session.
pub const VI_ERROR_NSUP_OPER: i32 = 0xBFFF_0067_u32 as i32;
/// Connection to the instrument was lost.
pub const VI_ERROR_CONN_LOST: i32 = 0xBFFF_00A6_u32 as i32;

/// Errors that can occur on an instrument session.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failure reported with a status code.
    #[error("{description} (status {code})")]
    Status { code: i32, description: String },

    /// Descriptor could not be parsed.
    #[error("invalid resource descriptor \"{0}\"")]
    InvalidDescriptor(String),

    /// Operation attempted without an open session.
    #[error("no open instrument session")]
    NotOpen,

    /// Socket I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// Creates a status error.
    pub fn status(code: i32, description: impl Into<String>) -> Self {
        Self::Status {
            code,
            description: description.into(),
        }
    }

    /// Returns the status code, if any.
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::Status { code, .. } => Some(*code),
            Self::InvalidDescriptor(_) => Some(VI_ERROR_INV_RSRC_NAME),
            Self::NotOpen | Self::Io(_) => None,
        }
    }
}

/// Convenience alias for results with [`TransportError`].
pub type Result<T> = std::result::Result<T, TransportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_match_visa_values() {
        assert_eq!(VI_ERROR_TMO, -1_073_807_339);
        assert_eq!(VI_ERROR_RSRC_NFOUND, -1_073_807_343);
        assert_eq!(VI_ERROR_NSUP_OPER, -1_073_807_257);
    }

    #[test]
    fn test_status_display() {
        let err = TransportError::status(VI_ERROR_TMO, "Timeout expired before operation completed.");
        assert_eq!(
            err.to_string(),
            "Timeout expired before operation completed. (status -1073807339)"
        );
        assert_eq!(err.code(), Some(VI_ERROR_TMO));
        assert_eq!(TransportError::NotOpen.code(), None);
    }
}
