//! Declaration checks.
//!
//! Validates flag declarations and prefix conventions before they enter the
//! registry, catching names that could never be matched on the command line.
//!
//! # Examples
//!
//! ```
//! use labctl_cmdline::*;
//!
//! assert!(validate_definition(&FlagDefinition::boolean("verbose", "V")).is_ok());
//!
//! // Invalid: short name starting with a digit
//! let bad = FlagDefinition::boolean("channel", "1");
//! assert_eq!(
//!     validate_definition(&bad),
//!     Err(CmdlineError::InvalidShortFlag("1".to_string()))
//! );
//! ```

use crate::error::{CmdlineError, Result};
use crate::token::{is_long_body, is_name_start};
use crate::types::{FlagDefinition, Prefixes};

/// Validates a flag declaration.
///
/// Both names must be non-empty, the short name must start with a letter,
/// and the long name must be a letter followed by letters or digits.
pub fn validate_definition(definition: &FlagDefinition) -> Result<()> {
    if definition.long.is_empty() || definition.short.is_empty() {
        return Err(CmdlineError::EmptyFlagName);
    }

    if !definition.short.chars().next().is_some_and(is_name_start) {
        return Err(CmdlineError::InvalidShortFlag(definition.short.clone()));
    }

    if !is_long_body(&definition.long) {
        return Err(CmdlineError::InvalidLongFlag(definition.long.clone()));
    }

    Ok(())
}

/// Validates option prefixes: both non-empty, and the short prefix must not
/// begin with the long one, since long forms are recognized first.
pub fn validate_prefixes(prefixes: &Prefixes) -> Result<()> {
    if prefixes.long.is_empty()
        || prefixes.short.is_empty()
        || prefixes.short.starts_with(prefixes.long.as_str())
    {
        return Err(CmdlineError::InvalidPrefixes {
            long: prefixes.long.clone(),
            short: prefixes.short.clone(),
        });
    }
    Ok(())
}
