//! Error types for flag registration, parsing and value retrieval.
//!
//! Every failure is reported as soon as it is detected. Messages are
//! complete English sentences assembled with [`Text`] so a host program can
//! print them verbatim.

use std::fmt;

use thiserror::Error;

use crate::text::Text;

/// Which option form a malformed token was read as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Short,
    Long,
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Short => f.write_str("short"),
            Self::Long => f.write_str("long"),
        }
    }
}

/// Errors raised by [`CommandLine`](crate::CommandLine) and the validator
/// algebra.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CmdlineError {
    /// Short flag name is empty-bodied or does not start with a letter.
    #[error("Invalid short flag \"{0}\": must start with a letter.")]
    InvalidShortFlag(String),
    /// Long flag name is not a letter followed by letters or digits.
    #[error("Invalid long flag \"{0}\": must be a letter followed by letters or digits.")]
    InvalidLongFlag(String),
    /// A flag was declared without a long or short name.
    #[error("Flag names cannot be empty.")]
    EmptyFlagName,
    /// A long or short form is already taken by another flag.
    #[error("Flag \"{0}\" is already registered.")]
    DuplicateFlag(String),
    /// Registration attempted once the command line has been parsed.
    #[error("Flag \"{0}\" cannot be registered after parsing.")]
    RegisteredAfterParse(String),
    /// Option prefixes are empty or identical.
    #[error("Invalid option prefixes: long \"{long}\", short \"{short}\".")]
    InvalidPrefixes { long: String, short: String },
    /// A regex validator was built from a pattern that does not compile.
    #[error("Invalid pattern \"{pattern}\": {reason}")]
    InvalidPattern { pattern: String, reason: String },
    /// Lookup of a name that was never registered.
    #[error("Unknown command line flag \"{0}\".")]
    UnknownFlag(String),
    /// Bare prefix, or a long option body with forbidden characters.
    #[error("Invalid {kind} option \"{token}\".")]
    MalformedToken { kind: OptionKind, token: String },
    /// Too few data tokens follow a flag.
    #[error("{}", arity_message(.flag, .required, .given))]
    Arity {
        flag: String,
        required: usize,
        given: usize,
    },
    /// Value requested for a flag that was neither supplied nor defaulted.
    #[error("Requested flag \"{0}\" undefined.")]
    UndefinedFlag(String),
    /// A value is present but its validator rejected it.
    #[error("Argument of flag \"{flag}\": {explanation}")]
    Validation { flag: String, explanation: String },
    /// Free argument index past the end of the free argument list.
    #[error("{}", bounds_message(.requested, .available))]
    Bounds { requested: usize, available: usize },
    /// A value could not be converted to the requested numeric type.
    #[error("Argument of flag \"{flag}\": cannot convert \"{value}\" to {target}.")]
    Conversion {
        flag: String,
        value: String,
        target: &'static str,
    },
}

impl CmdlineError {
    /// Returns `true` for errors caused by an invalid declaration rather
    /// than by the user's input.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidShortFlag(_)
                | Self::InvalidLongFlag(_)
                | Self::EmptyFlagName
                | Self::DuplicateFlag(_)
                | Self::RegisteredAfterParse(_)
                | Self::InvalidPrefixes { .. }
                | Self::InvalidPattern { .. }
        )
    }
}

fn arity_message(flag: &str, required: &usize, given: &usize) -> Text {
    Text::literal(format!("Flag \"{flag}\" requires "))
        .then(Text::numeral(*required))
        .then(" ")
        .then(Text::plural("argument", *required))
        .then(". ")
        .then(Text::choose(
            *given == 0,
            "None",
            Text::literal("Only ").then(Text::numeral(*given)),
        ))
        .then(" given.")
}

fn bounds_message(requested: &usize, available: &usize) -> Text {
    Text::choose(
        *available == 0,
        "No",
        Text::literal("Only ").then(Text::numeral(*available)),
    )
    .then(" ")
    .then(Text::plural("argument", *available))
    .then(" given. Requested argument ")
    .then(Text::numeral(*requested))
    .then(".")
}

/// Errors raised while loading an [`OptionTable`](crate::OptionTable).
#[derive(Debug, Error)]
pub enum TableError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Convenience alias for results with [`CmdlineError`].
pub type Result<T> = std::result::Result<T, CmdlineError>;
