//! Flag declaration types.
//!
//! A flag is declared once with a long name, a short name, a help string, a
//! fixed arity and an optional default. Names are stored without their
//! prefixes; [`Prefixes`] decides how they appear on the command line.

use serde::{Deserialize, Serialize};

/// Default prefix of long options (`--output`).
pub const DEFAULT_LONG_PREFIX: &str = "--";

/// Default prefix of short options (`-o`).
pub const DEFAULT_SHORT_PREFIX: &str = "-";

/// Opaque identifier of a registered flag.
///
/// Ids are assigned in registration order. The long and short form of a
/// flag resolve to the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FlagId(usize);

impl FlagId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Registration index of this flag.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Option prefix conventions.
///
/// # Examples
///
/// ```
/// use labctl_cmdline::Prefixes;
///
/// let prefixes = Prefixes::default();
/// assert_eq!(prefixes.long_form("output"), "--output");
/// assert_eq!(prefixes.short_form("o"), "-o");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefixes {
    /// Prefix of long options.
    pub long: String,
    /// Prefix of short options.
    pub short: String,
}

impl Default for Prefixes {
    fn default() -> Self {
        Self {
            long: DEFAULT_LONG_PREFIX.to_string(),
            short: DEFAULT_SHORT_PREFIX.to_string(),
        }
    }
}

impl Prefixes {
    /// Creates custom prefixes. They are checked when handed to
    /// [`CommandLine::with_prefixes`](crate::CommandLine::with_prefixes).
    pub fn new(long: &str, short: &str) -> Self {
        Self {
            long: long.to_string(),
            short: short.to_string(),
        }
    }

    /// Returns `name` with the long prefix.
    pub fn long_form(&self, name: &str) -> String {
        format!("{}{name}", self.long)
    }

    /// Returns `name` with the short prefix.
    pub fn short_form(&self, name: &str) -> String {
        format!("{}{name}", self.short)
    }
}

/// Declaration of a command line flag.
///
/// Use [`boolean`](FlagDefinition::boolean) for presence flags and
/// [`with_arity`](FlagDefinition::with_arity) for flags that consume
/// trailing values, then chain [`with_help`](FlagDefinition::with_help) and
/// [`with_default`](FlagDefinition::with_default).
///
/// # Examples
///
/// ```
/// use labctl_cmdline::FlagDefinition;
///
/// let verbose = FlagDefinition::boolean("verbose", "V").with_help("Chatty output");
/// assert!(verbose.is_boolean());
///
/// let output = FlagDefinition::with_arity("output", "o", 1)
///     .with_help("Output file")
///     .with_default("out.txt");
/// assert_eq!(output.arity, 1);
/// assert_eq!(output.default_value(), Some("out.txt"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagDefinition {
    /// Long name without prefix (e.g. "output").
    pub long: String,
    /// Short name without prefix (e.g. "o").
    pub short: String,
    /// Description shown in help text.
    pub help: String,
    /// Number of data tokens the flag consumes.
    pub arity: usize,
    /// Value used when the flag is absent from the input.
    pub default: Option<String>,
}

impl FlagDefinition {
    /// Creates a presence flag (arity zero).
    pub fn boolean(long: &str, short: &str) -> Self {
        Self::with_arity(long, short, 0)
    }

    /// Creates a flag that consumes exactly `arity` data tokens.
    pub fn with_arity(long: &str, short: &str, arity: usize) -> Self {
        Self {
            long: long.to_string(),
            short: short.to_string(),
            help: String::new(),
            arity,
            default: None,
        }
    }

    /// Sets the help text.
    pub fn with_help(mut self, help: &str) -> Self {
        self.help = help.to_string();
        self
    }

    /// Sets the default value. An empty default means "no default".
    pub fn with_default(mut self, default: &str) -> Self {
        self.default = (!default.is_empty()).then(|| default.to_string());
        self
    }

    /// Returns `true` for presence flags.
    pub fn is_boolean(&self) -> bool {
        self.arity == 0
    }

    /// Returns the default value, treating an empty string as absent.
    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref().filter(|value| !value.is_empty())
    }
}
