//! Option tables: declarative flag lists plus program metadata.
//!
//! A host program can declare its flags in code or load them from a YAML or
//! JSON file, then hand the table to
//! [`CommandLine::define_and_parse`], which adds the built-in `help` and
//! `version` flags before the table's own entries.
//!
//! # Example YAML
//!
//! ```yaml
//! program:
//!   name: afg3102c
//!   version: "20130517"
//!   description: Control Tektronix AFG3102C function generator
//!   copyright: (C) 2013
//! options:
//!   - help: Instrument resource descriptor
//!     long: resource
//!     short: r
//!     default: TCPIP0::10.0.0.7::5025::SOCKET
//!   - help: Sweep window start and stop in Hz
//!     long: sweep
//!     short: s
//!     arity: 2
//! ```

use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::command_line::CommandLine;
use crate::error::{Result, TableError};
use crate::program::ProgramInfo;
use crate::types::FlagDefinition;

/// Long name of the built-in help flag.
pub const HELP_LONG: &str = "help";
/// Short name of the built-in help flag.
pub const HELP_SHORT: &str = "h";
/// Long name of the built-in version flag.
pub const VERSION_LONG: &str = "version";
/// Short name of the built-in version flag.
pub const VERSION_SHORT: &str = "v";

/// One entry of an [`OptionTable`].
///
/// When `arity` is omitted it is one if a non-empty default is given and
/// zero otherwise.
///
/// # Examples
///
/// ```
/// use labctl_cmdline::OptionSpec;
///
/// let timeout = OptionSpec::new("Read timeout in ms", "timeout", "t").with_default("2000");
/// assert_eq!(timeout.effective_arity(), 1);
///
/// let debug = OptionSpec::new("Log protocol traffic", "debug", "d");
/// assert_eq!(debug.effective_arity(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Help text.
    pub help: String,
    /// Long name without prefix.
    pub long: String,
    /// Short name without prefix.
    pub short: String,
    /// Explicit arity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arity: Option<usize>,
    /// Default value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl OptionSpec {
    /// Creates an entry without default or explicit arity.
    pub fn new(help: &str, long: &str, short: &str) -> Self {
        Self {
            help: help.to_string(),
            long: long.to_string(),
            short: short.to_string(),
            arity: None,
            default: None,
        }
    }

    /// Sets the default value.
    pub fn with_default(mut self, default: &str) -> Self {
        self.default = Some(default.to_string());
        self
    }

    /// Sets an explicit arity.
    pub fn with_arity(mut self, arity: usize) -> Self {
        self.arity = Some(arity);
        self
    }

    /// Arity used at registration.
    pub fn effective_arity(&self) -> usize {
        self.arity.unwrap_or_else(|| {
            usize::from(self.default.as_deref().is_some_and(|value| !value.is_empty()))
        })
    }

    /// Converts the entry into a flag declaration.
    pub fn to_definition(&self) -> FlagDefinition {
        FlagDefinition::with_arity(&self.long, &self.short, self.effective_arity())
            .with_help(&self.help)
            .with_default(self.default.as_deref().unwrap_or_default())
    }
}

/// Flags and program metadata of a host program.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionTable {
    /// Metadata printed by the version flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<ProgramInfo>,
    /// Flags in registration order.
    #[serde(default)]
    pub options: Vec<OptionSpec>,
}

impl OptionTable {
    /// Creates an empty table for `program`.
    pub fn new(program: ProgramInfo) -> Self {
        Self {
            program: Some(program),
            options: Vec::new(),
        }
    }

    /// Appends an entry.
    pub fn with_option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    /// Parses a table from YAML.
    pub fn from_yaml_str(yaml: &str) -> std::result::Result<Self, TableError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parses a table from JSON.
    pub fn from_json_str(json: &str) -> std::result::Result<Self, TableError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a table from a file: YAML for `.yaml`/`.yml`, JSON otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Io`] if the file cannot be read, or
    /// [`TableError::Yaml`] / [`TableError::Json`] if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> std::result::Result<Self, TableError> {
        let path = path.as_ref();
        let reader = BufReader::new(std::fs::File::open(path)?);
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
        if is_yaml {
            Ok(serde_yaml::from_reader(reader)?)
        } else {
            Ok(serde_json::from_reader(reader)?)
        }
    }
}

impl CommandLine {
    /// Registers the built-in `help` and `version` flags and every entry of
    /// `table`, stores the table's program metadata, then parses.
    ///
    /// # Errors
    ///
    /// Any registration or parse error, see
    /// [`register`](CommandLine::register) and [`parse`](CommandLine::parse).
    ///
    /// # Examples
    ///
    /// ```
    /// use labctl_cmdline::*;
    ///
    /// let table = OptionTable::new(ProgramInfo::new("sr760", "2013"))
    ///     .with_option(OptionSpec::new("Span in Hz", "span", "s").with_default("100"));
    ///
    /// let mut cl = CommandLine::new(["--version"]);
    /// cl.define_and_parse(&table).unwrap();
    /// assert!(cl.is_defined("-v").unwrap());
    /// assert!(!cl.is_defined("--help").unwrap());
    /// assert_eq!(cl.get_uint("-s", &Validator::full_range()).unwrap(), 100);
    /// ```
    pub fn define_and_parse(&mut self, table: &OptionTable) -> Result<()> {
        self.register(FlagDefinition::boolean(HELP_LONG, HELP_SHORT).with_help("Print this text"))?;
        self.register(
            FlagDefinition::boolean(VERSION_LONG, VERSION_SHORT)
                .with_help("Print version information"),
        )?;
        for option in &table.options {
            self.register(option.to_definition())?;
        }
        if let Some(program) = &table.program {
            self.set_program_info(program.clone());
        }
        self.parse()
    }
}
