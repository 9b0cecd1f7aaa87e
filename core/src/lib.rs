//! Fixed-arity command line parsing with composable value validators.
//!
//! This crate provides the pieces a small instrument-control program needs
//! to read its command line:
//!
//! - [`CommandLine`]: flag registry, single-pass resolver and typed
//!   accessors. Every flag has a long and a short form and a fixed number
//!   of trailing values.
//! - [`Validator`]: owned predicates with explanations (ranges, regex
//!   matches, negation, conjunction, disjunction), applied when a value is
//!   retrieved.
//! - [`Text`]: English text fragments (spelled numerals, plurals,
//!   alternatives) used to build diagnostics.
//! - [`OptionTable`]: declarative flag lists, loadable from YAML or JSON,
//!   with built-in `help` and `version` flags.
//!
//! Errors are reported as [`CmdlineError`]; a host program catches them once,
//! prints them and exits with a non-zero status.
//!
//! # Example
//!
//! ```
//! use labctl_cmdline::*;
//!
//! let mut cl = CommandLine::new(["--channel", "2", "--window", "-10", "10", "trace.csv"]);
//! cl.add_flag("Input channel", "channel", "c", 1, "1").unwrap();
//! cl.add_flag("Time window in ms", "window", "w", 2, "").unwrap();
//! cl.add_flag("Verbose output", "verbose", "V", 0, "").unwrap();
//! cl.parse().unwrap();
//!
//! assert_eq!(cl.get_uint("-c", &Validator::range(1, 4)).unwrap(), 2);
//! assert_eq!(cl.value("--window").unwrap(), "-10 10");
//! assert!(!cl.is_defined("-V").unwrap());
//! assert_eq!(cl.free_argument(0).unwrap(), "trace.csv");
//!
//! let err = cl.free_argument(1).unwrap_err();
//! assert_eq!(err.to_string(), "Only one argument given. Requested argument one.");
//! ```

mod command_line;
mod convert;
mod error;
mod options;
mod program;
mod text;
mod token;
mod types;
mod validate;
mod validator;

pub use command_line::CommandLine;
pub use convert::{parse_double, parse_int, parse_uint};
pub use error::{CmdlineError, OptionKind, Result, TableError};
pub use options::{HELP_LONG, HELP_SHORT, OptionSpec, OptionTable, VERSION_LONG, VERSION_SHORT};
pub use program::ProgramInfo;
pub use text::Text;
pub use token::{TokenKind, classify, classify_token};
pub use types::*;
pub use validate::{validate_definition, validate_prefixes};
pub use validator::{NaturalBounds, Pattern, Validator};
