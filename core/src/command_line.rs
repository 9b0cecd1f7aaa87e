//! The command line engine: flag registry, resolver and accessors.
//!
//! Usage follows a fixed sequence: construct from the raw arguments,
//! register flags, [`parse`](CommandLine::parse) once, then query values and
//! free arguments as often as needed.
//!
//! # Example
//!
//! ```
//! use labctl_cmdline::*;
//!
//! let mut cl = CommandLine::new(["-o", "result.txt", "pos1"]);
//! cl.add_flag("Output file", "output", "o", 1, "out.txt").unwrap();
//! cl.parse().unwrap();
//!
//! assert_eq!(cl.value("-o").unwrap(), "result.txt");
//! assert_eq!(cl.value("--output").unwrap(), "result.txt");
//! assert_eq!(cl.free_arguments(), ["pos1"]);
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use tracing::debug;

use crate::convert::{parse_double, parse_int, parse_uint};
use crate::error::{CmdlineError, Result};
use crate::program::{ProgramInfo, help_line};
use crate::token::{TokenKind, classify};
use crate::types::{FlagDefinition, FlagId, Prefixes};
use crate::validate::{validate_definition, validate_prefixes};
use crate::validator::Validator;

/// Flag registry and parse result for one set of raw arguments.
#[derive(Debug, Clone)]
pub struct CommandLine {
    prefixes: Prefixes,
    args: Vec<String>,
    parsed: bool,
    definitions: Vec<FlagDefinition>,
    flag_ids: HashMap<String, FlagId>,
    values: BTreeMap<FlagId, String>,
    free_arguments: Vec<String>,
    program: Option<ProgramInfo>,
}

impl CommandLine {
    /// Creates an engine over `args`, which must not include the program
    /// name.
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: Prefixes::default(),
            args: args.into_iter().map(Into::into).collect(),
            parsed: false,
            definitions: Vec::new(),
            flag_ids: HashMap::new(),
            values: BTreeMap::new(),
            free_arguments: Vec::new(),
            program: None,
        }
    }

    /// Creates an engine over the process arguments, skipping the program
    /// name.
    pub fn from_env() -> Self {
        Self::new(std::env::args().skip(1))
    }

    /// Creates an engine with custom option prefixes.
    ///
    /// # Errors
    ///
    /// Returns [`CmdlineError::InvalidPrefixes`] if either prefix is empty
    /// or the short prefix begins with the long one.
    pub fn with_prefixes<I, S>(args: I, prefixes: Prefixes) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        validate_prefixes(&prefixes)?;
        Ok(Self {
            prefixes,
            ..Self::new(args)
        })
    }

    /// Raw arguments as given at construction.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Option prefixes in use.
    pub fn prefixes(&self) -> &Prefixes {
        &self.prefixes
    }

    /// Registers a flag and returns its id.
    ///
    /// A non-empty default is stored immediately, so the flag reads as
    /// defined even when it never appears on the command line.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the declaration is invalid, if one
    /// of its names is already registered, or if the command line was
    /// already parsed. The registry is left unchanged on error.
    pub fn register(&mut self, definition: FlagDefinition) -> Result<FlagId> {
        if self.parsed {
            return Err(CmdlineError::RegisteredAfterParse(
                self.prefixes.long_form(&definition.long),
            ));
        }
        validate_definition(&definition)?;

        let long = self.prefixes.long_form(&definition.long);
        let short = self.prefixes.short_form(&definition.short);
        for form in [&long, &short] {
            if self.flag_ids.contains_key(form.as_str()) {
                return Err(CmdlineError::DuplicateFlag(form.clone()));
            }
        }

        let id = FlagId::new(self.definitions.len());
        if let Some(default) = definition.default_value() {
            self.values.insert(id, default.to_string());
        }
        debug!(
            flag = %long,
            short = %short,
            arity = definition.arity,
            default = ?definition.default_value(),
            "Registered flag"
        );
        self.flag_ids.insert(long, id);
        self.flag_ids.insert(short, id);
        self.definitions.push(definition);
        Ok(id)
    }

    /// Registers a flag from its parts. An empty `default` means none.
    pub fn add_flag(
        &mut self,
        help: &str,
        long: &str,
        short: &str,
        arity: usize,
        default: &str,
    ) -> Result<FlagId> {
        self.register(
            FlagDefinition::with_arity(long, short, arity)
                .with_help(help)
                .with_default(default),
        )
    }

    /// Resolves a prefixed flag name to its id.
    ///
    /// # Errors
    ///
    /// Returns [`CmdlineError::UnknownFlag`] if `name` was never registered.
    pub fn flag_id(&self, name: &str) -> Result<FlagId> {
        self.flag_ids
            .get(name)
            .copied()
            .ok_or_else(|| CmdlineError::UnknownFlag(name.to_string()))
    }

    /// Returns the declaration registered under `id`.
    pub fn definition(&self, id: FlagId) -> Option<&FlagDefinition> {
        self.definitions.get(id.index())
    }

    /// Iterates over all declarations in registration order.
    pub fn definitions(&self) -> impl Iterator<Item = (FlagId, &FlagDefinition)> {
        self.definitions
            .iter()
            .enumerate()
            .map(|(index, definition)| (FlagId::new(index), definition))
    }

    /// Classifies the raw arguments and binds every flag to its values.
    ///
    /// Each flag token consumes exactly as many following data tokens as its
    /// arity; the values are joined with single spaces. Data tokens not
    /// consumed by a flag become free arguments. A flag given twice keeps
    /// its last value.
    ///
    /// Parsing again yields the same result. On error nothing is exposed:
    /// the engine reports itself as not parsed.
    ///
    /// # Errors
    ///
    /// - [`CmdlineError::MalformedToken`] for a bare prefix or a long option
    ///   with forbidden characters.
    /// - [`CmdlineError::UnknownFlag`] for a flag token that is not
    ///   registered.
    /// - [`CmdlineError::Arity`] when fewer data tokens than required follow
    ///   a flag.
    pub fn parse(&mut self) -> Result<()> {
        self.parsed = false;
        let kinds = classify(&self.args, &self.prefixes)?;

        let mut values = self.default_values();
        let mut free_arguments = Vec::new();
        let mut i = 0;
        while i < self.args.len() {
            let arg = &self.args[i];
            if kinds[i] == TokenKind::Data {
                free_arguments.push(arg.clone());
                i += 1;
                continue;
            }

            let id = self.flag_id(arg)?;
            let required = self.definitions[id.index()].arity;
            let given = kinds[i + 1..]
                .iter()
                .take(required)
                .take_while(|kind| **kind == TokenKind::Data)
                .count();
            if given < required {
                return Err(CmdlineError::Arity {
                    flag: arg.clone(),
                    required,
                    given,
                });
            }

            values.insert(id, self.args[i + 1..i + 1 + required].join(" "));
            i += required + 1;
        }

        debug!(
            flags = values.len(),
            free_arguments = free_arguments.len(),
            "Parsed command line"
        );
        self.values = values;
        self.free_arguments = free_arguments;
        self.parsed = true;
        Ok(())
    }

    fn default_values(&self) -> BTreeMap<FlagId, String> {
        self.definitions()
            .filter_map(|(id, definition)| {
                definition
                    .default_value()
                    .map(|value| (id, value.to_string()))
            })
            .collect()
    }

    /// Returns `true` once [`parse`](CommandLine::parse) has succeeded.
    pub fn is_parsed(&self) -> bool {
        self.parsed
    }

    /// Returns whether a flag has a value, either from the input or from its
    /// default. Always `false` before parsing.
    ///
    /// # Errors
    ///
    /// Returns [`CmdlineError::UnknownFlag`] after parsing if `name` was
    /// never registered.
    pub fn is_defined(&self, name: &str) -> Result<bool> {
        if !self.parsed {
            return Ok(false);
        }
        let id = self.flag_id(name)?;
        Ok(self.values.contains_key(&id))
    }

    /// Returns the value of a flag without validation.
    pub fn value(&self, name: &str) -> Result<&str> {
        self.get(name, &Validator::always())
    }

    /// Returns the value of a flag after checking it with `validator`.
    ///
    /// # Errors
    ///
    /// - [`CmdlineError::UnknownFlag`] if `name` was never registered.
    /// - [`CmdlineError::UndefinedFlag`] if the flag has no value.
    /// - [`CmdlineError::Validation`] if `validator` rejects the value.
    pub fn get(&self, name: &str, validator: &Validator<String>) -> Result<&str> {
        let value = self.raw_value(name)?;
        check(name, value, validator)?;
        Ok(value.as_str())
    }

    /// Returns the value of a flag as a signed integer.
    ///
    /// # Errors
    ///
    /// As [`get`](CommandLine::get), plus [`CmdlineError::Conversion`] if
    /// the value is not a decimal integer.
    pub fn get_int(&self, name: &str, validator: &Validator<i64>) -> Result<i64> {
        self.converted(name, "integer", parse_int, validator)
    }

    /// Returns the value of a flag as an unsigned integer.
    ///
    /// Decimal, `0x` hexadecimal and leading-zero octal are accepted.
    pub fn get_uint(&self, name: &str, validator: &Validator<u64>) -> Result<u64> {
        self.converted(name, "unsigned integer", parse_uint, validator)
    }

    /// Returns the value of a flag as a double.
    ///
    /// # Examples
    ///
    /// ```
    /// use labctl_cmdline::*;
    ///
    /// let mut cl = CommandLine::new(["--frequency", "-2.5e3"]);
    /// cl.add_flag("Frequency in Hz", "frequency", "f", 1, "").unwrap();
    /// cl.parse().unwrap();
    ///
    /// let hz = cl.get_double("-f", &Validator::full_range()).unwrap();
    /// assert_eq!(hz, -2500.0);
    ///
    /// let err = cl.get_double("-f", &Validator::non_negative()).unwrap_err();
    /// assert!(matches!(err, CmdlineError::Validation { .. }));
    /// ```
    pub fn get_double(&self, name: &str, validator: &Validator<f64>) -> Result<f64> {
        self.converted(name, "double", parse_double, validator)
    }

    fn raw_value(&self, name: &str) -> Result<&String> {
        let id = self.flag_id(name)?;
        self.values
            .get(&id)
            .ok_or_else(|| CmdlineError::UndefinedFlag(name.to_string()))
    }

    fn converted<T, F>(
        &self,
        name: &str,
        target: &'static str,
        convert: F,
        validator: &Validator<T>,
    ) -> Result<T>
    where
        T: PartialOrd + fmt::Display,
        F: FnOnce(&str) -> Option<T>,
    {
        let raw = self.raw_value(name)?;
        let value = convert(raw).ok_or_else(|| CmdlineError::Conversion {
            flag: name.to_string(),
            value: raw.clone(),
            target,
        })?;
        check(name, &value, validator)?;
        Ok(value)
    }

    /// Number of free arguments.
    pub fn count_free_arguments(&self) -> usize {
        self.free_arguments.len()
    }

    /// Returns the free argument at position `n` (0-indexed).
    ///
    /// # Errors
    ///
    /// Returns [`CmdlineError::Bounds`] if `n` is out of range.
    pub fn free_argument(&self, n: usize) -> Result<&str> {
        self.free_arguments
            .get(n)
            .map(String::as_str)
            .ok_or(CmdlineError::Bounds {
                requested: n,
                available: self.free_arguments.len(),
            })
    }

    /// All free arguments in input order.
    pub fn free_arguments(&self) -> &[String] {
        &self.free_arguments
    }

    /// Stores program metadata for [`version_text`](CommandLine::version_text).
    pub fn set_program_info(&mut self, info: ProgramInfo) {
        self.program = Some(info);
    }

    /// Program metadata, if set.
    pub fn program_info(&self) -> Option<&ProgramInfo> {
        self.program.as_ref()
    }

    /// Renders one line per registered flag: its name forms, sorted and
    /// comma-joined, then ` : ` and the help text.
    ///
    /// # Examples
    ///
    /// ```
    /// use labctl_cmdline::*;
    ///
    /// let mut cl = CommandLine::new(Vec::<String>::new());
    /// cl.add_flag("Print this text", "help", "h", 0, "").unwrap();
    /// cl.add_flag("Output file", "output", "o", 1, "out.txt").unwrap();
    /// assert_eq!(
    ///     cl.help_text(),
    ///     "--help, -h : Print this text\n--output, -o : Output file\n"
    /// );
    /// ```
    pub fn help_text(&self) -> String {
        self.definitions
            .iter()
            .map(|definition| {
                let long = self.prefixes.long_form(&definition.long);
                let short = self.prefixes.short_form(&definition.short);
                let mut forms = [long.as_str(), short.as_str()];
                forms.sort_unstable();
                help_line(&forms, &definition.help)
            })
            .collect()
    }

    /// Renders the version text of the stored program metadata, or an empty
    /// string if none was set.
    pub fn version_text(&self) -> String {
        self.program
            .as_ref()
            .map(ProgramInfo::version_text)
            .unwrap_or_default()
    }
}

fn check<T>(name: &str, value: &T, validator: &Validator<T>) -> Result<()>
where
    T: PartialOrd + fmt::Display,
{
    if validator.test(value) {
        Ok(())
    } else {
        Err(CmdlineError::Validation {
            flag: name.to_string(),
            explanation: validator.explain(value),
        })
    }
}
