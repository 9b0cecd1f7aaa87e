//! Program metadata and help-line rendering.
//!
//! [`ProgramInfo`] feeds the version flag; `help_line` formats one entry of
//! the help listing.

use serde::{Deserialize, Serialize};

/// Program metadata shown by the version flag.
///
/// # Examples
///
/// ```
/// use labctl_cmdline::ProgramInfo;
///
/// let info = ProgramInfo::new("keithley2701", "20140716")
///     .with_description("Control Keithley 2701 digital multimeter")
///     .with_copyright("(C) 2014");
///
/// assert_eq!(
///     info.version_text(),
///     "keithley2701 version 20140716\nControl Keithley 2701 digital multimeter\n(C) 2014"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramInfo {
    /// Program name.
    pub name: String,
    /// Version string.
    pub version: String,
    /// One-line description.
    #[serde(default)]
    pub description: String,
    /// Copyright notice.
    #[serde(default)]
    pub copyright: String,
}

impl ProgramInfo {
    /// Creates program metadata with an empty description and copyright.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: String::new(),
            copyright: String::new(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the copyright notice.
    pub fn with_copyright(mut self, copyright: impl Into<String>) -> Self {
        self.copyright = copyright.into();
        self
    }

    /// Renders `<name> version <version>`, the description and the copyright
    /// on three lines.
    pub fn version_text(&self) -> String {
        format!(
            "{} version {}\n{}\n{}",
            self.name, self.version, self.description, self.copyright
        )
    }
}

/// Formats one help line: the comma-joined name forms, then the help text.
pub(crate) fn help_line(forms: &[&str], help: &str) -> String {
    format!("{} : {help}\n", forms.join(", "))
}
