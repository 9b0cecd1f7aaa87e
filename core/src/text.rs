//! Composable English text fragments.
//!
//! Diagnostics such as `Flag "--range" requires two arguments. Only one
//! given.` depend on counts that are only known at runtime. Instead of
//! string templating, messages are assembled from small [`Text`] fragments
//! that spell out numerals, pluralize nouns and pick between alternatives.
//!
//! # Examples
//!
//! ```
//! use labctl_cmdline::Text;
//!
//! let given = 1;
//! let message = Text::choose(
//!     given == 0,
//!     "None",
//!     Text::literal("Only ").then(Text::numeral(given)),
//! )
//! .then(" given.");
//! assert_eq!(message.to_string(), "Only one given.");
//! ```

use std::borrow::Cow;
use std::fmt;

const ENGLISH_NUMERALS: [&str; 10] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
];

/// A text fragment that can be written into any [`fmt::Write`] sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Text {
    /// Verbatim text.
    Literal(Cow<'static, str>),
    /// Fragments written one after another.
    Concat(Vec<Text>),
    /// `when_true` if `condition` holds, `when_false` otherwise.
    Choice {
        condition: bool,
        when_true: Box<Text>,
        when_false: Box<Text>,
    },
    /// A count spelled as an English word for 0-9, as digits above.
    Numeral(usize),
    /// `word`, with an `s` appended unless `count` is exactly one.
    Plural { word: Box<Text>, count: usize },
}

impl Text {
    /// Creates a literal fragment.
    pub fn literal(text: impl Into<Cow<'static, str>>) -> Self {
        Self::Literal(text.into())
    }

    /// Creates a spelled-out numeral.
    ///
    /// # Examples
    ///
    /// ```
    /// use labctl_cmdline::Text;
    ///
    /// assert_eq!(Text::numeral(3).to_string(), "three");
    /// assert_eq!(Text::numeral(12).to_string(), "12");
    /// ```
    pub fn numeral(count: usize) -> Self {
        Self::Numeral(count)
    }

    /// Pluralizes `word` for `count`.
    ///
    /// # Examples
    ///
    /// ```
    /// use labctl_cmdline::Text;
    ///
    /// assert_eq!(Text::plural("argument", 0).to_string(), "arguments");
    /// assert_eq!(Text::plural("argument", 1).to_string(), "argument");
    /// assert_eq!(Text::plural("argument", 2).to_string(), "arguments");
    /// ```
    pub fn plural(word: impl Into<Text>, count: usize) -> Self {
        Self::Plural {
            word: Box::new(word.into()),
            count,
        }
    }

    /// Selects between two fragments.
    pub fn choose(condition: bool, when_true: impl Into<Text>, when_false: impl Into<Text>) -> Self {
        Self::Choice {
            condition,
            when_true: Box::new(when_true.into()),
            when_false: Box::new(when_false.into()),
        }
    }

    /// Appends `next` after this fragment.
    pub fn then(self, next: impl Into<Text>) -> Self {
        let next = next.into();
        match self {
            Self::Concat(mut parts) => {
                parts.push(next);
                Self::Concat(parts)
            }
            other => Self::Concat(vec![other, next]),
        }
    }

    /// Writes the fragment into `out`.
    pub fn write_to<W: fmt::Write + ?Sized>(&self, out: &mut W) -> fmt::Result {
        match self {
            Self::Literal(text) => out.write_str(text),
            Self::Concat(parts) => parts.iter().try_for_each(|part| part.write_to(out)),
            Self::Choice {
                condition,
                when_true,
                when_false,
            } => {
                if *condition {
                    when_true.write_to(out)
                } else {
                    when_false.write_to(out)
                }
            }
            Self::Numeral(count) => match ENGLISH_NUMERALS.get(*count) {
                Some(word) => out.write_str(word),
                None => write!(out, "{count}"),
            },
            Self::Plural { word, count } => {
                word.write_to(out)?;
                if *count != 1 {
                    out.write_char('s')?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f)
    }
}

impl From<&'static str> for Text {
    fn from(text: &'static str) -> Self {
        Self::Literal(Cow::Borrowed(text))
    }
}

impl From<String> for Text {
    fn from(text: String) -> Self {
        Self::Literal(Cow::Owned(text))
    }
}
