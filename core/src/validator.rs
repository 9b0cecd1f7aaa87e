//! Composable value validators.
//!
//! A [`Validator`] is a predicate that can also explain why a value was
//! rejected. Validators are plain owned values: combinators box their
//! operands, so a composed validator can be stored, cloned and passed around
//! freely.
//!
//! # Examples
//!
//! ```
//! use labctl_cmdline::Validator;
//!
//! let channel = Validator::range(1, 4);
//! assert!(channel.test(&2));
//! assert_eq!(channel.explain(&7), "7 out of range [1, 4]");
//!
//! let outside = !Validator::range(2, 5);
//! assert!(outside.test(&6));
//! assert_eq!(outside.explain(&3), "!( 3 out of range [2, 5] )");
//! ```

use std::fmt::{self, Write};
use std::ops;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{CmdlineError, Result};

const MATCH_ANYTHING: &str = ".*";

static MATCH_ANYTHING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&anchored(MATCH_ANYTHING)).expect("static regex must compile"));

fn anchored(source: &str) -> String {
    format!("^(?:{source})$")
}

/// Natural bounds of a numeric type, used by [`Validator::full_range`].
///
/// Floating point types use `-MAX` as their minimum so the default range is
/// symmetric.
pub trait NaturalBounds: Sized {
    fn natural_min() -> Self;
    fn natural_max() -> Self;
    fn zero() -> Self;
}

macro_rules! impl_integer_bounds {
    ($($ty:ty),*) => {
        $(
            impl NaturalBounds for $ty {
                fn natural_min() -> Self {
                    <$ty>::MIN
                }
                fn natural_max() -> Self {
                    <$ty>::MAX
                }
                fn zero() -> Self {
                    0
                }
            }
        )*
    };
}

macro_rules! impl_float_bounds {
    ($($ty:ty),*) => {
        $(
            impl NaturalBounds for $ty {
                fn natural_min() -> Self {
                    -<$ty>::MAX
                }
                fn natural_max() -> Self {
                    <$ty>::MAX
                }
                fn zero() -> Self {
                    0.0
                }
            }
        )*
    };
}

impl_integer_bounds!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_float_bounds!(f32, f64);

/// A compiled regular expression that must match a whole value.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compiles `source` for full-string matching.
    ///
    /// # Errors
    ///
    /// Returns [`CmdlineError::InvalidPattern`] if `source` is not a valid
    /// regular expression.
    pub fn new(source: &str) -> Result<Self> {
        let regex = Regex::new(&anchored(source)).map_err(|err| CmdlineError::InvalidPattern {
            pattern: source.to_string(),
            reason: err.to_string(),
        })?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// Returns the pattern as written by the caller.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns `true` if the whole of `text` matches.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl Default for Pattern {
    fn default() -> Self {
        Self {
            source: MATCH_ANYTHING.to_string(),
            regex: MATCH_ANYTHING_RE.clone(),
        }
    }
}

/// A predicate with an explanation for rejected values.
#[derive(Debug, Clone)]
pub enum Validator<T> {
    /// Accepts every value.
    AlwaysTrue,
    /// Accepts `min <= value <= max`.
    Range { min: T, max: T },
    /// Accepts values whose textual form matches the pattern in full.
    Matches(Pattern),
    /// Accepts what the inner validator rejects.
    Not(Box<Validator<T>>),
    /// Accepts what both validators accept.
    And(Box<Validator<T>>, Box<Validator<T>>),
    /// Accepts what either validator accepts.
    Or(Box<Validator<T>>, Box<Validator<T>>),
}

impl<T> Default for Validator<T> {
    fn default() -> Self {
        Self::AlwaysTrue
    }
}

impl<T> Validator<T> {
    /// A validator that accepts everything.
    pub fn always() -> Self {
        Self::AlwaysTrue
    }

    /// An inclusive range validator.
    pub fn range(min: T, max: T) -> Self {
        Self::Range { min, max }
    }

    /// A full-match regex validator.
    ///
    /// # Errors
    ///
    /// Returns [`CmdlineError::InvalidPattern`] if `pattern` does not compile.
    ///
    /// # Examples
    ///
    /// ```
    /// use labctl_cmdline::Validator;
    ///
    /// let coupling = Validator::<String>::matches("AC|DC").unwrap();
    /// assert!(coupling.test(&"DC".to_string()));
    /// assert!(!coupling.test(&"DCX".to_string()));
    /// assert!(Validator::<String>::matches("(").is_err());
    /// ```
    pub fn matches(pattern: &str) -> Result<Self> {
        Pattern::new(pattern).map(Self::Matches)
    }

    /// Accepts values accepted by both `self` and `other`.
    pub fn and(self, other: Self) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    /// Accepts values accepted by `self` or `other`.
    pub fn or(self, other: Self) -> Self {
        Self::Or(Box::new(self), Box::new(other))
    }

    /// Returns the inclusive bounds of a range validator.
    pub fn bounds(&self) -> Option<(&T, &T)> {
        match self {
            Self::Range { min, max } => Some((min, max)),
            _ => None,
        }
    }
}

impl<T: NaturalBounds> Validator<T> {
    /// A range spanning the natural bounds of `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use labctl_cmdline::Validator;
    ///
    /// let any_double = Validator::<f64>::full_range();
    /// assert_eq!(any_double.bounds(), Some((&-f64::MAX, &f64::MAX)));
    /// assert!(!any_double.test(&f64::INFINITY));
    /// ```
    pub fn full_range() -> Self {
        Self::range(T::natural_min(), T::natural_max())
    }

    /// A range from zero to the natural maximum of `T`.
    pub fn non_negative() -> Self {
        Self::range(T::zero(), T::natural_max())
    }
}

impl<T: PartialOrd + fmt::Display> Validator<T> {
    /// Returns `true` if `value` is accepted.
    pub fn test(&self, value: &T) -> bool {
        match self {
            Self::AlwaysTrue => true,
            Self::Range { min, max } => min <= value && value <= max,
            Self::Matches(pattern) => pattern.is_match(&value.to_string()),
            Self::Not(inner) => !inner.test(value),
            Self::And(a, b) => a.test(value) && b.test(value),
            Self::Or(a, b) => a.test(value) || b.test(value),
        }
    }

    /// Explains why `value` is rejected.
    ///
    /// The explanation is phrased for the negative case; calling it for an
    /// accepted value still renders the same text.
    pub fn explain(&self, value: &T) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_explanation(value, &mut out);
        out
    }

    fn write_explanation<W: Write>(&self, value: &T, out: &mut W) -> fmt::Result {
        match self {
            Self::AlwaysTrue => write!(out, "always-true validator cannot reject {value}"),
            Self::Range { min, max } => write!(out, "{value} out of range [{min}, {max}]"),
            Self::Matches(pattern) => write!(out, "{value} does not match {}", pattern.as_str()),
            Self::Not(inner) => {
                out.write_str("!( ")?;
                inner.write_explanation(value, out)?;
                out.write_str(" )")
            }
            Self::And(a, b) => {
                out.write_char('(')?;
                a.write_explanation(value, out)?;
                out.write_str(" && ")?;
                b.write_explanation(value, out)?;
                out.write_char(')')
            }
            Self::Or(a, b) => {
                out.write_char('(')?;
                a.write_explanation(value, out)?;
                out.write_str(" || ")?;
                b.write_explanation(value, out)?;
                out.write_char(')')
            }
        }
    }
}

impl<T> ops::Not for Validator<T> {
    type Output = Self;

    fn not(self) -> Self {
        Self::Not(Box::new(self))
    }
}

impl<T> From<Pattern> for Validator<T> {
    fn from(pattern: Pattern) -> Self {
        Self::Matches(pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_is_inclusive() {
        let v = Validator::range(2, 5);
        let accepted: Vec<i64> = (0..8).filter(|x| v.test(x)).collect();
        assert_eq!(accepted, vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_not_range_accepts_complement() {
        let inner = Validator::range(2, 5);
        let outer = !inner.clone();
        for x in -3..10 {
            assert_eq!(outer.test(&x), !inner.test(&x), "value {x}");
        }
        assert!(outer.test(&1));
        assert!(outer.test(&6));
        assert!(!outer.test(&2));
    }

    #[test]
    fn test_and_or_explanations_are_parenthesized() {
        let low = Validator::range(0, 10);
        let high = Validator::range(20, 30);
        let either = low.clone().or(high.clone());
        assert!(either.test(&25));
        assert!(!either.test(&15));
        assert_eq!(
            either.explain(&15),
            "(15 out of range [0, 10] || 15 out of range [20, 30])"
        );

        let both = low.and(!high);
        assert!(both.test(&5));
        assert_eq!(
            both.explain(&25),
            "(25 out of range [0, 10] && !( 25 out of range [20, 30] ))"
        );
    }

    #[test]
    fn test_combinator_outlives_operands() {
        let composed = {
            let temporary = Validator::range(1u64, 3);
            !temporary
        };
        assert!(composed.test(&4));
        assert!(!composed.test(&2));
    }

    #[test]
    fn test_pattern_requires_full_match() {
        let v = Validator::<String>::matches("[0-9]+").unwrap();
        assert!(v.test(&"1234".to_string()));
        assert!(!v.test(&"12a4".to_string()));
        assert!(!v.test(&"a1234".to_string()));
        assert_eq!(v.explain(&"12a4".to_string()), "12a4 does not match [0-9]+");
    }

    #[test]
    fn test_pattern_alternation_is_grouped() {
        let v = Validator::<String>::matches("ON|OFF").unwrap();
        assert!(v.test(&"ON".to_string()));
        assert!(v.test(&"OFF".to_string()));
        assert!(!v.test(&"ONOFF".to_string()));
    }

    #[test]
    fn test_pattern_on_numbers_uses_display() {
        let v = Validator::<i64>::matches("-?[0-9]{1,2}").unwrap();
        assert!(v.test(&-42));
        assert!(!v.test(&420));
    }

    #[test]
    fn test_default_pattern_matches_anything() {
        let v: Validator<String> = Pattern::default().into();
        assert!(v.test(&String::new()));
        assert!(v.test(&"TCPIP0::10.0.0.2::INSTR".to_string()));
        assert_eq!(Pattern::default().as_str(), ".*");
    }

    #[test]
    fn test_invalid_pattern_is_configuration_error() {
        let err = Validator::<String>::matches("[unclosed").unwrap_err();
        assert!(err.is_configuration());
        assert!(matches!(err, CmdlineError::InvalidPattern { ref pattern, .. } if pattern == "[unclosed"));
    }

    #[test]
    fn test_full_range_bounds() {
        assert_eq!(
            Validator::<i64>::full_range().bounds(),
            Some((&i64::MIN, &i64::MAX))
        );
        assert_eq!(
            Validator::<u64>::full_range().bounds(),
            Some((&0, &u64::MAX))
        );
        assert_eq!(
            Validator::<f64>::full_range().bounds(),
            Some((&-f64::MAX, &f64::MAX))
        );
    }

    #[test]
    fn test_non_negative() {
        let v = Validator::<i64>::non_negative();
        assert!(v.test(&0));
        assert!(!v.test(&-1));
        let v = Validator::<f64>::non_negative();
        assert!(v.test(&0.5));
        assert!(!v.test(&-0.5));
    }

    #[test]
    fn test_always_true_accepts_everything() {
        let v = Validator::<f64>::always();
        assert!(v.test(&f64::NAN));
        assert!(v.test(&-1.0));
        assert!(Validator::<String>::default().test(&"x".to_string()));
    }
}
