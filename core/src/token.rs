//! Token classification.
//!
//! Each raw argument is tagged as [`TokenKind::Flag`] or [`TokenKind::Data`]
//! from the prefix conventions alone; the flag registry is not consulted, so
//! unknown flags still classify as flags and fail later at resolution.
//!
//! Rules, with the default prefixes:
//!
//! - `--name` is a flag when `name` is a letter followed by letters or
//!   digits. A bare `--` or a body with any other character is malformed.
//! - `-x...` is a flag when `x` is a letter. A bare `-` is malformed.
//!   Anything else after `-` (`-5`, `-.25`) is data, so negative numbers
//!   pass through as values.
//! - Everything else is data.

use tracing::trace;

use crate::error::{CmdlineError, OptionKind, Result};
use crate::types::Prefixes;

/// Classification of a raw argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Flag,
    Data,
}

/// Alphanumeric and not a digit.
pub(crate) fn is_name_start(ch: char) -> bool {
    ch.is_ascii_alphabetic()
}

pub(crate) fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
}

/// Returns `true` if `body` can follow the long prefix.
pub(crate) fn is_long_body(body: &str) -> bool {
    let mut chars = body.chars();
    chars.next().is_some_and(is_name_start) && chars.all(is_name_char)
}

/// Classifies a single token.
///
/// # Errors
///
/// Returns [`CmdlineError::MalformedToken`] for a bare prefix or a long
/// option body containing characters other than letters and digits.
///
/// # Examples
///
/// ```
/// use labctl_cmdline::{Prefixes, TokenKind, classify_token};
///
/// let prefixes = Prefixes::default();
/// assert_eq!(classify_token("--output", &prefixes).unwrap(), TokenKind::Flag);
/// assert_eq!(classify_token("-o", &prefixes).unwrap(), TokenKind::Flag);
/// assert_eq!(classify_token("-5", &prefixes).unwrap(), TokenKind::Data);
/// assert!(classify_token("-", &prefixes).is_err());
/// ```
pub fn classify_token(token: &str, prefixes: &Prefixes) -> Result<TokenKind> {
    if let Some(body) = token.strip_prefix(prefixes.long.as_str()) {
        if is_long_body(body) {
            return Ok(TokenKind::Flag);
        }
        return Err(CmdlineError::MalformedToken {
            kind: OptionKind::Long,
            token: token.to_string(),
        });
    }

    if let Some(body) = token.strip_prefix(prefixes.short.as_str()) {
        return match body.chars().next() {
            None => Err(CmdlineError::MalformedToken {
                kind: OptionKind::Short,
                token: token.to_string(),
            }),
            Some(first) if is_name_start(first) => Ok(TokenKind::Flag),
            Some(_) => Ok(TokenKind::Data),
        };
    }

    Ok(TokenKind::Data)
}

/// Classifies every argument, returning one tag per argument.
///
/// # Errors
///
/// Fails on the first malformed token, see [`classify_token`].
pub fn classify<S: AsRef<str>>(args: &[S], prefixes: &Prefixes) -> Result<Vec<TokenKind>> {
    args.iter()
        .map(|arg| {
            let arg = arg.as_ref();
            let kind = classify_token(arg, prefixes)?;
            trace!(token = arg, kind = ?kind, "Classified token");
            Ok(kind)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(args: &[&str]) -> Vec<TokenKind> {
        classify(args, &Prefixes::default()).unwrap()
    }

    #[test]
    fn test_classify_mixed_arguments() {
        use TokenKind::{Data, Flag};
        assert_eq!(
            kinds(&["-o", "result.txt", "--verbose", "pos1", "-3.5", "x"]),
            vec![Flag, Data, Flag, Data, Data, Data]
        );
    }

    #[test]
    fn test_output_length_matches_input() {
        let args = ["a", "-b", "--cc", "-1", "d"];
        assert_eq!(kinds(&args).len(), args.len());
        assert!(kinds(&[]).is_empty());
    }

    #[test]
    fn test_bare_short_prefix_is_malformed() {
        let err = classify(&["-"], &Prefixes::default()).unwrap_err();
        assert_eq!(
            err,
            CmdlineError::MalformedToken {
                kind: OptionKind::Short,
                token: "-".to_string(),
            }
        );
        assert_eq!(err.to_string(), "Invalid short option \"-\".");
    }

    #[test]
    fn test_bare_long_prefix_is_malformed() {
        let err = classify_token("--", &Prefixes::default()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid long option \"--\".");
    }

    #[test]
    fn test_long_body_rules() {
        let prefixes = Prefixes::default();
        assert_eq!(classify_token("--ch2", &prefixes).unwrap(), TokenKind::Flag);
        for bad in ["--2ch", "--dry-run", "--out=x", "--a b", "--é"] {
            assert!(
                matches!(
                    classify_token(bad, &prefixes),
                    Err(CmdlineError::MalformedToken { kind: OptionKind::Long, .. })
                ),
                "{bad} should be malformed"
            );
        }
    }

    #[test]
    fn test_short_digit_or_symbol_is_data() {
        let prefixes = Prefixes::default();
        for data in ["-5", "-0.25", "-.5", "-?", "-é"] {
            assert_eq!(classify_token(data, &prefixes).unwrap(), TokenKind::Data, "{data}");
        }
        assert_eq!(classify_token("-a1", &prefixes).unwrap(), TokenKind::Flag);
    }

    #[test]
    fn test_custom_prefixes() {
        let prefixes = Prefixes::new("//", "/");
        assert_eq!(classify_token("//help", &prefixes).unwrap(), TokenKind::Flag);
        assert_eq!(classify_token("/h", &prefixes).unwrap(), TokenKind::Flag);
        assert_eq!(classify_token("-h", &prefixes).unwrap(), TokenKind::Data);
        assert!(classify_token("/", &prefixes).is_err());
    }
}
