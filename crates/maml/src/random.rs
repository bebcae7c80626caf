//! Random text generation for fuzzing input fields

use crate::error::{MamlError, Result};
use rand::seq::SliceRandom;
use tracing::warn;

const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const DIGITS: &str = "0123456789";
const PUNCTUATION: &str = r##"!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~"##;
const WHITESPACE: &str = " \t\n\r\x0b\x0c";

/// Character classes selectable by one-letter codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// `u`
    Uppercase,
    /// `l`
    Lowercase,
    /// `d`
    Digits,
    /// `p`
    Punctuation,
    /// `s`, a single space
    Space,
    /// `w`: space, tab, linefeed, carriage return, vertical tab, form feed
    Whitespace,
    /// `a`: every printable character
    All,
}

impl CharClass {
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'u' => Some(Self::Uppercase),
            'l' => Some(Self::Lowercase),
            'd' => Some(Self::Digits),
            'p' => Some(Self::Punctuation),
            's' => Some(Self::Space),
            'w' => Some(Self::Whitespace),
            'a' => Some(Self::All),
            _ => None,
        }
    }

    pub fn chars(self) -> String {
        match self {
            Self::Uppercase => UPPERCASE.to_string(),
            Self::Lowercase => LOWERCASE.to_string(),
            Self::Digits => DIGITS.to_string(),
            Self::Punctuation => PUNCTUATION.to_string(),
            Self::Space => " ".to_string(),
            Self::Whitespace => WHITESPACE.to_string(),
            Self::All => [DIGITS, LOWERCASE, UPPERCASE, PUNCTUATION, WHITESPACE].concat(),
        }
    }
}

/// Build the alphabet for a string of class codes
///
/// Codes accumulate in order, duplicates included. `a` replaces everything
/// gathered so far and ends parsing. Unknown codes are skipped.
pub fn alphabet(types: &str) -> Vec<char> {
    let mut choices = String::new();
    for code in types.chars() {
        match CharClass::from_code(code) {
            Some(CharClass::All) => {
                choices = CharClass::All.chars();
                break;
            }
            Some(class) => choices.push_str(&class.chars()),
            None => warn!(code = %code, "ignoring unknown character class"),
        }
    }
    choices.chars().collect()
}

/// Draw `length` characters uniformly, with replacement, from the classes in `types`
pub fn random_text(length: usize, types: &str) -> Result<String> {
    let choices = alphabet(types);
    if choices.is_empty() {
        return Err(MamlError::InvalidArgument(format!(
            "no characters to choose from in class codes {:?}",
            types
        )));
    }

    let mut rng = rand::thread_rng();
    Ok((0..length)
        .filter_map(|_| choices.choose(&mut rng).copied())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_only() {
        let text = random_text(8, "d").unwrap();
        assert_eq!(text.chars().count(), 8);
        assert!(text.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_all_is_printable() {
        let printable = alphabet("a");
        assert_eq!(printable.len(), 100);

        let text = random_text(200, "a").unwrap();
        assert!(text.chars().all(|c| printable.contains(&c)));
    }

    #[test]
    fn test_all_overrides_earlier_codes() {
        assert_eq!(alphabet("da"), alphabet("a"));
        assert_eq!(alphabet("adl"), alphabet("a"));
    }

    #[test]
    fn test_combined_classes() {
        let choices = alphabet("ul");
        assert_eq!(choices.len(), 52);
        let text = random_text(50, "ul").unwrap();
        assert!(text.chars().all(|c| c.is_ascii_alphabetic()));
    }

    #[test]
    fn test_space_and_whitespace() {
        assert_eq!(alphabet("s"), vec![' ']);
        assert!(alphabet("w").iter().all(|c| c.is_whitespace()));
        assert_eq!(alphabet("w").len(), 6);
    }

    #[test]
    fn test_punctuation_set() {
        let choices = alphabet("p");
        assert_eq!(choices.len(), 32);
        assert!(choices.iter().all(|c| c.is_ascii_punctuation()));
    }

    #[test]
    fn test_zero_length() {
        assert_eq!(random_text(0, "l").unwrap(), "");
    }

    #[test]
    fn test_unknown_codes_only() {
        assert!(matches!(
            random_text(5, "q?"),
            Err(MamlError::InvalidArgument(_))
        ));
        assert!(matches!(random_text(5, ""), Err(MamlError::InvalidArgument(_))));
    }
}
