//! User-supplied entity references.
//!
//! # Invariants
//! - Any token that is an integer (optional sign, then digits) is an
//!   identifier, whatever its magnitude. A student or competency whose label
//!   is numeric text can therefore only be reached by its id, never by that
//!   label.

use std::fmt::{Display, Formatter};

/// A token typed by the user to pick a student or competency.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LookupToken {
    /// Token parsed as a storage identifier.
    Id(i64),
    /// Integer token too large for a storage identifier; matches nothing.
    OutOfRangeId(String),
    /// Anything else, kept verbatim and matched against names/titles.
    Name(String),
}

impl LookupToken {
    /// Classifies raw input.
    ///
    /// Surrounding whitespace is ignored for the integer check only; a
    /// name token keeps the input unchanged.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if !is_integer_text(trimmed) {
            return Self::Name(raw.to_string());
        }
        match trimmed.parse::<i64>() {
            Ok(id) => Self::Id(id),
            Err(_) => Self::OutOfRangeId(trimmed.to_string()),
        }
    }

    pub fn is_id(&self) -> bool {
        matches!(self, Self::Id(_) | Self::OutOfRangeId(_))
    }
}

impl From<&str> for LookupToken {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl Display for LookupToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::OutOfRangeId(digits) => f.write_str(digits),
            Self::Name(name) => f.write_str(name),
        }
    }
}

fn is_integer_text(value: &str) -> bool {
    let digits = value.strip_prefix(['+', '-']).unwrap_or(value);
    !digits.is_empty() && digits.bytes().all(|byte| byte.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::LookupToken;

    #[test]
    fn integers_become_ids() {
        assert_eq!(LookupToken::parse("12"), LookupToken::Id(12));
        assert_eq!(LookupToken::parse(" 7 "), LookupToken::Id(7));
        assert_eq!(LookupToken::parse("-3"), LookupToken::Id(-3));
        assert_eq!(LookupToken::parse("+4"), LookupToken::Id(4));
    }

    #[test]
    fn everything_else_is_a_verbatim_name() {
        assert_eq!(
            LookupToken::parse("Ada Lovelace"),
            LookupToken::Name("Ada Lovelace".to_string())
        );
        assert_eq!(LookupToken::parse("1.5"), LookupToken::Name("1.5".to_string()));
        assert_eq!(LookupToken::parse("7a"), LookupToken::Name("7a".to_string()));
        assert_eq!(LookupToken::parse(""), LookupToken::Name(String::new()));
    }

    #[test]
    fn integers_beyond_id_range_stay_in_id_mode() {
        let token = LookupToken::parse(" 99999999999999999999 ");
        assert_eq!(
            token,
            LookupToken::OutOfRangeId("99999999999999999999".to_string())
        );
        assert!(token.is_id());
        assert_eq!(token.to_string(), "99999999999999999999");

        assert!(LookupToken::parse("-99999999999999999999").is_id());
        assert_eq!(
            LookupToken::parse("-9223372036854775808"),
            LookupToken::Id(i64::MIN)
        );
        assert_eq!(LookupToken::parse("+"), LookupToken::Name("+".to_string()));
        assert_eq!(LookupToken::parse("--1"), LookupToken::Name("--1".to_string()));
    }

    #[test]
    fn numeric_names_are_always_ids() {
        let token = LookupToken::parse("2024");
        assert!(token.is_id());
        assert_eq!(token.to_string(), "2024");
    }
}
