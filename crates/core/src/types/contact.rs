//! Buyer contact fields collected on the first checkout step.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input string is empty.
    #[error("email cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("email must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input is not `local@domain`.
    #[error("email must look like name@domain")]
    Malformed,
}

/// A structurally valid email address.
///
/// ```
/// use bazaar_core::Email;
///
/// assert!(Email::parse("buyer@example.com").is_ok());
/// assert!(Email::parse("buyer@").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email` from form input (surrounding whitespace ignored).
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, too long, or does not have
    /// exactly one `@` with text on both sides.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        match s.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(s.to_owned()))
            }
            _ => Err(EmailError::Malformed),
        }
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// Wrong number of digits for the `+7 (999) 999-99-99` mask.
    #[error("phone must have 10 digits after +7, got {0}")]
    WrongLength(usize),
}

/// A phone number in the storefront's `+7 (999) 999-99-99` input mask.
///
/// Stores the ten subscriber digits; formatting re-applies the mask.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Parse whatever the buyer typed.
    ///
    /// Non-digits are ignored. Eleven digits with a leading `7` or `8` are
    /// accepted as a full number with country/trunk prefix.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneError::WrongLength`] when the digits do not fill the
    /// mask.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let digits: String = s.chars().filter(char::is_ascii_digit).collect();
        let subscriber = match digits.len() {
            10 => digits,
            11 if digits.starts_with('7') || digits.starts_with('8') => {
                digits.chars().skip(1).collect()
            }
            n => return Err(PhoneError::WrongLength(n)),
        };
        Ok(Self(subscriber))
    }

    /// The number with the mask applied, e.g. `+7 (912) 345-67-89`.
    #[must_use]
    pub fn masked(&self) -> String {
        let d = &self.0;
        format!(
            "+7 ({}) {}-{}-{}",
            d.get(0..3).unwrap_or_default(),
            d.get(3..6).unwrap_or_default(),
            d.get(6..8).unwrap_or_default(),
            d.get(8..10).unwrap_or_default()
        )
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_emails() {
        assert!(Email::parse("user@example.com").is_ok());
        assert!(Email::parse("  user+tag@example.co.uk ").is_ok());
        assert_eq!(Email::parse(" a@b.c ").unwrap().as_str(), "a@b.c");
    }

    #[test]
    fn test_parse_invalid_emails() {
        assert_eq!(Email::parse(""), Err(EmailError::Empty));
        assert_eq!(Email::parse("no-at-symbol"), Err(EmailError::Malformed));
        assert_eq!(Email::parse("@domain.com"), Err(EmailError::Malformed));
        assert_eq!(Email::parse("user@"), Err(EmailError::Malformed));
        assert_eq!(Email::parse("a@b@c"), Err(EmailError::Malformed));
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(Email::parse(&long), Err(EmailError::TooLong { .. })));
    }

    #[test]
    fn test_email_deserialize_validates() {
        assert!(serde_json::from_str::<Email>("\"x@y.z\"").is_ok());
        assert!(serde_json::from_str::<Email>("\"nope\"").is_err());
    }

    #[test]
    fn test_phone_mask() {
        let phone = Phone::parse("9123456789").unwrap();
        assert_eq!(phone.masked(), "+7 (912) 345-67-89");
    }

    #[test]
    fn test_phone_accepts_prefixes_and_punctuation() {
        assert_eq!(
            Phone::parse("+7 (912) 345-67-89").unwrap().to_string(),
            "+7 (912) 345-67-89"
        );
        assert_eq!(
            Phone::parse("8 912 345 67 89").unwrap().to_string(),
            "+7 (912) 345-67-89"
        );
    }

    #[test]
    fn test_phone_wrong_length() {
        assert_eq!(Phone::parse("12345"), Err(PhoneError::WrongLength(5)));
        assert_eq!(
            Phone::parse("19123456789"),
            Err(PhoneError::WrongLength(11))
        );
    }
}
