//! # Label Codes
//!
//! A code is a short prefix, a dash, and a zero-padded decimal number:
//!
//! ```text
//! T-006519
//! │ └────┴── number, padded to the deployment's fixed width
//! └──────── prefix, 1-3 uppercase letters or digits
//! ```
//!
//! ## Example
//!
//! ```
//! use labelsheet::code::{Code, CodeWidth, Prefix};
//!
//! let prefix = Prefix::parse("t").unwrap();
//! let code = Code::new(prefix, 6519, CodeWidth::SIX).unwrap();
//! assert_eq!(code.to_string(), "T-006519");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::LabelError;

/// Separator between prefix and number.
pub const SEPARATOR: char = '-';

/// Maximum prefix length in characters.
pub const MAX_PREFIX_LEN: usize = 3;

/// A validated code prefix (`[A-Z0-9]{1,3}`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Prefix(String);

impl Prefix {
    /// Normalize (trim, uppercase) and validate a prefix.
    pub fn parse(raw: &str) -> Result<Self, LabelError> {
        let normalized = raw.trim().to_ascii_uppercase();

        if normalized.is_empty() {
            return Err(LabelError::validation("prefix must not be empty"));
        }
        if normalized.len() > MAX_PREFIX_LEN {
            return Err(LabelError::validation(format!(
                "prefix '{}' is longer than {} characters",
                normalized, MAX_PREFIX_LEN
            )));
        }
        if !normalized
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        {
            return Err(LabelError::validation(format!(
                "prefix '{}' may only contain letters A-Z and digits 0-9",
                raw.trim()
            )));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Number of decimal digits in a code's numeric suffix.
///
/// Fixed per deployment. Codes of different widths never share a sequence,
/// even under the same prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CodeWidth(u8);

impl CodeWidth {
    pub const MIN: u8 = 3;
    pub const MAX: u8 = 9;

    pub const FIVE: Self = Self(5);
    pub const SIX: Self = Self(6);

    pub fn new(digits: u8) -> Result<Self, LabelError> {
        if !(Self::MIN..=Self::MAX).contains(&digits) {
            return Err(LabelError::validation(format!(
                "code width must be between {} and {} digits, got {}",
                Self::MIN,
                Self::MAX,
                digits
            )));
        }
        Ok(Self(digits))
    }

    #[inline]
    pub fn digits(&self) -> u8 {
        self.0
    }

    /// Largest number representable at this width (`10^width - 1`).
    #[inline]
    pub fn max_number(&self) -> u64 {
        10u64.pow(self.0 as u32) - 1
    }
}

impl Default for CodeWidth {
    fn default() -> Self {
        Self::SIX
    }
}

impl TryFrom<u8> for CodeWidth {
    type Error = LabelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CodeWidth> for u8 {
    fn from(width: CodeWidth) -> Self {
        width.0
    }
}

/// A fully formed code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Code {
    prefix: Prefix,
    number: u64,
    width: CodeWidth,
}

impl Code {
    /// Build a code, rejecting 0 and numbers that do not fit the width.
    pub fn new(prefix: Prefix, number: u64, width: CodeWidth) -> Result<Self, LabelError> {
        if number == 0 || number > width.max_number() {
            return Err(LabelError::validation(format!(
                "number {} is outside 1..={} for width {}",
                number,
                width.max_number(),
                width.digits()
            )));
        }
        Ok(Self {
            prefix,
            number,
            width,
        })
    }

    /// Parse a rendered code such as `T-000042`.
    ///
    /// The width is taken from the number of digits after the separator.
    pub fn parse(text: &str) -> Result<Self, LabelError> {
        let (prefix, digits) = text
            .trim()
            .split_once(SEPARATOR)
            .ok_or_else(|| LabelError::validation(format!("'{}' has no '-' separator", text)))?;

        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(LabelError::validation(format!(
                "'{}' has a non-numeric suffix",
                text
            )));
        }

        let width = u8::try_from(digits.len())
            .map_err(|_| LabelError::validation(format!("'{}' suffix is too long", text)))
            .and_then(CodeWidth::new)?;
        let number: u64 = digits
            .parse()
            .map_err(|_| LabelError::validation(format!("'{}' suffix is not a number", text)))?;

        Self::new(Prefix::parse(prefix)?, number, width)
    }

    pub fn prefix(&self) -> &Prefix {
        &self.prefix
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn width(&self) -> CodeWidth {
        self.width
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{:0width$}",
            self.prefix,
            SEPARATOR,
            self.number,
            width = self.width.digits() as usize
        )
    }
}

/// Entries of `texts` that are not well-formed codes.
///
/// Sheets print any non-blank text, so these are reported rather than rejected.
pub fn unrecognized<S: AsRef<str>>(texts: &[S]) -> Vec<&str> {
    texts
        .iter()
        .map(|text| text.as_ref())
        .filter(|text| Code::parse(text).is_err())
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
