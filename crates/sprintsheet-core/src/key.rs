//! Sprint key parsing
//!
//! Sprint names arrive as free text from the dashboard ("Iteration 7 - Q3",
//! "ir21"). [`SprintKey::parse`] reduces them to the token the sheet's key
//! cells hold.

use std::fmt::{self, Display, Formatter};

use once_cell::sync::Lazy;
use regex::Regex;

static ITERATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Iteration\s+([0-9]+)").expect("valid regex"));

static BARE_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^IR[0-9]+$").expect("valid regex"));

/// Canonical sprint key, e.g. `IR07`
///
/// # Examples
/// - `"Iteration 7"` → `IR07`
/// - `"iteration 023"` → `IR23`
/// - `"ir5"` → `IR5` (already a key, kept verbatim)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SprintKey(String);

impl SprintKey {
    /// Derive the key from a sprint name
    ///
    /// Tries `Iteration <n>` anywhere in the name first, then a bare `IR<n>`
    /// token. Returns `None` when neither matches.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        if let Some(digits) = ITERATION.captures(name).and_then(|c| c.get(1)) {
            return Some(Self::from_digits(digits.as_str()));
        }
        BARE_KEY
            .is_match(name)
            .then(|| Self(name.to_ascii_uppercase()))
    }

    /// Key for an iteration number
    #[must_use]
    pub fn from_number(n: u64) -> Self {
        Self::from_digits(&n.to_string())
    }

    /// Normalize a digit run: drop leading zeros, pad to two digits
    fn from_digits(digits: &str) -> Self {
        let trimmed = digits.trim_start_matches('0');
        let number = if trimmed.is_empty() { "0" } else { trimmed };
        if number.len() == 1 {
            Self(format!("IR0{number}"))
        } else {
            Self(format!("IR{number}"))
        }
    }

    /// Key text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SprintKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SprintKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
