//! Input validation for account identifiers and currency codes
//!
//! Validated types keep their fields private so every instance has been
//! through `new()` / `FromStr`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::models::Currency;

// ============================================================================
// Validation Errors
// ============================================================================

/// Validation errors for account-level input
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ValidationError {
    #[error("Invalid length for {field}: expected {min}-{max}, got {actual}")]
    InvalidLength {
        field: &'static str,
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("Invalid format for {field}: '{value}' (expected: {expected})")]
    InvalidFormat {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("Unsupported currency: '{0}'")]
    UnsupportedCurrency(String),
}

// ============================================================================
// AccountId
// ============================================================================

/// Opaque, validated account identifier.
///
/// Ordered lexicographically; that order is the canonical lock order for
/// transfers touching two accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    pub const MAX_LEN: usize = 64;

    /// Create a validated AccountId
    ///
    /// # Validation Rules
    /// - Length: 1-64 characters
    /// - Characters: ASCII alphanumerics, `-` and `_`
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();

        if id.is_empty() || id.len() > Self::MAX_LEN {
            return Err(ValidationError::InvalidLength {
                field: "account_id",
                min: 1,
                max: Self::MAX_LEN,
                actual: id.len(),
            });
        }

        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ValidationError::InvalidFormat {
                field: "account_id",
                value: id,
                expected: "[A-Za-z0-9_-]",
            });
        }

        Ok(Self(id))
    }

    /// Fresh ULID-based account id.
    pub fn generate() -> Self {
        Self(ulid::Ulid::new().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AccountId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for AccountId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Currency parsing
// ============================================================================

impl FromStr for Currency {
    type Err = ValidationError;

    /// Case-insensitive ISO 4217 code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            _ => Err(ValidationError::UnsupportedCurrency(s.to_string())),
        }
    }
}
