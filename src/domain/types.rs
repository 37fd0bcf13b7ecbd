//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (e.g., non-empty identifiers,
//! normalized/validated email, non-negative stock) so that once a value
//! reaches the domain layer it can be treated as trusted.
use std::{ops::Deref, str::FromStr};

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;
use validator::{ValidateEmail, ValidateUrl};

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided email failed format validation.
    #[error("invalid email address")]
    InvalidEmail,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
    /// Provided url failed format validation.
    #[error("invalid url address")]
    InvalidUrl,
    /// Provided quantity was below zero.
    #[error("value cannot be negative")]
    Negative,
    /// Provided price was zero or below.
    #[error("price must be greater than zero")]
    NonPositivePrice,
}

/// Normalizes and validates an email string.
fn normalize_email<S: Into<String>>(email: S) -> Result<String, TypeConstraintError> {
    let normalized = email.into().trim().to_lowercase();
    if normalized.validate_email() {
        Ok(normalized)
    } else {
        Err(TypeConstraintError::InvalidEmail)
    }
}

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new(value)?;
                Ok(Self(inner.into_inner()))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

// The API hands out opaque string identifiers (UUIDs for most entities,
// slugs such as `admin` for roles).
non_empty_string_newtype!(ProductId, "Server-assigned identifier of a product.");
non_empty_string_newtype!(CategoryId, "Server-assigned identifier of a category.");
non_empty_string_newtype!(UserId, "Server-assigned identifier of a user account.");
non_empty_string_newtype!(RoleId, "Role identifier, e.g. `admin` or `user`.");

non_empty_string_newtype!(ProductName, "Product name enforcing non-empty values.");
non_empty_string_newtype!(CategoryName, "Category name enforcing non-empty values.");
non_empty_string_newtype!(RoleName, "Human readable role name.");
non_empty_string_newtype!(Username, "Login name enforcing trimmed, non-empty values.");
non_empty_string_newtype!(FullName, "Display name of a user.");

/// Lower-cased and validated email address.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct UserEmail(String);

impl UserEmail {
    /// Validates and normalizes an email string.
    pub fn new<S: Into<String>>(email: S) -> Result<Self, TypeConstraintError> {
        let normalized = normalize_email(email)?;
        Ok(Self(normalized))
    }

    /// Borrow the email as a `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the owned inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for UserEmail {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for UserEmail {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for UserEmail {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserEmail> for String {
    fn from(value: UserEmail) -> Self {
        value.0
    }
}

/// Product description with markup stripped down to a safe subset.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductDescription(String);

impl ProductDescription {
    /// Constructs a sanitized, trimmed, non-empty value.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let sanitized = ammonia::clean(&value.into());
        let inner = NonEmptyString::new(sanitized)?;
        Ok(Self(inner.into_inner()))
    }

    /// Borrow the value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for ProductDescription {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
/// Non-empty, trimmed image URL.
pub struct ImageUrl(String);

impl ImageUrl {
    /// Ensures a trimmed URL is non-empty and well formed before wrapping.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let url = NonEmptyString::new(value)?;

        if !url.as_str().validate_url() {
            Err(TypeConstraintError::InvalidUrl)
        } else {
            Ok(Self(url.into_inner()))
        }
    }

    /// Borrow the URL.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extract the owned URL.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for ImageUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unit price of a product, strictly positive.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct Price(f64);

impl Price {
    pub fn new(value: f64) -> Result<Self, TypeConstraintError> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::NonPositivePrice)
        }
    }

    pub const fn get(self) -> f64 {
        self.0
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! quantity_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(i64);

        impl $name {
            /// Creates a new quantity ensuring it is not negative.
            pub fn new(value: i64) -> Result<Self, TypeConstraintError> {
                if value >= 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::Negative)
                }
            }

            /// Returns the raw `i64` backing this quantity.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i64> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

quantity_newtype!(StockQuantity, "Units of a product currently in stock.");
quantity_newtype!(
    LowStockThreshold,
    "Stock level at or below which a product is reported as running low."
);

/// Stock level bucket computed by the API for each product.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    /// Out of stock.
    Red,
    /// At or below the low-stock threshold.
    Yellow,
    /// Available.
    Green,
}

impl StockStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StockStatus::Red => "red",
            StockStatus::Yellow => "yellow",
            StockStatus::Green => "green",
        }
    }

    /// Short label shown next to a product.
    pub fn label(self) -> &'static str {
        match self {
            StockStatus::Red => "Out of stock",
            StockStatus::Yellow => "Running low",
            StockStatus::Green => "Available",
        }
    }
}

impl Display for StockStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StockStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "red" => Ok(StockStatus::Red),
            "yellow" => Ok(StockStatus::Yellow),
            "green" => Ok(StockStatus::Green),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_normalized() {
        let email = UserEmail::new("  Alice@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "alice@example.com");
        assert_eq!(
            UserEmail::new("not-an-email"),
            Err(TypeConstraintError::InvalidEmail)
        );
    }

    #[test]
    fn identifiers_reject_blank_values() {
        assert_eq!(ProductId::new("   "), Err(TypeConstraintError::EmptyString));
        assert_eq!(RoleId::new(" admin ").unwrap().as_str(), "admin");
    }

    #[test]
    fn description_is_sanitized() {
        let description = ProductDescription::new("<b>Fast</b><script>alert(1)</script>").unwrap();
        assert_eq!(description.as_str(), "<b>Fast</b>");
        assert!(ProductDescription::new("<script>x</script>").is_err());
    }

    #[test]
    fn quantities_and_prices_enforce_bounds() {
        assert!(StockQuantity::new(0).is_ok());
        assert_eq!(StockQuantity::new(-1), Err(TypeConstraintError::Negative));
        assert_eq!(Price::new(0.0), Err(TypeConstraintError::NonPositivePrice));
        assert_eq!(Price::new(15000.0).unwrap().get(), 15000.0);
    }

    #[test]
    fn image_url_requires_valid_url() {
        assert!(ImageUrl::new("https://cdn.example.com/a.png").is_ok());
        assert_eq!(ImageUrl::new("nope"), Err(TypeConstraintError::InvalidUrl));
    }

    #[test]
    fn stock_status_parses_case_insensitively() {
        assert_eq!("GREEN".parse::<StockStatus>().unwrap(), StockStatus::Green);
        assert!("blue".parse::<StockStatus>().is_err());
    }
}
