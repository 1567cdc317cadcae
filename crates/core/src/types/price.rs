//! List-view price representation using decimal arithmetic.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ListPrice`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is not a decimal number.
    #[error("invalid price amount: {0}")]
    InvalidAmount(String),
}

/// The price shown for a product row.
///
/// Sourced from the product's first variant. Products without a variant
/// have no price, which renders as the [`ListPrice::NOT_AVAILABLE`] sentinel.
///
/// Serializes as a string: the decimal amount exactly as Shopify returned it
/// (scale preserved, so `"100.00"` stays `"100.00"`) or `"N/A"`.
///
/// ```
/// use product_customization_core::ListPrice;
///
/// assert_eq!(ListPrice::from_first_variant(Some("19.90")).unwrap().to_string(), "19.90");
/// assert_eq!(ListPrice::from_first_variant(None).unwrap().to_string(), "N/A");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ListPrice {
    /// Price of the first variant, in the shop currency.
    Amount(Decimal),
    /// The product has no variant to take a price from.
    NotAvailable,
}

impl ListPrice {
    /// Sentinel displayed when there is no variant price.
    pub const NOT_AVAILABLE: &'static str = "N/A";

    /// Build the list price from the first variant's price, if any.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::InvalidAmount`] if the upstream amount is not a decimal.
    pub fn from_first_variant(price: Option<&str>) -> Result<Self, PriceError> {
        price.map_or(Ok(Self::NotAvailable), Self::parse_amount)
    }

    fn parse_amount(amount: &str) -> Result<Self, PriceError> {
        Decimal::from_str(amount.trim())
            .map(Self::Amount)
            .map_err(|_| PriceError::InvalidAmount(amount.to_string()))
    }

    /// The decimal amount, if there is one.
    #[must_use]
    pub const fn amount(&self) -> Option<Decimal> {
        match self {
            Self::Amount(amount) => Some(*amount),
            Self::NotAvailable => None,
        }
    }
}

impl fmt::Display for ListPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Amount(amount) => write!(f, "{amount}"),
            Self::NotAvailable => f.write_str(Self::NOT_AVAILABLE),
        }
    }
}

impl From<ListPrice> for String {
    fn from(price: ListPrice) -> Self {
        price.to_string()
    }
}

impl TryFrom<String> for ListPrice {
    type Error = PriceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == Self::NOT_AVAILABLE {
            Ok(Self::NotAvailable)
        } else {
            Self::parse_amount(&value)
        }
    }
}
