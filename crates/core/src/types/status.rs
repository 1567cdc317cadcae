//! Status enums for the product list view.

use serde::{Deserialize, Serialize};

/// Product publication status as shown in the product list.
///
/// Maps to the `ACTIVE` and `DRAFT` values of Shopify's `ProductStatus`.
/// The list view only deals with these two; toggling flips between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    /// Product is visible on the storefront.
    Active,
    /// Product is not visible (work in progress).
    Draft,
}

impl ProductStatus {
    /// The status a toggle moves to.
    ///
    /// ```rust
    /// # use product_customization_core::ProductStatus;
    /// assert_eq!(ProductStatus::Active.toggled(), ProductStatus::Draft);
    /// assert_eq!(ProductStatus::Draft.toggled(), ProductStatus::Active);
    /// ```
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Draft,
            Self::Draft => Self::Active,
        }
    }

    /// Upstream enum value (`ACTIVE` / `DRAFT`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Draft => "DRAFT",
        }
    }

    /// Human label used by the rendered page.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Draft => "Draft",
        }
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProductStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(Self::Active),
            "DRAFT" => Ok(Self::Draft),
            _ => Err(format!("invalid product status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_twice_is_identity() {
        for status in [ProductStatus::Active, ProductStatus::Draft] {
            assert_eq!(status.toggled().toggled(), status);
            assert_ne!(status.toggled(), status);
        }
    }

    #[test]
    fn test_display_matches_upstream_enum() {
        assert_eq!(ProductStatus::Active.to_string(), "ACTIVE");
        assert_eq!(ProductStatus::Draft.to_string(), "DRAFT");
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("active".parse::<ProductStatus>(), Ok(ProductStatus::Active));
        assert_eq!("DRAFT".parse::<ProductStatus>(), Ok(ProductStatus::Draft));
        assert!("ARCHIVED".parse::<ProductStatus>().is_err());
    }

    #[test]
    fn test_serde_uses_screaming_case() {
        let json = serde_json::to_string(&ProductStatus::Draft).unwrap_or_default();
        assert_eq!(json, "\"DRAFT\"");
    }
}
