//! Paging and ordering parameters for product list queries.

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`PageSize`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PageSizeError {
    /// Zero products were requested.
    #[error("page size must be at least 1")]
    Zero,
    /// More products were requested than a single list page shows.
    #[error("page size must be at most {max} (got {got})")]
    TooLarge {
        /// Maximum allowed page size.
        max: u8,
        /// Requested page size.
        got: u32,
    },
}

/// Number of products fetched for one list page.
///
/// ## Constraints
///
/// - Range: 1 to [`PageSize::MAX`] inclusive
///
/// ```
/// use product_customization_core::PageSize;
///
/// assert_eq!(PageSize::new(20).unwrap().get(), 20);
/// assert!(PageSize::new(0).is_err());
/// assert!(PageSize::new(21).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u8")]
pub struct PageSize(u8);

impl PageSize {
    /// Largest page the product list requests.
    pub const MAX: u8 = 20;

    /// Validate a requested page size.
    ///
    /// # Errors
    ///
    /// Returns [`PageSizeError`] if `size` is zero or above [`PageSize::MAX`].
    pub fn new(size: u32) -> Result<Self, PageSizeError> {
        match u8::try_from(size) {
            Ok(0) => Err(PageSizeError::Zero),
            Ok(n) if n <= Self::MAX => Ok(Self(n)),
            _ => Err(PageSizeError::TooLarge {
                max: Self::MAX,
                got: size,
            }),
        }
    }

    /// The page size as an integer.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

impl TryFrom<u32> for PageSize {
    type Error = PageSizeError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageSize> for u8 {
    fn from(size: PageSize) -> Self {
        size.0
    }
}

/// Ordering requested for the product list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductSortOrder {
    /// Newest products first.
    #[default]
    CreatedAtDesc,
    /// Whatever order the upstream API returns.
    Unsorted,
}
