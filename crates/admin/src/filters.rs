//! Custom Askama template filters.

use std::fmt::Display;

use product_customization_core::ProductStatus;

/// Badge classes for a product status.
///
/// Usage in templates: `{{ product.current_status|status_tone }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn status_tone(value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(match value.to_string().parse::<ProductStatus>() {
        Ok(ProductStatus::Active) => "bg-green-100 text-green-700",
        Ok(ProductStatus::Draft) => "bg-yellow-100 text-yellow-700",
        Err(_) => "bg-gray-100 text-gray-700",
    })
}
