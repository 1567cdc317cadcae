//! Component lookup conversion functions.

use crate::shopify::types::{ComponentSummary, ProductComponents};

use super::super::queries::{get_product_components, get_product_variant_components};

pub fn convert_product_components(
    product: get_product_components::GetProductComponentsProduct,
) -> ProductComponents {
    ProductComponents {
        id: product.id,
        title: product.title,
        components: product
            .bundle_components
            .nodes
            .into_iter()
            .map(|node| ComponentSummary {
                id: node.component_product.id,
                title: node.component_product.title,
            })
            .collect(),
    }
}

pub fn convert_variant_components(
    variant: get_product_variant_components::GetProductVariantComponentsProductVariant,
) -> ProductComponents {
    ProductComponents {
        id: variant.id,
        title: variant.title,
        components: variant
            .product_variant_components
            .nodes
            .into_iter()
            .map(|node| ComponentSummary {
                id: node.product_variant.id,
                title: node.product_variant.title,
            })
            .collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_variant_components_flatten_nodes() {
        let variant = serde_json::from_value(json!({
            "id": "gid://shopify/ProductVariant/1",
            "title": "Bundle",
            "productVariantComponents": { "nodes": [
                { "productVariant": { "id": "gid://shopify/ProductVariant/2", "title": "Wax" } },
                { "productVariant": { "id": "gid://shopify/ProductVariant/3", "title": "Leash" } }
            ]}
        }))
        .unwrap();

        let converted = convert_variant_components(variant);
        assert_eq!(converted.title, "Bundle");
        let titles: Vec<_> = converted.components.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["Wax", "Leash"]);
    }

    #[test]
    fn test_product_components_flatten_nodes() {
        let product = serde_json::from_value(json!({
            "id": "gid://shopify/Product/1",
            "title": "Starter Kit",
            "bundleComponents": { "nodes": [
                { "componentProduct": { "id": "gid://shopify/Product/5", "title": "Red Snowboard" } }
            ]}
        }))
        .unwrap();

        let converted = convert_product_components(product);
        assert_eq!(converted.components.len(), 1);
        assert_eq!(converted.components[0].id, "gid://shopify/Product/5");
    }
}
