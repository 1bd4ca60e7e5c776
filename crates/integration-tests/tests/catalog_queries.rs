//! Integration tests for catalog payload decoding.
//!
//! The product projection renames platform-internal fields; these tests pin
//! the contract between that projection and the `Product` type.

use rust_decimal::Decimal;

use velour_storefront::content::{Gender, Product};

#[test]
fn test_projected_product_payload_decodes() {
    let payload = serde_json::json!({
        "id": "product-oud-royale",
        "createdAt": "2025-01-15T10:00:00Z",
        "name": "Oud Royale",
        "slug": "oud-royale",
        "gender": "men",
        "price": 189.00,
        "description": "Oud Royale eau de parfum, 50ml.",
        "imageUrl": "https://cdn.sanity.io/images/abc/production/oud.jpg",
        "bestseller": true,
        "category": "woody",
        "inStock": true
    });

    let product: Product = serde_json::from_value(payload).expect("payload decodes");

    assert_eq!(product.id, "product-oud-royale");
    assert_eq!(product.slug, "oud-royale");
    assert_eq!(product.gender, Gender::Men);
    assert_eq!(product.price, Decimal::new(18900, 2));
    assert!(product.bestseller);
    assert!(product.in_stock);
}

#[test]
fn test_sparse_product_payload_decodes_with_defaults() {
    // Editors can publish a product before filling in the optional fields.
    let payload = serde_json::json!({
        "id": "product-draft",
        "createdAt": "2025-01-15T10:00:00Z",
        "name": "Draft Fragrance",
        "slug": "draft-fragrance",
        "gender": "women",
        "price": 99.00
    });

    let product: Product = serde_json::from_value(payload).expect("payload decodes");

    assert_eq!(product.description, "");
    assert!(product.image_url.is_none());
    assert!(!product.bestseller);
    assert!(product.category.is_none());
    // Missing inStock means purchasable, not hidden
    assert!(product.in_stock);
}

#[test]
fn test_unknown_gender_is_rejected() {
    let payload = serde_json::json!({
        "id": "product-x",
        "createdAt": "2025-01-15T10:00:00Z",
        "name": "X",
        "slug": "x",
        "gender": "unisex",
        "price": 99.00
    });

    assert!(serde_json::from_value::<Product>(payload).is_err());
}

#[test]
fn test_product_list_payload_decodes_in_order() {
    let payload = serde_json::json!([
        {
            "id": "product-b",
            "createdAt": "2025-02-01T10:00:00Z",
            "name": "B",
            "slug": "b",
            "gender": "men",
            "price": 10.00
        },
        {
            "id": "product-a",
            "createdAt": "2025-01-01T10:00:00Z",
            "name": "A",
            "slug": "a",
            "gender": "men",
            "price": 20.00
        }
    ]);

    let products: Vec<Product> = serde_json::from_value(payload).expect("payload decodes");

    // The platform sorts; the client preserves its order
    assert_eq!(products[0].id, "product-b");
    assert_eq!(products[1].id, "product-a");
}
