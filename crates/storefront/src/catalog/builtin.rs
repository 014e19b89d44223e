//! Built-in sample catalog, the last resolution tier.

use mountrush_core::{Price, Product, ProductId};

/// `(id, title, category, price, image, desc)` for each sample product.
const SAMPLES: [(&str, &str, &str, u64, &str, &str); 4] = [
    (
        "p-tent-01",
        "Summit 2P Tent",
        "camping",
        8499,
        "images/tent.jpg",
        "Ultra-light 2-person tent, waterproof, compact.",
    ),
    (
        "p-stove-01",
        "Trail Compact Stove",
        "camping",
        2499,
        "images/stove.jpg",
        "Gas canister stove with wind guard.",
    ),
    (
        "p-boots-01",
        "Alpine Hiker Boots",
        "hiking",
        6999,
        "images/boots.jpg",
        "Waterproof boots with durable grip.",
    ),
    (
        "p-pack-01",
        "Voyager 45L Pack",
        "gear",
        4999,
        "images/pack.jpg",
        "Comfort-fit trekking pack with rain cover.",
    ),
];

/// The four sample products, spanning three categories.
#[must_use]
pub fn sample_products() -> Vec<Product> {
    SAMPLES
        .iter()
        .filter_map(|&(id, title, category, price, image, desc)| {
            let id = ProductId::parse(id).ok()?;
            Some(
                Product::new(id, title, category, Price::new(price))
                    .with_image(image)
                    .with_description(desc),
            )
        })
        .collect()
}
