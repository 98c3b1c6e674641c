use rust_decimal::{Decimal, dec};

use crate::{
    error::Result,
    models::{NewCategory, NewProduct, NewReview},
    store::Store,
};

const SAMPLE_CATEGORIES: [(&str, &str); 7] = [
    ("Men", "/men.jpg"),
    ("Women", "/women.jpg"),
    ("Kids", "/kids.jpg"),
    ("Pants", "/pants.jpg"),
    ("Jeans", "/jeans.jpg"),
    ("Sweater", "/sweater.jpg"),
    ("Shoe", "/shoe.jpg"),
];

// (name, price, image, index into SAMPLE_CATEGORIES)
const SAMPLE_PRODUCTS: [(&str, Decimal, &str, usize); 12] = [
    ("Orange Airsuit", dec!(99.00), "/p1.jpg", 0),
    ("Blue Denim Jacket", dec!(89.00), "/p2.jpg", 1),
    ("Kids Summer Dress", dec!(45.00), "/p3.jpg", 2),
    ("Casual Pants", dec!(65.00), "/p4.jpg", 3),
    ("Slim Fit Jeans", dec!(79.00), "/p5.jpg", 4),
    ("Wool Sweater", dec!(120.00), "/p6.jpg", 5),
    ("Running Shoes", dec!(150.00), "/p7.jpg", 6),
    ("Cotton T-Shirt", dec!(35.00), "/p8.jpg", 0),
    ("Floral Dress", dec!(95.00), "/p9.jpg", 1),
    ("Kids Sneakers", dec!(55.00), "/p10.jpg", 2),
    ("Chino Pants", dec!(70.00), "/p11.jpg", 3),
    ("Ripped Jeans", dec!(85.00), "/p12.jpg", 4),
];

const SAMPLE_REVIEW_TEXT: &str = "Praesent ut lacus a velit tincidunt aliquam a eget urna...";

const SAMPLE_REVIEWS: [(&str, &str, i32, &str); 4] = [
    (
        "Esther Howard",
        "Nursing Assistant",
        5,
        "https://thumbs.dreamstime.com/z/young-man-portrait-18441696.jpg",
    ),
    (
        "John Doe",
        "Medical Assistant",
        4,
        "https://skyelitenews.com/wp-content/uploads/2020/08/25-Most-Handsome-Men-Globally-025.jpg",
    ),
    (
        "Leslie Alexander",
        "Medical Assistant",
        4,
        "https://tse3.mm.bing.net/th/id/OIP.4PKHhmaurdrjc-TNxT07QQHaJ2?r=0&w=500&h=665&rs=1&pid=ImgDetMain&o=7&rm=3",
    ),
    (
        "Esther Howard",
        "Web Designer",
        5,
        "https://tse1.mm.bing.net/th/id/OIP.CE1LsaoMEdetDP0kVZvkhgHaLG?r=0&rs=1&pid=ImgDetMain&o=7&rm=3",
    ),
];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub categories: usize,
    pub products: usize,
    pub reviews: usize,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        self.categories == 0 && self.products == 0 && self.reviews == 0
    }
}

/// Inserts the sample catalog when the categories table is empty.
///
/// The category count is the only gate: once any category exists this is a
/// no-op, even if products or reviews were later removed.
pub async fn seed_if_empty(store: &dyn Store) -> Result<SeedReport> {
    if store.count_categories().await? > 0 {
        return Ok(SeedReport::default());
    }

    let mut report = SeedReport::default();

    let mut category_ids = Vec::with_capacity(SAMPLE_CATEGORIES.len());
    for (name, image_url) in SAMPLE_CATEGORIES {
        let category = store
            .create_category(&NewCategory {
                name: name.to_string(),
                image_url: Some(image_url.to_string()),
            })
            .await?;
        category_ids.push(category.id);
        report.categories += 1;
    }

    for (name, price, image_url, category_index) in SAMPLE_PRODUCTS {
        store
            .create_product(&NewProduct {
                name: name.to_string(),
                price,
                image_url: Some(image_url.to_string()),
                category_id: category_ids.get(category_index).copied(),
                description: None,
            })
            .await?;
        report.products += 1;
    }

    for (name, role, rating, image_url) in SAMPLE_REVIEWS {
        store
            .create_review(&NewReview {
                name: name.to_string(),
                role: Some(role.to_string()),
                review_text: Some(SAMPLE_REVIEW_TEXT.to_string()),
                rating: Some(rating),
                image_url: Some(image_url.to_string()),
            })
            .await?;
        report.reviews += 1;
    }

    tracing::info!(
        "Seeded sample data: {} categories, {} products, {} reviews",
        report.categories,
        report.products,
        report.reviews
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn seeds_empty_store_once() {
        let store = MemoryStore::new();

        let first = seed_if_empty(&store).await.unwrap();
        assert_eq!(
            first,
            SeedReport {
                categories: 7,
                products: 12,
                reviews: 4
            }
        );

        let second = seed_if_empty(&store).await.unwrap();
        assert!(second.is_empty());
        assert_eq!(store.count_categories().await.unwrap(), 7);
    }

    #[tokio::test]
    async fn seeded_products_point_at_seeded_categories() {
        let store = MemoryStore::new();
        seed_if_empty(&store).await.unwrap();

        let products = store
            .list_products(Some("Jeans"), crate::models::ProductSort::Id)
            .await
            .unwrap();
        let names: Vec<_> = products.iter().map(|p| p.product.name.as_str()).collect();
        assert_eq!(names, vec!["Slim Fit Jeans", "Ripped Jeans"]);
    }

    #[tokio::test]
    async fn existing_category_blocks_seeding() {
        let store = MemoryStore::new();
        store
            .create_category(&NewCategory {
                name: "Hats".to_string(),
                image_url: None,
            })
            .await
            .unwrap();

        let report = seed_if_empty(&store).await.unwrap();
        assert!(report.is_empty());
        assert!(store.list_reviews().await.unwrap().is_empty());
    }
}
