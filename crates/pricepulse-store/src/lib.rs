//! # PricePulse Store
//!
//! In-memory product repository backing the PricePulse toolkit. Storage is a
//! mutex-guarded vector with a monotonic id counter; deleted ids are never
//! reused.

use std::sync::Mutex;

use pricepulse_core::{
    NewProduct, Product, ProductFilters, ProductId, ProductPatch, ProductRepository, UtcDateTime,
};

/// Thread-safe in-memory product store.
///
/// All methods take `&self`; interior mutability makes the store shareable
/// behind an `Arc` without wrapping it in another lock.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    inner: Mutex<StoreInner>,
}

#[derive(Debug, Default)]
struct StoreInner {
    products: Vec<Product>,
    next_id: u64,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with a small demo catalog, used by mock mode.
    pub fn with_demo_catalog() -> Self {
        let repo = Self::new();
        let seed = [
            ("Samsung Galaxy S23", 999.99, "smartphones", "Flagship Android smartphone"),
            ("iPhone 15 Pro", 1199.99, "smartphones", "Apple flagship with titanium frame"),
            ("MacBook Air M2", 1499.99, "laptops", "Thin and light laptop with M2 chip"),
        ];
        for (name, price, category, description) in seed {
            // Literal seed data, validation cannot fail.
            if let Ok(data) = NewProduct::new(name, price, category) {
                repo.create(data.with_description(description));
            }
        }
        repo
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("lock is not poisoned").products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProductRepository for InMemoryProductRepository {
    fn get_all(&self, filters: &ProductFilters) -> Vec<Product> {
        self.inner
            .lock()
            .expect("lock is not poisoned")
            .products
            .iter()
            .filter(|product| filters.matches(product))
            .cloned()
            .collect()
    }

    fn get_by_id(&self, id: ProductId) -> Option<Product> {
        self.inner
            .lock()
            .expect("lock is not poisoned")
            .products
            .iter()
            .find(|product| product.id == id)
            .cloned()
    }

    fn search(&self, query: &str) -> Vec<Product> {
        let needle = query.to_lowercase();
        self.inner
            .lock()
            .expect("lock is not poisoned")
            .products
            .iter()
            .filter(|product| {
                product.name.to_lowercase().contains(&needle)
                    || product.description.to_lowercase().contains(&needle)
                    || product.category.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    fn create(&self, data: NewProduct) -> Product {
        let mut inner = self.inner.lock().expect("lock is not poisoned");
        inner.next_id += 1;
        let product = Product {
            id: ProductId::new(inner.next_id),
            name: data.name,
            price: data.price,
            category: data.category,
            description: data.description,
            image_url: data.image_url,
            external_id: data.external_id,
            created_at: UtcDateTime::now(),
            updated_at: None,
            price_updated_at: None,
        };
        inner.products.push(product.clone());
        product
    }

    fn update(&self, id: ProductId, patch: ProductPatch) -> Option<Product> {
        let mut inner = self.inner.lock().expect("lock is not poisoned");
        let product = inner.products.iter_mut().find(|product| product.id == id)?;

        if let Some(name) = patch.name {
            product.name = name;
        }
        if let Some(price) = patch.price {
            product.price = price;
        }
        if let Some(category) = patch.category {
            product.category = category;
        }
        if let Some(description) = patch.description {
            product.description = description;
        }
        if let Some(image_url) = patch.image_url {
            product.image_url = image_url;
        }
        if let Some(stamped_at) = patch.price_updated_at {
            product.price_updated_at = Some(stamped_at);
        }
        product.updated_at = Some(UtcDateTime::now());

        Some(product.clone())
    }

    fn delete(&self, id: ProductId) -> bool {
        let mut inner = self.inner.lock().expect("lock is not poisoned");
        let before = inner.products.len();
        inner.products.retain(|product| product.id != id);
        inner.products.len() < before
    }

    fn bulk_create(&self, batch: Vec<NewProduct>) -> Vec<Product> {
        batch.into_iter().map(|data| self.create(data)).collect()
    }
}
