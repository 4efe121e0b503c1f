use crate::domain::{NewProduct, Product, ProductFilters, ProductId, ProductPatch};

/// Product store collaborator with simple CRUD semantics.
///
/// Implementations own their collection and id generator and must serialize
/// mutation per instance; the core only reads and writes through this trait.
pub trait ProductRepository: Send + Sync {
    fn get_all(&self, filters: &ProductFilters) -> Vec<Product>;

    fn get_by_id(&self, id: ProductId) -> Option<Product>;

    /// Case-insensitive substring match over name, description, and category.
    fn search(&self, query: &str) -> Vec<Product>;

    fn create(&self, data: NewProduct) -> Product;

    /// Applies the patch and stamps `updated_at`; `None` if the id is unknown.
    fn update(&self, id: ProductId, patch: ProductPatch) -> Option<Product>;

    fn delete(&self, id: ProductId) -> bool;

    fn bulk_create(&self, batch: Vec<NewProduct>) -> Vec<Product>;
}
