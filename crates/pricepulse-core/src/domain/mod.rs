pub mod models;
pub mod timestamp;

pub use models::{
    round_cents, ExternalProductRecord, NewProduct, Product, ProductFilters, ProductId,
    ProductPatch, Quote,
};
pub use timestamp::UtcDateTime;
