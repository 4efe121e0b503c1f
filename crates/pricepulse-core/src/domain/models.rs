use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::UtcDateTime;

/// Repository-assigned monotonic product identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u64 {
        self.0
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical product record as stored by the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub category: String,
    pub description: String,
    pub image_url: String,
    pub external_id: Option<String>,
    pub created_at: UtcDateTime,
    pub updated_at: Option<UtcDateTime>,
    pub price_updated_at: Option<UtcDateTime>,
}

/// Creation payload; ids and timestamps are assigned by the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub category: String,
    pub description: String,
    pub image_url: String,
    pub external_id: Option<String>,
}

impl NewProduct {
    pub fn new(
        name: impl Into<String>,
        price: f64,
        category: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        validate_non_negative("price", price)?;
        Ok(Self {
            name,
            price,
            category: category.into(),
            description: String::new(),
            image_url: String::new(),
            external_id: None,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }
}

/// Partial update applied by `ProductRepository::update`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub price_updated_at: Option<UtcDateTime>,
}

impl ProductPatch {
    pub fn price(price: f64, stamped_at: UtcDateTime) -> Self {
        Self {
            price: Some(price),
            price_updated_at: Some(stamped_at),
            ..Self::default()
        }
    }
}

/// Repository query filters for listing and recommendations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductFilters {
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl ProductFilters {
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category {
            if !product.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if product.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if product.price > max {
                return false;
            }
        }
        true
    }
}

/// One price/availability observation for one product, internal or external.
/// Ephemeral; produced per request and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub source: String,
    pub price: f64,
    pub url: String,
    pub in_stock: bool,
}

impl Quote {
    pub fn new(
        source: impl Into<String>,
        price: f64,
        url: impl Into<String>,
        in_stock: bool,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("price", price)?;
        Ok(Self {
            source: source.into(),
            price,
            url: url.into(),
            in_stock,
        })
    }
}

/// Normalized product shape produced by a catalog source client from an
/// arbitrary upstream payload. Records that fail the non-negative finite
/// price invariant never reach this type; they are dropped at the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalProductRecord {
    pub name: String,
    pub price: f64,
    pub category: String,
    pub description: String,
    pub image_url: String,
    pub external_id: String,
}

impl From<ExternalProductRecord> for NewProduct {
    fn from(record: ExternalProductRecord) -> Self {
        Self {
            name: record.name,
            price: record.price,
            category: record.category,
            description: record.description,
            image_url: record.image_url,
            external_id: Some(record.external_id),
        }
    }
}

/// Round to 2 decimal places, half away from zero.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}
