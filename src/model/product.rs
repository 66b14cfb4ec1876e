//! Product entity.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dto::ProductDto;
use crate::id::{IdGenerator, ProductId};
use crate::model::error::{DomainError, Result, optional_text, required_text};

const MAX_NAME_LENGTH: usize = 100;
const MAX_DESCRIPTION_LENGTH: usize = 2000;
const MAX_IMAGE_LENGTH: usize = 2048;

/// Catalog item students can redeem with their rewards.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ProductRecord")]
pub struct Product {
    id: ProductId,
    name: String,
    description: Option<String>,
    #[serde(with = "rust_decimal::serde::str")]
    price: Decimal,
    stock: i32,
    image_url: Option<String>,
}

/// Product as read back from JSON, before its fields are checked.
#[derive(Deserialize)]
struct ProductRecord {
    id: ProductId,
    #[serde(flatten)]
    body: ProductDto,
}

impl TryFrom<ProductRecord> for Product {
    type Error = DomainError;

    fn try_from(record: ProductRecord) -> Result<Self> {
        Self::checked(record.id, &record.body)
    }
}

struct Fields {
    name: String,
    description: Option<String>,
    image_url: Option<String>,
}

impl Fields {
    fn check(body: &ProductDto) -> Result<Self> {
        if body.price < Decimal::ZERO {
            return Err(DomainError::validation("price", "must not be negative"));
        }
        if body.stock < 0 {
            return Err(DomainError::validation("stock", "must not be negative"));
        }

        Ok(Self {
            name: required_text("name", &body.name, MAX_NAME_LENGTH)?,
            description: optional_text(
                "description",
                body.description.as_deref(),
                MAX_DESCRIPTION_LENGTH,
            )?,
            image_url: optional_text(
                "imageUrl",
                body.image_url.as_deref(),
                MAX_IMAGE_LENGTH,
            )?,
        })
    }
}

impl Product {
    /// Create a new [`Product`].
    pub fn new(ids: &dyn IdGenerator, body: &ProductDto) -> Result<Self> {
        Self::checked(ProductId::generate(ids), body)
    }

    fn checked(id: ProductId, body: &ProductDto) -> Result<Self> {
        let Fields {
            name,
            description,
            image_url,
        } = Fields::check(body)?;

        Ok(Self {
            id,
            name,
            description,
            price: body.price,
            stock: body.stock,
            image_url,
        })
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn stock(&self) -> i32 {
        self.stock
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// Replaces every editable field. Nothing changes if validation fails.
    pub fn update(&mut self, body: &ProductDto) -> Result<()> {
        let Fields {
            name,
            description,
            image_url,
        } = Fields::check(body)?;

        self.name = name;
        self.description = description;
        self.price = body.price;
        self.stock = body.stock;
        self.image_url = image_url;
        Ok(())
    }

    /// Removes `quantity` items from stock.
    pub fn take_stock(&mut self, quantity: i32) -> Result<i32> {
        if quantity <= 0 {
            return Err(DomainError::validation("quantity", "must be positive"));
        }
        if quantity > self.stock {
            return Err(DomainError::validation("stock", "out of stock"));
        }
        self.stock -= quantity;
        Ok(self.stock)
    }
}
