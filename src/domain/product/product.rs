use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::money::format_price;
use crate::domain::validation::{FieldError, ValidationErrors, MIN_NAME_LENGTH};

/// Raw product fields as submitted by an administrator
///
/// The price is already in minor units; handlers convert decimal form input
/// with `money::to_cents` first.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_cents: i64,
    pub stock: i32,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl ProductDraft {
    /// Validates name, price and stock, collecting every failure
    ///
    /// # Rules
    /// - Name has at least 3 characters after trimming
    /// - Price is greater than zero
    /// - Stock is not negative
    pub fn validate(&self) -> Result<ValidatedProduct, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.name.trim().chars().count() < MIN_NAME_LENGTH {
            errors.add(
                "name",
                FieldError::TooShort {
                    label: "Name",
                    min: MIN_NAME_LENGTH,
                },
            );
        }

        if self.price_cents <= 0 {
            errors.add("price", FieldError::NotPositive("Price"));
        }

        if self.stock < 0 {
            errors.add("stock", FieldError::Negative("Stock"));
        }

        errors.into_result(|| ValidatedProduct {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            price_cents: self.price_cents,
            stock: self.stock,
            category: non_blank(self.category.as_deref()),
            image_url: non_blank(self.image_url.as_deref()),
            active: self.active,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Product fields that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedProduct {
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub stock: i32,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub active: bool,
}

/// Catalog entry
///
/// # Invariants
/// - `price_cents > 0` and `stock >= 0` once validated
/// - Deleting only clears `active`; rows stay resolvable for past orders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub stock: i32,
    pub active: bool,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(fields: ValidatedProduct) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: fields.name,
            description: fields.description,
            price_cents: fields.price_cents,
            stock: fields.stock,
            active: fields.active,
            image_url: fields.image_url,
            category: fields.category,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces every editable field
    pub fn apply(&mut self, fields: ValidatedProduct) {
        self.name = fields.name;
        self.description = fields.description;
        self.price_cents = fields.price_cents;
        self.stock = fields.stock;
        self.active = fields.active;
        self.image_url = fields.image_url;
        self.category = fields.category;
        self.updated_at = Utc::now();
    }

    /// Soft delete
    pub fn deactivate(&mut self) {
        self.active = false;
        self.updated_at = Utc::now();
    }

    /// Whether `quantity` units can be ordered right now
    pub fn can_supply(&self, quantity: i32) -> bool {
        self.active && quantity > 0 && self.stock >= quantity
    }

    pub fn price_display(&self) -> String {
        format_price(self.price_cents)
    }
}
