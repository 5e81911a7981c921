use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::AppState;
use crate::domain::money::to_cents;
use crate::domain::product::{Product, ProductDraft};

/// Product fields as sent by the admin form
///
/// `price` is in reais (`29.90`); it is converted to centavos before
/// validation.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
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

impl TryFrom<ProductRequest> for ProductDraft {
    type Error = ApiError;

    fn try_from(req: ProductRequest) -> Result<Self, Self::Error> {
        Ok(ProductDraft {
            price_cents: to_cents(req.price)?,
            name: req.name,
            description: req.description,
            stock: req.stock,
            category: req.category,
            image_url: req.image_url,
            active: req.active,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub price_display: String,
    pub stock: i32,
    pub active: bool,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            price_display: product.price_display(),
            id: product.id,
            name: product.name,
            description: product.description,
            price_cents: product.price_cents,
            stock: product.stock,
            active: product.active,
            category: product.category,
            image_url: product.image_url,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

pub(crate) fn to_responses(products: Vec<Product>) -> Vec<ProductResponse> {
    products.into_iter().map(ProductResponse::from).collect()
}

/// Active catalog, newest first
///
/// GET /api/products
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let products = state.products.list_active().await?;
    Ok(Json(to_responses(products)))
}

/// A single active product
///
/// GET /api/products/:id
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state.products.find_active(id).await?;
    Ok(Json(product.into()))
}
