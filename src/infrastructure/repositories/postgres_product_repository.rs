use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::storage_error;
use crate::domain::product::Product;
use crate::domain::repositories::ProductRepository;
use crate::domain::DomainError;

const PRODUCT_COLUMNS: &str = "id, name, description, price_cents, stock, active, image_url, \
                               category, created_at, updated_at";

/// Shape of a `products` row
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    description: String,
    price_cents: i64,
    stock: i32,
    active: bool,
    image_url: Option<String>,
    category: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = DomainError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        if row.price_cents <= 0 || row.stock < 0 {
            return Err(DomainError::storage(format!(
                "Invalid price or stock in products row {}",
                row.id
            )));
        }

        Ok(Product {
            id: row.id,
            name: row.name,
            description: row.description,
            price_cents: row.price_cents,
            stock: row.stock,
            active: row.active,
            image_url: row.image_url,
            category: row.category,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_products(rows: Vec<ProductRow>) -> Result<Vec<Product>, DomainError> {
    rows.into_iter().map(Product::try_from).collect()
}

/// PostgreSQL implementation of ProductRepository
pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    /// Creates a new PostgresProductRepository
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn create(&self, product: &Product) -> Result<Uuid, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, description, price_cents, stock, active, image_url, category,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(product.active)
        .bind(&product.image_url)
        .bind(&product.category)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(storage_error("Failed to create product"))?;

        Ok(product.id)
    }

    async fn update(&self, product: &Product) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = $2, description = $3, price_cents = $4, stock = $5, active = $6,
                image_url = $7, category = $8, updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(product.active)
        .bind(&product.image_url)
        .bind(&product.category)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(storage_error("Failed to update product"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError> {
        let query = format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS);
        sqlx::query_as::<_, ProductRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error("Failed to find product by id"))?
            .map(Product::try_from)
            .transpose()
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Product>, DomainError> {
        let query = format!("SELECT {} FROM products WHERE id = ANY($1)", PRODUCT_COLUMNS);
        let rows = sqlx::query_as::<_, ProductRow>(&query)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error("Failed to find products"))?;

        into_products(rows)
    }

    async fn list_active(&self) -> Result<Vec<Product>, DomainError> {
        let query = format!(
            "SELECT {} FROM products WHERE active ORDER BY created_at DESC",
            PRODUCT_COLUMNS
        );
        let rows = sqlx::query_as::<_, ProductRow>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error("Failed to list active products"))?;

        into_products(rows)
    }

    async fn list_all(&self) -> Result<Vec<Product>, DomainError> {
        let query = format!("SELECT {} FROM products ORDER BY created_at DESC", PRODUCT_COLUMNS);
        let rows = sqlx::query_as::<_, ProductRow>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error("Failed to list products"))?;

        into_products(rows)
    }
}
