use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::product::Product;

/// Repository trait for the product catalog
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a new product
    async fn create(&self, product: &Product) -> Result<Uuid, DomainError>;

    /// Overwrite an existing product; returns false when it does not exist
    async fn update(&self, product: &Product) -> Result<bool, DomainError>;

    /// Find a product by ID, active or not
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError>;

    /// Find several products at once; missing IDs are simply absent from the result
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Product>, DomainError>;

    /// Active products, newest first
    async fn list_active(&self) -> Result<Vec<Product>, DomainError>;

    /// Every product including inactive ones, newest first
    async fn list_all(&self) -> Result<Vec<Product>, DomainError>;
}
