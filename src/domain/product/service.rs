use std::sync::Arc;
use uuid::Uuid;

use super::product::{Product, ProductDraft};
use crate::domain::repositories::ProductRepository;
use crate::domain::DomainError;

/// Catalog management
pub struct ProductService {
    repository: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }

    /// Validates and stores a new product
    pub async fn create(&self, draft: ProductDraft) -> Result<Product, DomainError> {
        let product = Product::new(draft.validate()?);
        self.repository.create(&product).await?;
        tracing::info!(product_id = %product.id, name = %product.name, "Product created");
        Ok(product)
    }

    /// Re-validates and replaces an existing product
    pub async fn update(&self, id: Uuid, draft: ProductDraft) -> Result<Product, DomainError> {
        let fields = draft.validate()?;
        let mut product = self.find(id).await?;
        product.apply(fields);

        self.store(&product).await?;
        tracing::info!(product_id = %id, "Product updated");
        Ok(product)
    }

    /// Soft delete: the product leaves the catalog but stays resolvable
    pub async fn deactivate(&self, id: Uuid) -> Result<Product, DomainError> {
        let mut product = self.find(id).await?;
        product.deactivate();

        self.store(&product).await?;
        tracing::info!(product_id = %id, "Product deactivated");
        Ok(product)
    }

    pub async fn find(&self, id: Uuid) -> Result<Product, DomainError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Product not found: {}", id)))
    }

    /// Finds a product only if customers can currently see it
    pub async fn find_active(&self, id: Uuid) -> Result<Product, DomainError> {
        match self.find(id).await? {
            product if product.active => Ok(product),
            _ => Err(DomainError::not_found(format!("Product not found: {}", id))),
        }
    }

    pub async fn list_active(&self) -> Result<Vec<Product>, DomainError> {
        self.repository.list_active().await
    }

    pub async fn list_all(&self) -> Result<Vec<Product>, DomainError> {
        self.repository.list_all().await
    }

    async fn store(&self, product: &Product) -> Result<(), DomainError> {
        if !self.repository.update(product).await? {
            return Err(DomainError::not_found(format!(
                "Product not found: {}",
                product.id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::repositories::InMemoryStore;

    fn service() -> ProductService {
        ProductService::new(Arc::new(InMemoryStore::new()))
    }

    fn draft(name: &str, price_cents: i64) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            description: "Webcam Full HD 1080p".to_string(),
            price_cents,
            stock: 25,
            category: Some("Periféricos".to_string()),
            image_url: None,
            active: true,
        }
    }

    #[tokio::test]
    async fn create_and_find() {
        let service = service();
        let product = service.create(draft("Webcam Logitech C920", 39900)).await.unwrap();

        let found = service.find(product.id).await.unwrap();
        assert_eq!(found, product);
    }

    #[tokio::test]
    async fn create_invalid_product_collects_errors() {
        let service = service();
        let mut bad = draft("ab", 0);
        bad.stock = -5;

        match service.create(bad).await {
            Err(DomainError::Validation(errors)) => assert_eq!(errors.len(), 3),
            other => panic!("Expected validation error, got {:?}", other),
        }
        assert!(service.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_replaces_fields() {
        let service = service();
        let product = service.create(draft("Webcam Logitech C920", 39900)).await.unwrap();

        let updated = service
            .update(product.id, draft("Webcam Logitech C922", 45900))
            .await
            .unwrap();

        assert_eq!(updated.id, product.id);
        assert_eq!(updated.price_cents, 45900);
        assert_eq!(service.find(product.id).await.unwrap().name, "Webcam Logitech C922");
    }

    #[tokio::test]
    async fn update_unknown_product_is_not_found() {
        let service = service();
        let result = service.update(Uuid::new_v4(), draft("Webcam", 100)).await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn deactivate_hides_from_catalog_but_keeps_row() {
        let service = service();
        let webcam = service.create(draft("Webcam Logitech C920", 39900)).await.unwrap();
        let headset = service.create(draft("Headset HyperX Cloud II", 49900)).await.unwrap();

        service.deactivate(webcam.id).await.unwrap();

        let active = service.list_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, headset.id);

        assert_eq!(service.list_all().await.unwrap().len(), 2);
        assert!(!service.find(webcam.id).await.unwrap().active);
        assert!(matches!(
            service.find_active(webcam.id).await,
            Err(DomainError::NotFound(_))
        ));
    }
}
