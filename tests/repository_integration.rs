//! Integration tests for repository layer
//!
//! These tests verify that the PostgreSQL repositories map rows, enforce
//! uniqueness and apply order inserts atomically. They need a database:
//!
//! ```text
//! DATABASE_URL=postgres://... cargo test --test repository_integration -- --ignored
//! ```

use pedidos_api::auth::password::hash_password;
use pedidos_api::domain::order::{Order, OrderLine, OrderStatus};
use pedidos_api::domain::product::{Product, ProductDraft};
use pedidos_api::domain::repositories::{
    OrderRepository, ProductRepository, UniqueField, UserRepository,
};
use pedidos_api::domain::user::{Role, User, UserDraft, ValidationMode};
use pedidos_api::domain::validation::RawAge;
use pedidos_api::domain::DomainError;
use pedidos_api::infrastructure::repositories::{
    PostgresOrderRepository, PostgresProductRepository, PostgresUserRepository,
};
use sqlx::PgPool;
use uuid::Uuid;

/// Set up test database connection pool with the schema applied
async fn setup_test_db() -> PgPool {
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for integration tests");

    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Builds a valid user with a unique email; `cpf` must be checksum-valid
fn test_user(cpf: &str) -> User {
    let fields = UserDraft {
        name: "Maria Souza".to_string(),
        email: format!("maria-{}@example.com", Uuid::new_v4()),
        password: Some("segredo123".to_string()),
        cpf: cpf.to_string(),
        phone: "11987654321".to_string(),
        age: RawAge::Number(30),
        address: "Rua das Flores, 123".to_string(),
    }
    .validate(ValidationMode::Create)
    .expect("valid user");

    User::new(fields, hash_password("segredo123", 4).expect("hash password"))
}

fn test_product(stock: i32) -> Product {
    Product::new(
        ProductDraft {
            name: "SSD Samsung 1TB".to_string(),
            description: "NVMe".to_string(),
            price_cents: 69900,
            stock,
            category: Some("Armazenamento".to_string()),
            image_url: None,
            active: true,
        }
        .validate()
        .expect("valid product"),
    )
}

async fn delete_user(pool: &PgPool, id: Uuid) {
    sqlx::query("DELETE FROM orders WHERE user_id = $1")
        .bind(id)
        .execute(pool)
        .await
        .expect("Failed to cleanup orders");
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .expect("Failed to cleanup user");
}

async fn delete_product(pool: &PgPool, id: Uuid) {
    sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .expect("Failed to cleanup product");
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_user_round_trip_and_uniqueness() {
    let pool = setup_test_db().await;
    let repo = PostgresUserRepository::new(pool.clone());

    // CPFs are unique in the table, so clear leftovers from earlier runs
    sqlx::query("DELETE FROM users WHERE cpf = '529.982.247-25'")
        .execute(&pool)
        .await
        .ok();

    let user = test_user("52998224725");
    repo.create(&user).await.expect("create user");

    let found = repo
        .find_by_email(&user.email)
        .await
        .expect("query")
        .expect("user exists");
    assert_eq!(found.id, user.id);
    assert_eq!(found.cpf.formatted(), "529.982.247-25");
    assert_eq!(found.role, Role::User);

    assert!(repo
        .exists_with_value(UniqueField::Cpf, "529.982.247-25", None)
        .await
        .unwrap());
    assert!(!repo
        .exists_with_value(UniqueField::Cpf, "529.982.247-25", Some(user.id))
        .await
        .unwrap());

    // Same CPF, different email: rejected by the table constraint
    let mut twin = test_user("52998224725");
    twin.id = Uuid::new_v4();
    assert!(matches!(
        repo.create(&twin).await,
        Err(DomainError::Conflict(UniqueField::Cpf))
    ));

    assert!(repo.set_role(user.id, Role::Admin).await.unwrap());
    let promoted = repo.find_by_id(user.id).await.unwrap().unwrap();
    assert!(promoted.is_admin());

    delete_user(&pool, user.id).await;
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_product_soft_delete() {
    let pool = setup_test_db().await;
    let repo = PostgresProductRepository::new(pool.clone());

    let mut product = test_product(3);
    repo.create(&product).await.expect("create product");

    product.deactivate();
    assert!(repo.update(&product).await.unwrap());

    let stored = repo.find_by_id(product.id).await.unwrap().unwrap();
    assert!(!stored.active);
    assert!(!repo
        .list_active()
        .await
        .unwrap()
        .iter()
        .any(|p| p.id == product.id));
    assert_eq!(repo.find_many(&[product.id]).await.unwrap().len(), 1);

    delete_product(&pool, product.id).await;
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_order_insert_is_atomic() {
    let pool = setup_test_db().await;
    let users = PostgresUserRepository::new(pool.clone());
    let products = PostgresProductRepository::new(pool.clone());
    let orders = PostgresOrderRepository::new(pool.clone());

    sqlx::query("DELETE FROM users WHERE cpf = '111.444.777-35'")
        .execute(&pool)
        .await
        .ok();
    let user = test_user("11144477735");
    users.create(&user).await.expect("create user");

    let plenty = test_product(10);
    let scarce = test_product(1);
    products.create(&plenty).await.unwrap();
    products.create(&scarce).await.unwrap();

    let lines = [
        OrderLine { product_id: plenty.id, quantity: 2 },
        OrderLine { product_id: scarce.id, quantity: 1 },
    ];
    let catalog = [plenty.clone(), scarce.clone()];
    let address = "Rua das Flores, 123 - São Paulo";

    let first = Order::place(user.id, &lines, &catalog, address, None).expect("valid order");
    orders.create(&first).await.expect("create order");

    // Priced against the stale catalog; the guarded decrement must refuse
    let second = Order::place(user.id, &lines, &catalog, address, None).expect("valid order");
    assert!(matches!(orders.create(&second).await, Err(DomainError::Rule(_))));

    assert!(orders.find_by_id(second.id).await.unwrap().is_none());
    let plenty_now = products.find_by_id(plenty.id).await.unwrap().unwrap();
    assert_eq!(plenty_now.stock, 8, "rolled back decrement must not stick");

    let stored = orders.find_by_id(first.id).await.unwrap().unwrap();
    assert_eq!(stored.items.len(), 2);
    // Items come back in the order they were placed
    assert_eq!(stored.items[0].product_id, plenty.id);
    assert_eq!(stored.items[1].product_id, scarce.id);
    assert_eq!(stored.total_cents, 3 * 69900);
    assert_eq!(stored.items_total(), stored.total_cents);

    orders
        .update_status(first.id, OrderStatus::Processing)
        .await
        .unwrap();
    let listed = orders.find_by_user(user.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].status, OrderStatus::Processing);

    delete_user(&pool, user.id).await;
    delete_product(&pool, plenty.id).await;
    delete_product(&pool, scarce.id).await;
}
