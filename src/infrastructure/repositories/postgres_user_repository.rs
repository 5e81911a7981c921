use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::storage_error;
use crate::domain::repositories::{UniqueField, UserRepository};
use crate::domain::user::{Cpf, Email, Phone, Role, User};
use crate::domain::DomainError;

const USER_COLUMNS: &str = "id, name, email, password_hash, cpf, phone, age, address, role, \
                            created_at, updated_at";

/// Shape of a `users` row
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    cpf: String,
    phone: String,
    age: i32,
    address: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let invalid = |column: &str, reason: String| {
            DomainError::storage(format!("Invalid {} in users row {}: {}", column, id, reason))
        };

        Ok(User {
            id,
            name: row.name,
            email: Email::new(&row.email).map_err(|e| invalid("email", e.to_string()))?,
            password_hash: row.password_hash,
            cpf: Cpf::parse(&row.cpf).map_err(|e| invalid("cpf", e.to_string()))?,
            phone: Phone::parse(&row.phone).map_err(|e| invalid("phone", e.to_string()))?,
            age: row.age,
            address: row.address,
            role: row.role.parse::<Role>().map_err(|e| invalid("role", e))?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Maps unique-constraint violations to the field they protect
fn map_write_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> DomainError {
    move |e| {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                match db.constraint() {
                    Some("users_email_key") => return DomainError::Conflict(UniqueField::Email),
                    Some("users_cpf_key") => return DomainError::Conflict(UniqueField::Cpf),
                    _ => {}
                }
            }
        }
        storage_error(context)(e)
    }
}

/// PostgreSQL implementation of UserRepository
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new PostgresUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: &User) -> Result<Uuid, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, name, email, password_hash, cpf, phone, age, address, role,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.cpf.formatted())
        .bind(user.phone.as_str())
        .bind(user.age)
        .bind(&user.address)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error("Failed to create user"))?;

        Ok(user.id)
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = $2, email = $3, password_hash = $4, cpf = $5, phone = $6,
                age = $7, address = $8, role = $9, updated_at = $10
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.cpf.formatted())
        .bind(user.phone.as_str())
        .bind(user.age)
        .bind(&user.address)
        .bind(user.role.as_str())
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error("Failed to update user"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!("User not found: {}", user.id)));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error("Failed to find user by id"))?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        sqlx::query_as::<_, UserRow>(&query)
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error("Failed to find user by email"))?
            .map(User::try_from)
            .transpose()
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let query = format!("SELECT {} FROM users ORDER BY created_at DESC", USER_COLUMNS);
        sqlx::query_as::<_, UserRow>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error("Failed to list users"))?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    async fn set_role(&self, id: Uuid, role: Role) -> Result<bool, DomainError> {
        let result = sqlx::query("UPDATE users SET role = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(role.as_str())
            .execute(&self.pool)
            .await
            .map_err(storage_error("Failed to update user role"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists_with_value(
        &self,
        field: UniqueField,
        value: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, DomainError> {
        // Column names come from the enum, never from input
        let column = match field {
            UniqueField::Email => "email",
            UniqueField::Cpf => "cpf",
        };
        let query = format!(
            "SELECT EXISTS (SELECT 1 FROM users WHERE {} = $1 AND ($2::uuid IS NULL OR id <> $2))",
            column
        );

        sqlx::query_scalar::<_, bool>(&query)
            .bind(value)
            .bind(exclude_id)
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error("Failed to check uniqueness"))
    }
}
