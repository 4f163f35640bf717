/// Customer model
///
/// Customers are read-only here: the dashboard lists them for the invoice
/// form's customer select, and invoices reference them by ID.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE customers (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL,
///     image_url VARCHAR(255) NOT NULL DEFAULT ''
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Customer record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image_url: String,
}

/// Customer entry offered by the invoice form select
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CustomerField {
    pub id: Uuid,
    pub name: String,
}

impl Customer {
    /// Lists every customer as a select option, ordered by name
    pub async fn list_fields(pool: &PgPool) -> Result<Vec<CustomerField>, sqlx::Error> {
        let customers = sqlx::query_as::<_, CustomerField>(
            r#"
            SELECT id, name
            FROM customers
            ORDER BY name ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(customers)
    }

    /// Inserts a customer and returns it
    ///
    /// Used to seed fixtures; the dashboard has no customer management.
    pub async fn create(
        pool: &PgPool,
        name: &str,
        email: &str,
        image_url: &str,
    ) -> Result<Self, sqlx::Error> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (name, email, image_url)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, image_url
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(image_url)
        .fetch_one(pool)
        .await?;

        Ok(customer)
    }
}
