use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::model::Product;

/// Field set a validated product carries into the store.
#[derive(Debug, Clone)]
pub struct ProductRow {
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub quantity: i64,
    pub price_cents: i64,
    pub category_id: Uuid,
}

/// Persistence collaborator for the catalog. The listing and detail reads
/// are the contract the web layer renders from.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn insert(&self, row: ProductRow) -> anyhow::Result<Product>;

    async fn find(&self, id: Uuid) -> anyhow::Result<Option<Product>>;

    async fn list(&self) -> anyhow::Result<Vec<Product>>;

    async fn list_by_category(&self, category_id: Uuid) -> anyhow::Result<Vec<Product>>;
}

pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn insert(&self, row: ProductRow) -> anyhow::Result<Product> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, description, image, quantity, price_cents, category_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, description, image, quantity, price_cents, category_id, created_at
            "#,
        )
        .bind(&row.name)
        .bind(&row.description)
        .bind(&row.image)
        .bind(row.quantity)
        .bind(row.price_cents)
        .bind(row.category_id)
        .fetch_one(&self.pool)
        .await
        .context("insert product")?;
        Ok(product)
    }

    async fn find(&self, id: Uuid) -> anyhow::Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, image, quantity, price_cents, category_id, created_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("find product")?;
        Ok(product)
    }

    async fn list(&self) -> anyhow::Result<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, image, quantity, price_cents, category_id, created_at
            FROM products
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("list products")?;
        Ok(products)
    }

    async fn list_by_category(&self, category_id: Uuid) -> anyhow::Result<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, image, quantity, price_cents, category_id, created_at
            FROM products
            WHERE category_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await
        .context("list products by category")?;
        Ok(products)
    }
}
