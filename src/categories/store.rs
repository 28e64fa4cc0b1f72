use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::model::Category;

/// Persistence collaborator for categories.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn insert(&self, name: &str) -> anyhow::Result<Category>;

    async fn find(&self, id: Uuid) -> anyhow::Result<Option<Category>>;

    async fn list(&self) -> anyhow::Result<Vec<Category>>;
}

pub struct PgCategoryStore {
    pool: PgPool,
}

impl PgCategoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryStore for PgCategoryStore {
    async fn insert(&self, name: &str) -> anyhow::Result<Category> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name)
            VALUES ($1)
            RETURNING id, name, created_at
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .context("insert category")?;
        Ok(category)
    }

    async fn find(&self, id: Uuid) -> anyhow::Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, created_at
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("find category")?;
        Ok(category)
    }

    async fn list(&self) -> anyhow::Result<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, created_at
            FROM categories
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("list categories")?;
        Ok(categories)
    }
}
