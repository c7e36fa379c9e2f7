// src/db/product_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::inventory::{Category, Product, ProductWithStock},
};

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Funções de "Leitura" (Getters)
    // ---
    // Funções de leitura são simples e podem usar a pool principal.

    /// Lista produtos com o saldo atual; `search` filtra por nome (ILIKE).
    pub async fn list_with_stock(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<ProductWithStock>, AppError> {
        let products = sqlx::query_as::<_, ProductWithStock>(
            r#"
            SELECT p.id, p.name, p.description, p.price, p.promotional_price,
                   p.category_id, p.supplier_id, s.quantity, s.min_quantity
            FROM products p
            JOIN stock_levels s ON s.product_id = p.id
            WHERE ($1::TEXT IS NULL OR p.name ILIKE '%' || $1 || '%')
            ORDER BY p.name ASC
            "#,
        )
        .bind(search)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    /// Produtos com saldo menor ou igual ao mínimo configurado.
    pub async fn list_low_stock(&self) -> Result<Vec<ProductWithStock>, AppError> {
        let products = sqlx::query_as::<_, ProductWithStock>(
            r#"
            SELECT p.id, p.name, p.description, p.price, p.promotional_price,
                   p.category_id, p.supplier_id, s.quantity, s.min_quantity
            FROM products p
            JOIN stock_levels s ON s.product_id = p.id
            WHERE s.quantity <= s.min_quantity
            ORDER BY s.quantity ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    pub async fn get_product(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(categories)
    }

    // ---
    // Funções de "Escrita" (Transacionais)
    // ---
    // Estas usam o padrão genérico 'Executor' para rodar dentro de uma transação.

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        name: &str,
        description: Option<&str>,
        price: Decimal,
        promotional_price: Option<Decimal>,
        category_id: Uuid,
        supplier_id: Option<Uuid>,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, description, price, promotional_price, category_id, supplier_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(promotional_price)
        .bind(category_id)
        .bind(supplier_id)
        .fetch_one(executor)
        .await?;
        Ok(product)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        name: &str,
        description: Option<&str>,
        price: Decimal,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET name = $2, description = $3, price = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(price)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::ProductNotFound)
    }

    /// Define (Some) ou remove (None) o preço promocional.
    pub async fn set_promotional_price<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        promotional_price: Option<Decimal>,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Product>(
            "UPDATE products SET promotional_price = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(promotional_price)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::ProductNotFound)
    }

    pub async fn create_category<'e, E>(&self, executor: E, name: &str) -> Result<Category, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let category =
            sqlx::query_as::<_, Category>("INSERT INTO categories (name) VALUES ($1) RETURNING *")
                .bind(name)
                .fetch_one(executor)
                .await?;
        Ok(category)
    }

    pub async fn find_category<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Category>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(category)
    }
}
