// src/db/order_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::orders::{Message, OrderStatus, OrderSummary, SupplierOrder, SupplierOrderItem},
};

#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leitura
    // ---

    pub async fn list(&self) -> Result<Vec<OrderSummary>, AppError> {
        let orders = sqlx::query_as::<_, OrderSummary>(
            r#"
            SELECT o.id, f.name AS supplier_name, o.status, o.ordered_at
            FROM supplier_orders o
            JOIN suppliers f ON f.id = o.supplier_id
            ORDER BY o.ordered_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<SupplierOrder>, AppError> {
        let order = sqlx::query_as::<_, SupplierOrder>("SELECT * FROM supplier_orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(order)
    }

    pub async fn get_items(&self, order_id: Uuid) -> Result<Vec<SupplierOrderItem>, AppError> {
        let items = sqlx::query_as::<_, SupplierOrderItem>(
            "SELECT * FROM supplier_order_items WHERE order_id = $1",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn list_messages(&self) -> Result<Vec<Message>, AppError> {
        let messages =
            sqlx::query_as::<_, Message>("SELECT * FROM messages ORDER BY sent_at DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(messages)
    }

    // ---
    // Escrita (transacional)
    // ---

    pub async fn insert_order<'e, E>(
        &self,
        executor: E,
        supplier_id: Uuid,
    ) -> Result<SupplierOrder, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, SupplierOrder>(
            "INSERT INTO supplier_orders (supplier_id) VALUES ($1) RETURNING *",
        )
        .bind(supplier_id)
        .fetch_one(executor)
        .await?;
        Ok(order)
    }

    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<SupplierOrderItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, SupplierOrderItem>(
            r#"
            INSERT INTO supplier_order_items (order_id, product_id, quantity)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(product_id)
        .bind(quantity)
        .fetch_one(executor)
        .await?;
        Ok(item)
    }

    /// Carrega o pedido travando a linha: impede dois recebimentos
    /// concorrentes do mesmo pedido.
    pub async fn get_for_update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<SupplierOrder>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, SupplierOrder>(
            "SELECT * FROM supplier_orders WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(order)
    }

    pub async fn list_items<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
    ) -> Result<Vec<SupplierOrderItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, SupplierOrderItem>(
            "SELECT * FROM supplier_order_items WHERE order_id = $1",
        )
        .bind(order_id)
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    pub async fn set_status<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        status: OrderStatus,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("UPDATE supplier_orders SET status = $2 WHERE id = $1")
            .bind(order_id)
            .bind(status)
            .execute(executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::OrderNotFound);
        }
        Ok(())
    }

    pub async fn insert_message<'e, E>(
        &self,
        executor: E,
        supplier_id: Option<Uuid>,
        product_id: Option<Uuid>,
        content: &str,
        status: &str,
    ) -> Result<Message, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (supplier_id, product_id, content, status)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(supplier_id)
        .bind(product_id)
        .bind(content)
        .bind(status)
        .fetch_one(executor)
        .await?;
        Ok(message)
    }
}
