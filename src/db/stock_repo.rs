// src/db/stock_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        dashboard::StockReportEntry,
        inventory::{MovementType, StockLevel, StockMovement, StockMovementEntry},
    },
};

// Camada de acesso do livro-razão: o saldo em 'stock_levels' e o histórico
// em 'stock_movements' só são tocados por aqui.
#[derive(Clone)]
pub struct StockRepository {
    pool: PgPool,
}

impl StockRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leitura
    // ---

    /// Histórico completo de movimentações, mais recente primeiro.
    pub async fn list_movements(&self) -> Result<Vec<StockMovementEntry>, AppError> {
        let movements = sqlx::query_as::<_, StockMovementEntry>(
            r#"
            SELECT m.id, p.name AS product_name, u.login AS user_login,
                   m.movement_type, m.quantity, m.note, m.created_at
            FROM stock_movements m
            JOIN products p ON p.id = m.product_id
            LEFT JOIN users u ON u.id = m.user_id
            ORDER BY m.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(movements)
    }

    /// Soma de unidades em estoque, todos os produtos.
    pub async fn total_units<'e, E>(&self, executor: E) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(quantity), 0) FROM stock_levels",
        )
        .fetch_one(executor)
        .await?;
        Ok(total)
    }

    /// Saldo atual por produto, do maior para o menor (gráfico do painel).
    pub async fn stock_report(&self) -> Result<Vec<StockReportEntry>, AppError> {
        let entries = sqlx::query_as::<_, StockReportEntry>(
            r#"
            SELECT p.name, s.quantity
            FROM products p
            JOIN stock_levels s ON s.product_id = p.id
            ORDER BY s.quantity DESC, p.name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    // ---
    // Escrita (sempre dentro da transação do chamador)
    // ---

    pub async fn create_level<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        quantity: i32,
        min_quantity: i32,
    ) -> Result<StockLevel, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let level = sqlx::query_as::<_, StockLevel>(
            r#"
            INSERT INTO stock_levels (product_id, quantity, min_quantity)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(product_id)
        .bind(quantity)
        .bind(min_quantity)
        .fetch_one(executor)
        .await?;
        Ok(level)
    }

    /// Lê o saldo travando a linha (FOR UPDATE). Escritores concorrentes do
    /// mesmo produto serializam aqui até o fim da transação.
    pub async fn get_for_update<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
    ) -> Result<Option<StockLevel>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let level = sqlx::query_as::<_, StockLevel>(
            "SELECT * FROM stock_levels WHERE product_id = $1 FOR UPDATE",
        )
        .bind(product_id)
        .fetch_optional(executor)
        .await?;
        Ok(level)
    }

    pub async fn set_quantity<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("UPDATE stock_levels SET quantity = $2 WHERE product_id = $1")
            .bind(product_id)
            .bind(quantity)
            .execute(executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::ProductNotFound);
        }
        Ok(())
    }

    /// Acrescenta uma linha ao livro-razão (auditoria).
    pub async fn insert_movement<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        user_id: Option<Uuid>,
        movement_type: MovementType,
        quantity: i32,
        note: Option<&str>,
    ) -> Result<StockMovement, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let movement = sqlx::query_as::<_, StockMovement>(
            r#"
            INSERT INTO stock_movements (product_id, user_id, movement_type, quantity, note)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(product_id)
        .bind(user_id)
        .bind(movement_type)
        .bind(quantity)
        .bind(note)
        .fetch_one(executor)
        .await?;
        Ok(movement)
    }
}
