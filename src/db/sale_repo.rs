// src/db/sale_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, FromRow, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        dashboard::IdleProduct,
        sales::{PaymentMethod, Sale, SaleItemDetail, SaleSummary},
    },
};

// Linha intermediária da agregação mensal
#[derive(Debug, FromRow)]
struct MonthlyTotalRow {
    month: i32,
    total: Option<Decimal>,
}

#[derive(Clone)]
pub struct SaleRepository {
    pool: PgPool,
}

impl SaleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leitura
    // ---

    pub async fn list(&self) -> Result<Vec<SaleSummary>, AppError> {
        let sales = sqlx::query_as::<_, SaleSummary>(
            r#"
            SELECT v.id, c.name AS customer_name, v.total, v.purchased_at,
                   (SELECT COUNT(*) FROM sale_items i WHERE i.sale_id = v.id) AS items_count
            FROM sales v
            JOIN customers c ON c.id = v.customer_id
            ORDER BY v.purchased_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(sales)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Sale>, AppError> {
        let sale = sqlx::query_as::<_, Sale>("SELECT * FROM sales WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(sale)
    }

    pub async fn list_items(&self, sale_id: Uuid) -> Result<Vec<SaleItemDetail>, AppError> {
        let items = sqlx::query_as::<_, SaleItemDetail>(
            r#"
            SELECT i.product_id, p.name AS product_name, i.quantity, i.unit_price
            FROM sale_items i
            JOIN products p ON p.id = i.product_id
            WHERE i.sale_id = $1
            ORDER BY p.name ASC
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    /// Soma de todas as vendas já registradas.
    pub async fn total_sales<'e, E>(&self, executor: E) -> Result<Decimal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total =
            sqlx::query_scalar::<_, Decimal>("SELECT COALESCE(SUM(total), 0) FROM sales")
                .fetch_one(executor)
                .await?;
        Ok(total)
    }

    /// Totais por mês de um ano; meses sem venda ficam de fora do resultado.
    pub async fn monthly_totals(&self, year: i32) -> Result<Vec<(i32, Decimal)>, AppError> {
        let rows = sqlx::query_as::<_, MonthlyTotalRow>(
            r#"
            SELECT CAST(date_part('month', purchased_at) AS INT4) AS month,
                   SUM(total) AS total
            FROM sales
            WHERE CAST(date_part('year', purchased_at) AS INT4) = $1
            GROUP BY 1
            ORDER BY 1
            "#,
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| (r.month, r.total.unwrap_or(Decimal::ZERO)))
            .collect())
    }

    /// Produtos sem nenhuma venda nos últimos `days` dias.
    pub async fn idle_products(&self, days: i32) -> Result<Vec<IdleProduct>, AppError> {
        let products = sqlx::query_as::<_, IdleProduct>(
            r#"
            SELECT p.id, p.name
            FROM products p
            WHERE NOT EXISTS (
                SELECT 1
                FROM sale_items i
                JOIN sales v ON v.id = i.sale_id
                WHERE i.product_id = p.id
                  AND v.purchased_at >= now() - make_interval(days => $1)
            )
            ORDER BY p.name ASC
            "#,
        )
        .bind(days)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    // ---
    // Escrita (dentro da transação da venda)
    // ---

    pub async fn insert_sale<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
        payment_method_id: Uuid,
        total: Decimal,
    ) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sales (customer_id, payment_method_id, total)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(customer_id)
        .bind(payment_method_id)
        .bind(total)
        .fetch_one(executor)
        .await?;
        Ok(sale)
    }

    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        sale_id: Uuid,
        product_id: Uuid,
        quantity: i32,
        unit_price: Decimal,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO sale_items (sale_id, product_id, quantity, unit_price)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(sale_id)
        .bind(product_id)
        .bind(quantity)
        .bind(unit_price)
        .execute(executor)
        .await?;
        Ok(())
    }

    // ---
    // Formas de pagamento
    // ---

    pub async fn list_payment_methods(&self) -> Result<Vec<PaymentMethod>, AppError> {
        let methods = sqlx::query_as::<_, PaymentMethod>(
            "SELECT * FROM payment_methods ORDER BY kind ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(methods)
    }

    pub async fn find_payment_method<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<PaymentMethod>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let method =
            sqlx::query_as::<_, PaymentMethod>("SELECT * FROM payment_methods WHERE id = $1")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(method)
    }

    pub async fn create_payment_method<'e, E>(
        &self,
        executor: E,
        kind: &str,
        installments: i32,
    ) -> Result<PaymentMethod, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let method = sqlx::query_as::<_, PaymentMethod>(
            "INSERT INTO payment_methods (kind, installments) VALUES ($1, $2) RETURNING *",
        )
        .bind(kind)
        .bind(installments)
        .fetch_one(executor)
        .await?;
        Ok(method)
    }
}
