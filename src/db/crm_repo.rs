// src/db/crm_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::crm::{Address, Customer, Supplier},
};

#[derive(Clone)]
pub struct CrmRepository {
    pool: PgPool,
}

impl CrmRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leitura
    // ---

    /// Busca por CPF já normalizado (apenas dígitos).
    pub async fn find_customer_by_cpf(&self, cpf: &str) -> Result<Option<Customer>, AppError> {
        let customer = sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE cpf = $1")
            .bind(cpf)
            .fetch_optional(&self.pool)
            .await?;
        Ok(customer)
    }

    pub async fn get_customer(&self, id: Uuid) -> Result<Option<Customer>, AppError> {
        let customer = sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(customer)
    }

    pub async fn get_supplier(&self, id: Uuid) -> Result<Option<Supplier>, AppError> {
        let supplier = sqlx::query_as::<_, Supplier>("SELECT * FROM suppliers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(supplier)
    }

    pub async fn list_suppliers(&self) -> Result<Vec<Supplier>, AppError> {
        let suppliers = sqlx::query_as::<_, Supplier>("SELECT * FROM suppliers ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(suppliers)
    }

    // ---
    // Escrita (transacional)
    // ---

    pub async fn find_customer_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customer = sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(customer)
    }

    pub async fn find_supplier<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Supplier>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let supplier = sqlx::query_as::<_, Supplier>("SELECT * FROM suppliers WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(supplier)
    }

    pub async fn insert_address<'e, E>(
        &self,
        executor: E,
        postal_code: &str,
        number: &str,
        complement: Option<&str>,
    ) -> Result<Address, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let address = sqlx::query_as::<_, Address>(
            r#"
            INSERT INTO addresses (postal_code, number, complement)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(postal_code)
        .bind(number)
        .bind(complement)
        .fetch_one(executor)
        .await?;
        Ok(address)
    }

    pub async fn insert_customer<'e, E>(
        &self,
        executor: E,
        name: &str,
        cpf: &str,
        phone: Option<&str>,
        address_id: Uuid,
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (name, cpf, phone, address_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(cpf)
        .bind(phone)
        .bind(address_id)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::CpfAlreadyExists;
                }
            }
            e.into()
        })
    }

    pub async fn insert_supplier<'e, E>(
        &self,
        executor: E,
        name: &str,
        email: Option<&str>,
        cnpj: &str,
        phone: Option<&str>,
        address_id: Uuid,
    ) -> Result<Supplier, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Supplier>(
            r#"
            INSERT INTO suppliers (name, email, cnpj, phone, address_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(cnpj)
        .bind(phone)
        .bind(address_id)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::CnpjAlreadyExists;
                }
            }
            e.into()
        })
    }
}
