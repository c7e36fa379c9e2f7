// src/services/crm_service.rs

use sqlx::{Acquire, Executor, Postgres};

use crate::{
    common::{cpf, error::AppError},
    db::CrmRepository,
    models::crm::{Customer, Supplier},
};

#[derive(Clone)]
pub struct CrmService {
    crm_repo: CrmRepository,
}

impl CrmService {
    pub fn new(crm_repo: CrmRepository) -> Self {
        Self { crm_repo }
    }

    /// Cadastra um cliente durante a venda: valida o dígito verificador do
    /// CPF, normaliza para apenas dígitos e cria endereço + cliente na mesma
    /// transação. CPF repetido é rejeitado pela unique do banco.
    pub async fn create_customer<'e, E>(
        &self,
        executor: E,
        name: &str,
        raw_cpf: &str,
        phone: Option<&str>,
        postal_code: Option<&str>,
        number: Option<&str>,
        complement: Option<&str>,
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let cpf = cpf::normalize(raw_cpf);
        if !cpf::is_valid(&cpf) {
            return Err(AppError::InvalidCpf);
        }

        let mut tx = executor.begin().await?;

        // Endereço é obrigatório no esquema; sem CEP/número usamos os
        // marcadores que a loja já adotava.
        let address = self
            .crm_repo
            .insert_address(
                &mut *tx,
                postal_code.unwrap_or("N/A"),
                number.unwrap_or("S/N"),
                complement,
            )
            .await?;

        let customer = self
            .crm_repo
            .insert_customer(&mut *tx, name, &cpf, phone, address.id)
            .await?;

        tx.commit().await?;
        Ok(customer)
    }

    /// Busca um cliente pelo CPF (aceita com ou sem máscara).
    pub async fn find_customer_by_cpf(&self, raw_cpf: &str) -> Result<Customer, AppError> {
        let cpf = cpf::normalize(raw_cpf);
        if !cpf::is_valid(&cpf) {
            return Err(AppError::InvalidCpf);
        }
        self.crm_repo
            .find_customer_by_cpf(&cpf)
            .await?
            .ok_or(AppError::CustomerNotFound)
    }

    pub async fn create_supplier<'e, E>(
        &self,
        executor: E,
        name: &str,
        email: Option<&str>,
        cnpj: &str,
        phone: Option<&str>,
        postal_code: Option<&str>,
        number: Option<&str>,
        complement: Option<&str>,
    ) -> Result<Supplier, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let address = self
            .crm_repo
            .insert_address(
                &mut *tx,
                postal_code.unwrap_or("N/A"),
                number.unwrap_or("S/N"),
                complement,
            )
            .await?;

        let supplier = self
            .crm_repo
            .insert_supplier(&mut *tx, name, email, cnpj, phone, address.id)
            .await?;

        tx.commit().await?;
        Ok(supplier)
    }

    pub async fn list_suppliers(&self) -> Result<Vec<Supplier>, AppError> {
        self.crm_repo.list_suppliers().await
    }
}
