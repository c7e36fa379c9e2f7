// src/services/sale_service.rs

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CrmRepository, ProductRepository, SaleRepository, StockRepository},
    models::{
        auth::User,
        inventory::MovementType,
        sales::{PaymentMethod, SaleDetail, SaleItemDetail, SaleSummary},
    },
    services::inventory_service::InventoryService,
};

/// Uma linha do carrinho, como chega da tela de venda.
#[derive(Debug, Clone)]
pub struct SaleLine {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Clone)]
pub struct SaleService {
    sale_repo: SaleRepository,
    crm_repo: CrmRepository,
    product_repo: ProductRepository,
    stock_repo: StockRepository,
    inventory_service: InventoryService,
}

impl SaleService {
    pub fn new(
        sale_repo: SaleRepository,
        crm_repo: CrmRepository,
        product_repo: ProductRepository,
        stock_repo: StockRepository,
        inventory_service: InventoryService,
    ) -> Self {
        Self {
            sale_repo,
            crm_repo,
            product_repo,
            stock_repo,
            inventory_service,
        }
    }

    /// Registra uma venda completa: valida o carrinho contra o saldo atual,
    /// congela os preços, grava cabeçalho + itens e baixa o estoque pelo
    /// livro-razão. Tudo em uma transação: qualquer falha desfaz o conjunto.
    pub async fn create_sale<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
        payment_method_id: Uuid,
        lines: &[SaleLine],
        acting_user: &User,
    ) -> Result<SaleDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        // Linhas com quantidade <= 0 são descartadas; linhas repetidas do
        // mesmo produto são somadas. O BTreeMap também fixa a ordem de
        // travamento das linhas de saldo, evitando deadlock entre vendas
        // concorrentes com carrinhos em ordens diferentes.
        let mut wanted: BTreeMap<Uuid, i32> = BTreeMap::new();
        for line in lines {
            if line.quantity > 0 {
                *wanted.entry(line.product_id).or_insert(0) += line.quantity;
            }
        }
        if wanted.is_empty() {
            return Err(AppError::NoValidLines);
        }

        let mut tx = executor.begin().await?;

        let customer = self
            .crm_repo
            .find_customer_by_id(&mut *tx, customer_id)
            .await?
            .ok_or(AppError::CustomerNotFound)?;
        self.sale_repo
            .find_payment_method(&mut *tx, payment_method_id)
            .await?
            .ok_or(AppError::PaymentMethodNotFound)?;

        // Valida disponibilidade e congela preços antes de qualquer escrita.
        // O FOR UPDATE mantém os saldos travados até o commit.
        let mut priced = Vec::with_capacity(wanted.len());
        let mut total = Decimal::ZERO;
        for (&product_id, &quantity) in &wanted {
            let product = self
                .product_repo
                .find_by_id(&mut *tx, product_id)
                .await?
                .ok_or(AppError::ProductNotFound)?;
            let level = self
                .stock_repo
                .get_for_update(&mut *tx, product_id)
                .await?
                .ok_or(AppError::ProductNotFound)?;

            if level.quantity < quantity {
                return Err(AppError::InsufficientStock {
                    product: product.name,
                    available: level.quantity,
                });
            }

            let unit_price = product.charged_price();
            total += line_total(unit_price, quantity);
            priced.push((product, quantity, unit_price));
        }

        let sale = self
            .sale_repo
            .insert_sale(&mut *tx, customer_id, payment_method_id, total)
            .await?;

        let note = format!("Venda {}", sale.id);
        let mut items = Vec::with_capacity(priced.len());
        for (product, quantity, unit_price) in priced {
            self.sale_repo
                .insert_item(&mut *tx, sale.id, product.id, quantity, unit_price)
                .await?;
            self.inventory_service
                .adjust_stock(
                    &mut *tx,
                    product.id,
                    -quantity,
                    MovementType::Saida,
                    acting_user,
                    &note,
                )
                .await?;
            items.push(SaleItemDetail {
                product_id: product.id,
                product_name: product.name,
                quantity,
                unit_price,
            });
        }

        tx.commit().await?;
        tracing::info!(sale_id = %sale.id, %total, "Venda registrada");

        Ok(SaleDetail {
            header: sale,
            customer_name: customer.name,
            items,
        })
    }

    // ---
    // Leitura
    // ---

    pub async fn list_sales(&self) -> Result<Vec<SaleSummary>, AppError> {
        self.sale_repo.list().await
    }

    pub async fn sale_detail(&self, id: Uuid) -> Result<SaleDetail, AppError> {
        let sale = self
            .sale_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::SaleNotFound)?;
        let customer = self
            .crm_repo
            .get_customer(sale.customer_id)
            .await?
            .ok_or(AppError::CustomerNotFound)?;
        let items = self.sale_repo.list_items(id).await?;
        Ok(SaleDetail {
            header: sale,
            customer_name: customer.name,
            items,
        })
    }

    // ---
    // Formas de pagamento
    // ---

    pub async fn list_payment_methods(&self) -> Result<Vec<PaymentMethod>, AppError> {
        self.sale_repo.list_payment_methods().await
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
        if installments < 1 {
            return Err(AppError::NegativeQuantity);
        }
        self.sale_repo
            .create_payment_method(executor, kind, installments)
            .await
    }
}

/// Subtotal de uma linha: preço unitário congelado vezes a quantidade.
fn line_total(unit_price: Decimal, quantity: i32) -> Decimal {
    unit_price * Decimal::from(quantity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtotal_multiplica_preco_pela_quantidade() {
        assert_eq!(
            line_total(Decimal::new(2000, 2), 3),
            Decimal::new(6000, 2)
        );
    }

    #[test]
    fn subtotal_de_quantidade_um_e_o_proprio_preco() {
        assert_eq!(line_total(Decimal::new(1599, 2), 1), Decimal::new(1599, 2));
    }
}
