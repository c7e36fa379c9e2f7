// src/services/inventory_service.rs

use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ProductRepository, StockRepository},
    models::{
        auth::User,
        inventory::{Category, MovementType, Product, ProductWithStock, StockMovementEntry},
    },
};

#[derive(Clone)]
pub struct InventoryService {
    product_repo: ProductRepository,
    stock_repo: StockRepository,
}

impl InventoryService {
    pub fn new(product_repo: ProductRepository, stock_repo: StockRepository) -> Self {
        Self {
            product_repo,
            stock_repo,
        }
    }

    // ---
    // Livro-razão de estoque
    // ---

    /// Aplica um delta assinado ao saldo de um produto e grava a movimentação
    /// correspondente, na mesma transação.
    ///
    /// A linha de saldo é lida com FOR UPDATE: duas vendas concorrentes do
    /// mesmo produto serializam aqui, e a segunda enxerga o saldo já
    /// debitado pela primeira. Saldo negativo é rejeitado antes da escrita.
    ///
    /// Quando o chamador já está dentro de uma transação, o `begin` abre um
    /// savepoint: o rollback externo desfaz saldo e movimentação juntos.
    pub async fn adjust_stock<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        delta: i32,
        movement_type: MovementType,
        acting_user: &User,
        note: &str,
    ) -> Result<i32, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let level = self
            .stock_repo
            .get_for_update(&mut *tx, product_id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        let new_quantity = level.quantity + delta;
        if new_quantity < 0 {
            let product = self
                .product_repo
                .find_by_id(&mut *tx, product_id)
                .await?
                .ok_or(AppError::ProductNotFound)?;
            return Err(AppError::InsufficientStock {
                product: product.name,
                available: level.quantity,
            });
        }

        self.stock_repo
            .set_quantity(&mut *tx, product_id, new_quantity)
            .await?;
        self.stock_repo
            .insert_movement(
                &mut *tx,
                product_id,
                Some(acting_user.id),
                movement_type,
                delta,
                Some(note),
            )
            .await?;

        tx.commit().await?;
        tracing::debug!(%product_id, delta, new_quantity, "Estoque ajustado");
        Ok(new_quantity)
    }

    /// Ajuste manual: leva o saldo para um valor absoluto e registra o delta
    /// como AJUSTE_MANUAL. Usado na conferência física de estoque.
    pub async fn set_stock<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        new_quantity: i32,
        acting_user: &User,
    ) -> Result<i32, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        if new_quantity < 0 {
            return Err(AppError::NegativeQuantity);
        }

        let mut tx = executor.begin().await?;

        let level = self
            .stock_repo
            .get_for_update(&mut *tx, product_id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        let delta = new_quantity - level.quantity;
        if delta != 0 {
            self.stock_repo
                .set_quantity(&mut *tx, product_id, new_quantity)
                .await?;
            self.stock_repo
                .insert_movement(
                    &mut *tx,
                    product_id,
                    Some(acting_user.id),
                    MovementType::AjusteManual,
                    delta,
                    Some(&format!("Alterado por {}", acting_user.login)),
                )
                .await?;
        }

        tx.commit().await?;
        Ok(new_quantity)
    }

    // ---
    // Catálogo de produtos
    // ---

    /// Cria o produto junto com sua linha de saldo (sempre em par). Estoque
    /// inicial positivo entra no livro-razão como ENTRADA, para que o saldo
    /// seja a soma dos deltas desde o primeiro dia.
    pub async fn create_product<'e, E>(
        &self,
        executor: E,
        name: &str,
        description: Option<&str>,
        price: Decimal,
        promotional_price: Option<Decimal>,
        category_id: Uuid,
        supplier_id: Option<Uuid>,
        initial_quantity: i32,
        min_quantity: i32,
        acting_user: &User,
    ) -> Result<ProductWithStock, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        if price.is_sign_negative() || promotional_price.is_some_and(|p| p.is_sign_negative()) {
            return Err(AppError::NegativePrice);
        }
        if initial_quantity < 0 || min_quantity < 0 {
            return Err(AppError::NegativeQuantity);
        }

        let mut tx = executor.begin().await?;

        self.product_repo
            .find_category(&mut *tx, category_id)
            .await?
            .ok_or(AppError::CategoryNotFound)?;

        let product = self
            .product_repo
            .insert(
                &mut *tx,
                name,
                description,
                price,
                promotional_price,
                category_id,
                supplier_id,
            )
            .await?;

        let level = self
            .stock_repo
            .create_level(&mut *tx, product.id, initial_quantity, min_quantity)
            .await?;

        if initial_quantity > 0 {
            self.stock_repo
                .insert_movement(
                    &mut *tx,
                    product.id,
                    Some(acting_user.id),
                    MovementType::Entrada,
                    initial_quantity,
                    Some("Cadastro do produto"),
                )
                .await?;
        }

        tx.commit().await?;

        Ok(ProductWithStock {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            promotional_price: product.promotional_price,
            category_id: product.category_id,
            supplier_id: product.supplier_id,
            quantity: level.quantity,
            min_quantity: level.min_quantity,
        })
    }

    pub async fn update_product<'e, E>(
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
        if price.is_sign_negative() {
            return Err(AppError::NegativePrice);
        }
        self.product_repo
            .update(executor, id, name, description, price)
            .await
    }

    /// Define ou remove (None) o preço promocional de um produto.
    pub async fn set_promotion<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        promotional_price: Option<Decimal>,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if promotional_price.is_some_and(|p| p <= Decimal::ZERO) {
            return Err(AppError::NegativePrice);
        }
        self.product_repo
            .set_promotional_price(executor, id, promotional_price)
            .await
    }

    pub async fn create_category<'e, E>(&self, executor: E, name: &str) -> Result<Category, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.product_repo.create_category(executor, name).await
    }

    // ---
    // Leitura
    // ---

    pub async fn list_products(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<ProductWithStock>, AppError> {
        self.product_repo.list_with_stock(search).await
    }

    pub async fn list_low_stock(&self) -> Result<Vec<ProductWithStock>, AppError> {
        self.product_repo.list_low_stock().await
    }

    pub async fn list_movements(&self) -> Result<Vec<StockMovementEntry>, AppError> {
        self.stock_repo.list_movements().await
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        self.product_repo.list_categories().await
    }
}
