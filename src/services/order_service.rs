// src/services/order_service.rs

use std::collections::{BTreeMap, HashMap};

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CrmRepository, OrderRepository, ProductRepository},
    models::{
        auth::User,
        inventory::MovementType,
        orders::{Message, OrderDetail, OrderItemDetail, OrderStatus, OrderSummary},
    },
    services::inventory_service::InventoryService,
};

/// Uma linha do pedido de reposição.
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Clone)]
pub struct OrderService {
    order_repo: OrderRepository,
    crm_repo: CrmRepository,
    product_repo: ProductRepository,
    inventory_service: InventoryService,
}

impl OrderService {
    pub fn new(
        order_repo: OrderRepository,
        crm_repo: CrmRepository,
        product_repo: ProductRepository,
        inventory_service: InventoryService,
    ) -> Self {
        Self {
            order_repo,
            crm_repo,
            product_repo,
            inventory_service,
        }
    }

    /// Cria um pedido de reposição em status PENDING com seus itens e grava
    /// uma mensagem de log descrevendo o conteúdo, tudo em uma transação.
    pub async fn create_order<'e, E>(
        &self,
        executor: E,
        supplier_id: Uuid,
        lines: &[OrderLine],
    ) -> Result<OrderDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        // Mesmo saneamento do carrinho de venda: descarta quantidades <= 0
        // e soma linhas repetidas do mesmo produto.
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

        let supplier = self
            .crm_repo
            .find_supplier(&mut *tx, supplier_id)
            .await?
            .ok_or(AppError::SupplierNotFound)?;

        let order = self.order_repo.insert_order(&mut *tx, supplier_id).await?;

        let mut items = Vec::with_capacity(wanted.len());
        let mut summary_parts = Vec::with_capacity(wanted.len());
        for (&product_id, &quantity) in &wanted {
            let product = self
                .product_repo
                .find_by_id(&mut *tx, product_id)
                .await?
                .ok_or(AppError::ProductNotFound)?;

            self.order_repo
                .insert_item(&mut *tx, order.id, product_id, quantity)
                .await?;

            summary_parts.push(format!("{} ({} un)", product.name, quantity));
            items.push(OrderItemDetail {
                product_id,
                product_name: product.name,
                quantity,
            });
        }

        let content = format!(
            "Pedido {} criado. Itens: {}.",
            order.id,
            summary_parts.join(", ")
        );
        self.order_repo
            .insert_message(&mut *tx, Some(supplier_id), None, &content, "LOG DO SISTEMA")
            .await?;

        tx.commit().await?;

        Ok(OrderDetail {
            header: order,
            supplier_name: supplier.name,
            items,
        })
    }

    /// Dá entrada no estoque a partir de um pedido PENDING e o marca como
    /// RECEIVED. Recebimento parcial não existe: ou todas as linhas entram,
    /// ou nenhuma (a transação desfaz status e saldos juntos).
    ///
    /// A linha do pedido é travada com FOR UPDATE, então um segundo
    /// recebimento concorrente espera o primeiro e é rejeitado como
    /// "já processado".
    pub async fn receive_order<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        received: &HashMap<Uuid, i32>,
        acting_user: &User,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let order = self
            .order_repo
            .get_for_update(&mut *tx, order_id)
            .await?
            .ok_or(AppError::OrderNotFound)?;
        if order.status != OrderStatus::Pending {
            return Err(AppError::OrderAlreadyProcessed);
        }

        let note = format!("Recebimento do Pedido {}", order_id);
        let items = self.order_repo.list_items(&mut *tx, order_id).await?;
        for item in &items {
            let quantity = *received
                .get(&item.product_id)
                .ok_or(AppError::MissingReceivedQuantity(item.product_id))?;
            if quantity < 0 {
                return Err(AppError::NegativeQuantity);
            }
            if quantity > 0 {
                self.inventory_service
                    .adjust_stock(
                        &mut *tx,
                        item.product_id,
                        quantity,
                        MovementType::Entrada,
                        acting_user,
                        &note,
                    )
                    .await?;
            }
        }

        self.order_repo
            .set_status(&mut *tx, order_id, OrderStatus::Received)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    // ---
    // Leitura
    // ---

    pub async fn list_orders(&self) -> Result<Vec<OrderSummary>, AppError> {
        self.order_repo.list().await
    }

    pub async fn order_detail(&self, id: Uuid) -> Result<OrderDetail, AppError> {
        let order = self
            .order_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::OrderNotFound)?;
        let supplier = self
            .crm_repo
            .get_supplier(order.supplier_id)
            .await?
            .ok_or(AppError::SupplierNotFound)?;

        let mut items = Vec::new();
        for item in self.order_repo.get_items(id).await? {
            let product = self
                .product_repo
                .get_product(item.product_id)
                .await?
                .ok_or(AppError::ProductNotFound)?;
            items.push(OrderItemDetail {
                product_id: item.product_id,
                product_name: product.name,
                quantity: item.quantity,
            });
        }

        Ok(OrderDetail {
            header: order,
            supplier_name: supplier.name,
            items,
        })
    }

    pub async fn list_messages(&self) -> Result<Vec<Message>, AppError> {
        self.order_repo.list_messages().await
    }
}
