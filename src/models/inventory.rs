// src/models/inventory.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Categorias ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}

// --- Produtos (catálogo) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[schema(example = "20.00")]
    pub price: Decimal,
    // Quando definido, tem precedência sobre `price` na hora da venda
    #[schema(example = "15.00")]
    pub promotional_price: Option<Decimal>,
    pub category_id: Uuid,
    pub supplier_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Preço efetivamente cobrado: o promocional quando existe, senão o base.
    pub fn charged_price(&self) -> Decimal {
        self.promotional_price.unwrap_or(self.price)
    }
}

// --- Saldo de estoque ---
// Exatamente uma linha por produto; mutada apenas pelo livro-razão.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockLevel {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub min_quantity: i32,
    pub last_alert_at: Option<DateTime<Utc>>,
}

// Visão de listagem: produto + saldo atual (JOIN products/stock_levels)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithStock {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub promotional_price: Option<Decimal>,
    pub category_id: Uuid,
    pub supplier_id: Option<Uuid>,
    pub quantity: i32,
    pub min_quantity: i32,
}

// --- Movimentações de estoque ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "movement_type", rename_all = "SCREAMING_SNAKE_CASE")] // Banco
#[serde(rename_all = "SCREAMING_SNAKE_CASE")] // JSON
pub enum MovementType {
    Entrada,      // Vira "ENTRADA"
    Saida,        // Vira "SAIDA"
    AjusteManual, // Vira "AJUSTE_MANUAL"
}

// Uma linha do livro-razão. Registros são imutáveis: o histórico de um
// produto é a soma dos deltas, nunca um valor reescrito.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_id: Option<Uuid>,
    pub movement_type: MovementType,
    #[schema(example = -3)]
    pub quantity: i32,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Visão do histórico para a tela: nomes resolvidos, mais recente primeiro
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockMovementEntry {
    pub id: Uuid,
    pub product_name: String,
    pub user_login: Option<String>,
    pub movement_type: MovementType,
    pub quantity: i32,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn produto(price: Decimal, promo: Option<Decimal>) -> Product {
        Product {
            id: Uuid::nil(),
            name: "Café Torrado 500g".into(),
            description: None,
            price,
            promotional_price: promo,
            category_id: Uuid::nil(),
            supplier_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn preco_base_sem_promocao() {
        let p = produto(Decimal::new(2000, 2), None);
        assert_eq!(p.charged_price(), Decimal::new(2000, 2));
    }

    #[test]
    fn promocao_tem_precedencia() {
        let p = produto(Decimal::new(2000, 2), Some(Decimal::new(1500, 2)));
        assert_eq!(p.charged_price(), Decimal::new(1500, 2));
    }
}
