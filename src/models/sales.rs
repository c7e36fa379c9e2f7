// src/models/sales.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub id: Uuid,
    #[schema(example = "Cartão de Crédito")]
    pub kind: String,
    pub installments: i32,
}

// Cabeçalho da venda. Total e itens são imutáveis depois do commit:
// não existe caminho de atualização.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub payment_method_id: Uuid,
    #[schema(example = "60.00")]
    pub total: Decimal,
    pub purchased_at: DateTime<Utc>,
}

// Item da venda com o preço unitário congelado no momento da compra,
// independente de mudanças de preço posteriores.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub sale_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
}

// --- Visões de leitura ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleSummary {
    pub id: Uuid,
    pub customer_name: String,
    pub total: Decimal,
    pub purchased_at: DateTime<Utc>,
    pub items_count: i64,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemDetail {
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetail {
    #[serde(flatten)]
    pub header: Sale,
    pub customer_name: String,
    pub items: Vec<SaleItemDetail>,
}
