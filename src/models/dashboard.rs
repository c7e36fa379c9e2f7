// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Produto sem nenhuma venda nos últimos 90 dias
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdleProduct {
    pub id: Uuid,
    pub name: String,
}

// Os cards do topo do painel gerencial
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_sales: Decimal,      // Soma de todas as vendas
    pub total_stock_units: i64,    // Unidades em estoque, todos os produtos
    pub idle_products: Vec<IdleProduct>,
}

// Totais de venda por mês (12 posições, janeiro a dezembro)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySalesReport {
    pub year: i32,
    pub monthly: Vec<Decimal>,
}

// Uma barra do gráfico de estoque atual
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockReportEntry {
    pub name: String,
    pub quantity: i32,
}
