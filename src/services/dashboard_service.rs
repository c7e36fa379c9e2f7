// src/services/dashboard_service.rs

use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};

use crate::{
    common::error::AppError,
    db::{SaleRepository, StockRepository},
    models::dashboard::{DashboardSummary, MonthlySalesReport, StockReportEntry},
};

// Janela usada para apontar produtos "parados" no painel
const IDLE_WINDOW_DAYS: i32 = 90;

#[derive(Clone)]
pub struct DashboardService {
    sale_repo: SaleRepository,
    stock_repo: StockRepository,
}

impl DashboardService {
    pub fn new(sale_repo: SaleRepository, stock_repo: StockRepository) -> Self {
        Self {
            sale_repo,
            stock_repo,
        }
    }

    /// Os cards do painel gerencial. As somas rodam dentro de uma transação
    /// para enxergar um snapshot consistente dos dados.
    pub async fn summary<'e, E>(&self, executor: E) -> Result<DashboardSummary, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;
        let total_sales = self.sale_repo.total_sales(&mut *tx).await?;
        let total_stock_units = self.stock_repo.total_units(&mut *tx).await?;
        tx.commit().await?;

        let idle_products = self.sale_repo.idle_products(IDLE_WINDOW_DAYS).await?;

        Ok(DashboardSummary {
            total_sales,
            total_stock_units,
            idle_products,
        })
    }

    /// Totais de venda por mês de um ano, sempre com 12 posições.
    pub async fn monthly_sales(&self, year: i32) -> Result<MonthlySalesReport, AppError> {
        let mut monthly = vec![Decimal::ZERO; 12];
        for (month, total) in self.sale_repo.monthly_totals(year).await? {
            if (1..=12).contains(&month) {
                monthly[(month - 1) as usize] = total;
            }
        }
        Ok(MonthlySalesReport { year, monthly })
    }

    /// Saldo atual por produto, do maior para o menor.
    pub async fn stock_report(&self) -> Result<Vec<StockReportEntry>, AppError> {
        self.stock_repo.stock_report().await
    }
}
