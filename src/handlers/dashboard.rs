// src/handlers/dashboard.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{Datelike, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{GerenteOnly, RequireRole},
    },
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct YearQuery {
    /// Ano do relatório; omitido, usa o ano corrente
    pub year: Option<i32>,
}

#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    responses(
        (status = 200, description = "Indicadores do painel gerencial", body = crate::models::dashboard::DashboardSummary),
        (status = 403, description = "Apenas GERENTE")
    ),
    tag = "Painel",
    security(("api_jwt" = []))
)]
pub async fn summary(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequireRole<GerenteOnly>,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state
        .dashboard_service
        .summary(&app_state.db_pool)
        .await?;
    Ok((StatusCode::OK, Json(summary)))
}

#[utoipa::path(
    get,
    path = "/api/reports/sales/monthly",
    params(YearQuery),
    responses(
        (status = 200, description = "Totais de venda por mês (12 posições)", body = crate::models::dashboard::MonthlySalesReport),
        (status = 403, description = "Apenas GERENTE")
    ),
    tag = "Painel",
    security(("api_jwt" = []))
)]
pub async fn monthly_sales(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequireRole<GerenteOnly>,
    Query(query): Query<YearQuery>,
) -> Result<impl IntoResponse, AppError> {
    let year = query.year.unwrap_or_else(|| Utc::now().year());
    let report = app_state.dashboard_service.monthly_sales(year).await?;
    Ok((StatusCode::OK, Json(report)))
}

#[utoipa::path(
    get,
    path = "/api/reports/stock",
    responses(
        (status = 200, description = "Saldo atual por produto", body = [crate::models::dashboard::StockReportEntry]),
        (status = 403, description = "Apenas GERENTE")
    ),
    tag = "Painel",
    security(("api_jwt" = []))
)]
pub async fn stock_report(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequireRole<GerenteOnly>,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state.dashboard_service.stock_report().await?;
    Ok((StatusCode::OK, Json(report)))
}
