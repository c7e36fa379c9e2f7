// src/handlers/sales.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{GerenteOnly, RequireRole},
    },
    services::sale_service::SaleLine,
};

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleLinePayload {
    pub product_id: Uuid,

    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSalePayload {
    pub customer_id: Uuid,

    // Forma de pagamento explícita: não existe "padrão" silencioso
    pub payment_method_id: Uuid,

    #[validate(length(min = 1, message = "Adicione ao menos um produto."), nested)]
    pub items: Vec<SaleLinePayload>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentMethodPayload {
    #[validate(length(min = 1, message = "O tipo é obrigatório."))]
    pub kind: String,

    #[validate(range(min = 1, message = "O número de parcelas deve ser ao menos 1."))]
    #[serde(default = "default_installments")]
    pub installments: i32,
}

fn default_installments() -> i32 {
    1
}

// ---
// Handlers
// ---

#[utoipa::path(
    post,
    path = "/api/sales",
    request_body = CreateSalePayload,
    responses(
        (status = 201, description = "Venda registrada; estoque baixado", body = crate::models::sales::SaleDetail),
        (status = 422, description = "Estoque insuficiente para algum item"),
        (status = 404, description = "Cliente, forma de pagamento ou produto inexistente")
    ),
    tag = "Vendas",
    security(("api_jwt" = []))
)]
pub async fn create_sale(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateSalePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let lines: Vec<SaleLine> = payload
        .items
        .iter()
        .map(|item| SaleLine {
            product_id: item.product_id,
            quantity: item.quantity,
        })
        .collect();

    let sale = app_state
        .sale_service
        .create_sale(
            &app_state.db_pool,
            payload.customer_id,
            payload.payment_method_id,
            &lines,
            &user,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(sale)))
}

#[utoipa::path(
    get,
    path = "/api/sales",
    responses((status = 200, description = "Vendas, mais recente primeiro", body = [crate::models::sales::SaleSummary])),
    tag = "Vendas",
    security(("api_jwt" = []))
)]
pub async fn list_sales(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let sales = app_state.sale_service.list_sales().await?;
    Ok((StatusCode::OK, Json(sales)))
}

#[utoipa::path(
    get,
    path = "/api/sales/{id}",
    params(("id" = Uuid, Path, description = "ID da venda")),
    responses(
        (status = 200, description = "Venda com itens e preços congelados", body = crate::models::sales::SaleDetail),
        (status = 404, description = "Venda não encontrada")
    ),
    tag = "Vendas",
    security(("api_jwt" = []))
)]
pub async fn sale_detail(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let sale = app_state.sale_service.sale_detail(id).await?;
    Ok((StatusCode::OK, Json(sale)))
}

#[utoipa::path(
    post,
    path = "/api/payment-methods",
    request_body = CreatePaymentMethodPayload,
    responses((status = 201, description = "Forma de pagamento criada", body = crate::models::sales::PaymentMethod)),
    tag = "Vendas",
    security(("api_jwt" = []))
)]
pub async fn create_payment_method(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequireRole<GerenteOnly>,
    Json(payload): Json<CreatePaymentMethodPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let method = app_state
        .sale_service
        .create_payment_method(&app_state.db_pool, &payload.kind, payload.installments)
        .await?;

    Ok((StatusCode::CREATED, Json(method)))
}

#[utoipa::path(
    get,
    path = "/api/payment-methods",
    responses((status = 200, description = "Formas de pagamento", body = [crate::models::sales::PaymentMethod])),
    tag = "Vendas",
    security(("api_jwt" = []))
)]
pub async fn list_payment_methods(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let methods = app_state.sale_service.list_payment_methods().await?;
    Ok((StatusCode::OK, Json(methods)))
}
