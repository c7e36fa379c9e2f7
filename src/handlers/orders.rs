// src/handlers/orders.rs

use std::collections::HashMap;

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
    services::order_service::OrderLine,
};

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLinePayload {
    pub product_id: Uuid,

    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    pub supplier_id: Uuid,

    #[validate(length(min = 1, message = "Adicione ao menos um produto."), nested)]
    pub items: Vec<OrderLinePayload>,
}

// Mapa produto -> quantidade efetivamente recebida.
// Toda linha do pedido precisa aparecer aqui; recebimento parcial não existe.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveOrderPayload {
    pub received: HashMap<Uuid, i32>,
}

// ---
// Handlers
// ---

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderPayload,
    responses(
        (status = 201, description = "Pedido criado em status PENDING", body = crate::models::orders::OrderDetail),
        (status = 404, description = "Fornecedor ou produto inexistente")
    ),
    tag = "Pedidos",
    security(("api_jwt" = []))
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let lines: Vec<OrderLine> = payload
        .items
        .iter()
        .map(|item| OrderLine {
            product_id: item.product_id,
            quantity: item.quantity,
        })
        .collect();

    let order = app_state
        .order_service
        .create_order(&app_state.db_pool, payload.supplier_id, &lines)
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    responses((status = 200, description = "Pedidos, mais recente primeiro", body = [crate::models::orders::OrderSummary])),
    tag = "Pedidos",
    security(("api_jwt" = []))
)]
pub async fn list_orders(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let orders = app_state.order_service.list_orders().await?;
    Ok((StatusCode::OK, Json(orders)))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Pedido com itens", body = crate::models::orders::OrderDetail),
        (status = 404, description = "Pedido não encontrado")
    ),
    tag = "Pedidos",
    security(("api_jwt" = []))
)]
pub async fn order_detail(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state.order_service.order_detail(id).await?;
    Ok((StatusCode::OK, Json(order)))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/receive",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    request_body = ReceiveOrderPayload,
    responses(
        (status = 200, description = "Estoque atualizado; pedido marcado como RECEIVED"),
        (status = 409, description = "Pedido já processado")
    ),
    tag = "Pedidos",
    security(("api_jwt" = []))
)]
pub async fn receive_order(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReceiveOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .order_service
        .receive_order(&app_state.db_pool, id, &payload.received, &user)
        .await?;

    Ok(StatusCode::OK)
}

#[utoipa::path(
    get,
    path = "/api/messages",
    responses(
        (status = 200, description = "Log de mensagens, mais recente primeiro", body = [crate::models::orders::Message]),
        (status = 403, description = "Apenas GERENTE")
    ),
    tag = "Pedidos",
    security(("api_jwt" = []))
)]
pub async fn list_messages(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequireRole<GerenteOnly>,
) -> Result<impl IntoResponse, AppError> {
    let messages = app_state.order_service.list_messages().await?;
    Ok((StatusCode::OK, Json(messages)))
}
