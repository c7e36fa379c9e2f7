// src/handlers/inventory.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{GerenteOnly, RequireRole},
    },
};

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    pub description: Option<String>,

    #[schema(example = "20.00")]
    pub price: Decimal,

    pub promotional_price: Option<Decimal>,

    pub category_id: Uuid,

    pub supplier_id: Option<Uuid>,

    #[validate(range(min = 0, message = "A quantidade inicial não pode ser negativa."))]
    #[serde(default)] // Se o JSON não tiver esse campo, assume 0
    pub initial_quantity: i32,

    #[validate(range(min = 0, message = "O estoque mínimo não pode ser negativo."))]
    #[serde(default = "default_min_quantity")]
    pub min_quantity: i32,
}

fn default_min_quantity() -> i32 {
    1
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetPromotionPayload {
    // None remove a promoção; Some define o preço promocional
    #[schema(example = "15.00")]
    pub promotional_price: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetStockPayload {
    #[validate(range(min = 0, message = "A quantidade não pode ser negativa."))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ProductSearchQuery {
    /// Filtro por nome do produto
    pub q: Option<String>,
}

// ---
// Handlers
// ---

#[utoipa::path(
    get,
    path = "/api/products",
    params(ProductSearchQuery),
    responses((status = 200, description = "Produtos com saldo atual", body = [crate::models::inventory::ProductWithStock])),
    tag = "Estoque",
    security(("api_jwt" = []))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<ProductSearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let products = app_state
        .inventory_service
        .list_products(query.q.as_deref())
        .await?;
    Ok((StatusCode::OK, Json(products)))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductPayload,
    responses(
        (status = 201, description = "Produto criado com sua linha de estoque", body = crate::models::inventory::ProductWithStock),
        (status = 403, description = "Apenas GERENTE")
    ),
    tag = "Estoque",
    security(("api_jwt" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequireRole<GerenteOnly>,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let product = app_state
        .inventory_service
        .create_product(
            &app_state.db_pool,
            &payload.name,
            payload.description.as_deref(),
            payload.price,
            payload.promotional_price,
            payload.category_id,
            payload.supplier_id,
            payload.initial_quantity,
            payload.min_quantity,
            &user,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "ID do produto")),
    request_body = UpdateProductPayload,
    responses((status = 200, description = "Produto atualizado", body = crate::models::inventory::Product)),
    tag = "Estoque",
    security(("api_jwt" = []))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let product = app_state
        .inventory_service
        .update_product(
            &app_state.db_pool,
            id,
            &payload.name,
            payload.description.as_deref(),
            payload.price,
        )
        .await?;

    Ok((StatusCode::OK, Json(product)))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}/promotion",
    params(("id" = Uuid, Path, description = "ID do produto")),
    request_body = SetPromotionPayload,
    responses(
        (status = 200, description = "Promoção definida ou removida", body = crate::models::inventory::Product),
        (status = 403, description = "Apenas GERENTE")
    ),
    tag = "Estoque",
    security(("api_jwt" = []))
)]
pub async fn set_promotion(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequireRole<GerenteOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetPromotionPayload>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state
        .inventory_service
        .set_promotion(&app_state.db_pool, id, payload.promotional_price)
        .await?;

    Ok((StatusCode::OK, Json(product)))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}/stock",
    params(("id" = Uuid, Path, description = "ID do produto")),
    request_body = SetStockPayload,
    responses((status = 200, description = "Saldo ajustado; delta registrado como AJUSTE_MANUAL")),
    tag = "Estoque",
    security(("api_jwt" = []))
)]
pub async fn set_stock(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetStockPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let new_quantity = app_state
        .inventory_service
        .set_stock(&app_state.db_pool, id, payload.quantity, &user)
        .await?;

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({ "quantity": new_quantity })),
    ))
}

#[utoipa::path(
    get,
    path = "/api/stock/low",
    responses((status = 200, description = "Produtos no mínimo ou abaixo", body = [crate::models::inventory::ProductWithStock])),
    tag = "Estoque",
    security(("api_jwt" = []))
)]
pub async fn low_stock(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let products = app_state.inventory_service.list_low_stock().await?;
    Ok((StatusCode::OK, Json(products)))
}

#[utoipa::path(
    get,
    path = "/api/stock/movements",
    responses((status = 200, description = "Histórico de movimentações, mais recente primeiro", body = [crate::models::inventory::StockMovementEntry])),
    tag = "Estoque",
    security(("api_jwt" = []))
)]
pub async fn movement_history(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let movements = app_state.inventory_service.list_movements().await?;
    Ok((StatusCode::OK, Json(movements)))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CreateCategoryPayload,
    responses((status = 201, description = "Categoria criada", body = crate::models::inventory::Category)),
    tag = "Estoque",
    security(("api_jwt" = []))
)]
pub async fn create_category(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequireRole<GerenteOnly>,
    Json(payload): Json<CreateCategoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let category = app_state
        .inventory_service
        .create_category(&app_state.db_pool, &payload.name)
        .await?;

    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses((status = 200, description = "Categorias", body = [crate::models::inventory::Category])),
    tag = "Estoque",
    security(("api_jwt" = []))
)]
pub async fn list_categories(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let categories = app_state.inventory_service.list_categories().await?;
    Ok((StatusCode::OK, Json(categories)))
}
