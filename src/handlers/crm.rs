// src/handlers/crm.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
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
pub struct CreateCustomerPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    // Aceita com ou sem máscara; o dígito verificador é validado no serviço
    #[validate(length(min = 11, message = "O CPF deve ter 11 dígitos."))]
    pub cpf: String,

    pub phone: Option<String>,
    pub postal_code: Option<String>,
    pub number: Option<String>,
    pub complement: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSupplierPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    #[validate(length(min = 14, message = "O CNPJ deve ter ao menos 14 dígitos."))]
    pub cnpj: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    pub phone: Option<String>,
    pub postal_code: Option<String>,
    pub number: Option<String>,
    pub complement: Option<String>,
}

// ---
// Handlers
// ---

#[utoipa::path(
    post,
    path = "/api/customers",
    request_body = CreateCustomerPayload,
    responses(
        (status = 201, description = "Cliente cadastrado", body = crate::models::crm::Customer),
        (status = 400, description = "CPF com formato inválido"),
        (status = 409, description = "CPF já cadastrado")
    ),
    tag = "Clientes",
    security(("api_jwt" = []))
)]
pub async fn create_customer(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Json(payload): Json<CreateCustomerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let customer = app_state
        .crm_service
        .create_customer(
            &app_state.db_pool,
            &payload.name,
            &payload.cpf,
            payload.phone.as_deref(),
            payload.postal_code.as_deref(),
            payload.number.as_deref(),
            payload.complement.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(customer)))
}

#[utoipa::path(
    get,
    path = "/api/customers/cpf/{cpf}",
    params(("cpf" = String, Path, description = "CPF, com ou sem máscara")),
    responses(
        (status = 200, description = "Cliente encontrado", body = crate::models::crm::Customer),
        (status = 404, description = "Cliente não encontrado")
    ),
    tag = "Clientes",
    security(("api_jwt" = []))
)]
pub async fn customer_by_cpf(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(cpf): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let customer = app_state.crm_service.find_customer_by_cpf(&cpf).await?;
    Ok((StatusCode::OK, Json(customer)))
}

#[utoipa::path(
    post,
    path = "/api/suppliers",
    request_body = CreateSupplierPayload,
    responses(
        (status = 201, description = "Fornecedor cadastrado", body = crate::models::crm::Supplier),
        (status = 409, description = "CNPJ já cadastrado")
    ),
    tag = "Fornecedores",
    security(("api_jwt" = []))
)]
pub async fn create_supplier(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequireRole<GerenteOnly>,
    Json(payload): Json<CreateSupplierPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let supplier = app_state
        .crm_service
        .create_supplier(
            &app_state.db_pool,
            &payload.name,
            payload.email.as_deref(),
            &payload.cnpj,
            payload.phone.as_deref(),
            payload.postal_code.as_deref(),
            payload.number.as_deref(),
            payload.complement.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(supplier)))
}

#[utoipa::path(
    get,
    path = "/api/suppliers",
    responses((status = 200, description = "Fornecedores", body = [crate::models::crm::Supplier])),
    tag = "Fornecedores",
    security(("api_jwt" = []))
)]
pub async fn list_suppliers(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let suppliers = app_state.crm_service.list_suppliers().await?;
    Ok((StatusCode::OK, Json(suppliers)))
}
