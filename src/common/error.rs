use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // --- Autenticação / Autorização ---
    #[error("Este login já está em uso")]
    LoginAlreadyExists,

    #[error("Login ou senha inválidos")]
    InvalidCredentials,

    #[error("Token de autenticação inválido ou ausente")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Acesso restrito ao perfil {0}")]
    Forbidden(&'static str),

    // --- Regras de negócio ---
    #[error("CPF com formato inválido")]
    InvalidCpf,

    #[error("CPF já cadastrado")]
    CpfAlreadyExists,

    #[error("CNPJ já cadastrado")]
    CnpjAlreadyExists,

    #[error("Cliente não encontrado")]
    CustomerNotFound,

    #[error("Fornecedor não encontrado")]
    SupplierNotFound,

    #[error("Produto não encontrado")]
    ProductNotFound,

    #[error("Categoria não encontrada")]
    CategoryNotFound,

    #[error("Forma de pagamento não encontrada")]
    PaymentMethodNotFound,

    #[error("Venda não encontrada")]
    SaleNotFound,

    #[error("Pedido não encontrado")]
    OrderNotFound,

    #[error("Estoque insuficiente para \"{product}\". Disponível: {available}")]
    InsufficientStock { product: String, available: i32 },

    #[error("Este pedido já foi processado")]
    OrderAlreadyProcessed,

    #[error("Adicione ao menos um produto com quantidade maior que zero")]
    NoValidLines,

    #[error("Quantidade recebida ausente para o produto {0}")]
    MissingReceivedQuantity(Uuid),

    #[error("A quantidade não pode ser negativa")]
    NegativeQuantity,

    #[error("O preço não pode ser negativo")]
    NegativePrice,

    // --- Infraestrutura ---
    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::LoginAlreadyExists
            | AppError::CpfAlreadyExists
            | AppError::CnpjAlreadyExists
            | AppError::OrderAlreadyProcessed => (StatusCode::CONFLICT, self.to_string()),

            AppError::InvalidCredentials | AppError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }

            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, self.to_string()),

            AppError::UserNotFound
            | AppError::CustomerNotFound
            | AppError::SupplierNotFound
            | AppError::ProductNotFound
            | AppError::CategoryNotFound
            | AppError::PaymentMethodNotFound
            | AppError::SaleNotFound
            | AppError::OrderNotFound => (StatusCode::NOT_FOUND, self.to_string()),

            AppError::InsufficientStock { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }

            AppError::InvalidCpf
            | AppError::NoValidLines
            | AppError::MissingReceivedQuantity(_)
            | AppError::NegativeQuantity
            | AppError::NegativePrice => (StatusCode::BAD_REQUEST, self.to_string()),

            // Todos os outros erros (DatabaseError, InternalServerError...) viram 500.
            // O `tracing` loga a mensagem detalhada; o cliente recebe algo genérico.
            e => {
                tracing::error!("Erro interno do servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
