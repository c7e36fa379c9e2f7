// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    models::auth::{Role, User},
};

/// 1. O Trait que define uma exigência de perfil
pub trait RoleRequirement: Send + Sync + 'static {
    fn allows(role: Role) -> bool;
    fn describe() -> &'static str;
}

/// 2. O Extractor (Guardião)
///
/// Colocar `RequireRole<GerenteOnly>` na assinatura do handler é o que
/// protege a rota; nada de checagem espalhada pelo corpo da função.
pub struct RequireRole<T>(pub PhantomData<T>);

// 3. Implementação do FromRequestParts
impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleRequirement,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // O auth_guard já rodou e deixou o usuário nos extensions
        let user = parts.extensions.get::<User>().ok_or(AppError::InvalidToken)?;

        if !T::allows(user.role) {
            return Err(AppError::Forbidden(T::describe()));
        }

        Ok(RequireRole(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS EXIGÊNCIAS (TIPOS)
// ---

/// Telas administrativas: painel, promoções, cadastro de produto, relatórios.
pub struct GerenteOnly;
impl RoleRequirement for GerenteOnly {
    fn allows(role: Role) -> bool {
        role == Role::Gerente
    }
    fn describe() -> &'static str {
        "GERENTE"
    }
}
