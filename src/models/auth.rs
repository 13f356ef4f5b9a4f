// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Papéis do sistema. ADMINISTRADOR e SUB_MASTER são papéis de plataforma
// (company_id nulo, atuam sobre qualquer tenant); os demais são presos
// à empresa do usuário.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Administrador,
    SubMaster,
    MasterDist,
    Financeiro,
    Leitura,
}

impl Role {
    /// Papéis não presos a um único tenant.
    pub fn is_platform_wide(self) -> bool {
        matches!(self, Role::Administrador | Role::SubMaster)
    }
}

// Usuário de staff vindo do banco
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub company_id: Option<Uuid>,
    pub name: String,
    pub email: String,

    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub password_hash: String,

    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Identidade autenticada carregada no token e passada explicitamente
/// a cada chamada de serviço.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: Uuid,
    pub role: Role,
    pub company_id: Option<Uuid>,
    pub company_name: String,
    pub company_slug: String,
}

// Estrutura de dados ("claims") dentro do JWT.
// Papel e empresa são fixados no login e valem até o token expirar.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub company_id: Option<Uuid>,
    pub company_name: String,
    pub company_slug: String,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn into_session(self) -> Session {
        Session {
            user_id: self.sub,
            role: self.role,
            company_id: self.company_id,
            company_name: self.company_name,
            company_slug: self.company_slug,
        }
    }
}

// Cadastro de uma nova empresa com seu primeiro usuário (dono)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupPayload {
    #[validate(length(min = 2, message = "O nome da empresa deve ter no mínimo 2 caracteres"))]
    #[schema(example = "Bebidas Sul Distribuidora")]
    pub company_name: String,

    #[validate(length(min = 2, message = "O slug deve ter no mínimo 2 caracteres"))]
    #[schema(example = "bebidas-sul")]
    pub company_slug: String,

    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres"))]
    #[schema(example = "João da Silva")]
    pub user_name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "joao@bebidassul.com.br")]
    pub email: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// Criação de usuário de staff por um papel com permissão
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres"))]
    pub name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,

    pub role: Role,

    // Papéis de plataforma indicam explicitamente a empresa alvo;
    // sessões de tenant só podem indicar a própria empresa (ou omitir).
    pub company_id: Option<Uuid>,
}
