// src/models/finance.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::order::PaymentMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "entry_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryKind {
    Receita,
    Despesa,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "entry_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStatus {
    Pendente,
    Pago,
    Cancelado,
}

// Lançamento financeiro. Quando gerado por um pedido, order_id aponta
// para ele e o valor é o total_amount do pedido.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancialEntry {
    pub id: Uuid,

    #[schema(ignore)]
    pub company_id: Uuid,

    pub order_id: Option<Uuid>,
    pub kind: EntryKind,

    #[schema(example = "28.00")]
    pub amount: Decimal,

    #[schema(example = "Venda Pedido 550e8400")]
    pub description: String,

    pub payment_method: Option<PaymentMethod>,

    #[schema(value_type = String, format = Date, example = "2026-08-15")]
    pub due_date: NaiveDate,

    pub status: EntryStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryPayload {
    pub kind: EntryKind,

    #[schema(example = "150.00")]
    pub amount: Decimal,

    #[validate(length(min = 1, message = "A descrição é obrigatória"))]
    pub description: String,

    pub payment_method: Option<PaymentMethod>,

    #[schema(value_type = String, format = Date)]
    pub due_date: NaiveDate,

    pub company_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntryStatusPayload {
    pub status: EntryStatus,
}
