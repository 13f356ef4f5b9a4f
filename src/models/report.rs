// src/models/report.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::order::{DeliveryType, OrderStatus, PaymentMethod};

// Linhas cruas buscadas pelo repositório; as agregações são dobras
// puras sobre esses vetores (ver services/report_service.rs).

#[derive(Debug, Clone, FromRow)]
pub struct OrderRow {
    pub id: Uuid,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub delivery_type: DeliveryType,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ItemRow {
    pub product_id: Uuid,
    pub product_name: String,
    pub category_name: String,
    pub quantity: i32,
    pub total_price: Decimal,
    pub order_status: OrderStatus,
}

// --- Resultados ---

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    #[schema(example = "1234.56")]
    pub total_revenue: Decimal,
    pub order_count: u64,
    #[schema(example = "61.72")]
    pub average_ticket: Decimal,
}

#[derive(Debug, Serialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailySalesEntry {
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    pub revenue: Decimal,
    pub order_count: u64,
    // Somente pedidos ENTREGUE contam como concluídos
    pub completed_count: u64,
}

#[derive(Debug, Serialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopProductEntry {
    pub product_id: Uuid,
    pub product_name: String,
    pub total_quantity: i64,
    pub total_revenue: Decimal,
}

#[derive(Debug, Serialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRevenueEntry {
    pub category_name: String,
    pub total_revenue: Decimal,
}

#[derive(Debug, Serialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownEntry {
    pub key: String,
    pub count: u64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub summary: SalesSummary,
    pub daily: Vec<DailySalesEntry>,
    pub payment_methods: Vec<BreakdownEntry>,
    pub delivery_types: Vec<BreakdownEntry>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductReport {
    pub top_products: Vec<TopProductEntry>,
    pub revenue_by_category: Vec<CategoryRevenueEntry>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<usize>,
}
