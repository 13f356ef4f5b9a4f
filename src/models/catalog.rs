// src/models/catalog.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- Categorias ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,

    #[schema(ignore)]
    pub company_id: Uuid,

    #[schema(example = "Refrigerantes")]
    pub name: String,

    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório"))]
    #[schema(example = "Refrigerantes")]
    pub name: String,

    #[serde(default)]
    pub sort_order: i32,

    // Apenas papéis de plataforma podem criar para uma empresa específica
    pub company_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório"))]
    pub name: Option<String>,
    pub sort_order: Option<i32>,
}

// --- Produtos ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,

    #[schema(ignore)]
    pub company_id: Uuid,

    pub category_id: Uuid,

    #[schema(example = "Cola 2L")]
    pub name: String,

    #[schema(example = "COLA-2L")]
    pub sku: Option<String>,

    pub description: Option<String>,

    #[schema(example = "10.00")]
    pub base_price: Decimal,

    pub image_path: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: Uuid,

    #[schema(ignore)]
    pub company_id: Uuid,

    pub product_id: Uuid,

    #[schema(example = "Pet")]
    pub name: String,

    #[schema(example = "2L")]
    pub volume: Option<String>,

    // Somado ao base_price do produto na precificação
    #[schema(example = "0.00")]
    pub price_modifier: Decimal,

    pub stock_quantity: i32,
    pub image_path: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    pub category_id: Uuid,

    #[validate(length(min = 1, message = "O nome é obrigatório"))]
    pub name: String,

    pub sku: Option<String>,
    pub description: Option<String>,

    #[schema(example = "10.00")]
    pub base_price: Decimal,

    pub company_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    pub category_id: Option<Uuid>,

    #[validate(length(min = 1, message = "O nome é obrigatório"))]
    pub name: Option<String>,

    pub sku: Option<String>,
    pub description: Option<String>,
    pub base_price: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVariantPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório"))]
    pub name: String,

    pub volume: Option<String>,

    #[serde(default)]
    pub price_modifier: Decimal,

    #[serde(default)]
    pub stock_quantity: i32,
}

// --- Cardápio público ---

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuVariant {
    pub id: Uuid,
    pub name: String,
    pub volume: Option<String>,
    pub price: Decimal,
    pub stock_quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuProduct {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub base_price: Decimal,
    pub image_path: Option<String>,
    pub variants: Vec<MenuVariant>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuCategory {
    pub id: Uuid,
    pub name: String,
    pub products: Vec<MenuProduct>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    pub company: crate::models::company::CompanyPublicProfile,
    pub categories: Vec<MenuCategory>,
}
