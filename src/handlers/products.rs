// src/handlers/products.rs

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::CurrentUser,
    models::catalog::{
        CreateProductPayload, CreateVariantPayload, Product, ProductVariant, UpdateProductPayload,
    },
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ProductListQuery {
    pub category_id: Option<Uuid>,
}

// GET /api/products
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Catálogo",
    params(ProductListQuery),
    responses(
        (status = 200, description = "Produtos do tenant", body = Vec<Product>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list(
    State(app_state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = app_state
        .catalog_service
        .list_products(&session, query.category_id)
        .await?;
    Ok(Json(products))
}

// POST /api/products
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Catálogo",
    request_body = CreateProductPayload,
    responses(
        (status = 201, description = "Produto criado", body = Product),
        (status = 404, description = "Categoria não encontrada na empresa"),
        (status = 409, description = "SKU duplicado na empresa")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create(
    State(app_state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = app_state
        .catalog_service
        .create_product(&session, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

// PUT /api/products/{id}
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Catálogo",
    params(("id" = Uuid, Path, description = "ID do produto")),
    request_body = UpdateProductPayload,
    responses(
        (status = 200, description = "Produto atualizado", body = Product),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update(
    State(app_state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<Json<Product>, AppError> {
    payload.validate()?;

    let product = app_state
        .catalog_service
        .update_product(&session, id, &payload)
        .await?;
    Ok(Json(product))
}

// DELETE /api/products/{id}  (soft delete)
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Catálogo",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto desativado", body = Product),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("bearer_auth" = []))
)]
pub async fn deactivate(
    State(app_state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, AppError> {
    let product = app_state
        .catalog_service
        .deactivate_product(&session, id)
        .await?;
    Ok(Json(product))
}

// POST /api/products/{id}/image
#[utoipa::path(
    post,
    path = "/api/products/{id}/image",
    tag = "Catálogo",
    params(("id" = Uuid, Path, description = "ID do produto")),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Imagem gravada, retorna a chave do arquivo"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_image(
    State(app_state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, AppError> {
    let key = app_state
        .catalog_service
        .upload_product_image(&session, id, &body, app_state.file_store.as_ref())
        .await?;
    Ok(Json(serde_json::json!({ "path": key })))
}

// GET /api/products/{id}/variants
#[utoipa::path(
    get,
    path = "/api/products/{id}/variants",
    tag = "Catálogo",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Variantes do produto", body = Vec<ProductVariant>),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_variants(
    State(app_state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ProductVariant>>, AppError> {
    let variants = app_state.catalog_service.list_variants(&session, id).await?;
    Ok(Json(variants))
}

// POST /api/products/{id}/variants
#[utoipa::path(
    post,
    path = "/api/products/{id}/variants",
    tag = "Catálogo",
    params(("id" = Uuid, Path, description = "ID do produto")),
    request_body = CreateVariantPayload,
    responses(
        (status = 201, description = "Variante criada", body = ProductVariant),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_variant(
    State(app_state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateVariantPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let variant = app_state
        .catalog_service
        .create_variant(&session, id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(variant)))
}

// DELETE /api/variants/{id}  (soft delete)
#[utoipa::path(
    delete,
    path = "/api/variants/{id}",
    tag = "Catálogo",
    params(("id" = Uuid, Path, description = "ID da variante")),
    responses(
        (status = 200, description = "Variante desativada", body = ProductVariant),
        (status = 404, description = "Variante não encontrada")
    ),
    security(("bearer_auth" = []))
)]
pub async fn deactivate_variant(
    State(app_state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductVariant>, AppError> {
    let variant = app_state
        .catalog_service
        .deactivate_variant(&session, id)
        .await?;
    Ok(Json(variant))
}
