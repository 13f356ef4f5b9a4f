// src/handlers/categories.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::CurrentUser,
    models::catalog::{Category, CreateCategoryPayload, UpdateCategoryPayload},
};

// GET /api/categories
#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "Catálogo",
    responses(
        (status = 200, description = "Categorias do tenant", body = Vec<Category>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list(
    State(app_state): State<AppState>,
    CurrentUser(session): CurrentUser,
) -> Result<Json<Vec<Category>>, AppError> {
    let categories = app_state.catalog_service.list_categories(&session).await?;
    Ok(Json(categories))
}

// POST /api/categories
#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "Catálogo",
    request_body = CreateCategoryPayload,
    responses(
        (status = 201, description = "Categoria criada", body = Category),
        (status = 409, description = "Nome duplicado na empresa")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create(
    State(app_state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Json(payload): Json<CreateCategoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let category = app_state
        .catalog_service
        .create_category(&session, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}

// PUT /api/categories/{id}
#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    tag = "Catálogo",
    params(("id" = Uuid, Path, description = "ID da categoria")),
    request_body = UpdateCategoryPayload,
    responses(
        (status = 200, description = "Categoria atualizada", body = Category),
        (status = 404, description = "Categoria não encontrada")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update(
    State(app_state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCategoryPayload>,
) -> Result<Json<Category>, AppError> {
    payload.validate()?;

    let category = app_state
        .catalog_service
        .update_category(&session, id, &payload)
        .await?;
    Ok(Json(category))
}

// DELETE /api/categories/{id}  (soft delete)
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    tag = "Catálogo",
    params(("id" = Uuid, Path, description = "ID da categoria")),
    responses(
        (status = 200, description = "Categoria desativada", body = Category),
        (status = 404, description = "Categoria não encontrada")
    ),
    security(("bearer_auth" = []))
)]
pub async fn deactivate(
    State(app_state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Category>, AppError> {
    let category = app_state
        .catalog_service
        .deactivate_category(&session, id)
        .await?;
    Ok(Json(category))
}
