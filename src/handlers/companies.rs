// src/handlers/companies.rs

use axum::{
    Json,
    body::Bytes,
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
    models::company::{Company, CreateCompanyPayload, UpdateCompanyPayload},
};

// GET /api/companies
#[utoipa::path(
    get,
    path = "/api/companies",
    tag = "Empresas",
    responses(
        (status = 200, description = "Lista de empresas visíveis ao papel", body = Vec<Company>),
        (status = 403, description = "Papel sem acesso à seção")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list(
    State(app_state): State<AppState>,
    CurrentUser(session): CurrentUser,
) -> Result<Json<Vec<Company>>, AppError> {
    let companies = app_state.company_service.list(&session).await?;
    Ok(Json(companies))
}

// GET /api/companies/{id}
#[utoipa::path(
    get,
    path = "/api/companies/{id}",
    tag = "Empresas",
    params(("id" = Uuid, Path, description = "ID da empresa")),
    responses(
        (status = 200, description = "Empresa", body = Company),
        (status = 404, description = "Empresa não encontrada (ou fora do tenant)")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get(
    State(app_state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Company>, AppError> {
    let company = app_state.company_service.get(&session, id).await?;
    Ok(Json(company))
}

// POST /api/companies
#[utoipa::path(
    post,
    path = "/api/companies",
    tag = "Empresas",
    request_body = CreateCompanyPayload,
    responses(
        (status = 201, description = "Empresa criada", body = Company),
        (status = 409, description = "Slug já em uso")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create(
    State(app_state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Json(payload): Json<CreateCompanyPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let company = app_state.company_service.create(&session, &payload).await?;
    Ok((StatusCode::CREATED, Json(company)))
}

// PUT /api/companies/{id}
#[utoipa::path(
    put,
    path = "/api/companies/{id}",
    tag = "Empresas",
    params(("id" = Uuid, Path, description = "ID da empresa")),
    request_body = UpdateCompanyPayload,
    responses(
        (status = 200, description = "Empresa atualizada", body = Company),
        (status = 404, description = "Empresa não encontrada")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update(
    State(app_state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCompanyPayload>,
) -> Result<Json<Company>, AppError> {
    payload.validate()?;

    let company = app_state
        .company_service
        .update(&session, id, &payload)
        .await?;
    Ok(Json(company))
}

// DELETE /api/companies/{id}  (soft delete)
#[utoipa::path(
    delete,
    path = "/api/companies/{id}",
    tag = "Empresas",
    params(("id" = Uuid, Path, description = "ID da empresa")),
    responses(
        (status = 200, description = "Empresa desativada", body = Company),
        (status = 404, description = "Empresa não encontrada")
    ),
    security(("bearer_auth" = []))
)]
pub async fn deactivate(
    State(app_state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Company>, AppError> {
    let company = app_state.company_service.deactivate(&session, id).await?;
    Ok(Json(company))
}

// POST /api/companies/{id}/logo
#[utoipa::path(
    post,
    path = "/api/companies/{id}/logo",
    tag = "Empresas",
    params(("id" = Uuid, Path, description = "ID da empresa")),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Logo gravado, retorna a chave do arquivo"),
        (status = 404, description = "Empresa não encontrada")
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_logo(
    State(app_state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, AppError> {
    let key = app_state
        .company_service
        .upload_logo(&session, id, &body, app_state.file_store.as_ref())
        .await?;
    Ok(Json(serde_json::json!({ "path": key })))
}
