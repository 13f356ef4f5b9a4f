// src/handlers/customers.rs

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
    models::customer::{
        CreateCustomerPayload, Customer, ResetPasswordPayload, UpdateCustomerPayload,
    },
};

// GET /api/customers
#[utoipa::path(
    get,
    path = "/api/customers",
    tag = "Clientes",
    responses(
        (status = 200, description = "Clientes do tenant", body = Vec<Customer>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list(
    State(app_state): State<AppState>,
    CurrentUser(session): CurrentUser,
) -> Result<Json<Vec<Customer>>, AppError> {
    let customers = app_state.customer_service.list(&session).await?;
    Ok(Json(customers))
}

// POST /api/customers
#[utoipa::path(
    post,
    path = "/api/customers",
    tag = "Clientes",
    request_body = CreateCustomerPayload,
    responses(
        (status = 201, description = "Cliente criado", body = Customer),
        (status = 409, description = "E-mail ou CNPJ/CPF duplicado na empresa")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create(
    State(app_state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Json(payload): Json<CreateCustomerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let customer = app_state
        .customer_service
        .create(&session, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

// PUT /api/customers/{id}
#[utoipa::path(
    put,
    path = "/api/customers/{id}",
    tag = "Clientes",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    request_body = UpdateCustomerPayload,
    responses(
        (status = 200, description = "Cliente atualizado", body = Customer),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update(
    State(app_state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCustomerPayload>,
) -> Result<Json<Customer>, AppError> {
    payload.validate()?;

    let customer = app_state
        .customer_service
        .update(&session, id, &payload)
        .await?;
    Ok(Json(customer))
}

// DELETE /api/customers/{id}  (soft delete)
#[utoipa::path(
    delete,
    path = "/api/customers/{id}",
    tag = "Clientes",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente desativado", body = Customer),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("bearer_auth" = []))
)]
pub async fn deactivate(
    State(app_state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Customer>, AppError> {
    let customer = app_state.customer_service.deactivate(&session, id).await?;
    Ok(Json(customer))
}

// POST /api/customers/{id}/reset-password
#[utoipa::path(
    post,
    path = "/api/customers/{id}/reset-password",
    tag = "Clientes",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    request_body = ResetPasswordPayload,
    responses(
        (status = 204, description = "Senha redefinida"),
        (status = 403, description = "Papel sem permissão"),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("bearer_auth" = []))
)]
pub async fn reset_password(
    State(app_state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ResetPasswordPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    app_state
        .customer_service
        .reset_password(&session, id, &payload.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
