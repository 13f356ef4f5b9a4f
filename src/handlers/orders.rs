// src/handlers/orders.rs

use axum::{
    Json,
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
    models::order::{
        CreateOrderPayload, Order, OrderStatus, OrderWithItems, UpdateOrderStatusPayload,
    },
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
}

// GET /api/orders
#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "Pedidos",
    params(OrderListQuery),
    responses(
        (status = 200, description = "Pedidos do tenant, mais recentes primeiro", body = Vec<Order>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list(
    State(app_state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<Vec<Order>>, AppError> {
    let orders = app_state.order_service.list(&session, query.status).await?;
    Ok(Json(orders))
}

// GET /api/orders/{id}
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tag = "Pedidos",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Pedido com seus itens", body = OrderWithItems),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get(
    State(app_state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderWithItems>, AppError> {
    let order = app_state.order_service.get(&session, id).await?;
    Ok(Json(order))
}

// POST /api/orders
#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Pedidos",
    request_body = CreateOrderPayload,
    responses(
        (status = 201, description = "Pedido criado com lançamento financeiro", body = OrderWithItems),
        (status = 404, description = "Produto, variante ou cliente não encontrado")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create(
    State(app_state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let order = app_state.order_service.create(&session, &payload).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

// POST /api/orders/{id}/reorder
#[utoipa::path(
    post,
    path = "/api/orders/{id}/reorder",
    tag = "Pedidos",
    params(("id" = Uuid, Path, description = "ID do pedido de origem")),
    responses(
        (status = 201, description = "Novo pedido re-precificado pelo catálogo atual", body = OrderWithItems),
        (status = 404, description = "Pedido de origem ou item do catálogo indisponível")
    ),
    security(("bearer_auth" = []))
)]
pub async fn reorder(
    State(app_state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state.order_service.reorder(&session, id).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

// PUT /api/orders/{id}/status
#[utoipa::path(
    put,
    path = "/api/orders/{id}/status",
    tag = "Pedidos",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    request_body = UpdateOrderStatusPayload,
    responses(
        (status = 200, description = "Status atualizado", body = Order),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_status(
    State(app_state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusPayload>,
) -> Result<Json<Order>, AppError> {
    let order = app_state
        .order_service
        .update_status(&session, id, &payload)
        .await?;
    Ok(Json(order))
}
