// src/handlers/public.rs
//
// Storefront público: tudo aqui é preso à loja do {slug} da URL, sem
// autenticação de staff. Loja desativada responde 404 em todas as rotas.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        catalog::Menu,
        company::CompanyPublicProfile,
        customer::{Customer, CustomerLoginPayload, RegisterCustomerPayload},
        order::{CreateOrderPayload, OrderWithItems},
    },
};

// GET /api/public/{slug}/profile
#[utoipa::path(
    get,
    path = "/api/public/{slug}/profile",
    tag = "Storefront",
    params(("slug" = String, Path, description = "Slug da loja")),
    responses(
        (status = 200, description = "Perfil público da loja", body = CompanyPublicProfile),
        (status = 404, description = "Loja não encontrada ou desativada")
    )
)]
pub async fn profile(
    State(app_state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<CompanyPublicProfile>, AppError> {
    let profile = app_state.catalog_service.public_profile(&slug).await?;
    Ok(Json(profile))
}

// GET /api/public/{slug}/menu
#[utoipa::path(
    get,
    path = "/api/public/{slug}/menu",
    tag = "Storefront",
    params(("slug" = String, Path, description = "Slug da loja")),
    responses(
        (status = 200, description = "Cardápio com categorias, produtos e variantes ativos", body = Menu),
        (status = 404, description = "Loja não encontrada ou desativada")
    )
)]
pub async fn menu(
    State(app_state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Menu>, AppError> {
    let menu = app_state.catalog_service.public_menu(&slug).await?;
    Ok(Json(menu))
}

// POST /api/public/{slug}/customers/register
#[utoipa::path(
    post,
    path = "/api/public/{slug}/customers/register",
    tag = "Storefront",
    params(("slug" = String, Path, description = "Slug da loja")),
    request_body = RegisterCustomerPayload,
    responses(
        (status = 201, description = "Cliente registrado", body = Customer),
        (status = 404, description = "Loja não encontrada ou desativada"),
        (status = 409, description = "E-mail ou CNPJ/CPF já registrado nesta loja")
    )
)]
pub async fn register_customer(
    State(app_state): State<AppState>,
    Path(slug): Path<String>,
    Json(payload): Json<RegisterCustomerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let customer = app_state.customer_service.register(&slug, &payload).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

// POST /api/public/{slug}/customers/login
#[utoipa::path(
    post,
    path = "/api/public/{slug}/customers/login",
    tag = "Storefront",
    params(("slug" = String, Path, description = "Slug da loja")),
    request_body = CustomerLoginPayload,
    responses(
        (status = 200, description = "Cliente autenticado", body = Customer),
        (status = 401, description = "Senha incorreta"),
        (status = 404, description = "E-mail não cadastrado nesta loja")
    )
)]
pub async fn login_customer(
    State(app_state): State<AppState>,
    Path(slug): Path<String>,
    Json(payload): Json<CustomerLoginPayload>,
) -> Result<Json<Customer>, AppError> {
    payload.validate()?;

    let customer = app_state.customer_service.login(&slug, &payload).await?;
    Ok(Json(customer))
}

// POST /api/public/{slug}/orders
#[utoipa::path(
    post,
    path = "/api/public/{slug}/orders",
    tag = "Storefront",
    params(("slug" = String, Path, description = "Slug da loja")),
    request_body = CreateOrderPayload,
    responses(
        (status = 201, description = "Pedido criado", body = OrderWithItems),
        (status = 404, description = "Loja ou item do catálogo indisponível")
    )
)]
pub async fn checkout(
    State(app_state): State<AppState>,
    Path(slug): Path<String>,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let order = app_state.order_service.checkout(&slug, &payload).await?;
    Ok((StatusCode::CREATED, Json(order)))
}
