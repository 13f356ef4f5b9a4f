// src/handlers/reports.rs

use axum::{Json, extract::{Query, State}};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::CurrentUser,
    models::report::{ProductReport, ReportQuery, SalesReport},
};

// GET /api/reports/sales
#[utoipa::path(
    get,
    path = "/api/reports/sales",
    tag = "Relatórios",
    params(ReportQuery),
    responses(
        (status = 200, description = "Resumo de vendas, série diária e quebras", body = SalesReport),
        (status = 403, description = "Papel sem acesso a relatórios")
    ),
    security(("bearer_auth" = []))
)]
pub async fn sales(
    State(app_state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Query(query): Query<ReportQuery>,
) -> Result<Json<SalesReport>, AppError> {
    let report = app_state.report_service.sales_report(&session, &query).await?;
    Ok(Json(report))
}

// GET /api/reports/products
#[utoipa::path(
    get,
    path = "/api/reports/products",
    tag = "Relatórios",
    params(ReportQuery),
    responses(
        (status = 200, description = "Ranking de produtos e receita por categoria", body = ProductReport),
        (status = 403, description = "Papel sem acesso a relatórios")
    ),
    security(("bearer_auth" = []))
)]
pub async fn products(
    State(app_state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ProductReport>, AppError> {
    let report = app_state
        .report_service
        .product_report(&session, &query)
        .await?;
    Ok(Json(report))
}
