// src/db/report_repo.rs

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::report::{ItemRow, OrderRow},
};

// Busca as linhas cruas para os relatórios; toda a agregação acontece
// em report_service, como dobras puras sobre os vetores retornados.
#[derive(Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn fetch_orders(
        &self,
        scope: Option<Uuid>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<OrderRow>, AppError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, status, payment_method, delivery_type, total_amount, created_at
            FROM orders
            WHERE ($1::uuid IS NULL OR company_id = $1)
              AND ($2::date IS NULL OR created_at >= $2::timestamptz)
              AND ($3::date IS NULL OR created_at < ($3 + 1)::timestamptz)
            ORDER BY created_at ASC
            "#,
        )
        .bind(scope)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn fetch_items(
        &self,
        scope: Option<Uuid>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<ItemRow>, AppError> {
        let rows = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT
                oi.product_id,
                oi.product_name,
                c.name AS category_name,
                oi.quantity,
                oi.total_price,
                o.status AS order_status
            FROM order_items oi
            JOIN orders o ON oi.order_id = o.id
            JOIN products p ON oi.product_id = p.id
            JOIN categories c ON p.category_id = c.id
            WHERE ($1::uuid IS NULL OR o.company_id = $1)
              AND ($2::date IS NULL OR o.created_at >= $2::timestamptz)
              AND ($3::date IS NULL OR o.created_at < ($3 + 1)::timestamptz)
            "#,
        )
        .bind(scope)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
