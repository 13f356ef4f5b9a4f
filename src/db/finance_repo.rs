// src/db/finance_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        finance::{EntryKind, EntryStatus, FinancialEntry},
        order::PaymentMethod,
    },
};

#[derive(Clone)]
pub struct FinanceRepository {
    pool: PgPool,
}

impl FinanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        scope: Option<Uuid>,
        status: Option<EntryStatus>,
    ) -> Result<Vec<FinancialEntry>, AppError> {
        let entries = sqlx::query_as::<_, FinancialEntry>(
            r#"
            SELECT * FROM financial_entries
            WHERE ($1::uuid IS NULL OR company_id = $1)
              AND ($2::entry_status IS NULL OR status = $2)
            ORDER BY due_date ASC, created_at DESC
            "#,
        )
        .bind(scope)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    pub async fn find_by_id(
        &self,
        scope: Option<Uuid>,
        id: Uuid,
    ) -> Result<Option<FinancialEntry>, AppError> {
        let entry = sqlx::query_as::<_, FinancialEntry>(
            r#"
            SELECT * FROM financial_entries
            WHERE id = $1 AND ($2::uuid IS NULL OR company_id = $2)
            "#,
        )
        .bind(id)
        .bind(scope)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    // Recebe o executor para participar da mesma transação do pedido:
    // pedido e lançamento nascem juntos ou não nascem.
    #[allow(clippy::too_many_arguments)]
    pub async fn insert_entry<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        order_id: Option<Uuid>,
        kind: EntryKind,
        amount: Decimal,
        description: &str,
        payment_method: Option<PaymentMethod>,
        due_date: NaiveDate,
    ) -> Result<FinancialEntry, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entry = sqlx::query_as::<_, FinancialEntry>(
            r#"
            INSERT INTO financial_entries
                (company_id, order_id, kind, amount, description, payment_method, due_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(order_id)
        .bind(kind)
        .bind(amount)
        .bind(description)
        .bind(payment_method)
        .bind(due_date)
        .fetch_one(executor)
        .await?;

        Ok(entry)
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: EntryStatus,
    ) -> Result<FinancialEntry, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entry = sqlx::query_as::<_, FinancialEntry>(
            "UPDATE financial_entries SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_one(executor)
        .await?;

        Ok(entry)
    }
}
