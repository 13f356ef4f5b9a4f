// src/services/finance_service.rs

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::FinanceRepository,
    models::{
        audit::AuditAction,
        auth::Session,
        finance::{CreateEntryPayload, EntryKind, EntryStatus, FinancialEntry},
        order::PaymentMethod,
    },
    services::{
        audit::{self, AuditService},
        policy::{self, Resource, ResourceAction},
    },
};

#[derive(Clone)]
pub struct FinanceService {
    repo: FinanceRepository,
    audit: AuditService,
    pool: sqlx::PgPool,
}

impl FinanceService {
    pub fn new(repo: FinanceRepository, audit: AuditService, pool: sqlx::PgPool) -> Self {
        Self { repo, audit, pool }
    }

    /// Cria a RECEITA espelho de um pedido. Recebe o executor para
    /// participar da transação do pedido: os dois registros nascem
    /// juntos ou nenhum nasce.
    pub async fn create_receivable_for_order<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        order_id: Uuid,
        amount: Decimal,
        payment_method: PaymentMethod,
    ) -> Result<FinancialEntry, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let description = format!("Venda Pedido {}", short_id(order_id));
        let due_date = Utc::now().date_naive(); // vence hoje

        self.repo
            .insert_entry(
                executor,
                company_id,
                Some(order_id),
                EntryKind::Receita,
                amount,
                &description,
                Some(payment_method),
                due_date,
            )
            .await
    }

    pub async fn list(
        &self,
        session: &Session,
        status: Option<EntryStatus>,
    ) -> Result<Vec<FinancialEntry>, AppError> {
        policy::require(session, Resource::Financials, ResourceAction::Read)?;
        self.repo.list(policy::company_filter(session), status).await
    }

    /// Lançamento manual (despesa ou receita avulsa).
    pub async fn create(
        &self,
        session: &Session,
        payload: &CreateEntryPayload,
    ) -> Result<FinancialEntry, AppError> {
        policy::require(session, Resource::Financials, ResourceAction::Create)?;
        let company_id = policy::company_id_for_create(session, payload.company_id)?;

        let entry = self
            .repo
            .insert_entry(
                &self.pool,
                company_id,
                None,
                payload.kind,
                payload.amount,
                &payload.description,
                payload.payment_method,
                payload.due_date,
            )
            .await?;

        self.audit
            .record(audit::entry(
                company_id,
                Some(session.user_id),
                "financial_entry",
                entry.id,
                AuditAction::Create,
                None,
                audit::snapshot(&entry),
            ))
            .await;

        Ok(entry)
    }

    pub async fn update_status(
        &self,
        session: &Session,
        id: Uuid,
        status: EntryStatus,
    ) -> Result<FinancialEntry, AppError> {
        policy::require(session, Resource::Financials, ResourceAction::Update)?;

        let existing = self
            .repo
            .find_by_id(policy::company_filter(session), id)
            .await?
            .ok_or(AppError::NotFound("Lançamento"))?;

        let updated = self.repo.update_status(&self.pool, id, status).await?;

        self.audit
            .record(audit::entry(
                existing.company_id,
                Some(session.user_id),
                "financial_entry",
                id,
                AuditAction::Update,
                audit::snapshot(&existing),
                audit::snapshot(&updated),
            ))
            .await;

        Ok(updated)
    }
}

fn short_id(id: Uuid) -> String {
    id.to_string().chars().take(8).collect()
}
