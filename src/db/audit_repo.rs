// src/db/audit_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::audit::{AuditEntry, AuditLog},
};

#[derive(Clone)]
pub struct AuditRepository {
    pool: PgPool,
}

impl AuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Único caminho de escrita da tabela; não existe update nem delete.
    pub async fn insert(&self, entry: &AuditEntry) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO audit_logs
                (company_id, user_id, entity_type, entity_id, action, old_values, new_values)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(entry.company_id)
        .bind(entry.user_id)
        .bind(entry.entity_type)
        .bind(&entry.entity_id)
        .bind(entry.action)
        .bind(&entry.old_values)
        .bind(&entry.new_values)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // Paginado, mais recentes primeiro. scope = None lista entre tenants
    // (o chamador já deve ter autorizado isso).
    pub async fn list(
        &self,
        scope: Option<Uuid>,
        page: i64,
        limit: i64,
        entity_type: Option<&str>,
        entity_id: Option<&str>,
    ) -> Result<Vec<AuditLog>, AppError> {
        let offset = (page.max(1) - 1) * limit;

        let logs = sqlx::query_as::<_, AuditLog>(
            r#"
            SELECT * FROM audit_logs
            WHERE ($1::uuid IS NULL OR company_id = $1)
              AND ($2::text IS NULL OR entity_type = $2)
              AND ($3::text IS NULL OR entity_id = $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(scope)
        .bind(entity_type)
        .bind(entity_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }
}
