// src/services/audit.rs

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::AuditRepository,
    models::audit::{AuditAction, AuditEntry, AuditLog},
};

pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 200;

#[derive(Clone)]
pub struct AuditService {
    repo: AuditRepository,
}

impl AuditService {
    pub fn new(repo: AuditRepository) -> Self {
        Self { repo }
    }

    /// Grava uma linha de auditoria em melhor esforço. A operação de
    /// negócio já foi concluída; falha aqui vai para o log operacional
    /// e nunca se propaga ao chamador.
    pub async fn record(&self, entry: AuditEntry) {
        if let Err(e) = self.repo.insert(&entry).await {
            tracing::warn!(
                entity_type = entry.entity_type,
                entity_id = %entry.entity_id,
                "Falha ao gravar auditoria (ignorada): {:?}",
                e
            );
        }
    }

    pub async fn list(
        &self,
        scope: Option<Uuid>,
        page: Option<i64>,
        limit: Option<i64>,
        entity_type: Option<&str>,
        entity_id: Option<&str>,
    ) -> Result<Vec<AuditLog>, AppError> {
        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        self.repo.list(scope, page, limit, entity_type, entity_id).await
    }
}

/// Snapshot opaco de uma entidade para old_values/new_values.
pub fn snapshot<T: Serialize>(value: &T) -> Option<Value> {
    serde_json::to_value(value).ok()
}

/// Atalho para montar a entrada de auditoria nos serviços de entidade.
#[allow(clippy::too_many_arguments)]
pub fn entry(
    company_id: Uuid,
    user_id: Option<Uuid>,
    entity_type: &'static str,
    entity_id: Uuid,
    action: AuditAction,
    old_values: Option<Value>,
    new_values: Option<Value>,
) -> AuditEntry {
    AuditEntry {
        company_id,
        user_id,
        entity_type,
        entity_id: entity_id.to_string(),
        action,
        old_values,
        new_values,
    }
}
