// src/services/company_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CompanyRepository,
    models::{
        audit::AuditAction,
        auth::Session,
        company::{Company, CreateCompanyPayload, UpdateCompanyPayload},
    },
    services::{
        audit::{self, AuditService},
        policy::{self, Resource, ResourceAction},
        storage::FileStore,
    },
};

#[derive(Clone)]
pub struct CompanyService {
    repo: CompanyRepository,
    audit: AuditService,
    pool: sqlx::PgPool,
}

impl CompanyService {
    pub fn new(repo: CompanyRepository, audit: AuditService, pool: sqlx::PgPool) -> Self {
        Self { repo, audit, pool }
    }

    pub async fn list(&self, session: &Session) -> Result<Vec<Company>, AppError> {
        policy::require(session, Resource::Companies, ResourceAction::Read)?;
        self.repo.list(policy::company_filter(session)).await
    }

    pub async fn get(&self, session: &Session, id: Uuid) -> Result<Company, AppError> {
        policy::require(session, Resource::Companies, ResourceAction::Read)?;
        self.repo
            .find_by_id(policy::company_filter(session), id)
            .await?
            .ok_or(AppError::NotFound("Empresa"))
    }

    /// Criação por um papel de plataforma (o cadastro self-service passa
    /// por AuthService::signup).
    pub async fn create(
        &self,
        session: &Session,
        payload: &CreateCompanyPayload,
    ) -> Result<Company, AppError> {
        policy::require(session, Resource::Companies, ResourceAction::Create)?;

        if self.repo.slug_exists(&payload.slug).await? {
            return Err(AppError::DuplicateResource(
                "Este slug já está em uso".to_string(),
            ));
        }

        let company = self
            .repo
            .create(
                &self.pool,
                &payload.name,
                &payload.slug,
                payload.cnpj.as_deref(),
                payload.email.as_deref(),
                payload.phone.as_deref(),
                payload.address.as_deref(),
                payload.city.as_deref(),
                payload.state.as_deref(),
            )
            .await?;

        self.audit
            .record(audit::entry(
                company.id,
                Some(session.user_id),
                "company",
                company.id,
                AuditAction::Create,
                None,
                audit::snapshot(&company),
            ))
            .await;

        Ok(company)
    }

    pub async fn update(
        &self,
        session: &Session,
        id: Uuid,
        payload: &UpdateCompanyPayload,
    ) -> Result<Company, AppError> {
        policy::require(session, Resource::Companies, ResourceAction::Update)?;

        let existing = self
            .repo
            .find_by_id(policy::company_filter(session), id)
            .await?
            .ok_or(AppError::NotFound("Empresa"))?;

        let updated = self
            .repo
            .update(
                &self.pool,
                id,
                payload.name.as_deref(),
                payload.cnpj.as_deref(),
                payload.email.as_deref(),
                payload.phone.as_deref(),
                payload.address.as_deref(),
                payload.city.as_deref(),
                payload.state.as_deref(),
            )
            .await?;

        self.audit
            .record(audit::entry(
                id,
                Some(session.user_id),
                "company",
                id,
                AuditAction::Update,
                audit::snapshot(&existing),
                audit::snapshot(&updated),
            ))
            .await;

        Ok(updated)
    }

    // Soft delete; a empresa nunca sai do banco.
    pub async fn deactivate(&self, session: &Session, id: Uuid) -> Result<Company, AppError> {
        policy::require(session, Resource::Companies, ResourceAction::Update)?;

        let existing = self
            .repo
            .find_by_id(policy::company_filter(session), id)
            .await?
            .ok_or(AppError::NotFound("Empresa"))?;

        let updated = self.repo.set_active(&self.pool, id, false).await?;

        self.audit
            .record(audit::entry(
                id,
                Some(session.user_id),
                "company",
                id,
                AuditAction::Delete,
                audit::snapshot(&existing),
                audit::snapshot(&updated),
            ))
            .await;

        Ok(updated)
    }

    /// Logo da empresa: chave fixa por empresa, sobrescrita a cada
    /// upload (last-write-wins, ação manual de admin).
    pub async fn upload_logo(
        &self,
        session: &Session,
        id: Uuid,
        bytes: &[u8],
        store: &dyn FileStore,
    ) -> Result<String, AppError> {
        policy::require(session, Resource::Companies, ResourceAction::Update)?;

        let company = self
            .repo
            .find_by_id(None, id)
            .await?
            .ok_or(AppError::NotFound("Empresa"))?;

        if !policy::can_access_company(policy::company_filter(session), company.id) {
            return Err(AppError::NotFound("Empresa"));
        }

        let key = format!("logos/{}.png", company.id);
        let stored_key = store.upload(bytes, &key).await?;
        self.repo.set_logo_path(&self.pool, id, &stored_key).await?;

        self.audit
            .record(audit::entry(
                id,
                Some(session.user_id),
                "company",
                id,
                AuditAction::Update,
                audit::snapshot(&company),
                None,
            ))
            .await;

        Ok(stored_key)
    }
}
