// src/services/user_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::{
        audit::AuditAction,
        auth::{CreateUserPayload, Role, Session, User},
    },
    services::{
        audit::{self, AuditService},
        auth::hash_password,
        policy::{self, Resource, ResourceAction},
    },
};

#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
    audit: AuditService,
    bcrypt_cost: u32,
    pool: sqlx::PgPool,
}

impl UserService {
    pub fn new(repo: UserRepository, audit: AuditService, bcrypt_cost: u32, pool: sqlx::PgPool) -> Self {
        Self {
            repo,
            audit,
            bcrypt_cost,
            pool,
        }
    }

    pub async fn list(&self, session: &Session) -> Result<Vec<User>, AppError> {
        policy::require(session, Resource::Users, ResourceAction::Read)?;
        self.repo.list(policy::company_filter(session)).await
    }

    /// Criação de staff. Papéis de plataforma (sem empresa) só podem
    /// ser criados por quem administra a plataforma.
    pub async fn create(
        &self,
        session: &Session,
        payload: &CreateUserPayload,
    ) -> Result<User, AppError> {
        let company_id = if payload.role.is_platform_wide() {
            policy::require(session, Resource::Administrators, ResourceAction::Create)?;
            None
        } else {
            policy::require(session, Resource::Users, ResourceAction::Create)?;
            Some(policy::company_id_for_create(session, payload.company_id)?)
        };

        if self.repo.email_exists(&payload.email).await? {
            return Err(AppError::DuplicateResource(
                "Este e-mail já está em uso".to_string(),
            ));
        }

        let hashed = hash_password(payload.password.clone(), self.bcrypt_cost).await?;

        let user = self
            .repo
            .create(
                &self.pool,
                company_id,
                &payload.name,
                &payload.email,
                &hashed,
                payload.role,
            )
            .await?;

        if let Some(company_id) = company_id {
            self.audit
                .record(audit::entry(
                    company_id,
                    Some(session.user_id),
                    "user",
                    user.id,
                    AuditAction::Create,
                    None,
                    audit::snapshot(&user),
                ))
                .await;
        }

        Ok(user)
    }

    pub async fn deactivate(&self, session: &Session, id: Uuid) -> Result<User, AppError> {
        policy::require(session, Resource::Users, ResourceAction::Update)?;

        let existing = self
            .repo
            .find_by_id(policy::company_filter(session), id)
            .await?
            .ok_or(AppError::NotFound("Usuário"))?;

        let updated = self.repo.set_active(&self.pool, id, false).await?;

        if let Some(company_id) = existing.company_id {
            self.audit
                .record(audit::entry(
                    company_id,
                    Some(session.user_id),
                    "user",
                    id,
                    AuditAction::Delete,
                    audit::snapshot(&existing),
                    audit::snapshot(&updated),
                ))
                .await;
        }

        Ok(updated)
    }

    /// Reset de senha de outro usuário: restrito ao dono do tenant.
    pub async fn reset_password(
        &self,
        session: &Session,
        id: Uuid,
        new_password: &str,
    ) -> Result<(), AppError> {
        if !policy::has_permission(session.role, &[Role::MasterDist]) {
            return Err(AppError::Forbidden);
        }

        let existing = self
            .repo
            .find_by_id(policy::company_filter(session), id)
            .await?
            .ok_or(AppError::NotFound("Usuário"))?;

        let hashed = hash_password(new_password.to_owned(), self.bcrypt_cost).await?;
        self.repo.set_password(&self.pool, id, &hashed).await?;

        if let Some(company_id) = existing.company_id {
            self.audit
                .record(audit::entry(
                    company_id,
                    Some(session.user_id),
                    "user",
                    id,
                    AuditAction::Update,
                    None,
                    None,
                ))
                .await;
        }

        Ok(())
    }
}
