// src/services/customer_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CompanyRepository, CustomerRepository},
    models::{
        audit::AuditAction,
        auth::{Role, Session},
        customer::{
            CreateCustomerPayload, Customer, CustomerLoginPayload, RegisterCustomerPayload,
            UpdateCustomerPayload,
        },
    },
    services::{
        audit::{self, AuditService},
        auth::{hash_password, verify_password},
        policy::{self, Resource, ResourceAction},
    },
};

#[derive(Clone)]
pub struct CustomerService {
    repo: CustomerRepository,
    company_repo: CompanyRepository,
    audit: AuditService,
    bcrypt_cost: u32,
    pool: sqlx::PgPool,
}

impl CustomerService {
    pub fn new(
        repo: CustomerRepository,
        company_repo: CompanyRepository,
        audit: AuditService,
        bcrypt_cost: u32,
        pool: sqlx::PgPool,
    ) -> Self {
        Self {
            repo,
            company_repo,
            audit,
            bcrypt_cost,
            pool,
        }
    }

    async fn check_uniqueness(
        &self,
        company_id: Uuid,
        email: Option<&str>,
        cnpj_cpf: Option<&str>,
        exclude_id: Option<Uuid>,
    ) -> Result<(), AppError> {
        if let Some(email) = email {
            if self.repo.email_exists(company_id, email, exclude_id).await? {
                return Err(AppError::DuplicateResource(
                    "Já existe um cliente com este e-mail".to_string(),
                ));
            }
        }
        if let Some(cnpj_cpf) = cnpj_cpf {
            if self
                .repo
                .cnpj_cpf_exists(company_id, cnpj_cpf, exclude_id)
                .await?
            {
                return Err(AppError::DuplicateResource(
                    "Já existe um cliente com este CNPJ/CPF".to_string(),
                ));
            }
        }
        Ok(())
    }

    // =========================================================================
    //  PAINEL (staff)
    // =========================================================================

    pub async fn list(&self, session: &Session) -> Result<Vec<Customer>, AppError> {
        policy::require(session, Resource::Customers, ResourceAction::Read)?;
        self.repo.list(policy::company_filter(session)).await
    }

    pub async fn create(
        &self,
        session: &Session,
        payload: &CreateCustomerPayload,
    ) -> Result<Customer, AppError> {
        policy::require(session, Resource::Customers, ResourceAction::Create)?;
        let company_id = policy::company_id_for_create(session, payload.company_id)?;

        self.check_uniqueness(
            company_id,
            payload.email.as_deref(),
            payload.cnpj_cpf.as_deref(),
            None,
        )
        .await?;

        let customer = self
            .repo
            .create(
                &self.pool,
                company_id,
                &payload.name,
                payload.email.as_deref(),
                payload.cnpj_cpf.as_deref(),
                payload.phone.as_deref(),
                payload.address.as_deref(),
                None,
            )
            .await?;

        self.audit
            .record(audit::entry(
                company_id,
                Some(session.user_id),
                "customer",
                customer.id,
                AuditAction::Create,
                None,
                audit::snapshot(&customer),
            ))
            .await;

        Ok(customer)
    }

    pub async fn update(
        &self,
        session: &Session,
        id: Uuid,
        payload: &UpdateCustomerPayload,
    ) -> Result<Customer, AppError> {
        policy::require(session, Resource::Customers, ResourceAction::Update)?;

        let existing = self
            .repo
            .find_by_id(policy::company_filter(session), id)
            .await?
            .ok_or(AppError::NotFound("Cliente"))?;

        self.check_uniqueness(
            existing.company_id,
            payload.email.as_deref(),
            payload.cnpj_cpf.as_deref(),
            Some(id),
        )
        .await?;

        let updated = self
            .repo
            .update(
                &self.pool,
                id,
                payload.name.as_deref(),
                payload.email.as_deref(),
                payload.cnpj_cpf.as_deref(),
                payload.phone.as_deref(),
                payload.address.as_deref(),
            )
            .await?;

        self.audit
            .record(audit::entry(
                existing.company_id,
                Some(session.user_id),
                "customer",
                id,
                AuditAction::Update,
                audit::snapshot(&existing),
                audit::snapshot(&updated),
            ))
            .await;

        Ok(updated)
    }

    // Soft delete: exigido por design, pedidos históricos referenciam
    // o cliente e nunca podem perder a referência.
    pub async fn deactivate(&self, session: &Session, id: Uuid) -> Result<Customer, AppError> {
        policy::require(session, Resource::Customers, ResourceAction::Update)?;

        let existing = self
            .repo
            .find_by_id(policy::company_filter(session), id)
            .await?
            .ok_or(AppError::NotFound("Cliente"))?;

        let updated = self.repo.set_active(&self.pool, id, false).await?;

        self.audit
            .record(audit::entry(
                existing.company_id,
                Some(session.user_id),
                "customer",
                id,
                AuditAction::Delete,
                audit::snapshot(&existing),
                audit::snapshot(&updated),
            ))
            .await;

        Ok(updated)
    }

    /// Reset de senha por staff: restrito ao dono do tenant
    /// (MASTER_DIST; ADMINISTRADOR passa implicitamente).
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
            .ok_or(AppError::NotFound("Cliente"))?;

        let hashed = hash_password(new_password.to_owned(), self.bcrypt_cost).await?;
        self.repo.set_password(&self.pool, id, &hashed).await?;

        self.audit
            .record(audit::entry(
                existing.company_id,
                Some(session.user_id),
                "customer",
                id,
                AuditAction::Update,
                None,
                None,
            ))
            .await;

        Ok(())
    }

    // =========================================================================
    //  STOREFRONT PÚBLICO
    // =========================================================================

    async fn active_company_by_slug(&self, slug: &str) -> Result<Uuid, AppError> {
        let company = self
            .company_repo
            .find_by_slug(slug)
            .await?
            .filter(|c| c.is_active)
            .ok_or(AppError::NotFound("Loja"))?;
        Ok(company.id)
    }

    /// Auto-registro pelo storefront.
    pub async fn register(
        &self,
        slug: &str,
        payload: &RegisterCustomerPayload,
    ) -> Result<Customer, AppError> {
        let company_id = self.active_company_by_slug(slug).await?;

        self.check_uniqueness(
            company_id,
            payload.email.as_deref(),
            payload.cnpj_cpf.as_deref(),
            None,
        )
        .await?;

        let hashed = hash_password(payload.password.clone(), self.bcrypt_cost).await?;

        let customer = self
            .repo
            .create(
                &self.pool,
                company_id,
                &payload.name,
                payload.email.as_deref(),
                payload.cnpj_cpf.as_deref(),
                payload.phone.as_deref(),
                payload.address.as_deref(),
                Some(&hashed),
            )
            .await?;

        self.audit
            .record(audit::entry(
                company_id,
                None,
                "customer",
                customer.id,
                AuditAction::Create,
                None,
                audit::snapshot(&customer),
            ))
            .await;

        Ok(customer)
    }

    /// Login do cliente no storefront. Escolha deliberada de UX:
    /// "não cadastrado nesta loja" (404, convida ao cadastro) é
    /// distinto de "senha errada" (401).
    pub async fn login(
        &self,
        slug: &str,
        payload: &CustomerLoginPayload,
    ) -> Result<Customer, AppError> {
        let company_id = self.active_company_by_slug(slug).await?;

        let customer = self
            .repo
            .find_by_email(company_id, &payload.email)
            .await?
            .filter(|c| c.is_active)
            .ok_or(AppError::CustomerNotRegistered)?;

        let password_hash = customer
            .password_hash
            .clone()
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(payload.password.clone(), password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        Ok(customer)
    }
}
