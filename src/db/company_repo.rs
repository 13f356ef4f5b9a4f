// src/db/company_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::company::Company};

#[derive(Clone)]
pub struct CompanyRepository {
    pool: PgPool,
}

impl CompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Para empresas, o escopo de tenant restringe à própria empresa:
    // papéis de plataforma (scope = None) enxergam todas.
    pub async fn list(&self, scope: Option<Uuid>) -> Result<Vec<Company>, AppError> {
        let companies = sqlx::query_as::<_, Company>(
            r#"
            SELECT * FROM companies
            WHERE ($1::uuid IS NULL OR id = $1)
            ORDER BY name ASC
            "#,
        )
        .bind(scope)
        .fetch_all(&self.pool)
        .await?;

        Ok(companies)
    }

    pub async fn find_by_id(
        &self,
        scope: Option<Uuid>,
        id: Uuid,
    ) -> Result<Option<Company>, AppError> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            SELECT * FROM companies
            WHERE id = $1 AND ($2::uuid IS NULL OR id = $2)
            "#,
        )
        .bind(id)
        .bind(scope)
        .fetch_optional(&self.pool)
        .await?;

        Ok(company)
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Company>, AppError> {
        let company =
            sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE slug = $1")
                .bind(slug)
                .fetch_optional(&self.pool)
                .await?;

        Ok(company)
    }

    // Pré-check de unicidade; a constraint UNIQUE do banco é a garantia real.
    pub async fn slug_exists(&self, slug: &str) -> Result<bool, AppError> {
        let row: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM companies WHERE slug = $1")
                .bind(slug)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.is_some())
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create<'e, E>(
        &self,
        executor: E,
        name: &str,
        slug: &str,
        cnpj: Option<&str>,
        email: Option<&str>,
        phone: Option<&str>,
        address: Option<&str>,
        city: Option<&str>,
        state: Option<&str>,
    ) -> Result<Company, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let company = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (name, slug, cnpj, email, phone, address, city, state)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(slug)
        .bind(cnpj)
        .bind(email)
        .bind(phone)
        .bind(address)
        .bind(city)
        .bind(state)
        .fetch_one(executor)
        .await?;

        Ok(company)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        name: Option<&str>,
        cnpj: Option<&str>,
        email: Option<&str>,
        phone: Option<&str>,
        address: Option<&str>,
        city: Option<&str>,
        state: Option<&str>,
    ) -> Result<Company, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let company = sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies SET
                name = COALESCE($2, name),
                cnpj = COALESCE($3, cnpj),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                address = COALESCE($6, address),
                city = COALESCE($7, city),
                state = COALESCE($8, state),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(cnpj)
        .bind(email)
        .bind(phone)
        .bind(address)
        .bind(city)
        .bind(state)
        .fetch_one(executor)
        .await?;

        Ok(company)
    }

    // Soft delete: a empresa nunca é removida fisicamente.
    pub async fn set_active<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        active: bool,
    ) -> Result<Company, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let company = sqlx::query_as::<_, Company>(
            "UPDATE companies SET is_active = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(active)
        .fetch_one(executor)
        .await?;

        Ok(company)
    }

    pub async fn set_logo_path<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        logo_path: &str,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE companies SET logo_path = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(logo_path)
            .execute(executor)
            .await?;

        Ok(())
    }
}
