// src/db/customer_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::customer::Customer};

#[derive(Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, scope: Option<Uuid>) -> Result<Vec<Customer>, AppError> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT * FROM customers
            WHERE ($1::uuid IS NULL OR company_id = $1)
            ORDER BY name ASC
            "#,
        )
        .bind(scope)
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    pub async fn find_by_id(
        &self,
        scope: Option<Uuid>,
        id: Uuid,
    ) -> Result<Option<Customer>, AppError> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT * FROM customers
            WHERE id = $1 AND ($2::uuid IS NULL OR company_id = $2)
            "#,
        )
        .bind(id)
        .bind(scope)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    // Login do storefront: busca sempre presa à empresa do slug.
    pub async fn find_by_email(
        &self,
        company_id: Uuid,
        email: &str,
    ) -> Result<Option<Customer>, AppError> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT * FROM customers WHERE company_id = $1 AND email = $2",
        )
        .bind(company_id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    // Pré-checks de unicidade por empresa. A constraint UNIQUE
    // (company_id, email) / (company_id, cnpj_cpf) é a garantia real.
    pub async fn email_exists(
        &self,
        company_id: Uuid,
        email: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let row: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT id FROM customers
            WHERE company_id = $1 AND email = $2 AND ($3::uuid IS NULL OR id <> $3)
            "#,
        )
        .bind(company_id)
        .bind(email)
        .bind(exclude_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }

    pub async fn cnpj_cpf_exists(
        &self,
        company_id: Uuid,
        cnpj_cpf: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let row: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT id FROM customers
            WHERE company_id = $1 AND cnpj_cpf = $2 AND ($3::uuid IS NULL OR id <> $3)
            "#,
        )
        .bind(company_id)
        .bind(cnpj_cpf)
        .bind(exclude_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        name: &str,
        email: Option<&str>,
        cnpj_cpf: Option<&str>,
        phone: Option<&str>,
        address: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (company_id, name, email, cnpj_cpf, phone, address, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(name)
        .bind(email)
        .bind(cnpj_cpf)
        .bind(phone)
        .bind(address)
        .bind(password_hash)
        .fetch_one(executor)
        .await?;

        Ok(customer)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
        cnpj_cpf: Option<&str>,
        phone: Option<&str>,
        address: Option<&str>,
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                cnpj_cpf = COALESCE($4, cnpj_cpf),
                phone = COALESCE($5, phone),
                address = COALESCE($6, address),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(cnpj_cpf)
        .bind(phone)
        .bind(address)
        .fetch_one(executor)
        .await?;

        Ok(customer)
    }

    // Soft delete: pedidos históricos continuam referenciando o cliente.
    pub async fn set_active<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        active: bool,
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customer = sqlx::query_as::<_, Customer>(
            "UPDATE customers SET is_active = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(active)
        .fetch_one(executor)
        .await?;

        Ok(customer)
    }

    pub async fn set_password<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        password_hash: &str,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE customers SET password_hash = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(executor)
            .await?;

        Ok(())
    }
}
