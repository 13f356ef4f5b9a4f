// src/db/catalog_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::catalog::{Category, Product, ProductVariant},
};

#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  CATEGORIAS
    // =========================================================================

    pub async fn list_categories(&self, scope: Option<Uuid>) -> Result<Vec<Category>, AppError> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT * FROM categories
            WHERE ($1::uuid IS NULL OR company_id = $1)
            ORDER BY sort_order ASC, name ASC
            "#,
        )
        .bind(scope)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    pub async fn find_category(
        &self,
        scope: Option<Uuid>,
        id: Uuid,
    ) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT * FROM categories
            WHERE id = $1 AND ($2::uuid IS NULL OR company_id = $2)
            "#,
        )
        .bind(id)
        .bind(scope)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    pub async fn category_name_exists(
        &self,
        company_id: Uuid,
        name: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let row: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT id FROM categories
            WHERE company_id = $1 AND name = $2 AND ($3::uuid IS NULL OR id <> $3)
            "#,
        )
        .bind(company_id)
        .bind(name)
        .bind(exclude_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }

    pub async fn create_category<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        name: &str,
        sort_order: i32,
    ) -> Result<Category, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (company_id, name, sort_order)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(name)
        .bind(sort_order)
        .fetch_one(executor)
        .await?;

        Ok(category)
    }

    pub async fn update_category<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        name: Option<&str>,
        sort_order: Option<i32>,
    ) -> Result<Category, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let category = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories SET
                name = COALESCE($2, name),
                sort_order = COALESCE($3, sort_order)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(sort_order)
        .fetch_one(executor)
        .await?;

        Ok(category)
    }

    pub async fn set_category_active<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        active: bool,
    ) -> Result<Category, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let category = sqlx::query_as::<_, Category>(
            "UPDATE categories SET is_active = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(active)
        .fetch_one(executor)
        .await?;

        Ok(category)
    }

    // =========================================================================
    //  PRODUTOS
    // =========================================================================

    pub async fn list_products(
        &self,
        scope: Option<Uuid>,
        category_id: Option<Uuid>,
    ) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE ($1::uuid IS NULL OR company_id = $1)
              AND ($2::uuid IS NULL OR category_id = $2)
            ORDER BY name ASC
            "#,
        )
        .bind(scope)
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    pub async fn find_product(
        &self,
        scope: Option<Uuid>,
        id: Uuid,
    ) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE id = $1 AND ($2::uuid IS NULL OR company_id = $2)
            "#,
        )
        .bind(id)
        .bind(scope)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    pub async fn sku_exists(
        &self,
        company_id: Uuid,
        sku: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let row: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT id FROM products
            WHERE company_id = $1 AND sku = $2 AND ($3::uuid IS NULL OR id <> $3)
            "#,
        )
        .bind(company_id)
        .bind(sku)
        .bind(exclude_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_product<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        category_id: Uuid,
        name: &str,
        sku: Option<&str>,
        description: Option<&str>,
        base_price: Decimal,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (company_id, category_id, name, sku, description, base_price)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(category_id)
        .bind(name)
        .bind(sku)
        .bind(description)
        .bind(base_price)
        .fetch_one(executor)
        .await?;

        Ok(product)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update_product<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        category_id: Option<Uuid>,
        name: Option<&str>,
        sku: Option<&str>,
        description: Option<&str>,
        base_price: Option<Decimal>,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET
                category_id = COALESCE($2, category_id),
                name = COALESCE($3, name),
                sku = COALESCE($4, sku),
                description = COALESCE($5, description),
                base_price = COALESCE($6, base_price),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(category_id)
        .bind(name)
        .bind(sku)
        .bind(description)
        .bind(base_price)
        .fetch_one(executor)
        .await?;

        Ok(product)
    }

    pub async fn set_product_active<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        active: bool,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            "UPDATE products SET is_active = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(active)
        .fetch_one(executor)
        .await?;

        Ok(product)
    }

    pub async fn set_product_image<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        image_path: &str,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE products SET image_path = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(image_path)
            .execute(executor)
            .await?;

        Ok(())
    }

    // =========================================================================
    //  VARIANTES
    // =========================================================================

    pub async fn list_variants(&self, product_id: Uuid) -> Result<Vec<ProductVariant>, AppError> {
        let variants = sqlx::query_as::<_, ProductVariant>(
            "SELECT * FROM product_variants WHERE product_id = $1 ORDER BY name ASC",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(variants)
    }

    pub async fn find_variant(
        &self,
        scope: Option<Uuid>,
        id: Uuid,
    ) -> Result<Option<ProductVariant>, AppError> {
        let variant = sqlx::query_as::<_, ProductVariant>(
            r#"
            SELECT * FROM product_variants
            WHERE id = $1 AND ($2::uuid IS NULL OR company_id = $2)
            "#,
        )
        .bind(id)
        .bind(scope)
        .fetch_optional(&self.pool)
        .await?;

        Ok(variant)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_variant<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        product_id: Uuid,
        name: &str,
        volume: Option<&str>,
        price_modifier: Decimal,
        stock_quantity: i32,
    ) -> Result<ProductVariant, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let variant = sqlx::query_as::<_, ProductVariant>(
            r#"
            INSERT INTO product_variants
                (company_id, product_id, name, volume, price_modifier, stock_quantity)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(product_id)
        .bind(name)
        .bind(volume)
        .bind(price_modifier)
        .bind(stock_quantity)
        .fetch_one(executor)
        .await?;

        Ok(variant)
    }

    pub async fn set_variant_active<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        active: bool,
    ) -> Result<ProductVariant, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let variant = sqlx::query_as::<_, ProductVariant>(
            "UPDATE product_variants SET is_active = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(active)
        .fetch_one(executor)
        .await?;

        Ok(variant)
    }

    // =========================================================================
    //  CARDÁPIO PÚBLICO
    // =========================================================================
    //
    // Busca as linhas cruas da empresa; a montagem (e o filtro de
    // inativos em cada nível) acontece em catalog_service::assemble_menu.

    pub async fn categories_for_company(&self, company_id: Uuid) -> Result<Vec<Category>, AppError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE company_id = $1 ORDER BY sort_order ASC, name ASC",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    pub async fn products_for_company(&self, company_id: Uuid) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE company_id = $1 ORDER BY name ASC",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    pub async fn variants_for_company(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<ProductVariant>, AppError> {
        let variants = sqlx::query_as::<_, ProductVariant>(
            "SELECT * FROM product_variants WHERE company_id = $1 ORDER BY name ASC",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(variants)
    }
}
