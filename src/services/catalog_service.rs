// src/services/catalog_service.rs

use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, CompanyRepository},
    models::{
        audit::AuditAction,
        auth::Session,
        catalog::{
            Category, CreateCategoryPayload, CreateProductPayload, CreateVariantPayload, Menu,
            MenuCategory, MenuProduct, MenuVariant, Product, ProductVariant,
            UpdateCategoryPayload, UpdateProductPayload,
        },
        company::CompanyPublicProfile,
    },
    services::{
        audit::{self, AuditService},
        policy::{self, Resource, ResourceAction},
        storage::FileStore,
    },
};

#[derive(Clone)]
pub struct CatalogService {
    repo: CatalogRepository,
    company_repo: CompanyRepository,
    audit: AuditService,
    pool: sqlx::PgPool,
}

impl CatalogService {
    pub fn new(
        repo: CatalogRepository,
        company_repo: CompanyRepository,
        audit: AuditService,
        pool: sqlx::PgPool,
    ) -> Self {
        Self {
            repo,
            company_repo,
            audit,
            pool,
        }
    }

    // =========================================================================
    //  CATEGORIAS
    // =========================================================================

    pub async fn list_categories(&self, session: &Session) -> Result<Vec<Category>, AppError> {
        policy::require(session, Resource::Categories, ResourceAction::Read)?;
        self.repo.list_categories(policy::company_filter(session)).await
    }

    pub async fn create_category(
        &self,
        session: &Session,
        payload: &CreateCategoryPayload,
    ) -> Result<Category, AppError> {
        policy::require(session, Resource::Categories, ResourceAction::Create)?;
        let company_id = policy::company_id_for_create(session, payload.company_id)?;

        if self
            .repo
            .category_name_exists(company_id, &payload.name, None)
            .await?
        {
            return Err(AppError::DuplicateResource(
                "Já existe uma categoria com este nome".to_string(),
            ));
        }

        let category = self
            .repo
            .create_category(&self.pool, company_id, &payload.name, payload.sort_order)
            .await?;

        self.audit
            .record(audit::entry(
                company_id,
                Some(session.user_id),
                "category",
                category.id,
                AuditAction::Create,
                None,
                audit::snapshot(&category),
            ))
            .await;

        Ok(category)
    }

    pub async fn update_category(
        &self,
        session: &Session,
        id: Uuid,
        payload: &UpdateCategoryPayload,
    ) -> Result<Category, AppError> {
        policy::require(session, Resource::Categories, ResourceAction::Update)?;

        // Busca presa ao tenant: id de outra empresa resulta em NotFound,
        // sem confirmar a existência do registro.
        let existing = self
            .repo
            .find_category(policy::company_filter(session), id)
            .await?
            .ok_or(AppError::NotFound("Categoria"))?;

        if let Some(name) = &payload.name {
            if self
                .repo
                .category_name_exists(existing.company_id, name, Some(id))
                .await?
            {
                return Err(AppError::DuplicateResource(
                    "Já existe uma categoria com este nome".to_string(),
                ));
            }
        }

        let updated = self
            .repo
            .update_category(&self.pool, id, payload.name.as_deref(), payload.sort_order)
            .await?;

        self.audit
            .record(audit::entry(
                existing.company_id,
                Some(session.user_id),
                "category",
                id,
                AuditAction::Update,
                audit::snapshot(&existing),
                audit::snapshot(&updated),
            ))
            .await;

        Ok(updated)
    }

    pub async fn deactivate_category(
        &self,
        session: &Session,
        id: Uuid,
    ) -> Result<Category, AppError> {
        policy::require(session, Resource::Categories, ResourceAction::Update)?;

        let existing = self
            .repo
            .find_category(policy::company_filter(session), id)
            .await?
            .ok_or(AppError::NotFound("Categoria"))?;

        let updated = self.repo.set_category_active(&self.pool, id, false).await?;

        self.audit
            .record(audit::entry(
                existing.company_id,
                Some(session.user_id),
                "category",
                id,
                AuditAction::Delete,
                audit::snapshot(&existing),
                audit::snapshot(&updated),
            ))
            .await;

        Ok(updated)
    }

    // =========================================================================
    //  PRODUTOS
    // =========================================================================

    pub async fn list_products(
        &self,
        session: &Session,
        category_id: Option<Uuid>,
    ) -> Result<Vec<Product>, AppError> {
        policy::require(session, Resource::Products, ResourceAction::Read)?;
        self.repo
            .list_products(policy::company_filter(session), category_id)
            .await
    }

    pub async fn create_product(
        &self,
        session: &Session,
        payload: &CreateProductPayload,
    ) -> Result<Product, AppError> {
        policy::require(session, Resource::Products, ResourceAction::Create)?;
        let company_id = policy::company_id_for_create(session, payload.company_id)?;

        // A categoria precisa pertencer à mesma empresa do produto.
        self.repo
            .find_category(Some(company_id), payload.category_id)
            .await?
            .ok_or(AppError::NotFound("Categoria"))?;

        if let Some(sku) = &payload.sku {
            if self.repo.sku_exists(company_id, sku, None).await? {
                return Err(AppError::DuplicateResource(
                    "Já existe um produto com este SKU".to_string(),
                ));
            }
        }

        let product = self
            .repo
            .create_product(
                &self.pool,
                company_id,
                payload.category_id,
                &payload.name,
                payload.sku.as_deref(),
                payload.description.as_deref(),
                payload.base_price,
            )
            .await?;

        self.audit
            .record(audit::entry(
                company_id,
                Some(session.user_id),
                "product",
                product.id,
                AuditAction::Create,
                None,
                audit::snapshot(&product),
            ))
            .await;

        Ok(product)
    }

    pub async fn update_product(
        &self,
        session: &Session,
        id: Uuid,
        payload: &UpdateProductPayload,
    ) -> Result<Product, AppError> {
        policy::require(session, Resource::Products, ResourceAction::Update)?;

        let existing = self
            .repo
            .find_product(policy::company_filter(session), id)
            .await?
            .ok_or(AppError::NotFound("Produto"))?;

        if let Some(category_id) = payload.category_id {
            self.repo
                .find_category(Some(existing.company_id), category_id)
                .await?
                .ok_or(AppError::NotFound("Categoria"))?;
        }

        if let Some(sku) = &payload.sku {
            if self
                .repo
                .sku_exists(existing.company_id, sku, Some(id))
                .await?
            {
                return Err(AppError::DuplicateResource(
                    "Já existe um produto com este SKU".to_string(),
                ));
            }
        }

        let updated = self
            .repo
            .update_product(
                &self.pool,
                id,
                payload.category_id,
                payload.name.as_deref(),
                payload.sku.as_deref(),
                payload.description.as_deref(),
                payload.base_price,
            )
            .await?;

        self.audit
            .record(audit::entry(
                existing.company_id,
                Some(session.user_id),
                "product",
                id,
                AuditAction::Update,
                audit::snapshot(&existing),
                audit::snapshot(&updated),
            ))
            .await;

        Ok(updated)
    }

    pub async fn deactivate_product(
        &self,
        session: &Session,
        id: Uuid,
    ) -> Result<Product, AppError> {
        policy::require(session, Resource::Products, ResourceAction::Update)?;

        let existing = self
            .repo
            .find_product(policy::company_filter(session), id)
            .await?
            .ok_or(AppError::NotFound("Produto"))?;

        let updated = self.repo.set_product_active(&self.pool, id, false).await?;

        self.audit
            .record(audit::entry(
                existing.company_id,
                Some(session.user_id),
                "product",
                id,
                AuditAction::Delete,
                audit::snapshot(&existing),
                audit::snapshot(&updated),
            ))
            .await;

        Ok(updated)
    }

    /// Upload de imagem para um produto existente. A autorização usa
    /// can_access_company sobre a empresa do próprio produto.
    pub async fn upload_product_image(
        &self,
        session: &Session,
        id: Uuid,
        bytes: &[u8],
        store: &dyn FileStore,
    ) -> Result<String, AppError> {
        policy::require(session, Resource::Products, ResourceAction::Update)?;

        let product = self
            .repo
            .find_product(None, id)
            .await?
            .ok_or(AppError::NotFound("Produto"))?;

        if !policy::can_access_company(policy::company_filter(session), product.company_id) {
            // Papel preso a outro tenant não confirma a existência do produto.
            return Err(AppError::NotFound("Produto"));
        }

        let key = format!("produtos/{}/imagem.png", product.id);
        let stored_key = store.upload(bytes, &key).await?;
        self.repo.set_product_image(&self.pool, id, &stored_key).await?;

        self.audit
            .record(audit::entry(
                product.company_id,
                Some(session.user_id),
                "product",
                id,
                AuditAction::Update,
                audit::snapshot(&product),
                None,
            ))
            .await;

        Ok(stored_key)
    }

    // =========================================================================
    //  VARIANTES
    // =========================================================================

    pub async fn list_variants(
        &self,
        session: &Session,
        product_id: Uuid,
    ) -> Result<Vec<ProductVariant>, AppError> {
        policy::require(session, Resource::Products, ResourceAction::Read)?;

        self.repo
            .find_product(policy::company_filter(session), product_id)
            .await?
            .ok_or(AppError::NotFound("Produto"))?;

        self.repo.list_variants(product_id).await
    }

    pub async fn create_variant(
        &self,
        session: &Session,
        product_id: Uuid,
        payload: &CreateVariantPayload,
    ) -> Result<ProductVariant, AppError> {
        policy::require(session, Resource::Products, ResourceAction::Create)?;

        let product = self
            .repo
            .find_product(policy::company_filter(session), product_id)
            .await?
            .ok_or(AppError::NotFound("Produto"))?;

        let variant = self
            .repo
            .create_variant(
                &self.pool,
                product.company_id,
                product_id,
                &payload.name,
                payload.volume.as_deref(),
                payload.price_modifier,
                payload.stock_quantity,
            )
            .await?;

        self.audit
            .record(audit::entry(
                product.company_id,
                Some(session.user_id),
                "product_variant",
                variant.id,
                AuditAction::Create,
                None,
                audit::snapshot(&variant),
            ))
            .await;

        Ok(variant)
    }

    pub async fn deactivate_variant(
        &self,
        session: &Session,
        id: Uuid,
    ) -> Result<ProductVariant, AppError> {
        policy::require(session, Resource::Products, ResourceAction::Update)?;

        let existing = self
            .repo
            .find_variant(policy::company_filter(session), id)
            .await?
            .ok_or(AppError::NotFound("Variante"))?;

        let updated = self.repo.set_variant_active(&self.pool, id, false).await?;

        self.audit
            .record(audit::entry(
                existing.company_id,
                Some(session.user_id),
                "product_variant",
                id,
                AuditAction::Delete,
                audit::snapshot(&existing),
                audit::snapshot(&updated),
            ))
            .await;

        Ok(updated)
    }

    // =========================================================================
    //  STOREFRONT PÚBLICO
    // =========================================================================

    pub async fn public_profile(&self, slug: &str) -> Result<CompanyPublicProfile, AppError> {
        let company = self
            .company_repo
            .find_by_slug(slug)
            .await?
            .filter(|c| c.is_active)
            .ok_or(AppError::NotFound("Loja"))?;

        Ok(company.into())
    }

    pub async fn public_menu(&self, slug: &str) -> Result<Menu, AppError> {
        let company = self
            .company_repo
            .find_by_slug(slug)
            .await?
            .filter(|c| c.is_active)
            .ok_or(AppError::NotFound("Loja"))?;

        let categories = self.repo.categories_for_company(company.id).await?;
        let products = self.repo.products_for_company(company.id).await?;
        let variants = self.repo.variants_for_company(company.id).await?;

        Ok(assemble_menu(company.into(), categories, products, variants))
    }
}

/// Monta a árvore do cardápio público filtrando inativos em todos os
/// níveis: categoria inativa esconde seus produtos mesmo que eles
/// permaneçam individualmente ativos.
pub fn assemble_menu(
    company: CompanyPublicProfile,
    categories: Vec<Category>,
    products: Vec<Product>,
    variants: Vec<ProductVariant>,
) -> Menu {
    let mut variants_by_product: HashMap<Uuid, Vec<MenuVariant>> = HashMap::new();
    for variant in variants.into_iter().filter(|v| v.is_active) {
        // preço da variante = preço base do produto + modificador
        variants_by_product
            .entry(variant.product_id)
            .or_default()
            .push(MenuVariant {
                id: variant.id,
                name: variant.name,
                volume: variant.volume,
                price: variant.price_modifier, // ajustado abaixo com o base_price
                stock_quantity: variant.stock_quantity,
            });
    }

    let mut products_by_category: HashMap<Uuid, Vec<MenuProduct>> = HashMap::new();
    for product in products.into_iter().filter(|p| p.is_active) {
        let mut product_variants = variants_by_product.remove(&product.id).unwrap_or_default();
        for v in &mut product_variants {
            v.price += product.base_price;
        }
        products_by_category
            .entry(product.category_id)
            .or_default()
            .push(MenuProduct {
                id: product.id,
                name: product.name,
                description: product.description,
                base_price: product.base_price,
                image_path: product.image_path,
                variants: product_variants,
            });
    }

    let categories = categories
        .into_iter()
        .filter(|c| c.is_active)
        .map(|c| MenuCategory {
            products: products_by_category.remove(&c.id).unwrap_or_default(),
            id: c.id,
            name: c.name,
        })
        .collect();

    Menu {
        company,
        categories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn profile() -> CompanyPublicProfile {
        CompanyPublicProfile {
            name: "Bebidas Sul".to_string(),
            slug: "bebidas-sul".to_string(),
            phone: None,
            address: None,
            city: None,
            state: None,
            logo_path: None,
        }
    }

    fn category(company_id: Uuid, name: &str, active: bool) -> Category {
        Category {
            id: Uuid::new_v4(),
            company_id,
            name: name.to_string(),
            sort_order: 0,
            is_active: active,
            created_at: Utc::now(),
        }
    }

    fn product(company_id: Uuid, category_id: Uuid, name: &str, price: &str, active: bool) -> Product {
        Product {
            id: Uuid::new_v4(),
            company_id,
            category_id,
            name: name.to_string(),
            sku: None,
            description: None,
            base_price: price.parse().unwrap(),
            image_path: None,
            is_active: active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn variant(company_id: Uuid, product_id: Uuid, name: &str, modifier: &str, stock: i32) -> ProductVariant {
        ProductVariant {
            id: Uuid::new_v4(),
            company_id,
            product_id,
            name: name.to_string(),
            volume: Some("2L".to_string()),
            price_modifier: modifier.parse().unwrap(),
            stock_quantity: stock,
            image_path: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn menu_nests_active_category_product_variant_tree() {
        let company_id = Uuid::new_v4();
        let cat = category(company_id, "Refrigerantes", true);
        let prod = product(company_id, cat.id, "Cola 2L", "10.00", true);
        let var = variant(company_id, prod.id, "Pet", "0.00", 50);

        let menu = assemble_menu(profile(), vec![cat.clone()], vec![prod.clone()], vec![var]);

        assert_eq!(menu.categories.len(), 1);
        assert_eq!(menu.categories[0].name, "Refrigerantes");
        assert_eq!(menu.categories[0].products.len(), 1);

        let menu_product = &menu.categories[0].products[0];
        assert_eq!(menu_product.name, "Cola 2L");
        assert_eq!(menu_product.variants.len(), 1);
        assert_eq!(menu_product.variants[0].name, "Pet");
        // preço da variante = base + modificador
        assert_eq!(menu_product.variants[0].price, Decimal::new(1000, 2));
        assert_eq!(menu_product.variants[0].stock_quantity, 50);
    }

    #[test]
    fn inactive_category_hides_its_active_products() {
        let company_id = Uuid::new_v4();
        let cat = category(company_id, "Refrigerantes", false);
        let prod = product(company_id, cat.id, "Cola 2L", "10.00", true);

        let menu = assemble_menu(profile(), vec![cat], vec![prod], vec![]);

        assert!(menu.categories.is_empty());
    }

    #[test]
    fn inactive_products_and_variants_are_filtered() {
        let company_id = Uuid::new_v4();
        let cat = category(company_id, "Cervejas", true);
        let active = product(company_id, cat.id, "Pilsen", "5.00", true);
        let inactive = product(company_id, cat.id, "Descontinuada", "4.00", false);
        let mut dead_variant = variant(company_id, active.id, "Lata", "-1.00", 10);
        dead_variant.is_active = false;

        let menu = assemble_menu(profile(), vec![cat], vec![active, inactive], vec![dead_variant]);

        assert_eq!(menu.categories[0].products.len(), 1);
        assert_eq!(menu.categories[0].products[0].name, "Pilsen");
        assert!(menu.categories[0].products[0].variants.is_empty());
    }
}
