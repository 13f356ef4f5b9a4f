// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;
use crate::services::policy;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::signup,
        handlers::auth::login,
        handlers::auth::me,

        // --- Empresas ---
        handlers::companies::list,
        handlers::companies::get,
        handlers::companies::create,
        handlers::companies::update,
        handlers::companies::deactivate,
        handlers::companies::upload_logo,

        // --- Catálogo ---
        handlers::categories::list,
        handlers::categories::create,
        handlers::categories::update,
        handlers::categories::deactivate,
        handlers::products::list,
        handlers::products::create,
        handlers::products::update,
        handlers::products::deactivate,
        handlers::products::upload_image,
        handlers::products::list_variants,
        handlers::products::create_variant,
        handlers::products::deactivate_variant,

        // --- Clientes ---
        handlers::customers::list,
        handlers::customers::create,
        handlers::customers::update,
        handlers::customers::deactivate,
        handlers::customers::reset_password,

        // --- Usuários ---
        handlers::users::list,
        handlers::users::create,
        handlers::users::deactivate,
        handlers::users::reset_password,

        // --- Pedidos ---
        handlers::orders::list,
        handlers::orders::get,
        handlers::orders::create,
        handlers::orders::reorder,
        handlers::orders::update_status,

        // --- Financeiro ---
        handlers::finance::list,
        handlers::finance::create,
        handlers::finance::update_status,

        // --- Relatórios ---
        handlers::reports::sales,
        handlers::reports::products,

        // --- Auditoria ---
        handlers::audit::list,

        // --- Storefront ---
        handlers::public::profile,
        handlers::public::menu,
        handlers::public::register_customer,
        handlers::public::login_customer,
        handlers::public::checkout,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::Session,
            models::auth::SignupPayload,
            models::auth::LoginPayload,
            models::auth::AuthResponse,
            models::auth::CreateUserPayload,
            handlers::auth::MeResponse,
            policy::Resource,

            // --- Empresas ---
            models::company::Company,
            models::company::CreateCompanyPayload,
            models::company::UpdateCompanyPayload,
            models::company::CompanyPublicProfile,

            // --- Catálogo ---
            models::catalog::Category,
            models::catalog::CreateCategoryPayload,
            models::catalog::UpdateCategoryPayload,
            models::catalog::Product,
            models::catalog::CreateProductPayload,
            models::catalog::UpdateProductPayload,
            models::catalog::ProductVariant,
            models::catalog::CreateVariantPayload,
            models::catalog::Menu,
            models::catalog::MenuCategory,
            models::catalog::MenuProduct,
            models::catalog::MenuVariant,

            // --- Clientes ---
            models::customer::Customer,
            models::customer::CreateCustomerPayload,
            models::customer::UpdateCustomerPayload,
            models::customer::RegisterCustomerPayload,
            models::customer::CustomerLoginPayload,
            models::customer::ResetPasswordPayload,

            // --- Pedidos ---
            models::order::OrderStatus,
            models::order::DeliveryType,
            models::order::PaymentMethod,
            models::order::Order,
            models::order::OrderItem,
            models::order::OrderWithItems,
            models::order::OrderLinePayload,
            models::order::CreateOrderPayload,
            models::order::UpdateOrderStatusPayload,

            // --- Financeiro ---
            models::finance::EntryKind,
            models::finance::EntryStatus,
            models::finance::FinancialEntry,
            models::finance::CreateEntryPayload,
            models::finance::UpdateEntryStatusPayload,

            // --- Relatórios ---
            models::report::SalesSummary,
            models::report::DailySalesEntry,
            models::report::TopProductEntry,
            models::report::CategoryRevenueEntry,
            models::report::BreakdownEntry,
            models::report::SalesReport,
            models::report::ProductReport,

            // --- Auditoria ---
            models::audit::AuditAction,
            models::audit::AuditLog,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e cadastro de distribuidoras"),
        (name = "Empresas", description = "Gestão das distribuidoras (tenants)"),
        (name = "Catálogo", description = "Categorias, produtos e variantes"),
        (name = "Clientes", description = "Clientes de cada distribuidora"),
        (name = "Usuários", description = "Usuários de staff e papéis"),
        (name = "Pedidos", description = "Pedidos e seus itens"),
        (name = "Financeiro", description = "Lançamentos de receita e despesa"),
        (name = "Relatórios", description = "Relatórios de vendas e produtos"),
        (name = "Auditoria", description = "Trilha de auditoria das mutações"),
        (name = "Storefront", description = "Loja pública por slug, sem autenticação")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
