// src/config.rs

use std::{env, sync::Arc, time::Duration};

use chrono::FixedOffset;
use rust_decimal::Decimal;
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    db::{
        AuditRepository, CatalogRepository, CompanyRepository, CustomerRepository,
        FinanceRepository, OrderRepository, ReportRepository, UserRepository,
    },
    services::{
        AuditService, AuthService, CatalogService, CompanyService, CustomerService,
        FinanceService, OrderService, ReportService, UserService, storage::FileStore,
        storage::LocalFileStore,
    },
};

const DEFAULT_BCRYPT_COST: u32 = 12;
// Horário de Brasília
const DEFAULT_TZ_OFFSET_HOURS: i32 = -3;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub file_store: Arc<dyn FileStore>,
    pub auth_service: AuthService,
    pub company_service: CompanyService,
    pub catalog_service: CatalogService,
    pub customer_service: CustomerService,
    pub user_service: UserService,
    pub order_service: OrderService,
    pub finance_service: FinanceService,
    pub report_service: ReportService,
    pub audit_service: AuditService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").map_err(|_| anyhow::anyhow!("DATABASE_URL deve ser definida"))?;
        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET deve ser definido"))?;
        let storage_root = env::var("STORAGE_ROOT").unwrap_or_else(|_| "uploads".to_string());

        let flat_delivery_fee: Decimal = env::var("DELIVERY_FEE")
            .unwrap_or_else(|_| "0".to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("DELIVERY_FEE inválida"))?;

        let bcrypt_cost: u32 = env::var("BCRYPT_COST")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_BCRYPT_COST);

        let tz_offset_hours: i32 = env::var("TZ_OFFSET_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TZ_OFFSET_HOURS);
        let tz_offset = FixedOffset::east_opt(tz_offset_hours * 3600)
            .ok_or_else(|| anyhow::anyhow!("TZ_OFFSET_HOURS fora do intervalo"))?;

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let file_store: Arc<dyn FileStore> = Arc::new(LocalFileStore::new(storage_root));

        // --- Monta o gráfico de dependências ---
        let company_repo = CompanyRepository::new(db_pool.clone());
        let user_repo = UserRepository::new(db_pool.clone());
        let customer_repo = CustomerRepository::new(db_pool.clone());
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let order_repo = OrderRepository::new(db_pool.clone());
        let finance_repo = FinanceRepository::new(db_pool.clone());
        let audit_repo = AuditRepository::new(db_pool.clone());
        let report_repo = ReportRepository::new(db_pool.clone());

        let audit_service = AuditService::new(audit_repo);
        let auth_service = AuthService::new(
            user_repo.clone(),
            company_repo.clone(),
            audit_service.clone(),
            jwt_secret.clone(),
            bcrypt_cost,
            db_pool.clone(),
        );
        let company_service = CompanyService::new(
            company_repo.clone(),
            audit_service.clone(),
            db_pool.clone(),
        );
        let catalog_service = CatalogService::new(
            catalog_repo.clone(),
            company_repo.clone(),
            audit_service.clone(),
            db_pool.clone(),
        );
        let customer_service = CustomerService::new(
            customer_repo.clone(),
            company_repo.clone(),
            audit_service.clone(),
            bcrypt_cost,
            db_pool.clone(),
        );
        let user_service = UserService::new(
            user_repo,
            audit_service.clone(),
            bcrypt_cost,
            db_pool.clone(),
        );
        let finance_service = FinanceService::new(
            finance_repo,
            audit_service.clone(),
            db_pool.clone(),
        );
        let order_service = OrderService::new(
            order_repo,
            catalog_repo,
            customer_repo,
            company_repo,
            finance_service.clone(),
            audit_service.clone(),
            flat_delivery_fee,
            db_pool.clone(),
        );
        let report_service = ReportService::new(report_repo, tz_offset);

        Ok(Self {
            db_pool,
            jwt_secret,
            file_store,
            auth_service,
            company_service,
            catalog_service,
            customer_service,
            user_service,
            order_service,
            finance_service,
            report_service,
            audit_service,
        })
    }
}
