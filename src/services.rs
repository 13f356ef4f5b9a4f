pub mod audit;
pub use audit::AuditService;
pub mod auth;
pub use auth::AuthService;
pub mod catalog_service;
pub use catalog_service::CatalogService;
pub mod company_service;
pub use company_service::CompanyService;
pub mod customer_service;
pub use customer_service::CustomerService;
pub mod finance_service;
pub use finance_service::FinanceService;
pub mod order_service;
pub use order_service::OrderService;
pub mod policy;
pub mod report_service;
pub use report_service::ReportService;
pub mod storage;
pub use storage::{FileStore, LocalFileStore};
pub mod user_service;
pub use user_service::UserService;
