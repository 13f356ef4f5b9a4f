pub mod audit_repo;
pub use audit_repo::AuditRepository;
pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
pub mod company_repo;
pub use company_repo::CompanyRepository;
pub mod customer_repo;
pub use customer_repo::CustomerRepository;
pub mod finance_repo;
pub use finance_repo::FinanceRepository;
pub mod order_repo;
pub use order_repo::OrderRepository;
pub mod report_repo;
pub use report_repo::ReportRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
