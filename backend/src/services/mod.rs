//! Business logic services for the Pharmacy Management Platform

pub mod category;
pub mod customer;
pub mod dashboard;
pub mod debt;
pub mod medicine;
pub mod payment;
pub mod purchase;
pub mod report;
pub mod sale;
pub mod stock;
pub mod supplier;

pub use category::CategoryService;
pub use customer::CustomerService;
pub use dashboard::DashboardService;
pub use debt::DebtService;
pub use medicine::MedicineService;
pub use payment::PaymentService;
pub use purchase::PurchaseService;
pub use report::ReportService;
pub use sale::SaleService;
pub use stock::StockService;
pub use supplier::SupplierService;
