pub mod dashboard_service;
pub mod rent_service;

pub use dashboard_service::DashboardService;
pub use rent_service::RentService;
