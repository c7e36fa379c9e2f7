pub mod auth;
pub mod crm_service;
pub mod dashboard_service;
pub mod inventory_service;
pub mod order_service;
pub mod sale_service;
