pub mod crm_repo;
pub use crm_repo::CrmRepository;
pub mod order_repo;
pub use order_repo::OrderRepository;
pub mod product_repo;
pub use product_repo::ProductRepository;
pub mod sale_repo;
pub use sale_repo::SaleRepository;
pub mod stock_repo;
pub use stock_repo::StockRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
