// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{
        CrmRepository, OrderRepository, ProductRepository, SaleRepository, StockRepository,
        UserRepository,
    },
    services::{
        auth::AuthService, crm_service::CrmService, dashboard_service::DashboardService,
        inventory_service::InventoryService, order_service::OrderService,
        sale_service::SaleService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub inventory_service: InventoryService,
    pub sale_service: SaleService,
    pub order_service: OrderService,
    pub crm_service: CrmService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::with_pool(db_pool, jwt_secret))
    }

    /// Monta o gráfico de dependências a partir de uma pool já aberta.
    /// Também é o ponto de entrada dos testes de integração.
    pub fn with_pool(db_pool: PgPool, jwt_secret: String) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let product_repo = ProductRepository::new(db_pool.clone());
        let stock_repo = StockRepository::new(db_pool.clone());
        let sale_repo = SaleRepository::new(db_pool.clone());
        let order_repo = OrderRepository::new(db_pool.clone());
        let crm_repo = CrmRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo, jwt_secret);
        let inventory_service = InventoryService::new(product_repo.clone(), stock_repo.clone());
        let sale_service = SaleService::new(
            sale_repo.clone(),
            crm_repo.clone(),
            product_repo.clone(),
            stock_repo.clone(),
            inventory_service.clone(),
        );
        let order_service = OrderService::new(
            order_repo,
            crm_repo.clone(),
            product_repo,
            inventory_service.clone(),
        );
        let crm_service = CrmService::new(crm_repo);
        let dashboard_service = DashboardService::new(sale_repo, stock_repo);

        Self {
            db_pool,
            auth_service,
            inventory_service,
            sale_service,
            order_service,
            crm_service,
            dashboard_service,
        }
    }
}
