// src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use pdv_backend::{
    config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard,
};

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Rotas de usuário (protegidas pelo middleware)
    let user_routes = Router::new().route("/me", get(handlers::auth::get_me));

    let inventory_routes = Router::new()
        .route(
            "/products",
            post(handlers::inventory::create_product).get(handlers::inventory::list_products),
        )
        .route("/products/{id}", put(handlers::inventory::update_product))
        .route(
            "/products/{id}/promotion",
            put(handlers::inventory::set_promotion),
        )
        .route("/products/{id}/stock", put(handlers::inventory::set_stock))
        .route("/stock/low", get(handlers::inventory::low_stock))
        .route(
            "/stock/movements",
            get(handlers::inventory::movement_history),
        )
        .route(
            "/categories",
            post(handlers::inventory::create_category).get(handlers::inventory::list_categories),
        );

    let sales_routes = Router::new()
        .route(
            "/sales",
            post(handlers::sales::create_sale).get(handlers::sales::list_sales),
        )
        .route("/sales/{id}", get(handlers::sales::sale_detail))
        .route(
            "/payment-methods",
            post(handlers::sales::create_payment_method)
                .get(handlers::sales::list_payment_methods),
        );

    let order_routes = Router::new()
        .route(
            "/orders",
            post(handlers::orders::create_order).get(handlers::orders::list_orders),
        )
        .route("/orders/{id}", get(handlers::orders::order_detail))
        .route("/orders/{id}/receive", post(handlers::orders::receive_order))
        .route("/messages", get(handlers::orders::list_messages));

    let crm_routes = Router::new()
        .route("/customers", post(handlers::crm::create_customer))
        .route("/customers/cpf/{cpf}", get(handlers::crm::customer_by_cpf))
        .route(
            "/suppliers",
            post(handlers::crm::create_supplier).get(handlers::crm::list_suppliers),
        );

    let dashboard_routes = Router::new()
        .route("/dashboard/summary", get(handlers::dashboard::summary))
        .route(
            "/reports/sales/monthly",
            get(handlers::dashboard::monthly_sales),
        )
        .route("/reports/stock", get(handlers::dashboard::stock_report));

    // Tudo que não é login/registro exige o Bearer token
    let protected_routes = Router::new()
        .nest("/users", user_routes)
        .merge(inventory_routes)
        .merge(sales_routes)
        .merge(order_routes)
        .merge(crm_routes)
        .merge(dashboard_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api", protected_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
