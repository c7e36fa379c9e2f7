// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Estoque ---
        handlers::inventory::list_products,
        handlers::inventory::create_product,
        handlers::inventory::update_product,
        handlers::inventory::set_promotion,
        handlers::inventory::set_stock,
        handlers::inventory::low_stock,
        handlers::inventory::movement_history,
        handlers::inventory::create_category,
        handlers::inventory::list_categories,

        // --- Vendas ---
        handlers::sales::create_sale,
        handlers::sales::list_sales,
        handlers::sales::sale_detail,
        handlers::sales::create_payment_method,
        handlers::sales::list_payment_methods,

        // --- Pedidos ---
        handlers::orders::create_order,
        handlers::orders::list_orders,
        handlers::orders::order_detail,
        handlers::orders::receive_order,
        handlers::orders::list_messages,

        // --- Clientes e Fornecedores ---
        handlers::crm::create_customer,
        handlers::crm::customer_by_cpf,
        handlers::crm::create_supplier,
        handlers::crm::list_suppliers,

        // --- Painel ---
        handlers::dashboard::summary,
        handlers::dashboard::monthly_sales,
        handlers::dashboard::stock_report,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Estoque ---
            models::inventory::Category,
            models::inventory::Product,
            models::inventory::ProductWithStock,
            models::inventory::StockLevel,
            models::inventory::MovementType,
            models::inventory::StockMovement,
            models::inventory::StockMovementEntry,
            handlers::inventory::CreateProductPayload,
            handlers::inventory::UpdateProductPayload,
            handlers::inventory::SetPromotionPayload,
            handlers::inventory::SetStockPayload,
            handlers::inventory::CreateCategoryPayload,

            // --- Vendas ---
            models::sales::PaymentMethod,
            models::sales::Sale,
            models::sales::SaleItem,
            models::sales::SaleSummary,
            models::sales::SaleItemDetail,
            models::sales::SaleDetail,
            handlers::sales::SaleLinePayload,
            handlers::sales::CreateSalePayload,
            handlers::sales::CreatePaymentMethodPayload,

            // --- Pedidos ---
            models::orders::OrderStatus,
            models::orders::SupplierOrder,
            models::orders::SupplierOrderItem,
            models::orders::OrderSummary,
            models::orders::OrderItemDetail,
            models::orders::OrderDetail,
            models::orders::Message,
            handlers::orders::OrderLinePayload,
            handlers::orders::CreateOrderPayload,
            handlers::orders::ReceiveOrderPayload,

            // --- Clientes e Fornecedores ---
            models::crm::Address,
            models::crm::Customer,
            models::crm::Supplier,
            handlers::crm::CreateCustomerPayload,
            handlers::crm::CreateSupplierPayload,

            // --- Painel ---
            models::dashboard::IdleProduct,
            models::dashboard::DashboardSummary,
            models::dashboard::MonthlySalesReport,
            models::dashboard::StockReportEntry,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Estoque", description = "Produtos, saldo e livro-razão de movimentações"),
        (name = "Vendas", description = "Registro e consulta de vendas"),
        (name = "Pedidos", description = "Pedidos de reposição a fornecedores"),
        (name = "Clientes", description = "Cadastro e busca de clientes"),
        (name = "Fornecedores", description = "Cadastro de fornecedores"),
        (name = "Painel", description = "Indicadores e relatórios gerenciais")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
