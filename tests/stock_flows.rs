// tests/stock_flows.rs
//
// Testes de integração do fluxo estoque/venda/pedido: rodam contra um
// Postgres real (o #[sqlx::test] cria um banco por teste e aplica as
// migrações de ./migrations).

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use pdv_backend::{
    common::error::AppError,
    config::AppState,
    db::UserRepository,
    models::{
        auth::{Role, User},
        crm::{Customer, Supplier},
        inventory::{Category, MovementType, ProductWithStock, StockMovement},
        orders::OrderStatus,
        sales::PaymentMethod,
    },
    services::{order_service::OrderLine, sale_service::SaleLine},
};

// ---
// Cenário base: um operador logado e o cadastro mínimo da loja
// ---

struct Cenario {
    state: AppState,
    user: User,
    category: Category,
    supplier: Supplier,
    customer: Customer,
    payment: PaymentMethod,
}

async fn cenario(pool: &PgPool) -> Cenario {
    let state = AppState::with_pool(pool.clone(), "segredo-de-teste".to_string());

    let user = UserRepository::new(pool.clone())
        .create_user("operador", "hash-de-teste", Role::Vendedor)
        .await
        .expect("criar usuário");

    let category = state
        .inventory_service
        .create_category(&state.db_pool, "Mercearia")
        .await
        .expect("criar categoria");

    let supplier = state
        .crm_service
        .create_supplier(
            &state.db_pool,
            "Distribuidora Central",
            None,
            "12345678000199",
            None,
            None,
            None,
            None,
        )
        .await
        .expect("criar fornecedor");

    let customer = state
        .crm_service
        .create_customer(
            &state.db_pool,
            "Maria Silva",
            "529.982.247-25",
            None,
            None,
            None,
            None,
        )
        .await
        .expect("criar cliente");

    let payment = state
        .sale_service
        .create_payment_method(&state.db_pool, "Dinheiro", 1)
        .await
        .expect("criar forma de pagamento");

    Cenario {
        state,
        user,
        category,
        supplier,
        customer,
        payment,
    }
}

async fn novo_produto(
    c: &Cenario,
    name: &str,
    price: Decimal,
    promo: Option<Decimal>,
    initial_quantity: i32,
) -> ProductWithStock {
    c.state
        .inventory_service
        .create_product(
            &c.state.db_pool,
            name,
            None,
            price,
            promo,
            c.category.id,
            Some(c.supplier.id),
            initial_quantity,
            1,
            &c.user,
        )
        .await
        .expect("criar produto")
}

async fn saldo(pool: &PgPool, product_id: Uuid) -> i32 {
    sqlx::query_scalar::<_, i32>("SELECT quantity FROM stock_levels WHERE product_id = $1")
        .bind(product_id)
        .fetch_one(pool)
        .await
        .expect("ler saldo")
}

async fn movimentos(pool: &PgPool, product_id: Uuid) -> Vec<StockMovement> {
    sqlx::query_as::<_, StockMovement>(
        "SELECT * FROM stock_movements WHERE product_id = $1 ORDER BY created_at ASC, id ASC",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await
    .expect("ler movimentações")
}

async fn soma_dos_deltas(pool: &PgPool, product_id: Uuid) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(quantity), 0) FROM stock_movements WHERE product_id = $1",
    )
    .bind(product_id)
    .fetch_one(pool)
    .await
    .expect("somar deltas")
}

async fn total_de_vendas(pool: &PgPool) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sales")
        .fetch_one(pool)
        .await
        .expect("contar vendas")
}

// ---
// Venda
// ---

#[sqlx::test]
async fn venda_baixa_estoque_e_registra_saida(pool: PgPool) {
    let c = cenario(&pool).await;
    let p = novo_produto(&c, "Café Torrado 500g", Decimal::new(2000, 2), None, 10).await;

    let venda = c
        .state
        .sale_service
        .create_sale(
            &c.state.db_pool,
            c.customer.id,
            c.payment.id,
            &[SaleLine {
                product_id: p.id,
                quantity: 3,
            }],
            &c.user,
        )
        .await
        .expect("registrar venda");

    assert_eq!(venda.header.total, Decimal::new(6000, 2));
    assert_eq!(venda.customer_name, "Maria Silva");
    assert_eq!(venda.items.len(), 1);
    assert_eq!(venda.items[0].unit_price, Decimal::new(2000, 2));
    assert_eq!(saldo(&pool, p.id).await, 7);

    let movs = movimentos(&pool, p.id).await;
    // Cadastro (+10) e venda (-3)
    assert_eq!(movs.len(), 2);
    assert_eq!(movs[0].movement_type, MovementType::Entrada);
    assert_eq!(movs[0].quantity, 10);
    assert_eq!(movs[1].movement_type, MovementType::Saida);
    assert_eq!(movs[1].quantity, -3);
    assert_eq!(movs[1].user_id, Some(c.user.id));
    assert_eq!(
        movs[1].note.as_deref(),
        Some(format!("Venda {}", venda.header.id).as_str())
    );
}

#[sqlx::test]
async fn promocao_congela_preco_unitario(pool: PgPool) {
    let c = cenario(&pool).await;
    let p = novo_produto(
        &c,
        "Azeite Extra Virgem",
        Decimal::new(2000, 2),
        Some(Decimal::new(1500, 2)),
        7,
    )
    .await;

    let venda = c
        .state
        .sale_service
        .create_sale(
            &c.state.db_pool,
            c.customer.id,
            c.payment.id,
            &[SaleLine {
                product_id: p.id,
                quantity: 2,
            }],
            &c.user,
        )
        .await
        .expect("registrar venda");

    assert_eq!(venda.items[0].unit_price, Decimal::new(1500, 2));
    assert_eq!(venda.header.total, Decimal::new(3000, 2));
    assert_eq!(saldo(&pool, p.id).await, 5);
}

#[sqlx::test]
async fn linhas_repetidas_do_mesmo_produto_sao_somadas(pool: PgPool) {
    let c = cenario(&pool).await;
    let p = novo_produto(&c, "Arroz Tipo 1 5kg", Decimal::new(1000, 2), None, 10).await;

    let venda = c
        .state
        .sale_service
        .create_sale(
            &c.state.db_pool,
            c.customer.id,
            c.payment.id,
            &[
                SaleLine {
                    product_id: p.id,
                    quantity: 1,
                },
                SaleLine {
                    product_id: p.id,
                    quantity: 2,
                },
            ],
            &c.user,
        )
        .await
        .expect("registrar venda");

    assert_eq!(venda.items.len(), 1);
    assert_eq!(venda.items[0].quantity, 3);
    assert_eq!(venda.header.total, Decimal::new(3000, 2));
    assert_eq!(saldo(&pool, p.id).await, 7);
}

#[sqlx::test]
async fn estoque_insuficiente_rejeita_a_venda_inteira(pool: PgPool) {
    let c = cenario(&pool).await;
    let a = novo_produto(&c, "Feijão Carioca 1kg", Decimal::new(800, 2), None, 10).await;
    let b = novo_produto(&c, "Farinha de Trigo 1kg", Decimal::new(600, 2), None, 2).await;

    let err = c
        .state
        .sale_service
        .create_sale(
            &c.state.db_pool,
            c.customer.id,
            c.payment.id,
            &[
                SaleLine {
                    product_id: a.id,
                    quantity: 1,
                },
                SaleLine {
                    product_id: b.id,
                    quantity: 5,
                },
            ],
            &c.user,
        )
        .await
        .expect_err("a venda deveria ser rejeitada");

    match err {
        AppError::InsufficientStock { product, available } => {
            assert_eq!(product, "Farinha de Trigo 1kg");
            assert_eq!(available, 2);
        }
        other => panic!("erro inesperado: {other:?}"),
    }

    // Nada mudou: sem venda, sem itens, sem movimentação além do cadastro
    assert_eq!(saldo(&pool, a.id).await, 10);
    assert_eq!(saldo(&pool, b.id).await, 2);
    assert_eq!(total_de_vendas(&pool).await, 0);
    assert_eq!(movimentos(&pool, a.id).await.len(), 1);
    assert_eq!(movimentos(&pool, b.id).await.len(), 1);
}

#[sqlx::test]
async fn venda_sem_linhas_validas_e_rejeitada(pool: PgPool) {
    let c = cenario(&pool).await;
    let p = novo_produto(&c, "Sal Refinado 1kg", Decimal::new(300, 2), None, 5).await;

    let err = c
        .state
        .sale_service
        .create_sale(
            &c.state.db_pool,
            c.customer.id,
            c.payment.id,
            &[SaleLine {
                product_id: p.id,
                quantity: 0,
            }],
            &c.user,
        )
        .await
        .expect_err("carrinho vazio deveria ser rejeitado");

    assert!(matches!(err, AppError::NoValidLines));
    assert_eq!(total_de_vendas(&pool).await, 0);
}

// ---
// Pedidos a fornecedor
// ---

#[sqlx::test]
async fn pedido_e_recebido_uma_unica_vez(pool: PgPool) {
    let c = cenario(&pool).await;
    let p = novo_produto(&c, "Leite Integral 1L", Decimal::new(550, 2), None, 0).await;

    let pedido = c
        .state
        .order_service
        .create_order(
            &c.state.db_pool,
            c.supplier.id,
            &[OrderLine {
                product_id: p.id,
                quantity: 20,
            }],
        )
        .await
        .expect("criar pedido");

    assert_eq!(pedido.header.status, OrderStatus::Pending);
    assert_eq!(pedido.supplier_name, "Distribuidora Central");

    // A criação do pedido deixa uma mensagem de log legível
    let mensagens = c
        .state
        .order_service
        .list_messages()
        .await
        .expect("listar mensagens");
    assert_eq!(mensagens.len(), 1);
    assert!(mensagens[0].content.contains("Leite Integral 1L (20 un)"));

    let recebido: HashMap<Uuid, i32> = HashMap::from([(p.id, 20)]);
    c.state
        .order_service
        .receive_order(&c.state.db_pool, pedido.header.id, &recebido, &c.user)
        .await
        .expect("receber pedido");

    assert_eq!(saldo(&pool, p.id).await, 20);
    let movs = movimentos(&pool, p.id).await;
    assert_eq!(movs.len(), 1);
    assert_eq!(movs[0].movement_type, MovementType::Entrada);
    assert_eq!(movs[0].quantity, 20);

    // Segundo recebimento: rejeitado, sem nenhum efeito adicional
    let err = c
        .state
        .order_service
        .receive_order(&c.state.db_pool, pedido.header.id, &recebido, &c.user)
        .await
        .expect_err("o segundo recebimento deveria falhar");
    assert!(matches!(err, AppError::OrderAlreadyProcessed));
    assert_eq!(saldo(&pool, p.id).await, 20);
    assert_eq!(movimentos(&pool, p.id).await.len(), 1);
}

#[sqlx::test]
async fn recebimento_exige_quantidade_para_cada_linha(pool: PgPool) {
    let c = cenario(&pool).await;
    let a = novo_produto(&c, "Macarrão Espaguete", Decimal::new(450, 2), None, 0).await;
    let b = novo_produto(&c, "Molho de Tomate", Decimal::new(350, 2), None, 0).await;

    let pedido = c
        .state
        .order_service
        .create_order(
            &c.state.db_pool,
            c.supplier.id,
            &[
                OrderLine {
                    product_id: a.id,
                    quantity: 10,
                },
                OrderLine {
                    product_id: b.id,
                    quantity: 6,
                },
            ],
        )
        .await
        .expect("criar pedido");

    // Só informa a quantidade de um dos produtos
    let incompleto: HashMap<Uuid, i32> = HashMap::from([(a.id, 10)]);
    let err = c
        .state
        .order_service
        .receive_order(&c.state.db_pool, pedido.header.id, &incompleto, &c.user)
        .await
        .expect_err("recebimento incompleto deveria falhar");
    assert!(matches!(err, AppError::MissingReceivedQuantity(id) if id == b.id));

    // A transação desfez tudo: pedido continua PENDING e nenhum saldo mudou
    let ainda_pendente = c
        .state
        .order_service
        .order_detail(pedido.header.id)
        .await
        .expect("consultar pedido");
    assert_eq!(ainda_pendente.header.status, OrderStatus::Pending);
    assert_eq!(saldo(&pool, a.id).await, 0);
    assert_eq!(saldo(&pool, b.id).await, 0);
    assert_eq!(movimentos(&pool, a.id).await.len(), 0);
}

// ---
// Ajuste manual
// ---

#[sqlx::test]
async fn ajuste_manual_registra_o_delta(pool: PgPool) {
    let c = cenario(&pool).await;
    let p = novo_produto(&c, "Açúcar Cristal 2kg", Decimal::new(700, 2), None, 7).await;

    let novo = c
        .state
        .inventory_service
        .set_stock(&c.state.db_pool, p.id, 3, &c.user)
        .await
        .expect("ajustar estoque");
    assert_eq!(novo, 3);
    assert_eq!(saldo(&pool, p.id).await, 3);

    let movs = movimentos(&pool, p.id).await;
    assert_eq!(movs.len(), 2);
    assert_eq!(movs[1].movement_type, MovementType::AjusteManual);
    assert_eq!(movs[1].quantity, -4);
    assert_eq!(
        movs[1].note.as_deref(),
        Some("Alterado por operador")
    );

    // Ajustar para o mesmo valor não gera movimentação nova
    c.state
        .inventory_service
        .set_stock(&c.state.db_pool, p.id, 3, &c.user)
        .await
        .expect("ajuste sem mudança");
    assert_eq!(movimentos(&pool, p.id).await.len(), 2);
}

// ---
// Invariantes do livro-razão
// ---

#[sqlx::test]
async fn saldo_e_sempre_a_soma_dos_deltas(pool: PgPool) {
    let c = cenario(&pool).await;
    let p = novo_produto(&c, "Óleo de Soja 900ml", Decimal::new(900, 2), None, 10).await;

    // Venda de 3
    c.state
        .sale_service
        .create_sale(
            &c.state.db_pool,
            c.customer.id,
            c.payment.id,
            &[SaleLine {
                product_id: p.id,
                quantity: 3,
            }],
            &c.user,
        )
        .await
        .expect("registrar venda");

    // Reposição de 5 via pedido
    let pedido = c
        .state
        .order_service
        .create_order(
            &c.state.db_pool,
            c.supplier.id,
            &[OrderLine {
                product_id: p.id,
                quantity: 5,
            }],
        )
        .await
        .expect("criar pedido");
    let recebido: HashMap<Uuid, i32> = HashMap::from([(p.id, 5)]);
    c.state
        .order_service
        .receive_order(&c.state.db_pool, pedido.header.id, &recebido, &c.user)
        .await
        .expect("receber pedido");

    // Conferência física encontra 8
    c.state
        .inventory_service
        .set_stock(&c.state.db_pool, p.id, 8, &c.user)
        .await
        .expect("ajustar estoque");

    let saldo_final = saldo(&pool, p.id).await;
    assert_eq!(saldo_final, 8);
    assert_eq!(soma_dos_deltas(&pool, p.id).await, saldo_final as i64);
}

// ---
// Clientes
// ---

#[sqlx::test]
async fn cpf_invalido_e_rejeitado_antes_de_gravar(pool: PgPool) {
    let c = cenario(&pool).await;

    let err = c
        .state
        .crm_service
        .create_customer(
            &c.state.db_pool,
            "João Souza",
            "529.982.247-24", // dígito verificador errado
            None,
            None,
            None,
            None,
        )
        .await
        .expect_err("CPF inválido deveria ser rejeitado");
    assert!(matches!(err, AppError::InvalidCpf));

    // CPF repetido cai na unique do banco
    let err = c
        .state
        .crm_service
        .create_customer(
            &c.state.db_pool,
            "Maria Silva (de novo)",
            "52998224725",
            None,
            None,
            None,
            None,
        )
        .await
        .expect_err("CPF duplicado deveria ser rejeitado");
    assert!(matches!(err, AppError::CpfAlreadyExists));

    // Busca aceita o CPF com máscara
    let encontrada = c
        .state
        .crm_service
        .find_customer_by_cpf("529.982.247-25")
        .await
        .expect("buscar cliente");
    assert_eq!(encontrada.id, c.customer.id);
}
