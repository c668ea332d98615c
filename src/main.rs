//src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

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

    // Plano de contas + lançamentos + relatórios (tudo protegido por JWT;
    // a empresa vem do cabeçalho X-Tenant-ID)
    let accounting_routes = Router::new()
        .route(
            "/accounts",
            post(handlers::accounting::create_account).get(handlers::accounting::list_accounts),
        )
        .route("/entries", post(handlers::accounting::post_journal_entry))
        .route(
            "/entries/{id}/reverse",
            post(handlers::accounting::reverse_journal_entry),
        )
        .route(
            "/trial-balance",
            get(handlers::accounting::get_trial_balance),
        )
        .route(
            "/ledger/{account_code}",
            get(handlers::accounting::get_general_ledger),
        )
        .route(
            "/events/pos-sale",
            post(handlers::accounting::record_pos_sale),
        )
        .route(
            "/events/inventory-purchase",
            post(handlers::accounting::record_inventory_purchase),
        )
        .route(
            "/events/early-payment",
            post(handlers::accounting::record_early_payment),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/accounting", accounting_routes)
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", docs::ApiDoc::openapi()),
        )
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
