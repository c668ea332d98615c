// src/config.rs

use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::{
    db::{AccountingRepository, AuditRepository},
    services::{AccountingService, DerivedPostingService},
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub accounting_repo: AccountingRepository,
    pub accounting_service: AccountingService,
    pub posting_service: DerivedPostingService,
}

impl AppState {
    // Carrega as configurações do ambiente e monta o estado da aplicação
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

        // --- Monta o gráfico de dependências ---
        let accounting_repo = AccountingRepository::new(db_pool.clone());
        let audit_repo = AuditRepository::new();
        let accounting_service =
            AccountingService::new(accounting_repo.clone(), audit_repo);
        let posting_service = DerivedPostingService::new(accounting_service.clone());

        Ok(Self {
            db_pool,
            jwt_secret,
            accounting_repo,
            accounting_service,
            posting_service,
        })
    }
}
