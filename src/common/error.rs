// src/common/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::models::accounting::{EntrySide, NormalBalance};

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// As variantes contábeis carregam os dados necessários para uma
// mensagem acionável (quase sempre é plano de contas mal configurado).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Lançamento desbalanceado: débitos {debit_total} != créditos {credit_total}")]
    Unbalanced {
        debit_total: Decimal,
        credit_total: Decimal,
    },

    #[error("Partida dobrada exige pelo menos 2 pernas, recebeu {count}")]
    TooFewLines { count: usize },

    #[error("Conta {code} não encontrada para a empresa {tenant_id}")]
    AccountNotFound { code: String, tenant_id: Uuid },

    #[error(
        "Conta {code}: a perna declara {side:?}, mas a natureza da conta é {normal_balance:?}"
    )]
    NormalBalanceMismatch {
        code: String,
        side: EntrySide,
        normal_balance: NormalBalance,
    },

    #[error("Lançamento contábil não encontrado")]
    JournalEntryNotFound,

    #[error("Já existe uma conta com esse código")]
    AccountCodeAlreadyExists,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Cabeçalho X-Tenant-ID ausente ou inválido")]
    InvalidTenantHeader,

    // Variante para erros de banco de dados (falha de transação/commit inclusa)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            // Falhas contábeis: terminais para a tentativa, nunca re-tentadas
            // aqui. A mensagem do thiserror já carrega o contexto.
            e @ AppError::Unbalanced { .. } => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            e @ AppError::TooFewLines { .. } => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            e @ AppError::AccountNotFound { .. } => (StatusCode::NOT_FOUND, e.to_string()),
            e @ AppError::NormalBalanceMismatch { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
            }
            e @ AppError::JournalEntryNotFound => (StatusCode::NOT_FOUND, e.to_string()),
            e @ AppError::AccountCodeAlreadyExists => (StatusCode::CONFLICT, e.to_string()),

            e @ AppError::InvalidToken => (StatusCode::UNAUTHORIZED, e.to_string()),
            e @ AppError::InvalidTenantHeader => (StatusCode::BAD_REQUEST, e.to_string()),

            // Todos os outros (DatabaseError, InternalServerError, Jwt) viram 500.
            // O `tracing` loga a mensagem detalhada que o `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        // Resposta padrão para erros que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
